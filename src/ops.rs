//! The mesh-editing service the draw-extrude core drives.

use nalgebra::{Matrix4, Point3, Unit, Vector3};

use crate::mesh::{EdgeId, Face, Vertex};
use crate::selection::SelectionSnapshot;

/// Selection granularity of the edit mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SelectMode {
    Vertex,
    Edge,
    Face,
}

impl Default for SelectMode {
    fn default() -> Self {
        SelectMode::Vertex
    }
}

/// Editing primitives of the host mesh. Elements are addressed by ids that
/// stay valid for the duration of a session.
///
/// Deselecting an element also deselects every higher-order element built on
/// it (a vertex drops its edges and faces, an edge drops its faces).
/// Selecting never flushes, so a selection can be rebuilt element by element.
pub trait MeshEditor {
    fn world_transform(&self) -> Matrix4<f64>;

    /// Local-space positions of the selected vertices.
    fn selected_positions(&self) -> Vec<Point3<f64>>;

    fn selection(&self) -> SelectionSnapshot;

    fn select_mode(&self) -> SelectMode;
    fn set_select_mode(&mut self, mode: SelectMode);

    fn select_vertex(&mut self, vertex: Vertex, selected: bool);
    fn select_edge(&mut self, edge: EdgeId, selected: bool);
    fn select_face(&mut self, face: Face, selected: bool);

    fn deselect_all(&mut self);

    /// Grows the selection by one ring of edge-adjacent vertices.
    fn select_more(&mut self);

    /// Duplicates the selected region as a new ring joined to the old one by
    /// side faces. The new ring becomes the selection.
    fn extrude_region(&mut self);

    /// Moves the selected vertices by a world-space offset.
    fn translate_selection(&mut self, offset: &Vector3<f64>);

    /// Rotates the selected vertices about a world-space axis through `center`.
    fn rotate_selection(&mut self, axis: &Unit<Vector3<f64>>, angle: f64, center: &Point3<f64>);

    /// Pushes pending edits to the host.
    fn update(&mut self) {}

    fn deselect(&mut self, elements: &SelectionSnapshot) {
        for &v in &elements.vertices {
            self.select_vertex(v, false);
        }
        for &e in &elements.edges {
            self.select_edge(e, false);
        }
        for &f in &elements.faces {
            self.select_face(f, false);
        }
    }

    fn select(&mut self, elements: &SelectionSnapshot) {
        for &v in &elements.vertices {
            self.select_vertex(v, true);
        }
        for &e in &elements.edges {
            self.select_edge(e, true);
        }
        for &f in &elements.faces {
            self.select_face(f, true);
        }
    }
}
