use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

use crate::mesh::{EdgeId, Face, Vertex};
use crate::ops::{MeshEditor, SelectMode};

/// Exact copy of a mesh selection, elements and granularity.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionSnapshot {
    pub vertices: BTreeSet<Vertex>,
    pub edges: BTreeSet<EdgeId>,
    pub faces: BTreeSet<Face>,
    pub mode: SelectMode,
}

impl SelectionSnapshot {
    pub fn capture<M: MeshEditor + ?Sized>(mesh: &M) -> Self {
        mesh.selection()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }

    /// Puts the mesh back into exactly this selection state, whatever
    /// happened to the selection since the capture.
    pub fn restore<M: MeshEditor + ?Sized>(&self, mesh: &mut M) {
        mesh.deselect_all();
        mesh.set_select_mode(self.mode);
        mesh.select(self);
    }
}

/// Mutable access to a mesh whose selection is put back on drop.
pub struct SelectionGuard<'a, M: MeshEditor + ?Sized> {
    mesh: &'a mut M,
    snapshot: SelectionSnapshot,
}

impl<'a, M: MeshEditor + ?Sized> SelectionGuard<'a, M> {
    pub fn new(mesh: &'a mut M) -> Self {
        let snapshot = SelectionSnapshot::capture(&*mesh);
        Self { mesh, snapshot }
    }

    pub fn snapshot(&self) -> &SelectionSnapshot {
        &self.snapshot
    }

    /// Drops every element that was selected when the guard was taken.
    pub fn deselect_captured(&mut self) {
        self.mesh.deselect(&self.snapshot);
    }
}

impl<'a, M: MeshEditor + ?Sized> Deref for SelectionGuard<'a, M> {
    type Target = M;

    fn deref(&self) -> &M {
        &*self.mesh
    }
}

impl<'a, M: MeshEditor + ?Sized> DerefMut for SelectionGuard<'a, M> {
    fn deref_mut(&mut self) -> &mut M {
        &mut *self.mesh
    }
}

impl<'a, M: MeshEditor + ?Sized> Drop for SelectionGuard<'a, M> {
    fn drop(&mut self) {
        self.snapshot.restore(&mut *self.mesh);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::EditMesh;

    fn strip() -> EditMesh {
        // two quads sharing an edge
        EditMesh::from_polygons(
            vec![
                [0.0, 0.0, 0.0].into(),
                [1.0, 0.0, 0.0].into(),
                [2.0, 0.0, 0.0].into(),
                [0.0, 1.0, 0.0].into(),
                [1.0, 1.0, 0.0].into(),
                [2.0, 1.0, 0.0].into(),
            ],
            vec![vec![0, 1, 4, 3], vec![1, 2, 5, 4]],
        )
    }

    #[test]
    fn restore_reproduces_capture_after_mutation() {
        let mut mesh = strip();
        mesh.set_select_mode(SelectMode::Face);
        mesh.select_face(Face::from(0), true);
        for v in [0, 1, 4, 3] {
            mesh.select_vertex(Vertex::from(v), true);
        }
        let before = SelectionSnapshot::capture(&mesh);

        mesh.set_select_mode(SelectMode::Vertex);
        mesh.select_more();
        mesh.select_vertex(Vertex::from(0), false);
        assert_ne!(mesh.selection(), before);

        before.restore(&mut mesh);
        assert_eq!(mesh.selection(), before);
    }

    #[test]
    fn guard_restores_on_drop() {
        let mut mesh = strip();
        mesh.select_vertex(Vertex::from(1), true);
        mesh.select_vertex(Vertex::from(4), true);
        let before = mesh.selection();
        {
            let mut guard = SelectionGuard::new(&mut mesh);
            guard.select_more();
            guard.deselect_captured();
            assert!(!guard.selection().vertices.contains(&Vertex::from(1)));
            assert!(guard.selection().vertices.contains(&Vertex::from(2)));
            assert_eq!(guard.snapshot(), &before);
        }
        assert_eq!(mesh.selection(), before);
    }

    #[test]
    fn restore_of_empty_selection_clears_everything() {
        let mut mesh = strip();
        let empty = SelectionSnapshot::capture(&mesh);
        assert!(empty.is_empty());
        mesh.select_vertex(Vertex::from(2), true);
        mesh.set_select_mode(SelectMode::Edge);
        empty.restore(&mut mesh);
        assert_eq!(mesh.selection(), empty);
        assert_eq!(mesh.select_mode(), SelectMode::Vertex);
    }
}
