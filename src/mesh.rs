use std::collections::{BTreeMap, BTreeSet};
use std::f64::consts::TAU;

use derive_more::{From, Into};
use nalgebra::{Matrix4, Point3, Unit, UnitQuaternion, Vector3};

use crate::idx::{ElementStore, Index};
use crate::ops::{MeshEditor, SelectMode};
use crate::selection::SelectionSnapshot;

#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug, From, Into)]
pub struct Face(usize);

#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug, From, Into)]
pub struct Vertex(usize);

#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug, From, Into)]
pub struct EdgeId(usize);

impl Index for Face {}
impl Index for Vertex {}
impl Index for EdgeId {}

#[derive(Clone, Copy, PartialOrd, Ord, PartialEq, Eq, Hash, Debug)]
pub struct Corner {
    pub face: Face,
    pub index: usize,
}

/// In-memory polygon mesh with edit-mode selection state.
///
/// Positions are stored in object space; every editing operation takes
/// world-space arguments and maps them through `world`. Edges and faces are
/// also indexed by vertex, so selection edits only visit the neighbourhood
/// they change.
#[derive(Clone, Debug)]
pub struct EditMesh {
    vertices: ElementStore<Vertex, Point3<f64>>,
    edges: ElementStore<EdgeId, [Vertex; 2]>,
    faces: ElementStore<Face, Vec<Vertex>>,
    edge_index: BTreeMap<(Vertex, Vertex), EdgeId>,
    vertex_edges: BTreeMap<Vertex, BTreeSet<EdgeId>>,
    vertex_faces: BTreeMap<Vertex, BTreeSet<Face>>,
    select_mode: SelectMode,
    world: Matrix4<f64>,
    world_inverse: Matrix4<f64>,
    revision: usize,
}

pub struct FaceCornersIter {
    face: Face,
    index: usize,
    count: usize,
}

impl Iterator for FaceCornersIter {
    type Item = Corner;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.count {
            return None;
        }
        let index = self.index;
        self.index += 1;
        Some(Corner {
            face: self.face,
            index,
        })
    }
}

fn edge_key(a: Vertex, b: Vertex) -> (Vertex, Vertex) {
    if a <= b { (a, b) } else { (b, a) }
}

fn has_repeated_corner(corners: &[Vertex]) -> bool {
    corners.iter().collect::<BTreeSet<_>>().len() != corners.len()
}

impl Default for EditMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl EditMesh {
    pub fn new() -> Self {
        Self {
            vertices: ElementStore::new(),
            edges: ElementStore::new(),
            faces: ElementStore::new(),
            edge_index: BTreeMap::new(),
            vertex_edges: BTreeMap::new(),
            vertex_faces: BTreeMap::new(),
            select_mode: SelectMode::Vertex,
            world: Matrix4::identity(),
            world_inverse: Matrix4::identity(),
            revision: 0,
        }
    }

    /// Builds a mesh from positions and index lists. Lists with two indices
    /// become wire edges; lists naming a missing position or repeating a
    /// corner are dropped.
    pub fn from_polygons(positions: Vec<Point3<f64>>, polygons: Vec<Vec<usize>>) -> Self {
        let mut mesh = Self::new();
        let ids: Vec<Vertex> = positions.into_iter().map(|p| mesh.add_vertex(p)).collect();
        for polygon in polygons {
            let corners: Option<Vec<Vertex>> = polygon.iter().map(|&i| ids.get(i).copied()).collect();
            match corners {
                Some(corners) if has_repeated_corner(&corners) => {
                    log::warn!("dropping polygon {:?}: repeated corner", polygon)
                }
                Some(corners) if corners.len() >= 3 => {
                    mesh.add_face(corners);
                }
                Some(corners) if corners.len() == 2 => {
                    mesh.add_edge(corners[0], corners[1]);
                }
                Some(_) => {}
                None => log::warn!("dropping polygon {:?}: index out of range", polygon),
            }
        }
        mesh
    }

    /// A closed loop of `count` vertices on a circle in the local XY plane,
    /// fully selected. The usual starting point for a drawn tube.
    pub fn ring(count: usize, radius: f64) -> Self {
        let mut mesh = Self::new();
        let ids: Vec<Vertex> = (0..count)
            .map(|i| {
                let t = TAU * i as f64 / count as f64;
                mesh.add_vertex(Point3::new(radius * t.cos(), radius * t.sin(), 0.0))
            })
            .collect();
        if count >= 2 {
            for i in 0..count {
                mesh.add_edge(ids[i], ids[(i + 1) % count]);
            }
        }
        let ring = SelectionSnapshot {
            vertices: mesh.vertices.ids().collect(),
            edges: mesh.edges.ids().collect(),
            faces: BTreeSet::new(),
            mode: SelectMode::Vertex,
        };
        mesh.select(&ring);
        mesh
    }

    /// `None` when `world` cannot be inverted.
    pub fn with_world(mut self, world: Matrix4<f64>) -> Option<Self> {
        self.world_inverse = world.try_inverse()?;
        self.world = world;
        Some(self)
    }

    pub fn add_vertex(&mut self, position: Point3<f64>) -> Vertex {
        self.vertices.push(position)
    }

    /// Returns the existing edge when the pair is already connected.
    pub fn add_edge(&mut self, a: Vertex, b: Vertex) -> EdgeId {
        if let Some(&edge) = self.edge_index.get(&edge_key(a, b)) {
            return edge;
        }
        let edge = self.edges.push([a, b]);
        self.edge_index.insert(edge_key(a, b), edge);
        self.link_edge(edge, [a, b]);
        edge
    }

    pub fn add_face(&mut self, corners: Vec<Vertex>) -> Face {
        for i in 0..corners.len() {
            self.add_edge(corners[i], corners[(i + 1) % corners.len()]);
        }
        let face = self.faces.push(corners.clone());
        self.link_face(face, &corners);
        face
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.count()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.count()
    }

    pub fn face_count(&self) -> usize {
        self.faces.count()
    }

    pub fn revision(&self) -> usize {
        self.revision
    }

    pub fn position(&self, vertex: Vertex) -> Option<Point3<f64>> {
        self.vertices.get(vertex).copied()
    }

    pub fn world_position(&self, vertex: Vertex) -> Option<Point3<f64>> {
        self.position(vertex).map(|p| self.world.transform_point(&p))
    }

    pub fn vertices(&self) -> impl Iterator<Item=(Vertex, &Point3<f64>)> {
        self.vertices.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item=(EdgeId, &[Vertex; 2])> {
        self.edges.iter()
    }

    pub fn faces(&self) -> impl Iterator<Item=(Face, &Vec<Vertex>)> {
        self.faces.iter()
    }

    pub fn find_edge(&self, a: Vertex, b: Vertex) -> Option<EdgeId> {
        self.edge_index.get(&edge_key(a, b)).copied()
    }

    pub fn is_vertex_selected(&self, vertex: Vertex) -> bool {
        self.vertices.is_selected(vertex)
    }

    pub fn selected_vertices(&self) -> Vec<Vertex> {
        self.vertices.selected().collect()
    }

    pub fn validate(&self) -> bool {
        self.faces.ids().all(|f| f.is_valid(self))
            && self.edges.iter().all(|(_, [a, b])| {
                a != b && self.vertices.contains(a) && self.vertices.contains(b)
            })
            && self.adjacency_is_consistent()
    }

    fn adjacency_is_consistent(&self) -> bool {
        let edge_links: usize = self.vertex_edges.values().map(BTreeSet::len).sum();
        let face_links: usize = self.vertex_faces.values().map(BTreeSet::len).sum();
        let corners: usize = self.faces.iter().map(|(_, corners)| corners.len()).sum();
        edge_links == 2 * self.edges.count()
            && face_links == corners
            && self.edges.iter().all(|(e, pair)| pair.iter().all(|&v| self.edges_at(v).any(|x| x == e)))
            && self.faces.iter().all(|(f, corners)| corners.iter().all(|&v| self.faces_at(v).any(|x| x == f)))
    }

    fn face_edges(&self, face: Face) -> Vec<(Vertex, Vertex)> {
        face.corners(self)
            .map(|c| (c.to_vertex(self), c.next(self).to_vertex(self)))
            .collect()
    }

    fn face_has_edge(&self, face: Face, a: Vertex, b: Vertex) -> bool {
        let key = edge_key(a, b);
        self.face_edges(face).into_iter().any(|(p, q)| edge_key(p, q) == key)
    }

    fn edges_at(&self, vertex: Vertex) -> impl Iterator<Item=EdgeId> + '_ {
        self.vertex_edges.get(&vertex).into_iter().flatten().copied()
    }

    fn faces_at(&self, vertex: Vertex) -> impl Iterator<Item=Face> + '_ {
        self.vertex_faces.get(&vertex).into_iter().flatten().copied()
    }

    fn link_edge(&mut self, edge: EdgeId, pair: [Vertex; 2]) {
        for v in pair {
            self.vertex_edges.entry(v).or_default().insert(edge);
        }
    }

    fn unlink_edge(&mut self, edge: EdgeId, pair: [Vertex; 2]) {
        for v in pair {
            if let Some(edges) = self.vertex_edges.get_mut(&v) {
                edges.remove(&edge);
            }
        }
    }

    fn link_face(&mut self, face: Face, corners: &[Vertex]) {
        for &v in corners {
            self.vertex_faces.entry(v).or_default().insert(face);
        }
    }

    fn unlink_face(&mut self, face: Face, corners: &[Vertex]) {
        for v in corners {
            if let Some(faces) = self.vertex_faces.get_mut(v) {
                faces.remove(&face);
            }
        }
    }

    fn is_referenced(&self, vertex: Vertex) -> bool {
        self.edges_at(vertex).next().is_some() || self.faces_at(vertex).next().is_some()
    }

    fn remove_vertex(&mut self, vertex: Vertex) {
        self.vertices.remove(vertex);
        self.vertex_edges.remove(&vertex);
        self.vertex_faces.remove(&vertex);
    }

    fn remap_edge(&mut self, edge: EdgeId, a: Vertex, b: Vertex) {
        let old = match self.edges.get(edge) {
            Some(&pair) => pair,
            None => return,
        };
        self.unlink_edge(edge, old);
        self.edge_index.remove(&edge_key(old[0], old[1]));
        if let Some(pair) = self.edges.get_mut(edge) {
            *pair = [a, b];
        }
        self.edge_index.insert(edge_key(a, b), edge);
        self.link_edge(edge, [a, b]);
    }

    fn repoint_face(&mut self, face: Face, twins: &BTreeMap<Vertex, Vertex>) {
        let old = match self.faces.get(face) {
            Some(corners) => corners.clone(),
            None => return,
        };
        let new: Vec<Vertex> = old.iter().map(|v| twins.get(v).copied().unwrap_or(*v)).collect();
        self.unlink_face(face, &old);
        self.link_face(face, &new);
        if let Some(corners) = self.faces.get_mut(face) {
            *corners = new;
        }
    }

    /// Selects every edge and face around `vertices` whose own vertices are
    /// all selected.
    fn flush_selection_around(&mut self, vertices: &BTreeSet<Vertex>) {
        let edges: BTreeSet<EdgeId> = vertices
            .iter()
            .flat_map(|&v| self.edges_at(v))
            .filter(|&e| self.edges[e].iter().all(|v| self.vertices.is_selected(v)))
            .collect();
        let faces: BTreeSet<Face> = vertices
            .iter()
            .flat_map(|&v| self.faces_at(v))
            .filter(|&f| self.faces[f].iter().all(|v| self.vertices.is_selected(v)))
            .collect();
        for e in edges {
            self.edges.set_selected(e, true);
        }
        for f in faces {
            self.faces.set_selected(f, true);
        }
    }
}

impl MeshEditor for EditMesh {
    fn world_transform(&self) -> Matrix4<f64> {
        self.world
    }

    fn selected_positions(&self) -> Vec<Point3<f64>> {
        self.vertices.selected().map(|v| self.vertices[v]).collect()
    }

    fn selection(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            vertices: self.vertices.selected().collect(),
            edges: self.edges.selected().collect(),
            faces: self.faces.selected().collect(),
            mode: self.select_mode,
        }
    }

    fn select_mode(&self) -> SelectMode {
        self.select_mode
    }

    fn set_select_mode(&mut self, mode: SelectMode) {
        self.select_mode = mode;
    }

    fn select_vertex(&mut self, vertex: Vertex, selected: bool) {
        if !self.vertices.set_selected(vertex, selected) || selected {
            return;
        }
        let edges: Vec<EdgeId> = self.edges_at(vertex).collect();
        let faces: Vec<Face> = self.faces_at(vertex).collect();
        for e in edges {
            self.edges.set_selected(e, false);
        }
        for f in faces {
            self.faces.set_selected(f, false);
        }
    }

    fn select_edge(&mut self, edge: EdgeId, selected: bool) {
        if !self.edges.set_selected(edge, selected) || selected {
            return;
        }
        let [a, b] = self.edges[edge];
        let faces: Vec<Face> = self.faces_at(a).filter(|&f| self.face_has_edge(f, a, b)).collect();
        for f in faces {
            self.faces.set_selected(f, false);
        }
    }

    fn select_face(&mut self, face: Face, selected: bool) {
        self.faces.set_selected(face, selected);
    }

    fn deselect_all(&mut self) {
        self.vertices.clear_selection();
        self.edges.clear_selection();
        self.faces.clear_selection();
    }

    fn select_more(&mut self) {
        let grown: BTreeSet<Vertex> = self
            .vertices
            .selected()
            .flat_map(|v| self.edges_at(v))
            .filter_map(|e| {
                let [a, b] = self.edges[e];
                match (self.vertices.is_selected(a), self.vertices.is_selected(b)) {
                    (true, false) => Some(b),
                    (false, true) => Some(a),
                    _ => None,
                }
            })
            .collect();
        for v in grown {
            self.vertices.set_selected(v, true);
        }
        let selected: BTreeSet<Vertex> = self.vertices.selected().collect();
        self.flush_selection_around(&selected);
    }

    fn extrude_region(&mut self) {
        let selected: BTreeSet<Vertex> = self.vertices.selected().collect();
        if selected.is_empty() {
            return;
        }
        let region: BTreeSet<Face> = selected
            .iter()
            .flat_map(|&v| self.faces_at(v))
            .filter(|&f| self.faces[f].iter().all(|v| self.vertices.is_selected(v)))
            .collect();

        // winding of every region edge, and how many region faces use it
        let mut usage: BTreeMap<(Vertex, Vertex), (usize, (Vertex, Vertex))> = BTreeMap::new();
        for &f in &region {
            for (a, b) in self.face_edges(f) {
                usage.entry(edge_key(a, b)).or_insert((0, (a, b))).0 += 1;
            }
        }
        let region_edges: BTreeSet<EdgeId> = selected
            .iter()
            .flat_map(|&v| self.edges_at(v))
            .filter(|&e| self.edges[e].iter().all(|v| self.vertices.is_selected(v)))
            .collect();

        let touched: BTreeSet<Vertex> = region_edges
            .iter()
            .flat_map(|&e| self.edges[e])
            .chain(region.iter().flat_map(|&f| self.faces[f].iter().copied()))
            .collect();
        let loose: BTreeSet<Vertex> = selected.difference(&touched).copied().collect();

        let twins: BTreeMap<Vertex, Vertex> = selected
            .iter()
            .map(|&v| (v, self.vertices.push(self.vertices[v])))
            .collect();

        let mut cap_edges = Vec::new();
        let mut stitched = BTreeSet::new();
        for edge in region_edges {
            let [a, b] = self.edges[edge];
            match usage.get(&edge_key(a, b)) {
                Some(&(count, _)) if count >= 2 => {
                    self.remap_edge(edge, twins[&a], twins[&b]);
                    cap_edges.push(edge);
                }
                found => {
                    let (a, b) = found.map_or((a, b), |&(_, winding)| winding);
                    self.add_face(vec![a, b, twins[&b], twins[&a]]);
                    cap_edges.push(self.add_edge(twins[&a], twins[&b]));
                    stitched.insert(a);
                    stitched.insert(b);
                }
            }
        }
        for &f in &region {
            self.repoint_face(f, &twins);
        }
        for &v in &selected {
            if loose.contains(&v) {
                self.add_edge(v, twins[&v]);
            } else if !stitched.contains(&v) && !self.is_referenced(v) {
                // interior of the region, the twin replaces it
                self.remove_vertex(v);
            }
        }

        self.deselect_all();
        for &twin in twins.values() {
            self.vertices.set_selected(twin, true);
        }
        for edge in cap_edges {
            self.edges.set_selected(edge, true);
        }
        for f in region {
            self.faces.set_selected(f, true);
        }
    }

    fn translate_selection(&mut self, offset: &Vector3<f64>) {
        let local = self.world_inverse.transform_vector(offset);
        let selected: Vec<Vertex> = self.vertices.selected().collect();
        for v in selected {
            if let Some(p) = self.vertices.get_mut(v) {
                *p += local;
            }
        }
    }

    fn rotate_selection(&mut self, axis: &Unit<Vector3<f64>>, angle: f64, center: &Point3<f64>) {
        let rotation = UnitQuaternion::from_axis_angle(axis, angle);
        let selected: Vec<Vertex> = self.vertices.selected().collect();
        for v in selected {
            let world = self.world.transform_point(&self.vertices[v]);
            let turned = center + rotation * (world - center);
            if let Some(p) = self.vertices.get_mut(v) {
                *p = self.world_inverse.transform_point(&turned);
            }
        }
    }

    fn update(&mut self) {
        if log::log_enabled!(log::Level::Debug) && !self.validate() {
            log::debug!("revision {} holds degenerate elements", self.revision);
        }
        self.revision += 1;
    }
}

impl Face {
    pub fn corner_count(&self, mesh: &EditMesh) -> usize {
        mesh.faces.get(*self).map_or(0, |corners| corners.len())
    }

    pub fn corners(&self, mesh: &EditMesh) -> FaceCornersIter {
        FaceCornersIter {
            face: *self,
            index: 0,
            count: self.corner_count(mesh),
        }
    }

    pub fn compute_normal(&self, mesh: &EditMesh) -> Vector3<f64> {
        // Newell's method, so concave and slightly warped polygons still work
        let mut n = Vector3::zeros();
        for corner in self.corners(mesh) {
            let a = corner.to_point(mesh);
            let b = corner.next(mesh).to_point(mesh);
            n.x += (a.y - b.y) * (a.z + b.z);
            n.y += (a.z - b.z) * (a.x + b.x);
            n.z += (a.x - b.x) * (a.y + b.y);
        }
        if n.norm_squared() == 0. {
            return n;
        }
        n.normalize_mut();
        n
    }

    pub fn is_valid(&self, mesh: &EditMesh) -> bool {
        if self.is_degenerate(mesh) {
            return false;
        }
        mesh.faces[*self].iter().all(|v| mesh.vertices.contains(v))
    }

    pub fn is_degenerate(&self, mesh: &EditMesh) -> bool {
        let corners = &mesh.faces[*self];
        if corners.len() < 3 {
            return true;
        }
        for a in 0..(corners.len()-1) {
            for b in (a+1)..corners.len() {
                if corners[a] == corners[b] {
                    return true;
                }
            }
        }
        false
    }
}

impl Corner {
    fn to_vertex(self, mesh: &EditMesh) -> Vertex {
        mesh.faces[self.face][self.index]
    }

    fn next(&self, mesh: &EditMesh) -> Corner {
        let index = (self.index + 1) % self.face.corner_count(mesh);
        Self {
            face: self.face,
            index,
        }
    }

    fn to_point(self, mesh: &EditMesh) -> Point3<f64> {
        mesh.vertices[self.to_vertex(mesh)]
    }
}

impl From<obj::Obj> for EditMesh {
    fn from(obj: obj::Obj) -> Self {
        let positions = obj
            .data
            .position
            .iter()
            .map(|&[x, y, z]| Point3::new(x as f64, y as f64, z as f64))
            .collect();
        let polygons = obj
            .data
            .objects
            .iter()
            .flat_map(|o| o.groups.iter())
            .flat_map(|g| g.polys.iter())
            .map(|poly| poly.0.iter().map(|tuple| tuple.0).collect())
            .collect();
        EditMesh::from_polygons(positions, polygons)
    }
}

/// Faces only; wire edges and loose vertices have no OBJ face to land in.
impl From<&EditMesh> for obj::Obj {
    fn from(mesh: &EditMesh) -> Self {
        let mut slots = BTreeMap::new();
        let mut position = Vec::with_capacity(mesh.vertex_count());
        for (v, p) in mesh.vertices() {
            slots.insert(v, position.len());
            position.push([p.x as f32, p.y as f32, p.z as f32]);
        }
        let mut group = obj::Group::new("extruded".to_string());
        for (_, corners) in mesh.faces() {
            let tuples = corners
                .iter()
                .map(|v| obj::IndexTuple(slots[v], None, None))
                .collect();
            group.polys.push(obj::SimplePolygon(tuples));
        }
        let mut object = obj::Object::new("mesh".to_string());
        object.groups.push(group);
        obj::Obj {
            data: obj::ObjData {
                position,
                objects: vec![object],
                ..Default::default()
            },
            path: std::path::PathBuf::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> EditMesh {
        EditMesh::from_polygons(
            vec![
                Point3::new(0., 0., 0.),
                Point3::new(1., 0., 0.),
                Point3::new(1., 1., 0.),
                Point3::new(0., 1., 0.),
            ],
            vec![vec![0, 1, 2, 3]],
        )
    }

    fn select_all(mesh: &mut EditMesh) {
        let everything = SelectionSnapshot {
            vertices: mesh.vertices.ids().collect(),
            edges: mesh.edges.ids().collect(),
            faces: mesh.faces.ids().collect(),
            mode: SelectMode::Face,
        };
        mesh.select(&everything);
    }

    #[test]
    fn polygons_become_faces_and_edges() {
        let mesh = EditMesh::from_polygons(
            vec![Point3::origin(), Point3::new(1., 0., 0.), Point3::new(0., 1., 0.)],
            vec![vec![0, 1, 2], vec![1, 2], vec![0, 7, 1]],
        );
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.edge_count(), 3);
        assert!(mesh.find_edge(Vertex(2), Vertex(1)).is_some());
        assert!(mesh.validate());
    }

    #[test]
    fn quad_normal_follows_winding() {
        let mesh = unit_quad();
        let face = mesh.faces().map(|(f, _)| f).next().unwrap();
        assert_eq!(face.corners(&mesh).count(), 4);
        assert!((face.compute_normal(&mesh) - Vector3::z()).norm() < 1.0e-12);
    }

    #[test]
    fn extruding_a_face_builds_outward_walls() {
        let mut mesh = unit_quad();
        select_all(&mut mesh);
        mesh.extrude_region();
        mesh.translate_selection(&Vector3::z());

        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 5);
        assert_eq!(mesh.edge_count(), 12);
        assert!(mesh.validate());

        let cap = mesh.selection().faces.into_iter().next().unwrap();
        assert!((cap.compute_normal(&mesh) - Vector3::z()).norm() < 1.0e-12);
        for (face, corners) in mesh.faces() {
            if face == cap {
                continue;
            }
            let normal = face.compute_normal(&mesh);
            let middle = corners.iter().fold(Vector3::zeros(), |acc, &v| acc + mesh.vertices[v].coords) / 4.0;
            let outward = (middle - Vector3::new(0.5, 0.5, 0.5)).normalize();
            assert!((normal - outward).norm() < 1.0e-12);
        }
        assert!(mesh.selected_vertices().iter().all(|&v| mesh.vertices[v].z == 1.0));
    }

    #[test]
    fn a_lone_vertex_extrudes_into_an_edge() {
        let mut mesh = EditMesh::new();
        let v = mesh.add_vertex(Point3::origin());
        mesh.select_vertex(v, true);
        mesh.extrude_region();

        assert_eq!(mesh.vertex_count(), 2);
        assert_eq!(mesh.edge_count(), 1);
        assert!(!mesh.is_vertex_selected(v));
        let twin = mesh.selected_vertices()[0];
        assert!(mesh.find_edge(v, twin).is_some());
    }

    #[test]
    fn ring_extrusion_keeps_the_old_ring() {
        let mut mesh = EditMesh::ring(4, 1.0);
        mesh.extrude_region();
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 4);
        assert_eq!(mesh.selection().edges.len(), 4);
        assert!(mesh.selection().faces.is_empty());
    }

    #[test]
    fn deselecting_a_vertex_drops_its_edges_and_faces() {
        let mut mesh = unit_quad();
        select_all(&mut mesh);
        mesh.select_vertex(Vertex(0), false);
        let selection = mesh.selection();
        assert_eq!(selection.vertices.len(), 3);
        assert_eq!(selection.edges.len(), 2);
        assert!(selection.faces.is_empty());
    }

    #[test]
    fn select_more_grows_along_edges() {
        let mut mesh = EditMesh::ring(6, 1.0);
        mesh.deselect_all();
        mesh.select_vertex(Vertex(0), true);
        mesh.select_more();
        let selected = mesh.selected_vertices();
        assert_eq!(selected, vec![Vertex(0), Vertex(1), Vertex(5)]);
        assert_eq!(mesh.selection().edges.len(), 2);
    }

    #[test]
    fn world_space_edits_respect_the_transform() {
        let world = Matrix4::new_translation(&Vector3::new(10., 0., 0.)) * Matrix4::new_scaling(2.0);
        let mut mesh = EditMesh::ring(4, 1.0).with_world(world).unwrap();
        mesh.translate_selection(&Vector3::new(0., 0., 4.));
        assert!((mesh.position(Vertex(0)).unwrap() - Point3::new(1., 0., 2.)).norm() < 1.0e-9);
        assert!((mesh.world_position(Vertex(0)).unwrap() - Point3::new(12., 0., 4.)).norm() < 1.0e-9);

        mesh.rotate_selection(&Vector3::z_axis(), std::f64::consts::PI, &Point3::new(10., 0., 4.));
        let turned = mesh.world_position(Vertex(0)).unwrap();
        assert!((turned - Point3::new(8., 0., 4.)).norm() < 1.0e-9);
    }

    #[test]
    fn singular_world_is_refused() {
        assert!(EditMesh::ring(3, 1.0).with_world(Matrix4::zeros()).is_none());
    }

    #[test]
    fn obj_conversion_keeps_faces() {
        let mut mesh = unit_quad();
        select_all(&mut mesh);
        mesh.extrude_region();
        let obj: obj::Obj = (&mesh).into();
        assert_eq!(obj.data.position.len(), 8);
        let back = EditMesh::from(obj);
        assert_eq!(back.vertex_count(), 8);
        assert_eq!(back.face_count(), 5);
        assert_eq!(back.edge_count(), 12);
    }

    fn grid() -> EditMesh {
        // 2x2 quads around a shared middle vertex
        let positions = (0..9).map(|i| Point3::new((i % 3) as f64, (i / 3) as f64, 0.)).collect();
        EditMesh::from_polygons(
            positions,
            vec![vec![0, 1, 4, 3], vec![1, 2, 5, 4], vec![3, 4, 7, 6], vec![4, 5, 8, 7]],
        )
    }

    #[test]
    fn polygons_repeating_a_corner_are_dropped() {
        let mesh = EditMesh::from_polygons(
            vec![Point3::origin(), Point3::new(1., 0., 0.), Point3::new(0., 1., 0.)],
            vec![vec![0, 1, 2], vec![1, 2, 2], vec![0, 0]],
        );
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.edge_count(), 3);
        assert!(mesh.validate());
    }

    #[test]
    fn update_tolerates_degenerate_faces() {
        let mut mesh = unit_quad();
        mesh.add_face(vec![Vertex(0), Vertex(1), Vertex(1)]);
        assert!(!mesh.validate());
        mesh.update();
        mesh.update();
        assert_eq!(mesh.revision(), 2);
    }

    #[test]
    fn interior_vertices_are_replaced_by_their_twins() {
        let mut mesh = grid();
        select_all(&mut mesh);
        mesh.extrude_region();

        assert_eq!(mesh.vertex_count(), 17);
        assert!(mesh.position(Vertex(4)).is_none());
        assert_eq!(mesh.face_count(), 12);
        assert_eq!(mesh.edge_count(), 28);
        assert!(mesh.validate());
        assert_eq!(mesh.selection().faces.len(), 4);
    }

    #[test]
    fn deselecting_a_shared_edge_drops_both_faces() {
        let mut mesh = grid();
        select_all(&mut mesh);
        let shared = mesh.find_edge(Vertex(1), Vertex(4)).unwrap();
        mesh.select_edge(shared, false);
        let faces = mesh.selection().faces;
        assert_eq!(faces.len(), 2);
        assert!(faces.iter().all(|f| !mesh.faces[*f].contains(&Vertex(1)) || !mesh.faces[*f].contains(&Vertex(4))));
    }

    #[test]
    fn repeated_extrusion_keeps_adjacency_in_step() {
        let mut mesh = EditMesh::ring(8, 1.0);
        for _ in 0..5 {
            mesh.extrude_region();
            mesh.translate_selection(&Vector3::z());
            let selection = mesh.selection();
            mesh.select_more();
            mesh.deselect(&selection);
            assert_eq!(mesh.selected_vertices().len(), 8);
            selection.restore(&mut mesh);
        }
        assert_eq!(mesh.vertex_count(), 48);
        assert_eq!(mesh.face_count(), 40);
        assert!(mesh.validate());
    }
}

