//! Polygon mesh geometry held by host mesh objects.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// A polygon as a loop of vertex indices, counter-clockwise around its normal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub indices: Vec<u32>,
}

impl Polygon {
    pub fn new(indices: Vec<u32>) -> Self {
        Self { indices }
    }
}

/// A polygon mesh in object-local coordinates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    /// Vertex positions.
    pub vertices: Vec<Vec3>,
    /// Polygon index loops.
    pub polygons: Vec<Polygon>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, position: Vec3) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        index
    }

    /// Add a polygon by vertex indices.
    pub fn add_polygon(&mut self, indices: Vec<u32>) {
        self.polygons.push(Polygon::new(indices));
    }

    /// Add a quad by vertex indices, in order around the quad.
    pub fn add_quad(&mut self, i0: u32, i1: u32, i2: u32, i3: u32) {
        self.add_polygon(vec![i0, i1, i2, i3]);
    }

    /// Add a square face centered at `center`, facing along the axis-aligned `normal`.
    pub fn add_rect(&mut self, center: Vec3, normal: Vec3, half_size: f32) {
        let normal = normal.normalize_or_zero();
        let u = normal.any_orthonormal_vector();
        let v = normal.cross(u);

        // u x v == normal, so this order winds counter-clockwise around it
        let i0 = self.add_vertex(center + (-u - v) * half_size);
        let i1 = self.add_vertex(center + (u - v) * half_size);
        let i2 = self.add_vertex(center + (u + v) * half_size);
        let i3 = self.add_vertex(center + (-u + v) * half_size);
        self.add_quad(i0, i1, i2, i3);
    }

    /// Add a unit block cube centered at `center` with outward-facing quads.
    pub fn add_cube(&mut self, center: Vec3) {
        for normal in [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
            self.add_rect(center + normal * 0.5, normal, 0.5);
        }
    }

    /// Get the number of polygons.
    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Check if the mesh is empty.
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Unit normal of a polygon (Newell's method). Zero for degenerate polygons.
    pub fn polygon_normal(&self, polygon: &Polygon) -> Vec3 {
        let mut normal = Vec3::ZERO;
        let count = polygon.indices.len();
        for i in 0..count {
            let current = self.vertex(polygon.indices[i]);
            let next = self.vertex(polygon.indices[(i + 1) % count]);
            normal.x += (current.y - next.y) * (current.z + next.z);
            normal.y += (current.z - next.z) * (current.x + next.x);
            normal.z += (current.x - next.x) * (current.y + next.y);
        }
        normal.normalize_or_zero()
    }

    /// Mean of a polygon's vertex positions.
    pub fn polygon_center(&self, polygon: &Polygon) -> Vec3 {
        if polygon.indices.is_empty() {
            return Vec3::ZERO;
        }
        let sum: Vec3 = polygon.indices.iter().map(|&i| self.vertex(i)).sum();
        sum / polygon.indices.len() as f32
    }

    fn vertex(&self, index: u32) -> Vec3 {
        self.vertices.get(index as usize).copied().unwrap_or(Vec3::ZERO)
    }

    /// Merge another mesh into this one.
    pub fn merge(&mut self, other: &Mesh) {
        let offset = self.vertices.len() as u32;

        self.vertices.extend_from_slice(&other.vertices);

        for polygon in &other.polygons {
            self.polygons.push(Polygon::new(
                polygon.indices.iter().map(|index| index + offset).collect(),
            ));
        }
    }

    /// Apply an affine transform to all vertices.
    pub fn transform(&mut self, matrix: &Mat4) {
        for vertex in &mut self.vertices {
            *vertex = matrix.transform_point3(*vertex);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vec3, b: Vec3) {
        assert!(a.abs_diff_eq(b, 1e-5), "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let mut mesh = Mesh::new();
        mesh.add_cube(Vec3::new(2.0, 0.0, -1.0));

        assert_eq!(mesh.polygon_count(), 6);
        assert_eq!(mesh.vertex_count(), 24);

        for polygon in &mesh.polygons {
            let normal = mesh.polygon_normal(polygon);
            let center = mesh.polygon_center(polygon);
            assert_close(center, Vec3::new(2.0, 0.0, -1.0) + normal * 0.5);
            assert!((normal.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_rect_winding_matches_normal() {
        let mut mesh = Mesh::new();
        mesh.add_rect(Vec3::new(0.5, 0.0, 0.0), Vec3::X, 0.25);
        let polygon = &mesh.polygons[0];
        assert_close(mesh.polygon_normal(polygon), Vec3::X);
        assert_close(mesh.polygon_center(polygon), Vec3::new(0.5, 0.0, 0.0));
    }

    #[test]
    fn test_degenerate_polygon_has_zero_normal() {
        let mut mesh = Mesh::new();
        let a = mesh.add_vertex(Vec3::ZERO);
        let b = mesh.add_vertex(Vec3::X);
        mesh.add_polygon(vec![a, b, a]);
        assert_eq!(mesh.polygon_normal(&mesh.polygons[0]), Vec3::ZERO);
    }

    #[test]
    fn test_mesh_merge() {
        let mut mesh1 = Mesh::new();
        mesh1.add_rect(Vec3::ZERO, Vec3::Z, 0.5);

        let mut mesh2 = Mesh::new();
        mesh2.add_rect(Vec3::new(3.0, 0.0, 0.0), Vec3::Z, 0.5);

        mesh1.merge(&mesh2);

        assert_eq!(mesh1.vertex_count(), 8);
        assert_eq!(mesh1.polygon_count(), 2);
        // Second polygon indices should be offset by 4
        assert_eq!(mesh1.polygons[1].indices, vec![4, 5, 6, 7]);
        assert_close(mesh1.polygon_center(&mesh1.polygons[1]), Vec3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn test_transform() {
        let mut mesh = Mesh::new();
        mesh.add_cube(Vec3::ZERO);
        mesh.transform(&Mat4::from_translation(Vec3::new(0.0, 0.0, 5.0)));
        let center = mesh.polygon_center(&mesh.polygons[4]);
        assert_close(center, Vec3::new(0.0, 0.0, 5.5));
    }
}
