//! Mesh representation for 3D models
//!
//! Provides the geometry containers applications build their scenes from.
//! A [`Mesh`] stores its attributes as separate position/color/normal arrays
//! addressed by a shared index, matching the buffer layout the pipeline
//! consumes, so handing a mesh to the rasterizer is a zero-copy borrow.

use crate::render::frame::GeometryBuffers;

/// 3D vertex data for mesh construction
///
/// A convenience record grouping one vertex's attributes. Meshes split these
/// into separate attribute arrays on construction; the pipeline itself never
/// sees interleaved vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],

    /// Per-vertex color (0.0-1.0 range per channel)
    pub color: [f32; 3],

    /// Normal vector in model space
    pub normal: [f32; 3],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], color: [f32; 3], normal: [f32; 3]) -> Self {
        Self {
            position,
            color,
            normal,
        }
    }
}

/// Triangle mesh with separated attribute arrays
///
/// `positions`, `colors`, and `normals` are parallel arrays; `indices` holds
/// triangle index triples into them.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Model-space vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex colors
    pub colors: Vec<[f32; 3]>,
    /// Model-space vertex normals
    pub normals: Vec<[f32; 3]>,
    /// Triangle index triples
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Build a mesh from interleaved vertices and triangle indices
    pub fn new(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            positions: Vec::with_capacity(vertices.len()),
            colors: Vec::with_capacity(vertices.len()),
            normals: Vec::with_capacity(vertices.len()),
            indices,
        };
        for vertex in vertices {
            mesh.positions.push(vertex.position);
            mesh.colors.push(vertex.color);
            mesh.normals.push(vertex.normal);
        }
        mesh
    }

    /// Number of vertices in the mesh
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles in the mesh
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Borrow the attribute arrays as per-frame pipeline input
    pub fn buffers(&self) -> GeometryBuffers<'_> {
        GeometryBuffers {
            positions: &self.positions,
            colors: &self.colors,
            normals: &self.normals,
            indices: &self.indices,
        }
    }

    /// Cube centered at the origin spanning -1 to 1 on each axis, one color
    /// per face
    ///
    /// Each face carries its own four vertices so face normals stay exact
    /// under lighting; 24 vertices, 36 indices.
    pub fn cube() -> Self {
        const FACES: [([f32; 3], [[f32; 3]; 4], [f32; 3]); 6] = [
            // Front (+Z)
            (
                [0.0, 0.0, 1.0],
                [
                    [-1.0, -1.0, 1.0],
                    [1.0, -1.0, 1.0],
                    [1.0, 1.0, 1.0],
                    [-1.0, 1.0, 1.0],
                ],
                [0.9, 0.2, 0.2],
            ),
            // Back (-Z)
            (
                [0.0, 0.0, -1.0],
                [
                    [1.0, -1.0, -1.0],
                    [-1.0, -1.0, -1.0],
                    [-1.0, 1.0, -1.0],
                    [1.0, 1.0, -1.0],
                ],
                [0.2, 0.9, 0.2],
            ),
            // Left (-X)
            (
                [-1.0, 0.0, 0.0],
                [
                    [-1.0, -1.0, -1.0],
                    [-1.0, -1.0, 1.0],
                    [-1.0, 1.0, 1.0],
                    [-1.0, 1.0, -1.0],
                ],
                [0.2, 0.2, 0.9],
            ),
            // Right (+X)
            (
                [1.0, 0.0, 0.0],
                [
                    [1.0, -1.0, 1.0],
                    [1.0, -1.0, -1.0],
                    [1.0, 1.0, -1.0],
                    [1.0, 1.0, 1.0],
                ],
                [0.9, 0.9, 0.2],
            ),
            // Top (+Y)
            (
                [0.0, 1.0, 0.0],
                [
                    [-1.0, 1.0, 1.0],
                    [1.0, 1.0, 1.0],
                    [1.0, 1.0, -1.0],
                    [-1.0, 1.0, -1.0],
                ],
                [0.2, 0.9, 0.9],
            ),
            // Bottom (-Y)
            (
                [0.0, -1.0, 0.0],
                [
                    [-1.0, -1.0, -1.0],
                    [1.0, -1.0, -1.0],
                    [1.0, -1.0, 1.0],
                    [-1.0, -1.0, 1.0],
                ],
                [0.9, 0.2, 0.9],
            ),
        ];

        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);
        for (normal, corners, color) in FACES {
            let base = vertices.len() as u32;
            for corner in corners {
                vertices.push(Vertex::new(corner, color, normal));
            }
            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self::new(vertices, indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_has_expected_shape() {
        let cube = Mesh::cube();
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.buffers().validate().is_ok());
    }

    #[test]
    fn test_cube_normals_are_unit_axis_vectors() {
        let cube = Mesh::cube();
        for normal in &cube.normals {
            let length_sq: f32 = normal.iter().map(|c| c * c).sum();
            assert!((length_sq - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_mesh_splits_interleaved_vertices() {
        let vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            Vertex::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
            Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0, 1.0]),
        ];
        let mesh = Mesh::new(vertices, vec![0, 1, 2]);

        assert_eq!(mesh.positions[1], [1.0, 0.0, 0.0]);
        assert_eq!(mesh.colors[2], [0.0, 0.0, 1.0]);
        assert_eq!(mesh.normals[0], [0.0, 0.0, 1.0]);
    }
}
