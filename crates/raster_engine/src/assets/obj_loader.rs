//! OBJ file loader for 3D models

use crate::foundation::math::Vec3;
use crate::render::{Mesh, Vertex};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use thiserror::Error;

/// Color assigned to OBJ vertices, which carry no color of their own
const DEFAULT_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

/// Errors produced while loading an OBJ file
#[derive(Error, Debug)]
pub enum ObjError {
    /// IO failure reading the file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// A numeric field failed to parse
    #[error("Parse error: {0}")]
    ParseError(String),
    /// The file structure cannot produce a mesh
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Loader for Wavefront OBJ meshes
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file and return a mesh
    ///
    /// Supports `v`, `vn`, and `f` records with the `v`, `v//vn`, and
    /// `v/vt/vn` face forms; texture coordinates are skipped. Faces with
    /// more than three corners are fan-triangulated. When the file carries
    /// no normals at all, flat per-face normals are generated from each
    /// face's winding so the mesh still lights correctly.
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, ObjError> {
        let file = File::open(path)?;
        Self::read_obj(BufReader::new(file))
    }

    /// Parse OBJ records from any buffered reader
    pub fn read_obj<R: BufRead>(reader: R) -> Result<Mesh, ObjError> {
        let mut positions: Vec<[f32; 3]> = Vec::new();
        let mut normals: Vec<[f32; 3]> = Vec::new();
        let mut vertices: Vec<Vertex> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();
        let mut saw_normal = false;

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let parts: Vec<&str> = line.split_whitespace().collect();
            match parts[0] {
                "v" => positions.push(parse_triple(&parts, "vertex")?),
                "vn" => normals.push(parse_triple(&parts, "normal")?),
                "f" => {
                    if parts.len() < 4 {
                        return Err(ObjError::InvalidFormat(format!(
                            "Face with only {} corners",
                            parts.len() - 1
                        )));
                    }

                    let mut face_indices = Vec::new();
                    for corner in &parts[1..] {
                        let (position, normal) = parse_corner(corner, &positions, &normals)?;
                        if normal.is_some() {
                            saw_normal = true;
                        }
                        vertices.push(Vertex {
                            position,
                            color: DEFAULT_COLOR,
                            normal: normal.unwrap_or([0.0, 1.0, 0.0]),
                        });
                        face_indices.push((vertices.len() - 1) as u32);
                    }

                    // Triangulate face (simple fan triangulation)
                    for i in 1..(face_indices.len() - 1) {
                        indices.push(face_indices[0]);
                        indices.push(face_indices[i]);
                        indices.push(face_indices[i + 1]);
                    }
                }
                _ => {
                    // Ignore other record types
                }
            }
        }

        if vertices.is_empty() {
            return Err(ObjError::InvalidFormat(
                "No faces found in OBJ data".to_string(),
            ));
        }
        if !saw_normal {
            generate_face_normals(&mut vertices, &indices);
        }

        Ok(Mesh::new(vertices, indices))
    }
}

/// Parse the three numeric fields of a `v` or `vn` record
fn parse_triple(parts: &[&str], what: &str) -> Result<[f32; 3], ObjError> {
    if parts.len() < 4 {
        return Err(ObjError::ParseError(format!("Truncated {what} record")));
    }
    let mut triple = [0.0f32; 3];
    for (slot, text) in triple.iter_mut().zip(&parts[1..4]) {
        *slot = text
            .parse()
            .map_err(|_| ObjError::ParseError(format!("Invalid {what} component '{text}'")))?;
    }
    Ok(triple)
}

/// Resolve one face corner into its position and optional normal
///
/// OBJ indices are 1-based; both the `v//vn` and `v/vt/vn` forms put the
/// normal in the third field.
fn parse_corner(
    corner: &str,
    positions: &[[f32; 3]],
    normals: &[[f32; 3]],
) -> Result<([f32; 3], Option<[f32; 3]>), ObjError> {
    let fields: Vec<&str> = corner.split('/').collect();

    let position_index: usize = fields[0]
        .parse()
        .map_err(|_| ObjError::ParseError(format!("Invalid position index in '{corner}'")))?;
    let position = *position_index
        .checked_sub(1)
        .and_then(|index| positions.get(index))
        .ok_or_else(|| {
            ObjError::InvalidFormat(format!("Position index {position_index} out of bounds"))
        })?;

    let normal = match fields.get(2) {
        Some(field) if !field.is_empty() => {
            let normal_index: usize = field
                .parse()
                .map_err(|_| ObjError::ParseError(format!("Invalid normal index in '{corner}'")))?;
            let normal = *normal_index
                .checked_sub(1)
                .and_then(|index| normals.get(index))
                .ok_or_else(|| {
                    ObjError::InvalidFormat(format!("Normal index {normal_index} out of bounds"))
                })?;
            Some(normal)
        }
        _ => None,
    };

    Ok((position, normal))
}

/// Give every face a flat normal computed from its winding
fn generate_face_normals(vertices: &mut [Vertex], indices: &[u32]) {
    for triangle in indices.chunks_exact(3) {
        let (i0, i1, i2) = (
            triangle[0] as usize,
            triangle[1] as usize,
            triangle[2] as usize,
        );
        let a = Vec3::from(vertices[i0].position);
        let b = Vec3::from(vertices[i1].position);
        let c = Vec3::from(vertices[i2].position);
        let normal = (b - a)
            .cross(&(c - a))
            .try_normalize(1e-12)
            .map_or([0.0, 1.0, 0.0], |unit| [unit.x, unit.y, unit.z]);

        for index in [i0, i1, i2] {
            vertices[index].normal = normal;
        }
    }
}
