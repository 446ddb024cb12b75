//! Per-frame input structures
//!
//! This module defines the data the application hands to the pipeline once
//! per frame: the borrowed geometry buffers, the constant transform/light
//! block shared read-only by every stage, and the [`FrameInput`] wrapper the
//! single `render_frame` entry point consumes.

use crate::foundation::math::{Mat4, Vec3};
use crate::render::{RasterError, RasterResult};

/// Borrowed per-frame geometry arrays
///
/// Positions, colors, and normals are parallel arrays addressed by a shared
/// vertex index; `indices` groups them into triangles, three entries per
/// triangle. The pipeline borrows these for the duration of one frame and
/// never mutates them.
#[derive(Debug, Clone, Copy)]
pub struct GeometryBuffers<'a> {
    /// Model-space vertex positions
    pub positions: &'a [[f32; 3]],
    /// Per-vertex colors (0.0-1.0 range per channel)
    pub colors: &'a [[f32; 3]],
    /// Model-space vertex normals
    pub normals: &'a [[f32; 3]],
    /// Triangle index triples into the three attribute arrays
    pub indices: &'a [u32],
}

impl<'a> GeometryBuffers<'a> {
    /// Number of vertices shared by the attribute arrays
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of whole triangles described by the index array
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Validate buffer shape and index ranges
    ///
    /// Rejects mismatched attribute array lengths, an index count that does
    /// not form whole triangles, and any index addressing a vertex that does
    /// not exist. Runs before any stage touches the buffers, so a bad frame
    /// fails fast without partial output.
    pub fn validate(&self) -> RasterResult<()> {
        let vertex_count = self.positions.len();
        if self.colors.len() != vertex_count || self.normals.len() != vertex_count {
            return Err(RasterError::MismatchedBuffers(format!(
                "{} positions, {} colors, {} normals",
                vertex_count,
                self.colors.len(),
                self.normals.len()
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(RasterError::PartialTriangle(self.indices.len()));
        }
        for &index in self.indices {
            if index as usize >= vertex_count {
                return Err(RasterError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
        }
        Ok(())
    }
}

/// Constant transform and lighting block for one frame
///
/// Shared read-only by every parallel unit of work in the frame. The
/// inverse-transpose of the model matrix transforms normals correctly under
/// non-uniform scale; the model matrix itself must never be used for that.
#[derive(Debug, Clone)]
pub struct FrameConstants {
    /// Model-to-world transform
    pub model: Mat4,
    /// World-to-view transform
    pub view: Mat4,
    /// View-to-clip projection
    pub projection: Mat4,
    /// Inverse-transpose of the model matrix, for normal transformation
    pub model_inverse_transpose: Mat4,
    /// Light position in world space
    pub light_position: Vec3,
}

impl FrameConstants {
    /// Build a constant block, deriving the normal matrix from `model`
    ///
    /// If the model matrix is singular (for example a zero scale axis) the
    /// inverse does not exist; the model matrix itself is used instead and a
    /// warning is logged, matching the graceful no-error contract of the
    /// vertex stage.
    pub fn new(model: Mat4, view: Mat4, projection: Mat4, light_position: Vec3) -> Self {
        let model_inverse_transpose = model.try_inverse().map_or_else(
            || {
                log::warn!("Model matrix is singular; normals will use the model matrix");
                model
            },
            |inverse| inverse.transpose(),
        );
        Self {
            model,
            view,
            projection,
            model_inverse_transpose,
            light_position,
        }
    }

    /// Combined model-view-projection matrix
    pub fn model_view_projection(&self) -> Mat4 {
        self.projection * self.view * self.model
    }
}

/// Complete per-frame pipeline input
///
/// The application provides this once per frame; the rasterizer handles the
/// full frame lifecycle internally.
#[derive(Debug)]
pub struct FrameInput<'a> {
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Frame time in seconds, advisory for animation-aware shading
    pub time: f32,
    /// Geometry buffers for this frame
    pub geometry: GeometryBuffers<'a>,
    /// Constant transform/light block for this frame
    pub constants: &'a FrameConstants,
}
