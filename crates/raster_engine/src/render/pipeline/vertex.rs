//! Vertex transform stage
//!
//! Maps each input vertex from model space through world, view, and clip
//! space to final screen coordinates, and transforms normals with the
//! inverse-transpose of the model matrix so they stay perpendicular under
//! non-uniform scale. Each vertex is independent; workers write only their
//! own output slots.

use crate::foundation::math::{Vec3, Vec4};
use crate::render::frame::{FrameConstants, GeometryBuffers};
use crate::render::pipeline::executor::Executor;

/// Clip-space w at or below which a vertex cannot be projected
const MIN_CLIP_W: f32 = 1e-6;

/// One vertex after transformation
///
/// `screen` holds pixel-space x/y (y grows downward) and depth in [0, 1];
/// `inv_w` is the reciprocal clip-space w used for perspective-correct
/// attribute interpolation downstream.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TransformedVertex {
    /// Screen-space position: x/y in pixels, z = depth in [0, 1]
    pub screen: Vec3,
    /// Reciprocal of clip-space w
    pub inv_w: f32,
    /// World-space position, for lighting
    pub world: Vec3,
    /// World-space unit normal
    pub normal: Vec3,
    /// Carried-through vertex color
    pub color: Vec3,
    /// False when the vertex sits at or behind the eye plane
    pub projectable: bool,
}

impl Default for TransformedVertex {
    fn default() -> Self {
        Self {
            screen: Vec3::zeros(),
            inv_w: 0.0,
            world: Vec3::zeros(),
            normal: Vec3::zeros(),
            color: Vec3::zeros(),
            projectable: false,
        }
    }
}

/// Transform every input vertex into `output`
///
/// `output` must already be sized to the geometry's vertex count. Returns
/// once the whole batch has completed.
pub(crate) fn run(
    executor: &Executor,
    geometry: &GeometryBuffers<'_>,
    constants: &FrameConstants,
    width: u32,
    height: u32,
    output: &mut [TransformedVertex],
) {
    let clip_from_model = constants.model_view_projection();
    let half_width = width as f32 * 0.5;
    let half_height = height as f32 * 0.5;

    let geometry = *geometry;
    executor.run_chunked(output, move |start, chunk| {
        for (offset, slot) in chunk.iter_mut().enumerate() {
            let index = start + offset;
            let position = geometry.positions[index];
            let normal = geometry.normals[index];
            let color = geometry.colors[index];

            let model_position = Vec4::new(position[0], position[1], position[2], 1.0);
            let clip = clip_from_model * model_position;
            let world = (constants.model * model_position).xyz();
            let world_normal = (constants.model_inverse_transpose
                * Vec4::new(normal[0], normal[1], normal[2], 0.0))
            .xyz()
            .try_normalize(1e-12)
            .unwrap_or_else(Vec3::zeros);

            *slot = if clip.w > MIN_CLIP_W {
                let inv_w = 1.0 / clip.w;
                let ndc = clip.xyz() * inv_w;
                TransformedVertex {
                    screen: Vec3::new(
                        (ndc.x + 1.0) * half_width,
                        (1.0 - ndc.y) * half_height,
                        (ndc.z + 1.0) * 0.5,
                    ),
                    inv_w,
                    world,
                    normal: world_normal,
                    color: Vec3::new(color[0], color[1], color[2]),
                    projectable: true,
                }
            } else {
                TransformedVertex {
                    world,
                    normal: world_normal,
                    color: Vec3::new(color[0], color[1], color[2]),
                    ..Default::default()
                }
            };
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Mat4Ext};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    fn identity_constants() -> FrameConstants {
        FrameConstants::new(
            Mat4::identity(),
            Mat4::identity(),
            Mat4::identity(),
            Vec3::new(0.0, 0.0, 5.0),
        )
    }

    fn transform_single(
        position: [f32; 3],
        normal: [f32; 3],
        constants: &FrameConstants,
        width: u32,
        height: u32,
    ) -> TransformedVertex {
        let positions = [position];
        let colors = [[1.0, 1.0, 1.0]];
        let normals = [normal];
        let indices = [0u32, 0, 0];
        let geometry = GeometryBuffers {
            positions: &positions,
            colors: &colors,
            normals: &normals,
            indices: &indices,
        };
        let mut output = [TransformedVertex::default()];
        run(
            &Executor::new(1),
            &geometry,
            constants,
            width,
            height,
            &mut output,
        );
        output[0]
    }

    #[test]
    fn test_ndc_origin_maps_to_image_center() {
        let vertex = transform_single(
            [0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            &identity_constants(),
            64,
            32,
        );
        assert!(vertex.projectable);
        assert_relative_eq!(vertex.screen.x, 32.0, epsilon = EPSILON);
        assert_relative_eq!(vertex.screen.y, 16.0, epsilon = EPSILON);
        assert_relative_eq!(vertex.screen.z, 0.5, epsilon = EPSILON);
        assert_relative_eq!(vertex.inv_w, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_viewport_flips_y() {
        // NDC y = +1 is the top of the image, screen y = 0.
        let vertex = transform_single(
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            &identity_constants(),
            64,
            64,
        );
        assert_relative_eq!(vertex.screen.y, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_vertex_behind_eye_is_not_projectable() {
        let constants = FrameConstants::new(
            Mat4::identity(),
            Mat4::identity(),
            Mat4::perspective(1.0, 1.0, 0.1, 100.0),
            Vec3::zeros(),
        );
        // Positive view-space z sits behind a right-handed camera.
        let vertex = transform_single([0.0, 0.0, 2.0], [0.0, 0.0, 1.0], &constants, 64, 64);
        assert!(!vertex.projectable);
    }

    #[test]
    fn test_normals_use_inverse_transpose() {
        let scale = Mat4::new_nonuniform_scaling(&Vec3::new(2.0, 1.0, 1.0));
        let constants = FrameConstants::new(
            scale,
            Mat4::identity(),
            Mat4::identity(),
            Vec3::zeros(),
        );
        let diagonal = std::f32::consts::FRAC_1_SQRT_2;
        let vertex = transform_single(
            [0.0, 0.0, 0.0],
            [diagonal, diagonal, 0.0],
            &constants,
            8,
            8,
        );

        // The model matrix would stretch the normal toward +X; the
        // inverse-transpose compresses it instead.
        assert!(vertex.normal.y > vertex.normal.x);
        assert_relative_eq!(vertex.normal.norm(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_parallel_and_serial_runs_agree() {
        let positions: Vec<[f32; 3]> = (0..97)
            .map(|i| [i as f32 * 0.01 - 0.5, 0.25, 0.0])
            .collect();
        let colors = vec![[1.0, 0.5, 0.25]; positions.len()];
        let normals = vec![[0.0, 1.0, 0.0]; positions.len()];
        let indices: Vec<u32> = Vec::new();
        let geometry = GeometryBuffers {
            positions: &positions,
            colors: &colors,
            normals: &normals,
            indices: &indices,
        };
        let constants = identity_constants();

        let mut serial = vec![TransformedVertex::default(); positions.len()];
        run(&Executor::new(1), &geometry, &constants, 100, 100, &mut serial);

        let mut parallel = vec![TransformedVertex::default(); positions.len()];
        run(&Executor::new(4), &geometry, &constants, 100, 100, &mut parallel);

        for (a, b) in serial.iter().zip(&parallel) {
            assert_relative_eq!(a.screen.x, b.screen.x, epsilon = EPSILON);
            assert_relative_eq!(a.screen.y, b.screen.y, epsilon = EPSILON);
        }
    }
}
