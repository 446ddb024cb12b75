//! Fragment shading stage
//!
//! Reads the resolved depth buffer and writes the final color for every
//! pixel exactly once. Pixels still holding the far sentinel receive the
//! configured background color; covered pixels rematerialize their winning
//! triangle's attributes at the pixel center with perspective-correct
//! interpolation and run the diffuse lighting model. Workers own disjoint
//! pixel ranges, so there is no shared mutable state.

use crate::foundation::math::Vec3;
use crate::render::config::RasterizerConfig;
use crate::render::frame::FrameConstants;
use crate::render::lighting;
use crate::render::pipeline::assembly::TriangleRecord;
use crate::render::pipeline::depth::DepthBuffer;
use crate::render::pipeline::executor::Executor;
use crate::render::pipeline::framebuffer::{OutputImage, Rgba8};
use crate::render::pipeline::raster;
use crate::render::pipeline::vertex::TransformedVertex;

/// Shade every pixel of the frame into `image`
pub(crate) fn run(
    executor: &Executor,
    vertices: &[TransformedVertex],
    triangles: &[TriangleRecord],
    depth_buffer: &DepthBuffer,
    constants: &FrameConstants,
    config: &RasterizerConfig,
    image: &mut OutputImage,
) {
    let width = image.width() as usize;
    let background = Rgba8::from_unit(config.clear_color);
    let ambient = config.ambient;
    let light_position = constants.light_position;
    let pixels = image.pixels_mut();

    executor.run_chunked(pixels, |start, chunk| {
        for (offset, pixel) in chunk.iter_mut().enumerate() {
            let index = start + offset;
            *pixel = match depth_buffer.resolved(index) {
                None => background,
                Some((_, triangle)) => {
                    let px = (index % width) as f32 + 0.5;
                    let py = (index / width) as f32 + 0.5;
                    shade_fragment(
                        vertices,
                        &triangles[triangle as usize],
                        px,
                        py,
                        light_position,
                        ambient,
                    )
                }
            };
        }
    });
}

/// Interpolate the winning triangle's attributes at a pixel center and light
/// them
///
/// Attributes are premultiplied by each vertex's reciprocal clip w and the
/// weighted sum divided by the interpolated reciprocal, which undoes the
/// perspective distortion plain screen-space weights would introduce.
fn shade_fragment(
    vertices: &[TransformedVertex],
    record: &TriangleRecord,
    px: f32,
    py: f32,
    light_position: Vec3,
    ambient: f32,
) -> Rgba8 {
    let v0 = &vertices[record.vertices[0] as usize];
    let v1 = &vertices[record.vertices[1] as usize];
    let v2 = &vertices[record.vertices[2] as usize];

    let (w0, w1, w2) = raster::barycentrics(v0, v1, v2, record.area, px, py);
    let q0 = w0 * v0.inv_w;
    let q1 = w1 * v1.inv_w;
    let q2 = w2 * v2.inv_w;
    let inv_w = q0 + q1 + q2;
    let c0 = q0 / inv_w;
    let c1 = q1 / inv_w;
    let c2 = q2 / inv_w;

    let color = v0.color * c0 + v1.color * c1 + v2.color * c2;
    let normal = v0.normal * c0 + v1.normal * c1 + v2.normal * c2;
    let world = v0.world * c0 + v1.world * c1 + v2.world * c2;

    Rgba8::from_unit_rgb(lighting::shade(color, normal, world, light_position, ambient))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4;
    use crate::render::config::CullMode;
    use crate::render::pipeline::assembly;

    fn screen_vertex(x: f32, y: f32, depth: f32, color: [f32; 3]) -> TransformedVertex {
        TransformedVertex {
            screen: Vec3::new(x, y, depth),
            inv_w: 1.0,
            world: Vec3::zeros(),
            normal: Vec3::new(0.0, 0.0, 1.0),
            color: Vec3::new(color[0], color[1], color[2]),
            projectable: true,
        }
    }

    fn head_on_constants() -> FrameConstants {
        FrameConstants::new(
            Mat4::identity(),
            Mat4::identity(),
            Mat4::identity(),
            Vec3::new(0.0, 0.0, 10.0),
        )
    }

    #[test]
    fn test_uncovered_pixels_take_background_color() {
        let executor = Executor::new(1);
        let depth_buffer = DepthBuffer::try_new(4, 4).unwrap();
        let mut image = OutputImage::try_new(4, 4).unwrap();
        let config = RasterizerConfig::new().with_clear_color([1.0, 0.0, 0.0, 1.0]);

        run(
            &executor,
            &[],
            &[],
            &depth_buffer,
            &head_on_constants(),
            &config,
            &mut image,
        );

        for pixel in image.pixels() {
            assert_eq!(*pixel, Rgba8::new(255, 0, 0, 255));
        }
    }

    #[test]
    fn test_covered_pixels_are_lit_and_written_once() {
        let executor = Executor::new(1);
        let vertices = [
            screen_vertex(0.5, 0.5, 0.5, [1.0, 1.0, 1.0]),
            screen_vertex(6.5, 0.5, 0.5, [1.0, 1.0, 1.0]),
            screen_vertex(0.5, 6.5, 0.5, [1.0, 1.0, 1.0]),
        ];
        let indices = [0u32, 1, 2];
        let mut records = vec![TriangleRecord::default(); 1];
        assembly::run(
            &executor,
            &vertices,
            &indices,
            8,
            8,
            CullMode::None,
            &mut records,
        );
        let depth_buffer = DepthBuffer::try_new(8, 8).unwrap();
        raster::run(&executor, &vertices, &records, &depth_buffer);

        let mut image = OutputImage::try_new(8, 8).unwrap();
        let config = RasterizerConfig::new().with_clear_color([0.0, 0.0, 0.0, 1.0]);
        run(
            &executor,
            &vertices,
            &records,
            &depth_buffer,
            &head_on_constants(),
            &config,
            &mut image,
        );

        // A white triangle lit head-on saturates to white inside.
        assert_eq!(image.pixel(1, 1), Rgba8::new(255, 255, 255, 255));
        // Pixels the triangle never covered keep the background.
        assert_eq!(image.pixel(7, 7), Rgba8::new(0, 0, 0, 255));
    }

    #[test]
    fn test_interpolation_is_perspective_correct() {
        // v1 sits three times closer in clip w than v0; at the top edge's
        // midpoint the corrected weight of v1 is 0.75, not the affine 0.5.
        let mut v0 = screen_vertex(1.5, 1.5, 0.5, [1.0, 0.0, 0.0]);
        let mut v1 = screen_vertex(5.5, 1.5, 0.5, [0.0, 1.0, 0.0]);
        let v2 = screen_vertex(1.5, 5.5, 0.5, [0.0, 0.0, 1.0]);
        v0.inv_w = 1.0;
        v1.inv_w = 3.0;

        let vertices = [v0, v1, v2];
        let record = TriangleRecord {
            vertices: [0, 1, 2],
            area: raster::edge(1.5, 1.5, 5.5, 1.5, 1.5, 5.5),
            skip: false,
            ..Default::default()
        };

        let shaded = shade_fragment(
            &vertices,
            &record,
            3.5,
            1.5,
            Vec3::new(0.0, 0.0, 10.0),
            0.0,
        );
        assert_eq!(shaded, Rgba8::new(64, 191, 0, 255));
    }
}
