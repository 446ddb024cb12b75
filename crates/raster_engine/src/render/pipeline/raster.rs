//! Rasterization stage
//!
//! Converts each live triangle record into the exact set of covered pixel
//! centers, interpolates depth across them, and submits every candidate
//! fragment to the concurrent depth buffer. Coverage uses the standard
//! edge-function formulation with the top-left fill convention, so a pixel
//! center lying exactly on an edge shared by two adjacent triangles is
//! produced by exactly one of them.
//!
//! Workers claim triangles from the executor's shared cursor; the depth
//! buffer's atomic submit is the only cross-worker communication.

use crate::render::pipeline::assembly::TriangleRecord;
use crate::render::pipeline::depth::DepthBuffer;
use crate::render::pipeline::executor::Executor;
use crate::render::pipeline::vertex::TransformedVertex;

/// Signed edge function: twice the area of triangle (a, b, p)
///
/// Positive when (a, b, p) winds clockwise in screen space (y down).
#[inline]
pub(crate) fn edge(ax: f32, ay: f32, bx: f32, by: f32, px: f32, py: f32) -> f32 {
    (bx - ax) * (py - ay) - (by - ay) * (px - ax)
}

/// Barycentric weights of point (px, py) relative to a triangle
///
/// `area` is the triangle's full signed area from assembly. Weights sum to
/// one for any point; all three are non-negative exactly when the point is
/// inside (or on) the triangle.
pub(crate) fn barycentrics(
    v0: &TransformedVertex,
    v1: &TransformedVertex,
    v2: &TransformedVertex,
    area: f32,
    px: f32,
    py: f32,
) -> (f32, f32, f32) {
    let inv_area = 1.0 / area;
    let w0 = edge(v1.screen.x, v1.screen.y, v2.screen.x, v2.screen.y, px, py) * inv_area;
    let w1 = edge(v2.screen.x, v2.screen.y, v0.screen.x, v0.screen.y, px, py) * inv_area;
    let w2 = edge(v0.screen.x, v0.screen.y, v1.screen.x, v1.screen.y, px, py) * inv_area;
    (w0, w1, w2)
}

/// Top-left rule for one edge, assuming positive triangle orientation
///
/// A pixel exactly on an edge counts as covered only when that edge is a
/// top edge (horizontal, pointing +x) or a left edge (pointing -y). Every
/// boundary pixel between two adjacent triangles thus has exactly one
/// owner.
#[inline]
fn edge_accepts(value: f32, dx: f32, dy: f32) -> bool {
    value > 0.0 || (value == 0.0 && (dy < 0.0 || (dy == 0.0 && dx > 0.0)))
}

/// Rasterize every live triangle into the depth buffer
pub(crate) fn run(
    executor: &Executor,
    vertices: &[TransformedVertex],
    triangles: &[TriangleRecord],
    depth_buffer: &DepthBuffer,
) {
    executor.run_indexed(triangles.len(), |index| {
        let record = &triangles[index];
        if record.skip {
            return;
        }
        rasterize_triangle(vertices, record, index as u32, depth_buffer);
    });
}

fn rasterize_triangle(
    vertices: &[TransformedVertex],
    record: &TriangleRecord,
    triangle_index: u32,
    depth_buffer: &DepthBuffer,
) {
    let v0 = &vertices[record.vertices[0] as usize];
    let v1 = &vertices[record.vertices[1] as usize];
    let v2 = &vertices[record.vertices[2] as usize];
    let (x0, y0) = (v0.screen.x, v0.screen.y);
    let (x1, y1) = (v1.screen.x, v1.screen.y);
    let (x2, y2) = (v2.screen.x, v2.screen.y);

    // Orient the coverage test to the triangle's winding so both facings
    // rasterize with the same inclusive-edge ownership.
    let sign = if record.area > 0.0 { 1.0 } else { -1.0 };
    let inv_area = 1.0 / record.area;

    for y in record.min_y..=record.max_y {
        let py = y as f32 + 0.5;
        for x in record.min_x..=record.max_x {
            let px = x as f32 + 0.5;

            let e12 = edge(x1, y1, x2, y2, px, py);
            let e20 = edge(x2, y2, x0, y0, px, py);
            let e01 = edge(x0, y0, x1, y1, px, py);
            let covered = edge_accepts(sign * e12, sign * (x2 - x1), sign * (y2 - y1))
                && edge_accepts(sign * e20, sign * (x0 - x2), sign * (y0 - y2))
                && edge_accepts(sign * e01, sign * (x1 - x0), sign * (y1 - y0));
            if !covered {
                continue;
            }

            // Depth is NDC z remapped to [0, 1], already projectively
            // mapped, so screen-affine interpolation is exact.
            let w0 = e12 * inv_area;
            let w1 = e20 * inv_area;
            let w2 = e01 * inv_area;
            let depth = w0 * v0.screen.z + w1 * v1.screen.z + w2 * v2.screen.z;

            // Fragments beyond the depth range (and NaN from malformed
            // input) are discarded, never submitted.
            if !(0.0..=1.0).contains(&depth) {
                continue;
            }
            depth_buffer.submit(x, y, depth, triangle_index);
        }
    }
}
