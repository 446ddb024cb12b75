//! Primitive assembly stage
//!
//! Groups transformed vertices into triangle records via the index buffer.
//! Each record carries the screen-space bounding box clamped to the
//! viewport and the triangle's signed area, which doubles as the back-face
//! test and the barycentric denominator. Triangles that cannot produce
//! fragments (degenerate, culled, off-screen, or behind the eye) are
//! flagged so rasterization skips them without touching pixels.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::render::config::CullMode;
use crate::render::pipeline::executor::Executor;
use crate::render::pipeline::raster;
use crate::render::pipeline::vertex::TransformedVertex;

/// Absolute signed area below which a triangle is degenerate
const DEGENERATE_AREA: f32 = 1e-10;

/// One triangle prepared for rasterization
#[derive(Debug, Clone, Copy)]
pub(crate) struct TriangleRecord {
    /// The triangle's vertex indices into the transformed-vertex array
    pub vertices: [u32; 3],
    /// Bounding box in pixels, clamped to the viewport, inclusive
    pub min_x: u32,
    /// Bounding box minimum y
    pub min_y: u32,
    /// Bounding box maximum x, inclusive
    pub max_x: u32,
    /// Bounding box maximum y, inclusive
    pub max_y: u32,
    /// Twice the signed screen-space area; positive winds clockwise on screen
    pub area: f32,
    /// True when rasterization must produce no fragments for this triangle
    pub skip: bool,
}

impl Default for TriangleRecord {
    fn default() -> Self {
        Self {
            vertices: [0; 3],
            min_x: 0,
            min_y: 0,
            max_x: 0,
            max_y: 0,
            area: 0.0,
            skip: true,
        }
    }
}

/// Per-frame assembly statistics, for diagnostics only
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct AssemblyStats {
    /// Triangles with near-zero signed area
    pub degenerate: usize,
    /// Triangles dropped by the configured culling policy
    pub culled: usize,
    /// Triangles with no viewport overlap or with vertices behind the eye
    pub offscreen: usize,
}

enum SkipReason {
    Degenerate,
    Culled,
    Offscreen,
}

/// Assemble every index triple into `output`
///
/// `output` must already be sized to the triangle count. Returns once the
/// whole batch has completed.
pub(crate) fn run(
    executor: &Executor,
    vertices: &[TransformedVertex],
    indices: &[u32],
    width: u32,
    height: u32,
    cull_mode: CullMode,
    output: &mut [TriangleRecord],
) -> AssemblyStats {
    let degenerate = AtomicUsize::new(0);
    let culled = AtomicUsize::new(0);
    let offscreen = AtomicUsize::new(0);

    executor.run_chunked(output, |start, chunk| {
        for (offset, record) in chunk.iter_mut().enumerate() {
            let triangle = start + offset;
            let triple = [
                indices[triangle * 3],
                indices[triangle * 3 + 1],
                indices[triangle * 3 + 2],
            ];
            let (assembled, skipped) = assemble_one(vertices, triple, width, height, cull_mode);
            *record = assembled;
            match skipped {
                Some(SkipReason::Degenerate) => degenerate.fetch_add(1, Ordering::Relaxed),
                Some(SkipReason::Culled) => culled.fetch_add(1, Ordering::Relaxed),
                Some(SkipReason::Offscreen) => offscreen.fetch_add(1, Ordering::Relaxed),
                None => 0,
            };
        }
    });

    AssemblyStats {
        degenerate: degenerate.into_inner(),
        culled: culled.into_inner(),
        offscreen: offscreen.into_inner(),
    }
}

fn assemble_one(
    vertices: &[TransformedVertex],
    triple: [u32; 3],
    width: u32,
    height: u32,
    cull_mode: CullMode,
) -> (TriangleRecord, Option<SkipReason>) {
    let mut record = TriangleRecord {
        vertices: triple,
        ..Default::default()
    };

    let v0 = &vertices[triple[0] as usize];
    let v1 = &vertices[triple[1] as usize];
    let v2 = &vertices[triple[2] as usize];
    if !(v0.projectable && v1.projectable && v2.projectable) {
        return (record, Some(SkipReason::Offscreen));
    }

    let area = raster::edge(
        v0.screen.x,
        v0.screen.y,
        v1.screen.x,
        v1.screen.y,
        v2.screen.x,
        v2.screen.y,
    );
    record.area = area;
    if area.abs() < DEGENERATE_AREA {
        return (record, Some(SkipReason::Degenerate));
    }
    match cull_mode {
        CullMode::Back if area < 0.0 => return (record, Some(SkipReason::Culled)),
        CullMode::Front if area > 0.0 => return (record, Some(SkipReason::Culled)),
        _ => {}
    }

    let min_x = v0.screen.x.min(v1.screen.x).min(v2.screen.x).floor().max(0.0);
    let min_y = v0.screen.y.min(v1.screen.y).min(v2.screen.y).floor().max(0.0);
    let max_x = v0.screen.x.max(v1.screen.x).max(v2.screen.x).ceil();
    let max_y = v0.screen.y.max(v1.screen.y).max(v2.screen.y).ceil();
    let max_x = max_x.min(width as f32 - 1.0);
    let max_y = max_y.min(height as f32 - 1.0);
    if max_x < min_x || max_y < min_y {
        return (record, Some(SkipReason::Offscreen));
    }

    record.min_x = min_x as u32;
    record.min_y = min_y as u32;
    record.max_x = max_x as u32;
    record.max_y = max_y as u32;
    record.skip = false;
    (record, None)
}
