//! # Rasterization Pipeline
//!
//! This module implements the software rasterization pipeline behind
//! [`Rasterizer`]. Each frame is processed as a sequence of wide parallel
//! batches over CPU worker threads, producing a finished RGBA image from
//! raw vertex and index buffers.
//!
//! ## Architecture
//!
//! A frame runs through four stages, each a batch of independent items:
//! - **Vertex transform**: model space to screen space, one item per vertex
//! - **Primitive assembly**: index triples to triangle records with bounding
//!   boxes, signed areas, and cull/degenerate flags
//! - **Rasterization**: coverage and depth per triangle, submitted to a
//!   shared atomic depth buffer
//! - **Fragment shading**: one item per pixel, resolving depth-buffer
//!   winners into lit colors
//!
//! A stage never starts until the previous stage's batch has fully
//! completed, so apart from the depth buffer's atomic minimum no stage ever
//! observes a partially written input. The depth and color buffers persist
//! inside the [`Rasterizer`] between frames and are reallocated only when
//! the output resolution changes.

pub(crate) mod assembly;
pub mod depth;
pub(crate) mod executor;
pub mod framebuffer;
pub(crate) mod raster;
pub(crate) mod shading;
pub(crate) mod vertex;

pub use depth::DepthBuffer;
pub use framebuffer::{OutputImage, Rgba8};

use crate::render::config::RasterizerConfig;
use crate::render::frame::FrameInput;
use crate::render::{RasterError, RasterResult};

use assembly::TriangleRecord;
use executor::Executor;
use vertex::TransformedVertex;

/// Depth and color buffers sized to one output resolution
struct FrameBuffers {
    depth: DepthBuffer,
    image: OutputImage,
}

impl FrameBuffers {
    fn try_new(width: u32, height: u32) -> RasterResult<Self> {
        Ok(Self {
            depth: DepthBuffer::try_new(width, height)?,
            image: OutputImage::try_new(width, height)?,
        })
    }
}

/// Software rasterizer with persistent frame resources
///
/// The rasterizer owns its worker pool, depth buffer, color buffer, and
/// per-frame scratch arrays. Buffers are allocated lazily on the first
/// [`Rasterizer::render_frame`] call, reused while the resolution holds
/// steady, reallocated transparently when it changes, and released by
/// [`Rasterizer::teardown`].
pub struct Rasterizer {
    config: RasterizerConfig,
    executor: Executor,
    buffers: Option<FrameBuffers>,
    transformed: Vec<TransformedVertex>,
    triangles: Vec<TriangleRecord>,
}

impl Rasterizer {
    /// Create a rasterizer from a configuration
    ///
    /// No buffers are allocated here; the first rendered frame sizes them.
    pub fn new(config: RasterizerConfig) -> Self {
        let executor = Executor::new(config.worker_threads);
        log::info!(
            "Creating rasterizer: {} workers, cull mode {:?}",
            executor.worker_count(),
            config.cull_mode
        );
        Self {
            config,
            executor,
            buffers: None,
            transformed: Vec::new(),
            triangles: Vec::new(),
        }
    }

    /// Render one frame and return the finished image
    ///
    /// Validates the geometry up front and fails without touching any
    /// buffer if an index is out of range or the attribute arrays disagree
    /// in length. The returned reference stays valid until the next call
    /// that mutates this rasterizer.
    ///
    /// # Errors
    /// Returns [`RasterError::InvalidResolution`] for a zero-sized target,
    /// a validation error for malformed geometry, or
    /// [`RasterError::Allocation`] when buffer memory cannot be reserved.
    pub fn render_frame(&mut self, frame: &FrameInput<'_>) -> RasterResult<&OutputImage> {
        if frame.width == 0 || frame.height == 0 {
            return Err(RasterError::InvalidResolution {
                width: frame.width,
                height: frame.height,
            });
        }
        frame.geometry.validate()?;

        // Reuse the buffers while the resolution holds; a mismatch (or a
        // preceding teardown) allocates fresh ones. On allocation failure
        // the rasterizer holds no buffers and the frame is abandoned.
        let mut buffers = match self.buffers.take() {
            Some(existing)
                if existing.image.width() == frame.width
                    && existing.image.height() == frame.height =>
            {
                existing
            }
            _ => FrameBuffers::try_new(frame.width, frame.height)?,
        };
        buffers.depth.clear();

        let vertex_count = frame.geometry.vertex_count();
        let triangle_count = frame.geometry.triangle_count();
        prepare_scratch(&mut self.transformed, vertex_count)?;
        prepare_scratch(&mut self.triangles, triangle_count)?;

        vertex::run(
            &self.executor,
            &frame.geometry,
            frame.constants,
            frame.width,
            frame.height,
            &mut self.transformed,
        );
        let stats = assembly::run(
            &self.executor,
            &self.transformed,
            frame.geometry.indices,
            frame.width,
            frame.height,
            self.config.cull_mode,
            &mut self.triangles,
        );
        raster::run(
            &self.executor,
            &self.transformed,
            &self.triangles,
            &buffers.depth,
        );
        shading::run(
            &self.executor,
            &self.transformed,
            &self.triangles,
            &buffers.depth,
            frame.constants,
            &self.config,
            &mut buffers.image,
        );

        log::debug!(
            "Frame t={:.3}s: {} triangles in ({} degenerate, {} culled, {} offscreen), {}x{} out",
            frame.time,
            triangle_count,
            stats.degenerate,
            stats.culled,
            stats.offscreen,
            frame.width,
            frame.height
        );

        let stored = self.buffers.insert(buffers);
        Ok(&stored.image)
    }

    /// Release the depth and color buffers and the per-frame scratch
    ///
    /// Safe to call before the first frame and safe to call repeatedly;
    /// the next [`Rasterizer::render_frame`] reallocates from scratch.
    pub fn teardown(&mut self) {
        if self.buffers.take().is_some() {
            log::info!("Rasterizer frame buffers released");
        }
        self.transformed = Vec::new();
        self.triangles = Vec::new();
    }

    /// The configuration this rasterizer was created with
    pub fn config(&self) -> &RasterizerConfig {
        &self.config
    }

    /// Depth buffer of the most recent frame, if one has been rendered
    pub fn depth_buffer(&self) -> Option<&DepthBuffer> {
        self.buffers.as_ref().map(|buffers| &buffers.depth)
    }
}

/// Size a scratch vector for this frame's batch, reporting allocation
/// failure instead of aborting
fn prepare_scratch<T: Clone + Default>(scratch: &mut Vec<T>, len: usize) -> RasterResult<()> {
    scratch.clear();
    if len > scratch.capacity() {
        scratch
            .try_reserve_exact(len)
            .map_err(|source| RasterError::Allocation(source.to_string()))?;
    }
    scratch.resize(len, T::default());
    Ok(())
}
