//! # Rendering System
//!
//! This module provides the software rendering layer of the engine: a
//! deterministic, CPU-parallel rasterization pipeline with a single
//! per-frame entry point and no GPU dependency.
//!
//! ## Architecture
//!
//! The rendering system is split into focused submodules:
//! - **Rasterizer**: per-frame coordinator owning buffers and worker pool
//! - **Pipeline stages**: vertex transform, primitive assembly,
//!   rasterization with atomic depth resolve, and fragment shading
//! - **Camera**: 3D perspective camera producing view/projection matrices
//! - **Primitives**: mesh and vertex containers feeding the pipeline
//! - **Lighting**: the diffuse-plus-ambient model applied per fragment
//!
//! ## Design Goals
//!
//! - **Determinism**: identical input produces an identical image at any
//!   worker count
//! - **Library-First**: usable as a standalone rasterization library, not
//!   tied to a particular application or windowing layer
//! - **Fail Fast**: malformed geometry is rejected before any pixel work

// Public modules for application use
pub mod config;
pub mod frame;

// Core primitives
pub mod primitives;

// Lighting model shared by the shading stage and applications
pub mod lighting;

/// Pipeline stage implementations and the frame coordinator
///
/// Contains the per-stage batch kernels together with the [`Rasterizer`]
/// that sequences them and owns the persistent frame resources.
pub mod pipeline;


// High-level API that applications should use
pub use config::{CullMode, RasterizerConfig};
pub use frame::{FrameConstants, FrameInput, GeometryBuffers};
pub use pipeline::{DepthBuffer, OutputImage, Rasterizer, Rgba8};

// Core rendering types that applications need
pub use lighting::DEFAULT_AMBIENT;
pub use primitives::{Camera, Mesh, Vertex};

use thiserror::Error;

/// Rendering error types
///
/// Represents the ways a frame can fail, abstracted from any particular
/// backing store or platform so applications can match on meaning rather
/// than mechanism.
///
/// # Design Philosophy
/// Geometry errors fail the frame before any pixel is touched, so a
/// returned error always means the previous image is still intact.
/// Degenerate triangles are deliberately not an error; they are skipped
/// silently as an expected byproduct of transformation.
#[derive(Error, Debug)]
pub enum RasterError {
    /// An index buffer entry addresses a vertex that does not exist
    ///
    /// Raised during pre-frame validation. The offending index and the
    /// vertex count it was checked against identify the bad triangle
    /// without any pixel work having run.
    #[error("Vertex index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        /// The out-of-range index buffer entry
        index: u32,
        /// Number of vertices the attribute arrays actually hold
        vertex_count: usize,
    },

    /// The per-vertex attribute arrays disagree in length
    ///
    /// Positions, colors, and normals are parallel arrays and must all
    /// describe the same vertex count. The payload lists the lengths seen.
    #[error("Attribute buffers disagree in length: {0}")]
    MismatchedBuffers(String),

    /// The index buffer length is not a multiple of three
    ///
    /// Triangles are consumed as whole index triples; a trailing partial
    /// triple indicates a malformed buffer rather than a drawable frame.
    #[error("Index count {0} does not form whole triangles")]
    PartialTriangle(usize),

    /// The requested output resolution cannot be rendered
    ///
    /// Zero-width or zero-height targets have no pixels to produce and are
    /// rejected before any buffer is allocated or resized.
    #[error("Invalid output resolution {width}x{height}")]
    InvalidResolution {
        /// Requested output width in pixels
        width: u32,
        /// Requested output height in pixels
        height: u32,
    },

    /// Frame resource allocation failed
    ///
    /// Raised when the depth or color buffer (or per-frame scratch) cannot
    /// reserve memory. The frame is abandoned and the error surfaces to the
    /// caller instead of aborting the process.
    #[error("Frame buffer allocation failed: {0}")]
    Allocation(String),
}

/// Result type for rendering operations
pub type RasterResult<T> = Result<T, RasterError>;
