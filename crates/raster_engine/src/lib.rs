//! # Raster Engine
//!
//! A parallel software rasterization pipeline written in Rust.
//!
//! ## Features
//!
//! - **Software Rasterization**: complete vertex-to-pixel pipeline on the CPU
//! - **Deterministic Output**: identical images at any worker thread count
//! - **Perspective-Correct Shading**: depth-resolved diffuse lighting
//! - **No GPU Dependency**: renders into a plain RGBA byte buffer
//! - **Lazy Resources**: frame buffers allocate on first use and follow
//!   resolution changes transparently
//!
//! ## Quick Start
//!
//! ```rust
//! use raster_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mesh = Mesh::cube();
//!     let camera = Camera::perspective(
//!         Vec3::new(2.0, 1.5, 2.5),
//!         60.0,
//!         320.0 / 240.0,
//!         0.1,
//!         100.0,
//!     );
//!     let constants = FrameConstants::new(
//!         Mat4::identity(),
//!         camera.view_matrix(),
//!         camera.projection_matrix(),
//!         Vec3::new(3.0, 4.0, 5.0),
//!     );
//!
//!     let mut rasterizer = Rasterizer::new(RasterizerConfig::new());
//!     let frame = FrameInput {
//!         width: 320,
//!         height: 240,
//!         time: 0.0,
//!         geometry: mesh.buffers(),
//!         constants: &constants,
//!     };
//!     let image = rasterizer.render_frame(&frame)?;
//!     assert_eq!(image.as_bytes().len(), 320 * 240 * 4);
//!
//!     rasterizer.teardown();
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core library modules
pub mod assets;
pub mod config;
pub mod foundation;
pub mod render;

/// Common imports for library users
pub mod prelude {
    pub use crate::{
        assets::{ObjError, ObjLoader},
        foundation::{
            math::{Mat4, Transform, Vec3},
            time::FrameClock,
        },
        render::{
            Camera, CullMode, FrameConstants, FrameInput, GeometryBuffers, Mesh, OutputImage,
            RasterError, RasterResult, Rasterizer, RasterizerConfig, Rgba8, Vertex,
        },
    };
}
