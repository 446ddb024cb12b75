//! Core rendering primitives
//!
//! Backend-agnostic geometry and camera types used to feed the pipeline.

pub mod camera;
pub mod mesh;

pub use camera::Camera;
pub use mesh::{Mesh, Vertex};
