//! Asset loading
//!
//! Loads meshes from external files into the engine's geometry containers.
//! The OBJ loader covers the interchange format the demo scenes ship in;
//! procedural meshes come from [`crate::render::Mesh`] constructors instead.

pub mod obj_loader;

pub use obj_loader::{ObjError, ObjLoader};
