//! Rasterizer configuration
//!
//! This module provides the configuration structure applications use to
//! customize pipeline behavior without hardcoding values in the
//! rasterization stages themselves.

use serde::{Deserialize, Serialize};

/// Back-face culling policy for primitive assembly
///
/// Facing is decided by the sign of the triangle's signed screen-space area,
/// computed after the viewport transform (which flips Y). `Back` therefore
/// culls triangles that wind counter-clockwise as seen on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CullMode {
    /// Keep both facings (the default)
    None,
    /// Drop back-facing triangles
    Back,
    /// Drop front-facing triangles
    Front,
}

/// Configuration for the software rasterizer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizerConfig {
    /// Background clear color [R, G, B, A] (0.0-1.0 range)
    pub clear_color: [f32; 4],
    /// Back-face culling policy
    pub cull_mode: CullMode,
    /// Worker thread count for the pipeline stages (0 = available parallelism)
    pub worker_threads: usize,
    /// Constant ambient lighting term added during fragment shading (0.0-1.0)
    pub ambient: f32,
}

impl RasterizerConfig {
    /// Create a new rasterizer configuration with default settings
    pub fn new() -> Self {
        Self {
            clear_color: [0.005, 0.005, 0.005, 1.0], // Dark gray background
            cull_mode: CullMode::None,
            worker_threads: 0, // Auto-detect from available parallelism
            ambient: crate::render::lighting::DEFAULT_AMBIENT,
        }
    }

    /// Set background clear color [R, G, B, A] (0.0-1.0 range)
    pub fn with_clear_color(mut self, color: [f32; 4]) -> Self {
        self.clear_color = color;
        self
    }

    /// Set the back-face culling policy
    pub fn with_cull_mode(mut self, cull_mode: CullMode) -> Self {
        self.cull_mode = cull_mode;
        self
    }

    /// Set the worker thread count (0 = available parallelism)
    pub fn with_worker_threads(mut self, workers: usize) -> Self {
        self.worker_threads = workers.min(128); // Clamp to a reasonable range
        self
    }

    /// Set the ambient lighting term (clamped to 0.0-1.0)
    pub fn with_ambient(mut self, ambient: f32) -> Self {
        self.ambient = ambient.clamp(0.0, 1.0);
        self
    }
}

impl Default for RasterizerConfig {
    /// Default configuration for a generic software-rendered application
    fn default() -> Self {
        Self::new()
    }
}

impl crate::config::Config for RasterizerConfig {}
