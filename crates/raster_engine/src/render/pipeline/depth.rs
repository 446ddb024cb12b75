//! Concurrent depth buffer
//!
//! One atomic word per pixel resolves visibility while many rasterization
//! workers write concurrently. Each word packs the fragment depth's IEEE-754
//! bits in the high half and the originating triangle index in the low half:
//!
//! ```text
//! [ depth.to_bits() : 32 ][ triangle index : 32 ]
//! ```
//!
//! Depth values are restricted to [0, 1], so their bit patterns order the
//! same way the floats do, and the packed word orders first by depth, then
//! by triangle index. A single `fetch_min` per candidate fragment therefore
//! keeps the nearest fragment per pixel, with equal depths resolving to the
//! lowest triangle index no matter how threads interleave. The word is
//! updated as one unit, so a torn depth/winner pair can never be observed.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::render::{RasterError, RasterResult};

/// Word value meaning "no fragment has touched this pixel"
///
/// Greater than any packed fragment word: real depths pack to at most
/// `1.0f32.to_bits()` in the high half.
const CLEAR_WORD: u64 = u64::MAX;

fn pack(depth: f32, triangle: u32) -> u64 {
    (u64::from(depth.to_bits()) << 32) | u64::from(triangle)
}

fn unpack(word: u64) -> (f32, u32) {
    (f32::from_bits((word >> 32) as u32), word as u32)
}

/// Per-pixel visibility buffer shared by all rasterization workers
#[derive(Debug)]
pub struct DepthBuffer {
    width: u32,
    height: u32,
    words: Vec<AtomicU64>,
}

impl DepthBuffer {
    /// Allocate a buffer of the given size, fully reset
    pub(crate) fn try_new(width: u32, height: u32) -> RasterResult<Self> {
        let length = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| RasterError::Allocation(format!("{width}x{height} overflows")))?;
        let mut words = Vec::new();
        words
            .try_reserve_exact(length)
            .map_err(|source| RasterError::Allocation(source.to_string()))?;
        words.resize_with(length, || AtomicU64::new(CLEAR_WORD));
        Ok(Self {
            width,
            height,
            words,
        })
    }

    /// Buffer width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Buffer height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Reset every pixel to the far sentinel
    ///
    /// Takes `&mut self`: clearing happens between frames, outside any
    /// parallel stage, so no atomic traffic is needed.
    pub(crate) fn clear(&mut self) {
        for word in &mut self.words {
            *word.get_mut() = CLEAR_WORD;
        }
    }

    /// Submit one candidate fragment for a pixel
    ///
    /// `depth` must lie in [0, 1]; the rasterizer discards fragments outside
    /// the depth range before submitting. Relaxed ordering suffices: the
    /// word itself is the only data exchanged between workers, and the
    /// stage barrier publishes all writes before shading reads them.
    #[inline]
    pub(crate) fn submit(&self, x: u32, y: u32, depth: f32, triangle: u32) {
        debug_assert!((0.0..=1.0).contains(&depth));
        let index = y as usize * self.width as usize + x as usize;
        self.words[index].fetch_min(pack(depth, triangle), Ordering::Relaxed);
    }

    /// Winning fragment for a linear pixel index, if any fragment landed
    pub(crate) fn resolved(&self, index: usize) -> Option<(f32, u32)> {
        let word = self.words[index].load(Ordering::Relaxed);
        (word != CLEAR_WORD).then(|| unpack(word))
    }

    /// Resolved depth at a pixel, `None` while the far sentinel remains
    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        debug_assert!(x < self.width && y < self.height);
        self.resolved(y as usize * self.width as usize + x as usize)
            .map(|(depth, _)| depth)
    }

    /// Winning triangle index at a pixel, if any fragment landed
    pub fn winner_at(&self, x: u32, y: u32) -> Option<u32> {
        debug_assert!(x < self.width && y < self.height);
        self.resolved(y as usize * self.width as usize + x as usize)
            .map(|(_, triangle)| triangle)
    }
}
