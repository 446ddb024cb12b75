//! Output image buffer
//!
//! The RGBA8 color buffer the fragment shading stage writes into. The
//! pipeline owns the buffer between frames; the application borrows it after
//! each frame and may pass [`OutputImage::as_bytes`] straight to an encoder
//! or display surface.

use bytemuck::{Pod, Zeroable};

use crate::foundation::math::{utils, Vec3};
use crate::render::{RasterError, RasterResult};

/// One packed pixel, 8 bits per channel
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba8 {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
    /// Alpha channel
    pub a: u8,
}

impl Rgba8 {
    /// Create a pixel from raw channel values
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Quantize a [R, G, B, A] color in the 0.0-1.0 range
    pub fn from_unit(color: [f32; 4]) -> Self {
        let quantize = |channel: f32| (utils::clamp(channel, 0.0, 1.0) * 255.0).round() as u8;
        Self {
            r: quantize(color[0]),
            g: quantize(color[1]),
            b: quantize(color[2]),
            a: quantize(color[3]),
        }
    }

    /// Quantize an opaque RGB color in the 0.0-1.0 range
    pub fn from_unit_rgb(color: Vec3) -> Self {
        Self::from_unit([color.x, color.y, color.z, 1.0])
    }
}

/// Frame-sized RGBA8 color buffer
///
/// Pixels are stored row-major, top row first. Written exactly once per
/// pixel per frame by the fragment shading stage.
#[derive(Debug)]
pub struct OutputImage {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl OutputImage {
    /// Allocate an image of the given size
    ///
    /// Allocation is fallible so resource exhaustion surfaces as an error
    /// instead of aborting the process.
    pub(crate) fn try_new(width: u32, height: u32) -> RasterResult<Self> {
        let length = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| RasterError::Allocation(format!("{width}x{height} overflows")))?;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(length)
            .map_err(|source| RasterError::Allocation(source.to_string()))?;
        pixels.resize(length, Rgba8::new(0, 0, 0, 0));
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Read one pixel; coordinates must be inside the image
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8 {
        debug_assert!(x < self.width && y < self.height);
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// All pixels, row-major
    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }

    /// Raw RGBA byte view, row-major, for encoders and display surfaces
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub(crate) fn pixels_mut(&mut self) -> &mut [Rgba8] {
        &mut self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_unit_quantizes_and_clamps() {
        assert_eq!(Rgba8::from_unit([0.0, 0.5, 1.0, 2.0]), Rgba8::new(0, 128, 255, 255));
        assert_eq!(Rgba8::from_unit([-1.0, 0.0, 0.0, 1.0]).r, 0);
    }

    #[test]
    fn test_byte_view_is_rgba_order() {
        let mut image = OutputImage::try_new(2, 1).unwrap();
        image.pixels_mut()[0] = Rgba8::new(1, 2, 3, 4);
        image.pixels_mut()[1] = Rgba8::new(5, 6, 7, 8);
        assert_eq!(image.as_bytes(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_pixel_addressing_is_row_major() {
        let mut image = OutputImage::try_new(3, 2).unwrap();
        image.pixels_mut()[4] = Rgba8::new(9, 9, 9, 255);
        assert_eq!(image.pixel(1, 1), Rgba8::new(9, 9, 9, 255));
    }
}
