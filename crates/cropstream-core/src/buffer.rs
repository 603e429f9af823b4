//! Pixel buffer: exclusively owned pixel bytes plus geometry metadata.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Container format a buffer was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SourceFormat {
    /// Format not yet determined (or not one of the four containers).
    #[default]
    Unspecified,
    Jpeg,
    Png,
    Bmp,
    Gif,
}

/// Encode quality carried by buffers the decode pipeline creates.
///
/// The unified write path is always lossy; 80 is the quality it historically
/// used for re-encoded output.
pub const DEFAULT_QUALITY: u8 = 80;

/// A decoded image: owned pixel bytes in row-major order plus geometry.
///
/// Invariants: `stride == width * channels` for every buffer this toolkit
/// creates, `stride * height == pixels.len()`, and `channels` is 1, 3, or 4.
/// Cloning copies the pixel bytes; two live buffers never alias storage.
#[derive(Debug, Clone)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: u8,
    stride: usize,
    pixels: Vec<u8>,
    /// Container format this buffer was decoded from.
    pub format: SourceFormat,
    /// Encode quality (1-100), meaningful only for lossy encode.
    pub quality: u8,
}

impl PixelBuffer {
    /// Create a buffer over existing pixel data, validating the geometry.
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Result<Self, Error> {
        if !matches!(channels, 1 | 3 | 4) {
            return Err(Error::Unsupported(format!(
                "{channels}-channel pixel data"
            )));
        }
        let stride = width as usize * channels as usize;
        let expected = stride * height as usize;
        if pixels.len() != expected {
            return Err(Error::Format(format!(
                "pixel data is {} bytes, geometry requires {expected}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            stride,
            pixels,
            format: SourceFormat::Unspecified,
            quality: DEFAULT_QUALITY,
        })
    }

    /// Allocate a zeroed buffer, reporting allocation failure as an error.
    pub(crate) fn alloc(width: u32, height: u32, channels: u8) -> Result<Self, Error> {
        let stride = width as usize * channels as usize;
        let size = stride * height as usize;
        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(size)
            .map_err(|_| Error::OutOfMemory(size))?;
        pixels.resize(size, 0);
        Ok(Self {
            width,
            height,
            channels,
            stride,
            pixels,
            format: SourceFormat::Unspecified,
            quality: DEFAULT_QUALITY,
        })
    }

    /// Swap in new pixel storage with new geometry, keeping the handle.
    ///
    /// Used by the orientation engine and the alpha compositor, which
    /// rewrite the whole buffer in one pass.
    pub(crate) fn replace(&mut self, width: u32, height: u32, channels: u8, pixels: Vec<u8>) {
        debug_assert_eq!(
            pixels.len(),
            width as usize * channels as usize * height as usize,
            "replacement pixel storage does not match its geometry"
        );
        self.width = width;
        self.height = height;
        self.channels = channels;
        self.stride = width as usize * channels as usize;
        self.pixels = pixels;
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Channel count: 1 (grayscale), 3 (RGB), or 4 (RGBA).
    pub fn channels(&self) -> u8 {
        self.channels
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Borrow one row. Panics if `y` is out of bounds.
    pub fn row(&self, y: u32) -> &[u8] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let start = y as usize * self.stride;
        &self.pixels[start..start + self.stride]
    }

    pub(crate) fn row_mut(&mut self, y: u32) -> &mut [u8] {
        assert!(y < self.height, "row {y} out of bounds (height {})", self.height);
        let start = y as usize * self.stride;
        &mut self.pixels[start..start + self.stride]
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }
}
