//! Resize policies: map source dimensions to target dimensions.
//!
//! A policy only decides *what size* the streaming driver should produce;
//! the resampling itself happens inside the decode scan. Policies never
//! change the aspect ratio, so a returned width equal to the source width
//! implies an unchanged height as well.

/// Pixel ceiling for any decode target: 12 MB at 4 bytes per pixel.
pub const MAX_OUTPUT_PIXELS: u64 = 12 * 1024 * 1024 / 4;

/// Default minimum-edge threshold used by callers that don't pick their own.
pub const DEFAULT_MIN_EDGE: u32 = 960;

/// A resize policy: (source width, source height, minimum edge) to
/// (target width, target height). Stateless and swappable per call.
pub type ResizePolicy = fn(u32, u32, u32) -> (u32, u32);

/// Default policy: cap the shorter edge at `min_edge`, scale the longer
/// edge proportionally (integer truncation), then shrink both dimensions
/// by a common ratio if the pixel count exceeds [`MAX_OUTPUT_PIXELS`].
pub fn compress_strategy(width: u32, height: u32, min_edge: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }

    let (mut out_w, mut out_h);
    if width > height {
        out_h = height.min(min_edge);
        out_w = (u64::from(width) * u64::from(out_h) / u64::from(height)) as u32;
    } else {
        out_w = width.min(min_edge);
        out_h = (u64::from(height) * u64::from(out_w) / u64::from(width)) as u32;
    }

    let pixel_count = u64::from(out_w) * u64::from(out_h);
    if pixel_count > MAX_OUTPUT_PIXELS {
        let ratio = MAX_OUTPUT_PIXELS as f32 / pixel_count as f32;
        out_w = (out_w as f32 * ratio) as u32;
        out_h = (out_h as f32 * ratio) as u32;
    }

    (out_w.max(1), out_h.max(1))
}
