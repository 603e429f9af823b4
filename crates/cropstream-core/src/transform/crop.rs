//! Crop-region mapping between final (post-rotation) and source pixel space.
//!
//! Callers describe the rectangle they want in the *final* visual space,
//! after the orientation transform has run. The decoder, however, scans the
//! pre-rotation pixel grid, so the rectangle must be remapped with the
//! inverse of the orientation before the scan starts.

use serde::{Deserialize, Serialize};

use super::Orientation;

/// Axis-aligned rectangle of pixels to retain.
///
/// Interpreted in final (post-rotation) space when passed to the decode
/// entry points, and in source space once [`map_crop_area`] has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRegion {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl CropRegion {
    /// Degenerate request that selects the whole image after mapping.
    pub const FULL: CropRegion = CropRegion {
        x: 0,
        y: 0,
        w: 0,
        h: 0,
    };

    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

/// Map a final-space crop rectangle into source space, clamped to the
/// source grid.
///
/// For each orientation the inverse affine remap runs first (a quarter turn
/// swaps w/h and remaps the anchor with the `dim - 1 - coord - extent`
/// convention; a mirror reflects the anchor along one axis). The result is
/// then clamped: x/y into `[0, dim - 1]`, w/h to the buffer, and any
/// degenerate outcome (w or h below 1, or an anchor on the last row or
/// column) falls back to the full-image rectangle.
///
/// Pure and deterministic; mapping an already-mapped rectangle with
/// [`Orientation::Normal`] returns it unchanged.
pub fn map_crop_area(
    width: u32,
    height: u32,
    region: CropRegion,
    orientation: Orientation,
) -> CropRegion {
    if width == 0 || height == 0 {
        return CropRegion::new(0, 0, width, height);
    }

    let width_i = i64::from(width);
    let height_i = i64::from(height);
    let mut x = i64::from(region.x);
    let mut y = i64::from(region.y);
    let mut w = i64::from(region.w);
    let mut h = i64::from(region.h);

    match orientation {
        Orientation::Normal => {}
        Orientation::FlipHorizontal => {
            x = width_i - 1 - x - w;
        }
        Orientation::Rotate180 => {
            x = width_i - 1 - x - w;
            y = height_i - 1 - y - h;
        }
        Orientation::FlipVertical => {
            y = height_i - 1 - y - h;
        }
        Orientation::Transpose => {
            std::mem::swap(&mut x, &mut y);
            std::mem::swap(&mut w, &mut h);
        }
        Orientation::Rotate90CW => {
            let t = x;
            x = y;
            y = height_i - 1 - t - w;
            std::mem::swap(&mut w, &mut h);
        }
        Orientation::Transverse => {
            let t = x;
            x = width_i - 1 - y - h;
            y = height_i - 1 - t - w;
            std::mem::swap(&mut w, &mut h);
        }
        Orientation::Rotate270CW => {
            let t = x;
            x = width_i - 1 - y - h;
            y = t;
            std::mem::swap(&mut w, &mut h);
        }
    }

    // Clamp into the source grid.
    x = x.clamp(0, width_i - 1);
    y = y.clamp(0, height_i - 1);
    w = w.min(width_i);
    h = h.min(height_i);

    if w < 1 || h < 1 || x == width_i - 1 || y == height_i - 1 {
        // Degenerate rectangle, or anchored on the bottom/right edge:
        // fall back to the whole image.
        return CropRegion::new(0, 0, width, height);
    }

    if x + w > width_i {
        w = width_i - x;
    }
    if y + h > height_i {
        h = height_i - y;
    }

    CropRegion::new(x as u32, y as u32, w as u32, h as u32)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
