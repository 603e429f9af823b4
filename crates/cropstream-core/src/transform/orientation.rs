//! EXIF orientation values and the whole-buffer rotate/flip engine.

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;
use crate::error::Error;

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    /// Normal (no transformation needed).
    #[default]
    Normal = 1,
    /// Horizontal flip.
    FlipHorizontal = 2,
    /// Rotate 180 degrees.
    Rotate180 = 3,
    /// Vertical flip.
    FlipVertical = 4,
    /// Transpose (flip horizontal + rotate 270 CW).
    Transpose = 5,
    /// Rotate 90 degrees clockwise.
    Rotate90CW = 6,
    /// Transverse (flip horizontal + rotate 90 CW).
    Transverse = 7,
    /// Rotate 270 degrees clockwise (90 CCW).
    Rotate270CW = 8,
}

impl Orientation {
    /// Returns true if this orientation swaps width and height dimensions.
    ///
    /// Rotations of 90° and 270° (and their flip variants Transpose/Transverse)
    /// swap the image dimensions.
    #[inline]
    pub fn swaps_dimensions(self) -> bool {
        matches!(
            self,
            Orientation::Transpose
                | Orientation::Rotate90CW
                | Orientation::Transverse
                | Orientation::Rotate270CW
        )
    }

    /// The orientation that undoes this one.
    ///
    /// Every value except the two quarter-turn rotations is its own inverse.
    pub fn inverse(self) -> Orientation {
        match self {
            Orientation::Rotate90CW => Orientation::Rotate270CW,
            Orientation::Rotate270CW => Orientation::Rotate90CW,
            other => other,
        }
    }
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// Apply one of the 8 orientation transforms to a buffer in place.
///
/// Identity is a no-op. The other seven remap every pixel from a full copy
/// of the source into fresh storage, so this stage briefly holds two copies
/// of the image; callers minimize the region (crop + resize) before running
/// it. Dimension-swapping orientations also swap width/height and recompute
/// the stride. The only failure is allocation of the destination storage.
pub fn rotate_or_flip(data: &mut PixelBuffer, orientation: Orientation) -> Result<(), Error> {
    if orientation == Orientation::Normal || data.is_empty() {
        return Ok(());
    }

    let w = data.width() as usize;
    let h = data.height() as usize;
    let ch = data.channels() as usize;
    let src_stride = data.stride();

    let (dst_w, dst_h) = if orientation.swaps_dimensions() {
        (h, w)
    } else {
        (w, h)
    };
    let dst_stride = dst_w * ch;

    let size = dst_stride * dst_h;
    let mut out = Vec::new();
    out.try_reserve_exact(size)
        .map_err(|_| Error::OutOfMemory(size))?;
    out.resize(size, 0);
    let src = data.pixels();

    for i in 0..dst_h {
        for j in 0..dst_w {
            let (si, sj) = match orientation {
                Orientation::Normal => unreachable!(),
                Orientation::FlipHorizontal => (i, w - 1 - j),
                Orientation::Rotate180 => (h - 1 - i, w - 1 - j),
                Orientation::FlipVertical => (h - 1 - i, j),
                Orientation::Transpose => (j, i),
                Orientation::Rotate90CW => (h - 1 - j, i),
                Orientation::Transverse => (h - 1 - j, w - 1 - i),
                Orientation::Rotate270CW => (j, w - 1 - i),
            };
            let s = si * src_stride + sj * ch;
            let d = i * dst_stride + j * ch;
            out[d..d + ch].copy_from_slice(&src[s..s + ch]);
        }
    }

    data.replace(dst_w as u32, dst_h as u32, ch as u8, out);
    Ok(())
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    const ALL: [Orientation; 8] = [
        Orientation::Normal,
        Orientation::FlipHorizontal,
        Orientation::Rotate180,
        Orientation::FlipVertical,
        Orientation::Transpose,
        Orientation::Rotate90CW,
        Orientation::Transverse,
        Orientation::Rotate270CW,
    ];

    fn orientation_strategy() -> impl Strategy<Value = Orientation> {
        (0usize..8).prop_map(|i| ALL[i])
    }

    fn create_test_image(width: u32, height: u32, channels: u8) -> PixelBuffer {
        let mut pixels = Vec::new();
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    pixels.push(((y * width + x) as usize * channels as usize + c as usize) as u8);
                }
            }
        }
        PixelBuffer::new(width, height, channels, pixels).unwrap()
    }

    proptest! {
        /// Property: applying an orientation then its inverse restores the
        /// original pixels, dimensions, and stride.
        #[test]
        fn prop_inverse_round_trip(
            (width, height) in (1u32..=16, 1u32..=16),
            channels in prop::sample::select(vec![1u8, 3, 4]),
            orientation in orientation_strategy(),
        ) {
            let original = create_test_image(width, height, channels);
            let mut buf = original.clone();

            rotate_or_flip(&mut buf, orientation).unwrap();
            rotate_or_flip(&mut buf, orientation.inverse()).unwrap();

            prop_assert_eq!(buf.width(), original.width());
            prop_assert_eq!(buf.height(), original.height());
            prop_assert_eq!(buf.stride(), original.stride());
            prop_assert_eq!(buf.pixels(), original.pixels());
        }

        /// Property: the transform permutes pixels; the multiset of bytes is
        /// unchanged and the byte size never changes.
        #[test]
        fn prop_byte_size_preserved(
            (width, height) in (1u32..=16, 1u32..=16),
            orientation in orientation_strategy(),
        ) {
            let original = create_test_image(width, height, 3);
            let mut buf = original.clone();
            rotate_or_flip(&mut buf, orientation).unwrap();

            prop_assert_eq!(buf.byte_size(), original.byte_size());
            let mut a = buf.pixels().to_vec();
            let mut b = original.pixels().to_vec();
            a.sort_unstable();
            b.sort_unstable();
            prop_assert_eq!(a, b);
        }

        /// Property: dimension swap matches `swaps_dimensions`.
        #[test]
        fn prop_dimension_swap(
            (width, height) in (1u32..=16, 1u32..=16),
            orientation in orientation_strategy(),
        ) {
            let mut buf = create_test_image(width, height, 3);
            rotate_or_flip(&mut buf, orientation).unwrap();

            if orientation.swaps_dimensions() {
                prop_assert_eq!((buf.width(), buf.height()), (height, width));
            } else {
                prop_assert_eq!((buf.width(), buf.height()), (width, height));
            }
        }
    }
}
