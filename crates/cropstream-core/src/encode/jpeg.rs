//! JPEG writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;

use crate::alpha::flatten_alpha;
use crate::buffer::PixelBuffer;
use crate::decode::from_image;
use crate::error::Error;

/// Write a buffer as JPEG at its carried quality (clamped to 1-100).
///
/// 4-channel buffers are composited over white first, which mutates the
/// buffer in place to 3 channels. Empty buffers are refused.
pub fn encode_jpeg<P: AsRef<Path>>(path: P, data: &mut PixelBuffer) -> Result<(), Error> {
    if data.is_empty() {
        return Err(Error::Format(
            "refusing to encode an empty buffer".to_string(),
        ));
    }
    flatten_alpha(data)?;

    let color = match data.channels() {
        1 => ExtendedColorType::L8,
        3 => ExtendedColorType::Rgb8,
        other => {
            return Err(Error::Unsupported(format!(
                "{other}-channel jpeg output"
            )))
        }
    };
    let quality = data.quality.clamp(1, 100);
    log::debug!(
        "encoding {}x{} jpeg at quality {quality}",
        data.width(),
        data.height()
    );

    super::write_or_remove(path.as_ref(), |path| {
        let mut writer = BufWriter::new(File::create(path)?);
        JpegEncoder::new_with_quality(&mut writer, quality)
            .encode(data.pixels(), data.width(), data.height(), color)
            .map_err(from_image)?;
        writer.flush()?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode_whole;

    #[test]
    fn test_round_trip_flat_color() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.jpg");
        let mut buf = PixelBuffer::new(8, 8, 3, vec![128u8; 8 * 8 * 3]).unwrap();

        encode_jpeg(&path, &mut buf).unwrap();
        let back = decode_whole(&path).unwrap();
        assert_eq!((back.width(), back.height()), (8, 8));
        assert!(back.pixels().iter().all(|&b| (120..=136).contains(&b)));
    }

    #[test]
    fn test_alpha_composited_before_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.jpg");
        // Fully transparent red: composites to white.
        let mut buf = PixelBuffer::new(8, 8, 4, {
            let mut p = Vec::new();
            for _ in 0..64 {
                p.extend_from_slice(&[255, 0, 0, 0]);
            }
            p
        })
        .unwrap();

        encode_jpeg(&path, &mut buf).unwrap();
        assert_eq!(buf.channels(), 3);
        let back = decode_whole(&path).unwrap();
        assert!(back.pixels().iter().all(|&b| b >= 245));
    }

    #[test]
    fn test_grayscale_written_as_l8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.jpg");
        let mut buf = PixelBuffer::new(4, 4, 1, vec![60u8; 16]).unwrap();
        encode_jpeg(&path, &mut buf).unwrap();
        let back = decode_whole(&path).unwrap();
        assert_eq!(back.channels(), 3);
        assert!(back.pixels().iter().all(|&b| (52..=68).contains(&b)));
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jpg");
        let mut buf = PixelBuffer::new(0, 0, 3, vec![]).unwrap();
        assert!(matches!(
            encode_jpeg(&path, &mut buf),
            Err(Error::Format(_))
        ));
        assert!(!path.exists());
    }
}
