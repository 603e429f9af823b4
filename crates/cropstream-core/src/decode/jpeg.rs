//! JPEG decode backend and EXIF orientation probe.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use image::codecs::jpeg::JpegDecoder;
use image::{ColorType, ImageDecoder};

use crate::decode::frame::FrameRows;
use crate::decode::from_image;
use crate::error::Error;
use crate::transform::Orientation;

/// Decode a JPEG into a row adapter. Grayscale stays 1-channel here; the
/// scan driver promotes it on the way out.
pub(crate) fn open_jpeg(file: File) -> Result<FrameRows, Error> {
    let decoder = JpegDecoder::new(BufReader::new(file)).map_err(from_image)?;
    let (width, height) = decoder.dimensions();
    let channels = match decoder.color_type() {
        ColorType::L8 => 1,
        ColorType::Rgb8 => 3,
        other => {
            return Err(Error::Unsupported(format!(
                "jpeg color type {other:?}"
            )))
        }
    };

    let size = decoder.total_bytes() as usize;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(size)
        .map_err(|_| Error::OutOfMemory(size))?;
    pixels.resize(size, 0);
    decoder.read_image(&mut pixels).map_err(from_image)?;

    FrameRows::new(width, height, channels, pixels)
}

/// Read the EXIF orientation tag from a JPEG file.
///
/// Missing file, missing EXIF segment, missing tag, and out-of-range values
/// all collapse to [`Orientation::Normal`]; orientation is advisory and
/// never fails a decode.
pub fn jpeg_orientation<P: AsRef<Path>>(path: P) -> Orientation {
    fn tag_value(path: &Path) -> Option<u32> {
        let file = File::open(path).ok()?;
        let mut reader = BufReader::new(file);
        let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
        let field = exif.get_field(exif::Tag::Orientation, exif::In::PRIMARY)?;
        field.value.get_uint(0)
    }

    match tag_value(path.as_ref()) {
        Some(code) => Orientation::from(code),
        None => Orientation::Normal,
    }
}
