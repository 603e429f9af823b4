//! Streaming PNG decode backend.
//!
//! PNG is the one format whose backend genuinely streams: rows come off the
//! inflate stream one at a time, so a cropped decode never materializes the
//! full frame.

use std::fs::File;
use std::io::BufReader;

use crate::decode::RowSource;
use crate::error::Error;

pub(crate) struct PngRows {
    reader: png::Reader<BufReader<File>>,
    width: u32,
    height: u32,
    channels: u8,
}

fn from_png(err: png::DecodingError) -> Error {
    match err {
        png::DecodingError::IoError(e) => Error::Io(e),
        png::DecodingError::Format(f) => Error::Format(f.to_string()),
        other => Error::Codec(other.to_string()),
    }
}

/// Open a PNG for row-at-a-time decoding.
///
/// Palette and sub-byte images are expanded to 8-bit, 16-bit channels are
/// narrowed. Interlaced files would deliver rows out of order and are
/// rejected, as is the 2-channel grayscale-with-alpha layout.
pub(crate) fn open_png(file: File) -> Result<PngRows, Error> {
    let mut decoder = png::Decoder::new(BufReader::new(file));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let reader = decoder.read_info().map_err(from_png)?;

    let info = reader.info();
    if info.interlaced {
        return Err(Error::Unsupported("interlaced png".to_string()));
    }
    let (width, height) = (info.width, info.height);

    let (color, _depth) = reader.output_color_type();
    let channels = match color {
        png::ColorType::Grayscale => 1,
        png::ColorType::Rgb => 3,
        png::ColorType::Rgba => 4,
        png::ColorType::GrayscaleAlpha => {
            return Err(Error::Unsupported(
                "2-channel grayscale-alpha png".to_string(),
            ))
        }
        // normalize_to_color8 expands palettes before we get here.
        png::ColorType::Indexed => {
            return Err(Error::Format("palette png not expanded".to_string()))
        }
    };

    Ok(PngRows {
        reader,
        width,
        height,
        channels,
    })
}

impl RowSource for PngRows {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn channels(&self) -> u8 {
        self.channels
    }

    fn next_row(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        match self.reader.next_row().map_err(from_png)? {
            Some(row) => {
                let data = row.data();
                buf[..data.len()].copy_from_slice(data);
                Ok(())
            }
            None => Err(Error::Format(
                "png ended before its declared height".to_string(),
            )),
        }
    }
}
