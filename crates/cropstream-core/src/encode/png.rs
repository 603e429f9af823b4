//! PNG writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::alpha::flatten_alpha;
use crate::buffer::PixelBuffer;
use crate::decode::from_image;
use crate::error::Error;

/// Write a buffer as PNG. Alpha is composited over white first; the output
/// is always 1- or 3-channel so every container in the toolkit can hold it.
pub fn encode_png<P: AsRef<Path>>(path: P, data: &mut PixelBuffer) -> Result<(), Error> {
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
                "{other}-channel png output"
            )))
        }
    };

    super::write_or_remove(path.as_ref(), |path| {
        let mut writer = BufWriter::new(File::create(path)?);
        PngEncoder::new(&mut writer)
            .write_image(data.pixels(), data.width(), data.height(), color)
            .map_err(from_image)?;
        writer.flush()?;
        Ok(())
    })
}
