//! GIF decode backend: first frame only, always RGBA.

use std::fs::File;
use std::io::BufReader;

use image::codecs::gif::GifDecoder;
use image::ImageDecoder;

use crate::decode::frame::FrameRows;
use crate::decode::from_image;
use crate::error::Error;

/// Decode the first frame of a GIF into a row adapter. The palette is
/// resolved to RGBA so transparency survives until the encode side
/// composites it away.
pub(crate) fn open_gif(file: File) -> Result<FrameRows, Error> {
    let decoder = GifDecoder::new(BufReader::new(file)).map_err(from_image)?;
    let (width, height) = decoder.dimensions();

    let size = decoder.total_bytes() as usize;
    let mut pixels = Vec::new();
    pixels
        .try_reserve_exact(size)
        .map_err(|_| Error::OutOfMemory(size))?;
    pixels.resize(size, 0);
    decoder.read_image(&mut pixels).map_err(from_image)?;

    FrameRows::new(width, height, 4, pixels)
}
