//! Hand-rolled 24-bit BMP writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::buffer::PixelBuffer;
use crate::error::Error;

const HEADER_LEN: u32 = 54;
const RESOLUTION_72_DPI: i32 = 72;

/// Write a buffer as an uncompressed bottom-to-top 24-bit BMP.
///
/// Grayscale replicates into all three channels; a 4-channel buffer's
/// alpha byte is dropped. The buffer itself is never mutated.
pub fn encode_bmp<P: AsRef<Path>>(path: P, data: &PixelBuffer) -> Result<(), Error> {
    if data.is_empty() {
        return Err(Error::Format(
            "refusing to encode an empty buffer".to_string(),
        ));
    }

    super::write_or_remove(path.as_ref(), |path| {
        write_bmp(path, data).map_err(Error::Io)
    })
}

fn write_bmp(path: &Path, data: &PixelBuffer) -> std::io::Result<()> {
    let width = data.width();
    let height = data.height();
    let disk_stride = (width * 24 + 31) / 32 * 4;
    let image_size = disk_stride * height;

    let mut writer = BufWriter::new(File::create(path)?);

    // File header.
    writer.write_all(b"BM")?;
    writer.write_all(&(HEADER_LEN + image_size).to_le_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?;
    writer.write_all(&HEADER_LEN.to_le_bytes())?;

    // BITMAPINFOHEADER.
    writer.write_all(&40u32.to_le_bytes())?;
    writer.write_all(&(width as i32).to_le_bytes())?;
    writer.write_all(&(height as i32).to_le_bytes())?;
    writer.write_all(&1u16.to_le_bytes())?;
    writer.write_all(&24u16.to_le_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?;
    writer.write_all(&image_size.to_le_bytes())?;
    writer.write_all(&RESOLUTION_72_DPI.to_le_bytes())?;
    writer.write_all(&RESOLUTION_72_DPI.to_le_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?;
    writer.write_all(&0u32.to_le_bytes())?;

    let ch = data.channels() as usize;
    let padding = vec![0u8; (disk_stride - width * 3) as usize];
    for y in (0..height).rev() {
        let row = data.row(y);
        for px in row.chunks_exact(ch) {
            let bgr = match ch {
                1 => [px[0], px[0], px[0]],
                _ => [px[2], px[1], px[0]],
            };
            writer.write_all(&bgr)?;
        }
        writer.write_all(&padding)?;
    }
    writer.flush()
}
