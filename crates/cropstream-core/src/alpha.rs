//! Alpha compositing against a white backdrop.

use crate::buffer::PixelBuffer;
use crate::error::Error;

/// Composite a 4-channel buffer over white, producing a 3-channel buffer.
///
/// Each output channel is `255 - (255 - c) * a / 255` with integer
/// truncation: fully opaque pixels keep their color, fully transparent
/// pixels become white, and alpha 0x80 maps channel 0 to 127. Buffers that
/// are not 4-channel (or are empty) pass through unchanged. The only
/// failure is allocation of the replacement storage.
pub fn flatten_alpha(data: &mut PixelBuffer) -> Result<(), Error> {
    if data.channels() != 4 || data.is_empty() {
        return Ok(());
    }

    let width = data.width();
    let height = data.height();
    let size = width as usize * height as usize * 3;
    let mut out = Vec::new();
    out.try_reserve_exact(size)
        .map_err(|_| Error::OutOfMemory(size))?;
    out.resize(size, 0);

    for (src, dst) in data
        .pixels()
        .chunks_exact(4)
        .zip(out.chunks_exact_mut(3))
    {
        let a = u16::from(src[3]);
        for c in 0..3 {
            let v = u16::from(src[c]);
            dst[c] = (255 - (255 - v) * a / 255) as u8;
        }
    }

    data.replace(width, height, 3, out);
    Ok(())
}
