//! Streaming scan driver: fused crop + bilinear downsample over row sources.
//!
//! The driver pulls rows from a [`RowSource`] strictly top to bottom and
//! never holds more than two full source rows at once. Cropping happens by
//! skipping leading rows and slicing columns out of each delivered row;
//! scaling interpolates between the two buffered rows, so a single pass
//! over the source produces the final target buffer.

use crate::buffer::PixelBuffer;
use crate::decode::RowSource;
use crate::error::Error;
use crate::transform::CropRegion;

/// Allocate a row-sized scratch buffer, reporting failure as an error.
fn alloc_row(len: usize) -> Result<Vec<u8>, Error> {
    let mut row = Vec::new();
    row.try_reserve_exact(len)
        .map_err(|_| Error::OutOfMemory(len))?;
    row.resize(len, 0);
    Ok(row)
}

/// Scan `area` out of the source, resampling it to `out_w` x `out_h`.
///
/// `area` must lie inside the source grid and the output dimensions must
/// not exceed the area's. Grayscale sources are promoted to RGB on the way
/// out; 3- and 4-channel sources keep their channel count. When `out_w`
/// equals the area width the scan degenerates to a plain windowed copy and
/// `out_h` must equal the area height.
pub(crate) fn scan_region<S: RowSource>(
    src: &mut S,
    area: CropRegion,
    out_w: u32,
    out_h: u32,
) -> Result<PixelBuffer, Error> {
    debug_assert!(area.x + area.w <= src.width() && area.y + area.h <= src.height());
    debug_assert!(out_w >= 1 && out_w <= area.w && out_h >= 1 && out_h <= area.h);

    let src_ch = src.channels() as usize;
    let out_ch = if src_ch == 1 { 3 } else { src.channels() };
    let row_len = src.width() as usize * src_ch;
    let x0 = area.x as usize * src_ch;

    let mut out = PixelBuffer::alloc(out_w, out_h, out_ch)?;
    let mut base = alloc_row(row_len)?;
    src.skip_rows(area.y, &mut base)?;

    if out_w == area.w {
        // Unscaled: a plain windowed copy, one source row per output row.
        debug_assert_eq!(out_h, area.h);
        for i in 0..out_h {
            src.next_row(&mut base)?;
            let window = &base[x0..x0 + area.w as usize * src_ch];
            let dst = out.row_mut(i);
            if src_ch == 1 {
                for (d, &v) in dst.chunks_exact_mut(3).zip(window) {
                    d.fill(v);
                }
            } else {
                dst.copy_from_slice(window);
            }
        }
        return Ok(out);
    }

    let scale = out_w as f32 / area.w as f32;
    let h = area.h;
    let mut next = alloc_row(row_len)?;
    // Source rows consumed past the crop top. `base` holds row
    // `current_line - 2` and `next` holds row `current_line - 1` whenever
    // both are loaded.
    let mut current_line: u32 = 0;

    for i in 0..out_h {
        let fy = (i as f32 + 1.0) / scale - 1.0;
        let iyf = fy.trunc();
        let iy = (iyf as i64).clamp(0, i64::from(h) - 1) as u32;

        if iy != h - 1 {
            if current_line <= iy {
                while current_line <= iy {
                    src.next_row(&mut base)?;
                    current_line += 1;
                }
                src.next_row(&mut next)?;
                current_line += 1;
            } else if current_line == iy + 1 {
                std::mem::swap(&mut base, &mut next);
                src.next_row(&mut next)?;
                current_line += 1;
            }
            // current_line == iy + 2: both rows already buffered.
        } else {
            if current_line <= iy {
                while current_line <= iy {
                    src.next_row(&mut base)?;
                    current_line += 1;
                }
            } else {
                std::mem::swap(&mut base, &mut next);
            }
            // No row below the last one: interpolate against itself.
            next.copy_from_slice(&base);
        }

        let wy1 = fy - iyf;
        let wy0 = iyf + 1.0 - fy;
        let dst = out.row_mut(i);

        for j in 0..out_w as usize {
            let fx = (j as f32 + 1.0) / scale - 1.0;
            let ixf = fx.trunc();
            let ix = (ixf as i64).clamp(0, i64::from(area.w) - 1) as usize;
            let ix1 = (ix + 1).min(area.w as usize - 1);
            let wx1 = fx - ixf;
            let wx0 = ixf + 1.0 - fx;
            let c0 = x0 + ix * src_ch;
            let c1 = x0 + ix1 * src_ch;

            for c in 0..src_ch {
                let v = f32::from(base[c0 + c]) * wx0 * wy0
                    + f32::from(base[c1 + c]) * wx1 * wy0
                    + f32::from(next[c0 + c]) * wx0 * wy1
                    + f32::from(next[c1 + c]) * wx1 * wy1;
                let v = (v as i32).clamp(0, 255) as u8;
                if src_ch == 1 {
                    dst[j * 3..j * 3 + 3].fill(v);
                } else {
                    dst[j * src_ch + c] = v;
                }
            }
        }
    }

    Ok(out)
}
