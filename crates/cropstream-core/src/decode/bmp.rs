//! Hand-rolled BMP reader for uncompressed 24/32-bit files.
//!
//! BMP stores rows bottom to top with each disk row padded to a 4-byte
//! boundary. The reader seeks per row, which turns the row-source contract
//! (top to bottom) into the disk order for free, and makes `skip_rows` a
//! pure cursor move with no I/O at all.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};

use crate::decode::RowSource;
use crate::error::Error;

const HEADER_LEN: usize = 54;

fn read_u16_le(header: &[u8], at: usize) -> u16 {
    u16::from_le_bytes([header[at], header[at + 1]])
}

fn read_u32_le(header: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([header[at], header[at + 1], header[at + 2], header[at + 3]])
}

fn read_i32_le(header: &[u8], at: usize) -> i32 {
    read_u32_le(header, at) as i32
}

pub(crate) struct BmpRows {
    file: File,
    data_offset: u64,
    disk_stride: u64,
    width: u32,
    height: u32,
    channels: u8,
    cursor: u32,
    raw: Vec<u8>,
}

/// Parse the 54-byte file + info header and position for row reads.
pub(crate) fn open_bmp(mut file: File) -> Result<BmpRows, Error> {
    let mut header = [0u8; HEADER_LEN];
    file.read_exact(&mut header).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::Format("truncated bmp header".to_string())
        } else {
            Error::Io(e)
        }
    })?;

    if &header[0..2] != b"BM" {
        return Err(Error::Format("bad bmp magic".to_string()));
    }

    let data_offset = read_u32_le(&header, 10);
    let width = read_i32_le(&header, 18);
    let height = read_i32_le(&header, 22);
    let bpp = read_u16_le(&header, 28);
    let compression = read_u32_le(&header, 30);

    if compression != 0 {
        return Err(Error::Unsupported(format!(
            "bmp compression method {compression}"
        )));
    }
    if width <= 0 || height == 0 {
        return Err(Error::Format(format!(
            "bmp dimensions {width}x{height}"
        )));
    }
    if height < 0 {
        return Err(Error::Unsupported("top-down bmp".to_string()));
    }

    let (channels, disk_stride) = match bpp {
        24 => (3u8, u64::from((width as u32 * 24 + 31) / 32 * 4)),
        32 => (4u8, u64::from(width as u32) * 4),
        other => return Err(Error::Unsupported(format!("{other}-bit bmp"))),
    };

    let width = width as u32;
    let height = height as u32;
    let row_len = width as usize * channels as usize;
    let mut raw = Vec::new();
    raw.try_reserve_exact(row_len)
        .map_err(|_| Error::OutOfMemory(row_len))?;
    raw.resize(row_len, 0);

    Ok(BmpRows {
        file,
        data_offset: u64::from(data_offset),
        disk_stride,
        width,
        height,
        channels,
        cursor: 0,
        raw,
    })
}

impl RowSource for BmpRows {
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
        if self.cursor >= self.height {
            return Err(Error::Format(
                "row requested past the end of the bmp".to_string(),
            ));
        }
        // Top-to-bottom row `cursor` lives at disk row `height - 1 - cursor`.
        let disk_row = u64::from(self.height - 1 - self.cursor);
        self.file
            .seek(SeekFrom::Start(self.data_offset + disk_row * self.disk_stride))?;
        self.file.read_exact(&mut self.raw).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                Error::Format("truncated bmp pixel data".to_string())
            } else {
                Error::Io(e)
            }
        })?;

        let ch = self.channels as usize;
        for (src, dst) in self.raw.chunks_exact(ch).zip(buf.chunks_exact_mut(ch)) {
            dst[0] = src[2];
            dst[1] = src[1];
            dst[2] = src[0];
            if ch == 4 {
                dst[3] = src[3];
            }
        }
        self.cursor += 1;
        Ok(())
    }

    // Seek-per-row reads make skipping free.
    fn skip_rows(&mut self, n: u32, _scratch: &mut [u8]) -> Result<(), Error> {
        self.cursor = self.cursor.saturating_add(n).min(self.height);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn header(data_offset: u32, width: i32, height: i32, bpp: u16, compression: u32) -> Vec<u8> {
        let mut h = vec![0u8; HEADER_LEN];
        h[0] = b'B';
        h[1] = b'M';
        h[10..14].copy_from_slice(&data_offset.to_le_bytes());
        h[14..18].copy_from_slice(&40u32.to_le_bytes());
        h[18..22].copy_from_slice(&width.to_le_bytes());
        h[22..26].copy_from_slice(&height.to_le_bytes());
        h[26..28].copy_from_slice(&1u16.to_le_bytes());
        h[28..30].copy_from_slice(&bpp.to_le_bytes());
        h[30..34].copy_from_slice(&compression.to_le_bytes());
        h
    }

    fn write_temp(bytes: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(bytes).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_reads_24bpp_rows_top_to_bottom() {
        // 2x2, stride 8 (6 pixel bytes + 2 padding). Disk rows are stored
        // bottom first in BGR.
        let mut bytes = header(54, 2, 2, 24, 0);
        // Disk row 0 = image bottom row: pixels (B,G,R).
        bytes.extend_from_slice(&[1, 2, 3, 4, 5, 6, 0, 0]);
        // Disk row 1 = image top row.
        bytes.extend_from_slice(&[7, 8, 9, 10, 11, 12, 0, 0]);
        let file = write_temp(&bytes);

        let mut rows = open_bmp(file.reopen().unwrap()).unwrap();
        assert_eq!(rows.width(), 2);
        assert_eq!(rows.height(), 2);
        assert_eq!(rows.channels(), 3);

        let mut buf = [0u8; 6];
        rows.next_row(&mut buf).unwrap();
        assert_eq!(buf, [9, 8, 7, 12, 11, 10]);
        rows.next_row(&mut buf).unwrap();
        assert_eq!(buf, [3, 2, 1, 6, 5, 4]);
    }

    #[test]
    fn test_reads_32bpp_with_alpha() {
        let mut bytes = header(54, 1, 1, 32, 0);
        bytes.extend_from_slice(&[1, 2, 3, 200]);
        let file = write_temp(&bytes);

        let mut rows = open_bmp(file.reopen().unwrap()).unwrap();
        assert_eq!(rows.channels(), 4);
        let mut buf = [0u8; 4];
        rows.next_row(&mut buf).unwrap();
        assert_eq!(buf, [3, 2, 1, 200]);
    }

    #[test]
    fn test_skip_rows_costs_no_reads() {
        let mut bytes = header(54, 1, 3, 24, 0);
        for v in [30u8, 20, 10] {
            bytes.extend_from_slice(&[v, v, v, 0]);
        }
        let file = write_temp(&bytes);

        let mut rows = open_bmp(file.reopen().unwrap()).unwrap();
        let mut scratch = [0u8; 3];
        rows.skip_rows(2, &mut scratch).unwrap();
        let mut buf = [0u8; 3];
        rows.next_row(&mut buf).unwrap();
        // Image bottom row = disk row 0 = value 30.
        assert_eq!(buf, [30, 30, 30]);
    }

    #[test]
    fn test_rejects_bad_magic() {
        let mut bytes = header(54, 1, 1, 24, 0);
        bytes[0] = b'X';
        let file = write_temp(&bytes);
        assert!(matches!(
            open_bmp(file.reopen().unwrap()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_rejects_truncated_header() {
        let file = write_temp(b"BM\x00\x00");
        assert!(matches!(
            open_bmp(file.reopen().unwrap()),
            Err(Error::Format(_))
        ));
    }

    #[test]
    fn test_rejects_compression() {
        let file = write_temp(&header(54, 1, 1, 24, 1));
        assert!(matches!(
            open_bmp(file.reopen().unwrap()),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_rejects_16bpp() {
        let file = write_temp(&header(54, 1, 1, 16, 0));
        assert!(matches!(
            open_bmp(file.reopen().unwrap()),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_rejects_top_down() {
        let file = write_temp(&header(54, 1, -1, 24, 0));
        assert!(matches!(
            open_bmp(file.reopen().unwrap()),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_rejects_truncated_pixels() {
        let mut bytes = header(54, 2, 2, 24, 0);
        bytes.extend_from_slice(&[1, 2, 3]);
        let file = write_temp(&bytes);
        let mut rows = open_bmp(file.reopen().unwrap()).unwrap();
        let mut buf = [0u8; 6];
        assert!(matches!(rows.next_row(&mut buf), Err(Error::Format(_))));
    }
}
