//! Row adapter over a fully decoded frame.
//!
//! JPEG and GIF backends hand back a complete frame in one call; this
//! adapter replays it row by row so the scan driver sees the same contract
//! as the genuinely streaming sources.

use crate::decode::RowSource;
use crate::error::Error;

pub(crate) struct FrameRows {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Vec<u8>,
    cursor: u32,
}

impl FrameRows {
    pub(crate) fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Result<Self, Error> {
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(Error::Format(format!(
                "decoded frame is {} bytes, geometry requires {expected}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            channels,
            pixels,
            cursor: 0,
        })
    }

    fn stride(&self) -> usize {
        self.width as usize * self.channels as usize
    }
}

impl RowSource for FrameRows {
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
                "row requested past the end of the frame".to_string(),
            ));
        }
        let stride = self.stride();
        let start = self.cursor as usize * stride;
        buf[..stride].copy_from_slice(&self.pixels[start..start + stride]);
        self.cursor += 1;
        Ok(())
    }

    // The frame is already in memory, skipping is a cursor bump.
    fn skip_rows(&mut self, n: u32, _scratch: &mut [u8]) -> Result<(), Error> {
        self.cursor = self.cursor.saturating_add(n).min(self.height);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_replayed_in_order() {
        let mut rows = FrameRows::new(2, 2, 1, vec![1, 2, 3, 4]).unwrap();
        let mut buf = [0u8; 2];
        rows.next_row(&mut buf).unwrap();
        assert_eq!(buf, [1, 2]);
        rows.next_row(&mut buf).unwrap();
        assert_eq!(buf, [3, 4]);
        assert!(rows.next_row(&mut buf).is_err());
    }

    #[test]
    fn test_skip_advances_without_reading() {
        let mut rows = FrameRows::new(1, 3, 1, vec![7, 8, 9]).unwrap();
        let mut buf = [0u8; 1];
        rows.skip_rows(2, &mut buf).unwrap();
        rows.next_row(&mut buf).unwrap();
        assert_eq!(buf, [9]);
    }

    #[test]
    fn test_rejects_length_mismatch() {
        assert!(matches!(
            FrameRows::new(2, 2, 3, vec![0u8; 5]),
            Err(Error::Format(_))
        ));
    }
}
