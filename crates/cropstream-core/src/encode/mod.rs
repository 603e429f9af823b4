//! Encode pipeline: composite alpha away, then write JPEG, PNG, or BMP.
//!
//! Every writer shares one failure contract: a file that cannot be written
//! completely is deleted, so callers never observe a truncated image at the
//! target path.

mod bmp;
mod jpeg;
mod png;

pub use bmp::encode_bmp;
pub use jpeg::encode_jpeg;
pub use png::encode_png;

use std::path::Path;

use crate::buffer::PixelBuffer;
use crate::error::Error;

/// Write a buffer through the unified output path.
///
/// Output is always JPEG at the buffer's carried quality, regardless of the
/// container the pixels were decoded from.
pub fn encode<P: AsRef<Path>>(path: P, data: &mut PixelBuffer) -> Result<(), Error> {
    encode_jpeg(path, data)
}

/// Run a writer and delete the target file if it fails partway.
fn write_or_remove<F>(path: &Path, write: F) -> Result<(), Error>
where
    F: FnOnce(&Path) -> Result<(), Error>,
{
    let result = write(path);
    if result.is_err() {
        let _ = std::fs::remove_file(path);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::SourceFormat;
    use crate::decode::{decode_whole, sniff_format};

    #[test]
    fn test_unified_encode_writes_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let mut buf = PixelBuffer::new(4, 4, 3, vec![200u8; 48]).unwrap();
        buf.format = SourceFormat::Png;

        encode(&path, &mut buf).unwrap();
        assert_eq!(sniff_format(&path).unwrap(), SourceFormat::Jpeg);
        let back = decode_whole(&path).unwrap();
        assert_eq!((back.width(), back.height()), (4, 4));
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let mut empty = PixelBuffer::new(0, 0, 3, vec![]).unwrap();
        assert!(encode(&path, &mut empty).is_err());
        assert!(!path.exists());
    }
}
