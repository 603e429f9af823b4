//! Error type shared across decode, transform, and encode operations.

use thiserror::Error;

/// Errors reported by any cropstream operation.
///
/// Every failure is surfaced as a returned value at the call boundary that
/// detected it; backend callbacks never unwind past caller-owned resources.
#[derive(Debug, Error)]
pub enum Error {
    /// Open/read/write/seek failure on the underlying file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad magic bytes, malformed header, or truncated stream.
    #[error("invalid image data: {0}")]
    Format(String),

    /// Well-formed file using a feature this toolkit does not handle.
    #[error("unsupported feature: {0}")]
    Unsupported(String),

    /// Pixel allocation failure.
    #[error("out of memory allocating {0} bytes")]
    OutOfMemory(usize),

    /// Failure reported by a codec backend.
    #[error("codec error: {0}")]
    Codec(String),
}
