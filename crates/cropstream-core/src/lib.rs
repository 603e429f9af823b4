//! Raster image toolkit: decode, crop, downsample, reorient, and re-encode
//! JPEG, PNG, BMP, and GIF files.
//!
//! The core operation is [`decode_region`]: it sniffs the container, maps
//! the requested crop rectangle back through the EXIF orientation, streams
//! rows through a fused crop + bilinear-downsample scan, and finally applies
//! the orientation transform. The result is a [`PixelBuffer`] that the
//! encode side writes back out, compositing any alpha over white.

pub mod alpha;
pub mod buffer;
pub mod decode;
pub mod encode;
pub mod error;
pub mod resize;
pub mod transform;

pub use alpha::flatten_alpha;
pub use buffer::{PixelBuffer, SourceFormat, DEFAULT_QUALITY};
pub use decode::{decode_region, decode_whole, jpeg_orientation, sniff_format};
pub use encode::{encode, encode_bmp, encode_jpeg, encode_png};
pub use error::Error;
pub use resize::{compress_strategy, ResizePolicy, DEFAULT_MIN_EDGE, MAX_OUTPUT_PIXELS};
pub use transform::{map_crop_area, rotate_or_flip, CropRegion, Orientation};
