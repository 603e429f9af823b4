//! Decode pipeline: sniff the container, stream rows through the fused
//! crop + downsample driver, then apply the orientation transform.

mod bmp;
mod driver;
mod frame;
mod gif;
mod jpeg;
mod png;

pub use jpeg::jpeg_orientation;

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::buffer::{PixelBuffer, SourceFormat};
use crate::error::Error;
use crate::resize::ResizePolicy;
use crate::transform::{map_crop_area, rotate_or_flip, CropRegion, Orientation};

/// Top-to-bottom row delivery, the contract every decode backend adapts to.
///
/// `next_row` fills the first `width * channels` bytes of `buf` with the
/// next row and may be called at most `height` times. `skip_rows` discards
/// rows; backends that can advance without decoding override it.
pub(crate) trait RowSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn channels(&self) -> u8;
    fn next_row(&mut self, buf: &mut [u8]) -> Result<(), Error>;

    fn skip_rows(&mut self, n: u32, scratch: &mut [u8]) -> Result<(), Error> {
        for _ in 0..n {
            self.next_row(scratch)?;
        }
        Ok(())
    }
}

/// Map an `image` crate failure onto ours.
pub(crate) fn from_image(err: image::ImageError) -> Error {
    match err {
        image::ImageError::IoError(e) => Error::Io(e),
        image::ImageError::Decoding(d) => Error::Format(d.to_string()),
        image::ImageError::Unsupported(u) => Error::Unsupported(u.to_string()),
        other => Error::Codec(other.to_string()),
    }
}

/// Identify the container format of a file by its magic bytes.
///
/// Returns [`SourceFormat::Unspecified`] for anything unrecognized; only
/// I/O failures are errors.
pub fn sniff_format<P: AsRef<Path>>(path: P) -> Result<SourceFormat, Error> {
    let mut file = File::open(path.as_ref())?;
    sniff_reader(&mut file)
}

/// Sniff an open file and rewind it to the start.
fn sniff_reader(file: &mut File) -> Result<SourceFormat, Error> {
    let mut magic = [0u8; 4];
    let mut filled = 0;
    while filled < magic.len() {
        let n = file.read(&mut magic[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    file.seek(SeekFrom::Start(0))?;

    let format = match &magic[..filled] {
        [0xFF, 0xD8, ..] => SourceFormat::Jpeg,
        [0x89, b'P', b'N', b'G'] => SourceFormat::Png,
        [b'B', b'M', ..] => SourceFormat::Bmp,
        [b'G', b'I', b'F', _] => SourceFormat::Gif,
        _ => SourceFormat::Unspecified,
    };
    Ok(format)
}

/// Decode one region of an image, downsampled and orientation-corrected.
///
/// `region` and `orientation` are interpreted in final visual space: the
/// crop rectangle describes the picture the caller will see after the
/// orientation transform has run. A degenerate `region` (see
/// [`CropRegion::FULL`]) selects the whole image. `policy` decides the
/// target size from the cropped dimensions; `None`, or a `min_edge` of
/// zero, decodes at full resolution.
///
/// The returned buffer carries the detected [`SourceFormat`] and the
/// default encode quality.
pub fn decode_region<P: AsRef<Path>>(
    path: P,
    policy: Option<ResizePolicy>,
    min_edge: u32,
    region: CropRegion,
    orientation: Orientation,
) -> Result<PixelBuffer, Error> {
    let mut file = File::open(path.as_ref())?;
    let format = sniff_reader(&mut file)?;
    log::debug!(
        "decoding {:?} as {format:?}, region {region:?}, orientation {orientation:?}",
        path.as_ref()
    );

    let policy = if min_edge == 0 { None } else { policy };
    let mut out = match format {
        SourceFormat::Jpeg => {
            scan_with(&mut jpeg::open_jpeg(file)?, policy, min_edge, region, orientation)
        }
        SourceFormat::Png => {
            scan_with(&mut png::open_png(file)?, policy, min_edge, region, orientation)
        }
        SourceFormat::Bmp => {
            scan_with(&mut bmp::open_bmp(file)?, policy, min_edge, region, orientation)
        }
        SourceFormat::Gif => {
            scan_with(&mut gif::open_gif(file)?, policy, min_edge, region, orientation)
        }
        SourceFormat::Unspecified => {
            Err(Error::Format("unrecognized image format".to_string()))
        }
    }?;

    out.format = format;
    rotate_or_flip(&mut out, orientation)?;
    Ok(out)
}

/// Decode a whole image at full resolution, no orientation correction.
pub fn decode_whole<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, Error> {
    decode_region(path, None, 0, CropRegion::FULL, Orientation::Normal)
}

fn scan_with<S: RowSource>(
    src: &mut S,
    policy: Option<ResizePolicy>,
    min_edge: u32,
    region: CropRegion,
    orientation: Orientation,
) -> Result<PixelBuffer, Error> {
    if src.width() == 0 || src.height() == 0 {
        return Err(Error::Format("image has a zero dimension".to_string()));
    }

    let area = map_crop_area(src.width(), src.height(), region, orientation);
    let (mut out_w, mut out_h) = match policy {
        Some(policy) => policy(area.w, area.h, min_edge),
        None => (area.w, area.h),
    };
    out_w = out_w.clamp(1, area.w);
    out_h = out_h.clamp(1, area.h);
    if out_w == area.w {
        // No horizontal scaling means no scaling at all; policies preserve
        // aspect ratio, so force the exact window height.
        out_h = area.h;
    }

    driver::scan_region(src, area, out_w, out_h)
}
