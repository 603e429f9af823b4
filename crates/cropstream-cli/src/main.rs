//! Command-line front end: decode one region of an image and write it back
//! out in the requested container.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cropstream_core::{
    compress_strategy, decode_region, encode_bmp, encode_jpeg, encode_png, jpeg_orientation,
    sniff_format, CropRegion, Error, Orientation, ResizePolicy, SourceFormat, DEFAULT_MIN_EDGE,
};

#[derive(Parser, Debug)]
#[command(
    name = "cropstream",
    about = "Crop, downsample, and reorient jpeg/png/bmp/gif images"
)]
struct Args {
    /// Input image (jpeg, png, bmp, or gif; format is sniffed, not assumed
    /// from the extension).
    input: PathBuf,

    /// Output file; a .png or .bmp extension picks that writer, anything
    /// else writes jpeg.
    output: PathBuf,

    /// Crop rectangle in final (orientation-corrected) space.
    #[arg(long, num_args = 4, value_names = ["X", "Y", "W", "H"])]
    crop: Option<Vec<u32>>,

    /// EXIF orientation code 1-8. Defaults to the input's own tag for jpeg
    /// and to 1 (normal) otherwise.
    #[arg(long)]
    orientation: Option<u32>,

    /// Shorter-edge target for the downsample policy.
    #[arg(long, default_value_t = DEFAULT_MIN_EDGE)]
    min_edge: u32,

    /// Decode at full resolution, ignoring --min-edge.
    #[arg(long)]
    no_resize: bool,

    /// JPEG quality (1-100).
    #[arg(long)]
    quality: Option<u8>,
}

fn run(args: &Args) -> Result<(), Error> {
    let region = match &args.crop {
        Some(v) => CropRegion::new(v[0], v[1], v[2], v[3]),
        None => CropRegion::FULL,
    };

    let orientation = match args.orientation {
        Some(code) => Orientation::from(code),
        None if sniff_format(&args.input)? == SourceFormat::Jpeg => jpeg_orientation(&args.input),
        None => Orientation::Normal,
    };

    let policy: Option<ResizePolicy> = if args.no_resize {
        None
    } else {
        Some(compress_strategy)
    };

    let mut image = decode_region(&args.input, policy, args.min_edge, region, orientation)?;
    if let Some(quality) = args.quality {
        image.quality = quality;
    }

    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("png") => encode_png(&args.output, &mut image),
        Some("bmp") => encode_bmp(&args.output, &image),
        _ => encode_jpeg(&args.output, &mut image),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err}");
            eprintln!("cropstream: {err}");
            ExitCode::FAILURE
        }
    }
}
