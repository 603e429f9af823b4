//! Geometric transforms: orientation normalization and crop-region mapping.

mod crop;
mod orientation;

pub use crop::{map_crop_area, CropRegion};
pub use orientation::{rotate_or_flip, Orientation};
