//! Resizers backed by `image::imageops`

use image::imageops::FilterType;
use image::DynamicImage;

use crate::error::Result;
use crate::processing::Resampler;
use crate::registry::{ResizerDescriptor, ResizerRegistry};

pub const LIBRARY: &str = "image";
pub const URL: &str = "github.com/image-rs/image";

/// `DynamicImage::resize_exact` with a fixed filter
#[derive(Debug, Clone, Copy)]
pub struct ImageOpsResizer {
    filter: FilterType,
}

impl ImageOpsResizer {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Resampler for ImageOpsResizer {
    fn resample(&self, image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
        Ok(image.resize_exact(width, height, self.filter))
    }
}

/// Register the `image` crate filters
pub fn register(registry: &mut ResizerRegistry) -> Result<()> {
    let filters = [
        ("bilinear", FilterType::Triangle),
        ("CatmullRom", FilterType::CatmullRom),
        ("gaussian", FilterType::Gaussian),
        ("lanczos3", FilterType::Lanczos3),
    ];

    registry.register(filters.into_iter().map(|(filter, kernel)| {
        ResizerDescriptor::new(
            format!("{}__{}", LIBRARY, filter),
            LIBRARY,
            URL,
            filter,
            ImageOpsResizer::new(kernel),
        )
    }))
}
