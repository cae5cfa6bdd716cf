//! Resizers backed by `fast_image_resize`
//!
//! These adapters hand the decoder's packed RGB buffer straight to the
//! SIMD convolution without converting it first. Inputs decoded to any other
//! layout are rejected.

use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbImage};

use crate::error::{BenchError, Result};
use crate::processing::Resampler;
use crate::registry::{ResizerDescriptor, ResizerRegistry};

pub const LIBRARY: &str = "fast_image_resize";
pub const URL: &str = "github.com/cykooz/fast_image_resize";

/// Names are prefixed with this short alias instead of the crate name
pub const PREFIX: &str = "fir";

#[derive(Debug, Clone, Copy)]
pub struct FirResizer {
    filter: FilterType,
}

impl FirResizer {
    pub fn new(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Resampler for FirResizer {
    fn resample(&self, image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
        let DynamicImage::ImageRgb8(source) = image else {
            return Err(BenchError::unsupported_color_layout(format!(
                "{:?} (fast_image_resize adapters need packed RGB8)",
                image.color()
            )));
        };

        let src_image = Image::from_vec_u8(
            source.width(),
            source.height(),
            source.as_raw().clone(),
            PixelType::U8x3,
        )
        .map_err(|e| BenchError::resample(e.to_string()))?;
        let mut dst_image = Image::new(width, height, PixelType::U8x3);

        let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(self.filter));
        Resizer::new()
            .resize(&src_image, &mut dst_image, &options)
            .map_err(|e| BenchError::resample(e.to_string()))?;

        RgbImage::from_raw(width, height, dst_image.into_vec())
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| BenchError::resample("output buffer does not match target size"))
    }
}

/// Register the `fast_image_resize` convolution filters
pub fn register(registry: &mut ResizerRegistry) -> Result<()> {
    let filters = [
        ("bilinear", FilterType::Bilinear),
        ("hamming", FilterType::Hamming),
        ("bicubic", FilterType::CatmullRom),
        ("MitchellNetravali", FilterType::Mitchell),
        ("lanczos3", FilterType::Lanczos3),
    ];

    registry.register(filters.into_iter().map(|(filter, kernel)| {
        ResizerDescriptor::new(
            format!("{}__{}", PREFIX, filter),
            LIBRARY,
            URL,
            filter,
            FirResizer::new(kernel),
        )
    }))
}
