//! Resizers backed by the `resize` crate

use image::{DynamicImage, RgbImage};
use resize::Pixel::RGB8;
use resize::Type;
use rgb::{ComponentBytes, FromSlice, RGB8 as Rgb8Pixel};

use crate::error::{BenchError, Result};
use crate::processing::Resampler;
use crate::registry::{ResizerDescriptor, ResizerRegistry};

pub const LIBRARY: &str = "resize";
pub const URL: &str = "github.com/PistonDevelopers/resize";

/// Filter kernels offered by the `resize` crate.
///
/// `resize::Type` owns boxed closures and is not `Clone`, so the kernel is
/// rebuilt for every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kernel {
    Triangle,
    Catrom,
    Mitchell,
    Lanczos2,
    Lanczos3,
}

impl Kernel {
    fn filter(self) -> Type {
        match self {
            Self::Triangle => Type::Triangle,
            Self::Catrom => Type::Catrom,
            Self::Mitchell => Type::Mitchell,
            Self::Lanczos2 => Type::Custom(resize::Filter::new(Box::new(lanczos2), 2.0)),
            Self::Lanczos3 => Type::Lanczos3,
        }
    }
}

fn sinc(x: f32) -> f32 {
    if x == 0.0 {
        1.0
    } else {
        let a = x * std::f32::consts::PI;
        a.sin() / a
    }
}

/// Lanczos window with two lobes
fn lanczos2(x: f32) -> f32 {
    if x.abs() < 2.0 {
        sinc(x) * sinc(x / 2.0)
    } else {
        0.0
    }
}

/// Separable convolution over packed RGB8 pixels
#[derive(Debug, Clone, Copy)]
pub struct ResizeRsResizer {
    kernel: Kernel,
}

impl ResizeRsResizer {
    pub fn new(kernel: Kernel) -> Self {
        Self { kernel }
    }
}

impl Resampler for ResizeRsResizer {
    fn resample(&self, image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage> {
        let source = image.to_rgb8();

        let mut resizer = resize::new(
            source.width() as usize,
            source.height() as usize,
            width as usize,
            height as usize,
            RGB8,
            self.kernel.filter(),
        )
        .map_err(|e| BenchError::resample(format!("{:?}", e)))?;

        let mut dst = vec![Rgb8Pixel::new(0, 0, 0); width as usize * height as usize];
        resizer
            .resize(source.as_raw().as_rgb(), &mut dst)
            .map_err(|e| BenchError::resample(format!("{:?}", e)))?;

        RgbImage::from_raw(width, height, dst.as_bytes().to_vec())
            .map(DynamicImage::ImageRgb8)
            .ok_or_else(|| BenchError::resample("output buffer does not match target size"))
    }
}

/// Register the `resize` crate filters
pub fn register(registry: &mut ResizerRegistry) -> Result<()> {
    let kernels = [
        ("bilinear", Kernel::Triangle),
        ("bicubic", Kernel::Catrom),
        ("MitchellNetravali", Kernel::Mitchell),
        ("lanczos2", Kernel::Lanczos2),
        ("lanczos3", Kernel::Lanczos3),
    ];

    registry.register(kernels.into_iter().map(|(filter, kernel)| {
        ResizerDescriptor::new(
            format!("{}__{}", LIBRARY, filter),
            LIBRARY,
            URL,
            filter,
            ResizeRsResizer::new(kernel),
        )
    }))
}
