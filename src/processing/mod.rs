//! Resize strategies and the shared dimension logic

use std::io::{Read, Write};

use image::DynamicImage;
use tracing::debug;

use crate::error::{BenchError, Result};

pub mod codec;
pub mod fir;
pub mod formats;
pub mod imageops;
pub mod resize_rs;

pub use codec::{CodecKind, JpegCodec, NativeJpeg, TurboJpeg, JPEG_QUALITY};
pub use formats::*;

/// A resize algorithm that can be benchmarked.
///
/// Implementations read one JPEG stream from `input`, resample it to fit
/// `width` x `height` (one side may be zero) and write one JPEG stream to
/// `output`, using `codec` for both ends. The input is consumed once;
/// rewinding it between calls is up to the caller.
pub trait ResizeStrategy {
    fn resize(
        &self,
        codec: &dyn JpegCodec,
        input: &mut dyn Read,
        output: &mut dyn Write,
        width: u32,
        height: u32,
    ) -> Result<()>;
}

/// Adapter over an in-memory resampling routine.
///
/// Every type implementing this gets [`ResizeStrategy`] for free: the
/// decode, dimension resolution and encode steps are shared.
pub trait Resampler {
    /// Resample `image` to exactly `width` x `height`
    fn resample(&self, image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage>;
}

impl<T: Resampler> ResizeStrategy for T {
    fn resize(
        &self,
        codec: &dyn JpegCodec,
        input: &mut dyn Read,
        output: &mut dyn Write,
        width: u32,
        height: u32,
    ) -> Result<()> {
        if width == 0 && height == 0 {
            return Err(BenchError::invalid_dimensions(
                "Empty target dimensions: 0 0",
            ));
        }

        let source = codec.decode(input)?;
        let (target_width, target_height) =
            fit_dimensions(source.width(), source.height(), width, height);

        debug!(
            "Resampling {}x{} -> {}x{}",
            source.width(),
            source.height(),
            target_width,
            target_height
        );

        let resized = self.resample(&source, target_width, target_height)?;
        codec.encode(output, &resized)
    }
}

/// Scale `value` by `numerator / denominator`, rounding half up.
///
/// Uses `floor(0.5 + x)`, so `rescale(100, 3, 7) == 43`.
pub fn rescale(value: u32, numerator: u32, denominator: u32) -> u32 {
    (0.5 + f64::from(value) * f64::from(numerator) / f64::from(denominator)).floor() as u32
}

/// Fit a source image into a bounding box, preserving its aspect ratio.
///
/// A zero bound is derived from the other one. With both bounds set the
/// constraining axis matches its bound exactly. Results never drop below
/// one pixel.
pub fn fit_dimensions(
    source_width: u32,
    source_height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    let (width, height) = if max_width == 0 {
        (rescale(source_width, max_height, source_height), max_height)
    } else if max_height == 0 {
        (max_width, rescale(source_height, max_width, source_width))
    } else {
        let source_ratio = source_width as f32 / source_height as f32;
        let target_ratio = max_width as f32 / max_height as f32;

        if source_ratio < target_ratio {
            (rescale(source_width, max_height, source_height), max_height)
        } else {
            (max_width, rescale(source_height, max_width, source_width))
        }
    };

    (width.max(1), height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rescale_rounds_half_up() {
        assert_eq!(rescale(100, 3, 7), 43);
        assert_eq!(rescale(1, 1, 2), 1);
        assert_eq!(rescale(3, 1, 2), 2);
        assert_eq!(rescale(5, 1, 2), 3);
    }

    #[test]
    fn test_fit_width_only() {
        assert_eq!(fit_dimensions(1000, 800, 500, 0), (500, 400));
        assert_eq!(fit_dimensions(1920, 1080, 100, 0), (100, 56));
    }

    #[test]
    fn test_fit_height_only() {
        assert_eq!(fit_dimensions(1000, 800, 0, 400), (500, 400));
        assert_eq!(fit_dimensions(1080, 1920, 0, 100), (56, 100));
    }

    #[test]
    fn test_fit_bounding_box() {
        // Landscape into a square: width constrains
        assert_eq!(fit_dimensions(1000, 800, 600, 600), (600, 480));
        // Portrait into a square: height constrains
        assert_eq!(fit_dimensions(800, 1000, 600, 600), (480, 600));
        // Same ratio touches both edges
        assert_eq!(fit_dimensions(1600, 900, 800, 450), (800, 450));
    }

    #[test]
    fn test_fit_never_returns_zero() {
        assert_eq!(fit_dimensions(10_000, 10, 100, 0), (100, 1));
    }

    #[test]
    fn test_fit_preserves_aspect_ratio() {
        let sources = [(4928, 3279), (640, 480), (480, 640), (1, 1), (333, 777)];
        let boxes = [(800, 0), (0, 600), (300, 300), (1024, 768), (50, 2000)];

        for &(sw, sh) in &sources {
            for &(mw, mh) in &boxes {
                let (tw, th) = fit_dimensions(sw, sh, mw, mh);

                if mw == 0 {
                    assert_eq!(th, mh);
                } else if mh == 0 {
                    assert_eq!(tw, mw);
                } else {
                    assert!(tw == mw || th == mh, "{sw}x{sh} in {mw}x{mh} gave {tw}x{th}");
                    assert!(tw <= mw && th <= mh, "{sw}x{sh} in {mw}x{mh} gave {tw}x{th}");
                }

                // Derived side is within one pixel of the exact proportion
                let exact_w = f64::from(th) * f64::from(sw) / f64::from(sh);
                let exact_h = f64::from(tw) * f64::from(sh) / f64::from(sw);
                assert!(
                    (f64::from(tw) - exact_w).abs() <= 1.0 || (f64::from(th) - exact_h).abs() <= 1.0
                );
            }
        }
    }
}
