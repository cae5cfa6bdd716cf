//! JPEG codec backends
//!
//! Both backends share one contract: decode a JPEG stream into a
//! [`DynamicImage`] and encode a [`DynamicImage`] back at a fixed quality.
//! The backend is picked once per process and handed to every strategy.

use std::io::{Read, Write};

use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use serde::Serialize;
use tracing::info;
use zune_core::colorspace::ColorSpace;
use zune_core::options::DecoderOptions;

use crate::error::{BenchError, Result};

/// Encode quality used by every backend (0-100)
pub const JPEG_QUALITY: u8 = 90;

/// JPEG decode/encode capability
pub trait JpegCodec {
    /// Short backend name for logs and reports
    fn name(&self) -> &'static str;

    /// Decode one JPEG stream
    fn decode(&self, input: &mut dyn Read) -> Result<DynamicImage>;

    /// Encode `image` as JPEG at [`JPEG_QUALITY`]
    fn encode(&self, output: &mut dyn Write, image: &DynamicImage) -> Result<()>;
}

/// Pure-software codec built on the `image` crate
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeJpeg;

impl JpegCodec for NativeJpeg {
    fn name(&self) -> &'static str {
        "native"
    }

    fn decode(&self, input: &mut dyn Read) -> Result<DynamicImage> {
        let decoder = JpegDecoder::new(input).map_err(|e| BenchError::decode(e.to_string()))?;
        DynamicImage::from_decoder(decoder).map_err(|e| BenchError::decode(e.to_string()))
    }

    fn encode(&self, output: &mut dyn Write, image: &DynamicImage) -> Result<()> {
        let encoder = JpegEncoder::new_with_quality(output, JPEG_QUALITY);
        image
            .write_with_encoder(encoder)
            .map_err(|e| BenchError::encode(e.to_string()))
    }
}

/// SIMD-accelerated codec: `zune-jpeg` decoding, `jpeg-encoder` encoding
#[derive(Debug, Clone, Copy, Default)]
pub struct TurboJpeg;

impl JpegCodec for TurboJpeg {
    fn name(&self) -> &'static str {
        "turbo"
    }

    /// zune-jpeg decodes from a slice, so the stream is buffered first. That
    /// buffer is one source-sized allocation per call which the `image`
    /// backend does not make.
    fn decode(&self, input: &mut dyn Read) -> Result<DynamicImage> {
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;

        let options = DecoderOptions::default().jpeg_set_out_colorspace(ColorSpace::RGB);
        let mut decoder = zune_jpeg::JpegDecoder::new_with_options(&data[..], options);
        let pixels = decoder
            .decode()
            .map_err(|e| BenchError::decode(format!("{:?}", e)))?;
        let (width, height) = decoder
            .dimensions()
            .ok_or_else(|| BenchError::decode("missing frame header"))?;

        // Single-component scans ignore the requested RGB output and stay luma
        let (width, height) = (width as u32, height as u32);
        let image = match decoder.get_output_colorspace() {
            Some(ColorSpace::RGB) => {
                RgbImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgb8)
            }
            Some(ColorSpace::Luma) => {
                GrayImage::from_raw(width, height, pixels).map(DynamicImage::ImageLuma8)
            }
            Some(ColorSpace::RGBA) => {
                RgbaImage::from_raw(width, height, pixels).map(DynamicImage::ImageRgba8)
            }
            other => {
                return Err(BenchError::unsupported_color_layout(format!(
                    "{:?} (zune-jpeg output)",
                    other
                )))
            }
        };

        image.ok_or_else(|| BenchError::decode("pixel buffer does not match frame size"))
    }

    fn encode(&self, output: &mut dyn Write, image: &DynamicImage) -> Result<()> {
        let color_type = match image {
            DynamicImage::ImageLuma8(_) => jpeg_encoder::ColorType::Luma,
            DynamicImage::ImageRgb8(_) => jpeg_encoder::ColorType::Rgb,
            DynamicImage::ImageRgba8(_) => jpeg_encoder::ColorType::Rgba,
            other => {
                return Err(BenchError::unsupported_color_layout(format!(
                    "{:?}",
                    other.color()
                )))
            }
        };

        let width = u16::try_from(image.width())
            .map_err(|_| BenchError::encode(format!("width {} exceeds 65535", image.width())))?;
        let height = u16::try_from(image.height())
            .map_err(|_| BenchError::encode(format!("height {} exceeds 65535", image.height())))?;

        let encoder = jpeg_encoder::Encoder::new(output, JPEG_QUALITY);
        encoder
            .encode(image.as_bytes(), width, height, color_type)
            .map_err(|e| BenchError::encode(e.to_string()))
    }
}

/// Process-wide codec choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CodecKind {
    Native,
    Turbo,
}

impl CodecKind {
    /// Map the `--native` flag to a backend
    pub fn from_native_flag(native: bool) -> Self {
        if native {
            Self::Native
        } else {
            Self::Turbo
        }
    }

    /// Instantiate the backend
    pub fn codec(self) -> Box<dyn JpegCodec> {
        match self {
            Self::Native => {
                info!("Using native JPEG codec (image)");
                Box::new(NativeJpeg)
            }
            Self::Turbo => {
                info!("Using turbo JPEG codec (zune-jpeg + jpeg-encoder)");
                Box::new(TurboJpeg)
            }
        }
    }
}
