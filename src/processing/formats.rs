//! Input format detection

use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;

use crate::error::{BenchError, Result};

/// Check the JPEG signature of an input buffer
pub fn ensure_jpeg(data: &[u8], path: &Path) -> Result<()> {
    if infer::image::is_jpeg(data) {
        return Ok(());
    }

    let detected = infer::get(data)
        .map(|kind| kind.mime_type().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    Err(BenchError::unsupported_format(
        detected,
        Some(path.to_path_buf()),
    ))
}

/// Read image dimensions from the JPEG header without decoding pixels
pub fn probe_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    let reader = image::io::Reader::with_format(Cursor::new(data), ImageFormat::Jpeg);
    reader
        .into_dimensions()
        .map_err(|e| BenchError::decode(e.to_string()))
}
