//! Requested target bounding box

use serde::Serialize;

use crate::error::{BenchError, Result};
use crate::processing::fit_dimensions;

/// Target bounding box requested on the command line.
///
/// Either side may be zero, meaning "derive it from the other side",
/// but never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetBounds {
    width: u32,
    height: u32,
}

impl TargetBounds {
    /// Validate raw CLI values
    pub fn new(width: i64, height: i64) -> Result<Self> {
        if width < 0 || height < 0 {
            return Err(BenchError::invalid_dimensions(format!(
                "Negative target dimensions: {} {}",
                width, height
            )));
        }

        if width == 0 && height == 0 {
            return Err(BenchError::invalid_dimensions(format!(
                "Empty target dimensions: {} {}",
                width, height
            )));
        }

        let width = u32::try_from(width).map_err(|_| {
            BenchError::invalid_dimensions(format!("Target width too large: {}", width))
        })?;
        let height = u32::try_from(height).map_err(|_| {
            BenchError::invalid_dimensions(format!("Target height too large: {}", height))
        })?;

        Ok(Self { width, height })
    }

    /// Requested width (0 = derived)
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Requested height (0 = derived)
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Final dimensions for a source of the given size
    pub fn resolve(&self, source_width: u32, source_height: u32) -> (u32, u32) {
        fit_dimensions(source_width, source_height, self.width, self.height)
    }
}

impl std::fmt::Display for TargetBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
