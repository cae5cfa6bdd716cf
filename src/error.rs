//! Error types and handling for ResizeBench

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ResizeBench operations
pub type Result<T> = std::result::Result<T, BenchError>;

/// Main error type for ResizeBench operations
#[derive(Debug, Error)]
pub enum BenchError {
    /// I/O related errors
    #[error("I/O error: {source} (file: {file:?})")]
    IoError {
        #[source]
        source: std::io::Error,
        file: Option<PathBuf>,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// A resizer name that is not in the registry
    #[error("Unknown resizer: {name}")]
    UnknownResizer { name: String },

    /// Two descriptors registered under the same name
    #[error("Resizer already registered: {name}")]
    DuplicateResizer { name: String },

    /// Invalid requested target dimensions
    #[error("{message}")]
    InvalidDimensions { message: String },

    /// Input is not a JPEG stream
    #[error("Unsupported image format: {format} (file: {file:?})")]
    UnsupportedFormat {
        format: String,
        file: Option<PathBuf>,
    },

    /// Decoded pixel layout cannot be handled by an adapter or encoder
    #[error("Unsupported color layout: {layout}")]
    UnsupportedColorLayout { layout: String },

    /// Malformed input stream
    #[error("Failed to decode image: {message}")]
    DecodeError { message: String },

    /// Encoder rejected the bitmap
    #[error("Failed to encode image: {message}")]
    EncodeError { message: String },

    /// Resampling library failure
    #[error("Resampling failed: {message}")]
    ResampleError { message: String },

    /// A strategy failed while being benchmarked
    #[error("{resizer}: Failed to resize '{}': {source}", .file.display())]
    StrategyFailed {
        resizer: String,
        file: PathBuf,
        #[source]
        source: Box<BenchError>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerdeError(String),
}

/// Error classes with distinct failure policies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad config file, unknown resizer, bad dimensions
    Configuration,
    /// Missing input, unwritable output directory
    Io,
    /// Malformed image, unsupported color layout, library failure
    Codec,
}

impl BenchError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a new unknown resizer error
    pub fn unknown_resizer<S: Into<String>>(name: S) -> Self {
        Self::UnknownResizer { name: name.into() }
    }

    /// Create a new invalid dimensions error
    pub fn invalid_dimensions<S: Into<String>>(message: S) -> Self {
        Self::InvalidDimensions {
            message: message.into(),
        }
    }

    /// Create a new unsupported format error
    pub fn unsupported_format<S: Into<String>>(format: S, file: Option<PathBuf>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
            file,
        }
    }

    /// Create a new unsupported color layout error
    pub fn unsupported_color_layout<S: Into<String>>(layout: S) -> Self {
        Self::UnsupportedColorLayout {
            layout: layout.into(),
        }
    }

    /// Create a new decode error
    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::DecodeError {
            message: message.into(),
        }
    }

    /// Create a new encode error
    pub fn encode<S: Into<String>>(message: S) -> Self {
        Self::EncodeError {
            message: message.into(),
        }
    }

    /// Create a new resampling error
    pub fn resample<S: Into<String>>(message: S) -> Self {
        Self::ResampleError {
            message: message.into(),
        }
    }

    /// Wrap an error raised by a strategy under benchmark
    pub fn strategy_failed<S: Into<String>>(resizer: S, file: PathBuf, source: BenchError) -> Self {
        Self::StrategyFailed {
            resizer: resizer.into(),
            file,
            source: Box::new(source),
        }
    }

    /// Classify the error for the run's failure policy
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError { .. }
            | Self::UnknownResizer { .. }
            | Self::DuplicateResizer { .. }
            | Self::InvalidDimensions { .. }
            | Self::SerdeError(_) => ErrorCategory::Configuration,

            Self::IoError { .. } | Self::UnsupportedFormat { .. } => ErrorCategory::Io,

            Self::UnsupportedColorLayout { .. }
            | Self::DecodeError { .. }
            | Self::EncodeError { .. }
            | Self::ResampleError { .. } => ErrorCategory::Codec,

            Self::StrategyFailed { source, .. } => source.category(),
        }
    }

    /// Check if this error is recoverable.
    ///
    /// Repeated runs skip to the next strategy on recoverable errors and
    /// abort on everything else.
    pub fn is_recoverable(&self) -> bool {
        self.category() == ErrorCategory::Codec
    }
}

impl From<std::io::Error> for BenchError {
    fn from(source: std::io::Error) -> Self {
        Self::IoError { source, file: None }
    }
}

// Convert serde errors to our error type
impl From<toml::de::Error> for BenchError {
    fn from(err: toml::de::Error) -> Self {
        Self::SerdeError(format!("TOML parsing error: {}", err))
    }
}

impl From<serde_yaml::Error> for BenchError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::SerdeError(format!("YAML parsing error: {}", err))
    }
}

impl From<serde_json::Error> for BenchError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerdeError(format!("JSON serialization error: {}", err))
    }
}

/// Error context extension for adding file path information
pub trait ErrorContext<T> {
    /// Add file context to an error
    fn with_path(self, file: impl Into<PathBuf>) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<BenchError>,
{
    fn with_path(self, file: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| {
            let mut error = e.into();

            match &mut error {
                BenchError::IoError { file: ref mut f, .. }
                | BenchError::UnsupportedFormat { file: ref mut f, .. } => {
                    if f.is_none() {
                        *f = Some(file.into());
                    }
                }
                _ => {}
            }

            error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_error_creation() {
        let err = BenchError::config("test message");
        assert!(matches!(err, BenchError::ConfigError { .. }));
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_unknown_resizer_message() {
        let err = BenchError::unknown_resizer("doesnotexist");
        assert_eq!(err.to_string(), "Unknown resizer: doesnotexist");
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(BenchError::decode("truncated").is_recoverable());
        assert!(BenchError::unsupported_color_layout("L8").is_recoverable());
        assert!(!BenchError::invalid_dimensions("bad").is_recoverable());
        assert!(!BenchError::from(std::io::Error::other("disk")).is_recoverable());
    }

    #[test]
    fn test_strategy_failure_inherits_category() {
        let err = BenchError::strategy_failed(
            "fir__bilinear",
            PathBuf::from("in.jpg"),
            BenchError::resample("boom"),
        );
        assert_eq!(err.category(), ErrorCategory::Codec);
        assert!(err.to_string().starts_with("fir__bilinear: Failed to resize 'in.jpg'"));
    }

    #[test]
    fn test_file_context() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        let err = result.with_path("missing.jpg").unwrap_err();

        assert!(
            matches!(err, BenchError::IoError { file: Some(ref f), .. } if f.as_path() == Path::new("missing.jpg"))
        );
        assert_eq!(err.category(), ErrorCategory::Io);
    }
}
