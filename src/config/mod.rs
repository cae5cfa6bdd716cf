//! Configuration management for ResizeBench

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{BenchError, Result};
use crate::registry::{ResizerDescriptor, ResizerRegistry};

pub mod bounds;
pub use bounds::TargetBounds;

/// Config file looked up when `--config-file` is not given
pub const DEFAULT_CONFIG_FILE: &str = "./config.yaml";

/// Directory receiving single-pass output images
pub const DEFAULT_OUTPUT_DIR: &str = "./tmp";

/// Repetitions per strategy in repeated mode
pub const DEFAULT_ITERATIONS: u32 = 100;

/// Resizer selection document.
///
/// ```yaml
/// resizers:
///   - fir__bilinear
///   - image__lanczos3
/// ```
///
/// Keys other than `resizers` are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Names of the resizers to run, in run order (None = all)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resizers: Option<Vec<String>>,
}

impl Config {
    /// Load configuration from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| {
            BenchError::config(format!(
                "Failed to read config file {:?}: {}",
                path.as_ref(),
                e
            ))
        })?;

        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        let config: Config = match extension.to_lowercase().as_str() {
            "toml" => toml::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };

        debug!("Loaded config from {:?}: {:?}", path.as_ref(), config.resizers);
        Ok(config)
    }

    /// Locate and load the selection file.
    ///
    /// `None` means the flag was not given: the default file is used if it
    /// exists. An empty path disables the file. Both cases without a file
    /// yield the default (full registry) config.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.as_os_str().is_empty() => {
                debug!("Config file disabled, using every registered resizer");
                Ok(Self::default())
            }
            Some(path) => Self::from_file(path),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(&default_path)
                } else {
                    info!(
                        "No {} found, using every registered resizer",
                        DEFAULT_CONFIG_FILE
                    );
                    Ok(Self::default())
                }
            }
        }
    }

    /// Resolve the selection against the registry
    pub fn select<'r>(&self, registry: &'r ResizerRegistry) -> Result<Vec<&'r ResizerDescriptor>> {
        match &self.resizers {
            Some(names) => registry.resolve_subset(names),
            None => Ok(registry.list_all().iter().collect()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_selects_everything() {
        let registry = ResizerRegistry::builtin().unwrap();
        let selected = Config::default().select(&registry).unwrap();
        assert_eq!(selected.len(), registry.len());
    }

    #[test]
    fn test_yaml_selection_ignores_unknown_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "comment: benchmark subset\nresizers:\n  - fir__bilinear\n  - image__lanczos3\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(
            config.resizers,
            Some(vec!["fir__bilinear".to_string(), "image__lanczos3".to_string()])
        );

        let registry = ResizerRegistry::builtin().unwrap();
        let selected = config.select(&registry).unwrap();
        let names: Vec<_> = selected.iter().map(|r| r.name()).collect();
        assert_eq!(names, ["fir__bilinear", "image__lanczos3"]);
    }

    #[test]
    fn test_toml_selection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "resizers = [\"resize__lanczos2\"]\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.resizers, Some(vec!["resize__lanczos2".to_string()]));
    }

    #[test]
    fn test_unknown_resizer_is_fatal() {
        let config = Config {
            resizers: Some(vec!["fir__bilinear".into(), "doesnotexist".into()]),
        };
        let registry = ResizerRegistry::builtin().unwrap();

        let err = config.select(&registry).unwrap_err();
        assert!(matches!(err, BenchError::UnknownResizer { ref name } if name == "doesnotexist"));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::discover(Some(&dir.path().join("nope.yaml"))).unwrap_err();
        assert!(matches!(err, BenchError::ConfigError { .. }));
    }

    #[test]
    fn test_empty_path_disables_file() {
        let config = Config::discover(Some(Path::new(""))).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "resizers: [unterminated\n").unwrap();

        let err = Config::from_file(&path).unwrap_err();
        assert!(matches!(err, BenchError::SerdeError(_)));
    }
}
