//! Tool configuration, loaded from a YAML file.
//!
//! # Configuration File Format
//!
//! ```yaml
//! validation:
//!   allow_absolute_paths: false
//!   require_contiguous_ids: true
//!   min_frame_duration: 16
//!   check_images: true
//!   required_properties:
//!     Door: [Name]
//! ```

use std::io;
use std::path::Path;
use derive_more::*;
use serde::{Deserialize, Serialize};
use crate::HashMap;

pub const DEFAULT_CONFIG_PATH: &str = "tsxkit.yaml";

#[derive(Clone, PartialEq, Default, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub validation: ValidationConfig,
}

impl Config {

    /// Loads configuration from a YAML file.
    /// A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            },
            Err(err) => return Err(err.into()),
        };
        let config = Self::from_yaml(&source)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_yaml(source: &str) -> Result<Self, ConfigError> {
        if source.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(source)?)
    }
}

/// Tunables for [`crate::validate`].
#[derive(Clone, PartialEq, Default, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Accept image sources that are absolute paths.
    pub allow_absolute_paths: bool,
    /// Warn when tile ids skip values.
    pub require_contiguous_ids: bool,
    /// Warn about animation frames shorter than this many milliseconds. 0 disables the check.
    pub min_frame_duration: u32,
    /// Open referenced image files and compare their size with the declared size.
    pub check_images: bool,
    /// Property names every tile of a given class must carry.
    pub required_properties: HashMap<String, Vec<String>>,
}

#[derive(Error, Display, From, Debug)]
pub enum ConfigError {
    #[display(fmt="Failed to read config: {_0}")]
    Io(io::Error),
    #[display(fmt="Invalid config: {_0}")]
    Yaml(serde_yaml::Error),
}

#[cfg(test)]
mod test {
    use std::path::Path;
    use super::{Config, ConfigError};

    #[test]
    fn from_yaml() {
        let config = Config::from_yaml(
"validation:
  require_contiguous_ids: true
  min_frame_duration: 16
  required_properties:
    Door: [Name, Locked]
").unwrap();
        let validation = &config.validation;
        assert!(validation.require_contiguous_ids);
        assert!(!validation.allow_absolute_paths);
        assert!(!validation.check_images);
        assert_eq!(16, validation.min_frame_duration);
        assert_eq!(
            Some(&vec![String::from("Name"), String::from("Locked")]),
            validation.required_properties.get("Door"),
        );
    }

    #[test]
    fn empty_and_missing() {
        assert_eq!(Config::default(), Config::from_yaml("").unwrap());
        assert_eq!(Config::default(), Config::from_yaml("validation: {}").unwrap());
        let missing = Config::load(Path::new("does/not/exist/tsxkit.yaml")).unwrap();
        assert_eq!(Config::default(), missing);
    }

    #[test]
    fn invalid() {
        let result = Config::from_yaml("validation:\n  min_frame_duration: soon\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }
}
