//! Config loading and validation.

use super::model::LockConfig;
use crate::error::{LockError, Result};
use std::path::Path;

impl LockConfig {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(LockConfig)` - Successfully loaded and validated config
    /// * `Err(LockError::Config)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            LockError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: LockConfig = if yaml.trim().is_empty() {
            LockConfig::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| LockError::Config(format!("failed to parse config YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| LockError::Config(format!("failed to serialize config to YAML: {}", e)))
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `lock_directory` must not be empty
    pub fn validate(&self) -> Result<()> {
        if self.lock_directory.as_os_str().is_empty() {
            return Err(LockError::Config(
                "config validation failed: lock_directory must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
