//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine
//! configuration from a YAML file.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::EngineConfig;

/// Loads and provides access to the engine configuration.
///
/// # Example
///
/// ```no_run
/// use roster_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/engine.yaml").unwrap();
/// println!("check-in grace: {} min", loader.config().gate.check_in_grace_minutes);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: EngineConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// Returns an error if the file is missing or contains invalid YAML.
    /// Settings absent from the file keep their compiled-in defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config =
            serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
                path: path_str,
                message: e.to_string(),
            })?;

        Ok(Self { config })
    }

    /// Creates a loader carrying only the compiled-in defaults.
    pub fn defaults() -> Self {
        Self::default()
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> EngineConfig {
        self.config
    }
}
