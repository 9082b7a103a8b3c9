//! Configuration management for the metrics core
//!
//! This module handles loading, validation and merging of [`MetricsConfig`].

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{MetricsError, Result};
use std::path::Path;
use tracing::{debug, info};

impl MetricsConfig {
    /// Load configuration from a YAML file and validate it
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading metrics configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| MetricsError::Config(format!("Failed to read config file: {}", e)))?;

        let config: MetricsConfig = serde_yaml::from_str(&content)
            .map_err(|e| MetricsError::Config(format!("Failed to parse config: {}", e)))?;

        config.validated()
    }

    /// Run [`Validate`] and lift its message into a config error
    pub fn validated(self) -> Result<Self> {
        Validate::validate(&self).map_err(|e| MetricsError::Config(format!("Metrics config error: {}", e)))?;
        debug!("Metrics configuration validated");
        Ok(self)
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
