//! Builder configuration

use crate::config::MetricsConfig;
use crate::utils::error::{MetricsError, Result};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Callback invoked for every failed collection or push application
pub type ErrorHandler = Arc<dyn Fn(&MetricsError) + Send + Sync>;

/// Name of the counter incremented on failures when enabled
pub const COLLECTION_ERRORS_METRIC: &str = "collection_errors_total";

#[derive(Clone)]
pub struct BuilderOptions {
    pub name: Option<String>,
    pub interval: Duration,
    pub push_buffer_size: usize,
    pub error_handler: Option<ErrorHandler>,
    /// Count failures in [`COLLECTION_ERRORS_METRIC`]
    pub count_errors: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self::from_config(&MetricsConfig::default())
    }
}

impl BuilderOptions {
    pub fn from_config(config: &MetricsConfig) -> Self {
        Self {
            name: None,
            interval: Duration::from_millis(config.collection_interval_ms),
            push_buffer_size: config.push_buffer_size,
            error_handler: None,
            count_errors: false,
        }
    }

    /// Pulling needs a non-zero interval
    pub fn validate_interval(&self) -> Result<()> {
        if self.interval.is_zero() {
            return Err(MetricsError::config("collection interval must be greater than 0"));
        }
        Ok(())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_push_buffer_size(mut self, size: usize) -> Self {
        self.push_buffer_size = size;
        self
    }

    pub fn with_error_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&MetricsError) + Send + Sync + 'static,
    {
        self.error_handler = Some(Arc::new(handler));
        self
    }

    pub fn with_error_counter(mut self) -> Self {
        self.count_errors = true;
        self
    }
}

impl fmt::Debug for BuilderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderOptions")
            .field("name", &self.name)
            .field("interval", &self.interval)
            .field("push_buffer_size", &self.push_buffer_size)
            .field("error_handler", &self.error_handler.is_some())
            .field("count_errors", &self.count_errors)
            .finish()
    }
}
