//! Core error types

use crate::monitoring::collector::ExportFormat;
use crate::monitoring::governance::LabelError;
use crate::monitoring::metrics::MetricType;
use thiserror::Error;

/// Result type alias for the metrics core
pub type Result<T> = std::result::Result<T, MetricsError>;

/// Main error type for the metrics core
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Reset or lookup of a name the collector never created
    #[error("Metric not found: {0}")]
    MetricNotFound(String),

    /// `start()` called on a running builder
    #[error("Collector builder '{0}' is already started")]
    AlreadyStarted(String),

    /// `stop()` called on a stopped builder
    #[error("Collector builder '{0}' is not started")]
    NotStarted(String),

    /// Push channel is at capacity; the snapshot was not enqueued
    #[error("Push buffer is full")]
    PushBufferFull,

    /// Snapshot failed validation; nothing was applied
    #[error("Invalid snapshot: {reason}")]
    InvalidSnapshot { reason: String },

    /// Label validation errors
    #[error(transparent)]
    Label(#[from] LabelError),

    /// New label combination rejected by the cardinality ceiling
    #[error("Cardinality limit of {limit} reached, rejected new series for metric '{metric}'")]
    CardinalityLimitExceeded { metric: String, limit: usize },

    /// A name is already registered with a different metric type
    #[error("Metric '{name}' is registered as {existing}, requested as {requested}")]
    TypeMismatch {
        name: String,
        existing: MetricType,
        requested: MetricType,
    },

    /// A name is re-registered with options differing from the cached instance
    #[error("Metric '{name}' is already registered with different options")]
    ConflictingRegistration { name: String },

    /// Histogram bucket construction errors
    #[error("Invalid buckets: {0}")]
    InvalidBuckets(String),

    /// No renderer registered for the requested export format
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(ExportFormat),

    /// Errors reported by an external metric source
    #[error("Collection from '{source_name}' failed: {message}")]
    Collection {
        source_name: String,
        message: String,
    },

    /// Async runtime errors
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
