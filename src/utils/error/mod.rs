//! Error handling utilities
//!
//! This module defines the error surface shared by every part of the metrics core.

mod helpers;
#[cfg(test)]
mod tests;
mod types;

pub use types::{MetricsError, Result};
