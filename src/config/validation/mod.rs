//! Configuration validation
//!
//! - `trait_def`: Core Validate trait definition
//! - `metrics_validators`: MetricsConfig and Objective validators
//! - `tests`: Test suite for all validators

mod metrics_validators;
mod trait_def;

pub use trait_def::Validate;
