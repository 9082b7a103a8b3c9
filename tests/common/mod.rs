//! Common test utilities for telemetry-kit
//!
//! - Fixtures for collectors and builder options
//! - Scripted `MetricSource` implementations
//! - Custom assertions

pub mod assertions;
pub mod fixtures;

pub use fixtures::{ScriptedSource, collector_with, fast_builder_options, wait_until};
