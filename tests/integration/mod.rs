//! Integration tests for telemetry-kit
//!
//! These tests drive the public API only.

pub mod builder_tests;
pub mod collector_tests;
pub mod config_tests;
pub mod property_tests;
