//! Utility modules
//!
//! - **error**: Error types shared by the whole crate
//! - **logging**: Tracing subscriber initialisation

pub mod error;
pub mod logging;
