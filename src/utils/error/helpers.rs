//! Helper functions for creating specific error types

use super::types::MetricsError;

/// Helper functions for creating specific errors
impl MetricsError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_snapshot<S: Into<String>>(reason: S) -> Self {
        Self::InvalidSnapshot {
            reason: reason.into(),
        }
    }

    pub fn collection<N: Into<String>, S: Into<String>>(source_name: N, message: S) -> Self {
        Self::Collection {
            source_name: source_name.into(),
            message: message.into(),
        }
    }

    pub fn runtime<S: Into<String>>(message: S) -> Self {
        Self::Runtime(message.into())
    }

    /// Backpressure and lifecycle misuse are expected conditions, not faults
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::PushBufferFull | Self::AlreadyStarted(_) | Self::NotStarted(_)
        )
    }
}
