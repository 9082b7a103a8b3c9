//! Label validation and best-effort sanitization

use crate::config::MetricsConfig;
use crate::monitoring::metrics::Labels;
use thiserror::Error;
use tracing::debug;

/// Keys owned by the scrape pipeline or the exposition format
pub const RESERVED_LABEL_KEYS: [&str; 5] = ["job", "instance", "le", "quantile", "__name__"];

/// Why a label was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelErrorReason {
    #[error("label key is empty")]
    EmptyKey,
    #[error("label key exceeds {max} characters")]
    KeyTooLong { max: usize },
    #[error("label key must start with a letter or underscore")]
    InvalidKeyStart,
    #[error("label key contains invalid character {0:?}")]
    InvalidKeyCharacter(char),
    #[error("label key is reserved")]
    ReservedKey,
    #[error("label value exceeds {max} characters")]
    ValueTooLong { max: usize },
    #[error("label value contains control characters")]
    ControlCharacter,
    #[error("{count} labels exceed the limit of {max}")]
    TooManyLabels { count: usize, max: usize },
}

/// Structured label validation error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid label '{label}': {reason} (value: {value:?})")]
pub struct LabelError {
    pub label: String,
    pub reason: LabelErrorReason,
    pub value: String,
}

impl LabelError {
    pub fn new(label: impl Into<String>, reason: LabelErrorReason, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            reason,
            value: value.into(),
        }
    }
}

/// Limits applied by a [`LabelGovernor`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPolicy {
    pub max_labels: usize,
    pub max_key_length: usize,
    pub max_value_length: usize,
    pub auto_sanitize: bool,
}

impl Default for LabelPolicy {
    fn default() -> Self {
        Self::from(&MetricsConfig::default())
    }
}

impl From<&MetricsConfig> for LabelPolicy {
    fn from(config: &MetricsConfig) -> Self {
        Self {
            max_labels: config.max_labels,
            max_key_length: config.max_label_key_length,
            max_value_length: config.max_label_value_length,
            auto_sanitize: config.auto_sanitize_labels,
        }
    }
}

/// Validates label sets before any metric state is created
#[derive(Debug, Clone, Default)]
pub struct LabelGovernor {
    policy: LabelPolicy,
}

impl LabelGovernor {
    pub fn new(policy: LabelPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &LabelPolicy {
        &self.policy
    }

    /// Validate every label, auto-correcting when the policy allows.
    ///
    /// Over-count sets and reserved keys are never corrected. Fails on the
    /// first invalid label.
    pub fn validate_and_sanitize_tags(&self, labels: &Labels) -> Result<Labels, LabelError> {
        if labels.len() > self.policy.max_labels {
            return Err(LabelError::new(
                "",
                LabelErrorReason::TooManyLabels {
                    count: labels.len(),
                    max: self.policy.max_labels,
                },
                "",
            ));
        }

        let mut clean = Labels::new();
        for (key, value) in labels {
            let key = match self.validate_key(key) {
                Ok(()) => key.clone(),
                Err(err) if self.policy.auto_sanitize && err.reason != LabelErrorReason::ReservedKey => {
                    let sanitized = self.sanitize_label_key(key);
                    self.validate_key(&sanitized)?;
                    debug!(original = %key, sanitized = %sanitized, "Sanitized label key");
                    sanitized
                }
                Err(err) => return Err(err),
            };

            let value = match self.validate_value(&key, value) {
                Ok(()) => value.clone(),
                Err(_) if self.policy.auto_sanitize => {
                    let sanitized = self.sanitize_label_value(value);
                    self.validate_value(&key, &sanitized)?;
                    sanitized
                }
                Err(err) => return Err(err),
            };

            clean.insert(key, value);
        }
        Ok(clean)
    }

    pub fn validate_key(&self, key: &str) -> Result<(), LabelError> {
        let fail = |reason| Err(LabelError::new(key, reason, ""));

        let Some(first) = key.chars().next() else {
            return fail(LabelErrorReason::EmptyKey);
        };
        if key.chars().count() > self.policy.max_key_length {
            return fail(LabelErrorReason::KeyTooLong {
                max: self.policy.max_key_length,
            });
        }
        if !(first.is_ascii_alphabetic() || first == '_') {
            return fail(LabelErrorReason::InvalidKeyStart);
        }
        if let Some(bad) = key.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return fail(LabelErrorReason::InvalidKeyCharacter(bad));
        }
        if is_reserved_key(key) {
            return fail(LabelErrorReason::ReservedKey);
        }
        Ok(())
    }

    pub fn validate_value(&self, key: &str, value: &str) -> Result<(), LabelError> {
        if value.chars().count() > self.policy.max_value_length {
            return Err(LabelError::new(
                key,
                LabelErrorReason::ValueTooLong {
                    max: self.policy.max_value_length,
                },
                value,
            ));
        }
        if value.chars().any(char::is_control) {
            return Err(LabelError::new(key, LabelErrorReason::ControlCharacter, value));
        }
        Ok(())
    }

    /// Substitute invalid characters with `_`, prefix a leading digit, truncate
    pub fn sanitize_label_key(&self, key: &str) -> String {
        let mut sanitized: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        match sanitized.chars().next() {
            None => sanitized.push('_'),
            Some(first) if first.is_ascii_digit() => sanitized.insert(0, '_'),
            Some(_) => {}
        }
        truncate_chars(&sanitized, self.policy.max_key_length)
    }

    /// Substitute control characters with `_` and truncate
    pub fn sanitize_label_value(&self, value: &str) -> String {
        let sanitized: String = value
            .chars()
            .map(|c| if c.is_control() { '_' } else { c })
            .collect();
        truncate_chars(&sanitized, self.policy.max_value_length)
    }
}

/// Reserved names plus anything in the `__` namespace
pub fn is_reserved_key(key: &str) -> bool {
    key.starts_with("__") || RESERVED_LABEL_KEYS.contains(&key)
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
