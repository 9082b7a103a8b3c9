//! Metrics configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use crate::monitoring::metrics::Objective;
use tracing::debug;

impl Validate for MetricsConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating metrics configuration");

        if self.max_cardinality == 0 {
            return Err("max_cardinality must be greater than 0".to_string());
        }
        if self.max_labels == 0 {
            return Err("max_labels must be greater than 0".to_string());
        }
        if self.max_label_key_length == 0 || self.max_label_value_length == 0 {
            return Err("Label length limits must be greater than 0".to_string());
        }
        if self.enable_exemplars && self.exemplar_capacity == 0 {
            return Err("exemplar_capacity must be greater than 0 when exemplars are enabled".to_string());
        }
        if self.push_buffer_size == 0 {
            return Err("push_buffer_size must be greater than 0".to_string());
        }
        if self.collection_interval_ms == 0 {
            return Err("collection_interval_ms must be greater than 0".to_string());
        }

        validate_name_part("namespace", &self.namespace)?;
        validate_name_part("subsystem", &self.subsystem)?;
        validate_buckets(&self.default_buckets)?;
        self.default_objectives.iter().try_for_each(Validate::validate)?;

        Ok(())
    }
}

impl Validate for Objective {
    fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.quantile) {
            return Err(format!("Objective quantile {} must be within [0, 1]", self.quantile));
        }
        if !(self.error > 0.0 && self.error < 1.0) {
            return Err(format!("Objective error {} must be within (0, 1)", self.error));
        }
        Ok(())
    }
}

fn validate_name_part(field: &str, value: &str) -> Result<(), String> {
    if value.chars().any(|c| !(c.is_ascii_alphanumeric() || c == '_')) {
        return Err(format!("{} may only contain [A-Za-z0-9_], got {:?}", field, value));
    }
    Ok(())
}

fn validate_buckets(buckets: &[f64]) -> Result<(), String> {
    if buckets.is_empty() {
        return Err("default_buckets cannot be empty".to_string());
    }
    if buckets.iter().any(|b| b.is_nan()) {
        return Err("default_buckets cannot contain NaN".to_string());
    }
    if buckets.windows(2).any(|w| w[0] >= w[1]) {
        return Err("default_buckets must be strictly ascending".to_string());
    }
    Ok(())
}
