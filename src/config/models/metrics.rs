//! Metrics core configuration

use super::*;
use crate::monitoring::metrics::{Objective, default_buckets, default_objectives};
use crate::utils::error::{MetricsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Environment variable prefix read by [`MetricsConfig::from_env`]
pub const ENV_PREFIX: &str = "TELEMETRY_";

/// Configuration for a metrics collector and its builders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricsConfig {
    /// Enable metrics
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Namespace prefixed to every metric name
    #[serde(default)]
    pub namespace: String,
    /// Subsystem inserted between namespace and name
    #[serde(default)]
    pub subsystem: String,
    /// Labels applied to every created metric
    #[serde(default)]
    pub default_tags: BTreeMap<String, String>,
    /// Attach exemplar stores to counters, histograms and timers
    #[serde(default)]
    pub enable_exemplars: bool,
    #[serde(default = "default_exemplar_capacity")]
    pub exemplar_capacity: usize,
    /// Ceiling on unique (metric, label set) series
    #[serde(default = "default_max_cardinality")]
    pub max_cardinality: usize,
    #[serde(default = "default_max_labels")]
    pub max_labels: usize,
    #[serde(default = "default_max_label_key_length")]
    pub max_label_key_length: usize,
    #[serde(default = "default_max_label_value_length")]
    pub max_label_value_length: usize,
    /// Correct invalid labels instead of rejecting them
    #[serde(default = "default_true")]
    pub auto_sanitize_labels: bool,
    /// Fail instead of warn when a name is re-registered with different options
    #[serde(default)]
    pub strict_registration: bool,
    /// Raw sample ring size for summaries, `None` = unbounded
    #[serde(default = "default_summary_buffer_cap")]
    pub summary_buffer_cap: Option<usize>,
    /// Capacity of the push channel of hybrid builders
    #[serde(default = "default_push_buffer_size")]
    pub push_buffer_size: usize,
    /// Pull interval of collector builders in milliseconds
    #[serde(default = "default_collection_interval_ms")]
    pub collection_interval_ms: u64,
    #[serde(default = "default_buckets")]
    pub default_buckets: Vec<f64>,
    #[serde(default = "default_objectives")]
    pub default_objectives: Vec<Objective>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            namespace: String::new(),
            subsystem: String::new(),
            default_tags: BTreeMap::new(),
            enable_exemplars: false,
            exemplar_capacity: default_exemplar_capacity(),
            max_cardinality: default_max_cardinality(),
            max_labels: default_max_labels(),
            max_label_key_length: default_max_label_key_length(),
            max_label_value_length: default_max_label_value_length(),
            auto_sanitize_labels: true,
            strict_registration: false,
            summary_buffer_cap: default_summary_buffer_cap(),
            push_buffer_size: default_push_buffer_size(),
            collection_interval_ms: default_collection_interval_ms(),
            default_buckets: default_buckets(),
            default_objectives: default_objectives(),
        }
    }
}

impl MetricsConfig {
    /// Overlay the process environment onto the defaults.
    ///
    /// Recognised variables are the upper-cased field names behind
    /// [`ENV_PREFIX`]; `DEFAULT_TAGS` takes `k=v,k=v` and
    /// `DEFAULT_BUCKETS` a comma separated list.
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Same as [`from_env`](Self::from_env) over an explicit variable set
    pub fn from_vars<I>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut config = Self::default();
        for (key, value) in vars {
            let Some(field) = key.strip_prefix(ENV_PREFIX) else {
                continue;
            };
            match field {
                "ENABLED" => config.enabled = parse_var(&key, &value)?,
                "NAMESPACE" => config.namespace = value,
                "SUBSYSTEM" => config.subsystem = value,
                "DEFAULT_TAGS" => config.default_tags = parse_tags(&key, &value)?,
                "ENABLE_EXEMPLARS" => config.enable_exemplars = parse_var(&key, &value)?,
                "EXEMPLAR_CAPACITY" => config.exemplar_capacity = parse_var(&key, &value)?,
                "MAX_CARDINALITY" => config.max_cardinality = parse_var(&key, &value)?,
                "MAX_LABELS" => config.max_labels = parse_var(&key, &value)?,
                "MAX_LABEL_KEY_LENGTH" => config.max_label_key_length = parse_var(&key, &value)?,
                "MAX_LABEL_VALUE_LENGTH" => {
                    config.max_label_value_length = parse_var(&key, &value)?
                }
                "AUTO_SANITIZE_LABELS" => config.auto_sanitize_labels = parse_var(&key, &value)?,
                "STRICT_REGISTRATION" => config.strict_registration = parse_var(&key, &value)?,
                "SUMMARY_BUFFER_CAP" => {
                    config.summary_buffer_cap = match value.trim() {
                        "" | "none" | "unbounded" => None,
                        _ => Some(parse_var(&key, &value)?),
                    }
                }
                "PUSH_BUFFER_SIZE" => config.push_buffer_size = parse_var(&key, &value)?,
                "COLLECTION_INTERVAL_MS" => {
                    config.collection_interval_ms = parse_var(&key, &value)?
                }
                "DEFAULT_BUCKETS" => {
                    config.default_buckets = value
                        .split(',')
                        .map(|part| parse_var(&key, part))
                        .collect::<Result<_>>()?
                }
                _ => {}
            }
        }
        Ok(config)
    }

    /// Merge metrics configurations (other takes precedence where it differs from the default)
    pub fn merge(mut self, other: Self) -> Self {
        if !other.enabled {
            self.enabled = other.enabled;
        }
        if !other.namespace.is_empty() {
            self.namespace = other.namespace;
        }
        if !other.subsystem.is_empty() {
            self.subsystem = other.subsystem;
        }
        self.default_tags.extend(other.default_tags);
        if other.enable_exemplars {
            self.enable_exemplars = other.enable_exemplars;
        }
        if other.exemplar_capacity != default_exemplar_capacity() {
            self.exemplar_capacity = other.exemplar_capacity;
        }
        if other.max_cardinality != default_max_cardinality() {
            self.max_cardinality = other.max_cardinality;
        }
        if other.max_labels != default_max_labels() {
            self.max_labels = other.max_labels;
        }
        if other.max_label_key_length != default_max_label_key_length() {
            self.max_label_key_length = other.max_label_key_length;
        }
        if other.max_label_value_length != default_max_label_value_length() {
            self.max_label_value_length = other.max_label_value_length;
        }
        if !other.auto_sanitize_labels {
            self.auto_sanitize_labels = other.auto_sanitize_labels;
        }
        if other.strict_registration {
            self.strict_registration = other.strict_registration;
        }
        if other.summary_buffer_cap != default_summary_buffer_cap() {
            self.summary_buffer_cap = other.summary_buffer_cap;
        }
        if other.push_buffer_size != default_push_buffer_size() {
            self.push_buffer_size = other.push_buffer_size;
        }
        if other.collection_interval_ms != default_collection_interval_ms() {
            self.collection_interval_ms = other.collection_interval_ms;
        }
        if other.default_buckets != default_buckets() {
            self.default_buckets = other.default_buckets;
        }
        if other.default_objectives != default_objectives() {
            self.default_objectives = other.default_objectives;
        }
        self
    }
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| MetricsError::config(format!("Invalid value for {}: {:?}", key, value)))
}

fn parse_tags(key: &str, value: &str) -> Result<BTreeMap<String, String>> {
    value
        .split(',')
        .filter(|pair| !pair.trim().is_empty())
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
                .ok_or_else(|| MetricsError::config(format!("Invalid tag in {}: {:?}", key, pair)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = MetricsConfig::default();
        assert!(config.enabled);
        assert!(config.auto_sanitize_labels);
        assert!(!config.strict_registration);
        assert_eq!(config.max_cardinality, 10_000);
        assert_eq!(config.summary_buffer_cap, Some(1024));
        assert_eq!(config.default_buckets.len(), 11);
        assert_eq!(config.default_objectives.len(), 3);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: MetricsConfig =
            serde_yaml::from_str("namespace: api\nmax_labels: 4\n").unwrap();
        assert_eq!(config.namespace, "api");
        assert_eq!(config.max_labels, 4);
        assert_eq!(config.push_buffer_size, default_push_buffer_size());
        assert_eq!(config.default_buckets, default_buckets());
    }

    #[test]
    fn test_from_vars() {
        let config = MetricsConfig::from_vars(vars(&[
            ("TELEMETRY_NAMESPACE", "shop"),
            ("TELEMETRY_DEFAULT_TAGS", "env=prod, region=eu"),
            ("TELEMETRY_MAX_CARDINALITY", "50"),
            ("TELEMETRY_SUMMARY_BUFFER_CAP", "none"),
            ("TELEMETRY_DEFAULT_BUCKETS", "1,5,10"),
            ("UNRELATED", "x"),
        ]))
        .unwrap();

        assert_eq!(config.namespace, "shop");
        assert_eq!(config.default_tags.get("region").map(String::as_str), Some("eu"));
        assert_eq!(config.max_cardinality, 50);
        assert_eq!(config.summary_buffer_cap, None);
        assert_eq!(config.default_buckets, vec![1.0, 5.0, 10.0]);
    }

    #[test]
    fn test_from_vars_rejects_garbage() {
        let err = MetricsConfig::from_vars(vars(&[("TELEMETRY_MAX_LABELS", "many")])).unwrap_err();
        assert!(err.to_string().contains("TELEMETRY_MAX_LABELS"));

        let err = MetricsConfig::from_vars(vars(&[("TELEMETRY_DEFAULT_TAGS", "novalue")]));
        assert!(err.is_err());
    }

    #[test]
    fn test_merge_other_takes_precedence() {
        let mut base = MetricsConfig::default();
        base.namespace = "base".to_string();
        base.default_tags.insert("env".to_string(), "dev".to_string());
        base.max_labels = 8;

        let mut other = MetricsConfig::default();
        other.namespace = "other".to_string();
        other.default_tags.insert("env".to_string(), "prod".to_string());
        other.strict_registration = true;

        let merged = base.merge(other);
        assert_eq!(merged.namespace, "other");
        assert_eq!(merged.default_tags.get("env").map(String::as_str), Some("prod"));
        assert_eq!(merged.max_labels, 8);
        assert!(merged.strict_registration);
    }
}
