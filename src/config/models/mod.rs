//! Configuration data models

#![allow(missing_docs)]

pub mod metrics;

pub use metrics::*;

pub fn default_true() -> bool {
    true
}

pub fn default_exemplar_capacity() -> usize {
    crate::monitoring::metrics::DEFAULT_EXEMPLAR_CAPACITY
}

pub fn default_max_cardinality() -> usize {
    10_000
}

pub fn default_max_labels() -> usize {
    16
}

pub fn default_max_label_key_length() -> usize {
    128
}

pub fn default_max_label_value_length() -> usize {
    1024
}

pub fn default_summary_buffer_cap() -> Option<usize> {
    Some(1024)
}

pub fn default_push_buffer_size() -> usize {
    100
}

/// Default pull interval in milliseconds
pub fn default_collection_interval_ms() -> u64 {
    10_000
}
