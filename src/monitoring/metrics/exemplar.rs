//! Bounded ring of trace-linked sample observations

use super::core::Labels;
use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Default number of exemplar slots per metric
pub const DEFAULT_EXEMPLAR_CAPACITY: usize = 10;

/// A sampled observation linked to a distributed trace
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Exemplar {
    pub value: f64,
    pub timestamp: DateTime<Utc>,
    pub trace_id: String,
    pub span_id: String,
    pub labels: Labels,
}

impl Exemplar {
    pub fn new(value: f64, trace_id: impl Into<String>, span_id: impl Into<String>) -> Self {
        Self {
            value,
            timestamp: Utc::now(),
            trace_id: trace_id.into(),
            span_id: span_id.into(),
            labels: Labels::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

/// Fixed-size lock-free ring; `add` always succeeds by overwriting the oldest slot.
///
/// `get_all` returns slots in ring order, which is not strictly chronological
/// once the ring has wrapped or while writers race.
#[derive(Debug)]
pub struct ExemplarStore {
    slots: Box<[ArcSwapOption<Exemplar>]>,
    cursor: AtomicUsize,
}

impl ExemplarStore {
    /// A capacity of zero is raised to one
    pub fn new(capacity: usize) -> Self {
        let slots = (0..capacity.max(1))
            .map(|_| ArcSwapOption::empty())
            .collect::<Vec<_>>()
            .into_boxed_slice();
        Self {
            slots,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn add(&self, exemplar: Exemplar) {
        let index = self.cursor.fetch_add(1, Ordering::Relaxed) % self.slots.len();
        if let Some(slot) = self.slots.get(index) {
            slot.store(Some(Arc::new(exemplar)));
        }
    }

    pub fn get_all(&self) -> Vec<Exemplar> {
        self.slots
            .iter()
            .filter_map(|slot| slot.load_full())
            .map(|exemplar| exemplar.as_ref().clone())
            .collect()
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.load().is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn clear(&self) {
        for slot in self.slots.iter() {
            slot.store(None);
        }
        self.cursor.store(0, Ordering::Relaxed);
    }
}
