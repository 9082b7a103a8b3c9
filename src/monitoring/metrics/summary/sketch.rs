//! Targeted streaming-quantile sketch (biased quantiles, Cormode et al.)
//!
//! Keeps a compressed list of `(value, width, delta)` samples whose rank error
//! at each tracked quantile `q` is bounded by that objective's `error`.
//! Incoming values are buffered and merged in sorted batches.

use super::Objective;

const BATCH_SIZE: usize = 500;

#[derive(Debug, Clone, Copy)]
struct Sample {
    value: f64,
    /// Rank distance to the previous sample
    width: f64,
    /// Rank uncertainty
    delta: f64,
}

#[derive(Debug)]
pub(crate) struct QuantileSketch {
    targets: Vec<Objective>,
    batch: Vec<f64>,
    batch_sorted: bool,
    samples: Vec<Sample>,
    /// Observations already merged into `samples`
    merged: f64,
}

impl QuantileSketch {
    pub(crate) fn new(targets: Vec<Objective>) -> Self {
        Self {
            targets,
            batch: Vec::with_capacity(BATCH_SIZE),
            batch_sorted: true,
            samples: Vec::new(),
            merged: 0.0,
        }
    }

    pub(crate) fn insert(&mut self, value: f64) {
        self.batch.push(value);
        self.batch_sorted = false;
        if self.batch.len() >= BATCH_SIZE {
            self.flush();
        }
    }

    pub(crate) fn query(&mut self, q: f64) -> f64 {
        if self.samples.is_empty() {
            // Nothing merged yet: answer exactly from the batch
            if self.batch.is_empty() {
                return 0.0;
            }
            self.sort_batch();
            let len = self.batch.len();
            let index = ((len as f64 * q).ceil() as usize).saturating_sub(1).min(len - 1);
            return self.batch.get(index).copied().unwrap_or(0.0);
        }
        self.flush();
        self.query_samples(q)
    }

    pub(crate) fn reset(&mut self) {
        self.batch.clear();
        self.batch_sorted = true;
        self.samples.clear();
        self.merged = 0.0;
    }

    /// Number of retained samples after compression
    #[cfg(test)]
    pub(crate) fn retained(&self) -> usize {
        self.samples.len()
    }

    fn sort_batch(&mut self) {
        if !self.batch_sorted {
            self.batch.sort_by(f64::total_cmp);
            self.batch_sorted = true;
        }
    }

    fn flush(&mut self) {
        if self.batch.is_empty() {
            return;
        }
        self.sort_batch();
        let batch = std::mem::take(&mut self.batch);
        self.merge(&batch);
        self.batch = batch;
        self.batch.clear();
        self.batch_sorted = true;
    }

    /// Allowed rank error at rank `r`
    fn invariant(&self, r: f64) -> f64 {
        let n = self.merged;
        self.targets
            .iter()
            .map(|t| {
                if t.quantile * n <= r {
                    2.0 * t.error * r / t.quantile
                } else {
                    2.0 * t.error * (n - r) / (1.0 - t.quantile)
                }
            })
            .fold(f64::MAX, f64::min)
    }

    fn merge(&mut self, sorted: &[f64]) {
        let mut rank = 0.0;
        let mut i = 0;
        for &value in sorted {
            let mut inserted = false;
            while let Some(current) = self.samples.get(i).copied() {
                if current.value > value {
                    let delta = (self.invariant(rank).floor() - 1.0).max(0.0);
                    self.samples.insert(
                        i,
                        Sample {
                            value,
                            width: 1.0,
                            delta,
                        },
                    );
                    i += 1;
                    inserted = true;
                    break;
                }
                rank += current.width;
                i += 1;
            }
            if !inserted {
                self.samples.push(Sample {
                    value,
                    width: 1.0,
                    delta: 0.0,
                });
                i += 1;
            }
            self.merged += 1.0;
            rank += 1.0;
        }
        self.compress();
    }

    fn compress(&mut self) {
        if self.samples.len() < 2 {
            return;
        }
        let mut xi = self.samples.len() - 1;
        let mut x = self.samples[xi];
        let mut rank = self.merged - 1.0 - x.width;

        let mut i = xi;
        while i > 0 {
            i -= 1;
            let current = self.samples[i];
            if current.width + x.width + x.delta <= self.invariant(rank) {
                x.width += current.width;
                self.samples[xi] = x;
                self.samples.remove(i);
                xi -= 1;
            } else {
                x = current;
                xi = i;
            }
            rank -= current.width;
        }
    }

    fn query_samples(&self, q: f64) -> f64 {
        let mut target = (q * self.merged).ceil();
        target += (self.invariant(target) / 2.0).ceil();

        let mut iter = self.samples.iter();
        let Some(mut previous) = iter.next() else {
            return 0.0;
        };
        let mut rank = 0.0;
        for current in iter {
            rank += previous.width;
            if rank + current.width + current.delta > target {
                return previous.value;
            }
            previous = current;
        }
        previous.value
    }
}
