//! Lock-free `f64` built on an `AtomicU64` bit pattern

use std::sync::atomic::{AtomicU64, Ordering};

/// An atomic f64 value using bit casting to `AtomicU64`.
///
/// Arithmetic is a compare-and-swap retry loop: it never blocks, it only
/// retries while another writer wins the race.
#[derive(Debug)]
#[repr(transparent)]
pub struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    pub const fn new(value: f64) -> Self {
        Self {
            bits: AtomicU64::new(value.to_bits()),
        }
    }

    #[inline]
    pub fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    #[inline]
    pub fn store(&self, value: f64) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }

    #[inline]
    pub fn swap(&self, value: f64) -> f64 {
        f64::from_bits(self.bits.swap(value.to_bits(), Ordering::AcqRel))
    }

    /// Add `delta`, returning the previous value
    #[inline]
    pub fn fetch_add(&self, delta: f64) -> f64 {
        self.fetch_update(|current| Some(current + delta))
    }

    /// Raise the stored value to `value` if it is larger
    #[inline]
    pub fn fetch_max(&self, value: f64) -> f64 {
        self.fetch_update(|current| (value > current).then_some(value))
    }

    /// Lower the stored value to `value` if it is smaller
    #[inline]
    pub fn fetch_min(&self, value: f64) -> f64 {
        self.fetch_update(|current| (value < current).then_some(value))
    }

    /// CAS loop; `f` returning `None` leaves the value untouched
    fn fetch_update<F>(&self, mut f: F) -> f64
    where
        F: FnMut(f64) -> Option<f64>,
    {
        let mut current = self.bits.load(Ordering::Relaxed);
        loop {
            let Some(next) = f(f64::from_bits(current)) else {
                return f64::from_bits(current);
            };
            match self.bits.compare_exchange_weak(
                current,
                next.to_bits(),
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(previous) => return f64::from_bits(previous),
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for AtomicF64 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::AtomicF64;
    use std::sync::Arc;

    #[test]
    fn test_fetch_add_returns_previous() {
        let value = AtomicF64::new(1.5);
        assert_eq!(value.fetch_add(2.0), 1.5);
        assert_eq!(value.load(), 3.5);
    }

    #[test]
    fn test_min_max() {
        let min = AtomicF64::new(f64::INFINITY);
        min.fetch_min(4.0);
        min.fetch_min(9.0);
        assert_eq!(min.load(), 4.0);

        let max = AtomicF64::new(f64::NEG_INFINITY);
        max.fetch_max(-3.0);
        max.fetch_max(-7.0);
        assert_eq!(max.load(), -3.0);
    }

    #[test]
    fn test_concurrent_adds() {
        let value = Arc::new(AtomicF64::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let value = Arc::clone(&value);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        value.fetch_add(1.0);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(value.load(), 8000.0);
    }
}
