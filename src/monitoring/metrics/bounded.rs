//! Bounded ring helpers for raw-sample buffers

use std::collections::VecDeque;

/// Push that evicts from the front once a cap is reached
pub(super) trait BoundedPush<T> {
    /// `None` means unbounded; `Some(0)` retains nothing
    fn push_bounded(&mut self, value: T, max_size: Option<usize>);
}

impl<T> BoundedPush<T> for VecDeque<T> {
    #[inline]
    fn push_bounded(&mut self, value: T, max_size: Option<usize>) {
        match max_size {
            None => self.push_back(value),
            Some(0) => {}
            Some(max) => {
                while self.len() >= max {
                    self.pop_front();
                }
                self.push_back(value);
            }
        }
    }
}
