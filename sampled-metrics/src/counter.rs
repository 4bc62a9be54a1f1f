use std::sync::atomic::Ordering;

use crate::atomics::AtomicI64;

/// A counter.
///
/// Holds a signed 64-bit count that can be incremented or decremented from any number of threads
/// without locking.  [`snapshot_and_reset`](Counter::snapshot_and_reset) drains the count, which
/// suits reporters that want the delta since their last report.
#[derive(Debug, Default)]
pub struct Counter {
    count: AtomicI64,
}

impl Counter {
    /// Creates a new `Counter` starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increments the counter by `delta`.
    pub fn inc(&self, delta: i64) {
        let _ = self.count.fetch_add(delta, Ordering::Release);
    }

    /// Decrements the counter by `delta`.
    pub fn dec(&self, delta: i64) {
        let _ = self.count.fetch_sub(delta, Ordering::Release);
    }

    /// Sets the counter to `value`, returning the previous count.
    pub fn swap(&self, value: i64) -> i64 {
        self.count.swap(value, Ordering::AcqRel)
    }

    /// Clears the counter back to zero.
    pub fn clear(&self) {
        self.count.store(0, Ordering::Release);
    }

    /// Gets the current count.
    pub fn snapshot(&self) -> i64 {
        self.count.load(Ordering::Acquire)
    }

    /// Gets the current count and resets the counter to zero, in one atomic step.
    pub fn snapshot_and_reset(&self) -> i64 {
        self.swap(0)
    }
}
