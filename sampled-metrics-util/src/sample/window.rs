use parking_lot::Mutex;

use super::Sample;
use crate::SampleSnapshot;

struct Window {
    values: Box<[i64]>,
    // Next slot to write.
    index: usize,
    // Number of slots holding a value, capped at the window size.
    len: usize,
    // Every update since the last reset, including those pushed out of the window.
    req_count: i64,
}

impl Window {
    fn push(&mut self, value: i64) {
        self.req_count += 1;
        self.values[self.index] = value;
        self.index = (self.index + 1) % self.values.len();
        if self.len < self.values.len() {
            self.len += 1;
        }
    }

    fn snapshot(&self) -> SampleSnapshot {
        SampleSnapshot::new(self.req_count, self.len as i64, self.values[..self.len].to_vec())
    }

    fn reset(&mut self) {
        // Slots past `len` are never read, so stale values can stay where they are.
        self.index = 0;
        self.len = 0;
        self.req_count = 0;
    }
}

/// A sample holding the most recent values in a ring buffer.
///
/// Once the window is full, each update overwrites the oldest retained value.  Snapshots report
/// the number of values currently in the window as [`count`](SampleSnapshot::count) and the total
/// number of updates received as [`req_count`](SampleSnapshot::req_count), which distinguishes
/// "requests observed" from "samples retained".
///
/// Sliding windows are meant to be drained with [`Sample::snapshot_and_reset`] on every report, so
/// that each report covers the latest `size` updates of its own interval.
pub struct SlidingWindowSample {
    inner: Mutex<Window>,
}

impl SlidingWindowSample {
    /// Creates a new `SlidingWindowSample` that retains the latest `size` values.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "window size must be greater than zero");

        Self {
            inner: Mutex::new(Window {
                values: vec![0; size].into_boxed_slice(),
                index: 0,
                len: 0,
                req_count: 0,
            }),
        }
    }

    /// Gets the number of values the window can hold.
    pub fn size(&self) -> usize {
        self.inner.lock().values.len()
    }
}

impl Sample for SlidingWindowSample {
    fn update(&self, value: i64) {
        self.inner.lock().push(value);
    }

    fn clear(&self) {
        self.inner.lock().reset();
    }

    fn snapshot(&self) -> SampleSnapshot {
        self.inner.lock().snapshot()
    }

    fn snapshot_and_reset(&self) -> SampleSnapshot {
        let mut window = self.inner.lock();
        let snapshot = window.snapshot();
        window.reset();
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::SlidingWindowSample;
    use crate::Sample;

    #[test]
    fn test_overwrite_single_slot() {
        let sample = SlidingWindowSample::new(1);
        sample.update(1);
        sample.update(2);

        let snapshot = sample.snapshot_and_reset();
        assert_eq!(snapshot.req_count(), 2);
        assert_eq!(snapshot.count(), 1);
        assert_eq!(snapshot.values(), &[2]);
    }

    #[test]
    fn test_oldest_value_evicted() {
        let sample = SlidingWindowSample::new(4);
        for i in 1..=5 {
            sample.update(i);
        }

        let snapshot = sample.snapshot();
        assert_eq!(snapshot.req_count(), 5);
        assert_eq!(snapshot.count(), 4);
        assert_eq!(snapshot.values(), &[2, 3, 4, 5]);
    }

    #[test]
    fn test_partial_window() {
        let sample = SlidingWindowSample::new(8);
        sample.update(30);
        sample.update(10);
        sample.update(20);

        let snapshot = sample.snapshot();
        assert_eq!(snapshot.req_count(), 3);
        assert_eq!(snapshot.count(), 3);
        assert_eq!(snapshot.values(), &[10, 20, 30]);
        assert_eq!(snapshot.percentile(0.5), 20.0);
    }

    #[test]
    fn test_reset_discards_stale_slots() {
        let sample = SlidingWindowSample::new(4);
        for i in 0..4 {
            sample.update(i);
        }

        let first = sample.snapshot_and_reset();
        assert_eq!(first.count(), 4);

        sample.update(100);
        let second = sample.snapshot();
        assert_eq!(second.req_count(), 1);
        assert_eq!(second.count(), 1);
        assert_eq!(second.values(), &[100]);
    }

    #[test]
    fn test_clear() {
        let sample = SlidingWindowSample::new(2);
        sample.update(5);
        sample.clear();

        let snapshot = sample.snapshot();
        assert_eq!(snapshot.req_count(), 0);
        assert!(snapshot.is_empty());
        assert_eq!(sample.size(), 2);
    }

    #[test]
    #[should_panic(expected = "window size must be greater than zero")]
    fn test_zero_size_panics() {
        let _ = SlidingWindowSample::new(0);
    }
}
