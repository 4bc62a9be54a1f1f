use crate::{sample::Sample, stats};

/// A point-in-time copy of the values retained by a [`Sample`].
///
/// Snapshots are plain values: they are owned by whoever took them and are unaffected by anything
/// that happens to the live sample afterwards.  The retained values are sorted in ascending order
/// when the snapshot is created, so every statistic, percentiles included, is computed over an
/// ordered sequence.
///
/// Two counts are tracked.  [`req_count`](SampleSnapshot::req_count) is the number of updates the
/// sample received in total, while [`count`](SampleSnapshot::count) is the count reported by the
/// sample that produced the snapshot: reservoir samples report their total update count, and
/// sliding-window samples report how many updates are currently held in the window.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SampleSnapshot {
    req_count: i64,
    count: i64,
    values: Vec<i64>,
}

impl SampleSnapshot {
    /// Creates a new [`SampleSnapshot`] from the given counts and retained values.
    pub fn new(req_count: i64, count: i64, mut values: Vec<i64>) -> Self {
        values.sort_unstable();
        Self { req_count, count, values }
    }

    /// Gets the count reported by the sample at the time the snapshot was taken.
    pub fn count(&self) -> i64 {
        self.count
    }

    /// Gets the total number of updates the sample had received at the time the snapshot was taken.
    pub fn req_count(&self) -> i64 {
        self.req_count
    }

    /// Gets the number of values retained in the snapshot.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the snapshot holds no values.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Gets the retained values, in ascending order.
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// Gets the smallest retained value.
    pub fn min(&self) -> i64 {
        self.values.first().copied().unwrap_or(0)
    }

    /// Gets the largest retained value.
    pub fn max(&self) -> i64 {
        self.values.last().copied().unwrap_or(0)
    }

    /// Gets the mean of the retained values.
    pub fn mean(&self) -> f64 {
        stats::mean(&self.values)
    }

    /// Gets the standard deviation of the retained values.
    pub fn std_dev(&self) -> f64 {
        stats::std_dev(&self.values)
    }

    /// Gets the variance of the retained values.
    pub fn variance(&self) -> f64 {
        stats::variance(&self.values)
    }

    /// Gets the sum of the retained values.
    pub fn sum(&self) -> i64 {
        stats::sum(&self.values)
    }

    /// Gets an arbitrary percentile of the retained values.
    pub fn percentile(&self, p: f64) -> f64 {
        stats::percentile(&self.values, p)
    }

    /// Gets a set of arbitrary percentiles of the retained values.
    pub fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        stats::percentiles(&self.values, ps)
    }
}

/// A snapshot acts as a frozen sample.
///
/// Reading it back through [`Sample::snapshot`] returns a copy, but any attempt to change it is a
/// programming error.
impl Sample for SampleSnapshot {
    /// # Panics
    ///
    /// Always panics: a snapshot cannot be updated.
    fn update(&self, _value: i64) {
        panic!("update called on a SampleSnapshot");
    }

    /// # Panics
    ///
    /// Always panics: a snapshot cannot be cleared.
    fn clear(&self) {
        panic!("clear called on a SampleSnapshot");
    }

    fn snapshot(&self) -> SampleSnapshot {
        self.clone()
    }

    /// # Panics
    ///
    /// Always panics: a snapshot cannot be reset.
    fn snapshot_and_reset(&self) -> SampleSnapshot {
        panic!("snapshot_and_reset called on a SampleSnapshot");
    }
}
