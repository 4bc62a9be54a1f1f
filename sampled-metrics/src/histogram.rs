use std::fmt;

use sampled_metrics_util::{BuildError, Quantile, Sample, SampleBuilder, SampleSnapshot};

/// A histogram.
///
/// Records values into the [`Sample`] it owns, and reports statistics over whatever the sample
/// retains.  The sampling algorithm decides how representative those statistics are: see
/// [`sampled_metrics_util::sample`] for the available choices.
///
/// Every statistic accessor takes its own snapshot of the sample.  To read several statistics
/// from the same point in time, take a [`HistogramSnapshot`] first.
pub struct Histogram {
    sample: Box<dyn Sample>,
}

impl Histogram {
    /// Creates a new `Histogram` backed by `sample`.
    pub fn new<S>(sample: S) -> Self
    where
        S: Sample + 'static,
    {
        Self::from_boxed(Box::new(sample))
    }

    /// Creates a new `Histogram` backed by an already-boxed sample.
    pub fn from_boxed(sample: Box<dyn Sample>) -> Self {
        Self { sample }
    }

    /// Creates a new `Histogram` backed by a sample built from `builder`.
    ///
    /// # Errors
    ///
    /// Returns an error if the builder's configuration is invalid.
    pub fn with_builder(builder: &SampleBuilder) -> Result<Self, BuildError> {
        builder.build().map(Self::from_boxed)
    }

    /// Records a value.
    pub fn update(&self, value: i64) {
        self.sample.update(value);
    }

    /// Discards every recorded value.
    pub fn clear(&self) {
        self.sample.clear();
    }

    /// Gets the underlying sample.
    pub fn sample(&self) -> &dyn Sample {
        self.sample.as_ref()
    }

    /// Takes a snapshot of the histogram.
    pub fn snapshot(&self) -> HistogramSnapshot {
        HistogramSnapshot::from(self.sample.snapshot())
    }

    /// Takes a snapshot of the histogram and clears it, in one atomic step.
    pub fn snapshot_and_reset(&self) -> HistogramSnapshot {
        HistogramSnapshot::from(self.sample.snapshot_and_reset())
    }

    /// Gets the number of values recorded.
    pub fn count(&self) -> i64 {
        self.sample.snapshot().count()
    }

    /// Gets the smallest retained value.
    pub fn min(&self) -> i64 {
        self.sample.snapshot().min()
    }

    /// Gets the largest retained value.
    pub fn max(&self) -> i64 {
        self.sample.snapshot().max()
    }

    /// Gets the mean of the retained values.
    pub fn mean(&self) -> f64 {
        self.sample.snapshot().mean()
    }

    /// Gets the standard deviation of the retained values.
    pub fn std_dev(&self) -> f64 {
        self.sample.snapshot().std_dev()
    }

    /// Gets the variance of the retained values.
    pub fn variance(&self) -> f64 {
        self.sample.snapshot().variance()
    }

    /// Gets the sum of the retained values.
    pub fn sum(&self) -> i64 {
        self.sample.snapshot().sum()
    }

    /// Gets the value at percentile `p`, between 0.0 and 1.0, of the retained values.
    pub fn percentile(&self, p: f64) -> f64 {
        self.sample.snapshot().percentile(p)
    }

    /// Gets the values at each of the given percentiles of the retained values.
    pub fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        self.sample.snapshot().percentiles(ps)
    }

    /// Gets the number of values currently retained.
    pub fn size(&self) -> usize {
        self.sample.snapshot().size()
    }
}

impl fmt::Debug for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Histogram").finish_non_exhaustive()
    }
}

/// A read-only, point-in-time copy of a [`Histogram`].
///
/// Snapshots have no way to record or clear values: they only describe the histogram as it was
/// when the snapshot was taken.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistogramSnapshot {
    sample: SampleSnapshot,
}

impl HistogramSnapshot {
    /// Gets the captured sample.
    pub fn sample(&self) -> &SampleSnapshot {
        &self.sample
    }

    /// Consumes the snapshot, returning the captured sample.
    pub fn into_sample(self) -> SampleSnapshot {
        self.sample
    }

    /// Gets the number of values recorded.
    pub fn count(&self) -> i64 {
        self.sample.count()
    }

    /// Gets the total number of updates received.
    ///
    /// Only differs from [`count`](Self::count) for histograms backed by a sliding window.
    pub fn req_count(&self) -> i64 {
        self.sample.req_count()
    }

    /// Gets the smallest retained value.
    pub fn min(&self) -> i64 {
        self.sample.min()
    }

    /// Gets the largest retained value.
    pub fn max(&self) -> i64 {
        self.sample.max()
    }

    /// Gets the mean of the retained values.
    pub fn mean(&self) -> f64 {
        self.sample.mean()
    }

    /// Gets the standard deviation of the retained values.
    pub fn std_dev(&self) -> f64 {
        self.sample.std_dev()
    }

    /// Gets the variance of the retained values.
    pub fn variance(&self) -> f64 {
        self.sample.variance()
    }

    /// Gets the sum of the retained values.
    pub fn sum(&self) -> i64 {
        self.sample.sum()
    }

    /// Gets the value at percentile `p`, between 0.0 and 1.0, of the retained values.
    pub fn percentile(&self, p: f64) -> f64 {
        self.sample.percentile(p)
    }

    /// Gets the values at each of the given percentiles of the retained values.
    pub fn percentiles(&self, ps: &[f64]) -> Vec<f64> {
        self.sample.percentiles(ps)
    }

    /// Gets the values at each of the given quantiles, paired with the quantile.
    ///
    /// Reporters typically pass [`default_quantiles`](sampled_metrics_util::default_quantiles) and
    /// render each pair under the quantile's label.
    pub fn quantiles(&self, quantiles: &[Quantile]) -> Vec<(Quantile, f64)> {
        quantiles.iter().map(|q| (q.clone(), self.sample.percentile(q.value()))).collect()
    }

    /// Gets the number of values retained.
    pub fn size(&self) -> usize {
        self.sample.size()
    }
}

impl From<SampleSnapshot> for HistogramSnapshot {
    fn from(sample: SampleSnapshot) -> Self {
        Self { sample }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use sampled_metrics_util::{
        default_quantiles, SampleBuilder, SampleSnapshot, SlidingWindowSample, UniformSample,
    };

    use super::Histogram;

    #[test]
    fn test_statistics() {
        let histogram = Histogram::new(UniformSample::with_seed(100, 1));
        for value in [5, 1, 4, 2, 3] {
            histogram.update(value);
        }

        assert_eq!(histogram.count(), 5);
        assert_eq!(histogram.size(), 5);
        assert_eq!(histogram.min(), 1);
        assert_eq!(histogram.max(), 5);
        assert_eq!(histogram.sum(), 15);
        assert_relative_eq!(histogram.mean(), 3.0);
        assert_relative_eq!(histogram.variance(), 2.0);
        assert_relative_eq!(histogram.std_dev(), 2.0f64.sqrt());
        assert_eq!(histogram.percentile(0.5), 3.0);
        assert_eq!(histogram.percentiles(&[0.0, 1.0]), vec![1.0, 5.0]);
        assert_eq!(histogram.sample().snapshot().values(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let histogram = Histogram::new(SlidingWindowSample::new(10));
        histogram.update(10);
        let snapshot = histogram.snapshot();

        histogram.update(20);
        histogram.clear();

        assert_eq!(snapshot.count(), 1);
        assert_eq!(snapshot.max(), 10);
        assert_eq!(histogram.count(), 0);
    }

    #[test]
    fn test_snapshot_and_reset() {
        let histogram = Histogram::new(SlidingWindowSample::new(2));
        for value in 1..=3 {
            histogram.update(value);
        }

        let snapshot = histogram.snapshot_and_reset();
        assert_eq!(snapshot.req_count(), 3);
        assert_eq!(snapshot.count(), 2);
        assert_eq!(snapshot.sample().values(), &[2, 3]);
        assert_eq!(histogram.snapshot().req_count(), 0);
    }

    #[test]
    fn test_quantiles() {
        let histogram =
            Histogram::with_builder(&SampleBuilder::new().with_uniform(1_000)).expect("valid");
        for value in 1..=1_000 {
            histogram.update(value);
        }

        let quantiles = histogram.snapshot().quantiles(&default_quantiles());
        let labels: Vec<_> = quantiles.iter().map(|(q, _)| q.label().to_owned()).collect();
        assert_eq!(labels, ["p50", "p75", "p95", "p99", "p999"]);
        assert_relative_eq!(quantiles[0].1, 500.5);
        assert_relative_eq!(quantiles[4].1, 999.999, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_builder() {
        assert!(Histogram::with_builder(&SampleBuilder::new().with_sliding_window(0)).is_err());
    }

    #[test]
    #[should_panic(expected = "update called on a SampleSnapshot")]
    fn test_update_on_frozen_sample_panics() {
        let frozen = Histogram::new(SampleSnapshot::new(1, 1, vec![1]));
        frozen.update(2);
    }

    #[test]
    #[should_panic(expected = "clear called on a SampleSnapshot")]
    fn test_clear_on_frozen_sample_panics() {
        let frozen = Histogram::new(SampleSnapshot::new(1, 1, vec![1]));
        frozen.clear();
    }
}
