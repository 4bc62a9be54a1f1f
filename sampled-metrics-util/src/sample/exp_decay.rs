use std::{cmp::Reverse, collections::BinaryHeap, mem, time::Duration};

use ordered_float::OrderedFloat;
use parking_lot::Mutex;
use quanta::{Clock, Instant};
use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;
use tracing::trace;

use super::{sampling_rng, Sample};
use crate::SampleSnapshot;

/// How long an exponentially-decaying sample keeps its landmark before rescaling priorities.
pub const RESCALE_THRESHOLD: Duration = Duration::from_secs(60 * 60);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Weighted {
    priority: OrderedFloat<f64>,
    value: i64,
}

struct State {
    count: i64,
    landmark: Instant,
    next_rescale: Instant,
    // `Reverse` turns the max-heap into a min-heap: the lowest priority is always on top.
    heap: BinaryHeap<Reverse<Weighted>>,
    rng: Xoshiro256StarStar,
}

impl State {
    fn rebase(&mut self, now: Instant) {
        self.landmark = now;
        self.next_rescale = now + RESCALE_THRESHOLD;
    }

    fn values(&self) -> Vec<i64> {
        self.heap.iter().map(|Reverse(w)| w.value).collect()
    }
}

/// An exponentially-decaying sample using a forward-decaying priority reservoir.
///
/// Based on Cormode et al's ["Forward Decay: A Practical Time Decay Model for Streaming
/// Systems"][fwddecay].  Every update is given the priority `exp(alpha * t) / u`, where `t` is the
/// number of seconds elapsed since the sample's landmark and `u` is drawn uniformly from `(0, 1]`.
/// The sample retains the `reservoir_size` updates with the highest priorities seen so far, which
/// biases it towards recent updates: the larger `alpha` is, the stronger the bias.
///
/// Priorities grow exponentially with time, so once [`RESCALE_THRESHOLD`] has passed since the
/// landmark, the landmark is moved to the current time and every retained priority is scaled down
/// by the same factor.  Relative order is preserved, and priorities never overflow.
///
/// Time is read from a [`quanta::Clock`], which can be mocked to drive the sample in tests.
///
/// [fwddecay]: http://dimacs.rutgers.edu/~graham/pubs/papers/fwddecay.pdf
pub struct ExpDecaySample {
    alpha: f64,
    reservoir_size: usize,
    clock: Clock,
    inner: Mutex<State>,
}

impl ExpDecaySample {
    /// Creates a new `ExpDecaySample` with the given reservoir size and decay factor.
    ///
    /// # Panics
    ///
    /// Panics if `reservoir_size` is zero.
    pub fn new(reservoir_size: usize, alpha: f64) -> Self {
        Self::with_clock(reservoir_size, alpha, Clock::new())
    }

    /// Creates a new `ExpDecaySample` that reads time from the given clock.
    ///
    /// # Panics
    ///
    /// Panics if `reservoir_size` is zero.
    pub fn with_clock(reservoir_size: usize, alpha: f64, clock: Clock) -> Self {
        Self::from_parts(reservoir_size, alpha, clock, sampling_rng(None))
    }

    pub(crate) fn from_parts(
        reservoir_size: usize,
        alpha: f64,
        clock: Clock,
        rng: Xoshiro256StarStar,
    ) -> Self {
        assert!(reservoir_size > 0, "reservoir size must be greater than zero");

        let landmark = clock.now();
        Self {
            alpha,
            reservoir_size,
            clock,
            inner: Mutex::new(State {
                count: 0,
                landmark,
                next_rescale: landmark + RESCALE_THRESHOLD,
                heap: BinaryHeap::with_capacity(reservoir_size + 1),
                rng,
            }),
        }
    }

    /// Gets the maximum number of values this sample retains.
    pub fn reservoir_size(&self) -> usize {
        self.reservoir_size
    }

    /// Gets the decay factor of this sample.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    fn update_at(&self, now: Instant, value: i64) {
        let mut state = self.inner.lock();
        state.count += 1;

        // Rebase first, so the exponent below never covers more than one threshold.
        if now > state.next_rescale {
            self.rescale(&mut state, now);
        }

        let elapsed = now.saturating_duration_since(state.landmark).as_secs_f64();
        // `random` yields `[0, 1)`, flip it so the divisor is never zero.
        let u = 1.0 - state.rng.random::<f64>();
        let priority = OrderedFloat((self.alpha * elapsed).exp() / u);
        let weighted = Weighted { priority, value };

        if state.heap.len() < self.reservoir_size {
            state.heap.push(Reverse(weighted));
        } else if let Some(mut lowest) = state.heap.peek_mut() {
            if lowest.0.priority < priority {
                *lowest = Reverse(weighted);
            }
        }
    }

    fn rescale(&self, state: &mut State, now: Instant) {
        let previous = state.landmark;
        state.rebase(now);

        let delta = now.saturating_duration_since(previous);
        let factor = (-self.alpha * delta.as_secs_f64()).exp();
        let heap = mem::take(&mut state.heap);
        state.heap = heap
            .into_iter()
            .map(|Reverse(mut w)| {
                // After a long enough gap the factor underflows; keep keys positive and evictable.
                w.priority = OrderedFloat((w.priority.0 * factor).max(f64::MIN_POSITIVE));
                Reverse(w)
            })
            .collect();

        trace!(
            delta_secs = delta.as_secs_f64(),
            retained = state.heap.len(),
            "Rescaled exponentially-decaying sample."
        );
    }

    #[cfg(test)]
    fn priorities(&self) -> Vec<f64> {
        self.inner.lock().heap.iter().map(|Reverse(w)| w.priority.0).collect()
    }
}

impl Sample for ExpDecaySample {
    fn update(&self, value: i64) {
        self.update_at(self.clock.now(), value);
    }

    fn clear(&self) {
        let now = self.clock.now();
        let mut state = self.inner.lock();
        state.count = 0;
        state.heap.clear();
        state.rebase(now);
    }

    fn snapshot(&self) -> SampleSnapshot {
        let state = self.inner.lock();
        SampleSnapshot::new(state.count, state.count, state.values())
    }

    fn snapshot_and_reset(&self) -> SampleSnapshot {
        let now = self.clock.now();
        let mut state = self.inner.lock();
        let snapshot = SampleSnapshot::new(state.count, state.count, state.values());
        state.count = 0;
        state.heap.clear();
        state.rebase(now);
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use quanta::Clock;

    use super::{ExpDecaySample, RESCALE_THRESHOLD};
    use crate::{sample::sampling_rng, Sample};

    fn mocked(reservoir_size: usize, alpha: f64) -> (ExpDecaySample, std::sync::Arc<quanta::Mock>) {
        let (clock, mock) = Clock::mock();
        let sample = ExpDecaySample::from_parts(reservoir_size, alpha, clock, sampling_rng(Some(42)));
        (sample, mock)
    }

    #[test]
    fn test_bounded_by_reservoir_size() {
        for (reservoir_size, updates) in [(100, 10), (100, 1_000), (1_000, 100), (1_000, 10_000)] {
            let sample = ExpDecaySample::new(reservoir_size, 0.015);
            for i in 0..updates {
                sample.update(i as i64);
            }

            let snapshot = sample.snapshot();
            assert_eq!(snapshot.count(), updates as i64);
            assert_eq!(snapshot.size(), reservoir_size.min(updates));
            assert!(snapshot.values().iter().all(|v| (0..updates as i64).contains(v)));
        }
    }

    #[test]
    fn test_favors_recent_values() {
        let (sample, mock) = mocked(100, 0.5);
        for _ in 0..100 {
            sample.update(1);
        }

        mock.increment(Duration::from_secs(60));
        for _ in 0..100 {
            sample.update(2);
        }

        // exp(0.5 * 60) dwarfs any priority the older updates could have drawn.
        let snapshot = sample.snapshot();
        assert_eq!(snapshot.count(), 200);
        assert_eq!(snapshot.size(), 100);
        assert!(snapshot.values().iter().all(|v| *v == 2));
    }

    #[test]
    fn test_rescale_keeps_priorities_finite() {
        let (sample, mock) = mocked(2, 0.001);
        sample.update(1);
        mock.increment(RESCALE_THRESHOLD + Duration::from_micros(1));
        sample.update(1);

        let priorities = sample.priorities();
        assert_eq!(priorities.len(), 2);
        for priority in priorities {
            assert!(priority != 0.0, "priority decayed to zero");
            assert!(priority.is_finite(), "priority overflowed");
        }
    }

    #[test]
    fn test_priorities_stay_finite_after_long_idle_period() {
        let (sample, mock) = mocked(4, 0.015);
        sample.update(1);

        // exp(0.015 * 14h) does not fit in an f64.
        mock.increment(Duration::from_secs(14 * 60 * 60));
        sample.update(2);

        for priority in sample.priorities() {
            assert!(priority.is_finite() && priority > 0.0, "bad priority {}", priority);
        }

        for _ in 0..1_000 {
            sample.update(3);
        }

        for priority in sample.priorities() {
            assert!(priority.is_finite() && priority > 0.0, "bad priority {}", priority);
        }
        // The pre-gap value decays to the smallest key and is the first to go.
        assert!(!sample.snapshot().values().contains(&1));
    }

    #[test]
    fn test_priorities_stay_bounded_across_many_rescales() {
        let (sample, mock) = mocked(10, 0.015);
        for i in 0..48 {
            sample.update(i);
            mock.increment(RESCALE_THRESHOLD / 2);
        }

        // Without rescaling, a priority assigned after a day would be exp(0.015 * 86400), which
        // does not fit in an f64.
        for priority in sample.priorities() {
            assert!(priority.is_finite() && priority > 0.0);
        }
        assert_eq!(sample.snapshot().count(), 48);
    }

    #[test]
    fn test_snapshot_and_reset() {
        let (sample, _mock) = mocked(4, 0.015);
        for i in 0..10 {
            sample.update(i);
        }

        let snapshot = sample.snapshot_and_reset();
        assert_eq!(snapshot.count(), 10);
        assert_eq!(snapshot.req_count(), 10);
        assert_eq!(snapshot.size(), 4);

        let empty = sample.snapshot();
        assert_eq!(empty.count(), 0);
        assert!(empty.is_empty());
    }

    #[test]
    fn test_clear() {
        let (sample, _mock) = mocked(4, 0.015);
        sample.update(3);
        sample.clear();

        assert_eq!(sample.snapshot().count(), 0);
        assert!(sample.priorities().is_empty());
        assert_eq!(sample.reservoir_size(), 4);
        assert_eq!(sample.alpha(), 0.015);
    }

    #[test]
    #[should_panic(expected = "reservoir size must be greater than zero")]
    fn test_zero_capacity_panics() {
        let _ = ExpDecaySample::new(0, 0.015);
    }
}
