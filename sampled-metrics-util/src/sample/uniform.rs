//! A uniform sampling reservoir.

use std::mem;

use parking_lot::Mutex;
use rand::Rng;
use rand_xoshiro::Xoshiro256StarStar;

use super::{sampling_rng, Sample};
use crate::SampleSnapshot;

struct Reservoir {
    values: Vec<i64>,
    count: i64,
    rng: Xoshiro256StarStar,
}

impl Reservoir {
    fn push(&mut self, capacity: usize, value: i64) {
        self.count += 1;
        if self.values.len() < capacity {
            self.values.push(value);
        } else {
            let idx = self.rng.random_range(0..self.count);
            if let Ok(idx) = usize::try_from(idx) {
                if idx < capacity {
                    self.values[idx] = value;
                }
            }
        }
    }

    fn snapshot(&self) -> SampleSnapshot {
        SampleSnapshot::new(self.count, self.count, self.values.clone())
    }

    fn take(&mut self, capacity: usize) -> SampleSnapshot {
        let values = mem::replace(&mut self.values, Vec::with_capacity(capacity));
        let count = mem::take(&mut self.count);
        SampleSnapshot::new(count, count, values)
    }
}

/// A uniform sampling reservoir.
///
/// [Reservoir sampling][rs] produces a statistically representative sample of a data stream, in a
/// fixed space, without knowing the length of the stream in advance.  `UniformSample` is based on
/// Vitter's ["Algorithm R"][vitter_paper]: the first `reservoir_size` values are always kept, and
/// the `n`-th value after that replaces a random retained value with probability
/// `reservoir_size / n`.  At any point, every value seen so far is equally likely to be retained.
///
/// Sampling decisions come from a [Xoshiro256**][xoshiro256starstar] PRNG owned by the sample.
///
/// [rs]: https://en.wikipedia.org/wiki/Reservoir_sampling
/// [vitter_paper]: https://www.cs.umd.edu/~samir/498/vitter.pdf
/// [xoshiro256starstar]: https://prng.di.unimi.it
pub struct UniformSample {
    reservoir_size: usize,
    inner: Mutex<Reservoir>,
}

impl UniformSample {
    /// Creates a new `UniformSample` that retains up to `reservoir_size` values.
    ///
    /// # Panics
    ///
    /// Panics if `reservoir_size` is zero.
    pub fn new(reservoir_size: usize) -> Self {
        Self::from_parts(reservoir_size, sampling_rng(None))
    }

    /// Creates a new `UniformSample` whose sampling decisions are derived from `seed`.
    ///
    /// Two samples created with the same seed and fed the same values retain the same values.
    ///
    /// # Panics
    ///
    /// Panics if `reservoir_size` is zero.
    pub fn with_seed(reservoir_size: usize, seed: u64) -> Self {
        Self::from_parts(reservoir_size, sampling_rng(Some(seed)))
    }

    pub(crate) fn from_parts(reservoir_size: usize, rng: Xoshiro256StarStar) -> Self {
        assert!(reservoir_size > 0, "reservoir size must be greater than zero");

        Self {
            reservoir_size,
            inner: Mutex::new(Reservoir {
                values: Vec::with_capacity(reservoir_size),
                count: 0,
                rng,
            }),
        }
    }

    /// Gets the maximum number of values this sample retains.
    pub fn reservoir_size(&self) -> usize {
        self.reservoir_size
    }
}

impl Sample for UniformSample {
    fn update(&self, value: i64) {
        self.inner.lock().push(self.reservoir_size, value);
    }

    fn clear(&self) {
        let _ = self.inner.lock().take(self.reservoir_size);
    }

    fn snapshot(&self) -> SampleSnapshot {
        self.inner.lock().snapshot()
    }

    fn snapshot_and_reset(&self) -> SampleSnapshot {
        self.inner.lock().take(self.reservoir_size)
    }
}
