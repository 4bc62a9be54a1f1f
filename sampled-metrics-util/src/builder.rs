use quanta::Clock;
use thiserror::Error;

use crate::sample::{sampling_rng, ExpDecaySample, Sample, SlidingWindowSample, UniformSample};

/// Default number of values retained by reservoir samples.
pub const DEFAULT_RESERVOIR_SIZE: usize = 1028;

/// Default decay factor of exponentially-decaying samples.
///
/// Together with [`DEFAULT_RESERVOIR_SIZE`], this gives roughly a 99.9% confidence level with a 5%
/// margin of error over the last five minutes of updates, assuming a normal distribution.
pub const DEFAULT_ALPHA: f64 = 0.015;

/// Errors that could occur while building a sample.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BuildError {
    /// The reservoir or window size was zero.
    #[error("sample size must be greater than zero")]
    InvalidReservoirSize,

    /// The decay factor was not a finite, positive number.
    #[error("invalid decay factor: {alpha}")]
    InvalidAlpha {
        /// The rejected decay factor.
        alpha: f64,
    },
}

/// The algorithm a sample uses to decide which values to retain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SamplingStrategy {
    /// Forward-decaying priority reservoir, biased towards recent values.
    ///
    /// See [`ExpDecaySample`].
    ExponentiallyDecaying {
        /// Maximum number of retained values.
        reservoir_size: usize,
        /// Decay factor.
        alpha: f64,
    },

    /// Uniform reservoir, where every value is equally likely to be retained.
    ///
    /// See [`UniformSample`].
    Uniform {
        /// Maximum number of retained values.
        reservoir_size: usize,
    },

    /// Ring buffer of the most recent values.
    ///
    /// See [`SlidingWindowSample`].
    SlidingWindow {
        /// Number of retained values.
        size: usize,
    },
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        SamplingStrategy::ExponentiallyDecaying {
            reservoir_size: DEFAULT_RESERVOIR_SIZE,
            alpha: DEFAULT_ALPHA,
        }
    }
}

/// Builder for samples.
///
/// A single builder can be kept around and used to build any number of samples sharing the same
/// configuration, which is how registries create samples for new histograms.
///
/// Defaults to an exponentially-decaying sample with a reservoir of [`DEFAULT_RESERVOIR_SIZE`]
/// values and a decay factor of [`DEFAULT_ALPHA`].
#[derive(Clone, Default)]
pub struct SampleBuilder {
    strategy: SamplingStrategy,
    clock: Option<Clock>,
    seed: Option<u64>,
}

impl SampleBuilder {
    /// Creates a new `SampleBuilder` with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sampling strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: SamplingStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Uses an exponentially-decaying sample with the given reservoir size and decay factor.
    #[must_use]
    pub fn with_exponential_decay(self, reservoir_size: usize, alpha: f64) -> Self {
        self.with_strategy(SamplingStrategy::ExponentiallyDecaying { reservoir_size, alpha })
    }

    /// Uses a uniform sample with the given reservoir size.
    #[must_use]
    pub fn with_uniform(self, reservoir_size: usize) -> Self {
        self.with_strategy(SamplingStrategy::Uniform { reservoir_size })
    }

    /// Uses a sliding-window sample of the given size.
    #[must_use]
    pub fn with_sliding_window(self, size: usize) -> Self {
        self.with_strategy(SamplingStrategy::SlidingWindow { size })
    }

    /// Sets the clock that exponentially-decaying samples read time from.
    ///
    /// Defaults to a real clock.  Other strategies do not depend on time and ignore this setting.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Seeds the PRNG that samples use for their sampling decisions.
    ///
    /// Every sample built from a seeded builder starts from the same PRNG state, which makes
    /// sampling reproducible.  Defaults to seeding each sample from the operating system.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Gets the configured sampling strategy.
    pub fn strategy(&self) -> SamplingStrategy {
        self.strategy
    }

    /// Checks that the configuration describes a valid sample.
    ///
    /// # Errors
    ///
    /// Returns an error if the reservoir or window size is zero, or if the decay factor of an
    /// exponentially-decaying sample is not a finite, positive number.
    pub fn validate(&self) -> Result<(), BuildError> {
        let size = match self.strategy {
            SamplingStrategy::ExponentiallyDecaying { reservoir_size, alpha } => {
                if !alpha.is_finite() || alpha <= 0.0 {
                    return Err(BuildError::InvalidAlpha { alpha });
                }
                reservoir_size
            }
            SamplingStrategy::Uniform { reservoir_size } => reservoir_size,
            SamplingStrategy::SlidingWindow { size } => size,
        };

        if size == 0 {
            return Err(BuildError::InvalidReservoirSize);
        }

        Ok(())
    }

    /// Builds a sample from the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.  See [`validate`](Self::validate).
    pub fn build(&self) -> Result<Box<dyn Sample>, BuildError> {
        self.validate()?;

        let sample: Box<dyn Sample> = match self.strategy {
            SamplingStrategy::ExponentiallyDecaying { reservoir_size, alpha } => {
                let clock = self.clock.clone().unwrap_or_else(Clock::new);
                Box::new(ExpDecaySample::from_parts(
                    reservoir_size,
                    alpha,
                    clock,
                    sampling_rng(self.seed),
                ))
            }
            SamplingStrategy::Uniform { reservoir_size } => {
                Box::new(UniformSample::from_parts(reservoir_size, sampling_rng(self.seed)))
            }
            SamplingStrategy::SlidingWindow { size } => Box::new(SlidingWindowSample::new(size)),
        };

        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use quanta::Clock;

    use super::{BuildError, SampleBuilder, SamplingStrategy, DEFAULT_ALPHA, DEFAULT_RESERVOIR_SIZE};

    #[test]
    fn test_defaults() {
        let builder = SampleBuilder::new();
        assert_eq!(
            builder.strategy(),
            SamplingStrategy::ExponentiallyDecaying {
                reservoir_size: DEFAULT_RESERVOIR_SIZE,
                alpha: DEFAULT_ALPHA,
            }
        );
        assert!(builder.validate().is_ok());
    }

    #[test]
    fn test_invalid_configurations() {
        let cases = [
            (SampleBuilder::new().with_uniform(0), BuildError::InvalidReservoirSize),
            (SampleBuilder::new().with_sliding_window(0), BuildError::InvalidReservoirSize),
            (SampleBuilder::new().with_exponential_decay(0, 0.015), BuildError::InvalidReservoirSize),
            (
                SampleBuilder::new().with_exponential_decay(10, -1.0),
                BuildError::InvalidAlpha { alpha: -1.0 },
            ),
            (
                SampleBuilder::new().with_exponential_decay(10, f64::INFINITY),
                BuildError::InvalidAlpha { alpha: f64::INFINITY },
            ),
        ];

        for (builder, expected) in cases {
            assert_eq!(builder.validate(), Err(expected.clone()));
            assert_eq!(builder.build().err(), Some(expected));
        }
    }

    #[test]
    fn test_build_each_strategy() {
        let (clock, _mock) = Clock::mock();
        let builders = [
            SampleBuilder::new().with_exponential_decay(8, 0.015).with_clock(clock),
            SampleBuilder::new().with_uniform(8),
            SampleBuilder::new().with_sliding_window(8),
        ];

        for builder in builders {
            let sample = builder.build().expect("valid configuration");
            for i in 0..20 {
                sample.update(i);
            }

            let snapshot = sample.snapshot();
            assert_eq!(snapshot.req_count(), 20);
            assert_eq!(snapshot.size(), 8);
        }
    }

    #[test]
    fn test_seeded_builds_are_reproducible() {
        let builder = SampleBuilder::new().with_uniform(16).with_seed(1234);
        let first = builder.build().expect("valid configuration");
        let second = builder.build().expect("valid configuration");
        for i in 0..1_000 {
            first.update(i);
            second.update(i);
        }

        assert_eq!(first.snapshot(), second.snapshot());
    }
}
