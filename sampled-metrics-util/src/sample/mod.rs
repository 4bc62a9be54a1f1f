//! Bounded samples of a stream of values.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use crate::SampleSnapshot;

mod exp_decay;
pub use self::exp_decay::{ExpDecaySample, RESCALE_THRESHOLD};

mod uniform;
pub use self::uniform::UniformSample;

mod window;
pub use self::window::SlidingWindowSample;

/// A statistically significant selection of values from a stream.
///
/// Implementations hold a bounded number of values regardless of how many updates they receive,
/// alongside a count of every update seen since they were created or last cleared.  They differ
/// only in which values they choose to retain.
///
/// All methods take `&self`, and implementations synchronize internally, so a sample can be
/// shared between any number of writers and readers.
pub trait Sample: Send + Sync {
    /// Records a value.
    fn update(&self, value: i64);

    /// Discards every retained value and resets the update count.
    fn clear(&self);

    /// Takes a snapshot of the sample, leaving it untouched.
    fn snapshot(&self) -> SampleSnapshot;

    /// Takes a snapshot of the sample and clears it.
    ///
    /// Both happen under the same critical section: every update lands either in the returned
    /// snapshot or in the sample after it has been cleared, never both and never neither.
    fn snapshot_and_reset(&self) -> SampleSnapshot;
}

/// Creates the PRNG used by a sample, seeded deterministically if a seed is given.
pub(crate) fn sampling_rng(seed: Option<u64>) -> Xoshiro256StarStar {
    match seed {
        Some(seed) => Xoshiro256StarStar::seed_from_u64(seed),
        None => Xoshiro256StarStar::from_os_rng(),
    }
}
