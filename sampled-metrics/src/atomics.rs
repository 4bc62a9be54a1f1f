//! Atomic types used for scalar metrics.
//!
//! Counters and gauges always need 64-bit atomics, whether or not the standard library exposes
//! them for the target architecture.  On 32-bit targets they come from `portable-atomic` instead.
//!
//! The atomic types backing [`Counter`](crate::Counter), [`Gauge`](crate::Gauge) and
//! [`GaugeFloat64`](crate::GaugeFloat64) are publicly re-exported here for downstream crates to
//! use.

use std::sync::atomic::Ordering;

#[cfg(target_pointer_width = "32")]
pub use portable_atomic::{AtomicI64, AtomicU64};
#[cfg(not(target_pointer_width = "32"))]
pub use std::sync::atomic::{AtomicI64, AtomicU64};

/// Adds `delta` to the `f64` stored as raw bits in `atomic`, returning the previous value.
pub(crate) fn fetch_add_f64(atomic: &AtomicU64, delta: f64) -> f64 {
    // The closure never declines, so `fetch_update` retries internally until it succeeds.
    let previous = atomic
        .fetch_update(Ordering::AcqRel, Ordering::Relaxed, |curr| {
            Some((f64::from_bits(curr) + delta).to_bits())
        })
        .unwrap_or_else(|previous| previous);
    f64::from_bits(previous)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::{fetch_add_f64, AtomicU64};

    #[test]
    fn test_fetch_add_f64() {
        let atomic = AtomicU64::new(1.5f64.to_bits());
        assert_eq!(fetch_add_f64(&atomic, 2.25), 1.5);
        assert_eq!(fetch_add_f64(&atomic, -0.75), 3.75);
        assert_eq!(f64::from_bits(atomic.load(Ordering::Acquire)), 3.0);
    }
}
