use std::{fmt, sync::atomic::Ordering};

use crate::atomics::{fetch_add_f64, AtomicI64, AtomicU64};

/// A gauge holding a signed 64-bit integer.
///
/// Gauges can be overwritten with an absolute value, or adjusted relative to their current value.
#[derive(Debug, Default)]
pub struct Gauge {
    value: AtomicI64,
}

impl Gauge {
    /// Creates a new `Gauge` starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the gauge to `value`.
    pub fn update(&self, value: i64) {
        self.value.store(value, Ordering::Release);
    }

    /// Sets the gauge to `value`, returning the previous value.
    pub fn swap(&self, value: i64) -> i64 {
        self.value.swap(value, Ordering::AcqRel)
    }

    /// Adjusts the gauge by `delta`.
    pub fn inc(&self, delta: i64) {
        let _ = self.value.fetch_add(delta, Ordering::AcqRel);
    }

    /// Adjusts the gauge by `-delta`.
    pub fn dec(&self, delta: i64) {
        let _ = self.value.fetch_sub(delta, Ordering::AcqRel);
    }

    /// Gets the current value.
    pub fn snapshot(&self) -> i64 {
        self.value.load(Ordering::Acquire)
    }

    /// Gets the current value and resets the gauge to zero, in one atomic step.
    pub fn snapshot_and_reset(&self) -> i64 {
        self.swap(0)
    }
}

/// A gauge holding a 64-bit floating-point number.
///
/// There is no native atomic floating-point type, so the value is stored as its IEEE-754 bit
/// pattern in an atomic 64-bit integer.  Relative adjustments retry a compare-and-swap until they
/// apply against an unchanged value.
///
/// A gauge created with [`GaugeFloat64::functional`] holds no value of its own: it calls a
/// function on every read, and cannot be written to.
pub struct GaugeFloat64 {
    source: Source,
}

enum Source {
    Atomic(AtomicU64),
    Functional(Box<dyn Fn() -> f64 + Send + Sync>),
}

impl Default for GaugeFloat64 {
    fn default() -> Self {
        Self { source: Source::Atomic(AtomicU64::new(0.0f64.to_bits())) }
    }
}

impl fmt::Debug for GaugeFloat64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("GaugeFloat64");
        match &self.source {
            Source::Atomic(bits) => d.field("value", &f64::from_bits(bits.load(Ordering::Acquire))),
            Source::Functional(_) => d.field("value", &"<function>"),
        };
        d.finish()
    }
}

impl GaugeFloat64 {
    /// Creates a new `GaugeFloat64` starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a read-only `GaugeFloat64` whose value is computed by `f` on every read.
    ///
    /// Useful for exposing a value owned elsewhere, such as a cache hit ratio, without copying it
    /// into the gauge on every change.
    pub fn functional<F>(f: F) -> Self
    where
        F: Fn() -> f64 + Send + Sync + 'static,
    {
        Self { source: Source::Functional(Box::new(f)) }
    }

    /// Whether this gauge was created with [`GaugeFloat64::functional`].
    pub fn is_functional(&self) -> bool {
        matches!(self.source, Source::Functional(_))
    }

    fn bits(&self, op: &str) -> &AtomicU64 {
        match &self.source {
            Source::Atomic(bits) => bits,
            Source::Functional(_) => panic!("{} called on a functional GaugeFloat64", op),
        }
    }

    /// Sets the gauge to `value`.
    ///
    /// # Panics
    ///
    /// Panics if the gauge is functional.
    pub fn update(&self, value: f64) {
        self.bits("update").store(value.to_bits(), Ordering::Release);
    }

    /// Sets the gauge to `value`, returning the previous value.
    ///
    /// # Panics
    ///
    /// Panics if the gauge is functional.
    pub fn swap(&self, value: f64) -> f64 {
        f64::from_bits(self.bits("swap").swap(value.to_bits(), Ordering::AcqRel))
    }

    /// Adjusts the gauge by `delta`.
    ///
    /// # Panics
    ///
    /// Panics if the gauge is functional.
    pub fn inc(&self, delta: f64) {
        let _ = fetch_add_f64(self.bits("inc"), delta);
    }

    /// Adjusts the gauge by `-delta`.
    ///
    /// # Panics
    ///
    /// Panics if the gauge is functional.
    pub fn dec(&self, delta: f64) {
        let _ = fetch_add_f64(self.bits("dec"), -delta);
    }

    /// Gets the current value.
    pub fn snapshot(&self) -> f64 {
        match &self.source {
            Source::Atomic(bits) => f64::from_bits(bits.load(Ordering::Acquire)),
            Source::Functional(f) => f(),
        }
    }

    /// Gets the current value and resets the gauge to zero, in one atomic step.
    ///
    /// A functional gauge has nothing to reset: its current value is returned as-is.
    pub fn snapshot_and_reset(&self) -> f64 {
        match &self.source {
            Source::Atomic(bits) => f64::from_bits(bits.swap(0.0f64.to_bits(), Ordering::AcqRel)),
            Source::Functional(f) => f(),
        }
    }
}
