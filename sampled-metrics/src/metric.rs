use std::sync::Arc;

use crate::{Counter, Gauge, GaugeFloat64, Histogram, HistogramSnapshot, MetricKind};

/// A metric held by a registry.
///
/// Registries only ever hold one of these four kinds.  Each variant holds a shared handle: cloning
/// a `Metric` clones the handle, and both clones refer to the same underlying metric.
#[derive(Clone, Debug)]
pub enum Metric {
    /// A counter.
    Counter(Arc<Counter>),
    /// An integer gauge.
    Gauge(Arc<Gauge>),
    /// A floating-point gauge.
    GaugeFloat64(Arc<GaugeFloat64>),
    /// A histogram.
    Histogram(Arc<Histogram>),
}

impl Metric {
    /// Gets the kind of this metric.
    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Counter(_) => MetricKind::Counter,
            Metric::Gauge(_) => MetricKind::Gauge,
            Metric::GaugeFloat64(_) => MetricKind::GaugeFloat64,
            Metric::Histogram(_) => MetricKind::Histogram,
        }
    }

    /// Takes a snapshot of the metric.
    pub fn snapshot(&self) -> MetricSnapshot {
        match self {
            Metric::Counter(c) => MetricSnapshot::Counter(c.snapshot()),
            Metric::Gauge(g) => MetricSnapshot::Gauge(g.snapshot()),
            Metric::GaugeFloat64(g) => MetricSnapshot::GaugeFloat64(g.snapshot()),
            Metric::Histogram(h) => MetricSnapshot::Histogram(h.snapshot()),
        }
    }

    /// Takes a snapshot of the metric and resets it, in one atomic step.
    pub fn snapshot_and_reset(&self) -> MetricSnapshot {
        match self {
            Metric::Counter(c) => MetricSnapshot::Counter(c.snapshot_and_reset()),
            Metric::Gauge(g) => MetricSnapshot::Gauge(g.snapshot_and_reset()),
            Metric::GaugeFloat64(g) => MetricSnapshot::GaugeFloat64(g.snapshot_and_reset()),
            Metric::Histogram(h) => MetricSnapshot::Histogram(h.snapshot_and_reset()),
        }
    }

    /// Gets the counter, if this metric is one.
    pub fn as_counter(&self) -> Option<&Arc<Counter>> {
        match self {
            Metric::Counter(c) => Some(c),
            _ => None,
        }
    }

    /// Gets the integer gauge, if this metric is one.
    pub fn as_gauge(&self) -> Option<&Arc<Gauge>> {
        match self {
            Metric::Gauge(g) => Some(g),
            _ => None,
        }
    }

    /// Gets the floating-point gauge, if this metric is one.
    pub fn as_gauge_f64(&self) -> Option<&Arc<GaugeFloat64>> {
        match self {
            Metric::GaugeFloat64(g) => Some(g),
            _ => None,
        }
    }

    /// Gets the histogram, if this metric is one.
    pub fn as_histogram(&self) -> Option<&Arc<Histogram>> {
        match self {
            Metric::Histogram(h) => Some(h),
            _ => None,
        }
    }

    /// Returns `true` if both metrics refer to the same underlying metric.
    pub fn ptr_eq(&self, other: &Metric) -> bool {
        match (self, other) {
            (Metric::Counter(a), Metric::Counter(b)) => Arc::ptr_eq(a, b),
            (Metric::Gauge(a), Metric::Gauge(b)) => Arc::ptr_eq(a, b),
            (Metric::GaugeFloat64(a), Metric::GaugeFloat64(b)) => Arc::ptr_eq(a, b),
            (Metric::Histogram(a), Metric::Histogram(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

macro_rules! impl_from_metric {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Metric {
            fn from(metric: $ty) -> Self {
                Metric::$variant(Arc::new(metric))
            }
        }

        impl From<Arc<$ty>> for Metric {
            fn from(metric: Arc<$ty>) -> Self {
                Metric::$variant(metric)
            }
        }
    };
}

impl_from_metric!(Counter, Counter);
impl_from_metric!(Gauge, Gauge);
impl_from_metric!(GaugeFloat64, GaugeFloat64);
impl_from_metric!(Histogram, Histogram);

/// A point-in-time copy of a [`Metric`].
#[derive(Clone, Debug, PartialEq)]
pub enum MetricSnapshot {
    /// The count of a counter.
    Counter(i64),
    /// The value of an integer gauge.
    Gauge(i64),
    /// The value of a floating-point gauge.
    GaugeFloat64(f64),
    /// A histogram snapshot.
    Histogram(HistogramSnapshot),
}

impl MetricSnapshot {
    /// Gets the kind of the metric this snapshot was taken from.
    pub fn kind(&self) -> MetricKind {
        match self {
            MetricSnapshot::Counter(_) => MetricKind::Counter,
            MetricSnapshot::Gauge(_) => MetricKind::Gauge,
            MetricSnapshot::GaugeFloat64(_) => MetricKind::GaugeFloat64,
            MetricSnapshot::Histogram(_) => MetricKind::Histogram,
        }
    }
}
