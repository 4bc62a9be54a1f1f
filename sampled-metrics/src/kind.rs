use std::fmt;

/// Metric kind.
///
/// Defines the kind, or type, of a metric held by a registry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum MetricKind {
    /// Counter type.
    Counter,
    /// Integer gauge type.
    Gauge,
    /// Floating-point gauge type.
    GaugeFloat64,
    /// Histogram type.
    Histogram,
}

impl MetricKind {
    /// Gets the name of this kind, as used in logs and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::GaugeFloat64 => "gauge_f64",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
