use sampled_metrics_util::BuildError;
use thiserror::Error;

use crate::MetricKind;

/// Errors that could occur while registering metrics.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RegistryError {
    /// A metric was already registered under the name.
    ///
    /// The metric that was already registered is left in place.
    #[error("duplicate metric: {name}")]
    Duplicate {
        /// The full name of the metric.
        name: String,
    },

    /// The name is bound to a metric of a different kind than the one requested.
    #[error("metric {name} is a {found}, not a {expected}")]
    KindMismatch {
        /// The full name of the metric.
        name: String,
        /// The requested kind.
        expected: MetricKind,
        /// The kind of the registered metric.
        found: MetricKind,
    },

    /// The sample backing a new histogram could not be built.
    #[error("failed to build histogram sample: {0}")]
    Build(#[from] BuildError),
}
