//! In-process metrics backed by statistical reservoir sampling.
//!
//! # Overview
//! `sampled-metrics` provides concurrency-safe metrics, and registries to hold them by name.
//! Metrics are recorded in-process and read back as snapshots: shipping those snapshots anywhere
//! is left to reporters built on top of this crate.
//!
//! ## Metric types, or kinds
//! Four kinds of metrics are supported.
//!
//! ### Counters
//! A [`Counter`] holds a signed 64-bit count that is incremented or decremented by a delta.
//!
//! ### Gauges
//! A [`Gauge`] holds a signed 64-bit value, and a [`GaugeFloat64`] holds a 64-bit floating-point
//! value.  Gauges can be overwritten with an absolute value, or adjusted relative to their current
//! value.
//!
//! Counters and gauges are single atomic values: they never lock, and can be updated from any
//! number of threads.
//!
//! ### Histograms
//! A [`Histogram`] records an arbitrary number of values and reports statistics over them: count,
//! min, max, mean, standard deviation, variance, sum and percentiles.
//!
//! Memory stays bounded no matter how many values are recorded, because histograms only retain a
//! sample of them.  The sampling algorithm is chosen when the histogram is created:
//!
//! - an exponentially-decaying reservoir, biased towards recent values, which is the default
//! - a uniform reservoir, where every value is equally likely to be retained
//! - a sliding window of the most recent values
//!
//! See [`sampled_metrics_util`] for the sampling algorithms themselves.
//!
//! ## Registries
//! A [`Registry`] maps names to metrics.  [`StandardRegistry`] holds the metrics itself, while
//! [`PrefixedRegistry`] is a view over a standard registry that prepends a prefix to every name.
//!
//! ```rust
//! use sampled_metrics::{Registry, StandardRegistry};
//!
//! let registry = StandardRegistry::new();
//!
//! let requests = registry.get_or_register_counter("http.requests").unwrap();
//! requests.inc(1);
//!
//! let latency = registry.get_or_register_histogram("http.latency_us").unwrap();
//! latency.update(420);
//!
//! for (name, snapshot) in registry.get_all() {
//!     println!("{}: {:?}", name, snapshot);
//! }
//! ```
//!
//! There is no global registry: create one at the root of your application, and share it.
//!
//! ## Snapshots
//! Every metric can be read through a snapshot, or drained through a snapshot-and-reset.  Draining
//! is atomic with respect to concurrent updates: each update lands either in the returned snapshot
//! or in the metric after it has been reset.
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

pub mod atomics;

mod counter;
pub use self::counter::Counter;

mod error;
pub use self::error::RegistryError;

mod gauge;
pub use self::gauge::{Gauge, GaugeFloat64};

mod histogram;
pub use self::histogram::{Histogram, HistogramSnapshot};

mod kind;
pub use self::kind::MetricKind;

mod metric;
pub use self::metric::{Metric, MetricSnapshot};

mod registry;
pub use self::registry::{PrefixedRegistry, Registry, StandardRegistry};
