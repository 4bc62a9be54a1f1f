//! Reservoir samples and sample statistics used by `sampled-metrics`.
//!
//! A [`Sample`] keeps a bounded, statistically meaningful selection of the values recorded into
//! it, no matter how many values that is.  Three sampling algorithms are provided:
//!
//! - [`ExpDecaySample`], a forward-decaying priority reservoir that favors recent values
//! - [`UniformSample`], a uniform reservoir where every value is equally likely to be retained
//! - [`SlidingWindowSample`], a ring buffer of the most recent values
//!
//! Samples are read through [`SampleSnapshot`], an owned, sorted copy of the retained values that
//! exposes the usual statistics: count, min, max, mean, variance, standard deviation, sum and
//! percentiles.  The underlying computations live in [`stats`].
//!
//! [`SampleBuilder`] describes a sampling configuration that can be validated once and used to
//! build any number of samples.
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg), deny(rustdoc::broken_intra_doc_links))]

mod builder;
pub use self::builder::{
    BuildError, SampleBuilder, SamplingStrategy, DEFAULT_ALPHA, DEFAULT_RESERVOIR_SIZE,
};

mod quantile;
pub use self::quantile::{default_quantiles, parse_quantiles, Quantile, DEFAULT_QUANTILES};

pub mod sample;
pub use self::sample::{
    ExpDecaySample, Sample, SlidingWindowSample, UniformSample, RESCALE_THRESHOLD,
};

mod snapshot;
pub use self::snapshot::SampleSnapshot;

pub mod stats;
