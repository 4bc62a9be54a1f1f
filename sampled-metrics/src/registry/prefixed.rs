use std::sync::Arc;

use sampled_metrics_util::SampleBuilder;

use super::{Registry, StandardRegistry};
use crate::{Metric, RegistryError};

/// A view of a registry that prepends a prefix to every name.
///
/// Metrics registered through the view live in the underlying [`StandardRegistry`], under the
/// prefixed name, so they remain visible to anything holding the base registry.  Prefixes are
/// concatenated as-is: include a trailing separator such as `"http."` if one is wanted.
///
/// Views can be nested with [`child`](PrefixedRegistry::child), and any number of views can share
/// one base registry.
///
/// Enumeration is scoped to the view: [`each`](Registry::each), [`get_all`](Registry::get_all) and
/// [`unregister_all`](Registry::unregister_all) only ever touch metrics whose full name starts with
/// the view's prefix.  Visited metrics are reported under their full name.
#[derive(Clone)]
pub struct PrefixedRegistry {
    base: Arc<StandardRegistry>,
    prefix: String,
}

impl PrefixedRegistry {
    /// Creates a new `PrefixedRegistry` over `base`.
    ///
    /// To nest a view under an existing `PrefixedRegistry`, use [`PrefixedRegistry::child`]
    /// instead: it shares the same base and joins both prefixes.
    pub fn new<S>(base: Arc<StandardRegistry>, prefix: S) -> Self
    where
        S: Into<String>,
    {
        Self { base, prefix: prefix.into() }
    }

    /// Creates a new `PrefixedRegistry` over a new, empty base registry.
    pub fn standalone<S>(prefix: S) -> Self
    where
        S: Into<String>,
    {
        Self::new(Arc::new(StandardRegistry::new()), prefix)
    }

    /// Creates a nested view that appends `prefix` to the prefix of this view.
    ///
    /// The nested view shares the same base registry.
    pub fn child<S>(&self, prefix: S) -> Self
    where
        S: AsRef<str>,
    {
        Self::new(Arc::clone(&self.base), format!("{}{}", self.prefix, prefix.as_ref()))
    }

    /// Gets the full prefix of this view.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Gets the base registry.
    pub fn base(&self) -> &Arc<StandardRegistry> {
        &self.base
    }

    fn prefixed(&self, name: &str) -> String {
        format!("{}{}", self.prefix, name)
    }
}

impl Registry for PrefixedRegistry {
    fn register(&self, name: &str, metric: Metric) -> Result<(), RegistryError> {
        self.base.register(&self.prefixed(name), metric)
    }

    fn try_get_or_register_with<F, E>(&self, name: &str, factory: F) -> Result<Metric, E>
    where
        F: FnOnce() -> Result<Metric, E>,
    {
        self.base.try_get_or_register_with(&self.prefixed(name), factory)
    }

    fn get(&self, name: &str) -> Option<Metric> {
        self.base.get(&self.prefixed(name))
    }

    fn unregister(&self, name: &str) -> Option<Metric> {
        self.base.unregister(&self.prefixed(name))
    }

    fn unregister_all(&self) {
        self.base.retain(|name, _| !name.starts_with(&self.prefix));
    }

    fn each<F>(&self, mut f: F)
    where
        F: FnMut(&str, &Metric),
    {
        self.base.each(|name, metric| {
            if name.starts_with(&self.prefix) {
                f(name, metric);
            }
        });
    }

    fn histogram_sampling(&self) -> &SampleBuilder {
        self.base.histogram_sampling()
    }
}
