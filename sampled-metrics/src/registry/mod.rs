//! Named collections of metrics.
use std::{
    convert::Infallible,
    sync::{Arc, PoisonError, RwLock},
};

use hashbrown::HashMap;
use sampled_metrics_util::{BuildError, SampleBuilder};
use tracing::{debug, warn};

use crate::{
    Counter, Gauge, GaugeFloat64, Histogram, Metric, MetricKind, MetricSnapshot, RegistryError,
};

mod prefixed;
pub use self::prefixed::PrefixedRegistry;

/// A named collection of metrics.
///
/// Every name maps to at most one [`Metric`].  Registries hand out shared handles, so every caller
/// asking for the same name observes the same underlying metric.
pub trait Registry {
    /// Registers `metric` under `name`.
    ///
    /// # Errors
    ///
    /// If a metric is already registered under `name`, [`RegistryError::Duplicate`] is returned and
    /// the registered metric is left in place.
    fn register(&self, name: &str, metric: Metric) -> Result<(), RegistryError>;

    /// Gets the metric registered under `name`, or registers the one returned by `factory`.
    ///
    /// `factory` is only called if nothing is registered under `name`, and at most once per name
    /// no matter how many callers race to register it.  It must not call back into the registry.
    ///
    /// # Errors
    ///
    /// If `factory` fails, its error is returned and nothing is registered.
    fn try_get_or_register_with<F, E>(&self, name: &str, factory: F) -> Result<Metric, E>
    where
        F: FnOnce() -> Result<Metric, E>;

    /// Gets the metric registered under `name`.
    fn get(&self, name: &str) -> Option<Metric>;

    /// Removes the metric registered under `name`, returning it.
    fn unregister(&self, name: &str) -> Option<Metric>;

    /// Removes every metric.
    fn unregister_all(&self);

    /// Visits every metric, along with the name it is registered under.
    ///
    /// Metrics are visited in no particular order.  The visited set is captured before the first
    /// call to `f`, which is then free to call back into the registry.
    fn each<F>(&self, f: F)
    where
        F: FnMut(&str, &Metric);

    /// Gets the sampling configuration used for histograms created by
    /// [`get_or_register_histogram`](Registry::get_or_register_histogram).
    fn histogram_sampling(&self) -> &SampleBuilder;

    /// Registers `metric` under `name`.
    ///
    /// Meant for setup code where a duplicate name is a programming error.
    ///
    /// # Panics
    ///
    /// Panics if a metric is already registered under `name`.
    fn must_register(&self, name: &str, metric: Metric) {
        if let Err(e) = self.register(name, metric) {
            panic!("{}", e);
        }
    }

    /// Gets the metric registered under `name`, or registers `metric`.
    fn get_or_register(&self, name: &str, metric: Metric) -> Metric {
        self.get_or_register_with(name, || metric)
    }

    /// Gets the metric registered under `name`, or registers the one returned by `factory`.
    ///
    /// See [`try_get_or_register_with`](Registry::try_get_or_register_with) for when `factory` is
    /// called.
    fn get_or_register_with<F>(&self, name: &str, factory: F) -> Metric
    where
        F: FnOnce() -> Metric,
    {
        match self.try_get_or_register_with(name, || Ok::<_, Infallible>(factory())) {
            Ok(metric) => metric,
            Err(never) => match never {},
        }
    }

    /// Gets the counter registered under `name`, registering a new one if needed.
    ///
    /// # Errors
    ///
    /// If `name` is bound to a metric of another kind, [`RegistryError::KindMismatch`] is returned.
    fn get_or_register_counter(&self, name: &str) -> Result<Arc<Counter>, RegistryError> {
        let metric = self.get_or_register_with(name, || Metric::from(Counter::new()));
        downcast(name, &metric, MetricKind::Counter, Metric::as_counter)
    }

    /// Gets the integer gauge registered under `name`, registering a new one if needed.
    ///
    /// # Errors
    ///
    /// If `name` is bound to a metric of another kind, [`RegistryError::KindMismatch`] is returned.
    fn get_or_register_gauge(&self, name: &str) -> Result<Arc<Gauge>, RegistryError> {
        let metric = self.get_or_register_with(name, || Metric::from(Gauge::new()));
        downcast(name, &metric, MetricKind::Gauge, Metric::as_gauge)
    }

    /// Gets the floating-point gauge registered under `name`, registering a new one if needed.
    ///
    /// # Errors
    ///
    /// If `name` is bound to a metric of another kind, [`RegistryError::KindMismatch`] is returned.
    fn get_or_register_gauge_f64(&self, name: &str) -> Result<Arc<GaugeFloat64>, RegistryError> {
        let metric = self.get_or_register_with(name, || Metric::from(GaugeFloat64::new()));
        downcast(name, &metric, MetricKind::GaugeFloat64, Metric::as_gauge_f64)
    }

    /// Gets the histogram registered under `name`, registering a new one if needed.
    ///
    /// New histograms are backed by a sample built from the registry's
    /// [`histogram_sampling`](Registry::histogram_sampling) configuration.
    ///
    /// # Errors
    ///
    /// If `name` is bound to a metric of another kind, [`RegistryError::KindMismatch`] is returned.
    fn get_or_register_histogram(&self, name: &str) -> Result<Arc<Histogram>, RegistryError> {
        self.get_or_register_histogram_with(name, self.histogram_sampling())
    }

    /// Gets the histogram registered under `name`, registering a new one backed by a sample built
    /// from `builder` if needed.
    ///
    /// # Errors
    ///
    /// If `name` is bound to a metric of another kind, [`RegistryError::KindMismatch`] is returned.
    /// If a new histogram is needed and `builder` is invalid, [`RegistryError::Build`] is returned.
    fn get_or_register_histogram_with(
        &self,
        name: &str,
        builder: &SampleBuilder,
    ) -> Result<Arc<Histogram>, RegistryError> {
        let metric = self.try_get_or_register_with(name, || {
            Histogram::with_builder(builder).map(Metric::from).map_err(RegistryError::from)
        })?;
        downcast(name, &metric, MetricKind::Histogram, Metric::as_histogram)
    }

    /// Takes a snapshot of every metric, keyed by the name it is registered under.
    fn get_all(&self) -> HashMap<String, MetricSnapshot> {
        let mut all = HashMap::new();
        self.each(|name, metric| {
            all.insert(name.to_owned(), metric.snapshot());
        });
        all
    }

    /// Takes a snapshot of every metric and resets it, keyed by the name it is registered under.
    ///
    /// Each metric is drained atomically on its own, which suits reporters that want the activity
    /// since their last report.
    fn get_all_and_reset(&self) -> HashMap<String, MetricSnapshot> {
        let mut all = HashMap::new();
        self.each(|name, metric| {
            all.insert(name.to_owned(), metric.snapshot_and_reset());
        });
        all
    }
}

fn downcast<T>(
    name: &str,
    metric: &Metric,
    expected: MetricKind,
    extract: fn(&Metric) -> Option<&Arc<T>>,
) -> Result<Arc<T>, RegistryError> {
    match extract(metric) {
        Some(inner) => Ok(Arc::clone(inner)),
        None => {
            let found = metric.kind();
            warn!(metric_name = name, %expected, %found, "Metric already registered as another kind.");
            Err(RegistryError::KindMismatch { name: name.to_owned(), expected, found })
        }
    }
}

/// The standard registry.
///
/// Holds every metric in a single map guarded by a read-write lock.  Lookups of existing metrics
/// only take the read lock: the write lock is taken when a metric is missing, and the map is
/// checked again under it before anything is created, so two callers racing to create the same
/// metric always end up sharing a single instance.
///
/// Registries are meant to be created once, at the root of an application, and shared by reference
/// or behind an [`Arc`] with whatever needs them.
pub struct StandardRegistry {
    metrics: RwLock<HashMap<String, Metric>>,
    histogram_sampling: SampleBuilder,
}

impl StandardRegistry {
    /// Creates a new, empty `StandardRegistry`.
    ///
    /// Histograms created by the registry use the default sampling configuration: an
    /// exponentially-decaying sample of 1028 values with a decay factor of 0.015.
    pub fn new() -> Self {
        Self { metrics: RwLock::new(HashMap::new()), histogram_sampling: SampleBuilder::default() }
    }

    /// Creates a new, empty `StandardRegistry` whose histograms are backed by samples built from
    /// `builder`.
    ///
    /// # Errors
    ///
    /// If `builder` is invalid, an error is returned.
    pub fn with_histogram_sampling(builder: SampleBuilder) -> Result<Self, BuildError> {
        builder.validate()?;

        Ok(Self { metrics: RwLock::new(HashMap::new()), histogram_sampling: builder })
    }

    /// Gets the number of registered metrics.
    pub fn len(&self) -> usize {
        self.metrics.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if no metrics are registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retains only the metrics for which `f` returns `true`.
    pub fn retain<F>(&self, mut f: F)
    where
        F: FnMut(&str, &Metric) -> bool,
    {
        let mut metrics = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        metrics.retain(|name, metric| {
            let keep = f(name, metric);
            if !keep {
                debug!(metric_name = name.as_str(), kind = %metric.kind(), "Unregistered metric.");
            }
            keep
        });
    }
}

impl Default for StandardRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry for StandardRegistry {
    fn register(&self, name: &str, metric: Metric) -> Result<(), RegistryError> {
        let mut metrics = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        if metrics.contains_key(name) {
            warn!(metric_name = name, "Rejected duplicate metric registration.");
            return Err(RegistryError::Duplicate { name: name.to_owned() });
        }

        debug!(metric_name = name, kind = %metric.kind(), "Registered metric.");
        metrics.insert(name.to_owned(), metric);
        Ok(())
    }

    fn try_get_or_register_with<F, E>(&self, name: &str, factory: F) -> Result<Metric, E>
    where
        F: FnOnce() -> Result<Metric, E>,
    {
        // Try and get the metric if it exists.
        let metrics_read = self.metrics.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(metric) = metrics_read.get(name) {
            return Ok(metric.clone());
        }

        // Switch to the write guard, and check again before creating the metric.
        drop(metrics_read);
        let mut metrics_write = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(metric) = metrics_write.get(name) {
            return Ok(metric.clone());
        }

        let metric = factory()?;
        debug!(metric_name = name, kind = %metric.kind(), "Registered metric.");
        metrics_write.insert(name.to_owned(), metric.clone());
        Ok(metric)
    }

    fn get(&self, name: &str) -> Option<Metric> {
        self.metrics.read().unwrap_or_else(PoisonError::into_inner).get(name).cloned()
    }

    fn unregister(&self, name: &str) -> Option<Metric> {
        let removed = self.metrics.write().unwrap_or_else(PoisonError::into_inner).remove(name);
        if let Some(metric) = &removed {
            debug!(metric_name = name, kind = %metric.kind(), "Unregistered metric.");
        }
        removed
    }

    fn unregister_all(&self) {
        let mut metrics = self.metrics.write().unwrap_or_else(PoisonError::into_inner);
        let removed = metrics.len();
        metrics.clear();
        debug!(removed, "Unregistered all metrics.");
    }

    fn each<F>(&self, mut f: F)
    where
        F: FnMut(&str, &Metric),
    {
        let entries = self
            .metrics
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(name, metric)| (name.clone(), metric.clone()))
            .collect::<Vec<_>>();

        for (name, metric) in &entries {
            f(name, metric);
        }
    }

    fn histogram_sampling(&self) -> &SampleBuilder {
        &self.histogram_sampling
    }
}
