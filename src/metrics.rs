//! Metrics collection and export for item pools

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Metrics snapshot for a pool
///
/// # Examples
///
/// ```
/// use itempool::{ItemPool, PoolConfig};
///
/// let config = PoolConfig::new(3).with_initial_labels(["a", "b", "c"]);
/// let pool = ItemPool::new(config, |label| label.to_owned()).unwrap();
///
/// let _item = pool.acquire().unwrap();
/// let metrics = pool.metrics();
/// assert_eq!(metrics.total_acquired, 1);
/// assert_eq!(metrics.outstanding_items, 1);
/// ```
#[derive(Debug, Clone)]
pub struct PoolMetrics {
    /// Total items checked out over the pool's lifetime
    pub total_acquired: usize,

    /// Total items returned over the pool's lifetime
    pub total_released: usize,

    /// Items currently checked out
    pub outstanding_items: usize,

    /// Items currently available
    pub available_items: usize,

    /// Number of acquires that found the pool empty
    pub exhausted_events: usize,

    /// Releases rejected as invalid or foreign
    pub rejected_releases: usize,

    /// Pool utilization ratio (0.0 to 1.0)
    pub utilization: f64,

    /// The pool's capacity
    pub capacity: usize,
}

impl PoolMetrics {
    /// Export metrics as a HashMap
    pub fn export(&self) -> HashMap<String, String> {
        let mut metrics = HashMap::new();
        metrics.insert("total_acquired".to_string(), self.total_acquired.to_string());
        metrics.insert("total_released".to_string(), self.total_released.to_string());
        metrics.insert(
            "outstanding_items".to_string(),
            self.outstanding_items.to_string(),
        );
        metrics.insert(
            "available_items".to_string(),
            self.available_items.to_string(),
        );
        metrics.insert(
            "exhausted_events".to_string(),
            self.exhausted_events.to_string(),
        );
        metrics.insert(
            "rejected_releases".to_string(),
            self.rejected_releases.to_string(),
        );
        metrics.insert("utilization".to_string(), format!("{:.2}", self.utilization));
        metrics.insert("capacity".to_string(), self.capacity.to_string());
        metrics
    }
}

/// Metrics exporter for Prometheus format
pub struct MetricsExporter;

impl MetricsExporter {
    /// Export metrics in Prometheus exposition format
    ///
    /// # Examples
    ///
    /// ```
    /// use itempool::{ItemPool, PoolConfig};
    ///
    /// let config = PoolConfig::new(2).with_initial_labels(["a", "b"]);
    /// let pool = ItemPool::new(config, |label| label.to_owned()).unwrap();
    ///
    /// let output = pool.export_metrics_prometheus("cats", None);
    /// assert!(output.contains("itempool_items_available{pool=\"cats\"} 2"));
    /// ```
    pub fn export_prometheus(
        metrics: &PoolMetrics,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        let mut output = String::new();
        let labels = Self::format_labels(pool_name, tags);

        // Gauge metrics
        output.push_str("# HELP itempool_items_outstanding Items currently checked out\n");
        output.push_str("# TYPE itempool_items_outstanding gauge\n");
        output.push_str(&format!(
            "itempool_items_outstanding{{{}}} {}\n",
            labels, metrics.outstanding_items
        ));

        output.push_str("# HELP itempool_items_available Items currently available\n");
        output.push_str("# TYPE itempool_items_available gauge\n");
        output.push_str(&format!(
            "itempool_items_available{{{}}} {}\n",
            labels, metrics.available_items
        ));

        output.push_str("# HELP itempool_utilization Pool utilization ratio\n");
        output.push_str("# TYPE itempool_utilization gauge\n");
        output.push_str(&format!(
            "itempool_utilization{{{}}} {:.2}\n",
            labels, metrics.utilization
        ));

        // Counter metrics
        output.push_str("# HELP itempool_items_acquired_total Total items checked out\n");
        output.push_str("# TYPE itempool_items_acquired_total counter\n");
        output.push_str(&format!(
            "itempool_items_acquired_total{{{}}} {}\n",
            labels, metrics.total_acquired
        ));

        output.push_str("# HELP itempool_items_released_total Total items returned\n");
        output.push_str("# TYPE itempool_items_released_total counter\n");
        output.push_str(&format!(
            "itempool_items_released_total{{{}}} {}\n",
            labels, metrics.total_released
        ));

        output.push_str("# HELP itempool_events_exhausted_total Acquires that found the pool empty\n");
        output.push_str("# TYPE itempool_events_exhausted_total counter\n");
        output.push_str(&format!(
            "itempool_events_exhausted_total{{{}}} {}\n",
            labels, metrics.exhausted_events
        ));

        output.push_str("# HELP itempool_releases_rejected_total Releases rejected by the pool\n");
        output.push_str("# TYPE itempool_releases_rejected_total counter\n");
        output.push_str(&format!(
            "itempool_releases_rejected_total{{{}}} {}\n",
            labels, metrics.rejected_releases
        ));

        output
    }

    fn format_labels(pool_name: &str, tags: Option<&HashMap<String, String>>) -> String {
        let mut labels = vec![format!("pool=\"{}\"", pool_name)];

        if let Some(tags) = tags {
            for (key, value) in tags {
                labels.push(format!("{}=\"{}\"", key, value));
            }
        }

        labels.join(",")
    }
}

/// Internal metrics tracker
pub(crate) struct MetricsTracker {
    pub total_acquired: AtomicUsize,
    pub total_released: AtomicUsize,
    pub exhausted_events: AtomicUsize,
    pub rejected_releases: AtomicUsize,
}

impl MetricsTracker {
    pub fn new() -> Self {
        Self {
            total_acquired: AtomicUsize::new(0),
            total_released: AtomicUsize::new(0),
            exhausted_events: AtomicUsize::new(0),
            rejected_releases: AtomicUsize::new(0),
        }
    }

    pub fn snapshot(&self, outstanding: usize, available: usize, capacity: usize) -> PoolMetrics {
        let utilization = if capacity > 0 {
            outstanding as f64 / capacity as f64
        } else {
            0.0
        };

        PoolMetrics {
            total_acquired: self.total_acquired.load(Ordering::Relaxed),
            total_released: self.total_released.load(Ordering::Relaxed),
            outstanding_items: outstanding,
            available_items: available,
            exhausted_events: self.exhausted_events.load(Ordering::Relaxed),
            rejected_releases: self.rejected_releases.load(Ordering::Relaxed),
            utilization,
            capacity,
        }
    }
}

impl Default for MetricsTracker {
    fn default() -> Self {
        Self::new()
    }
}
