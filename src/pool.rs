//! Core bounded item pool

use crate::config::PoolConfig;
use crate::errors::{PoolError, PoolResult};
use crate::health::HealthStatus;
use crate::metrics::{MetricsExporter, MetricsTracker, PoolMetrics};

use crossbeam::queue::ArrayQueue;
use dashmap::DashMap;
use std::collections::HashMap;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Process-wide counter so every pool gets a distinct provenance tag.
static NEXT_POOL_ID: AtomicU64 = AtomicU64::new(0);

/// An item checked out of an [`ItemPool`]
///
/// The caller owns the item exclusively while it is checked out and gives
/// ownership back by passing it to [`ItemPool::release`]. The handle derefs
/// to the underlying value; the label identifies the item in logs.
pub struct Item<T> {
    value: T,
    label: String,
    pool_id: u64,
    serial: usize,
}

impl<T> Item<T> {
    fn new(value: T, label: String, pool_id: u64, serial: usize) -> Self {
        Self {
            value,
            label,
            pool_id,
            serial,
        }
    }

    /// The item's identity label, used for observability only
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<T> Deref for Item<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl<T> DerefMut for Item<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.value
    }
}

impl<T> fmt::Debug for Item<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("label", &self.label)
            .field("serial", &self.serial)
            .finish_non_exhaustive()
    }
}

/// Thread-safe pool over a fixed set of items
///
/// Items are constructed once, at pool construction, and cycle between the
/// pool and its callers forever after. Acquisition never blocks and the pool
/// never grows past its capacity.
///
/// # Examples
///
/// ```
/// use itempool::{ItemPool, PoolConfig};
///
/// let config = PoolConfig::new(5).with_initial_labels(["Ricou", "Pilou"]);
/// let pool = ItemPool::new(config, |label| label.to_owned()).unwrap();
///
/// let item = pool.acquire().unwrap();
/// assert_eq!(item.label(), "Ricou");
/// pool.release(item).unwrap();
/// ```
pub struct ItemPool<T: Send> {
    pool_id: u64,
    capacity: usize,
    available: ArrayQueue<Item<T>>,
    outstanding: DashMap<usize, ()>,
    validate_on_release: bool,
    validation_function: Option<fn(&T) -> bool>,
    metrics: MetricsTracker,
}

impl<T: Send> ItemPool<T> {
    /// Create a pool, eagerly building one item per configured label
    ///
    /// Fails with [`PoolError::CapacityExceeded`] when more initial labels
    /// are requested than the capacity allows; over-requests are rejected,
    /// never clamped.
    pub fn new<F>(config: PoolConfig<T>, factory: F) -> PoolResult<Self>
    where
        F: Fn(&str) -> T,
    {
        let requested = config.initial_labels.len();
        if requested > config.capacity {
            return Err(PoolError::CapacityExceeded {
                requested,
                capacity: config.capacity,
            });
        }

        // ArrayQueue rejects zero capacity; a capacity-0 pool still needs a
        // queue, it just stays empty forever.
        let available = ArrayQueue::new(config.capacity.max(1));
        let pool_id = NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed);

        for (serial, label) in config.initial_labels.iter().enumerate() {
            let value = factory(label);
            let _ = available.push(Item::new(value, label.clone(), pool_id, serial));
        }

        tracing::debug!(
            pool_id,
            capacity = config.capacity,
            initial_items = requested,
            "item pool constructed"
        );

        Ok(Self {
            pool_id,
            capacity: config.capacity,
            available,
            outstanding: DashMap::new(),
            validate_on_release: config.validate_on_release,
            validation_function: config.validation_function,
            metrics: MetricsTracker::new(),
        })
    }

    /// Check an item out of the pool
    ///
    /// Reissues the least-recently-released item first. Fails with
    /// [`PoolError::PoolExhausted`] when nothing is available; the call
    /// never blocks and never creates new items.
    pub fn acquire(&self) -> PoolResult<Item<T>> {
        match self.available.pop() {
            Some(item) => {
                self.outstanding.insert(item.serial, ());
                self.metrics.total_acquired.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(
                    pool_id = self.pool_id,
                    label = %item.label,
                    available = self.available.len(),
                    "item checked out"
                );
                Ok(item)
            }
            None => {
                self.metrics.exhausted_events.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(pool_id = self.pool_id, "pool exhausted");
                Err(PoolError::PoolExhausted)
            }
        }
    }

    /// Check an item out, or `None` when the pool is exhausted
    pub fn try_acquire(&self) -> Option<Item<T>> {
        self.acquire().ok()
    }

    /// Check an item out asynchronously, waiting up to `timeout`
    ///
    /// Polls until an item is released by another holder, then fails with
    /// [`PoolError::Timeout`] once the deadline elapses. The synchronous
    /// [`acquire`](Self::acquire) stays non-blocking; this is the only
    /// waiting surface the pool offers.
    pub async fn acquire_timeout(&self, timeout: Duration) -> PoolResult<Item<T>> {
        tokio::time::timeout(timeout, async {
            loop {
                match self.acquire() {
                    Err(PoolError::PoolExhausted) => {
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                    other => return other,
                }
            }
        })
        .await
        .map_err(|_| PoolError::Timeout(timeout))?
    }

    /// Return an item to the pool
    ///
    /// The item must have been issued by this pool instance: items from
    /// another pool are rejected with [`PoolError::ForeignItem`], and an
    /// item that is not currently checked out with
    /// [`PoolError::DoubleRelease`]. When release validation is configured,
    /// a value failing it is rejected with [`PoolError::InvalidItem`].
    /// On any rejection `available` is left untouched and the value is
    /// dropped; the pool never constructs a replacement.
    pub fn release(&self, item: Item<T>) -> PoolResult<()> {
        if item.pool_id != self.pool_id {
            self.metrics.rejected_releases.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                pool_id = self.pool_id,
                label = %item.label,
                "released item belongs to another pool"
            );
            return Err(PoolError::ForeignItem(item.label));
        }

        if self.validate_on_release {
            if let Some(validate) = self.validation_function {
                if !validate(&item.value) {
                    self.outstanding.remove(&item.serial);
                    self.metrics.rejected_releases.fetch_add(1, Ordering::Relaxed);
                    tracing::warn!(
                        pool_id = self.pool_id,
                        label = %item.label,
                        "released value failed validation"
                    );
                    return Err(PoolError::InvalidItem);
                }
            }
        }

        if self.outstanding.remove(&item.serial).is_none() {
            self.metrics.rejected_releases.fetch_add(1, Ordering::Relaxed);
            return Err(PoolError::DoubleRelease(item.label));
        }

        let label = item.label.clone();
        if let Err(item) = self.available.push(item) {
            // The queue is sized to capacity, so a full queue means the
            // outstanding bookkeeping was bypassed.
            self.outstanding.insert(item.serial, ());
            return Err(PoolError::DoubleRelease(item.label));
        }

        self.metrics.total_released.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            pool_id = self.pool_id,
            label = %label,
            available = self.available.len(),
            "item returned to the pool"
        );
        Ok(())
    }

    /// Number of items currently available for checkout
    pub fn available_count(&self) -> usize {
        self.available.len()
    }

    /// Number of items currently checked out
    pub fn outstanding_count(&self) -> usize {
        self.outstanding.len()
    }

    /// The pool's immutable item ceiling
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get a point-in-time health snapshot
    pub fn health_status(&self) -> HealthStatus {
        HealthStatus::new(self.available.len(), self.outstanding.len(), self.capacity)
    }

    /// Get pool metrics
    pub fn metrics(&self) -> PoolMetrics {
        self.metrics
            .snapshot(self.outstanding.len(), self.available.len(), self.capacity)
    }

    /// Export metrics as key/value pairs
    pub fn export_metrics(&self) -> HashMap<String, String> {
        self.metrics().export()
    }

    /// Export metrics in Prometheus exposition format
    pub fn export_metrics_prometheus(
        &self,
        pool_name: &str,
        tags: Option<&HashMap<String, String>>,
    ) -> String {
        MetricsExporter::export_prometheus(&self.metrics(), pool_name, tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::{Arc, Barrier};

    fn cat_pool(capacity: usize, labels: &[&str]) -> ItemPool<String> {
        let config = PoolConfig::new(capacity).with_initial_labels(labels.iter().copied());
        ItemPool::new(config, |label| label.to_owned()).unwrap()
    }

    #[test]
    fn test_acquire_reissues_in_fifo_order() {
        let pool = cat_pool(5, &["Ricou", "Pilou"]);

        let first = pool.acquire().unwrap();
        assert_eq!(first.label(), "Ricou");
        let second = pool.acquire().unwrap();
        assert_eq!(second.label(), "Pilou");

        assert!(matches!(pool.acquire(), Err(PoolError::PoolExhausted)));

        pool.release(first).unwrap();
        let third = pool.acquire().unwrap();
        assert_eq!(third.label(), "Ricou");
    }

    #[test]
    fn test_released_item_goes_to_the_back() {
        let pool = cat_pool(3, &["a", "b", "c"]);

        let a = pool.acquire().unwrap();
        pool.release(a).unwrap();
        assert_eq!(pool.available_count(), 3);

        assert_eq!(pool.acquire().unwrap().label(), "b");
        assert_eq!(pool.acquire().unwrap().label(), "c");
        assert_eq!(pool.acquire().unwrap().label(), "a");
    }

    #[test]
    fn test_over_capacity_construction_rejected() {
        let config = PoolConfig::new(5)
            .with_initial_labels(["Ricou", "Pilou", "Croqmou", "Voyou", "Picsou", "Filou"]);
        let result = ItemPool::new(config, |label| label.to_owned());

        assert!(matches!(
            result,
            Err(PoolError::CapacityExceeded {
                requested: 6,
                capacity: 5
            })
        ));
    }

    #[test]
    fn test_exhausted_pool_keeps_state() {
        let pool = cat_pool(2, &["a"]);
        let a = pool.acquire().unwrap();

        assert!(matches!(pool.acquire(), Err(PoolError::PoolExhausted)));
        assert_eq!(pool.available_count(), 0);
        assert_eq!(pool.outstanding_count(), 1);

        pool.release(a).unwrap();
        assert_eq!(pool.available_count(), 1);
    }

    #[test]
    fn test_zero_capacity_pool_is_always_exhausted() {
        let pool = cat_pool(0, &[]);
        assert_eq!(pool.capacity(), 0);
        assert!(matches!(pool.acquire(), Err(PoolError::PoolExhausted)));
    }

    #[test]
    fn test_invalid_release_rejected() {
        let config = PoolConfig::new(2)
            .with_initial_labels(["a", "b"])
            .with_validation(|value: &String| !value.is_empty());
        let pool = ItemPool::new(config, |label| label.to_owned()).unwrap();

        let mut item = pool.acquire().unwrap();
        item.clear();

        assert!(matches!(pool.release(item), Err(PoolError::InvalidItem)));
        assert_eq!(pool.available_count(), 1);
    }

    #[test]
    fn test_foreign_release_rejected() {
        let pool_a = cat_pool(2, &["a"]);
        let pool_b = cat_pool(2, &["b"]);

        let stray = pool_b.acquire().unwrap();
        assert!(matches!(
            pool_a.release(stray),
            Err(PoolError::ForeignItem(label)) if label == "b"
        ));
        assert_eq!(pool_a.available_count(), 1);
    }

    #[test]
    fn test_capacity_invariant_over_sequence() {
        let pool = cat_pool(3, &["a", "b", "c"]);
        let mut held = Vec::new();

        for step in 0..40 {
            if step % 3 == 0 {
                if let Some(item) = pool.try_acquire() {
                    held.push(item);
                }
            } else if let Some(item) = held.pop() {
                pool.release(item).unwrap();
            }
            assert!(pool.available_count() <= pool.capacity());
            assert_eq!(
                pool.available_count() + pool.outstanding_count(),
                pool.capacity()
            );
        }
    }

    #[test]
    fn test_concurrent_acquire_no_duplicates() {
        let labels: Vec<String> = (0..5).map(|i| format!("item-{i}")).collect();
        let config = PoolConfig::new(5)
            .with_initial_labels(labels.iter().map(String::as_str));
        let pool = Arc::new(ItemPool::new(config, |label| label.to_owned()).unwrap());
        let barrier = Arc::new(Barrier::new(50));

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let pool = Arc::clone(&pool);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    pool.acquire().map(|item| item.label().to_owned())
                })
            })
            .collect();

        let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let winners: HashSet<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        let losses = results
            .iter()
            .filter(|r| matches!(r, Err(PoolError::PoolExhausted)))
            .count();

        assert_eq!(winners.len(), 5);
        assert_eq!(losses, 45);
        assert_eq!(pool.available_count(), 0);
    }

    #[test]
    fn test_metrics_track_acquire_and_release() {
        let pool = cat_pool(2, &["a", "b"]);

        let item = pool.acquire().unwrap();
        let _ = pool.acquire().unwrap();
        assert!(matches!(pool.acquire(), Err(PoolError::PoolExhausted)));
        pool.release(item).unwrap();

        let metrics = pool.metrics();
        assert_eq!(metrics.total_acquired, 2);
        assert_eq!(metrics.total_released, 1);
        assert_eq!(metrics.exhausted_events, 1);
        assert_eq!(metrics.outstanding_items, 1);
        assert_eq!(metrics.available_items, 1);
    }

    #[tokio::test]
    async fn test_acquire_timeout_waits_for_release() {
        let pool = Arc::new(cat_pool(1, &["only"]));
        let item = pool.acquire().unwrap();

        let releaser = Arc::clone(&pool);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            releaser.release(item).unwrap();
        });

        let item = pool.acquire_timeout(Duration::from_secs(1)).await.unwrap();
        assert_eq!(item.label(), "only");
    }

    #[tokio::test]
    async fn test_acquire_timeout_elapses() {
        let pool = cat_pool(1, &["only"]);
        let _held = pool.acquire().unwrap();

        let result = pool.acquire_timeout(Duration::from_millis(50)).await;
        assert!(matches!(result, Err(PoolError::Timeout(_))));
    }
}
