//! Keyed registry guaranteeing one pool instance per configuration key

use crate::config::PoolConfig;
use crate::errors::PoolResult;
use crate::pool::ItemPool;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// Registry mapping configuration keys to single pool instances
///
/// The first request for a key constructs its pool; every later request
/// returns that same instance and silently ignores the supplied
/// configuration. That surprise is part of the contract: reconfiguring an
/// existing key has no effect, callers wanting different settings must use
/// a different key.
///
/// The registry is an ordinary value rather than hidden global state, so
/// tests can build a fresh one. A process-wide instance is just a
/// `PoolRegistry` stored in a `OnceLock` by the application.
///
/// # Examples
///
/// ```
/// use itempool::{PoolConfig, PoolRegistry};
///
/// let registry = PoolRegistry::new();
/// let config = PoolConfig::new(5).with_initial_labels(["Ricou", "Pilou"]);
///
/// let pool = registry
///     .get_or_create("cats", config, |label| label.to_owned())
///     .unwrap();
/// assert_eq!(pool.available_count(), 2);
/// ```
pub struct PoolRegistry<T: Send> {
    pools: DashMap<String, Arc<ItemPool<T>>>,
}

impl<T: Send> PoolRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            pools: DashMap::new(),
        }
    }

    /// Return the pool registered under `key`, constructing it if absent
    ///
    /// `config` and `factory` are only consulted when no pool exists for
    /// `key` yet. Under concurrent first access exactly one construction
    /// runs; losing callers wait on the map shard and then observe the
    /// winner's instance, so the items are never built twice. A failing
    /// construction (for example [`CapacityExceeded`]) registers nothing.
    ///
    /// [`CapacityExceeded`]: crate::PoolError::CapacityExceeded
    pub fn get_or_create<F>(
        &self,
        key: &str,
        config: PoolConfig<T>,
        factory: F,
    ) -> PoolResult<Arc<ItemPool<T>>>
    where
        F: Fn(&str) -> T,
    {
        match self.pools.entry(key.to_owned()) {
            Entry::Occupied(entry) => Ok(Arc::clone(entry.get())),
            Entry::Vacant(entry) => {
                let pool = Arc::new(ItemPool::new(config, factory)?);
                entry.insert(Arc::clone(&pool));
                tracing::debug!(key, capacity = pool.capacity(), "pool registered");
                Ok(pool)
            }
        }
    }

    /// Look up the pool for `key` without constructing anything
    pub fn get(&self, key: &str) -> Option<Arc<ItemPool<T>>> {
        self.pools.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Whether a pool exists for `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.pools.contains_key(key)
    }

    /// Number of registered pools
    pub fn len(&self) -> usize {
        self.pools.len()
    }

    /// Whether the registry holds no pools yet
    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }
}

impl<T: Send> Default for PoolRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
