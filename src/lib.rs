//! # itempool
//!
//! Bounded, thread-safe item pool with a keyed singleton registry.
//!
//! A pool holds a fixed set of expensive-to-create items, built once at
//! construction. Callers check items out with [`ItemPool::acquire`] and
//! give them back with [`ItemPool::release`]; the pool never grows past
//! its capacity and an empty pool fails fast instead of blocking. The
//! [`PoolRegistry`] guarantees at most one pool instance per configuration
//! key, constructing lazily on first request.
//!
//! ## Features
//!
//! - Fixed capacity, eager item construction, deterministic FIFO reuse
//! - Lock-free acquire/release via a bounded MPMC queue
//! - Keyed registry with exactly-once construction under races
//! - Provenance-tagged items: foreign releases are rejected
//! - Non-blocking core, plus an async acquire with timeout
//! - Structured `tracing` events, health snapshot, metrics export
//!
//! ## Quick Start
//!
//! ```rust
//! use itempool::{PoolConfig, PoolRegistry};
//!
//! let registry = PoolRegistry::new();
//! let config = PoolConfig::new(5).with_initial_labels(["Ricou", "Pilou"]);
//!
//! let pool = registry
//!     .get_or_create("cats", config, |label| label.to_owned())
//!     .unwrap();
//!
//! let cat = pool.acquire().unwrap();
//! println!("Got: {}", cat.label());
//! pool.release(cat).unwrap();
//! ```

mod config;
mod errors;
mod health;
mod metrics;
mod pool;
mod registry;

pub use config::PoolConfig;
pub use errors::{PoolError, PoolResult};
pub use health::HealthStatus;
pub use metrics::{MetricsExporter, PoolMetrics};
pub use pool::{Item, ItemPool};
pub use registry::PoolRegistry;
