//! Error types for the item pool

use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum PoolError {
    #[error("cannot create {requested} items, the capacity is {capacity}")]
    CapacityExceeded { requested: usize, capacity: usize },

    #[error("pool is exhausted - no item available")]
    PoolExhausted,

    #[error("released value failed the pool's validation check")]
    InvalidItem,

    #[error("item '{0}' does not belong to this pool")]
    ForeignItem(String),

    #[error("item '{0}' is already in the pool")]
    DoubleRelease(String),

    #[error("acquire timed out after {0:?}")]
    Timeout(std::time::Duration),
}

pub type PoolResult<T> = Result<T, PoolError>;
