//! Health monitoring for item pools

/// Point-in-time health snapshot of a pool
///
/// # Examples
///
/// ```
/// use itempool::{ItemPool, PoolConfig};
///
/// let config = PoolConfig::new(3).with_initial_labels(["a", "b", "c"]);
/// let pool = ItemPool::new(config, |label| label.to_owned()).unwrap();
///
/// let health = pool.health_status();
/// assert!(health.is_healthy());
/// assert_eq!(health.available_items, 3);
/// ```
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the pool is healthy
    pub is_healthy: bool,

    /// Current pool utilization (0.0 to 1.0)
    pub utilization: f64,

    /// Available items count
    pub available_items: usize,

    /// Outstanding (checked out) items count
    pub outstanding_items: usize,

    /// Total capacity
    pub capacity: usize,

    /// Warning messages
    pub warnings: Vec<String>,
}

impl HealthStatus {
    /// Create a new health status from the pool's counts
    pub fn new(available: usize, outstanding: usize, capacity: usize) -> Self {
        let utilization = if capacity > 0 {
            outstanding as f64 / capacity as f64
        } else {
            0.0
        };

        let mut warnings = Vec::new();
        let mut is_healthy = true;

        if utilization > 0.9 {
            warnings.push(format!("High utilization: {:.1}%", utilization * 100.0));
            is_healthy = false;
        }

        if available == 0 && capacity > 0 {
            warnings.push("Pool is exhausted".to_string());
        }

        Self {
            is_healthy,
            utilization,
            available_items: available,
            outstanding_items: outstanding,
            capacity,
            warnings,
        }
    }

    /// Check if the pool is healthy
    pub fn is_healthy(&self) -> bool {
        self.is_healthy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_utilization_warns() {
        let health = HealthStatus::new(0, 5, 5);
        assert!(!health.is_healthy());
        assert_eq!(health.warnings.len(), 2);
    }

    #[test]
    fn test_idle_pool_is_healthy() {
        let health = HealthStatus::new(5, 0, 5);
        assert!(health.is_healthy());
        assert!(health.warnings.is_empty());
        assert_eq!(health.utilization, 0.0);
    }
}
