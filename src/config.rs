//! Pool configuration options

/// Configuration for a bounded item pool
///
/// # Examples
///
/// ```
/// use itempool::PoolConfig;
///
/// let config = PoolConfig::<String>::new(5)
///     .with_initial_labels(["Ricou", "Pilou"]);
///
/// assert_eq!(config.capacity, 5);
/// assert_eq!(config.initial_labels.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig<T> {
    /// Maximum number of items the pool will ever construct
    pub capacity: usize,

    /// Labels of the items built eagerly at pool construction
    pub initial_labels: Vec<String>,

    /// Whether to validate values when they are released back to the pool
    pub validate_on_release: bool,

    /// Custom validation function run on release
    pub validation_function: Option<fn(&T) -> bool>,
}

impl<T> Default for PoolConfig<T> {
    fn default() -> Self {
        Self {
            capacity: 5,
            initial_labels: Vec::new(),
            validate_on_release: false,
            validation_function: None,
        }
    }
}

impl<T> PoolConfig<T> {
    /// Create a configuration with the given capacity and no initial items
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Set the labels of the items to build at construction
    ///
    /// The pool rejects the configuration at construction time if more
    /// labels are given than the capacity allows.
    pub fn with_initial_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.initial_labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Enable validation of values on release
    ///
    /// # Examples
    ///
    /// ```
    /// use itempool::PoolConfig;
    ///
    /// let config = PoolConfig::<String>::new(3)
    ///     .with_validation(|s| !s.is_empty());
    ///
    /// assert!(config.validate_on_release);
    /// ```
    pub fn with_validation(mut self, func: fn(&T) -> bool) -> Self {
        self.validate_on_release = true;
        self.validation_function = Some(func);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = PoolConfig::<u32>::new(10)
            .with_initial_labels(["a", "b", "c"])
            .with_validation(|n| *n > 0);

        assert_eq!(config.capacity, 10);
        assert_eq!(config.initial_labels, vec!["a", "b", "c"]);
        assert!(config.validate_on_release);
        assert!(config.validation_function.is_some());
    }

    #[test]
    fn test_default_has_no_initial_items() {
        let config = PoolConfig::<u32>::default();
        assert!(config.initial_labels.is_empty());
        assert!(!config.validate_on_release);
    }
}
