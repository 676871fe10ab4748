// ============================================================================
// Kernel Factory
// Creates kernel contexts with validated configuration
// ============================================================================

use crate::domain::KernelConfig;
use crate::engine::KernelContext;
use crate::interfaces::KernelObserver;
use crate::numeric::{PrecisionPolicy, RoundingRule};
use std::sync::Arc;

// ============================================================================
// Factory Functions
// ============================================================================

/// Creates a kernel context from configuration
///
/// # Arguments
/// * `config` - Kernel configuration
/// * `observer` - Observer for kernel events
///
/// # Returns
/// * `Result<KernelContext, String>` - Configured kernel or error
///
/// # Example
/// ```
/// use numeric_tower::prelude::*;
/// use numeric_tower::engine::factory::create_from_config;
/// use std::sync::Arc;
///
/// let config = KernelConfig::decimal64();
/// let kernel = create_from_config(config, Arc::new(NoOpObserver)).unwrap();
/// assert_eq!(kernel.default_policy().digits(), 16);
/// ```
pub fn create_from_config(
    config: KernelConfig,
    observer: Arc<dyn KernelObserver>,
) -> Result<KernelContext, String> {
    config.validate()?;

    tracing::debug!(
        digits = config.default_policy.digits(),
        max_iterations = config.max_iterations,
        guard_digits = config.guard_digits,
        "kernel context created"
    );
    Ok(KernelContext::new(config, observer))
}

// ============================================================================
// Builder Pattern for Advanced Configuration
// ============================================================================

/// Builder for creating kernel contexts with fluent API
///
/// # Example
/// ```
/// use numeric_tower::prelude::*;
/// use numeric_tower::engine::factory::KernelContextBuilder;
/// use std::sync::Arc;
///
/// let kernel = KernelContextBuilder::new()
///     .with_digits(50)
///     .with_rounding(RoundingRule::HalfUp)
///     .with_max_iterations(20_000)
///     .build(Arc::new(NoOpObserver))
///     .unwrap();
/// assert_eq!(kernel.default_policy().digits(), 50);
/// ```
pub struct KernelContextBuilder {
    config: KernelConfig,
}

impl Default for KernelContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl KernelContextBuilder {
    /// Create a builder with the standard configuration
    pub fn new() -> Self {
        Self {
            config: KernelConfig::standard(),
        }
    }

    // ========================================================================
    // Default Policy Configuration
    // ========================================================================

    /// Set the default policy
    pub fn with_policy(mut self, policy: PrecisionPolicy) -> Self {
        self.config.default_policy = policy;
        self
    }

    /// Set the default policy's digit count
    pub fn with_digits(mut self, digits: u32) -> Self {
        self.config.default_policy = self.config.default_policy.with_digits(digits);
        self
    }

    /// Set the default policy's rounding rule
    pub fn with_rounding(mut self, rounding: RoundingRule) -> Self {
        self.config.default_policy = self.config.default_policy.with_rounding(rounding);
        self
    }

    // ========================================================================
    // Iteration Configuration
    // ========================================================================

    /// Set the iteration cap of every Newton loop and series
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.config.max_iterations = max_iterations;
        self
    }

    /// Set the number of guard digits
    pub fn with_guard_digits(mut self, guard_digits: u32) -> Self {
        self.config.guard_digits = guard_digits;
        self
    }

    /// Set the logarithm series term budget per digit
    pub fn with_series_terms_per_digit(mut self, terms: usize) -> Self {
        self.config.series_terms_per_digit = terms;
        self
    }

    /// Set the digits used for irrational results under an unlimited policy
    pub fn with_unlimited_digits(mut self, digits: u32) -> Self {
        self.config.unlimited_digits = digits;
        self
    }

    // ========================================================================
    // Cache Configuration
    // ========================================================================

    /// Bound the factorial memo table
    pub fn with_factorial_cache_limit(mut self, limit: usize) -> Self {
        self.config.factorial_cache_limit = Some(limit);
        self
    }

    // ========================================================================
    // Preset Configurations
    // ========================================================================

    /// Start from the decimal64 preset
    pub fn decimal64() -> Self {
        Self {
            config: KernelConfig::decimal64(),
        }
    }

    /// Start from the high-precision preset
    pub fn high_precision() -> Self {
        Self {
            config: KernelConfig::high_precision(),
        }
    }

    /// Start from the bounded preset
    pub fn bounded(max_iterations: usize) -> Self {
        Self {
            config: KernelConfig::bounded(max_iterations),
        }
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Build the kernel context
    pub fn build(self, observer: Arc<dyn KernelObserver>) -> Result<KernelContext, String> {
        create_from_config(self.config, observer)
    }

    /// Get the configuration without building (for inspection)
    pub fn get_config(&self) -> &KernelConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Real;
    use crate::interfaces::{NoOpObserver, RecordingObserver};

    #[test]
    fn test_create_standard_kernel() {
        let kernel = create_from_config(KernelConfig::standard(), Arc::new(NoOpObserver)).unwrap();
        assert!(kernel.default_policy().is_unlimited());
    }

    #[test]
    fn test_create_rejects_invalid_config() {
        let config = KernelConfig::standard().with_max_iterations(0);
        assert!(create_from_config(config, Arc::new(NoOpObserver)).is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let kernel = KernelContextBuilder::new()
            .with_digits(25)
            .with_rounding(RoundingRule::Down)
            .with_guard_digits(5)
            .build(Arc::new(NoOpObserver))
            .unwrap();

        assert_eq!(
            kernel.default_policy(),
            PrecisionPolicy::new(25, RoundingRule::Down)
        );
        assert_eq!(kernel.config().guard_digits, 5);
    }

    #[test]
    fn test_builder_cache_limit() {
        let kernel = KernelContextBuilder::new()
            .with_factorial_cache_limit(4)
            .build(Arc::new(NoOpObserver))
            .unwrap();
        assert!(kernel.config().caches_factorial(4));
        assert!(!kernel.config().caches_factorial(5));
    }

    #[test]
    fn test_builder_get_config() {
        let builder = KernelContextBuilder::bounded(500).with_unlimited_digits(20);
        assert_eq!(builder.get_config().max_iterations, 500);
        assert_eq!(builder.get_config().unlimited_digits, 20);
        assert!(builder.get_config().validate().is_ok());
    }

    #[test]
    fn test_preset_builders() {
        let observer = Arc::new(RecordingObserver::new());
        let precise = KernelContextBuilder::high_precision()
            .build(observer.clone())
            .unwrap();
        assert_eq!(precise.default_policy().digits(), 100);

        let policy = precise.default_policy();
        let sqrt2 = precise.nth_root(&Real::from_i64(2, policy), 2, policy).unwrap();
        assert!(sqrt2.to_string().starts_with("1.4142135623730950488016887242096980785696"));
        assert!(!observer.is_empty());

        let decimal = KernelContextBuilder::decimal64()
            .build(Arc::new(NoOpObserver))
            .unwrap();
        assert_eq!(decimal.default_policy(), PrecisionPolicy::decimal64());
    }
}
