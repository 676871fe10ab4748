// ============================================================================
// Kernel Context
// Owns the caches, configuration and observer shared by kernel operations
// ============================================================================

use super::factorial::FactorialCache;
use crate::domain::{ConstantRegistry, ImaginaryUnit, KernelConfig, Number, One, Real, Zero};
use crate::interfaces::{KernelEvent, KernelObserver, NoOpObserver};
use crate::numeric::{BigDecimal, PrecisionPolicy, TowerError, TowerResult};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

/// Guard digits never drop below this, whatever the configuration says
const MIN_GUARD_DIGITS: u32 = 3;

/// Entry point to the algorithmic kernel.
///
/// The context owns the factorial memo table and the constant registry that
/// would otherwise be process-wide globals. Construct one per application
/// (or per test) and share it; every method takes `&self`, and the caches
/// synchronise internally, so an `Arc<KernelContext>` can be used from any
/// number of threads.
///
/// # Example
/// ```
/// use numeric_tower::prelude::*;
///
/// let kernel = KernelContext::with_defaults();
/// let policy = PrecisionPolicy::new(10, RoundingRule::HalfEven);
/// let x = Real::from_i64(2, policy);
/// assert_eq!(kernel.ln(&x, policy).unwrap().to_string(), "0.6931471806");
/// ```
pub struct KernelContext {
    config: KernelConfig,
    factorials: FactorialCache,
    constants: ConstantRegistry,
    observer: Arc<dyn KernelObserver>,
}

impl KernelContext {
    /// Create a kernel context
    pub fn new(config: KernelConfig, observer: Arc<dyn KernelObserver>) -> Self {
        Self {
            config,
            factorials: FactorialCache::new(),
            constants: ConstantRegistry::new(),
            observer,
        }
    }

    /// Standard configuration, no observer
    pub fn with_defaults() -> Self {
        Self::new(KernelConfig::standard(), Arc::new(NoOpObserver))
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    #[inline]
    pub fn factorial_cache(&self) -> &FactorialCache {
        &self.factorials
    }

    #[inline]
    pub fn constants(&self) -> &ConstantRegistry {
        &self.constants
    }

    #[inline]
    pub fn default_policy(&self) -> PrecisionPolicy {
        self.config.default_policy
    }

    // ========================================================================
    // Canonical Identities
    // ========================================================================

    pub fn zero(&self, policy: PrecisionPolicy) -> Arc<Number> {
        self.constants.canonical::<Zero>(policy)
    }

    pub fn one(&self, policy: PrecisionPolicy) -> Arc<Number> {
        self.constants.canonical::<One>(policy)
    }

    pub fn imaginary_unit(&self, policy: PrecisionPolicy) -> Arc<Number> {
        self.constants.canonical::<ImaginaryUnit>(policy)
    }

    // ========================================================================
    // Shared Helpers
    // ========================================================================

    pub(crate) fn emit(&self, event: KernelEvent) {
        self.observer.on_event(event);
    }

    /// Significant digits of an irrational result under `policy`
    #[inline]
    pub(crate) fn target_digits(&self, policy: &PrecisionPolicy) -> u32 {
        self.config.target_digits(policy)
    }

    /// Digits carried internally for a result of `target` digits
    #[inline]
    pub(crate) fn working_digits(&self, target: u32) -> u32 {
        target + self.config.guard_digits.max(MIN_GUARD_DIGITS)
    }

    #[inline]
    pub(crate) fn max_iterations(&self) -> usize {
        self.config.max_iterations
    }

    /// Round an internally computed value to the caller's policy and tag it
    /// as inexact.
    pub(crate) fn finish(&self, value: BigDecimal, policy: PrecisionPolicy) -> Real {
        let (rounded, _) =
            value.round_to_precision(self.target_digits(&policy), policy.rounding());
        Real::approximate(rounded, policy)
    }

    pub(crate) fn converged(&self, operation: &'static str, iterations: usize) {
        tracing::trace!(operation, iterations, "iteration converged");
        self.emit(KernelEvent::Converged {
            operation: operation.to_string(),
            iterations,
            timestamp: Utc::now(),
        });
    }

    /// Pass a result through, reporting failures to the observer
    pub(crate) fn report<T>(&self, operation: &'static str, result: TowerResult<T>) -> TowerResult<T> {
        if let Err(error) = &result {
            self.emit(KernelEvent::Failed {
                operation: operation.to_string(),
                reason: error.to_string(),
                timestamp: Utc::now(),
            });
        }
        result
    }

    /// Fail an iteration that has used up its budget
    pub(crate) fn check_iterations(
        &self,
        operation: &'static str,
        iterations: usize,
    ) -> TowerResult<()> {
        if iterations >= self.config.max_iterations {
            Err(TowerError::ConvergenceFailure {
                operation,
                iterations,
            })
        } else {
            Ok(())
        }
    }
}

impl Default for KernelContext {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for KernelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelContext")
            .field("config", &self.config)
            .field("cached_factorials", &self.factorials.len())
            .field("cached_constants", &self.constants.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interfaces::{RecordingObserver, TowerOps};
    use crate::numeric::RoundingRule;

    #[test]
    fn test_canonical_identities_are_shared() {
        let kernel = KernelContext::with_defaults();
        let policy = PrecisionPolicy::decimal64();
        assert!(Arc::ptr_eq(&kernel.one(policy), &kernel.one(policy)));
        assert!(kernel.zero(policy).is_zero());
        assert_eq!(kernel.constants().len(), 2);
        let _ = kernel.imaginary_unit(policy);
        assert_eq!(kernel.constants().len(), 3);
    }

    #[test]
    fn test_finish_rounds_and_marks_inexact() {
        let kernel = KernelContext::with_defaults();
        let policy = PrecisionPolicy::new(3, RoundingRule::Down);
        let value: BigDecimal = "1.23999".parse().unwrap();
        let real = kernel.finish(value, policy);
        assert_eq!(real.to_string(), "1.23");
        assert!(!real.is_exact());
    }

    #[test]
    fn test_working_digits_has_minimum_guard() {
        let kernel = KernelContext::new(
            KernelConfig::standard().with_guard_digits(0),
            Arc::new(NoOpObserver),
        );
        assert_eq!(kernel.working_digits(20), 20 + MIN_GUARD_DIGITS);
    }

    #[test]
    fn test_report_emits_failures() {
        let observer = Arc::new(RecordingObserver::new());
        let kernel = KernelContext::new(KernelConfig::standard(), observer.clone());
        let result: TowerResult<()> = kernel.report("ln", Err(TowerError::DivisionByZero));
        assert!(result.is_err());
        let events = observer.drain();
        assert!(matches!(&events[0], KernelEvent::Failed { operation, .. } if operation == "ln"));
    }
}
