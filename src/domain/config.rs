// ============================================================================
// Kernel Configuration
// Iteration caps, guard digits and default policies for the kernel
// ============================================================================

use crate::numeric::{PrecisionPolicy, RoundingRule};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a kernel context.
///
/// Every iterative algorithm (Newton loops, Taylor series) is bounded by
/// `max_iterations`; hitting the cap raises `ConvergenceFailure` instead of
/// looping forever.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct KernelConfig {
    /// Policy handed out by the context when the caller has none
    pub default_policy: PrecisionPolicy,

    /// Upper bound on iterations of any single Newton loop or series
    pub max_iterations: usize,

    /// Extra digits carried internally before rounding to the target policy
    pub guard_digits: u32,

    /// Series term budget per requested digit (the logarithm series)
    pub series_terms_per_digit: usize,

    /// Digits used for irrational results under an unlimited policy
    pub unlimited_digits: u32,

    /// Largest `n` whose factorial is memoized.
    /// None means every computed factorial is cached.
    pub factorial_cache_limit: Option<usize>,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self::new(PrecisionPolicy::unlimited())
    }
}

impl KernelConfig {
    /// Create a configuration with default bounds
    pub fn new(default_policy: PrecisionPolicy) -> Self {
        Self {
            default_policy,
            max_iterations: 10_000,
            guard_digits: 10,
            series_terms_per_digit: 17,
            unlimited_digits: 34,
            factorial_cache_limit: None,
        }
    }

    /// Builder method: Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Builder method: Set guard digits
    pub fn with_guard_digits(mut self, guard_digits: u32) -> Self {
        self.guard_digits = guard_digits;
        self
    }

    /// Builder method: Set the series term budget per digit
    pub fn with_series_terms_per_digit(mut self, terms: usize) -> Self {
        self.series_terms_per_digit = terms;
        self
    }

    /// Builder method: Set digits for irrational results under an unlimited policy
    pub fn with_unlimited_digits(mut self, digits: u32) -> Self {
        self.unlimited_digits = digits;
        self
    }

    /// Builder method: Bound the factorial memo table
    pub fn with_factorial_cache_limit(mut self, limit: usize) -> Self {
        self.factorial_cache_limit = Some(limit);
        self
    }

    /// Digits an irrational result is computed to under `policy`
    #[inline]
    pub fn target_digits(&self, policy: &PrecisionPolicy) -> u32 {
        policy.effective_digits(self.unlimited_digits)
    }

    /// Whether `n!` may be stored in the memo table
    #[inline]
    pub fn caches_factorial(&self, n: usize) -> bool {
        self.factorial_cache_limit.is_none_or(|limit| n <= limit)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_iterations == 0 {
            return Err("Max iterations must be positive".to_string());
        }

        if self.series_terms_per_digit == 0 {
            return Err("Series terms per digit must be positive".to_string());
        }

        if self.unlimited_digits == 0 {
            return Err("Unlimited digits must be positive".to_string());
        }

        if self.factorial_cache_limit == Some(0) {
            return Err("Factorial cache limit must be positive".to_string());
        }

        Ok(())
    }
}

// ============================================================================
// Preset Configurations (Factory Methods)
// ============================================================================

impl KernelConfig {
    /// General-purpose configuration
    /// - Unlimited default policy (exact where possible)
    /// - 34 digits for irrational results
    pub fn standard() -> Self {
        Self::new(PrecisionPolicy::unlimited())
    }

    /// IEEE decimal64-style configuration
    /// - 16 significant digits, half-even
    pub fn decimal64() -> Self {
        Self::new(PrecisionPolicy::decimal64())
    }

    /// High-precision configuration
    /// - 100 significant digits, half-even
    /// - Larger iteration budget and guard
    pub fn high_precision() -> Self {
        Self::new(PrecisionPolicy::new(100, RoundingRule::HalfEven))
            .with_max_iterations(100_000)
            .with_guard_digits(20)
    }

    /// Configuration for embedding in latency-sensitive hosts
    /// - Caller-chosen iteration cap
    /// - Factorial cache bounded to 1000 entries
    pub fn bounded(max_iterations: usize) -> Self {
        Self::new(PrecisionPolicy::decimal64())
            .with_max_iterations(max_iterations)
            .with_factorial_cache_limit(1000)
    }
}
