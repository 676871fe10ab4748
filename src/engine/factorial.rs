// ============================================================================
// Factorial
// Memoized factorials over a lock-free ordered map
// ============================================================================

use super::context::KernelContext;
use crate::domain::Integer;
use crate::interfaces::{KernelEvent, TowerOps};
use crate::numeric::{TowerError, TowerResult};
use chrono::Utc;
use crossbeam_skiplist::SkipMap;
use num_bigint::BigInt;
use num_traits::{One, ToPrimitive};

/// Memo table from `n` to `n!`.
///
/// Entries are never evicted. Concurrent writers racing on the same key are
/// harmless: the first insertion wins and later ones are no-ops.
#[derive(Default)]
pub struct FactorialCache {
    entries: SkipMap<usize, BigInt>,
}

impl FactorialCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, n: usize) -> Option<BigInt> {
        self.entries.get(&n).map(|entry| entry.value().clone())
    }

    /// Largest cached entry with key strictly below `n`
    pub fn largest_below(&self, n: usize) -> Option<(usize, BigInt)> {
        self.entries
            .range(..n)
            .next_back()
            .map(|entry| (*entry.key(), entry.value().clone()))
    }

    /// Insert unless present; returns the value now stored
    pub fn insert(&self, n: usize, value: BigInt) -> BigInt {
        self.entries.get_or_insert(n, value).value().clone()
    }

    pub fn contains(&self, n: usize) -> bool {
        self.entries.contains_key(&n)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

impl KernelContext {
    /// `n!` as an exact integer carrying `n`'s policy.
    ///
    /// Resumes from the largest memoized predecessor and memoizes `n` when it
    /// fits a native index (and the configured cache limit). `0!` and `1!`
    /// never touch the cache.
    ///
    /// # Errors
    /// - `Domain` for negative `n`
    /// - `Overflow` when `n` exceeds `u64`
    pub fn factorial(&self, n: &Integer) -> TowerResult<Integer> {
        let result = self.compute_factorial(n);
        self.report("factorial", result)
    }

    fn compute_factorial(&self, n: &Integer) -> TowerResult<Integer> {
        if n.is_negative() {
            return Err(TowerError::Domain {
                operation: "factorial",
                reason: "negative argument",
            });
        }
        let policy = n.policy();
        let target = n.value().to_u64().ok_or(TowerError::Overflow)?;
        if target <= 1 {
            return Ok(Integer::one(policy));
        }

        let key = usize::try_from(target).ok();
        if let Some(key) = key {
            if let Some(value) = self.factorial_cache().get(key) {
                tracing::trace!(n = key, "factorial cache hit");
                self.emit(KernelEvent::FactorialCacheHit {
                    n: key,
                    timestamp: Utc::now(),
                });
                return Ok(Integer::new(value, policy));
            }
        }

        let (start, mut accumulator) = self
            .factorial_cache()
            .largest_below(key.unwrap_or(usize::MAX))
            .unwrap_or((1, BigInt::one()));

        for i in (start as u64 + 1)..=target {
            accumulator *= i;
        }

        if let Some(key) = key.filter(|k| self.config().caches_factorial(*k)) {
            accumulator = self.factorial_cache().insert(key, accumulator);
        }

        tracing::debug!(n = target, resumed_from = start, "factorial computed");
        self.emit(KernelEvent::FactorialComputed {
            n: target,
            resumed_from: start,
            timestamp: Utc::now(),
        });
        Ok(Integer::new(accumulator, policy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KernelConfig;
    use crate::interfaces::{NoOpObserver, RecordingObserver};
    use crate::numeric::PrecisionPolicy;
    use std::sync::Arc;
    use std::thread;

    fn int(n: i64) -> Integer {
        Integer::from_i64(n, PrecisionPolicy::unlimited())
    }

    #[test]
    fn test_small_factorials() {
        let kernel = KernelContext::with_defaults();
        assert_eq!(kernel.factorial(&int(5)).unwrap(), int(120));
        assert_eq!(kernel.factorial(&int(9)).unwrap(), int(362_880));
        assert_eq!(kernel.factorial(&int(20)).unwrap(), int(2_432_902_008_176_640_000));
    }

    #[test]
    fn test_zero_and_one_bypass_cache() {
        let kernel = KernelContext::with_defaults();
        assert_eq!(kernel.factorial(&int(0)).unwrap(), int(1));
        assert_eq!(kernel.factorial(&int(1)).unwrap(), int(1));
        assert!(kernel.factorial_cache().is_empty());
    }

    #[test]
    fn test_negative_is_domain_error() {
        let kernel = KernelContext::with_defaults();
        assert!(matches!(
            kernel.factorial(&int(-3)),
            Err(TowerError::Domain { operation: "factorial", .. })
        ));
    }

    #[test]
    fn test_warm_cache_matches_cold() {
        let warm = KernelContext::with_defaults();
        warm.factorial(&int(10)).unwrap();
        warm.factorial(&int(15)).unwrap();
        let warm_result = warm.factorial(&int(25)).unwrap();

        let cold = KernelContext::with_defaults();
        assert_eq!(cold.factorial(&int(25)).unwrap(), warm_result);
    }

    #[test]
    fn test_resumes_from_largest_predecessor() {
        let observer = Arc::new(RecordingObserver::new());
        let kernel = KernelContext::new(KernelConfig::standard(), observer.clone());
        kernel.factorial(&int(6)).unwrap();
        kernel.factorial(&int(12)).unwrap();
        kernel.factorial(&int(12)).unwrap();

        let events = observer.drain();
        assert!(matches!(
            events[1],
            KernelEvent::FactorialComputed { n: 12, resumed_from: 6, .. }
        ));
        assert!(matches!(events[2], KernelEvent::FactorialCacheHit { n: 12, .. }));
    }

    #[test]
    fn test_cache_limit_is_respected() {
        let kernel = KernelContext::new(
            KernelConfig::standard().with_factorial_cache_limit(10),
            Arc::new(NoOpObserver),
        );
        kernel.factorial(&int(8)).unwrap();
        kernel.factorial(&int(30)).unwrap();
        assert!(kernel.factorial_cache().contains(8));
        assert!(!kernel.factorial_cache().contains(30));
    }

    #[test]
    fn test_insert_is_idempotent() {
        let cache = FactorialCache::new();
        assert_eq!(cache.insert(3, BigInt::from(6)), BigInt::from(6));
        assert_eq!(cache.insert(3, BigInt::from(7)), BigInt::from(6));
        assert_eq!(cache.largest_below(10), Some((3, BigInt::from(6))));
        assert_eq!(cache.largest_below(3), None);
    }

    #[test]
    fn test_concurrent_callers_agree() {
        let kernel = Arc::new(KernelContext::with_defaults());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let kernel = Arc::clone(&kernel);
                thread::spawn(move || kernel.factorial(&int(40 + (i % 3))).unwrap())
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        let cold = KernelContext::with_defaults();
        for n in 40..43 {
            assert_eq!(
                kernel.factorial(&int(n)).unwrap(),
                cold.factorial(&int(n)).unwrap()
            );
        }
    }
}
