// ============================================================================
// Canonical Constants
// Algebraic identities and the per-policy constant registry
// ============================================================================

use super::complex::Complex;
use super::integer::Integer;
use super::number::Number;
use crate::interfaces::{ConstantId, HasCanonicalInstance};
use crate::numeric::{PrecisionPolicy, TowerResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Additive identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Zero;

/// Multiplicative identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct One;

/// The complex unit `i`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImaginaryUnit;

impl HasCanonicalInstance for Zero {
    const ID: ConstantId = ConstantId::Zero;

    fn instance_for(policy: PrecisionPolicy) -> Number {
        Number::Integer(Integer::zero(policy))
    }
}

impl HasCanonicalInstance for One {
    const ID: ConstantId = ConstantId::One;

    fn instance_for(policy: PrecisionPolicy) -> Number {
        Number::Integer(Integer::one(policy))
    }
}

impl HasCanonicalInstance for ImaginaryUnit {
    const ID: ConstantId = ConstantId::ImaginaryUnit;

    fn instance_for(policy: PrecisionPolicy) -> Number {
        Number::Complex(Complex::imaginary_unit(policy))
    }
}

type RegistryKey = (ConstantId, PrecisionPolicy);

/// One shared instance per `(constant, policy)` pair.
///
/// Canonical identities are looked up and constructed under one critical
/// section, so every caller observes the same `Arc`. Computed constants
/// (pi, ln 10) are evaluated outside the lock; when two threads race, the
/// first insertion wins and both receive it.
#[derive(Debug, Default)]
pub struct ConstantRegistry {
    instances: Mutex<HashMap<RegistryKey, Arc<Number>>>,
}

impl ConstantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canonical instance of `C` under `policy`
    pub fn canonical<C: HasCanonicalInstance>(&self, policy: PrecisionPolicy) -> Arc<Number> {
        let mut instances = self.instances.lock();
        Arc::clone(
            instances
                .entry((C::ID, policy))
                .or_insert_with(|| Arc::new(C::instance_for(policy))),
        )
    }

    /// Cached value of a computed constant, evaluating `compute` on a miss.
    ///
    /// # Errors
    /// Propagates the error of `compute`; nothing is cached in that case.
    pub fn get_or_compute<F>(
        &self,
        id: ConstantId,
        policy: PrecisionPolicy,
        compute: F,
    ) -> TowerResult<Arc<Number>>
    where
        F: FnOnce() -> TowerResult<Number>,
    {
        let cached = self.instances.lock().get(&(id, policy)).cloned();
        if let Some(existing) = cached {
            return Ok(existing);
        }

        let value = compute()?;

        let mut instances = self.instances.lock();
        Ok(Arc::clone(
            instances
                .entry((id, policy))
                .or_insert_with(|| Arc::new(value)),
        ))
    }

    pub fn contains(&self, id: ConstantId, policy: PrecisionPolicy) -> bool {
        self.instances.lock().contains_key(&(id, policy))
    }

    pub fn len(&self) -> usize {
        self.instances.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.lock().is_empty()
    }

    pub fn clear(&self) {
        self.instances.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TowerKind;
    use crate::interfaces::TowerOps;
    use crate::numeric::{RoundingRule, TowerError};
    use std::thread;

    #[test]
    fn test_identities() {
        let policy = PrecisionPolicy::decimal32();
        assert!(Zero::instance_for(policy).is_zero());
        assert_eq!(One::instance_for(policy), Number::integer(1).with_policy(policy));
        assert_eq!(ImaginaryUnit::instance_for(policy).kind(), TowerKind::Complex);
    }

    #[test]
    fn test_canonical_instance_is_shared() {
        let registry = ConstantRegistry::new();
        let policy = PrecisionPolicy::new(12, RoundingRule::HalfUp);
        let a = registry.canonical::<One>(policy);
        let b = registry.canonical::<One>(policy);
        assert!(Arc::ptr_eq(&a, &b));

        let other = registry.canonical::<One>(PrecisionPolicy::unlimited());
        assert!(!Arc::ptr_eq(&a, &other));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_concurrent_callers_observe_one_instance() {
        let registry = Arc::new(ConstantRegistry::new());
        let policy = PrecisionPolicy::decimal64();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || registry.canonical::<ImaginaryUnit>(policy))
            })
            .collect();
        let instances: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for instance in &instances[1..] {
            assert!(Arc::ptr_eq(&instances[0], instance));
        }
    }

    #[test]
    fn test_get_or_compute_caches_success_only() {
        let registry = ConstantRegistry::new();
        let policy = PrecisionPolicy::decimal32();

        let failed = registry.get_or_compute(ConstantId::Pi, policy, || {
            Err(TowerError::ConvergenceFailure {
                operation: "pi",
                iterations: 1,
            })
        });
        assert!(failed.is_err());
        assert!(!registry.contains(ConstantId::Pi, policy));

        let first = registry
            .get_or_compute(ConstantId::Pi, policy, || Ok(Number::integer(3)))
            .unwrap();
        let second = registry
            .get_or_compute(ConstantId::Pi, policy, || Ok(Number::integer(4)))
            .unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*second, Number::integer(3));
    }
}
