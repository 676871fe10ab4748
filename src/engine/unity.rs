// ============================================================================
// Roots of Unity
// The n complex solutions of z^n = 1 in polar form
// ============================================================================

use super::context::KernelContext;
use crate::domain::{Complex, Real};
use crate::numeric::{BigDecimal, PrecisionPolicy, RoundingRule, TowerError, TowerResult};

impl KernelContext {
    /// The `n` roots of unity `e^(2 pi k i / n)` for `k = 1..=n`.
    ///
    /// Every root has an exact unit radius; angles are irrational and
    /// therefore inexact. The last root carries the angle `2 pi`.
    ///
    /// # Errors
    /// Returns a `Domain` error for `n = 0` and `Overflow` when `n` roots
    /// cannot be held in memory.
    pub fn roots_of_unity(&self, n: u64, policy: PrecisionPolicy) -> TowerResult<Vec<Complex>> {
        let result = self.compute_roots_of_unity(n, policy);
        self.report("roots_of_unity", result)
    }

    fn compute_roots_of_unity(&self, n: u64, policy: PrecisionPolicy) -> TowerResult<Vec<Complex>> {
        if n == 0 {
            return Err(TowerError::Domain {
                operation: "roots_of_unity",
                reason: "order must be positive",
            });
        }
        let count = usize::try_from(n).map_err(|_| TowerError::Overflow)?;

        let working = self.working_digits(self.target_digits(&policy));
        let working_policy = PrecisionPolicy::new(working, RoundingRule::HalfEven);
        let pi = self.compute_pi(working_policy)?;
        let two_pi = pi.finite_decimal("roots_of_unity")? * &BigDecimal::from_i64(2);
        let order = BigDecimal::from_bigint(n.into());

        let mut roots = Vec::with_capacity(count);
        for k in 1..=n {
            let turn = &two_pi * &BigDecimal::from_bigint(k.into());
            let (angle, _) = turn.checked_div(&order, working, RoundingRule::HalfEven)?;
            roots.push(Complex::polar(Real::one(policy), self.finish(angle, policy)));
        }

        tracing::debug!(n, digits = working, "roots of unity computed");
        Ok(roots)
    }
}
