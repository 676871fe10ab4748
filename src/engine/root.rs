// ============================================================================
// Roots
// n-th roots by perfect-power test, then Newton-Raphson
// ============================================================================

use super::context::KernelContext;
use crate::domain::Real;
use crate::interfaces::TowerOps;
use crate::numeric::{BigDecimal, PrecisionPolicy, RoundingRule, Scalar, TowerError, TowerResult};
use num_bigint::BigInt;
use num_traits::One;

impl KernelContext {
    /// Real `n`-th root of `a`.
    ///
    /// Perfect powers (`nth_root(0.008, 3) = 0.2`) come back exact whenever
    /// `a` is. Everything else runs Newton-Raphson
    /// `x <- ((n - 1)x + a / x^(n-1)) / n` at working precision and is
    /// returned inexact, stripped of trailing zeros.
    ///
    /// # Errors
    /// - `Domain` for `n = 0`
    /// - `Domain` for an even root of a negative value
    pub fn nth_root(&self, a: &Real, n: u32, policy: PrecisionPolicy) -> TowerResult<Real> {
        let result = self.compute_nth_root(a, n, policy);
        self.report("nth_root", result)
    }

    pub(crate) fn compute_nth_root(
        &self,
        a: &Real,
        n: u32,
        policy: PrecisionPolicy,
    ) -> TowerResult<Real> {
        if n == 0 {
            return Err(TowerError::Domain {
                operation: "nth_root",
                reason: "root index must be positive",
            });
        }
        if a.is_zero() {
            return Ok(Real::zero(policy));
        }
        if a.is_negative() && n % 2 == 0 {
            return Err(TowerError::Domain {
                operation: "nth_root",
                reason: "even root of a negative value",
            });
        }
        if n == 1 {
            return Ok(a.with_policy(policy));
        }
        if a.is_negative() {
            return self.compute_nth_root(&a.abs(), n, policy).map(|root| root.negate());
        }
        let Some(value) = a.decimal() else {
            return Ok(Real::infinity(false, policy));
        };

        if let Some(root) = value.nth_root_exact(n) {
            return Ok(Real::from_scalar(Scalar::with_exactness(
                root,
                a.is_exact(),
                policy,
            )));
        }

        let target = self.target_digits(&policy);
        let working = self.working_digits(target);
        let raw = self.newton_root(value, n, working)?;
        let (rounded, _) = raw.round_to_precision(target, policy.rounding());
        Ok(Real::approximate(rounded.normalized(), policy))
    }

    fn newton_root(&self, a: &BigDecimal, n: u32, digits: u32) -> TowerResult<BigDecimal> {
        let index = BigDecimal::from_i64(i64::from(n));
        let lower = BigDecimal::from_i64(i64::from(n) - 1);
        let mut x = root_seed(a, n);
        let mut iterations = 0usize;

        loop {
            iterations += 1;
            self.check_iterations("nth_root", iterations)?;

            let power = pow_rounded(&x, n - 1, digits);
            let (quotient, _) = a.checked_div(&power, digits, RoundingRule::HalfEven)?;
            let (next, _) =
                (&(&lower * &x) + &quotient).checked_div(&index, digits, RoundingRule::HalfEven)?;

            let step = (&next - &x).abs();
            let tolerance = BigDecimal::new(
                BigInt::one(),
                i64::from(digits) - 2 - next.adjusted_exponent(),
            );
            x = next;
            if step <= tolerance {
                break;
            }
        }

        self.converged("nth_root", iterations);
        Ok(x)
    }
}

/// `x^n` by squaring, rounded to `digits` after every product
fn pow_rounded(x: &BigDecimal, n: u32, digits: u32) -> BigDecimal {
    let round = |value: BigDecimal| value.round_to_precision(digits, RoundingRule::HalfEven).0;
    let mut result = BigDecimal::one();
    let mut square = x.clone();
    let mut remaining = n;
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = round(&result * &square);
        }
        remaining >>= 1;
        if remaining > 0 {
            square = round(&square * &square);
        }
    }
    result
}

/// Double-precision estimate of the root, taken in log10 space so that
/// arguments outside f64 range still seed sensibly
fn root_seed(a: &BigDecimal, n: u32) -> BigDecimal {
    let exponent = a.adjusted_exponent();
    let mantissa = a.mul_pow10(-exponent).to_f64();
    let log = (mantissa.log10() + exponent as f64) / f64::from(n);
    let whole = log.floor();
    BigDecimal::from_f64(10f64.powf(log - whole))
        .map(|m| m.mul_pow10(whole as i64))
        .unwrap_or_else(BigDecimal::one)
}
