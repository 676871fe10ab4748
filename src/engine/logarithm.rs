// ============================================================================
// Logarithms and Constants
// Natural logarithm by range, derived logarithms, cached pi and ln 10
// ============================================================================
//
// ln(x) splits on the argument:
// - (0, 2): Halley iteration y <- y + 2(x - e^y) / (x + e^y)
// - (10, inf): x = m * 10^e, ln x = ln m + e * ln 10
// - [2, 10]: series sum of r^k / k with r = (x - 1) / x
//
// Everything below runs on raw decimals at a working precision; the public
// entry points round once through `KernelContext::finish`.

use super::context::KernelContext;
use crate::domain::{Number, Real};
use crate::interfaces::{ConstantId, KernelEvent, TowerOps};
use crate::numeric::{
    digit_count, series, BigDecimal, PrecisionPolicy, RoundingRule, TowerError, TowerResult,
};
use chrono::Utc;
use num_bigint::BigInt;
use num_traits::One;

/// Extra scale carried by the fixed-point series branch
const SERIES_EXTRA_SCALE: i64 = 2;

impl KernelContext {
    // ========================================================================
    // Natural Logarithm
    // ========================================================================

    /// Natural logarithm rounded to `policy`.
    ///
    /// `ln(1)` is exactly zero, `ln(0)` is negative infinity and
    /// `ln(+inf)` is positive infinity. Every other result is inexact.
    ///
    /// # Errors
    /// Returns a `Domain` error for negative arguments and
    /// `ConvergenceFailure` when an iteration exceeds the configured budget.
    pub fn ln(&self, x: &Real, policy: PrecisionPolicy) -> TowerResult<Real> {
        let result = self.compute_ln(x, policy);
        self.report("ln", result)
    }

    pub(crate) fn compute_ln(&self, x: &Real, policy: PrecisionPolicy) -> TowerResult<Real> {
        let Some(value) = x.decimal() else {
            return if x.is_negative() {
                Err(negative_argument("ln"))
            } else {
                Ok(Real::infinity(false, policy))
            };
        };
        if value.is_zero() {
            return Ok(Real::infinity(true, policy));
        }
        if value.is_negative() {
            return Err(negative_argument("ln"));
        }
        if *value == BigDecimal::one() {
            return Ok(Real::zero(policy));
        }

        let working = self.working_digits(self.target_digits(&policy));
        let raw = self.ln_decimal(value, working)?;
        Ok(self.finish(raw, policy))
    }

    /// `ln(x)` for a positive decimal other than one, to `digits` significant
    /// digits.
    fn ln_decimal(&self, x: &BigDecimal, digits: u32) -> TowerResult<BigDecimal> {
        if *x == BigDecimal::one() {
            return Ok(BigDecimal::zero());
        }
        let two = BigDecimal::from_i64(2);
        let ten = BigDecimal::from_i64(10);
        if *x < two {
            self.ln_newton(x, digits)
        } else if *x > ten {
            self.ln_decomposed(x, digits)
        } else {
            self.ln_series(x, digits)
        }
    }

    /// Halley iteration for arguments below two
    fn ln_newton(&self, x: &BigDecimal, digits: u32) -> TowerResult<BigDecimal> {
        // Near one the result is small; its digits sit below those of x.
        let distance = x - &BigDecimal::one();
        let extra = u32::try_from((-distance.adjusted_exponent()).max(0)).unwrap_or(u32::MAX);
        let working = digits.saturating_add(extra);
        let max_iterations = self.max_iterations();

        let mut y = ln_seed(x, &distance);
        let two = BigDecimal::from_i64(2);
        let mut iterations = 0usize;
        loop {
            iterations += 1;
            self.check_iterations("ln", iterations)?;

            let ey = series::exp(&y, working, max_iterations)?;
            let difference = x - &ey;
            if difference.is_zero() {
                break;
            }
            let (delta, _) = (&two * &difference).checked_div(
                &(x + &ey),
                working,
                RoundingRule::HalfEven,
            )?;
            let next = (&y + &delta)
                .round_to_precision(working, RoundingRule::HalfEven)
                .0;

            let anchor = if next.is_zero() { &delta } else { &next };
            let tolerance = BigDecimal::new(
                BigInt::one(),
                i64::from(working) - 2 - anchor.adjusted_exponent(),
            );
            y = next;
            if delta.is_zero() || delta.abs() <= tolerance {
                break;
            }
        }

        self.converged("ln", iterations);
        Ok(y.round_to_precision(digits, RoundingRule::HalfEven).0)
    }

    /// `ln(m * 10^e) = ln(m) + e * ln(10)` for arguments above ten
    fn ln_decomposed(&self, x: &BigDecimal, digits: u32) -> TowerResult<BigDecimal> {
        let exponent = x.adjusted_exponent();
        let mantissa = x.mul_pow10(-exponent);

        // e * ln 10 loses as many digits as e has
        let exponent_digits = digit_count(&BigInt::from(exponent)) as u32;
        let ln10 = self.ln10_decimal(digits + exponent_digits)?;
        let scaled = &BigDecimal::from_i64(exponent) * &ln10;

        let sum = &self.ln_decimal(&mantissa, digits)? + &scaled;
        Ok(sum.round_to_precision(digits, RoundingRule::HalfEven).0)
    }

    /// Series in `r = (x - 1) / x` for arguments in `[2, 10]`
    fn ln_series(&self, x: &BigDecimal, digits: u32) -> TowerResult<BigDecimal> {
        // ln x lies in [0.69, 2.31]: a fixed scale is a relative precision
        let scale = i64::from(digits) + SERIES_EXTRA_SCALE;
        let ratio = series::div_to_scale(&(x - &BigDecimal::one()), x, scale)?;
        let budget = (digits as usize).saturating_mul(self.config().series_terms_per_digit);

        let mut power = ratio.clone();
        let mut sum = ratio.clone();
        let mut k = 1usize;
        loop {
            k += 1;
            self.check_iterations("ln", k)?;
            power = (&power * &ratio)
                .round_to_scale(scale, RoundingRule::HalfEven)
                .0;
            let term = series::div_to_scale(&power, &BigDecimal::from_i64(k as i64), scale)?;
            if term.is_zero() {
                break;
            }
            sum = &sum + &term;
        }

        if k > budget {
            tracing::trace!(terms = k, budget, "ln series ran past its term budget");
        }
        self.converged("ln", k);
        Ok(sum.round_to_precision(digits, RoundingRule::HalfEven).0)
    }

    /// ln 10 to `digits` digits, cached in the constant registry
    fn ln10_decimal(&self, digits: u32) -> TowerResult<BigDecimal> {
        let policy = PrecisionPolicy::new(digits, RoundingRule::HalfEven);
        self.cached_constant(ConstantId::Ln10, policy, || {
            let working = self.working_digits(digits);
            let value = self.ln_series(&BigDecimal::from_i64(10), working)?;
            Ok(value.round_to_precision(digits, RoundingRule::HalfEven).0)
        })
    }

    /// Fetch a derived constant from the registry, computing it on a miss
    fn cached_constant<F>(
        &self,
        id: ConstantId,
        policy: PrecisionPolicy,
        compute: F,
    ) -> TowerResult<BigDecimal>
    where
        F: FnOnce() -> TowerResult<BigDecimal>,
    {
        let mut computed = false;
        let instance = self.constants().get_or_compute(id, policy, || {
            computed = true;
            compute().map(|value| Number::Real(Real::approximate(value, policy)))
        })?;
        if computed {
            tracing::debug!(constant = ?id, digits = policy.digits(), "constant computed");
            self.emit(KernelEvent::ConstantComputed {
                constant: id,
                digits: policy.digits(),
                timestamp: Utc::now(),
            });
        }
        instance.to_real()?.finite_decimal("constant").cloned()
    }

    // ========================================================================
    // Derived Logarithms
    // ========================================================================

    /// Base-10 logarithm
    pub fn log10(&self, x: &Real, policy: PrecisionPolicy) -> TowerResult<Real> {
        let result = self.compute_log10(x, policy);
        self.report("log10", result)
    }

    fn compute_log10(&self, x: &Real, policy: PrecisionPolicy) -> TowerResult<Real> {
        let working = self.working_digits(self.target_digits(&policy));
        let ln10 = self.ln10_decimal(working)?;
        self.log_with_base(x, &ln10, policy)
    }

    /// Logarithm of `x` to an arbitrary positive `base` other than one.
    ///
    /// # Errors
    /// Returns a `Domain` error for a base that is non-positive, infinite or
    /// equal to one, and for negative `x`.
    pub fn log(&self, x: &Real, base: &Real, policy: PrecisionPolicy) -> TowerResult<Real> {
        let result = self.compute_log(x, base, policy);
        self.report("log", result)
    }

    fn compute_log(&self, x: &Real, base: &Real, policy: PrecisionPolicy) -> TowerResult<Real> {
        let base_value = base.finite_decimal("log")?;
        if !base_value.is_positive() || *base_value == BigDecimal::one() {
            return Err(TowerError::Domain {
                operation: "log",
                reason: "base must be positive and different from one",
            });
        }
        let working = self.working_digits(self.target_digits(&policy));
        let ln_base = self.ln_decimal(base_value, working)?;
        self.log_with_base(x, &ln_base, policy)
    }

    /// `ln(x) / ln_base` with the infinite cases of `ln` carried through
    fn log_with_base(
        &self,
        x: &Real,
        ln_base: &BigDecimal,
        policy: PrecisionPolicy,
    ) -> TowerResult<Real> {
        let working = self.working_digits(self.target_digits(&policy));
        let ln_x = self.compute_ln(x, PrecisionPolicy::new(working, RoundingRule::HalfEven))?;
        match ln_x.decimal() {
            None => Ok(Real::infinity(
                ln_x.is_negative() != ln_base.is_negative(),
                policy,
            )),
            Some(value) if ln_x.is_exact() => Ok(Real::from_decimal(value.clone(), policy)),
            Some(value) => {
                let (quotient, _) = value.checked_div(ln_base, working, RoundingRule::HalfEven)?;
                Ok(self.finish(quotient, policy))
            }
        }
    }

    // ========================================================================
    // Pi
    // ========================================================================

    /// pi rounded to `policy`, computed once per policy.
    pub fn pi(&self, policy: PrecisionPolicy) -> TowerResult<Real> {
        let result = self.compute_pi(policy);
        self.report("pi", result)
    }

    pub(crate) fn compute_pi(&self, policy: PrecisionPolicy) -> TowerResult<Real> {
        let target = self.target_digits(&policy);
        let value = self.cached_constant(ConstantId::Pi, policy, || {
            let working = self.working_digits(target);
            let raw = series::pi(working, self.max_iterations())?;
            Ok(raw.round_to_precision(target, policy.rounding()).0)
        })?;
        Ok(Real::approximate(value, policy))
    }
}

fn negative_argument(operation: &'static str) -> TowerError {
    TowerError::Domain {
        operation,
        reason: "negative argument",
    }
}

/// Double-precision starting point for the Halley iteration
fn ln_seed(x: &BigDecimal, distance: &BigDecimal) -> BigDecimal {
    let estimate = if distance.adjusted_exponent() < -1 {
        distance.to_f64().ln_1p()
    } else {
        // x = m * 10^e keeps tiny arguments inside f64 range
        let exponent = x.adjusted_exponent();
        let mantissa = x.mul_pow10(-exponent).to_f64();
        mantissa.ln() + exponent as f64 * std::f64::consts::LN_10
    };
    BigDecimal::from_f64(estimate).unwrap_or_else(BigDecimal::zero)
}
