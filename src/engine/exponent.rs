// ============================================================================
// Exponentiation
// Integer, rational and generalized powers plus the exponential function
// ============================================================================

use super::context::KernelContext;
use crate::domain::{Complex, Integer, Number, Rational, Real, TowerKind};
use crate::interfaces::TowerOps;
use crate::numeric::{series, PrecisionPolicy, RoundingRule, TowerError, TowerResult};
use num_traits::{One, Signed, ToPrimitive};

/// Largest root index the rational-exponent identity is applied with.
/// Exponents with larger denominators go through `exp(ln(base) * e)`.
const MAX_ROOT_INDEX: u32 = 1_000;

impl KernelContext {
    // ========================================================================
    // Integer Exponents
    // ========================================================================

    /// `x^n` for an integer exponent.
    ///
    /// Accumulates `|x|` linearly, rounding to `policy` after every
    /// multiplication; exponents beyond the iteration budget switch to
    /// square-and-multiply. Negative exponents invert the result. The sign is
    /// negative only for odd `n` with negative `x`.
    ///
    /// # Errors
    /// Returns a `Domain` error for zero raised to a negative power.
    pub fn integer_power(&self, x: &Real, n: i64, policy: PrecisionPolicy) -> TowerResult<Real> {
        let result = self.compute_integer_power(x, n, policy);
        self.report("integer_power", result)
    }

    fn compute_integer_power(&self, x: &Real, n: i64, policy: PrecisionPolicy) -> TowerResult<Real> {
        match n {
            0 => return Ok(Real::one(policy)),
            1 => return Ok(x.with_policy(policy)),
            -1 => return x.with_policy(policy).reciprocal(),
            _ => {}
        }

        let base = x.abs().with_policy(policy);
        let steps = n.unsigned_abs();
        let mut magnitude = if steps <= self.max_iterations() as u64 {
            let mut accumulator = base.clone();
            for _ in 1..steps {
                accumulator = accumulator.checked_mul(&base)?;
            }
            accumulator
        } else {
            square_and_multiply(&base, steps)?
        };

        if n < 0 {
            magnitude = magnitude.reciprocal()?;
        }
        if x.is_negative() && steps % 2 == 1 {
            magnitude = magnitude.negate();
        }
        Ok(magnitude)
    }

    /// `z^n` for a complex base by repeated squaring of `z` itself.
    ///
    /// Polar bases stay polar.
    pub fn complex_integer_power(
        &self,
        z: &Complex,
        n: i64,
        policy: PrecisionPolicy,
    ) -> TowerResult<Complex> {
        let result = self.compute_complex_integer_power(z, n, policy);
        self.report("complex_integer_power", result)
    }

    fn compute_complex_integer_power(
        &self,
        z: &Complex,
        n: i64,
        policy: PrecisionPolicy,
    ) -> TowerResult<Complex> {
        let one = Complex::from_real(Real::one(policy));
        if n == 0 {
            return Ok(one);
        }

        let mut base = z.with_policy(policy);
        let mut remaining = n.unsigned_abs();
        let mut result: Option<Complex> = None;
        while remaining > 0 {
            if remaining & 1 == 1 {
                result = Some(match result {
                    Some(acc) => acc.checked_mul(&base)?,
                    None => base.clone(),
                });
            }
            remaining >>= 1;
            if remaining > 0 {
                base = base.checked_mul(&base)?;
            }
        }
        let result = result.unwrap_or(one);

        if n < 0 {
            match result.invert()? {
                Number::Complex(inverse) => Ok(inverse),
                other => Ok(other.to_complex()),
            }
        } else {
            Ok(result)
        }
    }

    // ========================================================================
    // Generalized Exponent
    // ========================================================================

    /// `base^exponent` dispatched on the exponent's kind.
    ///
    /// - zero exponent: one, whatever the base
    /// - Integer: [`integer_power`](Self::integer_power)
    /// - Real: the Integer path when integral, otherwise its exact Rational
    /// - Rational `p/q`: `q`-th root of `base^p`
    /// - Complex: `UnsupportedExponentKind`
    ///
    /// # Errors
    /// Propagates domain errors of the root and power steps.
    pub fn generalized_exponent(
        &self,
        base: &Real,
        exponent: &Number,
        policy: PrecisionPolicy,
    ) -> TowerResult<Real> {
        let result = self.compute_generalized_exponent(base, exponent, policy);
        self.report("generalized_exponent", result)
    }

    fn compute_generalized_exponent(
        &self,
        base: &Real,
        exponent: &Number,
        policy: PrecisionPolicy,
    ) -> TowerResult<Real> {
        if exponent.is_zero() {
            return Ok(Real::one(policy));
        }
        match exponent {
            Number::Integer(n) => self.compute_integer_power(base, n.to_i64()?, policy),
            Number::Real(e) => {
                if e.is_integral() {
                    let n = e.to_integer()?;
                    self.compute_integer_power(base, n.to_i64()?, policy)
                } else {
                    self.rational_power(base, &e.to_rational()?, policy)
                }
            }
            Number::Rational(e) => self.rational_power(base, e, policy),
            Number::Complex(_) => Err(TowerError::UnsupportedExponentKind(TowerKind::Complex)),
        }
    }

    /// `base^(p/q)` as the `q`-th root of `base^p`
    fn rational_power(
        &self,
        base: &Real,
        exponent: &Rational,
        policy: PrecisionPolicy,
    ) -> TowerResult<Real> {
        if exponent.is_integral() {
            let n = exponent.to_integer()?;
            return self.compute_integer_power(base, n.to_i64()?, policy);
        }

        let index = exponent.denominator().to_u32().filter(|q| *q <= MAX_ROOT_INDEX);
        let power = exponent.numerator().to_i64();
        match (index, power) {
            (Some(q), Some(p)) => {
                let intermediate = if policy.is_unlimited() {
                    policy
                } else {
                    let working = self.working_digits(self.target_digits(&policy));
                    PrecisionPolicy::new(working, RoundingRule::HalfEven)
                };
                let raised = self.compute_integer_power(base, p, intermediate)?;
                self.compute_nth_root(&raised, q, policy)
            }
            _ => self.power_via_logarithm(base, exponent, policy),
        }
    }

    /// `exp(e * ln(base))` for exponents whose denominators are too large
    /// for the root identity
    fn power_via_logarithm(
        &self,
        base: &Real,
        exponent: &Rational,
        policy: PrecisionPolicy,
    ) -> TowerResult<Real> {
        if base.is_zero() {
            return if exponent.is_negative() {
                Err(TowerError::Domain {
                    operation: "generalized_exponent",
                    reason: "zero raised to a negative power",
                })
            } else {
                Ok(Real::zero(policy))
            };
        }
        if base.is_negative() {
            return Err(TowerError::Domain {
                operation: "generalized_exponent",
                reason: "negative base with a non-integral exponent",
            });
        }

        let working = self.working_digits(self.target_digits(&policy));
        let working_policy = PrecisionPolicy::new(working, RoundingRule::HalfEven);
        let logarithm = self.compute_ln(base, working_policy)?;
        let scaled = logarithm.checked_mul(&exponent.with_policy(working_policy).to_real())?;
        self.compute_exp(&scaled, policy)
    }

    /// Power of any tower value.
    ///
    /// Exact kinds raised to integer exponents stay exact (an Integer base
    /// with a negative exponent becomes Rational). Complex bases accept
    /// integral exponents only. Everything else goes through
    /// [`generalized_exponent`](Self::generalized_exponent) on the base
    /// coerced to Real.
    pub fn power(
        &self,
        base: &Number,
        exponent: &Number,
        policy: PrecisionPolicy,
    ) -> TowerResult<Number> {
        let result = self.compute_power(base, exponent, policy);
        self.report("power", result)
    }

    fn compute_power(
        &self,
        base: &Number,
        exponent: &Number,
        policy: PrecisionPolicy,
    ) -> TowerResult<Number> {
        if exponent.is_zero() {
            return Ok(self.one(policy).as_ref().clone());
        }
        let integral = exponent.to_integer().ok();

        match (base, integral) {
            (Number::Integer(b), Some(n)) => exact_integer_power(b, &n, policy),
            (Number::Rational(b), Some(n)) => exact_rational_power(b, &n, policy),
            (Number::Complex(z), Some(n)) => self
                .compute_complex_integer_power(z, n.to_i64()?, policy)
                .map(Number::Complex),
            (Number::Complex(_), None) => Err(TowerError::UnsupportedOperation {
                operation: "power",
                kind: TowerKind::Complex,
            }),
            (other, _) => {
                let real = other.to_real()?;
                self.compute_generalized_exponent(&real, exponent, policy)
                    .map(Number::Real)
            }
        }
    }

    // ========================================================================
    // Exponential
    // ========================================================================

    /// `e^x` rounded to `policy`.
    ///
    /// `exp(0)` is exactly one; `exp(-inf)` is zero and `exp(+inf)` is
    /// infinite.
    pub fn exp(&self, x: &Real, policy: PrecisionPolicy) -> TowerResult<Real> {
        let result = self.compute_exp(x, policy);
        self.report("exp", result)
    }

    pub(crate) fn compute_exp(&self, x: &Real, policy: PrecisionPolicy) -> TowerResult<Real> {
        if x.is_zero() {
            return Ok(Real::one(policy));
        }
        let Some(value) = x.decimal() else {
            return Ok(if x.is_negative() {
                Real::zero(policy)
            } else {
                Real::infinity(false, policy)
            });
        };
        let working = self.working_digits(self.target_digits(&policy));
        let raw = series::exp(value, working, self.max_iterations())?;
        Ok(self.finish(raw, policy))
    }
}

/// Binary exponentiation with rounding at every product
fn square_and_multiply(base: &Real, exponent: u64) -> TowerResult<Real> {
    let mut result = Real::one(base.policy());
    let mut square = base.clone();
    let mut remaining = exponent;
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = result.checked_mul(&square)?;
        }
        remaining >>= 1;
        if remaining > 0 {
            square = square.checked_mul(&square)?;
        }
    }
    Ok(result)
}

fn exact_integer_power(base: &Integer, n: &Integer, policy: PrecisionPolicy) -> TowerResult<Number> {
    let exponent = n.value().abs().to_usize().ok_or(TowerError::Overflow)?;
    let magnitude = Integer::new(num_traits::pow(base.value().clone(), exponent), policy);
    if n.is_negative() {
        magnitude.invert()
    } else {
        Ok(Number::Integer(magnitude))
    }
}

fn exact_rational_power(
    base: &Rational,
    n: &Integer,
    policy: PrecisionPolicy,
) -> TowerResult<Number> {
    let exponent = n.value().abs().to_usize().ok_or(TowerError::Overflow)?;
    let numerator = num_traits::pow(base.numerator().clone(), exponent);
    let denominator = num_traits::pow(base.denominator().clone(), exponent);
    let magnitude = Rational::new(numerator, denominator, policy)?;
    let result = if n.is_negative() {
        magnitude.invert()?
    } else {
        Number::Rational(magnitude)
    };
    // whole-number results drop to Integer
    match &result {
        Number::Rational(r) if r.denominator().is_one() => r.to_integer().map(Number::Integer),
        _ => Ok(result),
    }
}
