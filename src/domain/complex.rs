// ============================================================================
// Complex Kind
// Pairs of reals in rectangular or polar form
// ============================================================================

use super::integer::Integer;
use super::kind::{Sign, TowerKind};
use super::number::Number;
use super::rational::Rational;
use super::real::Real;
use crate::interfaces::TowerOps;
use crate::numeric::series::{self, DEFAULT_MAX_ITERATIONS};
use crate::numeric::{
    BigDecimal, PrecisionPolicy, TowerError, TowerResult, UNLIMITED_DIVISION_DIGITS,
};
use std::cmp::Ordering;
use std::fmt;

/// Storage form of a complex value.
///
/// Polar values keep their form under multiplication, division, inversion
/// and square roots; addition converts both operands to rectangular form.
/// A polar radius may be negative (negation flips the radius).
#[derive(Debug, Clone, PartialEq)]
pub enum ComplexForm {
    Rectangular { re: Real, im: Real },
    Polar { radius: Real, angle: Real },
}

/// Complex number with `Real` components.
#[derive(Debug, Clone, PartialEq)]
pub struct Complex {
    form: ComplexForm,
}

impl Complex {
    // ========================================================================
    // Construction
    // ========================================================================

    pub fn rectangular(re: Real, im: Real) -> Self {
        Self {
            form: ComplexForm::Rectangular { re, im },
        }
    }

    pub fn polar(radius: Real, angle: Real) -> Self {
        Self {
            form: ComplexForm::Polar { radius, angle },
        }
    }

    /// Real value with an exact zero imaginary part
    pub fn from_real(re: Real) -> Self {
        let im = Real::zero(re.policy());
        Self::rectangular(re, im)
    }

    /// Value on the imaginary axis
    pub fn imaginary(im: Real) -> Self {
        let re = Real::zero(im.policy());
        Self::rectangular(re, im)
    }

    pub fn imaginary_unit(policy: PrecisionPolicy) -> Self {
        Self::imaginary(Real::one(policy))
    }

    #[inline]
    pub fn form(&self) -> &ComplexForm {
        &self.form
    }

    #[inline]
    pub fn is_polar(&self) -> bool {
        matches!(self.form, ComplexForm::Polar { .. })
    }

    /// Digits used for trigonometric conversions between forms
    fn working_digits(&self) -> u32 {
        self.policy().effective_digits(UNLIMITED_DIVISION_DIGITS)
    }

    // ========================================================================
    // Form Conversion
    // ========================================================================

    /// Rectangular components `(re, im)`.
    ///
    /// # Errors
    /// Polar values with a non-zero angle need finite components; series
    /// failures propagate.
    pub fn to_rectangular(&self) -> TowerResult<(Real, Real)> {
        match &self.form {
            ComplexForm::Rectangular { re, im } => Ok((re.clone(), im.clone())),
            ComplexForm::Polar { radius, angle } => {
                let policy = self.policy();
                if angle.is_zero() {
                    return Ok((radius.clone(), Real::zero(policy)));
                }
                let theta = angle.finite_decimal("to_rectangular")?;
                let digits = self.working_digits();
                let cos = Real::approximate(series::cos(theta, digits, DEFAULT_MAX_ITERATIONS)?, policy);
                let sin = Real::approximate(series::sin(theta, digits, DEFAULT_MAX_ITERATIONS)?, policy);
                Ok((radius.checked_mul(&cos)?, radius.checked_mul(&sin)?))
            }
        }
    }

    /// Polar components `(radius, angle)` with a non-negative radius and the
    /// angle in (-pi, pi] for rectangular input.
    ///
    /// # Errors
    /// Components must be finite.
    pub fn to_polar(&self) -> TowerResult<(Real, Real)> {
        let policy = self.policy();
        let digits = self.working_digits();
        match &self.form {
            ComplexForm::Polar { radius, angle } => {
                if !radius.is_negative() {
                    return Ok((radius.clone(), angle.clone()));
                }
                let pi = Real::approximate(series::pi(digits, DEFAULT_MAX_ITERATIONS)?, policy);
                Ok((radius.abs(), angle.checked_add(&pi)?))
            }
            ComplexForm::Rectangular { re, im } => {
                let x = re.finite_decimal("to_polar")?;
                let y = im.finite_decimal("to_polar")?;
                let angle = series::atan2(y, x, digits, DEFAULT_MAX_ITERATIONS)?;
                let angle = if angle.is_zero() {
                    Real::zero(policy)
                } else {
                    Real::approximate(angle, policy)
                };
                Ok((self.modulus()?, angle))
            }
        }
    }

    pub fn to_rectangular_form(&self) -> TowerResult<Self> {
        let (re, im) = self.to_rectangular()?;
        Ok(Self::rectangular(re, im))
    }

    pub fn to_polar_form(&self) -> TowerResult<Self> {
        let (radius, angle) = self.to_polar()?;
        Ok(Self::polar(radius, angle))
    }

    pub fn real_part(&self) -> TowerResult<Real> {
        self.to_rectangular().map(|(re, _)| re)
    }

    pub fn imaginary_part(&self) -> TowerResult<Real> {
        self.to_rectangular().map(|(_, im)| im)
    }

    pub fn conjugate(&self) -> Self {
        match &self.form {
            ComplexForm::Rectangular { re, im } => Self::rectangular(re.clone(), im.negate()),
            ComplexForm::Polar { radius, angle } => Self::polar(radius.clone(), angle.negate()),
        }
    }

    /// |z| as a `Real`.
    ///
    /// Values on an axis keep the exactness of their non-zero component.
    pub fn modulus(&self) -> TowerResult<Real> {
        match &self.form {
            ComplexForm::Polar { radius, .. } => Ok(radius.abs()),
            ComplexForm::Rectangular { re, im } => {
                if im.is_zero() {
                    return Ok(re.abs());
                }
                if re.is_zero() {
                    return Ok(im.abs());
                }
                re.checked_mul(re)?
                    .checked_add(&im.checked_mul(im)?)?
                    .checked_sqrt()
            }
        }
    }

    // ========================================================================
    // Typed Arithmetic
    // ========================================================================

    pub fn checked_add(&self, rhs: &Self) -> TowerResult<Self> {
        let (a, b) = self.to_rectangular()?;
        let (c, d) = rhs.to_rectangular()?;
        Ok(Self::rectangular(a.checked_add(&c)?, b.checked_add(&d)?))
    }

    pub fn checked_sub(&self, rhs: &Self) -> TowerResult<Self> {
        self.checked_add(&rhs.negate())
    }

    pub fn checked_mul(&self, rhs: &Self) -> TowerResult<Self> {
        if let (
            ComplexForm::Polar { radius: r1, angle: a1 },
            ComplexForm::Polar { radius: r2, angle: a2 },
        ) = (&self.form, &rhs.form)
        {
            return Ok(Self::polar(r1.checked_mul(r2)?, a1.checked_add(a2)?));
        }
        let (a, b) = self.to_rectangular()?;
        let (c, d) = rhs.to_rectangular()?;
        let re = a.checked_mul(&c)?.checked_sub(&b.checked_mul(&d)?)?;
        let im = a.checked_mul(&d)?.checked_add(&b.checked_mul(&c)?)?;
        Ok(Self::rectangular(re, im))
    }

    /// # Errors
    /// Returns `DivisionByZero` if `rhs` is zero.
    pub fn checked_div(&self, rhs: &Self) -> TowerResult<Self> {
        if rhs.is_zero() {
            return Err(TowerError::DivisionByZero);
        }
        if let (
            ComplexForm::Polar { radius: r1, angle: a1 },
            ComplexForm::Polar { radius: r2, angle: a2 },
        ) = (&self.form, &rhs.form)
        {
            return Ok(Self::polar(r1.checked_div(r2)?, a1.checked_sub(a2)?));
        }
        let (a, b) = self.to_rectangular()?;
        let (c, d) = rhs.to_rectangular()?;
        let denominator = c.checked_mul(&c)?.checked_add(&d.checked_mul(&d)?)?;
        let re = a.checked_mul(&c)?.checked_add(&b.checked_mul(&d)?)?;
        let im = b.checked_mul(&c)?.checked_sub(&a.checked_mul(&d)?)?;
        Ok(Self::rectangular(
            re.checked_div(&denominator)?,
            im.checked_div(&denominator)?,
        ))
    }

    /// Principal square root.
    pub fn checked_sqrt(&self) -> TowerResult<Self> {
        if let ComplexForm::Rectangular { re, im } = &self.form {
            if im.is_zero() {
                let root = re.abs().checked_sqrt()?;
                return Ok(if re.is_negative() {
                    Self::imaginary(root)
                } else {
                    Self::from_real(root)
                });
            }
        }
        let (radius, angle) = self.to_polar()?;
        let half = Real::from_decimal(
            BigDecimal::new(5.into(), 1),
            self.policy(),
        );
        Ok(Self::polar(radius.checked_sqrt()?, angle.checked_mul(&half)?))
    }

    // ========================================================================
    // Downward Conversion
    // ========================================================================

    /// # Errors
    /// Returns `Coercion` unless the imaginary part is zero at the current
    /// precision. An exact imaginary part must be exactly zero; a computed
    /// one only has to fall within the rounding error of the value.
    pub fn to_real(&self) -> TowerResult<Real> {
        let (re, im) = self.to_rectangular()?;
        let negligible = match im.decimal() {
            Some(value) => !im.is_exact() && value.abs() <= self.imaginary_tolerance(&re),
            None => false,
        };
        if im.is_zero() || negligible {
            Ok(re)
        } else {
            Err(TowerError::Coercion {
                from: TowerKind::Complex,
                to: TowerKind::Real,
            })
        }
    }

    /// # Errors
    /// Returns `Coercion { Complex -> Rational }` unless the value is real
    /// and its real part is exactly representable as a fraction.
    pub fn to_rational(&self) -> TowerResult<Rational> {
        self.to_real()
            .and_then(|re| re.to_rational())
            .map_err(narrowing_to(TowerKind::Rational))
    }

    /// # Errors
    /// Returns `Coercion { Complex -> Integer }` unless the value is a real
    /// integer.
    pub fn to_integer(&self) -> TowerResult<Integer> {
        self.to_real()
            .and_then(|re| re.to_integer())
            .map_err(narrowing_to(TowerKind::Integer))
    }

    /// Largest imaginary part that rounds away against `re`.
    ///
    /// Half a unit in the last place of the real part, plus the spread a
    /// polar angle's own last digit induces in `radius * sin(angle)`.
    fn imaginary_tolerance(&self, re: &Real) -> BigDecimal {
        let digits = i64::from(self.working_digits());
        let mut tolerance = match re.decimal() {
            Some(x) if !x.is_zero() => BigDecimal::new(5.into(), digits - x.adjusted_exponent()),
            _ => BigDecimal::zero(),
        };
        if let ComplexForm::Polar { radius, angle } = &self.form {
            if let (Some(r), Some(theta), false) = (radius.decimal(), angle.decimal(), angle.is_exact()) {
                if !theta.is_zero() {
                    let angle_ulp = BigDecimal::new(1.into(), digits - 1 - theta.adjusted_exponent());
                    tolerance = &tolerance + &(&r.abs() * &angle_ulp);
                }
            }
        }
        tolerance
    }
}

/// Re-tag a narrowing failure with the requested target; other errors pass
/// through untouched.
fn narrowing_to(kind: TowerKind) -> impl Fn(TowerError) -> TowerError {
    move |error| match error {
        TowerError::Coercion { .. } => TowerError::Coercion {
            from: TowerKind::Complex,
            to: kind,
        },
        other => other,
    }
}

/// Comparisons and signs exist only for values that coerce to `Real`.
fn unordered(operation: &'static str) -> impl Fn(TowerError) -> TowerError {
    move |error| match error {
        TowerError::Coercion { .. } => TowerError::UnsupportedOperation {
            operation,
            kind: TowerKind::Complex,
        },
        other => other,
    }
}

impl TowerOps for Complex {
    fn kind(&self) -> TowerKind {
        TowerKind::Complex
    }

    fn policy(&self) -> PrecisionPolicy {
        match &self.form {
            ComplexForm::Rectangular { re, im } => re.policy().reconcile(&im.policy()),
            ComplexForm::Polar { radius, angle } => radius.policy().reconcile(&angle.policy()),
        }
    }

    fn with_policy(&self, policy: PrecisionPolicy) -> Self {
        match &self.form {
            ComplexForm::Rectangular { re, im } => {
                Self::rectangular(re.with_policy(policy), im.with_policy(policy))
            }
            ComplexForm::Polar { radius, angle } => {
                Self::polar(radius.with_policy(policy), angle.with_policy(policy))
            }
        }
    }

    fn is_exact(&self) -> bool {
        match &self.form {
            ComplexForm::Rectangular { re, im } => re.is_exact() && im.is_exact(),
            ComplexForm::Polar { radius, angle } => radius.is_exact() && angle.is_exact(),
        }
    }

    fn is_zero(&self) -> bool {
        match &self.form {
            ComplexForm::Rectangular { re, im } => re.is_zero() && im.is_zero(),
            ComplexForm::Polar { radius, .. } => radius.is_zero(),
        }
    }

    fn add(&self, rhs: &Self) -> TowerResult<Self> {
        self.checked_add(rhs)
    }

    fn subtract(&self, rhs: &Self) -> TowerResult<Self> {
        self.checked_sub(rhs)
    }

    fn multiply(&self, rhs: &Self) -> TowerResult<Self> {
        self.checked_mul(rhs)
    }

    fn divide(&self, rhs: &Self) -> TowerResult<Number> {
        self.checked_div(rhs).map(Number::Complex)
    }

    fn negate(&self) -> Self {
        match &self.form {
            ComplexForm::Rectangular { re, im } => Self::rectangular(re.negate(), im.negate()),
            ComplexForm::Polar { radius, angle } => Self::polar(radius.negate(), angle.clone()),
        }
    }

    fn invert(&self) -> TowerResult<Number> {
        if self.is_zero() {
            return Err(TowerError::Domain {
                operation: "invert",
                reason: "zero has no multiplicative inverse",
            });
        }
        let one = Self::from_real(Real::one(self.policy()));
        let inverse = match &self.form {
            ComplexForm::Polar { radius, angle } => {
                Self::polar(radius.reciprocal()?, angle.negate())
            }
            ComplexForm::Rectangular { .. } => one.checked_div(self)?,
        };
        Ok(Number::Complex(inverse))
    }

    fn magnitude(&self) -> TowerResult<Number> {
        self.modulus().map(Number::Real)
    }

    fn sign(&self) -> TowerResult<Sign> {
        self.to_real().map_err(unordered("sign"))?.sign()
    }

    fn compare(&self, rhs: &Self) -> TowerResult<Ordering> {
        let a = self.to_real().map_err(unordered("compare"))?;
        let b = rhs.to_real().map_err(unordered("compare"))?;
        a.compare(&b)
    }

    fn sqrt(&self) -> TowerResult<Number> {
        self.checked_sqrt().map(Number::Complex)
    }

    fn coerce_to(&self, kind: TowerKind) -> TowerResult<Number> {
        match kind {
            TowerKind::Complex => Ok(Number::Complex(self.clone())),
            TowerKind::Real => self.to_real().map(Number::Real),
            TowerKind::Rational => self.to_rational().map(Number::Rational),
            TowerKind::Integer => self.to_integer().map(Number::Integer),
        }
    }

    fn into_number(self) -> Number {
        Number::Complex(self)
    }
}

impl fmt::Display for Complex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.form {
            ComplexForm::Rectangular { re, im } => {
                if im.is_negative() {
                    write!(f, "{} - {}i", re, im.abs())
                } else {
                    write!(f, "{} + {}i", re, im)
                }
            }
            ComplexForm::Polar { radius, angle } => write!(f, "{} * e^({}i)", radius, angle),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::RoundingRule;

    fn policy() -> PrecisionPolicy {
        PrecisionPolicy::new(30, RoundingRule::HalfEven)
    }

    fn real(literal: &str) -> Real {
        Real::parse(literal, policy()).unwrap()
    }

    fn rect(re: &str, im: &str) -> Complex {
        Complex::rectangular(real(re), real(im))
    }

    fn close(actual: &Real, expected: &str) -> bool {
        let expected: BigDecimal = expected.parse().unwrap();
        let diff = (actual.decimal().unwrap() - &expected).abs();
        diff <= "1e-25".parse().unwrap()
    }

    #[test]
    fn test_rectangular_arithmetic() {
        let a = rect("1", "2");
        let b = rect("3", "-4");
        assert_eq!(a.checked_add(&b).unwrap(), rect("4", "-2"));
        assert_eq!(a.checked_sub(&b).unwrap(), rect("-2", "6"));
        assert_eq!(a.checked_mul(&b).unwrap(), rect("11", "2"));
        assert_eq!(a.checked_div(&b).unwrap(), rect("-0.2", "0.4"));
    }

    #[test]
    fn test_i_squared_is_minus_one() {
        let i = Complex::imaginary_unit(policy());
        let square = i.checked_mul(&i).unwrap();
        assert_eq!(square.to_real().unwrap(), real("-1"));
        assert!(square.is_exact());
    }

    #[test]
    fn test_polar_product_stays_polar() {
        let a = Complex::polar(real("2"), real("0.5"));
        let b = Complex::polar(real("3"), real("0.25"));
        let product = a.checked_mul(&b).unwrap();
        assert!(product.is_polar());
        assert_eq!(product, Complex::polar(real("6"), real("0.75")));
        let quotient = product.checked_div(&b).unwrap();
        assert_eq!(quotient, Complex::polar(real("2"), real("0.5")));
    }

    #[test]
    fn test_polar_to_rectangular() {
        let half_pi = series::pi(40, DEFAULT_MAX_ITERATIONS).unwrap().div_pow2(1);
        let z = Complex::polar(real("2"), Real::from_decimal(half_pi, policy()));
        let (re, im) = z.to_rectangular().unwrap();
        assert!(close(&re, "0"), "{}", re);
        assert!(close(&im, "2"), "{}", im);
    }

    #[test]
    fn test_to_polar() {
        let (radius, angle) = rect("3", "4").to_polar().unwrap();
        assert_eq!(radius, real("5"));
        assert!(close(&angle, "0.927295218001612232428512462922"), "{}", angle);
    }

    #[test]
    fn test_modulus_exactness_on_axis() {
        let z = rect("0", "-7.5");
        let m = z.modulus().unwrap();
        assert_eq!(m, real("7.5"));
        assert!(m.is_exact());
    }

    #[test]
    fn test_downward_coercion() {
        assert_eq!(
            rect("2.5", "0").coerce_to(TowerKind::Real).unwrap(),
            Number::Real(real("2.5"))
        );
        assert_eq!(
            rect("2", "0").coerce_to(TowerKind::Integer).unwrap().to_string(),
            "2"
        );
        assert_eq!(
            rect("2", "1").coerce_to(TowerKind::Integer),
            Err(TowerError::Coercion {
                from: TowerKind::Complex,
                to: TowerKind::Integer
            })
        );
    }

    #[test]
    fn test_sign_and_compare_need_real_values() {
        assert_eq!(rect("-3", "0").sign().unwrap(), Sign::Negative);
        assert!(matches!(
            rect("1", "1").sign(),
            Err(TowerError::UnsupportedOperation { operation: "sign", .. })
        ));
        assert!(rect("1", "1").compare(&rect("2", "0")).is_err());

        let unbounded = Complex::polar(real("1"), Real::infinity(false, policy()));
        assert_eq!(
            unbounded.sign(),
            Err(TowerError::Domain {
                operation: "to_rectangular",
                reason: "argument is infinite",
            })
        );
    }

    #[test]
    fn test_polar_half_turn_coerces_at_low_precision() {
        let p10 = PrecisionPolicy::new(10, RoundingRule::HalfEven);
        let pi = series::pi(10, DEFAULT_MAX_ITERATIONS).unwrap();
        let half_turn = Complex::polar(Real::one(p10), Real::approximate(pi.clone(), p10));
        let minus_one = half_turn.to_real().unwrap();
        assert_eq!(minus_one.decimal().unwrap(), &BigDecimal::from_i64(-1));

        let five_half_turns = Complex::polar(
            Real::one(p10),
            Real::approximate(&pi * &BigDecimal::from_i64(5), p10),
        );
        assert_eq!(
            five_half_turns.to_real().unwrap().decimal().unwrap(),
            &BigDecimal::from_i64(-1)
        );

        let one_radian = Complex::polar(Real::one(p10), Real::approximate(BigDecimal::one(), p10));
        assert!(one_radian.to_real().is_err());
    }

    #[test]
    fn test_exact_imaginary_part_must_vanish() {
        let tiny = rect("1", "1e-40");
        assert_eq!(
            tiny.to_real(),
            Err(TowerError::Coercion {
                from: TowerKind::Complex,
                to: TowerKind::Real,
            })
        );
    }

    #[test]
    fn test_sqrt() {
        let root = rect("-4", "0").checked_sqrt().unwrap();
        assert_eq!(root, rect("0", "2"));

        let root = rect("3", "4").checked_sqrt().unwrap();
        let (re, im) = root.to_rectangular().unwrap();
        assert!(close(&re, "2"), "{}", re);
        assert!(close(&im, "1"), "{}", im);
    }

    #[test]
    fn test_invert() {
        let inverse = rect("0", "2").invert().unwrap();
        assert_eq!(inverse, Number::Complex(rect("0", "-0.5")));
        assert!(rect("0", "0").invert().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(rect("1", "-2").to_string(), "1 - 2i");
        assert_eq!(rect("1", "2").to_string(), "1 + 2i");
    }
}
