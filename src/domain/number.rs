// ============================================================================
// Number
// Closed sum over the tower kinds with mixed-kind dispatch
// ============================================================================

use super::coercion::{homogenize, Homogeneous};
use super::complex::Complex;
use super::integer::Integer;
use super::kind::{Sign, TowerKind};
use super::rational::Rational;
use super::real::Real;
use crate::interfaces::TowerOps;
use crate::numeric::{BigDecimal, PrecisionPolicy, TowerError, TowerResult};
use num_bigint::BigInt;
use num_traits::One;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Any value of the numeric tower.
///
/// Binary operations on `Number` promote both operands to their common kind
/// (see [`homogenize`](super::coercion::homogenize)) and then delegate to the
/// concrete kind.
///
/// # Example
/// ```
/// use numeric_tower::prelude::*;
///
/// let third = Number::integer(1).divide(&Number::integer(3)).unwrap();
/// assert_eq!(third.kind(), TowerKind::Rational);
///
/// let sum = third.add(&Number::parse("0.5", PrecisionPolicy::new(4, RoundingRule::HalfEven)).unwrap()).unwrap();
/// assert_eq!(sum.kind(), TowerKind::Real);
/// assert_eq!(sum.to_string(), "0.8333");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Integer(Integer),
    Rational(Rational),
    Real(Real),
    Complex(Complex),
}

impl Number {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Integer under the unlimited policy
    pub fn integer(value: impl Into<BigInt>) -> Self {
        Number::Integer(Integer::new(value, PrecisionPolicy::unlimited()))
    }

    /// Parse a literal into the narrowest fitting kind.
    ///
    /// `"7"` is an Integer, `"-3/4"` a Rational, and anything with a decimal
    /// point or exponent (`"2.5"`, `"1e-3"`) a Real.
    ///
    /// # Errors
    /// Returns `InvalidInput` for malformed literals and `DivisionByZero`
    /// for a zero denominator.
    pub fn parse(literal: &str, policy: PrecisionPolicy) -> TowerResult<Self> {
        let literal = literal.trim();
        if let Some((numerator, denominator)) = literal.split_once('/') {
            let numerator = parse_bigint(numerator)?;
            let denominator = parse_bigint(denominator)?;
            return Rational::new(numerator, denominator, policy).map(Number::Rational);
        }
        if literal.contains(['.', 'e', 'E']) {
            return Real::parse(literal, policy).map(Number::Real);
        }
        parse_bigint(literal).map(|value| Number::Integer(Integer::new(value, policy)))
    }

    // ========================================================================
    // Typed Views
    // ========================================================================

    pub fn as_integer(&self) -> Option<&Integer> {
        match self {
            Number::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_rational(&self) -> Option<&Rational> {
        match self {
            Number::Rational(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<&Real> {
        match self {
            Number::Real(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_complex(&self) -> Option<&Complex> {
        match self {
            Number::Complex(value) => Some(value),
            _ => None,
        }
    }

    /// Coerce to `Integer`, failing unless exactly representable.
    pub fn to_integer(&self) -> TowerResult<Integer> {
        match self {
            Number::Integer(value) => Ok(value.clone()),
            Number::Rational(value) => value.to_integer(),
            Number::Real(value) => value.to_integer(),
            Number::Complex(value) => value.to_integer(),
        }
    }

    pub fn to_rational(&self) -> TowerResult<Rational> {
        match self {
            Number::Integer(value) => Ok(value.to_rational()),
            Number::Rational(value) => Ok(value.clone()),
            Number::Real(value) => value.to_rational(),
            Number::Complex(value) => value.to_rational(),
        }
    }

    pub fn to_real(&self) -> TowerResult<Real> {
        match self {
            Number::Integer(value) => Ok(value.to_real()),
            Number::Rational(value) => Ok(value.to_real()),
            Number::Real(value) => Ok(value.clone()),
            Number::Complex(value) => value.to_real(),
        }
    }

    pub fn to_complex(&self) -> Complex {
        match self {
            Number::Integer(value) => value.to_complex(),
            Number::Rational(value) => value.to_complex(),
            Number::Real(value) => value.to_complex(),
            Number::Complex(value) => value.clone(),
        }
    }

    /// Whether the value equals one (exactness is not checked)
    pub fn is_one(&self) -> bool {
        match self {
            Number::Integer(value) => value.is_one(),
            Number::Rational(value) => value.value().is_one(),
            Number::Real(value) => value.decimal().is_some_and(|d| *d == BigDecimal::one()),
            Number::Complex(_) => false,
        }
    }

    /// Zero known to be exact
    fn is_exact_zero(&self) -> bool {
        self.is_exact() && self.is_zero()
    }

    fn is_exact_one(&self) -> bool {
        self.is_exact() && self.is_one()
    }
}

fn parse_bigint(literal: &str) -> TowerResult<BigInt> {
    BigInt::from_str(literal.trim()).map_err(|_| TowerError::InvalidInput)
}

impl TowerOps for Number {
    fn kind(&self) -> TowerKind {
        match self {
            Number::Integer(_) => TowerKind::Integer,
            Number::Rational(_) => TowerKind::Rational,
            Number::Real(_) => TowerKind::Real,
            Number::Complex(_) => TowerKind::Complex,
        }
    }

    fn policy(&self) -> PrecisionPolicy {
        match self {
            Number::Integer(value) => value.policy(),
            Number::Rational(value) => value.policy(),
            Number::Real(value) => value.policy(),
            Number::Complex(value) => value.policy(),
        }
    }

    fn with_policy(&self, policy: PrecisionPolicy) -> Self {
        match self {
            Number::Integer(value) => Number::Integer(value.with_policy(policy)),
            Number::Rational(value) => Number::Rational(value.with_policy(policy)),
            Number::Real(value) => Number::Real(value.with_policy(policy)),
            Number::Complex(value) => Number::Complex(value.with_policy(policy)),
        }
    }

    fn is_exact(&self) -> bool {
        match self {
            Number::Integer(value) => value.is_exact(),
            Number::Rational(value) => value.is_exact(),
            Number::Real(value) => value.is_exact(),
            Number::Complex(value) => value.is_exact(),
        }
    }

    fn is_zero(&self) -> bool {
        match self {
            Number::Integer(value) => value.is_zero(),
            Number::Rational(value) => value.is_zero(),
            Number::Real(value) => value.is_zero(),
            Number::Complex(value) => value.is_zero(),
        }
    }

    /// Adding an exact zero of no higher kind returns the other operand
    /// under the reconciled policy.
    fn add(&self, rhs: &Self) -> TowerResult<Self> {
        let policy = self.policy().reconcile(&rhs.policy());
        if rhs.is_exact_zero() && rhs.kind() <= self.kind() {
            return Ok(self.with_policy(policy));
        }
        if self.is_exact_zero() && self.kind() <= rhs.kind() {
            return Ok(rhs.with_policy(policy));
        }
        Ok(match homogenize(self, rhs)? {
            Homogeneous::Integer(a, b) => Number::Integer(a.add(&b)?),
            Homogeneous::Rational(a, b) => Number::Rational(a.add(&b)?),
            Homogeneous::Real(a, b) => Number::Real(a.add(&b)?),
            Homogeneous::Complex(a, b) => Number::Complex(a.add(&b)?),
        })
    }

    fn subtract(&self, rhs: &Self) -> TowerResult<Self> {
        if rhs.is_exact_zero() && rhs.kind() <= self.kind() {
            return Ok(self.with_policy(self.policy().reconcile(&rhs.policy())));
        }
        Ok(match homogenize(self, rhs)? {
            Homogeneous::Integer(a, b) => Number::Integer(a.subtract(&b)?),
            Homogeneous::Rational(a, b) => Number::Rational(a.subtract(&b)?),
            Homogeneous::Real(a, b) => Number::Real(a.subtract(&b)?),
            Homogeneous::Complex(a, b) => Number::Complex(a.subtract(&b)?),
        })
    }

    /// Multiplying by an exact one of no higher kind returns the other
    /// operand under the reconciled policy.
    fn multiply(&self, rhs: &Self) -> TowerResult<Self> {
        let policy = self.policy().reconcile(&rhs.policy());
        if rhs.is_exact_one() && rhs.kind() <= self.kind() {
            return Ok(self.with_policy(policy));
        }
        if self.is_exact_one() && self.kind() <= rhs.kind() {
            return Ok(rhs.with_policy(policy));
        }
        Ok(match homogenize(self, rhs)? {
            Homogeneous::Integer(a, b) => Number::Integer(a.multiply(&b)?),
            Homogeneous::Rational(a, b) => Number::Rational(a.multiply(&b)?),
            Homogeneous::Real(a, b) => Number::Real(a.multiply(&b)?),
            Homogeneous::Complex(a, b) => Number::Complex(a.multiply(&b)?),
        })
    }

    fn divide(&self, rhs: &Self) -> TowerResult<Number> {
        match homogenize(self, rhs)? {
            Homogeneous::Integer(a, b) => a.divide(&b),
            Homogeneous::Rational(a, b) => a.divide(&b),
            Homogeneous::Real(a, b) => a.divide(&b),
            Homogeneous::Complex(a, b) => a.divide(&b),
        }
    }

    fn negate(&self) -> Self {
        match self {
            Number::Integer(value) => Number::Integer(value.negate()),
            Number::Rational(value) => Number::Rational(value.negate()),
            Number::Real(value) => Number::Real(value.negate()),
            Number::Complex(value) => Number::Complex(value.negate()),
        }
    }

    fn invert(&self) -> TowerResult<Number> {
        match self {
            Number::Integer(value) => value.invert(),
            Number::Rational(value) => value.invert(),
            Number::Real(value) => value.invert(),
            Number::Complex(value) => value.invert(),
        }
    }

    fn magnitude(&self) -> TowerResult<Number> {
        match self {
            Number::Integer(value) => value.magnitude(),
            Number::Rational(value) => value.magnitude(),
            Number::Real(value) => value.magnitude(),
            Number::Complex(value) => value.magnitude(),
        }
    }

    fn sign(&self) -> TowerResult<Sign> {
        match self {
            Number::Integer(value) => value.sign(),
            Number::Rational(value) => value.sign(),
            Number::Real(value) => value.sign(),
            Number::Complex(value) => value.sign(),
        }
    }

    fn compare(&self, rhs: &Self) -> TowerResult<Ordering> {
        match homogenize(self, rhs)? {
            Homogeneous::Integer(a, b) => a.compare(&b),
            Homogeneous::Rational(a, b) => a.compare(&b),
            Homogeneous::Real(a, b) => a.compare(&b),
            Homogeneous::Complex(a, b) => a.compare(&b),
        }
    }

    fn sqrt(&self) -> TowerResult<Number> {
        match self {
            Number::Integer(value) => value.sqrt(),
            Number::Rational(value) => value.sqrt(),
            Number::Real(value) => value.sqrt(),
            Number::Complex(value) => value.sqrt(),
        }
    }

    fn coerce_to(&self, kind: TowerKind) -> TowerResult<Number> {
        match self {
            Number::Integer(value) => value.coerce_to(kind),
            Number::Rational(value) => value.coerce_to(kind),
            Number::Real(value) => value.coerce_to(kind),
            Number::Complex(value) => value.coerce_to(kind),
        }
    }

    fn into_number(self) -> Number {
        self
    }
}

impl From<Integer> for Number {
    fn from(value: Integer) -> Self {
        Number::Integer(value)
    }
}

impl From<Rational> for Number {
    fn from(value: Rational) -> Self {
        Number::Rational(value)
    }
}

impl From<Real> for Number {
    fn from(value: Real) -> Self {
        Number::Real(value)
    }
}

impl From<Complex> for Number {
    fn from(value: Complex) -> Self {
        Number::Complex(value)
    }
}

impl From<i64> for Number {
    fn from(value: i64) -> Self {
        Number::integer(value)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(value) => write!(f, "{}", value),
            Number::Rational(value) => write!(f, "{}", value),
            Number::Real(value) => write!(f, "{}", value),
            Number::Complex(value) => write!(f, "{}", value),
        }
    }
}
