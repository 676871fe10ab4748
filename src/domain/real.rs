// ============================================================================
// Real Kind
// Arbitrary-precision decimals plus signed infinities
// ============================================================================

use super::complex::Complex;
use super::integer::Integer;
use super::kind::{Sign, TowerKind};
use super::number::Number;
use super::rational::Rational;
use crate::interfaces::TowerOps;
use crate::numeric::{BigDecimal, PrecisionPolicy, Scalar, TowerError, TowerResult};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
enum RealRepr {
    Finite(Scalar),
    Infinite {
        negative: bool,
        policy: PrecisionPolicy,
    },
}

/// Real number backed by a [`Scalar`], or a signed infinity.
///
/// Infinities arise from `ln(0)` and from arithmetic on infinities; they
/// never coerce below `Real` and are never exact.
#[derive(Debug, Clone, PartialEq)]
pub struct Real {
    repr: RealRepr,
}

impl Real {
    // ========================================================================
    // Construction
    // ========================================================================

    pub fn from_scalar(scalar: Scalar) -> Self {
        Self {
            repr: RealRepr::Finite(scalar),
        }
    }

    /// Wrap an exact decimal, rounding it to the policy.
    pub fn from_decimal(value: BigDecimal, policy: PrecisionPolicy) -> Self {
        Self::from_scalar(Scalar::new(value, policy))
    }

    /// Wrap a computed decimal; the result is marked inexact.
    pub fn approximate(value: BigDecimal, policy: PrecisionPolicy) -> Self {
        Self::from_scalar(Scalar::with_exactness(value, false, policy))
    }

    /// Parse a decimal literal such as `"-1.25"` or `"6.02e23"`.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the literal cannot be parsed, or `Overflow`
    /// if its exponent pushes the scale past `MAX_LITERAL_SCALE`.
    pub fn parse(literal: &str, policy: PrecisionPolicy) -> TowerResult<Self> {
        Scalar::from_decimal_str(literal, policy).map(Self::from_scalar)
    }

    pub fn from_i64(value: i64, policy: PrecisionPolicy) -> Self {
        Self::from_scalar(Scalar::from_i64(value, policy))
    }

    pub fn zero(policy: PrecisionPolicy) -> Self {
        Self::from_scalar(Scalar::zero(policy))
    }

    pub fn one(policy: PrecisionPolicy) -> Self {
        Self::from_scalar(Scalar::one(policy))
    }

    pub fn infinity(negative: bool, policy: PrecisionPolicy) -> Self {
        Self {
            repr: RealRepr::Infinite { negative, policy },
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn scalar(&self) -> Option<&Scalar> {
        match &self.repr {
            RealRepr::Finite(scalar) => Some(scalar),
            RealRepr::Infinite { .. } => None,
        }
    }

    #[inline]
    pub fn decimal(&self) -> Option<&BigDecimal> {
        self.scalar().map(Scalar::value)
    }

    /// The finite decimal, or a `Domain` error naming `operation`.
    pub(crate) fn finite_decimal(&self, operation: &'static str) -> TowerResult<&BigDecimal> {
        self.decimal().ok_or(TowerError::Domain {
            operation,
            reason: "argument is infinite",
        })
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        matches!(self.repr, RealRepr::Finite(_))
    }

    #[inline]
    pub fn is_infinite(&self) -> bool {
        !self.is_finite()
    }

    pub fn is_negative(&self) -> bool {
        match &self.repr {
            RealRepr::Finite(scalar) => scalar.is_negative(),
            RealRepr::Infinite { negative, .. } => *negative,
        }
    }

    pub fn is_positive(&self) -> bool {
        match &self.repr {
            RealRepr::Finite(scalar) => scalar.value().is_positive(),
            RealRepr::Infinite { negative, .. } => !*negative,
        }
    }

    /// Whether the value is a finite integer
    pub fn is_integral(&self) -> bool {
        self.decimal().is_some_and(BigDecimal::is_integer)
    }

    /// Same value with the exactness flag cleared
    pub fn into_inexact(self) -> Self {
        match self.repr {
            RealRepr::Finite(scalar) => Self::from_scalar(scalar.into_inexact()),
            infinite @ RealRepr::Infinite { .. } => Self { repr: infinite },
        }
    }

    // ========================================================================
    // Typed Arithmetic
    // ========================================================================

    /// # Errors
    /// Returns a `Domain` error for `inf - inf`.
    pub fn checked_add(&self, rhs: &Self) -> TowerResult<Self> {
        let policy = self.policy().reconcile(&rhs.policy());
        match (&self.repr, &rhs.repr) {
            (RealRepr::Finite(a), RealRepr::Finite(b)) => Ok(Self::from_scalar(a.add(b))),
            (RealRepr::Infinite { negative: a, .. }, RealRepr::Infinite { negative: b, .. }) => {
                if a == b {
                    Ok(Self::infinity(*a, policy))
                } else {
                    Err(TowerError::Domain {
                        operation: "add",
                        reason: "infinities of opposite sign",
                    })
                }
            }
            (RealRepr::Infinite { negative, .. }, RealRepr::Finite(_))
            | (RealRepr::Finite(_), RealRepr::Infinite { negative, .. }) => {
                Ok(Self::infinity(*negative, policy))
            }
        }
    }

    pub fn checked_sub(&self, rhs: &Self) -> TowerResult<Self> {
        self.checked_add(&rhs.negate())
    }

    /// # Errors
    /// Returns a `Domain` error for `0 * inf`.
    pub fn checked_mul(&self, rhs: &Self) -> TowerResult<Self> {
        let policy = self.policy().reconcile(&rhs.policy());
        match (&self.repr, &rhs.repr) {
            (RealRepr::Finite(a), RealRepr::Finite(b)) => Ok(Self::from_scalar(a.multiply(b))),
            _ if self.is_zero() || rhs.is_zero() => Err(TowerError::Domain {
                operation: "multiply",
                reason: "zero times infinity",
            }),
            _ => Ok(Self::infinity(
                self.is_negative() != rhs.is_negative(),
                policy,
            )),
        }
    }

    /// # Errors
    /// Returns `DivisionByZero` for a zero divisor and a `Domain` error for
    /// `inf / inf`.
    pub fn checked_div(&self, rhs: &Self) -> TowerResult<Self> {
        if rhs.is_zero() {
            return Err(TowerError::DivisionByZero);
        }
        let policy = self.policy().reconcile(&rhs.policy());
        match (&self.repr, &rhs.repr) {
            (RealRepr::Finite(a), RealRepr::Finite(b)) => a.divide(b).map(Self::from_scalar),
            (RealRepr::Finite(_), RealRepr::Infinite { .. }) => Ok(Self::zero(policy)),
            (RealRepr::Infinite { negative, .. }, RealRepr::Finite(b)) => {
                Ok(Self::infinity(*negative != b.is_negative(), policy))
            }
            (RealRepr::Infinite { .. }, RealRepr::Infinite { .. }) => Err(TowerError::Domain {
                operation: "divide",
                reason: "infinity divided by infinity",
            }),
        }
    }

    /// Square root within the reals.
    ///
    /// # Errors
    /// Returns a `Domain` error for negative values.
    pub fn checked_sqrt(&self) -> TowerResult<Self> {
        match &self.repr {
            RealRepr::Finite(scalar) => scalar.sqrt().map(Self::from_scalar),
            RealRepr::Infinite { negative: false, policy } => Ok(Self::infinity(false, *policy)),
            RealRepr::Infinite { negative: true, .. } => Err(TowerError::Domain {
                operation: "sqrt",
                reason: "negative argument",
            }),
        }
    }

    /// Reciprocal within the reals; `1/inf` is zero.
    ///
    /// # Errors
    /// Returns a `Domain` error for zero.
    pub fn reciprocal(&self) -> TowerResult<Self> {
        if self.is_zero() {
            return Err(TowerError::Domain {
                operation: "invert",
                reason: "zero has no multiplicative inverse",
            });
        }
        Self::one(self.policy()).checked_div(self)
    }

    pub fn abs(&self) -> Self {
        match &self.repr {
            RealRepr::Finite(scalar) => Self::from_scalar(scalar.abs()),
            RealRepr::Infinite { policy, .. } => Self::infinity(false, *policy),
        }
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    fn coercion_error(to: TowerKind) -> TowerError {
        TowerError::Coercion {
            from: TowerKind::Real,
            to,
        }
    }

    /// # Errors
    /// Returns `Coercion` unless the value is a finite integer.
    pub fn to_integer(&self) -> TowerResult<Integer> {
        self.decimal()
            .and_then(BigDecimal::to_bigint)
            .map(|value| Integer::new(value, self.policy()))
            .ok_or_else(|| Self::coercion_error(TowerKind::Integer))
    }

    /// Exact fraction equal to the stored decimal.
    ///
    /// # Errors
    /// Returns `Coercion` for infinities.
    pub fn to_rational(&self) -> TowerResult<Rational> {
        self.decimal()
            .map(|value| Rational::from_decimal(value, self.policy()))
            .ok_or_else(|| Self::coercion_error(TowerKind::Rational))
    }

    pub fn to_complex(&self) -> Complex {
        Complex::from_real(self.clone())
    }
}

impl TowerOps for Real {
    fn kind(&self) -> TowerKind {
        TowerKind::Real
    }

    fn policy(&self) -> PrecisionPolicy {
        match &self.repr {
            RealRepr::Finite(scalar) => scalar.policy(),
            RealRepr::Infinite { policy, .. } => *policy,
        }
    }

    fn with_policy(&self, policy: PrecisionPolicy) -> Self {
        match &self.repr {
            RealRepr::Finite(scalar) => Self::from_scalar(scalar.with_policy(policy)),
            RealRepr::Infinite { negative, .. } => Self::infinity(*negative, policy),
        }
    }

    fn is_exact(&self) -> bool {
        self.scalar().is_some_and(Scalar::is_exact)
    }

    fn is_zero(&self) -> bool {
        self.scalar().is_some_and(Scalar::is_zero)
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
        self.checked_div(rhs).map(Number::Real)
    }

    fn negate(&self) -> Self {
        match &self.repr {
            RealRepr::Finite(scalar) => Self::from_scalar(scalar.negate()),
            RealRepr::Infinite { negative, policy } => Self::infinity(!negative, *policy),
        }
    }

    fn invert(&self) -> TowerResult<Number> {
        self.reciprocal().map(Number::Real)
    }

    fn magnitude(&self) -> TowerResult<Number> {
        Ok(Number::Real(self.abs()))
    }

    fn sign(&self) -> TowerResult<Sign> {
        Ok(if self.is_zero() {
            Sign::Zero
        } else if self.is_negative() {
            Sign::Negative
        } else {
            Sign::Positive
        })
    }

    fn compare(&self, rhs: &Self) -> TowerResult<Ordering> {
        Ok(match (&self.repr, &rhs.repr) {
            (RealRepr::Finite(a), RealRepr::Finite(b)) => a.value().cmp(b.value()),
            (RealRepr::Infinite { negative: a, .. }, RealRepr::Infinite { negative: b, .. }) => {
                b.cmp(a)
            }
            (RealRepr::Infinite { negative, .. }, RealRepr::Finite(_)) => {
                if *negative {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (RealRepr::Finite(_), RealRepr::Infinite { negative, .. }) => {
                if *negative {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
        })
    }

    fn sqrt(&self) -> TowerResult<Number> {
        if self.is_negative() {
            let root = self.abs().checked_sqrt()?;
            return Ok(Number::Complex(Complex::imaginary(root)));
        }
        self.checked_sqrt().map(Number::Real)
    }

    fn coerce_to(&self, kind: TowerKind) -> TowerResult<Number> {
        match kind {
            TowerKind::Integer => self.to_integer().map(Number::Integer),
            TowerKind::Rational => self.to_rational().map(Number::Rational),
            TowerKind::Real => Ok(Number::Real(self.clone())),
            TowerKind::Complex => Ok(Number::Complex(self.to_complex())),
        }
    }

    fn into_number(self) -> Number {
        Number::Real(self)
    }
}

impl fmt::Display for Real {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            RealRepr::Finite(scalar) => write!(f, "{}", scalar.value()),
            RealRepr::Infinite { negative: true, .. } => write!(f, "-Infinity"),
            RealRepr::Infinite { negative: false, .. } => write!(f, "Infinity"),
        }
    }
}
