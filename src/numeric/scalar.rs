// ============================================================================
// Scalar Representation
// Arbitrary-precision decimal tagged with exactness and a precision policy
// ============================================================================

use super::decimal::BigDecimal;
use super::errors::TowerResult;
use super::policy::PrecisionPolicy;
use std::fmt;
use std::ops::Neg;

/// The base representation behind every inexact tower value.
///
/// A scalar is immutable: every operation returns a new value. Results of
/// binary operations use the narrower of the two policies and are exact only
/// if both operands were exact and no rounding happened.
///
/// # Example
/// ```
/// use numeric_tower::numeric::{PrecisionPolicy, RoundingRule, Scalar};
///
/// let policy = PrecisionPolicy::new(4, RoundingRule::HalfEven);
/// let x = Scalar::from_decimal_str("1.5", policy).unwrap();
/// let y = Scalar::from_i64(3, policy);
/// let q = x.divide(&y).unwrap();
/// assert_eq!(q.value().to_string(), "0.5");
/// assert!(q.is_exact());
/// ```
#[derive(Clone, PartialEq)]
pub struct Scalar {
    value: BigDecimal,
    exact: bool,
    policy: PrecisionPolicy,
}

impl Scalar {
    // ========================================================================
    // Construction
    // ========================================================================

    /// Wrap a decimal, rounding it to the policy.
    pub fn new(value: BigDecimal, policy: PrecisionPolicy) -> Self {
        Self::with_exactness(value, true, policy)
    }

    /// Wrap a decimal with a known exactness; rounding clears the flag.
    pub fn with_exactness(value: BigDecimal, exact: bool, policy: PrecisionPolicy) -> Self {
        let (value, inexact) = value.round_to_precision(policy.digits(), policy.rounding());
        Self {
            value,
            exact: exact && !inexact,
            policy,
        }
    }

    /// Parse a decimal-string literal.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the literal cannot be parsed.
    pub fn from_decimal_str(literal: &str, policy: PrecisionPolicy) -> TowerResult<Self> {
        Ok(Self::new(literal.parse()?, policy))
    }

    pub fn from_i64(value: i64, policy: PrecisionPolicy) -> Self {
        Self::new(BigDecimal::from_i64(value), policy)
    }

    pub fn zero(policy: PrecisionPolicy) -> Self {
        Self::new(BigDecimal::zero(), policy)
    }

    pub fn one(policy: PrecisionPolicy) -> Self {
        Self::new(BigDecimal::one(), policy)
    }

    /// Copy with a new precision policy (rounds if the new one is narrower)
    pub fn with_policy(&self, policy: PrecisionPolicy) -> Self {
        Self::with_exactness(self.value.clone(), self.exact, policy)
    }

    /// Copy flagged as inexact
    pub fn into_inexact(self) -> Self {
        Self {
            exact: false,
            ..self
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    pub fn value(&self) -> &BigDecimal {
        &self.value
    }

    #[inline]
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    #[inline]
    pub fn policy(&self) -> PrecisionPolicy {
        self.policy
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    // ========================================================================
    // Arithmetic Operations
    // ========================================================================

    fn combine(&self, rhs: &Self, value: BigDecimal) -> Self {
        let policy = self.policy.reconcile(&rhs.policy);
        Self::with_exactness(value, self.exact && rhs.exact, policy)
    }

    pub fn add(&self, rhs: &Self) -> Self {
        self.combine(rhs, &self.value + &rhs.value)
    }

    pub fn subtract(&self, rhs: &Self) -> Self {
        self.combine(rhs, &self.value - &rhs.value)
    }

    pub fn multiply(&self, rhs: &Self) -> Self {
        self.combine(rhs, &self.value * &rhs.value)
    }

    /// Divide under the reconciled policy.
    ///
    /// # Errors
    /// Returns `DivisionByZero` if `rhs` is zero.
    pub fn divide(&self, rhs: &Self) -> TowerResult<Self> {
        let policy = self.policy.reconcile(&rhs.policy);
        let (value, inexact) =
            self.value
                .checked_div(&rhs.value, policy.digits(), policy.rounding())?;
        Ok(Self {
            value,
            exact: self.exact && rhs.exact && !inexact,
            policy,
        })
    }

    pub fn negate(&self) -> Self {
        Self {
            value: -&self.value,
            exact: self.exact,
            policy: self.policy,
        }
    }

    pub fn abs(&self) -> Self {
        Self {
            value: self.value.abs(),
            exact: self.exact,
            policy: self.policy,
        }
    }

    /// Square root under the scalar's own policy.
    ///
    /// # Errors
    /// Returns a `Domain` error for negative values.
    pub fn sqrt(&self) -> TowerResult<Self> {
        let (value, inexact) = self
            .value
            .sqrt(self.policy.digits(), self.policy.rounding())?;
        Ok(Self {
            value,
            exact: self.exact && !inexact,
            policy: self.policy,
        })
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Self::Output {
        self.negate()
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scalar({}, exact={}, policy={})",
            self.value, self.exact, self.policy
        )
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{RoundingRule, TowerError};

    fn policy(digits: u32) -> PrecisionPolicy {
        PrecisionPolicy::new(digits, RoundingRule::HalfEven)
    }

    #[test]
    fn test_construction_rounds_to_policy() {
        let x = Scalar::from_decimal_str("3.14159", policy(3)).unwrap();
        assert_eq!(x.to_string(), "3.14");
        assert!(!x.is_exact());

        let y = Scalar::from_decimal_str("3.14159", PrecisionPolicy::unlimited()).unwrap();
        assert_eq!(y.to_string(), "3.14159");
        assert!(y.is_exact());
    }

    #[test]
    fn test_with_policy_copy() {
        let x = Scalar::from_decimal_str("2.71828", PrecisionPolicy::unlimited()).unwrap();
        let narrowed = x.with_policy(policy(2));
        assert_eq!(narrowed.to_string(), "2.7");
        assert!(!narrowed.is_exact());
        assert!(x.is_exact());
    }

    #[test]
    fn test_binary_ops_use_narrower_policy() {
        let five = Scalar::from_decimal_str("1.23456789", policy(5)).unwrap();
        let ten = Scalar::from_decimal_str("1.000000001", policy(10)).unwrap();
        let sum = five.add(&ten);
        assert_eq!(sum.policy().digits(), 5);
        assert_eq!(sum.to_string(), "2.2346");
        assert!(!sum.is_exact());
    }

    #[test]
    fn test_exactness_propagates() {
        let a = Scalar::from_i64(6, policy(10));
        let b = Scalar::from_i64(4, policy(10));
        assert!(a.multiply(&b).is_exact());
        assert!(a.divide(&b).unwrap().is_exact());

        let third = Scalar::from_i64(1, policy(10))
            .divide(&Scalar::from_i64(3, policy(10)))
            .unwrap();
        assert!(!third.is_exact());
        assert!(!third.add(&a).is_exact());
    }

    #[test]
    fn test_divide_by_zero() {
        let a = Scalar::from_i64(1, policy(10));
        assert_eq!(
            a.divide(&Scalar::zero(policy(10))),
            Err(TowerError::DivisionByZero)
        );
    }

    #[test]
    fn test_negate_and_abs() {
        let a = Scalar::from_decimal_str("-2.5", policy(10)).unwrap();
        assert_eq!(a.negate().to_string(), "2.5");
        assert_eq!(a.abs().to_string(), "2.5");
        assert_eq!((-a).to_string(), "2.5");
    }

    #[test]
    fn test_sqrt() {
        let four = Scalar::from_i64(4, policy(10));
        let root = four.sqrt().unwrap();
        assert_eq!(root.value(), &BigDecimal::from_i64(2));
        assert!(root.is_exact());
        assert!(Scalar::from_i64(-4, policy(10)).sqrt().is_err());
    }
}
