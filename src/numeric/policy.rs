// ============================================================================
// Precision Policy
// Significant-digit count and rounding rule applied to arithmetic results
// ============================================================================

use super::errors::{TowerError, TowerResult};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ============================================================================
// Rounding Rule
// ============================================================================

/// Rounding modes applied when a result has more digits than a policy allows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RoundingRule {
    /// Away from zero
    Up,
    /// Toward zero (truncation)
    Down,
    /// Toward positive infinity
    Ceiling,
    /// Toward negative infinity
    Floor,
    /// Nearest neighbour, ties away from zero
    HalfUp,
    /// Nearest neighbour, ties toward zero
    HalfDown,
    /// Nearest neighbour, ties to the even neighbour (banker's rounding)
    #[default]
    HalfEven,
}

// ============================================================================
// Precision Policy
// ============================================================================

/// Precision and rounding applied to every derived tower value.
///
/// `digits == 0` means unlimited: results are kept exact wherever the
/// operation allows it.
///
/// # Example
/// ```
/// use numeric_tower::numeric::{PrecisionPolicy, RoundingRule};
///
/// let coarse = PrecisionPolicy::new(5, RoundingRule::HalfUp);
/// let fine = PrecisionPolicy::decimal64();
/// assert_eq!(coarse.reconcile(&fine).digits(), 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrecisionPolicy {
    digits: u32,
    rounding: RoundingRule,
}

impl PrecisionPolicy {
    /// Create a policy with the given significant digits (0 = unlimited)
    pub const fn new(digits: u32, rounding: RoundingRule) -> Self {
        Self { digits, rounding }
    }

    /// Create a policy from an untrusted digit count.
    ///
    /// # Errors
    /// Returns `InvalidPolicy` for negative counts and `Overflow` for counts
    /// beyond `u32::MAX`.
    pub fn try_new(digits: i64, rounding: RoundingRule) -> TowerResult<Self> {
        if digits < 0 {
            return Err(TowerError::InvalidPolicy(digits));
        }
        let digits = u32::try_from(digits).map_err(|_| TowerError::Overflow)?;
        Ok(Self::new(digits, rounding))
    }

    /// Unlimited precision, no rounding
    pub const fn unlimited() -> Self {
        Self::new(0, RoundingRule::HalfEven)
    }

    /// IEEE 754 decimal32-like: 7 digits, half-even
    pub const fn decimal32() -> Self {
        Self::new(7, RoundingRule::HalfEven)
    }

    /// IEEE 754 decimal64-like: 16 digits, half-even
    pub const fn decimal64() -> Self {
        Self::new(16, RoundingRule::HalfEven)
    }

    /// IEEE 754 decimal128-like: 34 digits, half-even
    pub const fn decimal128() -> Self {
        Self::new(34, RoundingRule::HalfEven)
    }

    #[inline]
    pub const fn digits(&self) -> u32 {
        self.digits
    }

    #[inline]
    pub const fn rounding(&self) -> RoundingRule {
        self.rounding
    }

    #[inline]
    pub const fn is_unlimited(&self) -> bool {
        self.digits == 0
    }

    /// Same rounding rule, different digit count
    pub const fn with_digits(self, digits: u32) -> Self {
        Self::new(digits, self.rounding)
    }

    /// Same digit count, different rounding rule
    pub const fn with_rounding(self, rounding: RoundingRule) -> Self {
        Self::new(self.digits, rounding)
    }

    /// Policy for a binary operation: the lower finite precision wins.
    ///
    /// An unlimited policy never refines a finite one. On equal digit counts
    /// the receiver's rounding rule is kept.
    pub fn reconcile(&self, other: &Self) -> Self {
        match (self.is_unlimited(), other.is_unlimited()) {
            (true, true) => *self,
            (true, false) => *other,
            (false, true) => *self,
            (false, false) => {
                if other.digits < self.digits {
                    *other
                } else {
                    *self
                }
            },
        }
    }

    /// Digits to actually compute with: the policy's own digits, or
    /// `fallback` when unlimited.
    #[inline]
    pub fn effective_digits(&self, fallback: u32) -> u32 {
        if self.is_unlimited() {
            fallback
        } else {
            self.digits
        }
    }
}

impl Default for PrecisionPolicy {
    fn default() -> Self {
        Self::unlimited()
    }
}

impl fmt::Display for PrecisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_unlimited() {
            write!(f, "unlimited")
        } else {
            write!(f, "{} digits, {:?}", self.digits, self.rounding)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(PrecisionPolicy::unlimited().is_unlimited());
        assert_eq!(PrecisionPolicy::decimal32().digits(), 7);
        assert_eq!(PrecisionPolicy::decimal64().digits(), 16);
        assert_eq!(PrecisionPolicy::decimal128().digits(), 34);
        assert_eq!(PrecisionPolicy::default(), PrecisionPolicy::unlimited());
    }

    #[test]
    fn test_try_new_rejects_negative_digits() {
        assert_eq!(
            PrecisionPolicy::try_new(-3, RoundingRule::HalfUp),
            Err(TowerError::InvalidPolicy(-3))
        );
        assert_eq!(
            PrecisionPolicy::try_new(12, RoundingRule::HalfUp)
                .unwrap()
                .digits(),
            12
        );
        assert_eq!(
            PrecisionPolicy::try_new(i64::MAX, RoundingRule::HalfUp),
            Err(TowerError::Overflow)
        );
    }

    #[test]
    fn test_reconcile_takes_lower_precision() {
        let five = PrecisionPolicy::new(5, RoundingRule::Down);
        let ten = PrecisionPolicy::new(10, RoundingRule::HalfUp);
        assert_eq!(five.reconcile(&ten), five);
        assert_eq!(ten.reconcile(&five), five);
    }

    #[test]
    fn test_reconcile_never_refines_with_unlimited() {
        let five = PrecisionPolicy::new(5, RoundingRule::Down);
        let unlimited = PrecisionPolicy::unlimited();
        assert_eq!(unlimited.reconcile(&five), five);
        assert_eq!(five.reconcile(&unlimited), five);
        assert_eq!(unlimited.reconcile(&unlimited), unlimited);
    }

    #[test]
    fn test_effective_digits() {
        assert_eq!(PrecisionPolicy::unlimited().effective_digits(34), 34);
        assert_eq!(PrecisionPolicy::decimal32().effective_digits(34), 7);
    }

    #[test]
    fn test_display() {
        assert_eq!(PrecisionPolicy::unlimited().to_string(), "unlimited");
        assert_eq!(
            PrecisionPolicy::new(5, RoundingRule::HalfUp).to_string(),
            "5 digits, HalfUp"
        );
    }
}
