// ============================================================================
// Tower Protocol Interface
// The capability set every numeric tower kind implements
// ============================================================================

use crate::domain::{Number, Sign, TowerKind};
use crate::numeric::{PrecisionPolicy, TowerResult};
use std::cmp::Ordering;

/// Shared protocol of the numeric tower.
///
/// Implemented by each concrete kind (`Integer`, `Rational`, `Real`,
/// `Complex`) on homogeneous operands, and by `Number`, which resolves mixed
/// kinds through coercion before delegating. This trait is the only API
/// external collaborators (units, vectors, symbol tables) are meant to call.
///
/// All operations are pure: they return new values and never mutate their
/// operands. Operations that can leave the receiver's kind (division of
/// integers, roots of negatives, magnitudes of complex values) return a
/// `Number`.
pub trait TowerOps: Clone + Send + Sync + Sized {
    /// Kind tag used for promotion
    fn kind(&self) -> TowerKind;

    /// Precision policy carried by the value
    fn policy(&self) -> PrecisionPolicy;

    /// Copy with a new policy (rounding where the kind is inexact)
    fn with_policy(&self, policy: PrecisionPolicy) -> Self;

    /// Whether the value is known to be precisely representable
    fn is_exact(&self) -> bool;

    fn is_zero(&self) -> bool;

    fn add(&self, rhs: &Self) -> TowerResult<Self>;

    fn subtract(&self, rhs: &Self) -> TowerResult<Self>;

    fn multiply(&self, rhs: &Self) -> TowerResult<Self>;

    fn divide(&self, rhs: &Self) -> TowerResult<Number>;

    fn negate(&self) -> Self;

    /// Multiplicative inverse; zero has none
    fn invert(&self) -> TowerResult<Number>;

    /// Absolute value (modulus for complex values)
    fn magnitude(&self) -> TowerResult<Number>;

    fn sign(&self) -> TowerResult<Sign>;

    fn compare(&self, rhs: &Self) -> TowerResult<Ordering>;

    fn sqrt(&self) -> TowerResult<Number>;

    /// Convert to another kind. Upward coercion always succeeds; downward
    /// coercion fails with `Coercion` unless the value is exactly
    /// representable in the narrower kind.
    fn coerce_to(&self, kind: TowerKind) -> TowerResult<Number>;

    fn is_coercible_to(&self, kind: TowerKind) -> bool {
        self.coerce_to(kind).is_ok()
    }

    fn into_number(self) -> Number;
}
