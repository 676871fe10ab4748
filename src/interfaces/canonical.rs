// ============================================================================
// Canonical Instance Interface
// Factory contract for algebraic identities of the tower
// ============================================================================

use crate::domain::Number;
use crate::numeric::PrecisionPolicy;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Key of a canonical constant in the constant registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConstantId {
    Zero,
    One,
    ImaginaryUnit,
    Pi,
    Ln10,
}

/// Constants that have one canonical instance per precision policy.
///
/// Identities are requested through this factory rather than constructed ad
/// hoc, so the kernel and the registry can recognise and share them.
pub trait HasCanonicalInstance {
    /// Registry key for this constant
    const ID: ConstantId;

    /// Build the constant under a policy
    fn instance_for(policy: PrecisionPolicy) -> Number;
}
