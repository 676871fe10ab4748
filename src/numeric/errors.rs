// ============================================================================
// Numeric Errors
// Error types for tower arithmetic, coercion and the algorithmic kernel
// ============================================================================

use crate::domain::TowerKind;
use std::fmt;

/// Errors that can occur anywhere in the numeric tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TowerError {
    /// Value cannot be converted to the requested kind without loss
    Coercion { from: TowerKind, to: TowerKind },
    /// Operation undefined for the given argument
    Domain {
        operation: &'static str,
        reason: &'static str,
    },
    /// Attempted division by zero
    DivisionByZero,
    /// Exponent kind has no defined algorithm
    UnsupportedExponentKind(TowerKind),
    /// Operation is not defined for this kind
    UnsupportedOperation {
        operation: &'static str,
        kind: TowerKind,
    },
    /// Precision policy cannot be represented (negative digit count)
    InvalidPolicy(i64),
    /// Iterative method hit its iteration cap before reaching a fixed point
    ConvergenceFailure {
        operation: &'static str,
        iterations: usize,
    },
    /// Input string or value is invalid
    InvalidInput,
    /// Value does not fit the native type it must be converted to
    Overflow,
}

impl fmt::Display for TowerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TowerError::Coercion { from, to } => {
                write!(f, "coercion error: {} value is not representable as {}", from, to)
            },
            TowerError::Domain { operation, reason } => {
                write!(f, "domain error in {}: {}", operation, reason)
            },
            TowerError::DivisionByZero => write!(f, "division by zero"),
            TowerError::UnsupportedExponentKind(kind) => {
                write!(f, "unsupported exponent kind: {}", kind)
            },
            TowerError::UnsupportedOperation { operation, kind } => {
                write!(f, "unsupported operation: {} is not defined for {}", operation, kind)
            },
            TowerError::InvalidPolicy(digits) => write!(
                f,
                "invalid precision policy: {} significant digits",
                digits
            ),
            TowerError::ConvergenceFailure {
                operation,
                iterations,
            } => write!(
                f,
                "convergence failure: {} did not converge within {} iterations",
                operation, iterations
            ),
            TowerError::InvalidInput => write!(f, "invalid input: could not parse value"),
            TowerError::Overflow => {
                write!(f, "overflow: value does not fit the required native type")
            },
        }
    }
}

impl std::error::Error for TowerError {}

/// Result type alias for tower operations
pub type TowerResult<T> = Result<T, TowerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(TowerError::DivisionByZero.to_string(), "division by zero");
        assert_eq!(
            TowerError::Coercion {
                from: TowerKind::Real,
                to: TowerKind::Integer
            }
            .to_string(),
            "coercion error: Real value is not representable as Integer"
        );
        assert_eq!(
            TowerError::ConvergenceFailure {
                operation: "ln",
                iterations: 12
            }
            .to_string(),
            "convergence failure: ln did not converge within 12 iterations"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(TowerError::Overflow, TowerError::Overflow);
        assert_ne!(TowerError::Overflow, TowerError::InvalidInput);
        assert_ne!(
            TowerError::UnsupportedExponentKind(TowerKind::Complex),
            TowerError::UnsupportedExponentKind(TowerKind::Real)
        );
    }
}
