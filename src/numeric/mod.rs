// ============================================================================
// Numeric Module
// Arbitrary-precision decimal arithmetic underneath the numeric tower
// ============================================================================
//
// This module provides:
// - BigDecimal: arbitrary-precision decimal with policy-driven rounding
// - PrecisionPolicy / RoundingRule: digits and rounding applied to results
// - Scalar: decimal + exactness flag + policy, the base of every Real
// - series: exp, pi, sin, cos, atan over BigDecimal
// - TowerError: error type shared by the whole crate
//
// Design principles:
// - No floating-point arithmetic in results (f64 only seeds iterations)
// - All fallible arithmetic returns Result (no panics)
// - Precision is caller-supplied and never silently refined

mod decimal;
mod errors;
mod policy;
mod scalar;

pub mod series;

pub(crate) use decimal::{digit_count, pow10};
pub use decimal::{BigDecimal, UNLIMITED_DIVISION_DIGITS};
pub use errors::{TowerError, TowerResult};
pub use policy::{PrecisionPolicy, RoundingRule};
pub use scalar::Scalar;
