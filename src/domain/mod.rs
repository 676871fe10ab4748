// ============================================================================
// Domain Models Module
// The tower kinds, their closed sum, coercion and canonical constants
// ============================================================================

pub mod coercion;
pub mod config;
pub mod constants;

mod complex;
mod integer;
mod kind;
mod number;
mod rational;
mod real;

pub use coercion::{common_kind, homogenize, promote_pair, Homogeneous};
pub use complex::{Complex, ComplexForm};
pub use config::KernelConfig;
pub use constants::{ConstantRegistry, ImaginaryUnit, One, Zero};
pub use integer::Integer;
pub use kind::{Sign, TowerKind};
pub use number::Number;
pub use rational::Rational;
pub use real::Real;
