// ============================================================================
// Numeric Tower Library
// Precision-aware numeric tower with an arbitrary-precision kernel
// ============================================================================

//! # Numeric Tower
//!
//! A numeric tower of four kinds, `Integer < Rational < Real < Complex`,
//! with automatic upward coercion and an algorithmic kernel for
//! transcendental functions at caller-chosen precision.
//!
//! ## Features
//!
//! - **Exact kinds** backed by `num-bigint` / `num-rational`
//! - **Policy-driven decimals**: every Real carries significant digits and a
//!   rounding rule; binary operations reconcile to the narrower policy
//! - **Exactness tracking** through every operation
//! - **Kernel**: memoized factorial, integer and generalized powers, ln, exp,
//!   n-th roots, roots of unity
//! - **Observability** through `tracing` and pluggable `KernelObserver`s
//!
//! ## Example
//!
//! ```rust
//! use numeric_tower::prelude::*;
//!
//! let policy = PrecisionPolicy::new(12, RoundingRule::HalfEven);
//!
//! // Integer + Real promotes to Real
//! let sum = Number::integer(1)
//!     .add(&Number::parse("0.25", policy).unwrap())
//!     .unwrap();
//! assert_eq!(sum.kind(), TowerKind::Real);
//! assert_eq!(sum.to_string(), "1.25");
//!
//! // Integer division stays exact
//! let third = Number::integer(1).divide(&Number::integer(3)).unwrap();
//! assert_eq!(third.to_string(), "1/3");
//!
//! // Kernel
//! let kernel = KernelContext::with_defaults();
//! let e = kernel.exp(&Real::one(policy), policy).unwrap();
//! assert_eq!(e.to_string(), "2.71828182846");
//! let factorial = kernel.factorial(&Integer::from_i64(20, policy)).unwrap();
//! assert_eq!(factorial.to_string(), "2432902008176640000");
//! ```

pub mod domain;
pub mod engine;
pub mod interfaces;
pub mod numeric;

// Re-exports for convenience
pub mod prelude {
    pub use crate::domain::{
        Complex, ComplexForm, ConstantRegistry, ImaginaryUnit, Integer, KernelConfig, Number, One,
        Rational, Real, Sign, TowerKind, Zero,
    };
    pub use crate::engine::{
        create_from_config, FactorialCache, KernelContext, KernelContextBuilder,
    };
    pub use crate::interfaces::{
        ConstantId, HasCanonicalInstance, KernelEvent, KernelObserver, LoggingObserver,
        NoOpObserver, RecordingObserver, TowerOps,
    };
    pub use crate::numeric::{
        BigDecimal, PrecisionPolicy, RoundingRule, Scalar, TowerError, TowerResult,
    };
}
