// ============================================================================
// Engine Module
// Contains the precision-aware algorithmic kernel
// ============================================================================

mod context;
mod exponent;
mod factorial;
mod logarithm;
mod root;
mod unity;

pub mod factory;

pub use context::KernelContext;
pub use factorial::FactorialCache;
pub use factory::{create_from_config, KernelContextBuilder};
