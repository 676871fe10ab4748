// ============================================================================
// Interfaces Module
// Contains all trait definitions and contracts
// ============================================================================

mod canonical;
mod kernel_observer;
mod tower_ops;

pub use canonical::{ConstantId, HasCanonicalInstance};
pub use kernel_observer::{
    KernelEvent, KernelObserver, LoggingObserver, NoOpObserver, RecordingObserver,
};
pub use tower_ops::TowerOps;
