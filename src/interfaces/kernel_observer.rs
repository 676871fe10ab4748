// ============================================================================
// Kernel Observer Interface
// Defines the contract for observing kernel computations
// ============================================================================

use crate::interfaces::ConstantId;
use chrono::{DateTime, Utc};
use crossbeam::queue::SegQueue;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Events emitted by the algorithmic kernel
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum KernelEvent {
    /// Factorial answered straight from the memo table
    FactorialCacheHit { n: usize, timestamp: DateTime<Utc> },

    /// Factorial extended from the largest cached predecessor
    FactorialComputed {
        n: u64,
        resumed_from: usize,
        timestamp: DateTime<Utc>,
    },

    /// A computed constant (pi, ln 10) was evaluated for a policy
    ConstantComputed {
        constant: ConstantId,
        digits: u32,
        timestamp: DateTime<Utc>,
    },

    /// An iterative method reached its fixed point
    Converged {
        operation: String,
        iterations: usize,
        timestamp: DateTime<Utc>,
    },

    /// A kernel operation failed
    Failed {
        operation: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

/// Observer trait for kernel events
/// Implementations can handle logging, metrics, tracing, etc.
pub trait KernelObserver: Send + Sync {
    /// Handle a kernel event
    fn on_event(&self, event: KernelEvent);

    /// Batch event handler (optional optimization)
    fn on_events(&self, events: Vec<KernelEvent>) {
        for event in events {
            self.on_event(event);
        }
    }
}

/// No-op observer for production hot paths
pub struct NoOpObserver;

impl KernelObserver for NoOpObserver {
    fn on_event(&self, _event: KernelEvent) {}
}

/// Logging observer
pub struct LoggingObserver;

impl KernelObserver for LoggingObserver {
    fn on_event(&self, event: KernelEvent) {
        match &event {
            KernelEvent::Failed { .. } => tracing::warn!("Numeric kernel event: {:?}", event),
            _ => tracing::debug!("Numeric kernel event: {:?}", event),
        }
    }
}

/// Observer that keeps every event for later inspection
#[derive(Default)]
pub struct RecordingObserver {
    events: SegQueue<KernelEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Remove and return all recorded events in arrival order
    pub fn drain(&self) -> Vec<KernelEvent> {
        std::iter::from_fn(|| self.events.pop()).collect()
    }
}

impl KernelObserver for RecordingObserver {
    fn on_event(&self, event: KernelEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_observer() {
        let observer = NoOpObserver;
        observer.on_event(KernelEvent::FactorialCacheHit {
            n: 5,
            timestamp: Utc::now(),
        });
        // Should not panic
    }

    #[test]
    fn test_recording_observer_keeps_order() {
        let observer = RecordingObserver::new();
        observer.on_events(vec![
            KernelEvent::FactorialCacheHit {
                n: 1,
                timestamp: Utc::now(),
            },
            KernelEvent::Converged {
                operation: "ln".to_string(),
                iterations: 4,
                timestamp: Utc::now(),
            },
        ]);
        assert_eq!(observer.len(), 2);
        let events = observer.drain();
        assert!(matches!(events[0], KernelEvent::FactorialCacheHit { n: 1, .. }));
        assert!(matches!(events[1], KernelEvent::Converged { iterations: 4, .. }));
        assert!(observer.is_empty());
    }
}
