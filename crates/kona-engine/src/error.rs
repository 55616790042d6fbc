//! Fault taxonomy for the engine
//!
//! Faults are raised at the point of violation and unwind only within the
//! faulting thread's call chain via `Result`. There is no cross-thread
//! propagation channel; an uncaught fault terminates its own thread and is
//! handed to the [`FaultReporter`](crate::capabilities::FaultReporter).

use std::sync::Arc;

/// A runtime fault.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Fault {
    /// Integer division or remainder by zero. Never produced by
    /// floating-point math, which yields infinity/NaN instead.
    #[error("/ by zero")]
    DivisionByZero,

    /// A static initializer raised, or an earlier run of it did. The class
    /// is permanently poisoned; every later active use re-raises this with
    /// the original cause attached.
    #[error("could not initialize class {class}: {cause}")]
    Initialization {
        /// Name of the class whose initializer failed.
        class: String,
        /// The fault the initializer body raised, shared across re-raises.
        cause: Arc<Fault>,
    },

    /// Monitor release or wait by a thread that does not own the monitor.
    #[error("illegal monitor state: {0}")]
    IllegalMonitorState(String),

    /// A blocked sleep was interrupted before the requested delay elapsed.
    #[error("interrupted")]
    Interrupted,

    /// Null reference where an object was required.
    #[error("null pointer")]
    NullPointer,

    /// Operand kinds did not match the operation. This indicates a dispatch
    /// bug in the caller, not program-visible behavior: operands arrive
    /// already typed.
    #[error("type error: {0}")]
    Type(String),

    /// A native operation has no handler bound at the call boundary.
    #[error("unsatisfied link: {0}")]
    UnsatisfiedLink(String),

    /// A native handler reported a failure.
    #[error("native fault: {0}")]
    Native(String),

    /// A failure raised explicitly by the running program.
    #[error("{0}")]
    UserException(String),

    /// Engine-internal failure (e.g. the host refused to spawn a thread).
    #[error("internal: {0}")]
    Internal(String),
}

impl Fault {
    /// True for the integer divide/remainder-by-zero arithmetic fault.
    pub fn is_arithmetic(&self) -> bool {
        matches!(self, Fault::DivisionByZero)
    }

    /// The root cause of an initialization fault, or the fault itself.
    pub fn root_cause(&self) -> &Fault {
        match self {
            Fault::Initialization { cause, .. } => cause.root_cause(),
            other => other,
        }
    }
}
