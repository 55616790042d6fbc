//! Monitors: per-object reentrant intrinsic locks
//!
//! One monitor exists per lockable entity (object instance or class). A
//! `synchronized` region is modeled as scoped acquisition through
//! [`MonitorGuard`], which releases on every exit path including fault
//! unwinding.

mod monitor;
mod registry;

pub use monitor::{LockKey, Monitor, MonitorGuard};
pub use registry::MonitorRegistry;
