//! Global registry for all monitors

use crate::sync::{LockKey, Monitor};
use dashmap::DashMap;
use std::sync::Arc;

/// Registry mapping each lockable entity to its unique monitor.
///
/// Monitors are created lazily on first use; an entity never has more than
/// one.
pub struct MonitorRegistry {
    monitors: DashMap<LockKey, Arc<Monitor>>,
}

impl MonitorRegistry {
    /// Create a new empty monitor registry.
    pub fn new() -> Self {
        Self {
            monitors: DashMap::new(),
        }
    }

    /// Get the monitor for `key`, creating it on first use.
    pub fn monitor(&self, key: LockKey) -> Arc<Monitor> {
        let entry = self
            .monitors
            .entry(key)
            .or_insert_with(|| Arc::new(Monitor::new(key)));
        Arc::clone(entry.value())
    }

    /// Number of monitors created so far.
    pub fn count(&self) -> usize {
        self.monitors.len()
    }
}

impl Default for MonitorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_monitor_per_key() {
        let registry = MonitorRegistry::new();
        let a = registry.monitor(LockKey::Object(1));
        let b = registry.monitor(LockKey::Object(1));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_distinct_keys_get_distinct_monitors() {
        let registry = MonitorRegistry::new();
        let a = registry.monitor(LockKey::Object(1));
        let b = registry.monitor(LockKey::Object(2));
        let c = registry.monitor(LockKey::Class(1));
        assert!(!Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(registry.count(), 3);
    }
}
