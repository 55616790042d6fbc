//! Exactly-once, reentrant, poisoning class initialization
//!
//! Each class carries a small state machine driven by active-use events.
//! The first thread to use a class runs its initializer; concurrent users
//! block until it reaches a terminal state; the initializing thread itself
//! passes straight through on re-entry. A failed initializer poisons the
//! class permanently, and every later active use re-raises the wrapped
//! original cause. Initializer completion happens-before any post-check
//! active use on another thread (the record's mutex carries the edge).

use crate::class::ClassId;
use crate::error::Fault;
use crate::thread::ThreadId;
use dashmap::DashMap;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;

/// Initialization state of one class.
#[derive(Debug, Clone)]
pub enum InitState {
    /// No active use has happened yet.
    Uninitialized,
    /// The owning thread is executing the static initializer.
    InProgress(ThreadId),
    /// The initializer completed normally; statics are visible.
    Initialized,
    /// The initializer raised; the class is permanently poisoned.
    Failed(Arc<Fault>),
}

struct InitRecord {
    state: Mutex<InitState>,
    /// Signaled whenever the record reaches a terminal state.
    done: Condvar,
}

impl InitRecord {
    fn new() -> Self {
        Self {
            state: Mutex::new(InitState::Uninitialized),
            done: Condvar::new(),
        }
    }
}

/// Per-class initialization records.
pub struct InitRegistry {
    records: DashMap<ClassId, Arc<InitRecord>>,
}

impl InitRegistry {
    /// Create a new registry with no records.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    fn record(&self, class: ClassId) -> Arc<InitRecord> {
        let entry = self
            .records
            .entry(class)
            .or_insert_with(|| Arc::new(InitRecord::new()));
        Arc::clone(entry.value())
    }

    /// Ensure `class` is initialized before an active use by `thread`.
    ///
    /// `run` is the static initializer body; across the process lifetime it
    /// executes at most once per class, on the first-using thread, outside
    /// the record lock so recursive active use by that thread is a no-op.
    pub fn ensure_initialized<F>(
        &self,
        class: ClassId,
        class_name: &str,
        thread: ThreadId,
        run: F,
    ) -> Result<(), Fault>
    where
        F: FnOnce() -> Result<(), Fault>,
    {
        let record = self.record(class);
        {
            let mut state = record.state.lock();
            loop {
                match &*state {
                    InitState::Initialized => return Ok(()),
                    InitState::Failed(cause) => {
                        return Err(Fault::Initialization {
                            class: class_name.to_string(),
                            cause: Arc::clone(cause),
                        })
                    }
                    InitState::InProgress(owner) if *owner == thread => {
                        // reentrant active use by the initializing thread
                        return Ok(());
                    }
                    InitState::InProgress(_) => {
                        record.done.wait(&mut state);
                    }
                    InitState::Uninitialized => {
                        *state = InitState::InProgress(thread);
                        break;
                    }
                }
            }
        }

        log::debug!("class {} initializing on thread {}", class_name, thread);
        let result = run();

        let mut state = record.state.lock();
        match result {
            Ok(()) => {
                *state = InitState::Initialized;
                record.done.notify_all();
                log::debug!("class {} initialized", class_name);
                Ok(())
            }
            Err(cause) => {
                let cause = Arc::new(cause);
                *state = InitState::Failed(Arc::clone(&cause));
                record.done.notify_all();
                log::debug!("class {} failed to initialize: {}", class_name, cause);
                Err(Fault::Initialization {
                    class: class_name.to_string(),
                    cause,
                })
            }
        }
    }

    /// Current state of a class, for observation only.
    pub fn state(&self, class: ClassId) -> InitState {
        match self.records.get(&class) {
            Some(record) => record.state.lock().clone(),
            None => InitState::Uninitialized,
        }
    }
}

impl Default for InitRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_initializer_runs_once() {
        let registry = InitRegistry::new();
        let thread = ThreadId::new();
        let runs = AtomicUsize::new(0);

        for _ in 0..3 {
            registry
                .ensure_initialized(0, "Once", thread, || {
                    runs.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .unwrap();
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(matches!(registry.state(0), InitState::Initialized));
    }

    #[test]
    fn test_reentrant_active_use_is_a_noop() {
        let registry = InitRegistry::new();
        let thread = ThreadId::new();
        let reentered = AtomicUsize::new(0);

        registry
            .ensure_initialized(0, "Recursive", thread, || {
                // recursive active use of the same class from the
                // initializing thread proceeds without blocking
                registry
                    .ensure_initialized(0, "Recursive", thread, || {
                        panic!("initializer must not re-run");
                    })
                    .unwrap();
                reentered.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
        assert_eq!(reentered.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failure_poisons_permanently() {
        let registry = InitRegistry::new();
        let thread = ThreadId::new();
        let runs = AtomicUsize::new(0);

        let first = registry.ensure_initialized(0, "Broken", thread, || {
            runs.fetch_add(1, Ordering::SeqCst);
            Err(Fault::DivisionByZero)
        });
        match first {
            Err(Fault::Initialization { class, cause }) => {
                assert_eq!(class, "Broken");
                assert!(cause.is_arithmetic());
            }
            other => panic!("expected initialization fault, got {:?}", other),
        }

        // never retried; same wrapped cause every time, from any thread
        let again = registry.ensure_initialized(0, "Broken", ThreadId::new(), || {
            runs.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        assert!(matches!(again, Err(Fault::Initialization { .. })));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(matches!(registry.state(0), InitState::Failed(_)));
    }

    #[test]
    fn test_unknown_class_reads_uninitialized() {
        let registry = InitRegistry::new();
        assert!(matches!(registry.state(99), InitState::Uninitialized));
    }

    #[test]
    fn test_concurrent_first_use_initializes_once() {
        let registry = Arc::new(InitRegistry::new());
        let runs = Arc::new(AtomicUsize::new(0));
        let done = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            let runs = Arc::clone(&runs);
            let done = Arc::clone(&done);
            handles.push(std::thread::spawn(move || {
                let thread = ThreadId::new();
                registry
                    .ensure_initialized(7, "Shared", thread, || {
                        runs.fetch_add(1, Ordering::SeqCst);
                        std::thread::sleep(std::time::Duration::from_millis(50));
                        Ok(())
                    })
                    .unwrap();
                // visible only after the record is terminal
                assert_eq!(runs.load(Ordering::SeqCst), 1);
                done.fetch_add(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(done.load(Ordering::SeqCst), 8);
    }
}
