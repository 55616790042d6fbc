//! Thread creation, join, sleep, and uncaught-fault isolation
//!
//! Threads are preemptively scheduled OS threads. An uncaught fault in a
//! thread's body is handed to the fault reporter and terminates only that
//! thread; a joiner observes normal completion regardless. There is no kill
//! primitive; started threads run to their own termination.

use crate::capabilities::FaultReporter;
use crate::error::Fault;
use crate::thread::{ThreadId, ThreadRecord, ThreadState};
use dashmap::DashMap;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Registry and lifecycle manager for engine threads.
pub struct ThreadManager {
    records: DashMap<ThreadId, Arc<ThreadRecord>>,
    handles: DashMap<ThreadId, JoinHandle<()>>,
    reporter: Arc<dyn FaultReporter>,
}

impl ThreadManager {
    /// Create a manager that reports uncaught faults to `reporter`.
    pub fn new(reporter: Arc<dyn FaultReporter>) -> Self {
        Self {
            records: DashMap::new(),
            handles: DashMap::new(),
            reporter,
        }
    }

    /// Register the calling thread (the entry thread) and return its ID.
    pub fn register_current(&self) -> ThreadId {
        let id = ThreadId::new();
        let record = Arc::new(ThreadRecord::new(id));
        record.set_state(ThreadState::Runnable);
        self.records.insert(id, record);
        id
    }

    /// The record for `id`, if the thread is known.
    pub fn record(&self, id: ThreadId) -> Option<Arc<ThreadRecord>> {
        self.records.get(&id).map(|entry| Arc::clone(entry.value()))
    }

    /// Spawn a thread running `body`. The new thread goes New -> Runnable
    /// and executes independently; an uncaught fault is reported, recorded
    /// as the termination cause, and goes no further.
    pub fn spawn<F>(&self, body: F) -> Result<ThreadId, Fault>
    where
        F: FnOnce(ThreadId) -> Result<(), Fault> + Send + 'static,
    {
        let id = ThreadId::new();
        let record = Arc::new(ThreadRecord::new(id));
        self.records.insert(id, Arc::clone(&record));

        let reporter = Arc::clone(&self.reporter);
        record.set_state(ThreadState::Runnable);
        let handle = std::thread::Builder::new()
            .name(format!("kona-thread-{}", id.as_u64()))
            .spawn(move || {
                // catch host-level panics too, so the record always reaches
                // Terminated and joiners are never stranded
                let outcome =
                    std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| body(id)));
                match outcome {
                    Ok(Ok(())) => {}
                    Ok(Err(fault)) => {
                        reporter.report(id, &fault);
                        record.set_termination_cause(fault);
                    }
                    Err(_) => {
                        let fault = Fault::Internal("thread body panicked".to_string());
                        reporter.report(id, &fault);
                        record.set_termination_cause(fault);
                    }
                }
                record.set_state(ThreadState::Terminated);
            })
            .map_err(|e| Fault::Internal(format!("failed to spawn thread: {}", e)))?;
        self.handles.insert(id, handle);
        log::trace!("spawned thread {}", id);
        Ok(id)
    }

    /// Block the calling thread until `target` terminates. Join carries no
    /// return value: a target that died of an uncaught fault still joins as
    /// normal completion. Joining an unknown thread returns immediately.
    pub fn join(&self, caller: ThreadId, target: ThreadId) -> Result<(), Fault> {
        let record = match self.record(target) {
            Some(record) => record,
            None => return Ok(()),
        };
        let caller_record = self.record(caller);

        if let Some(ref c) = caller_record {
            c.set_state(ThreadState::Blocked);
        }
        record.await_terminated();
        if let Some((_, handle)) = self.handles.remove(&target) {
            let _ = handle.join();
        }
        if let Some(ref c) = caller_record {
            c.set_state(ThreadState::Runnable);
        }
        Ok(())
    }

    /// Suspend the calling thread for at least `dur`. Completes early with
    /// [`Fault::Interrupted`] if the thread is interrupted; lock state is
    /// unaffected either way.
    pub fn sleep(&self, caller: ThreadId, dur: Duration) -> Result<(), Fault> {
        match self.record(caller) {
            Some(record) => {
                record.set_state(ThreadState::Blocked);
                let result = record.sleep(dur);
                record.set_state(ThreadState::Runnable);
                result
            }
            None => {
                // unregistered host thread: plain suspension
                std::thread::sleep(dur);
                Ok(())
            }
        }
    }

    /// Post an interrupt to `target`.
    pub fn interrupt(&self, target: ThreadId) {
        if let Some(record) = self.record(target) {
            record.interrupt();
        }
    }

    /// Lifecycle state of `target`, if known.
    pub fn state(&self, target: ThreadId) -> Option<ThreadState> {
        self.record(target).map(|record| record.state())
    }

    /// The uncaught fault that terminated `target`, if any. Observing the
    /// cause is reporting-side only; it does not change join semantics.
    pub fn termination_cause(&self, target: ThreadId) -> Option<Fault> {
        self.record(target).and_then(|record| record.termination_cause())
    }

    /// Number of registered threads (live and terminated).
    pub fn thread_count(&self) -> usize {
        self.records.len()
    }

    /// Mark `id` terminated, recording `cause` when present. Used for the
    /// entry thread, which the manager did not spawn itself.
    pub(crate) fn finish(&self, id: ThreadId, cause: Option<Fault>) {
        if let Some(record) = self.record(id) {
            if let Some(fault) = cause {
                record.set_termination_cause(fault);
            }
            record.set_state(ThreadState::Terminated);
        }
    }
}
