//! Thread identity, lifecycle state, and per-thread records

mod manager;

pub use manager::ThreadManager;

use crate::error::Fault;
use parking_lot::{Condvar, Mutex};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Unique identifier for an engine thread.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ThreadId(u64);

static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

impl ThreadId {
    /// Generate a new unique thread ID.
    pub fn new() -> Self {
        ThreadId(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the numeric ID value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl Default for ThreadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ThreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of an engine thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadState {
    /// Created but not yet scheduled.
    New,
    /// Scheduled for independent execution.
    Runnable,
    /// Waiting on a monitor, a class-init record, a join, or a sleep.
    Blocked,
    /// Finished, normally or by uncaught fault.
    Terminated,
}

/// Per-thread bookkeeping: lifecycle state, interrupt flag, sleep parking,
/// and the termination cause when the thread dies of an uncaught fault.
///
/// A record is mutated only by its own thread's execution and by the
/// managers that block or unblock it.
pub struct ThreadRecord {
    id: ThreadId,
    state: Mutex<ThreadState>,
    /// Signaled on every state change; join waits here for Terminated.
    state_changed: Condvar,
    interrupted: AtomicBool,
    sleep_lock: Mutex<()>,
    sleep_wake: Condvar,
    termination_cause: Mutex<Option<Fault>>,
}

impl ThreadRecord {
    pub(crate) fn new(id: ThreadId) -> Self {
        Self {
            id,
            state: Mutex::new(ThreadState::New),
            state_changed: Condvar::new(),
            interrupted: AtomicBool::new(false),
            sleep_lock: Mutex::new(()),
            sleep_wake: Condvar::new(),
            termination_cause: Mutex::new(None),
        }
    }

    /// This thread's ID.
    pub fn id(&self) -> ThreadId {
        self.id
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ThreadState {
        *self.state.lock()
    }

    pub(crate) fn set_state(&self, next: ThreadState) {
        let mut state = self.state.lock();
        log::trace!("thread {}: {:?} -> {:?}", self.id, *state, next);
        *state = next;
        self.state_changed.notify_all();
    }

    /// True if an interrupt is pending (without clearing it).
    pub fn is_interrupted(&self) -> bool {
        self.interrupted.load(Ordering::Acquire)
    }

    /// The fault that terminated this thread, if it died uncaught.
    pub fn termination_cause(&self) -> Option<Fault> {
        self.termination_cause.lock().clone()
    }

    pub(crate) fn set_termination_cause(&self, fault: Fault) {
        *self.termination_cause.lock() = Some(fault);
    }

    /// Post an interrupt: sets the flag and wakes the thread if it is
    /// sleeping. Lock state is never touched.
    pub(crate) fn interrupt(&self) {
        self.interrupted.store(true, Ordering::Release);
        let _held = self.sleep_lock.lock();
        self.sleep_wake.notify_all();
    }

    /// Suspend the calling thread for at least `dur`, unless interrupted
    /// first. Interruption clears the flag and reports [`Fault::Interrupted`].
    pub(crate) fn sleep(&self, dur: Duration) -> Result<(), Fault> {
        let deadline = Instant::now() + dur;
        let mut held = self.sleep_lock.lock();
        loop {
            if self.interrupted.swap(false, Ordering::AcqRel) {
                return Err(Fault::Interrupted);
            }
            if self.sleep_wake.wait_until(&mut held, deadline).timed_out() {
                return Ok(());
            }
        }
    }

    /// Block until this thread reaches [`ThreadState::Terminated`].
    pub(crate) fn await_terminated(&self) {
        let mut state = self.state.lock();
        while *state != ThreadState::Terminated {
            self.state_changed.wait(&mut state);
        }
    }
}
