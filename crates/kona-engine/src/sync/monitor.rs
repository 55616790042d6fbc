//! Reentrant monitor implementation

use crate::class::ClassId;
use crate::error::Fault;
use crate::thread::ThreadId;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Identity of the entity a monitor guards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum LockKey {
    /// An object instance, by object id.
    Object(u64),
    /// A class, for static synchronized regions.
    Class(ClassId),
}

struct MonitorState {
    owner: Option<ThreadId>,
    entry_count: u32,
    /// Bumped by notify_all; waiters compare against their entry epoch to
    /// tell notification from spurious wakeup.
    wait_epoch: u64,
}

/// A per-entity intrinsic lock with reentrant acquisition.
///
/// Invariant: `entry_count > 0` iff `owner` is set, and only the owner may
/// release. A release by any other thread is an illegal-monitor-state
/// fault, never a silent no-op.
pub struct Monitor {
    key: LockKey,
    state: Mutex<MonitorState>,
    /// Signaled when the monitor becomes unowned.
    acquire: Condvar,
    /// Wait set for wait/notify_all.
    wait_set: Condvar,
}

impl Monitor {
    /// Create the monitor for `key`.
    pub fn new(key: LockKey) -> Self {
        Self {
            key,
            state: Mutex::new(MonitorState {
                owner: None,
                entry_count: 0,
                wait_epoch: 0,
            }),
            acquire: Condvar::new(),
            wait_set: Condvar::new(),
        }
    }

    /// The entity this monitor guards.
    pub fn key(&self) -> LockKey {
        self.key
    }

    /// Attempt to enter without blocking. Returns false when the monitor is
    /// owned by another thread.
    pub fn try_enter(&self, thread: ThreadId) -> bool {
        let mut state = self.state.lock();
        match state.owner {
            Some(owner) if owner == thread => {
                state.entry_count += 1;
                true
            }
            Some(_) => false,
            None => {
                state.owner = Some(thread);
                state.entry_count = 1;
                true
            }
        }
    }

    /// Enter the monitor, blocking until it is available. Reentrant for the
    /// current owner.
    pub fn enter(&self, thread: ThreadId) {
        let mut state = self.state.lock();
        if state.owner == Some(thread) {
            state.entry_count += 1;
            return;
        }
        while state.owner.is_some() {
            log::trace!("thread {} blocked on monitor {:?}", thread, self.key);
            self.acquire.wait(&mut state);
        }
        state.owner = Some(thread);
        state.entry_count = 1;
    }

    /// Exit the monitor once. At reentrancy zero the monitor becomes
    /// unowned and one blocked acquirer is woken (selection is
    /// implementation-defined).
    pub fn exit(&self, thread: ThreadId) -> Result<(), Fault> {
        let mut state = self.state.lock();
        if state.owner != Some(thread) {
            return Err(Fault::IllegalMonitorState(format!(
                "thread {} does not own monitor {:?}",
                thread, self.key
            )));
        }
        state.entry_count -= 1;
        if state.entry_count == 0 {
            state.owner = None;
            self.acquire.notify_one();
        }
        Ok(())
    }

    /// Release the monitor fully and park on its wait set until notified or
    /// timed out, then reacquire with the saved reentrancy count.
    ///
    /// The caller must own the monitor.
    pub fn wait(&self, thread: ThreadId, timeout: Option<Duration>) -> Result<(), Fault> {
        let mut state = self.state.lock();
        if state.owner != Some(thread) {
            return Err(Fault::IllegalMonitorState(
                "current thread is not owner".to_string(),
            ));
        }
        let saved = state.entry_count;
        state.owner = None;
        state.entry_count = 0;
        self.acquire.notify_one();

        let epoch = state.wait_epoch;
        match timeout {
            Some(dur) => {
                let deadline = Instant::now() + dur;
                while state.wait_epoch == epoch {
                    if self.wait_set.wait_until(&mut state, deadline).timed_out() {
                        break;
                    }
                }
            }
            None => {
                while state.wait_epoch == epoch {
                    self.wait_set.wait(&mut state);
                }
            }
        }

        while state.owner.is_some() {
            self.acquire.wait(&mut state);
        }
        state.owner = Some(thread);
        state.entry_count = saved;
        Ok(())
    }

    /// Wake every thread parked on this monitor's wait set. The caller must
    /// own the monitor; woken threads re-contend for it.
    pub fn notify_all(&self, thread: ThreadId) -> Result<(), Fault> {
        let mut state = self.state.lock();
        if state.owner != Some(thread) {
            return Err(Fault::IllegalMonitorState(
                "current thread is not owner".to_string(),
            ));
        }
        state.wait_epoch += 1;
        self.wait_set.notify_all();
        Ok(())
    }

    /// The current owner, if any.
    pub fn owner(&self) -> Option<ThreadId> {
        self.state.lock().owner
    }

    /// The current reentrancy count.
    pub fn entry_count(&self) -> u32 {
        self.state.lock().entry_count
    }
}

/// Scoped monitor ownership. Dropping the guard exits the monitor, so every
/// exit path of a `synchronized` region, including fault propagation,
/// releases the lock.
pub struct MonitorGuard {
    monitor: Arc<Monitor>,
    thread: ThreadId,
}

impl MonitorGuard {
    /// Enter `monitor` and return a guard that exits on drop.
    pub fn enter(monitor: Arc<Monitor>, thread: ThreadId) -> Self {
        monitor.enter(thread);
        Self { monitor, thread }
    }

    /// Wrap an already-entered monitor. The caller must hold one entry.
    pub(crate) fn adopt(monitor: Arc<Monitor>, thread: ThreadId) -> Self {
        Self { monitor, thread }
    }
}

impl Drop for MonitorGuard {
    fn drop(&mut self) {
        // the guard exists only while its thread owns an entry, so the
        // owner check cannot fail here
        let _ = self.monitor.exit(self.thread);
    }
}
