//! Host capabilities injected into the engine
//!
//! The engine never talks to the outside world directly. Output and fault
//! reporting are capability traits supplied at composition time; the
//! defaults write to stdout/stderr and tests substitute collecting
//! implementations.

use crate::error::Fault;
use crate::thread::ThreadId;
use parking_lot::Mutex;

/// Emits one line of program output per invocation.
///
/// Emissions from a single thread preserve program order; no ordering is
/// guaranteed across threads beyond the engine's happens-before edges.
pub trait LineEmitter: Send + Sync {
    /// Emit one line.
    fn emit_line(&self, line: &str);
}

/// Default emitter: writes each line to stdout.
pub struct StdoutEmitter;

impl LineEmitter for StdoutEmitter {
    fn emit_line(&self, line: &str) {
        println!("{}", line);
    }
}

/// Collects emitted lines in memory; used by tests.
#[derive(Default)]
pub struct BufferEmitter {
    lines: Mutex<Vec<String>>,
}

impl BufferEmitter {
    /// Create an empty buffer emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl LineEmitter for BufferEmitter {
    fn emit_line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

/// Receives uncaught-fault reports from terminating threads.
pub trait FaultReporter: Send + Sync {
    /// Report that `thread` died of `fault`.
    fn report(&self, thread: ThreadId, fault: &Fault);
}

/// Default reporter: writes to stderr.
pub struct StderrReporter;

impl FaultReporter for StderrReporter {
    fn report(&self, thread: ThreadId, fault: &Fault) {
        eprintln!("Exception in thread \"{}\": {}", thread, fault);
    }
}

/// Captures reports in memory; used by tests.
#[derive(Default)]
pub struct CollectingReporter {
    reports: Mutex<Vec<(ThreadId, Fault)>>,
}

impl CollectingReporter {
    /// Create an empty collecting reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every report received so far.
    pub fn reports(&self) -> Vec<(ThreadId, Fault)> {
        self.reports.lock().clone()
    }
}

impl FaultReporter for CollectingReporter {
    fn report(&self, thread: ThreadId, fault: &Fault) {
        self.reports.lock().push((thread, fault.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_emitter_preserves_order() {
        let emitter = BufferEmitter::new();
        emitter.emit_line("first");
        emitter.emit_line("second");
        assert_eq!(emitter.lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_collecting_reporter() {
        let reporter = CollectingReporter::new();
        let thread = ThreadId::new();
        reporter.report(thread, &Fault::DivisionByZero);
        let reports = reporter.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, thread);
        assert!(reports[0].1.is_arithmetic());
    }
}
