//! Engine facade
//!
//! Wires the pure operation units to the shared-state managers and the
//! injected host capabilities. The pure units never block; everything that
//! can block (monitors, class init, join, sleep) goes through the managers
//! owned here, and callers never reach that state except through this
//! surface.

use crate::capabilities::{FaultReporter, LineEmitter, StderrReporter, StdoutEmitter};
use crate::class::{ClassId, ClassRegistry, ClinitFn, InitRegistry, InitState};
use crate::error::Fault;
use crate::native::{NativeCallResult, NativeHandler, NoopNativeHandler};
use crate::object::{Object, ObjectRef};
use crate::ops::{self, ArithOp, CompareOp, Conversion};
use crate::sync::{LockKey, Monitor, MonitorGuard, MonitorRegistry};
use crate::thread::{ThreadId, ThreadManager, ThreadState};
use crate::value::{PrimitiveValue, Value};
use std::sync::Arc;
use std::time::Duration;

/// The execution engine core.
///
/// Holds the class, monitor, and thread registries plus the host
/// capabilities. All methods take `&self`; shared state is guarded
/// internally.
pub struct Engine {
    classes: ClassRegistry,
    class_init: InitRegistry,
    monitors: MonitorRegistry,
    threads: ThreadManager,
    emitter: Arc<dyn LineEmitter>,
    reporter: Arc<dyn FaultReporter>,
    natives: Arc<dyn NativeHandler>,
}

impl Engine {
    /// Create an engine with the default capabilities: stdout line emitter,
    /// stderr fault reporter, and a native handler that recognizes nothing.
    pub fn new() -> Arc<Self> {
        Self::with_capabilities(
            Arc::new(StdoutEmitter),
            Arc::new(StderrReporter),
            Arc::new(NoopNativeHandler),
        )
    }

    /// Create an engine with injected capabilities.
    pub fn with_capabilities(
        emitter: Arc<dyn LineEmitter>,
        reporter: Arc<dyn FaultReporter>,
        natives: Arc<dyn NativeHandler>,
    ) -> Arc<Self> {
        Arc::new(Self {
            classes: ClassRegistry::new(),
            class_init: InitRegistry::new(),
            monitors: MonitorRegistry::new(),
            threads: ThreadManager::new(Arc::clone(&reporter)),
            emitter,
            reporter,
            natives,
        })
    }

    // =========================================================
    // Pure units (never block, no shared state)
    // =========================================================

    /// Binary arithmetic on same-kind primitives.
    pub fn arith(
        &self,
        op: ArithOp,
        a: PrimitiveValue,
        b: PrimitiveValue,
    ) -> Result<PrimitiveValue, Fault> {
        ops::arith(op, a, b)
    }

    /// Arithmetic negation.
    pub fn neg(&self, a: PrimitiveValue) -> Result<PrimitiveValue, Fault> {
        ops::neg(a)
    }

    /// Explicit numeric conversion.
    pub fn convert(&self, conv: Conversion, v: PrimitiveValue) -> Result<PrimitiveValue, Fault> {
        ops::convert(conv, v)
    }

    /// Primitive comparison.
    pub fn compare(
        &self,
        op: CompareOp,
        a: PrimitiveValue,
        b: PrimitiveValue,
    ) -> Result<bool, Fault> {
        ops::compare(op, a, b)
    }

    /// Reference identity comparison.
    pub fn reference_eq(&self, a: &Value, b: &Value) -> Result<bool, Fault> {
        ops::reference_eq(a, b)
    }

    // =========================================================
    // Classes and active use
    // =========================================================

    /// Register a class. The initializer, if any, runs exactly once on the
    /// first active use.
    pub fn register_class(
        &self,
        name: &str,
        field_count: usize,
        static_count: usize,
        initializer: Option<Arc<ClinitFn>>,
    ) -> ClassId {
        self.classes.register(name, field_count, static_count, initializer)
    }

    /// Look up a class ID by name.
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.classes.get_by_name(name).map(|class| class.id)
    }

    fn class(&self, class: ClassId) -> Result<Arc<crate::class::Class>, Fault> {
        self.classes
            .get(class)
            .ok_or_else(|| Fault::Type(format!("unknown class id {}", class)))
    }

    /// Ensure `class` is initialized before an active use by `thread`.
    fn ensure_initialized(&self, class: ClassId, thread: ThreadId) -> Result<(), Fault> {
        let cls = self.class(class)?;
        self.class_init
            .ensure_initialized(class, &cls.name, thread, || match cls.initializer() {
                Some(body) => body(self, thread),
                None => Ok(()),
            })
    }

    /// Read a static field (active use).
    pub fn static_get(
        &self,
        class: ClassId,
        index: usize,
        thread: ThreadId,
    ) -> Result<Value, Fault> {
        self.ensure_initialized(class, thread)?;
        self.class(class)?.static_field(index)
    }

    /// Write a static field (active use).
    pub fn static_set(
        &self,
        class: ClassId,
        index: usize,
        value: Value,
        thread: ThreadId,
    ) -> Result<(), Fault> {
        self.ensure_initialized(class, thread)?;
        self.class(class)?.set_static_field(index, value)
    }

    /// Instantiate a class (active use).
    pub fn instantiate(&self, class: ClassId, thread: ThreadId) -> Result<ObjectRef, Fault> {
        self.ensure_initialized(class, thread)?;
        let cls = self.class(class)?;
        Ok(Object::new(class, cls.field_count))
    }

    /// Invoke a static operation (active use): runs `f` after the class is
    /// initialized.
    pub fn call_static<R>(
        &self,
        class: ClassId,
        thread: ThreadId,
        f: impl FnOnce(&Engine) -> Result<R, Fault>,
    ) -> Result<R, Fault> {
        self.ensure_initialized(class, thread)?;
        f(self)
    }

    /// Initialization state of a class, for observation only.
    pub fn init_state(&self, class: ClassId) -> InitState {
        self.class_init.state(class)
    }

    // =========================================================
    // Monitors
    // =========================================================

    /// The monitor guarding `key`, created on first use.
    pub fn monitor(&self, key: LockKey) -> Arc<Monitor> {
        self.monitors.monitor(key)
    }

    /// Run `f` holding the monitor for `key`: the `synchronized` region.
    /// The monitor is released on every exit path, including fault
    /// propagation out of `f`.
    pub fn synchronized<R>(
        &self,
        key: LockKey,
        thread: ThreadId,
        f: impl FnOnce() -> Result<R, Fault>,
    ) -> Result<R, Fault> {
        let monitor = self.monitors.monitor(key);
        let guard = if monitor.try_enter(thread) {
            MonitorGuard::adopt(monitor, thread)
        } else {
            // contended: surface the Blocked state while parked
            self.set_thread_state(thread, ThreadState::Blocked);
            monitor.enter(thread);
            self.set_thread_state(thread, ThreadState::Runnable);
            MonitorGuard::adopt(monitor, thread)
        };
        let result = f();
        drop(guard);
        result
    }

    /// Park on the wait set of `key`'s monitor until notified or timed out.
    pub fn monitor_wait(
        &self,
        key: LockKey,
        thread: ThreadId,
        timeout: Option<Duration>,
    ) -> Result<(), Fault> {
        let monitor = self.monitors.monitor(key);
        self.set_thread_state(thread, ThreadState::Blocked);
        let result = monitor.wait(thread, timeout);
        self.set_thread_state(thread, ThreadState::Runnable);
        result
    }

    /// Wake every thread parked on `key`'s wait set.
    pub fn monitor_notify_all(&self, key: LockKey, thread: ThreadId) -> Result<(), Fault> {
        self.monitors.monitor(key).notify_all(thread)
    }

    fn set_thread_state(&self, thread: ThreadId, state: ThreadState) {
        if let Some(record) = self.threads.record(thread) {
            record.set_state(state);
        }
    }

    // =========================================================
    // Threads
    // =========================================================

    /// Spawn a thread whose body runs against this engine. The body gets
    /// the shared engine handle so it can spawn further threads itself.
    pub fn spawn_thread<F>(self: &Arc<Self>, body: F) -> Result<ThreadId, Fault>
    where
        F: FnOnce(&Arc<Engine>, ThreadId) -> Result<(), Fault> + Send + 'static,
    {
        let engine = Arc::clone(self);
        self.threads.spawn(move |id| body(&engine, id))
    }

    /// Block until `target` terminates; uncaught faults in the target are
    /// invisible here.
    pub fn join(&self, caller: ThreadId, target: ThreadId) -> Result<(), Fault> {
        self.threads.join(caller, target)
    }

    /// Suspend the calling thread for at least `dur`, or less when
    /// interrupted.
    pub fn sleep(&self, caller: ThreadId, dur: Duration) -> Result<(), Fault> {
        self.threads.sleep(caller, dur)
    }

    /// Post an interrupt to `target`.
    pub fn interrupt(&self, target: ThreadId) {
        self.threads.interrupt(target)
    }

    /// The thread lifecycle manager.
    pub fn threads(&self) -> &ThreadManager {
        &self.threads
    }

    // =========================================================
    // External interfaces
    // =========================================================

    /// Emit one line of program output.
    pub fn emit_line(&self, line: &str) {
        self.emitter.emit_line(line);
    }

    /// Invoke a bodiless operation through the native boundary.
    pub fn call_native(&self, name: &str, args: &[Value]) -> Result<Value, Fault> {
        match self.natives.call(name, args) {
            NativeCallResult::Value(v) => Ok(v),
            NativeCallResult::Void => Ok(Value::Null),
            NativeCallResult::Unhandled => Err(Fault::UnsatisfiedLink(name.to_string())),
            NativeCallResult::Error(msg) => Err(Fault::Native(msg)),
        }
    }

    /// Run the designated entry body on the calling thread and return the
    /// process exit code: 0 on normal completion, 1 when an uncaught fault
    /// escapes the entry body. Already-started threads are not stopped.
    pub fn run_entry<F>(self: &Arc<Self>, body: F) -> i32
    where
        F: FnOnce(&Arc<Engine>, ThreadId) -> Result<(), Fault>,
    {
        let id = self.threads.register_current();
        match body(self, id) {
            Ok(()) => {
                self.threads.finish(id, None);
                0
            }
            Err(fault) => {
                self.reporter.report(id, &fault);
                self.threads.finish(id, Some(fault));
                1
            }
        }
    }
}
