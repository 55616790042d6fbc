//! Monitor suite
//!
//! Mutual exclusion, reentrancy across nested synchronized regions,
//! release on fault paths, and wait/notify handoff, all through the
//! engine facade.

use kona_engine::capabilities::{BufferEmitter, CollectingReporter};
use kona_engine::engine::Engine;
use kona_engine::native::NoopNativeHandler;
use kona_engine::object::Object;
use kona_engine::sync::LockKey;
use kona_engine::{Fault, Value};
use std::sync::Arc;
use std::time::Duration;

fn quiet_engine() -> Arc<Engine> {
    Engine::with_capabilities(
        Arc::new(BufferEmitter::new()),
        Arc::new(CollectingReporter::new()),
        Arc::new(NoopNativeHandler),
    )
}

#[test]
fn synchronized_regions_are_mutually_exclusive() {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = quiet_engine();
    let entry = engine.threads().register_current();

    // shared counter object; increments are read-modify-write and would
    // lose updates without the monitor
    let counter = Object::new(0, 1);
    counter.set_field(0, Value::int(0)).unwrap();
    let key = LockKey::Object(counter.object_id());

    const THREADS: usize = 4;
    const INCREMENTS: usize = 200;

    let mut workers = Vec::new();
    for _ in 0..THREADS {
        let counter = counter.clone();
        let id = engine
            .spawn_thread(move |engine, thread| {
                for _ in 0..INCREMENTS {
                    engine.synchronized(key, thread, || {
                        let current = counter.get_field(0)?.as_i32().unwrap_or(0);
                        std::hint::black_box(current);
                        counter.set_field(0, Value::int(current + 1))
                    })?;
                }
                Ok(())
            })
            .unwrap();
        workers.push(id);
    }
    for id in workers {
        engine.join(entry, id).unwrap();
        assert!(engine.threads().termination_cause(id).is_none());
    }

    assert_eq!(
        counter.get_field(0).unwrap().as_i32(),
        Some((THREADS * INCREMENTS) as i32)
    );
    assert_eq!(engine.monitor(key).owner(), None);
}

#[test]
fn reentrant_nested_synchronized_does_not_self_deadlock() {
    let engine = quiet_engine();
    let thread = engine.threads().register_current();
    let key = LockKey::Object(1);

    // a synchronized method calling another synchronized method on the
    // same object must proceed
    let result = engine.synchronized(key, thread, || {
        engine.synchronized(key, thread, || {
            engine.synchronized(key, thread, || Ok(42))
        })
    });
    assert_eq!(result.unwrap(), 42);
    assert_eq!(engine.monitor(key).owner(), None);
}

#[test]
fn fault_inside_synchronized_releases_the_monitor() {
    let engine = quiet_engine();
    let entry = engine.threads().register_current();
    let key = LockKey::Object(2);

    let result: Result<(), Fault> = engine.synchronized(key, entry, || {
        Err(Fault::UserException("boom".to_string()))
    });
    assert!(result.is_err());

    // another thread can take the monitor immediately
    let id = engine
        .spawn_thread(move |engine, thread| {
            engine.synchronized(key, thread, || Ok(()))
        })
        .unwrap();
    engine.join(entry, id).unwrap();
    assert!(engine.threads().termination_cause(id).is_none());
    assert_eq!(engine.monitor(key).owner(), None);
}

#[test]
fn class_monitors_are_distinct_from_object_monitors() {
    let engine = quiet_engine();
    let thread = engine.threads().register_current();

    // holding an object monitor does not block class-level synchronization
    engine
        .synchronized(LockKey::Object(7), thread, || {
            engine.synchronized(LockKey::Class(7), thread, || Ok(()))
        })
        .unwrap();
}

#[test]
fn wait_and_notify_all_hand_off() {
    let engine = quiet_engine();
    let entry = engine.threads().register_current();
    let key = LockKey::Object(3);

    let flag = Object::new(0, 1);
    flag.set_field(0, Value::int(0)).unwrap();

    let waiter_flag = flag.clone();
    let waiter = engine
        .spawn_thread(move |engine, thread| {
            engine.synchronized(key, thread, || {
                while waiter_flag.get_field(0)?.as_i32() == Some(0) {
                    engine.monitor_wait(key, thread, None)?;
                }
                Ok(())
            })
        })
        .unwrap();

    // let the waiter park, then set the condition and notify
    std::thread::sleep(Duration::from_millis(50));
    engine
        .synchronized(key, entry, || {
            flag.set_field(0, Value::int(1))?;
            engine.monitor_notify_all(key, entry)
        })
        .unwrap();

    engine.join(entry, waiter).unwrap();
    assert!(engine.threads().termination_cause(waiter).is_none());
}

#[test]
fn wait_without_ownership_is_illegal() {
    let engine = quiet_engine();
    let thread = engine.threads().register_current();
    let key = LockKey::Object(4);

    assert!(matches!(
        engine.monitor_wait(key, thread, None),
        Err(Fault::IllegalMonitorState(_))
    ));
    assert!(matches!(
        engine.monitor_notify_all(key, thread),
        Err(Fault::IllegalMonitorState(_))
    ));
}
