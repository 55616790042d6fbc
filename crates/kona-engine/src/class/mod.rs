//! Class metadata and registry
//!
//! Per-class static state lives here, but it is reachable only through the
//! engine's active-use entry points, which funnel through the
//! initialization manager in [`init`]. There are no ambient globals.

pub mod init;

pub use init::{InitRegistry, InitState};

use crate::engine::Engine;
use crate::error::Fault;
use crate::thread::ThreadId;
use crate::value::Value;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Class identifier: index into the registry.
pub type ClassId = usize;

/// Static initializer body. It receives the engine so it can perform
/// further active use, including recursive use of its own class.
pub type ClinitFn = dyn Fn(&Engine, ThreadId) -> Result<(), Fault> + Send + Sync;

/// Class definition metadata plus its static storage.
pub struct Class {
    /// Class ID (unique identifier).
    pub id: ClassId,
    /// Class name.
    pub name: String,
    /// Number of instance fields.
    pub field_count: usize,
    /// Static fields, null-initialized; written by the initializer and by
    /// static stores.
    statics: RwLock<Vec<Value>>,
    /// Static initializer body, run exactly once on first active use.
    initializer: Option<Arc<ClinitFn>>,
}

impl Class {
    /// Create a new class with `static_count` null static fields.
    pub fn new(
        id: ClassId,
        name: String,
        field_count: usize,
        static_count: usize,
        initializer: Option<Arc<ClinitFn>>,
    ) -> Self {
        Self {
            id,
            name,
            field_count,
            statics: RwLock::new(vec![Value::Null; static_count]),
            initializer,
        }
    }

    /// Number of static fields.
    pub fn static_count(&self) -> usize {
        self.statics.read().len()
    }

    pub(crate) fn initializer(&self) -> Option<Arc<ClinitFn>> {
        self.initializer.clone()
    }

    pub(crate) fn static_field(&self, index: usize) -> Result<Value, Fault> {
        let statics = self.statics.read();
        statics.get(index).cloned().ok_or_else(|| {
            Fault::Type(format!(
                "static index {} out of bounds for class {}",
                index, self.name
            ))
        })
    }

    pub(crate) fn set_static_field(&self, index: usize, value: Value) -> Result<(), Fault> {
        let mut statics = self.statics.write();
        if index < statics.len() {
            statics[index] = value;
            Ok(())
        } else {
            Err(Fault::Type(format!(
                "static index {} out of bounds for class {}",
                index, self.name
            )))
        }
    }
}

/// Registry of all classes known to the engine.
pub struct ClassRegistry {
    inner: RwLock<RegistryInner>,
}

#[derive(Default)]
struct RegistryInner {
    classes: Vec<Arc<Class>>,
    name_to_id: FxHashMap<String, ClassId>,
}

impl ClassRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    /// Register a new class and return its ID.
    pub fn register(
        &self,
        name: &str,
        field_count: usize,
        static_count: usize,
        initializer: Option<Arc<ClinitFn>>,
    ) -> ClassId {
        let mut inner = self.inner.write();
        let id = inner.classes.len();
        inner.classes.push(Arc::new(Class::new(
            id,
            name.to_string(),
            field_count,
            static_count,
            initializer,
        )));
        inner.name_to_id.insert(name.to_string(), id);
        id
    }

    /// Get a class by ID.
    pub fn get(&self, id: ClassId) -> Option<Arc<Class>> {
        self.inner.read().classes.get(id).cloned()
    }

    /// Get a class by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<Class>> {
        let inner = self.inner.read();
        inner
            .name_to_id
            .get(name)
            .and_then(|id| inner.classes.get(*id))
            .cloned()
    }

    /// Number of registered classes.
    pub fn count(&self) -> usize {
        self.inner.read().classes.len()
    }
}

impl Default for ClassRegistry {
    fn default() -> Self {
        Self::new()
    }
}
