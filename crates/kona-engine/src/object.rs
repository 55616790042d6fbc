//! Object model: identity, fields, and closure values
//!
//! Every freshly constructed object gets a process-unique id from an atomic
//! counter; reference equality is identity equality on that id. Nested
//! entities that capture their enclosing instance do so through an ordinary
//! field holding the outer reference, never through hidden pointer magic.

use crate::class::ClassId;
use crate::error::Fault;
use crate::value::Value;
use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Global counter for generating unique object identities.
static NEXT_OBJECT_ID: AtomicU64 = AtomicU64::new(1);

fn generate_object_id() -> u64 {
    NEXT_OBJECT_ID.fetch_add(1, Ordering::Relaxed)
}

/// Shared handle to a heap object.
pub type ObjectRef = Arc<Object>;

/// A heap-allocated object instance.
pub struct Object {
    /// Unique identity, assigned once at construction.
    object_id: u64,
    /// The class this object instantiates.
    class_id: ClassId,
    /// Instance fields, null-initialized.
    fields: RwLock<Vec<Value>>,
}

impl Object {
    /// Allocate a new object with `field_count` null fields.
    pub fn new(class_id: ClassId, field_count: usize) -> ObjectRef {
        Arc::new(Self {
            object_id: generate_object_id(),
            class_id,
            fields: RwLock::new(vec![Value::Null; field_count]),
        })
    }

    /// The unique identity of this object.
    pub fn object_id(&self) -> u64 {
        self.object_id
    }

    /// The class this object instantiates.
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// Number of instance fields.
    pub fn field_count(&self) -> usize {
        self.fields.read().len()
    }

    /// Read a field by index.
    pub fn get_field(&self, index: usize) -> Result<Value, Fault> {
        let fields = self.fields.read();
        fields.get(index).cloned().ok_or_else(|| {
            Fault::Type(format!(
                "field index {} out of bounds (object has {} fields)",
                index,
                fields.len()
            ))
        })
    }

    /// Write a field by index.
    pub fn set_field(&self, index: usize, value: Value) -> Result<(), Fault> {
        let mut fields = self.fields.write();
        if index < fields.len() {
            fields[index] = value;
            Ok(())
        } else {
            Err(Fault::Type(format!(
                "field index {} out of bounds (object has {} fields)",
                index,
                fields.len()
            )))
        }
    }

    /// Identity comparison: same underlying object, never field contents.
    pub fn same_identity(a: &ObjectRef, b: &ObjectRef) -> bool {
        a.object_id == b.object_id
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("object_id", &self.object_id)
            .field("class_id", &self.class_id)
            .field("field_count", &self.field_count())
            .finish()
    }
}

/// Single-method invocation capability for closure bodies.
///
/// The body receives the captured environment first and the call arguments
/// second; no dynamic call-site linking is involved.
pub trait Invokable: Send + Sync {
    /// Invoke the body.
    fn call(&self, captures: &[Value], args: &[Value]) -> Result<Value, Fault>;
}

impl<F> Invokable for F
where
    F: Fn(&[Value], &[Value]) -> Result<Value, Fault> + Send + Sync,
{
    fn call(&self, captures: &[Value], args: &[Value]) -> Result<Value, Fault> {
        self(captures, args)
    }
}

/// A first-class function value owning the variables it captured from its
/// defining scope. Clones share identity, like copies of a reference.
#[derive(Clone)]
pub struct Closure {
    id: u64,
    captures: Arc<Vec<Value>>,
    body: Arc<dyn Invokable>,
}

impl Closure {
    /// Build a closure over `captures` with the given body.
    pub fn new(captures: Vec<Value>, body: Arc<dyn Invokable>) -> Self {
        Self {
            id: generate_object_id(),
            captures: Arc::new(captures),
            body,
        }
    }

    /// Identity of this closure value.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The captured environment, in capture order.
    pub fn captures(&self) -> &[Value] {
        &self.captures
    }

    /// Invoke the closure with `args`.
    pub fn invoke(&self, args: &[Value]) -> Result<Value, Fault> {
        self.body.call(&self.captures, args)
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("id", &self.id)
            .field("captures", &self.captures.len())
            .finish()
    }
}
