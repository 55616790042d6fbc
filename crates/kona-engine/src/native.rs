//! Native call boundary
//!
//! Operations that declare no body in the program representation are opaque
//! external capabilities, invoked by name with typed arguments. The core
//! threads the call through and never interprets its effects. Handlers are
//! supplied by an external collaborator at composition time; the graphics
//! primitive calls of the source corpus live entirely behind this boundary.

use crate::value::Value;

/// Result of a native call handler.
pub enum NativeCallResult {
    /// Call handled, returned a value.
    Value(Value),
    /// Call handled, returned nothing.
    Void,
    /// Call name not recognized by this handler.
    Unhandled,
    /// Call failed with an error message.
    Error(String),
}

/// Trait for handling bodiless operations invoked by name.
pub trait NativeHandler: Send + Sync {
    /// Handle a native call.
    ///
    /// Returns [`NativeCallResult::Unhandled`] if the name is not
    /// recognized, which the engine surfaces as an unsatisfied link.
    fn call(&self, name: &str, args: &[Value]) -> NativeCallResult;
}

/// A no-op handler that recognizes nothing.
pub struct NoopNativeHandler;

impl NativeHandler for NoopNativeHandler {
    fn call(&self, _name: &str, _args: &[Value]) -> NativeCallResult {
        NativeCallResult::Unhandled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_handler_handles_nothing() {
        let handler = NoopNativeHandler;
        assert!(matches!(
            handler.call("drawLine", &[Value::int(0)]),
            NativeCallResult::Unhandled
        ));
    }
}
