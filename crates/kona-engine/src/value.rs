//! Tagged value representation
//!
//! [`PrimitiveValue`] stores the exact bit pattern of one primitive in its
//! own width. Arithmetic requires identical variants; there is no implicit
//! mixed-kind math, and conversions are explicit operations producing a new
//! variant (see [`crate::ops`]).

use crate::object::{Closure, ObjectRef};

/// Discriminant for the primitive kinds the engine computes with.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    /// 8-bit signed integer.
    Byte,
    /// 16-bit unsigned integer (character).
    Char,
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// IEEE-754 binary32.
    Float,
    /// IEEE-754 binary64.
    Double,
}

/// A primitive value carrying its exact bit pattern.
///
/// Float comparisons through `PartialEq` follow IEEE-754: NaN is unequal to
/// itself and `-0.0 == 0.0`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PrimitiveValue {
    /// 8-bit signed integer.
    Byte(i8),
    /// 16-bit unsigned integer (character).
    Char(u16),
    /// 32-bit signed integer.
    Int(i32),
    /// 64-bit signed integer.
    Long(i64),
    /// IEEE-754 binary32.
    Float(f32),
    /// IEEE-754 binary64.
    Double(f64),
}

impl PrimitiveValue {
    /// The kind tag of this value.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            PrimitiveValue::Byte(_) => PrimitiveKind::Byte,
            PrimitiveValue::Char(_) => PrimitiveKind::Char,
            PrimitiveValue::Int(_) => PrimitiveKind::Int,
            PrimitiveValue::Long(_) => PrimitiveKind::Long,
            PrimitiveValue::Float(_) => PrimitiveKind::Float,
            PrimitiveValue::Double(_) => PrimitiveKind::Double,
        }
    }

    /// Extract an i8 if this is a byte.
    pub fn as_i8(&self) -> Option<i8> {
        match self {
            PrimitiveValue::Byte(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract a u16 if this is a char.
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            PrimitiveValue::Char(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract an i32 if this is an int.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            PrimitiveValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract an i64 if this is a long.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            PrimitiveValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract an f32 if this is a float.
    pub fn as_f32(&self) -> Option<f32> {
        match self {
            PrimitiveValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Extract an f64 if this is a double.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            PrimitiveValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// True if this is a floating value holding NaN.
    pub fn is_nan(&self) -> bool {
        match self {
            PrimitiveValue::Float(v) => v.is_nan(),
            PrimitiveValue::Double(v) => v.is_nan(),
            _ => false,
        }
    }
}

/// A value as seen by the engine: a primitive, a reference, a first-class
/// function value, or null.
#[derive(Debug, Clone)]
pub enum Value {
    /// A primitive with its exact bit pattern.
    Primitive(PrimitiveValue),
    /// A reference to a heap object; compared by identity only.
    Ref(ObjectRef),
    /// A closure capturing its defining scope.
    Closure(Closure),
    /// The null reference.
    Null,
}

impl Value {
    /// Shorthand for a byte value.
    pub fn byte(v: i8) -> Self {
        Value::Primitive(PrimitiveValue::Byte(v))
    }

    /// Shorthand for a char value.
    pub fn char(v: u16) -> Self {
        Value::Primitive(PrimitiveValue::Char(v))
    }

    /// Shorthand for an int value.
    pub fn int(v: i32) -> Self {
        Value::Primitive(PrimitiveValue::Int(v))
    }

    /// Shorthand for a long value.
    pub fn long(v: i64) -> Self {
        Value::Primitive(PrimitiveValue::Long(v))
    }

    /// Shorthand for a float value.
    pub fn float(v: f32) -> Self {
        Value::Primitive(PrimitiveValue::Float(v))
    }

    /// Shorthand for a double value.
    pub fn double(v: f64) -> Self {
        Value::Primitive(PrimitiveValue::Double(v))
    }

    /// The null reference.
    pub fn null() -> Self {
        Value::Null
    }

    /// True if this is the null reference.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Extract the primitive, if any.
    pub fn as_primitive(&self) -> Option<PrimitiveValue> {
        match self {
            Value::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Extract the object reference, if any.
    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Ref(r) => Some(r),
            _ => None,
        }
    }

    /// Extract the closure, if any.
    pub fn as_closure(&self) -> Option<&Closure> {
        match self {
            Value::Closure(c) => Some(c),
            _ => None,
        }
    }

    /// Extract an i32 if this wraps an int primitive.
    pub fn as_i32(&self) -> Option<i32> {
        self.as_primitive().and_then(|p| p.as_i32())
    }

    /// Extract an i64 if this wraps a long primitive.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_primitive().and_then(|p| p.as_i64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(PrimitiveValue::Byte(-1).kind(), PrimitiveKind::Byte);
        assert_eq!(PrimitiveValue::Char(0x5678).kind(), PrimitiveKind::Char);
        assert_eq!(PrimitiveValue::Int(0).kind(), PrimitiveKind::Int);
        assert_eq!(PrimitiveValue::Long(0).kind(), PrimitiveKind::Long);
        assert_eq!(PrimitiveValue::Float(0.0).kind(), PrimitiveKind::Float);
        assert_eq!(PrimitiveValue::Double(0.0).kind(), PrimitiveKind::Double);
    }

    #[test]
    fn test_extractors_are_kind_exact() {
        let int = PrimitiveValue::Int(42);
        assert_eq!(int.as_i32(), Some(42));
        assert_eq!(int.as_i64(), None);
        assert_eq!(int.as_f64(), None);
    }

    #[test]
    fn test_nan_check() {
        assert!(PrimitiveValue::Float(f32::NAN).is_nan());
        assert!(PrimitiveValue::Double(f64::NAN).is_nan());
        assert!(!PrimitiveValue::Double(f64::INFINITY).is_nan());
        assert!(!PrimitiveValue::Int(0).is_nan());
    }

    #[test]
    fn test_nan_self_inequality_law() {
        // isNaN(x) <=> x != x
        let nan = PrimitiveValue::Double(f64::NAN);
        assert_ne!(nan, nan);
        let zero = PrimitiveValue::Double(0.0);
        assert_eq!(zero, PrimitiveValue::Double(-0.0));
    }

    #[test]
    fn test_value_shorthands() {
        assert_eq!(Value::int(7).as_i32(), Some(7));
        assert_eq!(Value::long(7).as_i64(), Some(7));
        assert!(Value::null().is_null());
        assert!(Value::int(0).as_object().is_none());
    }
}
