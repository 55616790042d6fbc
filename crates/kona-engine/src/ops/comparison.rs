//! Comparison unit
//!
//! Integers order by two's-complement signed value. Floats order partially:
//! every relational or equality comparison involving NaN is false, `!=`
//! involving NaN is true, and `-0.0 == 0.0`. References compare by identity
//! only.

use crate::error::Fault;
use crate::value::{PrimitiveValue, Value};

/// Comparison operation tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Ge,
}

/// Result bias for three-way float comparison when an operand is NaN.
///
/// The source instruction set carries two float comparison forms that differ
/// only in which branch an unordered result favors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NanBias {
    /// Unordered compares as less (`fcmpl`/`dcmpl`).
    Less,
    /// Unordered compares as greater (`fcmpg`/`dcmpg`).
    Greater,
}

/// Compare two primitives of identical kind.
pub fn compare(op: CompareOp, a: PrimitiveValue, b: PrimitiveValue) -> Result<bool, Fault> {
    use PrimitiveValue::*;
    match (a, b) {
        (Byte(a), Byte(b)) => Ok(ordered(op, a, b)),
        (Char(a), Char(b)) => Ok(ordered(op, a, b)),
        (Int(a), Int(b)) => Ok(ordered(op, a, b)),
        (Long(a), Long(b)) => Ok(ordered(op, a, b)),
        (Float(a), Float(b)) => Ok(ordered(op, a, b)),
        (Double(a), Double(b)) => Ok(ordered(op, a, b)),
        (a, b) => Err(Fault::Type(format!(
            "{:?} on operands of kind {:?} and {:?}",
            op,
            a.kind(),
            b.kind()
        ))),
    }
}

// PartialOrd on floats already gives the unordered-NaN behavior: all
// relational operators and == are false, != is true.
fn ordered<T: PartialOrd>(op: CompareOp, a: T, b: T) -> bool {
    match op {
        CompareOp::Eq => a == b,
        CompareOp::Ne => a != b,
        CompareOp::Lt => a < b,
        CompareOp::Le => a <= b,
        CompareOp::Gt => a > b,
        CompareOp::Ge => a >= b,
    }
}

/// Three-way long comparison: -1, 0, or 1.
pub fn cmp_long(a: i64, b: i64) -> i32 {
    match a.cmp(&b) {
        std::cmp::Ordering::Less => -1,
        std::cmp::Ordering::Equal => 0,
        std::cmp::Ordering::Greater => 1,
    }
}

/// Three-way float comparison with the given unordered bias.
pub fn cmp_float(a: f32, b: f32, bias: NanBias) -> i32 {
    if a.is_nan() || b.is_nan() {
        return match bias {
            NanBias::Less => -1,
            NanBias::Greater => 1,
        };
    }
    if a < b {
        -1
    } else if a > b {
        1
    } else {
        0
    }
}

/// Three-way double comparison with the given unordered bias.
pub fn cmp_double(a: f64, b: f64, bias: NanBias) -> i32 {
    if a.is_nan() || b.is_nan() {
        return match bias {
            NanBias::Less => -1,
            NanBias::Greater => 1,
        };
    }
    if a < b {
        -1
    } else if a > b {
        1
    } else {
        0
    }
}

/// Identity comparison over reference values (objects, closures, null).
///
/// Two independently constructed objects are never equal, regardless of
/// field contents. Primitives are not legal operands here.
pub fn reference_eq(a: &Value, b: &Value) -> Result<bool, Fault> {
    match (a, b) {
        (Value::Null, Value::Null) => Ok(true),
        (Value::Ref(x), Value::Ref(y)) => Ok(x.object_id() == y.object_id()),
        (Value::Closure(x), Value::Closure(y)) => Ok(x.id() == y.id()),
        (Value::Null, Value::Ref(_) | Value::Closure(_))
        | (Value::Ref(_) | Value::Closure(_), Value::Null)
        | (Value::Ref(_), Value::Closure(_))
        | (Value::Closure(_), Value::Ref(_)) => Ok(false),
        _ => Err(Fault::Type(
            "reference comparison on primitive operand".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;
    use crate::value::PrimitiveValue::*;

    fn cmp(op: CompareOp, a: PrimitiveValue, b: PrimitiveValue) -> bool {
        compare(op, a, b).unwrap()
    }

    #[test]
    fn test_int_total_order() {
        assert!(cmp(CompareOp::Lt, Int(-1), Int(0)));
        assert!(cmp(CompareOp::Lt, Int(i32::MIN), Int(i32::MAX)));
        assert!(cmp(CompareOp::Eq, Int(5), Int(5)));
        assert!(!cmp(CompareOp::Ne, Int(5), Int(5)));
        assert!(cmp(CompareOp::Ge, Long(1), Long(0)));
        assert!(!cmp(CompareOp::Le, Long(1), Long(0)));
    }

    #[test]
    fn test_char_is_unsigned() {
        assert!(cmp(CompareOp::Gt, Char(0xFFFF), Char(0)));
    }

    #[test]
    fn test_nan_is_unordered() {
        for op in [CompareOp::Eq, CompareOp::Lt, CompareOp::Le, CompareOp::Gt, CompareOp::Ge] {
            assert!(!cmp(op, Double(f64::NAN), Double(f64::NAN)));
            assert!(!cmp(op, Double(f64::NAN), Double(1.0)));
            assert!(!cmp(op, Float(1.0), Float(f32::NAN)));
        }
        assert!(cmp(CompareOp::Ne, Double(f64::NAN), Double(f64::NAN)));
        assert!(cmp(CompareOp::Ne, Float(f32::NAN), Float(0.0)));
    }

    #[test]
    fn test_signed_zero_compares_equal() {
        assert!(cmp(CompareOp::Eq, Double(-0.0), Double(0.0)));
        assert!(!cmp(CompareOp::Lt, Double(-0.0), Double(0.0)));
        assert!(cmp(CompareOp::Ge, Float(-0.0), Float(0.0)));
    }

    #[test]
    fn test_three_way_helpers() {
        assert_eq!(cmp_long(0, 1), -1);
        assert_eq!(cmp_long(1, 1), 0);
        assert_eq!(cmp_long(i64::MAX, i64::MIN), 1);

        assert_eq!(cmp_float(1.0, 2.0, NanBias::Less), -1);
        assert_eq!(cmp_float(f32::NAN, 0.0, NanBias::Less), -1);
        assert_eq!(cmp_float(f32::NAN, 0.0, NanBias::Greater), 1);
        assert_eq!(cmp_double(-0.0, 0.0, NanBias::Less), 0);
        assert_eq!(cmp_double(f64::NAN, f64::NAN, NanBias::Greater), 1);
    }

    #[test]
    fn test_reference_identity() {
        let a = Object::new(0, 0);
        let b = Object::new(0, 0);
        let va = Value::Ref(a.clone());
        assert!(!reference_eq(&va, &Value::Ref(b)).unwrap());
        assert!(reference_eq(&va, &Value::Ref(a)).unwrap());
        assert!(reference_eq(&Value::Null, &Value::Null).unwrap());
        assert!(!reference_eq(&va, &Value::Null).unwrap());
    }

    #[test]
    fn test_reference_eq_rejects_primitives() {
        assert!(matches!(
            reference_eq(&Value::int(1), &Value::int(1)),
            Err(Fault::Type(_))
        ));
    }

    #[test]
    fn test_kind_mismatch() {
        assert!(matches!(
            compare(CompareOp::Eq, Int(0), Long(0)),
            Err(Fault::Type(_))
        ));
    }
}
