//! Integer and floating-point arithmetic units
//!
//! Integer add/sub/mul reduce the exact result modulo 2^width and
//! reinterpret it as signed two's-complement; overflow is never an error.
//! Divide/remainder by zero is a fault. Floating math is IEEE-754 in the
//! operand's own precision; binary32 operands are never promoted to
//! binary64.

use crate::error::Fault;
use crate::value::PrimitiveValue;

/// Binary arithmetic operation tag.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ArithOp {
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division, truncating toward zero for integers.
    Div,
    /// Remainder; sign follows the dividend for integers, IEEE truncated
    /// remainder for floats.
    Rem,
}

/// Apply a binary arithmetic operation to two primitives of identical kind.
///
/// Byte and char values are widened by the front end before arithmetic
/// reaches the engine, so only int/long/float/double operands are legal
/// here; anything else is a dispatch error.
pub fn arith(op: ArithOp, a: PrimitiveValue, b: PrimitiveValue) -> Result<PrimitiveValue, Fault> {
    use PrimitiveValue::*;
    match (a, b) {
        (Int(a), Int(b)) => int_arith(op, a, b).map(Int),
        (Long(a), Long(b)) => long_arith(op, a, b).map(Long),
        (Float(a), Float(b)) => Ok(Float(float_arith(op, a, b))),
        (Double(a), Double(b)) => Ok(Double(double_arith(op, a, b))),
        (a, b) => Err(Fault::Type(format!(
            "{:?} on operands of kind {:?} and {:?}",
            op,
            a.kind(),
            b.kind()
        ))),
    }
}

/// Arithmetic negation of an int/long/float/double.
pub fn neg(a: PrimitiveValue) -> Result<PrimitiveValue, Fault> {
    use PrimitiveValue::*;
    match a {
        Int(v) => Ok(Int(v.wrapping_neg())),
        Long(v) => Ok(Long(v.wrapping_neg())),
        Float(v) => Ok(Float(-v)),
        Double(v) => Ok(Double(-v)),
        other => Err(Fault::Type(format!("negation of kind {:?}", other.kind()))),
    }
}

fn int_arith(op: ArithOp, a: i32, b: i32) -> Result<i32, Fault> {
    Ok(match op {
        ArithOp::Add => a.wrapping_add(b),
        ArithOp::Sub => a.wrapping_sub(b),
        ArithOp::Mul => a.wrapping_mul(b),
        ArithOp::Div => {
            if b == 0 {
                return Err(Fault::DivisionByZero);
            }
            // MIN / -1 wraps back to MIN instead of trapping
            a.wrapping_div(b)
        }
        ArithOp::Rem => {
            if b == 0 {
                return Err(Fault::DivisionByZero);
            }
            a.wrapping_rem(b)
        }
    })
}

fn long_arith(op: ArithOp, a: i64, b: i64) -> Result<i64, Fault> {
    Ok(match op {
        ArithOp::Add => a.wrapping_add(b),
        ArithOp::Sub => a.wrapping_sub(b),
        ArithOp::Mul => a.wrapping_mul(b),
        ArithOp::Div => {
            if b == 0 {
                return Err(Fault::DivisionByZero);
            }
            a.wrapping_div(b)
        }
        ArithOp::Rem => {
            if b == 0 {
                return Err(Fault::DivisionByZero);
            }
            a.wrapping_rem(b)
        }
    })
}

fn float_arith(op: ArithOp, a: f32, b: f32) -> f32 {
    match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => a / b,
        // IEEE truncated remainder: NaN operand, infinite dividend, or zero
        // divisor yields NaN; finite dividend with infinite divisor yields
        // the dividend unchanged.
        ArithOp::Rem => a % b,
    }
}

fn double_arith(op: ArithOp, a: f64, b: f64) -> f64 {
    match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => a / b,
        ArithOp::Rem => a % b,
    }
}
