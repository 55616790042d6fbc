//! Numeric conversion unit
//!
//! Integer narrowing keeps the low-order bits of the two's-complement
//! representation; widening sign-extends. Floating to integral saturates:
//! NaN becomes 0, out-of-range magnitudes clamp to the target's MIN/MAX,
//! everything else truncates toward zero. Rust's `as` casts carry exactly
//! these semantics, so each arm is a plain cast.

use crate::error::Fault;
use crate::value::PrimitiveValue;

/// Conversion operation tag, named after the mnemonics of the source
/// instruction set.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Conversion {
    I2B,
    I2C,
    I2L,
    I2F,
    I2D,
    L2I,
    L2F,
    L2D,
    F2I,
    F2L,
    F2D,
    D2I,
    D2L,
    D2F,
}

/// Apply a conversion to a primitive of the matching source kind.
pub fn convert(conv: Conversion, v: PrimitiveValue) -> Result<PrimitiveValue, Fault> {
    use Conversion::*;
    use PrimitiveValue::*;
    let out = match (conv, v) {
        (I2B, Int(v)) => Byte(v as i8),
        (I2C, Int(v)) => Char(v as u16),
        (I2L, Int(v)) => Long(v as i64),
        (I2F, Int(v)) => Float(v as f32),
        (I2D, Int(v)) => Double(v as f64),

        (L2I, Long(v)) => Int(v as i32),
        (L2F, Long(v)) => Float(v as f32),
        (L2D, Long(v)) => Double(v as f64),

        (F2I, Float(v)) => Int(v as i32),
        (F2L, Float(v)) => Long(v as i64),
        (F2D, Float(v)) => Double(v as f64),

        (D2I, Double(v)) => Int(v as i32),
        (D2L, Double(v)) => Long(v as i64),
        (D2F, Double(v)) => Float(v as f32),

        (conv, v) => {
            return Err(Fault::Type(format!(
                "{:?} applied to operand of kind {:?}",
                conv,
                v.kind()
            )))
        }
    };
    Ok(out)
}
