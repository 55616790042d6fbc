//! Pure operation units: arithmetic, conversion, comparison
//!
//! Everything in this module is stateless and side-effect free. Operands
//! arrive already typed; the units never block and are safe to evaluate
//! concurrently without synchronization.

mod arithmetic;
mod comparison;
mod conversion;

pub use arithmetic::{arith, neg, ArithOp};
pub use comparison::{
    cmp_double, cmp_float, cmp_long, compare, reference_eq, CompareOp, NanBias,
};
pub use conversion::{convert, Conversion};
