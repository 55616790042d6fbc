//! Kona execution engine core
//!
//! This crate implements the two hard layers of a class-file execution
//! engine:
//!
//! - **Primitive value semantics**: exact two's-complement integer
//!   arithmetic with silent wraparound, IEEE-754 binary32/binary64 math
//!   with full special-value handling, saturating/truncating numeric
//!   conversions, and NaN-unordered comparison rules.
//! - **Concurrency subsystem**: per-object reentrant monitors, thread
//!   lifecycle with uncaught-fault isolation, and lazy exactly-once class
//!   initialization that is race-free and reentrant for the initializing
//!   thread.
//!
//! Bytecode decoding, the full object surface, garbage collection, and
//! native rendering live in other layers; this core receives already-typed
//! operand values and operation tags, and reaches the host only through
//! injected capabilities ([`capabilities`], [`native`]).

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod capabilities;
pub mod class;
pub mod engine;
pub mod error;
pub mod native;
pub mod object;
pub mod ops;
pub mod sync;
pub mod thread;
pub mod value;

pub use engine::Engine;
pub use error::Fault;
pub use ops::{ArithOp, CompareOp, Conversion};
pub use value::{PrimitiveKind, PrimitiveValue, Value};
