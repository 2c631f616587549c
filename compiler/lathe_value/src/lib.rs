//! Lathe Value - Typed Facade over an IR Engine
//!
//! Every IR value an engine hands out is an opaque [`lathe_ir::ValueHandle`].
//! This crate wraps those handles in a closed, strongly-typed hierarchy and
//! delegates all computation back to the engine through the
//! [`lathe_ir::Engine`] boundary:
//!
//! - [`classify`] turns a raw handle into the concrete wrapper for its
//!   runtime type kind, with an explicit failure for unrepresentable kinds.
//! - [`Value`] is the hierarchy root: identity, naming, predicates, generic
//!   casts, and the lazily created per-value [`AttributeCollection`].
//! - Constants fold eagerly: arithmetic on [`IntConstant`]/[`RealConstant`]
//!   and element access on aggregates asks the engine for the folded result
//!   at construction time and wraps the fresh handle.
//! - [`GlobalVariable`]/[`GlobalAlias`] pass metadata straight through with
//!   no local caching.
//!
//! # Ownership
//!
//! Handles are engine-owned. Wrappers never free them, and a wrapper used
//! after its engine (or the engine-side owner of the handle) is gone is a
//! caller contract violation this layer cannot detect.
//!
//! # Debugging
//!
//! Classification and attribute traffic emit `tracing` events:
//! `RUST_LOG=lathe_value=trace` to follow them.

mod aggregate;
mod attributes;
mod classify;
mod constant;
mod error;
mod global;
mod int;
mod operands;
mod pointer;
mod real;
mod types;
mod value;

pub use aggregate::{
    AggregateValue, ConstantArray, ConstantString, ConstantStruct, ConstantVector,
};
pub use attributes::AttributeCollection;
pub use classify::{classify, AnyInt, AnyReal, AnyValueEnum};
pub use constant::{ConstantNull, ConstantNullPointer, ConstantUndef, ConstantValue, NullaryCtor};
pub use error::{ValueError, ValueResult};
pub use global::{GlobalAlias, GlobalValueOps, GlobalVariable};
pub use int::{
    Int1, Int16, Int32, Int64, Int8, IntConstant, IntWidth, W1, W16, W32, W64, W8,
};
pub use operands::{OperandCollection, Operands, UserValue};
pub use pointer::PointerConstant;
pub use real::{
    Double, DoubleFormat, Float, FloatFormat, Fp128, Fp128Format, PpcFp128, PpcFp128Format,
    RealConstant, SingleFormat, X86Fp80, X86Fp80Format,
};
pub use types::Type;
pub use value::{AnyValue, Value, Wrap};

#[cfg(test)]
mod tests;
