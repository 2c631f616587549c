//! Lathe IR - Shared Vocabulary for the Typed Value Layer
//!
//! This crate contains the leaf data structures shared between the typed
//! value layer (`lathe_value`) and any engine implementation
//! (`lathe_engine`, or a native backend):
//! - Opaque handles for engine-owned values, types and contexts
//! - `TypeKind` classification tags
//! - Operation enums (arithmetic, casts, predicates)
//! - Attribute flags
//! - Linkage/visibility metadata for global values
//! - The [`Engine`] trait, the full call boundary to the IR engine
//!
//! # Design Philosophy
//!
//! - **Handles are identities**: a handle never owns engine memory; equality
//!   and hashing are by engine-assigned id only.
//! - **Closed vocabularies**: every dispatchable quantity (type kind,
//!   operation, predicate) is a closed enum, so dispatch sites are
//!   exhaustive matches checked at compile time.
//! - **One seam**: everything the value layer needs from an engine goes
//!   through the [`Engine`] trait; there is no second channel.

mod attr;
mod engine;
mod global;
mod handle;
mod kind;
mod ops;

pub use attr::Attributes;
pub use engine::{Engine, EngineError, EngineResult};
pub use global::{GlobalKind, Linkage, Visibility};
pub use handle::{ContextHandle, TypeHandle, ValueHandle};
pub use kind::{FloatKind, TypeKind};
pub use ops::{
    CastOp, IntBinOp, IntPredicate, IntUnaryOp, RealBinOp, RealPredicate, ShiftKind, WrapMode,
};
