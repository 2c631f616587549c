//! Errors raised by the typed value layer.

use lathe_ir::{EngineError, TypeKind};
use thiserror::Error;

/// Failure of a single typed operation.
///
/// Every variant is detected and raised at the call site; nothing is
/// deferred or batched, and nothing here is worth retrying. A failed
/// operation leaves no local cache half-updated: mutations of local state
/// happen only after the engine call they mirror has succeeded.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum ValueError {
    /// An argument had the wrong shape for the constructor or mutator.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// The operation requires a specific category of type.
    #[error("type mismatch: expected {expected}, found {found:?}")]
    TypeMismatch {
        /// Human-readable description of the required category.
        expected: &'static str,
        /// The kind actually supplied.
        found: TypeKind,
    },

    /// Classification met a type kind with no concrete wrapper.
    #[error("type kind {0:?} has no value wrapper")]
    UnrepresentableType(TypeKind),

    /// Classification or a cast met an integer width outside the fixed
    /// `{1, 8, 16, 32, 64}` wrapper set. A subcase of unrepresentability;
    /// kept separate so the width survives into the message.
    #[error("integer width i{0} has no fixed-width wrapper")]
    UnsupportedWidth(u32),

    /// An operand write addressed a slot outside the current bounds.
    #[error("operand index {index} out of range for {len} operands")]
    OutOfRange { index: usize, len: usize },

    /// The engine rejected or failed the delegated operation.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Result of a typed value operation.
pub type ValueResult<T> = Result<T, ValueError>;
