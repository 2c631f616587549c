//! The engine boundary.
//!
//! Everything the typed value layer asks of an IR engine is a method on
//! [`Engine`]. The layer holds `&dyn Engine` references and never touches
//! engine state directly, so any implementation of this trait (the bundled
//! in-memory folding engine, or a native backend) can sit behind the typed
//! facade unchanged.
//!
//! All calls are synchronous and complete in bounded time; nothing here
//! suspends or spawns work. Handles passed in must have been produced by the
//! same engine instance; using a handle after its engine (or the owning
//! module/context inside a native engine) is torn down is undefined from
//! this layer's point of view and at best surfaces as
//! [`EngineError::UnknownHandle`].

use thiserror::Error;

use crate::attr::Attributes;
use crate::global::{GlobalKind, Linkage, Visibility};
use crate::handle::{ContextHandle, TypeHandle, ValueHandle};
use crate::kind::{FloatKind, TypeKind};
use crate::ops::{CastOp, IntBinOp, IntPredicate, IntUnaryOp, RealBinOp, RealPredicate};

/// Failure produced inside the engine while folding or mutating.
///
/// These are deterministic contract violations of the single operation in
/// progress, never transient conditions; callers may catch and continue.
#[derive(Clone, Eq, PartialEq, Debug, Error)]
pub enum EngineError {
    /// Signed overflow under a no-signed-wrap operation.
    #[error("signed overflow folding `{op}`")]
    SignedWrap { op: &'static str },
    /// Unsigned overflow under a no-unsigned-wrap operation.
    #[error("unsigned overflow folding `{op}`")]
    UnsignedWrap { op: &'static str },
    /// Integer division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,
    /// An exact division had a nonzero remainder.
    #[error("inexact result folding exact division")]
    InexactDivision,
    /// Operand types or shapes do not fit the operation.
    #[error("incompatible operands for `{op}`")]
    IncompatibleOperands { op: &'static str },
    /// A literal could not be parsed in the requested radix or format.
    #[error("malformed literal `{text}`")]
    MalformedLiteral { text: String },
    /// The operation requires a constant and the value is not one.
    #[error("value is not a constant")]
    NotAConstant,
    /// The operation requires a global value.
    #[error("value is not a global")]
    NotAGlobal,
    /// The handle does not name a live value, type or context.
    #[error("unknown or stale handle")]
    UnknownHandle,
}

/// Result of an engine call.
pub type EngineResult<T> = Result<T, EngineError>;

/// The complete call interface to an external IR engine.
///
/// Grouped the way the value layer consumes it: classification, type
/// construction, constant construction, folding primitives, materializing
/// reads, per-value metadata, operands, attributes, and global metadata.
pub trait Engine {
    // -- Classification --

    /// The type of a value.
    fn type_of(&self, value: ValueHandle) -> EngineResult<TypeHandle>;

    /// The kind tag of a type. Total over live type handles, including
    /// `Metadata`; deciding that metadata is unrepresentable is the value
    /// layer's job, not the engine's.
    fn type_kind(&self, ty: TypeHandle) -> EngineResult<TypeKind>;

    /// Bit width of an integer type. Fails on non-integer types.
    fn int_width(&self, ty: TypeHandle) -> EngineResult<u32>;

    // -- Type construction --

    /// The integer type of the given bit width.
    fn int_type(&self, bits: u32) -> TypeHandle;

    /// The floating-point type of the given format.
    fn real_type(&self, format: FloatKind) -> TypeHandle;

    /// A pointer to `pointee`.
    fn pointer_type(&self, pointee: TypeHandle) -> TypeHandle;

    /// The array type `[len x element]`.
    fn array_type(&self, element: TypeHandle, len: u32) -> TypeHandle;

    /// The vector type `<len x element>`.
    fn vector_type(&self, element: TypeHandle, len: u32) -> TypeHandle;

    /// A struct type over `fields`.
    fn struct_type(&self, fields: &[TypeHandle], packed: bool) -> TypeHandle;

    /// A function type.
    fn function_type(&self, ret: TypeHandle, params: &[TypeHandle]) -> TypeHandle;

    /// The void type.
    fn void_type(&self) -> TypeHandle;

    /// The basic-block label type.
    fn label_type(&self) -> TypeHandle;

    /// The metadata type. Values of this type classify to an error in the
    /// value layer; the type itself is constructible so the failure path is
    /// exercisable.
    fn metadata_type(&self) -> TypeHandle;

    /// The x86 MMX type.
    fn x86_mmx_type(&self) -> TypeHandle;

    /// Render a type for display.
    fn type_to_string(&self, ty: TypeHandle) -> EngineResult<String>;

    // -- Contexts --

    /// The global context.
    fn global_context(&self) -> ContextHandle;

    // -- Constant construction --

    /// Integer constant from a literal. `sign_extend` says whether `value`
    /// should be sign- or zero-extended into the width of `ty`.
    fn const_int(&self, ty: TypeHandle, value: u64, sign_extend: bool)
        -> EngineResult<ValueHandle>;

    /// Integer constant parsed from text in the given radix.
    fn const_int_from_string(
        &self,
        ty: TypeHandle,
        text: &str,
        radix: u32,
    ) -> EngineResult<ValueHandle>;

    /// Floating constant from a literal.
    fn const_real(&self, ty: TypeHandle, value: f64) -> EngineResult<ValueHandle>;

    /// Floating constant parsed from text.
    fn const_real_from_string(&self, ty: TypeHandle, text: &str) -> EngineResult<ValueHandle>;

    /// The zero/null constant of a type.
    fn const_null(&self, ty: TypeHandle) -> EngineResult<ValueHandle>;

    /// The null pointer constant of a pointer type.
    fn const_pointer_null(&self, ty: TypeHandle) -> EngineResult<ValueHandle>;

    /// The undefined constant of a type.
    fn const_undef(&self, ty: TypeHandle) -> EngineResult<ValueHandle>;

    /// The all-ones constant of an integer type.
    fn const_all_ones(&self, ty: TypeHandle) -> EngineResult<ValueHandle>;

    /// Array constant over pre-built elements, each of type `element`.
    fn const_array(&self, element: TypeHandle, elements: &[ValueHandle])
        -> EngineResult<ValueHandle>;

    /// Vector constant over pre-built elements. The element type is taken
    /// from the first element; the slice must be non-empty and homogeneous.
    fn const_vector(&self, elements: &[ValueHandle]) -> EngineResult<ValueHandle>;

    /// Anonymous struct constant in the global context.
    fn const_struct(&self, elements: &[ValueHandle], packed: bool) -> EngineResult<ValueHandle>;

    /// Anonymous struct constant in an explicit context. Behaves exactly
    /// like [`Engine::const_struct`] apart from the owning context.
    fn const_struct_in_context(
        &self,
        context: ContextHandle,
        elements: &[ValueHandle],
        packed: bool,
    ) -> EngineResult<ValueHandle>;

    /// String constant (an `[n x i8]` array) in the global context.
    fn const_string(&self, text: &str, null_terminated: bool) -> EngineResult<ValueHandle>;

    /// String constant in an explicit context.
    fn const_string_in_context(
        &self,
        context: ContextHandle,
        text: &str,
        null_terminated: bool,
    ) -> EngineResult<ValueHandle>;

    // -- Folding primitives --

    /// Fold a binary integer operation over two constants.
    fn const_int_binary(
        &self,
        op: IntBinOp,
        lhs: ValueHandle,
        rhs: ValueHandle,
    ) -> EngineResult<ValueHandle>;

    /// Fold a unary integer operation over a constant.
    fn const_int_unary(&self, op: IntUnaryOp, value: ValueHandle) -> EngineResult<ValueHandle>;

    /// Fold an integer comparison; the result is an `i1` constant.
    fn const_int_compare(
        &self,
        predicate: IntPredicate,
        lhs: ValueHandle,
        rhs: ValueHandle,
    ) -> EngineResult<ValueHandle>;

    /// Fold a binary floating operation over two constants.
    fn const_real_binary(
        &self,
        op: RealBinOp,
        lhs: ValueHandle,
        rhs: ValueHandle,
    ) -> EngineResult<ValueHandle>;

    /// Fold floating negation.
    fn const_real_neg(&self, value: ValueHandle) -> EngineResult<ValueHandle>;

    /// Fold a floating comparison; the result is an `i1` constant.
    fn const_real_compare(
        &self,
        predicate: RealPredicate,
        lhs: ValueHandle,
        rhs: ValueHandle,
    ) -> EngineResult<ValueHandle>;

    /// Fold a conversion to `target`.
    fn const_cast(
        &self,
        op: CastOp,
        value: ValueHandle,
        target: TypeHandle,
    ) -> EngineResult<ValueHandle>;

    /// Constant GEP over a base and constant indices.
    fn const_gep(
        &self,
        base: ValueHandle,
        indices: &[ValueHandle],
        in_bounds: bool,
    ) -> EngineResult<ValueHandle>;

    /// Fold aggregate element read.
    fn const_extract_value(&self, aggregate: ValueHandle, index: u32)
        -> EngineResult<ValueHandle>;

    /// Fold aggregate element replacement; returns a fresh aggregate, the
    /// original is untouched.
    fn const_insert_value(
        &self,
        aggregate: ValueHandle,
        element: ValueHandle,
        index: u32,
    ) -> EngineResult<ValueHandle>;

    /// Fold vector element read; `index` is an integer constant.
    fn const_extract_element(
        &self,
        vector: ValueHandle,
        index: ValueHandle,
    ) -> EngineResult<ValueHandle>;

    /// Fold vector element replacement; returns a fresh vector.
    fn const_insert_element(
        &self,
        vector: ValueHandle,
        element: ValueHandle,
        index: ValueHandle,
    ) -> EngineResult<ValueHandle>;

    /// Fold a vector shuffle. Element types of `lhs` and `rhs` must agree
    /// and `mask` must be an integer vector; the engine validates both.
    fn const_shuffle_vector(
        &self,
        lhs: ValueHandle,
        rhs: ValueHandle,
        mask: ValueHandle,
    ) -> EngineResult<ValueHandle>;

    // -- Materializing reads --

    /// The zero-extended numeric value of an integer constant.
    fn int_zero_extended_value(&self, value: ValueHandle) -> EngineResult<u64>;

    /// The sign-extended numeric value of an integer constant.
    fn int_sign_extended_value(&self, value: ValueHandle) -> EngineResult<i64>;

    /// The numeric value of a floating constant, at f64 precision.
    fn real_value(&self, value: ValueHandle) -> EngineResult<f64>;

    // -- Per-value metadata --

    /// The value's debug name; empty if unnamed.
    fn value_name(&self, value: ValueHandle) -> EngineResult<String>;

    /// Set the value's debug name.
    fn set_value_name(&self, value: ValueHandle, name: &str) -> EngineResult<()>;

    /// Whether the value is a constant.
    fn is_constant(&self, value: ValueHandle) -> EngineResult<bool>;

    /// Whether the value is the null/zero constant of its type.
    fn is_null(&self, value: ValueHandle) -> EngineResult<bool>;

    /// Whether the value is undefined.
    fn is_undef(&self, value: ValueHandle) -> EngineResult<bool>;

    /// Render a value for display.
    fn value_to_string(&self, value: ValueHandle) -> EngineResult<String>;

    // -- Operands --

    /// Number of operands of a user value.
    fn operand_count(&self, value: ValueHandle) -> EngineResult<usize>;

    /// Operand at `index`; `None` when the index is out of bounds or the
    /// slot is empty.
    fn operand(&self, value: ValueHandle, index: usize) -> EngineResult<Option<ValueHandle>>;

    /// Replace the operand at `index`. The index must be in bounds.
    fn set_operand(
        &self,
        value: ValueHandle,
        index: usize,
        operand: ValueHandle,
    ) -> EngineResult<()>;

    // -- Attributes --

    /// Add attributes to a value. Adding an already-present attribute is a
    /// no-op engine-side as well.
    fn add_attribute(&self, value: ValueHandle, attrs: Attributes) -> EngineResult<()>;

    /// Remove attributes from a value.
    fn remove_attribute(&self, value: ValueHandle, attrs: Attributes) -> EngineResult<()>;

    /// The authoritative attribute set of a value.
    fn attributes(&self, value: ValueHandle) -> EngineResult<Attributes>;

    // -- Global value metadata --

    /// Whether the value is a global, and which flavor.
    fn global_kind(&self, value: ValueHandle) -> EngineResult<Option<GlobalKind>>;

    /// Alignment in bytes; 0 means engine default.
    fn alignment(&self, value: ValueHandle) -> EngineResult<u32>;

    /// Set alignment in bytes.
    fn set_alignment(&self, value: ValueHandle, bytes: u32) -> EngineResult<()>;

    /// Linkage of a global.
    fn linkage(&self, value: ValueHandle) -> EngineResult<Linkage>;

    /// Set linkage of a global.
    fn set_linkage(&self, value: ValueHandle, linkage: Linkage) -> EngineResult<()>;

    /// Visibility of a global.
    fn visibility(&self, value: ValueHandle) -> EngineResult<Visibility>;

    /// Set visibility of a global.
    fn set_visibility(&self, value: ValueHandle, visibility: Visibility) -> EngineResult<()>;

    /// Section name of a global, if assigned.
    fn section(&self, value: ValueHandle) -> EngineResult<Option<String>>;

    /// Assign or clear the section of a global.
    fn set_section(&self, value: ValueHandle, section: Option<&str>) -> EngineResult<()>;

    /// Whether the global is a declaration (no initializer/definition).
    fn is_declaration(&self, value: ValueHandle) -> EngineResult<bool>;

    /// Whether the global is marked constant.
    fn is_global_constant(&self, value: ValueHandle) -> EngineResult<bool>;

    /// Mark the global constant or not.
    fn set_global_constant(&self, value: ValueHandle, constant: bool) -> EngineResult<()>;

    /// The global's initializer (the aliasee, for aliases), if present.
    fn initializer(&self, value: ValueHandle) -> EngineResult<Option<ValueHandle>>;

    /// Set the global's initializer.
    fn set_initializer(&self, value: ValueHandle, init: ValueHandle) -> EngineResult<()>;

    /// Whether a global variable is thread-local.
    fn is_thread_local(&self, value: ValueHandle) -> EngineResult<bool>;

    /// Mark a global variable thread-local or not.
    fn set_thread_local(&self, value: ValueHandle, enabled: bool) -> EngineResult<()>;
}
