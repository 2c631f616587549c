//! Typed view of engine-owned types.

use std::fmt;

use lathe_ir::{Engine, FloatKind, TypeHandle, TypeKind};
use smallvec::SmallVec;

use crate::error::ValueResult;

/// A typed handle to an engine-owned IR type.
///
/// Copyable and engine-relative: two `Type`s are equal when their handles
/// are, which assumes both came from the same engine instance. The kind is
/// re-queried on demand, never cached.
#[derive(Copy, Clone)]
pub struct Type<'e> {
    engine: &'e dyn Engine,
    handle: TypeHandle,
}

impl<'e> Type<'e> {
    /// Wrap an engine type handle.
    pub fn from_handle(engine: &'e dyn Engine, handle: TypeHandle) -> Self {
        Type { engine, handle }
    }

    /// The underlying engine handle.
    #[inline]
    pub fn handle(self) -> TypeHandle {
        self.handle
    }

    /// The engine this type belongs to.
    #[inline]
    pub fn engine(self) -> &'e dyn Engine {
        self.engine
    }

    /// The kind tag of this type.
    pub fn kind(self) -> ValueResult<TypeKind> {
        Ok(self.engine.type_kind(self.handle)?)
    }

    /// Bit width, for integer types.
    pub fn int_width(self) -> ValueResult<u32> {
        Ok(self.engine.int_width(self.handle)?)
    }

    /// Whether this is one of the five floating-point formats.
    pub fn is_floating_point(self) -> ValueResult<bool> {
        Ok(self.kind()?.is_floating_point())
    }

    /// Whether this is an integer type of any width.
    pub fn is_integer(self) -> ValueResult<bool> {
        Ok(self.kind()? == TypeKind::Integer)
    }

    /// Render for display.
    pub fn print_to_string(self) -> ValueResult<String> {
        Ok(self.engine.type_to_string(self.handle)?)
    }

    // -- Constructors --

    /// The integer type of the given width.
    pub fn int(engine: &'e dyn Engine, bits: u32) -> Self {
        Type::from_handle(engine, engine.int_type(bits))
    }

    /// The floating-point type of the given format.
    pub fn real(engine: &'e dyn Engine, format: FloatKind) -> Self {
        Type::from_handle(engine, engine.real_type(format))
    }

    /// A pointer to this type.
    pub fn pointer_to(self) -> Self {
        Type::from_handle(self.engine, self.engine.pointer_type(self.handle))
    }

    /// An array of `len` of this type.
    pub fn array_of(self, len: u32) -> Self {
        Type::from_handle(self.engine, self.engine.array_type(self.handle, len))
    }

    /// A vector of `len` of this type.
    pub fn vector_of(self, len: u32) -> Self {
        Type::from_handle(self.engine, self.engine.vector_type(self.handle, len))
    }

    /// A struct over the given field types.
    pub fn structure(engine: &'e dyn Engine, fields: &[Type<'e>], packed: bool) -> Self {
        let handles: SmallVec<[TypeHandle; 8]> = fields.iter().map(|t| t.handle).collect();
        Type::from_handle(engine, engine.struct_type(&handles, packed))
    }

    /// A function type.
    pub fn function(ret: Type<'e>, params: &[Type<'e>]) -> Self {
        let handles: SmallVec<[TypeHandle; 8]> = params.iter().map(|t| t.handle).collect();
        Type::from_handle(ret.engine, ret.engine.function_type(ret.handle, &handles))
    }

    /// The void type.
    pub fn void(engine: &'e dyn Engine) -> Self {
        Type::from_handle(engine, engine.void_type())
    }

    /// The basic-block label type.
    pub fn label(engine: &'e dyn Engine) -> Self {
        Type::from_handle(engine, engine.label_type())
    }

    /// The metadata type.
    pub fn metadata(engine: &'e dyn Engine) -> Self {
        Type::from_handle(engine, engine.metadata_type())
    }

    /// The x86 MMX type.
    pub fn x86_mmx(engine: &'e dyn Engine) -> Self {
        Type::from_handle(engine, engine.x86_mmx_type())
    }
}

impl PartialEq for Type<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for Type<'_> {}

impl fmt::Debug for Type<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({:?})", self.handle)
    }
}
