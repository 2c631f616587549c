//! The root value wrapper and the shared operation seam.

use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};

use lathe_ir::{CastOp, Engine, ValueHandle};

use crate::attributes::AttributeCollection;
use crate::error::ValueResult;
use crate::types::Type;

/// The root wrapper over an engine-owned value handle.
///
/// Holds the handle, the engine it belongs to, and the lazily created
/// attribute collection. Identity (equality, hashing) is by handle; the
/// engine owns the referent's lifetime and this wrapper never frees
/// anything.
#[derive(Clone)]
pub struct Value<'e> {
    engine: &'e dyn Engine,
    handle: ValueHandle,
    attrs: OnceCell<AttributeCollection<'e>>,
}

impl<'e> Value<'e> {
    /// Wrap an engine value handle.
    pub fn from_handle(engine: &'e dyn Engine, handle: ValueHandle) -> Self {
        Value {
            engine,
            handle,
            attrs: OnceCell::new(),
        }
    }

    pub(crate) fn engine_ref(&self) -> &'e dyn Engine {
        self.engine
    }

    pub(crate) fn raw_handle(&self) -> ValueHandle {
        self.handle
    }

    pub(crate) fn attribute_cell(&self) -> &OnceCell<AttributeCollection<'e>> {
        &self.attrs
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for Value<'_> {}

impl Hash for Value<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.handle.hash(state);
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Value({:?})", self.handle)
    }
}

/// Wrap a raw handle as a concrete wrapper type, without reclassification.
///
/// Implemented by every concrete wrapper so generic code (aggregate
/// `insert`, the classification tables) can rebuild the receiver's type
/// around a fresh engine handle.
pub trait Wrap<'e>: Sized {
    /// Wrap the handle. No engine query is made; the caller vouches for the
    /// handle's kind.
    fn from_handle(engine: &'e dyn Engine, handle: ValueHandle) -> Self;
}

impl<'e> Wrap<'e> for Value<'e> {
    fn from_handle(engine: &'e dyn Engine, handle: ValueHandle) -> Self {
        Value::from_handle(engine, handle)
    }
}

/// Operations shared by every value wrapper.
///
/// The one required method ties a wrapper to its root [`Value`]; everything
/// else delegates to the engine through it. Conversions here return the
/// root type: the concrete subtype of a conversion result is the caller's
/// knowledge, not this layer's.
pub trait AnyValue<'e> {
    /// The root value this wrapper decorates.
    fn as_value(&self) -> &Value<'e>;

    /// The underlying engine handle.
    fn handle(&self) -> ValueHandle {
        self.as_value().raw_handle()
    }

    /// The engine this value belongs to.
    fn engine(&self) -> &'e dyn Engine {
        self.as_value().engine_ref()
    }

    /// The value's debug name; empty if unnamed.
    fn name(&self) -> ValueResult<String> {
        Ok(self.engine().value_name(self.handle())?)
    }

    /// Set the value's debug name.
    fn set_name(&self, name: &str) -> ValueResult<()> {
        Ok(self.engine().set_value_name(self.handle(), name)?)
    }

    /// Whether the value is a constant.
    fn is_constant(&self) -> ValueResult<bool> {
        Ok(self.engine().is_constant(self.handle())?)
    }

    /// Whether the value is the null/zero value of its type.
    fn is_null(&self) -> ValueResult<bool> {
        Ok(self.engine().is_null(self.handle())?)
    }

    /// Whether the value is undefined.
    fn is_undefined(&self) -> ValueResult<bool> {
        Ok(self.engine().is_undef(self.handle())?)
    }

    /// The value's type, re-derived from the engine on every call.
    ///
    /// Deliberately uncached: the engine is the source of truth and the
    /// type of the underlying construct can change under this wrapper, so a
    /// cached kind could go stale. Callers on hot paths should hold the
    /// result rather than re-query.
    fn ty(&self) -> ValueResult<Type<'e>> {
        let handle = self.engine().type_of(self.handle())?;
        Ok(Type::from_handle(self.engine(), handle))
    }

    /// The value's attribute collection, created on first access and owned
    /// by this value instance for its lifetime.
    ///
    /// The collection mirrors the engine's attribute set locally and is
    /// only coherent while every attribute mutation for this value goes
    /// through this one instance; see [`AttributeCollection`].
    fn attributes(&self) -> &AttributeCollection<'e> {
        let value = self.as_value();
        value
            .attribute_cell()
            .get_or_init(|| AttributeCollection::new(value.engine_ref(), value.raw_handle()))
    }

    /// Reinterpret the constant's bits as `target`.
    fn bitcast(&self, target: Type<'e>) -> ValueResult<Value<'e>> {
        self.convert(CastOp::Bitcast, target)
    }

    /// Truncate to a narrower integer type.
    fn truncate(&self, target: Type<'e>) -> ValueResult<Value<'e>> {
        self.convert(CastOp::Trunc, target)
    }

    /// Truncate, or bitcast when the widths already agree.
    fn trunc_or_bitcast(&self, target: Type<'e>) -> ValueResult<Value<'e>> {
        self.convert(CastOp::TruncOrBitcast, target)
    }

    /// Zero-extend to a wider integer type.
    fn zero_extend(&self, target: Type<'e>) -> ValueResult<Value<'e>> {
        self.convert(CastOp::ZeroExtend, target)
    }

    /// Zero-extend, or bitcast when the widths already agree.
    fn zext_or_bitcast(&self, target: Type<'e>) -> ValueResult<Value<'e>> {
        self.convert(CastOp::ZextOrBitcast, target)
    }

    /// Fold a conversion and wrap the result as a root value.
    ///
    /// Constant-folding: the engine computes the converted constant now,
    /// not at IR execution time.
    fn convert(&self, op: CastOp, target: Type<'e>) -> ValueResult<Value<'e>> {
        let handle = self
            .engine()
            .const_cast(op, self.handle(), target.handle())?;
        Ok(Value::from_handle(self.engine(), handle))
    }

    /// Render for display.
    fn print_to_string(&self) -> ValueResult<String> {
        Ok(self.engine().value_to_string(self.handle())?)
    }

    /// Print the value to stderr, for interactive debugging.
    fn dump(&self) {
        match self.print_to_string() {
            Ok(text) => eprintln!("{text}"),
            Err(err) => eprintln!("<unprintable {:?}: {err}>", self.handle()),
        }
    }
}

impl<'e> AnyValue<'e> for Value<'e> {
    fn as_value(&self) -> &Value<'e> {
        self
    }
}

/// Define a plain wrapper struct around [`Value`] with the standard
/// identity, wrapping and debug plumbing.
macro_rules! value_wrapper {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name<'e> {
            value: $crate::value::Value<'e>,
        }

        impl<'e> $crate::value::Wrap<'e> for $name<'e> {
            fn from_handle(
                engine: &'e dyn lathe_ir::Engine,
                handle: lathe_ir::ValueHandle,
            ) -> Self {
                $name {
                    value: $crate::value::Value::from_handle(engine, handle),
                }
            }
        }

        impl<'e> $crate::value::AnyValue<'e> for $name<'e> {
            fn as_value(&self) -> &$crate::value::Value<'e> {
                &self.value
            }
        }

        impl PartialEq for $name<'_> {
            fn eq(&self, other: &Self) -> bool {
                self.value == other.value
            }
        }

        impl Eq for $name<'_> {}

        impl ::std::fmt::Debug for $name<'_> {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, concat!(stringify!($name), "({:?})"), self.value.raw_handle())
            }
        }
    };
}

pub(crate) use value_wrapper;
