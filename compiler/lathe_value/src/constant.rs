//! Constant capability and the nullary constant leaves.

use lathe_ir::{Engine, EngineResult, TypeHandle, ValueHandle};
use smallvec::SmallVec;

use crate::error::ValueResult;
use crate::pointer::PointerConstant;
use crate::types::Type;
use crate::value::{value_wrapper, AnyValue, Wrap};

use crate::operands::UserValue;

/// Operations available on every constant value.
pub trait ConstantValue<'e>: UserValue<'e> {
    /// Constant GEP over this value with the given constant indices.
    ///
    /// Indices are forwarded as-is; whether each is a constant of a kind
    /// the engine accepts is the engine's check, not repeated here.
    fn get_element_pointer(
        &self,
        indices: &[&dyn AnyValue<'e>],
    ) -> ValueResult<PointerConstant<'e>> {
        fold_gep(self.engine(), self.handle(), indices, false)
    }

    /// Constant GEP with the in-bounds guarantee asserted.
    fn get_element_pointer_in_bounds(
        &self,
        indices: &[&dyn AnyValue<'e>],
    ) -> ValueResult<PointerConstant<'e>> {
        fold_gep(self.engine(), self.handle(), indices, true)
    }
}

fn fold_gep<'e>(
    engine: &'e dyn Engine,
    base: ValueHandle,
    indices: &[&dyn AnyValue<'e>],
    in_bounds: bool,
) -> ValueResult<PointerConstant<'e>> {
    let packed: SmallVec<[ValueHandle; 8]> = indices.iter().map(|v| v.handle()).collect();
    let handle = engine.const_gep(base, &packed, in_bounds)?;
    Ok(PointerConstant::from_handle(engine, handle))
}

/// Compile-time descriptor naming the engine entry point that builds a
/// nullary constant variant from a type.
///
/// Each nullary leaf carries one of these as an associated constant, so the
/// variant-to-entry-point mapping is data fixed at compile time rather than
/// anything resolved at call time.
pub struct NullaryCtor {
    /// Mnemonic, for diagnostics.
    pub name: &'static str,
    /// The engine entry point.
    pub build: fn(&dyn Engine, TypeHandle) -> EngineResult<ValueHandle>,
}

fn build_null(engine: &dyn Engine, ty: TypeHandle) -> EngineResult<ValueHandle> {
    engine.const_null(ty)
}

fn build_pointer_null(engine: &dyn Engine, ty: TypeHandle) -> EngineResult<ValueHandle> {
    engine.const_pointer_null(ty)
}

fn build_undef(engine: &dyn Engine, ty: TypeHandle) -> EngineResult<ValueHandle> {
    engine.const_undef(ty)
}

macro_rules! nullary_constant {
    ($(#[$meta:meta])* $name:ident, $ctor_name:literal, $build:ident) => {
        value_wrapper! {
            $(#[$meta])*
            $name
        }

        impl<'e> $name<'e> {
            /// Descriptor for the engine entry point this variant builds
            /// through.
            pub const CTOR: NullaryCtor = NullaryCtor {
                name: $ctor_name,
                build: $build,
            };

            /// Build the constant of the given type.
            pub fn of(ty: Type<'e>) -> ValueResult<Self> {
                let handle = (Self::CTOR.build)(ty.engine(), ty.handle())?;
                Ok(Self::from_handle(ty.engine(), handle))
            }
        }

        impl<'e> UserValue<'e> for $name<'e> {}
        impl<'e> ConstantValue<'e> for $name<'e> {}
    };
}

nullary_constant! {
    /// The null/zero constant of a type.
    ConstantNull, "null", build_null
}

nullary_constant! {
    /// The null pointer constant of a pointer type.
    ConstantNullPointer, "pointer-null", build_pointer_null
}

nullary_constant! {
    /// The undefined constant of a type.
    ConstantUndef, "undef", build_undef
}
