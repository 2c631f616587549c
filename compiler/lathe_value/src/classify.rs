//! Classification of raw handles into concrete wrappers.
//!
//! The dispatch from a runtime type-kind tag onto the concrete wrapper set
//! is a single exhaustive match: every [`TypeKind`] has an arm, and the
//! unsupported kind (`Metadata`) fails explicitly instead of falling
//! through to a wrong wrapper.

use lathe_ir::{Engine, FloatKind, TypeKind, ValueHandle};
use tracing::trace;

use crate::aggregate::{ConstantArray, ConstantStruct, ConstantVector};
use crate::error::{ValueError, ValueResult};
use crate::int::{Int1, Int16, Int32, Int64, Int8, IntConstant};
use crate::pointer::PointerConstant;
use crate::real::{Double, Float, Fp128, PpcFp128, RealConstant, X86Fp80};
use crate::value::{AnyValue, Value, Wrap};

/// A classified value: one variant per representable type kind.
#[derive(Clone, Debug)]
pub enum AnyValueEnum<'e> {
    Array(ConstantArray<'e>),
    Vector(ConstantVector<'e>),
    Struct(ConstantStruct<'e>),
    Int(AnyInt<'e>),
    Real(AnyReal<'e>),
    Pointer(PointerConstant<'e>),
    /// Function values keep the root wrapper; their call-level surface
    /// belongs to the surrounding tooling, not this layer.
    Function(Value<'e>),
    Label(Value<'e>),
    Void(Value<'e>),
    X86Mmx(Value<'e>),
}

impl<'e> AnyValueEnum<'e> {
    /// The wrapped value, as the shared seam type.
    pub fn as_any(&self) -> &dyn AnyValue<'e> {
        match self {
            AnyValueEnum::Array(v) => v,
            AnyValueEnum::Vector(v) => v,
            AnyValueEnum::Struct(v) => v,
            AnyValueEnum::Int(v) => v.as_any(),
            AnyValueEnum::Real(v) => v.as_any(),
            AnyValueEnum::Pointer(v) => v,
            AnyValueEnum::Function(v)
            | AnyValueEnum::Label(v)
            | AnyValueEnum::Void(v)
            | AnyValueEnum::X86Mmx(v) => v,
        }
    }
}

/// An integer constant of engine-determined width, as a closed sum over the
/// fixed wrapper set.
#[derive(Clone, Debug)]
pub enum AnyInt<'e> {
    Int1(Int1<'e>),
    Int8(Int8<'e>),
    Int16(Int16<'e>),
    Int32(Int32<'e>),
    Int64(Int64<'e>),
}

impl<'e> AnyInt<'e> {
    /// Wrap `handle` as the fixed-width wrapper for `width`.
    ///
    /// This is the width-to-constructor mapping: a match resolved at
    /// compile time, with widths outside the wrapper set failing rather
    /// than producing a mistyped wrapper.
    pub fn from_parts(
        engine: &'e dyn Engine,
        handle: ValueHandle,
        width: u32,
        signed: bool,
    ) -> ValueResult<Self> {
        let wrapped = match width {
            1 => AnyInt::Int1(IntConstant::wrap_with_sign(engine, handle, signed)),
            8 => AnyInt::Int8(IntConstant::wrap_with_sign(engine, handle, signed)),
            16 => AnyInt::Int16(IntConstant::wrap_with_sign(engine, handle, signed)),
            32 => AnyInt::Int32(IntConstant::wrap_with_sign(engine, handle, signed)),
            64 => AnyInt::Int64(IntConstant::wrap_with_sign(engine, handle, signed)),
            other => return Err(ValueError::UnsupportedWidth(other)),
        };
        Ok(wrapped)
    }

    /// Bit width of the wrapped constant.
    pub fn width(&self) -> u32 {
        match self {
            AnyInt::Int1(_) => 1,
            AnyInt::Int8(_) => 8,
            AnyInt::Int16(_) => 16,
            AnyInt::Int32(_) => 32,
            AnyInt::Int64(_) => 64,
        }
    }

    /// The wrapped value, as the shared seam type.
    pub fn as_any(&self) -> &dyn AnyValue<'e> {
        match self {
            AnyInt::Int1(v) => v,
            AnyInt::Int8(v) => v,
            AnyInt::Int16(v) => v,
            AnyInt::Int32(v) => v,
            AnyInt::Int64(v) => v,
        }
    }

    /// The sign-extended numeric value, regardless of width.
    pub fn sign_extended_value(&self) -> ValueResult<i64> {
        match self {
            AnyInt::Int1(v) => v.sign_extended_value(),
            AnyInt::Int8(v) => v.sign_extended_value(),
            AnyInt::Int16(v) => v.sign_extended_value(),
            AnyInt::Int32(v) => v.sign_extended_value(),
            AnyInt::Int64(v) => v.sign_extended_value(),
        }
    }

    /// The zero-extended numeric value, regardless of width.
    pub fn zero_extended_value(&self) -> ValueResult<u64> {
        match self {
            AnyInt::Int1(v) => v.zero_extended_value(),
            AnyInt::Int8(v) => v.zero_extended_value(),
            AnyInt::Int16(v) => v.zero_extended_value(),
            AnyInt::Int32(v) => v.zero_extended_value(),
            AnyInt::Int64(v) => v.zero_extended_value(),
        }
    }
}

/// A floating constant of engine-determined format.
#[derive(Clone, Debug)]
pub enum AnyReal<'e> {
    Float(Float<'e>),
    Double(Double<'e>),
    Fp128(Fp128<'e>),
    PpcFp128(PpcFp128<'e>),
    X86Fp80(X86Fp80<'e>),
}

impl<'e> AnyReal<'e> {
    /// Wrap `handle` as the wrapper for `format`. Total: every format has
    /// a wrapper.
    pub fn from_format(engine: &'e dyn Engine, handle: ValueHandle, format: FloatKind) -> Self {
        match format {
            FloatKind::Single => AnyReal::Float(RealConstant::from_handle(engine, handle)),
            FloatKind::Double => AnyReal::Double(RealConstant::from_handle(engine, handle)),
            FloatKind::Fp128 => AnyReal::Fp128(RealConstant::from_handle(engine, handle)),
            FloatKind::PpcFp128 => AnyReal::PpcFp128(RealConstant::from_handle(engine, handle)),
            FloatKind::X86Fp80 => AnyReal::X86Fp80(RealConstant::from_handle(engine, handle)),
        }
    }

    /// The format of the wrapped constant.
    pub fn format(&self) -> FloatKind {
        match self {
            AnyReal::Float(_) => FloatKind::Single,
            AnyReal::Double(_) => FloatKind::Double,
            AnyReal::Fp128(_) => FloatKind::Fp128,
            AnyReal::PpcFp128(_) => FloatKind::PpcFp128,
            AnyReal::X86Fp80(_) => FloatKind::X86Fp80,
        }
    }

    /// The wrapped value, as the shared seam type.
    pub fn as_any(&self) -> &dyn AnyValue<'e> {
        match self {
            AnyReal::Float(v) => v,
            AnyReal::Double(v) => v,
            AnyReal::Fp128(v) => v,
            AnyReal::PpcFp128(v) => v,
            AnyReal::X86Fp80(v) => v,
        }
    }

    /// The numeric value at f64 precision, regardless of format.
    pub fn value(&self) -> ValueResult<f64> {
        match self {
            AnyReal::Float(v) => v.value(),
            AnyReal::Double(v) => v.value(),
            AnyReal::Fp128(v) => v.value(),
            AnyReal::PpcFp128(v) => v.value(),
            AnyReal::X86Fp80(v) => v.value(),
        }
    }
}

/// Classify a raw handle into its concrete wrapper.
///
/// Total and deterministic over the supported kinds; `Metadata` fails with
/// [`ValueError::UnrepresentableType`], and integer widths outside the
/// fixed set fail with [`ValueError::UnsupportedWidth`]. Wrap-only: no
/// constant is created, the handle is decorated in place.
pub fn classify<'e>(engine: &'e dyn Engine, handle: ValueHandle) -> ValueResult<AnyValueEnum<'e>> {
    let ty = engine.type_of(handle)?;
    let kind = engine.type_kind(ty)?;
    trace!(?handle, ?kind, "classify");
    let classified = match kind {
        TypeKind::Array => AnyValueEnum::Array(ConstantArray::from_handle(engine, handle)),
        TypeKind::Vector => AnyValueEnum::Vector(ConstantVector::from_handle(engine, handle)),
        TypeKind::Struct => AnyValueEnum::Struct(ConstantStruct::from_handle(engine, handle)),
        TypeKind::Integer => {
            let width = engine.int_width(ty)?;
            AnyValueEnum::Int(AnyInt::from_parts(engine, handle, width, true)?)
        }
        TypeKind::Float => {
            AnyValueEnum::Real(AnyReal::from_format(engine, handle, FloatKind::Single))
        }
        TypeKind::Double => {
            AnyValueEnum::Real(AnyReal::from_format(engine, handle, FloatKind::Double))
        }
        TypeKind::Fp128 => {
            AnyValueEnum::Real(AnyReal::from_format(engine, handle, FloatKind::Fp128))
        }
        TypeKind::PpcFp128 => {
            AnyValueEnum::Real(AnyReal::from_format(engine, handle, FloatKind::PpcFp128))
        }
        TypeKind::X86Fp80 => {
            AnyValueEnum::Real(AnyReal::from_format(engine, handle, FloatKind::X86Fp80))
        }
        TypeKind::Pointer => AnyValueEnum::Pointer(PointerConstant::from_handle(engine, handle)),
        TypeKind::Function => AnyValueEnum::Function(Value::from_handle(engine, handle)),
        TypeKind::Label => AnyValueEnum::Label(Value::from_handle(engine, handle)),
        TypeKind::Void => AnyValueEnum::Void(Value::from_handle(engine, handle)),
        TypeKind::X86Mmx => AnyValueEnum::X86Mmx(Value::from_handle(engine, handle)),
        TypeKind::Metadata => return Err(ValueError::UnrepresentableType(TypeKind::Metadata)),
    };
    Ok(classified)
}
