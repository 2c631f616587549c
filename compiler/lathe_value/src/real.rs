//! Floating-point constants.
//!
//! Mirrors the integer side with one deliberate difference: floats are
//! always signed in the IEEE sense, so there is no stored signedness.
//! Conversion *to* integers takes a signedness flag per call instead —
//! the asymmetry with [`IntConstant::to_float`](crate::int::IntConstant::to_float)
//! (which uses the flag stored at construction) is inherited behavior,
//! kept intentionally and pinned by tests rather than unified.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use lathe_ir::{
    CastOp, Engine, EngineError, FloatKind, RealBinOp, RealPredicate, TypeKind, ValueHandle,
};

use crate::classify::{AnyInt, AnyReal};
use crate::constant::ConstantValue;
use crate::error::{ValueError, ValueResult};
use crate::int::Int1;
use crate::operands::UserValue;
use crate::types::Type;
use crate::value::{AnyValue, Value, Wrap};

mod sealed {
    pub trait Sealed {}
}

/// Compile-time format marker for floating-point constants.
pub trait FloatFormat: sealed::Sealed + Copy + fmt::Debug + 'static {
    /// The format of the associated IR type.
    const FORMAT: FloatKind;
}

macro_rules! float_format {
    ($(#[$meta:meta])* $name:ident, $format:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug)]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl FloatFormat for $name {
            const FORMAT: FloatKind = FloatKind::$format;
        }
    };
}

float_format!(/** 32-bit IEEE single format marker. */ SingleFormat, Single);
float_format!(/** 64-bit IEEE double format marker. */ DoubleFormat, Double);
float_format!(/** 128-bit IEEE quad format marker. */ Fp128Format, Fp128);
float_format!(/** PowerPC double-double format marker. */ PpcFp128Format, PpcFp128);
float_format!(/** x87 80-bit extended format marker. */ X86Fp80Format, X86Fp80);

/// A floating-point constant of compile-time-known format.
#[derive(Clone)]
pub struct RealConstant<'e, F: FloatFormat> {
    value: Value<'e>,
    format: PhantomData<F>,
}

/// 32-bit float constant.
pub type Float<'e> = RealConstant<'e, SingleFormat>;
/// 64-bit double constant.
pub type Double<'e> = RealConstant<'e, DoubleFormat>;
/// 128-bit quad constant.
pub type Fp128<'e> = RealConstant<'e, Fp128Format>;
/// PowerPC double-double constant.
pub type PpcFp128<'e> = RealConstant<'e, PpcFp128Format>;
/// x87 extended-precision constant.
pub type X86Fp80<'e> = RealConstant<'e, X86Fp80Format>;

impl<'e, F: FloatFormat> Wrap<'e> for RealConstant<'e, F> {
    fn from_handle(engine: &'e dyn Engine, handle: ValueHandle) -> Self {
        RealConstant {
            value: Value::from_handle(engine, handle),
            format: PhantomData,
        }
    }
}

impl<'e, F: FloatFormat> RealConstant<'e, F> {
    /// The IR type of this format.
    pub fn real_type(engine: &'e dyn Engine) -> Type<'e> {
        Type::real(engine, F::FORMAT)
    }

    /// Constant from a literal.
    pub fn new(engine: &'e dyn Engine, value: f64) -> ValueResult<Self> {
        let ty = Self::real_type(engine);
        let handle = engine.const_real(ty.handle(), value)?;
        Ok(Self::from_handle(engine, handle))
    }

    /// Constant parsed from text.
    pub fn parse(engine: &'e dyn Engine, text: &str) -> ValueResult<Self> {
        let ty = Self::real_type(engine);
        let handle = engine
            .const_real_from_string(ty.handle(), text)
            .map_err(|err| match err {
                EngineError::MalformedLiteral { .. } => {
                    ValueError::InvalidArgument("malformed floating-point literal")
                }
                other => ValueError::Engine(other),
            })?;
        Ok(Self::from_handle(engine, handle))
    }

    fn fold_binary(&self, op: RealBinOp, rhs: &Self) -> ValueResult<Self> {
        let handle = self
            .engine()
            .const_real_binary(op, self.handle(), rhs.handle())?;
        Ok(Self::from_handle(self.engine(), handle))
    }

    // -- Arithmetic (folded at construction time) --

    /// Negation.
    pub fn neg(&self) -> ValueResult<Self> {
        let handle = self.engine().const_real_neg(self.handle())?;
        Ok(Self::from_handle(self.engine(), handle))
    }

    /// Addition.
    pub fn add(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(RealBinOp::Add, rhs)
    }

    /// Subtraction.
    pub fn sub(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(RealBinOp::Sub, rhs)
    }

    /// Multiplication.
    pub fn mul(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(RealBinOp::Mul, rhs)
    }

    /// Division.
    pub fn div(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(RealBinOp::Div, rhs)
    }

    /// Remainder.
    pub fn rem(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(RealBinOp::Rem, rhs)
    }

    /// Fold a comparison; the result is an `i1` constant.
    pub fn compare(&self, predicate: RealPredicate, rhs: &Self) -> ValueResult<Int1<'e>> {
        let handle = self
            .engine()
            .const_real_compare(predicate, self.handle(), rhs.handle())?;
        Ok(Int1::wrap_with_sign(self.engine(), handle, true))
    }

    // -- Conversions --

    fn fold_conversion(&self, op: CastOp, target: Type<'e>) -> ValueResult<AnyReal<'e>> {
        let kind = target.kind()?;
        let Some(format) = FloatKind::of(kind) else {
            return Err(ValueError::TypeMismatch {
                expected: "a floating-point type",
                found: kind,
            });
        };
        let handle = self.engine().const_cast(op, self.handle(), target.handle())?;
        Ok(AnyReal::from_format(self.engine(), handle, format))
    }

    /// Width-directed cast to another floating-point type. The result is
    /// the wrapper of exactly the target format.
    pub fn cast(&self, target: Type<'e>) -> ValueResult<AnyReal<'e>> {
        self.fold_conversion(CastOp::FpCast, target)
    }

    /// Extend to a wider floating-point type.
    pub fn extend(&self, target: Type<'e>) -> ValueResult<AnyReal<'e>> {
        self.fold_conversion(CastOp::FpExtend, target)
    }

    /// Truncate to a narrower floating-point type.
    pub fn truncate(&self, target: Type<'e>) -> ValueResult<AnyReal<'e>> {
        self.fold_conversion(CastOp::FpTrunc, target)
    }

    /// Convert to a basic integer type. Signedness of the conversion is
    /// chosen per call, not stored on the receiver.
    pub fn to_integer(&self, target: Type<'e>, signed: bool) -> ValueResult<AnyInt<'e>> {
        match target.kind()? {
            TypeKind::Integer => {}
            found => {
                return Err(ValueError::TypeMismatch {
                    expected: "a basic integer type",
                    found,
                })
            }
        }
        let width = target.int_width()?;
        if !matches!(width, 1 | 8 | 16 | 32 | 64) {
            return Err(ValueError::UnsupportedWidth(width));
        }
        let op = if signed {
            CastOp::FpToSigned
        } else {
            CastOp::FpToUnsigned
        };
        let handle = self.engine().const_cast(op, self.handle(), target.handle())?;
        AnyInt::from_parts(self.engine(), handle, width, signed)
    }

    // -- Materializing reads --

    /// The numeric value at f64 precision.
    pub fn value(&self) -> ValueResult<f64> {
        Ok(self.engine().real_value(self.handle())?)
    }
}

impl<'e, F: FloatFormat> AnyValue<'e> for RealConstant<'e, F> {
    fn as_value(&self) -> &Value<'e> {
        &self.value
    }
}

impl<'e, F: FloatFormat> UserValue<'e> for RealConstant<'e, F> {}
impl<'e, F: FloatFormat> ConstantValue<'e> for RealConstant<'e, F> {}

impl<F: FloatFormat> PartialEq for RealConstant<'_, F> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<F: FloatFormat> Eq for RealConstant<'_, F> {}

impl<F: FloatFormat> Hash for RealConstant<'_, F> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<F: FloatFormat> fmt::Debug for RealConstant<'_, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", F::FORMAT, self.value.raw_handle())
    }
}
