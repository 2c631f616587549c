//! Fixed-width integer constants.
//!
//! Each supported width is a marker type implementing [`IntWidth`], so the
//! associated IR type of a constant is compile-time data and arithmetic on
//! `IntConstant<W>` closes over the receiver's width: every fold wraps its
//! result back into the same concrete width.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use lathe_ir::{
    CastOp, Engine, EngineError, FloatKind, IntBinOp, IntPredicate, IntUnaryOp, ShiftKind,
    TypeKind, ValueHandle, WrapMode,
};

use crate::classify::{AnyInt, AnyReal};
use crate::constant::ConstantValue;
use crate::error::{ValueError, ValueResult};
use crate::operands::UserValue;
use crate::pointer::PointerConstant;
use crate::types::Type;
use crate::value::{AnyValue, Value, Wrap};

mod sealed {
    pub trait Sealed {}
}

/// Compile-time width marker for integer constants.
pub trait IntWidth: sealed::Sealed + Copy + fmt::Debug + 'static {
    /// Bit width of the associated integer type.
    const BITS: u32;
}

macro_rules! int_width {
    ($(#[$meta:meta])* $name:ident, $bits:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug)]
        pub struct $name;

        impl sealed::Sealed for $name {}

        impl IntWidth for $name {
            const BITS: u32 = $bits;
        }
    };
}

int_width!(/** 1-bit width marker. */ W1, 1);
int_width!(/** 8-bit width marker. */ W8, 8);
int_width!(/** 16-bit width marker. */ W16, 16);
int_width!(/** 32-bit width marker. */ W32, 32);
int_width!(/** 64-bit width marker. */ W64, 64);

/// An integer constant of compile-time-known width.
///
/// Carries a signedness flag fixed at construction (default signed). The
/// flag picks the extension/conversion direction of every derived
/// operation — `to_float`, width casts, the literal constructors — and is
/// inherited by arithmetic results.
#[derive(Clone)]
pub struct IntConstant<'e, W: IntWidth> {
    value: Value<'e>,
    signed: bool,
    width: PhantomData<W>,
}

/// 1-bit integer constant.
pub type Int1<'e> = IntConstant<'e, W1>;
/// 8-bit integer constant.
pub type Int8<'e> = IntConstant<'e, W8>;
/// 16-bit integer constant.
pub type Int16<'e> = IntConstant<'e, W16>;
/// 32-bit integer constant.
pub type Int32<'e> = IntConstant<'e, W32>;
/// 64-bit integer constant.
pub type Int64<'e> = IntConstant<'e, W64>;

impl<'e, W: IntWidth> Wrap<'e> for IntConstant<'e, W> {
    fn from_handle(engine: &'e dyn Engine, handle: ValueHandle) -> Self {
        // Wrap-only construction leaves signedness at its default.
        Self::wrap_with_sign(engine, handle, true)
    }
}

impl<'e, W: IntWidth> IntConstant<'e, W> {
    /// The IR type of this width.
    pub fn int_type(engine: &'e dyn Engine) -> Type<'e> {
        Type::int(engine, W::BITS)
    }

    pub(crate) fn wrap_with_sign(engine: &'e dyn Engine, handle: ValueHandle, signed: bool) -> Self {
        IntConstant {
            value: Value::from_handle(engine, handle),
            signed,
            width: PhantomData,
        }
    }

    /// Signed constant from a literal.
    pub fn new(engine: &'e dyn Engine, value: i64) -> ValueResult<Self> {
        #[allow(clippy::cast_sign_loss, reason = "raw bit pattern transfer")]
        let bits = value as u64;
        Self::with_signedness(engine, bits, true)
    }

    /// Unsigned constant from a literal.
    pub fn new_unsigned(engine: &'e dyn Engine, value: u64) -> ValueResult<Self> {
        Self::with_signedness(engine, value, false)
    }

    /// Constant from a raw bit pattern with explicit signedness. The
    /// pattern is sign- or zero-extended into the width per `signed`.
    pub fn with_signedness(engine: &'e dyn Engine, bits: u64, signed: bool) -> ValueResult<Self> {
        let ty = Self::int_type(engine);
        let handle = engine.const_int(ty.handle(), bits, signed)?;
        Ok(Self::wrap_with_sign(engine, handle, signed))
    }

    /// Signed constant parsed from text in the given radix.
    pub fn parse(engine: &'e dyn Engine, text: &str, radix: u32) -> ValueResult<Self> {
        let ty = Self::int_type(engine);
        let handle = engine
            .const_int_from_string(ty.handle(), text, radix)
            .map_err(|err| match err {
                EngineError::MalformedLiteral { .. } => {
                    ValueError::InvalidArgument("malformed integer literal")
                }
                other => ValueError::Engine(other),
            })?;
        Ok(Self::wrap_with_sign(engine, handle, true))
    }

    /// The all-ones constant of this width.
    pub fn all_ones(engine: &'e dyn Engine) -> ValueResult<Self> {
        let ty = Self::int_type(engine);
        let handle = engine.const_all_ones(ty.handle())?;
        Ok(Self::wrap_with_sign(engine, handle, true))
    }

    /// The signedness fixed at construction.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    fn fold_binary(&self, op: IntBinOp, rhs: &Self) -> ValueResult<Self> {
        let handle = self
            .engine()
            .const_int_binary(op, self.handle(), rhs.handle())?;
        Ok(Self::wrap_with_sign(self.engine(), handle, self.signed))
    }

    fn fold_unary(&self, op: IntUnaryOp) -> ValueResult<Self> {
        let handle = self.engine().const_int_unary(op, self.handle())?;
        Ok(Self::wrap_with_sign(self.engine(), handle, self.signed))
    }

    // -- Arithmetic (folded at construction time) --

    /// Wrapping addition.
    pub fn add(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::Add(WrapMode::Wrapping), rhs)
    }

    /// Addition; signed overflow is an error.
    pub fn add_nsw(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::Add(WrapMode::NoSignedWrap), rhs)
    }

    /// Addition; unsigned overflow is an error.
    pub fn add_nuw(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::Add(WrapMode::NoUnsignedWrap), rhs)
    }

    /// Wrapping subtraction.
    pub fn sub(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::Sub(WrapMode::Wrapping), rhs)
    }

    /// Subtraction; signed overflow is an error.
    pub fn sub_nsw(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::Sub(WrapMode::NoSignedWrap), rhs)
    }

    /// Subtraction; unsigned overflow is an error.
    pub fn sub_nuw(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::Sub(WrapMode::NoUnsignedWrap), rhs)
    }

    /// Wrapping multiplication.
    pub fn mul(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::Mul(WrapMode::Wrapping), rhs)
    }

    /// Multiplication; signed overflow is an error.
    pub fn mul_nsw(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::Mul(WrapMode::NoSignedWrap), rhs)
    }

    /// Multiplication; unsigned overflow is an error.
    pub fn mul_nuw(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::Mul(WrapMode::NoUnsignedWrap), rhs)
    }

    /// Signed division, truncating toward zero.
    pub fn div(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::SignedDiv { exact: false }, rhs)
    }

    /// Signed division that must be exact; a nonzero remainder is an error.
    pub fn exact_signed_div(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::SignedDiv { exact: true }, rhs)
    }

    /// Unsigned division.
    pub fn unsigned_div(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::UnsignedDiv, rhs)
    }

    /// Signed remainder.
    pub fn rem(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::SignedRem, rhs)
    }

    /// Signed remainder (explicit spelling of [`IntConstant::rem`]).
    pub fn signed_rem(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::SignedRem, rhs)
    }

    /// Unsigned remainder.
    pub fn unsigned_rem(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::UnsignedRem, rhs)
    }

    /// Wrapping negation.
    pub fn neg(&self) -> ValueResult<Self> {
        self.fold_unary(IntUnaryOp::Neg(WrapMode::Wrapping))
    }

    /// Negation; signed overflow is an error.
    pub fn neg_nsw(&self) -> ValueResult<Self> {
        self.fold_unary(IntUnaryOp::Neg(WrapMode::NoSignedWrap))
    }

    /// Negation; unsigned overflow is an error.
    pub fn neg_nuw(&self) -> ValueResult<Self> {
        self.fold_unary(IntUnaryOp::Neg(WrapMode::NoUnsignedWrap))
    }

    /// Bitwise complement.
    pub fn not(&self) -> ValueResult<Self> {
        self.fold_unary(IntUnaryOp::Not)
    }

    /// Bitwise and.
    pub fn and(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::And, rhs)
    }

    /// Bitwise or.
    pub fn or(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::Or, rhs)
    }

    /// Bitwise xor.
    pub fn xor(&self, rhs: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::Xor, rhs)
    }

    /// Shift left by `amount` bits.
    pub fn shift_left(&self, amount: &Self) -> ValueResult<Self> {
        self.fold_binary(IntBinOp::ShiftLeft, amount)
    }

    /// Shift right by `amount` bits, sign- or zero-filling per `kind`.
    pub fn shift_right(&self, amount: &Self, kind: ShiftKind) -> ValueResult<Self> {
        let op = match kind {
            ShiftKind::Arithmetic => IntBinOp::ArithmeticShiftRight,
            ShiftKind::Logical => IntBinOp::LogicalShiftRight,
        };
        self.fold_binary(op, amount)
    }

    /// Fold a comparison; the result is an `i1` constant.
    pub fn compare(&self, predicate: IntPredicate, rhs: &Self) -> ValueResult<Int1<'e>> {
        let handle = self
            .engine()
            .const_int_compare(predicate, self.handle(), rhs.handle())?;
        Ok(Int1::wrap_with_sign(self.engine(), handle, true))
    }

    // -- Conversions --

    /// Width-directed cast to another fixed-width integer type. The result
    /// is the wrapper of exactly the target width, never the receiver's.
    pub fn cast(&self, target: Type<'e>, signed: bool) -> ValueResult<AnyInt<'e>> {
        match target.kind()? {
            TypeKind::Integer => {}
            found => {
                return Err(ValueError::TypeMismatch {
                    expected: "an integer type",
                    found,
                })
            }
        }
        // Locate the target wrapper before delegating, so an unsupported
        // width never reaches the engine.
        let width = target.int_width()?;
        if !matches!(width, 1 | 8 | 16 | 32 | 64) {
            return Err(ValueError::UnsupportedWidth(width));
        }
        let handle =
            self.engine()
                .const_cast(CastOp::IntCast { signed }, self.handle(), target.handle())?;
        AnyInt::from_parts(self.engine(), handle, width, signed)
    }

    /// Convert to a floating-point type. The conversion direction
    /// (signed or unsigned) follows the signedness stored at construction.
    pub fn to_float(&self, target: Type<'e>) -> ValueResult<AnyReal<'e>> {
        let kind = target.kind()?;
        let Some(format) = FloatKind::of(kind) else {
            return Err(ValueError::TypeMismatch {
                expected: "a floating-point type",
                found: kind,
            });
        };
        let op = if self.signed {
            CastOp::SignedToFp
        } else {
            CastOp::UnsignedToFp
        };
        let handle = self.engine().const_cast(op, self.handle(), target.handle())?;
        Ok(AnyReal::from_format(self.engine(), handle, format))
    }

    /// Convert to a pointer type.
    pub fn to_pointer(&self, target: Type<'e>) -> ValueResult<PointerConstant<'e>> {
        let handle =
            self.engine()
                .const_cast(CastOp::IntToPointer, self.handle(), target.handle())?;
        Ok(PointerConstant::from_handle(self.engine(), handle))
    }

    // -- Materializing reads --

    /// The numeric value, sign-extended to 64 bits.
    pub fn sign_extended_value(&self) -> ValueResult<i64> {
        Ok(self.engine().int_sign_extended_value(self.handle())?)
    }

    /// The numeric value, zero-extended to 64 bits.
    pub fn zero_extended_value(&self) -> ValueResult<u64> {
        Ok(self.engine().int_zero_extended_value(self.handle())?)
    }
}

impl<'e> Int1<'e> {
    /// The true constant. Uniqued by the engine: every call for the same
    /// engine observes the same underlying constant.
    pub fn const_true(engine: &'e dyn Engine) -> ValueResult<Self> {
        let ty = Self::int_type(engine);
        let handle = engine.const_int(ty.handle(), 1, false)?;
        Ok(Self::wrap_with_sign(engine, handle, true))
    }

    /// The false constant.
    pub fn const_false(engine: &'e dyn Engine) -> ValueResult<Self> {
        let ty = Self::int_type(engine);
        let handle = engine.const_int(ty.handle(), 0, false)?;
        Ok(Self::wrap_with_sign(engine, handle, true))
    }
}

impl<'e, W: IntWidth> AnyValue<'e> for IntConstant<'e, W> {
    fn as_value(&self) -> &Value<'e> {
        &self.value
    }
}

impl<'e, W: IntWidth> UserValue<'e> for IntConstant<'e, W> {}
impl<'e, W: IntWidth> ConstantValue<'e> for IntConstant<'e, W> {}

impl<W: IntWidth> PartialEq for IntConstant<'_, W> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<W: IntWidth> Eq for IntConstant<'_, W> {}

impl<W: IntWidth> Hash for IntConstant<'_, W> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<W: IntWidth> fmt::Debug for IntConstant<'_, W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Int{}({:?})", W::BITS, self.value.raw_handle())
    }
}
