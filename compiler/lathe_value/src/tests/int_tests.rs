use lathe_ir::{EngineError, FloatKind, IntPredicate, ShiftKind, TypeKind};
use pretty_assertions::assert_eq;

use crate::classify::{AnyInt, AnyReal};
use crate::error::ValueError;
use crate::int::{Int1, Int16, Int32, Int64, Int8};
use crate::tests::engine;
use crate::types::Type;
use crate::value::AnyValue;

#[test]
fn addition_folds_at_construction() {
    let engine = engine();
    let three = Int32::new(&engine, 3).unwrap();
    let four = Int32::new(&engine, 4).unwrap();
    let sum = three.add(&four).unwrap();
    assert_eq!(sum.sign_extended_value().unwrap(), 7);
}

#[test]
fn wrapping_add_wraps_silently() {
    let engine = engine();
    let max = Int8::new(&engine, 127).unwrap();
    let one = Int8::new(&engine, 1).unwrap();
    let wrapped = max.add(&one).unwrap();
    assert_eq!(wrapped.sign_extended_value().unwrap(), -128);
}

#[test]
fn nsw_add_in_range_and_flagged_overflow() {
    let engine = engine();
    let one = Int8::new(&engine, 1).unwrap();

    // Safe case folds normally.
    let hundred = Int8::new(&engine, 100).unwrap();
    assert_eq!(hundred.add_nsw(&one).unwrap().sign_extended_value().unwrap(), 101);

    // 127 + 1 overflows i8 under no-signed-wrap: the engine flags it.
    let max = Int8::new(&engine, 127).unwrap();
    assert_eq!(
        max.add_nsw(&one).unwrap_err(),
        ValueError::Engine(EngineError::SignedWrap { op: "add nsw" })
    );
}

#[test]
fn nuw_arithmetic_flags_unsigned_overflow() {
    let engine = engine();
    let big = Int8::new_unsigned(&engine, 255).unwrap();
    let one = Int8::new_unsigned(&engine, 1).unwrap();
    assert!(matches!(
        big.add_nuw(&one).unwrap_err(),
        ValueError::Engine(EngineError::UnsignedWrap { .. })
    ));
    let two = Int8::new_unsigned(&engine, 2).unwrap();
    assert!(matches!(
        one.sub_nuw(&two).unwrap_err(),
        ValueError::Engine(EngineError::UnsignedWrap { .. })
    ));
}

#[test]
fn division_family() {
    let engine = engine();
    let seven = Int32::new(&engine, 7).unwrap();
    let two = Int32::new(&engine, 2).unwrap();
    let zero = Int32::new(&engine, 0).unwrap();

    assert_eq!(seven.div(&two).unwrap().sign_extended_value().unwrap(), 3);
    assert_eq!(
        seven.div(&zero).unwrap_err(),
        ValueError::Engine(EngineError::DivisionByZero)
    );
    assert_eq!(
        seven.exact_signed_div(&two).unwrap_err(),
        ValueError::Engine(EngineError::InexactDivision)
    );
    let eight = Int32::new(&engine, 8).unwrap();
    assert_eq!(
        eight.exact_signed_div(&two).unwrap().sign_extended_value().unwrap(),
        4
    );

    // Signed vs unsigned division of the same bit pattern.
    let minus_seven = Int8::new(&engine, -7).unwrap();
    let two8 = Int8::new(&engine, 2).unwrap();
    assert_eq!(minus_seven.div(&two8).unwrap().sign_extended_value().unwrap(), -3);
    assert_eq!(
        minus_seven
            .unsigned_div(&two8)
            .unwrap()
            .zero_extended_value()
            .unwrap(),
        249 / 2
    );
}

#[test]
fn remainder_family() {
    let engine = engine();
    let minus_seven = Int8::new(&engine, -7).unwrap();
    let two = Int8::new(&engine, 2).unwrap();
    assert_eq!(minus_seven.rem(&two).unwrap().sign_extended_value().unwrap(), -1);
    assert_eq!(
        minus_seven.signed_rem(&two).unwrap().sign_extended_value().unwrap(),
        -1
    );
    assert_eq!(
        minus_seven
            .unsigned_rem(&two)
            .unwrap()
            .zero_extended_value()
            .unwrap(),
        1
    );
}

#[test]
fn negate_and_bitwise() {
    let engine = engine();
    let five = Int8::new(&engine, 5).unwrap();
    assert_eq!(five.neg().unwrap().sign_extended_value().unwrap(), -5);
    assert_eq!(five.not().unwrap().sign_extended_value().unwrap(), !5);

    let min = Int8::new(&engine, -128).unwrap();
    assert!(matches!(
        min.neg_nsw().unwrap_err(),
        ValueError::Engine(EngineError::SignedWrap { .. })
    ));

    let mask = Int8::new(&engine, 0b1100).unwrap();
    let bits = Int8::new(&engine, 0b1010).unwrap();
    assert_eq!(mask.and(&bits).unwrap().zero_extended_value().unwrap(), 0b1000);
    assert_eq!(mask.or(&bits).unwrap().zero_extended_value().unwrap(), 0b1110);
    assert_eq!(mask.xor(&bits).unwrap().zero_extended_value().unwrap(), 0b0110);
}

#[test]
fn shifts_choose_fill_by_mode() {
    let engine = engine();
    let negative = Int8::new(&engine, -16).unwrap();
    let two = Int8::new(&engine, 2).unwrap();

    let arithmetic = negative.shift_right(&two, ShiftKind::Arithmetic).unwrap();
    assert_eq!(arithmetic.sign_extended_value().unwrap(), -4);

    let logical = negative.shift_right(&two, ShiftKind::Logical).unwrap();
    assert_eq!(logical.zero_extended_value().unwrap(), 0b0011_1100);

    let one = Int8::new(&engine, 1).unwrap();
    let three = Int8::new(&engine, 3).unwrap();
    assert_eq!(one.shift_left(&three).unwrap().zero_extended_value().unwrap(), 8);
}

#[test]
fn compare_yields_int1() {
    let engine = engine();
    let minus_one = Int8::new(&engine, -1).unwrap();
    let one = Int8::new(&engine, 1).unwrap();

    let signed = minus_one.compare(IntPredicate::SignedLess, &one).unwrap();
    assert_eq!(signed.zero_extended_value().unwrap(), 1);

    // The same bit pattern is large unsigned.
    let unsigned = minus_one.compare(IntPredicate::UnsignedLess, &one).unwrap();
    assert_eq!(unsigned.zero_extended_value().unwrap(), 0);
}

#[test]
fn all_ones_constructor() {
    let engine = engine();
    let ones = Int16::all_ones(&engine).unwrap();
    assert_eq!(ones.zero_extended_value().unwrap(), 0xFFFF);
    assert_eq!(ones.sign_extended_value().unwrap(), -1);
}

#[test]
fn parse_accepts_radix_and_rejects_garbage() {
    let engine = engine();
    let hex = Int32::parse(&engine, "ff", 16).unwrap();
    assert_eq!(hex.sign_extended_value().unwrap(), 255);
    let negative = Int32::parse(&engine, "-10", 10).unwrap();
    assert_eq!(negative.sign_extended_value().unwrap(), -10);
    assert_eq!(
        Int32::parse(&engine, "not-a-number", 10).unwrap_err(),
        ValueError::InvalidArgument("malformed integer literal")
    );
}

#[test]
fn cast_resolves_to_exactly_the_target_width() {
    let engine = engine();
    let minus_one = Int32::new(&engine, -1).unwrap();

    let narrowed = minus_one.cast(Type::int(&engine, 8), true).unwrap();
    let AnyInt::Int8(byte) = narrowed else {
        panic!("cast to i8 produced a non-i8 wrapper");
    };
    assert_eq!(byte.sign_extended_value().unwrap(), -1);

    let widened_signed = byte.cast(Type::int(&engine, 64), true).unwrap();
    let AnyInt::Int64(word) = widened_signed else {
        panic!("cast to i64 produced a non-i64 wrapper");
    };
    assert_eq!(word.sign_extended_value().unwrap(), -1);

    // Unsigned widening zero-extends the same pattern.
    let widened_unsigned = byte.cast(Type::int(&engine, 64), false).unwrap();
    assert_eq!(widened_unsigned.zero_extended_value().unwrap(), 0xFF);

    let bool_cast = minus_one.cast(Type::int(&engine, 1), true).unwrap();
    assert!(matches!(bool_cast, AnyInt::Int1(_)));

    assert_eq!(
        minus_one
            .cast(Type::real(&engine, FloatKind::Double), true)
            .unwrap_err(),
        ValueError::TypeMismatch {
            expected: "an integer type",
            found: TypeKind::Double,
        }
    );
}

#[test]
fn to_float_uses_stored_signedness() {
    let engine = engine();
    let double_ty = Type::real(&engine, FloatKind::Double);

    // The same 0xFF bit pattern converts differently per the signedness
    // fixed at construction.
    let signed = Int8::new(&engine, -1).unwrap();
    let as_signed = signed.to_float(double_ty).unwrap();
    assert_eq!(as_signed.value().unwrap(), -1.0);

    let unsigned = Int8::new_unsigned(&engine, 0xFF).unwrap();
    let as_unsigned = unsigned.to_float(double_ty).unwrap();
    assert_eq!(as_unsigned.value().unwrap(), 255.0);

    assert!(matches!(as_signed, AnyReal::Double(_)));

    assert_eq!(
        signed.to_float(Type::int(&engine, 32)).unwrap_err(),
        ValueError::TypeMismatch {
            expected: "a floating-point type",
            found: TypeKind::Integer,
        }
    );
}

#[test]
fn to_pointer_produces_a_pointer_constant() {
    let engine = engine();
    let ptr_ty = Type::int(&engine, 8).pointer_to();

    let addr = Int64::new(&engine, 0x1000).unwrap();
    let pointer = addr.to_pointer(ptr_ty).unwrap();
    assert_eq!(pointer.ty().unwrap().kind().unwrap(), TypeKind::Pointer);
    assert!(!pointer.is_null().unwrap());

    let zero = Int64::new(&engine, 0).unwrap();
    assert!(zero.to_pointer(ptr_ty).unwrap().is_null().unwrap());
}

#[test]
fn arithmetic_preserves_signedness() {
    let engine = engine();
    let unsigned = Int32::new_unsigned(&engine, 5).unwrap();
    let other = Int32::new_unsigned(&engine, 2).unwrap();
    assert!(!unsigned.add(&other).unwrap().is_signed());
    assert!(Int32::new(&engine, 5).unwrap().is_signed());
}

#[test]
fn boolean_singletons_share_identity() {
    let engine = engine();
    assert_eq!(Int1::const_true(&engine).unwrap(), Int1::const_true(&engine).unwrap());
    assert_eq!(Int1::const_false(&engine).unwrap(), Int1::const_false(&engine).unwrap());
    assert_ne!(Int1::const_true(&engine).unwrap(), Int1::const_false(&engine).unwrap());
    assert_eq!(
        Int1::const_true(&engine).unwrap().zero_extended_value().unwrap(),
        1
    );
}
