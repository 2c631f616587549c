use lathe_ir::{EngineError, FloatKind, RealPredicate, TypeKind};
use pretty_assertions::assert_eq;

use crate::classify::{AnyInt, AnyReal};
use crate::error::ValueError;
use crate::real::{Double, Float};
use crate::tests::engine;
use crate::types::Type;

#[test]
fn arithmetic_folds_at_construction() {
    let engine = engine();
    let a = Double::new(&engine, 2.5).unwrap();
    let b = Double::new(&engine, 0.5).unwrap();

    assert_eq!(a.add(&b).unwrap().value().unwrap(), 3.0);
    assert_eq!(a.sub(&b).unwrap().value().unwrap(), 2.0);
    assert_eq!(a.mul(&b).unwrap().value().unwrap(), 1.25);
    assert_eq!(a.div(&b).unwrap().value().unwrap(), 5.0);
    assert_eq!(a.rem(&b).unwrap().value().unwrap(), 0.0);
    assert_eq!(a.neg().unwrap().value().unwrap(), -2.5);
}

#[test]
fn ieee_division_by_zero_is_infinite_not_an_error() {
    let engine = engine();
    let one = Double::new(&engine, 1.0).unwrap();
    let zero = Double::new(&engine, 0.0).unwrap();
    assert_eq!(one.div(&zero).unwrap().value().unwrap(), f64::INFINITY);
}

#[test]
fn compare_yields_int1_with_nan_semantics() {
    let engine = engine();
    let one = Double::new(&engine, 1.0).unwrap();
    let two = Double::new(&engine, 2.0).unwrap();
    let nan = Double::new(&engine, f64::NAN).unwrap();

    let less = one.compare(RealPredicate::OrderedLess, &two).unwrap();
    assert_eq!(less.zero_extended_value().unwrap(), 1);

    let ordered_with_nan = one.compare(RealPredicate::OrderedEq, &nan).unwrap();
    assert_eq!(ordered_with_nan.zero_extended_value().unwrap(), 0);

    let unordered = one.compare(RealPredicate::Unordered, &nan).unwrap();
    assert_eq!(unordered.zero_extended_value().unwrap(), 1);
}

#[test]
fn parse_and_reject_garbage() {
    let engine = engine();
    let parsed = Double::parse(&engine, "2.5").unwrap();
    assert_eq!(parsed.value().unwrap(), 2.5);
    assert_eq!(
        Double::parse(&engine, "two point five").unwrap_err(),
        ValueError::InvalidArgument("malformed floating-point literal")
    );
}

#[test]
fn single_precision_rounds_to_format() {
    let engine = engine();
    let tenth = Float::new(&engine, 0.1).unwrap();
    assert_eq!(tenth.value().unwrap(), f64::from(0.1f32));
}

#[test]
fn conversions_resolve_to_exactly_the_target_format() {
    let engine = engine();
    let double = Double::new(&engine, 1.5).unwrap();

    let narrowed = double.truncate(Type::real(&engine, FloatKind::Single)).unwrap();
    let AnyReal::Float(single) = narrowed else {
        panic!("fptrunc to float produced a non-float wrapper");
    };
    assert_eq!(single.value().unwrap(), 1.5);

    let widened = single.extend(Type::real(&engine, FloatKind::Fp128)).unwrap();
    assert!(matches!(widened, AnyReal::Fp128(_)));

    let recast = double.cast(Type::real(&engine, FloatKind::X86Fp80)).unwrap();
    assert_eq!(recast.format(), FloatKind::X86Fp80);

    // Extending to a narrower format is rejected by the engine.
    assert!(matches!(
        double.extend(Type::real(&engine, FloatKind::Single)).unwrap_err(),
        ValueError::Engine(EngineError::IncompatibleOperands { .. })
    ));

    // A non-floating target is a category error caught before delegation.
    assert_eq!(
        double.cast(Type::int(&engine, 64)).unwrap_err(),
        ValueError::TypeMismatch {
            expected: "a floating-point type",
            found: TypeKind::Integer,
        }
    );
}

#[test]
fn to_integer_takes_signedness_per_call() {
    let engine = engine();
    let i8_ty = Type::int(&engine, 8);

    // One receiver, two calls, opposite flags: 200 fits u8, overflows i8.
    let two_hundred = Double::new(&engine, 200.5).unwrap();
    let unsigned = two_hundred.to_integer(i8_ty, false).unwrap();
    assert_eq!(unsigned.zero_extended_value().unwrap(), 200);
    assert!(matches!(unsigned, AnyInt::Int8(_)));
    assert!(matches!(
        two_hundred.to_integer(i8_ty, true).unwrap_err(),
        ValueError::Engine(EngineError::IncompatibleOperands { .. })
    ));

    let minus_one = Double::new(&engine, -1.0).unwrap();
    let signed = minus_one.to_integer(Type::int(&engine, 32), true).unwrap();
    assert_eq!(signed.sign_extended_value().unwrap(), -1);

    assert_eq!(
        minus_one
            .to_integer(Type::real(&engine, FloatKind::Double), true)
            .unwrap_err(),
        ValueError::TypeMismatch {
            expected: "a basic integer type",
            found: TypeKind::Double,
        }
    );
}

#[test]
fn signedness_convention_asymmetry_is_preserved() {
    // Integer-to-float direction comes from the flag stored at
    // construction; float-to-integer direction is an argument of the call.
    // Both conversions of the "same" quantity below succeed only because
    // each side's convention is honored independently.
    let engine = engine();
    let unsigned_byte = crate::int::Int8::new_unsigned(&engine, 0xFF).unwrap();
    let as_float = unsigned_byte
        .to_float(Type::real(&engine, FloatKind::Double))
        .unwrap();
    assert_eq!(as_float.value().unwrap(), 255.0);

    let AnyReal::Double(round_trip) = as_float else {
        panic!("double target produced a non-double wrapper");
    };
    let back = round_trip.to_integer(Type::int(&engine, 8), false).unwrap();
    assert_eq!(back.zero_extended_value().unwrap(), 0xFF);
    // The stored flag of the source plays no role on the way back: asking
    // for a signed conversion of 255.0 into i8 fails instead of consulting
    // any receiver state.
    assert!(round_trip.to_integer(Type::int(&engine, 8), true).is_err());
}
