use lathe_ir::{Engine, EngineError, TypeKind};
use pretty_assertions::assert_eq;

use crate::constant::{ConstantNull, ConstantNullPointer, ConstantUndef, ConstantValue};
use crate::error::ValueError;
use crate::int::Int32;
use crate::operands::UserValue;
use crate::tests::engine;
use crate::types::Type;
use crate::value::AnyValue;

#[test]
fn nullary_descriptors_name_their_entry_points() {
    assert_eq!(ConstantNull::CTOR.name, "null");
    assert_eq!(ConstantNullPointer::CTOR.name, "pointer-null");
    assert_eq!(ConstantUndef::CTOR.name, "undef");
}

#[test]
fn null_of_a_type_is_its_zero() {
    let engine = engine();
    let null = ConstantNull::of(Type::int(&engine, 32)).unwrap();
    assert!(null.is_null().unwrap());
    assert_eq!(engine.int_sign_extended_value(null.handle()).unwrap(), 0);
}

#[test]
fn pointer_null_requires_a_pointer_type() {
    let engine = engine();
    let ptr_ty = Type::int(&engine, 8).pointer_to();
    let null = ConstantNullPointer::of(ptr_ty).unwrap();
    assert!(null.is_null().unwrap());
    assert_eq!(null.ty().unwrap().kind().unwrap(), TypeKind::Pointer);

    assert!(matches!(
        ConstantNullPointer::of(Type::int(&engine, 8)).unwrap_err(),
        ValueError::Engine(EngineError::IncompatibleOperands { .. })
    ));
}

#[test]
fn undef_is_undefined_for_any_type() {
    let engine = engine();
    let undef = ConstantUndef::of(Type::void(&engine)).unwrap();
    assert!(undef.is_undefined().unwrap());
}

#[test]
fn gep_folds_to_a_pointer_expression() {
    let engine = engine();
    let base = ConstantNullPointer::of(Type::int(&engine, 32).pointer_to()).unwrap();
    let zero = Int32::new(&engine, 0).unwrap();
    let one = Int32::new(&engine, 1).unwrap();

    let gep = base.get_element_pointer(&[&zero, &one]).unwrap();
    assert_eq!(gep.ty().unwrap().kind().unwrap(), TypeKind::Pointer);

    // Operands are [base, indices...], readable through the operand view.
    let operands = gep.operands();
    assert_eq!(operands.len().unwrap(), 3);
    assert_eq!(
        operands.get(0).unwrap().expect("base operand").handle(),
        base.handle()
    );

    let in_bounds = base.get_element_pointer_in_bounds(&[&zero]).unwrap();
    assert!(in_bounds
        .print_to_string()
        .unwrap()
        .starts_with("getelementptr inbounds"));
}
