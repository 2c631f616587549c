use lathe_ir::{Engine, EngineError, TypeKind};
use pretty_assertions::assert_eq;

use crate::aggregate::{
    AggregateValue, ConstantArray, ConstantString, ConstantStruct, ConstantVector,
};
use crate::error::ValueError;
use crate::int::{Int32, Int8};
use crate::real::Double;
use crate::tests::engine;
use crate::types::Type;
use crate::value::AnyValue;

fn element_i64(engine: &lathe_engine::FoldingEngine, value: &crate::value::Value<'_>) -> i64 {
    engine.int_sign_extended_value(value.handle()).unwrap()
}

#[test]
fn array_from_generator_extracts_elements() {
    let engine = engine();
    let i32_ty = Type::int(&engine, 32);
    let array = ConstantArray::from_fn(i32_ty, 3, |i| {
        Int32::new(&engine, i64::try_from(i).unwrap())
    })
    .unwrap();

    let second = array.extract(1).unwrap();
    assert_eq!(element_i64(&engine, &second), 1);
    assert_eq!(array.ty().unwrap().kind().unwrap(), TypeKind::Array);
}

#[test]
fn array_elements_must_match_the_element_type() {
    let engine = engine();
    let i32_ty = Type::int(&engine, 32);
    let byte = Int8::new(&engine, 1).unwrap();
    let elements: [&dyn AnyValue<'_>; 1] = [&byte];
    assert!(matches!(
        ConstantArray::new(i32_ty, &elements).unwrap_err(),
        ValueError::Engine(EngineError::IncompatibleOperands { .. })
    ));
}

#[test]
fn insert_yields_a_fresh_aggregate() {
    let engine = engine();
    let i32_ty = Type::int(&engine, 32);
    let array = ConstantArray::from_fn(i32_ty, 3, |i| {
        Int32::new(&engine, i64::try_from(i).unwrap())
    })
    .unwrap();

    let replacement = Int32::new(&engine, 99).unwrap();
    let updated = array.insert(&replacement, 1).unwrap();

    // Constants are immutable: the original still reads 1, only the fresh
    // aggregate carries the replacement.
    assert_ne!(array, updated);
    assert_eq!(element_i64(&engine, &array.extract(1).unwrap()), 1);
    assert_eq!(element_i64(&engine, &updated.extract(1).unwrap()), 99);
}

#[test]
fn vector_construction_requires_elements() {
    let engine = engine();
    assert_eq!(
        ConstantVector::new(&engine, &[]).unwrap_err(),
        ValueError::InvalidArgument("vector requires at least one element")
    );
    assert_eq!(
        ConstantVector::from_fn(&engine, 0, |_| Int32::new(&engine, 0)).unwrap_err(),
        ValueError::InvalidArgument("vector requires at least one element")
    );
}

#[test]
fn vector_element_access_goes_through_constant_indices() {
    let engine = engine();
    let vector = ConstantVector::from_fn(&engine, 4, |i| {
        Int32::new(&engine, 10 * i64::try_from(i).unwrap())
    })
    .unwrap();
    assert_eq!(vector.ty().unwrap().kind().unwrap(), TypeKind::Vector);

    let index = Int32::new(&engine, 2).unwrap();
    let picked = vector.extract_element(&index).unwrap();
    assert_eq!(engine.int_sign_extended_value(picked.handle()).unwrap(), 20);

    let replacement = Int32::new(&engine, -1).unwrap();
    let updated = vector.insert_element(&replacement, &index).unwrap();
    let read_back = updated.extract_element(&index).unwrap();
    assert_eq!(engine.int_sign_extended_value(read_back.handle()).unwrap(), -1);
    // Original untouched.
    let original = vector.extract_element(&index).unwrap();
    assert_eq!(engine.int_sign_extended_value(original.handle()).unwrap(), 20);
}

#[test]
fn shuffle_picks_lanes_across_both_operands() {
    let engine = engine();
    let left = ConstantVector::from_fn(&engine, 2, |i| {
        Int32::new(&engine, i64::try_from(i).unwrap() + 1)
    })
    .unwrap();
    let right = ConstantVector::from_fn(&engine, 2, |i| {
        Int32::new(&engine, i64::try_from(i).unwrap() + 3)
    })
    .unwrap();

    // Mask lanes address the concatenation [1, 2, 3, 4].
    let mask = ConstantVector::from_fn(&engine, 2, |i| Int32::new(&engine, [0, 3][i])).unwrap();
    let shuffled = left.shuffle(&right, &mask).unwrap();

    let zero = Int32::new(&engine, 0).unwrap();
    let one = Int32::new(&engine, 1).unwrap();
    assert_eq!(
        engine
            .int_sign_extended_value(shuffled.extract_element(&zero).unwrap().handle())
            .unwrap(),
        1
    );
    assert_eq!(
        engine
            .int_sign_extended_value(shuffled.extract_element(&one).unwrap().handle())
            .unwrap(),
        4
    );

    // Incompatible element types are the engine's check.
    let doubles = ConstantVector::from_fn(&engine, 2, |_| Double::new(&engine, 0.0)).unwrap();
    assert!(matches!(
        left.shuffle(&doubles, &mask).unwrap_err(),
        ValueError::Engine(EngineError::IncompatibleOperands { .. })
    ));
}

#[test]
fn struct_construction_paths_are_equivalent() {
    let engine = engine();
    let one = Int32::new(&engine, 1).unwrap();
    let two = Double::new(&engine, 2.0).unwrap();
    let elements: [&dyn AnyValue<'_>; 2] = [&one, &two];

    let global = ConstantStruct::new(&engine, &elements, false).unwrap();
    let context = engine.create_context();
    let scoped = ConstantStruct::new_in_context(&engine, context, &elements, false).unwrap();

    for strukt in [&global, &scoped] {
        assert_eq!(strukt.ty().unwrap().kind().unwrap(), TypeKind::Struct);
        assert_eq!(element_i64(&engine, &strukt.extract(0).unwrap()), 1);
        assert_eq!(
            engine
                .real_value(strukt.extract(1).unwrap().handle())
                .unwrap(),
            2.0
        );
    }
}

#[test]
fn packed_structs_have_a_distinct_type() {
    let engine = engine();
    let one = Int32::new(&engine, 1).unwrap();
    let elements: [&dyn AnyValue<'_>; 1] = [&one];
    let loose = ConstantStruct::new(&engine, &elements, false).unwrap();
    let packed = ConstantStruct::new(&engine, &elements, true).unwrap();
    assert_ne!(loose.ty().unwrap(), packed.ty().unwrap());
    assert_eq!(packed.ty().unwrap().print_to_string().unwrap(), "<{ i32 }>");
}

#[test]
fn struct_from_generator() {
    let engine = engine();
    let strukt = ConstantStruct::from_fn(&engine, 3, false, |i| {
        Int32::new(&engine, i64::try_from(i).unwrap() * 2)
    })
    .unwrap();
    assert_eq!(element_i64(&engine, &strukt.extract(2).unwrap()), 4);
}

#[test]
fn strings_carry_bytes_and_termination() {
    let engine = engine();
    let terminated = ConstantString::new(&engine, "hi", true).unwrap();
    assert_eq!(terminated.ty().unwrap().print_to_string().unwrap(), "[3 x i8]");
    assert_eq!(element_i64(&engine, &terminated.extract(2).unwrap()), 0);
    assert_eq!(
        element_i64(&engine, &terminated.extract(0).unwrap()),
        i64::from(b'h')
    );

    let bare = ConstantString::new(&engine, "hi", false).unwrap();
    assert_eq!(bare.ty().unwrap().print_to_string().unwrap(), "[2 x i8]");

    let context = engine.create_context();
    let scoped = ConstantString::new_in_context(&engine, context, "hi", true).unwrap();
    assert_eq!(scoped.ty().unwrap(), terminated.ty().unwrap());
}

#[test]
fn string_insert_replaces_a_byte() {
    let engine = engine();
    let string = ConstantString::new(&engine, "hi", false).unwrap();
    let bang = Int8::new(&engine, i64::from(b'!')).unwrap();
    let updated = string.insert(&bang, 1).unwrap();
    assert_eq!(element_i64(&engine, &updated.extract(1).unwrap()), i64::from(b'!'));
    assert_eq!(element_i64(&engine, &string.extract(1).unwrap()), i64::from(b'i'));
}
