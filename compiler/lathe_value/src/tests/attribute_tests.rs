use lathe_ir::{Attributes, Engine, ValueHandle};
use pretty_assertions::assert_eq;

use crate::aggregate::ConstantStruct;
use crate::int::Int32;
use crate::real::Double;
use crate::tests::engine;
use crate::value::{AnyValue, Value};

#[test]
fn add_is_idempotent() {
    let engine = engine();
    let value = Int32::new(&engine, 1).unwrap();
    let attrs = value.attributes();

    attrs.add(Attributes::READ_ONLY).unwrap();
    attrs.add(Attributes::READ_ONLY).unwrap();

    assert!(attrs.contains(Attributes::READ_ONLY));
    assert_eq!(attrs.as_flags(), Attributes::READ_ONLY);
    assert_eq!(
        engine.attributes(value.handle()).unwrap(),
        Attributes::READ_ONLY
    );
}

#[test]
fn remove_of_absent_attribute_is_a_no_op() {
    let engine = engine();
    let value = Int32::new(&engine, 2).unwrap();
    let attrs = value.attributes();

    attrs.remove(Attributes::COLD).unwrap();
    assert!(attrs.is_empty());

    attrs.add(Attributes::COLD).unwrap();
    attrs.add(Attributes::NO_UNWIND).unwrap();
    attrs.remove(Attributes::COLD).unwrap();
    assert!(!attrs.contains(Attributes::COLD));
    assert!(attrs.contains(Attributes::NO_UNWIND));
    assert_eq!(
        engine.attributes(value.handle()).unwrap(),
        Attributes::NO_UNWIND
    );
}

#[test]
fn contains_reads_the_local_mirror_only() {
    let engine = engine();
    let value = Int32::new(&engine, 3).unwrap();
    let attrs = value.attributes();
    attrs.add(Attributes::NO_ALIAS).unwrap();

    // The collection is one instance per value instance; the mirror and
    // the engine agree while it is the sole mutator.
    assert!(attrs.contains(Attributes::NO_ALIAS));
    assert_eq!(engine.attributes(value.handle()).unwrap(), attrs.as_flags());
}

#[test]
fn collection_is_created_once_per_value() {
    let engine = engine();
    let value = Int32::new(&engine, 4).unwrap();
    value.attributes().add(Attributes::COLD).unwrap();
    // A later access observes the same instance, not a fresh empty mirror.
    assert!(value.attributes().contains(Attributes::COLD));
}

#[test]
fn failed_engine_call_leaves_the_mirror_untouched() {
    let engine = engine();
    let dangling = Value::from_handle(&engine, ValueHandle::new(u64::MAX));
    let attrs = dangling.attributes();
    assert!(attrs.add(Attributes::READ_ONLY).is_err());
    assert!(!attrs.contains(Attributes::READ_ONLY));
    assert!(attrs.is_empty());
}

#[test]
fn display_lists_attributes() {
    let engine = engine();
    let value = Int32::new(&engine, 5).unwrap();
    let attrs = value.attributes();
    assert_eq!(attrs.to_string(), "(no attributes)");
    attrs.add(Attributes::READ_ONLY).unwrap();
    assert_eq!(attrs.to_string(), "read_only");
}

#[test]
fn struct_attribute_scenario_end_to_end() {
    let engine = engine();
    let one = Int32::new(&engine, 1).unwrap();
    let two = Double::new(&engine, 2.0).unwrap();
    let elements: [&dyn AnyValue<'_>; 2] = [&one, &two];
    let strukt = ConstantStruct::new(&engine, &elements, false).unwrap();

    strukt.attributes().add(Attributes::READ_ONLY).unwrap();

    assert!(strukt.attributes().contains(Attributes::READ_ONLY));
    let engine_side = engine.attributes(strukt.handle()).unwrap();
    assert_eq!(engine_side, Attributes::READ_ONLY);
    assert_eq!(engine_side.count(), 1);
}
