use lathe_ir::{Engine, EngineError, Linkage, TypeKind, Visibility};
use pretty_assertions::assert_eq;

use crate::classify::{classify, AnyValueEnum};
use crate::error::ValueError;
use crate::global::{GlobalAlias, GlobalValueOps, GlobalVariable};
use crate::int::Int32;
use crate::tests::engine;
use crate::value::{AnyValue, Wrap};

fn variable<'e>(engine: &'e lathe_engine::FoldingEngine, name: &str) -> GlobalVariable<'e> {
    let handle = engine.add_global(engine.int_type(32), name).unwrap();
    GlobalVariable::from_handle(engine, handle)
}

#[test]
fn metadata_passes_through_without_caching() {
    let engine = engine();
    let global = variable(&engine, "counter");

    assert_eq!(global.alignment().unwrap(), 0);
    global.set_alignment(8).unwrap();
    assert_eq!(global.alignment().unwrap(), 8);

    assert_eq!(global.linkage().unwrap(), Linkage::External);
    global.set_linkage(Linkage::Internal).unwrap();
    assert_eq!(global.linkage().unwrap(), Linkage::Internal);

    assert_eq!(global.visibility().unwrap(), Visibility::Default);
    global.set_visibility(Visibility::Hidden).unwrap();
    assert_eq!(global.visibility().unwrap(), Visibility::Hidden);

    assert_eq!(global.section().unwrap(), None);
    global.set_section(Some(".rodata")).unwrap();
    assert_eq!(global.section().unwrap(), Some(".rodata".to_string()));
    global.set_section(None).unwrap();
    assert_eq!(global.section().unwrap(), None);
}

#[test]
fn external_mutation_is_immediately_visible() {
    let engine = engine();
    let global = variable(&engine, "shared");
    // A write through the engine, bypassing this wrapper, is observed on
    // the next read because nothing is cached.
    engine.set_alignment(global.handle(), 16).unwrap();
    assert_eq!(global.alignment().unwrap(), 16);
}

#[test]
fn initializer_controls_declaration_status() {
    let engine = engine();
    let global = variable(&engine, "answer");
    assert!(global.is_declaration().unwrap());
    assert_eq!(global.initializer().unwrap(), None);

    let forty_two = Int32::new(&engine, 42).unwrap();
    global.set_initializer(&forty_two).unwrap();
    assert!(!global.is_declaration().unwrap());
    assert_eq!(
        global.initializer().unwrap().expect("initializer set").handle(),
        forty_two.handle()
    );
}

#[test]
fn constantness_and_thread_locality() {
    let engine = engine();
    let global = variable(&engine, "flag");

    assert!(!global.is_global_constant().unwrap());
    global.set_global_constant(true).unwrap();
    assert!(global.is_global_constant().unwrap());

    assert!(!global.is_thread_local().unwrap());
    global.set_thread_local(true).unwrap();
    assert!(global.is_thread_local().unwrap());
}

#[test]
fn aliases_point_at_their_aliasee() {
    let engine = engine();
    let target = variable(&engine, "target");
    let forty_two = Int32::new(&engine, 42).unwrap();
    target.set_initializer(&forty_two).unwrap();

    let handle = engine.add_alias(target.handle(), "alias").unwrap();
    let alias = GlobalAlias::from_handle(&engine, handle);

    assert!(!alias.is_declaration().unwrap());
    assert_eq!(
        alias.initializer().unwrap().expect("aliasee").handle(),
        target.handle()
    );
    alias.set_linkage(Linkage::WeakAny).unwrap();
    assert_eq!(alias.linkage().unwrap(), Linkage::WeakAny);
}

#[test]
fn globals_classify_as_pointers() {
    let engine = engine();
    let global = variable(&engine, "g");
    assert!(matches!(
        classify(&engine, global.handle()).unwrap(),
        AnyValueEnum::Pointer(_)
    ));
    assert_eq!(global.ty().unwrap().kind().unwrap(), TypeKind::Pointer);
}

#[test]
fn global_metadata_on_a_non_global_is_rejected() {
    let engine = engine();
    let constant = Int32::new(&engine, 1).unwrap();
    let not_global = GlobalVariable::from_handle(&engine, constant.handle());
    assert_eq!(
        not_global.alignment().unwrap_err(),
        ValueError::Engine(EngineError::NotAGlobal)
    );
}
