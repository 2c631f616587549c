//! Test modules for the typed value layer.
//!
//! Everything runs against the in-memory folding engine; wrappers only ever
//! see it as `&dyn Engine`, exactly as they would a native backend.

use lathe_engine::FoldingEngine;

fn engine() -> FoldingEngine {
    FoldingEngine::new()
}

mod aggregate_tests;
mod attribute_tests;
mod constant_tests;
mod global_tests;
mod int_tests;
mod real_tests;
