//! Lathe Engine - In-Memory Reference Engine
//!
//! A single-threaded, constant-folding implementation of
//! [`lathe_ir::Engine`]. It gives the typed value layer a complete engine
//! to run against without linking a native backend: types are interned,
//! scalar constants are uniqued (so engine-side identity matches the
//! uniqued-constant model of production IR engines), and every arithmetic
//! primitive folds eagerly with two's-complement/IEEE semantics.
//!
//! # Precision
//!
//! All five floating formats share an `f64` payload. `fp128`, `ppc_fp128`
//! and `x86_fp80` therefore fold at f64 precision: type identity,
//! classification and casts are format-exact, arithmetic results are
//! value-approximated. `float` folds round through `f32`.
//!
//! # Debugging
//!
//! Fold and construction traffic emits `tracing` events:
//! `RUST_LOG=lathe_engine=trace`.

mod engine;
mod fold;
mod print;
mod store;

pub use engine::FoldingEngine;
