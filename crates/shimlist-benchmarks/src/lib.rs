//! shimlist benchmarking suite
//!
//! Benchmarks for the resolution pipeline (matching, closure, necessity
//! filtering) and for option and version parsing.

pub mod common;

pub use common::*;
