//! # shimlist-core
//!
//! Core types and utilities shared across all shimlist crates.
//!
//! This crate provides:
//! - `Version`, the lenient two/three component version order used for
//!   engine support data and library releases
//! - `TargetVersion`, a requested engine floor that remembers how it was spelled
//! - `ShimError` enum for unified error handling
//!
//! ## Architecture
//!
//! The crate is organized into modules:
//! - `types`: Core data types (Version, TargetVersion, name aliases)
//! - `error`: Error types and result aliases

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{ShimError, ShimResult};
pub use types::{compare, EngineId, FeatureName, TargetVersion, Version, VersionError};

/// Name of the aggregate group that covers every feature in a registry.
pub const ROOT_GROUP: &str = "core-js";
