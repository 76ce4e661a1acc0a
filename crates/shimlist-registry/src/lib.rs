//! Feature registry for shimlist
//!
//! This crate holds the static map of features to their dependencies and
//! per-engine native support, the aggregate groups that name bundles of
//! features, and the fixture bundled into the binary.

pub mod fixture;
pub mod record;
pub mod registry;

// Re-export main types
pub use record::{FeatureRecord, Support};
pub use registry::Registry;

use shimlist_core::error::ShimError;

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, ShimError>;
