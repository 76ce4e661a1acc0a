//! Resolution options for shimlist
//!
//! This crate turns loosely shaped user input (JSON, TOML, `package.json`
//! fields, environment variables) into typed, validated options. Selectors
//! are classified and patterns compiled here, once, so the resolver only
//! ever sees a closed set of shapes.

pub mod loader;
pub mod options;
pub mod selector;
pub mod targets;

// Re-export main types
pub use loader::{ConfigLayering, ConfigLoader, ConfigSource};
pub use options::{CompatOptions, RawOptions};
pub use selector::{Pattern, Selector};
pub use targets::{TargetValue, TargetsSpec};

use shimlist_core::error::ShimError;

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ShimError>;
