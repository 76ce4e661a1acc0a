//! Resolution engine for shimlist
//!
//! Given a feature selection and a set of target engines, this crate
//! computes the minimal set of shims every target still needs: selectors
//! are matched against the registry, the selection is closed over its
//! dependencies, and each member is checked against the engines' native
//! support thresholds.

pub mod closure;
pub mod compat;
pub mod filter;
pub mod matcher;
pub mod targets;

// Re-export main types
pub use closure::close;
pub use compat::{compat, compat_json, ResolutionResult, Resolver};
pub use filter::{is_needed, Necessity};
pub use matcher::match_selector;
pub use targets::{normalize_targets, TargetMap};

use shimlist_core::error::ShimError;

/// Result type for resolver operations
pub type ResolverResult<T> = Result<T, ShimError>;
