//! Core data types for compatibility resolution.
//!
//! This module provides the fundamental types used throughout shimlist:
//! - Version types for engine and library versions
//! - Requested per-engine target floors
//! - Name aliases for features and engines

pub mod target;
pub mod version;

/// Dot-segmented feature identifier, e.g. `es.map`.
pub type FeatureName = String;

/// Engine identifier, e.g. `chrome` or `firefox-android`.
pub type EngineId = String;

// Re-export all public types
pub use target::TargetVersion;
pub use version::{compare, Version, VersionError};
