//! Requested engine floors.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::version::{Version, VersionError};

/// A target version as the caller wrote it.
///
/// Ordering follows the parsed `Version`; the label is what gets echoed
/// back in resolution results (`27` stays `"27"`, not `"27.0"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetVersion {
    version: Version,
    label: String,
}

impl TargetVersion {
    /// Build from an already parsed version, labelled with its display form
    pub fn new(version: Version) -> Self {
        Self {
            label: version.to_string(),
            version,
        }
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl FromStr for TargetVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Ok(Self {
            version: label.parse()?,
            label: label.to_string(),
        })
    }
}

impl PartialOrd for TargetVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TargetVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.version
            .cmp(&other.version)
            .then_with(|| self.label.cmp(&other.label))
    }
}

impl fmt::Display for TargetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

impl Serialize for TargetVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label)
    }
}
