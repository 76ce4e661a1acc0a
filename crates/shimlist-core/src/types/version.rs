//! Engine and library version type.
//!
//! Engine support data only uses `major.minor`; library releases carry a
//! patch component as well. Missing components compare as zero, so
//! `"61"`, `"61.0"` and `"61.0.0"` are the same version.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Version (major.minor.patch), ordered component-wise
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// Version parsing errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid version format: {input}")]
    InvalidFormat { input: String },

    #[error("Invalid number in version: {component}")]
    InvalidNumber { component: String },
}

impl Version {
    /// Create a new version
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Lenient parse that never fails.
    ///
    /// Takes the first run of `digits(.digits(.digits))` found in the input;
    /// anything without digits is `0.0.0`.
    pub fn coerce(input: &str) -> Self {
        let start = match input.find(|c: char| c.is_ascii_digit()) {
            Some(start) => start,
            None => return Self::default(),
        };

        let mut parts = [0u64; 3];
        let mut rest = &input[start..];
        for (i, slot) in parts.iter_mut().enumerate() {
            if i > 0 {
                match rest.strip_prefix('.') {
                    Some(after) if after.starts_with(|c: char| c.is_ascii_digit()) => rest = after,
                    _ => break,
                }
            }
            let end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            *slot = rest[..end].parse().unwrap_or(u64::MAX);
            rest = &rest[end..];
        }

        Self::new(parts[0], parts[1], parts[2])
    }
}

/// Compare two version strings, coercing both sides.
///
/// Total order; never fails.
pub fn compare(a: &str, b: &str) -> Ordering {
    Version::coerce(a).cmp(&Version::coerce(b))
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let parts: Vec<&str> = input.split('.').collect();
        if input.is_empty() || parts.len() > 3 {
            return Err(VersionError::InvalidFormat {
                input: input.to_string(),
            });
        }

        let mut components = [0u64; 3];
        for (slot, part) in components.iter_mut().zip(&parts) {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(VersionError::InvalidNumber {
                    component: part.to_string(),
                });
            }
            *slot = part.parse().map_err(|_| VersionError::InvalidNumber {
                component: part.to_string(),
            })?;
        }

        Ok(Version::new(components[0], components[1], components[2]))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        if self.patch != 0 {
            write!(f, ".{}", self.patch)?;
        }
        Ok(())
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_parsing() {
        let v = Version::from_str("10.3").unwrap();
        assert_eq!(v, Version::new(10, 3, 0));

        let v = Version::from_str("61").unwrap();
        assert_eq!(v, Version::new(61, 0, 0));

        let v = Version::from_str(" 3.38.1 ").unwrap();
        assert_eq!(v, Version::new(3, 38, 1));
    }

    #[test]
    fn test_version_parsing_rejects_garbage() {
        assert!(Version::from_str("").is_err());
        assert!(Version::from_str("TP").is_err());
        assert!(Version::from_str("1.2.3.4").is_err());
        assert!(Version::from_str("1..2").is_err());
        assert!(Version::from_str("-1").is_err());
    }

    #[test]
    fn test_missing_components_are_zero() {
        assert_eq!(compare("61", "61.0"), Ordering::Equal);
        assert_eq!(compare("61.0.0", "61"), Ordering::Equal);
        assert_eq!(compare("10.3", "10"), Ordering::Greater);
    }

    #[test]
    fn test_compare_is_numeric_not_lexical() {
        assert_eq!(compare("9", "10"), Ordering::Less);
        assert_eq!(compare("10.10", "10.9"), Ordering::Greater);
        assert_eq!(compare("1.12", "1.9"), Ordering::Greater);
    }

    #[test]
    fn test_coerce_never_fails() {
        assert_eq!(Version::coerce("chrome 61.2 beta"), Version::new(61, 2, 0));
        assert_eq!(Version::coerce("v18.0.1"), Version::new(18, 0, 1));
        assert_eq!(Version::coerce("12."), Version::new(12, 0, 0));
        assert_eq!(Version::coerce("none"), Version::default());
    }

    #[test]
    fn test_version_display() {
        assert_eq!(Version::new(10, 3, 0).to_string(), "10.3");
        assert_eq!(Version::new(61, 0, 0).to_string(), "61.0");
        assert_eq!(Version::new(3, 38, 1).to_string(), "3.38.1");
    }

    #[test]
    fn test_serde_uses_string_form() {
        let v: Version = serde_json::from_str("\"3.21\"").unwrap();
        assert_eq!(v, Version::new(3, 21, 0));
        assert_eq!(serde_json::to_string(&v).unwrap(), "\"3.21\"");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn compare_is_antisymmetric(
            a in (0u64..200, 0u64..20),
            b in (0u64..200, 0u64..20),
        ) {
            let a = format!("{}.{}", a.0, a.1);
            let b = format!("{}.{}", b.0, b.1);
            prop_assert_eq!(compare(&a, &b), compare(&b, &a).reverse());
        }

        #[test]
        fn compare_is_transitive(
            a in (0u64..50, 0u64..5),
            b in (0u64..50, 0u64..5),
            c in (0u64..50, 0u64..5),
        ) {
            let a = Version::new(a.0, a.1, 0);
            let b = Version::new(b.0, b.1, 0);
            let c = Version::new(c.0, c.1, 0);

            if a < b && b < c {
                prop_assert!(a < c, "Transitivity violated: {} < {} < {} but {} >= {}", a, b, c, a, c);
            }
        }

        #[test]
        fn strict_and_lenient_parse_agree(major in 0u64..1000, minor in 0u64..1000) {
            let input = format!("{}.{}", major, minor);
            prop_assert_eq!(Version::from_str(&input).unwrap(), Version::coerce(&input));
        }
    }
}
