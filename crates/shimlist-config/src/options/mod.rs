//! Resolution options and their JSON / TOML forms

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shimlist_core::error::ShimError;
use shimlist_core::types::Version;

use crate::selector::Selector;
use crate::targets::TargetsSpec;
use crate::ConfigResult;

/// Options exactly as they appear in a file, before validation.
///
/// Every field is optional so layers can be overlaid with [`RawOptions::overlay`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOptions {
    /// Features to include
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Value>,

    /// Features to leave out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Value>,

    /// Engines that must be supported
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<Value>,

    /// Report features that are not needed instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inverse: Option<bool>,

    /// Library release to restrict the feature set to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<Value>,
}

/// Validated resolution request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompatOptions {
    /// Features to include; defaults to every feature
    pub modules: Selector,
    /// Features to leave out
    pub exclude: Option<Selector>,
    /// Engines that must be supported
    pub targets: TargetsSpec,
    /// Report features that are not needed instead
    pub inverse: bool,
    /// Only consider features shipped by this library release
    pub version: Option<Version>,
}

impl RawOptions {
    /// Overlay `other` on top of `self`; fields set in `other` win
    pub fn overlay(mut self, other: RawOptions) -> Self {
        if other.modules.is_some() {
            self.modules = other.modules;
        }
        if other.exclude.is_some() {
            self.exclude = other.exclude;
        }
        if other.targets.is_some() {
            self.targets = other.targets;
        }
        if other.inverse.is_some() {
            self.inverse = other.inverse;
        }
        if other.version.is_some() {
            self.version = other.version;
        }
        self
    }
}

impl CompatOptions {
    /// Options selecting every feature with no targets
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_modules(mut self, modules: Selector) -> Self {
        self.modules = modules;
        self
    }

    pub fn with_exclude(mut self, exclude: Selector) -> Self {
        self.exclude = Some(exclude);
        self
    }

    pub fn with_targets(mut self, targets: TargetsSpec) -> Self {
        self.targets = targets;
        self
    }

    pub fn with_inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    pub fn with_version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    /// Validate a JSON options value
    pub fn from_json_value(value: Value) -> ConfigResult<Self> {
        let raw: RawOptions = serde_json::from_value(value).map_err(|e| ShimError::JsonParse {
            message: e.to_string(),
        })?;
        Self::try_from(raw)
    }
}

impl TryFrom<RawOptions> for CompatOptions {
    type Error = ShimError;

    fn try_from(raw: RawOptions) -> ConfigResult<Self> {
        let modules = match raw.modules {
            None | Some(Value::Null) => Selector::all(),
            Some(value) => Selector::from_value(&value)?,
        };

        let exclude = match raw.exclude {
            None | Some(Value::Null) => None,
            Some(value) => Some(Selector::from_value(&value)?),
        };

        let targets = match raw.targets {
            None => TargetsSpec::Absent,
            Some(value) => TargetsSpec::from_value(&value)?,
        };

        let version = match raw.version {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) => Some(parse_release(&raw)?),
            Some(Value::Number(raw)) => Some(parse_release(&raw.to_string())?),
            Some(other) => {
                return Err(ShimError::ConfigValidation {
                    field: "version".to_string(),
                    reason: format!("expected a version string, got {}", other),
                })
            },
        };

        Ok(Self {
            modules,
            exclude,
            targets,
            inverse: raw.inverse.unwrap_or(false),
            version,
        })
    }
}

fn parse_release(raw: &str) -> ConfigResult<Version> {
    raw.parse().map_err(|e| ShimError::ConfigValidation {
        field: "version".to_string(),
        reason: format!("{}", e),
    })
}

/// Parse a JSON options document into raw options
pub fn parse_raw_json(content: &str) -> ConfigResult<RawOptions> {
    serde_json::from_str(content).map_err(|e| ShimError::JsonParse {
        message: format!("JSON parsing error: {}", e),
    })
}

/// Parse a TOML options document into raw options
pub fn parse_raw_toml(content: &str) -> ConfigResult<RawOptions> {
    toml::from_str(content).map_err(|e| ShimError::TomlParse {
        message: e.to_string(),
    })
}

/// Parse and validate JSON options
pub fn parse_json(content: &str) -> ConfigResult<CompatOptions> {
    CompatOptions::try_from(parse_raw_json(content)?)
}

/// Parse and validate TOML options
pub fn parse_toml(content: &str) -> ConfigResult<CompatOptions> {
    CompatOptions::try_from(parse_raw_toml(content)?)
}
