//! Target environment input as the caller wrote it
//!
//! Interpretation (presets, aliases, query strings) happens in the
//! resolver's target normalizer; this module only captures the shape.

use indexmap::IndexMap;
use serde_json::Value;
use shimlist_core::error::ShimError;
use shimlist_core::types::TargetVersion;

use crate::ConfigResult;

/// Accepted forms of the `targets` option
#[derive(Debug, Clone, Default, PartialEq)]
pub enum TargetsSpec {
    /// No targets: every feature is needed
    #[default]
    Absent,
    /// One version applied to every known engine
    Scalar(TargetVersion),
    /// A preset name or a query like `"chrome 40, firefox 27"`
    Query(String),
    /// Engine (or preset key) to value
    Map(IndexMap<String, TargetValue>),
}

/// One value of a targets map
#[derive(Debug, Clone, PartialEq)]
pub enum TargetValue {
    Version(TargetVersion),
    Flag(bool),
    Text(String),
    List(Vec<String>),
}

impl TargetsSpec {
    /// Convert a JSON targets value
    pub fn from_value(value: &Value) -> ConfigResult<Self> {
        match value {
            Value::Null => Ok(TargetsSpec::Absent),
            Value::Number(number) => parse_number(number).map(TargetsSpec::Scalar),
            Value::String(raw) => Ok(Self::from_str_input(raw)),
            Value::Array(items) => {
                let queries = items
                    .iter()
                    .map(|item| match item {
                        Value::String(raw) => Ok(raw.trim().to_string()),
                        other => Err(ShimError::invalid_targets(
                            other.to_string(),
                            "query lists may only contain strings",
                        )),
                    })
                    .collect::<ConfigResult<Vec<_>>>()?;
                Ok(TargetsSpec::Query(queries.join(", ")))
            },
            Value::Object(map) => {
                let mut entries = IndexMap::new();
                for (key, value) in map {
                    entries.insert(key.clone(), TargetValue::from_value(key, value)?);
                }
                Ok(TargetsSpec::Map(entries))
            },
            Value::Bool(_) => Err(ShimError::invalid_targets(
                value.to_string(),
                "expected a version, a query string or a map of engines",
            )),
        }
    }

    /// A bare string is a scalar version when it parses as one, a query otherwise
    pub fn from_str_input(raw: &str) -> Self {
        match raw.parse::<TargetVersion>() {
            Ok(version) => TargetsSpec::Scalar(version),
            Err(_) => TargetsSpec::Query(raw.trim().to_string()),
        }
    }

    /// Build a map from `(engine, version)` pairs
    pub fn from_pairs<'a, I>(pairs: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut entries = IndexMap::new();
        for (engine, version) in pairs {
            let parsed = version
                .parse()
                .map_err(|_| ShimError::invalid_targets(version, format!("invalid version for '{}'", engine)))?;
            entries.insert(engine.to_string(), TargetValue::Version(parsed));
        }
        Ok(TargetsSpec::Map(entries))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, TargetsSpec::Absent)
    }
}

impl TargetValue {
    fn from_value(key: &str, value: &Value) -> ConfigResult<Self> {
        match value {
            Value::Number(number) => parse_number(number).map(TargetValue::Version),
            Value::Bool(flag) => Ok(TargetValue::Flag(*flag)),
            Value::String(raw) => Ok(match raw.parse::<TargetVersion>() {
                Ok(version) => TargetValue::Version(version),
                Err(_) => TargetValue::Text(raw.trim().to_string()),
            }),
            Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    Value::String(raw) => Ok(raw.trim().to_string()),
                    other => Err(ShimError::invalid_targets(
                        other.to_string(),
                        format!("'{}' lists may only contain strings", key),
                    )),
                })
                .collect::<ConfigResult<Vec<_>>>()
                .map(TargetValue::List),
            other => Err(ShimError::invalid_targets(
                other.to_string(),
                format!("unsupported value for '{}'", key),
            )),
        }
    }
}

fn parse_number(number: &serde_json::Number) -> ConfigResult<TargetVersion> {
    let raw = number.to_string();
    raw.parse()
        .map_err(|_| ShimError::invalid_targets(raw, "versions must be non-negative numbers"))
}
