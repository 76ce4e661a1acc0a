//! Feature selectors
//!
//! A selector is a pure query over a registry's feature names. The wire
//! forms are:
//! - `"es.map"`: a literal feature name
//! - `"core-js"`, `"core-js/es/math"`: an aggregate group
//! - `"/^es\\.math/"` or `{ "pattern": "^es\\.math" }`: a regular expression
//! - an array of the above

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde_json::Value;
use shimlist_core::error::ShimError;
use shimlist_core::ROOT_GROUP;

use crate::ConfigResult;

/// Compiled regular expression together with its source text
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

/// Closed set of selector shapes
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Exact feature name
    Literal(String),
    /// Named bundle of features
    Group(String),
    /// Regular expression tested against every feature name
    Pattern(Pattern),
    /// Union of the element selections
    Sequence(Vec<Selector>),
}

impl Pattern {
    /// Compile a pattern. `case_insensitive` corresponds to the `i` flag.
    pub fn new(source: &str, case_insensitive: bool) -> ConfigResult<Self> {
        let regex = RegexBuilder::new(source)
            .case_insensitive(case_insensitive)
            .build()
            .map_err(|e| ShimError::invalid_selector(source, format!("malformed pattern: {}", e)))?;
        let source = if case_insensitive {
            format!("/{}/i", source)
        } else {
            format!("/{}/", source)
        };
        Ok(Self { source, regex })
    }

    /// Whether the pattern matches anywhere in `name`
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// Pattern as written, in slash form
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Selector {
    /// Select a single feature by name
    pub fn literal(name: impl Into<String>) -> Self {
        Selector::Literal(name.into())
    }

    /// Select an aggregate group
    pub fn group(name: impl Into<String>) -> Self {
        Selector::Group(name.into())
    }

    /// Select by regular expression
    pub fn pattern(source: &str) -> ConfigResult<Self> {
        Pattern::new(source, false).map(Selector::Pattern)
    }

    /// The default selector: every feature in the registry
    pub fn all() -> Self {
        Selector::Group(ROOT_GROUP.to_string())
    }

    /// The empty selection
    pub fn none() -> Self {
        Selector::Sequence(Vec::new())
    }

    /// Classify a string selector.
    ///
    /// `/body/flags` is a pattern, `core-js` and `core-js/...` are groups,
    /// anything else is a literal feature name.
    pub fn parse_str(input: &str) -> ConfigResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ShimError::invalid_selector(input, "empty selector"));
        }

        if let Some(rest) = trimmed.strip_prefix('/') {
            let (body, flags) = rest
                .rsplit_once('/')
                .ok_or_else(|| ShimError::invalid_selector(input, "unterminated pattern"))?;
            let case_insensitive = match flags {
                "" => false,
                "i" => true,
                other => {
                    return Err(ShimError::invalid_selector(
                        input,
                        format!("unsupported pattern flags '{}'", other),
                    ))
                },
            };
            return Pattern::new(body, case_insensitive).map(Selector::Pattern);
        }

        if trimmed == ROOT_GROUP || trimmed.starts_with(&format!("{}/", ROOT_GROUP)) {
            return Ok(Selector::Group(trimmed.trim_end_matches('/').to_string()));
        }

        Ok(Selector::Literal(trimmed.to_string()))
    }

    /// Convert a JSON selector value
    pub fn from_value(value: &Value) -> ConfigResult<Self> {
        match value {
            Value::Array(items) => items
                .iter()
                .map(Self::element_from_value)
                .collect::<ConfigResult<Vec<_>>>()
                .map(Selector::Sequence),
            other => Self::element_from_value(other),
        }
    }

    fn element_from_value(value: &Value) -> ConfigResult<Self> {
        match value {
            Value::String(raw) => Self::parse_str(raw),
            Value::Object(map) => {
                let source = match (map.len(), map.get("pattern")) {
                    (1, Some(Value::String(source))) => source,
                    _ => {
                        return Err(ShimError::invalid_selector(
                            value.to_string(),
                            "object selectors must be { \"pattern\": \"...\" }",
                        ))
                    },
                };
                Self::pattern(source)
            },
            other => Err(ShimError::invalid_selector(
                other.to_string(),
                "invalid sequence element; expected a string or a pattern",
            )),
        }
    }

    /// Whether the selector can never select anything
    pub fn is_empty(&self) -> bool {
        match self {
            Selector::Sequence(items) => items.iter().all(Selector::is_empty),
            _ => false,
        }
    }
}

impl Default for Selector {
    fn default() -> Self {
        Self::all()
    }
}

impl From<Vec<Selector>> for Selector {
    fn from(items: Vec<Selector>) -> Self {
        Selector::Sequence(items)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Literal(name) | Selector::Group(name) => f.write_str(name),
            Selector::Pattern(pattern) => f.write_str(pattern.as_str()),
            Selector::Sequence(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            },
        }
    }
}
