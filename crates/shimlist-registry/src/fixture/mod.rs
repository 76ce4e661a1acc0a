//! Registry fixture parsing
//!
//! The fixture is a JSON document of the shape
//!
//! ```json
//! {
//!   "version": "3.40.0",
//!   "features": {
//!     "es.map": {
//!       "dependencies": ["es.array.iterator"],
//!       "support": { "chrome": "51", "ie": true },
//!       "since": "3.0"
//!     }
//!   },
//!   "groups": { "core-js/es/map": ["es.map"] }
//! }
//! ```
//!
//! A support value is a version (string or number) or `true` for an engine
//! that has always run the feature natively.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use shimlist_core::error::ShimError;
use shimlist_core::types::Version;

use crate::record::{FeatureRecord, Support};
use crate::RegistryResult;

/// Fixture compiled into the binary
pub const BUNDLED_FIXTURE: &str = include_str!("../../data/registry.json");

/// Fixture document as it appears on disk
#[derive(Debug, Deserialize)]
pub struct RawFixture {
    #[serde(default)]
    pub version: Option<String>,
    pub features: IndexMap<String, RawFeature>,
    #[serde(default)]
    pub groups: IndexMap<String, Vec<String>>,
}

/// One feature entry of the fixture
#[derive(Debug, Deserialize)]
pub struct RawFeature {
    #[serde(default)]
    pub dependencies: Vec<String>,
    #[serde(default)]
    pub support: IndexMap<String, Value>,
    #[serde(default)]
    pub since: Option<String>,
}

/// Parse fixture JSON
pub fn parse_fixture(content: &str) -> RegistryResult<RawFixture> {
    serde_json::from_str(content).map_err(|e| ShimError::RegistryLoad {
        message: format!("fixture is not valid JSON: {}", e),
    })
}

impl RawFeature {
    /// Convert into a typed record
    pub fn into_record(self, name: String) -> RegistryResult<FeatureRecord> {
        let mut record = FeatureRecord::new(name);

        for (engine, value) in self.support {
            let support = parse_support(&record.name, &engine, &value)?;
            record.support.insert(engine, support);
        }

        let mut dependencies = self.dependencies;
        dependencies.sort();
        dependencies.dedup();
        record.dependencies = dependencies;

        if let Some(since) = self.since {
            let parsed: Version = since.parse().map_err(|_| ShimError::RegistryLoad {
                message: format!("feature '{}' has invalid 'since' version '{}'", record.name, since),
            })?;
            record.since = Some(parsed);
        }

        Ok(record)
    }
}

fn parse_support(feature: &str, engine: &str, value: &Value) -> RegistryResult<Support> {
    let invalid = || ShimError::RegistryLoad {
        message: format!(
            "feature '{}' has invalid support value {} for engine '{}'",
            feature, value, engine
        ),
    };

    match value {
        Value::Bool(true) => Ok(Support::Always),
        Value::String(raw) => raw.parse().map(Support::Since).map_err(|_| invalid()),
        Value::Number(raw) => raw.to_string().parse().map(Support::Since).map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}
