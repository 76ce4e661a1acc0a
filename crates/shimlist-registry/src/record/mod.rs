//! Feature records and native support thresholds

use indexmap::IndexMap;
use shimlist_core::types::{EngineId, FeatureName, TargetVersion, Version};

/// Native support threshold of one feature on one engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    /// Native on every version of the engine; the shim is never needed
    Always,
    /// Native from this version onwards
    Since(Version),
}

impl Support {
    /// Whether an engine at `target` runs the feature natively
    pub fn covers(&self, target: &Version) -> bool {
        match self {
            Support::Always => true,
            Support::Since(threshold) => target >= threshold,
        }
    }
}

/// One shimmable feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRecord {
    /// Unique dot-segmented name, e.g. `es.array.at`
    pub name: FeatureName,
    /// Features that must be loaded alongside this one
    pub dependencies: Vec<FeatureName>,
    /// Native support per engine. A missing engine never supports the feature.
    pub support: IndexMap<EngineId, Support>,
    /// Library release that first shipped the shim
    pub since: Option<Version>,
}

impl FeatureRecord {
    /// Create a record without dependencies or support data
    pub fn new(name: impl Into<FeatureName>) -> Self {
        Self {
            name: name.into(),
            dependencies: Vec::new(),
            support: IndexMap::new(),
            since: None,
        }
    }

    /// Add a dependency
    pub fn with_dependency(mut self, dependency: impl Into<FeatureName>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    /// Record native support on an engine
    pub fn with_support(mut self, engine: impl Into<EngineId>, support: Support) -> Self {
        self.support.insert(engine.into(), support);
        self
    }

    /// Set the library release that introduced the shim
    pub fn with_since(mut self, since: Version) -> Self {
        self.since = Some(since);
        self
    }

    /// Whether the shim is still required on `engine` at `target`
    pub fn needed_on(&self, engine: &str, target: &TargetVersion) -> bool {
        match self.support.get(engine) {
            Some(support) => !support.covers(target.version()),
            None => true,
        }
    }

    /// Whether the shim exists in the given library release
    pub fn available_in(&self, release: &Version) -> bool {
        self.since.map_or(true, |since| since <= *release)
    }
}
