//! Per-engine necessity of a single shim

use std::collections::BTreeMap;

use shimlist_core::types::{EngineId, TargetVersion};
use shimlist_registry::FeatureRecord;

use crate::targets::TargetMap;

/// Outcome of checking one feature against the targets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Necessity {
    /// Whether the shim has to be shipped
    pub needed: bool,
    /// Engines still lacking native support, with the requested target version
    pub per_engine: BTreeMap<EngineId, TargetVersion>,
}

impl Necessity {
    /// Flip `needed`. A feature reported as not needed never lists engines.
    pub fn inverted(self) -> Self {
        Self {
            needed: !self.needed,
            per_engine: BTreeMap::new(),
        }
    }
}

/// Decide whether `feature` needs a shim for `targets`.
///
/// Empty targets mean "support everything", so every feature is needed with
/// no engine detail.
pub fn is_needed(feature: &FeatureRecord, targets: &TargetMap) -> Necessity {
    if targets.is_empty() {
        return Necessity {
            needed: true,
            per_engine: BTreeMap::new(),
        };
    }

    let per_engine: BTreeMap<EngineId, TargetVersion> = targets
        .iter()
        .filter(|(engine, target)| feature.needed_on(engine, target))
        .map(|(engine, target)| (engine.clone(), target.clone()))
        .collect();

    Necessity {
        needed: !per_engine.is_empty(),
        per_engine,
    }
}
