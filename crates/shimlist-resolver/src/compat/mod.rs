//! Resolution pipeline
//!
//! normalize targets -> match `modules` -> match `exclude` ->
//! close(included - excluded) - excluded -> library version filter ->
//! per-feature necessity -> sorted result.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use shimlist_config::options::CompatOptions;
use shimlist_core::error::ShimError;
use shimlist_core::types::{EngineId, FeatureName, TargetVersion};
use shimlist_registry::Registry;
use tracing::debug;

use crate::closure::close;
use crate::filter::is_needed;
use crate::matcher::match_selector;
use crate::targets::normalize_targets;
use crate::ResolverResult;

/// Shims to ship, with the engines that still need each of them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    /// Sorted, duplicate-free feature names
    pub list: Vec<FeatureName>,
    /// Feature -> engine -> requested target version. Keys equal `list`.
    pub targets: BTreeMap<FeatureName, BTreeMap<EngineId, TargetVersion>>,
}

impl ResolutionResult {
    /// Number of features in the result
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Whether `feature` is part of the result
    pub fn contains(&self, feature: &str) -> bool {
        self.targets.contains_key(feature)
    }

    /// JSON form: `{ "list": [...], "targets": { feature: { engine: "version" } } }`
    pub fn to_json(&self) -> ResolverResult<Value> {
        serde_json::to_value(self).map_err(|e| ShimError::JsonParse {
            message: e.to_string(),
        })
    }
}

/// Resolves options against one registry. Stateless between calls.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'r> {
    registry: &'r Registry,
}

impl<'r> Resolver<'r> {
    /// Create a resolver over `registry`
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Compute the shim set for `options`.
    ///
    /// Selector and target errors are raised before any result is built.
    pub fn resolve(&self, options: &CompatOptions) -> ResolverResult<ResolutionResult> {
        let targets = normalize_targets(&options.targets, self.registry.known_engines())?;
        let included = match_selector(&options.modules, self.registry)?;
        let excluded = match &options.exclude {
            Some(selector) => match_selector(selector, self.registry)?,
            None => Default::default(),
        };

        let seed = included.difference(&excluded).copied();
        let mut members = close(self.registry, seed);
        // Excluded features stay out even when another feature depends on them
        members.retain(|name| !excluded.contains(name));

        let candidates: Vec<_> = members
            .iter()
            .filter_map(|name| self.registry.get(name))
            .filter(|record| {
                options
                    .version
                    .as_ref()
                    .map_or(true, |release| record.available_in(release))
            })
            .collect();

        debug!(
            included = included.len(),
            excluded = excluded.len(),
            candidates = candidates.len(),
            engines = targets.len(),
            inverse = options.inverse,
            "resolving shims"
        );

        let kept: Vec<_> = candidates
            .par_iter()
            .filter_map(|record| {
                let mut necessity = is_needed(record, &targets);
                if options.inverse {
                    necessity = necessity.inverted();
                }
                necessity
                    .needed
                    .then(|| (record.name.clone(), necessity.per_engine))
            })
            .collect();

        let list = kept.iter().map(|(name, _)| name.clone()).collect();
        let targets = kept.into_iter().collect();

        Ok(ResolutionResult { list, targets })
    }
}

impl Resolver<'static> {
    /// Resolver over the bundled registry
    pub fn bundled() -> ResolverResult<Self> {
        Registry::bundled().map(Resolver::new)
    }
}

/// Resolve `options` against the bundled registry
pub fn compat(options: &CompatOptions) -> ResolverResult<ResolutionResult> {
    Resolver::bundled()?.resolve(options)
}

/// Resolve JSON options against the bundled registry
pub fn compat_json(options: Value) -> ResolverResult<ResolutionResult> {
    compat(&CompatOptions::from_json_value(options)?)
}
