//! Feature registry backed by a petgraph dependency graph
//!
//! Features are nodes, `feature -> dependency` edges. Aggregate groups are
//! kept in a separate lookup and never enter the graph, so graph traversal
//! only ever sees concrete features.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use petgraph::graph::{DiGraph, NodeIndex};
use shimlist_core::error::ShimError;
use shimlist_core::types::{FeatureName, Version};
use shimlist_core::ROOT_GROUP;
use tracing::debug;

use crate::fixture::{parse_fixture, BUNDLED_FIXTURE};
use crate::record::FeatureRecord;
use crate::RegistryResult;

static BUNDLED: OnceCell<Registry> = OnceCell::new();

/// Immutable feature registry
#[derive(Debug)]
pub struct Registry {
    /// Version of the fixture the registry was built from
    fixture_version: Option<String>,
    /// Records in fixture order
    features: IndexMap<FeatureName, FeatureRecord>,
    /// Dependency graph, `feature -> dependency`
    graph: DiGraph<FeatureName, ()>,
    /// Map from feature name to NodeIndex for fast lookups
    node_map: HashMap<FeatureName, NodeIndex>,
    /// Aggregate group name -> member names
    groups: BTreeMap<String, Vec<FeatureName>>,
    /// Every engine that appears in any support table
    engines: BTreeSet<String>,
}

impl Registry {
    /// Build a registry from records and aggregate groups.
    ///
    /// Every dependency must name a record. Group members may name features
    /// the registry does not know; they are filtered out at match time.
    pub fn new<F, G>(fixture_version: Option<String>, records: F, groups: G) -> RegistryResult<Self>
    where
        F: IntoIterator<Item = FeatureRecord>,
        G: IntoIterator<Item = (String, Vec<FeatureName>)>,
    {
        let mut features = IndexMap::new();
        let mut graph = DiGraph::new();
        let mut node_map = HashMap::new();
        let mut engines = BTreeSet::new();

        for record in records {
            if record.name.is_empty() {
                return Err(ShimError::RegistryLoad {
                    message: "feature with an empty name".to_string(),
                });
            }
            if features.contains_key(&record.name) {
                return Err(ShimError::RegistryLoad {
                    message: format!("duplicate feature '{}'", record.name),
                });
            }
            engines.extend(record.support.keys().cloned());
            let index = graph.add_node(record.name.clone());
            node_map.insert(record.name.clone(), index);
            features.insert(record.name.clone(), record);
        }

        for record in features.values() {
            let from = node_map[&record.name];
            for dependency in &record.dependencies {
                let to = node_map.get(dependency).ok_or_else(|| ShimError::RegistryLoad {
                    message: format!(
                        "feature '{}' depends on unknown feature '{}'",
                        record.name, dependency
                    ),
                })?;
                graph.add_edge(from, *to, ());
            }
        }

        let mut lookup: BTreeMap<String, Vec<FeatureName>> = BTreeMap::new();
        for (name, members) in groups_from(groups) {
            if name.is_empty() {
                return Err(ShimError::RegistryLoad {
                    message: "aggregate group with an empty name".to_string(),
                });
            }
            lookup.insert(name, members);
        }
        if lookup.contains_key(ROOT_GROUP) {
            debug!("fixture defines '{}'; replacing it with the full feature list", ROOT_GROUP);
        }
        lookup.insert(ROOT_GROUP.to_string(), features.keys().cloned().collect());

        debug!(
            features = features.len(),
            edges = graph.edge_count(),
            groups = lookup.len(),
            "feature registry built"
        );

        Ok(Self {
            fixture_version,
            features,
            graph,
            node_map,
            groups: lookup,
            engines,
        })
    }

    /// Parse a registry from fixture JSON
    pub fn from_json(content: &str) -> RegistryResult<Self> {
        let raw = parse_fixture(content)?;
        let records = raw
            .features
            .into_iter()
            .map(|(name, feature)| feature.into_record(name))
            .collect::<RegistryResult<Vec<_>>>()?;
        Self::new(raw.version, records, raw.groups)
    }

    /// The registry compiled into the binary, parsed on first use
    pub fn bundled() -> RegistryResult<&'static Registry> {
        BUNDLED.get_or_try_init(|| Registry::from_json(BUNDLED_FIXTURE))
    }

    /// Get a feature by name
    pub fn get(&self, name: &str) -> Option<&FeatureRecord> {
        self.features.get(name)
    }

    /// Check whether a feature exists
    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// All feature names in fixture order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// All records in fixture order
    pub fn features(&self) -> impl Iterator<Item = &FeatureRecord> {
        self.features.values()
    }

    /// Members of an aggregate group
    pub fn group(&self, name: &str) -> Option<&[FeatureName]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// All aggregate group names, sorted
    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Every engine the support data mentions
    pub fn known_engines(&self) -> &BTreeSet<String> {
        &self.engines
    }

    /// Version of the fixture, if it declared one
    pub fn fixture_version(&self) -> Option<&str> {
        self.fixture_version.as_deref()
    }

    /// Direct dependencies of a feature
    pub fn dependencies_of(&self, name: &str) -> Option<&[FeatureName]> {
        self.features.get(name).map(|record| record.dependencies.as_slice())
    }

    /// Names of features shipped by the given library release
    pub fn modules_for_version(&self, release: &Version) -> Vec<&str> {
        self.features
            .values()
            .filter(|record| record.available_in(release))
            .map(|record| record.name.as_str())
            .collect()
    }

    /// Underlying dependency graph
    pub fn graph(&self) -> &DiGraph<FeatureName, ()> {
        &self.graph
    }

    /// Graph node of a feature
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    /// Get number of features in the registry
    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Get number of dependency edges in the registry
    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }
}

fn groups_from<G>(groups: G) -> impl Iterator<Item = (String, Vec<FeatureName>)>
where
    G: IntoIterator<Item = (String, Vec<FeatureName>)>,
{
    groups.into_iter().map(|(name, mut members)| {
        members.sort();
        members.dedup();
        (name, members)
    })
}
