//! Transitive dependency closure
//!
//! Walks the registry's `feature -> dependency` graph from every seed with a
//! shared depth-first search, so each node is visited at most once and
//! cycles terminate.

use std::collections::BTreeSet;

use petgraph::visit::Dfs;
use shimlist_registry::Registry;
use tracing::trace;

/// Expand `seed` with every transitive dependency.
///
/// Names missing from the registry are ignored. The result contains the seed.
pub fn close<'r, 's, I>(registry: &'r Registry, seed: I) -> BTreeSet<&'r str>
where
    I: IntoIterator<Item = &'s str>,
{
    let graph = registry.graph();
    let mut closure = BTreeSet::new();
    let mut dfs = Dfs::empty(graph);

    for name in seed {
        let Some(start) = registry.node_index(name) else {
            continue;
        };
        // discovered is kept across seeds: reachable nodes are only walked once
        if dfs.discovered.contains(start.index()) {
            continue;
        }
        dfs.move_to(start);
        while let Some(node) = dfs.next(graph) {
            closure.insert(graph[node].as_str());
        }
    }

    trace!(size = closure.len(), "dependency closure computed");
    closure
}

#[cfg(test)]
mod tests {
    use super::*;
    use shimlist_registry::FeatureRecord;

    fn registry() -> Registry {
        let records = vec![
            FeatureRecord::new("es.map")
                .with_dependency("es.array.iterator")
                .with_dependency("es.string.iterator"),
            FeatureRecord::new("es.array.iterator").with_dependency("es.symbol.iterator"),
            FeatureRecord::new("es.string.iterator").with_dependency("es.symbol.iterator"),
            FeatureRecord::new("es.symbol.iterator").with_dependency("es.symbol"),
            FeatureRecord::new("es.symbol"),
            FeatureRecord::new("es.math.acosh"),
            // a <-> b
            FeatureRecord::new("cycle.a").with_dependency("cycle.b"),
            FeatureRecord::new("cycle.b").with_dependency("cycle.a"),
        ];
        Registry::new(None, records, Vec::new()).unwrap()
    }

    fn names(set: BTreeSet<&str>) -> Vec<&str> {
        set.into_iter().collect()
    }

    #[test]
    fn test_transitive() {
        let registry = registry();
        assert_eq!(
            names(close(&registry, ["es.map"])),
            vec![
                "es.array.iterator",
                "es.map",
                "es.string.iterator",
                "es.symbol",
                "es.symbol.iterator"
            ]
        );
    }

    #[test]
    fn test_leaf_is_its_own_closure() {
        let registry = registry();
        assert_eq!(names(close(&registry, ["es.math.acosh"])), vec!["es.math.acosh"]);
    }

    #[test]
    fn test_cycle_terminates() {
        let registry = registry();
        assert_eq!(names(close(&registry, ["cycle.a"])), vec!["cycle.a", "cycle.b"]);
    }

    #[test]
    fn test_idempotent() {
        let registry = registry();
        let once = close(&registry, ["es.string.iterator", "es.math.acosh"]);
        let twice = close(&registry, once.iter().copied());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_overlapping_seeds() {
        let registry = registry();
        let closure = close(&registry, ["es.symbol", "es.map", "es.symbol.iterator"]);
        assert_eq!(closure.len(), 5);
    }

    #[test]
    fn test_unknown_and_empty_seed() {
        let registry = registry();
        assert!(close(&registry, ["es.unknown"]).is_empty());
        assert!(close(&registry, std::iter::empty()).is_empty());
    }
}
