//! Selector matching against a registry's feature names

use std::collections::BTreeSet;

use shimlist_config::selector::Selector;
use shimlist_core::error::ShimError;
use shimlist_registry::Registry;
use tracing::debug;

use crate::ResolverResult;

/// Resolve a selector to the concrete features it names.
///
/// Literal names the registry does not know contribute nothing. An unknown
/// group is an error, raised before anything else is matched.
pub fn match_selector<'r>(
    selector: &Selector,
    registry: &'r Registry,
) -> ResolverResult<BTreeSet<&'r str>> {
    let mut matched = BTreeSet::new();
    collect(selector, registry, &mut matched)?;
    Ok(matched)
}

fn collect<'r>(
    selector: &Selector,
    registry: &'r Registry,
    matched: &mut BTreeSet<&'r str>,
) -> ResolverResult<()> {
    match selector {
        Selector::Literal(name) => match registry.get(name) {
            Some(record) => {
                matched.insert(record.name.as_str());
            },
            None => debug!(feature = %name, "dropping unknown feature"),
        },
        Selector::Group(name) => {
            let members = registry
                .group(name)
                .ok_or_else(|| ShimError::invalid_selector(name.as_str(), "unknown aggregate group"))?;
            matched.extend(
                members
                    .iter()
                    .filter_map(|member| registry.get(member))
                    .map(|record| record.name.as_str()),
            );
        },
        Selector::Pattern(pattern) => {
            matched.extend(registry.names().filter(|name| pattern.is_match(name)));
        },
        Selector::Sequence(items) => {
            for item in items {
                collect(item, registry, matched)?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shimlist_registry::FeatureRecord;

    fn registry() -> Registry {
        let records = [
            "es.array.at",
            "es.array.iterator",
            "es.math.acosh",
            "es.math.asinh",
            "es.math.cbrt",
            "es.map",
        ]
        .into_iter()
        .map(FeatureRecord::new);
        let groups = [
            (
                "core-js/es/math".to_string(),
                vec![
                    "es.math.acosh".to_string(),
                    "es.math.asinh".to_string(),
                    "es.math.cbrt".to_string(),
                    "es.math.removed".to_string(),
                ],
            ),
        ];
        Registry::new(None, records, groups).unwrap()
    }

    fn names(set: BTreeSet<&str>) -> Vec<&str> {
        set.into_iter().collect()
    }

    #[test]
    fn test_literal() {
        let registry = registry();
        let matched = match_selector(&Selector::literal("es.map"), &registry).unwrap();
        assert_eq!(names(matched), vec!["es.map"]);
    }

    #[test]
    fn test_unknown_literal_is_dropped() {
        let registry = registry();
        let matched = match_selector(&Selector::literal("es.array.flat-mapp"), &registry).unwrap();
        assert!(matched.is_empty());
    }

    #[test]
    fn test_group_filters_unknown_members() {
        let registry = registry();
        let matched = match_selector(&Selector::group("core-js/es/math"), &registry).unwrap();
        assert_eq!(names(matched), vec!["es.math.acosh", "es.math.asinh", "es.math.cbrt"]);
    }

    #[test]
    fn test_root_group_is_everything() {
        let registry = registry();
        let matched = match_selector(&Selector::all(), &registry).unwrap();
        assert_eq!(matched.len(), registry.feature_count());
    }

    #[test]
    fn test_unknown_group_fails() {
        let registry = registry();
        let selector = Selector::Sequence(vec![
            Selector::literal("es.map"),
            Selector::group("core-js/es/nothing"),
        ]);
        let err = match_selector(&selector, &registry).unwrap_err();
        assert!(matches!(err, ShimError::InvalidSelector { ref selector, .. } if selector == "core-js/es/nothing"));
    }

    #[test]
    fn test_pattern() {
        let registry = registry();
        let selector = Selector::parse_str("/^es\\.math\\.a/").unwrap();
        let matched = match_selector(&selector, &registry).unwrap();
        assert_eq!(names(matched), vec!["es.math.acosh", "es.math.asinh"]);
    }

    #[test]
    fn test_sequence_is_a_union() {
        let registry = registry();
        let selector = Selector::Sequence(vec![
            Selector::group("core-js/es/math"),
            Selector::literal("es.math.cbrt"),
            Selector::parse_str("/^es\\.array/").unwrap(),
        ]);
        let matched = match_selector(&selector, &registry).unwrap();
        assert_eq!(
            names(matched),
            vec![
                "es.array.at",
                "es.array.iterator",
                "es.math.acosh",
                "es.math.asinh",
                "es.math.cbrt"
            ]
        );
    }

    #[test]
    fn test_empty_sequence() {
        let registry = registry();
        assert!(match_selector(&Selector::none(), &registry).unwrap().is_empty());
    }
}
