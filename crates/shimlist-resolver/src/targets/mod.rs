//! Target normalization
//!
//! Turns every accepted `targets` shape into one canonical map of
//! engine -> minimum version. Engines the registry has never heard of are
//! kept as given: nothing declares native support for them, so every
//! feature stays needed there.

use std::collections::{BTreeMap, BTreeSet};

use shimlist_config::targets::{TargetValue, TargetsSpec};
use shimlist_core::error::ShimError;
use shimlist_core::types::{EngineId, TargetVersion};
use tracing::debug;

use crate::ResolverResult;

/// Canonical targets: every engine at or above the given version must work
pub type TargetMap = BTreeMap<EngineId, TargetVersion>;

/// Engines with native ES module support, at the first version that has it
const ESMODULES: &[(&str, &str)] = &[
    ("android", "61"),
    ("chrome", "61"),
    ("chrome-android", "61"),
    ("deno", "1.0"),
    ("edge", "16"),
    ("firefox", "60"),
    ("firefox-android", "60"),
    ("ios", "10.3"),
    ("opera", "48"),
    ("opera-android", "45"),
    ("safari", "10.1"),
    ("samsung", "8.2"),
];

/// Pseudo-engines that stand for a bundle of real engine floors
const PRESETS: &[(&str, &[(&str, &str)])] = &[("esmodules", ESMODULES)];

/// Browser-usage engine names that differ from the support data
const ALIASES: &[(&str, &str)] = &[
    ("and_chr", "chrome-android"),
    ("and_ff", "firefox-android"),
    ("ie_mob", "ie"),
    ("ios_saf", "ios"),
    ("op_mob", "opera-android"),
    ("opera_mobile", "opera-android"),
    ("samsung_internet", "samsung"),
];

/// Floors of a named preset
pub fn preset(name: &str) -> Option<&'static [(&'static str, &'static str)]> {
    PRESETS
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(_, floors)| *floors)
}

/// Canonical engine name for an alias; other names pass through unchanged
pub fn canonical_engine(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map_or(name, |(_, engine)| *engine)
}

/// Normalize a targets specification.
///
/// `known_engines` is the set a scalar version is spread over.
pub fn normalize_targets(
    spec: &TargetsSpec,
    known_engines: &BTreeSet<String>,
) -> ResolverResult<TargetMap> {
    let targets = match spec {
        TargetsSpec::Absent => TargetMap::new(),
        TargetsSpec::Scalar(version) => known_engines
            .iter()
            .map(|engine| (engine.clone(), version.clone()))
            .collect(),
        TargetsSpec::Query(query) => {
            let mut targets = TargetMap::new();
            merge_query(&mut targets, query)?;
            targets
        },
        TargetsSpec::Map(entries) => normalize_map(entries.iter())?,
    };

    debug!(engines = targets.len(), "normalized targets");
    Ok(targets)
}

fn normalize_map<'a, I>(entries: I) -> ResolverResult<TargetMap>
where
    I: Iterator<Item = (&'a String, &'a TargetValue)>,
{
    let mut targets = TargetMap::new();
    let mut intersect_with = Vec::new();

    for (key, value) in entries {
        if let Some(floors) = preset(key) {
            match value {
                TargetValue::Flag(true) => merge_floors(&mut targets, floors)?,
                TargetValue::Flag(false) => {},
                TargetValue::Text(mode) if mode == "intersect" => intersect_with.push(floors),
                other => {
                    return Err(ShimError::invalid_targets(
                        format!("{}: {:?}", key, other),
                        "presets accept true, false or \"intersect\"",
                    ))
                },
            }
            continue;
        }

        if key == "browsers" {
            match value {
                TargetValue::Text(query) => merge_query(&mut targets, query)?,
                TargetValue::List(queries) => {
                    for query in queries {
                        merge_query(&mut targets, query)?;
                    }
                },
                TargetValue::Version(version) => {
                    return Err(ShimError::invalid_targets(
                        version.label(),
                        "'browsers' expects a query such as \"chrome 61\"",
                    ))
                },
                TargetValue::Flag(flag) => {
                    return Err(ShimError::invalid_targets(
                        flag.to_string(),
                        "'browsers' expects a query such as \"chrome 61\"",
                    ))
                },
            }
            continue;
        }

        match value {
            TargetValue::Version(version) => insert_min(&mut targets, canonical_engine(key), version.clone()),
            TargetValue::Text(text) => {
                return Err(ShimError::invalid_targets(
                    format!("{}: {}", key, text),
                    "engine targets must be concrete versions",
                ))
            },
            TargetValue::Flag(_) | TargetValue::List(_) => {
                return Err(ShimError::invalid_targets(
                    key.as_str(),
                    "engine targets must be concrete versions",
                ))
            },
        }
    }

    for floors in intersect_with {
        targets = intersect(targets, floors)?;
    }

    Ok(targets)
}

/// Keep engines the preset covers, raised to at least the preset floor
fn intersect(targets: TargetMap, floors: &[(&str, &str)]) -> ResolverResult<TargetMap> {
    if targets.is_empty() {
        let mut only_preset = TargetMap::new();
        merge_floors(&mut only_preset, floors)?;
        return Ok(only_preset);
    }

    let mut kept = TargetMap::new();
    for (engine, version) in targets {
        let Some((_, label)) = floors.iter().find(|(name, _)| *name == engine) else {
            continue;
        };
        let floor = floor_version(label)?;
        let raised = if version < floor { floor } else { version };
        kept.insert(engine, raised);
    }
    Ok(kept)
}

fn merge_floors(targets: &mut TargetMap, floors: &[(&str, &str)]) -> ResolverResult<()> {
    for (engine, label) in floors {
        insert_min(targets, engine, floor_version(label)?);
    }
    Ok(())
}

/// Preset floors keep their table spelling, like caller-supplied versions
fn floor_version(label: &str) -> ResolverResult<TargetVersion> {
    label
        .parse()
        .map_err(|_| ShimError::invalid_targets(label, "preset floor is not a version"))
}

/// Several versions for one engine: the lowest must be supported
fn insert_min(targets: &mut TargetMap, engine: &str, version: TargetVersion) {
    match targets.get_mut(engine) {
        Some(existing) if version < *existing => *existing = version,
        Some(_) => {},
        None => {
            targets.insert(engine.to_string(), version);
        },
    }
}

/// Merge a comma separated query like `"chrome 40, firefox 27"`.
///
/// Engine names are case-insensitive, a `"10.0-10.2"` range uses its lower
/// bound, and a bare preset name expands the preset.
fn merge_query(targets: &mut TargetMap, query: &str) -> ResolverResult<()> {
    for part in query.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let lowered = part.to_ascii_lowercase();
        let tokens: Vec<&str> = lowered.split_whitespace().collect();

        match tokens.as_slice() {
            [name] => {
                let floors = preset(name).ok_or_else(|| {
                    ShimError::invalid_targets(part, "expected '<engine> <version>' or a preset name")
                })?;
                merge_floors(targets, floors)?;
            },
            [engine, version] => {
                let lower_bound = version.split('-').next().unwrap_or(*version);
                let parsed: TargetVersion = lower_bound.parse().map_err(|_| {
                    ShimError::invalid_targets(part, format!("'{}' is not a version", version))
                })?;
                insert_min(targets, canonical_engine(engine), parsed);
            },
            _ => {
                return Err(ShimError::invalid_targets(
                    part,
                    "expected '<engine> <version>' or a preset name",
                ))
            },
        }
    }

    Ok(())
}
