//! Ordering of configuration versions for the top-level `version` field.

use std::{cmp::Reverse, sync::LazyLock};

use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::schema::SchemaNode;

#[allow(clippy::expect_used)]
static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^v(\d+)(?:(alpha|beta)(\d+))?$").expect("Version pattern must compile")
});

/// Sorts version names newest first.
///
/// Names look like `v1`, `v2beta3` or `v1alpha10`. Major versions sort
/// descending, a stable release sorts above its betas, betas above alphas,
/// and minors descending. Names that don't parse keep their relative order
/// after all parsed ones.
pub fn sort_versions(versions: &[String]) -> Vec<String> {
    let mut keyed: Vec<(Option<(u32, u8, u32)>, &String)> = versions
        .iter()
        .map(|version| (parse_version(version), version))
        .collect();

    keyed.sort_by_key(|(key, _)| match key {
        Some(key) => (false, Reverse(*key)),
        None => (true, Reverse((0, 0, 0))),
    });

    keyed.into_iter().map(|(_, version)| version.clone()).collect()
}

fn parse_version(version: &str) -> Option<(u32, u8, u32)> {
    let captures = VERSION_PATTERN.captures(version)?;
    let major = captures.get(1)?.as_str().parse().ok()?;

    let stage = match captures.get(2).map(|stage| stage.as_str()) {
        None => 2,
        Some("beta") => 1,
        Some(_) => 0,
    };

    let minor = match captures.get(3) {
        Some(minor) => minor.as_str().parse().ok()?,
        None => 0,
    };

    Some((major, stage, minor))
}

/// Replaces the enum of the root property `field` with `versions`, newest
/// first.
///
/// Returns `false` if the root has no such property.
pub fn apply_version_enum(root: &mut SchemaNode, field: &str, versions: &[String]) -> bool {
    let Some(version_field) = root.property_mut(field) else {
        debug!(field, "No version field on root schema");
        return false;
    };

    let sorted = sort_versions(versions);
    debug!(field, versions = ?sorted, "Applying version enum");
    version_field.enum_values = sorted.into_iter().map(Value::String).collect();

    true
}
