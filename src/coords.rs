//! Maven coordinate derivation.
//!
//! Jar coordinates come from the resolved filesystem path. With the
//! middleware home stripped, the remaining directory segments become the
//! group id and the file stem becomes the artifact id:
//! `<mw>/BC4J/lib/adfshare.jar` maps to group
//! `<prefix>.jars.BC4J.lib`, artifact `adfshare`.
//!
//! Library coordinates come from the configured prefix and the sanitized
//! display name instead.
//!
//! All derivations are pure string functions; two runs over an unchanged
//! tree produce identical ids.

/// Group id shared by all library artifacts of a run.
pub fn library_group_id(prefix: &str) -> String {
    format!("{prefix}.library")
}

/// Artifact id for a library display name.
///
/// Spaces, parentheses, and slashes each become `_`; runs of `_` collapse
/// to one and a trailing `_` is dropped, so `"My Lib (v2)"` gives
/// `"My_Lib_v2"`.
pub fn library_artifact_id(name: &str) -> String {
    let id: String = name
        .chars()
        .map(|c| if matches!(c, ' ' | '(' | ')' | '/') { '_' } else { c })
        .collect();
    let id = collapse_underscores(id);
    match id.strip_suffix('_') {
        Some(stripped) => stripped.to_string(),
        None => id,
    }
}

/// Group id for a resolved jar path.
pub fn jar_group_id(filename: &str, middleware_home: &str, prefix: &str) -> String {
    let path = match filename.strip_prefix(middleware_home) {
        Some(rest) if !middleware_home.is_empty() => rest.strip_prefix('/').unwrap_or(rest),
        _ => filename,
    };

    let segments: Vec<&str> = path.split('/').collect();
    // First segment verbatim; middle segments joined with `.`, their own
    // dots turned into `_` so they cannot collide with the separator; the
    // filename segment is dropped.
    let mut group = segments[0].to_string();
    if segments.len() > 1 {
        for segment in &segments[1..segments.len() - 1] {
            group.push('.');
            group.push_str(&segment.replace('.', "_"));
        }
    }

    let mut group = group.trim_start_matches('.').to_string();
    // A path with no directory part leaves the filename as the seed.
    if let Some(stripped) = group.strip_suffix(".jar") {
        group = stripped.to_string();
    }
    group = collapse_underscores(group);
    if let Some(stripped) = group.strip_suffix('_') {
        group = stripped.to_string();
    }

    format!("{prefix}.jars.{group}")
}

/// Artifact id for a resolved jar path: the file stem between the last `/`
/// and the last `.`. Falls back to the whole string when that slice does
/// not exist.
pub fn jar_artifact_id(filename: &str) -> String {
    let start = filename.rfind('/').map(|i| i + 1).unwrap_or(0);
    match filename.rfind('.') {
        Some(dot) if dot >= start => filename[start..dot].to_string(),
        _ => filename.to_string(),
    }
}

fn collapse_underscores(mut s: String) -> String {
    while s.contains("__") {
        s = s.replace("__", "_");
    }
    s
}
