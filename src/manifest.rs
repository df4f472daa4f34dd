//! Jar manifest reading for `Class-Path` expansion.
//!
//! Only the main section matters here: attribute lines, continuation lines
//! prefixed with a single space, terminated by the first blank line. Every
//! failure is swallowed; a jar without a readable manifest simply
//! contributes no transitive references.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;
use zip::ZipArchive;

const MANIFEST_ENTRY: &str = "META-INF/MANIFEST.MF";
const CLASSPATH_ATTRIBUTE: &str = "Class-Path";

/// Read the main manifest attributes of an archive.
///
/// `None` covers every failure mode: unreadable file, not a zip, no
/// manifest entry, undecodable content.
pub fn main_attributes(archive_path: &Path) -> Option<BTreeMap<String, String>> {
    let file = match File::open(archive_path) {
        Ok(file) => file,
        Err(e) => {
            debug!("cannot open {}: {}", archive_path.display(), e);
            return None;
        }
    };
    let mut archive = match ZipArchive::new(file) {
        Ok(archive) => archive,
        Err(e) => {
            debug!("not an archive {}: {}", archive_path.display(), e);
            return None;
        }
    };
    let mut entry = match archive.by_name(MANIFEST_ENTRY) {
        Ok(entry) => entry,
        Err(_) => return None,
    };

    let mut text = String::new();
    if let Err(e) = entry.read_to_string(&mut text) {
        debug!("cannot read manifest of {}: {}", archive_path.display(), e);
        return None;
    }
    Some(parse_main_section(&text))
}

/// Expand a captured `Class-Path` attribute into raw references rooted at
/// the owning archive's directory. Tokens not ending in `.jar` are
/// ignored.
pub fn classpath_refs(attributes: &BTreeMap<String, String>, owning_filename: &str) -> Vec<String> {
    let Some(classpath) = attributes.get(CLASSPATH_ATTRIBUTE) else {
        return Vec::new();
    };
    if classpath.trim().is_empty() {
        return Vec::new();
    }

    let base = match owning_filename.rfind('/') {
        Some(slash) => &owning_filename[..slash],
        None => ".",
    };

    classpath
        .split(' ')
        .filter(|token| !token.is_empty())
        .filter(|token| token.ends_with(".jar"))
        .map(|token| format!("{base}/{token}"))
        .collect()
}

fn parse_main_section(text: &str) -> BTreeMap<String, String> {
    let mut attributes = BTreeMap::new();
    let mut current: Option<(String, String)> = None;

    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            // end of the main section
            break;
        }
        if let Some(continuation) = line.strip_prefix(' ') {
            if let Some((_, value)) = current.as_mut() {
                value.push_str(continuation);
            }
            continue;
        }
        if let Some((name, value)) = current.take() {
            attributes.insert(name, value);
        }
        if let Some((name, value)) = line.split_once(": ") {
            if !name.is_empty() {
                current = Some((name.to_string(), value.to_string()));
            }
        }
    }
    if let Some((name, value)) = current {
        attributes.insert(name, value);
    }

    attributes
}
