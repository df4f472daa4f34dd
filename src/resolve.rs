//! Classpath reference resolution.
//!
//! Descriptor references are relative paths written against the historical
//! `jdev/extensions` layout, absolute paths, or one of three symbolic
//! placeholders. Resolution substitutes placeholders, then probes the
//! filesystem and freezes the outcome into the entry.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config::HarvestConfig;

const JDBC_PLACEHOLDER: &str = "${jdbc.library}";
const ORAI18N_PLACEHOLDER: &str = "${orai18n.library}";
const INSTALL_HOME_PLACEHOLDER: &str = "${ide.extension.install.home}";

/// Per-archive resolution context, threaded through every call.
pub struct ResolveContext<'a> {
    pub config: &'a HarvestConfig,
    /// Canonical installation root.
    pub install_root: &'a Path,
    /// Archive whose descriptor is currently being parsed.
    pub current_archive: &'a Path,
}

/// Outcome of resolving one raw reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRef {
    /// Canonical forward-slash path on success, the substituted string
    /// otherwise.
    pub filename: String,
    pub exists: bool,
}

/// Resolve a raw descriptor reference to a file on disk.
///
/// Probes, in order: the substituted path as written, the path under the
/// install root, the path under the install root's parent. The first
/// candidate that is a regular file wins; a directory at an earlier
/// candidate does not stop the probe. When nothing matches, the
/// substituted string is kept with `exists = false` so the reference can
/// still be reported.
pub fn resolve(raw: &str, ctx: &ResolveContext) -> ResolvedRef {
    let (substituted, symbolic) = substitute(raw, ctx);
    let probe_path = strip_parent_convention(&substituted);

    let candidates = [
        PathBuf::from(probe_path),
        ctx.install_root.join(probe_path),
        ctx.install_root.join("..").join(probe_path),
    ];

    for candidate in &candidates {
        if !candidate.is_file() {
            continue;
        }
        let filename = match candidate.canonicalize() {
            Ok(canonical) => canonical.to_string_lossy().replace('\\', "/"),
            Err(e) => {
                warn!("cannot canonicalize {}: {}", candidate.display(), e);
                substituted.clone()
            }
        };
        if symbolic {
            debug!("overriding symbolic {} with {}", raw, filename);
        }
        return ResolvedRef {
            filename,
            exists: true,
        };
    }

    ResolvedRef {
        filename: substituted,
        exists: false,
    }
}

/// Apply placeholder substitution. Returns the substituted string and
/// whether a symbolic placeholder was involved.
fn substitute(raw: &str, ctx: &ResolveContext) -> (String, bool) {
    if raw == JDBC_PLACEHOLDER {
        (ctx.config.jdbc_library_path.clone(), true)
    } else if raw == ORAI18N_PLACEHOLDER {
        (ctx.config.orai18n_library_path.clone(), true)
    } else if raw.contains(INSTALL_HOME_PLACEHOLDER) {
        (raw.replace(INSTALL_HOME_PLACEHOLDER, &install_home(ctx)), true)
    } else if let Some(rest) = raw.strip_prefix("./").or_else(|| raw.strip_prefix(".\\")) {
        (rest.to_string(), false)
    } else {
        (raw.to_string(), false)
    }
}

/// The extension's own install directory: the current archive path with
/// its file extension dropped and the install root replaced by `.`.
fn install_home(ctx: &ResolveContext) -> String {
    let archive = ctx.current_archive.to_string_lossy();
    let truncated = match archive.rfind('.') {
        Some(dot) => &archive[..dot],
        None => archive.as_ref(),
    };
    let root = ctx.install_root.to_string_lossy();
    truncated.replace(root.as_ref(), ".")
}

/// Descriptor references lead with `../..` to climb out of the historical
/// `jdev/extensions` directory; the probe locations already account for
/// that, so the prefix is dropped before probing.
fn strip_parent_convention(path: &str) -> &str {
    match path.strip_prefix("../..") {
        Some(rest) => rest
            .strip_prefix('/')
            .or_else(|| rest.strip_prefix('\\'))
            .unwrap_or(rest),
        None => path,
    }
}
