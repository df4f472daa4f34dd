//! Library and classpath-entry model.
//!
//! A `Library` is one named dependency group declared by an extension
//! descriptor; its `JarEntry` list holds every classpath reference the
//! descriptor (or a chased manifest) contributed, already resolved and
//! frozen. Values are immutable once parsing finishes; accumulation during
//! a parse goes through [`LibraryBuilder`].

use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::coords;
use crate::resolve::{self, ResolveContext};

/// Raw descriptor name that a legacy Coherence bundle ships unexpanded.
pub const COHERENCE_NAME_PLACEHOLDER: &str = "${COHERENCE_RUNTIME_LIB_NAME}";

/// Classpath entry classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Binary entry from a descriptor `classpath` element
    Jar,
    /// Source attachment from a `srcpath` element
    Source,
    /// Documentation attachment from a `docpath` element
    Doc,
    /// Binary entry chased from another jar's manifest `Class-Path`
    Manifest,
}

impl EntryKind {
    /// Kinds that surface as Maven dependencies; source and documentation
    /// attachments are informational only.
    pub fn is_dependency(self) -> bool {
        matches!(self, EntryKind::Jar | EntryKind::Manifest)
    }
}

/// One resolved classpath reference belonging to a library.
#[derive(Debug, Clone)]
pub struct JarEntry {
    pub kind: EntryKind,
    /// Reference string as written in the descriptor (or as constructed
    /// from a manifest token).
    pub raw: String,
    /// Canonical forward-slash path when resolution succeeded, the
    /// substituted string otherwise. Deduplication key.
    pub filename: String,
    /// Frozen at resolution time; later filesystem changes are not seen.
    pub exists: bool,
    /// Main manifest attributes, captured when classpath expansion opened
    /// this entry's archive.
    pub manifest_attributes: Option<BTreeMap<String, String>>,
}

impl JarEntry {
    /// Create an entry by resolving `raw` against the run context.
    pub fn resolve(kind: EntryKind, raw: impl Into<String>, ctx: &ResolveContext) -> Self {
        let raw = raw.into();
        let resolved = resolve::resolve(&raw, ctx);
        Self {
            kind,
            raw,
            filename: resolved.filename,
            exists: resolved.exists,
            manifest_attributes: None,
        }
    }

    pub fn artifact_id(&self) -> String {
        coords::jar_artifact_id(&self.filename)
    }

    pub fn group_id(&self, middleware_home: &str, prefix: &str) -> String {
        coords::jar_group_id(&self.filename, middleware_home, prefix)
    }

    /// Snapshot builds are never published.
    pub fn is_snapshot(&self) -> bool {
        self.filename.ends_with("-SNAPSHOT.jar")
    }
}

/// A named dependency group, finalized after its descriptor element closed.
#[derive(Debug, Clone)]
pub struct Library {
    pub name: String,
    /// Raw `deployed` attribute from the descriptor, when present.
    pub deployed: Option<String>,
    pub extension_id: Option<String>,
    pub extension_version: Option<String>,
    pub group_id: String,
    pub version: String,
    pub packaging: String,
    /// Archive whose descriptor declared this library.
    pub archive_path: PathBuf,
    /// Target path of the generated per-library document.
    pub pom_path: PathBuf,
    pub entries: Vec<JarEntry>,
}

impl Library {
    /// Maven artifact id derived from the display name.
    pub fn artifact_id(&self) -> String {
        coords::library_artifact_id(&self.name)
    }
}

/// Accumulates one library while its descriptor element is open.
#[derive(Debug, Default)]
pub(crate) struct LibraryBuilder {
    pub(crate) name: Option<String>,
    pub(crate) deployed: Option<String>,
    pub(crate) entries: Vec<JarEntry>,
}

impl LibraryBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Bind the display name, mapping the legacy Coherence placeholder to
    /// its real name. A rebind is logged, never silent.
    pub(crate) fn set_name(&mut self, raw: &str) {
        let name = if raw == COHERENCE_NAME_PLACEHOLDER {
            "Coherence Runtime"
        } else {
            raw
        };
        if let Some(old) = &self.name {
            warn!("renaming library '{}' to '{}'", old, name);
        }
        self.name = Some(name.to_string());
    }

    /// Append an entry unless one with the same resolved filename is
    /// already present. Returns the index of the stored entry when it was
    /// newly added.
    pub(crate) fn push(&mut self, entry: JarEntry) -> Option<usize> {
        if self.entries.iter().any(|e| e.filename == entry.filename) {
            debug!(
                "{}: duplicate entry dropped: {}",
                self.display_name(),
                entry.filename
            );
            return None;
        }
        if entry.exists {
            debug!("{}: adding {}", self.display_name(), entry.filename);
        } else {
            debug!(
                "{}: adding {} (does not exist on filesystem)",
                self.display_name(),
                entry.filename
            );
        }
        self.entries.push(entry);
        Some(self.entries.len() - 1)
    }

    pub(crate) fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }
}
