//! Installation tree scan assembling the library catalog.

use indexmap::IndexMap;
use std::path::PathBuf;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::HarvestConfig;
use crate::descriptor::DescriptorParser;
use crate::error::{HarvestError, Result};
use crate::model::{JarEntry, Library};

/// All libraries harvested from one installation tree, together with the
/// resolved roots the coordinate derivation needs.
#[derive(Debug)]
pub struct LibraryCatalog {
    pub libraries: Vec<Library>,
    /// Canonicalized installation root.
    pub install_root: PathBuf,
    /// Parent of the install root, forward slashes. Jars living under this
    /// directory get structural group ids.
    pub middleware_home: String,
    /// Regular `.jar` files examined during the walk.
    pub archives_scanned: usize,
    /// Archives whose descriptor yielded at least one library.
    pub descriptors_found: usize,
}

impl LibraryCatalog {
    /// Walk the installation tree and parse every jar archive.
    ///
    /// The walk is depth-first in file-name order so repeated runs over an
    /// unchanged tree produce identical catalogs. Symbolic links are
    /// followed, so install trees assembled from linked module directories
    /// harvest completely. An inaccessible install root or a traversal
    /// error aborts the run; everything below that level degrades per
    /// archive.
    pub fn scan(config: &HarvestConfig) -> Result<Self> {
        let install_root =
            config
                .install_root
                .canonicalize()
                .map_err(|source| HarvestError::InstallRoot {
                    path: config.install_root.clone(),
                    source,
                })?;
        let middleware_home = install_root
            .parent()
            .unwrap_or(&install_root)
            .to_string_lossy()
            .replace('\\', "/");
        info!("scanning {}", install_root.display());

        let parser = DescriptorParser::new(config, &install_root);
        let mut libraries = Vec::new();
        let mut archives_scanned = 0;
        let mut descriptors_found = 0;

        for entry in WalkDir::new(&install_root)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("jar") {
                continue;
            }
            archives_scanned += 1;

            let found = parser.parse_archive(path);
            if !found.is_empty() {
                debug!("{}: {} libraries", path.display(), found.len());
                descriptors_found += 1;
                libraries.extend(found);
            }
        }

        info!(
            "collected {} libraries from {} of {} archives",
            libraries.len(),
            descriptors_found,
            archives_scanned
        );
        Ok(Self {
            libraries,
            install_root,
            middleware_home,
            archives_scanned,
            descriptors_found,
        })
    }

    /// Dependency entries of all libraries, deduplicated by resolved
    /// filename with the first occurrence winning. Source and doc entries
    /// never make it into this view.
    pub fn flattened_entries(&self) -> Vec<&JarEntry> {
        let mut seen: IndexMap<&str, &JarEntry> = IndexMap::new();
        for library in &self.libraries {
            for entry in &library.entries {
                if !entry.kind.is_dependency() {
                    continue;
                }
                seen.entry(entry.filename.as_str()).or_insert(entry);
            }
        }
        seen.into_values().collect()
    }

    /// Libraries ordered by display name, for the aggregate document.
    /// Two libraries sharing a name collapse to the first discovered;
    /// their entries still all feed [`Self::flattened_entries`].
    pub fn sorted_libraries(&self) -> Vec<&Library> {
        let mut seen: IndexMap<&str, &Library> = IndexMap::new();
        for library in &self.libraries {
            seen.entry(library.name.as_str()).or_insert(library);
        }
        let mut sorted: Vec<&Library> = seen.into_values().collect();
        sorted.sort_by(|a, b| a.name.cmp(&b.name));
        sorted
    }

    /// Total entry count across all libraries, before deduplication.
    pub fn entry_count(&self) -> usize {
        self.libraries.iter().map(|l| l.entries.len()).sum()
    }
}
