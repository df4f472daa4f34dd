//! Publish plan assembly.
//!
//! Turns a harvested catalog into the flat list of artifacts a repository
//! deployer consumes: every library descriptor POM, and for every jar that
//! was actually found on disk a coordinate POM plus the jar itself.

use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::catalog::LibraryCatalog;
use crate::config::HarvestConfig;
use crate::error::Result;
use crate::writer::DescriptorWriter;

/// One artifact to publish: full Maven coordinates plus the backing file.
#[derive(Debug, Clone, Serialize)]
pub struct PublishUnit {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub packaging: String,
    pub file: PathBuf,
}

/// Assembled plan plus the outcome of the coordinate POM writes.
#[derive(Debug)]
pub struct PublishPlan {
    pub units: Vec<PublishUnit>,
    /// Coordinate POMs written while assembling.
    pub documents_written: usize,
    pub failed_documents: Vec<PathBuf>,
}

/// Assemble the publish plan for a harvested catalog.
///
/// Library units come first, in catalog order. Each existing
/// non-snapshot jar contributes two units, its coordinate POM directly
/// before the jar file. A jar whose coordinate POM cannot be written is
/// dropped from the plan entirely and recorded as failed.
pub fn assemble(
    config: &HarvestConfig,
    catalog: &LibraryCatalog,
    writer: &DescriptorWriter<'_>,
) -> PublishPlan {
    let mut units = Vec::new();
    let mut documents_written = 0;
    let mut failed_documents = Vec::new();

    for library in &catalog.libraries {
        units.push(PublishUnit {
            group_id: library.group_id.clone(),
            artifact_id: library.artifact_id(),
            version: library.version.clone(),
            packaging: library.packaging.clone(),
            file: library.pom_path.clone(),
        });
    }

    for entry in catalog.flattened_entries() {
        if !entry.exists {
            debug!("not publishable, no file: {}", entry.filename);
            continue;
        }
        if entry.is_snapshot() {
            debug!("not publishable, snapshot: {}", entry.filename);
            continue;
        }

        let group_id = entry.group_id(&catalog.middleware_home, &config.group_id_prefix);
        let artifact_id = entry.artifact_id();
        let pom_path = match writer.write_jar_pom(&group_id, &artifact_id) {
            Ok(path) => {
                documents_written += 1;
                path
            }
            Err(e) => {
                warn!("cannot write pom for {}: {}", entry.filename, e);
                failed_documents.push(
                    config
                        .jar_pom_dir()
                        .join(format!("{group_id}.{artifact_id}.pom")),
                );
                continue;
            }
        };

        units.push(PublishUnit {
            group_id: group_id.clone(),
            artifact_id: artifact_id.clone(),
            version: config.version.clone(),
            packaging: "pom".to_string(),
            file: pom_path,
        });
        units.push(PublishUnit {
            group_id,
            artifact_id,
            version: config.version.clone(),
            packaging: "jar".to_string(),
            file: PathBuf::from(&entry.filename),
        });
    }

    PublishPlan {
        units,
        documents_written,
        failed_documents,
    }
}

/// Serialize the plan to `<work_dir>/publish-plan.json`.
pub fn write_plan(config: &HarvestConfig, units: &[PublishUnit]) -> Result<PathBuf> {
    let path = config.work_dir.join("publish-plan.json");
    fs::create_dir_all(&config.work_dir)?;
    fs::write(&path, serde_json::to_string_pretty(units)?)?;
    info!("wrote {} ({} units)", path.display(), units.len());
    Ok(path)
}
