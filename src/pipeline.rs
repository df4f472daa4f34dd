//! End-to-end harvest run.

use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::catalog::LibraryCatalog;
use crate::config::HarvestConfig;
use crate::error::Result;
use crate::publish::{self, PublishUnit};
use crate::writer::DescriptorWriter;

/// Everything one run produced.
#[derive(Debug)]
pub struct HarvestOutcome {
    pub catalog: LibraryCatalog,
    pub units: Vec<PublishUnit>,
    pub summary: HarvestSummary,
}

/// Run statistics.
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    pub archives_scanned: usize,
    pub descriptors_found: usize,
    pub libraries: usize,
    pub entries: usize,
    pub documents_written: usize,
    /// Documents that could not be written. The run still completes.
    pub failed_documents: Vec<PathBuf>,
    pub duration: Duration,
}

/// Drives scan, document generation and publish plan assembly.
pub struct Harvester {
    config: HarvestConfig,
}

impl Harvester {
    pub fn new(config: HarvestConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Scan the installation tree, write every document and assemble the
    /// publish plan.
    ///
    /// Only an inaccessible install root or a traversal error aborts the
    /// run. Individual document failures are logged and surfaced through
    /// the summary instead.
    pub fn run(&self) -> Result<HarvestOutcome> {
        let started = Instant::now();
        let catalog = LibraryCatalog::scan(&self.config)?;

        let writer = DescriptorWriter::new(&self.config, &catalog);
        let mut documents_written = 0;
        let mut failed_documents = Vec::new();

        for library in &catalog.libraries {
            match writer.write_library_pom(library) {
                Ok(_) => documents_written += 1,
                Err(e) => {
                    warn!("cannot write pom for library {}: {}", library.name, e);
                    failed_documents.push(library.pom_path.clone());
                }
            }
        }

        match writer.write_dependency_management() {
            Ok(_) => documents_written += 1,
            Err(e) => {
                warn!("cannot write dependency management file: {}", e);
                failed_documents.push(self.config.work_dir.join("dependencyManagement.xml"));
            }
        }

        let plan = publish::assemble(&self.config, &catalog, &writer);
        documents_written += plan.documents_written;
        failed_documents.extend(plan.failed_documents);

        match publish::write_plan(&self.config, &plan.units) {
            Ok(_) => documents_written += 1,
            Err(e) => {
                warn!("cannot write publish plan: {}", e);
                failed_documents.push(self.config.work_dir.join("publish-plan.json"));
            }
        }

        let summary = HarvestSummary {
            archives_scanned: catalog.archives_scanned,
            descriptors_found: catalog.descriptors_found,
            libraries: catalog.libraries.len(),
            entries: catalog.entry_count(),
            documents_written,
            failed_documents,
            duration: started.elapsed(),
        };
        info!(
            "harvest complete: {} libraries, {} entries, {} documents in {:?}",
            summary.libraries, summary.entries, summary.documents_written, summary.duration
        );
        if !summary.failed_documents.is_empty() {
            warn!("{} documents failed", summary.failed_documents.len());
        }

        Ok(HarvestOutcome {
            catalog,
            units: plan.units,
            summary,
        })
    }
}
