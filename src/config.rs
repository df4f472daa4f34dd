//! Run configuration for one harvest.
//!
//! Everything the pipeline needs is carried in this one value and threaded
//! down the call chain; there is no ambient process-wide state.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default prefix for generated Maven group ids.
pub const DEFAULT_GROUP_ID_PREFIX: &str = "com.oracle.jdeveloper";

/// Default packaging type for library artifacts.
pub const DEFAULT_PACKAGING: &str = "pom";

/// Historical substitution target for the `${jdbc.library}` placeholder.
pub const DEFAULT_JDBC_LIBRARY_PATH: &str = "../../../wlserver_10.3/server/lib/ojdbc6.jar";

/// Historical substitution target for the `${orai18n.library}` placeholder.
pub const DEFAULT_ORAI18N_LIBRARY_PATH: &str =
    "../../../oracle_common/modules/oracle.nlsrtl_11.1.0/orai18n.jar";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// IDE installation root that is scanned for library archives.
    pub install_root: PathBuf,
    /// Directory that receives the generated documents.
    pub work_dir: PathBuf,
    /// Fixed publish version applied to every library and jar in the run.
    pub version: String,
    /// Prefix for every generated group id.
    pub group_id_prefix: String,
    /// Packaging type recorded on library artifacts.
    pub packaging: String,
    /// Follow `Class-Path` manifest attributes of resolved classpath jars.
    pub follow_manifest_classpath: bool,
    /// Emit per-file progress at debug level.
    pub verbose: bool,
    /// Substitution target for the `${jdbc.library}` placeholder.
    ///
    /// The historical default matches a WebLogic 10.3 middleware layout;
    /// override it when the target environment differs.
    pub jdbc_library_path: String,
    /// Substitution target for the `${orai18n.library}` placeholder.
    pub orai18n_library_path: String,
}

impl HarvestConfig {
    pub fn new(
        install_root: impl Into<PathBuf>,
        work_dir: impl Into<PathBuf>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            install_root: install_root.into(),
            work_dir: work_dir.into(),
            version: version.into(),
            group_id_prefix: DEFAULT_GROUP_ID_PREFIX.to_string(),
            packaging: DEFAULT_PACKAGING.to_string(),
            follow_manifest_classpath: true,
            verbose: false,
            jdbc_library_path: DEFAULT_JDBC_LIBRARY_PATH.to_string(),
            orai18n_library_path: DEFAULT_ORAI18N_LIBRARY_PATH.to_string(),
        }
    }

    pub fn with_group_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.group_id_prefix = prefix.into();
        self
    }

    pub fn with_packaging(mut self, packaging: impl Into<String>) -> Self {
        self.packaging = packaging.into();
        self
    }

    pub fn with_manifest_classpath(mut self, follow: bool) -> Self {
        self.follow_manifest_classpath = follow;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_jdbc_library_path(mut self, path: impl Into<String>) -> Self {
        self.jdbc_library_path = path.into();
        self
    }

    pub fn with_orai18n_library_path(mut self, path: impl Into<String>) -> Self {
        self.orai18n_library_path = path.into();
        self
    }

    /// Directory holding the per-library descriptor documents.
    pub fn pom_dir(&self) -> PathBuf {
        self.work_dir.join("poms")
    }

    /// Directory holding the generated per-jar coordinate documents.
    pub fn jar_pom_dir(&self) -> PathBuf {
        self.pom_dir().join("jars")
    }
}
