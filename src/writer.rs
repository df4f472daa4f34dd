//! Maven document generation.
//!
//! Renders the per-library descriptor POMs, the aggregate
//! `dependencyManagement.xml` fragment and the per-jar coordinate POMs.
//! Rendering is pure string assembly over an already-resolved catalog, so
//! repeated runs over an unchanged tree produce byte-identical documents.

use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::catalog::LibraryCatalog;
use crate::config::HarvestConfig;
use crate::error::Result;
use crate::model::{EntryKind, JarEntry, Library};

pub struct DescriptorWriter<'a> {
    config: &'a HarvestConfig,
    catalog: &'a LibraryCatalog,
}

impl<'a> DescriptorWriter<'a> {
    pub fn new(config: &'a HarvestConfig, catalog: &'a LibraryCatalog) -> Self {
        Self { config, catalog }
    }

    /// Write the descriptor POM of one library, overwriting any previous
    /// version.
    pub fn write_library_pom(&self, library: &Library) -> Result<PathBuf> {
        let document = self.render_library_pom(library);
        if let Some(parent) = library.pom_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&library.pom_path, document)?;
        debug!("wrote {}", library.pom_path.display());
        Ok(library.pom_path.clone())
    }

    /// Write the aggregate dependency-management fragment covering every
    /// library and every deduplicated jar.
    pub fn write_dependency_management(&self) -> Result<PathBuf> {
        let path = self.config.work_dir.join("dependencyManagement.xml");
        fs::create_dir_all(&self.config.work_dir)?;
        fs::write(&path, self.render_dependency_management())?;
        info!("wrote {}", path.display());
        Ok(path)
    }

    /// Write the minimal coordinate POM accompanying one deployable jar.
    pub fn write_jar_pom(&self, group_id: &str, artifact_id: &str) -> Result<PathBuf> {
        let dir = self.config.jar_pom_dir();
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{group_id}.{artifact_id}.pom"));
        fs::write(
            &path,
            render_jar_pom(group_id, artifact_id, &self.config.version),
        )?;
        debug!("wrote {}", path.display());
        Ok(path)
    }

    fn render_library_pom(&self, library: &Library) -> String {
        let artifact_id = library.artifact_id();
        let deployed = library.deployed.as_deref().unwrap_or("false");
        let extension_id = library.extension_id.as_deref().unwrap_or("");
        let extension_version = library.extension_version.as_deref().unwrap_or("");
        let relative = library
            .archive_path
            .strip_prefix(&self.catalog.install_root)
            .unwrap_or(&library.archive_path)
            .to_string_lossy()
            .replace('\\', "/");

        let mut out = String::new();
        out.push_str("<project>\n");
        out.push_str("  <modelVersion>4.0.0</modelVersion>\n");
        out.push_str(&format!("  <groupId>{}</groupId>\n", library.group_id));
        out.push_str(&format!("  <artifactId>{artifact_id}</artifactId>\n"));
        out.push_str(&format!(
            "  <!-- JDeveloper library name: '{}' -->\n",
            library.name
        ));
        out.push_str(&format!("  <!-- Deployed by default: {deployed} -->\n"));
        out.push_str(&format!(
            "  <packaging>{}</packaging>\n",
            library.packaging
        ));
        out.push_str(&format!("  <version>{}</version>\n", library.version));
        out.push_str(&format!(
            "  <!-- This library pom was generated from ${{JDEVHOME}}/{relative}!META-INF/extension.xml -->\n"
        ));
        out.push_str(&format!("  <!-- Extension ID: '{extension_id}' -->\n"));
        out.push_str(&format!(
            "  <!-- Extension Version: '{extension_version}' -->\n"
        ));
        out.push_str(&format!("  <name>{}</name>\n", library.name));
        out.push_str("  <dependencies>\n");
        for entry in &library.entries {
            if entry.kind.is_dependency() {
                self.push_dependency(&mut out, library, entry);
            } else {
                debug!("{}: skipping {}", library.name, entry.filename);
            }
        }
        out.push_str("  </dependencies>\n");
        out.push_str("</project>\n");
        out
    }

    /// One dependency block. An entry that resolved to a real file gets a
    /// live block; anything else is recorded as a commented block so the
    /// absence stays visible in the document.
    fn push_dependency(&self, out: &mut String, library: &Library, entry: &JarEntry) {
        let group_id = entry.group_id(&self.catalog.middleware_home, &self.config.group_id_prefix);
        let artifact_id = entry.artifact_id();

        if entry.exists {
            out.push_str("    <dependency>\n");
            if entry.kind == EntryKind::Manifest {
                out.push_str(
                    "      <!-- This dependency is from a MANIFEST classpath reference -->\n",
                );
            }
            out.push_str(&format!("      <groupId>{group_id}</groupId>\n"));
            out.push_str(&format!("      <artifactId>{artifact_id}</artifactId>\n"));
            out.push_str(&format!("      <version>{}</version>\n", library.version));
            if let Some(attributes) = &entry.manifest_attributes {
                out.push_str("      <!-- Manifest Info: -->\n");
                for (key, value) in attributes {
                    if value.trim().is_empty() {
                        continue;
                    }
                    out.push_str(&format!("      <!--   {key}={value} -->\n"));
                }
            }
            out.push_str("    </dependency>\n");
        } else {
            out.push_str(&format!(
                "    <!-- No jar file found, but dependency was found for {artifact_id} -->\n"
            ));
            if entry.kind == EntryKind::Manifest {
                out.push_str(
                    "    <!--   This dependency is from a MANIFEST classpath reference -->\n",
                );
            }
            out.push_str("    <!--\n");
            out.push_str("    <dependency>\n");
            out.push_str(&format!("      <groupId>{group_id}</groupId>\n"));
            out.push_str(&format!("      <artifactId>{artifact_id}</artifactId>\n"));
            out.push_str(&format!("      <version>{}</version>\n", library.version));
            out.push_str("    </dependency>\n");
            out.push_str("    -->\n");
        }
    }

    fn render_dependency_management(&self) -> String {
        let mut jars = self.catalog.flattened_entries();
        jars.sort_by(|a, b| a.filename.cmp(&b.filename));

        let mut out = String::new();
        out.push_str("  <dependencyManagement>\n");
        out.push_str("    <dependencies>\n");
        out.push_str("      <!-- JDev libraries -->\n");
        for library in self.catalog.sorted_libraries() {
            out.push_str("      <dependency>\n");
            out.push_str(&format!(
                "        <groupId>{}</groupId>\n",
                library.group_id
            ));
            out.push_str(&format!(
                "        <artifactId>{}</artifactId>\n",
                library.artifact_id()
            ));
            out.push_str(&format!("        <version>{}</version>\n", library.version));
            out.push_str(&format!("        <type>{}</type>\n", library.packaging));
            out.push_str("      </dependency>\n");
        }
        out.push_str("      <!-- JDev library jars -->\n");
        for entry in jars {
            let group_id =
                entry.group_id(&self.catalog.middleware_home, &self.config.group_id_prefix);
            out.push_str("      <dependency>\n");
            out.push_str(&format!("        <groupId>{group_id}</groupId>\n"));
            out.push_str(&format!(
                "        <artifactId>{}</artifactId>\n",
                entry.artifact_id()
            ));
            out.push_str(&format!(
                "        <version>{}</version>\n",
                self.config.version
            ));
            out.push_str("        <scope>provided</scope>\n");
            out.push_str("      </dependency>\n");
        }
        out.push_str("    </dependencies>\n");
        out.push_str("  </dependencyManagement>\n");
        out
    }
}

fn render_jar_pom(group_id: &str, artifact_id: &str, version: &str) -> String {
    format!(
        "<project>
  <modelVersion>4.0.0</modelVersion>
  <groupId>{group_id}</groupId>
  <artifactId>{artifact_id}</artifactId>
  <version>{version}</version>
  <packaging>jar</packaging>
  <description>JDeveloper imported jar.</description>
</project>
"
    )
}
