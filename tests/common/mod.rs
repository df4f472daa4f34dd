use adfharvest::HarvestConfig;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;

/// A synthetic middleware installation with a JDeveloper home inside it.
///
/// Layout mirrors the real thing: `<temp>/middleware/jdeveloper` is the
/// install root, jars live either under the install root or one level up
/// under the middleware home, and harvested documents go to `<temp>/work`.
pub struct InstallFixture {
    pub temp: tempfile::TempDir,
    pub install_root: PathBuf,
    pub work_dir: PathBuf,
}

pub fn install_fixture() -> InstallFixture {
    let temp = tempfile::tempdir().unwrap();
    let install_root = temp.path().join("middleware/jdeveloper");
    std::fs::create_dir_all(install_root.join("jdev/extensions")).unwrap();
    let work_dir = temp.path().join("work");
    InstallFixture {
        temp,
        install_root,
        work_dir,
    }
}

impl InstallFixture {
    pub fn config(&self, version: &str) -> HarvestConfig {
        HarvestConfig::new(&self.install_root, &self.work_dir, version)
    }

    /// Path under the install root, parent directories created.
    pub fn root_path(&self, relative: &str) -> PathBuf {
        let path = self.install_root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        path
    }

    /// Path under the middleware home, one level above the install root.
    pub fn middleware_path(&self, relative: &str) -> PathBuf {
        let path = self.temp.path().join("middleware").join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        path
    }

    /// Extension archive carrying a descriptor, under the install root.
    pub fn descriptor_jar(&self, relative: &str, xml: &str) -> PathBuf {
        let path = self.root_path(relative);
        write_zip(&path, &[("META-INF/extension.xml", xml)]);
        path
    }

    pub fn manifest_jar(&self, path: &Path, manifest: &str) {
        write_zip(path, &[("META-INF/MANIFEST.MF", manifest)]);
    }

    pub fn plain_jar(&self, path: &Path) {
        write_zip(path, &[("stub.txt", "jar body")]);
    }
}

pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    for (name, content) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

/// Descriptor document declaring a single library.
pub fn descriptor_xml(
    extension_id: &str,
    extension_version: &str,
    library_name: &str,
    classpaths: &[&str],
) -> String {
    let mut body = String::new();
    for classpath in classpaths {
        body.push_str(&format!("        <classpath>{classpath}</classpath>\n"));
    }
    format!(
        r#"<extension id="{extension_id}" version="{extension_version}" xmlns="http://jcp.org/jsr/198/extension-manifest">
  <hooks>
    <libraries>
      <library name="{library_name}">
{body}      </library>
    </libraries>
  </hooks>
</extension>"#
    )
}
