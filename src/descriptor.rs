//! Embedded extension descriptor extraction and parsing.
//!
//! Every scanned archive may carry a `META-INF/extension.xml` declaring
//! named libraries and their classpath entries. The parser walks the XML
//! events with an explicit element stack and accumulates libraries into
//! plain values; nothing here ever aborts the surrounding scan. A
//! descriptor that cannot be parsed contributes no libraries at all.

use quick_xml::Reader;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesStart, Event};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::config::HarvestConfig;
use crate::coords;
use crate::error::Result;
use crate::manifest;
use crate::model::{EntryKind, JarEntry, Library, LibraryBuilder};
use crate::resolve::ResolveContext;

/// Fixed location of the descriptor inside an extension archive.
pub const DESCRIPTOR_ENTRY: &str = "META-INF/extension.xml";

/// Parses descriptors of one run, carrying the run configuration and the
/// canonical install root for resolution.
pub struct DescriptorParser<'a> {
    config: &'a HarvestConfig,
    install_root: &'a Path,
}

#[derive(Default)]
struct ParseState {
    extension_id: Option<String>,
    extension_version: Option<String>,
    /// Open `library` elements, innermost last.
    builders: Vec<LibraryBuilder>,
    /// Kind of the currently open classpath-like element.
    path_kind: Option<EntryKind>,
    path_text: String,
    libraries: Vec<Library>,
}

impl<'a> DescriptorParser<'a> {
    pub fn new(config: &'a HarvestConfig, install_root: &'a Path) -> Self {
        Self {
            config,
            install_root,
        }
    }

    /// Extract and parse the embedded descriptor of one archive.
    ///
    /// Never raises: an unreadable or non-zip file, a missing descriptor
    /// entry, and malformed XML all yield an empty list. Partial parses
    /// are discarded wholesale.
    pub fn parse_archive(&self, archive_path: &Path) -> Vec<Library> {
        let file = match File::open(archive_path) {
            Ok(file) => file,
            Err(e) => {
                warn!("cannot open {}: {}", archive_path.display(), e);
                return Vec::new();
            }
        };
        let mut archive = match ZipArchive::new(file) {
            Ok(archive) => archive,
            Err(e) => {
                warn!("not a readable archive {}: {}", archive_path.display(), e);
                return Vec::new();
            }
        };

        let mut xml = String::new();
        match archive.by_name(DESCRIPTOR_ENTRY) {
            Ok(mut entry) => {
                if let Err(e) = entry.read_to_string(&mut xml) {
                    warn!("cannot read descriptor of {}: {}", archive_path.display(), e);
                    return Vec::new();
                }
            }
            Err(_) => {
                debug!("no extension descriptor in {}", archive_path.display());
                return Vec::new();
            }
        }

        let ctx = ResolveContext {
            config: self.config,
            install_root: self.install_root,
            current_archive: archive_path,
        };
        match self.parse_descriptor(&xml, &ctx, archive_path) {
            Ok(libraries) => libraries,
            Err(e) => {
                warn!("discarding descriptor of {}: {}", archive_path.display(), e);
                Vec::new()
            }
        }
    }

    fn parse_descriptor(
        &self,
        xml: &str,
        ctx: &ResolveContext,
        archive_path: &Path,
    ) -> Result<Vec<Library>> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<String> = Vec::new();
        let mut state = ParseState::default();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    self.handle_open(&e, &stack, &mut state);
                    stack.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                }
                Event::Empty(e) => {
                    self.handle_open(&e, &stack, &mut state);
                    self.handle_close(
                        e.local_name().as_ref(),
                        &stack,
                        &mut state,
                        ctx,
                        archive_path,
                    );
                }
                Event::End(e) => {
                    stack.pop();
                    self.handle_close(
                        e.local_name().as_ref(),
                        &stack,
                        &mut state,
                        ctx,
                        archive_path,
                    );
                }
                Event::Text(t) => {
                    if state.path_kind.is_some() {
                        match t.unescape() {
                            Ok(text) => state.path_text.push_str(&text),
                            Err(_) => state.path_text.push_str(&String::from_utf8_lossy(&t)),
                        }
                    }
                }
                Event::CData(t) => {
                    if state.path_kind.is_some() {
                        state.path_text.push_str(&String::from_utf8_lossy(&t));
                    }
                }
                Event::Eof => {
                    if let Some(open) = stack.last() {
                        warn!(
                            "descriptor of {} ends inside <{}>",
                            archive_path.display(),
                            open
                        );
                        return Ok(Vec::new());
                    }
                    break;
                }
                _ => {}
            }
        }

        Ok(state.libraries)
    }

    /// Element-open binding rules, matched on local names so namespace
    /// prefixes do not matter.
    fn handle_open(&self, e: &BytesStart, stack: &[String], state: &mut ParseState) {
        match e.local_name().as_ref() {
            b"extension" => {
                for attr in e.attributes().flatten() {
                    match attr.key.local_name().as_ref() {
                        b"id" => state.extension_id = Some(attr_value(&attr)),
                        b"version" => state.extension_version = Some(attr_value(&attr)),
                        _ => {}
                    }
                }
            }
            b"library" if tail_is(stack, &["libraries"]) => {
                let mut builder = LibraryBuilder::new();
                for attr in e.attributes().flatten() {
                    match attr.key.local_name().as_ref() {
                        b"name" => builder.set_name(&attr_value(&attr)),
                        b"deployed" => builder.deployed = Some(attr_value(&attr)),
                        _ => {}
                    }
                }
                state.builders.push(builder);
            }
            b"classpath" if tail_is(stack, &["libraries", "library"]) => {
                state.path_kind = Some(EntryKind::Jar);
                state.path_text.clear();
            }
            b"srcpath" if tail_is(stack, &["libraries", "library"]) => {
                state.path_kind = Some(EntryKind::Source);
                state.path_text.clear();
            }
            b"docpath" if tail_is(stack, &["libraries", "library"]) => {
                state.path_kind = Some(EntryKind::Doc);
                state.path_text.clear();
            }
            _ => {}
        }
    }

    /// Element-close rules; `stack` holds the ancestry of the closing
    /// element (the element itself already popped).
    fn handle_close(
        &self,
        name: &[u8],
        stack: &[String],
        state: &mut ParseState,
        ctx: &ResolveContext,
        archive_path: &Path,
    ) {
        match name {
            b"library" if tail_is(stack, &["libraries"]) => {
                if let Some(builder) = state.builders.pop() {
                    let extension_id = state.extension_id.clone();
                    let extension_version = state.extension_version.clone();
                    if let Some(library) =
                        self.finish_library(builder, extension_id, extension_version, archive_path)
                    {
                        state.libraries.push(library);
                    }
                }
            }
            b"classpath" | b"srcpath" | b"docpath"
                if tail_is(stack, &["libraries", "library"]) =>
            {
                let text = std::mem::take(&mut state.path_text);
                let kind = state.path_kind.take();
                let text = text.trim();
                if let Some(kind) = kind {
                    if !text.is_empty() {
                        if let Some(builder) = state.builders.last_mut() {
                            self.add_entry(builder, kind, text, ctx);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    /// Resolve and record one classpath entry; a newly added binary entry
    /// seeds manifest expansion. Transitive entries never re-expand.
    fn add_entry(
        &self,
        builder: &mut LibraryBuilder,
        kind: EntryKind,
        raw: &str,
        ctx: &ResolveContext,
    ) {
        let entry = JarEntry::resolve(kind, raw, ctx);
        let Some(index) = builder.push(entry) else {
            return;
        };
        if kind != EntryKind::Jar || !self.config.follow_manifest_classpath {
            return;
        }
        if !builder.entries[index].exists {
            return;
        }

        let filename = builder.entries[index].filename.clone();
        let Some(attributes) = manifest::main_attributes(Path::new(&filename)) else {
            return;
        };
        let refs = manifest::classpath_refs(&attributes, &filename);
        if !refs.is_empty() {
            debug!(
                "{}: manifest classpath of {} adds {} references",
                builder.display_name(),
                filename,
                refs.len()
            );
        }
        builder.entries[index].manifest_attributes = Some(attributes);
        for raw_ref in refs {
            builder.push(JarEntry::resolve(EntryKind::Manifest, raw_ref, ctx));
        }
    }

    fn finish_library(
        &self,
        builder: LibraryBuilder,
        extension_id: Option<String>,
        extension_version: Option<String>,
        archive_path: &Path,
    ) -> Option<Library> {
        let LibraryBuilder {
            name,
            deployed,
            entries,
        } = builder;
        let Some(name) = name else {
            warn!("dropping unnamed library in {}", archive_path.display());
            return None;
        };

        let artifact_id = coords::library_artifact_id(&name);
        let pom_path = self.config.pom_dir().join(format!("{artifact_id}.pom"));
        Some(Library {
            name,
            deployed,
            extension_id,
            extension_version,
            group_id: coords::library_group_id(&self.config.group_id_prefix),
            version: self.config.version.clone(),
            packaging: self.config.packaging.clone(),
            archive_path: archive_path.to_path_buf(),
            pom_path,
            entries,
        })
    }
}

fn attr_value(attr: &Attribute) -> String {
    match attr.unescape_value() {
        Ok(value) => value.into_owned(),
        Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
    }
}

/// True when the element stack ends with the given local-name suffix.
fn tail_is(stack: &[String], suffix: &[&str]) -> bool {
    stack.len() >= suffix.len()
        && stack[stack.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(have, want)| have == want)
}
