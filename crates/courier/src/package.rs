//! Project packaging
//!
//! A submission is a zip archive holding exactly one file entry, named
//! `<payload length>@<project identifier>`. For descriptions with external
//! imports the payload is the description followed by the body of every
//! compiled dependency source found on the search path, then the
//! harvested constants block.

use crate::source_text::{declaration_offset, has_external_imports};
use courier_bundle::{ArchiveBuilder, PackedArchive};
use courier_core::{CourierError, CourierResult, DescriptionProject, META_NAMESPACE, SymbolModel};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extension of description-language sources
pub const SOURCE_EXTENSION: &str = "java";

/// Builds upload archives
#[derive(Debug, Clone)]
pub struct Packager {
    search_path: Vec<PathBuf>,
}

impl Packager {
    pub fn new(search_path: Vec<PathBuf>) -> Self {
        Self { search_path }
    }

    /// Pack a validated description with its dependencies and constants.
    pub fn package_description(
        &self,
        project: &DescriptionProject,
        description: &Path,
        model: &SymbolModel,
        constants: &str,
    ) -> CourierResult<PackedArchive> {
        let payload = self.merged_source(description, model, constants)?;
        pack_single(project, payload.into_bytes())
    }

    /// Pack a conversion input unchanged.
    pub fn package_conversion(
        &self,
        project: &DescriptionProject,
        source: &Path,
    ) -> CourierResult<PackedArchive> {
        let len = std::fs::metadata(source)
            .map_err(|e| CourierError::InputUnavailable(format!("{}: {e}", source.display())))?
            .len();
        let entry = project.archive_entry_name(len as usize);
        let builder = ArchiveBuilder::new()
            .add_file(&entry, source)
            .map_err(|e| CourierError::InputUnavailable(e.to_string()))?;
        pack(&entry, builder)
    }

    /// Description text with merged dependency bodies and the constants block.
    pub fn merged_source(
        &self,
        description: &Path,
        model: &SymbolModel,
        constants: &str,
    ) -> CourierResult<String> {
        let mut source = std::fs::read_to_string(description)
            .map_err(|e| CourierError::InputUnavailable(format!("{}: {e}", description.display())))?;

        if has_external_imports(&source) {
            for fragment in self.dependency_sources(description, model) {
                let text = std::fs::read_to_string(&fragment)?;
                let text = text.trim();
                match declaration_offset(text) {
                    Some(offset) => {
                        debug!(fragment = %fragment.display(), "merging dependency source");
                        end_line(&mut source);
                        source.push_str(&text[offset..]);
                        source.push('\n');
                    }
                    None => warn!(
                        fragment = %fragment.display(),
                        "dependency source has no top-level interface, not merged"
                    ),
                }
            }
        }

        if !constants.is_empty() {
            end_line(&mut source);
            source.push_str(constants);
        }
        Ok(source)
    }

    /// Compiled dependency sources on the search path, in walk order.
    ///
    /// A file qualifies when its path relative to the search root maps to
    /// a type in the model. The description itself and the schema
    /// language's own sources are excluded.
    pub fn dependency_sources(&self, description: &Path, model: &SymbolModel) -> Vec<PathBuf> {
        let description = description
            .canonicalize()
            .unwrap_or_else(|_| description.to_path_buf());
        let mut sources = Vec::new();

        for root in &self.search_path {
            for entry in WalkDir::new(root)
                .sort_by_file_name()
                .into_iter()
                .filter_map(Result::ok)
                .filter(|e| e.file_type().is_file())
            {
                let path = entry.path();
                if path.extension().is_none_or(|ext| ext != SOURCE_EXTENSION) {
                    continue;
                }
                if path
                    .canonicalize()
                    .is_ok_and(|canonical| canonical == description)
                {
                    continue;
                }
                let Some(type_name) = path
                    .strip_prefix(root)
                    .ok()
                    .and_then(binary_name_of)
                else {
                    continue;
                };
                if type_name.starts_with(&format!("{META_NAMESPACE}.")) {
                    continue;
                }
                if model.contains(&type_name) {
                    sources.push(path.to_path_buf());
                }
            }
        }

        sources
    }
}

/// Terminate the last line so the next block starts on a line of its own.
fn end_line(source: &mut String) {
    if !source.is_empty() && !source.ends_with('\n') {
        source.push('\n');
    }
}

fn binary_name_of(relative: &Path) -> Option<String> {
    let without_ext = relative.with_extension("");
    let segments = without_ext
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(segments.join("."))
}

fn pack_single(project: &DescriptionProject, payload: Vec<u8>) -> CourierResult<PackedArchive> {
    let entry = project.archive_entry_name(payload.len());
    pack(&entry, ArchiveBuilder::new().add_bytes(&entry, payload))
}

fn pack(entry: &str, builder: ArchiveBuilder) -> CourierResult<PackedArchive> {
    let packed = builder
        .pack()
        .map_err(|e| CourierError::Archive(e.to_string()))?;

    debug!(entry = %entry, bytes = packed.bytes.len(), sha256 = %packed.sha256, "project packed");
    Ok(packed)
}
