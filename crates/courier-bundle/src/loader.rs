//! Archive reading and extraction.
//!
//! The [`ArchiveReader`] walks a zip container in entry order, extracts it
//! below a destination directory and reports which host folders and
//! informational documents arrived.

use crate::{BundleError, BundleResult, INFO_FILE, RUNTIME_SUPPORT_FOLDER};
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Reader over an in-memory zip container.
///
/// # Example
///
/// ```no_run
/// use courier_bundle::ArchiveReader;
///
/// let bytes = std::fs::read("result.zip")?;
/// let report = ArchiveReader::from_bytes(bytes)?.unpack("workspace")?;
/// println!("{} files written", report.written.len());
/// # Ok::<(), courier_bundle::BundleError>(())
/// ```
#[derive(Debug)]
pub struct ArchiveReader {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

/// Kind and content of one archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    Directory,
    File(Vec<u8>),
}

/// One archive entry, in container order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry name as stored; directories end with `/`.
    pub path: String,
    pub kind: EntryKind,
}

/// What [`ArchiveReader::unpack`] wrote.
#[derive(Debug, Clone, Default)]
pub struct UnpackReport {
    /// Every file written, in entry order.
    pub written: Vec<PathBuf>,
    /// Host folders in entry order, without trailing separator.
    pub hosts: Vec<String>,
    /// Written informational documents.
    pub info_documents: Vec<PathBuf>,
}

impl ArchiveReader {
    /// Open a container held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> BundleResult<Self> {
        let archive = ZipArchive::new(Cursor::new(bytes))?;
        Ok(Self { archive })
    }

    /// Read every entry in container order.
    pub fn entries(&mut self) -> BundleResult<Vec<ArchiveEntry>> {
        let mut entries = Vec::with_capacity(self.archive.len());

        for index in 0..self.archive.len() {
            let mut file = self.archive.by_index(index)?;
            let path = file.name().to_string();
            let kind = if file.is_dir() {
                EntryKind::Directory
            } else {
                let mut contents = Vec::new();
                file.read_to_end(&mut contents)?;
                EntryKind::File(contents)
            };
            entries.push(ArchiveEntry { path, kind });
        }

        Ok(entries)
    }

    /// Extract every entry below `destination`.
    ///
    /// Intermediate directories are created and existing files are
    /// overwritten. Entries whose path would escape `destination` abort
    /// the extraction with [`BundleError::UnsafePath`].
    pub fn unpack<P: AsRef<Path>>(mut self, destination: P) -> BundleResult<UnpackReport> {
        let destination = destination.as_ref();
        let mut report = UnpackReport::default();

        fs::create_dir_all(destination)?;

        for index in 0..self.archive.len() {
            let mut file = self.archive.by_index(index)?;
            let name = file.name().to_string();
            let relative = file
                .enclosed_name()
                .ok_or_else(|| BundleError::UnsafePath(name.clone()))?;
            let target = destination.join(relative);

            if file.is_dir() {
                fs::create_dir_all(&target)?;
                if let Some(host) = host_folder(&name) {
                    tracing::debug!(host, "host folder received");
                    report.hosts.push(host.to_string());
                }
                continue;
            }

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut contents = Vec::new();
            file.read_to_end(&mut contents)?;
            fs::write(&target, &contents)?;

            if name.ends_with(INFO_FILE) {
                report.info_documents.push(target.clone());
            }
            report.written.push(target);
        }

        tracing::debug!(
            files = report.written.len(),
            hosts = report.hosts.len(),
            destination = %destination.display(),
            "archive unpacked"
        );

        Ok(report)
    }
}

/// Host folder named by a directory entry, if it is one.
///
/// Host folders are second-level directories such as `InCS/Server/`; the
/// shared runtime-support folder is not a host.
pub fn host_folder(entry_name: &str) -> Option<&str> {
    let trimmed = entry_name.strip_suffix('/')?;
    let (root, host) = trimmed.split_once('/')?;

    if root.is_empty() || host.is_empty() || host.contains('/') || host == RUNTIME_SUPPORT_FOLDER {
        return None;
    }

    Some(trimmed)
}
