//! Archive creation utilities.
//!
//! The [`ArchiveBuilder`] collects entries in order and packs them into an
//! in-memory zip container.

use crate::{BundleError, BundleResult};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Builder for zip archives.
///
/// Entries are written in the order they were added.
///
/// # Example
///
/// ```no_run
/// use courier_bundle::ArchiveBuilder;
///
/// let packed = ArchiveBuilder::new()
///     .add_directory("InCS/Server")
///     .add_file("InCS/Server/Proj.cs", "out/Proj.cs")?
///     .pack()?;
///
/// println!("{} bytes, sha256 {}", packed.bytes.len(), packed.sha256);
/// # Ok::<(), courier_bundle::BundleError>(())
/// ```
#[derive(Debug, Default)]
pub struct ArchiveBuilder {
    entries: Vec<PendingEntry>,
}

#[derive(Debug)]
enum PendingEntry {
    Directory(String),
    File { archive_path: String, contents: Vec<u8> },
}

/// A packed archive.
#[derive(Debug, Clone)]
pub struct PackedArchive {
    /// Zip container bytes.
    pub bytes: Vec<u8>,
    /// Hex SHA-256 of `bytes`.
    pub sha256: String,
}

impl ArchiveBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a directory entry. A trailing `/` is added when missing.
    #[must_use]
    pub fn add_directory(mut self, archive_path: &str) -> Self {
        let mut path = normalize(archive_path);
        if !path.ends_with('/') {
            path.push('/');
        }
        self.entries.push(PendingEntry::Directory(path));
        self
    }

    /// Add raw bytes as a file entry.
    #[must_use]
    pub fn add_bytes(mut self, archive_path: &str, contents: Vec<u8>) -> Self {
        self.entries.push(PendingEntry::File {
            archive_path: normalize(archive_path),
            contents,
        });
        self
    }

    /// Add a file from disk under `archive_path`.
    pub fn add_file<P: AsRef<Path>>(self, archive_path: &str, source: P) -> BundleResult<Self> {
        let source = source.as_ref();
        let contents = fs::read(source)
            .map_err(|e| BundleError::SourceNotFound(format!("{}: {e}", source.display())))?;

        Ok(self.add_bytes(archive_path, contents))
    }

    /// Pack all entries into a zip container.
    pub fn pack(self) -> BundleResult<PackedArchive> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        for entry in &self.entries {
            match entry {
                PendingEntry::Directory(path) => {
                    zip.add_directory(path.as_str(), options)?;
                }
                PendingEntry::File {
                    archive_path,
                    contents,
                } => {
                    zip.start_file(archive_path.as_str(), options)?;
                    zip.write_all(contents)?;
                }
            }
        }

        let bytes = zip.finish()?.into_inner();
        let sha256 = compute_sha256(&bytes);

        Ok(PackedArchive { bytes, sha256 })
    }
}

/// Compute SHA256 hash of data and return as hex string.
pub fn compute_sha256(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn normalize(archive_path: &str) -> String {
    archive_path.replace('\\', "/").trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn compute_sha256___returns_consistent_hash() {
        let hash1 = compute_sha256(b"hello world");
        let hash2 = compute_sha256(b"hello world");

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn ArchiveBuilder___add_directory___appends_separator() {
        let builder = ArchiveBuilder::new().add_directory("InC/Host");

        assert!(matches!(&builder.entries[0], PendingEntry::Directory(p) if p == "InC/Host/"));
    }

    #[test]
    fn ArchiveBuilder___add_bytes___normalizes_separators() {
        let builder = ArchiveBuilder::new().add_bytes("\\InC\\Host\\a.c", b"x".to_vec());

        assert!(matches!(
            &builder.entries[0],
            PendingEntry::File { archive_path, .. } if archive_path == "InC/Host/a.c"
        ));
    }

    #[test]
    fn ArchiveBuilder___add_file___missing_source___returns_error() {
        let result = ArchiveBuilder::new().add_file("a.txt", "/nonexistent/a.txt");

        assert!(matches!(result, Err(BundleError::SourceNotFound(_))));
    }

    #[test]
    fn ArchiveBuilder___add_file___reads_contents_from_disk() {
        let temp_dir = tempfile::tempdir().unwrap();
        let source = temp_dir.path().join("schema.proto");
        fs::write(&source, b"syntax").unwrap();

        let builder = ArchiveBuilder::new().add_file("6@dev@1@schema.proto", &source).unwrap();

        assert!(matches!(
            &builder.entries[0],
            PendingEntry::File { archive_path, contents }
                if archive_path == "6@dev@1@schema.proto" && contents == b"syntax"
        ));
    }

    #[test]
    fn ArchiveBuilder___pack___digest_matches_bytes() {
        let packed = ArchiveBuilder::new()
            .add_bytes("one.txt", b"1".to_vec())
            .pack()
            .unwrap();

        assert!(!packed.bytes.is_empty());
        assert_eq!(packed.sha256, compute_sha256(&packed.bytes));
    }
}
