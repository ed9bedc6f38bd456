//! Submission identity

use crate::{CourierError, CourierResult};
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Extension of description files that are converted rather than generated
pub const CONVERSION_EXTENSION: &str = "proto";

/// One submission: who sent which version of which file.
///
/// The identifier is derived from all three fields, so it stays stable
/// between the upload and later result queries for the same file version
/// and changes whenever the file is modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescriptionProject {
    login: String,
    modified_ms: u128,
    file_name: String,
}

impl DescriptionProject {
    /// Create a project from its parts
    pub fn new(login: impl Into<String>, modified_ms: u128, file_name: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            modified_ms,
            file_name: file_name.into(),
        }
    }

    /// Create a project for a file on disk, using its modification time
    pub fn from_file(login: impl Into<String>, path: &Path) -> CourierResult<Self> {
        let metadata = std::fs::metadata(path).map_err(|e| {
            CourierError::InputUnavailable(format!("{}: {e}", path.display()))
        })?;
        let modified_ms = metadata
            .modified()?
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                CourierError::InputUnavailable(format!("{} has no file name", path.display()))
            })?;

        Ok(Self::new(login, modified_ms, file_name))
    }

    /// Submitting principal
    pub fn login(&self) -> &str {
        &self.login
    }

    /// File modification time in epoch milliseconds
    pub fn modified_ms(&self) -> u128 {
        self.modified_ms
    }

    /// Original file name
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Canonical project identifier: `login@mtime@file`.
    ///
    /// `@` inside the login is escaped as `_|_` so the three parts can be
    /// split apart again on the server.
    pub fn identifier(&self) -> String {
        format!(
            "{}@{}@{}",
            self.login.replace('@', "_|_"),
            self.modified_ms,
            self.file_name
        )
    }

    /// Name of the single archive entry carrying a payload of `payload_len` bytes
    pub fn archive_entry_name(&self, payload_len: usize) -> String {
        format!("{payload_len}@{}", self.identifier())
    }

    /// Whether this submission is a direct format conversion
    pub fn is_conversion(&self) -> bool {
        Path::new(&self.file_name)
            .extension()
            .is_some_and(|ext| ext == CONVERSION_EXTENSION)
    }

    /// File name without its extension
    pub fn stem(&self) -> &str {
        match self.file_name.rfind('.') {
            Some(idx) if idx > 0 => &self.file_name[..idx],
            _ => &self.file_name,
        }
    }
}

impl std::fmt::Display for DescriptionProject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.identifier())
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use std::time::{Duration, SystemTime};

    #[test]
    fn DescriptionProject___identifier___joins_three_parts() {
        let project = DescriptionProject::new("dev", 1700000000123, "Proj.java");

        assert_eq!(project.identifier(), "dev@1700000000123@Proj.java");
    }

    #[test]
    fn DescriptionProject___identifier___escapes_at_in_login() {
        let project = DescriptionProject::new("dev@example.org", 5, "Proj.java");

        assert_eq!(project.identifier(), "dev_|_example.org@5@Proj.java");
    }

    #[test]
    fn DescriptionProject___identifier___changes_with_mtime() {
        let first = DescriptionProject::new("dev", 1, "Proj.java");
        let second = DescriptionProject::new("dev", 2, "Proj.java");

        assert_ne!(first.identifier(), second.identifier());
    }

    #[test]
    fn DescriptionProject___archive_entry_name___prefixes_length() {
        let project = DescriptionProject::new("dev", 7, "Proj.java");

        assert_eq!(project.archive_entry_name(120), "120@dev@7@Proj.java");
    }

    #[test]
    fn DescriptionProject___is_conversion___only_for_proto() {
        assert!(DescriptionProject::new("u", 0, "schema.proto").is_conversion());
        assert!(!DescriptionProject::new("u", 0, "Proj.java").is_conversion());
        assert!(!DescriptionProject::new("u", 0, "proto").is_conversion());
    }

    #[test]
    fn DescriptionProject___stem___drops_extension() {
        assert_eq!(DescriptionProject::new("u", 0, "Proj.java").stem(), "Proj");
        assert_eq!(DescriptionProject::new("u", 0, "Proj").stem(), "Proj");
    }

    #[test]
    fn DescriptionProject___from_file___is_stable_for_same_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Proj.java");
        std::fs::write(&path, "interface Proj {}").unwrap();

        let upload = DescriptionProject::from_file("dev", &path).unwrap();
        let query = DescriptionProject::from_file("dev", &path).unwrap();

        assert_eq!(upload.identifier(), query.identifier());
        assert_eq!(upload.file_name(), "Proj.java");
    }

    #[test]
    fn DescriptionProject___from_file___changes_when_file_is_touched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Proj.java");
        std::fs::write(&path, "interface Proj {}").unwrap();
        let before = DescriptionProject::from_file("dev", &path).unwrap();

        let file = std::fs::File::options().write(true).open(&path).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(5))
            .unwrap();
        let after = DescriptionProject::from_file("dev", &path).unwrap();

        assert_ne!(before.identifier(), after.identifier());
    }

    #[test]
    fn DescriptionProject___from_file___missing_file_is_input_unavailable() {
        let result = DescriptionProject::from_file("dev", Path::new("/no/such/Proj.java"));

        assert!(matches!(result, Err(CourierError::InputUnavailable(_))));
    }
}
