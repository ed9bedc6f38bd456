//! Error types for archive operations.

use thiserror::Error;

/// Errors that can occur while packing or unpacking archives.
#[derive(Debug, Error)]
pub enum BundleError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP container error.
    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Entry path would land outside the destination directory.
    #[error("Unsafe entry path: {0}")]
    UnsafePath(String),

    /// Source file or directory could not be read.
    #[error("Source not found: {0}")]
    SourceNotFound(String),
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn BundleError___io___displays_message() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: BundleError = io_err.into();

        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn BundleError___unsafe_path___displays_path() {
        let err = BundleError::UnsafePath("../etc/passwd".to_string());

        assert_eq!(err.to_string(), "Unsafe entry path: ../etc/passwd");
    }

    #[test]
    fn BundleError___source_not_found___displays_path() {
        let err = BundleError::SourceNotFound("/no/such/dir".to_string());

        assert_eq!(err.to_string(), "Source not found: /no/such/dir");
    }

    #[test]
    fn BundleError___from_zip_error___converts() {
        let err: BundleError = zip::result::ZipError::FileNotFound.into();

        assert!(matches!(err, BundleError::Zip(_)));
    }
}
