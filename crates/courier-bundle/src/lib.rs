//! Archive codec for courier
//!
//! Uploads and server results travel as zip archives. Results hold one
//! top-level output root per target language, each with one folder per
//! host:
//!
//! ```text
//! result.zip
//! ├── InCS/
//! │   └── Server/              # host folder "InCS/Server"
//! │       ├── Proj.cs
//! │       └── Test_.cs
//! ├── InRS/
//! │   ├── Client/              # host folder "InRS/Client"
//! │   └── ad_hoc-sys/          # shared runtime support, not a host
//! └── unirail.info             # optional notice for the user
//! ```
//!
//! # Example
//!
//! ```no_run
//! use courier_bundle::{ArchiveBuilder, ArchiveReader};
//!
//! let packed = ArchiveBuilder::new()
//!     .add_bytes("120@dev@1700000000000@Proj.java", b"interface Proj {}".to_vec())
//!     .pack()?;
//!
//! let report = ArchiveReader::from_bytes(packed.bytes)?.unpack("workspace")?;
//! for host in &report.hosts {
//!     println!("received {host}");
//! }
//! # Ok::<(), courier_bundle::BundleError>(())
//! ```

mod error;

pub mod builder;
pub mod loader;

pub use builder::{ArchiveBuilder, PackedArchive, compute_sha256};
pub use error::BundleError;
pub use loader::{ArchiveEntry, ArchiveReader, EntryKind, UnpackReport, host_folder};

/// Result type for archive operations.
pub type BundleResult<T> = Result<T, BundleError>;

/// Name suffix of informational documents sent along with results.
pub const INFO_FILE: &str = "unirail.info";

/// Shared runtime-support folder inside a language output root.
pub const RUNTIME_SUPPORT_FOLDER: &str = "ad_hoc-sys";
