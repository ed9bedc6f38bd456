//! Description-file lifecycle
//!
//! The description file doubles as the agent's only piece of persistent
//! state. Read-only means a submission is in flight and the next run
//! should query for its result. A modification time in the future means
//! the file was already rewritten with the server's output and has not
//! been edited since.

use crate::source_text::declaration_offset;
use courier_core::{CourierError, CourierResult};
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Suffix appended to the file name of the backup copy
pub const BACKUP_SUFFIX: &str = "_prev";

/// How far past "now" a rewritten file's mtime is pushed
pub const UP_TO_DATE_OFFSET: Duration = Duration::from_millis(i32::MAX as u64 * 100);

/// Whether a submission of this file is awaiting its result
pub fn is_in_flight(description: &Path) -> CourierResult<bool> {
    Ok(fs::metadata(description)?.permissions().readonly())
}

/// Mark the file read-only after a successful send
pub fn mark_in_flight(description: &Path) -> CourierResult<()> {
    let mut permissions = fs::metadata(description)?.permissions();
    if !permissions.readonly() {
        permissions.set_readonly(true);
        fs::set_permissions(description, permissions)?;
        debug!(file = %description.display(), "marked in flight");
    }
    Ok(())
}

/// Make the file writable again
pub fn clear_in_flight(description: &Path) -> CourierResult<()> {
    let permissions = fs::metadata(description)?.permissions();
    if permissions.readonly() {
        fs::set_permissions(description, writable(permissions))?;
        debug!(file = %description.display(), "cleared in-flight marker");
    }
    Ok(())
}

#[cfg(unix)]
fn writable(permissions: fs::Permissions) -> fs::Permissions {
    use std::os::unix::fs::PermissionsExt;
    fs::Permissions::from_mode(permissions.mode() | 0o200)
}

#[cfg(not(unix))]
#[allow(clippy::permissions_set_readonly_false)]
fn writable(mut permissions: fs::Permissions) -> fs::Permissions {
    permissions.set_readonly(false);
    permissions
}

/// Whether the file was rewritten by a previous run and not edited since
pub fn is_up_to_date(description: &Path) -> CourierResult<bool> {
    let modified = fs::metadata(description)?.modified()?;
    Ok(modified > SystemTime::now())
}

/// Push the file's mtime into the future
pub fn stamp_up_to_date(description: &Path) -> CourierResult<()> {
    let stamp = SystemTime::now() + UP_TO_DATE_OFFSET;
    filetime::set_file_mtime(description, FileTime::from_system_time(stamp))?;
    Ok(())
}

/// `<name>_prev` next to the description file
pub fn backup_path(description: &Path) -> PathBuf {
    let mut name = description
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(BACKUP_SUFFIX);
    description.with_file_name(name)
}

/// Replace the description with the server's `generated` version.
///
/// The current file is kept as the backup. When the generated text has no
/// header of its own the current header is carried over. Returns the
/// backup path.
pub fn rewrite(description: &Path, generated: &Path) -> CourierResult<PathBuf> {
    let generated_text = fs::read_to_string(generated).map_err(|_| {
        CourierError::ArtifactMissing(generated.to_path_buf())
    })?;
    let current = fs::read_to_string(description)?;

    let text = if generated_text.starts_with("public") {
        let header = declaration_offset(&current).map_or("", |offset| &current[..offset]);
        format!("{header}{generated_text}")
    } else {
        generated_text
    };

    let backup = backup_path(description);
    if backup.exists() {
        clear_in_flight(&backup)?;
        fs::remove_file(&backup)?;
    }
    fs::copy(description, &backup)?;
    clear_in_flight(&backup)?;

    clear_in_flight(description)?;
    fs::write(description, text)?;
    stamp_up_to_date(description)?;

    info!(file = %description.display(), backup = %backup.display(), "description rewritten");
    Ok(backup)
}
