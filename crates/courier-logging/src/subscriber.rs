//! Global subscriber installation

use crate::{LogLevel, ReloadHandle, level_filter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload};

/// Install the console subscriber.
///
/// Events go to stderr so stdout stays free for reports the user reads.
/// The level filter sits behind a reload layer whose handle is stored in
/// [`ReloadHandle::global`]. Returns `false` when a global subscriber was
/// already installed; the level is then applied through the handle if one
/// exists.
pub fn init_logging(level: LogLevel) -> bool {
    let (filter, handle) = reload::Layer::new(level_filter(level));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .compact(),
    );

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        let _ = ReloadHandle::global().reload_level(level);
        return false;
    }

    ReloadHandle::global().set_handle(handle, level);
    tracing::debug!(%level, "logging initialized");
    true
}
