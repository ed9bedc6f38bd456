//! Switching the console level after start-up
//!
//! The agent starts logging before its configuration file is read, at the
//! level given by `-v` flags. Once the file is loaded its `log_level` is
//! applied through the process-wide [`ReloadHandle`].

use courier_core::LogLevel;
use once_cell::sync::OnceCell;
use parking_lot::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{Registry, reload};

type FilterHandle = reload::Handle<LevelFilter, Registry>;

/// Installed filter handle and the level it currently lets through
struct Installed {
    handle: FilterHandle,
    level: LogLevel,
}

/// Process-wide access to the console level filter
#[derive(Default)]
pub struct ReloadHandle {
    installed: Mutex<Option<Installed>>,
}

impl ReloadHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// The handle used by [`crate::init_logging`]
    pub fn global() -> &'static ReloadHandle {
        static GLOBAL: OnceCell<ReloadHandle> = OnceCell::new();
        GLOBAL.get_or_init(ReloadHandle::new)
    }

    /// Store the filter handle of a freshly installed subscriber running at `level`.
    pub fn set_handle(&self, handle: FilterHandle, level: LogLevel) {
        *self.installed.lock() = Some(Installed { handle, level });
    }

    /// Apply `level`, returning the one it replaced.
    pub fn reload_level(&self, level: LogLevel) -> Result<LogLevel, String> {
        let mut guard = self.installed.lock();
        let installed = guard
            .as_mut()
            .ok_or_else(|| "console logging is not installed".to_string())?;

        if installed.level != level {
            installed
                .handle
                .reload(level_filter(level))
                .map_err(|e| format!("cannot switch console level to {level}: {e}"))?;
        }
        Ok(std::mem::replace(&mut installed.level, level))
    }
}

/// Filter letting through `level` and everything more severe
pub fn level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Trace => LevelFilter::TRACE,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Off => LevelFilter::OFF,
    }
}
