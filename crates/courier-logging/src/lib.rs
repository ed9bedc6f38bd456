//! courier-logging - Console tracing for the agent
//!
//! This crate provides:
//! - [`init_logging`] installing a stderr subscriber at a given level
//! - [`ReloadHandle`] for changing the level once logging is running

mod reload;
mod subscriber;

pub use courier_core::LogLevel;
pub use reload::{ReloadHandle, level_filter};
pub use subscriber::init_logging;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{LogLevel, ReloadHandle, init_logging};
}
