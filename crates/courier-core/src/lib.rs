//! courier-core - Core types, symbol model and description validation
//!
//! This crate provides the foundational types for the courier agent:
//! - [`CourierError`] for error handling and process exit statuses
//! - [`AgentConfig`] for the agent configuration file
//! - [`DescriptionProject`] identifying one submission
//! - [`SymbolModel`] built from the compiled description file
//! - [`Validator`] and [`ConstantHarvester`] for the pre-submission checks
//! - [`SessionState`] for the submit/poll/deploy state machine

mod config;
mod error;
mod harvest;
mod lifecycle;
mod project;
mod symbols;
mod validate;

pub use config::{AgentConfig, DeployTargets, FrontendConfig, RetryPolicy};
pub use error::{CourierError, CourierResult, exit_codes};
pub use harvest::{CONSTANTS_SENTINEL, ConstantHarvester};
pub use lifecycle::SessionState;
pub use project::{CONVERSION_EXTENSION, DescriptionProject};
pub use symbols::{
    FieldDecl, META_NAMESPACE, PrimitiveKind, SymbolModel, TypeDecl, TypeKind, ValueType,
};
pub use validate::{
    CHANNEL_BASE_NAMES, IssueKind, RESERVED_WORDS, STABLE_ID_ANNOTATION, ValidationIssue,
    ValidationReport, Validator, is_reserved_identifier,
};

/// Log levels understood by the configuration file and the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    /// Level selected by a count of `-v` flags, starting from `Info`
    pub fn from_verbosity(count: u8) -> Self {
        match count {
            0 => LogLevel::Info,
            1 => LogLevel::Debug,
            _ => LogLevel::Trace,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = CourierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            "off" => Ok(LogLevel::Off),
            other => Err(CourierError::Config(format!("unknown log level: {other}"))),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Trace => write!(f, "TRACE"),
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Off => write!(f, "OFF"),
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        AgentConfig, CourierError, CourierResult, DescriptionProject, LogLevel, SessionState,
        SymbolModel, ValidationReport, Validator,
    };
}
