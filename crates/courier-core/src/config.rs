//! Agent configuration types

use crate::{CourierError, CourierResult, LogLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Agent configuration loaded from `courier.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Remote endpoint: `host:port` for the socket binding, `http(s)://…` for HTTP
    #[serde(default)]
    pub server: String,

    /// Submitting principal
    #[serde(default)]
    pub login: String,

    /// Directories searched for sources the description file imports
    #[serde(default)]
    pub search_path: Vec<PathBuf>,

    /// Description file used when none is given on the command line
    #[serde(default)]
    pub description_file: Option<PathBuf>,

    /// Directory that receives generated artifacts (default: current directory)
    #[serde(default)]
    pub workspace: Option<PathBuf>,

    /// Log level applied once the configuration is loaded
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// How the symbol model of the description file is obtained
    #[serde(default)]
    pub frontend: FrontendConfig,

    /// Seconds to wait for a server reply before giving up (no limit when absent)
    #[serde(default)]
    pub read_timeout_secs: Option<u64>,

    /// Limits for the poll loop
    #[serde(default)]
    pub retry: RetryPolicy,

    /// Host folder → destination directories
    #[serde(default)]
    pub deploy: BTreeMap<String, DeployTargets>,
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Symbol model source
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrontendConfig {
    /// External compiler front-end printing the symbol model as JSON.
    ///
    /// `{file}` and `{search_path}` are substituted in every argument.
    #[serde(default)]
    pub command: Vec<String>,

    /// Pre-built symbol model file
    #[serde(default)]
    pub symbols: Option<PathBuf>,
}

/// Poll loop limits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Network rounds allowed before giving up (unbounded when absent)
    #[serde(default)]
    pub max_rounds: Option<u32>,

    /// Upper bound for any server-requested wait, in seconds
    #[serde(default)]
    pub max_wait_secs: Option<u64>,
}

impl RetryPolicy {
    /// Whether another round may start after `completed` rounds
    pub fn allows_round(&self, completed: u32) -> bool {
        self.max_rounds.is_none_or(|max| completed < max)
    }

    /// Apply the wait cap to a server-requested delay
    pub fn cap_wait(&self, requested_secs: u64) -> u64 {
        match self.max_wait_secs {
            Some(cap) => requested_secs.min(cap),
            None => requested_secs,
        }
    }
}

/// Destination directories for one host folder.
///
/// Accepts either a TOML array or a single comma-separated string; a
/// leading `>` in the string form is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeployTargets {
    List(Vec<String>),
    Joined(String),
}

impl DeployTargets {
    /// Destination directories, trimmed, empty entries dropped
    pub fn paths(&self) -> Vec<PathBuf> {
        let raw: Vec<&str> = match self {
            DeployTargets::List(items) => items.iter().map(String::as_str).collect(),
            DeployTargets::Joined(joined) => {
                let joined = joined.trim();
                let joined = joined.strip_prefix('>').unwrap_or(joined);
                joined.split(',').collect()
            }
        };

        raw.into_iter()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect()
    }
}

impl AgentConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> CourierResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CourierError::Config(format!("failed to read {}: {e}", path.display()))
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> CourierResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Check the required entries
    pub fn validate(&self) -> CourierResult<()> {
        if self.server.trim().is_empty() {
            return Err(CourierError::Config(
                "missing required entry `server`".to_string(),
            ));
        }

        if self.login.trim().is_empty() {
            return Err(CourierError::Config(
                "missing required entry `login`".to_string(),
            ));
        }

        for dir in &self.search_path {
            if !dir.exists() {
                return Err(CourierError::Config(format!(
                    "search_path entry {} does not exist",
                    dir.display()
                )));
            }
        }

        if self.read_timeout_secs == Some(0) {
            return Err(CourierError::Config(
                "read_timeout_secs must be at least 1".to_string(),
            ));
        }

        if self.retry.max_rounds == Some(0) {
            return Err(CourierError::Config(
                "retry.max_rounds must be at least 1".to_string(),
            ));
        }

        self.log_level()?;

        Ok(())
    }

    /// Parsed `log_level`
    pub fn log_level(&self) -> CourierResult<LogLevel> {
        self.log_level.parse()
    }

    /// Bound on the wait for each server reply
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }

    /// Destination directories configured for a host folder.
    ///
    /// The trailing `/` of the host folder is optional on both sides.
    pub fn deploy_targets(&self, host_folder: &str) -> Option<Vec<PathBuf>> {
        let wanted = host_folder.trim_end_matches('/');
        self.deploy
            .iter()
            .find(|(key, _)| key.trim_end_matches('/') == wanted)
            .map(|(_, targets)| targets.paths())
    }
}
