//! Compiler front-end seam
//!
//! The symbol model is produced outside the agent by a compiler front-end
//! that understands the description language. A [`Frontend`] runs it (or
//! reads its saved output) and resolves the result into a [`SymbolModel`].

use courier_core::{CourierError, CourierResult, FrontendConfig, SymbolModel};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Suffix of the symbol report saved next to a description file
pub const SIDECAR_SUFFIX: &str = ".symbols.json";

/// Produces the symbol model of a description file
pub trait Frontend {
    /// Build the model for `description`, whose file stem names the root type.
    fn symbol_model(&self, description: &Path) -> CourierResult<SymbolModel>;
}

/// Reads a symbol report already written to disk
#[derive(Debug, Clone, Default)]
pub struct SidecarFrontend {
    report: Option<PathBuf>,
}

impl SidecarFrontend {
    /// Read `<description>.symbols.json`
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a fixed report file
    pub fn with_report(report: impl Into<PathBuf>) -> Self {
        Self {
            report: Some(report.into()),
        }
    }

    /// Report location for a description file
    pub fn report_path(&self, description: &Path) -> PathBuf {
        match &self.report {
            Some(path) => path.clone(),
            None => {
                let mut name = description.as_os_str().to_owned();
                name.push(SIDECAR_SUFFIX);
                PathBuf::from(name)
            }
        }
    }
}

impl Frontend for SidecarFrontend {
    fn symbol_model(&self, description: &Path) -> CourierResult<SymbolModel> {
        let report = self.report_path(description);
        debug!(report = %report.display(), "reading symbol report");

        let data = std::fs::read(&report).map_err(|e| {
            CourierError::Frontend(format!("cannot read symbol report {}: {e}", report.display()))
        })?;
        SymbolModel::from_json(&data, &file_stem(description)?)
    }
}

/// Runs an external command that prints the symbol report on stdout.
///
/// `{file}` in any argument is replaced by the description path and
/// `{search_path}` by the search path joined with the platform separator.
#[derive(Debug, Clone)]
pub struct CommandFrontend {
    command: Vec<String>,
    search_path: Vec<PathBuf>,
}

impl CommandFrontend {
    pub fn new(command: Vec<String>, search_path: Vec<PathBuf>) -> Self {
        Self {
            command,
            search_path,
        }
    }

    /// Program and arguments with placeholders substituted
    pub fn command_line(&self, description: &Path) -> CourierResult<Vec<String>> {
        let joined = std::env::join_paths(&self.search_path)
            .map_err(|e| CourierError::Config(format!("search_path: {e}")))?;
        let joined = joined.to_string_lossy();
        let file = description.to_string_lossy();

        Ok(self
            .command
            .iter()
            .map(|arg| arg.replace("{file}", &file).replace("{search_path}", &joined))
            .collect())
    }
}

impl Frontend for CommandFrontend {
    fn symbol_model(&self, description: &Path) -> CourierResult<SymbolModel> {
        let command_line = self.command_line(description)?;
        let (program, args) = command_line
            .split_first()
            .ok_or_else(|| CourierError::Config("frontend.command is empty".to_string()))?;

        info!(program = %program, "compiling description");
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| CourierError::Frontend(format!("cannot run {program}: {e}")))?;

        if !output.status.success() {
            return Err(CourierError::Frontend(format!(
                "{program} failed ({}): {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        SymbolModel::from_json(&output.stdout, &file_stem(description)?)
    }
}

/// Front-end selected by the configuration
pub fn from_config(config: &FrontendConfig, search_path: &[PathBuf]) -> Box<dyn Frontend> {
    if !config.command.is_empty() {
        Box::new(CommandFrontend::new(
            config.command.clone(),
            search_path.to_vec(),
        ))
    } else if let Some(report) = &config.symbols {
        Box::new(SidecarFrontend::with_report(report))
    } else {
        Box::new(SidecarFrontend::new())
    }
}

fn file_stem(description: &Path) -> CourierResult<String> {
    description
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| {
            CourierError::InputUnavailable(format!("{} has no file name", description.display()))
        })
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    const REPORT: &str = r#"{ "types": [
        { "name": "demo.Proj", "kind": "interface" },
        { "name": "demo.Proj$Pack", "kind": "class" } ] }"#;

    #[test]
    fn SidecarFrontend___reads_report_next_to_description() {
        let dir = tempfile::tempdir().unwrap();
        let description = dir.path().join("Proj.java");
        std::fs::write(&description, "public interface Proj {}").unwrap();
        std::fs::write(dir.path().join("Proj.java.symbols.json"), REPORT).unwrap();

        let model = SidecarFrontend::new().symbol_model(&description).unwrap();

        assert_eq!(model.root(), "demo.Proj");
        assert!(model.contains("demo.Proj$Pack"));
    }

    #[test]
    fn SidecarFrontend___fixed_report___overrides_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("model.json");
        std::fs::write(&report, REPORT).unwrap();

        let frontend = SidecarFrontend::with_report(&report);

        assert_eq!(frontend.report_path(Path::new("/x/Proj.java")), report);
        assert!(frontend.symbol_model(Path::new("/x/Proj.java")).is_ok());
    }

    #[test]
    fn SidecarFrontend___missing_report___is_frontend_error() {
        let result = SidecarFrontend::new().symbol_model(Path::new("/no/such/Proj.java"));

        assert!(matches!(result, Err(CourierError::Frontend(_))));
    }

    #[test]
    fn CommandFrontend___command_line___substitutes_placeholders() {
        let frontend = CommandFrontend::new(
            vec!["symc".into(), "--cp={search_path}".into(), "{file}".into()],
            vec![PathBuf::from("lib")],
        );

        let line = frontend.command_line(Path::new("Proj.java")).unwrap();

        assert_eq!(line, ["symc", "--cp=lib", "Proj.java"]);
    }

    #[cfg(unix)]
    #[test]
    fn CommandFrontend___parses_stdout_of_command() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("report.json");
        std::fs::write(&report, REPORT).unwrap();
        let frontend = CommandFrontend::new(
            vec!["cat".into(), report.to_string_lossy().into_owned()],
            vec![],
        );

        let model = frontend.symbol_model(Path::new("Proj.java")).unwrap();

        assert_eq!(model.root(), "demo.Proj");
    }

    #[cfg(unix)]
    #[test]
    fn CommandFrontend___failing_command___is_frontend_error() {
        let frontend = CommandFrontend::new(vec!["false".into()], vec![]);

        let result = frontend.symbol_model(Path::new("Proj.java"));

        assert!(matches!(result, Err(CourierError::Frontend(_))));
    }

    #[test]
    fn from_config___report_used_without_command() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("model.json");
        std::fs::write(&report, REPORT).unwrap();
        let config = FrontendConfig {
            command: vec![],
            symbols: Some(report),
        };

        let model = from_config(&config, &[]).symbol_model(Path::new("Proj.java"));

        assert!(model.is_ok());
    }

    #[test]
    fn from_config___command_wins_over_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = dir.path().join("model.json");
        std::fs::write(&report, REPORT).unwrap();
        let config = FrontendConfig {
            command: vec!["/no/such/symc".into()],
            symbols: Some(report),
        };

        let err = from_config(&config, &[])
            .symbol_model(Path::new("Proj.java"))
            .unwrap_err();

        assert!(err.to_string().contains("/no/such/symc"));
    }
}
