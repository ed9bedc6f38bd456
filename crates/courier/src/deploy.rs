//! Artifact deployment
//!
//! A result archive is extracted into the workspace. When it carries host
//! folders, output left over from earlier rounds is pruned and every host
//! folder is copied to the destinations mapped for it in the
//! configuration. Problems with individual destinations are collected in
//! the [`DeployReport`] instead of failing the run.

use courier_bundle::{ArchiveReader, RUNTIME_SUPPORT_FOLDER};
use courier_core::{AgentConfig, CourierError, CourierResult};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Per-language output roots in the workspace
pub const OUTPUT_ROOTS: [&str; 6] = ["InC", "InCPP", "InCS", "InKT", "InRS", "InTS"];

/// Example and test sources never copied to destinations
pub const SKIPPED_FILES: [&str; 8] = [
    "Test_.c", "Demo_.c", "Test_.cpp", "Demo_.cpp", "Test_.cs", "Demo_.cs", "Test_.ts", "Demo_.ts",
];

/// A destination directory that could not be created
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathError {
    pub host: String,
    pub destination: PathBuf,
    pub reason: String,
}

/// Outcome of one deployment
#[derive(Debug, Clone, Default)]
pub struct DeployReport {
    /// Files extracted into the workspace
    pub written: Vec<PathBuf>,
    /// Host folders found in the archive
    pub hosts: Vec<String>,
    /// Extracted informational documents
    pub info_documents: Vec<PathBuf>,
    /// Stale workspace files removed
    pub pruned: usize,
    /// Files copied to destinations
    pub copied: usize,
    /// Host folders without a configured destination
    pub missing_mappings: Vec<String>,
    pub path_errors: Vec<PathError>,
    pub copy_errors: Vec<String>,
}

impl DeployReport {
    /// Whether anything needs the user's attention
    pub fn has_notices(&self) -> bool {
        !self.missing_mappings.is_empty()
            || !self.path_errors.is_empty()
            || !self.copy_errors.is_empty()
    }

    /// Console text for the collected notices; empty when there are none.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if !self.missing_mappings.is_empty() {
            out.push_str(
                "Add the following entries to the [deploy] section of the configuration file:\n\n",
            );
            let rows: Vec<[String; 2]> = self
                .missing_mappings
                .iter()
                .map(|host| {
                    [
                        format!("\"{host}\""),
                        " [\"/dst/folder1\", \"../../dst/folder2\"]".to_string(),
                    ]
                })
                .collect();
            out.push_str(&render_table(&rows, '='));
        }

        if !self.path_errors.is_empty() {
            out.push_str("The following deployment paths cannot be created:\n\n");
            let rows: Vec<[String; 2]> = self
                .path_errors
                .iter()
                .map(|e| [e.host.clone(), format!(" {}", e.destination.display())])
                .collect();
            out.push_str(&render_table(&rows, ':'));
            out.push_str(" Check the [deploy] section of the configuration file.\n");
        }

        if !self.copy_errors.is_empty() {
            out.push_str("Errors in the deployment process:\n");
            for error in &self.copy_errors {
                out.push_str(error);
                out.push('\n');
            }
        }

        out
    }
}

/// Rows prefixed with `#`, every column padded to its widest cell plus one,
/// columns joined by `delim`, followed by a blank line.
fn render_table(rows: &[[String; 2]], delim: char) -> String {
    let mut widths = [0usize; 2];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for row in rows {
        let line = format!(
            "#{:<w0$}{delim}{:<w1$}",
            row[0],
            row[1],
            w0 = widths[0] + 1,
            w1 = widths[1] + 1
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Extracts result archives and distributes host folders
#[derive(Debug)]
pub struct Deployer<'a> {
    workspace: PathBuf,
    config: &'a AgentConfig,
}

impl<'a> Deployer<'a> {
    pub fn new(workspace: impl Into<PathBuf>, config: &'a AgentConfig) -> Self {
        Self {
            workspace: workspace.into(),
            config,
        }
    }

    /// Extract `archive` into the workspace and deploy its host folders.
    pub fn deploy(&self, archive: Vec<u8>) -> CourierResult<DeployReport> {
        let started = SystemTime::now();

        let unpacked = ArchiveReader::from_bytes(archive)
            .and_then(|reader| reader.unpack(&self.workspace))
            .map_err(|e| CourierError::Archive(e.to_string()))?;

        let mut report = DeployReport {
            written: unpacked.written,
            hosts: unpacked.hosts,
            info_documents: unpacked.info_documents,
            ..DeployReport::default()
        };

        if report.hosts.is_empty() {
            debug!("no host folders received, nothing to deploy");
            return Ok(report);
        }

        report.pruned = self.prune(started, &report.written, &report.hosts)?;

        for host in report.hosts.clone() {
            self.deploy_host(&host, &mut report);
        }

        info!(
            hosts = report.hosts.len(),
            copied = report.copied,
            pruned = report.pruned,
            "deployment finished"
        );
        Ok(report)
    }

    /// Remove output files older than `started` that this extraction did not
    /// write, then directories left empty. Returns the number of files removed.
    fn prune(&self, started: SystemTime, written: &[PathBuf], hosts: &[String]) -> CourierResult<usize> {
        let written_set: HashSet<&Path> = written.iter().map(PathBuf::as_path).collect();
        let mut keep_dirs: HashSet<PathBuf> = hosts.iter().map(|h| self.workspace.join(h)).collect();
        for file in written {
            keep_dirs.extend(
                file.ancestors()
                    .skip(1)
                    .take_while(|dir| *dir != self.workspace)
                    .map(Path::to_path_buf),
            );
        }

        let mut removed = 0;
        for root in OUTPUT_ROOTS {
            let root = self.workspace.join(root);
            if !root.is_dir() {
                continue;
            }

            for entry in WalkDir::new(&root)
                .contents_first(true)
                .into_iter()
                .filter_map(Result::ok)
            {
                let path = entry.path();
                if entry.file_type().is_dir() {
                    if !keep_dirs.contains(path) && is_empty_dir(path) {
                        fs::remove_dir(path)?;
                        debug!(dir = %path.display(), "removed empty directory");
                    }
                    continue;
                }

                if written_set.contains(path) {
                    continue;
                }
                let modified = entry.metadata().ok().and_then(|m| m.modified().ok());
                if modified.is_some_and(|m| m < started) {
                    fs::remove_file(path)?;
                    removed += 1;
                    debug!(file = %path.display(), "pruned stale output");
                }
            }
        }

        Ok(removed)
    }

    fn deploy_host(&self, host: &str, report: &mut DeployReport) {
        let Some(destinations) = self.config.deploy_targets(host) else {
            warn!(host, "no deployment mapping");
            report.missing_mappings.push(host.to_string());
            return;
        };

        let source = self.workspace.join(host);
        let (language_root, host_name) = host.split_once('/').unwrap_or((host, host));

        for destination in destinations {
            if let Err(e) = fs::create_dir_all(&destination) {
                warn!(host, destination = %destination.display(), error = %e, "cannot create destination");
                report.path_errors.push(PathError {
                    host: host.to_string(),
                    destination,
                    reason: e.to_string(),
                });
                continue;
            }

            match language_root {
                "InKT" => copy_tree(&source, &destination, report, |relative| {
                    !(relative.starts_with("demo_") || relative.starts_with("test_"))
                }),
                "InRS" => {
                    copy_tree(&source, &destination.join(host_name), report, |relative| {
                        !relative.starts_with("demo")
                    });
                    let support = self.workspace.join("InRS").join(RUNTIME_SUPPORT_FOLDER);
                    if support.is_dir() {
                        copy_tree(
                            &support,
                            &destination.join(RUNTIME_SUPPORT_FOLDER),
                            report,
                            |_| true,
                        );
                    }
                }
                _ => copy_tree(&source, &destination, report, |relative| {
                    relative
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_none_or(|name| !SKIPPED_FILES.contains(&name))
                }),
            }
        }
    }
}

/// Copy every regular file below `source` that passes `include` to the
/// same relative path below `destination`.
fn copy_tree(
    source: &Path,
    destination: &Path,
    report: &mut DeployReport,
    include: impl Fn(&Path) -> bool,
) {
    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report.copy_errors.push(format!("{}: {e}", source.display()));
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        if !include(relative) {
            continue;
        }

        let target = destination.join(relative);
        let copied = target
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| fs::copy(entry.path(), &target));
        match copied {
            Ok(_) => report.copied += 1,
            Err(e) => report.copy_errors.push(format!(
                "{} -> {}: {e}",
                entry.path().display(),
                target.display()
            )),
        }
    }
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path).is_ok_and(|mut entries| entries.next().is_none())
}
