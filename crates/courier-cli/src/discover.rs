//! Configuration file discovery

use courier::{CourierError, CourierResult};
use std::path::{Path, PathBuf};

/// Default configuration file name
pub const CONFIG_FILE: &str = "courier.toml";

/// Candidate configuration files in lookup order
pub fn candidates(description: Option<&Path>, workspace: &Path) -> Vec<PathBuf> {
    let stem_file = description
        .and_then(Path::file_stem)
        .map(|stem| format!("{}.toml", stem.to_string_lossy()));
    let description_dir = description.map(|d| match d.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    });

    let workspace = workspace.to_path_buf();
    let mut found = Vec::new();
    for dir in description_dir.iter().chain(std::iter::once(&workspace)) {
        if let Some(stem_file) = &stem_file {
            found.push(dir.join(stem_file));
        }
        found.push(dir.join(CONFIG_FILE));
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        found.push(exe_dir.join(CONFIG_FILE));
    }
    found
}

/// First existing configuration file
pub fn config_file(description: Option<&Path>, workspace: &Path) -> CourierResult<PathBuf> {
    let candidates = candidates(description, workspace);
    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| {
            let tried: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
            CourierError::Config(format!(
                "no configuration file found, looked for {}",
                tried.join(", ")
            ))
        })
}
