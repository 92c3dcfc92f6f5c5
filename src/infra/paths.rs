// src/infra/paths.rs — XDG-compliant path management
//
// All paths respect the REQANALYZER_HOME environment variable for isolation.
// When REQANALYZER_HOME is set, config and data live under that directory.
// When unset, config uses ~/.reqanalyzer/ and data uses XDG_DATA_HOME/reqanalyzer.

use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Returns the REQANALYZER_HOME override, if set.
fn reqanalyzer_home() -> Option<PathBuf> {
    std::env::var_os("REQANALYZER_HOME").map(PathBuf::from)
}

/// Home directory, falling back to the working directory on exotic systems.
pub fn dirs_home() -> PathBuf {
    BaseDirs::new()
        .map(|b| b.home_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Configuration directory: $REQANALYZER_HOME/ or ~/.reqanalyzer/
pub fn config_dir() -> PathBuf {
    if let Some(home) = reqanalyzer_home() {
        return home;
    }
    dirs_home().join(".reqanalyzer")
}

/// Data directory: $REQANALYZER_HOME/data/ or ~/.local/share/reqanalyzer/
pub fn data_dir() -> PathBuf {
    if let Some(home) = reqanalyzer_home() {
        return home.join("data");
    }
    match ProjectDirs::from("", "", "reqanalyzer") {
        Some(dirs) => dirs.data_local_dir().to_path_buf(),
        None => config_dir().join("data"),
    }
}

/// Key-value store directory
pub fn store_dir() -> PathBuf {
    data_dir().join("store")
}

/// Config file path
pub fn config_file_path() -> PathBuf {
    config_dir().join("config.toml")
}
