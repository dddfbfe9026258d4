//! Config file location
//!
//! `$XDG_CONFIG_HOME/vidshelf/config.json` when that variable holds an
//! absolute path, else the platform config dir from `dirs`.

use std::env;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::Result;

const APP_NAME: &str = "vidshelf";
const CONFIG_FILE: &str = "config.json";

fn resolve_config_dir(xdg: Option<PathBuf>, platform: Option<PathBuf>) -> PathBuf {
    xdg.filter(|p| p.is_absolute())
        .or(platform)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

pub fn config_dir() -> PathBuf {
    resolve_config_dir(env::var_os("XDG_CONFIG_HOME").map(PathBuf::from), dirs::config_dir())
}

pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

/// Create the directory holding `path`
pub async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    Ok(())
}
