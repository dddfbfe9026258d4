//! Configuration management

use crate::core::links::is_http;
use crate::error::{Result, VidshelfError};
use crate::types::Config;
use crate::utils::paths::{config_path, ensure_parent};
use std::path::Path;
use tokio::fs;

impl Config {
    /// Reject settings the pipeline cannot honor
    pub fn validate(&self) -> Result<()> {
        if !is_http(&self.fallback_url) {
            return Err(VidshelfError::InvalidConfig(format!(
                "fallback_url must be an http(s) URL, got {:?}",
                self.fallback_url
            )));
        }
        if self.fetch_timeout_secs == 0 {
            return Err(VidshelfError::InvalidConfig(
                "fetch_timeout_secs must be > 0".into(),
            ));
        }
        if self.source.trim().is_empty() {
            return Err(VidshelfError::InvalidConfig("source must not be empty".into()));
        }
        Ok(())
    }
}

/// Load configuration from `path` (or the default location), falling back
/// to defaults for a missing file or missing keys
pub async fn load_config(path: Option<&Path>) -> Result<Config> {
    let default_path = config_path();
    let path = path.unwrap_or(default_path.as_path());

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path).await?;
    let config: Config = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to `path`
pub async fn save_config(config: &Config, path: &Path) -> Result<()> {
    ensure_parent(path).await?;
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content).await?;
    Ok(())
}

/// Save configuration to `path`, refusing to replace an existing file
/// unless `overwrite` is set
pub async fn init_config(config: &Config, path: &Path, overwrite: bool) -> Result<()> {
    if !overwrite && fs::try_exists(path).await? {
        return Err(VidshelfError::File(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists (use --force to overwrite)", path.display()),
        )));
    }
    save_config(config, path).await
}
