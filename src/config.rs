use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_API_BASE;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    pub clickup: Option<ClickUpConfig>,
    pub artifacts: Option<ArtifactsConfig>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ClickUpConfig {
    pub api_base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ArtifactsConfig {
    pub root: Option<String>,
}

impl AppConfig {
    pub fn api_base_url(&self) -> &str {
        self.clickup
            .as_ref()
            .and_then(|c| c.api_base_url.as_deref())
            .unwrap_or(DEFAULT_API_BASE)
    }

    /// Artifacts root: CLI override, then config, then `<cwd>/clickup`.
    pub fn artifacts_root(&self, cli_override: Option<&Path>) -> PathBuf {
        if let Some(path) = cli_override {
            return path.to_path_buf();
        }
        if let Some(root) = self.artifacts.as_ref().and_then(|a| a.root.as_deref()) {
            return PathBuf::from(root);
        }
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("clickup")
    }
}

pub fn config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".clickup-ticket")
        .join("config.toml")
}

/// Load `path`, or the default location when none is given. A missing
/// default file yields defaults; a missing explicit file is an error.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let (path, explicit) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (config_path(), false),
    };
    if !explicit && !path.exists() {
        return Ok(AppConfig::default());
    }
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<AppConfig> {
    toml::from_str(contents).with_context(|| "Failed to parse config.toml")
}
