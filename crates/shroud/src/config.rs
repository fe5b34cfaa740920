//! Configuration file structure (shroud.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use shroud_glue::Manifest;

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(flatten)]
    pub manifest: Manifest,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory, relative to the config file
    #[serde(default = "default_output_dir")]
    pub dir: String,

    /// File name of the generated module
    #[serde(default = "default_module")]
    pub module: String,

    #[serde(default = "default_true")]
    pub minify: bool,

    #[serde(default = "default_true")]
    pub typescript: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            module: default_module(),
            minify: true,
            typescript: true,
        }
    }
}

fn default_output_dir() -> String {
    "dist".to_string()
}
fn default_module() -> String {
    "shroud.js".to_string()
}
fn default_true() -> bool {
    true
}

impl ConfigFile {
    /// Parse and validate a config file's content.
    pub fn parse(content: &str) -> Result<Self> {
        let config: ConfigFile = toml::from_str(content).context("Failed to parse config")?;
        config.manifest.validate()?;
        Ok(config)
    }
}

/// Load the configuration. Unlike the manifest it describes, the file must exist.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        anyhow::bail!(
            "Config file not found: {}. Run 'shroud init' first.",
            path.display()
        );
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config = ConfigFile::parse(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;

    tracing::info!(
        "Loaded {} component(s) from {}",
        config.manifest.components.len(),
        path.display()
    );
    Ok(config)
}

/// Directory the config's relative paths are resolved from.
pub fn base_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
