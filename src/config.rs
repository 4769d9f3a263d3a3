//! Tool configuration: optional JSON file plus `CAMLAG_*` env overrides.
//!
//! Command-line arguments always win over configuration; the file only
//! supplies defaults for values the invocation leaves out.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::delay::DelayModel;

const DEFAULT_UI_MODE: &str = "auto";

#[derive(Debug, Deserialize, Default)]
struct ToolConfigFile {
    output_root: Option<PathBuf>,
    distribution: Option<String>,
    ui: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ToolConfig {
    /// Default root for synthetic stream directories.
    pub output_root: Option<PathBuf>,
    /// Default delay distribution spec (`kind,param1[,param2]`).
    pub distribution: Option<String>,
    /// Stderr progress mode: `auto`, `plain`, or `pretty`.
    pub ui: String,
}

impl ToolConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("CAMLAG_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => read_config_file(Path::new(path))?,
            None => ToolConfigFile::default(),
        };
        let mut cfg = Self {
            output_root: file_cfg.output_root,
            distribution: file_cfg.distribution,
            ui: file_cfg.ui.unwrap_or_else(|| DEFAULT_UI_MODE.to_string()),
        };
        cfg.apply_env();
        cfg.validate()?;
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        if let Ok(root) = std::env::var("CAMLAG_OUTPUT_ROOT") {
            if !root.trim().is_empty() {
                self.output_root = Some(PathBuf::from(root));
            }
        }
        if let Ok(spec) = std::env::var("CAMLAG_DISTRIBUTION") {
            if !spec.trim().is_empty() {
                self.distribution = Some(spec);
            }
        }
        if let Ok(ui) = std::env::var("CAMLAG_UI") {
            if !ui.trim().is_empty() {
                self.ui = ui;
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if let Some(spec) = &self.distribution {
            DelayModel::parse(spec)?;
        }
        if !matches!(self.ui.as_str(), "auto" | "plain" | "pretty") {
            return Err(anyhow!(
                "ui mode must be one of auto|plain|pretty, got '{}'",
                self.ui
            ));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<ToolConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
