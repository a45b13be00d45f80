use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::OverrideEntry;

/// Root configuration structure, deserialized from `.license-bom/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// How the dependency closure is obtained.
    #[serde(default)]
    pub graph: GraphConfig,
    /// Forced attributions, applied before any `--override-file` entries.
    #[serde(default)]
    pub overrides: Vec<OverrideEntry>,
}

#[derive(Debug, Deserialize)]
pub struct GraphConfig {
    /// Go toolchain binary. Defaults to `go` from `PATH`.
    #[serde(default = "default_go")]
    pub go: String,
    /// GOPATH forced on every toolchain call; `--gopath` takes precedence.
    #[serde(default)]
    pub gopath: Option<PathBuf>,
}

fn default_go() -> String {
    "go".to_string()
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            go: default_go(),
            gopath: None,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`: path passed via `--config`
/// 2. `<project_path>/.license-bom/config.toml`
/// 3. `~/.config/license-bom/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = project_path.join(".license-bom").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("license-bom").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("could not read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
}
