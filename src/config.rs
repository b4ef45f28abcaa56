use crate::git::decode::DEFAULT_ENCODINGS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub pull: PullConfig,
    #[serde(default)]
    pub push: PushConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeneralConfig {
    /// Encodings tried in order when decoding command output.
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,
    /// Remote `gitsync pull` fetches and pulls from. Unset means the
    /// current branch's upstream.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PullConfig {
    /// Rebase local commits instead of merging.
    #[serde(default)]
    pub rebase: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct PushConfig {
    /// Treat untracked files as changes to commit.
    #[serde(default)]
    pub include_untracked: bool,
}

fn default_encodings() -> Vec<String> {
    DEFAULT_ENCODINGS.iter().map(|e| e.to_string()).collect()
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            encodings: default_encodings(),
            remote: None,
        }
    }
}

impl Config {
    /// Get the config file path: `$GITSYNC_CONFIG`, else `~/.config/gitsync/config.toml`.
    pub fn path() -> PathBuf {
        if let Some(path) = std::env::var_os("GITSYNC_CONFIG") {
            return PathBuf::from(path);
        }
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gitsync");
        config_dir.join("config.toml")
    }

    /// Load config from the default path.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path())
    }

    /// Load config from file, falling back to defaults if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }
}
