use std::path::PathBuf;

use anyhow::{Context, Result};
use baton_forward::{FlagOccurrence, FlagSource, FlagValue};
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "baton.toml";

const DEFAULT_INDEX_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct BatonConfig {
    #[serde(default)]
    pub forward: ForwardConfig,
    #[serde(default)]
    pub index: IndexConfig,
}

/// Default launch flags applied before command-line flags, so an explicit
/// flag on the command line always wins.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ForwardConfig {
    #[serde(default)]
    pub defaults: toml::map::Map<String, toml::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Root directory holding per-tool session exports.
    #[serde(default)]
    pub root: Option<String>,
    #[serde(default = "default_index_ttl")]
    pub ttl_secs: u64,
}

fn default_index_ttl() -> u64 {
    DEFAULT_INDEX_TTL_SECS
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            root: None,
            ttl_secs: default_index_ttl(),
        }
    }
}

/// Config directory path (~/.config/baton/).
pub fn config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home).join(".config").join("baton"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load config from disk, returning defaults if the file does not exist.
pub fn load_config() -> Result<BatonConfig> {
    let path = config_path()?;
    if !path.exists() {
        return Ok(BatonConfig::default());
    }
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config at {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config at {}", path.display()))
}

/// Data directory for the session index (~/.local/share/baton/).
pub fn data_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .context("Could not determine home directory")?;
    Ok(PathBuf::from(home)
        .join(".local")
        .join("share")
        .join("baton"))
}

impl BatonConfig {
    /// The session-export root, tilde-expanded, falling back to the data dir.
    pub fn index_root(&self) -> Result<PathBuf> {
        match &self.index.root {
            Some(root) => Ok(PathBuf::from(shellexpand::tilde(root).to_string())),
            None => Ok(data_dir()?.join("sessions")),
        }
    }

    /// `[forward.defaults]` entries as occurrences, in key order.
    pub fn forward_occurrences(&self) -> Vec<FlagOccurrence> {
        self.forward
            .defaults
            .iter()
            .filter_map(|(key, value)| {
                let value = match value {
                    toml::Value::Boolean(b) => FlagValue::Bool(*b),
                    toml::Value::String(s) => FlagValue::Str(s.clone()),
                    toml::Value::Integer(n) => FlagValue::Str(n.to_string()),
                    _ => return None,
                };
                Some(FlagOccurrence {
                    key: key.clone(),
                    value,
                    source: FlagSource::Config,
                })
            })
            .collect()
    }
}
