//! Local configuration store
//!
//! Settings live in `<config dir>/neonbx/config.json`. They are loaded once per
//! invocation and passed explicitly to everything that needs them.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Overrides the directory holding `config.json`
pub const CONFIG_DIR_ENV: &str = "NEONBX_CONFIG_DIR";

const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_ENV_FILE: &str = ".env.local";
pub const DEFAULT_POOLED_KEY: &str = "DATABASE_URL";
pub const DEFAULT_UNPOOLED_KEY: &str = "DATABASE_URL_UNPOOLED";
pub const DEFAULT_BRANCH: &str = "main";
pub const DEFAULT_ROLE_NAME: &str = "neondb_owner";
pub const DEFAULT_DATABASE_NAME: &str = "neondb";

/// Keys accepted by `config set`, in display order
pub const CONFIG_KEYS: &[&str] = &[
    "projectId",
    "apiKey",
    "envFilePath",
    "pooledKey",
    "unpooledKey",
    "defaultBranch",
    "roleName",
    "databaseName",
];

/// Errors that can occur reading or writing the configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config key: {key}. Valid keys: {}", CONFIG_KEYS.join(", "))]
    InvalidKey { key: String },

    #[error("Config value for {0} must not be empty")]
    EmptyValue(String),

    #[error("Could not determine a configuration directory")]
    NoConfigDir,
}

/// Configuration as persisted; every field may be absent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub env_file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pooled_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unpooled_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
}

/// Validated configuration for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub project_id: String,
    pub api_key: Option<String>,
    pub env_file_path: PathBuf,
    pub pooled_key: String,
    pub unpooled_key: String,
    pub default_branch: String,
    pub role_name: String,
    pub database_name: String,
}

/// Resolve the directory holding the config file
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let base_dirs = directories::BaseDirs::new().ok_or(ConfigError::NoConfigDir)?;
    Ok(base_dirs.config_dir().join("neonbx"))
}

/// Full path of the config file
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

impl StoredConfig {
    /// Load config from a file; a missing file is an empty config
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save config to a file, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, json).map_err(io_err)?;
        tracing::debug!(path = %path.display(), "config saved");
        Ok(())
    }

    /// Delete the config file; deleting a missing file succeeds
    pub fn clear(path: &Path) -> Result<(), ConfigError> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Whether enough is configured to talk to a project
    pub fn is_initialized(&self) -> bool {
        self.project_id.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// Look up a value by its camelCase key
    pub fn get(&self, key: &str) -> Result<Option<&str>, ConfigError> {
        Ok(self.slot_ref(key)?.as_deref())
    }

    /// Set a value by its camelCase key
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigError::EmptyValue(key.to_string()));
        }
        *self.slot_mut(key)? = Some(value.to_string());
        Ok(())
    }

    /// Produce the validated config, or `None` when no project is configured
    pub fn require(&self) -> Option<Config> {
        if !self.is_initialized() {
            return None;
        }
        let or = |v: &Option<String>, d: &str| {
            v.as_deref()
                .filter(|s| !s.is_empty())
                .unwrap_or(d)
                .to_string()
        };
        Some(Config {
            project_id: self.project_id.clone().unwrap_or_default(),
            api_key: self.api_key.clone().filter(|k| !k.is_empty()),
            env_file_path: PathBuf::from(or(&self.env_file_path, DEFAULT_ENV_FILE)),
            pooled_key: or(&self.pooled_key, DEFAULT_POOLED_KEY),
            unpooled_key: or(&self.unpooled_key, DEFAULT_UNPOOLED_KEY),
            default_branch: or(&self.default_branch, DEFAULT_BRANCH),
            role_name: or(&self.role_name, DEFAULT_ROLE_NAME),
            database_name: or(&self.database_name, DEFAULT_DATABASE_NAME),
        })
    }

    fn slot_ref(&self, key: &str) -> Result<&Option<String>, ConfigError> {
        Ok(match key {
            "projectId" => &self.project_id,
            "apiKey" => &self.api_key,
            "envFilePath" => &self.env_file_path,
            "pooledKey" => &self.pooled_key,
            "unpooledKey" => &self.unpooled_key,
            "defaultBranch" => &self.default_branch,
            "roleName" => &self.role_name,
            "databaseName" => &self.database_name,
            _ => {
                return Err(ConfigError::InvalidKey {
                    key: key.to_string(),
                })
            }
        })
    }

    fn slot_mut(&mut self, key: &str) -> Result<&mut Option<String>, ConfigError> {
        Ok(match key {
            "projectId" => &mut self.project_id,
            "apiKey" => &mut self.api_key,
            "envFilePath" => &mut self.env_file_path,
            "pooledKey" => &mut self.pooled_key,
            "unpooledKey" => &mut self.unpooled_key,
            "defaultBranch" => &mut self.default_branch,
            "roleName" => &mut self.role_name,
            "databaseName" => &mut self.database_name,
            _ => {
                return Err(ConfigError::InvalidKey {
                    key: key.to_string(),
                })
            }
        })
    }
}

/// Mask a secret for display, keeping the first and last four characters
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "••••••••".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}••••{}", head, tail)
}
