//! Command context passed to command handlers
//!
//! Loaded once in `main()` and passed by reference to every handler, so the
//! configuration is never read from a global.

use std::path::PathBuf;

use crate::cli::output::Output;
use crate::core::config::{self, Config, ConfigError, StoredConfig};
use crate::core::credentials::{CredentialSource, NeonctlAuth};
use crate::error::Error;
use crate::neon::NeonClient;

/// Invocation-wide state available to all command handlers.
pub struct CommandContext {
    /// Location of `config.json`
    pub config_path: PathBuf,
    /// Configuration as loaded from disk
    pub stored: StoredConfig,
    /// Base URL override for the Neon API
    pub api_url: Option<String>,
    /// Show verbose output (`--verbose`)
    pub verbose: bool,
}

impl CommandContext {
    /// Load the configuration from its default location
    pub fn load(api_url: Option<String>, verbose: bool) -> Result<Self, Error> {
        let config_path = config::config_path()?;
        let stored = StoredConfig::load(&config_path)?;
        Ok(Self::with_stored(config_path, stored, api_url, verbose))
    }

    /// Like [`CommandContext::load`], but an unparseable config file is
    /// replaced by an empty one so `init` and `config reset` can recover.
    pub fn load_recovering(api_url: Option<String>, verbose: bool) -> Result<Self, Error> {
        let config_path = config::config_path()?;
        let stored = match StoredConfig::load(&config_path) {
            Ok(stored) => stored,
            Err(e @ ConfigError::Parse { .. }) => {
                Output::warning(&format!("{}. Starting from an empty configuration.", e));
                StoredConfig::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self::with_stored(config_path, stored, api_url, verbose))
    }

    fn with_stored(
        config_path: PathBuf,
        stored: StoredConfig,
        api_url: Option<String>,
        verbose: bool,
    ) -> Self {
        Self {
            config_path,
            stored,
            api_url,
            verbose,
        }
    }

    /// Validated config, or `ConfigMissing` when `init` has not run
    pub fn require_config(&self) -> Result<Config, Error> {
        self.stored.require().ok_or(Error::ConfigMissing)
    }

    /// HTTP client for the Neon API
    pub fn client(&self) -> NeonClient {
        NeonClient::new(self.api_url.as_deref())
    }

    /// Resolve a bearer token, re-authenticating through neonctl at most once
    pub fn access_token(&self, config: &Config) -> Result<String, Error> {
        Ok(CredentialSource::from_env(config).access_token(&NeonctlAuth)?)
    }
}
