//! Neon credential resolution
//!
//! A token comes from `NEON_API_KEY`, the configured API key, or the
//! credentials file written by `neonctl auth`. Expired file credentials get
//! exactly one re-authentication attempt.

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::config::Config;
use crate::util::log_cmd;

/// Environment variable holding a Neon API key
pub const API_KEY_ENV: &str = "NEON_API_KEY";

/// Epoch values above this are milliseconds, below are seconds
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Errors that can occur resolving a Neon credential
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("No Neon credentials found. Set NEON_API_KEY, run `neonbx config set apiKey <key>`, or run `neonbx init` to authenticate.")]
    Missing,

    #[error("Neon credentials are still missing or expired after re-authentication")]
    RefreshFailed,

    #[error("Neon authentication failed: {0}")]
    AuthCommand(String),
}

/// Token set stored by `neonctl auth`
#[derive(Debug, Clone, Deserialize)]
pub struct NeonCredentials {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    pub expires_at: i64,
}

impl NeonCredentials {
    /// Expiry instant; accepts both second and millisecond epochs
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        if self.expires_at > MILLIS_THRESHOLD {
            Utc.timestamp_millis_opt(self.expires_at).single()
        } else {
            Utc.timestamp_opt(self.expires_at, 0).single()
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().map_or(true, |at| now >= at)
    }
}

/// Default location of the neonctl credentials file
pub fn default_credentials_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join("neonctl").join("credentials.json"));
        }
    }
    directories::BaseDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(".config")
            .join("neonctl")
            .join("credentials.json")
    })
}

/// Read the credentials file; unreadable or malformed files count as absent
pub fn read_credentials(path: &Path) -> Option<NeonCredentials> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(creds) => Some(creds),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "ignoring malformed credentials file");
            None
        }
    }
}

/// Runs an interactive authentication flow that refreshes the credentials file
pub trait Authenticator {
    fn authenticate(&self) -> Result<(), CredentialError>;
}

/// Delegates authentication to the `neonctl` CLI
pub struct NeonctlAuth;

impl Authenticator for NeonctlAuth {
    fn authenticate(&self) -> Result<(), CredentialError> {
        let mut cmd = match which::which("neonctl") {
            Ok(path) => {
                let mut cmd = Command::new(path);
                cmd.arg("auth");
                cmd
            }
            Err(_) => {
                let mut cmd = Command::new("npx");
                cmd.args(["neonctl@latest", "auth"]);
                cmd
            }
        };
        log_cmd(&cmd);

        let status = cmd
            .status()
            .map_err(|e| CredentialError::AuthCommand(e.to_string()))?;
        if !status.success() {
            return Err(CredentialError::AuthCommand(format!(
                "neonctl exited with {}",
                status
            )));
        }
        Ok(())
    }
}

/// Where a bearer token may come from, in priority order
#[derive(Debug, Clone, Default)]
pub struct CredentialSource {
    pub env_api_key: Option<String>,
    pub config_api_key: Option<String>,
    pub credentials_path: Option<PathBuf>,
}

impl CredentialSource {
    /// Build the source from the process environment and loaded config
    pub fn from_env(config: &Config) -> Self {
        Self {
            env_api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()),
            config_api_key: config.api_key.clone(),
            credentials_path: default_credentials_path(),
        }
    }

    /// Resolve a bearer token, re-authenticating at most once
    pub fn access_token(&self, auth: &dyn Authenticator) -> Result<String, CredentialError> {
        if let Some(key) = self.env_api_key.as_ref().or(self.config_api_key.as_ref()) {
            return Ok(key.clone());
        }

        let path = self
            .credentials_path
            .as_deref()
            .ok_or(CredentialError::Missing)?;
        let creds = read_credentials(path).ok_or(CredentialError::Missing)?;
        if !creds.is_expired(Utc::now()) {
            return Ok(creds.access_token);
        }

        warn!("Neon token expired, re-authenticating");
        auth.authenticate()?;

        match read_credentials(path) {
            Some(refreshed) if !refreshed.is_expired(Utc::now()) => Ok(refreshed.access_token),
            _ => Err(CredentialError::RefreshFailed),
        }
    }

    /// Whether a usable credential is available without prompting
    pub fn has_credentials(&self) -> bool {
        if self.env_api_key.is_some() || self.config_api_key.is_some() {
            return true;
        }
        self.credentials_path
            .as_deref()
            .and_then(read_credentials)
            .is_some_and(|c| !c.is_expired(Utc::now()))
    }
}
