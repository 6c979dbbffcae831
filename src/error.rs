//! Crate-level error taxonomy
//!
//! Every failure that ends a command maps to one of these variants. Module
//! level errors convert in through `From` so handlers can use `?`.

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::credentials::CredentialError;
use crate::core::env_file::EnvFileError;
use crate::neon::RemoteError;

/// Errors surfaced by neonbx operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("No configuration found. Run `neonbx init` first.")]
    ConfigMissing,

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("No Neon branch found matching '{target}'. Available branches: {}", .available.join(", "))]
    NotFound {
        target: String,
        available: Vec<String>,
    },

    #[error("{0}")]
    GitUnavailable(String),

    #[error("Failed to update env file: {0}")]
    WriteFailure(#[from] EnvFileError),

    #[error("No endpoints found for branch '{0}'")]
    NoEndpoint(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Credentials(#[from] CredentialError),

    #[error("Prompt failed: {0}")]
    Prompt(String),
}

impl From<dialoguer::Error> for Error {
    fn from(e: dialoguer::Error) -> Self {
        Error::Prompt(e.to_string())
    }
}

/// Result alias for neonbx operations
pub type Result<T> = std::result::Result<T, Error>;
