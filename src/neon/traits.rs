//! Remote branch API trait definition

use async_trait::async_trait;
use thiserror::Error;

use super::types::{Branch, Endpoint};

/// Errors that can occur talking to the Neon API
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Neon API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to decode Neon API response: {0}")]
    Decode(String),
}

impl RemoteError {
    /// HTTP status code, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Interface to the hosted branching service.
///
/// Every call carries the bearer credential and project explicitly; nothing is
/// cached between calls.
#[async_trait]
pub trait BranchApi: Send + Sync {
    /// List all branches of a project
    async fn list_branches(&self, token: &str, project_id: &str)
        -> Result<Vec<Branch>, RemoteError>;

    /// List endpoints of one branch, or of the whole project when `branch_id` is `None`
    async fn list_endpoints(
        &self,
        token: &str,
        project_id: &str,
        branch_id: Option<&str>,
    ) -> Result<Vec<Endpoint>, RemoteError>;

    /// Fetch one connection string; pooled and unpooled need separate calls
    async fn connection_uri(
        &self,
        request: &ConnectionUriRequest<'_>,
        pooled: bool,
    ) -> Result<String, RemoteError>;
}

/// Parameters shared by the pooled and unpooled connection string lookups
#[derive(Debug, Clone, Copy)]
pub struct ConnectionUriRequest<'a> {
    pub token: &'a str,
    pub project_id: &'a str,
    pub branch_id: &'a str,
    pub endpoint_id: Option<&'a str>,
    pub role_name: &'a str,
    pub database_name: &'a str,
}
