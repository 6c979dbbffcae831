//! Neon API resource types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Lifecycle state of a branch as reported by `current_state`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchState {
    Provisioning,
    Ready,
    Other(String),
}

impl BranchState {
    pub fn as_str(&self) -> &str {
        match self {
            BranchState::Provisioning => "init",
            BranchState::Ready => "ready",
            BranchState::Other(s) => s,
        }
    }
}

impl From<&str> for BranchState {
    fn from(s: &str) -> Self {
        match s {
            "ready" => BranchState::Ready,
            "init" | "provisioning" => BranchState::Provisioning,
            other => BranchState::Other(other.to_string()),
        }
    }
}

impl Serialize for BranchState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BranchState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(BranchState::from(s.as_str()))
    }
}

/// A Neon branch snapshot, fetched fresh per command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub project_id: String,
    #[serde(default)]
    pub primary: bool,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "current_state")]
    pub state: BranchState,
}

impl Branch {
    pub fn is_ready(&self) -> bool {
        self.state == BranchState::Ready
    }
}

/// A compute endpoint attached to a branch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: String,
    pub host: String,
    pub branch_id: String,
    /// `read_write` or `read_only`
    #[serde(rename = "type", default)]
    pub endpoint_type: String,
    #[serde(default)]
    pub pooler_enabled: bool,
}

impl Endpoint {
    pub fn is_read_write(&self) -> bool {
        self.endpoint_type == "read_write"
    }

    /// First DNS label of the host, e.g. `ep-cool-darkness-123456`
    pub fn host_label(&self) -> &str {
        self.host.split('.').next().unwrap_or(&self.host)
    }
}

/// Pooled and unpooled connection strings for one branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionUris {
    pub pooled: String,
    pub unpooled: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BranchesResponse {
    pub branches: Vec<Branch>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EndpointsResponse {
    pub endpoints: Vec<Endpoint>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConnectionUriResponse {
    pub uri: String,
}
