//! In-memory fixtures for branch switching tests.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use neonbx::core::config::StoredConfig;
use neonbx::neon::{
    Branch, BranchApi, BranchState, ConnectionUriRequest, Endpoint, RemoteError,
};
use neonbx::Config;

/// Build a ready branch
pub fn branch(id: &str, name: &str, primary: bool) -> Branch {
    Branch {
        id: id.to_string(),
        name: name.to_string(),
        project_id: "proj-test".to_string(),
        primary,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        state: BranchState::Ready,
    }
}

/// Build a read-write endpoint for `branch_id`
pub fn endpoint(id: &str, branch_id: &str) -> Endpoint {
    Endpoint {
        id: id.to_string(),
        host: format!("{}.us-east-2.aws.neon.tech", id),
        branch_id: branch_id.to_string(),
        endpoint_type: "read_write".to_string(),
        pooler_enabled: false,
    }
}

/// Connection string the fake API hands out
pub fn fake_uri(endpoint_id: &str, pooled: bool) -> String {
    let host = if pooled {
        format!("{}-pooler", endpoint_id)
    } else {
        endpoint_id.to_string()
    };
    format!("postgresql://neondb_owner:pw@{}.us-east-2.aws.neon.tech/neondb", host)
}

/// Config pointing at `env_file`
pub fn config_for(env_file: &Path) -> Config {
    let stored = StoredConfig {
        project_id: Some("proj-test".to_string()),
        env_file_path: Some(env_file.display().to_string()),
        ..StoredConfig::default()
    };
    stored.require().unwrap()
}

/// A recorded call against [`FakeBranchApi`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListBranches,
    ListEndpoints(Option<String>),
    ConnectionUri { branch_id: String, pooled: bool },
}

/// In-memory [`BranchApi`] with scripted failures
#[derive(Default)]
pub struct FakeBranchApi {
    pub branches: Vec<Branch>,
    pub endpoints: Vec<Endpoint>,
    /// Fail the pooled (`Some(true)`) or unpooled (`Some(false)`) lookup
    pub fail_connection_uri: Option<bool>,
    pub calls: Mutex<Vec<Call>>,
}

impl FakeBranchApi {
    pub fn new(branches: Vec<Branch>, endpoints: Vec<Endpoint>) -> Self {
        Self {
            branches,
            endpoints,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl BranchApi for FakeBranchApi {
    async fn list_branches(
        &self,
        _token: &str,
        _project_id: &str,
    ) -> Result<Vec<Branch>, RemoteError> {
        self.record(Call::ListBranches);
        Ok(self.branches.clone())
    }

    async fn list_endpoints(
        &self,
        _token: &str,
        _project_id: &str,
        branch_id: Option<&str>,
    ) -> Result<Vec<Endpoint>, RemoteError> {
        self.record(Call::ListEndpoints(branch_id.map(str::to_string)));
        Ok(self
            .endpoints
            .iter()
            .filter(|e| branch_id.map_or(true, |id| e.branch_id == id))
            .cloned()
            .collect())
    }

    async fn connection_uri(
        &self,
        request: &ConnectionUriRequest<'_>,
        pooled: bool,
    ) -> Result<String, RemoteError> {
        self.record(Call::ConnectionUri {
            branch_id: request.branch_id.to_string(),
            pooled,
        });
        if self.fail_connection_uri == Some(pooled) {
            return Err(RemoteError::Status {
                status: 500,
                body: "internal error".to_string(),
            });
        }
        let endpoint_id = request.endpoint_id.unwrap_or("ep-unknown");
        Ok(fake_uri(endpoint_id, pooled))
    }
}
