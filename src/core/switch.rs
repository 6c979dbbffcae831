//! Branch switching and git-driven sync
//!
//! A [`BranchSession`] bundles the remote API, the bearer token and the loaded
//! config for one invocation. Switching resolves a branch, asks for typed
//! confirmation on protected branches, fetches both connection strings in
//! parallel and then rewrites the env file.

use tracing::{debug, info};

use crate::core::config::Config;
use crate::core::current::match_endpoint;
use crate::core::env_file;
use crate::core::resolver::{requires_confirmation, resolve, sync_target};
use crate::error::Error;
use crate::neon::{Branch, BranchApi, ConnectionUriRequest, ConnectionUris, Endpoint};

/// Result of a switch or sync attempt
#[derive(Debug, Clone)]
pub enum SwitchOutcome {
    /// Both keys were written
    Switched { branch: Branch, uris: ConnectionUris },
    /// The user declined the confirmation; nothing was written
    Cancelled { branch: Branch },
}

impl SwitchOutcome {
    pub fn branch(&self) -> &Branch {
        match self {
            SwitchOutcome::Switched { branch, .. } | SwitchOutcome::Cancelled { branch } => branch,
        }
    }

    pub fn is_switched(&self) -> bool {
        matches!(self, SwitchOutcome::Switched { .. })
    }
}

/// Per-invocation access to the branch API
pub struct BranchSession<'a> {
    api: &'a dyn BranchApi,
    token: &'a str,
    config: &'a Config,
}

impl<'a> BranchSession<'a> {
    pub fn new(api: &'a dyn BranchApi, token: &'a str, config: &'a Config) -> Self {
        Self { api, token, config }
    }

    /// Fetch the live branch list
    pub async fn list_branches(&self) -> Result<Vec<Branch>, Error> {
        Ok(self
            .api
            .list_branches(self.token, &self.config.project_id)
            .await?)
    }

    /// Fetch every endpoint of the project
    pub async fn list_project_endpoints(&self) -> Result<Vec<Endpoint>, Error> {
        Ok(self
            .api
            .list_endpoints(self.token, &self.config.project_id, None)
            .await?)
    }

    /// Fetch pooled and unpooled connection strings for a branch.
    ///
    /// The two lookups run concurrently; either failing fails the whole call.
    pub async fn fetch_connection_uris(&self, branch: &Branch) -> Result<ConnectionUris, Error> {
        let endpoints = self
            .api
            .list_endpoints(self.token, &self.config.project_id, Some(branch.id.as_str()))
            .await?;
        let endpoint = select_endpoint(&endpoints)
            .ok_or_else(|| Error::NoEndpoint(branch.name.clone()))?;
        debug!(branch = %branch.name, endpoint = %endpoint.id, "resolving connection strings");

        let request = ConnectionUriRequest {
            token: self.token,
            project_id: &self.config.project_id,
            branch_id: &branch.id,
            endpoint_id: Some(endpoint.id.as_str()),
            role_name: &self.config.role_name,
            database_name: &self.config.database_name,
        };

        let (pooled, unpooled) = futures::try_join!(
            self.api.connection_uri(&request, true),
            self.api.connection_uri(&request, false)
        )?;

        Ok(ConnectionUris { pooled, unpooled })
    }

    /// Point the env file at `branch`. Nothing is written if a fetch fails.
    pub async fn switch_to(&self, branch: &Branch) -> Result<ConnectionUris, Error> {
        let uris = self.fetch_connection_uris(branch).await?;
        env_file::replace_connection(
            &uris,
            &self.config.env_file_path,
            &self.config.pooled_key,
            &self.config.unpooled_key,
        )?;
        info!(branch = %branch.name, path = %self.config.env_file_path.display(), "env file updated");
        Ok(uris)
    }

    /// Switch after asking `confirm` when the branch is protected
    pub async fn confirm_and_switch<F>(
        &self,
        branch: &Branch,
        confirm: F,
    ) -> Result<SwitchOutcome, Error>
    where
        F: FnOnce(&Branch) -> Result<bool, Error>,
    {
        if requires_confirmation(branch, self.config) && !confirm(branch)? {
            debug!(branch = %branch.name, "switch declined");
            return Ok(SwitchOutcome::Cancelled {
                branch: branch.clone(),
            });
        }

        let uris = self.switch_to(branch).await?;
        Ok(SwitchOutcome::Switched {
            branch: branch.clone(),
            uris,
        })
    }

    /// Switch to the branch named `name`
    pub async fn switch_named<F>(&self, name: &str, confirm: F) -> Result<SwitchOutcome, Error>
    where
        F: FnOnce(&Branch) -> Result<bool, Error>,
    {
        let branches = self.list_branches().await?;
        let branch = resolve(&branches, name)?;
        self.confirm_and_switch(branch, confirm).await
    }

    /// Switch to the branch matching `git_branch`; `main` and `master` map to
    /// the configured default branch.
    pub async fn sync<F>(&self, git_branch: &str, confirm: F) -> Result<SwitchOutcome, Error>
    where
        F: FnOnce(&Branch) -> Result<bool, Error>,
    {
        let target = sync_target(git_branch, &self.config.default_branch);
        debug!(%git_branch, %target, "sync target");
        self.switch_named(target, confirm).await
    }

    /// Best-effort reverse lookup of the branch behind `uri`
    pub async fn branch_for_uri(&self, uri: &str) -> Result<CurrentBranch, Error> {
        let (branches, endpoints) =
            futures::try_join!(self.list_branches(), self.list_project_endpoints())?;

        let Some(endpoint) = match_endpoint(uri, &endpoints) else {
            return Ok(CurrentBranch::Unmatched);
        };
        Ok(match branches.into_iter().find(|b| b.id == endpoint.branch_id) {
            Some(branch) => CurrentBranch::Found(branch),
            None => CurrentBranch::UnknownBranch(endpoint.branch_id.clone()),
        })
    }
}

/// Result of the reverse lookup behind `current`
#[derive(Debug, Clone)]
pub enum CurrentBranch {
    Found(Branch),
    /// No endpoint host matches the connection string
    Unmatched,
    /// An endpoint matched but its branch id is not in the branch list
    UnknownBranch(String),
}

/// Prefer the read-write endpoint, falling back to the first one listed
pub fn select_endpoint(endpoints: &[Endpoint]) -> Option<&Endpoint> {
    endpoints
        .iter()
        .find(|e| e.is_read_write())
        .or_else(|| endpoints.first())
}
