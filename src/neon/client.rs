//! Neon HTTP API adapter

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::traits::{BranchApi, ConnectionUriRequest, RemoteError};
use super::types::*;

/// Default base URL of the Neon v2 API
pub const DEFAULT_API_URL: &str = "https://console.neon.tech/api/v2";

/// Neon API adapter
pub struct NeonClient {
    base_url: String,
    http_client: Client,
}

impl NeonClient {
    /// Create a new client, optionally against a non-default base URL
    pub fn new(base_url: Option<&str>) -> Self {
        Self {
            base_url: base_url
                .unwrap_or(DEFAULT_API_URL)
                .trim_end_matches('/')
                .to_string(),
            http_client: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Make an authenticated GET request under `/projects/{project_id}`
    async fn api_get<T: DeserializeOwned>(
        &self,
        token: &str,
        project_id: &str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, RemoteError> {
        let url = format!(
            "{}/projects/{}{}",
            self.base_url,
            urlencoding::encode(project_id),
            path
        );
        debug!(%url, "neon api request");

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| RemoteError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "neon api error response");
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }
}

#[async_trait]
impl BranchApi for NeonClient {
    async fn list_branches(
        &self,
        token: &str,
        project_id: &str,
    ) -> Result<Vec<Branch>, RemoteError> {
        let data: BranchesResponse = self.api_get(token, project_id, "/branches", &[]).await?;
        debug!(count = data.branches.len(), "branches fetched");
        Ok(data.branches)
    }

    async fn list_endpoints(
        &self,
        token: &str,
        project_id: &str,
        branch_id: Option<&str>,
    ) -> Result<Vec<Endpoint>, RemoteError> {
        let path = match branch_id {
            Some(id) => format!("/branches/{}/endpoints", urlencoding::encode(id)),
            None => "/endpoints".to_string(),
        };
        let data: EndpointsResponse = self.api_get(token, project_id, &path, &[]).await?;
        Ok(data.endpoints)
    }

    async fn connection_uri(
        &self,
        request: &ConnectionUriRequest<'_>,
        pooled: bool,
    ) -> Result<String, RemoteError> {
        let mut query = vec![
            ("branch_id", request.branch_id),
            ("role_name", request.role_name),
            ("database_name", request.database_name),
            ("pooled", if pooled { "true" } else { "false" }),
        ];
        if let Some(endpoint_id) = request.endpoint_id {
            query.push(("endpoint_id", endpoint_id));
        }

        let data: ConnectionUriResponse = self
            .api_get(request.token, request.project_id, "/connection_uri", &query)
            .await?;
        Ok(data.uri)
    }
}
