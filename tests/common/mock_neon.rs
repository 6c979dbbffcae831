//! wiremock-based mock helpers for Neon API tests.
//!
//! Provides response builders for the Neon v2 API, allowing fully offline
//! testing of the HTTP client and the CLI.

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const PROJECT_ID: &str = "shiny-wind-028834";
pub const TOKEN: &str = "mock-test-token";

/// Start a wiremock server and a NeonClient pointed at it.
pub async fn setup_neon_mock() -> (MockServer, neonbx::NeonClient) {
    let server = MockServer::start().await;
    let client = neonbx::NeonClient::new(Some(&server.uri()));
    (server, client)
}

/// Branch JSON as returned by `GET /projects/{id}/branches`
pub fn branch_json(id: &str, name: &str, primary: bool, state: &str) -> Value {
    json!({
        "id": id,
        "project_id": PROJECT_ID,
        "name": name,
        "primary": primary,
        "default": primary,
        "protected": false,
        "current_state": state,
        "state_changed_at": "2024-03-01T12:00:00Z",
        "logical_size": 30_474_240,
        "creation_source": "console",
        "created_at": "2024-03-01T12:00:00Z",
        "updated_at": "2024-03-02T08:30:00Z"
    })
}

/// Endpoint JSON as returned by the endpoint listing calls
pub fn endpoint_json(id: &str, branch_id: &str, kind: &str) -> Value {
    json!({
        "id": id,
        "host": format!("{}.us-east-2.aws.neon.tech", id),
        "project_id": PROJECT_ID,
        "branch_id": branch_id,
        "region_id": "aws-us-east-2",
        "type": kind,
        "current_state": "idle",
        "pooler_enabled": false,
        "pooler_mode": "transaction",
        "created_at": "2024-03-01T12:00:00Z"
    })
}

/// Connection string the mocks hand out for an endpoint
pub fn connection_uri(endpoint_id: &str, pooled: bool) -> String {
    let host = if pooled {
        format!("{}-pooler", endpoint_id)
    } else {
        endpoint_id.to_string()
    };
    format!(
        "postgresql://neondb_owner:secret@{}.us-east-2.aws.neon.tech/neondb?sslmode=require",
        host
    )
}

/// Mock `GET /projects/{id}/branches`
pub async fn mock_list_branches(server: &MockServer, branches: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/projects/{}/branches", PROJECT_ID)))
        .and(header("authorization", format!("Bearer {}", TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "branches": branches })))
        .mount(server)
        .await;
}

/// Mock `GET /projects/{id}/branches` failing with `status`
pub async fn mock_list_branches_error(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/projects/{}/branches", PROJECT_ID)))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Mock `GET /projects/{id}/branches/{branch_id}/endpoints`
pub async fn mock_branch_endpoints(server: &MockServer, branch_id: &str, endpoints: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!(
            "/projects/{}/branches/{}/endpoints",
            PROJECT_ID, branch_id
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "endpoints": endpoints })))
        .mount(server)
        .await;
}

/// Mock `GET /projects/{id}/endpoints`
pub async fn mock_project_endpoints(server: &MockServer, endpoints: Vec<Value>) {
    Mock::given(method("GET"))
        .and(path(format!("/projects/{}/endpoints", PROJECT_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "endpoints": endpoints })))
        .mount(server)
        .await;
}

/// Mock both connection string lookups for one endpoint
pub async fn mock_connection_uris(server: &MockServer, branch_id: &str, endpoint_id: &str) {
    for pooled in [true, false] {
        Mock::given(method("GET"))
            .and(path(format!("/projects/{}/connection_uri", PROJECT_ID)))
            .and(query_param("branch_id", branch_id))
            .and(query_param("endpoint_id", endpoint_id))
            .and(query_param("pooled", if pooled { "true" } else { "false" }))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "uri": connection_uri(endpoint_id, pooled) })),
            )
            .mount(server)
            .await;
    }
}
