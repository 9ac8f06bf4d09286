//! Mock Terraform Cloud API server.
//!
//! Provides an axum-based HTTP server that simulates the variables API.

use std::sync::Arc;

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::fixtures::{DefaultScenario, Fixtures};
use super::handlers;
use super::state::MockState;

/// A mock Terraform Cloud API server for testing.
///
/// The server runs in the background and can be used to test the client
/// against a realistic API implementation.
pub struct MockServer {
    /// The URL where the server is listening.
    url: String,
    /// Handle to the server task.
    handle: JoinHandle<()>,
    /// Shared state that can be modified during tests.
    state: Arc<RwLock<MockState>>,
}

impl MockServer {
    /// Start a new mock server with default fixtures.
    ///
    /// The server listens on a random available port and returns immediately.
    /// Use `url()` to get the server's base URL.
    pub async fn start() -> Self {
        Self::with_state(Self::default_state()).await
    }

    /// Start a mock server with empty state.
    ///
    /// Useful when you want to control exactly what data is available.
    pub async fn start_empty() -> Self {
        Self::with_state(MockState::new()).await
    }

    /// Start a mock server with custom state.
    pub async fn with_state(state: MockState) -> Self {
        let shared_state = state.shared();
        let app = Self::create_router(shared_state.clone());

        // Bind to a random available port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Server error");
        });

        Self {
            url: format!("http://{}", addr),
            handle,
            state: shared_state,
        }
    }

    /// Get the base URL of the mock server.
    ///
    /// Use this URL when creating a `TfcClient` for testing.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get access to the server's shared state.
    ///
    /// This allows modifying the mock data during a test.
    pub fn state(&self) -> Arc<RwLock<MockState>> {
        self.state.clone()
    }

    /// Shutdown the server.
    ///
    /// This aborts the server task. It's safe to call multiple times.
    pub async fn shutdown(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }

    /// Create the default state with common test fixtures.
    fn default_state() -> MockState {
        let scenario = Fixtures::default_scenario();
        Self::state_from_scenario(scenario)
    }

    /// Create state from a scenario.
    fn state_from_scenario(scenario: DefaultScenario) -> MockState {
        scenario
            .workspaces
            .into_iter()
            .fold(MockState::new(), |state, (workspace_id, variables)| {
                state.with_workspace(&workspace_id, variables)
            })
    }

    /// Create the axum router with all routes.
    fn create_router(state: Arc<RwLock<MockState>>) -> Router {
        Router::new()
            // Variable routes
            .route(
                "/api/v2/workspaces/:workspace_id/vars",
                get(handlers::list_variables).post(handlers::create_variable),
            )
            // Health check
            .route("/health", get(health_check))
            .with_state(state)
    }
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_server::fixtures::DEFAULT_WORKSPACE;
    use crate::{Fetch, TfcClient, Variable, VariableSet};

    #[tokio::test]
    async fn test_server_starts_and_responds() {
        let server = MockServer::start().await;

        // Server should be accessible
        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/health", server.url()))
            .send()
            .await
            .expect("Failed to send request");

        assert!(response.status().is_success());
        assert_eq!(response.text().await.unwrap(), "ok");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_fetch_default_workspace() {
        let server = MockServer::start().await;
        let client = TfcClient::new("test-token", server.url()).unwrap();

        let variables = VariableSet::fetch(&client, DEFAULT_WORKSPACE.to_string())
            .await
            .expect("Failed to fetch variables");

        assert_eq!(variables.len(), 4);
        assert_eq!(variables.variables()[0].key, "cidr_subnet");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_empty_server() {
        let server = MockServer::start_empty().await;
        let client = TfcClient::new("test-token", server.url()).unwrap();

        let result = VariableSet::fetch(&client, "ws-nonexistent".to_string()).await;

        assert_eq!(result.unwrap_err().status_code(), Some(404));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_custom_state() {
        let state = MockState::new().with_workspace(
            "ws-custom",
            vec![Fixtures::stored_variable("ws-custom", "var-1", "region", "\"eu-west-1\"")],
        );

        let server = MockServer::with_state(state).await;
        let client = TfcClient::new("test-token", server.url()).unwrap();

        let variables = VariableSet::fetch(&client, "ws-custom".to_string())
            .await
            .expect("Failed to fetch variables");

        assert_eq!(variables.get("region").unwrap().value, "\"eu-west-1\"");

        server.shutdown().await;
    }

    #[tokio::test]
    async fn test_state_is_visible_to_tests() {
        let server = MockServer::start_empty().await;
        server
            .state()
            .write()
            .await
            .workspaces
            .insert("ws-late".to_string(), vec![Variable::new("count", "1")]);

        let client = TfcClient::new("test-token", server.url()).unwrap();
        let variables = VariableSet::fetch(&client, "ws-late".to_string()).await.unwrap();
        assert_eq!(variables.len(), 1);

        server.shutdown().await;
    }
}
