//! Mock Terraform Cloud API server for E2E testing.
//!
//! This module provides an in-memory mock server that simulates the
//! workspace variables endpoints. Unlike wiremock which mocks at the HTTP
//! level per-test, this server maintains state across requests, so a
//! variable created by one request shows up in the next listing.
//!
//! # Example
//!
//! ```ignore
//! use tfcvars::mock_server::MockServer;
//! use tfcvars::{Fetch, TfcClient, VariableSet};
//!
//! #[tokio::test]
//! async fn test_workflow() {
//!     let server = MockServer::start().await;
//!     let client = TfcClient::new("test-token", server.url()).unwrap();
//!
//!     // Server comes with default fixtures
//!     let vars = VariableSet::fetch(&client, "ws-test".to_string()).await.unwrap();
//!     assert_eq!(vars.len(), 4);
//!
//!     server.shutdown().await;
//! }
//! ```

mod fixtures;
mod handlers;
mod server;
mod state;

pub use fixtures::{DefaultScenario, Fixtures, DEFAULT_WORKSPACE, EMPTY_WORKSPACE};
pub use server::MockServer;
pub use state::{CreateRejection, MockState};
