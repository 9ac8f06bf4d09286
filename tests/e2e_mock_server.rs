//! E2E tests using the mock Terraform Cloud server.
//!
//! These tests exercise full workflows against the mock server,
//! testing realistic scenarios rather than individual endpoints.

#![cfg(feature = "test-server")]

use tfcvars::mock_server::{Fixtures, MockServer, MockState, DEFAULT_WORKSPACE, EMPTY_WORKSPACE};
use tfcvars::{Create, Fetch, PublishStatus, TfcClient, ValueType, Variable, VariableSet};

// =============================================================================
// Server Lifecycle Tests
// =============================================================================

#[tokio::test]
async fn test_server_starts_on_random_port() {
    let server1 = MockServer::start().await;
    let server2 = MockServer::start().await;

    // Both servers should have different URLs
    assert_ne!(server1.url(), server2.url());

    server1.shutdown().await;
    server2.shutdown().await;
}

#[tokio::test]
async fn test_server_shutdown_is_clean() {
    let server = MockServer::start().await;
    let url = server.url().to_string();

    server.shutdown().await;

    // After shutdown, server should not respond
    let client = reqwest::Client::new();
    let result = client.get(format!("{}/health", url)).send().await;

    assert!(result.is_err());
}

// =============================================================================
// Read Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_fetch_and_flatten_workflow() {
    let server = MockServer::start().await;
    let client = TfcClient::new("test-token", server.url()).unwrap();

    let variables = VariableSet::fetch(&client, DEFAULT_WORKSPACE.to_string())
        .await
        .expect("Failed to fetch variables");

    let flat: serde_json::Value =
        serde_json::from_str(&variables.render_flat(false).unwrap()).unwrap();

    assert_eq!(flat["cidr_subnet"], serde_json::json!(["10.0.5.0/24"]));
    assert_eq!(flat["count"], 10);
    assert_eq!(flat["name"], "api");
    assert_eq!(flat["AWS_SECRET_ACCESS_KEY"], "sensitive");

    server.shutdown().await;
}

#[tokio::test]
async fn test_fetch_unknown_workspace() {
    let server = MockServer::start().await;
    let client = TfcClient::new("test-token", server.url()).unwrap();

    let result = VariableSet::fetch(&client, "ws-nonexistent".to_string()).await;

    let err = result.unwrap_err();
    assert_eq!(err.status_code(), Some(404));
    assert!(err.to_string().contains("not found"));

    server.shutdown().await;
}

#[tokio::test]
async fn test_required_token_is_enforced() {
    let state = MockState::new()
        .with_workspace("ws-1", vec![])
        .with_required_token("right-token");
    let server = MockServer::with_state(state).await;

    let wrong = TfcClient::new("wrong-token", server.url()).unwrap();
    let err = VariableSet::fetch(&wrong, "ws-1".to_string()).await.unwrap_err();
    assert_eq!(err.status_code(), Some(401));

    let right = TfcClient::new("right-token", server.url()).unwrap();
    assert!(VariableSet::fetch(&right, "ws-1".to_string()).await.is_ok());

    server.shutdown().await;
}

// =============================================================================
// Copy Workflow Tests
// =============================================================================

#[tokio::test]
async fn test_copy_workspace_workflow() {
    let server = MockServer::start().await;
    let client = TfcClient::new("test-token", server.url()).unwrap();

    // Step 1: Read the source workspace
    let source = VariableSet::fetch(&client, DEFAULT_WORKSPACE.to_string())
        .await
        .expect("Failed to fetch source");

    // Step 2: Save it as a document and load it back, as `read | load` does
    let document = source.render_document(true).unwrap();
    let loaded = VariableSet::from_json(document.as_bytes()).unwrap();

    // Step 3: Publish into the empty workspace
    let report = loaded.publish(&client, EMPTY_WORKSPACE).await;
    assert!(report.all_created(), "{report:?}");
    assert_eq!(report.len(), 4);

    // Step 4: The target now holds the same keys, in order
    let target = VariableSet::fetch(&client, EMPTY_WORKSPACE.to_string())
        .await
        .expect("Failed to fetch target");

    let source_keys: Vec<_> = source.iter().map(|v| v.key.as_str()).collect();
    let target_keys: Vec<_> = target.iter().map(|v| v.key.as_str()).collect();
    assert_eq!(source_keys, target_keys);
    assert!(target
        .iter()
        .all(|v| v.configurable_workspace_id.as_deref() == Some(EMPTY_WORKSPACE)));

    server.shutdown().await;
}

#[tokio::test]
async fn test_publish_twice_reports_duplicates() {
    let server = MockServer::start().await;
    let client = TfcClient::new("test-token", server.url()).unwrap();

    let variables = VariableSet::new(vec![
        Variable::new("count", "10"),
        Variable::new("region", "\"eu-west-1\""),
    ]);

    let first = variables.publish(&client, EMPTY_WORKSPACE).await;
    assert!(first.all_created());

    // Second run: every key is taken, but each item is still attempted
    let second = variables.publish(&client, EMPTY_WORKSPACE).await;
    assert_eq!(second.len(), 2);
    assert!(second
        .outcomes
        .iter()
        .all(|o| o.status == PublishStatus::Failed && o.status_code == Some(422)));

    server.shutdown().await;
}

#[tokio::test]
async fn test_publish_mixed_outcomes() {
    let state = MockState::new().with_workspace(
        "ws-1",
        vec![Fixtures::stored_variable("ws-1", "var-1", "count", "10")],
    );
    let server = MockServer::with_state(state).await;
    let client = TfcClient::new("test-token", server.url()).unwrap();

    let variables = VariableSet::new(vec![
        Variable::new("region", "\"eu-west-1\""),
        Variable::new("count", "20"),
        Variable::new("zones", r#"["a","b"]"#).with_hcl(true),
    ]);

    let report = variables.publish(&client, "ws-1").await;

    let created: Vec<_> = report.created().map(|o| o.key.as_str()).collect();
    let failed: Vec<_> = report.failures().map(|o| o.key.as_str()).collect();
    assert_eq!(created, vec!["region", "zones"]);
    assert_eq!(failed, vec!["count"]);

    let stored = server.state().read().await.list_variables("ws-1").unwrap().len();
    assert_eq!(stored, 3);

    server.shutdown().await;
}

#[tokio::test]
async fn test_create_sensitive_variable_hides_value() {
    let server = MockServer::start().await;
    let client = TfcClient::new("test-token", server.url()).unwrap();

    let created = Variable::new("password", "hunter2")
        .with_sensitive(true)
        .create(&client, EMPTY_WORKSPACE.to_string())
        .await
        .expect("Failed to create variable");

    assert!(created.id.starts_with("var-"));
    assert_eq!(created.value, "");

    let mut fetched = VariableSet::fetch(&client, EMPTY_WORKSPACE.to_string())
        .await
        .unwrap();
    assert_eq!(fetched.variables()[0].value, "");
    fetched.declare_type("password", ValueType::String);
    assert_eq!(fetched.render_flat(false).unwrap(), r#"{"password":"sensitive"}"#);

    // On the wire the value is null, as the real API sends it
    let raw: serde_json::Value = reqwest::Client::new()
        .get(format!("{}/api/v2/workspaces/{}/vars", server.url(), EMPTY_WORKSPACE))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(raw["data"][0]["attributes"]["value"].is_null());

    server.shutdown().await;
}
