//! Test data fixtures for the mock server.
//!
//! Provides factory functions for creating realistic test data.

use crate::{Category, Variable};

/// Workspace populated by the default scenario.
pub const DEFAULT_WORKSPACE: &str = "ws-test";

/// Empty workspace present in the default scenario.
pub const EMPTY_WORKSPACE: &str = "ws-empty";

/// Collection of fixture factories for test data.
pub struct Fixtures;

impl Fixtures {
    // =========================================================================
    // Variable Fixtures
    // =========================================================================

    /// Create a stored Terraform variable as the API would return it.
    pub fn stored_variable(workspace_id: &str, id: &str, key: &str, value: &str) -> Variable {
        let mut variable = Variable::new(key, value);
        variable.id = id.to_string();
        variable.created_at = Some("2021-04-14T15:08:53.569Z".to_string());
        variable.configurable_workspace_id = Some(workspace_id.to_string());
        variable.configurable_link = Some(format!("/api/v2/workspaces/{workspace_id}"));
        variable.self_link = Some(format!("/api/v2/workspaces/{workspace_id}/vars/{id}"));
        variable
    }

    /// Create a stored HCL list variable.
    pub fn hcl_list_variable(workspace_id: &str, id: &str, key: &str, items: &[&str]) -> Variable {
        let value = serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string());
        Self::stored_variable(workspace_id, id, key, &value).with_hcl(true)
    }

    /// Create a stored sensitive environment variable. The API never returns
    /// the value of a sensitive variable.
    pub fn sensitive_env_variable(workspace_id: &str, id: &str, key: &str) -> Variable {
        Self::stored_variable(workspace_id, id, key, "")
            .with_category(Category::Env)
            .with_sensitive(true)
    }

    // =========================================================================
    // Scenario Builders
    // =========================================================================

    /// Create a default set of test data for common scenarios.
    pub fn default_scenario() -> DefaultScenario {
        DefaultScenario::new()
    }
}

/// A complete test scenario: workspaces and their variables.
pub struct DefaultScenario {
    pub workspaces: Vec<(String, Vec<Variable>)>,
}

impl DefaultScenario {
    fn new() -> Self {
        let ws = DEFAULT_WORKSPACE;

        let variables = vec![
            Fixtures::hcl_list_variable(ws, "var-cidr", "cidr_subnet", &["10.0.5.0/24"]),
            Fixtures::stored_variable(ws, "var-count", "count", "10"),
            Fixtures::stored_variable(ws, "var-name", "name", "\"api\""),
            Fixtures::sensitive_env_variable(ws, "var-secret", "AWS_SECRET_ACCESS_KEY"),
        ];

        Self {
            workspaces: vec![
                (ws.to_string(), variables),
                (EMPTY_WORKSPACE.to_string(), vec![]),
            ],
        }
    }
}
