//! Mock server state management.
//!
//! Provides the in-memory data store for the mock Terraform Cloud server.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{CreatePayload, Variable};

/// Why a create request was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateRejection {
    /// The workspace does not exist.
    WorkspaceNotFound,
    /// A variable with the same key and category already exists.
    KeyTaken,
}

/// Shared state for the mock server.
///
/// This struct holds all the mock data that the server will serve.
/// It's wrapped in `Arc<RwLock<_>>` for concurrent access.
#[derive(Debug, Default)]
pub struct MockState {
    /// Variables indexed by workspace ID, in creation order.
    pub workspaces: HashMap<String, Vec<Variable>>,

    /// Optional authentication token. If set, requests must include this token.
    pub required_token: Option<String>,

    /// Counter used to assign variable IDs.
    next_id: u64,
}

impl MockState {
    /// Create a new empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create state wrapped in Arc<RwLock> for sharing.
    pub fn shared(self) -> Arc<RwLock<Self>> {
        Arc::new(RwLock::new(self))
    }

    /// Add a workspace with the given variables.
    pub fn with_workspace(mut self, workspace_id: &str, variables: Vec<Variable>) -> Self {
        self.workspaces.insert(workspace_id.to_string(), variables);
        self
    }

    /// Set the required authentication token.
    pub fn with_required_token(mut self, token: &str) -> Self {
        self.required_token = Some(token.to_string());
        self
    }

    /// List the variables of a workspace.
    pub fn list_variables(&self, workspace_id: &str) -> Option<&Vec<Variable>> {
        self.workspaces.get(workspace_id)
    }

    /// Create a variable from a request payload.
    ///
    /// Mirrors the API: the workspace must exist and the key must be unique
    /// within its category. Returns the stored variable; see [`Self::api_view`]
    /// for what goes back over the wire.
    pub fn create_variable(
        &mut self,
        workspace_id: &str,
        payload: CreatePayload,
    ) -> Result<Variable, CreateRejection> {
        let variables = self
            .workspaces
            .get_mut(workspace_id)
            .ok_or(CreateRejection::WorkspaceNotFound)?;

        let attributes = payload.data.attributes;
        if variables
            .iter()
            .any(|v| v.key == attributes.key && v.category == attributes.category)
        {
            return Err(CreateRejection::KeyTaken);
        }

        self.next_id += 1;
        let id = format!("var-mock{:08}", self.next_id);

        let mut variable = Variable::new(attributes.key, attributes.value)
            .with_category(attributes.category)
            .with_hcl(attributes.hcl)
            .with_sensitive(attributes.sensitive);
        variable.description = attributes.description;
        variable.id = id.clone();
        variable.created_at = Some(
            chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        );
        variable.configurable_workspace_id = Some(workspace_id.to_string());
        variable.configurable_link = Some(format!("/api/v2/workspaces/{workspace_id}"));
        variable.self_link = Some(format!("/api/v2/workspaces/{workspace_id}/vars/{id}"));

        variables.push(variable.clone());
        Ok(variable)
    }

    /// The resource the API returns for a stored variable. Sensitive values
    /// are sent as `null`.
    pub fn api_view(variable: &Variable) -> serde_json::Result<serde_json::Value> {
        let mut resource = serde_json::to_value(variable)?;
        if variable.sensitive {
            resource["attributes"]["value"] = serde_json::Value::Null;
        }
        Ok(resource)
    }
}
