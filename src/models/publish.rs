//! Creating variables in a workspace and reporting per-item outcomes.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;

use crate::client::TfcClient;
use crate::error::Result;
use crate::models::document::Document;
use crate::models::payload::CreatePayload;
use crate::models::variable::{Variable, VariableSet};
use crate::traits::Create;

#[async_trait]
impl Create for Variable {
    type Scope = String; // Workspace ID

    #[tracing::instrument(skip(self, client))]
    async fn create(&self, client: &TfcClient, workspace_id: String) -> Result<Self> {
        let payload = CreatePayload::for_variable(self, &workspace_id);
        let path = TfcClient::workspace_vars_path(&workspace_id);

        let response = client.post(&path, &payload, StatusCode::CREATED).await?;

        // The variable exists once the API says 201; an unreadable body
        // only costs us the server-assigned fields.
        match response.json::<Document<Variable>>() {
            Ok(document) => Ok(document.data),
            Err(e) => {
                tracing::warn!(error = %e, "created variable but could not parse response body");
                let mut local = self.clone();
                local.configurable_workspace_id = Some(workspace_id);
                Ok(local)
            }
        }
    }
}

/// Whether a single variable was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Created,
    Failed,
}

/// Outcome of publishing one variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishOutcome {
    pub key: String,
    pub status: PublishStatus,
    /// `"created"` on success, otherwise the error message.
    pub message: String,
    /// Server-assigned ID of the created variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// HTTP status of a rejected request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl PublishOutcome {
    pub fn is_created(&self) -> bool {
        self.status == PublishStatus::Created
    }
}

/// Per-variable outcomes of [`VariableSet::publish`], in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    pub outcomes: Vec<PublishOutcome>,
}

impl PublishReport {
    pub fn created(&self) -> impl Iterator<Item = &PublishOutcome> {
        self.outcomes.iter().filter(|o| o.is_created())
    }

    pub fn failures(&self) -> impl Iterator<Item = &PublishOutcome> {
        self.outcomes.iter().filter(|o| !o.is_created())
    }

    /// True when every variable was created (vacuously true when empty).
    pub fn all_created(&self) -> bool {
        self.outcomes.iter().all(PublishOutcome::is_created)
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

impl VariableSet {
    /// Create every variable in `workspace_id`, one request at a time.
    ///
    /// A rejected or failed request is logged and recorded; it never stops
    /// the remaining variables. Nothing is rolled back.
    #[tracing::instrument(skip(self, client), fields(count = self.len()))]
    pub async fn publish(&self, client: &TfcClient, workspace_id: &str) -> PublishReport {
        let mut report = PublishReport::default();

        for variable in self {
            let outcome = match variable.create(client, workspace_id.to_string()).await {
                Ok(created) => {
                    tracing::info!(key = %variable.key, id = %created.id, "created");
                    PublishOutcome {
                        key: variable.key.clone(),
                        status: PublishStatus::Created,
                        message: "created".to_string(),
                        id: Some(created.id).filter(|id| !id.is_empty()),
                        status_code: None,
                    }
                }
                Err(e) => {
                    tracing::warn!(key = %variable.key, error = %e, "failed to create variable");
                    PublishOutcome {
                        key: variable.key.clone(),
                        status: PublishStatus::Failed,
                        message: e.to_string(),
                        id: None,
                        status_code: e.status_code(),
                    }
                }
            };
            report.outcomes.push(outcome);
        }

        report
    }
}
