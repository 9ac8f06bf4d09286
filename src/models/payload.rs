//! Create-variable request payload.

use serde::{Deserialize, Serialize};

use crate::models::document::{Document, Relationship, ResourceIdentifier, VARS_TYPE};
use crate::models::variable::{Category, Variable};

/// Body of `POST /workspaces/{id}/vars`: a single variable plus the workspace
/// it belongs to. Carries no `id`, `created-at` or links.
pub type CreatePayload = Document<CreateData>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateData {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub attributes: CreateAttributes,
    pub relationships: CreateRelationships,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAttributes {
    pub key: String,
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub hcl: bool,
    #[serde(default)]
    pub sensitive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRelationships {
    pub workspace: Relationship,
}

impl CreatePayload {
    /// Project `variable` onto a create request targeting `workspace_id`.
    pub fn for_variable(variable: &Variable, workspace_id: &str) -> Self {
        Document::new(CreateData {
            resource_type: VARS_TYPE.to_string(),
            attributes: CreateAttributes {
                key: variable.key.clone(),
                value: variable.value.clone(),
                description: variable.description.clone(),
                category: variable.category.clone(),
                hcl: variable.hcl,
                sensitive: variable.sensitive,
            },
            relationships: CreateRelationships {
                workspace: Relationship {
                    data: ResourceIdentifier::workspace(workspace_id),
                    links: None,
                },
            },
        })
    }
}
