//! JSON:API envelope types shared by variable resources and payloads.

use serde::{Deserialize, Serialize};

/// Resource type of a workspace variable.
pub const VARS_TYPE: &str = "vars";

/// Resource type of a workspace.
pub const WORKSPACES_TYPE: &str = "workspaces";

/// A JSON:API top-level document: `{"data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document<T> {
    pub data: T,
}

impl<T> Document<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A JSON:API resource identifier: `{"id": ..., "type": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    pub id: String,
    #[serde(rename = "type")]
    pub resource_type: String,
}

impl ResourceIdentifier {
    /// Identifier of a workspace.
    pub fn workspace(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            resource_type: WORKSPACES_TYPE.to_string(),
        }
    }
}

/// A to-one relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub data: ResourceIdentifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<RelationshipLinks>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipLinks {
    pub related: String,
}

/// Resource-level links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLinks {
    #[serde(rename = "self")]
    pub self_link: String,
}
