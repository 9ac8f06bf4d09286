//! Workspace variable model, variable sets and their trait implementations.

use std::io::Read;
use std::path::Path;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::{Deserialize, Deserializer, Serialize};

use crate::client::TfcClient;
use crate::error::{Result, TfcError};
use crate::models::document::{
    Document, Relationship, RelationshipLinks, ResourceIdentifier, ResourceLinks, VARS_TYPE,
};
use crate::models::value::ValueType;
use crate::traits::Fetch;

/// Where a variable is injected during a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// A Terraform input variable.
    #[default]
    Terraform,
    /// An environment variable.
    Env,
    /// Any other category the API reports, kept verbatim.
    #[serde(untagged)]
    Other(String),
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Terraform => f.write_str("terraform"),
            Self::Env => f.write_str("env"),
            Self::Other(category) => f.write_str(category),
        }
    }
}

/// A Terraform Cloud workspace variable.
///
/// The value is always kept as the string the API stores; how it is typed in
/// a flattened render is decided by [`Variable::declared_type`] (see
/// [`VariableSet::render_flat`]).
///
/// Serializes to and from a JSON:API `vars` resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "VariableResource", into = "VariableResource")]
pub struct Variable {
    /// Variable ID (e.g., "var-EavQ1LztoRTQHSNT"). Empty for unsaved variables.
    pub id: String,

    /// Variable name.
    pub key: String,

    /// Stored value. Sensitive variables come back from the API with an empty value.
    pub value: String,

    /// Terraform or environment variable.
    pub category: Category,

    /// Whether the value is an HCL expression.
    pub hcl: bool,

    /// Whether the value is write-only.
    pub sensitive: bool,

    /// Free-form description.
    pub description: Option<String>,

    /// Creation timestamp exactly as the API reported it.
    pub created_at: Option<String>,

    /// ID of the workspace that owns the variable.
    pub configurable_workspace_id: Option<String>,

    /// API path of the owning workspace.
    pub configurable_link: Option<String>,

    /// API path of the variable itself.
    pub self_link: Option<String>,

    /// Local type tag used when flattening; never sent to the API.
    pub declared_type: Option<ValueType>,
}

impl Variable {
    /// Create an unsaved Terraform variable.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            key: key.into(),
            value: value.into(),
            category: Category::Terraform,
            hcl: false,
            sensitive: false,
            description: None,
            created_at: None,
            configurable_workspace_id: None,
            configurable_link: None,
            self_link: None,
            declared_type: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_hcl(mut self, hcl: bool) -> Self {
        self.hcl = hcl;
        self
    }

    #[must_use]
    pub fn with_sensitive(mut self, sensitive: bool) -> Self {
        self.sensitive = sensitive;
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The creation time, if it is present and a valid RFC 3339 timestamp.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        let raw = self.created_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }

    #[must_use]
    pub fn with_declared_type(mut self, declared_type: ValueType) -> Self {
        self.declared_type = Some(declared_type);
        self
    }
}

/// Wire representation of a `vars` resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VariableResource {
    #[serde(default)]
    id: String,
    #[serde(rename = "type", default = "vars_type")]
    resource_type: String,
    attributes: VariableAttributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    relationships: Option<VariableRelationships>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    links: Option<ResourceLinks>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VariableAttributes {
    key: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    value: String,
    #[serde(default)]
    sensitive: bool,
    #[serde(default)]
    category: Category,
    #[serde(default)]
    hcl: bool,
    #[serde(rename = "created-at", default, skip_serializing_if = "Option::is_none")]
    created_at: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VariableRelationships {
    configurable: Relationship,
}

fn vars_type() -> String {
    VARS_TYPE.to_string()
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> core::result::Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<VariableResource> for Variable {
    fn from(resource: VariableResource) -> Self {
        let configurable = resource.relationships.map(|r| r.configurable);
        Self {
            id: resource.id,
            key: resource.attributes.key,
            value: resource.attributes.value,
            category: resource.attributes.category,
            hcl: resource.attributes.hcl,
            sensitive: resource.attributes.sensitive,
            description: resource.attributes.description,
            created_at: resource.attributes.created_at,
            configurable_workspace_id: configurable.as_ref().map(|c| c.data.id.clone()),
            configurable_link: configurable.and_then(|c| c.links).map(|l| l.related),
            self_link: resource.links.map(|l| l.self_link),
            declared_type: None,
        }
    }
}

impl From<Variable> for VariableResource {
    fn from(variable: Variable) -> Self {
        let relationships = variable.configurable_workspace_id.map(|id| VariableRelationships {
            configurable: Relationship {
                data: ResourceIdentifier::workspace(id),
                links: variable
                    .configurable_link
                    .map(|related| RelationshipLinks { related }),
            },
        });

        Self {
            id: variable.id,
            resource_type: VARS_TYPE.to_string(),
            attributes: VariableAttributes {
                key: variable.key,
                value: variable.value,
                sensitive: variable.sensitive,
                category: variable.category,
                hcl: variable.hcl,
                created_at: variable.created_at,
                description: variable.description,
            },
            relationships,
            links: variable.self_link.map(|self_link| ResourceLinks { self_link }),
        }
    }
}

/// An ordered collection of workspace variables.
///
/// Order is the server (or file) order. Keys are not required to be unique.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableSet {
    variables: Vec<Variable>,
}

impl VariableSet {
    pub fn new(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    /// Parse a JSON:API document (`{"data": [...]}`).
    ///
    /// # Errors
    ///
    /// Returns [`TfcError::InvalidJson`] naming the offending token when the
    /// input is not a valid document.
    pub fn from_json(input: &[u8]) -> Result<Self> {
        let document: Document<Vec<Variable>> =
            serde_json::from_slice(input).map_err(|source| TfcError::InvalidJson {
                token: offending_token(input, &source),
                source,
            })?;
        Ok(Self::new(document.data))
    }

    /// Read and parse a JSON:API document from a file.
    ///
    /// # Errors
    ///
    /// Returns [`TfcError::FileNotFound`] if `path` does not exist, and
    /// [`TfcError::Io`] for any other read failure.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                TfcError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                TfcError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::from_json(&content)
    }

    /// Read and parse a JSON:API document from any reader (e.g. stdin).
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut content = Vec::new();
        reader
            .read_to_end(&mut content)
            .map_err(|source| TfcError::Io {
                path: "<input>".into(),
                source,
            })?;
        Self::from_json(&content)
    }

    /// Serialize back into a JSON:API document.
    pub fn render_document(&self, pretty: bool) -> Result<String> {
        let document = Document::new(&self.variables);
        let rendered = if pretty {
            serde_json::to_string_pretty(&document)?
        } else {
            serde_json::to_string(&document)?
        };
        Ok(rendered)
    }

    /// Tag every variable named `key` with `declared_type`.
    ///
    /// Returns how many variables matched.
    pub fn declare_type(&mut self, key: &str, declared_type: ValueType) -> usize {
        let mut matched = 0;
        for variable in self.variables.iter_mut().filter(|v| v.key == key) {
            variable.declared_type = Some(declared_type);
            matched += 1;
        }
        matched
    }

    pub fn push(&mut self, variable: Variable) {
        self.variables.push(variable);
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// First variable with the given key.
    pub fn get(&self, key: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.key == key)
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Variable> {
        self.variables.iter()
    }
}

impl IntoIterator for VariableSet {
    type Item = Variable;
    type IntoIter = std::vec::IntoIter<Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.into_iter()
    }
}

impl<'a> IntoIterator for &'a VariableSet {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}

impl FromIterator<Variable> for VariableSet {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl Fetch for VariableSet {
    type Id = String; // Workspace ID

    #[tracing::instrument(skip(client))]
    async fn fetch(client: &TfcClient, workspace_id: String) -> Result<Self> {
        let path = TfcClient::workspace_vars_path(&workspace_id);
        let response = client.get(&path, StatusCode::OK).await?;
        let document: Document<Vec<Variable>> = response.json()?;
        tracing::debug!(count = document.data.len(), "fetched variables");
        Ok(Self::new(document.data))
    }
}

/// The token at the position a JSON error was reported, or `end of input`.
fn offending_token(input: &[u8], error: &serde_json::Error) -> String {
    const DELIMITERS: &[char] = &['{', '}', '[', ']', ',', ':', '"'];

    if error.is_eof() {
        return "end of input".to_string();
    }

    let text = String::from_utf8_lossy(input);
    let Some(line) = text.lines().nth(error.line().saturating_sub(1)) else {
        return "end of input".to_string();
    };
    let rest = line.get(error.column().saturating_sub(1)..).unwrap_or("");
    let rest = rest.trim_start();

    let mut chars = rest.chars();
    match chars.next() {
        None => "end of input".to_string(),
        Some(c) if DELIMITERS.contains(&c) => c.to_string(),
        Some(_) => rest
            .split(|c: char| c.is_whitespace() || DELIMITERS.contains(&c))
            .next()
            .unwrap_or(rest)
            .to_string(),
    }
}
