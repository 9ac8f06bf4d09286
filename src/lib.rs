//! Terraform Cloud workspace variables client library.
//!
//! Translates between three shapes of workspace variable data:
//!
//! - the API's JSON:API documents (`{"data": [...]}`),
//! - a flat key → value object usable as a `.tfvars.json` file,
//! - the single-variable payload the API expects when creating a variable.
//!
//! # Quick Start
//!
//! ```no_run
//! use tfcvars::{Fetch, TfcClient, VariableSet};
//!
//! #[tokio::main]
//! async fn main() -> tfcvars::Result<()> {
//!     // Create client from environment variables
//!     let client = TfcClient::from_env()?;
//!
//!     // Read a workspace's variables
//!     let mut variables = VariableSet::fetch(&client, "ws-abc123".to_string()).await?;
//!     println!("{}", variables.render_document(true)?);
//!
//!     // Flatten them, declaring how plain strings should be typed
//!     variables.declare_type("name", tfcvars::ValueType::String);
//!     println!("{}", variables.render_flat(true)?);
//!
//!     // Copy them into another workspace
//!     let report = variables.publish(&client, "ws-def456").await;
//!     println!("{} failed", report.failures().count());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! [`TfcClient`] owns the address, the token and an injected [`Transport`].
//! Resource operations are traits implemented by model types:
//!
//! - [`Fetch`] - read a resource ([`VariableSet`] by workspace ID)
//! - [`Create`] - create a resource ([`Variable`] in a workspace)
//!
//! # Configuration
//!
//! The client reads configuration from environment variables:
//!
//! - `TF_TOKEN` (required) - API token
//! - `TFE_ADDRESS` (optional) - Base URL (defaults to `https://app.terraform.io`)

pub mod cli;
mod client;
pub mod credentials;
mod error;
mod models;
pub mod output;
mod traits;
pub mod transport;

#[cfg(feature = "test-server")]
pub mod mock_server;

// Re-export core types
pub use client::{TfcClient, CONTENT_TYPE, DEFAULT_ADDRESS};
pub use credentials::TokenResolver;
pub use error::{Result, TfcError};
pub use output::PrettyPrint;
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, StubTransport, Transport};

// Re-export traits
pub use traits::{Create, Fetch};

// Re-export models
pub use models::{
    parse_type_declaration,
    // Variable types
    Category,
    // Payload types
    CreateAttributes,
    CreateData,
    CreatePayload,
    CreateRelationships,
    // JSON:API envelope
    Document,
    // Publish results
    PublishOutcome,
    PublishReport,
    PublishStatus,
    Relationship,
    RelationshipLinks,
    ResourceIdentifier,
    ResourceLinks,
    // Value typing
    ValueType,
    Variable,
    VariableSet,
    SENSITIVE_PLACEHOLDER,
    VARS_TYPE,
    WORKSPACES_TYPE,
};
