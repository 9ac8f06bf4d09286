//! Fetch trait for reading resources.

use async_trait::async_trait;

use crate::client::TfcClient;
use crate::error::Result;

/// Fetch a resource by ID.
///
/// # Example
///
/// ```ignore
/// use tfcvars::{Fetch, TfcClient, VariableSet};
///
/// let client = TfcClient::from_env()?;
/// let variables = VariableSet::fetch(&client, "ws-abc123".to_string()).await?;
/// ```
#[async_trait]
pub trait Fetch: Sized {
    /// The ID type used to address the resource.
    type Id;

    /// Fetch the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API answers with anything
    /// but `200 OK`, or the body cannot be parsed.
    async fn fetch(client: &TfcClient, id: Self::Id) -> Result<Self>;
}
