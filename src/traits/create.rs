//! Create trait for adding resources.

use async_trait::async_trait;

use crate::client::TfcClient;
use crate::error::Result;

/// Create a resource server-side.
///
/// # Example
///
/// ```ignore
/// use tfcvars::{Create, TfcClient, Variable};
///
/// let client = TfcClient::from_env()?;
/// let created = Variable::new("region", "\"eu-west-1\"")
///     .create(&client, "ws-abc123".to_string())
///     .await?;
/// println!("created {}", created.id);
/// ```
#[async_trait]
pub trait Create: Sized + Sync {
    /// The parent the resource is created under.
    type Scope: Send;

    /// Create the resource and return the server's copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API answers with anything
    /// but `201 Created`.
    async fn create(&self, client: &TfcClient, scope: Self::Scope) -> Result<Self>;
}
