//! Terraform Cloud API client.
//!
//! Low-level client that handles authentication and raw requests.
//! Variable-level operations are implemented via traits on model types.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::Serialize;
use url::Url;

use crate::error::{Result, TfcError};
use crate::transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};

/// Default Terraform Cloud address.
pub const DEFAULT_ADDRESS: &str = "https://app.terraform.io";

/// Media type required by the JSON:API endpoints.
pub const CONTENT_TYPE: &str = "application/vnd.api+json";

/// Low-level Terraform Cloud API client.
///
/// Holds the base address, the bearer token and the [`Transport`] used to
/// send requests. Variable operations are implemented via the
/// [`Fetch`](crate::Fetch) and [`Create`](crate::Create) traits.
///
/// This struct is cheaply cloneable; clones share the same transport.
///
/// # Example
///
/// ```no_run
/// use tfcvars::TfcClient;
///
/// # fn example() -> tfcvars::Result<()> {
/// // Create from environment variables
/// let client = TfcClient::from_env()?;
///
/// // Or configure manually
/// let client = TfcClient::new("your-token", "https://app.terraform.io")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct TfcClient {
    transport: Arc<dyn Transport>,
    base_url: Arc<Url>,
    token: String,
}

impl std::fmt::Debug for TfcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TfcClient")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl TfcClient {
    /// Create a client from environment variables.
    ///
    /// Uses `TF_TOKEN` for authentication and optionally `TFE_ADDRESS`
    /// for the base URL (defaults to `https://app.terraform.io`).
    ///
    /// # Errors
    ///
    /// Returns an error if `TF_TOKEN` is not set.
    pub fn from_env() -> Result<Self> {
        let token = env::var("TF_TOKEN").map_err(|_| {
            TfcError::ConfigMissing("TF_TOKEN environment variable not set".to_string())
        })?;

        let base_url = env::var("TFE_ADDRESS").unwrap_or_else(|_| DEFAULT_ADDRESS.to_string());

        Self::new(&token, &base_url)
    }

    /// Create a client with the default `reqwest` transport and no timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(token: &str, base_url: &str) -> Result<Self> {
        Self::with_transport(token, base_url, Arc::new(ReqwestTransport::new()?))
    }

    /// Create a client whose requests are bounded by `timeout`.
    pub fn with_timeout(token: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let transport = ReqwestTransport::with_timeout(Some(timeout))?;
        Self::with_transport(token, base_url, Arc::new(transport))
    }

    /// Create a client that sends requests through `transport`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_transport(
        token: &str,
        base_url: &str,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };

        let base_url = Url::parse(&base_url_str)?;

        Ok(Self {
            transport,
            base_url: Arc::new(base_url),
            token: token.to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Host name of the base URL, used to pick credentials.
    pub fn host(&self) -> Option<&str> {
        self.base_url.host_str()
    }

    /// Path of a workspace's variables collection, relative to the base URL.
    pub fn workspace_vars_path(workspace_id: &str) -> String {
        format!(
            "api/v2/workspaces/{}/vars",
            urlencoding::encode(workspace_id)
        )
    }

    /// Make a GET request, requiring `expected` as the response status.
    #[tracing::instrument(skip(self))]
    pub async fn get(&self, path: &str, expected: StatusCode) -> Result<ApiResponse> {
        let request = self.request(Method::GET, path, None)?;
        let response = self.transport.send(request).await?;
        Self::check_response(response, expected)
    }

    /// Make a POST request with a JSON:API body, requiring `expected` as the
    /// response status.
    #[tracing::instrument(skip(self, body))]
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        expected: StatusCode,
    ) -> Result<ApiResponse> {
        let body = serde_json::to_vec(body)?;
        let request = self.request(Method::POST, path, Some(body))?;
        let response = self.transport.send(request).await?;
        Self::check_response(response, expected)
    }

    fn request(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<ApiRequest> {
        let url = self.base_url.join(path)?;
        Ok(ApiRequest {
            method,
            url,
            headers: vec![
                ("Authorization".to_string(), format!("Bearer {}", self.token)),
                ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
            ],
            body,
        })
    }

    /// Check response status and convert errors.
    fn check_response(response: ApiResponse, expected: StatusCode) -> Result<ApiResponse> {
        if response.status == expected {
            return Ok(response);
        }

        Err(TfcError::UnexpectedStatus {
            status: response.status.as_u16(),
            message: Self::extract_error_message(&response.body),
        })
    }

    /// Extract a message from a JSON:API `errors` array, if present.
    fn extract_error_message(body: &[u8]) -> String {
        let Ok(json) = serde_json::from_slice::<serde_json::Value>(body) else {
            return String::new();
        };

        let Some(first) = json
            .get("errors")
            .and_then(|e| e.as_array())
            .and_then(|errors| errors.first())
        else {
            return String::new();
        };

        let title = first.get("title").and_then(|t| t.as_str());
        let detail = first.get("detail").and_then(|d| d.as_str());
        match (title, detail) {
            (Some(title), Some(detail)) => format!("{title} ({detail})"),
            (Some(msg), None) | (None, Some(msg)) => msg.to_string(),
            (None, None) => String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::StubTransport;

    #[test]
    fn test_client_debug() {
        let client = TfcClient::new("test-token", DEFAULT_ADDRESS).unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("TfcClient"));
        assert!(debug.contains("base_url"));
        // Token should not be in debug output
        assert!(!debug.contains("test-token"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client1 = TfcClient::new("token", "https://tfe.example.com").unwrap();
        let client2 = TfcClient::new("token", "https://tfe.example.com/").unwrap();
        assert_eq!(client1.base_url().as_str(), client2.base_url().as_str());
        assert_eq!(client1.host(), Some("tfe.example.com"));
    }

    #[test]
    fn test_workspace_path_is_encoded() {
        assert_eq!(
            TfcClient::workspace_vars_path("ws-abc123"),
            "api/v2/workspaces/ws-abc123/vars"
        );
        assert_eq!(
            TfcClient::workspace_vars_path("ws/../x"),
            "api/v2/workspaces/ws%2F..%2Fx/vars"
        );
    }

    #[test]
    fn test_extract_error_message() {
        let body = br#"{"errors":[{"status":"422","title":"invalid attribute","detail":"Key has already been taken"}]}"#;
        assert_eq!(
            TfcClient::extract_error_message(body),
            "invalid attribute (Key has already been taken)"
        );
        assert_eq!(
            TfcClient::extract_error_message(br#"{"errors":[{"status":"404","title":"not found"}]}"#),
            "not found"
        );
        assert_eq!(TfcClient::extract_error_message(b"<html>"), "");
    }

    #[tokio::test]
    async fn test_requests_carry_auth_and_content_type() {
        let stub = Arc::new(StubTransport::new().respond(200, r#"{"data":[]}"#));
        let client =
            TfcClient::with_transport("secret-token", DEFAULT_ADDRESS, stub.clone()).unwrap();

        client
            .get(&TfcClient::workspace_vars_path("ws-1"), StatusCode::OK)
            .await
            .unwrap();

        let requests = stub.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, Method::GET);
        assert_eq!(
            request.url.as_str(),
            "https://app.terraform.io/api/v2/workspaces/ws-1/vars"
        );
        assert_eq!(request.header("Authorization"), Some("Bearer secret-token"));
        assert_eq!(request.header("Content-Type"), Some(CONTENT_TYPE));
    }

    #[tokio::test]
    async fn test_unexpected_status_is_error() {
        let stub = Arc::new(StubTransport::new().respond(200, "{}"));
        let client = TfcClient::with_transport("t", DEFAULT_ADDRESS, stub).unwrap();

        let err = client
            .post("api/v2/workspaces/ws-1/vars", &serde_json::json!({}), StatusCode::CREATED)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), Some(200));
    }
}
