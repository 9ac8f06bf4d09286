//! Bearer token resolution.
//!
//! Tokens are looked up in order: an explicit value (CLI flag), the
//! `TF_TOKEN` environment variable, then the Terraform CLI credentials file
//! `~/.terraform.d/credentials.tfrc.json`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, TfcError};

/// Environment variable holding the API token.
pub const TOKEN_ENV: &str = "TF_TOKEN";

/// Host used when none can be derived from the API address.
pub const DEFAULT_HOST: &str = "app.terraform.io";

/// Contents of `credentials.tfrc.json`.
#[derive(Debug, Default, Deserialize)]
pub struct CredentialsFile {
    #[serde(default)]
    pub credentials: HashMap<String, HostCredentials>,
}

#[derive(Debug, Deserialize)]
pub struct HostCredentials {
    pub token: String,
}

impl CredentialsFile {
    /// Read and parse a credentials file.
    ///
    /// # Errors
    ///
    /// Returns [`TfcError::FileNotFound`] if the file does not exist and
    /// [`TfcError::Credentials`] if it is not valid JSON.
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| {
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

        serde_json::from_str(&content).map_err(|e| TfcError::Credentials {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Token stored for `host`, if any.
    pub fn token_for(&self, host: &str) -> Option<&str> {
        self.credentials
            .get(host)
            .map(|c| c.token.as_str())
            .filter(|t| !t.is_empty())
    }
}

/// Default location of the credentials file under the user's home directory.
pub fn default_credentials_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".terraform.d").join("credentials.tfrc.json"))
}

/// Resolves the bearer token for an API host.
#[derive(Debug, Clone)]
pub struct TokenResolver {
    host: String,
    explicit: Option<String>,
    env_token: Option<String>,
    credentials_path: Option<PathBuf>,
}

impl TokenResolver {
    /// Resolver for `host` reading `TF_TOKEN` and the default credentials file.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            explicit: None,
            env_token: std::env::var(TOKEN_ENV).ok(),
            credentials_path: default_credentials_path(),
        }
    }

    /// Use `token` ahead of every other source.
    #[must_use]
    pub fn with_explicit(mut self, token: Option<String>) -> Self {
        self.explicit = token;
        self
    }

    /// Override the environment token.
    #[must_use]
    pub fn with_env_token(mut self, token: Option<String>) -> Self {
        self.env_token = token;
        self
    }

    /// Override the credentials file location.
    #[must_use]
    pub fn with_credentials_path(mut self, path: Option<PathBuf>) -> Self {
        self.credentials_path = path;
        self
    }

    /// Resolve the token.
    ///
    /// # Errors
    ///
    /// Returns [`TfcError::ConfigMissing`] if no source provides a token.
    /// A missing credentials file is not an error by itself; an unreadable
    /// or malformed one is.
    pub fn resolve(&self) -> Result<String> {
        let non_empty = |t: &Option<String>| t.clone().filter(|t| !t.trim().is_empty());

        if let Some(token) = non_empty(&self.explicit) {
            tracing::debug!("using token from command line");
            return Ok(token);
        }

        if let Some(token) = non_empty(&self.env_token) {
            tracing::debug!("using token from {TOKEN_ENV}");
            return Ok(token);
        }

        if let Some(path) = &self.credentials_path {
            match CredentialsFile::read(path) {
                Ok(file) => {
                    if let Some(token) = file.token_for(&self.host) {
                        tracing::debug!(path = %path.display(), "using token from credentials file");
                        return Ok(token.to_string());
                    }
                }
                Err(TfcError::FileNotFound { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        Err(TfcError::ConfigMissing(format!(
            "no token for {} (use --token, {TOKEN_ENV}, or a credentials file)",
            self.host
        )))
    }
}
