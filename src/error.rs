//! Error types for Terraform Cloud variable operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching, loading, rendering or publishing
/// workspace variables.
#[derive(Debug, Error)]
pub enum TfcError {
    /// Configuration is missing or incomplete.
    #[error("Terraform Cloud configuration required: {0}")]
    ConfigMissing(String),

    /// The credentials file exists but could not be used.
    #[error("Invalid credentials file {}: {message}", .path.display())]
    Credentials { path: PathBuf, message: String },

    /// The API answered with a status other than the one the operation expects.
    #[error("HTTP request status code {status}{}", format_detail(.message))]
    UnexpectedStatus { status: u16, message: String },

    /// Transport failure reported by a non-reqwest transport.
    #[error("Transport error: {0}")]
    Transport(String),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The input document is not valid JSON.
    #[error("Invalid json near '{token}': {source}")]
    InvalidJson {
        token: String,
        #[source]
        source: serde_json::Error,
    },

    /// JSON parsing or serialisation error.
    #[error("Failed to parse response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The input file does not exist.
    #[error("File not found: {}", .path.display())]
    FileNotFound { path: PathBuf },

    /// The input file could not be read.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    /// A variable value does not match the type it is rendered as.
    #[error("Variable '{key}' is not a valid {expected}: {value:?}")]
    InvalidValue {
        key: String,
        expected: &'static str,
        value: String,
    },

    /// A `KEY=KIND` type declaration could not be parsed.
    #[error("Invalid type declaration '{0}': expected KEY=string|number|bool|list|map")]
    InvalidTypeSpec(String),
}

fn format_detail(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {message}")
    }
}

impl TfcError {
    /// The HTTP status code, if this error came from an API response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            Self::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type alias for Terraform Cloud variable operations.
pub type Result<T> = core::result::Result<T, TfcError>;
