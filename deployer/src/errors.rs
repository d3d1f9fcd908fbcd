//! Error types for the Sling deployer

use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

/// Maximum number of bytes of a response body quoted in an error message
pub const BODY_EXCERPT_LIMIT: usize = 512;

/// Coarse classification of a [`DeployError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connection refused/reset, timeout, DNS failure
    Transport,

    /// The server answered, but not in the expected shape
    Protocol,

    /// WebDAV parent collection recovery failed
    Recovery,

    /// Local file system failure
    Io,

    /// Invalid configuration or arguments
    Config,

    /// The artifact is not a usable OSGi bundle
    Bundle,
}

/// Main error type for the Sling deployer
#[derive(Error, Debug)]
pub enum DeployError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Unexpected response code {} from {url}: {reason}", .status.as_u16())]
    UnexpectedStatus {
        url: Url,
        status: StatusCode,
        reason: String,
    },

    #[error("Unexpected content type returned from {url}, expected {expected} but was {}", .actual.as_deref().unwrap_or("<none>"))]
    UnexpectedContentType {
        url: Url,
        expected: String,
        actual: Option<String>,
    },

    #[error("Unexpected response received from {url}. Maybe wrong endpoint? {detail}: {excerpt}")]
    UnexpectedContent {
        url: Url,
        detail: String,
        excerpt: String,
    },

    #[error("Failed getting intermediate path at {url}. Reason: {source}")]
    IntermediatePathProbe {
        url: Url,
        #[source]
        source: Box<DeployError>,
    },

    #[error("Could not find any intermediate path up until the root of {url}")]
    NoExistingAncestor { url: Url },

    #[error("Failed creating intermediate path at '{url}'. Reason: {source}")]
    IntermediatePathCreation {
        url: Url,
        #[source]
        source: Box<DeployError>,
    },

    #[error("Bundle error: {0}")]
    BundleError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DeployError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            DeployError::HttpError(_) => ErrorKind::Transport,
            DeployError::UnexpectedStatus { .. }
            | DeployError::UnexpectedContentType { .. }
            | DeployError::UnexpectedContent { .. }
            | DeployError::JsonError(_) => ErrorKind::Protocol,
            DeployError::IntermediatePathProbe { .. }
            | DeployError::NoExistingAncestor { .. }
            | DeployError::IntermediatePathCreation { .. } => ErrorKind::Recovery,
            DeployError::IoError(_) => ErrorKind::Io,
            DeployError::UrlError(_) | DeployError::ConfigError(_) => ErrorKind::Config,
            DeployError::BundleError(_) => ErrorKind::Bundle,
        }
    }

    /// HTTP status of a protocol failure, if the server sent one
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            DeployError::UnexpectedStatus { status, .. } => Some(*status),
            DeployError::HttpError(e) => e.status(),
            _ => None,
        }
    }

    /// Build an [`DeployError::UnexpectedContent`] quoting the start of `body`
    pub fn unexpected_content(url: &Url, detail: impl Into<String>, body: &str) -> Self {
        DeployError::UnexpectedContent {
            url: url.clone(),
            detail: detail.into(),
            excerpt: excerpt(body).to_string(),
        }
    }
}

/// Cut `body` down to at most [`BODY_EXCERPT_LIMIT`] bytes on a char boundary
pub fn excerpt(body: &str) -> &str {
    if body.len() <= BODY_EXCERPT_LIMIT {
        return body;
    }
    let mut end = BODY_EXCERPT_LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
