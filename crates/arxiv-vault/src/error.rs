//! Error types for the arXiv vault assistant.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Citation registry failures never show up here: they degrade to an empty
//! [`CitationInfo`](crate::models::CitationInfo) instead.

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Middleware error
    #[error("Middleware error: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// JSON parsing error
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Atom feed parsing error
    #[error("Failed to parse Atom feed: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// Structurally valid response that lacks what was asked for
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code
        status: u16,
        /// Response body or message
        message: String,
    },

    /// Local I/O while persisting a download
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Create an unexpected status error.
    #[must_use]
    pub fn unexpected_status(status: u16, message: impl Into<String>) -> Self {
        Self::UnexpectedStatus { status, message: message.into() }
    }

    /// Create a malformed response error.
    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// HTTP status code, when the registry answered at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors from the document store.
#[derive(thiserror::Error, Debug)]
pub enum VaultError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Front matter could not be read or written
    #[error("Invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    /// Document does not exist
    #[error("Document not found: {name}")]
    NotFound {
        /// Document name
        name: String,
    },

    /// Document already exists
    #[error("Document already exists: {name}")]
    AlreadyExists {
        /// Document name
        name: String,
    },

    /// Document name escapes the vault or is empty
    #[error("Invalid document name: {name}")]
    InvalidName {
        /// Offending name
        name: String,
    },
}

impl VaultError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an already exists error.
    #[must_use]
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists { name: name.into() }
    }
}

/// Errors surfaced to the user by an assistant operation.
#[derive(thiserror::Error, Debug)]
pub enum AssistantError {
    /// Bad or missing identifier or URL
    #[error("Invalid input '{input}': {reason}")]
    InvalidInput {
        /// What the user supplied
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Required registry failed or answered with garbage
    #[error("Upstream error: {0}")]
    Upstream(#[from] ClientError),

    /// Summarization service refused the job
    #[error("Submission failed ({status}): {message}")]
    Submission {
        /// HTTP status code
        status: u16,
        /// Response body or decode failure
        message: String,
    },

    /// Summarization job reported an error
    #[error("Summarization failed: {message}")]
    Poll {
        /// Upstream error message
        message: String,
    },

    /// Status endpoint answered with a non-200 status
    #[error("Status request failed with HTTP {status}")]
    PollTransport {
        /// HTTP status code
        status: u16,
    },

    /// Attempt budget exhausted before the job resolved
    #[error("Summarization timed out after {attempts} status checks")]
    Timeout {
        /// Status requests issued
        attempts: u32,
    },

    /// Host document store lacks a required editing feature
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Document store failure
    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),
}

impl AssistantError {
    /// Create an invalid input error.
    #[must_use]
    pub fn invalid_input(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput { input: input.into(), reason: reason.into() }
    }

    /// Create a submission error.
    #[must_use]
    pub fn submission(status: u16, message: impl Into<String>) -> Self {
        Self::Submission { status, message: message.into() }
    }

    /// Create a poll error.
    #[must_use]
    pub fn poll(message: impl Into<String>) -> Self {
        Self::Poll { message: message.into() }
    }

    /// Convert to a user-friendly message.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::InvalidInput { input, reason } => {
                format!("'{input}' was rejected ({reason}). Use a link like https://arxiv.org/abs/<id>.")
            }
            Self::Upstream(ClientError::UnexpectedStatus { status, .. }) => {
                format!("The paper registry answered with HTTP {status}. Please try again later.")
            }
            Self::Timeout { attempts } => {
                format!("The summary is still not ready after {attempts} checks. Try again later.")
            }
            Self::CapabilityUnavailable(feature) => {
                format!("This vault does not support {feature}.")
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type alias for document store operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// Result type alias for assistant operations.
pub type AssistantResult<T> = Result<T, AssistantError>;
