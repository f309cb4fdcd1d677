//! Error types for Inbox Digest.

/// Startup and serve errors returned from `main`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Mail provider (Gmail REST) errors.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// The provider rejected the access token (HTTP 401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Message {0} not found")]
    NotFound(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl MailError {
    /// Whether this error means the credential is expired or revoked.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Provider {provider} rate limited")]
    RateLimited { provider: String },
}

/// OAuth handshake and token errors.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("Invalid OAuth endpoint URL: {0}")]
    InvalidUrl(String),

    /// The authorization server rejected the grant (code reused, refresh
    /// token revoked or expired).
    #[error("Invalid grant: {0}")]
    InvalidGrant(String),

    #[error("Token request failed ({status}): {body}")]
    TokenRequest { status: u16, body: String },

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Invalid token response: {0}")]
    InvalidResponse(String),
}

/// Errors raised while running the summarize workflow.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Mail fetch failed: {0}")]
    Mail(#[from] MailError),

    #[error("Summarization failed: {0}")]
    Llm(#[from] LlmError),
}

impl WorkflowError {
    /// Whether the failure came from the provider rejecting the credential.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::Mail(e) => e.is_auth_error(),
            Self::Llm(_) => false,
        }
    }
}

/// Caller-facing outcome of a failed summarize request.
///
/// Deliberately coarse: sub-causes are logged, never surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SummarizeError {
    #[error("Not authenticated. Please connect Gmail first.")]
    AuthenticationMissing,

    #[error("Gmail session expired. Please reconnect.")]
    AuthenticationExpired,

    #[error("Failed to summarize emails. Please try again.")]
    ProcessingFailure,
}

impl From<&WorkflowError> for SummarizeError {
    fn from(e: &WorkflowError) -> Self {
        if e.is_auth_error() {
            Self::AuthenticationExpired
        } else {
            Self::ProcessingFailure
        }
    }
}

impl From<&OAuthError> for SummarizeError {
    fn from(e: &OAuthError) -> Self {
        match e {
            OAuthError::InvalidGrant(_) => Self::AuthenticationExpired,
            _ => Self::ProcessingFailure,
        }
    }
}

/// Result type alias for startup and serving.
pub type Result<T> = std::result::Result<T, Error>;
