//! Configuration types.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default chat model used for summaries.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GMAIL_API_BASE: &str = "https://gmail.googleapis.com/gmail/v1/users/me";
pub const DEFAULT_GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const DEFAULT_GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

const DEFAULT_PORT: u16 = 3000;

/// Pipeline limits.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// How many recent messages one run summarizes.
    pub max_messages: u32,
    /// Body length (in characters) handed to the LLM before truncation.
    pub body_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_messages: 10,
            body_limit: 2000,
        }
    }
}

/// Google OAuth client settings.
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    pub client_id: String,
    pub client_secret: SecretString,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub gmail_api_base: String,
}

/// OpenAI-compatible chat endpoint settings.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
}

/// Full service configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Adds `Secure` to the session cookie (enable behind HTTPS).
    pub secure_cookies: bool,
    pub google: GoogleConfig,
    pub openai: OpenAiConfig,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let port = match lookup("INBOX_DIGEST_PORT") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                key: "INBOX_DIGEST_PORT".to_string(),
                message: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let secure_cookies = lookup("INBOX_DIGEST_SECURE_COOKIES")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let google = GoogleConfig {
            client_id: required("GOOGLE_CLIENT_ID")?,
            client_secret: SecretString::from(required("GOOGLE_CLIENT_SECRET")?),
            redirect_uri: required("GOOGLE_REDIRECT_URI")?,
            auth_url: optional("GOOGLE_AUTH_URL", DEFAULT_GOOGLE_AUTH_URL),
            token_url: optional("GOOGLE_TOKEN_URL", DEFAULT_GOOGLE_TOKEN_URL),
            gmail_api_base: optional("GMAIL_API_BASE", DEFAULT_GMAIL_API_BASE),
        };

        let openai = OpenAiConfig {
            api_key: SecretString::from(required("OPENAI_API_KEY")?),
            model: optional("OPENAI_MODEL", DEFAULT_MODEL),
            base_url: optional("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL),
        };

        Ok(Self {
            port,
            secure_cookies,
            google,
            openai,
            pipeline: PipelineConfig::default(),
        })
    }
}
