use ai_client::AiError;
use thiserror::Error;

/// Shown to users for every failure kind.
pub const GENERIC_USER_MESSAGE: &str =
    "We couldn't reach the library of speeches. Please verify your API Key and try again.";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl SearchError {
    pub fn missing_api_key() -> Self {
        SearchError::Configuration(
            "GEMINI_API_KEY is not set; the speech library cannot be reached".into(),
        )
    }

    /// The single message the presentation layer shows, whatever the cause.
    pub fn user_message(&self) -> &'static str {
        GENERIC_USER_MESSAGE
    }

    /// Short machine-readable name of the failure kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::Configuration(_) => "configuration",
            SearchError::Network(_) => "network",
            SearchError::Service { .. } => "service",
            SearchError::Parse(_) => "parse",
        }
    }
}

impl From<AiError> for SearchError {
    fn from(e: AiError) -> Self {
        match e {
            AiError::Config(msg) => SearchError::Configuration(msg),
            AiError::Network(msg) => SearchError::Network(msg),
            AiError::Api { status, message } => SearchError::Service { status, message },
            AiError::Parse(msg) => SearchError::Parse(msg),
        }
    }
}
