mod client;
pub(crate) mod schema;
pub(crate) mod types;

pub use schema::StructuredOutput;

use serde_json::Value;
use tracing::debug;

use crate::error::AiError;
use crate::util::strip_code_blocks;

use client::GeminiClient;
use types::{GenerateContentRequest, GenerationConfig};

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

// =============================================================================
// Gemini Agent
// =============================================================================

/// Client for the Gemini `generateContent` endpoint.
///
/// The API key is supplied per call so one client can be shared by callers
/// holding their own credential.
#[derive(Clone)]
pub struct Gemini {
    pub(crate) model: String,
    base_url: Option<String>,
    http: reqwest::Client,
}

impl Gemini {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            base_url: None,
            http: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    pub(crate) fn client(&self) -> GeminiClient {
        let client = GeminiClient::new(self.http.clone());
        if let Some(ref url) = self.base_url {
            client.with_base_url(url)
        } else {
            client
        }
    }

    /// Submit `prompt` in structured-output mode constrained by `schema`.
    ///
    /// Returns the raw text payload of the first candidate, or `None` when the
    /// service produced no text.
    pub async fn generate_text(
        &self,
        api_key: &str,
        prompt: &str,
        schema: Value,
    ) -> Result<Option<String>, AiError> {
        if api_key.trim().is_empty() {
            return Err(AiError::Config("Gemini API key is empty".into()));
        }

        let request =
            GenerateContentRequest::new(prompt).generation_config(GenerationConfig::json(schema));

        let response = self
            .client()
            .generate_content(api_key, &self.model, &request)
            .await?;

        Ok(response.text())
    }

    /// Type-safe structured output extraction.
    ///
    /// `Ok(None)` means the service answered without a payload.
    pub async fn extract<T: StructuredOutput>(
        &self,
        api_key: &str,
        prompt: &str,
    ) -> Result<Option<T>, AiError> {
        debug!(type_name = T::type_name(), "Gemini structured output extraction");

        let Some(text) = self.generate_text(api_key, prompt, T::gemini_schema()).await? else {
            return Ok(None);
        };

        serde_json::from_str(strip_code_blocks(&text))
            .map(Some)
            .map_err(|e| AiError::Parse(format!("Failed to deserialize response: {e}")))
    }
}
