use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use super::types::*;
use crate::error::AiError;
use crate::util::truncate_to_char_boundary;

const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MAX_ERROR_BODY_BYTES: usize = 1024;

pub(crate) struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: GEMINI_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn headers(api_key: &str) -> Result<HeaderMap, AiError> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| AiError::Config("API key contains invalid header characters".into()))?;
        headers.insert("x-goog-api-key", key);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    pub async fn generate_content(
        &self,
        api_key: &str,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);

        debug!(model, "Gemini generateContent request");

        let response = self
            .http
            .post(&url)
            .headers(Self::headers(api_key)?)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(AiError::Api {
                status: status.as_u16(),
                message: truncate_to_char_boundary(&error_text, MAX_ERROR_BODY_BYTES).to_string(),
            });
        }

        let body = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(candidate) = parsed.candidates.first() {
            debug!(finish_reason = ?candidate.finish_reason, "Gemini response received");
        } else if let Some(reason) = parsed
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            debug!(block_reason = reason, "Gemini returned no candidates");
        }

        Ok(parsed)
    }
}
