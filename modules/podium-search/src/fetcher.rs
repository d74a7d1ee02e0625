use std::time::Instant;

use ai_client::{strip_code_blocks, Gemini};
use podium_common::{ApiKey, Config, QueryResult, SearchError, SpeechResponse};
use tracing::{debug, info, warn};

use crate::query_formatter;
use crate::traits::ContentGenerator;

/// Sends one keyword to the generative service and decodes the speeches it returns.
///
/// Holds no cache: every `fetch` is one independent request.
pub struct SpeechFetcher<G = Gemini> {
    generator: G,
    api_key: Option<ApiKey>,
}

impl SpeechFetcher<Gemini> {
    pub fn from_config(config: &Config) -> Self {
        let mut gemini = Gemini::new(&config.gemini_model);
        if let Some(ref url) = config.gemini_base_url {
            gemini = gemini.with_base_url(url);
        }
        Self::new(gemini, config.gemini_api_key.clone())
    }
}

impl<G: ContentGenerator> SpeechFetcher<G> {
    pub fn new(generator: G, api_key: Option<ApiKey>) -> Self {
        Self { generator, api_key }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch speeches for `keyword`.
    ///
    /// Fails with `SearchError::Configuration` before any network activity when
    /// no API key was configured. A response without text is an empty result.
    /// Every other failure is returned as-is; nothing is retried.
    pub async fn fetch(&self, keyword: &str) -> Result<QueryResult, SearchError> {
        let api_key = self.api_key.as_ref().ok_or_else(SearchError::missing_api_key)?;

        let query = query_formatter::format(keyword);
        let started = Instant::now();

        let payload = match self.generator.generate(api_key, &query).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(keyword, kind = e.kind(), error = %e, "Speech search failed");
                return Err(e);
            }
        };

        let result = match payload {
            Some(text) => decode_speeches(&text).inspect_err(|e| {
                warn!(keyword, error = %e, "Speech payload did not match schema");
            })?,
            None => {
                debug!(keyword, "Service returned no payload");
                QueryResult::empty()
            }
        };

        flag_suspect_values(&result);

        info!(
            keyword,
            speeches = result.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Speech search complete"
        );

        Ok(result)
    }
}

/// Decode a structured-output payload into a `QueryResult`.
///
/// The payload must be `{"speeches": [...]}` with every required field present.
/// A blank payload is an empty result.
pub fn decode_speeches(payload: &str) -> Result<QueryResult, SearchError> {
    let json = strip_code_blocks(payload);
    if json.is_empty() {
        return Ok(QueryResult::empty());
    }

    let response: SpeechResponse = serde_json::from_str(json)
        .map_err(|e| SearchError::Parse(format!("Failed to decode speeches: {e}")))?;

    Ok(response.into())
}

/// Out-of-contract values are kept as returned; only logged.
fn flag_suspect_values(result: &QueryResult) {
    for (position, speech) in result.iter().enumerate() {
        if !speech.score_in_range() {
            warn!(
                position,
                speaker = speech.speaker.as_str(),
                score = speech.recommendation_score,
                "Recommendation score outside 85-100"
            );
        }
        if !speech.video_id_well_formed() {
            warn!(
                position,
                speaker = speech.speaker.as_str(),
                video_id = speech.video_id().unwrap_or_default(),
                "Video id is not an 11-character YouTube id"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_non_json() {
        let err = decode_speeches("Here are some speeches you might like!").unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn decode_rejects_payload_without_speeches() {
        let err = decode_speeches(r#"{"talks": []}"#).unwrap_err();
        assert!(matches!(err, SearchError::Parse(_)));
    }

    #[test]
    fn decode_accepts_fenced_json() {
        let result = decode_speeches("```json\n{\"speeches\": []}\n```").unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn blank_payload_is_empty_result() {
        assert!(decode_speeches("   \n").unwrap().is_empty());
    }

    #[test]
    fn from_config_without_key_is_unconfigured() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert!(!SpeechFetcher::from_config(&config).is_configured());
    }
}
