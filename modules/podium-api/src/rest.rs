use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use podium_common::{SpeechRecord, SAMPLE_KEYWORDS};
use podium_search::ContentGenerator;

use crate::AppState;

pub const MAX_KEYWORD_LEN: usize = 200;

// --- Query structs ---

#[derive(Deserialize)]
pub struct SpeechesQuery {
    keyword: Option<String>,
}

// --- Response structs ---

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechView {
    #[serde(flatten)]
    speech: SpeechRecord,
    watch_url: String,
}

impl From<SpeechRecord> for SpeechView {
    fn from(speech: SpeechRecord) -> Self {
        let watch_url = speech.watch_url();
        Self { speech, watch_url }
    }
}

#[derive(Serialize)]
pub struct SpeechesResponse {
    keyword: String,
    speeches: Vec<SpeechView>,
}

fn bad_request(message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

// --- Handlers ---

pub async fn api_samples() -> impl IntoResponse {
    Json(SAMPLE_KEYWORDS)
}

pub async fn api_speeches<G: ContentGenerator + 'static>(
    State(state): State<Arc<AppState<G>>>,
    Query(params): Query<SpeechesQuery>,
) -> impl IntoResponse {
    let keyword = params.keyword.as_deref().unwrap_or_default().trim();
    if keyword.is_empty() {
        return bad_request("keyword is required");
    }
    if keyword.chars().count() > MAX_KEYWORD_LEN {
        return bad_request("keyword too long (max 200 characters)");
    }

    match state.fetcher.fetch(keyword).await {
        Ok(result) => Json(SpeechesResponse {
            keyword: keyword.to_string(),
            speeches: result.into_iter().map(SpeechView::from).collect(),
        })
        .into_response(),
        Err(e) => {
            error!(keyword, kind = e.kind(), error = %e, "Speech search failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({ "error": e.user_message() })),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use podium_common::GENERIC_USER_MESSAGE;
    use podium_search::testing::{speech_json, speeches_json, test_key, MockGenerator};
    use podium_search::SpeechFetcher;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app(generator: Arc<MockGenerator>, configured: bool) -> axum::Router {
        let key = configured.then(test_key);
        crate::router(Arc::new(AppState {
            fetcher: SpeechFetcher::new(generator, key),
        }))
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn speeches_include_watch_urls() {
        let generator = Arc::new(MockGenerator::new().on_json(speeches_json(vec![
            speech_json("Jane Doe", Some("UF8uR6Z6KLc")),
            speech_json("John Roe", None),
        ])));

        let (status, body) = get(app(generator, true), "/api/speeches?keyword=%20Courage%20").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["keyword"], "Courage");
        assert_eq!(body["speeches"][0]["speaker"], "Jane Doe");
        assert_eq!(
            body["speeches"][0]["watchUrl"],
            "https://www.youtube.com/embed/UF8uR6Z6KLc?autoplay=1"
        );
        assert!(body["speeches"][1].get("videoId").is_none());
        assert!(body["speeches"][1]["watchUrl"]
            .as_str()
            .unwrap()
            .starts_with("https://www.youtube.com/results?search_query="));
    }

    #[tokio::test]
    async fn blank_keyword_is_rejected_before_fetch() {
        let generator = Arc::new(MockGenerator::new());

        let (status, _) = get(app(generator.clone(), true), "/api/speeches?keyword=%20%20").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn failures_collapse_to_generic_message() {
        let generator = Arc::new(MockGenerator::new().on_text("garbage"));

        let (status, body) = get(app(generator, true), "/api/speeches?keyword=Failure").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], GENERIC_USER_MESSAGE);
    }

    #[tokio::test]
    async fn missing_key_uses_same_message() {
        let generator = Arc::new(MockGenerator::new());

        let (status, body) = get(app(generator.clone(), false), "/api/speeches?keyword=Failure").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], GENERIC_USER_MESSAGE);
        assert_eq!(generator.calls(), 0);
    }

    #[tokio::test]
    async fn empty_result_is_ok() {
        let generator = Arc::new(MockGenerator::new().on_no_payload());

        let (status, body) = get(app(generator, true), "/api/speeches?keyword=Obscure").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["speeches"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn samples_are_listed() {
        let (status, body) = get(app(Arc::new(MockGenerator::new()), true), "/api/samples").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().iter().any(|k| k == "Failure"));
    }
}
