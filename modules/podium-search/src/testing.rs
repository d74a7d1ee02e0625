// Test mocks for the search pipeline.
//
// MockGenerator (ContentGenerator): scripted responses served in order,
// with a call counter and a log of the instructions it received.
//
// Plus builders for speech payloads.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use podium_common::{ApiKey, SearchError};
use serde_json::{json, Value};

use crate::query_formatter::FormattedQuery;
use crate::traits::ContentGenerator;

pub fn test_key() -> ApiKey {
    ApiKey::new("test-key").expect("non-blank key")
}

// ---------------------------------------------------------------------------
// MockGenerator
// ---------------------------------------------------------------------------

enum Scripted {
    Payload(Option<String>),
    Failure(fn() -> SearchError),
}

/// Serves scripted responses in FIFO order. Returns `SearchError::Network`
/// once the script runs out.
pub struct MockGenerator {
    script: Mutex<VecDeque<(Scripted, Duration)>>,
    calls: AtomicUsize,
    instructions: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            instructions: Mutex::new(Vec::new()),
        }
    }

    /// Queue a text payload.
    pub fn on_text(self, text: impl Into<String>) -> Self {
        self.push(Scripted::Payload(Some(text.into())), Duration::ZERO)
    }

    /// Queue a JSON payload.
    pub fn on_json(self, value: Value) -> Self {
        self.on_text(value.to_string())
    }

    /// Queue a JSON payload that is delivered after `delay`.
    pub fn on_json_after(self, value: Value, delay: Duration) -> Self {
        self.push(Scripted::Payload(Some(value.to_string())), delay)
    }

    /// Queue a response that carries no text at all.
    pub fn on_no_payload(self) -> Self {
        self.push(Scripted::Payload(None), Duration::ZERO)
    }

    /// Queue a failure.
    pub fn on_error(self, make: fn() -> SearchError) -> Self {
        self.push(Scripted::Failure(make), Duration::ZERO)
    }

    fn push(self, entry: Scripted, delay: Duration) -> Self {
        self.script
            .lock()
            .expect("script lock")
            .push_back((entry, delay));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn instructions(&self) -> Vec<String> {
        self.instructions.lock().expect("instructions lock").clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentGenerator for MockGenerator {
    async fn generate(
        &self,
        _api_key: &ApiKey,
        query: &FormattedQuery,
    ) -> Result<Option<String>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.instructions
            .lock()
            .expect("instructions lock")
            .push(query.instruction.clone());

        let next = self.script.lock().expect("script lock").pop_front();
        let Some((entry, delay)) = next else {
            return Err(SearchError::Network("no scripted response left".into()));
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match entry {
            Scripted::Payload(text) => Ok(text),
            Scripted::Failure(make) => Err(make()),
        }
    }
}

// ---------------------------------------------------------------------------
// Payload builders
// ---------------------------------------------------------------------------

/// A well-formed speech record as the model would return it.
pub fn speech_json(speaker: &str, video_id: Option<&str>) -> Value {
    let mut speech = json!({
        "speaker": speaker,
        "university": "Stanford",
        "year": "2010",
        "role": "Author",
        "topic": format!("{speaker} on courage"),
        "quote": "Be brave.",
        "summary": "Courage matters.",
        "youtubeQuery": format!("{speaker} Stanford speech"),
        "popularityLabel": "Hidden Gem",
        "viewCountEstimate": "500K+",
        "recommendationScore": 90
    });
    if let Some(id) = video_id {
        speech["videoId"] = json!(id);
    }
    speech
}

pub fn speeches_json(speeches: Vec<Value>) -> Value {
    json!({ "speeches": speeches })
}
