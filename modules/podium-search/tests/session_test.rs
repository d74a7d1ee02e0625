//! Latest-keyword-wins behaviour of concurrent searches.

use std::sync::Arc;
use std::time::Duration;

use podium_common::SearchError;
use podium_search::testing::{speech_json, speeches_json, test_key, MockGenerator};
use podium_search::{SearchSession, SpeechFetcher};

fn session(generator: &Arc<MockGenerator>) -> SearchSession<Arc<MockGenerator>> {
    SearchSession::new(Arc::new(SpeechFetcher::new(
        generator.clone(),
        Some(test_key()),
    )))
}

#[tokio::test]
async fn single_search_delivers_result() {
    let generator =
        Arc::new(MockGenerator::new().on_json(speeches_json(vec![speech_json("Solo", None)])));
    let session = session(&generator);

    let result = session.search("Courage").await.unwrap().unwrap();

    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn slow_older_search_is_suppressed() {
    let generator = Arc::new(
        MockGenerator::new()
            .on_json_after(
                speeches_json(vec![speech_json("Old", None)]),
                Duration::from_millis(300),
            )
            .on_json(speeches_json(vec![speech_json("New", None)])),
    );
    let session = session(&generator);

    let (older, newer) = tokio::join!(session.search("Failure"), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        session.search("Passion").await
    });

    assert!(older.unwrap().is_none());
    let newer = newer.unwrap().unwrap();
    assert_eq!(newer.as_slice()[0].speaker, "New");
    // Superseded requests are not cancelled.
    assert_eq!(generator.calls(), 2);
}

#[tokio::test]
async fn stale_failure_is_suppressed_too() {
    let generator = Arc::new(
        MockGenerator::new()
            .on_json_after(serde_json::json!({"bogus": true}), Duration::from_millis(300))
            .on_json(speeches_json(vec![])),
    );
    let session = session(&generator);

    let (older, newer) = tokio::join!(session.search("Failure"), async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        session.search("Passion").await
    });

    assert!(matches!(older, Ok(None)));
    assert!(newer.unwrap().unwrap().is_empty());
}

#[tokio::test]
async fn current_failure_is_returned() {
    let generator = Arc::new(MockGenerator::new().on_text("not json"));
    let session = session(&generator);

    let err = session.search("Courage").await.unwrap_err();

    assert!(matches!(err, SearchError::Parse(_)));
}
