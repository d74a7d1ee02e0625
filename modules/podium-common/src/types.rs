use std::fmt;

use schemars::JsonSchema;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use url::Url;

const YOUTUBE_EMBED_URL: &str = "https://www.youtube.com/embed";
const YOUTUBE_SEARCH_URL: &str = "https://www.youtube.com/results";

/// Inclusive range the model is asked to score within.
pub const RECOMMENDATION_SCORE_RANGE: std::ops::RangeInclusive<f64> = 85.0..=100.0;

pub const VIDEO_ID_LEN: usize = 11;

/// Suggestion keywords offered before the first search.
pub const SAMPLE_KEYWORDS: &[&str] = &[
    "Failure",
    "Passion",
    "Science",
    "Courage",
    "Kindness",
    "Uncertainty",
];

// --- Speech records ---

/// One curated commencement speech or guest lecture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SpeechRecord {
    /// Name of the speaker
    pub speaker: String,
    /// Name of the university
    pub university: String,
    /// Year of the speech
    #[serde(deserialize_with = "string_or_number")]
    #[schemars(with = "String")]
    pub year: String,
    /// Profession of the speaker (e.g. Author, CEO)
    pub role: String,
    /// Short title or main theme of the speech
    pub topic: String,
    /// A famous or inspiring short quote from this speech
    pub quote: String,
    /// One sentence summary of the message
    pub summary: String,
    /// Search query string to find this video on YouTube
    pub youtube_query: String,
    /// The 11-character YouTube video ID (e.g. dQw4w9WgXcQ)
    #[serde(
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<String>")]
    pub video_id: Option<String>,
    /// Short text describing fame level
    pub popularity_label: String,
    /// Estimated view count string (e.g. 10M+)
    pub view_count_estimate: String,
    /// Score from 85-100
    pub recommendation_score: f64,
}

impl SpeechRecord {
    /// The video id, when the model identified a specific upload.
    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }

    /// Whether the score falls inside 85..=100. Out-of-range scores are kept but suspect.
    pub fn score_in_range(&self) -> bool {
        RECOMMENDATION_SCORE_RANGE.contains(&self.recommendation_score)
    }

    /// Whether the video id looks like a YouTube id: 11 chars of `[A-Za-z0-9_-]`.
    /// `true` when there is no id at all.
    pub fn video_id_well_formed(&self) -> bool {
        self.video_id().map_or(true, |id| {
            id.len() == VIDEO_ID_LEN
                && id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        })
    }

    /// Embedded player URL when an id is known, otherwise a YouTube search.
    pub fn watch_url(&self) -> String {
        match self.video_id() {
            Some(id) => embed_url(id),
            None => self.search_url(),
        }
    }

    /// YouTube search URL for `youtube_query`.
    pub fn search_url(&self) -> String {
        search_url(&self.youtube_query)
    }
}

/// Autoplaying embed URL for a video id. The id is percent-encoded as one path segment.
pub fn embed_url(video_id: &str) -> String {
    let Ok(mut url) = Url::parse(YOUTUBE_EMBED_URL) else {
        return YOUTUBE_EMBED_URL.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(video_id);
    }
    url.query_pairs_mut().append_pair("autoplay", "1");
    url.to_string()
}

/// YouTube search results URL with `query` percent-encoded.
pub fn search_url(query: &str) -> String {
    match Url::parse_with_params(YOUTUBE_SEARCH_URL, &[("search_query", query)]) {
        Ok(url) => url.to_string(),
        Err(_) => YOUTUBE_SEARCH_URL.to_string(),
    }
}

/// Wire shape of the structured response: `{ "speeches": [...] }`.
///
/// `speeches` is required: a payload without it is a parse failure, not an empty result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SpeechResponse {
    pub speeches: Vec<SpeechRecord>,
}

// --- Query results ---

/// Ordered records from one keyword submission. Immutable once produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct QueryResult {
    speeches: Vec<SpeechRecord>,
}

impl QueryResult {
    pub fn new(speeches: Vec<SpeechRecord>) -> Self {
        Self { speeches }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.speeches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.speeches.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SpeechRecord> {
        self.speeches.iter()
    }

    pub fn as_slice(&self) -> &[SpeechRecord] {
        &self.speeches
    }
}

impl From<SpeechResponse> for QueryResult {
    fn from(response: SpeechResponse) -> Self {
        Self::new(response.speeches)
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a SpeechRecord;
    type IntoIter = std::slice::Iter<'a, SpeechRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.speeches.iter()
    }
}

impl IntoIterator for QueryResult {
    type Item = SpeechRecord;
    type IntoIter = std::vec::IntoIter<SpeechRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.speeches.into_iter()
    }
}

// --- Lenient field decoding ---

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct YearVisitor;

    impl Visitor<'_> for YearVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a string or a number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(YearVisitor)
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}
