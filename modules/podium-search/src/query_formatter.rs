//! Turns a keyword into the instruction and response schema sent to the model.
//!
//! Pure template substitution: the same keyword always yields the same request.

use ai_client::StructuredOutput;
use podium_common::SpeechResponse;

pub const MIN_SPEECHES: usize = 6;
pub const MAX_SPEECHES: usize = 9;

/// Instruction text plus the structured-output schema that constrains the answer.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedQuery {
    pub instruction: String,
    pub schema: serde_json::Value,
}

/// Build the request for `keyword`.
///
/// The caller trims and rejects blank keywords before calling this.
pub fn format(keyword: &str) -> FormattedQuery {
    FormattedQuery {
        instruction: instruction(keyword),
        schema: SpeechResponse::gemini_schema(),
    }
}

fn instruction(keyword: &str) -> String {
    format!(
        r#"Find {MIN_SPEECHES} to {MAX_SPEECHES} real, famous and inspiring commencement speeches or guest lectures at top US universities (Harvard, Stanford, MIT, Yale and similar) that relate to the theme: "{keyword}".

Prefer speeches that encourage young people.

For each speech, estimate:
1. 'popularityLabel': a short descriptor of its fame (e.g. "Viral Sensation", "Modern Classic", "Hidden Gem").
2. 'viewCountEstimate': estimated views across major platforms (e.g. "20M+", "5M+", "500K+").
3. 'recommendationScore': a score from 85 to 100 for how strongly it is recommended for this theme.

IMPORTANT: give the 'videoId' (the 11-character code, e.g. 'UF8uR6Z6KLc') of the most popular or official YouTube upload of the speech.
If you cannot identify a specific video ID with high certainty, leave 'videoId' empty rather than guessing, but always provide 'youtubeQuery'."#
    )
}
