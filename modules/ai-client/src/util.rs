/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Strip a markdown code fence wrapped around a JSON payload.
///
/// Structured-output mode normally returns bare JSON, but some model versions
/// still fence it.
pub fn strip_code_blocks(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_never_splits_a_character() {
        let text = "Commencement — 2005";
        let truncated = truncate_to_char_boundary(text, 14);
        assert!(truncated.len() <= 14);
        assert!(text.starts_with(truncated));
    }

    #[test]
    fn truncate_leaves_short_strings_alone() {
        assert_eq!(truncate_to_char_boundary("quota", 100), "quota");
    }

    #[test]
    fn strip_code_blocks_handles_fenced_and_bare_json() {
        assert_eq!(
            strip_code_blocks("```json\n{\"speeches\":[]}\n```"),
            "{\"speeches\":[]}"
        );
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("  {}  "), "{}");
    }
}
