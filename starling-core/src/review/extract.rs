//! Extraction of a structured result from raw agent text
//!
//! Agents are asked to respond with bare JSON, but in practice the reply
//! arrives wrapped in prose, markdown fences, or stray terminal escapes.
//! The pipeline here is: sanitize control sequences, strip a surrounding
//! code fence, scan to the first `{`, decode exactly one JSON value, and
//! validate it against [`CodeReviewResult`].
//!
//! Extraction never fails hard: anything unusable yields `None` and the
//! caller falls back to showing the raw text.

use super::report::CodeReviewResult;

/// Try to pull a validated review result out of raw agent text
pub fn extract_review(text: &str) -> Option<CodeReviewResult> {
    let sanitized = sanitize(text);
    let body = strip_code_fence(&sanitized);

    let start = body.find('{')?;
    let value = first_json_value(&body[start..])?;

    serde_json::from_value(value).ok()
}

/// Remove ANSI CSI sequences and control characters from text
///
/// CSI sequences (`ESC [` through a final byte in `@..=~`) are dropped
/// whole. A lone ESC is dropped like any other control character, keeping
/// the character after it. Newlines and tabs survive; all other C0
/// controls are removed. Idempotent.
pub fn sanitize(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\x1b' {
            if chars.peek() == Some(&'[') {
                chars.next();
                // Skip parameter bytes until the final byte of the sequence
                for next in chars.by_ref() {
                    if ('\x40'..='\x7e').contains(&next) {
                        break;
                    }
                }
            }
        } else if ('\0'..='\x1f').contains(&c) && c != '\n' && c != '\t' {
            // Drop other C0 control characters; DEL is not one of them
        } else {
            result.push(c);
        }
    }

    result
}

/// Strip a markdown code fence wrapping the whole text, if present
///
/// The opening fence line may carry a language tag (```` ```json ````);
/// the entire first line goes. Text that merely contains a fence
/// somewhere inside is left alone.
fn strip_code_fence(text: &str) -> &str {
    let mut text = text.trim();

    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.find('\n') {
            Some(idx) => &rest[idx + 1..],
            None => rest,
        };
        text = text.strip_suffix("```").unwrap_or(text);
        text = text.trim();
    }

    text
}

/// Decode the first complete JSON value, ignoring anything after it
fn first_json_value(text: &str) -> Option<serde_json::Value> {
    serde_json::Deserializer::from_str(text)
        .into_iter::<serde_json::Value>()
        .next()?
        .ok()
}

#[cfg(test)]
mod tests {
    use super::super::report::Severity;
    use super::*;

    const BARE: &str = r#"{"findings": [], "summary": "LGTM", "files_reviewed": 1}"#;

    #[test]
    fn test_bare_json() {
        let result = extract_review(BARE).unwrap();
        assert!(result.findings.is_empty());
        assert_eq!(result.summary, "LGTM");
        assert_eq!(result.files_reviewed, 1);
    }

    #[test]
    fn test_json_after_prose() {
        let text = format!("Reviewing the file now.\n{}", BARE);
        let result = extract_review(&text).unwrap();
        assert_eq!(result.summary, "LGTM");
    }

    #[test]
    fn test_json_surrounded_by_prose() {
        let text = format!(
            "Here are my findings:\n\n{}\n\nLet me know if you need more detail.",
            BARE
        );
        let result = extract_review(&text).unwrap();
        assert_eq!(result.summary, "LGTM");
    }

    #[test]
    fn test_fenced_with_language_tag() {
        let text = format!("```json\n{}\n```", BARE);
        let result = extract_review(&text).unwrap();
        assert_eq!(result.files_reviewed, 1);
    }

    #[test]
    fn test_fenced_without_language_tag() {
        let text = format!("```\n{}\n```", BARE);
        assert!(extract_review(&text).is_some());
    }

    #[test]
    fn test_fence_embedded_in_prose() {
        let text = format!("Sure! Here is the result:\n```json\n{}\n```\nDone.", BARE);
        let result = extract_review(&text).unwrap();
        assert_eq!(result.summary, "LGTM");
    }

    #[test]
    fn test_second_object_ignored() {
        let text = format!("{} {{\"other\": true}}", BARE);
        let result = extract_review(&text).unwrap();
        assert_eq!(result.summary, "LGTM");
    }

    #[test]
    fn test_full_review_payload() {
        let text = concat!(
            "```json\n",
            "{\n",
            "  \"findings\": [\n",
            "    {\n",
            "      \"file\": \"utils.py\",\n",
            "      \"line\": 42,\n",
            "      \"severity\": \"warning\",\n",
            "      \"category\": \"style\",\n",
            "      \"message\": \"Variable name shadows builtin\",\n",
            "      \"suggestion\": \"Rename `list` to `items`\"\n",
            "    }\n",
            "  ],\n",
            "  \"summary\": \"Minor style issue\",\n",
            "  \"files_reviewed\": 2\n",
            "}\n",
            "```",
        );

        let result = extract_review(text).unwrap();
        assert_eq!(result.findings.len(), 1);
        assert_eq!(result.findings[0].severity, Severity::Warning);
        assert_eq!(result.findings[0].location(), "utils.py:42");
        assert_eq!(result.summary, "Minor style issue");
    }

    #[test]
    fn test_empty_text() {
        assert!(extract_review("").is_none());
    }

    #[test]
    fn test_whitespace_only() {
        assert!(extract_review("   \n\t  \n").is_none());
    }

    #[test]
    fn test_no_json_at_all() {
        assert!(extract_review("No JSON here").is_none());
    }

    #[test]
    fn test_truncated_json() {
        assert!(extract_review(r#"{"findings": ["#).is_none());
    }

    #[test]
    fn test_wrong_shape_rejected() {
        // Valid JSON, wrong schema
        assert!(extract_review(r#"{"answer": 42}"#).is_none());
    }

    #[test]
    fn test_invalid_severity_rejected() {
        let text = r#"{
            "findings": [{"file": "a.py", "severity": "catastrophic", "category": "bug", "message": "m"}],
            "summary": "bad",
            "files_reviewed": 1
        }"#;
        assert!(extract_review(text).is_none());
    }

    #[test]
    fn test_array_payload_rejected() {
        // An array of findings without the wrapper object is not a result;
        // the scan lands on the first inner object, which fails validation.
        let text = r#"[{"file": "a.py", "severity": "info", "category": "bug", "message": "m"}]"#;
        assert!(extract_review(text).is_none());
    }

    #[test]
    fn test_ansi_colored_output() {
        let text = format!("\x1b[1;32mReview complete!\x1b[0m\n{}", BARE);
        let result = extract_review(&text).unwrap();
        assert_eq!(result.summary, "LGTM");
    }

    #[test]
    fn test_ansi_inside_fence() {
        let text = format!("\x1b[32m```json\n{}\n```\x1b[0m", BARE);
        let result = extract_review(&text).unwrap();
        assert_eq!(result.summary, "LGTM");
    }

    #[test]
    fn test_control_characters_inside_json() {
        // A BEL in the middle of the payload must not break decoding
        let text = "{\"findings\": [], \"summary\": \x07\"LGTM\", \"files_reviewed\": 1}";
        let result = extract_review(text).unwrap();
        assert_eq!(result.summary, "LGTM");
    }

    #[test]
    fn test_sanitize_strips_csi_sequences() {
        assert_eq!(sanitize("\x1b[31mred\x1b[0m"), "red");
        assert_eq!(sanitize("\x1b[2J\x1b[Hhome"), "home");
    }

    #[test]
    fn test_sanitize_non_alphabetic_final_byte() {
        // '@' and '~' are valid CSI final bytes
        assert_eq!(sanitize("\x1b[1@ab"), "ab");
        assert_eq!(sanitize("\x1b[5~ab"), "ab");
    }

    #[test]
    fn test_sanitize_lone_escape_dropped() {
        assert_eq!(sanitize("a\x1bb"), "ab");
    }

    #[test]
    fn test_sanitize_keeps_newline_and_tab() {
        assert_eq!(sanitize("a\nb\tc"), "a\nb\tc");
    }

    #[test]
    fn test_sanitize_drops_other_controls() {
        assert_eq!(sanitize("a\rb\x00c\x07d"), "abcd");
    }

    #[test]
    fn test_sanitize_keeps_del() {
        // DEL (0x7F) is outside the C0 range and passes through
        assert_eq!(sanitize("a\x7fb"), "a\x7fb");
    }

    #[test]
    fn test_sanitize_preserves_unicode() {
        assert_eq!(sanitize("héllo → 世界 ✨"), "héllo → 世界 ✨");
    }

    #[test]
    fn test_sanitize_unterminated_csi() {
        assert_eq!(sanitize("ok\x1b[12;3"), "ok");
    }

    #[test]
    fn test_sanitize_idempotent() {
        let inputs = [
            "\x1b[31mred\x1b[0m text",
            "plain text\nwith lines",
            "a\x1bb\x07c",
            "\x1b[2Jcleared",
        ];
        for input in inputs {
            let once = sanitize(input);
            assert_eq!(sanitize(&once), once);
        }
    }

    #[test]
    fn test_strip_code_fence_plain_text_untouched() {
        assert_eq!(strip_code_fence("no fences here"), "no fences here");
    }

    #[test]
    fn test_strip_code_fence_unclosed() {
        assert_eq!(strip_code_fence("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }
}
