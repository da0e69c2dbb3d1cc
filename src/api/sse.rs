//! Server-Sent Events (SSE) line parser for streamed chat completions
//!
//! Only the OpenAI-compatible shape is understood:
//! `data: {"choices":[{"delta":{"content":"..."}}]}` terminated by `data: [DONE]`.
//! Lines are expected without their trailing newline.

use serde_json::Value;

const DATA_PREFIX: &str = "data: ";

/// Outcome of one complete SSE line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    /// Non-empty text fragment from `choices[0].delta.content`
    TextDelta(String),
    /// `data: [DONE]` sentinel
    Done,
}

/// Parse a single complete line.
/// Returns None for anything that carries no text: other SSE fields, comments,
/// blank lines, malformed JSON and payloads without a content delta.
pub fn parse_sse_line(line: &str) -> Option<SseEvent> {
    // Tolerate CRLF framing
    let line = line.strip_suffix('\r').unwrap_or(line);
    let data = line.strip_prefix(DATA_PREFIX)?;

    if data.trim() == "[DONE]" {
        return Some(SseEvent::Done);
    }

    let json: Value = match serde_json::from_str(data) {
        Ok(v) => v,
        Err(e) => {
            tracing::trace!("Skipping malformed SSE payload: {}", e);
            return None;
        }
    };

    match json["choices"][0]["delta"]["content"].as_str() {
        Some(content) if !content.is_empty() => Some(SseEvent::TextDelta(content.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_delta() {
        let line = r#"data: {"choices":[{"delta":{"content":"Hello"},"index":0}]}"#;
        assert_eq!(parse_sse_line(line), Some(SseEvent::TextDelta("Hello".into())));
    }

    #[test]
    fn test_crlf_line() {
        let line = "data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\r";
        assert_eq!(parse_sse_line(line), Some(SseEvent::TextDelta("Hi".into())));
    }

    #[test]
    fn test_done() {
        assert_eq!(parse_sse_line("data: [DONE]"), Some(SseEvent::Done));
    }

    #[test]
    fn test_role_only_delta_skipped() {
        let line = r#"data: {"choices":[{"delta":{"role":"assistant"}}]}"#;
        assert!(parse_sse_line(line).is_none());
    }

    #[test]
    fn test_empty_content_skipped() {
        let line = r#"data: {"choices":[{"delta":{"content":""},"finish_reason":"stop"}]}"#;
        assert!(parse_sse_line(line).is_none());
    }

    #[test]
    fn test_malformed_json_skipped() {
        assert!(parse_sse_line("data: {not json").is_none());
        assert!(parse_sse_line(r#"data: {"choices":"#).is_none());
    }

    #[test]
    fn test_non_data_lines_skipped() {
        assert!(parse_sse_line("").is_none());
        assert!(parse_sse_line(": keep-alive").is_none());
        assert!(parse_sse_line("event: message").is_none());
        // The prefix includes the space
        assert!(parse_sse_line(r#"data:{"choices":[{"delta":{"content":"x"}}]}"#).is_none());
    }

    #[test]
    fn test_non_string_content_skipped() {
        let line = r#"data: {"choices":[{"delta":{"content":42}}]}"#;
        assert!(parse_sse_line(line).is_none());
    }
}
