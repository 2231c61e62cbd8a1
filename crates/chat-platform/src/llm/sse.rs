//! Server-sent events decoding for streamed chat completions.
//!
//! Network chunks can split lines, and even UTF-8 sequences, at arbitrary
//! byte offsets, so bytes are buffered until a full line is available.

use serde::Deserialize;
use chat_core::ports::LlmStreamEvent;

#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw body bytes; returns the events of every line completed.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<LlmStreamEvent> {
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if let Some(event) = parse_line(&String::from_utf8_lossy(&line)) {
                events.push(event);
            }
        }
        events
    }

    /// Flush a trailing line that was not newline-terminated.
    pub fn finish(&mut self) -> Vec<LlmStreamEvent> {
        let rest = std::mem::take(&mut self.buffer);
        parse_line(&String::from_utf8_lossy(&rest))
            .into_iter()
            .collect()
    }
}

/// Parse one SSE line. Comments, blank lines and non-data fields yield nothing.
pub fn parse_line(line: &str) -> Option<LlmStreamEvent> {
    let line = line.trim_end_matches(['\n', '\r']);
    let data = line.strip_prefix("data:")?.trim_start();

    if data == "[DONE]" {
        return Some(LlmStreamEvent::Done);
    }

    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => {
            if let Some(err) = chunk.error {
                return Some(LlmStreamEvent::Error(err.message));
            }
            let content = chunk
                .choices
                .into_iter()
                .next()
                .and_then(|c| c.delta.content)
                .unwrap_or_default();
            Some(LlmStreamEvent::Delta(content))
        }
        Err(e) => Some(LlmStreamEvent::Error(format!(
            "Malformed stream payload: {}",
            e
        ))),
    }
}

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    #[serde(default)]
    error: Option<StreamError>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: StreamDelta,
}

#[derive(Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta(text: &str) -> String {
        format!(
            "data: {{\"choices\":[{{\"index\":0,\"delta\":{{\"content\":{}}}}}]}}\n\n",
            serde_json::to_string(text).unwrap()
        )
    }

    #[test]
    fn test_decodes_deltas_and_done() {
        let mut decoder = SseDecoder::new();
        let body = format!("{}{}data: [DONE]\n\n", delta("Hel"), delta("lo"));
        let events = decoder.push(body.as_bytes());
        assert_eq!(
            events,
            vec![
                LlmStreamEvent::Delta("Hel".to_string()),
                LlmStreamEvent::Delta("lo".to_string()),
                LlmStreamEvent::Done,
            ]
        );
    }

    #[test]
    fn test_line_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let body = delta(" world");
        let (a, b) = body.as_bytes().split_at(17);
        assert!(decoder.push(a).is_empty());
        assert_eq!(
            decoder.push(b),
            vec![LlmStreamEvent::Delta(" world".to_string())]
        );
    }

    #[test]
    fn test_utf8_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        let body = delta("héllo");
        let bytes = body.as_bytes();
        // split inside the two-byte 'é'
        let cut = body.find('é').unwrap() + 1;
        assert!(decoder.push(&bytes[..cut]).is_empty());
        assert_eq!(
            decoder.push(&bytes[cut..]),
            vec![LlmStreamEvent::Delta("héllo".to_string())]
        );
    }

    #[test]
    fn test_role_only_delta_is_empty() {
        let line = r#"data: {"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#;
        assert_eq!(parse_line(line), Some(LlmStreamEvent::Delta(String::new())));
    }

    #[test]
    fn test_ignores_comments_and_blank_lines() {
        assert_eq!(parse_line(": keep-alive"), None);
        assert_eq!(parse_line(""), None);
        assert_eq!(parse_line("event: message"), None);
    }

    #[test]
    fn test_crlf_lines() {
        assert_eq!(parse_line("data: [DONE]\r\n"), Some(LlmStreamEvent::Done));
    }

    #[test]
    fn test_error_payload() {
        let line = r#"data: {"error":{"message":"rate limit reached"}}"#;
        assert_eq!(
            parse_line(line),
            Some(LlmStreamEvent::Error("rate limit reached".to_string()))
        );
    }

    #[test]
    fn test_malformed_payload() {
        assert!(matches!(
            parse_line("data: {not json"),
            Some(LlmStreamEvent::Error(_))
        ));
    }

    #[test]
    fn test_finish_flushes_unterminated_line() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.push(b"data: [DONE]").is_empty());
        assert_eq!(decoder.finish(), vec![LlmStreamEvent::Done]);
        assert!(decoder.finish().is_empty());
    }
}
