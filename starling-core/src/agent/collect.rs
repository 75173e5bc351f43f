//! Response aggregation for agent output streams

use tracing::debug;

use super::output::StreamHandler;

/// Aggregated output of one agent run
#[derive(Debug, Clone, PartialEq)]
pub struct AgentResult {
    /// All assistant text blocks, joined with newlines
    pub text: String,

    /// Total cost in USD, if the agent reported one
    pub cost_usd: Option<f64>,

    /// Wall-clock duration in milliseconds
    pub duration_ms: Option<u64>,

    /// Number of agent turns taken
    pub num_turns: Option<u32>,
}

/// Stream handler that collects assistant text and run metadata
///
/// Tool activity and completion are echoed to stderr as progress lines so the
/// user sees the agent working; stdout stays clean for the report.
#[derive(Debug, Default)]
pub struct ResponseCollector {
    parts: Vec<String>,
    cost_usd: Option<f64>,
    duration_ms: Option<u64>,
    num_turns: Option<u32>,
}

impl ResponseCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the collector and produce the aggregated result
    ///
    /// Metadata fields are `None` when the stream ended without a result
    /// event (for example, a crashed agent).
    pub fn finish(self) -> AgentResult {
        AgentResult {
            text: self.parts.join("\n"),
            cost_usd: self.cost_usd,
            duration_ms: self.duration_ms,
            num_turns: self.num_turns,
        }
    }
}

impl StreamHandler for ResponseCollector {
    fn on_system(&mut self, subtype: Option<&str>, session_id: Option<&str>) {
        debug!(?subtype, ?session_id, "Agent session started");
    }

    fn on_assistant_text(&mut self, text: &str) {
        self.parts.push(text.to_string());
    }

    fn on_tool_use(&mut self, name: &str, _input: &serde_json::Value) {
        eprintln!("  [tool] {}", name);
    }

    fn on_complete(
        &mut self,
        subtype: &str,
        cost_usd: Option<f64>,
        duration_ms: Option<u64>,
        num_turns: Option<u32>,
    ) {
        eprintln!("  [done] {}", subtype);
        // Last result event wins if the agent emits more than one
        self.cost_usd = cost_usd;
        self.duration_ms = duration_ms;
        self.num_turns = num_turns;
    }

    fn on_parse_error(&mut self, line: &str, error: &serde_json::Error) {
        debug!(%error, line, "Skipping unparseable stream line");
    }
}

#[cfg(test)]
mod tests {
    use super::super::output::OutputStreamer;
    use super::*;

    #[test]
    fn test_joins_text_blocks_with_newline() {
        let mut collector = ResponseCollector::new();
        collector.on_assistant_text("Reviewing the file now.");
        collector.on_assistant_text(r#"{"findings": [], "summary": "LGTM"}"#);

        let result = collector.finish();
        assert_eq!(
            result.text,
            "Reviewing the file now.\n{\"findings\": [], \"summary\": \"LGTM\"}"
        );
    }

    #[test]
    fn test_empty_stream_yields_empty_text() {
        let result = ResponseCollector::new().finish();
        assert_eq!(result.text, "");
        assert_eq!(result.cost_usd, None);
        assert_eq!(result.duration_ms, None);
        assert_eq!(result.num_turns, None);
    }

    #[test]
    fn test_metadata_captured_from_result() {
        let mut collector = ResponseCollector::new();
        collector.on_assistant_text("done");
        collector.on_complete("success", Some(0.0234), Some(5400), Some(3));

        let result = collector.finish();
        assert_eq!(result.text, "done");
        assert_eq!(result.cost_usd, Some(0.0234));
        assert_eq!(result.duration_ms, Some(5400));
        assert_eq!(result.num_turns, Some(3));
    }

    #[test]
    fn test_missing_result_leaves_metadata_none() {
        let mut collector = ResponseCollector::new();
        collector.on_assistant_text("partial output before crash");

        let result = collector.finish();
        assert_eq!(result.text, "partial output before crash");
        assert_eq!(result.cost_usd, None);
        assert_eq!(result.num_turns, None);
    }

    #[test]
    fn test_last_result_event_wins() {
        let mut collector = ResponseCollector::new();
        collector.on_complete("success", Some(0.01), Some(100), Some(1));
        collector.on_complete("success", Some(0.02), Some(200), Some(2));

        let result = collector.finish();
        assert_eq!(result.cost_usd, Some(0.02));
        assert_eq!(result.duration_ms, Some(200));
        assert_eq!(result.num_turns, Some(2));
    }

    #[tokio::test]
    async fn test_collects_full_session() {
        let input = concat!(
            r#"{"type":"system","subtype":"init","session_id":"s1"}"#,
            "\n",
            r#"{"type":"assistant","message":{"content":[{"type":"text","text":"Reviewing the file now."}]}}"#,
            "\n",
            r#"{"type":"assistant","message":{"content":[{"type":"tool_use","id":"t1","name":"Read","input":{"file_path":"src/main.py"}}]}}"#,
            "\n",
            r#"{"type":"user","message":{"content":[{"type":"tool_result","tool_use_id":"t1","content":"file contents"}]}}"#,
            "\n",
            r#"{"type":"assistant","message":{"content":[{"type":"text","text":"{\"findings\": [], \"summary\": \"LGTM\", \"files_reviewed\": 1}"}]}}"#,
            "\n",
            r#"{"type":"result","subtype":"success","cost_usd":0.0234,"duration_ms":5400,"num_turns":3}"#,
            "\n",
        );

        let mut streamer = OutputStreamer::new(input.as_bytes());
        let mut collector = ResponseCollector::new();
        streamer.stream(&mut collector).await.unwrap();

        let result = collector.finish();
        assert_eq!(
            result.text,
            "Reviewing the file now.\n{\"findings\": [], \"summary\": \"LGTM\", \"files_reviewed\": 1}"
        );
        assert_eq!(result.cost_usd, Some(0.0234));
        assert_eq!(result.duration_ms, Some(5400));
        assert_eq!(result.num_turns, Some(3));
    }
}
