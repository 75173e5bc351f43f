//! Output streaming and parsing for Claude Code JSON stream format

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::{Error, Result};

/// An event from the Claude Code stream-json output
///
/// Each line of agent stdout is one JSON object tagged by `type`. Unknown
/// event types deserialize to [`StreamEvent::Unknown`] and are skipped.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// System message at the start of a session
    System {
        #[serde(default)]
        subtype: Option<String>,
        #[serde(default)]
        session_id: Option<String>,
    },

    /// Assistant message carrying text and tool-use blocks
    Assistant {
        #[serde(default)]
        message: AssistantMessage,
    },

    /// User message carrying tool results echoed back to the model
    User {
        #[serde(default)]
        message: UserMessage,
    },

    /// Final result with run metadata
    Result {
        subtype: String,
        #[serde(default, alias = "total_cost_usd")]
        cost_usd: Option<f64>,
        #[serde(default)]
        duration_ms: Option<u64>,
        #[serde(default)]
        num_turns: Option<u32>,
    },

    /// Any event type this version doesn't know about
    #[serde(other)]
    Unknown,
}

/// Assistant message content
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// User message content
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UserMessage {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// A content block inside an assistant or user message
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text produced by the model
    Text { text: String },

    /// Tool invocation request
    ToolUse {
        #[serde(default)]
        id: String,
        name: String,
        #[serde(default)]
        input: serde_json::Value,
    },

    /// Tool output echoed back in a user message
    ToolResult {
        #[serde(default)]
        tool_use_id: String,
        #[serde(default)]
        content: serde_json::Value,
        #[serde(default)]
        is_error: bool,
    },

    /// Any block type this version doesn't know about
    #[serde(other)]
    Unknown,
}

/// Handler for processing stream events
pub trait StreamHandler: Send {
    /// Called when a system message is received
    fn on_system(&mut self, _subtype: Option<&str>, _session_id: Option<&str>) {}

    /// Called for each text block in an assistant message
    fn on_assistant_text(&mut self, text: &str);

    /// Called when the assistant uses a tool
    fn on_tool_use(&mut self, _name: &str, _input: &serde_json::Value) {}

    /// Called when a tool result is echoed back
    fn on_tool_result(&mut self, _content: &serde_json::Value, _is_error: bool) {}

    /// Called when the final result event arrives
    fn on_complete(
        &mut self,
        _subtype: &str,
        _cost_usd: Option<f64>,
        _duration_ms: Option<u64>,
        _num_turns: Option<u32>,
    ) {
    }

    /// Called when a parse error occurs (allows handler to skip malformed lines)
    fn on_parse_error(&mut self, _line: &str, _error: &serde_json::Error) {}
}

/// Stream line-delimited JSON events from an agent process
pub struct OutputStreamer<R> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin> OutputStreamer<R> {
    /// Create a new output streamer from a readable source
    ///
    /// Usually the child process stdout, but any async reader works.
    pub fn new(source: R) -> Self {
        Self {
            reader: BufReader::new(source),
        }
    }

    /// Stream events, calling the handler for each one
    ///
    /// Returns when the stream ends (process closes stdout). Blank lines
    /// are ignored; malformed lines go to `on_parse_error` and streaming
    /// continues.
    pub async fn stream<H: StreamHandler>(&mut self, handler: &mut H) -> Result<()> {
        let mut line = String::new();

        loop {
            line.clear();
            let bytes_read = self.reader.read_line(&mut line).await.map_err(Error::Io)?;

            if bytes_read == 0 {
                // EOF
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match serde_json::from_str::<StreamEvent>(trimmed) {
                Ok(event) => Self::dispatch_event(handler, event),
                Err(e) => handler.on_parse_error(trimmed, &e),
            }
        }

        Ok(())
    }

    fn dispatch_event<H: StreamHandler>(handler: &mut H, event: StreamEvent) {
        match event {
            StreamEvent::System {
                subtype,
                session_id,
            } => {
                handler.on_system(subtype.as_deref(), session_id.as_deref());
            }
            StreamEvent::Assistant { message } => {
                for block in message.content {
                    match block {
                        ContentBlock::Text { text } => handler.on_assistant_text(&text),
                        ContentBlock::ToolUse { name, input, .. } => {
                            handler.on_tool_use(&name, &input);
                        }
                        ContentBlock::ToolResult { .. } | ContentBlock::Unknown => {}
                    }
                }
            }
            StreamEvent::User { message } => {
                for block in message.content {
                    if let ContentBlock::ToolResult {
                        content, is_error, ..
                    } = block
                    {
                        handler.on_tool_result(&content, is_error);
                    }
                }
            }
            StreamEvent::Result {
                subtype,
                cost_usd,
                duration_ms,
                num_turns,
            } => {
                handler.on_complete(&subtype, cost_usd, duration_ms, num_turns);
            }
            StreamEvent::Unknown => {}
        }
    }
}
