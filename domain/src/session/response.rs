//! Chat completion response type.
//!
//! A completion either answers with text or asks for tools to be run
//! (possibly with some text alongside). Tool calls are only ever produced by
//! the provider; nothing in this crate fabricates them.

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// A structured response from the chat completion service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Assistant text, if any
    pub content: Option<String>,
    /// Tool calls requested by the model, in the order the provider listed them
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    /// Model identifier echoed by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Provider finish reason (e.g. "stop", "tool_calls")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl CompletionResponse {
    /// Create a text-only response.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: Some(text.into()),
            ..Default::default()
        }
    }

    /// Create a response requesting tool calls.
    pub fn from_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            finish_reason: Some("tool_calls".to_string()),
            ..Default::default()
        }
    }

    /// Text content, empty when the provider returned none.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}
