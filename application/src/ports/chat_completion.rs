//! Chat completion port
//!
//! Defines the interface for asking the chat model for the next assistant
//! message, optionally offering it tools to call.

use async_trait::async_trait;
use dojo_domain::{CompletionResponse, Message, ModelId};
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during a completion request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Timeout")]
    Timeout,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("HTTP {status} - {body}")]
    Http { status: u16, body: String },

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Provider returned {0} tool call(s) without being offered tools")]
    UnexpectedToolCalls(usize),
}

/// One completion request.
///
/// `tools` is `None` when the model must answer in text. A provider may only
/// return tool calls when `tools` was supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: ModelId,
    pub messages: Vec<Message>,
    /// `{name, description, parameters}` triples from [`ToolSchemaPort`](super::tool_schema::ToolSchemaPort)
    pub tools: Option<Vec<Value>>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl CompletionRequest {
    pub fn new(model: ModelId, messages: Vec<Message>) -> Self {
        Self {
            model,
            messages,
            tools: None,
            temperature: 0.1,
            max_tokens: 2048,
        }
    }

    pub fn with_tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = Some(tools);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn offers_tools(&self) -> bool {
        self.tools.as_ref().is_some_and(|t| !t.is_empty())
    }
}

/// Client for the chat completion service
///
/// Implementations are stateless and shared across sessions; each call is
/// independent and bounded by its own timeout.
#[async_trait]
pub trait ChatCompletionClient: Send + Sync {
    /// Request the next assistant message
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, ProviderError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = CompletionRequest::new(ModelId::default(), vec![Message::user("hi")])
            .with_temperature(0.8)
            .with_max_tokens(512);
        assert_eq!(request.temperature, 0.8);
        assert_eq!(request.max_tokens, 512);
        assert!(!request.offers_tools());

        let request = request.with_tools(vec![serde_json::json!({"name": "x"})]);
        assert!(request.offers_tools());
    }

    #[test]
    fn test_error_display() {
        let err = ProviderError::Http {
            status: 503,
            body: "overloaded".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503 - overloaded");
    }
}
