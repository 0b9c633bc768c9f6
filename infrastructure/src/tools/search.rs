//! `search_via_perplexity` tool: market research through the Perplexity API.
//!
//! Perplexity speaks the OpenAI chat wire format, so the search backend is an
//! [`OpenAiCompatClient`] pointed at `https://api.perplexity.ai` and asked a
//! single question under a fixed research instruction.
//!
//! A missing API key is not a startup error: the tool stays advertised and
//! answers every call with `Error: PERPLEXITY_API_KEY not found.` so the model
//! can fall back to its own knowledge.

use crate::providers::OpenAiCompatClient;
use dojo_application::ports::chat_completion::{ChatCompletionClient, CompletionRequest};
use dojo_domain::tool::{
    entities::{ToolCall, ToolKind},
    value_objects::{ToolError, ToolResult},
};
use dojo_domain::{Message, ModelId};
use std::time::{Duration, Instant};
use tracing::debug;

/// Research instruction sent as the system message of every search
pub const SEARCH_INSTRUCTION: &str = "Answer as an up-to-date market research report: \
     be specific about competitors, market size and trends, and cite your sources.";

pub struct PerplexitySearch {
    client: Option<OpenAiCompatClient>,
    model: ModelId,
    key_env: String,
}

impl PerplexitySearch {
    /// `api_key = None` builds a search tool that always reports the missing key.
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ToolError> {
        let client = api_key
            .map(|key| OpenAiCompatClient::new(base_url, key, timeout))
            .transpose()
            .map_err(|e| ToolError::execution_failed(e.to_string()))?;

        let model: String = model.into();
        Ok(Self {
            client,
            model: ModelId::from(model.as_str()),
            key_env: "PERPLEXITY_API_KEY".to_string(),
        })
    }

    /// Name of the variable mentioned when the key is missing
    pub fn with_key_env(mut self, env: impl Into<String>) -> Self {
        self.key_env = env.into();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        let name = ToolKind::Search.name();
        let start = Instant::now();

        let query = match call.require_string("query") {
            Ok(q) => q,
            Err(e) => return ToolResult::failure(name, ToolError::invalid_argument(e)),
        };

        let Some(client) = &self.client else {
            return ToolResult::failure(
                name,
                ToolError::execution_failed(format!("Error: {} not found.", self.key_env)),
            );
        };

        debug!(query = %query, model = %self.model, "Running web search");

        let request = CompletionRequest::new(
            self.model.clone(),
            vec![Message::system(SEARCH_INSTRUCTION), Message::user(query)],
        );

        match client.complete(&request).await {
            Ok(response) => ToolResult::success(name, response.text())
                .with_duration(start.elapsed().as_millis() as u64),
            Err(e) => ToolResult::failure(
                name,
                ToolError::execution_failed(format!("Search failed: {}", e)),
            )
            .with_duration(start.elapsed().as_millis() as u64),
        }
    }
}
