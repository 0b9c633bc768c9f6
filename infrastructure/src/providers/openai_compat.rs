//! OpenAI-compatible chat completion client.
//!
//! Speaks `POST {base_url}/chat/completions` with bearer authentication.
//! Tool schemas from the [`ToolSchemaPort`](dojo_application::ToolSchemaPort)
//! are wrapped as `{"type": "function", "function": {...}}`; tool calls come
//! back with their arguments encoded as a JSON string and are decoded here.
//!
//! Request building and response parsing are free functions so they can be
//! tested without a server.

use super::classify_reqwest_error;
use async_trait::async_trait;
use dojo_application::ports::chat_completion::{
    ChatCompletionClient, CompletionRequest, ProviderError,
};
use dojo_domain::{CompletionResponse, Message, Role, ToolCall};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Chat client for any OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct OpenAiCompatClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenAiCompatClient {
    /// Create a client with a per-request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::RequestFailed(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatCompletionClient for OpenAiCompatClient {
    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let url = self.chat_url();
        let body = build_chat_body(request);

        debug!(
            url = %url,
            model = %request.model,
            messages = request.messages.len(),
            tools = request.offers_tools(),
            "Sending chat completion request"
        );

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| classify_reqwest_error(&e))?;

        if status.as_u16() == 429 {
            warn!(status = status.as_u16(), "Chat completion rate limited");
            return Err(ProviderError::RateLimited(text));
        }
        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        let json: Value = serde_json::from_str(&text)
            .map_err(|e| ProviderError::MalformedResponse(format!("invalid JSON: {}", e)))?;
        parse_chat_response(&json)
    }
}

// ==================== Request building ====================

/// Build the JSON request body for `/chat/completions`
pub fn build_chat_body(request: &CompletionRequest) -> Value {
    let messages: Vec<Value> = request.messages.iter().map(message_to_wire).collect();

    let mut body = json!({
        "model": request.model.as_str(),
        "messages": messages,
        "temperature": request.temperature,
        "max_tokens": request.max_tokens,
    });

    if let Some(tools) = request.tools.as_ref().filter(|t| !t.is_empty()) {
        body["tools"] = Value::Array(tools.iter().map(tool_to_wire).collect());
        body["tool_choice"] = json!("auto");
    }
    body
}

/// Encode one history message in the OpenAI wire shape
pub fn message_to_wire(message: &Message) -> Value {
    match message.role {
        Role::Tool => json!({
            "role": "tool",
            "tool_call_id": message.tool_call_id.as_deref().unwrap_or_default(),
            "content": message.content,
        }),
        Role::Assistant if message.is_tool_intent() => {
            let calls: Vec<Value> = message
                .tool_calls
                .iter()
                .map(|call| {
                    json!({
                        "id": call.id,
                        "type": "function",
                        "function": {
                            "name": call.tool_name,
                            "arguments": call.arguments_json(),
                        }
                    })
                })
                .collect();
            let content = if message.content.is_empty() {
                Value::Null
            } else {
                Value::String(message.content.clone())
            };
            json!({ "role": "assistant", "content": content, "tool_calls": calls })
        }
        role => json!({ "role": role.as_str(), "content": message.content }),
    }
}

/// Wrap a `{name, description, parameters}` schema as a function tool
fn tool_to_wire(schema: &Value) -> Value {
    json!({ "type": "function", "function": schema })
}

// ==================== Response parsing ====================

/// Parse a `/chat/completions` response body.
///
/// A choice with neither text nor tool calls is a malformed response.
pub fn parse_chat_response(body: &Value) -> Result<CompletionResponse, ProviderError> {
    let choice = body
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .ok_or_else(|| ProviderError::MalformedResponse("no choices in response".into()))?;

    let message = choice
        .get("message")
        .ok_or_else(|| ProviderError::MalformedResponse("no message in choice".into()))?;

    let content = message
        .get("content")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(String::from);

    let tool_calls = parse_tool_calls(message)?;

    if content.is_none() && tool_calls.is_empty() {
        return Err(ProviderError::MalformedResponse(
            "choice carries neither content nor tool calls".into(),
        ));
    }

    Ok(CompletionResponse {
        content,
        tool_calls,
        model: body.get("model").and_then(|v| v.as_str()).map(String::from),
        finish_reason: choice
            .get("finish_reason")
            .and_then(|v| v.as_str())
            .map(String::from),
    })
}

fn parse_tool_calls(message: &Value) -> Result<Vec<ToolCall>, ProviderError> {
    let Some(calls) = message.get("tool_calls").and_then(|v| v.as_array()) else {
        return Ok(Vec::new());
    };

    calls
        .iter()
        .map(|tc| {
            let id = tc
                .get("id")
                .and_then(|v| v.as_str())
                .ok_or_else(|| ProviderError::MalformedResponse("tool call without id".into()))?;
            let function = tc.get("function").ok_or_else(|| {
                ProviderError::MalformedResponse(format!("tool call {} has no function", id))
            })?;
            let name = function.get("name").and_then(|v| v.as_str()).ok_or_else(|| {
                ProviderError::MalformedResponse(format!("tool call {} has no name", id))
            })?;

            Ok(ToolCall {
                id: id.to_string(),
                tool_name: name.to_string(),
                arguments: parse_arguments(function.get("arguments")),
            })
        })
        .collect()
}

/// Arguments normally arrive as a JSON string; some servers send an object.
/// Anything unparseable becomes an empty map so the validator can report it.
fn parse_arguments(raw: Option<&Value>) -> HashMap<String, Value> {
    let object: Option<Map<String, Value>> = match raw {
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => serde_json::from_str(s).ok(),
        Some(Value::Object(map)) => Some(map.clone()),
        _ => None,
    };
    object.map(|m| m.into_iter().collect()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dojo_domain::ModelId;

    fn request(messages: Vec<Message>) -> CompletionRequest {
        CompletionRequest::new(ModelId::from("llama-3.3-70b"), messages)
            .with_temperature(0.8)
            .with_max_tokens(2048)
    }

    #[test]
    fn test_body_without_tools_has_no_tools_key() {
        let body = build_chat_body(&request(vec![Message::user("hi")]));

        assert_eq!(body["model"], "llama-3.3-70b");
        assert_eq!(body["max_tokens"], 2048);
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn test_body_wraps_tools_as_functions() {
        let schema = json!({
            "name": "python_calculator",
            "description": "calc",
            "parameters": {"type": "object", "properties": {}, "required": []}
        });
        let body = build_chat_body(&request(vec![Message::user("hi")]).with_tools(vec![schema]));

        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "python_calculator");
        assert_eq!(body["tool_choice"], "auto");
    }

    #[test]
    fn test_tool_intent_and_result_wire_shape() {
        let call = ToolCall::new("call_1", "read_web_page").with_arg("url", "https://example.com");
        let intent = message_to_wire(&Message::assistant_tool_calls("", vec![call]));
        let result = message_to_wire(&Message::tool("call_1", "page text"));

        assert!(intent["content"].is_null());
        assert_eq!(intent["tool_calls"][0]["id"], "call_1");
        assert_eq!(intent["tool_calls"][0]["type"], "function");
        let args: Value =
            serde_json::from_str(intent["tool_calls"][0]["function"]["arguments"].as_str().unwrap())
                .unwrap();
        assert_eq!(args["url"], "https://example.com");

        assert_eq!(result["role"], "tool");
        assert_eq!(result["tool_call_id"], "call_1");
        assert_eq!(result["content"], "page text");
    }

    #[test]
    fn test_parse_text_response() {
        let body = json!({
            "model": "llama-3.3-70b",
            "choices": [{"message": {"role": "assistant", "content": "Hello"}, "finish_reason": "stop"}]
        });
        let resp = parse_chat_response(&body).unwrap();

        assert_eq!(resp.text(), "Hello");
        assert!(!resp.has_tool_calls());
        assert_eq!(resp.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_parse_tool_call_response() {
        let body = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_9",
                        "type": "function",
                        "function": {"name": "search_via_perplexity", "arguments": "{\"query\": \"sauna market\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });
        let resp = parse_chat_response(&body).unwrap();

        assert!(resp.content.is_none());
        assert_eq!(resp.tool_calls.len(), 1);
        assert_eq!(resp.tool_calls[0].id, "call_9");
        assert_eq!(resp.tool_calls[0].get_string("query"), Some("sauna market"));
    }

    #[test]
    fn test_unparseable_arguments_become_empty() {
        let body = json!({
            "choices": [{"message": {"tool_calls": [{
                "id": "c", "function": {"name": "python_calculator", "arguments": "{not json"}
            }]}}]
        });
        let resp = parse_chat_response(&body).unwrap();
        assert!(resp.tool_calls[0].arguments.is_empty());
    }

    #[test]
    fn test_empty_choice_is_malformed() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": ""}}]});
        assert!(matches!(
            parse_chat_response(&body),
            Err(ProviderError::MalformedResponse(_))
        ));

        assert!(matches!(
            parse_chat_response(&json!({"choices": []})),
            Err(ProviderError::MalformedResponse(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client =
            OpenAiCompatClient::new("https://api.cerebras.ai/v1/", "k", Duration::from_secs(5))
                .unwrap();
        assert_eq!(client.chat_url(), "https://api.cerebras.ai/v1/chat/completions");
    }
}
