//! Run Turn use case.
//!
//! Drives one user turn against the chat model:
//!
//! ```text
//! AwaitingResponse ──(no tool calls)──────────────────────────▶ Done
//!        │
//!        └─(tool calls)─▶ ExecutingTools ─▶ AwaitingResponse ─▶ ...
//! ```
//!
//! At most [`ExecutionParams::max_rounds`] completion requests are issued.
//! Every round but the last offers the tool schema (in tool-enabled modes);
//! the last round never does, which forces a text answer. With the default
//! of two rounds this is "ask, run tools, ask once more".
//!
//! The loop never fails past its own boundary. Tool failures become `tool`
//! messages the model can read; completion failures become the turn's
//! answer, tagged with the round that failed.

use crate::config::ExecutionParams;
use crate::ports::chat_completion::{ChatCompletionClient, CompletionRequest, ProviderError};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::TurnProgressNotifier;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use dojo_domain::util::preview;
use dojo_domain::{
    CompletionResponse, DefaultToolValidator, FailureStage, Message, ModelId, OperatingMode,
    ToolCall, ToolError, ToolExecutionRecord, ToolKind, ToolResult, ToolValidator, TurnFailure,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Input for the [`RunTurnUseCase`].
#[derive(Debug, Clone)]
pub struct RunTurnInput {
    /// System prompt followed by the history window (current user message last)
    pub messages: Vec<Message>,
    pub mode: OperatingMode,
    pub model: ModelId,
    pub execution: ExecutionParams,
}

impl RunTurnInput {
    pub fn new(
        messages: Vec<Message>,
        mode: OperatingMode,
        model: ModelId,
        execution: ExecutionParams,
    ) -> Self {
        Self {
            messages,
            mode,
            model,
            execution,
        }
    }
}

/// Result of one turn. Always carries an answer.
#[derive(Debug, Clone)]
pub struct RunTurnOutput {
    /// Final assistant text, or the rendered failure
    pub answer: String,
    pub failure: Option<TurnFailure>,
    /// Tool-call intents and tool results produced during the turn, in order
    pub transcript: Vec<Message>,
    pub tool_trace: Vec<ToolExecutionRecord>,
    /// Completion requests issued
    pub rounds: usize,
    pub latency: Duration,
}

/// Content and display record for one executed call.
struct ToolOutcome {
    content: String,
    record: Option<ToolExecutionRecord>,
}

/// Use case for running a single turn of the tool orchestration loop.
pub struct RunTurnUseCase {
    client: Arc<dyn ChatCompletionClient>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    tool_schema: Arc<dyn ToolSchemaPort>,
    conversation_logger: Arc<dyn ConversationLogger>,
    validator: DefaultToolValidator,
}

impl Clone for RunTurnUseCase {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            tool_executor: self.tool_executor.clone(),
            tool_schema: self.tool_schema.clone(),
            conversation_logger: self.conversation_logger.clone(),
            validator: DefaultToolValidator,
        }
    }
}

impl RunTurnUseCase {
    pub fn new(
        client: Arc<dyn ChatCompletionClient>,
        tool_executor: Arc<dyn ToolExecutorPort>,
        tool_schema: Arc<dyn ToolSchemaPort>,
    ) -> Self {
        Self {
            client,
            tool_executor,
            tool_schema,
            conversation_logger: Arc::new(NoConversationLogger),
            validator: DefaultToolValidator,
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    /// Run the turn to completion.
    pub async fn execute(
        &self,
        input: RunTurnInput,
        progress: &dyn TurnProgressNotifier,
    ) -> RunTurnOutput {
        let started = Instant::now();
        let params = &input.execution;
        let max_rounds = params.effective_max_rounds();

        let schema = if input.mode.tools_enabled() {
            let tools = self
                .tool_schema
                .all_tools_schema(self.tool_executor.tool_spec());
            (!tools.is_empty()).then_some(tools)
        } else {
            None
        };

        info!(
            mode = %input.mode,
            model = %input.model,
            max_rounds,
            "Starting turn: {}",
            input
                .messages
                .last()
                .map(|m| preview(&m.content, 100))
                .unwrap_or_default()
        );

        let mut messages = input.messages.clone();
        let mut transcript = Vec::new();
        let mut tool_trace = Vec::new();
        let mut rounds = 0;

        let result: Result<String, TurnFailure> = loop {
            rounds += 1;
            let round = rounds;
            let stage = FailureStage::for_round(round);
            let offer_tools = schema.is_some() && round < max_rounds;

            let mut request = CompletionRequest::new(input.model.clone(), messages.clone())
                .with_temperature(params.temperature_for(input.mode, round))
                .with_max_tokens(params.max_tokens);
            if let Some(tools) = schema.as_ref().filter(|_| offer_tools) {
                request = request.with_tools(tools.clone());
            }

            progress.on_round_start(round, offer_tools);
            self.log_request(round, &request);

            let response = match self.complete(&request, params.completion_timeout).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(round, error = %e, "Completion request failed");
                    break Err(TurnFailure::new(stage, e.to_string()));
                }
            };
            self.log_response(round, &response);

            if !response.has_tool_calls() {
                if response.text().is_empty() {
                    let e = ProviderError::MalformedResponse(
                        "completion carried neither content nor tool calls".to_string(),
                    );
                    break Err(TurnFailure::new(stage, e.to_string()));
                }
                break Ok(response.text().to_string());
            }

            if !offer_tools {
                // Tool calls are only legal when a schema was offered
                warn!(
                    round,
                    calls = response.tool_calls.len(),
                    "Provider returned tool calls without being offered tools"
                );
                if response.text().is_empty() {
                    let e = ProviderError::UnexpectedToolCalls(response.tool_calls.len());
                    break Err(TurnFailure::new(stage, e.to_string()));
                }
                break Ok(response.text().to_string());
            }

            debug!(
                round,
                calls = response.tool_calls.len(),
                "Executing requested tools"
            );

            let intent = Message::assistant_tool_calls(response.text(), response.tool_calls.clone());
            messages.push(intent.clone());
            transcript.push(intent);

            let outcomes = self
                .execute_tools(&response.tool_calls, params, progress)
                .await;
            for (call, outcome) in response.tool_calls.iter().zip(outcomes) {
                let message = Message::tool(&call.id, outcome.content);
                messages.push(message.clone());
                transcript.push(message);
                tool_trace.extend(outcome.record);
            }
        };

        let latency = started.elapsed();
        let (answer, failure) = match result {
            Ok(answer) => (answer, None),
            Err(failure) => (failure.to_string(), Some(failure)),
        };

        info!(
            rounds,
            tools = tool_trace.len(),
            latency_ms = latency.as_millis() as u64,
            success = failure.is_none(),
            "Turn complete"
        );
        self.conversation_logger.log(ConversationEvent::new(
            "turn_complete",
            serde_json::json!({
                "rounds": rounds,
                "latency_ms": latency.as_millis() as u64,
                "tool_calls": tool_trace.len(),
                "failure": failure.as_ref().map(|f| serde_json::json!({
                    "stage": f.stage.tag(),
                    "message": f.message,
                })),
            }),
        ));
        progress.on_turn_complete(failure.is_none());

        RunTurnOutput {
            answer,
            failure,
            transcript,
            tool_trace,
            rounds,
            latency,
        }
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
        deadline: Option<Duration>,
    ) -> Result<CompletionResponse, ProviderError> {
        match deadline {
            Some(deadline) => tokio::time::timeout(deadline, self.client.complete(request))
                .await
                .map_err(|_| ProviderError::Timeout)?,
            None => self.client.complete(request).await,
        }
    }

    /// Run the calls of one round. Outcomes come back in request order,
    /// whether or not they ran concurrently.
    async fn execute_tools(
        &self,
        calls: &[ToolCall],
        params: &ExecutionParams,
        progress: &dyn TurnProgressNotifier,
    ) -> Vec<ToolOutcome> {
        if params.parallel_tools {
            let futures = calls
                .iter()
                .map(|call| self.run_tool(call, params, progress));
            futures::future::join_all(futures).await
        } else {
            let mut outcomes = Vec::with_capacity(calls.len());
            for call in calls {
                outcomes.push(self.run_tool(call, params, progress).await);
            }
            outcomes
        }
    }

    async fn run_tool(
        &self,
        call: &ToolCall,
        params: &ExecutionParams,
        progress: &dyn TurnProgressNotifier,
    ) -> ToolOutcome {
        progress.on_tool_start(call);
        self.conversation_logger.log(ConversationEvent::new(
            "tool_call",
            serde_json::json!({
                "id": call.id,
                "tool": call.tool_name,
                "arguments": call.arguments,
            }),
        ));
        debug!(
            tool = %call.tool_name,
            "Tool call: {}",
            preview(&call.arguments_json(), 100)
        );

        let started = Instant::now();
        let result = match self.tool_executor.get_tool(&call.tool_name) {
            None => {
                warn!(tool = %call.tool_name, "Model requested an unknown tool");
                ToolResult::failure(&call.tool_name, ToolError::unknown_tool(&call.tool_name))
            }
            Some(definition) => match self.validator.validate(call, definition) {
                Err(message) => {
                    ToolResult::failure(&call.tool_name, ToolError::invalid_argument(message))
                }
                Ok(()) => self.execute_with_deadline(call, params.tool_timeout).await,
            },
        };
        let duration_ms = started.elapsed().as_millis() as u64;

        if let Some(error) = result.error() {
            warn!(tool = %call.tool_name, error = %error, "Tool failed");
        }

        let content = result.to_message_content();
        // The trace preview is cut from the uncapped output, not from `content`
        let display_source = match result.error() {
            Some(_) => content.as_str(),
            None => result.full_output().unwrap_or(content.as_str()),
        };
        let record = ToolKind::from_name(&call.tool_name).map(|kind| {
            ToolExecutionRecord::new(
                kind,
                call.get_string(kind.input_key()).unwrap_or_default(),
                display_source,
                params.display_max_chars,
            )
        });

        self.conversation_logger.log(ConversationEvent::new(
            "tool_result",
            serde_json::json!({
                "id": call.id,
                "tool": call.tool_name,
                "success": result.is_success(),
                "chars": content.chars().count(),
                "duration_ms": result.metadata.duration_ms.unwrap_or(duration_ms),
                "truncated": result.metadata.truncated,
            }),
        ));
        progress.on_tool_complete(call, result.is_success(), record.as_ref());

        ToolOutcome { content, record }
    }

    async fn execute_with_deadline(&self, call: &ToolCall, deadline: Option<Duration>) -> ToolResult {
        match deadline {
            Some(deadline) => {
                match tokio::time::timeout(deadline, self.tool_executor.execute(call)).await {
                    Ok(result) => result,
                    Err(_) => ToolResult::failure(&call.tool_name, ToolError::timeout(&call.tool_name)),
                }
            }
            None => self.tool_executor.execute(call).await,
        }
    }

    fn log_request(&self, round: usize, request: &CompletionRequest) {
        self.conversation_logger.log(ConversationEvent::new(
            "completion_request",
            serde_json::json!({
                "round": round,
                "model": request.model.as_str(),
                "messages": request.messages,
                "tools": request.tools.as_ref().map(|t| t.len()),
                "temperature": request.temperature,
                "max_tokens": request.max_tokens,
            }),
        ));
    }

    fn log_response(&self, round: usize, response: &CompletionResponse) {
        self.conversation_logger.log(ConversationEvent::new(
            "completion_response",
            serde_json::json!({
                "round": round,
                "content": response.content,
                "tool_calls": response.tool_calls,
                "finish_reason": response.finish_reason,
            }),
        ));
    }
}
