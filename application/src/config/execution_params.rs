//! Execution parameters: turn loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control one turn in
//! [`RunTurnUseCase`](crate::use_cases::run_turn::RunTurnUseCase) and
//! [`ChatSession`](crate::use_cases::chat_session::ChatSession).
//! These are application-layer concerns, not domain policy.

use dojo_domain::OperatingMode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Turn loop control parameters.
///
/// # Rounds
///
/// A turn issues at most `max_rounds` completion requests. Every round but
/// the last offers tools (when the mode enables them); the last never does,
/// so the loop always terminates with a text answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Hard bound on completion requests per turn (at least 1).
    pub max_rounds: usize,
    /// Token budget for each completion.
    pub max_tokens: u32,
    /// First-round temperature in tool-enabled modes.
    pub tool_temperature: f32,
    /// First-round temperature in tool-less modes.
    pub plain_temperature: f32,
    /// Temperature for rounds after tool results were folded in.
    pub follow_up_temperature: f32,
    /// Number of recent messages sent with each request.
    pub history_window: usize,
    /// Run the tool calls of one round concurrently.
    pub parallel_tools: bool,
    /// Characters of `read` output kept in the display trace.
    pub display_max_chars: usize,
    /// Deadline for each completion request, on top of the client's own.
    pub completion_timeout: Option<Duration>,
    /// Deadline for each tool execution.
    pub tool_timeout: Option<Duration>,
    /// Deadline for embedding plus vector search.
    pub retrieval_timeout: Option<Duration>,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_rounds: 2,
            max_tokens: 2048,
            tool_temperature: 0.8,
            plain_temperature: 0.1,
            follow_up_temperature: 0.8,
            history_window: 10,
            parallel_tools: false,
            display_max_chars: 200,
            completion_timeout: Some(Duration::from_secs(90)),
            tool_timeout: Some(Duration::from_secs(90)),
            retrieval_timeout: Some(Duration::from_secs(20)),
        }
    }
}

impl ExecutionParams {
    /// `max_rounds`, never below 1.
    pub fn effective_max_rounds(&self) -> usize {
        self.max_rounds.max(1)
    }

    /// Temperature for the given one-based round.
    pub fn temperature_for(&self, mode: OperatingMode, round: usize) -> f32 {
        if round > 1 {
            self.follow_up_temperature
        } else if mode.tools_enabled() {
            self.tool_temperature
        } else {
            self.plain_temperature
        }
    }

    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: usize) -> Self {
        self.max_rounds = max;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = max;
        self
    }

    pub fn with_temperatures(mut self, tool: f32, plain: f32) -> Self {
        self.tool_temperature = tool;
        self.plain_temperature = plain;
        self
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub fn with_parallel_tools(mut self, parallel: bool) -> Self {
        self.parallel_tools = parallel;
        self
    }

    pub fn with_display_max_chars(mut self, max: usize) -> Self {
        self.display_max_chars = max;
        self
    }

    pub fn with_completion_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.completion_timeout = timeout;
        self
    }

    pub fn with_tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.tool_timeout = timeout;
        self
    }

    pub fn with_retrieval_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.retrieval_timeout = timeout;
        self
    }
}
