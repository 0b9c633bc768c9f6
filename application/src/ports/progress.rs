//! Progress notification port
//!
//! Defines the interface for reporting progress while a turn runs.

use dojo_domain::{RetrievedPassage, ToolCall, ToolExecutionRecord};

/// Callbacks fired during a turn
///
/// Implementations live in the presentation layer (spinners, traces).
/// Every method has a no-op default.
pub trait TurnProgressNotifier: Send + Sync {
    /// Knowledge base search started
    fn on_retrieval_start(&self, _collection: &str) {}

    /// Knowledge base search finished (possibly with zero passages)
    fn on_retrieval_complete(&self, _passages: &[RetrievedPassage]) {}

    /// A completion request is about to be sent
    fn on_round_start(&self, _round: usize, _tools_offered: bool) {}

    /// A tool call is about to run
    fn on_tool_start(&self, _call: &ToolCall) {}

    /// A tool call finished; `record` is `None` for unknown tools
    fn on_tool_complete(&self, _call: &ToolCall, _success: bool, _record: Option<&ToolExecutionRecord>) {}

    /// The turn produced its final answer
    fn on_turn_complete(&self, _success: bool) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoTurnProgress;

impl TurnProgressNotifier for NoTurnProgress {}
