//! Tool Executor port
//!
//! Defines the interface for executing the built-in tools (search, read, calculate).

use async_trait::async_trait;
use dojo_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// Implementations never fail the caller: every problem (bad arguments,
/// network errors, interpreter errors) comes back as a failed [`ToolResult`]
/// so the model can see and react to it.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    /// Check if a tool is available
    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get(name).is_some()
    }

    /// Get the definition of a specific tool
    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    /// Get names of all available tools
    fn available_tools(&self) -> Vec<&str> {
        self.tool_spec().names().collect()
    }

    /// Execute a tool call
    async fn execute(&self, call: &ToolCall) -> ToolResult;
}
