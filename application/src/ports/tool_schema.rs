//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain) from "how to describe them to the
//! model" (infrastructure). The domain layer defines [`ToolDefinition`] and
//! [`ToolSpec`]; this port turns them into `{name, description, parameters}`
//! triples with JSON-Schema-like parameter objects.

use dojo_domain::tool::entities::{ToolDefinition, ToolSpec};

/// Port for converting tool definitions to the advertised schema.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools (sorted by name).
    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value>;
}
