//! Tool domain value objects: immutable result and error types
//!
//! Every tool execution produces a [`ToolResult`]. Failures are values, not
//! panics or propagated errors: the orchestration loop folds the rendered
//! result back into the conversation so the model can react to it.

use super::entities::ToolKind;
use crate::util::{preview, truncate_chars};
use serde::{Deserialize, Serialize};

/// Appended to tool output that was cut to a size cap.
pub const TRUNCATION_MARKER: &str = "\n...(truncated)...";

/// Error that occurred during tool execution.
///
/// | Code | Description |
/// |------|-------------|
/// | `INVALID_ARGUMENT` | Missing/wrong parameters |
/// | `NOT_FOUND` | Unknown tool |
/// | `EXECUTION_FAILED` | Runtime failure (HTTP error, interpreter error) |
/// | `TIMEOUT` | Operation timed out |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new("NOT_FOUND", format!("Unknown tool '{}'", name))
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }

    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::new(
            "TIMEOUT",
            format!("Operation timed out: {}", operation.into()),
        )
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Result of a tool execution, carrying output or error information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Output content (for successful execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Error information (for failed execution)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
    /// Metadata about the execution
    #[serde(default)]
    pub metadata: ToolResultMetadata,
    /// Uncapped output, kept only when `output` was truncated
    #[serde(skip)]
    full_output: Option<String>,
}

/// Structured metadata about tool execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Duration of execution in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    /// Number of characters the backend returned before any cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_chars: Option<usize>,
    /// Whether the output was cut to the tool's size cap
    #[serde(default)]
    pub truncated: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(tool_name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            output: Some(output.into()),
            error: None,
            metadata: ToolResultMetadata::default(),
            full_output: None,
        }
    }

    /// Create a successful result whose output is cut to `max_chars`
    /// characters followed by [`TRUNCATION_MARKER`].
    ///
    /// The uncapped text stays available through [`ToolResult::full_output`].
    pub fn capped(tool_name: impl Into<String>, text: String, max_chars: usize) -> Self {
        let original_chars = text.chars().count();
        let truncated = original_chars > max_chars;
        let (output, full_output) = if truncated {
            let head = format!("{}{}", truncate_chars(&text, max_chars), TRUNCATION_MARKER);
            (head, Some(text))
        } else {
            (text, None)
        };
        Self {
            tool_name: tool_name.into(),
            output: Some(output),
            error: None,
            metadata: ToolResultMetadata {
                original_chars: Some(original_chars),
                truncated,
                ..Default::default()
            },
            full_output,
        }
    }

    /// Create a failed result
    pub fn failure(tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            tool_name: tool_name.into(),
            output: None,
            error: Some(error),
            metadata: ToolResultMetadata::default(),
            full_output: None,
        }
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    pub fn error(&self) -> Option<&ToolError> {
        self.error.as_ref()
    }

    /// The output before any size cap. Equal to [`ToolResult::output`]
    /// unless the result was built with [`ToolResult::capped`] and cut.
    pub fn full_output(&self) -> Option<&str> {
        self.full_output.as_deref().or(self.output.as_deref())
    }

    /// Text placed in the `tool` message fed back to the model.
    ///
    /// Failures render as `Error executing <tool>: [CODE] message`.
    pub fn to_message_content(&self) -> String {
        match (&self.output, &self.error) {
            (_, Some(err)) => format!("Error executing {}: {}", self.tool_name, err),
            (Some(output), None) => output.clone(),
            (None, None) => String::new(),
        }
    }
}

/// One entry of the per-turn tool trace shown to the user.
///
/// The `output` here is a display value derived from the full tool output;
/// it is never what the model sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolExecutionRecord {
    pub tool_name: String,
    pub kind: ToolKind,
    /// The primary argument (query, URL or code)
    pub input: String,
    pub output: String,
    /// Whether `output` was cut for display
    pub truncated: bool,
}

impl ToolExecutionRecord {
    /// Build a trace entry from the full message content.
    ///
    /// `read` outputs are page bodies and get cut to `display_max_chars`;
    /// search and calculator outputs are shown in full.
    pub fn new(kind: ToolKind, input: impl Into<String>, full_output: &str, display_max_chars: usize) -> Self {
        let output = match kind {
            ToolKind::Read => preview(full_output, display_max_chars),
            ToolKind::Search | ToolKind::Calculate => full_output.to_string(),
        };
        let truncated = output.len() != full_output.len();
        Self {
            tool_name: kind.name().to_string(),
            kind,
            input: input.into(),
            output,
            truncated,
        }
    }
}
