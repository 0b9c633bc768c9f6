//! Tool domain module
//!
//! Defines the built-in tools the model may call during a turn and the
//! values their execution produces.
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (catalog)    │    │ (from model) │    │ (output)     │
//! └──────┬───────┘    └──────────────┘    └──────┬───────┘
//!        │                                        │
//!        └─ ToolKind::definition()                └─ ToolExecutionRecord (display trace)
//! ```
//!
//! # Tools
//!
//! | Kind | Name | Argument |
//! |------|------|----------|
//! | `Search` | `search_via_perplexity` | `query` |
//! | `Read` | `read_web_page` | `url` |
//! | `Calculate` | `python_calculator` | `code` |
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions, no I/O
//! - **Application** (`ToolExecutorPort`, `ToolSchemaPort`): port traits
//! - **Infrastructure** (`BuiltinToolExecutor`): HTTP backends and the
//!   calculator subprocess

pub mod entities;
pub mod traits;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolKind, ToolParameter, ToolSpec};
pub use traits::{DefaultToolValidator, ToolValidator};
pub use value_objects::{
    TRUNCATION_MARKER, ToolError, ToolExecutionRecord, ToolResult, ToolResultMetadata,
};
