//! Domain layer for startup-dojo
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Turn
//!
//! One user message answered by the model, grounded on passages retrieved
//! for the active [`OperatingMode`] and optionally enriched by tool calls.
//!
//! ## Advisory / Compliance (OperatingMode)
//!
//! - **Advisory** (default): startup mentor, walks the analysis phases, tools on
//! - **Compliance**: legal advisor grounded on statute passages, tools off

pub mod core;
pub mod orchestration;
pub mod prompt;
pub mod retrieval;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use core::{error::DomainError, model::ModelId};
pub use orchestration::{
    mode::OperatingMode,
    phase::{FREE_ANALYSIS, PHASE_CATALOG, PhaseAction, SessionPhase},
    turn::{FailureStage, TurnFailure, TurnOutcome},
};
pub use prompt::{GROUNDING_HEADER, SystemPromptTemplate};
pub use retrieval::{RetrievedPassage, TopK, render_grounding_block};
pub use session::{
    CompletionResponse, ConversationState, GREETING, Message, Role, validate_history,
};
pub use tool::{
    DefaultToolValidator, TRUNCATION_MARKER, ToolCall, ToolDefinition, ToolError,
    ToolExecutionRecord, ToolKind, ToolParameter, ToolResult, ToolResultMetadata, ToolSpec,
    ToolValidator,
};
