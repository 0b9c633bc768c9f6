//! Application layer for startup-dojo
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::ExecutionParams;
pub use ports::{
    chat_completion::{ChatCompletionClient, CompletionRequest, ProviderError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    progress::{NoTurnProgress, TurnProgressNotifier},
    retrieval::{EmbeddingPort, RetrievalError, ScoredPoint, VectorStorePort},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
};
pub use use_cases::build_context::{
    BuildContextInput, BuildContextUseCase, BuiltContext, CollectionNames,
};
pub use use_cases::chat_session::{ChatSession, SessionSettings};
pub use use_cases::run_turn::{RunTurnInput, RunTurnOutput, RunTurnUseCase};
