//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod chat_completion;
pub mod conversation_logger;
pub mod progress;
pub mod retrieval;
pub mod tool_executor;
pub mod tool_schema;
