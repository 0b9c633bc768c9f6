//! Session domain
//!
//! Messages, conversation state, and completion responses.

pub mod conversation;
pub mod entities;
pub mod response;

pub use conversation::{ConversationState, GREETING, validate_history};
pub use entities::{Message, Role};
pub use response::CompletionResponse;
