//! Prompt domain
//!
//! System prompt templates for advisory and compliance sessions.

mod template;

pub use template::{GROUNDING_HEADER, SystemPromptTemplate};
