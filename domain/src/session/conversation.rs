//! Conversation state owned by one chat session.

use super::entities::{Message, Role};
use crate::core::error::DomainError;
use crate::orchestration::phase::SessionPhase;

/// Greeting every session opens with.
pub const GREETING: &str = "Welcome, founder-in-the-making. Warmed up yet?\n\n\
Drop your **idea in one line**. Everything starts from there.";

/// Message history plus the analysis phase cursor.
///
/// In-memory only. Messages are append-only; every append keeps the tool
/// message invariant checked by [`validate_history`].
#[derive(Debug, Clone)]
pub struct ConversationState {
    messages: Vec<Message>,
    phase: SessionPhase,
}

impl ConversationState {
    /// New session seeded with the assistant greeting, at the first phase.
    pub fn new() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
            phase: SessionPhase::first(),
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn phase_name(&self) -> &'static str {
        self.phase.name()
    }

    /// Advance the phase cursor. `false` when already on the last stage.
    pub fn advance_phase(&mut self) -> bool {
        self.phase.advance()
    }

    pub fn reset_phase(&mut self) {
        self.phase.reset();
    }

    /// True once the last analysis stage is reached.
    pub fn is_complete(&self) -> bool {
        self.phase.is_complete()
    }

    /// Append one message, rejecting tool messages with no matching call.
    pub fn push(&mut self, message: Message) -> Result<(), DomainError> {
        if message.role == Role::Tool {
            check_tool_message(&self.messages, &message)?;
        }
        self.messages.push(message);
        Ok(())
    }

    /// Append a batch atomically: either all messages land or none do.
    pub fn extend(&mut self, batch: Vec<Message>) -> Result<(), DomainError> {
        let mut candidate = self.messages.clone();
        for message in batch {
            if message.role == Role::Tool {
                check_tool_message(&candidate, &message)?;
            }
            candidate.push(message);
        }
        self.messages = candidate;
        Ok(())
    }

    /// The most recent `limit` messages worth sending back to the model.
    ///
    /// Tool results and the assistant tool-call intents they answer are
    /// turn-local scaffolding. They are skipped before counting, so tool
    /// turns do not shrink the window.
    pub fn window(&self, limit: usize) -> Vec<Message> {
        let kept: Vec<&Message> = self
            .messages
            .iter()
            .filter(|m| m.role != Role::Tool && !m.is_tool_intent())
            .collect();
        let start = kept.len().saturating_sub(limit);
        kept[start..].iter().map(|m| (*m).clone()).collect()
    }

    /// Append a user message. Cannot break the tool message invariant.
    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Append a plain assistant answer with no tool calls.
    pub fn push_answer(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// Drop all messages and start over from the greeting and first phase.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}

/// Check the tool message invariant over a whole sequence.
///
/// Every `tool` message must be preceded, possibly after other tool messages,
/// by an assistant message whose tool-call list contains its call id.
pub fn validate_history(messages: &[Message]) -> Result<(), DomainError> {
    for (i, message) in messages.iter().enumerate() {
        if message.role == Role::Tool {
            check_tool_message(&messages[..i], message)?;
        }
    }
    Ok(())
}

fn check_tool_message(preceding: &[Message], message: &Message) -> Result<(), DomainError> {
    let id = message
        .tool_call_id
        .as_deref()
        .ok_or(DomainError::MissingToolCallId)?;

    let intent = preceding
        .iter()
        .rev()
        .find(|m| m.role != Role::Tool)
        .filter(|m| m.role == Role::Assistant);

    match intent {
        Some(assistant) if assistant.tool_calls.iter().any(|c| c.id == id) => Ok(()),
        _ => Err(DomainError::OrphanToolMessage(id.to_string())),
    }
}
