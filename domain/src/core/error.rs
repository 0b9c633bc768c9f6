//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown analysis phase: {0}")]
    UnknownPhase(usize),

    #[error("Invalid top_k: {0} (must be between 1 and 10)")]
    InvalidTopK(usize),

    #[error("Tool message references unknown call id: {0}")]
    OrphanToolMessage(String),

    #[error("Tool message is missing a call id")]
    MissingToolCallId,
}

impl DomainError {
    /// Check if this error is a conversation history invariant violation
    pub fn is_history_violation(&self) -> bool {
        matches!(
            self,
            DomainError::OrphanToolMessage(_) | DomainError::MissingToolCallId
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            DomainError::InvalidTopK(0).to_string(),
            "Invalid top_k: 0 (must be between 1 and 10)"
        );
        assert_eq!(
            DomainError::UnknownPhase(11).to_string(),
            "Unknown analysis phase: 11"
        );
    }

    #[test]
    fn test_is_history_violation() {
        assert!(DomainError::OrphanToolMessage("call_1".into()).is_history_violation());
        assert!(DomainError::MissingToolCallId.is_history_violation());
        assert!(!DomainError::InvalidTopK(0).is_history_violation());
    }
}
