//! Analysis phase catalog for advisory sessions.
//!
//! Advisory sessions walk a founder through a fixed, ordered sequence of
//! analysis frameworks. The [`SessionPhase`] cursor selects which one the
//! system prompt specializes on. Compliance sessions ignore it.

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered catalog of analysis stages.
pub const PHASE_CATALOG: [&str; 10] = [
    "STEEP analysis",
    "Five Forces analysis",
    "Lean Canvas",
    "Osborn checklist",
    "Lean Canvas revisited",
    "Persona",
    "Problem hypothesis",
    "Interview questions",
    "Customer journey",
    "Final summary",
];

/// Label used when the cursor does not name a catalog stage.
pub const FREE_ANALYSIS: &str = "Free analysis";

/// One-based cursor into [`PHASE_CATALOG`].
///
/// Only moves forward through [`SessionPhase::advance`] and back to the
/// start through [`SessionPhase::reset`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionPhase(usize);

impl SessionPhase {
    pub const fn first() -> Self {
        Self(1)
    }

    /// Cursor at a given one-based stage number.
    pub fn at(number: usize) -> Result<Self, DomainError> {
        if (1..=PHASE_CATALOG.len()).contains(&number) {
            Ok(Self(number))
        } else {
            Err(DomainError::UnknownPhase(number))
        }
    }

    pub fn number(&self) -> usize {
        self.0
    }

    /// Catalog name of this stage, or [`FREE_ANALYSIS`].
    pub fn name(&self) -> &'static str {
        self.0
            .checked_sub(1)
            .and_then(|i| PHASE_CATALOG.get(i))
            .copied()
            .unwrap_or(FREE_ANALYSIS)
    }

    /// Name of the stage after this one, if any.
    pub fn next_name(&self) -> Option<&'static str> {
        PHASE_CATALOG.get(self.0).copied()
    }

    /// True on the final catalog stage.
    pub fn is_complete(&self) -> bool {
        self.0 >= PHASE_CATALOG.len()
    }

    /// Move to the next stage. Returns `false` (and stays put) on the last one.
    pub fn advance(&mut self) -> bool {
        if self.is_complete() {
            return false;
        }
        self.0 += 1;
        true
    }

    pub fn reset(&mut self) {
        *self = Self::first();
    }
}

impl Default for SessionPhase {
    fn default() -> Self {
        Self::first()
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.0, self.name())
    }
}

/// Canned follow-up a user can pick instead of typing a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseAction {
    /// Move on to the next stage and rework the idea with it
    Next,
    /// Push harder on the current stage
    DeepDive,
}

impl PhaseAction {
    /// User message for this action at `phase`.
    ///
    /// `Next` yields `None` when there is no stage left to move to.
    pub fn prompt(&self, phase: SessionPhase) -> Option<String> {
        match self {
            PhaseAction::Next => phase.next_name().map(|next| {
                format!(
                    "Right, I want to move on to the next stage: \"{}\". \
                     Hammer my idea into shape with this framework.",
                    next
                )
            }),
            PhaseAction::DeepDive => Some(format!(
                "The current \"{}\" still feels shallow. \
                 Analyze it again, in more detail and without mercy.",
                phase.name()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_phase() {
        let phase = SessionPhase::default();
        assert_eq!(phase.number(), 1);
        assert_eq!(phase.name(), "STEEP analysis");
        assert_eq!(phase.next_name(), Some("Five Forces analysis"));
    }

    #[test]
    fn test_advance_stops_at_last_stage() {
        let mut phase = SessionPhase::first();
        for _ in 1..PHASE_CATALOG.len() {
            assert!(phase.advance());
        }
        assert!(phase.is_complete());
        assert_eq!(phase.name(), "Final summary");
        assert!(!phase.advance());
        assert_eq!(phase.number(), PHASE_CATALOG.len());
        assert_eq!(phase.next_name(), None);
    }

    #[test]
    fn test_reset() {
        let mut phase = SessionPhase::at(7).unwrap();
        phase.reset();
        assert_eq!(phase, SessionPhase::first());
    }

    #[test]
    fn test_at_rejects_out_of_range() {
        assert_eq!(SessionPhase::at(0), Err(DomainError::UnknownPhase(0)));
        assert_eq!(SessionPhase::at(11), Err(DomainError::UnknownPhase(11)));
    }

    #[test]
    fn test_name_falls_back_to_free_analysis() {
        // Deserialized cursors are not range-checked
        let phase: SessionPhase = serde_json::from_str("42").unwrap();
        assert_eq!(phase.name(), FREE_ANALYSIS);
    }

    #[test]
    fn test_action_prompts() {
        let phase = SessionPhase::first();
        let next = PhaseAction::Next.prompt(phase).unwrap();
        assert!(next.contains("Five Forces analysis"));

        let deeper = PhaseAction::DeepDive.prompt(phase).unwrap();
        assert!(deeper.contains("STEEP analysis"));

        let last = SessionPhase::at(10).unwrap();
        assert!(PhaseAction::Next.prompt(last).is_none());
    }

    #[test]
    fn test_display() {
        assert_eq!(SessionPhase::first().to_string(), "1. STEEP analysis");
    }
}
