//! Outcome of one user turn.

use crate::retrieval::RetrievedPassage;
use crate::tool::value_objects::ToolExecutionRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Which completion round failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// The request that may ask for tools
    FirstRound,
    /// Any request issued after tool results were folded in
    SecondRound,
}

impl FailureStage {
    /// Stage for a one-based round number.
    pub fn for_round(round: usize) -> Self {
        if round <= 1 {
            FailureStage::FirstRound
        } else {
            FailureStage::SecondRound
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            FailureStage::FirstRound => "first_round",
            FailureStage::SecondRound => "second_round",
        }
    }
}

/// A completion failure turned into the turn's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnFailure {
    pub stage: FailureStage,
    pub message: String,
}

impl TurnFailure {
    pub fn new(stage: FailureStage, message: impl Into<String>) -> Self {
        Self {
            stage,
            message: message.into(),
        }
    }
}

impl fmt::Display for TurnFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[error:{}] {}", self.stage.tag(), self.message)
    }
}

/// Everything a caller gets back from a turn.
///
/// `answer` is always set: on failure it holds the rendered [`TurnFailure`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub answer: String,
    pub tool_trace: Vec<ToolExecutionRecord>,
    pub passages: Vec<RetrievedPassage>,
    /// Wall-clock time for the whole turn, tools included
    pub latency: Duration,
    /// Completion requests issued
    pub rounds: usize,
    pub failure: Option<TurnFailure>,
}

impl TurnOutcome {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Answer with the thought-time footer on successful turns.
    pub fn display_text(&self) -> String {
        if self.is_success() {
            format!(
                "{}\n\n*(Thought Time: {:.4}s)*",
                self.answer,
                self.latency.as_secs_f64()
            )
        } else {
            self.answer.clone()
        }
    }
}
