//! Chat session.
//!
//! Owns one [`ConversationState`] and the per-session settings (mode,
//! model, retrieval depth), and runs each user message through
//! [`BuildContextUseCase`] then [`RunTurnUseCase`]. Turns on one session are
//! strictly sequential: `send` takes `&mut self`.

use crate::config::ExecutionParams;
use crate::ports::progress::TurnProgressNotifier;
use crate::use_cases::build_context::{BuildContextInput, BuildContextUseCase};
use crate::use_cases::run_turn::{RunTurnInput, RunTurnUseCase};
use dojo_domain::{
    ConversationState, DomainError, Message, ModelId, OperatingMode, PhaseAction, TopK,
    TurnOutcome,
};
use std::sync::Arc;
use tracing::{error, info};

/// Per-session settings a user can change between turns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSettings {
    pub mode: OperatingMode,
    pub model: ModelId,
    pub top_k: TopK,
}

/// A running conversation.
pub struct ChatSession {
    build_context: Arc<BuildContextUseCase>,
    run_turn: Arc<RunTurnUseCase>,
    execution: ExecutionParams,
    settings: SessionSettings,
    state: ConversationState,
}

impl ChatSession {
    pub fn new(
        build_context: Arc<BuildContextUseCase>,
        run_turn: Arc<RunTurnUseCase>,
        execution: ExecutionParams,
        settings: SessionSettings,
    ) -> Self {
        Self {
            build_context,
            run_turn,
            execution,
            settings,
            state: ConversationState::new(),
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn mode(&self) -> OperatingMode {
        self.settings.mode
    }

    pub fn set_mode(&mut self, mode: OperatingMode) {
        self.settings.mode = mode;
    }

    pub fn set_model(&mut self, model: ModelId) {
        self.settings.model = model;
    }

    pub fn set_top_k(&mut self, k: usize) -> Result<(), DomainError> {
        self.settings.top_k = TopK::new(k)?;
        Ok(())
    }

    pub fn reset_phase(&mut self) {
        self.state.reset_phase();
    }

    /// Forget the conversation and start again from the greeting.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    /// Answer one user message.
    ///
    /// Always returns an outcome; failures are carried inside it.
    pub async fn send(
        &mut self,
        user_input: &str,
        progress: &dyn TurnProgressNotifier,
    ) -> TurnOutcome {
        let settings = self.settings.clone();
        self.state.push_user(user_input);

        let context = self
            .build_context
            .execute(
                BuildContextInput {
                    query: user_input.to_string(),
                    mode: settings.mode,
                    phase: self.state.phase(),
                    model: settings.model.clone(),
                    top_k: settings.top_k,
                },
                progress,
            )
            .await;

        let mut messages = vec![Message::system(context.system_prompt)];
        messages.extend(self.state.window(self.execution.history_window));

        let output = self
            .run_turn
            .execute(
                RunTurnInput::new(
                    messages,
                    settings.mode,
                    settings.model,
                    self.execution.clone(),
                ),
                progress,
            )
            .await;

        let mut appended = output.transcript;
        appended.push(Message::assistant(output.answer.clone()));
        if let Err(e) = self.state.extend(appended) {
            // Keep the conversation usable even if the transcript was rejected
            error!(error = %e, "Dropping turn transcript that violates history invariant");
            self.state.push_answer(output.answer.clone());
        }

        info!(
            rounds = output.rounds,
            passages = context.passages.len(),
            history = self.state.len(),
            "Turn recorded"
        );

        TurnOutcome {
            answer: output.answer,
            tool_trace: output.tool_trace,
            passages: context.passages,
            latency: output.latency,
            rounds: output.rounds,
            failure: output.failure,
        }
    }

    /// Run a canned phase action.
    ///
    /// `Next` advances the phase cursor first so the turn is grounded on the
    /// new stage. Returns `None` when the action does not apply: outside
    /// advisory mode, or `Next` on the last stage.
    pub async fn apply_action(
        &mut self,
        action: PhaseAction,
        progress: &dyn TurnProgressNotifier,
    ) -> Option<TurnOutcome> {
        if !self.settings.mode.uses_phases() {
            return None;
        }
        let prompt = action.prompt(self.state.phase())?;
        if action == PhaseAction::Next && !self.state.advance_phase() {
            return None;
        }
        Some(self.send(&prompt, progress).await)
    }
}
