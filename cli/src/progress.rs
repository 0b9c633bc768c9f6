//! Progress reporting for a chat turn

use colored::Colorize;
use dojo_application::TurnProgressNotifier;
use dojo_domain::{RetrievedPassage, ToolCall, ToolExecutionRecord};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Spinner that follows retrieval, completion rounds and tool calls.
///
/// Tool completions are printed above the spinner so they stay visible.
pub struct TurnSpinner {
    bar: Mutex<Option<ProgressBar>>,
}

impl TurnSpinner {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn set_message(&self, message: String) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };
        let bar = guard.get_or_insert_with(|| {
            let pb = ProgressBar::new_spinner();
            pb.set_style(Self::spinner_style());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });
        bar.set_message(message);
    }

    fn println(&self, line: String) {
        let guard = self.bar.lock().ok();
        match guard.as_ref().and_then(|g| g.as_ref()) {
            Some(bar) => bar.println(line),
            None => eprintln!("{}", line),
        }
    }
}

impl Default for TurnSpinner {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnProgressNotifier for TurnSpinner {
    fn on_retrieval_start(&self, collection: &str) {
        self.set_message(format!("Searching {}...", collection.cyan()));
    }

    fn on_retrieval_complete(&self, passages: &[RetrievedPassage]) {
        self.set_message(format!("Found {} passage(s)", passages.len()));
    }

    fn on_round_start(&self, round: usize, tools_offered: bool) {
        let suffix = if tools_offered { " (tools available)" } else { "" };
        self.set_message(format!("Thinking, round {}{}...", round, suffix));
    }

    fn on_tool_start(&self, call: &ToolCall) {
        self.set_message(format!("Running {}...", call.tool_name.bold()));
    }

    fn on_tool_complete(&self, call: &ToolCall, success: bool, _record: Option<&ToolExecutionRecord>) {
        let mark = if success { "v".green() } else { "x".red() };
        self.println(format!("  {} {}", mark, call.tool_name));
    }

    fn on_turn_complete(&self, _success: bool) {
        if let Ok(mut guard) = self.bar.lock()
            && let Some(bar) = guard.take()
        {
            bar.finish_and_clear();
        }
    }
}
