//! Console output formatter for chat turns

use colored::Colorize;
use dojo_domain::{RetrievedPassage, ToolExecutionRecord, TurnOutcome};

/// Characters of each passage body shown under "References"
const PASSAGE_SUMMARY_CHARS: usize = 100;

/// Formats turn outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// References, tool trace and the answer, in that order
    pub fn format(outcome: &TurnOutcome) -> String {
        let mut output = String::new();

        if !outcome.passages.is_empty() {
            output.push_str(&Self::format_passages(&outcome.passages));
            output.push('\n');
        }
        if !outcome.tool_trace.is_empty() {
            output.push_str(&Self::format_tool_trace(&outcome.tool_trace));
            output.push('\n');
        }

        let answer = outcome.display_text();
        if outcome.is_success() {
            output.push_str(&answer);
        } else {
            output.push_str(&answer.red().to_string());
        }
        output.push('\n');
        output
    }

    pub fn format_passages(passages: &[RetrievedPassage]) -> String {
        let mut output = format!("{}\n", "References:".cyan().bold());
        for passage in passages {
            output.push_str(&format!(
                "  {} {}\n    {}\n",
                format!("({:.3})", passage.score).dimmed(),
                passage.title.bold(),
                passage.summary(PASSAGE_SUMMARY_CHARS)
            ));
        }
        output
    }

    pub fn format_tool_trace(trace: &[ToolExecutionRecord]) -> String {
        let mut output = format!("{}\n", "Tools:".cyan().bold());
        for record in trace {
            output.push_str(&format!(
                "  {} {}\n",
                format!("[{}]", record.kind.trace_label()).yellow(),
                record.input
            ));
            for line in record.output.lines() {
                output.push_str(&format!("    {}\n", line));
            }
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dojo_domain::{FailureStage, ToolKind, TurnFailure};
    use std::time::Duration;

    fn outcome() -> TurnOutcome {
        TurnOutcome {
            answer: "The sauna market is growing.".into(),
            tool_trace: vec![ToolExecutionRecord::new(
                ToolKind::Read,
                "https://example.com",
                &"x".repeat(500),
                200,
            )],
            passages: vec![RetrievedPassage::new(
                "Lean Canvas",
                "A one-page business plan template with nine boxes.",
                0.87,
            )],
            latency: Duration::from_millis(1500),
            rounds: 2,
            failure: None,
        }
    }

    #[test]
    fn test_format_includes_all_sections() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::format(&outcome());

        assert!(text.contains("References:"));
        assert!(text.contains("(0.870) Lean Canvas"));
        assert!(text.contains("[read] https://example.com"));
        assert!(text.contains("The sauna market is growing."));
        assert!(text.contains("*(Thought Time: 1.5000s)*"));
    }

    #[test]
    fn test_format_failure_has_no_thought_time() {
        colored::control::set_override(false);
        let failure = TurnFailure::new(FailureStage::FirstRound, "Timeout");
        let failed = TurnOutcome {
            answer: failure.to_string(),
            tool_trace: Vec::new(),
            passages: Vec::new(),
            latency: Duration::from_secs(1),
            rounds: 1,
            failure: Some(failure),
        };

        let text = ConsoleFormatter::format(&failed);
        assert!(text.contains("[error:first_round] Timeout"));
        assert!(!text.contains("Thought Time"));
        assert!(!text.contains("References:"));
    }
}
