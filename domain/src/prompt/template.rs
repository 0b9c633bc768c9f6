//! System prompt templates for the two operating modes

use crate::orchestration::mode::OperatingMode;
use crate::orchestration::phase::SessionPhase;

/// Header that introduces the grounding block.
pub const GROUNDING_HEADER: &str = "=== Install the following knowledge and answer from it ===";

/// Templates for the per-turn system prompt
pub struct SystemPromptTemplate;

impl SystemPromptTemplate {
    /// Mentor persona, specialized on the current analysis phase
    pub fn advisory(model_id: &str, phase_name: &str) -> String {
        format!(
            r#"You are a demanding startup mentor running on {model_id}.
Your job is to turn a raw idea into a business that survives contact with the market.
Current analysis phase: {phase_name}.

Rules:
1. Apply the current phase's framework to the founder's idea, section by section.
2. Be blunt. Point out weak assumptions and say what evidence would fix them.
3. When you need market data, competitor facts or numbers, use the tools:
   search the web, read a page, or compute with the calculator. Cite what you found.
4. End with one concrete homework task for the founder."#
        )
    }

    /// Legal persona, answering from statute passages
    pub fn compliance(model_id: &str) -> String {
        format!(
            r#"You are a careful corporate legal advisor running on {model_id}.
Your job is to flag legal and compliance risks in what the founder describes.

Rules:
1. Base your answer on the reference passages below. Quote the article you rely on.
2. If the passages do not cover the question, say so instead of guessing.
3. Separate clear violations from grey areas, and suggest safer alternatives.
4. Remind the founder that this is not a substitute for advice from a licensed attorney."#
        )
    }

    /// Base prompt for a mode, before grounding is added
    pub fn base(mode: OperatingMode, model_id: &str, phase: SessionPhase) -> String {
        match mode {
            OperatingMode::Advisory => Self::advisory(model_id, phase.name()),
            OperatingMode::Compliance => Self::compliance(model_id),
        }
    }

    /// Full system prompt: base followed by the grounding section.
    ///
    /// Always renders, even with an empty grounding block.
    pub fn compose(base: &str, grounding: &str) -> String {
        format!("{}\n\n{}\n{}", base, GROUNDING_HEADER, grounding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advisory_interpolates_model_and_phase() {
        let prompt = SystemPromptTemplate::advisory("llama-3.3-70b", "Lean Canvas");
        assert!(prompt.contains("llama-3.3-70b"));
        assert!(prompt.contains("Current analysis phase: Lean Canvas."));
    }

    #[test]
    fn test_compliance_ignores_phase() {
        let a = SystemPromptTemplate::base(
            OperatingMode::Compliance,
            "qwen-3-32b",
            SessionPhase::first(),
        );
        let b = SystemPromptTemplate::base(
            OperatingMode::Compliance,
            "qwen-3-32b",
            SessionPhase::at(5).unwrap(),
        );
        assert_eq!(a, b);
        assert!(a.contains("qwen-3-32b"));
    }

    #[test]
    fn test_compose_with_empty_grounding() {
        let prompt = SystemPromptTemplate::compose("base", "");
        assert!(prompt.starts_with("base\n\n"));
        assert!(prompt.ends_with(&format!("{}\n", GROUNDING_HEADER)));
    }

    #[test]
    fn test_compose_appends_grounding() {
        let prompt = SystemPromptTemplate::compose("base", "[Reference: A]\nbody");
        assert!(prompt.ends_with("[Reference: A]\nbody"));
    }
}
