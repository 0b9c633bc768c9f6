//! REPL (Read-Eval-Print Loop) for the mentoring chat

use crate::output::ConsoleFormatter;
use crate::progress::TurnSpinner;
use colored::Colorize;
use dojo_application::{ChatSession, NoTurnProgress, TurnProgressNotifier};
use dojo_domain::{GREETING, ModelId, OperatingMode, PHASE_CATALOG, PhaseAction, TurnOutcome};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use tracing::warn;

const HISTORY_SIZE: usize = 1000;

/// A parsed slash command
#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Help,
    Quit,
    Next,
    DeepDive,
    Phase,
    ResetPhase,
    Reset,
    Mode(Option<OperatingMode>),
    Model(Option<ModelId>),
    TopK(Option<usize>),
    Unknown(String),
}

impl ReplCommand {
    /// Parse a line starting with `/`
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match name {
            "/quit" | "/exit" | "/q" => Self::Quit,
            "/help" | "/h" | "/?" => Self::Help,
            "/next" | "/n" => Self::Next,
            "/deeper" | "/deep" | "/d" => Self::DeepDive,
            "/phase" => Self::Phase,
            "/restart" => Self::ResetPhase,
            "/reset" => Self::Reset,
            "/mode" => match arg.map(str::parse::<OperatingMode>) {
                None => Self::Mode(None),
                Some(Ok(mode)) => Self::Mode(Some(mode)),
                Some(Err(_)) => Self::Unknown(line.to_string()),
            },
            "/model" => Self::Model(arg.map(ModelId::from)),
            "/topk" | "/k" => match arg.map(str::parse::<usize>) {
                None => Self::TopK(None),
                Some(Ok(k)) => Self::TopK(Some(k)),
                Some(Err(_)) => Self::Unknown(line.to_string()),
            },
            _ => Self::Unknown(line.to_string()),
        }
    }
}

/// Interactive chat REPL
pub struct ChatRepl {
    session: ChatSession,
    show_progress: bool,
}

impl ChatRepl {
    pub fn new(session: ChatSession) -> Self {
        Self {
            session,
            show_progress: true,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Reedline::create();

        let history_path = dirs::data_dir().map(|p| p.join("startup-dojo").join("history.txt"));
        if let Some(path) = &history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_SIZE, path.clone()) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => warn!("Could not open history file {}: {}", path.display(), e),
            }
        }

        self.print_welcome();

        loop {
            let prompt = DefaultPrompt::new(
                DefaultPromptSegment::Basic(self.prompt_label()),
                DefaultPromptSegment::Empty,
            );

            match editor.read_line(&prompt) {
                Ok(Signal::Success(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line.starts_with('/') {
                        if self.handle_command(ReplCommand::parse(line)).await {
                            break;
                        }
                        continue;
                    }
                    self.send(line).await;
                }
                Ok(Signal::CtrlC) => {
                    println!("^C");
                    continue;
                }
                Ok(_) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        Ok(())
    }

    fn prompt_label(&self) -> String {
        match self.session.mode() {
            OperatingMode::Advisory => format!(
                "dojo [{}/{}]",
                self.session.state().phase().number(),
                PHASE_CATALOG.len()
            ),
            OperatingMode::Compliance => "dojo [compliance]".to_string(),
        }
    }

    fn progress(&self) -> Box<dyn TurnProgressNotifier> {
        if self.show_progress {
            Box::new(TurnSpinner::new())
        } else {
            Box::new(NoTurnProgress)
        }
    }

    async fn send(&mut self, line: &str) {
        println!();
        let progress = self.progress();
        let outcome = self.session.send(line, progress.as_ref()).await;
        Self::print_outcome(&outcome);
    }

    async fn apply(&mut self, action: PhaseAction) {
        let progress = self.progress();
        match self.session.apply_action(action, progress.as_ref()).await {
            Some(outcome) => {
                println!();
                Self::print_outcome(&outcome);
            }
            None if self.session.mode() != OperatingMode::Advisory => {
                println!("Phase navigation is only available in advisory mode.");
            }
            None => println!("Already at the last phase. Use /restart to begin again."),
        }
    }

    fn print_outcome(outcome: &TurnOutcome) {
        println!("{}", ConsoleFormatter::format(outcome));
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              startup-dojo chat              │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("{} {}", "Mode:".cyan().bold(), self.session.mode().short_description());
        println!("{} {}", "Model:".cyan().bold(), self.session.settings().model);
        println!();
        println!("{}", GREETING);
        println!();
        println!("Type /help for commands.");
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /next, /n          - Move to the next analysis phase");
        println!("  /deeper, /d        - Dig deeper into the current phase");
        println!("  /phase             - Show the current phase");
        println!("  /restart           - Go back to phase 1 (keeps history)");
        println!("  /reset             - Forget the conversation");
        println!("  /mode [MODE]       - Show or set mode (advisory, compliance)");
        println!("  /model [MODEL]     - Show or set the chat model");
        println!("  /topk [N]          - Show or set passages per turn");
        println!("  /quit, /exit, /q   - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, command: ReplCommand) -> bool {
        match command {
            ReplCommand::Quit => {
                println!("Bye!");
                return true;
            }
            ReplCommand::Help => Self::print_help(),
            ReplCommand::Next => self.apply(PhaseAction::Next).await,
            ReplCommand::DeepDive => self.apply(PhaseAction::DeepDive).await,
            ReplCommand::Phase => {
                let state = self.session.state();
                println!("Phase {}", state.phase());
                if state.is_complete() {
                    println!("All phases covered. Use /restart to begin again.");
                }
            }
            ReplCommand::ResetPhase => {
                self.session.reset_phase();
                println!("Back to phase {}", self.session.state().phase());
            }
            ReplCommand::Reset => {
                self.session.reset();
                println!("Conversation cleared.\n\n{}", GREETING);
            }
            ReplCommand::Mode(None) => {
                println!("Mode: {}", self.session.mode().short_description());
            }
            ReplCommand::Mode(Some(mode)) => {
                self.session.set_mode(mode);
                println!("Mode set to {}", mode);
            }
            ReplCommand::Model(None) => {
                println!("Current model: {}", self.session.settings().model);
                println!("Known models:");
                for model in ModelId::choices() {
                    println!("  - {}", model);
                }
            }
            ReplCommand::Model(Some(model)) => {
                println!("Model set to {}", model);
                self.session.set_model(model);
            }
            ReplCommand::TopK(None) => {
                println!("Passages per turn: {}", self.session.settings().top_k.get());
            }
            ReplCommand::TopK(Some(k)) => match self.session.set_top_k(k) {
                Ok(()) => println!("Passages per turn set to {}", k),
                Err(e) => println!("{}", e.to_string().red()),
            },
            ReplCommand::Unknown(line) => {
                println!("Unknown command: {}", line);
                println!("Type /help for available commands");
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_phase_commands() {
        assert_eq!(ReplCommand::parse("/next"), ReplCommand::Next);
        assert_eq!(ReplCommand::parse("/d"), ReplCommand::DeepDive);
        assert_eq!(ReplCommand::parse("/restart"), ReplCommand::ResetPhase);
        assert_eq!(ReplCommand::parse("/q"), ReplCommand::Quit);
    }

    #[test]
    fn test_parse_settings_commands() {
        assert_eq!(
            ReplCommand::parse("/mode compliance"),
            ReplCommand::Mode(Some(OperatingMode::Compliance))
        );
        assert_eq!(ReplCommand::parse("/mode"), ReplCommand::Mode(None));
        assert_eq!(ReplCommand::parse("/topk 5"), ReplCommand::TopK(Some(5)));
        assert_eq!(
            ReplCommand::parse("/model qwen-3-32b"),
            ReplCommand::Model(Some(ModelId::Qwen3_32b))
        );
    }

    #[test]
    fn test_parse_bad_arguments_are_unknown() {
        assert!(matches!(ReplCommand::parse("/topk many"), ReplCommand::Unknown(_)));
        assert!(matches!(ReplCommand::parse("/mode chaos"), ReplCommand::Unknown(_)));
        assert!(matches!(ReplCommand::parse("/teleport"), ReplCommand::Unknown(_)));
    }
}
