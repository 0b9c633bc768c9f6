//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for startup-dojo
#[derive(Parser, Debug)]
#[command(name = "startup-dojo")]
#[command(author, version, about = "Startup mentor chat grounded on a framework knowledge base")]
#[command(long_about = r#"
startup-dojo walks a business idea through ten analysis phases (STEEP, Five
Forces, Lean Canvas, ... Final summary). Each answer is grounded on passages
retrieved from a vector store and may use web search, page reading and a
Python calculator. Compliance mode answers legal questions from statute
passages instead, without tools.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./dojo.toml         Project-level config
3. ~/.config/startup-dojo/config.toml   Global config
Environment variables prefixed DOJO_ override all files (DOJO_CHAT__MODEL=...).

Example:
  startup-dojo
  startup-dojo --mode compliance "Do I need a permit to sell homemade jam?"
  startup-dojo -m qwen-3-32b --top-k 5
"#)]
pub struct Cli {
    /// Ask one question and exit instead of starting the chat loop
    pub question: Option<String>,

    /// Operating mode: advisory (default) or compliance
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Chat model id (e.g. llama-3.3-70b, gpt-oss-120b)
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Number of knowledge passages retrieved per turn (1-10)
    #[arg(short = 'k', long, value_name = "N")]
    pub top_k: Option<usize>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Append a JSONL transcript of every turn to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Show configuration sources and the effective configuration, then exit
    #[arg(long)]
    pub show_config: bool,
}
