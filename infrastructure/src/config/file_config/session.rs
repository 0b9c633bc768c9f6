//! Session configuration (`[session]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw `[session]` configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Mode at startup ("advisory" or "compliance")
    pub mode: String,
    /// Recent messages sent with each request
    pub history_window: usize,
    /// Run one round's tool calls concurrently
    pub parallel_tools: bool,
    /// JSONL transcript path
    pub log_file: Option<PathBuf>,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            mode: "advisory".to_string(),
            history_window: 10,
            parallel_tools: false,
            log_file: None,
        }
    }
}
