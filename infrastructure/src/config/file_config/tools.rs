//! Tools configuration from TOML (`[tools]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [tools]
//! search_model = "sonar-pro"
//! read_max_chars = 10000
//! calculator_interpreter = "python3"
//! calculator_timeout_seconds = 10
//! ```

use serde::{Deserialize, Serialize};

/// Raw `[tools]` configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Search backend (OpenAI-compatible chat endpoint)
    pub search_base_url: String,
    pub perplexity_api_key_env: String,
    pub search_model: String,
    pub search_timeout_seconds: u64,

    /// Fetch pages through the reader service instead of parsing HTML locally
    pub use_reader: bool,
    pub reader_base_url: String,
    /// Optional reader key
    pub jina_api_key_env: String,
    pub fetch_timeout_seconds: u64,
    /// Cap on page text fed back to the model
    pub read_max_chars: usize,

    /// Cap on `read` output shown in the tool trace
    pub display_max_chars: usize,

    pub calculator_interpreter: String,
    pub calculator_timeout_seconds: u64,
    pub calculator_memory_mb: u64,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            search_base_url: "https://api.perplexity.ai".to_string(),
            perplexity_api_key_env: "PERPLEXITY_API_KEY".to_string(),
            search_model: "sonar-pro".to_string(),
            search_timeout_seconds: 60,
            use_reader: true,
            reader_base_url: "https://r.jina.ai".to_string(),
            jina_api_key_env: "JINA_API_KEY".to_string(),
            fetch_timeout_seconds: 15,
            read_max_chars: 10_000,
            display_max_chars: 200,
            calculator_interpreter: "python3".to_string(),
            calculator_timeout_seconds: 10,
            calculator_memory_mb: 256,
        }
    }
}

impl FileToolsConfig {
    /// Longest deadline any single tool may need
    pub fn max_timeout_seconds(&self) -> u64 {
        self.search_timeout_seconds
            .max(self.fetch_timeout_seconds)
            .max(self.calculator_timeout_seconds)
    }
}
