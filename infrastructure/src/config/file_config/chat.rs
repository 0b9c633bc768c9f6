//! Chat completion configuration (`[chat]` section)
//!
//! ```toml
//! [chat]
//! base_url = "https://api.cerebras.ai/v1"
//! api_key_env = "CEREBRAS_API_KEY"
//! model = "llama-3.3-70b"
//! max_rounds = 2
//! ```

use serde::{Deserialize, Serialize};

/// Raw `[chat]` configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// OpenAI-compatible endpoint root
    pub base_url: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
    /// Default model id
    pub model: String,
    pub max_tokens: u32,
    /// First-round temperature when tools are offered
    pub tool_temperature: f32,
    /// First-round temperature in tool-less mode
    pub plain_temperature: f32,
    pub timeout_seconds: u64,
    /// Completion requests per turn, including the final tool-less one
    pub max_rounds: usize,
}

impl Default for FileChatConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.cerebras.ai/v1".to_string(),
            api_key_env: "CEREBRAS_API_KEY".to_string(),
            model: "llama-3.3-70b".to_string(),
            max_tokens: 2048,
            tool_temperature: 0.8,
            plain_temperature: 0.1,
            timeout_seconds: 60,
            max_rounds: 2,
        }
    }
}
