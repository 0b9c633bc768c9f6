//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! once validated.

mod chat;
mod retrieval;
mod session;
mod tools;

pub use chat::FileChatConfig;
pub use retrieval::FileRetrievalConfig;
pub use session::FileSessionConfig;
pub use tools::FileToolsConfig;

use dojo_application::{CollectionNames, ExecutionParams, SessionSettings};
use dojo_domain::{ModelId, OperatingMode, TopK};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Largest retrieval depth accepted from configuration
pub const MAX_TOP_K: usize = TopK::MAX;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Missing credential: environment variable {env} is not set ({purpose})")]
    MissingCredential { env: String, purpose: &'static str },

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("Failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),
}

impl ConfigurationError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat completion provider
    pub chat: FileChatConfig,
    /// Embedding service and vector store
    pub retrieval: FileRetrievalConfig,
    /// Search, read and calculator tools
    pub tools: FileToolsConfig,
    /// Per-session behaviour
    pub session: FileSessionConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigurationError> {
        let mut issues = Vec::new();

        if self.chat.model.trim().is_empty() {
            issues.push(ConfigurationError::invalid("chat.model", "model id cannot be empty"));
        }
        if self.chat.base_url.trim().is_empty() {
            issues.push(ConfigurationError::invalid("chat.base_url", "cannot be empty"));
        }
        if self.chat.max_rounds == 0 {
            issues.push(ConfigurationError::invalid("chat.max_rounds", "must be at least 1"));
        }
        if self.chat.max_tokens == 0 {
            issues.push(ConfigurationError::invalid("chat.max_tokens", "must be at least 1"));
        }
        if !(1..=MAX_TOP_K).contains(&self.retrieval.top_k) {
            issues.push(ConfigurationError::invalid(
                "retrieval.top_k",
                format!("{} is outside 1..={}", self.retrieval.top_k, MAX_TOP_K),
            ));
        }
        if self.tools.read_max_chars == 0 {
            issues.push(ConfigurationError::invalid("tools.read_max_chars", "must be at least 1"));
        }
        if self.session.mode.parse::<OperatingMode>().is_err() {
            issues.push(ConfigurationError::invalid(
                "session.mode",
                format!("unknown mode '{}'", self.session.mode),
            ));
        }

        let timeouts = [
            ("chat.timeout_seconds", self.chat.timeout_seconds),
            ("retrieval.timeout_seconds", self.retrieval.timeout_seconds),
            ("tools.search_timeout_seconds", self.tools.search_timeout_seconds),
            ("tools.fetch_timeout_seconds", self.tools.fetch_timeout_seconds),
            ("tools.calculator_timeout_seconds", self.tools.calculator_timeout_seconds),
        ];
        for (field, seconds) in timeouts {
            if seconds == 0 {
                issues.push(ConfigurationError::invalid(field, "timeout cannot be 0"));
            }
        }

        issues
    }

    /// Turn loop parameters derived from this configuration.
    pub fn execution_params(&self) -> ExecutionParams {
        ExecutionParams::default()
            .with_max_rounds(self.chat.max_rounds)
            .with_max_tokens(self.chat.max_tokens)
            .with_temperatures(self.chat.tool_temperature, self.chat.plain_temperature)
            .with_history_window(self.session.history_window)
            .with_parallel_tools(self.session.parallel_tools)
            .with_display_max_chars(self.tools.display_max_chars)
            .with_completion_timeout(Some(Duration::from_secs(self.chat.timeout_seconds)))
            // Each tool enforces its own deadline; this one only catches hangs
            .with_tool_timeout(Some(Duration::from_secs(self.tools.max_timeout_seconds() + 5)))
            .with_retrieval_timeout(Some(Duration::from_secs(self.retrieval.timeout_seconds)))
    }

    /// Initial session settings. Call after [`FileConfig::validate`].
    pub fn session_settings(&self) -> Result<SessionSettings, ConfigurationError> {
        let mode = self
            .session
            .mode
            .parse::<OperatingMode>()
            .map_err(|e| ConfigurationError::invalid("session.mode", e))?;
        let top_k = TopK::new(self.retrieval.top_k)
            .map_err(|e| ConfigurationError::invalid("retrieval.top_k", e.to_string()))?;
        Ok(SessionSettings {
            mode,
            model: ModelId::from(self.chat.model.as_str()),
            top_k,
        })
    }

    /// Render the effective configuration as TOML (for `--show-config`).
    pub fn to_toml_string(&self) -> Result<String, ConfigurationError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigurationError::invalid("config", e.to_string()))
    }

    pub fn collections(&self) -> CollectionNames {
        CollectionNames {
            advisory: self.retrieval.advisory_collection.clone(),
            compliance: self.retrieval.compliance_collection.clone(),
        }
    }
}

/// Read a required credential from the environment variable `env`.
pub fn require_credential(env: &str, purpose: &'static str) -> Result<String, ConfigurationError> {
    optional_credential(env).ok_or_else(|| ConfigurationError::MissingCredential {
        env: env.to_string(),
        purpose,
    })
}

/// Read an optional credential; empty values count as unset.
pub fn optional_credential(env: &str) -> Option<String> {
    std::env::var(env)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
