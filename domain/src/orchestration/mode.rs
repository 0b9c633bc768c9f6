//! Operating modes.
//!
//! The mode decides which knowledge collection grounds a turn, how the
//! retrieval query is prefixed, and whether tools are offered to the model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which persona the session runs as.
///
/// - **Advisory**: startup mentor walking through the analysis phases,
///   with web search, page reading and calculation available.
/// - **Compliance**: legal guard answering from statute passages, no tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    #[default]
    Advisory,
    Compliance,
}

impl OperatingMode {
    /// Collection name used when configuration does not override it.
    pub fn default_collection(&self) -> &'static str {
        match self {
            OperatingMode::Advisory => "idea_frameworks",
            OperatingMode::Compliance => "legal_rag_gemma",
        }
    }

    /// Task prefix the collection's embeddings were produced with.
    ///
    /// Must match the ingestion side exactly or recall silently drops.
    pub fn query_task(&self) -> &'static str {
        match self {
            OperatingMode::Advisory => "search framework",
            OperatingMode::Compliance => "search result",
        }
    }

    /// Embedding input for a user query.
    pub fn format_query(&self, query: &str) -> String {
        format!("task: {} | query: {}", self.query_task(), query)
    }

    pub fn tools_enabled(&self) -> bool {
        matches!(self, OperatingMode::Advisory)
    }

    /// Whether the phase cursor specializes the prompt.
    pub fn uses_phases(&self) -> bool {
        matches!(self, OperatingMode::Advisory)
    }

    pub fn short_description(&self) -> &'static str {
        match self {
            OperatingMode::Advisory => "Advisory mode (mentor, tools on)",
            OperatingMode::Compliance => "Compliance mode (legal, tools off)",
        }
    }

    /// The other mode.
    pub fn toggle(&self) -> Self {
        match self {
            OperatingMode::Advisory => OperatingMode::Compliance,
            OperatingMode::Compliance => OperatingMode::Advisory,
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatingMode::Advisory => write!(f, "advisory"),
            OperatingMode::Compliance => write!(f, "compliance"),
        }
    }
}

impl std::str::FromStr for OperatingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "advisory" | "idea" | "a" => Ok(OperatingMode::Advisory),
            "compliance" | "legal" | "c" => Ok(OperatingMode::Compliance),
            _ => Err(format!("Invalid OperatingMode: {}", s)),
        }
    }
}
