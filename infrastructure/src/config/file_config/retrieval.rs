//! Retrieval configuration (`[retrieval]` section)
//!
//! ```toml
//! [retrieval]
//! qdrant_url = "http://localhost:6333"
//! advisory_collection = "idea_frameworks"
//! compliance_collection = "legal_rag_gemma"
//! top_k = 3
//! embedding_base_url = "http://localhost:8080/v1"
//! embedding_model = "google/embeddinggemma-300m"
//! ```
//!
//! `QDRANT_HOST` / `QDRANT_PORT` in the environment override the host and
//! port of `qdrant_url`, matching how container setups wire the store.

use serde::{Deserialize, Serialize};

/// Raw `[retrieval]` configuration from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    pub qdrant_url: String,
    /// Environment variable with a Qdrant API key (optional)
    pub qdrant_api_key_env: String,
    pub advisory_collection: String,
    pub compliance_collection: String,
    pub top_k: usize,
    /// OpenAI-compatible embeddings endpoint root
    pub embedding_base_url: String,
    pub embedding_model: String,
    /// Environment variable with the embeddings API key (optional)
    pub embedding_api_key_env: String,
    pub timeout_seconds: u64,
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        Self {
            qdrant_url: "http://localhost:6333".to_string(),
            qdrant_api_key_env: "QDRANT_API_KEY".to_string(),
            advisory_collection: "idea_frameworks".to_string(),
            compliance_collection: "legal_rag_gemma".to_string(),
            top_k: 3,
            embedding_base_url: "http://localhost:8080/v1".to_string(),
            embedding_model: "google/embeddinggemma-300m".to_string(),
            embedding_api_key_env: "EMBEDDING_API_KEY".to_string(),
            timeout_seconds: 20,
        }
    }
}

impl FileRetrievalConfig {
    /// Apply `QDRANT_HOST` / `QDRANT_PORT` overrides.
    pub fn apply_qdrant_overrides(&mut self, host: Option<String>, port: Option<String>) {
        if host.is_none() && port.is_none() {
            return;
        }
        let (scheme, rest) = self
            .qdrant_url
            .split_once("://")
            .unwrap_or(("http", self.qdrant_url.as_str()));
        let authority = rest.split('/').next().unwrap_or_default();
        let (current_host, current_port) = match authority.rsplit_once(':') {
            Some((h, p)) => (h, Some(p)),
            None => (authority, None),
        };

        let host = host.unwrap_or_else(|| current_host.to_string());
        let url = match port.as_deref().or(current_port) {
            Some(port) => format!("{}://{}:{}", scheme, host, port),
            None => format!("{}://{}", scheme, host),
        };
        self.qdrant_url = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_override_keeps_port() {
        let mut config = FileRetrievalConfig::default();
        config.apply_qdrant_overrides(Some("qdrant".into()), None);
        assert_eq!(config.qdrant_url, "http://qdrant:6333");
    }

    #[test]
    fn test_port_override_keeps_host() {
        let mut config = FileRetrievalConfig::default();
        config.apply_qdrant_overrides(None, Some("7000".into()));
        assert_eq!(config.qdrant_url, "http://localhost:7000");
    }

    #[test]
    fn test_no_override_is_noop() {
        let mut config = FileRetrievalConfig::default();
        config.qdrant_url = "https://cloud.example.com:6333/".into();
        config.apply_qdrant_overrides(None, None);
        assert_eq!(config.qdrant_url, "https://cloud.example.com:6333/");
    }
}
