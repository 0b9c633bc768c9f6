//! Retrieval ports
//!
//! Embedding service and vector store used to ground each turn.
//! Both are best-effort: callers recover from [`RetrievalError`] locally.

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors from the embedding service or vector store
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RetrievalError {
    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Collection not found: {0}")]
    CollectionMissing(String),

    #[error("Retrieval timed out")]
    Timeout,
}

/// A vector-store hit
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPoint {
    pub payload: Map<String, Value>,
    pub score: f64,
}

/// Text → fixed-size vector
#[async_trait]
pub trait EmbeddingPort: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError>;
}

/// Nearest-neighbor search over a named collection
#[async_trait]
pub trait VectorStorePort: Send + Sync {
    /// Up to `limit` hits, best first
    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, RetrievalError>;
}
