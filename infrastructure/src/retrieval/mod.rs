//! Retrieval adapters: embedding service and vector store.

pub mod embedding;
pub mod qdrant;

pub use embedding::OpenAiEmbeddingClient;
pub use qdrant::QdrantStore;

use dojo_application::ports::retrieval::RetrievalError;

fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client, RetrievalError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| RetrievalError::VectorStore(format!("HTTP client setup failed: {}", e)))
}
