//! Infrastructure layer for startup-dojo
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod retrieval;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigurationError, FileChatConfig, FileConfig, FileRetrievalConfig,
    FileSessionConfig, FileToolsConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::OpenAiCompatClient;
pub use retrieval::{OpenAiEmbeddingClient, QdrantStore};
pub use tools::{
    BuiltinToolExecutor, JsonSchemaToolConverter, PerplexitySearch, PythonCalculator,
    WebPageReader,
};
