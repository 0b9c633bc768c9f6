//! Retrieval domain
//!
//! Passages pulled from the knowledge collections, the grounding block
//! rendered from them, and the retrieval depth.

pub mod passage;
pub mod top_k;

pub use passage::{RetrievedPassage, render_grounding_block};
pub use top_k::TopK;
