//! Retrieved passages and the grounding block built from them.

use crate::util::preview;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A passage returned by the vector store for one turn.
///
/// Transient and request-scoped: passages ground the system prompt and are
/// shown to the user, but are never stored in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    pub title: String,
    pub body: String,
    pub score: f64,
}

impl RetrievedPassage {
    pub fn new(title: impl Into<String>, body: impl Into<String>, score: f64) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            score,
        }
    }

    /// Build a passage from a vector-store payload.
    ///
    /// The title is `title` when present, otherwise `"{law_name} {article_id}"`.
    /// The body is `text`, falling back to `caption`.
    pub fn from_payload(payload: &Map<String, Value>, score: f64) -> Self {
        let title = match non_empty(payload, "title") {
            Some(title) => title,
            None => {
                let law = non_empty(payload, "law_name").unwrap_or_default();
                let article = non_empty(payload, "article_id").unwrap_or_default();
                format!("{} {}", law, article).trim().to_string()
            }
        };
        let body = non_empty(payload, "text")
            .or_else(|| non_empty(payload, "caption"))
            .unwrap_or_default();

        Self { title, body, score }
    }

    /// Block for this passage inside the grounding section.
    pub fn render(&self) -> String {
        format!("[Reference: {}]\n{}", self.title, self.body)
    }

    /// Short body excerpt for display.
    pub fn summary(&self, max_chars: usize) -> String {
        preview(&self.body, max_chars)
    }
}

/// Payload values may be strings or numbers (article ids often are).
fn non_empty(payload: &Map<String, Value>, key: &str) -> Option<String> {
    let value = match payload.get(key)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

/// Concatenate passages into the grounding block, blank-line separated.
///
/// Order is preserved as given (descending score from the store).
pub fn render_grounding_block(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .map(RetrievedPassage::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}
