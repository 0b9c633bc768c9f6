//! OpenAI-compatible embedding client.
//!
//! `POST {base_url}/embeddings` with `{model, input}`; the first vector of
//! `data[]` is L2-normalised before it is handed to the vector store, matching
//! how the collections were indexed.

use async_trait::async_trait;
use dojo_application::ports::retrieval::{EmbeddingPort, RetrievalError};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

pub struct OpenAiEmbeddingClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAiEmbeddingClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RetrievalError> {
        Ok(Self {
            client: super::http_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingPort for OpenAiEmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
        let url = format!("{}/embeddings", self.base_url);
        debug!(url = %url, model = %self.model, chars = text.chars().count(), "Embedding query");

        let mut req = self
            .client
            .post(&url)
            .json(&json!({ "model": self.model, "input": text }));
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                RetrievalError::Timeout
            } else {
                RetrievalError::Embedding(e.to_string())
            }
        })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RetrievalError::Embedding(e.to_string()))?;
        if !status.is_success() {
            return Err(RetrievalError::Embedding(format!(
                "HTTP {} - {}",
                status.as_u16(),
                body
            )));
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| RetrievalError::Embedding(format!("invalid JSON: {}", e)))?;
        parse_embedding(&json).map(normalize)
    }
}

/// Extract `data[0].embedding`
pub fn parse_embedding(body: &Value) -> Result<Vec<f32>, RetrievalError> {
    let vector: Vec<f32> = body
        .get("data")
        .and_then(|d| d.as_array())
        .and_then(|a| a.first())
        .and_then(|item| item.get("embedding"))
        .and_then(|e| e.as_array())
        .ok_or_else(|| RetrievalError::Embedding("missing data[0].embedding".into()))?
        .iter()
        .filter_map(|v| v.as_f64().map(|f| f as f32))
        .collect();

    if vector.is_empty() {
        return Err(RetrievalError::Embedding("empty embedding".into()));
    }
    Ok(vector)
}

/// Scale to unit length; a zero vector is returned unchanged
pub fn normalize(mut vector: Vec<f32>) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|x| *x /= norm);
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_embedding() {
        let body = json!({"data": [{"embedding": [3.0, 4.0], "index": 0}], "model": "m"});
        assert_eq!(parse_embedding(&body).unwrap(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_parse_embedding_missing_data() {
        assert!(matches!(
            parse_embedding(&json!({"error": "overloaded"})),
            Err(RetrievalError::Embedding(_))
        ));
        assert!(parse_embedding(&json!({"data": [{"embedding": []}]})).is_err());
    }

    #[test]
    fn test_normalize() {
        let v = normalize(vec![3.0, 4.0]);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
        assert_eq!(normalize(vec![0.0, 0.0]), vec![0.0, 0.0]);
    }
}
