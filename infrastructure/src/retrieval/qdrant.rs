//! Qdrant vector store over its REST API.
//!
//! `POST {url}/collections/{name}/points/search` with
//! `{vector, limit, with_payload: true}`. A 404 means the collection does not
//! exist; that is reported separately so the caller can log it clearly.

use async_trait::async_trait;
use dojo_application::ports::retrieval::{RetrievalError, ScoredPoint, VectorStorePort};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

pub struct QdrantStore {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl QdrantStore {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, RetrievalError> {
        Ok(Self {
            client: super::http_client(timeout)?,
            url: url.into().trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn search_url(&self, collection: &str) -> String {
        format!("{}/collections/{}/points/search", self.url, collection)
    }
}

#[async_trait]
impl VectorStorePort for QdrantStore {
    async fn query(
        &self,
        collection: &str,
        vector: &[f32],
        limit: usize,
    ) -> Result<Vec<ScoredPoint>, RetrievalError> {
        let url = self.search_url(collection);
        debug!(collection = %collection, limit, dims = vector.len(), "Querying vector store");

        let mut req = self.client.post(&url).json(&search_body(vector, limit));
        if let Some(key) = &self.api_key {
            req = req.header("api-key", key);
        }

        let resp = req.send().await.map_err(|e| {
            if e.is_timeout() {
                RetrievalError::Timeout
            } else {
                RetrievalError::VectorStore(e.to_string())
            }
        })?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|e| RetrievalError::VectorStore(e.to_string()))?;

        if status.as_u16() == 404 {
            return Err(RetrievalError::CollectionMissing(collection.to_string()));
        }
        if !status.is_success() {
            return Err(RetrievalError::VectorStore(format!(
                "HTTP {} - {}",
                status.as_u16(),
                body
            )));
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| RetrievalError::VectorStore(format!("invalid JSON: {}", e)))?;
        parse_search_response(&json)
    }
}

pub fn search_body(vector: &[f32], limit: usize) -> Value {
    json!({
        "vector": vector,
        "limit": limit,
        "with_payload": true,
    })
}

/// Parse `{"result": [{"id", "score", "payload"}]}`.
///
/// Points without a payload object keep an empty payload; the passage layer
/// turns those into empty bodies rather than dropping the hit.
pub fn parse_search_response(body: &Value) -> Result<Vec<ScoredPoint>, RetrievalError> {
    let hits = body
        .get("result")
        .and_then(|r| r.as_array())
        .ok_or_else(|| RetrievalError::VectorStore("missing result array".into()))?;

    Ok(hits
        .iter()
        .map(|hit| ScoredPoint {
            payload: hit
                .get("payload")
                .and_then(|p| p.as_object())
                .cloned()
                .unwrap_or_default(),
            score: hit.get("score").and_then(|s| s.as_f64()).unwrap_or(0.0),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_body() {
        let body = search_body(&[0.5, 0.25], 3);
        assert_eq!(body["limit"], 3);
        assert_eq!(body["with_payload"], true);
        assert_eq!(body["vector"][1], 0.25);
    }

    #[test]
    fn test_parse_search_response() {
        let body = json!({
            "result": [
                {"id": 1, "score": 0.91, "payload": {"title": "Lean Canvas", "text": "Nine boxes"}},
                {"id": 2, "score": 0.42, "payload": {"law_name": "Food Sanitation Act", "article_id": 52}},
                {"id": 3, "score": 0.10}
            ],
            "status": "ok",
            "time": 0.001
        });
        let points = parse_search_response(&body).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].payload["title"], "Lean Canvas");
        assert!((points[1].score - 0.42).abs() < 1e-9);
        assert!(points[2].payload.is_empty());
    }

    #[test]
    fn test_parse_search_response_without_result() {
        assert!(parse_search_response(&json!({"status": {"error": "bad"}})).is_err());
    }

    #[test]
    fn test_search_url() {
        let store = QdrantStore::new("http://localhost:6333/", Duration::from_secs(1)).unwrap();
        assert_eq!(
            store.search_url("idea_frameworks"),
            "http://localhost:6333/collections/idea_frameworks/points/search"
        );
    }
}
