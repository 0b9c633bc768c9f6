//! Build Context use case.
//!
//! Turns a user query into the system prompt for a turn: embeds the query
//! with the mode's task prefix, searches the mode's collection, renders the
//! hits into a grounding block and places it under the mode's template.
//!
//! Retrieval is best-effort. Any embedding or vector-store failure (or a
//! timeout) yields zero passages and the prompt still renders.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::progress::TurnProgressNotifier;
use crate::ports::retrieval::{EmbeddingPort, RetrievalError, VectorStorePort};
use dojo_domain::{
    ModelId, OperatingMode, RetrievedPassage, SessionPhase, SystemPromptTemplate, TopK,
    render_grounding_block,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Collection searched for each mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    pub advisory: String,
    pub compliance: String,
}

impl CollectionNames {
    pub fn for_mode(&self, mode: OperatingMode) -> &str {
        match mode {
            OperatingMode::Advisory => &self.advisory,
            OperatingMode::Compliance => &self.compliance,
        }
    }
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self {
            advisory: OperatingMode::Advisory.default_collection().to_string(),
            compliance: OperatingMode::Compliance.default_collection().to_string(),
        }
    }
}

/// Input for the [`BuildContextUseCase`].
#[derive(Debug, Clone)]
pub struct BuildContextInput {
    pub query: String,
    pub mode: OperatingMode,
    pub phase: SessionPhase,
    pub model: ModelId,
    pub top_k: TopK,
}

/// System prompt plus the passages that grounded it.
#[derive(Debug, Clone)]
pub struct BuiltContext {
    pub system_prompt: String,
    pub passages: Vec<RetrievedPassage>,
}

/// Use case for building the grounded system prompt of a turn.
pub struct BuildContextUseCase {
    embedder: Arc<dyn EmbeddingPort>,
    store: Arc<dyn VectorStorePort>,
    collections: CollectionNames,
    timeout: Option<Duration>,
    conversation_logger: Arc<dyn ConversationLogger>,
}

impl BuildContextUseCase {
    pub fn new(embedder: Arc<dyn EmbeddingPort>, store: Arc<dyn VectorStorePort>) -> Self {
        Self {
            embedder,
            store,
            collections: CollectionNames::default(),
            timeout: None,
            conversation_logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_collections(mut self, collections: CollectionNames) -> Self {
        self.collections = collections;
        self
    }

    /// Deadline for embedding plus search together.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn collections(&self) -> &CollectionNames {
        &self.collections
    }

    pub async fn execute(
        &self,
        input: BuildContextInput,
        progress: &dyn TurnProgressNotifier,
    ) -> BuiltContext {
        let collection = self.collections.for_mode(input.mode);
        progress.on_retrieval_start(collection);

        let passages = match self.retrieve(&input, collection).await {
            Ok(passages) => passages,
            Err(e) => {
                warn!(collection, error = %e, "Retrieval failed, continuing without grounding");
                Vec::new()
            }
        };
        debug!(collection, hits = passages.len(), "Retrieval finished");
        progress.on_retrieval_complete(&passages);

        self.conversation_logger.log(ConversationEvent::new(
            "retrieval",
            serde_json::json!({
                "collection": collection,
                "top_k": input.top_k.get(),
                "hits": passages.iter().map(|p| serde_json::json!({
                    "title": p.title,
                    "score": p.score,
                })).collect::<Vec<_>>(),
            }),
        ));

        let base = SystemPromptTemplate::base(input.mode, input.model.as_str(), input.phase);
        let system_prompt = SystemPromptTemplate::compose(&base, &render_grounding_block(&passages));

        BuiltContext {
            system_prompt,
            passages,
        }
    }

    async fn retrieve(
        &self,
        input: &BuildContextInput,
        collection: &str,
    ) -> Result<Vec<RetrievedPassage>, RetrievalError> {
        let search = async {
            let vector = self.embedder.embed(&input.mode.format_query(&input.query)).await?;
            let points = self
                .store
                .query(collection, &vector, input.top_k.get())
                .await?;
            Ok::<_, RetrievalError>(points)
        };

        let points = match self.timeout {
            Some(deadline) => tokio::time::timeout(deadline, search)
                .await
                .map_err(|_| RetrievalError::Timeout)??,
            None => search.await?,
        };

        let mut passages: Vec<RetrievedPassage> = points
            .iter()
            .map(|p| RetrievedPassage::from_payload(&p.payload, p.score))
            .collect();
        passages.sort_by(|a, b| b.score.total_cmp(&a.score));
        passages.truncate(input.top_k.get());
        Ok(passages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::progress::NoTurnProgress;
    use crate::ports::retrieval::ScoredPoint;
    use async_trait::async_trait;
    use dojo_domain::GROUNDING_HEADER;
    use serde_json::{Map, Value, json};
    use std::sync::Mutex;

    // ==================== Test Mocks ====================

    struct RecordingEmbedder {
        inputs: Mutex<Vec<String>>,
        fail: bool,
    }

    impl RecordingEmbedder {
        fn ok() -> Self {
            Self {
                inputs: Mutex::new(Vec::new()),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                inputs: Mutex::new(Vec::new()),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl EmbeddingPort for RecordingEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, RetrievalError> {
            self.inputs.lock().unwrap().push(text.to_string());
            if self.fail {
                return Err(RetrievalError::Embedding("model unavailable".into()));
            }
            Ok(vec![0.1, 0.2, 0.3])
        }
    }

    enum StoreBehavior {
        Hits(Vec<ScoredPoint>),
        Fail(RetrievalError),
        Hang,
    }

    struct MockStore {
        behavior: StoreBehavior,
        calls: Mutex<Vec<(String, usize)>>,
    }

    impl MockStore {
        fn new(behavior: StoreBehavior) -> Self {
            Self {
                behavior,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl VectorStorePort for MockStore {
        async fn query(
            &self,
            collection: &str,
            _vector: &[f32],
            limit: usize,
        ) -> Result<Vec<ScoredPoint>, RetrievalError> {
            self.calls
                .lock()
                .unwrap()
                .push((collection.to_string(), limit));
            match &self.behavior {
                StoreBehavior::Hits(points) => Ok(points.clone()),
                StoreBehavior::Fail(e) => Err(e.clone()),
                StoreBehavior::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(vec![])
                }
            }
        }
    }

    fn point(payload: Value, score: f64) -> ScoredPoint {
        let payload: Map<String, Value> = match payload {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        };
        ScoredPoint { payload, score }
    }

    fn input(query: &str, mode: OperatingMode, top_k: usize) -> BuildContextInput {
        BuildContextInput {
            query: query.to_string(),
            mode,
            phase: SessionPhase::first(),
            model: ModelId::default(),
            top_k: TopK::new(top_k).unwrap(),
        }
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_advisory_uses_framework_prefix_and_collection() {
        let embedder = Arc::new(RecordingEmbedder::ok());
        let store = Arc::new(MockStore::new(StoreBehavior::Hits(vec![point(
            json!({"title": "STEEP", "text": "Social, Technological, ..."}),
            0.9,
        )])));
        let use_case = BuildContextUseCase::new(embedder.clone(), store.clone());

        let built = use_case
            .execute(input("market size?", OperatingMode::Advisory, 3), &NoTurnProgress)
            .await;

        assert_eq!(
            embedder.inputs.lock().unwrap()[0],
            "task: search framework | query: market size?"
        );
        assert_eq!(
            store.calls.lock().unwrap()[0],
            ("idea_frameworks".to_string(), 3)
        );
        assert_eq!(built.passages.len(), 1);
        assert!(built.system_prompt.contains("[Reference: STEEP]\nSocial, Technological, ..."));
        assert!(built.system_prompt.contains("Current analysis phase: STEEP analysis."));
    }

    #[tokio::test]
    async fn test_compliance_uses_result_prefix_and_custom_collection() {
        let embedder = Arc::new(RecordingEmbedder::ok());
        let store = Arc::new(MockStore::new(StoreBehavior::Hits(vec![])));
        let use_case = BuildContextUseCase::new(embedder.clone(), store.clone()).with_collections(
            CollectionNames {
                advisory: "a".into(),
                compliance: "laws_v2".into(),
            },
        );

        use_case
            .execute(input("is this legal?", OperatingMode::Compliance, 5), &NoTurnProgress)
            .await;

        assert_eq!(
            embedder.inputs.lock().unwrap()[0],
            "task: search result | query: is this legal?"
        );
        assert_eq!(store.calls.lock().unwrap()[0], ("laws_v2".to_string(), 5));
    }

    #[tokio::test]
    async fn test_store_failure_yields_empty_passages_and_prompt_still_renders() {
        let store = Arc::new(MockStore::new(StoreBehavior::Fail(
            RetrievalError::CollectionMissing("legal_rag_gemma".into()),
        )));
        let use_case = BuildContextUseCase::new(Arc::new(RecordingEmbedder::ok()), store);

        let built = use_case
            .execute(input("q", OperatingMode::Compliance, 3), &NoTurnProgress)
            .await;

        assert!(built.passages.is_empty());
        assert!(built.system_prompt.ends_with(&format!("{}\n", GROUNDING_HEADER)));
    }

    #[tokio::test]
    async fn test_embedding_failure_skips_store() {
        let store = Arc::new(MockStore::new(StoreBehavior::Hits(vec![])));
        let use_case =
            BuildContextUseCase::new(Arc::new(RecordingEmbedder::failing()), store.clone());

        let built = use_case
            .execute(input("q", OperatingMode::Advisory, 3), &NoTurnProgress)
            .await;

        assert!(built.passages.is_empty());
        assert!(store.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_timeout_yields_empty_passages() {
        let use_case = BuildContextUseCase::new(
            Arc::new(RecordingEmbedder::ok()),
            Arc::new(MockStore::new(StoreBehavior::Hang)),
        )
        .with_timeout(Some(Duration::from_millis(50)));

        let built = use_case
            .execute(input("q", OperatingMode::Advisory, 3), &NoTurnProgress)
            .await;

        assert!(built.passages.is_empty());
    }

    #[tokio::test]
    async fn test_passages_sorted_by_descending_score_and_capped() {
        let store = Arc::new(MockStore::new(StoreBehavior::Hits(vec![
            point(json!({"title": "low", "text": "c"}), 0.1),
            point(json!({"title": "high", "text": "a"}), 0.9),
            point(json!({"title": "mid", "text": "b"}), 0.5),
        ])));
        let use_case = BuildContextUseCase::new(Arc::new(RecordingEmbedder::ok()), store);

        let built = use_case
            .execute(input("q", OperatingMode::Advisory, 2), &NoTurnProgress)
            .await;

        let titles: Vec<&str> = built.passages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["high", "mid"]);
        let high = built.system_prompt.find("[Reference: high]").unwrap();
        let mid = built.system_prompt.find("[Reference: mid]").unwrap();
        assert!(high < mid);
    }
}
