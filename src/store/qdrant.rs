//! Qdrant-backed vector store
//!
//! One `papers` collection with cosine similarity over MiniLM embeddings.
//! Qdrant's cosine score (higher = more similar) is converted at this
//! boundary to a non-negative distance (lower = more similar) so the
//! grounding math is backend-independent.

use async_trait::async_trait;
use qdrant_client::{
    client::QdrantClient,
    qdrant::{
        vectors_config::Config, with_payload_selector::SelectorOptions, CreateCollection,
        Distance, PointStruct, SearchPoints, Value as QdrantValue, VectorParams, VectorsConfig,
        WithPayloadSelector,
    },
};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::embedding::Embedder;
use crate::errors::{AlraError, Result};
use crate::store::VectorStore;
use crate::types::{RetrievedPassage, ScoredPassage, SectionType};

const EMBEDDING_DIM: u64 = 384;

/// Vector store backed by a Qdrant instance
pub struct QdrantStore {
    client: QdrantClient,
    collection: String,
    embedder: Arc<Embedder>,
}

impl QdrantStore {
    /// Connect and ensure the collection exists
    pub async fn new(url: &str, collection: &str, embedder: Arc<Embedder>) -> Result<Self> {
        let client = QdrantClient::from_url(url)
            .build()
            .map_err(|e| AlraError::StoreError(format!("Failed to create Qdrant client: {e}")))?;

        let store = Self {
            client,
            collection: collection.to_string(),
            embedder,
        };
        store.ensure_collection().await?;

        Ok(store)
    }

    async fn ensure_collection(&self) -> Result<()> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| AlraError::StoreError(format!("Failed to list collections: {e}")))?;

        let exists = collections
            .collections
            .iter()
            .any(|c| c.name == self.collection);

        if !exists {
            self.client
                .create_collection(&CreateCollection {
                    collection_name: self.collection.clone(),
                    vectors_config: Some(VectorsConfig {
                        config: Some(Config::Params(VectorParams {
                            size: EMBEDDING_DIM,
                            distance: Distance::Cosine.into(),
                            ..Default::default()
                        })),
                    }),
                    ..Default::default()
                })
                .await
                .map_err(|e| {
                    AlraError::StoreError(format!(
                        "Failed to create collection {}: {e}",
                        self.collection
                    ))
                })?;
        }

        Ok(())
    }

    fn passage_payload(passage: &RetrievedPassage) -> HashMap<String, QdrantValue> {
        let mut payload = HashMap::new();
        payload.insert("text".to_string(), QdrantValue::from(passage.text.clone()));
        payload.insert(
            "source_id".to_string(),
            QdrantValue::from(passage.source_id.clone()),
        );
        payload.insert(
            "section_type".to_string(),
            QdrantValue::from(passage.section_type.label().to_lowercase()),
        );
        if let Some(page) = passage.page {
            payload.insert("page".to_string(), QdrantValue::from(page as i64));
        }
        if let Some(title) = &passage.paper_title {
            payload.insert("paper_title".to_string(), QdrantValue::from(title.clone()));
        }
        payload
    }

    fn payload_string(payload: &HashMap<String, QdrantValue>, key: &str) -> Option<String> {
        payload.get(key).and_then(|v| {
            use qdrant_client::qdrant::value::Kind;
            match v.kind.as_ref()? {
                Kind::StringValue(s) => Some(s.clone()),
                _ => None,
            }
        })
    }

    fn payload_u32(payload: &HashMap<String, QdrantValue>, key: &str) -> Option<u32> {
        payload.get(key).and_then(|v| {
            use qdrant_client::qdrant::value::Kind;
            match v.kind.as_ref()? {
                Kind::IntegerValue(i) => u32::try_from(*i).ok(),
                _ => None,
            }
        })
    }
}

#[async_trait]
impl VectorStore for QdrantStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredPassage>> {
        let query_vector = self
            .embedder
            .embed(query)
            .map_err(|e| AlraError::EmbeddingError(e.to_string()))?;

        let search_result = self
            .client
            .search_points(&SearchPoints {
                collection_name: self.collection.clone(),
                vector: query_vector,
                limit: k as u64,
                with_payload: Some(WithPayloadSelector {
                    selector_options: Some(SelectorOptions::Enable(true)),
                }),
                ..Default::default()
            })
            .await
            .map_err(|e| AlraError::StoreError(format!("Search failed: {e}")))?;

        let passages = search_result
            .result
            .into_iter()
            .map(|point| {
                let payload = point.payload;
                let passage = RetrievedPassage {
                    text: Self::payload_string(&payload, "text").unwrap_or_default(),
                    source_id: Self::payload_string(&payload, "source_id").unwrap_or_default(),
                    page: Self::payload_u32(&payload, "page"),
                    section_type: Self::payload_string(&payload, "section_type")
                        .map(|s| SectionType::parse(&s))
                        .unwrap_or_default(),
                    paper_title: Self::payload_string(&payload, "paper_title"),
                };

                ScoredPassage {
                    passage,
                    distance: (1.0 - point.score).max(0.0),
                }
            })
            .collect();

        Ok(passages)
    }

    async fn add_batch(&self, passages: Vec<RetrievedPassage>) -> Result<()> {
        if passages.is_empty() {
            return Ok(());
        }

        let texts: Vec<&str> = passages.iter().map(|p| p.text.as_str()).collect();
        let embeddings = self
            .embedder
            .embed_batch(&texts)
            .map_err(|e| AlraError::EmbeddingError(e.to_string()))?;

        let points: Vec<PointStruct> = passages
            .iter()
            .zip(embeddings)
            .map(|(passage, embedding)| {
                PointStruct::new(
                    Uuid::new_v4().to_string(),
                    embedding,
                    Self::passage_payload(passage),
                )
            })
            .collect();

        self.client
            .upsert_points_blocking(&self.collection, None, points, None)
            .await
            .map_err(|e| AlraError::StoreError(format!("Upsert failed: {e}")))?;

        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let info = self
            .client
            .collection_info(&self.collection)
            .await
            .map_err(|e| AlraError::StoreError(format!("Failed to get collection info: {e}")))?;

        Ok(info.result.and_then(|r| r.points_count).unwrap_or(0))
    }

    async fn reset(&self) -> Result<()> {
        self.client
            .delete_collection(&self.collection)
            .await
            .map_err(|e| AlraError::StoreError(format!("Failed to delete collection: {e}")))?;

        self.ensure_collection().await
    }
}
