//! Chunk indexing: embed chunk text, persist it, and search it back.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::embeddings::EmbeddingProvider;
use crate::stores::{Backend, ChunkRecord};
use crate::types::PipelineError;

/// Feeds chunk text through the embedding provider into the chunk store.
pub struct ChunkIndexer<B: Backend> {
    provider: Arc<dyn EmbeddingProvider>,
    store: B,
}

impl<B: Backend> ChunkIndexer<B> {
    pub fn new(provider: Arc<dyn EmbeddingProvider>, store: B) -> Self {
        Self { provider, store }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &B {
        &self.store
    }

    /// Embeds and persists `chunks` under `source`, returning the assigned
    /// ids in chunk order.
    ///
    /// A provider failure aborts only the chunk being embedded; the failure
    /// is logged and the remaining chunks continue. Storage failures abort
    /// the run.
    pub async fn index(
        &self,
        source: &str,
        chunks: &[String],
    ) -> Result<Vec<String>, PipelineError> {
        let mut ids = Vec::with_capacity(chunks.len());
        for (chunk_index, content) in chunks.iter().enumerate() {
            let embedding = match self.provider.embed(content).await {
                Ok(embedding) => embedding,
                Err(err) => {
                    warn!(chunk_index, error = %err, "skipping chunk: embedding failed");
                    continue;
                }
            };
            let id = Uuid::new_v4().to_string();
            let record = ChunkRecord::new(id.clone(), source, chunk_index, content.clone())
                .with_embedding(embedding);
            self.store.insert_chunks(vec![record]).await?;
            ids.push(id);
        }
        debug!(
            indexed = ids.len(),
            total = chunks.len(),
            "indexing complete"
        );
        Ok(ids)
    }

    /// Embeds `query` and returns the `k` nearest chunk texts, nearest
    /// first.
    ///
    /// Unlike per-chunk indexing, a provider failure here aborts the whole
    /// search: the query embedding is a single required call.
    pub async fn search(&self, query: &str, k: usize) -> Result<Vec<String>, PipelineError> {
        let embedding = self.provider.embed(query).await?;
        let hits = self.store.search_similar(&embedding, k).await?;
        Ok(hits.into_iter().map(|(record, _)| record.content).collect())
    }
}
