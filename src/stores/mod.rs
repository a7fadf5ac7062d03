//! Storage backends for chunk text and embedding vectors.
//!
//! The [`Backend`] trait gives the indexer a database-agnostic interface;
//! [`sqlite::SqliteChunkStore`] is the bundled implementation, using
//! `sqlite-vec` for nearest-neighbor search. The store is append-only from
//! the pipeline's point of view: repeated insertion of the same chunk is not
//! deduplicated.

pub mod sqlite;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::PipelineError;

pub use sqlite::SqliteChunkStore;

/// A chunk with its embedding, ready for storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChunkRecord {
    /// Opaque identifier assigned at insertion time.
    pub id: String,
    /// Source document label or path.
    pub source: String,
    /// Zero-based position of this chunk within the source.
    pub chunk_index: usize,
    /// The chunk text.
    pub content: String,
    /// The embedding vector, when computed.
    pub embedding: Option<Vec<f32>>,
}

impl ChunkRecord {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        chunk_index: usize,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            chunk_index,
            content: content.into(),
            embedding: None,
        }
    }

    /// Attach the embedding vector.
    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// Unified interface for chunk storage backends.
///
/// Writes must be serialized by the implementation; at-least-once insert
/// semantics are acceptable.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Insert chunk records. Records carrying embeddings become searchable.
    async fn insert_chunks(&self, chunks: Vec<ChunkRecord>) -> Result<(), PipelineError>;

    /// Retrieve a chunk by its id, or `None` when no row matches.
    async fn get_chunk_by_id(&self, id: &str) -> Result<Option<ChunkRecord>, PipelineError>;

    /// Retrieve all chunks recorded for a source, in insertion order.
    async fn get_chunks_by_source(&self, source: &str) -> Result<Vec<ChunkRecord>, PipelineError>;

    /// Nearest-neighbor search over stored embeddings.
    ///
    /// Returns up to `top_k` `(record, cosine distance)` pairs, nearest
    /// first.
    async fn search_similar(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<(ChunkRecord, f32)>, PipelineError>;

    /// Total number of stored chunks.
    async fn count(&self) -> Result<usize, PipelineError>;
}
