//! Embedding provider collaborators.
//!
//! The pipeline treats embedding as a blocking external call with a defined
//! success/failure result. [`MockEmbeddingProvider`] keeps tests and local
//! runs deterministic; [`HttpEmbeddingProvider`] talks to a hosted model.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::types::PipelineError;

/// Maps text to a fixed-length vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single text.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Provider`] on credential, network, or rate-limit
    /// failures.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError>;

    /// Embed a batch, preserving input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, PipelineError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Vector length produced by this provider.
    fn dimensions(&self) -> usize;
}

// ── MockEmbeddingProvider ──────────────────────────────────────────────

/// Deterministic hash-based embeddings for tests and offline runs.
///
/// Identical text always maps to the identical vector; different text almost
/// always differs.
#[derive(Debug, Clone)]
pub struct MockEmbeddingProvider {
    dimensions: usize,
}

impl Default for MockEmbeddingProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbeddingProvider {
    pub fn new() -> Self {
        Self { dimensions: 8 }
    }

    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    fn hash_to_vec(&self, text: &str) -> Vec<f32> {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        let seed = hasher.finish();
        (0..self.dimensions)
            .map(|i| {
                let bits = seed.rotate_left((i % 8) as u32 * 8) ^ ((i as u64) << 24);
                (bits as f32) / u32::MAX as f32
            })
            .collect()
    }
}

#[async_trait]
impl EmbeddingProvider for MockEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
        Ok(self.hash_to_vec(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── HttpEmbeddingProvider ──────────────────────────────────────────────

/// Remote embedding provider speaking the common `{"data": [{"embedding":
/// [...]}]}` response shape over HTTPS with bearer credentials.
pub struct HttpEmbeddingProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
    dimensions: usize,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
}

impl HttpEmbeddingProvider {
    /// # Errors
    ///
    /// [`PipelineError::Provider`] when the API key is empty — an
    /// unrecoverable credential problem surfaced before any request is made.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        dimensions: usize,
    ) -> Result<Self, PipelineError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(PipelineError::Provider(
                "embedding API key is missing".to_string(),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
            model: model.into(),
            dimensions,
        })
    }

    /// Builds a provider from `QASMITH_EMBED_URL`, `QASMITH_EMBED_API_KEY`,
    /// and `QASMITH_EMBED_MODEL`.
    pub fn from_env() -> Result<Self, PipelineError> {
        let endpoint = std::env::var("QASMITH_EMBED_URL")
            .map_err(|_| PipelineError::Provider("QASMITH_EMBED_URL is not set".to_string()))?;
        let api_key = std::env::var("QASMITH_EMBED_API_KEY")
            .map_err(|_| PipelineError::Provider("QASMITH_EMBED_API_KEY is not set".to_string()))?;
        let model =
            std::env::var("QASMITH_EMBED_MODEL").unwrap_or_else(|_| "all-MiniLM-L6-v2".to_string());
        Self::new(endpoint, api_key, model, 384)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, PipelineError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&json!({ "model": self.model, "input": text }))
            .send()
            .await
            .map_err(|err| PipelineError::Provider(err.to_string()))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PipelineError::Provider("rate limited".to_string()));
        }
        let response = response
            .error_for_status()
            .map_err(|err| PipelineError::Provider(err.to_string()))?;

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|err| PipelineError::Provider(err.to_string()))?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|row| row.embedding)
            .ok_or_else(|| PipelineError::Provider("empty embedding response".to_string()))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_embeddings_are_deterministic() {
        let provider = MockEmbeddingProvider::new();
        let a = provider.embed("Hello world").await.unwrap();
        let b = provider.embed("Hello world").await.unwrap();
        let c = provider.embed("Goodbye world").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), provider.dimensions());
    }

    #[tokio::test]
    async fn dimensions_are_configurable() {
        let provider = MockEmbeddingProvider::new().with_dimensions(384);
        let embedding = provider.embed("text").await.unwrap();
        assert_eq!(embedding.len(), 384);
    }

    #[tokio::test]
    async fn batch_preserves_order() {
        let provider = MockEmbeddingProvider::new();
        let texts = vec!["one".to_string(), "two".to_string()];
        let batch = provider.embed_batch(&texts).await.unwrap();
        assert_eq!(batch[0], provider.embed("one").await.unwrap());
        assert_eq!(batch[1], provider.embed("two").await.unwrap());
    }

    #[test]
    fn empty_api_key_is_a_provider_error() {
        let result = HttpEmbeddingProvider::new("http://localhost", "  ", "model", 8);
        assert!(matches!(result, Err(PipelineError::Provider(_))));
    }
}
