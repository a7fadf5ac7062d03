//! Shared record types and the pipeline error taxonomy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by the synthesis and indexing pipelines.
///
/// `Input` and `Extraction` abort the whole invocation. `Provider` aborts the
/// item being processed when raised inside a per-chunk loop and the whole run
/// when raised by a single required call (embedding a search query). Template
/// formatting problems never appear here; formatters degrade locally instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Required input text was empty or missing.
    #[error("input error: {0}")]
    Input(String),

    /// Source bytes could not be decoded into text.
    #[error("extraction failed: {0}")]
    Extraction(String),

    /// An external collaborator (embedding provider, tagger) failed.
    #[error("provider error: {0}")]
    Provider(String),

    /// The vector store rejected an operation.
    #[error("storage error: {0}")]
    Storage(String),

    /// A static pattern table failed to compile at construction time.
    #[error("pattern compilation failed: {0}")]
    Pattern(String),

    /// Filesystem or stream failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A synthesized question paired with a verbatim answer span.
///
/// `answer` is always a sentence or paragraph lifted from the source document;
/// only `question` is synthesized. `context` carries the enclosing paragraph
/// for sentence-level rules and is omitted when the answer already is the
/// paragraph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            context: None,
        }
    }

    /// Attach the enclosing context for this pair.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Normalized key used for case-insensitive question deduplication.
    pub fn dedup_key(&self) -> String {
        self.question.trim().to_lowercase()
    }
}
