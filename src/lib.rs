//! ```text
//! Raw bytes ──► extract::TextExtractor ──► document text
//!
//! Document text ──► segmentation (paragraphs ─► sentences ─► chunks)
//!                                     │
//!                  signals::SignalExtractor (entities, headers, triggers)
//!                                     │
//!                  templates::TemplateEngine (ordered rule set)
//!                                     │
//!                  synthesis::QaSynthesizer ──► deduplicated QaPair list
//!
//! Chunks ──► indexer::ChunkIndexer ──► embeddings ──► stores::Backend
//!                                                │
//!                    search(query, k) ◄──────────┘
//! ```
//!
//! qasmith turns unstructured document text into two derived artifacts:
//! budget-bounded chunks ready for embedding and retrieval, and synthetic
//! question/answer pairs produced by an ordered set of heuristic template
//! rules. Answers are always verbatim spans of the source; only the
//! questions are synthesized.
//!
//! External capabilities (text extraction, entity tagging, embedding,
//! storage) are collaborator traits injected by the caller, never global
//! state.

pub mod config;
pub mod embeddings;
pub mod extract;
pub mod indexer;
pub mod segmentation;
pub mod signals;
pub mod stores;
pub mod synthesis;
pub mod templates;
pub mod types;

pub use config::{ChunkingConfig, ChunkingMode, SynthesisConfig};
pub use indexer::ChunkIndexer;
pub use synthesis::QaSynthesizer;
pub use types::{PipelineError, QaPair};
