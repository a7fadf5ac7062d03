//! Configuration for chunking and synthesis.
//!
//! All setters follow the builder convention and are `#[must_use]`.

use serde::{Deserialize, Serialize};

/// Strategy used when cutting text into budget-bounded chunks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChunkingMode {
    /// Accumulate whitespace-delimited words until the character budget is
    /// reached. May overshoot the budget by up to one word.
    WordBudget,
    /// Accumulate whole sentences; a sentence is never split across chunks.
    #[default]
    SentenceBudget,
}

/// Parameters for the budget chunker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Character budget per chunk.
    pub budget: usize,
    /// How the budget is applied.
    pub mode: ChunkingMode,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            budget: 500,
            mode: ChunkingMode::SentenceBudget,
        }
    }
}

impl ChunkingConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the character budget per chunk.
    #[must_use]
    pub fn budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// Set the chunking strategy.
    #[must_use]
    pub fn mode(mut self, mode: ChunkingMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Thresholds and options for question synthesis.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Paragraphs shorter than this many characters are skipped entirely.
    #[serde(default = "default_min_chunk_chars")]
    pub min_chunk_chars: usize,
    /// Sentences with fewer words are skipped for sentence-level rules.
    /// They still count toward paragraph-level rules.
    #[serde(default = "default_min_sentence_words")]
    pub min_sentence_words: usize,
    /// Optional topic string enabling the context-relevance rule.
    #[serde(default)]
    pub context: Option<String>,
}

fn default_min_chunk_chars() -> usize {
    30
}

fn default_min_sentence_words() -> usize {
    8
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            min_chunk_chars: default_min_chunk_chars(),
            min_sentence_words: default_min_sentence_words(),
            context: None,
        }
    }
}

impl SynthesisConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum paragraph length, in characters, for any rule to fire.
    #[must_use]
    pub fn min_chunk_chars(mut self, chars: usize) -> Self {
        self.min_chunk_chars = chars;
        self
    }

    /// Minimum sentence length, in words, for sentence-level rules.
    #[must_use]
    pub fn min_sentence_words(mut self, words: usize) -> Self {
        self.min_sentence_words = words;
        self
    }

    /// Topic string for the context-relevance rule.
    #[must_use]
    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}
