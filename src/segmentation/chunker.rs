//! Budget-bounded chunking over words or whole sentences.

use crate::config::{ChunkingConfig, ChunkingMode};

use super::sentences;

/// Cuts `text` into an ordered, non-overlapping chunk sequence.
///
/// Word-budget mode closes a chunk once the running character count (word
/// length plus one separator each) reaches the budget, so a chunk may exceed
/// the budget by up to one word. Sentence-budget mode closes the current
/// chunk before a sentence that would cross the budget, so sentences are
/// never split. Empty input yields an empty sequence; a single word or
/// sentence longer than the budget still forms its own chunk.
pub fn chunk(text: &str, config: &ChunkingConfig) -> Vec<String> {
    match config.mode {
        ChunkingMode::WordBudget => chunk_words(text, config.budget),
        ChunkingMode::SentenceBudget => chunk_sentences(text, config.budget),
    }
}

fn chunk_words(text: &str, budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut size = 0usize;

    for word in text.split_whitespace() {
        current.push(word);
        size += word.len() + 1;
        if size >= budget {
            chunks.push(current.join(" "));
            current.clear();
            size = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current.join(" "));
    }
    chunks
}

fn chunk_sentences(text: &str, budget: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in sentences(text) {
        if !current.is_empty() && current.len() + sentence.len() > budget {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(&sentence);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
