//! Question synthesis orchestration: paragraphs, sentences, signals, rules,
//! and question deduplication.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::config::SynthesisConfig;
use crate::segmentation::{paragraphs, sentences};
use crate::signals::{CapitalizedPhraseTagger, SignalExtractor, Tagger};
use crate::templates::TemplateEngine;
use crate::types::{PipelineError, QaPair};

/// Runs the whole synthesis pipeline over one document.
///
/// Each run is stateless and independent; entities, signals, and pairs are
/// recomputed from scratch on every call.
pub struct QaSynthesizer {
    extractor: SignalExtractor,
    engine: TemplateEngine,
    config: SynthesisConfig,
}

impl QaSynthesizer {
    /// Builds a synthesizer with the pure-pattern fallback tagger.
    pub fn new(config: SynthesisConfig) -> Result<Self, PipelineError> {
        let tagger: Arc<dyn Tagger> = Arc::new(CapitalizedPhraseTagger::new()?);
        Self::with_tagger(config, tagger)
    }

    /// Builds a synthesizer around an injected tagger collaborator.
    pub fn with_tagger(
        config: SynthesisConfig,
        tagger: Arc<dyn Tagger>,
    ) -> Result<Self, PipelineError> {
        Ok(Self {
            extractor: SignalExtractor::new(Some(tagger))?,
            engine: TemplateEngine::new()?,
            config,
        })
    }

    /// Synthesizes question/answer pairs for `document`.
    ///
    /// Output order follows the document: per paragraph the chunk primary
    /// first, then sentence-level pairs in sentence order, then comparison,
    /// analytical, and context-relevance pairs. Questions are deduplicated
    /// case-insensitively, first occurrence winning.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Input`] when the document is empty or whitespace.
    pub fn synthesize(&self, document: &str) -> Result<Vec<QaPair>, PipelineError> {
        if document.trim().is_empty() {
            return Err(PipelineError::Input("document text is empty".to_string()));
        }

        let mut seen: HashSet<String> = HashSet::new();
        let mut out: Vec<QaPair> = Vec::new();

        for paragraph in paragraphs(document) {
            if paragraph.len() < self.config.min_chunk_chars {
                debug!(len = paragraph.len(), "skipping short paragraph");
                continue;
            }

            let paragraph_signals = self.extractor.extract_signals(&paragraph);
            if let Some(pair) = self.engine.chunk_primary(&paragraph, &paragraph_signals) {
                push_unique(&mut out, &mut seen, pair);
            }

            let sentence_list = sentences(&paragraph);
            for sentence in &sentence_list {
                if sentence.split_whitespace().count() < self.config.min_sentence_words {
                    continue;
                }
                let sentence_signals = self.extractor.extract_signals(sentence);
                for pair in self
                    .engine
                    .sentence_rules(sentence, &sentence_signals, &paragraph)
                {
                    push_unique(&mut out, &mut seen, pair);
                }
            }

            for pair in sentence_list.windows(2) {
                if let Some(comparison) = self.engine.comparison(&pair[0], &pair[1]) {
                    push_unique(&mut out, &mut seen, comparison);
                }
            }

            push_unique(&mut out, &mut seen, self.engine.analytical(&paragraph));

            if let Some(context) = &self.config.context {
                if let Some(pair) = self.engine.context_relevance(&paragraph, context) {
                    push_unique(&mut out, &mut seen, pair);
                }
            }
        }

        debug!(pairs = out.len(), "synthesis complete");
        Ok(out)
    }
}

fn push_unique(out: &mut Vec<QaPair>, seen: &mut HashSet<String>, pair: QaPair) {
    if seen.insert(pair.dedup_key()) {
        out.push(pair);
    }
}
