//! Signal extractor built on a two-pass regex scan.
//!
//! A [`RegexSet`] identifies which patterns match in one pass; individual
//! [`Regex`]es are only consulted afterwards, to capture header titles.

use std::collections::HashSet;
use std::sync::Arc;

use regex::{Regex, RegexSet};

use crate::types::PipelineError;

use super::patterns::{header_patterns, trigger_patterns};
use super::tagger::Tagger;
use super::{Signal, TriggerCategory};

/// Extracts named-entity, section-header, and lexical-trigger signals from a
/// sentence or chunk.
pub struct SignalExtractor {
    header_set: RegexSet,
    header_regexes: Vec<Regex>,
    trigger_set: RegexSet,
    trigger_categories: Vec<TriggerCategory>,
    tagger: Option<Arc<dyn Tagger>>,
}

impl SignalExtractor {
    /// Builds an extractor with the given tagger collaborator, or none for a
    /// header/trigger-only extractor.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Pattern`] if a static pattern fails to
    /// compile.
    pub fn new(tagger: Option<Arc<dyn Tagger>>) -> Result<Self, PipelineError> {
        let headers = header_patterns();
        let header_set = RegexSet::new(headers.iter().map(|p| p.regex_str))
            .map_err(|err| PipelineError::Pattern(err.to_string()))?;
        let header_regexes = headers
            .iter()
            .map(|p| {
                Regex::new(p.regex_str)
                    .map_err(|err| PipelineError::Pattern(format!("pattern '{}': {err}", p.id)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let triggers = trigger_patterns();
        let trigger_set = RegexSet::new(triggers.iter().map(|p| p.regex_str))
            .map_err(|err| PipelineError::Pattern(err.to_string()))?;
        let trigger_categories = triggers.iter().map(|p| p.category).collect();

        Ok(Self {
            header_set,
            header_regexes,
            trigger_set,
            trigger_categories,
            tagger,
        })
    }

    /// Derives all signals for `text`.
    ///
    /// Order is deterministic: at most one section header (first pattern
    /// wins), then tagger entities deduplicated by exact text in first-seen
    /// order, then trigger categories in table order (each category reported
    /// once).
    pub fn extract_signals(&self, text: &str) -> Vec<Signal> {
        let mut signals = Vec::new();

        if let Some(header) = self.section_header(text) {
            signals.push(header);
        }

        if let Some(tagger) = &self.tagger {
            let mut seen: HashSet<String> = HashSet::new();
            for entity in tagger.tag(text) {
                if seen.insert(entity.text.clone()) {
                    signals.push(Signal::NamedEntity {
                        text: entity.text,
                        kind: entity.kind,
                    });
                }
            }
        }

        let mut seen_categories: HashSet<TriggerCategory> = HashSet::new();
        for idx in self.trigger_set.matches(text) {
            let category = self.trigger_categories[idx];
            if seen_categories.insert(category) {
                signals.push(Signal::LexicalTrigger(category));
            }
        }

        signals
    }

    /// Matches `text` against the ordered header patterns; first match wins.
    ///
    /// The captured remainder is the title. For bare labels ("Overview:")
    /// whose remainder is empty, the label itself serves as the title.
    pub fn section_header(&self, text: &str) -> Option<Signal> {
        let matched = self.header_set.matches(text).into_iter().min()?;
        let caps = self.header_regexes[matched].captures(text)?;
        let title = caps.get(1).map(|m| m.as_str().trim()).unwrap_or("");
        let title = if title.is_empty() {
            // Bare label like "Overview:"; the label itself is the title.
            text.split(':').next().unwrap_or(text).trim().to_string()
        } else {
            title.to_string()
        };
        Some(Signal::SectionHeader { title })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::signals::tagger::CapitalizedPhraseTagger;

    fn extractor() -> SignalExtractor {
        let tagger: Arc<dyn Tagger> =
            Arc::new(CapitalizedPhraseTagger::new().expect("tagger compiles"));
        SignalExtractor::new(Some(tagger)).expect("extractor compiles")
    }

    #[test]
    fn chapter_header_is_detected_with_title() {
        let signals = extractor().extract_signals("Chapter 1: Introduction to Systems");
        assert!(
            signals
                .iter()
                .any(|s| s.header_title() == Some("Introduction to Systems"))
        );
    }

    #[test]
    fn first_header_pattern_wins() {
        // Matches both the Chapter pattern and (without the label) nothing
        // else; the capture must come from HDR-001.
        let signals = extractor().extract_signals("Chapter 2 - Storage Layout");
        assert!(
            signals
                .iter()
                .any(|s| s.header_title() == Some("Storage Layout"))
        );
    }

    #[test]
    fn triggers_report_all_matching_categories() {
        let signals = extractor().extract_signals("you must restart because the cache is stale");
        assert!(
            signals
                .iter()
                .any(|s| s.is_trigger(TriggerCategory::Requirement))
        );
        assert!(
            signals
                .iter()
                .any(|s| s.is_trigger(TriggerCategory::CauseEffect))
        );
    }

    #[test]
    fn trigger_category_reported_once() {
        let signals = extractor().extract_signals("therefore it failed, and thus we retried");
        let count = signals
            .iter()
            .filter(|s| s.is_trigger(TriggerCategory::CauseEffect))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn entities_deduplicated_by_exact_text() {
        let signals =
            extractor().extract_signals("We shipped Redis today and Redis again tomorrow.");
        let entities: Vec<_> = signals.iter().filter_map(Signal::entity_text).collect();
        assert_eq!(entities, vec!["Redis"]);
    }

    #[test]
    fn no_tagger_means_no_entity_signals() {
        let extractor = SignalExtractor::new(None).expect("extractor compiles");
        let signals = extractor.extract_signals("Talk to Apache Kafka now.");
        assert!(signals.iter().all(|s| s.entity_text().is_none()));
    }
}
