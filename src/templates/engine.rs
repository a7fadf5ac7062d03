//! Ordered evaluation of question template rules.

use regex::Regex;
use tracing::debug;

use crate::signals::{Signal, TriggerCategory};
use crate::types::{PipelineError, QaPair};

use super::rules::{FALLBACK_STRIP, RuleKind};

/// Applies the template rules to chunks, sentences, and sentence pairs.
///
/// Deterministic given identical inputs: no randomness, fixed rule order,
/// fixed formatter variants.
pub struct TemplateEngine {
    numbered_item: Regex,
    control_noun: Regex,
    howto_trigger: Regex,
    definition_trigger: Regex,
    requirement_trigger: Regex,
}

impl TemplateEngine {
    /// # Errors
    ///
    /// Returns [`PipelineError::Pattern`] if a static pattern fails to
    /// compile.
    pub fn new() -> Result<Self, PipelineError> {
        Ok(Self {
            numbered_item: compile(r"(?m)^\s*\d+[.)]\s+(\S.*)$")?,
            control_noun: compile(r"(?i)\b(button|option|menu)\b")?,
            howto_trigger: compile(
                r"(?i)\b(?:how\s+to|steps?\s+(?:to|for)|procedure\s+for|process\s+(?:of|for))\s+",
            )?,
            definition_trigger: compile(
                r"(?i)\b(?:means|refers\s+to|is\s+defined\s+as|consists\s+of)\b",
            )?,
            requirement_trigger: compile(r"(?i)\b(?:must|should|needs?\s+to|required\s+to)\b\s*")?,
        })
    }

    // ── Chunk-level primary rules ──────────────────────────────────────

    /// Numbered list beats section header; at most one primary fires.
    pub fn chunk_primary(&self, chunk: &str, signals: &[Signal]) -> Option<QaPair> {
        if let Some(pair) = self.numbered_list(chunk) {
            debug!(rule = %RuleKind::NumberedList, "chunk rule fired");
            return Some(pair);
        }
        signals.iter().find_map(Signal::header_title).map(|title| {
            debug!(rule = %RuleKind::SectionHeader, title, "chunk rule fired");
            QaPair::new(format!("What is {title}?"), chunk)
        })
    }

    fn numbered_list(&self, chunk: &str) -> Option<QaPair> {
        let mut items = self.numbered_item.captures_iter(chunk);
        let first = items.next()?;
        // A single numbered line is an outline heading, not a list.
        items.next()?;
        let first_item = first.get(1).map(|m| m.as_str().trim()).unwrap_or(chunk);
        Some(QaPair::new(
            format!("What are the steps for {first_item}?"),
            chunk,
        ))
    }

    // ── Sentence-level rules ───────────────────────────────────────────

    /// All sentence-level pairs for one sentence: one per named entity, one
    /// primary trigger/fallback pair, and a cause-effect pair when that
    /// trigger is present.
    pub fn sentence_rules(
        &self,
        sentence: &str,
        signals: &[Signal],
        paragraph: &str,
    ) -> Vec<QaPair> {
        let mut out = Vec::new();

        for entity in signals.iter().filter_map(Signal::entity_text) {
            out.push(
                QaPair::new(
                    format!("What is {entity} and how is it relevant?"),
                    sentence,
                )
                .with_context(paragraph),
            );
        }

        out.push(
            self.primary_sentence_rule(sentence, signals)
                .with_context(paragraph),
        );

        if signals
            .iter()
            .any(|s| s.is_trigger(TriggerCategory::CauseEffect))
        {
            out.push(
                QaPair::new(
                    format!("What is the cause and effect relationship described in: {sentence}?"),
                    sentence,
                )
                .with_context(paragraph),
            );
        }

        out
    }

    /// First-match-wins group: instructional, how-to, definition,
    /// requirement, then the generic fallback.
    fn primary_sentence_rule(&self, sentence: &str, signals: &[Signal]) -> QaPair {
        let (kind, pair) = if signals
            .iter()
            .any(|s| s.is_trigger(TriggerCategory::Process))
        {
            (RuleKind::Instructional, self.instructional(sentence))
        } else if signals
            .iter()
            .any(|s| s.is_trigger(TriggerCategory::Procedure))
        {
            (RuleKind::HowTo, self.how_to(sentence))
        } else if signals
            .iter()
            .any(|s| s.is_trigger(TriggerCategory::Definition))
        {
            (RuleKind::Definition, self.definition(sentence))
        } else if signals
            .iter()
            .any(|s| s.is_trigger(TriggerCategory::Requirement))
        {
            (RuleKind::Requirement, self.requirement(sentence))
        } else {
            (RuleKind::GenericFallback, self.generic_fallback(sentence))
        };
        debug!(rule = %kind, "sentence rule fired");
        pair
    }

    fn instructional(&self, sentence: &str) -> QaPair {
        let control = self
            .control_noun
            .find(sentence)
            .map(|m| m.as_str().to_lowercase())
            .unwrap_or_else(|| "control".to_string());
        QaPair::new(format!("What is the purpose of this {control}?"), sentence)
    }

    fn how_to(&self, sentence: &str) -> QaPair {
        let rest = match self.howto_trigger.find(sentence) {
            Some(m) => sentence[m.end()..].trim(),
            None => sentence,
        };
        let rest = if rest.is_empty() { sentence } else { rest };
        QaPair::new(format!("How do you {rest}?"), sentence)
    }

    fn definition(&self, sentence: &str) -> QaPair {
        let subject = match self.definition_trigger.find(sentence) {
            Some(m) => sentence[..m.start()].trim(),
            None => "",
        };
        let subject = match subject.find(',') {
            Some(pos) => subject[..pos].trim(),
            None => subject,
        };
        // Degraded formatter: fall back to the first token.
        let subject = if subject.is_empty() {
            sentence.split_whitespace().next().unwrap_or(sentence)
        } else {
            subject
        };
        QaPair::new(format!("What is {subject}?"), sentence)
    }

    fn requirement(&self, sentence: &str) -> QaPair {
        let rest = match self.requirement_trigger.find(sentence) {
            Some(m) => sentence[m.end()..].trim(),
            None => "",
        };
        let rest = if rest.is_empty() {
            strip_filler(sentence)
        } else {
            rest
        };
        QaPair::new(format!("What is required for {rest}?"), sentence)
    }

    fn generic_fallback(&self, sentence: &str) -> QaPair {
        QaPair::new(
            format!("What is the purpose of {}?", strip_filler(sentence)),
            sentence,
        )
    }

    // ── Additional rules ───────────────────────────────────────────────

    /// Compare-and-contrast pair over two adjacent sentences, when the
    /// joined text carries a conjunction or a comma.
    pub fn comparison(&self, first: &str, second: &str) -> Option<QaPair> {
        let combined = format!("{first} {second}");
        let lower = combined.to_lowercase();
        if lower.contains(" and ") || combined.contains(',') {
            Some(QaPair::new(
                "Compare and contrast the different elements mentioned in this text.",
                combined,
            ))
        } else {
            None
        }
    }

    /// Fires once per qualifying paragraph, independent of other rules.
    pub fn analytical(&self, chunk: &str) -> QaPair {
        QaPair::new(
            "Based on the information provided, what are the key implications or conclusions?",
            chunk,
        )
    }

    /// Fires when any whitespace-delimited keyword of `context` occurs in
    /// the paragraph, case-insensitively.
    pub fn context_relevance(&self, chunk: &str, context: &str) -> Option<QaPair> {
        let lower = chunk.to_lowercase();
        let matched = context
            .split_whitespace()
            .any(|keyword| lower.contains(&keyword.to_lowercase()));
        if matched {
            Some(
                QaPair::new(
                    format!("How does this information relate to {context}?"),
                    chunk,
                )
                .with_context(context),
            )
        } else {
            None
        }
    }
}

/// Strips the first matching leading filler phrase, case-insensitively.
fn strip_filler(sentence: &str) -> &str {
    for prefix in FALLBACK_STRIP {
        if let Some(head) = sentence.get(..prefix.len()) {
            if head.eq_ignore_ascii_case(prefix) {
                return &sentence[prefix.len()..];
            }
        }
    }
    sentence
}

fn compile(pattern: &str) -> Result<Regex, PipelineError> {
    Regex::new(pattern).map_err(|err| PipelineError::Pattern(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::Signal;

    fn engine() -> TemplateEngine {
        TemplateEngine::new().expect("static patterns compile")
    }

    fn trigger(category: TriggerCategory) -> Vec<Signal> {
        vec![Signal::LexicalTrigger(category)]
    }

    #[test]
    fn fallback_strips_leading_article() {
        let pairs = engine().sentence_rules("The cat sat on the mat.", &[], "para");
        assert_eq!(
            pairs[0].question,
            "What is the purpose of cat sat on the mat.?"
        );
        assert_eq!(pairs[0].answer, "The cat sat on the mat.");
    }

    #[test]
    fn fallback_leaves_unmatched_sentences_alone() {
        let pairs = engine().sentence_rules("It was warm.", &[], "para");
        assert_eq!(pairs[0].question, "What is the purpose of It was warm.?");
    }

    #[test]
    fn section_header_primary_fires() {
        let signals = vec![Signal::SectionHeader {
            title: "Introduction to Systems".to_string(),
        }];
        let chunk = "Chapter 1: Introduction to Systems";
        let pair = engine().chunk_primary(chunk, &signals).unwrap();
        assert_eq!(pair.question, "What is Introduction to Systems?");
        assert_eq!(pair.answer, chunk);
    }

    #[test]
    fn numbered_list_beats_section_header() {
        let chunk = "Section 1: Setup\n1. Install the tool\n2. Run the installer";
        let signals = vec![Signal::SectionHeader {
            title: "Setup".to_string(),
        }];
        let pair = engine().chunk_primary(chunk, &signals).unwrap();
        assert_eq!(pair.question, "What are the steps for Install the tool?");
    }

    #[test]
    fn single_numbered_line_is_not_a_list() {
        let chunk = "1. Overview of the design considerations involved";
        assert!(engine().numbered_list(chunk).is_none());
    }

    #[test]
    fn instructional_extracts_control_noun() {
        let sentence = "Click the Save button to persist your changes.";
        let pairs = engine().sentence_rules(sentence, &trigger(TriggerCategory::Process), "para");
        assert_eq!(pairs[0].question, "What is the purpose of this button?");
    }

    #[test]
    fn how_to_strips_trigger_phrase() {
        let sentence = "This page explains how to configure the cache.";
        let pairs = engine().sentence_rules(sentence, &trigger(TriggerCategory::Procedure), "para");
        assert_eq!(pairs[0].question, "How do you configure the cache.?");
    }

    #[test]
    fn definition_takes_text_before_trigger() {
        let sentence = "A chunk, in this pipeline, refers to a bounded span of text.";
        let pairs =
            engine().sentence_rules(sentence, &trigger(TriggerCategory::Definition), "para");
        assert_eq!(pairs[0].question, "What is A chunk?");
    }

    #[test]
    fn definition_degrades_to_first_token() {
        let sentence = "Means of transport vary by region.";
        let pairs =
            engine().sentence_rules(sentence, &trigger(TriggerCategory::Definition), "para");
        assert_eq!(pairs[0].question, "What is Means?");
    }

    #[test]
    fn requirement_takes_text_after_trigger() {
        let sentence = "Operators must rotate the credentials monthly.";
        let pairs =
            engine().sentence_rules(sentence, &trigger(TriggerCategory::Requirement), "para");
        assert_eq!(
            pairs[0].question,
            "What is required for rotate the credentials monthly.?"
        );
    }

    #[test]
    fn cause_effect_stacks_on_primary_rule() {
        let sentence = "The cache failed because the disk filled up overnight.";
        let pairs =
            engine().sentence_rules(sentence, &trigger(TriggerCategory::CauseEffect), "para");
        assert_eq!(pairs.len(), 2);
        assert!(pairs[0].question.starts_with("What is the purpose of"));
        assert_eq!(
            pairs[1].question,
            format!("What is the cause and effect relationship described in: {sentence}?")
        );
    }

    #[test]
    fn entity_rule_fires_per_entity() {
        let signals = vec![
            Signal::NamedEntity {
                text: "Kafka".to_string(),
                kind: "capitalized_phrase".to_string(),
            },
            Signal::NamedEntity {
                text: "Redis".to_string(),
                kind: "capitalized_phrase".to_string(),
            },
        ];
        let pairs = engine().sentence_rules("We moved from Kafka to Redis.", &signals, "para");
        assert_eq!(pairs[0].question, "What is Kafka and how is it relevant?");
        assert_eq!(pairs[1].question, "What is Redis and how is it relevant?");
    }

    #[test]
    fn comparison_requires_conjunction_or_comma() {
        let engine = engine();
        assert!(
            engine
                .comparison("Reads are fast and cheap.", "Writes are slower.")
                .is_some()
        );
        assert!(
            engine
                .comparison("The cat sat on the mat.", "It was warm.")
                .is_none()
        );
    }

    #[test]
    fn context_relevance_matches_keywords_case_insensitively() {
        let engine = engine();
        let pair = engine
            .context_relevance(
                "The scheduler balances Kubernetes pods.",
                "kubernetes scaling",
            )
            .unwrap();
        assert_eq!(
            pair.question,
            "How does this information relate to kubernetes scaling?"
        );
        assert!(
            engine
                .context_relevance("Totally unrelated prose.", "kubernetes scaling")
                .is_none()
        );
    }
}
