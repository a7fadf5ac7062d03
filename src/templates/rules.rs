//! Rule identities and the fixed evaluation order.

use serde::{Deserialize, Serialize};

/// The question template rules, in priority order.
///
/// `NumberedList` and `SectionHeader` are chunk-level primaries: at most one
/// of them fires per chunk, the list rule winning when both match.
/// `NamedEntity` through `GenericFallback` are sentence-level; the four
/// trigger rules plus the fallback form a first-match-wins group, while the
/// entity rule fires for every entity on the sentence. `CauseEffect`,
/// `Comparison`, `Analytical`, and `ContextRelevance` are additional rules
/// that stack on top of whatever else fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum RuleKind {
    /// "What are the steps for {first item}?" over a numbered list chunk.
    NumberedList,
    /// "What is {title}?" over a chunk with a section header.
    SectionHeader,
    /// "What is {entity} and how is it relevant?" per named entity.
    NamedEntity,
    /// "What is the purpose of this {control}?" for press/click/select text.
    Instructional,
    /// "How do you {rest}?" for how-to sentences.
    HowTo,
    /// "What is {subject}?" for definitional sentences.
    Definition,
    /// "What is required for {rest}?" for obligation sentences.
    Requirement,
    /// "What is the purpose of {sentence minus leading filler}?".
    GenericFallback,
    /// Cause/effect relationship question over the whole sentence.
    CauseEffect,
    /// Fixed compare-and-contrast question over an adjacent sentence pair.
    Comparison,
    /// Fixed implications question over the whole paragraph.
    Analytical,
    /// "How does this information relate to {context}?" when topic keywords
    /// appear in the paragraph.
    ContextRelevance,
}

impl std::fmt::Display for RuleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::NumberedList => "numbered_list",
            Self::SectionHeader => "section_header",
            Self::NamedEntity => "named_entity",
            Self::Instructional => "instructional",
            Self::HowTo => "how_to",
            Self::Definition => "definition",
            Self::Requirement => "requirement",
            Self::GenericFallback => "generic_fallback",
            Self::CauseEffect => "cause_effect",
            Self::Comparison => "comparison",
            Self::Analytical => "analytical",
            Self::ContextRelevance => "context_relevance",
        };
        write!(f, "{name}")
    }
}

/// Leading filler phrases stripped by the generic fallback formatter, tried
/// in order, first match only.
pub const FALLBACK_STRIP: [&str; 6] = ["this ", "the ", "a ", "an ", "in order to ", "to "];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn longer_strip_phrases_precede_their_prefixes() {
        // "in order to " must be tried before "to ", or the shorter phrase
        // would swallow part of the longer one.
        let in_order = FALLBACK_STRIP.iter().position(|s| *s == "in order to ");
        let to = FALLBACK_STRIP.iter().position(|s| *s == "to ");
        assert!(in_order < to);
    }

    #[test]
    fn display_names_are_snake_case() {
        assert_eq!(RuleKind::GenericFallback.to_string(), "generic_fallback");
        assert_eq!(RuleKind::CauseEffect.to_string(), "cause_effect");
    }
}
