//! Linguistic signal extraction: named entities, section headers, and
//! lexical trigger categories.
//!
//! Signals are derived per segmentation pass and never stored. Entity
//! detection is delegated to an injected [`Tagger`] collaborator; the
//! [`CapitalizedPhraseTagger`] is the pure-pattern fallback used when no
//! external tagger is available.

pub mod extractor;
pub mod patterns;
pub mod tagger;

pub use extractor::SignalExtractor;
pub use tagger::{CapitalizedPhraseTagger, TaggedEntity, Tagger};

use serde::{Deserialize, Serialize};

// ── TriggerCategory ────────────────────────────────────────────────────

/// Lexical trigger families recognized by the extractor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum TriggerCategory {
    /// Instructional control language (press/click/select a button/option/menu).
    Process,
    /// How-to and step-by-step language.
    Procedure,
    /// Definitional language (means, refers to, is defined as, consists of).
    Definition,
    /// Obligation language (must, should, need to, required to).
    Requirement,
    /// Causal language (because, therefore, thus, as a result, leads to).
    CauseEffect,
}

impl std::fmt::Display for TriggerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Process => write!(f, "process"),
            Self::Procedure => write!(f, "procedure"),
            Self::Definition => write!(f, "definition"),
            Self::Requirement => write!(f, "requirement"),
            Self::CauseEffect => write!(f, "cause_effect"),
        }
    }
}

// ── Signal ─────────────────────────────────────────────────────────────

/// A derived linguistic marker used to select which question templates fire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Signal {
    /// An entity reported by the tagger, normalized to text plus kind.
    NamedEntity { text: String, kind: String },
    /// A section header label with its captured title.
    SectionHeader { title: String },
    /// A lexical trigger category matched case-insensitively.
    LexicalTrigger(TriggerCategory),
}

impl Signal {
    /// Returns the entity text when this signal is a named entity.
    pub fn entity_text(&self) -> Option<&str> {
        match self {
            Self::NamedEntity { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Returns the header title when this signal is a section header.
    pub fn header_title(&self) -> Option<&str> {
        match self {
            Self::SectionHeader { title } => Some(title),
            _ => None,
        }
    }

    /// Returns `true` when this signal is the given trigger category.
    pub fn is_trigger(&self, category: TriggerCategory) -> bool {
        matches!(self, Self::LexicalTrigger(c) if *c == category)
    }
}
