//! The entity-tagging capability and its pure-pattern fallback.

use regex::Regex;

use crate::types::PipelineError;

/// An entity reported by a tagger, before normalization into a signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggedEntity {
    pub text: String,
    pub kind: String,
}

/// Entity-tagging capability.
///
/// Implementations wrap an external part-of-speech/NER library or provide a
/// pure-pattern approximation. Constructed once by the caller and injected
/// into the pipeline; never global state.
pub trait Tagger: Send + Sync {
    fn tag(&self, text: &str) -> Vec<TaggedEntity>;
}

/// Pattern fallback tagger: maximal runs of capitalized words stand in for
/// named entities.
///
/// A lone capitalized word at the very start of the text is ignored, since
/// sentence-initial capitalization carries no entity signal. Multi-word runs
/// are kept wherever they appear.
#[derive(Debug, Clone)]
pub struct CapitalizedPhraseTagger {
    run: Regex,
}

impl CapitalizedPhraseTagger {
    pub fn new() -> Result<Self, PipelineError> {
        let run = Regex::new(r"\b[A-Z][A-Za-z0-9'\-]*(?:\s+[A-Z][A-Za-z0-9'\-]*)*")
            .map_err(|err| PipelineError::Pattern(err.to_string()))?;
        Ok(Self { run })
    }
}

impl Tagger for CapitalizedPhraseTagger {
    fn tag(&self, text: &str) -> Vec<TaggedEntity> {
        let mut out = Vec::new();
        for m in self.run.find_iter(text) {
            let phrase = m.as_str();
            let single_word = !phrase.contains(char::is_whitespace);
            if m.start() == 0 && single_word {
                continue;
            }
            out.push(TaggedEntity {
                text: phrase.to_string(),
                kind: "capitalized_phrase".to_string(),
            });
        }
        out
    }
}
