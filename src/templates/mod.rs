//! Question template rules: an ordered set of predicate + formatter pairs.
//!
//! Rules are evaluated top to bottom with explicit priority. Chunk-level
//! primary rules are mutually exclusive (numbered list beats section header);
//! entity-driven and trigger-driven sentence rules stack, so one sentence can
//! yield several pairs. A formatter that cannot extract its expected
//! substring degrades to a simpler rendering instead of failing the run.

pub mod engine;
pub mod rules;

pub use engine::TemplateEngine;
pub use rules::RuleKind;
