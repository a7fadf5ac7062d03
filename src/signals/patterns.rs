//! Static pattern tables for section headers and lexical triggers.
//!
//! Header patterns are ordered; the first match wins and its capture group
//! holds the title. Trigger patterns all report their category; a sentence
//! may match several categories at once.

use super::TriggerCategory;

// ── HeaderPattern ──────────────────────────────────────────────────────

/// A section-header pattern with a single title capture group.
#[derive(Debug, Clone)]
pub struct HeaderPattern {
    /// Unique identifier (e.g. `"HDR-001"`).
    pub id: &'static str,
    /// What this pattern recognizes.
    pub description: &'static str,
    /// Raw regex with capture group 1 holding the title.
    pub regex_str: &'static str,
}

/// Ordered header patterns; first match wins.
pub fn header_patterns() -> Vec<HeaderPattern> {
    vec![
        HeaderPattern {
            id: "HDR-001",
            description: "Chapter N: Title",
            regex_str: r"(?i)^chapter\s+\d+\s*[:.\-]\s*(\S.*)$",
        },
        HeaderPattern {
            id: "HDR-002",
            description: "Section N[.N]: Title",
            regex_str: r"(?i)^section\s+\d+(?:\.\d+)*\s*[:.\-]\s*(\S.*)$",
        },
        HeaderPattern {
            id: "HDR-003",
            description: "Multi-level outline header (1.2 Title)",
            regex_str: r"^\d+(?:\.\d+)+\.?\s+(\S.*)$",
        },
        HeaderPattern {
            id: "HDR-004",
            description: "Labelled block (Overview:, Introduction:, ...)",
            regex_str: r"(?i)^(?:overview|introduction|summary|conclusion|background)\s*:\s*(.*)$",
        },
        HeaderPattern {
            id: "HDR-005",
            description: "Note: label",
            regex_str: r"(?i)^note\s*:\s*(.*)$",
        },
    ]
}

// ── TriggerPattern ─────────────────────────────────────────────────────

/// A lexical trigger pattern tied to one category.
#[derive(Debug, Clone)]
pub struct TriggerPattern {
    /// Unique identifier (e.g. `"DEF-001"`).
    pub id: &'static str,
    /// Category reported when this pattern matches.
    pub category: TriggerCategory,
    /// What this pattern recognizes.
    pub description: &'static str,
    /// Raw regex, case-insensitive via inline flag.
    pub regex_str: &'static str,
}

/// Helper to reduce boilerplate when defining static trigger patterns.
macro_rules! trig {
    ($id:expr, $cat:expr, $desc:expr, $re:expr) => {
        TriggerPattern {
            id: $id,
            category: $cat,
            description: $desc,
            regex_str: $re,
        }
    };
}

/// Returns the full trigger pattern table.
pub fn trigger_patterns() -> Vec<TriggerPattern> {
    use TriggerCategory::{CauseEffect, Definition, Procedure, Process, Requirement};

    vec![
        // ── Process: instructional control language ────────────────
        trig!(
            "PRC-001",
            Process,
            "press/click/select followed by a control noun",
            r"(?i)\b(?:press|click|select)\b.*\b(?:button|option|menu)\b"
        ),
        // ── Procedure: how-to language ─────────────────────────────
        trig!("PRO-001", Procedure, "how to", r"(?i)\bhow\s+to\b"),
        trig!(
            "PRO-002",
            Procedure,
            "steps to/for",
            r"(?i)\bsteps?\s+(?:to|for)\b"
        ),
        trig!(
            "PRO-003",
            Procedure,
            "procedure/process of",
            r"(?i)\b(?:procedure\s+for|process\s+(?:of|for))\b"
        ),
        // ── Definition ─────────────────────────────────────────────
        trig!("DEF-001", Definition, "means", r"(?i)\bmeans\b"),
        trig!("DEF-002", Definition, "refers to", r"(?i)\brefers\s+to\b"),
        trig!(
            "DEF-003",
            Definition,
            "is defined as",
            r"(?i)\bis\s+defined\s+as\b"
        ),
        trig!(
            "DEF-004",
            Definition,
            "consists of",
            r"(?i)\bconsists\s+of\b"
        ),
        // ── Requirement ────────────────────────────────────────────
        trig!("REQ-001", Requirement, "must", r"(?i)\bmust\b"),
        trig!("REQ-002", Requirement, "should", r"(?i)\bshould\b"),
        trig!("REQ-003", Requirement, "need(s) to", r"(?i)\bneeds?\s+to\b"),
        trig!(
            "REQ-004",
            Requirement,
            "required to",
            r"(?i)\brequired\s+to\b"
        ),
        // ── Cause/effect ───────────────────────────────────────────
        trig!("CE-001", CauseEffect, "because", r"(?i)\bbecause\b"),
        trig!(
            "CE-002",
            CauseEffect,
            "therefore/thus",
            r"(?i)\b(?:therefore|thus)\b"
        ),
        trig!(
            "CE-003",
            CauseEffect,
            "as a result / consequently",
            r"(?i)\b(?:as\s+a\s+result|consequently)\b"
        ),
        trig!("CE-004", CauseEffect, "leads to", r"(?i)\bleads\s+to\b"),
    ]
}

// ── Tests ──────────────────────────────────────────────────────────────
