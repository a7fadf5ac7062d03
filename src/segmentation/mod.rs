//! Text segmentation: paragraphs, sentences, and budget-bounded chunks.
//!
//! The sentence boundary here is deliberately heuristic: a run of terminal
//! punctuation (`.`, `!`, `?`) followed by whitespace ends a sentence.
//! Abbreviations, decimal numbers, and quotations are not special-cased.

pub mod chunker;

pub use chunker::chunk;

/// Splits raw text into paragraphs separated by blank-line sequences.
///
/// Lines inside a paragraph keep their relative order and are rejoined with a
/// single newline; leading/trailing whitespace per line is trimmed. Empty
/// paragraphs are dropped.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            flush_paragraph(&mut current, &mut out);
        } else {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line.trim());
        }
    }
    flush_paragraph(&mut current, &mut out);
    out
}

fn flush_paragraph(current: &mut String, out: &mut Vec<String>) {
    let paragraph = current.trim();
    if !paragraph.is_empty() {
        out.push(paragraph.to_string());
    }
    current.clear();
}

/// Splits text into sentences at terminal punctuation boundaries.
///
/// A boundary is a run of `.`/`!`/`?` followed by whitespace (or end of
/// input). Terminal punctuation stays attached to its sentence. Results are
/// trimmed and empty sentences dropped.
pub fn sentences(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        if is_terminal(c) {
            // Keep a terminal run ("?!", "...") together as the sentence's
            // ending punctuation; whitespace after the run still ends the
            // sentence.
            while let Some(&next) = chars.peek() {
                if is_terminal(next) {
                    current.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            if chars.peek().is_none_or(|next| next.is_whitespace()) {
                flush_sentence(&mut current, &mut out);
            }
        }
    }
    flush_sentence(&mut current, &mut out);
    out
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn flush_sentence(current: &mut String, out: &mut Vec<String>) {
    let sentence = current.trim();
    if !sentence.is_empty() {
        out.push(sentence.to_string());
    }
    current.clear();
}
