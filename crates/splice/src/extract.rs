//! Extraction of source code from generated responses.
//!
//! Responses usually carry the annotated code in a fenced block, possibly
//! with conversational text around it. Extraction never fails: when no
//! complete fenced block exists, a line filter salvages what it can, and an
//! empty result is a legitimate outcome for the caller to judge.

use once_cell::sync::Lazy;
use regex::Regex;

/// First fenced code block, optionally tagged with a language name.
static FENCED_BLOCK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:[A-Za-z0-9_+-]+)?\s*(.*?)```").expect("valid regex"));

/// Lines starting with these words outside a fence are conversational
/// preamble, not code.
const PREAMBLE_OPENERS: [&str; 4] = ["Here", "This", "I", "The"];

/// Extract the source code carried by a generated response.
///
/// The first complete fenced block wins. Without one, lines are filtered:
/// stray fence markers toggle a capture region, lines inside a region are
/// kept verbatim, and outside a region only non-preamble lines survive.
pub fn extract_source_block(response: &str) -> String {
    if let Some(caps) = FENCED_BLOCK.captures(response) {
        if let Some(code) = caps.get(1) {
            return code.as_str().trim().to_string();
        }
    }

    let mut kept = Vec::new();
    let mut in_code = false;
    for line in response.lines() {
        let stripped = line.trim();
        if stripped.starts_with("```") {
            in_code = !in_code;
            continue;
        }
        if in_code || !PREAMBLE_OPENERS.iter().any(|word| stripped.starts_with(word)) {
            kept.push(line);
        }
    }
    kept.join("\n").trim().to_string()
}
