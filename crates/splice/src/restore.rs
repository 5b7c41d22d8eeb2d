//! Reassembly of annotated chunks and definition-level integrity repair.
//!
//! Annotation must never lose code. After chunks are joined back together,
//! every definition name found in the original unit must still open a
//! definition in the output; any name that went missing gets its original
//! block appended verbatim. Verification only ever appends, so running it
//! again on its own output changes nothing.

use crate::boundary;
use crate::language::Language;
use crate::types::{Boundary, SourceUnit};
use std::collections::HashSet;

/// Join annotated chunk texts back into one unit, in order
pub fn reassemble(parts: &[String]) -> String {
    parts.join("\n\n")
}

/// Result of integrity verification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUnit {
    /// Annotated text with missing definitions appended
    pub text: String,

    /// Names of definitions that had to be restored
    pub restored: Vec<String>,
}

/// Check that every original definition survived annotation, appending the
/// original block of each one that did not.
///
/// A name defined more than once in the original is repaired at most once,
/// from its first block.
pub fn verify_definitions(unit: &SourceUnit, annotated: &str) -> VerifiedUnit {
    let original_lines: Vec<&str> = unit.text.lines().collect();
    let boundaries = boundary::scan_boundary_lines(unit.language, &original_lines);

    let mut present: HashSet<String> = annotated
        .lines()
        .filter_map(|line| unit.language.definition_name(line))
        .collect();

    let mut text = annotated.to_string();
    let mut restored = Vec::new();

    for (idx, b) in boundaries.iter().enumerate() {
        if present.contains(&b.name) {
            continue;
        }

        log::warn!(
            "definition '{}' missing from annotated output of {}; restoring original block",
            b.name,
            unit.name
        );

        let block = definition_block(unit.language, &original_lines, &boundaries, idx);
        if !text.is_empty() {
            text.push_str("\n\n");
        }
        text.push_str(&block);

        present.insert(b.name.clone());
        restored.push(b.name.clone());
    }

    VerifiedUnit { text, restored }
}

/// The original block of the `idx`-th boundary: header line through its
/// closing marker. When no closer is found before the next definition's lead,
/// the block degrades to everything up to that lead (or end of input).
fn definition_block(
    language: Language,
    lines: &[&str],
    boundaries: &[Boundary],
    idx: usize,
) -> String {
    let def_line = boundaries[idx].line;
    let limit = boundaries
        .get(idx + 1)
        .map(|next| boundary::comment_lead_start(language, lines, next.line))
        .unwrap_or(lines.len());

    let end = match closing_line(language, lines, def_line, limit) {
        Some(close) => close + 1,
        None => limit,
    };

    lines[def_line..end].join("\n").trim_end().to_string()
}

/// Find the line that closes the definition opened at `def_line`, searching
/// only up to `limit`. Ruby closes on an `end` at the opener's indent, Python
/// on the dedent back to it, JavaScript on a `}` at the opener's indent.
fn closing_line(
    language: Language,
    lines: &[&str],
    def_line: usize,
    limit: usize,
) -> Option<usize> {
    let def_indent = indent_width(lines[def_line]);

    match language {
        Language::Ruby => (def_line + 1..limit).find(|&i| {
            let trimmed = lines[i].trim();
            (trimmed == "end" || trimmed.starts_with("end ")) && indent_width(lines[i]) == def_indent
        }),
        Language::JavaScript => (def_line + 1..limit)
            .find(|&i| lines[i].trim_start().starts_with('}') && indent_width(lines[i]) == def_indent),
        Language::Python => {
            let mut last_body = None;
            for i in def_line + 1..limit {
                if lines[i].trim().is_empty() {
                    continue;
                }
                if indent_width(lines[i]) <= def_indent {
                    break;
                }
                last_body = Some(i);
            }
            last_body
        }
        Language::Unknown => None,
    }
}

fn indent_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}
