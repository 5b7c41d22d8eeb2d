//! Definition boundary scanning.
//!
//! A boundary is the line where a named definition opens. Detection is a
//! per-line keyword match; closing keywords are ignored and nesting depth is
//! never tracked, so indented and nested definitions are boundaries too.

use crate::language::Language;
use crate::types::Boundary;

/// Scan lines for definition openers, in source order
pub fn scan_boundary_lines(language: Language, lines: &[&str]) -> Vec<Boundary> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            language
                .definition_name(line)
                .map(|name| Boundary::new(name, idx))
        })
        .collect()
}

/// Scan a full text for definition openers
pub fn scan_boundaries(language: Language, text: &str) -> Vec<Boundary> {
    let lines: Vec<&str> = text.lines().collect();
    scan_boundary_lines(language, &lines)
}

/// Index of the first line of the contiguous comment block directly above a
/// definition, or the definition line itself when there is none.
///
/// A blank line or any non-comment line stops the walk, so only comments that
/// sit immediately on top of the opener travel with it.
pub fn comment_lead_start(language: Language, lines: &[&str], def_line: usize) -> usize {
    let mut start = def_line;
    while start > 0 && language.is_comment_line(lines[start - 1]) {
        start -= 1;
    }
    start
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scan_ruby_in_order() {
        let text = "\
module Util
  # Adds one
  def inc(x)
    x + 1
  end

  def self.dec(x)
    x - 1
  end
end
";
        let found = scan_boundaries(Language::Ruby, text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], Boundary::new("inc", 2));
        assert_eq!(found[1], Boundary::new("dec", 6));
    }

    #[test]
    fn test_scan_ignores_non_definitions() {
        let text = "x = 1\nif x > 0\n  puts x\nend\n";
        assert!(scan_boundaries(Language::Ruby, text).is_empty());
    }

    #[test]
    fn test_scan_detects_nested_definitions() {
        // No nesting is tracked; an inner def is a boundary like any other.
        let text = "def outer\n  def inner\n  end\nend\n";
        let found = scan_boundaries(Language::Ruby, text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "outer");
        assert_eq!(found[1].name, "inner");
    }

    #[test]
    fn test_scan_javascript() {
        let text = "\
import fs from 'fs';

// Reads a file
export async function load(path) {
  return fs.promises.readFile(path);
}

function helper() {}
";
        let found = scan_boundaries(Language::JavaScript, text);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], Boundary::new("load", 3));
        assert_eq!(found[1], Boundary::new("helper", 7));
    }

    #[test]
    fn test_lead_start_walks_comment_block() {
        let lines = vec!["x = 1", "# first", "# second", "def foo", "end"];
        assert_eq!(comment_lead_start(Language::Ruby, &lines, 3), 1);
    }

    #[test]
    fn test_lead_start_stops_at_blank_line() {
        let lines = vec!["# detached", "", "# attached", "def foo", "end"];
        assert_eq!(comment_lead_start(Language::Ruby, &lines, 3), 2);
    }

    #[test]
    fn test_lead_start_without_comments() {
        let lines = vec!["x = 1", "def foo", "end"];
        assert_eq!(comment_lead_start(Language::Ruby, &lines, 1), 1);
    }

    #[test]
    fn test_lead_start_at_top_of_file() {
        let lines = vec!["# header", "def foo", "end"];
        assert_eq!(comment_lead_start(Language::Ruby, &lines, 1), 0);
    }
}
