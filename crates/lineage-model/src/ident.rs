//! Identifier slugs for graph nodes.
//!
//! Node ids must be stable across loads of the same document and safe to use
//! in URLs, DOM ids, and log lines, so they are restricted to the alphabet
//! `[A-Za-z0-9_-]`.

use std::sync::OnceLock;

use regex::Regex;

/// Strip one pair of surrounding square brackets, if present.
///
/// Only a full wrap is unwrapped; `[a].[b]` style compound names are left
/// alone by virtue of requiring both the leading and trailing bracket.
pub fn strip_brackets(name: &str) -> &str {
    name.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .unwrap_or(name)
}

/// Normalize one name component into the id alphabet.
///
/// Passes, in order: runs of whitespace/slash/brace/parenthesis characters
/// collapse to a single hyphen; every character outside `[A-Za-z0-9_-]` is
/// removed; repeated hyphens collapse; leading/trailing hyphens are trimmed.
pub fn slug(raw: &str) -> String {
    static SEPARATOR_RUN: OnceLock<Regex> = OnceLock::new();
    static HYPHEN_RUN: OnceLock<Regex> = OnceLock::new();
    let separators = SEPARATOR_RUN.get_or_init(|| Regex::new(r"[\s/{}()]+").expect("valid regex"));
    let hyphens = HYPHEN_RUN.get_or_init(|| Regex::new(r"-{2,}").expect("valid regex"));

    let hyphenated = separators.replace_all(raw, "-");
    let kept: String = hyphenated
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || *ch == '_' || *ch == '-')
        .collect();
    hyphens
        .replace_all(&kept, "-")
        .trim_matches('-')
        .to_string()
}

/// Deterministic node id for a (datasource, column) pair.
///
/// The column name is unwrapped from its brackets first; the datasource name
/// is slugged as-is. Distinct inputs can slugify identically; the graph
/// builder treats such collisions as a load error rather than overwriting.
pub fn node_id(datasource: &str, column: &str) -> String {
    format!("{}--{}", slug(datasource), slug(strip_brackets(column)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_brackets_only_unwraps_full_pairs() {
        assert_eq!(strip_brackets("[Sales]"), "Sales");
        assert_eq!(strip_brackets("Sales"), "Sales");
        assert_eq!(strip_brackets("[Sales"), "[Sales");
        assert_eq!(strip_brackets("Sales]"), "Sales]");
        assert_eq!(strip_brackets("[]"), "");
    }

    #[test]
    fn slug_collapses_separators_and_drops_foreign_characters() {
        assert_eq!(slug("Test/Data:Source"), "Test-DataSource");
        assert_eq!(slug("a  b / c"), "a-b-c");
        assert_eq!(slug("{bin} (auto)"), "bin-auto");
        assert_eq!(slug("--already--hyphenated--"), "already-hyphenated");
        assert_eq!(slug("Ünïcode"), "ncode");
    }

    #[test]
    fn node_id_matches_documented_example() {
        assert_eq!(
            node_id("Test/Data:Source", "[Special:Field/Name]"),
            "Test-DataSource--SpecialField-Name"
        );
    }
}
