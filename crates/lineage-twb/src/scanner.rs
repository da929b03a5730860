//! Formula reference extraction.
//!
//! A calculation's formula names other fields with bracket tokens, either
//! qualified (`[Datasource].[Field]`) or bare (`[Field]`). The scanner first
//! erases comments and string literals so bracket-like text inside them is
//! never mistaken for a reference, then walks the remaining text once,
//! left to right.

use std::sync::OnceLock;

use regex::Regex;

/// One field-reference occurrence extracted from a formula.
///
/// Occurrences are reported in scan order, duplicates preserved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldReference {
    /// Datasource qualifier, without brackets, for `[Qualifier].[Field]`
    /// tokens.
    pub qualifier: Option<String>,
    /// Field name, without brackets.
    pub field: String,
    /// Exact matched substring, brackets included, kept verbatim for
    /// formula-text display substitution.
    pub matched_text: String,
}

fn block_comments() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Non-greedy so two comments on one line stay separate; `(?s)` lets a
    // comment span lines.
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"))
}

fn line_comments() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"//[^\r\n]*").expect("valid regex"))
}

fn string_literals() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Both quote styles; a backslash escapes the following character, so
    // `'it\'s'` is one literal. Unterminated literals simply never match.
    RE.get_or_init(|| Regex::new(r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'"#).expect("valid regex"))
}

fn bracket_tokens() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Qualified form first so `[a].[b]` is not consumed as two bare tokens.
    // No nesting: bracket contents exclude both bracket characters, which
    // also makes malformed/unterminated sequences non-matches rather than
    // errors.
    RE.get_or_init(|| {
        Regex::new(r"\[([^\[\]]+)\]\.\[([^\[\]]+)\]|\[([^\[\]]+)\]").expect("valid regex")
    })
}

/// Extract every field reference from one decoded formula.
pub fn extract_references(formula: &str) -> Vec<FieldReference> {
    // Strictly ordered erasure passes. Comments go before string literals so
    // a commented-out quote cannot swallow live code behind it.
    let stripped = block_comments().replace_all(formula, "");
    let stripped = line_comments().replace_all(&stripped, "");
    let stripped = string_literals().replace_all(&stripped, "");

    bracket_tokens()
        .captures_iter(&stripped)
        .map(|caps| {
            let matched_text = caps.get(0).expect("whole match").as_str().to_string();
            match (caps.get(1), caps.get(2), caps.get(3)) {
                (Some(qualifier), Some(field), _) => FieldReference {
                    qualifier: Some(qualifier.as_str().to_string()),
                    field: field.as_str().to_string(),
                    matched_text,
                },
                (_, _, Some(field)) => FieldReference {
                    qualifier: None,
                    field: field.as_str().to_string(),
                    matched_text,
                },
                _ => unreachable!("alternation always captures a field"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn bare(field: &str) -> FieldReference {
        FieldReference {
            qualifier: None,
            field: field.to_string(),
            matched_text: format!("[{field}]"),
        }
    }

    #[test]
    fn extracts_bare_and_qualified_tokens_in_order() {
        let refs = extract_references("[Profit] / [Sales].[Amount] + [Profit]");
        assert_eq!(
            refs,
            vec![
                bare("Profit"),
                FieldReference {
                    qualifier: Some("Sales".to_string()),
                    field: "Amount".to_string(),
                    matched_text: "[Sales].[Amount]".to_string(),
                },
                bare("Profit"),
            ]
        );
    }

    #[test]
    fn duplicates_are_preserved() {
        let refs = extract_references("[A] + [A] + [A]");
        assert_eq!(refs.len(), 3);
    }

    #[test]
    fn block_comments_are_erased_even_across_lines() {
        let refs = extract_references("/* uses [Old Field]\n and [Older] */ [Live]");
        assert_eq!(refs, vec![bare("Live")]);
    }

    #[test]
    fn line_comments_run_to_end_of_line_only() {
        let refs = extract_references("[A] // was [B]\n+ [C]");
        assert_eq!(refs, vec![bare("A"), bare("C")]);
    }

    #[test]
    fn string_literals_hide_bracket_text() {
        let refs = extract_references("IF [Region] = 'see [notes]' THEN \"[n/a]\" ELSE '' END");
        assert_eq!(refs, vec![bare("Region")]);
    }

    #[test]
    fn escaped_quotes_do_not_terminate_a_literal() {
        let refs = extract_references(r#"[A] + 'it\'s [not] a ref' + [B]"#);
        assert_eq!(refs, vec![bare("A"), bare("B")]);
    }

    #[test]
    fn malformed_bracket_sequences_are_skipped() {
        assert_eq!(extract_references("[unterminated + 1"), Vec::new());
        assert_eq!(extract_references("]["), Vec::new());
        assert_eq!(extract_references("[]"), Vec::new());
        // The nested open bracket poisons the outer token but the inner
        // well-formed token still matches.
        assert_eq!(extract_references("[outer [inner]]"), vec![bare("inner")]);
    }

    #[test]
    fn qualified_token_is_not_split_into_bare_tokens() {
        let refs = extract_references("[ds].[f]");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].qualifier.as_deref(), Some("ds"));
    }

    #[test]
    fn dot_without_second_bracket_yields_a_bare_token() {
        let refs = extract_references("[a].b");
        assert_eq!(refs, vec![bare("a")]);
    }

    #[test]
    fn empty_formula_yields_no_references() {
        assert_eq!(extract_references(""), Vec::new());
    }
}
