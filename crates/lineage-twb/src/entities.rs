//! XML entity decoding for formula text.
//!
//! Workbook files store formulas as attribute text, so line breaks arrive as
//! numeric character references and operators like `<` or `&&` arrive as
//! named entities. Decoding happens once, before the formula is stored on
//! its node; everything downstream (the reference scanner included) sees
//! literal characters.

/// Decode the entities workbook formulas actually use.
///
/// - the numeric carriage-return/line-feed pair becomes a real CRLF
/// - the five standard named entities become their literal characters
///
/// `&amp;` is decoded last so that `&amp;lt;` comes out as `&lt;` rather
/// than `<`.
pub fn decode_entities(text: &str) -> String {
    text.replace("&#13;&#10;", "\r\n")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crlf_pair_becomes_a_real_line_break() {
        assert_eq!(decode_entities("a&#13;&#10;b"), "a\r\nb");
    }

    #[test]
    fn named_entities_become_literals() {
        assert_eq!(decode_entities("x &lt; y &amp;&amp; z"), "x < y && z");
        assert_eq!(decode_entities("&quot;hi&quot; &apos;there&apos;"), "\"hi\" 'there'");
        assert_eq!(decode_entities("a &gt;= b"), "a >= b");
    }

    #[test]
    fn double_escaped_ampersand_decodes_one_level() {
        assert_eq!(decode_entities("&amp;lt;"), "&lt;");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(decode_entities("[Profit] / [Sales]"), "[Profit] / [Sales]");
    }
}
