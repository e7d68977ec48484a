use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;
use std::borrow::Cow;

// Static initialization: automaton is built only once, thread-safe
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\""])
        .expect("Failed to build XML escaper")
});

/// Escape XML special characters for attribute values and element text.
///
/// # Examples
///
/// ```
/// use longan::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// ```
#[inline]
pub fn escape_xml(s: &str) -> String {
    XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;"])
}

/// Escape a cell string for SpreadsheetML text nodes.
///
/// Control characters are not allowed in XML 1.0, so SpreadsheetML encodes
/// them as `_xHHHH_`. A literal `_xHHHH_` sequence in the input is protected
/// by escaping its leading underscore the same way.
///
/// ```
/// use longan::common::xml::escape_cell_text;
/// assert_eq!(escape_cell_text("a\u{1}b"), "a_x0001_b");
/// assert_eq!(escape_cell_text("tab\tkept"), "tab\tkept");
/// ```
pub fn escape_cell_text(s: &str) -> String {
    let needs_control_escape = s
        .bytes()
        .any(|b| b < 0x20 && b != b'\t' && b != b'\n' && b != b'\r')
        || s.contains("_x");

    let text: Cow<'_, str> = if needs_control_escape {
        let mut out = String::with_capacity(s.len() + 8);
        let bytes = s.as_bytes();
        for (i, c) in s.char_indices() {
            match c {
                '\t' | '\n' | '\r' => out.push(c),
                c if (c as u32) < 0x20 => {
                    out.push_str("_x00");
                    out.push(hex_digit((c as u8) >> 4));
                    out.push(hex_digit((c as u8) & 0x0f));
                    out.push('_');
                },
                '_' if is_escape_sequence(&bytes[i..]) => out.push_str("_x005F_"),
                _ => out.push(c),
            }
        }
        Cow::Owned(out)
    } else {
        Cow::Borrowed(s)
    };

    escape_xml(&text)
}

#[inline]
fn hex_digit(nibble: u8) -> char {
    char::from(b"0123456789ABCDEF"[nibble as usize])
}

/// `_xHHHH_` with four hex digits.
fn is_escape_sequence(bytes: &[u8]) -> bool {
    bytes.len() >= 7
        && bytes[0] == b'_'
        && bytes[1] == b'x'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit)
        && bytes[6] == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("plain"), "plain");
        assert_eq!(escape_xml("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
        assert_eq!(escape_xml("it's"), "it's");
    }

    #[test]
    fn test_escape_cell_text_control_chars() {
        assert_eq!(escape_cell_text("\u{0}\u{1f}"), "_x0000__x001F_");
        assert_eq!(escape_cell_text("line\nbreak"), "line\nbreak");
    }

    #[test]
    fn test_escape_cell_text_literal_sequence() {
        assert_eq!(escape_cell_text("_x0041_"), "_x005F_x0041_");
        assert_eq!(escape_cell_text("_x_y"), "_x_y");
        assert_eq!(escape_cell_text("a & _x12"), "a &amp; _x12");
    }
}
