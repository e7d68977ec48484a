//! Shared strings table for XLSX workbooks.

use crate::common::xml::escape_cell_text;
use crate::ooxml::error::Result;
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

/// Shared strings table.
///
/// Excel stores cell strings in one workbook-wide table and cells refer to it
/// by index. Indices are handed out in first-seen order.
#[derive(Debug, Default)]
pub(crate) struct SharedStrings {
    /// List of unique strings
    strings: Vec<String>,
    /// Map from string to index for fast lookup
    string_to_index: HashMap<String, u32>,
    /// Number of cell references, including repeats
    references: usize,
}

impl SharedStrings {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a string and return its index.
    ///
    /// If the string already exists, returns the existing index.
    pub(crate) fn add_string(&mut self, s: &str) -> u32 {
        self.references += 1;
        if let Some(&index) = self.string_to_index.get(s) {
            return index;
        }

        let index = self.strings.len() as u32;
        self.strings.push(s.to_string());
        self.string_to_index.insert(s.to_string(), index);
        index
    }

    /// Number of unique strings.
    pub(crate) fn unique_count(&self) -> usize {
        self.strings.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Serialize the shared strings table to XML.
    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(256 + self.strings.iter().map(|s| s.len() + 16).sum::<usize>());

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{}" uniqueCount="{}">"#,
            self.references,
            self.strings.len()
        )?;

        for s in &self.strings {
            xml.push_str("<si>");
            push_text_element(&mut xml, s);
            xml.push_str("</si>");
        }

        xml.push_str("</sst>");

        Ok(xml)
    }
}

/// Write `<t>` with `xml:space="preserve"` when edge whitespace matters.
pub(crate) fn push_text_element(xml: &mut String, text: &str) {
    let preserve = text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace);
    if preserve {
        xml.push_str(r#"<t xml:space="preserve">"#);
    } else {
        xml.push_str("<t>");
    }
    xml.push_str(&escape_cell_text(text));
    xml.push_str("</t>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_strings() {
        let mut ss = SharedStrings::new();
        let idx1 = ss.add_string("Hello");
        let idx2 = ss.add_string("World");
        let idx3 = ss.add_string("Hello");

        assert_eq!(idx1, 0);
        assert_eq!(idx2, 1);
        assert_eq!(idx3, 0);
        assert_eq!(ss.unique_count(), 2);
    }

    #[test]
    fn test_xml() {
        let mut ss = SharedStrings::new();
        ss.add_string("a < b");
        ss.add_string(" padded");
        ss.add_string("a < b");

        let xml = ss.to_xml().unwrap();
        assert!(xml.contains(r#"count="3" uniqueCount="2""#));
        assert!(xml.contains("<si><t>a &lt; b</t></si>"));
        assert!(xml.contains(r#"<si><t xml:space="preserve"> padded</t></si>"#));
    }
}
