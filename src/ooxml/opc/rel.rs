//! Relationship objects for package parts.
//!
//! A writer only ever appends relationships, so the collection keeps them in
//! insertion order and numbers them `rId1`, `rId2`, … as they arrive.

use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::opc::constants::{namespace, target_mode};

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference - either a relative part reference or external URL
    target_ref: String,

    /// Whether this is an external relationship
    is_external: bool,
}

impl Relationship {
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }
}

/// Ordered collection of relationships from a single source part.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or add an internal relationship and return its rId.
    ///
    /// A relationship of the same type to the same target is reused.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> String {
        self.find_or_push(reltype, target_ref, false)
    }

    /// Get or add an external relationship and return its rId.
    pub fn get_or_add_ext_rel(&mut self, reltype: &str, target_ref: &str) -> String {
        self.find_or_push(reltype, target_ref, true)
    }

    fn find_or_push(&mut self, reltype: &str, target_ref: &str, is_external: bool) -> String {
        if let Some(rel) = self.rels.iter().find(|rel| {
            rel.reltype == reltype && rel.target_ref == target_ref && rel.is_external == is_external
        }) {
            return rel.r_id.clone();
        }

        let r_id = self.next_r_id();
        self.rels.push(Relationship {
            r_id: r_id.clone(),
            reltype: reltype.to_string(),
            target_ref: target_ref.to_string(),
            is_external,
        });
        r_id
    }

    /// Next free relationship ID.
    fn next_r_id(&self) -> String {
        format!("rId{}", self.rels.len() + 1)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize relationships to a .rels document, in insertion order.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);

        xml.push_str(XML_DECLARATION);
        xml.push('\n');
        xml.push_str(r#"<Relationships xmlns=""#);
        xml.push_str(namespace::OPC_RELATIONSHIPS);
        xml.push_str(r#"">"#);

        for rel in &self.rels {
            xml.push_str(r#"<Relationship Id=""#);
            xml.push_str(&rel.r_id);
            xml.push_str(r#"" Type=""#);
            xml.push_str(&escape_xml(&rel.reltype));
            xml.push_str(r#"" Target=""#);
            xml.push_str(&escape_xml(&rel.target_ref));
            xml.push('"');
            if rel.is_external {
                xml.push_str(r#" TargetMode=""#);
                xml.push_str(target_mode::EXTERNAL);
                xml.push('"');
            }
            xml.push_str("/>");
        }

        xml.push_str("</Relationships>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_add() {
        let mut rels = Relationships::new();

        assert_eq!(rels.get_or_add("type1", "target1"), "rId1");
        // Same type and target reuse the rId
        assert_eq!(rels.get_or_add("type1", "target1"), "rId1");
        assert_eq!(rels.get_or_add("type1", "target2"), "rId2");
        assert_eq!(rels.get_or_add_ext_rel("type1", "target1"), "rId3");
        assert_eq!(rels.len(), 3);
    }

    #[test]
    fn test_to_xml_keeps_insertion_order() {
        let mut rels = Relationships::new();
        rels.get_or_add("http://example.com/b", "b.xml");
        rels.get_or_add_ext_rel("http://example.com/link", "https://example.com/?a=1&b=2");

        let xml = rels.to_xml();
        let first = xml.find("rId1").unwrap();
        let second = xml.find("rId2").unwrap();
        assert!(first < second);
        assert!(xml.contains(r#"Target="https://example.com/?a=1&amp;b=2" TargetMode="External""#));
    }
}
