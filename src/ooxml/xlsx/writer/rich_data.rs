//! Rich value parts for images placed inside cells.
//!
//! An embedded image cell carries a `vm` index into `xl/metadata.xml`, which
//! points at a rich value in `xl/richData/rdrichvalue.xml`. The rich value
//! names the image through `xl/richData/richValueRel.xml`.

use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::namespace;
use std::fmt::Write as FmtWrite;

/// `CalcOrigin` of an image inserted from a local file.
const CALC_ORIGIN_LOCAL: u8 = 5;
/// `CalcOrigin` of an image marked decorative.
const CALC_ORIGIN_DECORATIVE: u8 = 6;

/// One rich value: an embedded image instance.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RichImage {
    /// Index into the `richValueRel` list
    pub rel_index: u32,
    pub alt_text: String,
    pub decorative: bool,
}

impl RichImage {
    fn has_text(&self) -> bool {
        !self.decorative && !self.alt_text.is_empty()
    }
}

/// Generate `xl/metadata.xml` with one value metadata block per image.
pub(crate) fn metadata_xml(count: usize) -> Result<String> {
    let mut xml = String::with_capacity(1024 + count * 160);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<metadata xmlns="{}" xmlns:xlrd="{}">"#,
        namespace::SML_MAIN,
        namespace::RICH_DATA
    )?;
    xml.push_str(r#"<metadataTypes count="1"><metadataType name="XLRICHVALUE" minSupportedVersion="120000" copy="1" pasteAll="1" pasteValues="1" merge="1" splitFirst="1" rowColShift="1" clearFormats="1" clearComments="1" assign="1" coerce="1"/></metadataTypes>"#);

    write!(xml, r#"<futureMetadata name="XLRICHVALUE" count="{}">"#, count)?;
    for index in 0..count {
        write!(
            xml,
            r#"<bk><extLst><ext uri="{{3e2802c4-a4d2-4d8b-9148-e3be6c30e623}}"><xlrd:rvb i="{}"/></ext></extLst></bk>"#,
            index
        )?;
    }
    xml.push_str("</futureMetadata>");

    write!(xml, r#"<valueMetadata count="{}">"#, count)?;
    for index in 0..count {
        write!(xml, r#"<bk><rc t="1" v="{}"/></bk>"#, index)?;
    }
    xml.push_str("</valueMetadata></metadata>");
    Ok(xml)
}

/// Structure index used by each image: plain images first seen wins slot 0.
fn structure_order(images: &[RichImage]) -> Vec<bool> {
    let mut order = Vec::with_capacity(2);
    for image in images {
        let text = image.has_text();
        if !order.contains(&text) {
            order.push(text);
        }
    }
    order
}

/// Generate `xl/richData/rdrichvalue.xml`.
pub(crate) fn rich_value_xml(images: &[RichImage]) -> Result<String> {
    let order = structure_order(images);
    let mut xml = String::with_capacity(512 + images.len() * 96);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<rvData xmlns="{}" count="{}">"#,
        namespace::RICH_DATA,
        images.len()
    )?;

    for image in images {
        let structure = order.iter().position(|t| *t == image.has_text()).unwrap_or(0);
        let origin = if image.decorative {
            CALC_ORIGIN_DECORATIVE
        } else {
            CALC_ORIGIN_LOCAL
        };
        write!(
            xml,
            r#"<rv s="{}"><v>{}</v><v>{}</v>"#,
            structure, image.rel_index, origin
        )?;
        if image.has_text() {
            write!(xml, "<v>{}</v>", escape_xml(&image.alt_text))?;
        }
        xml.push_str("</rv>");
    }

    xml.push_str("</rvData>");
    Ok(xml)
}

/// Generate `xl/richData/rdrichvaluestructure.xml`.
pub(crate) fn rich_value_structure_xml(images: &[RichImage]) -> Result<String> {
    let order = structure_order(images);
    let mut xml = String::with_capacity(512);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<rvStructures xmlns="{}" count="{}">"#,
        namespace::RICH_DATA,
        order.len()
    )?;
    for with_text in order {
        xml.push_str(r#"<s t="_localImage"><k n="_rvRel:LocalImageIdentifier" t="i"/><k n="CalcOrigin" t="i"/>"#);
        if with_text {
            xml.push_str(r#"<k n="Text" t="s"/>"#);
        }
        xml.push_str("</s>");
    }
    xml.push_str("</rvStructures>");
    Ok(xml)
}

/// Generate `xl/richData/rdRichValueTypes.xml`.
pub(crate) fn rich_value_types_xml() -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<rvTypesInfo xmlns="{}" xmlns:mc="http://schemas.openxmlformats.org/markup-compatibility/2006" mc:Ignorable="x" xmlns:x="{}"><global><keyFlags>"#,
        namespace::RICH_DATA2,
        namespace::SML_MAIN
    )?;
    xml.push_str(r#"<key name="_Self"><flag name="ExcludeFromFile" value="1"/><flag name="ExcludeFromCalcComparison" value="1"/></key>"#);
    for key in [
        "_DisplayString",
        "_Flags",
        "_Format",
        "_SubLabel",
        "_Attribution",
        "_Icon",
        "_Display",
        "_CanonicalPropertyNames",
        "_ClassificationId",
    ] {
        write!(
            xml,
            r#"<key name="{}"><flag name="ExcludeFromCalcComparison" value="1"/></key>"#,
            key
        )?;
    }
    xml.push_str("</keyFlags></global></rvTypesInfo>");
    Ok(xml)
}

/// Generate `xl/richData/richValueRel.xml` for `rel_ids` in index order.
pub(crate) fn rich_value_rel_xml(rel_ids: &[String]) -> Result<String> {
    let mut xml = String::with_capacity(256 + rel_ids.len() * 32);
    xml.push_str(XML_DECLARATION);
    write!(
        xml,
        r#"<richValueRels xmlns="{}" xmlns:r="{}">"#,
        namespace::RICH_VALUE_REL,
        namespace::OFC_RELATIONSHIPS
    )?;
    for r_id in rel_ids {
        write!(xml, r#"<rel r:id="{}"/>"#, r_id)?;
    }
    xml.push_str("</richValueRels>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(rel_index: u32, alt_text: &str, decorative: bool) -> RichImage {
        RichImage {
            rel_index,
            alt_text: alt_text.to_string(),
            decorative,
        }
    }

    #[test]
    fn test_metadata_counts() {
        let xml = metadata_xml(2).unwrap();
        assert!(xml.contains(r#"<futureMetadata name="XLRICHVALUE" count="2">"#));
        assert!(xml.contains(r#"<xlrd:rvb i="1"/>"#));
        assert!(xml.contains(r#"<valueMetadata count="2"><bk><rc t="1" v="0"/></bk><bk><rc t="1" v="1"/></bk></valueMetadata>"#));
    }

    #[test]
    fn test_rich_values_share_structures() {
        let images = [
            image(0, "", false),
            image(1, "Logo & mark", false),
            image(0, "ignored", true),
        ];
        let values = rich_value_xml(&images).unwrap();
        assert!(values.contains(r#"count="3">"#));
        assert!(values.contains(r#"<rv s="0"><v>0</v><v>5</v></rv>"#));
        assert!(values.contains(r#"<rv s="1"><v>1</v><v>5</v><v>Logo &amp; mark</v></rv>"#));
        assert!(values.contains(r#"<rv s="0"><v>0</v><v>6</v></rv>"#));

        let structures = rich_value_structure_xml(&images).unwrap();
        assert!(structures.contains(r#"count="2">"#));
        assert_eq!(structures.matches(r#"<k n="Text" t="s"/>"#).count(), 1);
    }

    #[test]
    fn test_rich_value_rels() {
        let xml = rich_value_rel_xml(&["rId1".to_string(), "rId2".to_string()]).unwrap();
        assert!(xml.contains(r#"<rel r:id="rId1"/><rel r:id="rId2"/></richValueRels>"#));
        assert!(rich_value_types_xml().unwrap().contains(r#"<key name="_Self">"#));
    }
}
