//! Document properties of a workbook.
//!
//! These properties are stored in the `docProps/core.xml` and
//! `docProps/app.xml` parts of the package.

use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::error::Result;
use chrono::{DateTime, Utc};
use std::fmt::Write as FmtWrite;

/// Document metadata shown in Excel's File > Info pane.
///
/// ```
/// use longan::{DocProperties, Workbook};
///
/// let mut properties = DocProperties::new();
/// properties
///     .set_title("Quarterly Report")
///     .set_author("Finance")
///     .set_company("Example Ltd");
///
/// let mut workbook = Workbook::new();
/// workbook.set_properties(&properties);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DocProperties {
    pub(crate) title: Option<String>,
    pub(crate) subject: Option<String>,
    pub(crate) author: Option<String>,
    pub(crate) manager: Option<String>,
    pub(crate) company: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) keywords: Option<String>,
    pub(crate) comment: Option<String>,
    pub(crate) status: Option<String>,
    pub(crate) hyperlink_base: Option<String>,
    /// Creation time; the workbook's clock is used when unset
    pub(crate) created: Option<DateTime<Utc>>,
}

impl DocProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the document title.
    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn set_subject(&mut self, subject: &str) -> &mut Self {
        self.subject = Some(subject.to_string());
        self
    }

    /// Set the author, also written as the last modifier.
    pub fn set_author(&mut self, author: &str) -> &mut Self {
        self.author = Some(author.to_string());
        self
    }

    pub fn set_manager(&mut self, manager: &str) -> &mut Self {
        self.manager = Some(manager.to_string());
        self
    }

    pub fn set_company(&mut self, company: &str) -> &mut Self {
        self.company = Some(company.to_string());
        self
    }

    pub fn set_category(&mut self, category: &str) -> &mut Self {
        self.category = Some(category.to_string());
        self
    }

    /// Set the keywords, usually comma separated.
    pub fn set_keywords(&mut self, keywords: &str) -> &mut Self {
        self.keywords = Some(keywords.to_string());
        self
    }

    pub fn set_comment(&mut self, comment: &str) -> &mut Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// Set the content status (e.g., "Draft", "Final").
    pub fn set_status(&mut self, status: &str) -> &mut Self {
        self.status = Some(status.to_string());
        self
    }

    /// Base for relative hyperlinks in the workbook.
    pub fn set_hyperlink_base(&mut self, hyperlink_base: &str) -> &mut Self {
        self.hyperlink_base = Some(hyperlink_base.to_string());
        self
    }

    /// Set the creation time.
    pub fn set_creation_datetime(&mut self, created: DateTime<Utc>) -> &mut Self {
        self.created = Some(created);
        self
    }

    /// Generate `docProps/core.xml`.
    pub(crate) fn core_xml(&self, created: DateTime<Utc>) -> Result<String> {
        let mut xml = String::with_capacity(1024);
        xml.push_str(XML_DECLARATION);
        xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);

        push_element(&mut xml, "dc:title", &self.title);
        push_element(&mut xml, "dc:subject", &self.subject);
        push_element(&mut xml, "dc:creator", &self.author);
        push_element(&mut xml, "cp:keywords", &self.keywords);
        push_element(&mut xml, "dc:description", &self.comment);
        push_element(&mut xml, "cp:lastModifiedBy", &self.author);

        // Both stamps use the creation time so output is reproducible
        let stamp = self.created.unwrap_or(created).format("%Y-%m-%dT%H:%M:%SZ");
        write!(
            xml,
            r#"<dcterms:created xsi:type="dcterms:W3CDTF">{stamp}</dcterms:created><dcterms:modified xsi:type="dcterms:W3CDTF">{stamp}</dcterms:modified>"#
        )?;

        push_element(&mut xml, "cp:category", &self.category);
        push_element(&mut xml, "cp:contentStatus", &self.status);

        xml.push_str("</cp:coreProperties>");
        Ok(xml)
    }

    /// Generate `docProps/app.xml`.
    ///
    /// `sheet_names` are the worksheet names in tab order and `named_ranges`
    /// the defined names Excel lists as titles.
    pub(crate) fn app_xml(&self, sheet_names: &[&str], named_ranges: &[String]) -> Result<String> {
        let mut xml = String::with_capacity(1024);
        xml.push_str(XML_DECLARATION);
        xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
        xml.push_str("<Application>Microsoft Excel</Application><DocSecurity>0</DocSecurity><ScaleCrop>false</ScaleCrop>");

        // Heading pairs: a label and a count per group of titles
        let mut pairs = vec![("Worksheets", sheet_names.len())];
        if !named_ranges.is_empty() {
            pairs.push(("Named Ranges", named_ranges.len()));
        }
        write!(
            xml,
            r#"<HeadingPairs><vt:vector size="{}" baseType="variant">"#,
            pairs.len() * 2
        )?;
        for (label, count) in &pairs {
            write!(
                xml,
                "<vt:variant><vt:lpstr>{}</vt:lpstr></vt:variant><vt:variant><vt:i4>{}</vt:i4></vt:variant>",
                label, count
            )?;
        }
        xml.push_str("</vt:vector></HeadingPairs>");

        write!(
            xml,
            r#"<TitlesOfParts><vt:vector size="{}" baseType="lpstr">"#,
            sheet_names.len() + named_ranges.len()
        )?;
        for title in sheet_names
            .iter()
            .copied()
            .chain(named_ranges.iter().map(String::as_str))
        {
            write!(xml, "<vt:lpstr>{}</vt:lpstr>", escape_xml(title))?;
        }
        xml.push_str("</vt:vector></TitlesOfParts>");

        push_element(&mut xml, "Manager", &self.manager);
        write!(
            xml,
            "<Company>{}</Company>",
            escape_xml(self.company.as_deref().unwrap_or_default())
        )?;
        xml.push_str("<LinksUpToDate>false</LinksUpToDate><SharedDoc>false</SharedDoc>");
        push_element(&mut xml, "HyperlinkBase", &self.hyperlink_base);
        xml.push_str("<HyperlinksChanged>false</HyperlinksChanged><AppVersion>12.0000</AppVersion></Properties>");
        Ok(xml)
    }
}

fn push_element(xml: &mut String, tag: &str, value: &Option<String>) {
    if let Some(value) = value {
        xml.push('<');
        xml.push_str(tag);
        xml.push('>');
        xml.push_str(&escape_xml(value));
        xml.push_str("</");
        xml.push_str(tag);
        xml.push('>');
    }
}
