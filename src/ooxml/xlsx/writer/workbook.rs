//! Workbook part (`xl/workbook.xml`) generation.

use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::namespace;
use std::fmt::Write as FmtWrite;

/// A `<definedName>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefinedName {
    /// Name as written, e.g. `_xlnm.Print_Area` or `Sales`
    pub name: String,
    /// Index of the owning sheet for sheet-scoped names
    pub local_sheet: Option<usize>,
    /// Formula text without the leading `=`
    pub reference: String,
}

impl DefinedName {
    /// Key Excel sorts names by: case-insensitive, ignoring the `_xlnm.` prefix.
    pub(crate) fn sort_key(&self) -> (String, usize) {
        let bare = self.name.strip_prefix("_xlnm.").unwrap_or(&self.name);
        (bare.to_lowercase(), self.local_sheet.map_or(0, |index| index + 1))
    }

    /// True for the built-in names Excel manages itself.
    pub(crate) fn is_builtin(&self) -> bool {
        self.name.starts_with("_xlnm.")
    }
}

/// A `<sheet>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SheetEntry<'a> {
    pub name: &'a str,
    pub r_id: String,
    pub hidden: bool,
}

/// Everything `xl/workbook.xml` needs.
#[derive(Debug, Clone, Default)]
pub(crate) struct WorkbookXml<'a> {
    pub sheets: Vec<SheetEntry<'a>>,
    /// Sorted defined names
    pub defined_names: Vec<DefinedName>,
    pub active_tab: usize,
    pub first_sheet: usize,
    pub read_only_recommended: bool,
}

impl WorkbookXml<'_> {
    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(1024 + self.sheets.len() * 96);
        xml.push_str(XML_DECLARATION);
        write!(
            xml,
            r#"<workbook xmlns="{}" xmlns:r="{}">"#,
            namespace::SML_MAIN,
            namespace::OFC_RELATIONSHIPS
        )?;
        xml.push_str(r#"<fileVersion appName="xl" lastEdited="4" lowestEdited="4" rupBuild="4505"/>"#);
        if self.read_only_recommended {
            xml.push_str(r#"<fileSharing readOnlyRecommended="1"/>"#);
        }
        xml.push_str(r#"<workbookPr defaultThemeVersion="124226"/>"#);

        xml.push_str(r#"<bookViews><workbookView xWindow="240" yWindow="15" windowWidth="16095" windowHeight="9660""#);
        if self.first_sheet > 0 {
            write!(xml, r#" firstSheet="{}""#, self.first_sheet)?;
        }
        if self.active_tab > 0 {
            write!(xml, r#" activeTab="{}""#, self.active_tab)?;
        }
        xml.push_str("/></bookViews>");

        // ===== Sheets =====
        xml.push_str("<sheets>");
        for (index, sheet) in self.sheets.iter().enumerate() {
            write!(
                xml,
                r#"<sheet name="{}" sheetId="{}""#,
                escape_xml(sheet.name),
                index + 1
            )?;
            if sheet.hidden {
                xml.push_str(r#" state="hidden""#);
            }
            write!(xml, r#" r:id="{}"/>"#, sheet.r_id)?;
        }
        xml.push_str("</sheets>");

        // ===== Defined names =====
        if !self.defined_names.is_empty() {
            xml.push_str("<definedNames>");
            for defined in &self.defined_names {
                write!(xml, r#"<definedName name="{}""#, escape_xml(&defined.name))?;
                if let Some(sheet) = defined.local_sheet {
                    write!(xml, r#" localSheetId="{}""#, sheet)?;
                }
                write!(xml, ">{}</definedName>", escape_xml(&defined.reference))?;
            }
            xml.push_str("</definedNames>");
        }

        xml.push_str(r#"<calcPr calcId="124519" fullCalcOnLoad="1"/></workbook>"#);
        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheets() -> Vec<SheetEntry<'static>> {
        vec![
            SheetEntry {
                name: "Data & Notes",
                r_id: "rId1".to_string(),
                hidden: false,
            },
            SheetEntry {
                name: "Hidden",
                r_id: "rId2".to_string(),
                hidden: true,
            },
        ]
    }

    #[test]
    fn test_minimal_workbook() {
        let xml = WorkbookXml {
            sheets: sheets(),
            ..Default::default()
        }
        .to_xml()
        .unwrap();

        assert!(xml.contains(r#"<workbookView xWindow="240" yWindow="15" windowWidth="16095" windowHeight="9660"/>"#));
        assert!(xml.contains(r#"<sheet name="Data &amp; Notes" sheetId="1" r:id="rId1"/>"#));
        assert!(xml.contains(r#"<sheet name="Hidden" sheetId="2" state="hidden" r:id="rId2"/>"#));
        assert!(!xml.contains("<definedNames>"));
        assert!(!xml.contains("fileSharing"));
    }

    #[test]
    fn test_views_and_names() {
        let xml = WorkbookXml {
            sheets: sheets(),
            defined_names: vec![DefinedName {
                name: "_xlnm.Print_Area".to_string(),
                local_sheet: Some(0),
                reference: "'Data & Notes'!$A$1:$B$4".to_string(),
            }],
            active_tab: 1,
            first_sheet: 0,
            read_only_recommended: true,
        }
        .to_xml()
        .unwrap();

        assert!(xml.contains(r#"<fileSharing readOnlyRecommended="1"/>"#));
        assert!(xml.contains(r#" activeTab="1"/>"#));
        assert!(xml.contains(r#"<definedName name="_xlnm.Print_Area" localSheetId="0">'Data &amp; Notes'!$A$1:$B$4</definedName>"#));
    }

    #[test]
    fn test_sort_key_ignores_builtin_prefix() {
        let mut names = [
            DefinedName {
                name: "_xlnm.Print_Titles".to_string(),
                local_sheet: Some(0),
                reference: String::new(),
            },
            DefinedName {
                name: "Alpha".to_string(),
                local_sheet: None,
                reference: String::new(),
            },
            DefinedName {
                name: "_xlnm.Print_Area".to_string(),
                local_sheet: Some(0),
                reference: String::new(),
            },
        ];
        names.sort_by_key(DefinedName::sort_key);
        let order: Vec<&str> = names.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(order, ["Alpha", "_xlnm.Print_Area", "_xlnm.Print_Titles"]);
        assert!(names[1].is_builtin());
    }
}
