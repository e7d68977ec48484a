//! The workbook: an ordered list of worksheets plus workbook-wide settings.
//!
//! Nothing is serialized until [`Workbook::save_to_buffer`] is called; the
//! package writer then walks every worksheet and builds the style table, the
//! shared string table and every part of the `.xlsx` archive.

use crate::common::unit::{ColumnMetrics, DEFAULT_ROW_HEIGHT_PT, px_to_pt};
use crate::ooxml::error::{Result, XlsxError};
use crate::ooxml::xlsx::format::Format;
use crate::ooxml::xlsx::properties::DocProperties;
use crate::ooxml::xlsx::reference::parse_cell_ref;
use crate::ooxml::xlsx::worksheet::Worksheet;
use crate::ooxml::xlsx::writer::package;
use chrono::{DateTime, Utc};
use std::path::Path;

/// A user defined name, as given to [`Workbook::define_name`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct UserName {
    /// Owning sheet for `Sheet!Name` style names
    pub sheet: Option<String>,
    pub name: String,
    /// Formula without the leading `=`
    pub formula: String,
}

/// An Excel workbook under construction.
///
/// ```
/// use longan::{Format, Workbook};
///
/// let mut workbook = Workbook::new();
/// let mut bold = Format::new();
/// bold.set_bold();
///
/// let worksheet = workbook.add_worksheet();
/// worksheet.write_with_format(0, 0, "Region", &bold)?;
/// worksheet.write(1, 0, "North")?;
/// worksheet.write(1, 1, 1250.5)?;
///
/// let bytes = workbook.save_to_buffer()?;
/// assert_eq!(&bytes[..2], b"PK");
/// # Ok::<(), longan::XlsxError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Workbook {
    pub(crate) worksheets: Vec<Worksheet>,
    pub(crate) default_format: Option<Format>,
    pub(crate) metrics: ColumnMetrics,
    /// Default row height in points
    pub(crate) default_row_height: f64,
    pub(crate) properties: DocProperties,
    pub(crate) created: Option<DateTime<Utc>>,
    pub(crate) user_names: Vec<UserName>,
    pub(crate) read_only_recommended: bool,
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

impl Workbook {
    pub fn new() -> Workbook {
        Workbook {
            worksheets: Vec::new(),
            default_format: None,
            metrics: ColumnMetrics::default(),
            default_row_height: DEFAULT_ROW_HEIGHT_PT,
            properties: DocProperties::default(),
            created: None,
            user_names: Vec::new(),
            read_only_recommended: false,
        }
    }

    /// Append a worksheet named `SheetN` and return it.
    pub fn add_worksheet(&mut self) -> &mut Worksheet {
        let name = format!("Sheet{}", self.worksheets.len() + 1);
        log::debug!("adding worksheet {}", name);
        let worksheet = Worksheet::new(name, self.metrics, self.default_row_height);
        self.worksheets.push(worksheet);
        let last = self.worksheets.len() - 1;
        &mut self.worksheets[last]
    }

    /// The worksheet at `index` in tab order.
    pub fn worksheet_from_index(&mut self, index: usize) -> Result<&mut Worksheet> {
        let count = self.worksheets.len();
        self.worksheets.get_mut(index).ok_or_else(|| {
            XlsxError::range(format!(
                "Worksheet index {} is out of range for {} worksheet(s)",
                index, count
            ))
        })
    }

    /// The worksheet called `name`.
    pub fn worksheet_from_name(&mut self, name: &str) -> Result<&mut Worksheet> {
        self.worksheets
            .iter_mut()
            .find(|sheet| sheet.name() == name)
            .ok_or_else(|| XlsxError::config(format!("Unknown worksheet name '{}'", name)))
    }

    /// Number of worksheets.
    pub fn worksheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Replace the default cell format of the workbook.
    ///
    /// `row_height` and `col_width` are the default row height and column
    /// width in pixels that the format's font produces, e.g. 20 and 64 for
    /// Calibri 11. Must be called before any worksheet is added.
    ///
    /// ```
    /// use longan::{Format, Workbook};
    ///
    /// let mut workbook = Workbook::new();
    /// let mut format = Format::new();
    /// format.set_font_name("Aptos Narrow")?.set_font_size(11.0)?;
    /// workbook.set_default_format(&format, 20, 64)?;
    ///
    /// workbook.add_worksheet();
    /// assert!(workbook.set_default_format(&format, 20, 64).is_err());
    /// # Ok::<(), longan::XlsxError>(())
    /// ```
    pub fn set_default_format(&mut self, format: &Format, row_height: u32, col_width: u32) -> Result<&mut Self> {
        if !self.worksheets.is_empty() {
            return Err(XlsxError::config(
                "Default format must be set before adding worksheets.",
            ));
        }
        let metrics = ColumnMetrics::from_default_width_px(col_width).ok_or_else(|| {
            XlsxError::config(format!("Unsupported default column width: {}", col_width))
        })?;
        if row_height == 0 || row_height > 545 {
            return Err(XlsxError::range(format!(
                "Default row height {} px is outside 1..=545",
                row_height
            )));
        }

        self.default_format = Some(format.clone());
        self.metrics = metrics;
        self.default_row_height = px_to_pt(row_height as f64);
        Ok(self)
    }

    /// Define a name for a value, cell or range.
    ///
    /// `Sheet1!Sales` defines a name local to `Sheet1`; a plain name is
    /// global. The formula may start with `=`.
    ///
    /// ```
    /// use longan::Workbook;
    ///
    /// let mut workbook = Workbook::new();
    /// workbook.add_worksheet();
    /// workbook.define_name("Exchange_rate", "=0.96")?;
    /// workbook.define_name("Sheet1!Sales", "=Sheet1!$G$1:$H$10")?;
    /// assert!(workbook.define_name("A1", "=1").is_err());
    /// # Ok::<(), longan::XlsxError>(())
    /// ```
    pub fn define_name(&mut self, name: &str, formula: &str) -> Result<&mut Self> {
        let (sheet, bare) = match name.rsplit_once('!') {
            Some((sheet, bare)) => {
                let sheet = sheet
                    .strip_prefix('\'')
                    .and_then(|s| s.strip_suffix('\''))
                    .map(|s| s.replace("''", "'"))
                    .unwrap_or_else(|| sheet.to_string());
                (Some(sheet), bare)
            },
            None => (None, name),
        };
        validate_defined_name(bare)?;

        let formula = formula.trim();
        let formula = formula.strip_prefix('=').unwrap_or(formula);
        if formula.is_empty() {
            return Err(XlsxError::parse(format!("Defined name '{}' has an empty formula", name)));
        }

        let duplicate = self.user_names.iter().any(|existing| {
            existing.sheet == sheet && existing.name.eq_ignore_ascii_case(bare)
        });
        if duplicate {
            return Err(XlsxError::config(format!("Defined name '{}' already exists", name)));
        }

        self.user_names.push(UserName {
            sheet,
            name: bare.to_string(),
            formula: formula.to_string(),
        });
        Ok(self)
    }

    /// Ask Excel to suggest opening the file read-only.
    pub fn read_only_recommended(&mut self) -> &mut Self {
        self.read_only_recommended = true;
        self
    }

    pub fn set_properties(&mut self, properties: &DocProperties) -> &mut Self {
        self.properties = properties.clone();
        self
    }

    /// Fix the creation time written to `docProps/core.xml`.
    ///
    /// Two saves of the same workbook with the same creation time produce
    /// identical bytes.
    pub fn set_created(&mut self, created: DateTime<Utc>) -> &mut Self {
        self.created = Some(created);
        self
    }

    /// Serialize the workbook to `.xlsx` bytes.
    ///
    /// A workbook without worksheets gets an empty `Sheet1`.
    pub fn save_to_buffer(&mut self) -> Result<Vec<u8>> {
        self.check_sheet_names()?;
        self.settle_active_sheet();

        let created = self
            .properties
            .created
            .or(self.created)
            .unwrap_or_else(Utc::now);
        package::assemble(self, created)
    }

    /// Serialize the workbook and write it to `path`.
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let bytes = self.save_to_buffer()?;
        std::fs::write(path.as_ref(), bytes)?;
        log::debug!("saved workbook to {}", path.as_ref().display());
        Ok(())
    }

    fn check_sheet_names(&self) -> Result<()> {
        for (index, sheet) in self.worksheets.iter().enumerate() {
            let clash = self.worksheets[..index]
                .iter()
                .any(|other| other.name().to_lowercase() == sheet.name().to_lowercase());
            if clash {
                return Err(XlsxError::config(format!(
                    "Worksheet name '{}' is already in use",
                    sheet.name()
                )));
            }
        }
        Ok(())
    }

    /// Exactly one worksheet is active: the last one marked, else the first.
    fn settle_active_sheet(&mut self) {
        let active = self
            .worksheets
            .iter()
            .rposition(|sheet| sheet.active)
            .unwrap_or(0);
        for (index, sheet) in self.worksheets.iter_mut().enumerate() {
            sheet.active = index == active;
            if index == active {
                sheet.hidden = false;
            }
        }
    }

    /// Index of the active worksheet.
    pub(crate) fn active_index(&self) -> usize {
        self.worksheets.iter().position(|sheet| sheet.active).unwrap_or(0)
    }
}

fn validate_defined_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().count() > 255 {
        return Err(XlsxError::range(format!(
            "Defined name '{}' must be 1 to 255 characters long",
            name
        )));
    }

    let first_ok = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '\\');
    let rest_ok = name
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '\\'));
    let reserved = matches!(name.to_ascii_uppercase().as_str(), "R" | "C");

    if !first_ok || !rest_ok || reserved || parse_cell_ref(name).is_some() {
        return Err(XlsxError::parse(format!("Invalid defined name '{}'", name)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::error::ErrorKind;
    use chrono::TimeZone;
    use std::io::{Cursor, Read};

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut file = archive.by_name(name).unwrap();
        let mut content = String::new();
        file.read_to_string(&mut content).unwrap();
        content
    }

    fn part_names(bytes: &[u8]) -> Vec<String> {
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        archive.file_names().map(str::to_string).collect()
    }

    #[test]
    fn test_sheet_names_are_sequential() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        workbook.add_worksheet().set_name("Data").unwrap();
        workbook.add_worksheet();

        assert_eq!(workbook.worksheet_from_index(2).unwrap().name(), "Sheet3");
        assert!(workbook.worksheet_from_name("Data").is_ok());
        assert_eq!(workbook.worksheet_from_index(3).unwrap_err().kind(), ErrorKind::Range);
        assert_eq!(
            workbook.worksheet_from_name("Missing").unwrap_err().kind(),
            ErrorKind::Configuration
        );
    }

    #[test]
    fn test_default_format_before_sheets() {
        let mut workbook = Workbook::new();
        let mut format = Format::new();
        format.set_font_size(12.0).unwrap();

        let err = workbook.set_default_format(&format, 20, 65).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported default column width: 65");

        workbook.set_default_format(&format, 21, 72).unwrap();
        assert_eq!(workbook.metrics.max_digit_width, 8);
        assert_eq!(workbook.default_row_height, 15.75);

        workbook.add_worksheet();
        let err = workbook.set_default_format(&format, 20, 64).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "Default format must be set before adding worksheets.");
    }

    #[test]
    fn test_define_name_validation() {
        let mut workbook = Workbook::new();
        workbook.define_name("Rate", "=0.96").unwrap();
        workbook.define_name("'My Data'!Rate", "='My Data'!$A$1").unwrap();

        assert_eq!(workbook.user_names[1].sheet.as_deref(), Some("My Data"));
        assert_eq!(workbook.user_names[1].formula, "'My Data'!$A$1");
        assert_eq!(workbook.define_name("rate", "=1").unwrap_err().kind(), ErrorKind::Configuration);
        assert_eq!(workbook.define_name("1abc", "=1").unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(workbook.define_name("XFD1", "=1").unwrap_err().kind(), ErrorKind::Parse);
        assert_eq!(workbook.define_name("", "=1").unwrap_err().kind(), ErrorKind::Range);
    }

    #[test]
    fn test_empty_workbook_gets_a_sheet() {
        let mut workbook = Workbook::new();
        let bytes = workbook.save_to_buffer().unwrap();
        let names = part_names(&bytes);

        assert_eq!(names[0], "[Content_Types].xml");
        for expected in [
            "_rels/.rels",
            "docProps/app.xml",
            "docProps/core.xml",
            "xl/workbook.xml",
            "xl/_rels/workbook.xml.rels",
            "xl/styles.xml",
            "xl/theme/theme1.xml",
            "xl/worksheets/sheet1.xml",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing {}", expected);
        }
        assert!(!names.iter().any(|n| n == "xl/sharedStrings.xml"));

        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"tabSelected="1""#));
    }

    #[test]
    fn test_saving_empty_workbook_leaves_it_empty() {
        let mut workbook = Workbook::new();
        workbook.save_to_buffer().unwrap();
        assert_eq!(workbook.worksheet_count(), 0);

        // Still configurable as a fresh workbook.
        workbook.set_default_format(&Format::new(), 20, 64).unwrap();
        assert_eq!(workbook.add_worksheet().name(), "Sheet1");

        let bytes = workbook.save_to_buffer().unwrap();
        let book = read_part(&bytes, "xl/workbook.xml");
        assert!(book.contains(r#"<sheet name="Sheet1" sheetId="1" r:id="rId1"/>"#));
        assert!(!book.contains("Sheet2"));
    }

    #[test]
    fn test_duplicate_sheet_names_fail_at_save() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet().set_name("Data").unwrap();
        workbook.add_worksheet().set_name("DATA").unwrap();

        let err = workbook.save_to_buffer().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_output_is_deterministic() {
        let build = || {
            let mut workbook = Workbook::new();
            workbook.set_created(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
            let sheet = workbook.add_worksheet();
            sheet.write(0, 0, "Hello").unwrap();
            sheet.write(1, 0, 3.25).unwrap();
            workbook.save_to_buffer().unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_active_sheet_and_names_in_workbook_xml() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        workbook.add_worksheet().set_active(true);
        workbook.add_worksheet().set_hidden(true);
        workbook.read_only_recommended();
        workbook.define_name("Sheet2!Sales", "=Sheet2!$A$1:$A$4").unwrap();
        workbook.define_name("Rate", "=0.5").unwrap();
        workbook
            .worksheet_from_index(0)
            .unwrap()
            .set_print_area(0, 0, 9, 3)
            .unwrap();

        let bytes = workbook.save_to_buffer().unwrap();
        let xml = read_part(&bytes, "xl/workbook.xml");

        assert!(xml.contains(r#"<fileSharing readOnlyRecommended="1"/>"#));
        assert!(xml.contains(r#" activeTab="1"/>"#));
        assert!(xml.contains(r#"<sheet name="Sheet3" sheetId="3" state="hidden" r:id="rId3"/>"#));
        assert!(xml.contains(r#"<definedName name="_xlnm.Print_Area" localSheetId="0">Sheet1!$A$1:$D$10</definedName>"#));
        assert!(xml.contains(r#"<definedName name="Rate">0.5</definedName>"#));
        assert!(xml.contains(r#"<definedName name="Sales" localSheetId="1">Sheet2!$A$1:$A$4</definedName>"#));

        let app = read_part(&bytes, "docProps/app.xml");
        assert!(app.contains("<vt:lpstr>Sheet1!Print_Area</vt:lpstr>"));
        assert!(app.contains("<vt:lpstr>Sheet2!Sales</vt:lpstr>"));
    }

    #[test]
    fn test_save_to_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");

        let mut workbook = Workbook::new();
        workbook.add_worksheet().write(0, 0, true).unwrap();
        workbook.save(&path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let sheet = read_part(&bytes, "xl/worksheets/sheet1.xml");
        assert!(sheet.contains(r#"<c r="A1" t="b"><v>1</v></c>"#));
    }

    #[test]
    fn test_workbook_graph_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<Workbook>();
        assert_send::<Worksheet>();
        assert_send::<Format>();
    }
}
