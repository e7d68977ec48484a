//! Cell values.
//!
//! [`CellData`] is what a worksheet stores per coordinate. Anything that
//! converts into it can be passed to
//! [`Worksheet::write`](crate::Worksheet::write).

use crate::ooxml::error::Result;
use crate::ooxml::xlsx::datetime::ExcelDateTime;
use crate::ooxml::xlsx::format::Format;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use smallvec::SmallVec;

/// Longest string Excel accepts in a cell.
pub const MAX_STRING_LEN: usize = 32_767;

/// Longest hyperlink target Excel accepts.
pub const MAX_URL_LEN: usize = 2_079;

/// A cell value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellData {
    Blank,
    Boolean(bool),
    Number(f64),
    /// Plain text, stored in the shared string table.
    String(String),
    /// Formatted runs, stored inline.
    RichString(RichString),
    Formula(Formula),
    DateTime(ExcelDateTime),
    Url(Url),
}

impl CellData {
    /// Number of characters of text in the value, if it is text.
    pub(crate) fn text_len(&self) -> Option<usize> {
        match self {
            CellData::String(s) => Some(s.chars().count()),
            CellData::RichString(rich) => Some(rich.text_len()),
            CellData::Url(url) => Some(url.display_text().chars().count()),
            _ => None,
        }
    }
}

/// A formula with an optional cached result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    pub(crate) expression: String,
    pub(crate) result: Option<String>,
}

impl Formula {
    /// Create a formula. A leading `=` is dropped.
    pub fn new(formula: impl AsRef<str>) -> Self {
        let formula = formula.as_ref().trim();
        let expression = formula.strip_prefix('=').unwrap_or(formula);
        Self {
            expression: expression.to_string(),
            result: None,
        }
    }

    /// Value Excel shows before the workbook is recalculated.
    pub fn set_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl From<&str> for Formula {
    fn from(formula: &str) -> Self {
        Formula::new(formula)
    }
}

/// Where a hyperlink points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UrlKind {
    /// Stored in the sheet relationships as an external target.
    External,
    /// A `location` inside this workbook.
    Internal,
}

/// A hyperlink value.
///
/// Links with a scheme (`http://`, `https://`, `ftp://`, `mailto:`, `file://`)
/// are external; `internal:Sheet2!A1` points inside the workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    pub(crate) link: String,
    pub(crate) text: Option<String>,
    pub(crate) tip: Option<String>,
}

impl Url {
    pub fn new(link: impl Into<String>) -> Self {
        Self {
            link: link.into(),
            text: None,
            tip: None,
        }
    }

    /// Text shown in the cell instead of the link itself.
    pub fn set_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Screen tip shown on hover.
    pub fn set_tip(mut self, tip: impl Into<String>) -> Self {
        self.tip = Some(tip.into());
        self
    }

    pub(crate) fn kind(&self) -> UrlKind {
        if self.link.starts_with("internal:") {
            UrlKind::Internal
        } else {
            UrlKind::External
        }
    }

    pub(crate) fn is_supported(&self) -> bool {
        const SCHEMES: [&str; 6] = ["http://", "https://", "ftp://", "mailto:", "file://", "internal:"];
        SCHEMES.iter().any(|scheme| self.link.starts_with(scheme))
    }

    /// The link target without the `internal:` marker.
    pub(crate) fn target(&self) -> &str {
        self.link.strip_prefix("internal:").unwrap_or(&self.link)
    }

    /// External target and `#fragment` location, split the way Excel stores them.
    pub(crate) fn external_parts(&self) -> (&str, Option<&str>) {
        match self.link.split_once('#') {
            Some((target, location)) if !self.link.starts_with("mailto:") => {
                (target, Some(location))
            },
            _ => (&self.link, None),
        }
    }

    pub(crate) fn display_text(&self) -> &str {
        match &self.text {
            Some(text) => text,
            None => match self.kind() {
                UrlKind::Internal => self.target(),
                UrlKind::External => self.link.strip_prefix("mailto:").unwrap_or(&self.link),
            },
        }
    }
}

impl From<&str> for Url {
    fn from(link: &str) -> Self {
        Url::new(link)
    }
}

/// One run of a rich string.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextRun {
    pub format: Option<Format>,
    pub text: String,
}

/// Text made of differently formatted runs.
///
/// ```
/// use longan::{Format, RichString};
///
/// let mut bold = Format::new();
/// bold.set_bold();
///
/// let mut rich = RichString::new();
/// rich.append_plain("This is ").append(&bold, "bold");
/// assert_eq!(rich.text(), "This is bold");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RichString {
    pub(crate) runs: SmallVec<[TextRun; 4]>,
}

impl RichString {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a run with its own font. The format is copied.
    pub fn append(&mut self, format: &Format, text: impl Into<String>) -> &mut Self {
        self.runs.push(TextRun {
            format: Some(format.clone()),
            text: text.into(),
        });
        self
    }

    /// Append a run in the cell's font.
    pub fn append_plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.runs.push(TextRun {
            format: None,
            text: text.into(),
        });
        self
    }

    /// The concatenated text of all runs.
    pub fn text(&self) -> String {
        self.runs.iter().map(|run| run.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.iter().all(|run| run.text.is_empty())
    }

    pub(crate) fn text_len(&self) -> usize {
        self.runs.iter().map(|run| run.text.chars().count()).sum()
    }
}

impl From<&str> for CellData {
    fn from(value: &str) -> Self {
        CellData::String(value.to_string())
    }
}

impl From<String> for CellData {
    fn from(value: String) -> Self {
        CellData::String(value)
    }
}

impl From<&String> for CellData {
    fn from(value: &String) -> Self {
        CellData::String(value.clone())
    }
}

impl From<bool> for CellData {
    fn from(value: bool) -> Self {
        CellData::Boolean(value)
    }
}

macro_rules! impl_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CellData {
                fn from(value: $t) -> Self {
                    CellData::Number(value as f64)
                }
            }
        )*
    };
}

impl_from_number!(f64, f32, i8, u8, i16, u16, i32, u32, i64, u64, isize, usize);

impl From<Formula> for CellData {
    fn from(value: Formula) -> Self {
        CellData::Formula(value)
    }
}

impl From<&Formula> for CellData {
    fn from(value: &Formula) -> Self {
        CellData::Formula(value.clone())
    }
}

impl From<Url> for CellData {
    fn from(value: Url) -> Self {
        CellData::Url(value)
    }
}

impl From<&Url> for CellData {
    fn from(value: &Url) -> Self {
        CellData::Url(value.clone())
    }
}

impl From<RichString> for CellData {
    fn from(value: RichString) -> Self {
        CellData::RichString(value)
    }
}

impl From<&RichString> for CellData {
    fn from(value: &RichString) -> Self {
        CellData::RichString(value.clone())
    }
}

impl From<ExcelDateTime> for CellData {
    fn from(value: ExcelDateTime) -> Self {
        CellData::DateTime(value)
    }
}

impl From<&ExcelDateTime> for CellData {
    fn from(value: &ExcelDateTime) -> Self {
        CellData::DateTime(*value)
    }
}

impl From<()> for CellData {
    fn from(_: ()) -> Self {
        CellData::Blank
    }
}

impl<T: Into<CellData>> From<Option<T>> for CellData {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellData::Blank, Into::into)
    }
}

/// Values accepted by [`Worksheet::write`](crate::Worksheet::write).
///
/// Conversion can fail for values Excel cannot represent, such as chrono
/// dates before 1899-12-31.
pub trait IntoCell {
    fn into_cell(self) -> Result<CellData>;
}

macro_rules! impl_into_cell {
    ($($t:ty),* $(,)?) => {
        $(
            impl IntoCell for $t {
                #[inline]
                fn into_cell(self) -> Result<CellData> {
                    Ok(CellData::from(self))
                }
            }
        )*
    };
}

impl_into_cell!(
    &str, String, &String, bool, f64, f32, i8, u8, i16, u16, i32, u32, i64, u64, isize, usize,
    Formula, &Formula, Url, &Url, RichString, &RichString, ExcelDateTime, &ExcelDateTime, (),
);

impl IntoCell for CellData {
    #[inline]
    fn into_cell(self) -> Result<CellData> {
        Ok(self)
    }
}

impl IntoCell for &CellData {
    #[inline]
    fn into_cell(self) -> Result<CellData> {
        Ok(self.clone())
    }
}

impl IntoCell for NaiveDate {
    fn into_cell(self) -> Result<CellData> {
        ExcelDateTime::try_from(self).map(CellData::DateTime)
    }
}

impl IntoCell for &NaiveDate {
    fn into_cell(self) -> Result<CellData> {
        (*self).into_cell()
    }
}

impl IntoCell for NaiveDateTime {
    fn into_cell(self) -> Result<CellData> {
        ExcelDateTime::try_from(self).map(CellData::DateTime)
    }
}

impl IntoCell for &NaiveDateTime {
    fn into_cell(self) -> Result<CellData> {
        (*self).into_cell()
    }
}

impl IntoCell for NaiveTime {
    fn into_cell(self) -> Result<CellData> {
        Ok(CellData::DateTime(ExcelDateTime::from(self)))
    }
}

impl IntoCell for &NaiveTime {
    fn into_cell(self) -> Result<CellData> {
        (*self).into_cell()
    }
}

impl<T: IntoCell> IntoCell for Option<T> {
    fn into_cell(self) -> Result<CellData> {
        match self {
            Some(value) => value.into_cell(),
            None => Ok(CellData::Blank),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_cell() {
        assert_eq!(7i64.into_cell().unwrap(), CellData::Number(7.0));
        assert_eq!(None::<&str>.into_cell().unwrap(), CellData::Blank);

        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        match date.into_cell().unwrap() {
            CellData::DateTime(dt) => assert_eq!(dt.to_excel(), 45444.0),
            other => panic!("unexpected {:?}", other),
        }

        let too_early = NaiveDate::from_ymd_opt(1899, 12, 30).unwrap();
        assert!(too_early.into_cell().is_err());
    }

    #[test]
    fn test_conversions() {
        assert_eq!(CellData::from("a"), CellData::String("a".into()));
        assert_eq!(CellData::from(3u8), CellData::Number(3.0));
        assert_eq!(CellData::from(true), CellData::Boolean(true));
        assert_eq!(CellData::from(None::<i32>), CellData::Blank);
        assert_eq!(CellData::from(Some(2.5)), CellData::Number(2.5));
        assert_eq!(CellData::from(()), CellData::Blank);
    }

    #[test]
    fn test_formula_strips_equals() {
        let formula = Formula::new("=SUM(A1:A3)").set_result("6");
        assert_eq!(formula.expression(), "SUM(A1:A3)");
        assert_eq!(formula.result.as_deref(), Some("6"));
        assert_eq!(Formula::new("A1+1").expression(), "A1+1");
    }

    #[test]
    fn test_url_kinds() {
        let url = Url::new("https://example.com/docs#intro");
        assert_eq!(url.kind(), UrlKind::External);
        assert_eq!(url.external_parts(), ("https://example.com/docs", Some("intro")));
        assert_eq!(url.display_text(), "https://example.com/docs#intro");

        let url = Url::new("internal:Sheet2!A1").set_text("Go");
        assert_eq!(url.kind(), UrlKind::Internal);
        assert_eq!(url.target(), "Sheet2!A1");
        assert_eq!(url.display_text(), "Go");

        let mail = Url::new("mailto:someone@example.com");
        assert_eq!(mail.display_text(), "someone@example.com");
        assert!(mail.is_supported());
        assert!(!Url::new("www.example.com").is_supported());
    }

    #[test]
    fn test_rich_string_copies_formats() {
        let mut red = Format::new();
        red.set_font_color(crate::Color::Red).unwrap();

        let mut rich = RichString::new();
        rich.append(&red, "red").append_plain(" text");
        red.set_bold();

        assert_eq!(rich.text(), "red text");
        assert_eq!(rich.text_len(), 8);
        assert!(!rich.runs[0].format.as_ref().unwrap().font.bold);
    }
}
