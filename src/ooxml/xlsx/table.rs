//! Worksheet tables.
//!
//! A table binds a cell range to a header row, per-column metadata and an
//! optional totals row. The worksheet writes header and total cells into the
//! grid when the table is added; `xl/tables/tableN.xml` only carries the
//! structure.

use crate::ooxml::error::{Result, XlsxError};
use crate::ooxml::xlsx::cell::Formula;
use crate::ooxml::xlsx::format::Format;
use crate::ooxml::xlsx::reference::parse_cell_ref;

macro_rules! table_styles {
    ($($variant:ident => $name:literal),* $(,)?) => {
        /// Built-in table styles.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum TableStyle {
            None,
            $($variant,)*
        }

        impl TableStyle {
            pub(crate) fn as_str(&self) -> Option<&'static str> {
                match self {
                    TableStyle::None => None,
                    $(TableStyle::$variant => Some($name),)*
                }
            }
        }
    };
}

table_styles! {
    Light1 => "TableStyleLight1", Light2 => "TableStyleLight2",
    Light3 => "TableStyleLight3", Light4 => "TableStyleLight4",
    Light5 => "TableStyleLight5", Light6 => "TableStyleLight6",
    Light7 => "TableStyleLight7", Light8 => "TableStyleLight8",
    Light9 => "TableStyleLight9", Light10 => "TableStyleLight10",
    Light11 => "TableStyleLight11", Light12 => "TableStyleLight12",
    Light13 => "TableStyleLight13", Light14 => "TableStyleLight14",
    Light15 => "TableStyleLight15", Light16 => "TableStyleLight16",
    Light17 => "TableStyleLight17", Light18 => "TableStyleLight18",
    Light19 => "TableStyleLight19", Light20 => "TableStyleLight20",
    Light21 => "TableStyleLight21",
    Medium1 => "TableStyleMedium1", Medium2 => "TableStyleMedium2",
    Medium3 => "TableStyleMedium3", Medium4 => "TableStyleMedium4",
    Medium5 => "TableStyleMedium5", Medium6 => "TableStyleMedium6",
    Medium7 => "TableStyleMedium7", Medium8 => "TableStyleMedium8",
    Medium9 => "TableStyleMedium9", Medium10 => "TableStyleMedium10",
    Medium11 => "TableStyleMedium11", Medium12 => "TableStyleMedium12",
    Medium13 => "TableStyleMedium13", Medium14 => "TableStyleMedium14",
    Medium15 => "TableStyleMedium15", Medium16 => "TableStyleMedium16",
    Medium17 => "TableStyleMedium17", Medium18 => "TableStyleMedium18",
    Medium19 => "TableStyleMedium19", Medium20 => "TableStyleMedium20",
    Medium21 => "TableStyleMedium21", Medium22 => "TableStyleMedium22",
    Medium23 => "TableStyleMedium23", Medium24 => "TableStyleMedium24",
    Medium25 => "TableStyleMedium25", Medium26 => "TableStyleMedium26",
    Medium27 => "TableStyleMedium27", Medium28 => "TableStyleMedium28",
    Dark1 => "TableStyleDark1", Dark2 => "TableStyleDark2",
    Dark3 => "TableStyleDark3", Dark4 => "TableStyleDark4",
    Dark5 => "TableStyleDark5", Dark6 => "TableStyleDark6",
    Dark7 => "TableStyleDark7", Dark8 => "TableStyleDark8",
    Dark9 => "TableStyleDark9", Dark10 => "TableStyleDark10",
    Dark11 => "TableStyleDark11",
}

impl Default for TableStyle {
    fn default() -> Self {
        TableStyle::Medium9
    }
}

/// Aggregate shown in a column of the totals row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableFunction {
    Average,
    Count,
    CountNumbers,
    Max,
    Min,
    Sum,
    StdDev,
    Var,
    Custom(Formula),
}

impl TableFunction {
    /// Value of `totalsRowFunction`.
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            TableFunction::Average => "average",
            TableFunction::Count => "count",
            TableFunction::CountNumbers => "countNums",
            TableFunction::Max => "max",
            TableFunction::Min => "min",
            TableFunction::Sum => "sum",
            TableFunction::StdDev => "stdDev",
            TableFunction::Var => "var",
            TableFunction::Custom(_) => "custom",
        }
    }

    /// Formula written into the totals row cell.
    pub(crate) fn total_formula(&self, column_name: &str) -> String {
        let subtotal = match self {
            TableFunction::Average => 101,
            TableFunction::CountNumbers => 102,
            TableFunction::Count => 103,
            TableFunction::Max => 104,
            TableFunction::Min => 105,
            TableFunction::StdDev => 107,
            TableFunction::Sum => 109,
            TableFunction::Var => 110,
            TableFunction::Custom(formula) => return formula.expression.clone(),
        };
        format!("SUBTOTAL({},[{}])", subtotal, escape_column_name(column_name))
    }
}

/// Escape the characters that are special inside a structured reference.
fn escape_column_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if matches!(c, '\'' | '#' | '[' | ']') {
            out.push('\'');
        }
        out.push(c);
    }
    out
}

/// Column options of a [`Table`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableColumn {
    pub(crate) header: Option<String>,
    pub(crate) header_format: Option<Format>,
    pub(crate) format: Option<Format>,
    pub(crate) formula: Option<Formula>,
    pub(crate) total_label: Option<String>,
    pub(crate) total_function: Option<TableFunction>,
}

impl TableColumn {
    pub fn new() -> Self {
        Self::default()
    }

    /// Header text. Defaults to `Column1`, `Column2`, ….
    pub fn set_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn set_header_format(mut self, format: &Format) -> Self {
        self.header_format = Some(format.clone());
        self
    }

    /// Format for the data cells of the column.
    pub fn set_format(mut self, format: &Format) -> Self {
        self.format = Some(format.clone());
        self
    }

    /// Calculated column formula written into every data row.
    pub fn set_formula(mut self, formula: impl Into<Formula>) -> Self {
        self.formula = Some(formula.into());
        self
    }

    /// Text shown in the totals row.
    pub fn set_total_label(mut self, label: impl Into<String>) -> Self {
        self.total_label = Some(label.into());
        self
    }

    pub fn set_total_function(mut self, function: TableFunction) -> Self {
        self.total_function = Some(function);
        self
    }
}

/// A worksheet table.
///
/// ```
/// use longan::{Table, TableColumn, TableFunction};
///
/// let mut table = Table::new();
/// table
///     .set_total_row(true)
///     .set_columns(&[
///         TableColumn::new().set_header("Region").set_total_label("Total"),
///         TableColumn::new()
///             .set_header("Sales")
///             .set_total_function(TableFunction::Sum),
///     ]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub(crate) name: Option<String>,
    pub(crate) style: TableStyle,
    pub(crate) header_row: bool,
    pub(crate) total_row: bool,
    pub(crate) banded_rows: bool,
    pub(crate) banded_columns: bool,
    pub(crate) first_column: bool,
    pub(crate) last_column: bool,
    pub(crate) autofilter: bool,
    pub(crate) columns: Vec<TableColumn>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            name: None,
            style: TableStyle::default(),
            header_row: true,
            total_row: false,
            banded_rows: true,
            banded_columns: false,
            first_column: false,
            last_column: false,
            autofilter: true,
            columns: Vec::new(),
        }
    }
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table name used in structured references. Defaults to `TableN`.
    pub fn set_name(&mut self, name: &str) -> Result<&mut Self> {
        validate_table_name(name)?;
        self.name = Some(name.to_string());
        Ok(self)
    }

    pub fn set_style(&mut self, style: TableStyle) -> &mut Self {
        self.style = style;
        self
    }

    pub fn set_header_row(&mut self, enable: bool) -> &mut Self {
        self.header_row = enable;
        self
    }

    pub fn set_total_row(&mut self, enable: bool) -> &mut Self {
        self.total_row = enable;
        self
    }

    pub fn set_banded_rows(&mut self, enable: bool) -> &mut Self {
        self.banded_rows = enable;
        self
    }

    pub fn set_banded_columns(&mut self, enable: bool) -> &mut Self {
        self.banded_columns = enable;
        self
    }

    pub fn set_first_column(&mut self, enable: bool) -> &mut Self {
        self.first_column = enable;
        self
    }

    pub fn set_last_column(&mut self, enable: bool) -> &mut Self {
        self.last_column = enable;
        self
    }

    pub fn set_autofilter(&mut self, enable: bool) -> &mut Self {
        self.autofilter = enable;
        self
    }

    pub fn set_columns(&mut self, columns: &[TableColumn]) -> &mut Self {
        self.columns = columns.to_vec();
        self
    }
}

fn validate_table_name(name: &str) -> Result<()> {
    if name.is_empty() || name.chars().count() > 255 {
        return Err(XlsxError::range(format!(
            "Table name '{}' must be 1 to 255 characters long",
            name
        )));
    }

    let first_ok = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '\\');
    let rest_ok = name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '_' || c == '.' || c == '\\');
    let is_cell_ref = parse_cell_ref(name).is_some();
    let is_rc = matches!(name.to_ascii_uppercase().as_str(), "R" | "C");

    if !first_ok || !rest_ok || is_cell_ref || is_rc {
        return Err(XlsxError::parse(format!(
            "Invalid table name '{}': use letters, digits, '_' or '.', starting with a letter or '_'",
            name
        )));
    }
    Ok(())
}

/// A table placed on a worksheet: the options plus its resolved geometry.
///
/// Ids and default names are workbook-wide, so they are assigned at save.
#[derive(Debug, Clone)]
pub(crate) struct PlacedTable {
    pub table: Table,
    pub column_names: Vec<String>,
    pub first_row: u32,
    pub first_col: u16,
    pub last_row: u32,
    pub last_col: u16,
}

impl PlacedTable {
    pub(crate) fn overlaps(&self, first_row: u32, first_col: u16, last_row: u32, last_col: u16) -> bool {
        self.first_row <= last_row
            && first_row <= self.last_row
            && self.first_col <= last_col
            && first_col <= self.last_col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let table = Table::new();
        assert!(table.header_row);
        assert!(table.autofilter);
        assert!(table.banded_rows);
        assert_eq!(table.style.as_str(), Some("TableStyleMedium9"));
        assert_eq!(TableStyle::None.as_str(), None);
        assert_eq!(TableStyle::Dark11.as_str(), Some("TableStyleDark11"));
    }

    #[test]
    fn test_table_names() {
        let mut table = Table::new();
        assert!(table.set_name("Sales_2024").is_ok());
        assert!(matches!(table.set_name("A1"), Err(XlsxError::Parse(_))));
        assert!(matches!(table.set_name("has space"), Err(XlsxError::Parse(_))));
        assert!(matches!(table.set_name("1st"), Err(XlsxError::Parse(_))));
        assert!(matches!(table.set_name(""), Err(XlsxError::Range(_))));
        assert_eq!(table.name.as_deref(), Some("Sales_2024"));
    }

    #[test]
    fn test_total_formulas() {
        assert_eq!(TableFunction::Sum.total_formula("Sales"), "SUBTOTAL(109,[Sales])");
        assert_eq!(
            TableFunction::Average.total_formula("Q#1"),
            "SUBTOTAL(101,[Q'#1])"
        );
        let custom = TableFunction::Custom(Formula::new("=SUM([Sales])/2"));
        assert_eq!(custom.total_formula("Sales"), "SUM([Sales])/2");
        assert_eq!(custom.as_str(), "custom");
    }

    #[test]
    fn test_overlap() {
        let placed = PlacedTable {
            table: Table::new(),
            column_names: vec![],
            first_row: 2,
            first_col: 1,
            last_row: 5,
            last_col: 3,
        };
        assert!(placed.overlaps(5, 3, 8, 8));
        assert!(!placed.overlaps(6, 0, 9, 9));
        assert!(!placed.overlaps(0, 4, 9, 9));
    }
}
