//! Longan - a write-only engine for Excel `.xlsx` workbooks.
//!
//! Cells, formats, images, charts, notes and tables are collected in memory
//! and serialized into a complete Office Open XML package in one pass when
//! the workbook is saved. Nothing is read back: the crate never parses a
//! spreadsheet.
//!
//! # Features
//!
//! - **Cells**: numbers, strings, rich strings, booleans, formulas, dates and URLs
//! - **Formats**: fonts, fills, borders, alignment and number formats, interned per workbook
//! - **Layout**: column widths, row heights, merged ranges, freeze panes, zoom
//! - **Objects**: floating and in-cell images, charts, notes and tables
//! - **Printing**: page setup, headers and footers with images, print areas and titles
//! - **Deterministic output**: the same workbook and creation time give the same bytes
//!
//! # Example
//!
//! ```
//! use longan::{Chart, ChartRange, ChartType, Format, Note, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let mut header = Format::new();
//! header.set_bold();
//!
//! let worksheet = workbook.add_worksheet();
//! worksheet.write_with_format(0, 0, "Total", &header)?;
//! for (row, value) in [12.5, 17.25, 9.0].into_iter().enumerate() {
//!     worksheet.write(row as u32 + 1, 0, value)?;
//! }
//! worksheet.insert_note(0, 0, &Note::new("Quarterly totals"))?;
//!
//! let mut chart = Chart::new(ChartType::Column);
//! chart
//!     .add_series()
//!     .set_values(&ChartRange::new_from_range("Sheet1", 1, 0, 3, 0));
//! worksheet.insert_chart(1, 2, &chart)?;
//!
//! let bytes = workbook.save_to_buffer()?;
//! assert_eq!(&bytes[..2], b"PK");
//! # Ok::<(), longan::XlsxError>(())
//! ```

pub mod common;
pub mod ooxml;

pub use common::xml;
pub use ooxml::charts::{
    Chart, ChartAxis, ChartAxisCrossing, ChartAxisLabelPosition, ChartDataLabel,
    ChartDataLabelPosition, ChartEmptyCells, ChartFont, ChartFormat, ChartGradientFill,
    ChartGradientFillType, ChartGradientStop, ChartLayout, ChartLegend, ChartLegendPosition,
    ChartLine, ChartLineDashType, ChartMarker, ChartMarkerType, ChartPatternFill,
    ChartPatternFillType, ChartPoint, ChartRange, ChartSeries, ChartSolidFill, ChartTitle,
    ChartType,
};
pub use ooxml::error::{ErrorKind, Result, XlsxError};
pub use ooxml::xlsx::{
    CellData, ColNum, Color, DocProperties, ExcelDateTime, Format, FormatAlign, FormatBorder,
    FormatDiagonalBorder, FormatPattern, FormatScript, FormatUnderline, Formula,
    HeaderImagePosition, Image, ImageType, IntoCell, Note, ObjectMovement, RichString, RowNum,
    Table, TableColumn, TableFunction, TableStyle, Url, Workbook, Worksheet,
};
