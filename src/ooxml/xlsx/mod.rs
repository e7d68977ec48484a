//! Excel (.xlsx) spreadsheet writing.
//!
//! A [`Workbook`] owns its [`Worksheet`]s. Worksheets store cells, formats
//! and anchored objects sparsely; the [`writer`] modules turn them into the
//! SpreadsheetML parts of the package when the workbook is saved.
//!
//! ```
//! use longan::{ExcelDateTime, Format, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let mut date_format = Format::new();
//! date_format.set_num_format("yyyy-mm-dd");
//!
//! let worksheet = workbook.add_worksheet();
//! worksheet.write(0, 0, "Opened")?;
//! let date = ExcelDateTime::from_ymd(2024, 1, 31)?;
//! worksheet.write_with_format(0, 1, &date, &date_format)?;
//!
//! let bytes = workbook.save_to_buffer()?;
//! assert!(!bytes.is_empty());
//! # Ok::<(), longan::XlsxError>(())
//! ```

pub mod cell;
pub mod color;
pub mod datetime;
pub(crate) mod drawing;
pub mod format;
pub mod image;
pub mod note;
pub mod page;
pub mod properties;
pub mod reference;
pub mod table;
pub mod workbook;
pub mod worksheet;
pub(crate) mod writer;

pub use cell::{CellData, Formula, IntoCell, RichString, Url};
pub use color::Color;
pub use datetime::ExcelDateTime;
pub use format::{
    Format, FormatAlign, FormatBorder, FormatDiagonalBorder, FormatPattern, FormatScript,
    FormatUnderline,
};
pub use image::{Image, ImageType, ObjectMovement};
pub use note::Note;
pub use page::HeaderImagePosition;
pub use properties::DocProperties;
pub use reference::{ColNum, RowNum};
pub use table::{Table, TableColumn, TableFunction, TableStyle};
pub use workbook::Workbook;
pub use worksheet::Worksheet;
