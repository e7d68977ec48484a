//! Worksheets: a sparse cell grid plus everything anchored to it.
//!
//! A [`Worksheet`] is created by [`Workbook::add_worksheet`](crate::Workbook::add_worksheet)
//! and only holds data; nothing is rendered until the workbook is saved.
//! Every setter validates its input before changing any state, so a failed
//! call leaves the worksheet as it was.

use crate::common::unit::{ColumnMetrics, DEFAULT_ROW_HEIGHT_PT, pt_to_px, px_to_pt};
use crate::ooxml::charts::Chart;
use crate::ooxml::error::{Result, XlsxError};
use crate::ooxml::xlsx::cell::{
    CellData, Formula, IntoCell, MAX_STRING_LEN, MAX_URL_LEN, RichString, Url,
};
use crate::ooxml::xlsx::color::Color;
use crate::ooxml::xlsx::datetime::ExcelDateTime;
use crate::ooxml::xlsx::drawing::{GridMetrics, PlacedChart, PlacedImage};
use crate::ooxml::xlsx::format::Format;
use crate::ooxml::xlsx::image::Image;
use crate::ooxml::xlsx::note::Note;
use crate::ooxml::xlsx::page::{HeaderImagePosition, ImageSlot, Margins, PageSetup, PrintFlags};
use crate::ooxml::xlsx::reference::{COL_MAX, ColNum, ROW_MAX, RowNum, check_cell, check_range, range_ref};
use crate::ooxml::xlsx::table::{PlacedTable, Table};
use std::collections::{BTreeMap, HashMap};

/// Longest worksheet name Excel accepts.
pub const MAX_SHEET_NAME_LEN: usize = 31;

/// Largest column width, in characters.
pub const MAX_COLUMN_WIDTH: f64 = 255.0;

/// Largest row height, in points.
pub const MAX_ROW_HEIGHT: f64 = 409.0;

const INVALID_SHEET_NAME_CHARS: [char; 7] = ['[', ']', ':', '*', '?', '/', '\\'];

/// What a grid cell holds.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellContent {
    Data(CellData),
    /// Index into the worksheet's embedded images.
    EmbeddedImage(usize),
}

/// A stored cell: content plus a worksheet-local format index (0 = none).
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Cell {
    pub content: CellContent,
    pub format: u32,
}

/// Formats used by one worksheet, numbered from 1 in first-use order.
///
/// The workbook style table is only built at save time, so cells refer to
/// these local indices until then.
#[derive(Debug, Clone, Default)]
pub(crate) struct FormatArena {
    formats: Vec<Format>,
    lookup: HashMap<Format, u32>,
}

impl FormatArena {
    pub(crate) fn intern(&mut self, format: &Format) -> u32 {
        if let Some(&index) = self.lookup.get(format) {
            return index;
        }
        self.formats.push(format.clone());
        let index = self.formats.len() as u32;
        self.lookup.insert(format.clone(), index);
        index
    }

    pub(crate) fn get(&self, index: u32) -> Option<&Format> {
        index
            .checked_sub(1)
            .and_then(|i| self.formats.get(i as usize))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Format> {
        self.formats.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.formats.len()
    }
}

/// Width, format and visibility of a column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct ColumnOptions {
    /// Width in characters
    pub width: Option<f64>,
    pub format: u32,
    pub hidden: bool,
}

/// Height, format and visibility of a row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct RowOptions {
    /// Height in points
    pub height: Option<f64>,
    pub format: u32,
    pub hidden: bool,
}

/// Legacy sheet protection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct SheetProtection {
    pub password_hash: Option<u16>,
}

/// One worksheet of a [`Workbook`](crate::Workbook).
///
/// ```
/// use longan::{Format, Workbook};
///
/// let mut workbook = Workbook::new();
/// let worksheet = workbook.add_worksheet();
///
/// let mut bold = Format::new();
/// bold.set_bold();
///
/// worksheet.write_with_format(0, 0, "Region", &bold)?;
/// worksheet.write_row(1, 0, ["North", "South"])?;
/// worksheet.write(2, 0, 42)?;
/// worksheet.set_column_width(0, 20)?;
/// # Ok::<(), longan::XlsxError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Worksheet {
    pub(crate) name: String,
    pub(crate) cells: BTreeMap<RowNum, BTreeMap<ColNum, Cell>>,
    pub(crate) formats: FormatArena,
    pub(crate) columns: BTreeMap<ColNum, ColumnOptions>,
    pub(crate) rows: BTreeMap<RowNum, RowOptions>,
    pub(crate) merged_ranges: Vec<(RowNum, ColNum, RowNum, ColNum)>,
    pub(crate) images: Vec<PlacedImage>,
    pub(crate) charts: Vec<PlacedChart>,
    pub(crate) embedded_images: Vec<Image>,
    pub(crate) notes: BTreeMap<(RowNum, ColNum), Note>,
    pub(crate) note_author: String,
    pub(crate) show_all_notes: bool,
    pub(crate) tables: Vec<PlacedTable>,
    pub(crate) freeze_panes: Option<(RowNum, ColNum)>,
    pub(crate) freeze_top_cell: Option<(RowNum, ColNum)>,
    pub(crate) page: PageSetup,
    pub(crate) tab_color: Color,
    pub(crate) zoom: u16,
    pub(crate) active: bool,
    pub(crate) selected: bool,
    pub(crate) hidden: bool,
    pub(crate) right_to_left: bool,
    pub(crate) protection: Option<SheetProtection>,
    pub(crate) metrics: ColumnMetrics,
    pub(crate) default_row_height: f64,
}

impl Worksheet {
    /// Create an empty worksheet using the given default column and row metrics.
    pub(crate) fn new(name: String, metrics: ColumnMetrics, default_row_height: f64) -> Self {
        Self {
            name,
            cells: BTreeMap::new(),
            formats: FormatArena::default(),
            columns: BTreeMap::new(),
            rows: BTreeMap::new(),
            merged_ranges: Vec::new(),
            images: Vec::new(),
            charts: Vec::new(),
            embedded_images: Vec::new(),
            notes: BTreeMap::new(),
            note_author: "Author".to_string(),
            show_all_notes: false,
            tables: Vec::new(),
            freeze_panes: None,
            freeze_top_cell: None,
            page: PageSetup::default(),
            tab_color: Color::Default,
            zoom: 100,
            active: false,
            selected: false,
            hidden: false,
            right_to_left: false,
            protection: None,
            metrics,
            default_row_height,
        }
    }

    /// The worksheet name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the worksheet.
    ///
    /// Names are 1 to 31 characters, must not contain `[ ] : * ? / \` and
    /// must not start or end with an apostrophe. Uniqueness within the
    /// workbook is checked when it is saved.
    pub fn set_name(&mut self, name: &str) -> Result<&mut Self> {
        validate_sheet_name(name)?;
        self.name = name.to_string();
        Ok(self)
    }

    // ===== Cell writes =====

    /// Write any supported value to a cell.
    ///
    /// Strings go to the shared string table, numbers are stored as is,
    /// dates get a default date format and urls the hyperlink style.
    pub fn write<T: IntoCell>(&mut self, row: RowNum, col: ColNum, data: T) -> Result<&mut Self> {
        let data = self.prepare(row, col, data.into_cell()?)?;
        self.commit(row, col, data, None);
        Ok(self)
    }

    /// Write a value with a cell format. The format is copied.
    pub fn write_with_format<T: IntoCell>(
        &mut self,
        row: RowNum,
        col: ColNum,
        data: T,
        format: &Format,
    ) -> Result<&mut Self> {
        let data = self.prepare(row, col, data.into_cell()?)?;
        self.commit(row, col, data, Some(format));
        Ok(self)
    }

    pub fn write_string(&mut self, row: RowNum, col: ColNum, text: &str) -> Result<&mut Self> {
        self.write(row, col, text)
    }

    pub fn write_string_with_format(
        &mut self,
        row: RowNum,
        col: ColNum,
        text: &str,
        format: &Format,
    ) -> Result<&mut Self> {
        self.write_with_format(row, col, text, format)
    }

    pub fn write_number(&mut self, row: RowNum, col: ColNum, number: f64) -> Result<&mut Self> {
        self.write(row, col, number)
    }

    pub fn write_number_with_format(
        &mut self,
        row: RowNum,
        col: ColNum,
        number: f64,
        format: &Format,
    ) -> Result<&mut Self> {
        self.write_with_format(row, col, number, format)
    }

    pub fn write_boolean(&mut self, row: RowNum, col: ColNum, boolean: bool) -> Result<&mut Self> {
        self.write(row, col, boolean)
    }

    pub fn write_boolean_with_format(
        &mut self,
        row: RowNum,
        col: ColNum,
        boolean: bool,
        format: &Format,
    ) -> Result<&mut Self> {
        self.write_with_format(row, col, boolean, format)
    }

    /// Write a formula. A leading `=` is optional.
    pub fn write_formula(
        &mut self,
        row: RowNum,
        col: ColNum,
        formula: impl Into<Formula>,
    ) -> Result<&mut Self> {
        self.write(row, col, formula.into())
    }

    pub fn write_formula_with_format(
        &mut self,
        row: RowNum,
        col: ColNum,
        formula: impl Into<Formula>,
        format: &Format,
    ) -> Result<&mut Self> {
        self.write_with_format(row, col, formula.into(), format)
    }

    /// Write a date or time. Without a format it is shown as `yyyy-mm-dd`,
    /// `hh:mm:ss` or both, depending on what the value holds.
    pub fn write_datetime(
        &mut self,
        row: RowNum,
        col: ColNum,
        datetime: &ExcelDateTime,
    ) -> Result<&mut Self> {
        self.write(row, col, datetime)
    }

    pub fn write_datetime_with_format(
        &mut self,
        row: RowNum,
        col: ColNum,
        datetime: &ExcelDateTime,
        format: &Format,
    ) -> Result<&mut Self> {
        self.write_with_format(row, col, datetime, format)
    }

    /// Clear a cell. A blank cell without a format is not stored.
    pub fn write_blank(&mut self, row: RowNum, col: ColNum) -> Result<&mut Self> {
        self.write(row, col, ())
    }

    /// Write an empty cell that only carries a format.
    pub fn write_blank_with_format(
        &mut self,
        row: RowNum,
        col: ColNum,
        format: &Format,
    ) -> Result<&mut Self> {
        self.write_with_format(row, col, (), format)
    }

    /// Write a hyperlink.
    ///
    /// # Examples
    ///
    /// ```
    /// use longan::{Url, Workbook};
    ///
    /// let mut workbook = Workbook::new();
    /// let worksheet = workbook.add_worksheet();
    /// worksheet.write_url(0, 0, "https://www.rust-lang.org")?;
    /// worksheet.write_url(1, 0, Url::new("internal:Sheet1!A1").set_text("Back to top"))?;
    /// # Ok::<(), longan::XlsxError>(())
    /// ```
    pub fn write_url(&mut self, row: RowNum, col: ColNum, url: impl Into<Url>) -> Result<&mut Self> {
        self.write(row, col, url.into())
    }

    pub fn write_url_with_format(
        &mut self,
        row: RowNum,
        col: ColNum,
        url: impl Into<Url>,
        format: &Format,
    ) -> Result<&mut Self> {
        self.write_with_format(row, col, url.into(), format)
    }

    /// Write text made of differently formatted runs.
    pub fn write_rich_string(
        &mut self,
        row: RowNum,
        col: ColNum,
        rich_string: &RichString,
    ) -> Result<&mut Self> {
        self.write(row, col, rich_string)
    }

    pub fn write_rich_string_with_format(
        &mut self,
        row: RowNum,
        col: ColNum,
        rich_string: &RichString,
        format: &Format,
    ) -> Result<&mut Self> {
        self.write_with_format(row, col, rich_string, format)
    }

    /// Write values to consecutive cells of a row, starting at `(row, col)`.
    ///
    /// The whole range is checked before anything is written.
    pub fn write_row<I>(&mut self, row: RowNum, col: ColNum, data: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: IntoCell,
    {
        let mut batch = Vec::new();
        for (i, value) in data.into_iter().enumerate() {
            let (r, c) = offset_cell(row, col, 0, i)?;
            batch.push((r, c, value.into_cell()?));
        }
        self.commit_batch(batch)
    }

    /// Write values to consecutive cells of a column, starting at `(row, col)`.
    pub fn write_column<I>(&mut self, row: RowNum, col: ColNum, data: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: IntoCell,
    {
        let mut batch = Vec::new();
        for (i, value) in data.into_iter().enumerate() {
            let (r, c) = offset_cell(row, col, i, 0)?;
            batch.push((r, c, value.into_cell()?));
        }
        self.commit_batch(batch)
    }

    /// Write a 2D array where each inner item is one row.
    pub fn write_row_matrix<I, R>(&mut self, row: RowNum, col: ColNum, data: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator,
        R::Item: IntoCell,
    {
        let mut batch = Vec::new();
        for (i, values) in data.into_iter().enumerate() {
            for (j, value) in values.into_iter().enumerate() {
                let (r, c) = offset_cell(row, col, i, j)?;
                batch.push((r, c, value.into_cell()?));
            }
        }
        self.commit_batch(batch)
    }

    /// Write a 2D array where each inner item is one column.
    pub fn write_column_matrix<I, C>(
        &mut self,
        row: RowNum,
        col: ColNum,
        data: I,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: IntoCell,
    {
        let mut batch = Vec::new();
        for (j, values) in data.into_iter().enumerate() {
            for (i, value) in values.into_iter().enumerate() {
                let (r, c) = offset_cell(row, col, i, j)?;
                batch.push((r, c, value.into_cell()?));
            }
        }
        self.commit_batch(batch)
    }

    /// Merge a range and write `data` to its top-left cell.
    ///
    /// The other cells of the range are blanked with the same format.
    pub fn merge_range<T: IntoCell>(
        &mut self,
        first_row: RowNum,
        first_col: ColNum,
        last_row: RowNum,
        last_col: ColNum,
        data: T,
        format: &Format,
    ) -> Result<&mut Self> {
        check_range(first_row, first_col, last_row, last_col)?;
        if first_row == last_row && first_col == last_col {
            return Err(XlsxError::config(format!(
                "Cannot merge the single cell {}",
                range_ref(first_row, first_col, last_row, last_col)
            )));
        }
        let overlapping = self.merged_ranges.iter().find(|&&(r1, c1, r2, c2)| {
            r1 <= last_row && first_row <= r2 && c1 <= last_col && first_col <= c2
        });
        if let Some(&(r1, c1, r2, c2)) = overlapping {
            return Err(XlsxError::config(format!(
                "Merge range {} overlaps the merged range {}",
                range_ref(first_row, first_col, last_row, last_col),
                range_ref(r1, c1, r2, c2)
            )));
        }

        let data = self.prepare(first_row, first_col, data.into_cell()?)?;
        self.commit(first_row, first_col, data, Some(format));
        for row in first_row..=last_row {
            for col in first_col..=last_col {
                if (row, col) != (first_row, first_col) {
                    self.commit(row, col, CellData::Blank, Some(format));
                }
            }
        }
        self.merged_ranges
            .push((first_row, first_col, last_row, last_col));
        Ok(self)
    }

    /// The value stored in a cell, if any.
    pub fn cell(&self, row: RowNum, col: ColNum) -> Option<&CellData> {
        match &self.cells.get(&row)?.get(&col)?.content {
            CellContent::Data(data) => Some(data),
            CellContent::EmbeddedImage(_) => None,
        }
    }

    /// Validate a value for `(row, col)` without storing it.
    fn prepare(&self, row: RowNum, col: ColNum, data: CellData) -> Result<CellData> {
        check_cell(row, col)?;

        if let Some(len) = data.text_len() {
            if len > MAX_STRING_LEN {
                return Err(XlsxError::range(format!(
                    "String of {} characters at ({}, {}) exceeds Excel's limit of {}",
                    len, row, col, MAX_STRING_LEN
                )));
            }
        }

        match &data {
            CellData::Number(number) if !number.is_finite() => {
                return Err(XlsxError::range(format!(
                    "Number {} at ({}, {}) is not finite",
                    number, row, col
                )));
            },
            CellData::Url(url) => {
                if !url.is_supported() {
                    return Err(XlsxError::parse(format!(
                        "Url '{}' has no supported scheme (http, https, ftp, mailto, file or internal)",
                        url.link
                    )));
                }
                let len = url.link.chars().count();
                if len > MAX_URL_LEN {
                    return Err(XlsxError::range(format!(
                        "Url of {} characters exceeds Excel's limit of {}",
                        len, MAX_URL_LEN
                    )));
                }
            },
            _ => {},
        }

        Ok(data)
    }

    /// Store a validated value.
    fn commit(&mut self, row: RowNum, col: ColNum, data: CellData, format: Option<&Format>) {
        let format = match (format, &data) {
            (Some(format), _) => self.formats.intern(format),
            (None, CellData::DateTime(datetime)) => self
                .formats
                .intern(&Format::default().with_num_format(datetime.default_num_format())),
            (None, CellData::Url(_)) => self.formats.intern(&Format::hyperlink()),
            (None, _) => 0,
        };

        if data == CellData::Blank && format == 0 {
            self.remove_cell(row, col);
            return;
        }

        self.insert_cell(
            row,
            col,
            Cell {
                content: CellContent::Data(data),
                format,
            },
        );
    }

    /// Validate every value of a bulk write, then store them all.
    fn commit_batch(&mut self, batch: Vec<(RowNum, ColNum, CellData)>) -> Result<&mut Self> {
        let prepared = batch
            .into_iter()
            .map(|(row, col, data)| Ok((row, col, self.prepare(row, col, data)?)))
            .collect::<Result<Vec<_>>>()?;
        for (row, col, data) in prepared {
            self.commit(row, col, data, None);
        }
        Ok(self)
    }

    fn insert_cell(&mut self, row: RowNum, col: ColNum, cell: Cell) {
        self.cells.entry(row).or_default().insert(col, cell);
    }

    fn remove_cell(&mut self, row: RowNum, col: ColNum) {
        if let Some(cells) = self.cells.get_mut(&row) {
            cells.remove(&col);
            if cells.is_empty() {
                self.cells.remove(&row);
            }
        }
    }

    // ===== Drawings =====

    /// Insert a floating image with its top-left corner in `(row, col)`.
    pub fn insert_image(&mut self, row: RowNum, col: ColNum, image: &Image) -> Result<&mut Self> {
        self.insert_image_with_offset(row, col, image, 0, 0)
    }

    /// Insert a floating image shifted right and down by a pixel offset.
    pub fn insert_image_with_offset(
        &mut self,
        row: RowNum,
        col: ColNum,
        image: &Image,
        x_offset: u32,
        y_offset: u32,
    ) -> Result<&mut Self> {
        check_cell(row, col)?;
        self.images.push(PlacedImage {
            row,
            col,
            x_offset: x_offset as f64,
            y_offset: y_offset as f64,
            image: image.clone(),
        });
        Ok(self)
    }

    /// Insert an image scaled to fit inside a cell, keeping its aspect ratio.
    ///
    /// With `centered` the image is centered in the cell, otherwise it sits
    /// in the top-left corner.
    pub fn insert_image_fit_to_cell(
        &mut self,
        row: RowNum,
        col: ColNum,
        image: &Image,
        centered: bool,
    ) -> Result<&mut Self> {
        check_cell(row, col)?;
        let cell_width = self.column_width_px(col) as f64;
        let cell_height = self.row_height_px(row) as f64;
        if cell_width == 0.0 || cell_height == 0.0 {
            return Err(XlsxError::config(format!(
                "Cannot fit an image into the hidden cell ({}, {})",
                row, col
            )));
        }

        let scale = (cell_width / image.base_width()).min(cell_height / image.base_height());
        let mut image = image.clone();
        image.scale_width = scale;
        image.scale_height = scale;

        let (x_offset, y_offset) = if centered {
            (
                ((cell_width - image.display_width()) / 2.0).max(0.0),
                ((cell_height - image.display_height()) / 2.0).max(0.0),
            )
        } else {
            (0.0, 0.0)
        };

        self.images.push(PlacedImage {
            row,
            col,
            x_offset,
            y_offset,
            image,
        });
        Ok(self)
    }

    /// Place an image inside a cell, as Excel's "Place in Cell" does.
    pub fn embed_image(&mut self, row: RowNum, col: ColNum, image: &Image) -> Result<&mut Self> {
        self.store_embedded_image(row, col, image, 0)
    }

    pub fn embed_image_with_format(
        &mut self,
        row: RowNum,
        col: ColNum,
        image: &Image,
        format: &Format,
    ) -> Result<&mut Self> {
        check_cell(row, col)?;
        let format = self.formats.intern(format);
        self.store_embedded_image(row, col, image, format)
    }

    fn store_embedded_image(
        &mut self,
        row: RowNum,
        col: ColNum,
        image: &Image,
        format: u32,
    ) -> Result<&mut Self> {
        check_cell(row, col)?;
        self.embedded_images.push(image.clone());
        let index = self.embedded_images.len() - 1;
        self.insert_cell(
            row,
            col,
            Cell {
                content: CellContent::EmbeddedImage(index),
                format,
            },
        );
        Ok(self)
    }

    /// Insert a chart with its top-left corner in `(row, col)`.
    ///
    /// The chart is checked here: a chart without series, or a series
    /// without values, is a configuration error.
    pub fn insert_chart(&mut self, row: RowNum, col: ColNum, chart: &Chart) -> Result<&mut Self> {
        self.insert_chart_with_offset(row, col, chart, 0, 0)
    }

    pub fn insert_chart_with_offset(
        &mut self,
        row: RowNum,
        col: ColNum,
        chart: &Chart,
        x_offset: u32,
        y_offset: u32,
    ) -> Result<&mut Self> {
        check_cell(row, col)?;
        chart.validate()?;
        self.charts.push(PlacedChart {
            row,
            col,
            x_offset: x_offset as f64,
            y_offset: y_offset as f64,
            chart: chart.clone(),
        });
        Ok(self)
    }

    /// Attach a note to a cell, replacing any existing note.
    pub fn insert_note(&mut self, row: RowNum, col: ColNum, note: &Note) -> Result<&mut Self> {
        check_cell(row, col)?;
        let len = note.text.chars().count();
        if len > MAX_STRING_LEN {
            return Err(XlsxError::range(format!(
                "Note of {} characters exceeds Excel's limit of {}",
                len, MAX_STRING_LEN
            )));
        }
        self.notes.insert((row, col), note.clone());
        Ok(self)
    }

    /// Author used for notes that don't set their own.
    pub fn set_default_note_author(&mut self, author: &str) -> &mut Self {
        self.note_author = author.to_string();
        self
    }

    /// Show every note instead of only on hover.
    pub fn show_all_notes(&mut self, enable: bool) -> &mut Self {
        self.show_all_notes = enable;
        self
    }

    // ===== Tables =====

    /// Add a table over a range.
    ///
    /// Header cells (and the total row, if enabled) are written into the
    /// grid. Column formulas are written into every data row.
    ///
    /// # Errors
    ///
    /// * [`XlsxError::Range`] if the range is reversed or outside the sheet.
    /// * [`XlsxError::Configuration`] if it overlaps another table, if a header
    ///   row is requested on a single-row range, or if the table defines more
    ///   columns than the range has.
    pub fn add_table(
        &mut self,
        first_row: RowNum,
        first_col: ColNum,
        last_row: RowNum,
        last_col: ColNum,
        table: &Table,
    ) -> Result<&mut Self> {
        check_range(first_row, first_col, last_row, last_col)?;
        let range = range_ref(first_row, first_col, last_row, last_col);

        let rows = last_row - first_row + 1;
        if rows <= u32::from(table.header_row) + u32::from(table.total_row) {
            return Err(XlsxError::config(format!(
                "Table range {} leaves no data rows between the header and total rows",
                range
            )));
        }
        if let Some(existing) = self
            .tables
            .iter()
            .find(|t| t.overlaps(first_row, first_col, last_row, last_col))
        {
            return Err(XlsxError::config(format!(
                "Table range {} overlaps the table at {}",
                range,
                range_ref(
                    existing.first_row,
                    existing.first_col,
                    existing.last_row,
                    existing.last_col
                )
            )));
        }

        let width = (last_col - first_col) as usize + 1;
        if table.columns.len() > width {
            return Err(XlsxError::config(format!(
                "Table defines {} columns but range {} has {}",
                table.columns.len(),
                range,
                width
            )));
        }

        let mut column_names = Vec::with_capacity(width);
        for i in 0..width {
            let name = table
                .columns
                .get(i)
                .and_then(|column| column.header.clone())
                .unwrap_or_else(|| format!("Column{}", i + 1));
            if column_names
                .iter()
                .any(|existing: &String| existing.to_lowercase() == name.to_lowercase())
            {
                return Err(XlsxError::config(format!(
                    "Table column name '{}' is used more than once",
                    name
                )));
            }
            column_names.push(name);
        }

        // Collect every cell the table writes, validate, then commit.
        let mut writes: Vec<(RowNum, ColNum, CellData, Option<Format>)> = Vec::new();
        let data_first_row = if table.header_row { first_row + 1 } else { first_row };
        let data_last_row = if table.total_row { last_row.saturating_sub(1) } else { last_row };

        for (i, name) in column_names.iter().enumerate() {
            let col = first_col + i as ColNum;
            let column = table.columns.get(i);

            if table.header_row {
                let format = column.and_then(|c| c.header_format.clone());
                writes.push((first_row, col, CellData::String(name.clone()), format));
            }

            if let Some(formula) = column.and_then(|c| c.formula.as_ref()) {
                let format = column.and_then(|c| c.format.clone());
                for row in data_first_row..=data_last_row {
                    writes.push((row, col, CellData::Formula(formula.clone()), format.clone()));
                }
            }

            if table.total_row {
                if let Some(label) = column.and_then(|c| c.total_label.as_ref()) {
                    writes.push((last_row, col, CellData::String(label.clone()), None));
                } else if let Some(function) = column.and_then(|c| c.total_function.as_ref()) {
                    let formula = Formula::new(function.total_formula(name));
                    let format = column.and_then(|c| c.format.clone());
                    writes.push((last_row, col, CellData::Formula(formula), format));
                }
            }
        }

        let prepared = writes
            .into_iter()
            .map(|(row, col, data, format)| Ok((row, col, self.prepare(row, col, data)?, format)))
            .collect::<Result<Vec<_>>>()?;
        for (row, col, data, format) in prepared {
            self.commit(row, col, data, format.as_ref());
        }

        self.tables.push(PlacedTable {
            table: table.clone(),
            column_names,
            first_row,
            first_col,
            last_row,
            last_col,
        });
        Ok(self)
    }

    // ===== Panes =====

    /// Freeze the rows above `row` and the columns left of `col`.
    pub fn set_freeze_panes(&mut self, row: RowNum, col: ColNum) -> Result<&mut Self> {
        check_cell(row, col)?;
        self.freeze_panes = Some((row, col));
        Ok(self)
    }

    /// First visible cell of the scrolling pane.
    pub fn set_freeze_panes_top_cell(&mut self, row: RowNum, col: ColNum) -> Result<&mut Self> {
        check_cell(row, col)?;
        self.freeze_top_cell = Some((row, col));
        Ok(self)
    }

    // ===== Columns and rows =====

    /// Set a column width in characters (0 to 255).
    pub fn set_column_width(&mut self, col: ColNum, width: impl Into<f64>) -> Result<&mut Self> {
        self.set_column_range_width(col, col, width)
    }

    /// Set a column width in pixels.
    pub fn set_column_width_pixels(&mut self, col: ColNum, width: u32) -> Result<&mut Self> {
        let width = self.metrics.px_to_width(width);
        self.set_column_width(col, width)
    }

    /// Set the width of the columns `first_col..=last_col`.
    pub fn set_column_range_width(
        &mut self,
        first_col: ColNum,
        last_col: ColNum,
        width: impl Into<f64>,
    ) -> Result<&mut Self> {
        let width = width.into();
        check_range(0, first_col, 0, last_col)?;
        if !width.is_finite() || !(0.0..=MAX_COLUMN_WIDTH).contains(&width) {
            return Err(XlsxError::range(format!(
                "Column width {} is outside 0..=255",
                width
            )));
        }
        for col in first_col..=last_col {
            self.columns.entry(col).or_default().width = Some(width);
        }
        Ok(self)
    }

    /// Default format for the cells of a column.
    pub fn set_column_format(&mut self, col: ColNum, format: &Format) -> Result<&mut Self> {
        check_cell(0, col)?;
        let format = self.formats.intern(format);
        self.columns.entry(col).or_default().format = format;
        Ok(self)
    }

    pub fn set_column_hidden(&mut self, col: ColNum) -> Result<&mut Self> {
        check_cell(0, col)?;
        self.columns.entry(col).or_default().hidden = true;
        Ok(self)
    }

    /// Set a row height in points (0 to 409).
    pub fn set_row_height(&mut self, row: RowNum, height: impl Into<f64>) -> Result<&mut Self> {
        let height = height.into();
        check_cell(row, 0)?;
        if !height.is_finite() || !(0.0..=MAX_ROW_HEIGHT).contains(&height) {
            return Err(XlsxError::range(format!(
                "Row height {} is outside 0..=409",
                height
            )));
        }
        self.rows.entry(row).or_default().height = Some(height);
        Ok(self)
    }

    /// Set a row height in pixels.
    pub fn set_row_height_pixels(&mut self, row: RowNum, height: u32) -> Result<&mut Self> {
        self.set_row_height(row, px_to_pt(height as f64))
    }

    /// Default format for the cells of a row.
    pub fn set_row_format(&mut self, row: RowNum, format: &Format) -> Result<&mut Self> {
        check_cell(row, 0)?;
        let format = self.formats.intern(format);
        self.rows.entry(row).or_default().format = format;
        Ok(self)
    }

    pub fn set_row_hidden(&mut self, row: RowNum) -> Result<&mut Self> {
        check_cell(row, 0)?;
        self.rows.entry(row).or_default().hidden = true;
        Ok(self)
    }

    // ===== Sheet options =====

    pub fn set_tab_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.tab_color = color.into().validate()?;
        Ok(self)
    }

    /// Zoom level as a percentage (10 to 400).
    pub fn set_zoom(&mut self, zoom: u16) -> Result<&mut Self> {
        if !(10..=400).contains(&zoom) {
            return Err(XlsxError::range(format!("Zoom {} is outside 10..=400", zoom)));
        }
        self.zoom = zoom;
        Ok(self)
    }

    /// Make this the worksheet shown when the file is opened.
    pub fn set_active(&mut self, enable: bool) -> &mut Self {
        self.active = enable;
        if enable {
            self.hidden = false;
        }
        self
    }

    /// Select the worksheet tab (several tabs can be selected).
    pub fn set_selected(&mut self, enable: bool) -> &mut Self {
        self.selected = enable;
        if enable {
            self.hidden = false;
        }
        self
    }

    /// Hide the worksheet. Active or selected worksheets cannot be hidden.
    pub fn set_hidden(&mut self, enable: bool) -> &mut Self {
        self.hidden = enable;
        if enable {
            self.active = false;
            self.selected = false;
        }
        self
    }

    pub fn set_right_to_left(&mut self, enable: bool) -> &mut Self {
        self.right_to_left = enable;
        self
    }

    /// Protect the worksheet from edits.
    pub fn protect(&mut self) -> &mut Self {
        self.protection = Some(SheetProtection::default());
        self
    }

    /// Protect the worksheet with Excel's legacy password hash.
    ///
    /// The hash is weak; it stops casual edits, not attackers.
    pub fn protect_with_password(&mut self, password: &str) -> &mut Self {
        self.protection = Some(SheetProtection {
            password_hash: Some(hash_password(password)),
        });
        self
    }

    // ===== Page setup =====

    pub fn set_landscape(&mut self) -> &mut Self {
        self.page.flags.insert(PrintFlags::LANDSCAPE);
        self
    }

    pub fn set_portrait(&mut self) -> &mut Self {
        self.page.flags.remove(PrintFlags::LANDSCAPE);
        self
    }

    /// Printer paper index, e.g. 1 for Letter and 9 for A4.
    pub fn set_paper_size(&mut self, paper_size: u8) -> &mut Self {
        self.page.paper_size = paper_size;
        self
    }

    /// Page margins in inches.
    pub fn set_margins(
        &mut self,
        left: f64,
        right: f64,
        top: f64,
        bottom: f64,
        header: f64,
        footer: f64,
    ) -> Result<&mut Self> {
        self.page.set_margins(Margins {
            left,
            right,
            top,
            bottom,
            header,
            footer,
        })?;
        Ok(self)
    }

    /// Header text with Excel's `&L`, `&C`, `&R`, `&P` … control codes.
    pub fn set_header(&mut self, header: &str) -> Result<&mut Self> {
        self.page.set_header(header)?;
        Ok(self)
    }

    pub fn set_footer(&mut self, footer: &str) -> Result<&mut Self> {
        self.page.set_footer(footer)?;
        Ok(self)
    }

    /// Add an image to the header.
    ///
    /// The header section at `position` must contain a `&[Picture]`
    /// placeholder, so set the header text first.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use longan::{HeaderImagePosition, Image, Workbook};
    ///
    /// let mut workbook = Workbook::new();
    /// let worksheet = workbook.add_worksheet();
    /// let logo = Image::new_from_buffer(&std::fs::read("logo.png")?)?;
    ///
    /// worksheet.set_header("&L&[Picture]&CQuarterly report")?;
    /// worksheet.set_header_image(&logo, HeaderImagePosition::Left)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn set_header_image(
        &mut self,
        image: &Image,
        position: HeaderImagePosition,
    ) -> Result<&mut Self> {
        self.page.set_image(
            image,
            ImageSlot {
                footer: false,
                position,
            },
        )?;
        Ok(self)
    }

    pub fn set_footer_image(
        &mut self,
        image: &Image,
        position: HeaderImagePosition,
    ) -> Result<&mut Self> {
        self.page.set_image(
            image,
            ImageSlot {
                footer: true,
                position,
            },
        )?;
        Ok(self)
    }

    /// Rows repeated at the top of every printed page.
    pub fn set_repeat_rows(&mut self, first_row: RowNum, last_row: RowNum) -> Result<&mut Self> {
        self.page.set_repeat_rows(first_row, last_row)?;
        Ok(self)
    }

    /// Columns repeated at the left of every printed page.
    pub fn set_repeat_columns(&mut self, first_col: ColNum, last_col: ColNum) -> Result<&mut Self> {
        self.page.set_repeat_columns(first_col, last_col)?;
        Ok(self)
    }

    pub fn set_print_area(
        &mut self,
        first_row: RowNum,
        first_col: ColNum,
        last_row: RowNum,
        last_col: ColNum,
    ) -> Result<&mut Self> {
        check_range(first_row, first_col, last_row, last_col)?;
        self.page.print_area = Some((first_row, first_col, last_row, last_col));
        Ok(self)
    }

    /// Print scale as a percentage (10 to 400).
    pub fn set_print_scale(&mut self, scale: u16) -> Result<&mut Self> {
        self.page.set_scale(scale)?;
        Ok(self)
    }

    /// Shrink the printout to `width` pages wide by `height` pages tall.
    /// A 0 leaves that dimension unconstrained.
    pub fn set_print_fit_to_pages(&mut self, width: u16, height: u16) -> &mut Self {
        self.page.fit_to_pages = Some((width, height));
        self
    }

    pub fn set_screen_gridlines(&mut self, enable: bool) -> &mut Self {
        self.page.flags.set(PrintFlags::HIDE_SCREEN_GRIDLINES, !enable);
        self
    }

    pub fn set_print_gridlines(&mut self, enable: bool) -> &mut Self {
        self.page.flags.set(PrintFlags::GRIDLINES, enable);
        self
    }

    pub fn set_print_black_and_white(&mut self, enable: bool) -> &mut Self {
        self.page.flags.set(PrintFlags::BLACK_AND_WHITE, enable);
        self
    }

    pub fn set_print_draft(&mut self, enable: bool) -> &mut Self {
        self.page.flags.set(PrintFlags::DRAFT, enable);
        self
    }

    pub fn set_print_first_page_number(&mut self, page_number: u16) -> &mut Self {
        self.page.first_page_number = Some(page_number);
        self
    }

    pub fn set_print_center_horizontally(&mut self, enable: bool) -> &mut Self {
        self.page.flags.set(PrintFlags::CENTER_HORIZONTALLY, enable);
        self
    }

    pub fn set_print_center_vertically(&mut self, enable: bool) -> &mut Self {
        self.page.flags.set(PrintFlags::CENTER_VERTICALLY, enable);
        self
    }

    /// Print row numbers and column letters.
    pub fn set_print_headings(&mut self, enable: bool) -> &mut Self {
        self.page.flags.set(PrintFlags::HEADINGS, enable);
        self
    }

    /// Page order: down then over (the default), or over then down.
    pub fn set_page_order(&mut self, down_then_over: bool) -> &mut Self {
        self.page.flags.set(PrintFlags::OVER_THEN_DOWN, !down_then_over);
        self
    }

    // ===== Save-time helpers =====

    /// Last used row and column over cells, or `None` for an empty grid.
    pub(crate) fn dimensions(&self) -> Option<(RowNum, ColNum, RowNum, ColNum)> {
        let (&first_row, _) = self.cells.first_key_value()?;
        let (&last_row, _) = self.cells.last_key_value()?;
        let mut first_col = COL_MAX;
        let mut last_col = 0;
        for cells in self.cells.values() {
            if let (Some((&min, _)), Some((&max, _))) =
                (cells.first_key_value(), cells.last_key_value())
            {
                first_col = first_col.min(min);
                last_col = last_col.max(max);
            }
        }
        Some((first_row, first_col, last_row, last_col))
    }

    /// Row height in points, before hiding.
    pub(crate) fn row_height_pt(&self, row: RowNum) -> f64 {
        self.rows
            .get(&row)
            .and_then(|options| options.height)
            .unwrap_or(self.default_row_height)
    }

    /// True if the default row height differs from Excel's 15pt.
    pub(crate) fn has_custom_default_row_height(&self) -> bool {
        self.default_row_height != DEFAULT_ROW_HEIGHT_PT
    }
}

impl GridMetrics for Worksheet {
    fn column_width_px(&self, col: ColNum) -> u32 {
        match self.columns.get(&col) {
            Some(options) if options.hidden => 0,
            Some(ColumnOptions {
                width: Some(width), ..
            }) => self.metrics.width_to_px(*width),
            _ => self.metrics.default_width_px(),
        }
    }

    fn row_height_px(&self, row: RowNum) -> u32 {
        match self.rows.get(&row) {
            Some(options) if options.hidden => 0,
            _ => pt_to_px(self.row_height_pt(row)).round() as u32,
        }
    }
}

/// `(row + down, col + across)`, failing if it leaves the sheet.
fn offset_cell(row: RowNum, col: ColNum, down: usize, across: usize) -> Result<(RowNum, ColNum)> {
    let r = row as u64 + down as u64;
    let c = col as u64 + across as u64;
    if r >= ROW_MAX as u64 || c >= COL_MAX as u64 {
        return Err(XlsxError::range(format!(
            "Cell ({}, {}) is outside the worksheet limits of {} rows and {} columns",
            r, c, ROW_MAX, COL_MAX
        )));
    }
    Ok((r as RowNum, c as ColNum))
}

/// Check a worksheet name against Excel's rules.
pub(crate) fn validate_sheet_name(name: &str) -> Result<()> {
    let len = name.chars().count();
    if len == 0 || len > MAX_SHEET_NAME_LEN {
        return Err(XlsxError::range(format!(
            "Worksheet name '{}' must be 1 to {} characters long",
            name, MAX_SHEET_NAME_LEN
        )));
    }
    if let Some(c) = name.chars().find(|c| INVALID_SHEET_NAME_CHARS.contains(c)) {
        return Err(XlsxError::parse(format!(
            "Worksheet name '{}' contains the invalid character '{}'",
            name, c
        )));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(XlsxError::parse(format!(
            "Worksheet name '{}' must not start or end with an apostrophe",
            name
        )));
    }
    if name.eq_ignore_ascii_case("History") {
        return Err(XlsxError::parse("'History' is a reserved worksheet name"));
    }
    Ok(())
}

/// Excel's legacy 16-bit password verifier.
pub(crate) fn hash_password(password: &str) -> u16 {
    let mut hash: u16 = 0;

    for ch in password.chars().rev() {
        hash = ((hash >> 14) & 0x01) | ((hash << 1) & 0x7FFF);
        hash ^= ch as u16;
    }

    hash = ((hash >> 14) & 0x01) | ((hash << 1) & 0x7FFF);
    hash ^= password.chars().count() as u16;
    hash ^= 0xCE4B;
    hash
}
