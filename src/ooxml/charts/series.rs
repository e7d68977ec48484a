//! Chart series, data ranges and per-point options.

use crate::ooxml::charts::format::{ChartFont, ChartFormat};
use crate::ooxml::charts::types::{ChartDataLabelPosition, ChartMarkerType};
use crate::ooxml::error::{Result, XlsxError};
use crate::ooxml::xlsx::reference::{
    parse_sheet_range, quote_sheet_name, range_ref_absolute, ColNum, RowNum,
};

/// Values cached next to a range reference so that readers can draw the
/// chart without recalculating.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) enum RangeCache {
    #[default]
    Empty,
    Numbers(Vec<Option<f64>>),
    Strings(Vec<String>),
}

/// A worksheet range that feeds a chart.
///
/// ```
/// use longan::ChartRange;
///
/// let range = ChartRange::new_from_string("'Sales Data'!$B$2:$B$7").unwrap();
/// assert_eq!(range.formula(), "'Sales Data'!$B$2:$B$7");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRange {
    pub(crate) sheet: String,
    pub(crate) first_row: RowNum,
    pub(crate) first_col: ColNum,
    pub(crate) last_row: RowNum,
    pub(crate) last_col: ColNum,
    pub(crate) cache: RangeCache,
}

impl ChartRange {
    /// A range from 0-based cell coordinates.
    pub fn new_from_range(
        sheet: &str,
        first_row: RowNum,
        first_col: ColNum,
        last_row: RowNum,
        last_col: ColNum,
    ) -> ChartRange {
        ChartRange {
            sheet: sheet.to_string(),
            first_row,
            first_col,
            last_row,
            last_col,
            cache: RangeCache::Empty,
        }
    }

    /// Parse a reference such as `Sheet1!$A$1:$A$5`.
    pub fn new_from_string(range: &str) -> Result<ChartRange> {
        let parsed = parse_sheet_range(range)?;
        Ok(ChartRange::new_from_range(
            &parsed.sheet,
            parsed.first_row,
            parsed.first_col,
            parsed.last_row,
            parsed.last_col,
        ))
    }

    /// The absolute reference used in chart formulas.
    pub fn formula(&self) -> String {
        format!(
            "{}!{}",
            quote_sheet_name(&self.sheet),
            range_ref_absolute(self.first_row, self.first_col, self.last_row, self.last_col)
        )
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet
    }

    /// Number of cells covered.
    pub(crate) fn len(&self) -> usize {
        let rows = self.last_row.saturating_sub(self.first_row) as usize + 1;
        let cols = self.last_col.saturating_sub(self.first_col) as usize + 1;
        rows * cols
    }

    /// Cells in row-major order.
    pub(crate) fn cells(&self) -> impl Iterator<Item = (RowNum, ColNum)> + '_ {
        (self.first_row..=self.last_row)
            .flat_map(move |row| (self.first_col..=self.last_col).map(move |col| (row, col)))
    }

    pub(crate) fn validate(&self) -> Result<()> {
        crate::ooxml::xlsx::reference::check_range(
            self.first_row,
            self.first_col,
            self.last_row,
            self.last_col,
        )
    }
}

/// Series name: literal text or a cell reference.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SeriesName {
    Text(String),
    Range(ChartRange),
}

/// Point marker for line, scatter and radar series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartMarker {
    pub(crate) marker_type: ChartMarkerType,
    pub(crate) size: Option<u8>,
    pub(crate) format: ChartFormat,
}

impl ChartMarker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_type(&mut self, marker_type: ChartMarkerType) -> &mut Self {
        self.marker_type = marker_type;
        self
    }

    /// Hide markers.
    pub fn set_none(&mut self) -> &mut Self {
        self.marker_type = ChartMarkerType::None;
        self
    }

    /// Marker size in points (2..=72).
    pub fn set_size(&mut self, size: u8) -> Result<&mut Self> {
        if !(2..=72).contains(&size) {
            return Err(XlsxError::range(format!(
                "Marker size {} is outside 2..=72",
                size
            )));
        }
        self.size = Some(size);
        Ok(self)
    }

    pub fn set_format(&mut self, format: &ChartFormat) -> &mut Self {
        self.format = format.clone();
        self
    }
}

/// Labels drawn next to the data points of a series.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartDataLabel {
    pub(crate) show_value: bool,
    pub(crate) show_category_name: bool,
    pub(crate) show_series_name: bool,
    pub(crate) show_percentage: bool,
    pub(crate) show_legend_key: bool,
    pub(crate) position: Option<ChartDataLabelPosition>,
    pub(crate) num_format: Option<String>,
    pub(crate) font: Option<ChartFont>,
    pub(crate) format: ChartFormat,
}

impl ChartDataLabel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show_value(&mut self) -> &mut Self {
        self.show_value = true;
        self
    }

    pub fn show_category_name(&mut self) -> &mut Self {
        self.show_category_name = true;
        self
    }

    pub fn show_series_name(&mut self) -> &mut Self {
        self.show_series_name = true;
        self
    }

    /// Pie and doughnut charts only.
    pub fn show_percentage(&mut self) -> &mut Self {
        self.show_percentage = true;
        self
    }

    pub fn show_legend_key(&mut self) -> &mut Self {
        self.show_legend_key = true;
        self
    }

    pub fn set_position(&mut self, position: ChartDataLabelPosition) -> &mut Self {
        self.position = Some(position);
        self
    }

    pub fn set_num_format(&mut self, num_format: &str) -> &mut Self {
        self.num_format = Some(num_format.to_string());
        self
    }

    pub fn set_font(&mut self, font: &ChartFont) -> &mut Self {
        self.font = Some(font.clone());
        self
    }

    pub fn set_format(&mut self, format: &ChartFormat) -> &mut Self {
        self.format = format.clone();
        self
    }

    /// A label with nothing switched on shows the value.
    pub(crate) fn shows_nothing(&self) -> bool {
        !(self.show_value
            || self.show_category_name
            || self.show_series_name
            || self.show_percentage
            || self.show_legend_key)
    }
}

/// Formatting of a single data point, e.g. one pie slice.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartPoint {
    pub(crate) format: ChartFormat,
}

impl ChartPoint {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_format(&mut self, format: &ChartFormat) -> &mut Self {
        self.format = format.clone();
        self
    }
}

/// One data series of a chart.
///
/// ```
/// use longan::{ChartRange, ChartSeries};
///
/// let mut series = ChartSeries::new();
/// series
///     .set_name("Revenue")
///     .set_categories(&ChartRange::new_from_range("Sheet1", 1, 0, 6, 0))
///     .set_values(&ChartRange::new_from_range("Sheet1", 1, 1, 6, 1));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSeries {
    pub(crate) name: Option<SeriesName>,
    pub(crate) categories: Option<ChartRange>,
    pub(crate) values: Option<ChartRange>,
    pub(crate) format: ChartFormat,
    pub(crate) marker: Option<ChartMarker>,
    pub(crate) data_label: Option<ChartDataLabel>,
    pub(crate) points: Vec<ChartPoint>,
    pub(crate) smooth: Option<bool>,
    pub(crate) gap: Option<u16>,
    pub(crate) overlap: Option<i8>,
    pub(crate) invert_if_negative: bool,
}

impl ChartSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Literal series name shown in the legend.
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = Some(SeriesName::Text(name.to_string()));
        self
    }

    /// Series name taken from a worksheet cell.
    pub fn set_name_range(&mut self, range: &ChartRange) -> &mut Self {
        self.name = Some(SeriesName::Range(range.clone()));
        self
    }

    pub fn set_categories(&mut self, range: &ChartRange) -> &mut Self {
        self.categories = Some(range.clone());
        self
    }

    pub fn set_values(&mut self, range: &ChartRange) -> &mut Self {
        self.values = Some(range.clone());
        self
    }

    pub fn set_format(&mut self, format: &ChartFormat) -> &mut Self {
        self.format = format.clone();
        self
    }

    pub fn set_marker(&mut self, marker: &ChartMarker) -> &mut Self {
        self.marker = Some(marker.clone());
        self
    }

    pub fn set_data_label(&mut self, data_label: &ChartDataLabel) -> &mut Self {
        self.data_label = Some(data_label.clone());
        self
    }

    /// Per-point formats, in point order. Default points can be left as
    /// `ChartPoint::new()`.
    pub fn set_points(&mut self, points: &[ChartPoint]) -> &mut Self {
        self.points = points.to_vec();
        self
    }

    /// Smoothed lines, for line and scatter charts.
    pub fn set_smooth(&mut self, smooth: bool) -> &mut Self {
        self.smooth = Some(smooth);
        self
    }

    /// Gap between bar or column clusters, as a percentage (0..=500).
    pub fn set_gap(&mut self, gap: u16) -> Result<&mut Self> {
        if gap > 500 {
            return Err(XlsxError::range(format!("Series gap {} is outside 0..=500", gap)));
        }
        self.gap = Some(gap);
        Ok(self)
    }

    /// Overlap of bars or columns, as a percentage (-100..=100).
    pub fn set_overlap(&mut self, overlap: i8) -> Result<&mut Self> {
        if !(-100..=100).contains(&overlap) {
            return Err(XlsxError::range(format!(
                "Series overlap {} is outside -100..=100",
                overlap
            )));
        }
        self.overlap = Some(overlap);
        Ok(self)
    }

    pub fn set_invert_if_negative(&mut self) -> &mut Self {
        self.invert_if_negative = true;
        self
    }

    /// Ranges referenced by this series, in write order.
    pub(crate) fn ranges_mut(&mut self) -> impl Iterator<Item = &mut ChartRange> {
        let name = match &mut self.name {
            Some(SeriesName::Range(range)) => Some(range),
            _ => None,
        };
        name.into_iter()
            .chain(self.categories.as_mut())
            .chain(self.values.as_mut())
    }

    pub(crate) fn validate(&self, index: usize) -> Result<()> {
        let Some(values) = &self.values else {
            return Err(XlsxError::config(format!(
                "Chart series {} has no values range",
                index
            )));
        };
        values.validate()?;
        if let Some(categories) = &self.categories {
            categories.validate()?;
        }
        if let Some(SeriesName::Range(range)) = &self.name {
            range.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_formula() {
        let range = ChartRange::new_from_range("Sheet1", 0, 0, 4, 0);
        assert_eq!(range.formula(), "Sheet1!$A$1:$A$5");
        assert_eq!(range.len(), 5);

        let single = ChartRange::new_from_range("My Data", 2, 1, 2, 1);
        assert_eq!(single.formula(), "'My Data'!$B$3");
    }

    #[test]
    fn test_range_from_string() {
        let range = ChartRange::new_from_string("Sheet1!$B$2:$C$4").unwrap();
        assert_eq!(
            (range.first_row, range.first_col, range.last_row, range.last_col),
            (1, 1, 3, 2)
        );
        assert_eq!(range.cells().count(), 6);
        assert_eq!(range.cells().nth(1), Some((1, 2)));

        let quoted = ChartRange::new_from_string("'It''s'!A1").unwrap();
        assert_eq!(quoted.sheet_name(), "It's");
        assert_eq!(quoted.formula(), "'It''s'!$A$1");

        for bad in ["A1:B2", "Sheet1!", "Sheet1!B5:A1", "Sheet1!ZZZZ1"] {
            assert!(
                matches!(ChartRange::new_from_string(bad), Err(XlsxError::Parse(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_series_validation() {
        let mut series = ChartSeries::new();
        series.set_name("Only a name");
        assert!(matches!(series.validate(0), Err(XlsxError::Configuration(_))));

        series.set_values(&ChartRange::new_from_range("Sheet1", 5, 0, 1, 0));
        assert!(matches!(series.validate(0), Err(XlsxError::Range(_))));

        series.set_values(&ChartRange::new_from_range("Sheet1", 0, 0, 5, 0));
        assert!(series.validate(0).is_ok());
    }

    #[test]
    fn test_option_ranges() {
        let mut series = ChartSeries::new();
        assert!(series.set_gap(501).is_err());
        assert!(series.set_overlap(-101).is_err());
        assert_eq!(series.gap, None);
        series.set_gap(150).unwrap().set_overlap(20).unwrap();
        assert_eq!((series.gap, series.overlap), (Some(150), Some(20)));

        let mut marker = ChartMarker::new();
        assert!(marker.set_size(1).is_err());
        marker.set_size(7).unwrap().set_type(ChartMarkerType::Diamond);
        assert_eq!(marker.size, Some(7));
    }
}
