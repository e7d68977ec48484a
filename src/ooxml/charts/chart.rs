//! Top-level chart model.

use crate::ooxml::charts::axis::ChartAxis;
use crate::ooxml::charts::format::{ChartFont, ChartFormat};
use crate::ooxml::charts::legend::ChartLegend;
use crate::ooxml::charts::series::{ChartRange, ChartSeries};
use crate::ooxml::charts::types::{ChartEmptyCells, ChartType};
use crate::ooxml::error::{Result, XlsxError};
use crate::ooxml::xlsx::image::ObjectMovement;

pub(crate) const DEFAULT_CHART_WIDTH: u32 = 480;
pub(crate) const DEFAULT_CHART_HEIGHT: u32 = 288;

/// Manual position of a chart element, as fractions of the chart area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChartLayout {
    pub(crate) x: Option<f64>,
    pub(crate) y: Option<f64>,
    pub(crate) width: Option<f64>,
    pub(crate) height: Option<f64>,
}

fn check_fraction(what: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(XlsxError::range(format!(
            "Layout {} {} is outside 0.0..=1.0",
            what, value
        )));
    }
    Ok(value)
}

impl ChartLayout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Top-left corner.
    pub fn set_offset(&mut self, x: f64, y: f64) -> Result<&mut Self> {
        let x = check_fraction("x", x)?;
        let y = check_fraction("y", y)?;
        self.x = Some(x);
        self.y = Some(y);
        Ok(self)
    }

    pub fn set_dimensions(&mut self, width: f64, height: f64) -> Result<&mut Self> {
        let width = check_fraction("width", width)?;
        let height = check_fraction("height", height)?;
        self.width = Some(width);
        self.height = Some(height);
        Ok(self)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.x.is_none() && self.width.is_none()
    }
}

/// Title text: literal or from a cell.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TitleText {
    Literal(String),
    Range(ChartRange),
}

/// Chart or axis title.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartTitle {
    pub(crate) text: Option<TitleText>,
    pub(crate) hidden: bool,
    pub(crate) overlay: bool,
    pub(crate) font: Option<ChartFont>,
    pub(crate) format: ChartFormat,
    pub(crate) layout: Option<ChartLayout>,
}

impl ChartTitle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.text = Some(TitleText::Literal(name.to_string()));
        self
    }

    pub fn set_name_range(&mut self, range: &ChartRange) -> &mut Self {
        self.text = Some(TitleText::Range(range.clone()));
        self
    }

    /// Suppress the automatic title of single-series charts.
    pub fn set_hidden(&mut self) -> &mut Self {
        self.hidden = true;
        self
    }

    pub fn set_overlay(&mut self, overlay: bool) -> &mut Self {
        self.overlay = overlay;
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

    pub fn set_layout(&mut self, layout: &ChartLayout) -> &mut Self {
        self.layout = Some(*layout);
        self
    }
}

/// A chart, inserted into a worksheet with `Worksheet::insert_chart`.
///
/// ```
/// use longan::{Chart, ChartRange, ChartType};
///
/// let mut chart = Chart::new(ChartType::Column);
/// chart
///     .add_series()
///     .set_values(&ChartRange::new_from_range("Sheet1", 0, 0, 4, 0));
/// chart.title().set_name("Totals");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    pub(crate) chart_type: ChartType,
    pub(crate) series: Vec<ChartSeries>,
    pub(crate) title: ChartTitle,
    pub(crate) x_axis: ChartAxis,
    pub(crate) y_axis: ChartAxis,
    pub(crate) legend: ChartLegend,
    pub(crate) style: u8,
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) hole_size: Option<u8>,
    pub(crate) rotation: Option<u16>,
    pub(crate) show_empty_cells_as: ChartEmptyCells,
    pub(crate) show_hidden_data: bool,
    pub(crate) chart_area_format: ChartFormat,
    pub(crate) plot_area_format: ChartFormat,
    pub(crate) plot_area_layout: Option<ChartLayout>,
    pub(crate) alt_text: String,
    pub(crate) name: String,
    pub(crate) object_movement: ObjectMovement,
}

impl Chart {
    pub fn new(chart_type: ChartType) -> Chart {
        Chart {
            chart_type,
            series: Vec::new(),
            title: ChartTitle::default(),
            x_axis: ChartAxis::default(),
            y_axis: ChartAxis::default(),
            legend: ChartLegend::default(),
            style: 2,
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
            hole_size: None,
            rotation: None,
            show_empty_cells_as: ChartEmptyCells::default(),
            show_hidden_data: false,
            chart_area_format: ChartFormat::default(),
            plot_area_format: ChartFormat::default(),
            plot_area_layout: None,
            alt_text: String::new(),
            name: String::new(),
            object_movement: ObjectMovement::default(),
        }
    }

    #[inline]
    pub fn chart_type(&self) -> ChartType {
        self.chart_type
    }

    /// Append an empty series and return it for configuration.
    pub fn add_series(&mut self) -> &mut ChartSeries {
        self.series.push(ChartSeries::new());
        let last = self.series.len() - 1;
        &mut self.series[last]
    }

    /// Append a copy of a configured series.
    pub fn push_series(&mut self, series: &ChartSeries) -> &mut Self {
        self.series.push(series.clone());
        self
    }

    pub fn title(&mut self) -> &mut ChartTitle {
        &mut self.title
    }

    /// Category axis (the value X axis for scatter charts).
    pub fn x_axis(&mut self) -> &mut ChartAxis {
        &mut self.x_axis
    }

    pub fn y_axis(&mut self) -> &mut ChartAxis {
        &mut self.y_axis
    }

    pub fn legend(&mut self) -> &mut ChartLegend {
        &mut self.legend
    }

    /// One of Excel's 48 built-in chart styles.
    pub fn set_style(&mut self, style: u8) -> Result<&mut Self> {
        if !(1..=48).contains(&style) {
            return Err(XlsxError::range(format!("Chart style {} is outside 1..=48", style)));
        }
        self.style = style;
        Ok(self)
    }

    /// Width in pixels.
    pub fn set_width(&mut self, width: u32) -> Result<&mut Self> {
        if width == 0 {
            return Err(XlsxError::range("Chart width must be positive"));
        }
        self.width = width;
        Ok(self)
    }

    /// Height in pixels.
    pub fn set_height(&mut self, height: u32) -> Result<&mut Self> {
        if height == 0 {
            return Err(XlsxError::range("Chart height must be positive"));
        }
        self.height = height;
        Ok(self)
    }

    /// Doughnut hole size as a percentage (10..=90).
    pub fn set_hole_size(&mut self, hole_size: u8) -> Result<&mut Self> {
        if !(10..=90).contains(&hole_size) {
            return Err(XlsxError::range(format!(
                "Doughnut hole size {} is outside 10..=90",
                hole_size
            )));
        }
        self.hole_size = Some(hole_size);
        Ok(self)
    }

    /// Angle of the first pie or doughnut slice (0..=360).
    pub fn set_rotation(&mut self, rotation: u16) -> Result<&mut Self> {
        if rotation > 360 {
            return Err(XlsxError::range(format!(
                "Chart rotation {} is outside 0..=360",
                rotation
            )));
        }
        self.rotation = Some(rotation);
        Ok(self)
    }

    pub fn set_show_empty_cells_as(&mut self, option: ChartEmptyCells) -> &mut Self {
        self.show_empty_cells_as = option;
        self
    }

    /// Plot data in hidden rows and columns.
    pub fn set_show_hidden_data(&mut self) -> &mut Self {
        self.show_hidden_data = true;
        self
    }

    pub fn set_chart_area_format(&mut self, format: &ChartFormat) -> &mut Self {
        self.chart_area_format = format.clone();
        self
    }

    pub fn set_plot_area_format(&mut self, format: &ChartFormat) -> &mut Self {
        self.plot_area_format = format.clone();
        self
    }

    pub fn set_plot_area_layout(&mut self, layout: &ChartLayout) -> &mut Self {
        self.plot_area_layout = Some(*layout);
        self
    }

    pub fn set_alt_text(&mut self, alt_text: &str) -> &mut Self {
        self.alt_text = alt_text.to_string();
        self
    }

    /// Object name shown in Excel's selection pane.
    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = name.to_string();
        self
    }

    pub fn set_object_movement(&mut self, movement: ObjectMovement) -> &mut Self {
        self.object_movement = movement;
        self
    }

    /// Check the chart can be written.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.series.is_empty() {
            return Err(XlsxError::config(
                "Chart must contain at least one data series",
            ));
        }
        for (index, series) in self.series.iter().enumerate() {
            series.validate(index)?;
        }
        if self.chart_type == ChartType::Stock && self.series.len() < 3 {
            return Err(XlsxError::config(format!(
                "Stock chart needs high, low and close series, got {}",
                self.series.len()
            )));
        }
        self.x_axis.validate("X")?;
        self.y_axis.validate("Y")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_chart_is_rejected() {
        let chart = Chart::new(ChartType::Pie);
        assert!(matches!(chart.validate(), Err(XlsxError::Configuration(_))));
    }

    #[test]
    fn test_series_without_values_is_rejected() {
        let mut chart = Chart::new(ChartType::Line);
        chart.add_series().set_name("Empty");
        assert!(matches!(chart.validate(), Err(XlsxError::Configuration(_))));

        chart.series[0].set_values(&ChartRange::new_from_range("Sheet1", 0, 0, 3, 0));
        assert!(chart.validate().is_ok());
    }

    #[test]
    fn test_stock_needs_three_series() {
        let mut chart = Chart::new(ChartType::Stock);
        let range = ChartRange::new_from_range("Sheet1", 0, 1, 9, 1);
        chart.add_series().set_values(&range);
        chart.add_series().set_values(&range);
        assert!(chart.validate().is_err());
        chart.add_series().set_values(&range);
        assert!(chart.validate().is_ok());
    }

    #[test]
    fn test_setter_ranges() {
        let mut chart = Chart::new(ChartType::Doughnut);
        assert!(chart.set_style(0).is_err());
        assert!(chart.set_hole_size(95).is_err());
        assert!(chart.set_rotation(361).is_err());
        assert_eq!((chart.width, chart.height), (480, 288));
        chart.set_style(10).unwrap().set_hole_size(50).unwrap();
        assert_eq!(chart.hole_size, Some(50));

        let mut layout = ChartLayout::new();
        assert!(layout.set_offset(1.5, 0.0).is_err());
        assert!(layout.is_empty());
        layout.set_offset(0.1, 0.2).unwrap().set_dimensions(0.5, 0.5).unwrap();
        assert!(!layout.is_empty());
    }
}
