//! Charts for worksheets.
//!
//! A [`Chart`] is built from one or more [`ChartSeries`], each pointing at
//! worksheet ranges through [`ChartRange`]. Axes, legend, title and the
//! formatting types describe how it is drawn. Each chart is written to its own
//! `xl/charts/chartN.xml` part by [`writer::write_chart`].
//!
//! # Example
//!
//! ```
//! use longan::{Chart, ChartRange, ChartType, Workbook};
//!
//! let mut workbook = Workbook::new();
//! let worksheet = workbook.add_worksheet();
//! for (row, value) in [10, 40, 50, 20].into_iter().enumerate() {
//!     worksheet.write(row as u32, 0, value)?;
//! }
//!
//! let mut chart = Chart::new(ChartType::Line);
//! chart
//!     .add_series()
//!     .set_values(&ChartRange::new_from_range("Sheet1", 0, 0, 3, 0));
//! worksheet.insert_chart(0, 2, &chart)?;
//! # Ok::<(), longan::XlsxError>(())
//! ```

pub mod axis;
pub mod chart;
pub mod format;
pub mod legend;
pub mod series;
pub mod types;
pub mod writer;

pub use axis::{ChartAxis, ChartAxisCrossing};
pub use chart::{Chart, ChartLayout, ChartTitle};
pub use format::{
    ChartFont, ChartFormat, ChartGradientFill, ChartGradientStop, ChartLine, ChartPatternFill,
    ChartSolidFill,
};
pub use legend::ChartLegend;
pub use series::{ChartDataLabel, ChartMarker, ChartPoint, ChartRange, ChartSeries};
pub use types::{
    ChartAxisLabelPosition, ChartDataLabelPosition, ChartEmptyCells, ChartGradientFillType,
    ChartLegendPosition, ChartLineDashType, ChartMarkerType, ChartPatternFillType, ChartType,
};
