//! Chart axes.

use crate::ooxml::charts::chart::ChartTitle;
use crate::ooxml::charts::format::{ChartFont, ChartFormat, ChartLine};
use crate::ooxml::charts::types::ChartAxisLabelPosition;
use crate::ooxml::error::{Result, XlsxError};

/// Where the other axis crosses this one.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ChartAxisCrossing {
    #[default]
    Automatic,
    Min,
    Max,
    /// At a category number, for category axes.
    CategoryNumber(u32),
    /// At a value, for value axes.
    AxisValue(f64),
}

/// Category or value axis of a chart.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartAxis {
    /// Axis title
    pub(crate) title: ChartTitle,
    pub(crate) min: Option<f64>,
    pub(crate) max: Option<f64>,
    pub(crate) major_unit: Option<f64>,
    pub(crate) minor_unit: Option<f64>,
    /// Plot in reverse order
    pub(crate) reverse: bool,
    pub(crate) hidden: bool,
    /// `None` keeps the chart type's default
    pub(crate) major_gridlines: Option<bool>,
    pub(crate) major_gridlines_line: Option<ChartLine>,
    pub(crate) minor_gridlines: bool,
    pub(crate) num_format: Option<String>,
    pub(crate) log_base: Option<u16>,
    pub(crate) label_position: ChartAxisLabelPosition,
    pub(crate) crossing: ChartAxisCrossing,
    pub(crate) font: Option<ChartFont>,
    pub(crate) format: ChartFormat,
}

fn check_finite(what: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(XlsxError::range(format!("Axis {} {} is not finite", what, value)));
    }
    Ok(value)
}

impl ChartAxis {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.title.set_name(name);
        self
    }

    pub fn set_name_font(&mut self, font: &ChartFont) -> &mut Self {
        self.title.set_font(font);
        self
    }

    pub fn set_min(&mut self, min: f64) -> Result<&mut Self> {
        self.min = Some(check_finite("minimum", min)?);
        Ok(self)
    }

    pub fn set_max(&mut self, max: f64) -> Result<&mut Self> {
        self.max = Some(check_finite("maximum", max)?);
        Ok(self)
    }

    pub fn set_major_unit(&mut self, unit: f64) -> Result<&mut Self> {
        if check_finite("major unit", unit)? <= 0.0 {
            return Err(XlsxError::range(format!("Axis major unit {} must be positive", unit)));
        }
        self.major_unit = Some(unit);
        Ok(self)
    }

    pub fn set_minor_unit(&mut self, unit: f64) -> Result<&mut Self> {
        if check_finite("minor unit", unit)? <= 0.0 {
            return Err(XlsxError::range(format!("Axis minor unit {} must be positive", unit)));
        }
        self.minor_unit = Some(unit);
        Ok(self)
    }

    pub fn set_reverse(&mut self) -> &mut Self {
        self.reverse = true;
        self
    }

    pub fn set_hidden(&mut self, hidden: bool) -> &mut Self {
        self.hidden = hidden;
        self
    }

    pub fn set_major_gridlines(&mut self, enable: bool) -> &mut Self {
        self.major_gridlines = Some(enable);
        self
    }

    pub fn set_major_gridlines_line(&mut self, line: &ChartLine) -> &mut Self {
        self.major_gridlines = Some(true);
        self.major_gridlines_line = Some(line.clone());
        self
    }

    pub fn set_minor_gridlines(&mut self, enable: bool) -> &mut Self {
        self.minor_gridlines = enable;
        self
    }

    pub fn set_num_format(&mut self, num_format: &str) -> &mut Self {
        self.num_format = Some(num_format.to_string());
        self
    }

    /// Logarithmic scale with the given base (2..=1000).
    pub fn set_log_base(&mut self, base: u16) -> Result<&mut Self> {
        if !(2..=1000).contains(&base) {
            return Err(XlsxError::range(format!(
                "Axis log base {} is outside 2..=1000",
                base
            )));
        }
        self.log_base = Some(base);
        Ok(self)
    }

    pub fn set_label_position(&mut self, position: ChartAxisLabelPosition) -> &mut Self {
        self.label_position = position;
        self
    }

    pub fn set_crossing(&mut self, crossing: ChartAxisCrossing) -> &mut Self {
        self.crossing = crossing;
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

    pub(crate) fn validate(&self, which: &str) -> Result<()> {
        if let (Some(min), Some(max)) = (self.min, self.max) {
            if min >= max {
                return Err(XlsxError::config(format!(
                    "{} axis minimum {} is not below its maximum {}",
                    which, min, max
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_bounds() {
        let mut axis = ChartAxis::new();
        assert!(axis.set_min(f64::NAN).is_err());
        assert!(axis.set_major_unit(0.0).is_err());
        assert!(axis.set_log_base(1).is_err());

        axis.set_min(10.0).unwrap().set_max(5.0).unwrap();
        assert!(matches!(axis.validate("Y"), Err(XlsxError::Configuration(_))));
        axis.set_max(50.0).unwrap();
        assert!(axis.validate("Y").is_ok());
    }
}
