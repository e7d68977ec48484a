//! Chart element formatting: lines, fills and fonts.
//!
//! These map onto DrawingML shape properties (`c:spPr`) and text properties
//! (`c:txPr`).

use crate::ooxml::charts::types::{ChartGradientFillType, ChartLineDashType, ChartPatternFillType};
use crate::ooxml::error::{Result, XlsxError};
use crate::ooxml::xlsx::color::Color;

fn check_transparency(transparency: u8) -> Result<u8> {
    if transparency > 100 {
        return Err(XlsxError::range(format!(
            "Transparency {}% is outside 0..=100",
            transparency
        )));
    }
    Ok(transparency)
}

/// Line or border formatting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartLine {
    pub(crate) color: Color,
    pub(crate) width: Option<f64>,
    pub(crate) dash_type: ChartLineDashType,
    pub(crate) transparency: u8,
    pub(crate) hidden: bool,
}

impl ChartLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.color = color.into().validate()?;
        Ok(self)
    }

    /// Width in points (0..=1584).
    pub fn set_width(&mut self, width: f64) -> Result<&mut Self> {
        if !width.is_finite() || !(0.0..=1584.0).contains(&width) {
            return Err(XlsxError::range(format!(
                "Line width {} is outside 0..=1584 points",
                width
            )));
        }
        self.width = Some(width);
        Ok(self)
    }

    pub fn set_dash_type(&mut self, dash_type: ChartLineDashType) -> &mut Self {
        self.dash_type = dash_type;
        self
    }

    pub fn set_transparency(&mut self, transparency: u8) -> Result<&mut Self> {
        self.transparency = check_transparency(transparency)?;
        Ok(self)
    }

    pub fn set_hidden(&mut self, hidden: bool) -> &mut Self {
        self.hidden = hidden;
        self
    }
}

/// Solid fill.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartSolidFill {
    pub(crate) color: Color,
    pub(crate) transparency: u8,
}

impl ChartSolidFill {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.color = color.into().validate()?;
        Ok(self)
    }

    pub fn set_transparency(&mut self, transparency: u8) -> Result<&mut Self> {
        self.transparency = check_transparency(transparency)?;
        Ok(self)
    }
}

/// Two-color pattern fill.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartPatternFill {
    pub(crate) pattern: ChartPatternFillType,
    pub(crate) foreground: Color,
    pub(crate) background: Color,
}

impl ChartPatternFill {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_pattern(&mut self, pattern: ChartPatternFillType) -> &mut Self {
        self.pattern = pattern;
        self
    }

    pub fn set_foreground_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.foreground = color.into().validate()?;
        Ok(self)
    }

    pub fn set_background_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.background = color.into().validate()?;
        Ok(self)
    }
}

/// One color stop of a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGradientStop {
    pub(crate) color: Color,
    pub(crate) position: u8,
}

impl ChartGradientStop {
    /// A stop at `position` percent (0..=100) along the gradient.
    pub fn new(color: impl Into<Color>, position: u8) -> Self {
        Self {
            color: color.into(),
            position,
        }
    }
}

/// Gradient fill with 2 to 10 stops.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartGradientFill {
    pub(crate) gradient_type: ChartGradientFillType,
    pub(crate) stops: Vec<ChartGradientStop>,
    pub(crate) angle: u16,
}

impl ChartGradientFill {
    pub fn new() -> Self {
        Self {
            angle: 90,
            ..Self::default()
        }
    }

    pub fn set_type(&mut self, gradient_type: ChartGradientFillType) -> &mut Self {
        self.gradient_type = gradient_type;
        self
    }

    pub fn set_gradient_stops(&mut self, stops: &[ChartGradientStop]) -> Result<&mut Self> {
        if !(2..=10).contains(&stops.len()) {
            return Err(XlsxError::range(format!(
                "Gradient needs 2 to 10 stops, got {}",
                stops.len()
            )));
        }
        for stop in stops {
            stop.color.validate()?;
            if stop.position > 100 {
                return Err(XlsxError::range(format!(
                    "Gradient stop position {} is outside 0..=100",
                    stop.position
                )));
            }
        }
        self.stops = stops.to_vec();
        Ok(self)
    }

    /// Angle of a linear gradient in degrees (0..360).
    pub fn set_angle(&mut self, angle: u16) -> Result<&mut Self> {
        if angle >= 360 {
            return Err(XlsxError::range(format!(
                "Gradient angle {} is outside 0..360",
                angle
            )));
        }
        self.angle = angle;
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ChartFill {
    None,
    Solid(ChartSolidFill),
    Pattern(ChartPatternFill),
    Gradient(ChartGradientFill),
}

/// Fill and border of a chart element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartFormat {
    pub(crate) line: Option<ChartLine>,
    pub(crate) fill: Option<ChartFill>,
}

impl ChartFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Border or line properties.
    pub fn set_line(&mut self, line: &ChartLine) -> &mut Self {
        self.line = Some(line.clone());
        self
    }

    pub fn set_border(&mut self, line: &ChartLine) -> &mut Self {
        self.set_line(line)
    }

    pub fn set_no_line(&mut self) -> &mut Self {
        let mut line = ChartLine::new();
        line.set_hidden(true);
        self.line = Some(line);
        self
    }

    pub fn set_no_border(&mut self) -> &mut Self {
        self.set_no_line()
    }

    pub fn set_solid_fill(&mut self, fill: &ChartSolidFill) -> &mut Self {
        self.fill = Some(ChartFill::Solid(fill.clone()));
        self
    }

    pub fn set_pattern_fill(&mut self, fill: &ChartPatternFill) -> &mut Self {
        self.fill = Some(ChartFill::Pattern(fill.clone()));
        self
    }

    /// A gradient needs its stops set before it is used.
    pub fn set_gradient_fill(&mut self, fill: &ChartGradientFill) -> Result<&mut Self> {
        if fill.stops.len() < 2 {
            return Err(XlsxError::config(
                "Gradient fill has no stops; call set_gradient_stops first",
            ));
        }
        self.fill = Some(ChartFill::Gradient(fill.clone()));
        Ok(self)
    }

    pub fn set_no_fill(&mut self) -> &mut Self {
        self.fill = Some(ChartFill::None);
        self
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.line.is_none() && self.fill.is_none()
    }
}

/// Font of chart text.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartFont {
    pub(crate) name: Option<String>,
    pub(crate) size: Option<f64>,
    pub(crate) bold: Option<bool>,
    pub(crate) italic: bool,
    pub(crate) underline: bool,
    pub(crate) color: Color,
    pub(crate) rotation: Option<i16>,
}

impl ChartFont {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_name(&mut self, name: &str) -> &mut Self {
        self.name = Some(name.to_string());
        self
    }

    /// Size in points (1..=400).
    pub fn set_size(&mut self, size: f64) -> Result<&mut Self> {
        if !size.is_finite() || !(1.0..=400.0).contains(&size) {
            return Err(XlsxError::range(format!(
                "Chart font size {} is outside 1..=400",
                size
            )));
        }
        self.size = Some(size);
        Ok(self)
    }

    pub fn set_bold(&mut self) -> &mut Self {
        self.bold = Some(true);
        self
    }

    /// Titles are bold by default; this turns that off.
    pub fn unset_bold(&mut self) -> &mut Self {
        self.bold = Some(false);
        self
    }

    pub fn set_italic(&mut self) -> &mut Self {
        self.italic = true;
        self
    }

    pub fn set_underline(&mut self) -> &mut Self {
        self.underline = true;
        self
    }

    pub fn set_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.color = color.into().validate()?;
        Ok(self)
    }

    /// Text rotation in degrees (-90..=90).
    pub fn set_rotation(&mut self, rotation: i16) -> Result<&mut Self> {
        if !(-90..=90).contains(&rotation) {
            return Err(XlsxError::range(format!(
                "Chart text rotation {} is outside -90..=90",
                rotation
            )));
        }
        self.rotation = Some(rotation);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_validation() {
        let mut gradient = ChartGradientFill::new();
        assert!(gradient.set_gradient_stops(&[ChartGradientStop::new(Color::Red, 0)]).is_err());
        assert!(
            gradient
                .set_gradient_stops(&[
                    ChartGradientStop::new(Color::Red, 0),
                    ChartGradientStop::new(Color::Blue, 101),
                ])
                .is_err()
        );
        assert!(gradient.stops.is_empty());

        let mut format = ChartFormat::new();
        assert!(matches!(
            format.set_gradient_fill(&gradient),
            Err(XlsxError::Configuration(_))
        ));

        gradient
            .set_gradient_stops(&[
                ChartGradientStop::new(Color::Red, 0),
                ChartGradientStop::new(Color::Blue, 100),
            ])
            .unwrap();
        format.set_gradient_fill(&gradient).unwrap();
        assert!(!format.is_empty());
    }

    #[test]
    fn test_line_validation() {
        let mut line = ChartLine::new();
        assert!(line.set_width(2000.0).is_err());
        assert!(line.set_transparency(101).is_err());
        line.set_width(2.25).unwrap().set_dash_type(ChartLineDashType::Dash);
        assert_eq!(line.width, Some(2.25));
    }
}
