//! Colors used by formats, notes, table and chart objects.

use crate::ooxml::error::{Result, XlsxError};
use phf::phf_map;
use std::fmt::Write as FmtWrite;

/// A color value.
///
/// Colors are either a named palette entry, an RGB value `0xRRGGBB`, a theme
/// color `(column, shade)` from Excel's palette picker, or one of the special
/// values `Default` (no color written) and `Automatic` (`auto="1"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    RGB(u32),
    /// Theme color: column 0..=9 of the palette, shade 0..=5.
    Theme(u8, u8),
    #[default]
    Default,
    Automatic,
    Black,
    Blue,
    Brown,
    Cyan,
    Gray,
    Green,
    Lime,
    Magenta,
    Navy,
    Orange,
    Pink,
    Purple,
    Red,
    Silver,
    White,
    Yellow,
}

static NAMED_COLORS: phf::Map<&'static str, Color> = phf_map! {
    "black" => Color::Black,
    "blue" => Color::Blue,
    "brown" => Color::Brown,
    "cyan" => Color::Cyan,
    "gray" => Color::Gray,
    "grey" => Color::Gray,
    "green" => Color::Green,
    "lime" => Color::Lime,
    "magenta" => Color::Magenta,
    "navy" => Color::Navy,
    "orange" => Color::Orange,
    "pink" => Color::Pink,
    "purple" => Color::Purple,
    "red" => Color::Red,
    "silver" => Color::Silver,
    "white" => Color::White,
    "yellow" => Color::Yellow,
    "automatic" => Color::Automatic,
};

// Tints for shades 1..=5 of the white, black and accent theme columns.
const WHITE_TINTS: [f64; 5] = [-0.05, -0.15, -0.25, -0.35, -0.5];
const BLACK_TINTS: [f64; 5] = [0.5, 0.35, 0.25, 0.15, 0.05];
const ACCENT_TINTS: [f64; 5] = [0.8, 0.6, 0.4, -0.25, -0.5];

/// Theme index of the hyperlink color.
pub(crate) const THEME_HYPERLINK: u8 = 10;

impl Color {
    /// Parse a color from `#RRGGBB`, `RRGGBB` or a color name.
    ///
    /// ```
    /// use longan::Color;
    /// assert_eq!(Color::parse("#FF0000").unwrap(), Color::RGB(0xFF0000));
    /// assert_eq!(Color::parse("navy").unwrap(), Color::Navy);
    /// assert!(Color::parse("#FF00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Color> {
        let trimmed = s.trim();
        if let Some(color) = NAMED_COLORS.get(trimmed.to_ascii_lowercase().as_str()) {
            return Ok(*color);
        }

        let hex = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(XlsxError::parse(format!(
                "Invalid color '{}': expected '#RRGGBB' or a color name",
                s
            )));
        }

        u32::from_str_radix(hex, 16)
            .map(Color::RGB)
            .map_err(|e| XlsxError::parse(format!("Invalid color '{}': {}", s, e)))
    }

    /// Check that the color value is in range.
    pub(crate) fn validate(self) -> Result<Color> {
        match self {
            Color::RGB(rgb) if rgb > 0xFF_FFFF => Err(XlsxError::range(format!(
                "RGB color 0x{:X} is outside 0x000000..=0xFFFFFF",
                rgb
            ))),
            Color::Theme(column, shade) if column > 9 || shade > 5 => {
                Err(XlsxError::range(format!(
                    "Theme color ({}, {}) is outside the 10x6 theme palette",
                    column, shade
                )))
            },
            color => Ok(color),
        }
    }

    /// True when nothing needs to be written for this color.
    #[inline]
    pub fn is_default(&self) -> bool {
        matches!(self, Color::Default)
    }

    /// Resolve named colors to their RGB value.
    pub fn rgb_value(&self) -> Option<u32> {
        let rgb = match self {
            Color::RGB(rgb) => *rgb,
            Color::Black => 0x000000,
            Color::Blue => 0x0000FF,
            Color::Brown => 0x800000,
            Color::Cyan => 0x00FFFF,
            Color::Gray => 0x808080,
            Color::Green => 0x008000,
            Color::Lime => 0x00FF00,
            Color::Magenta => 0xFF00FF,
            Color::Navy => 0x000080,
            Color::Orange => 0xFF6600,
            Color::Pink => 0xFF00FF,
            Color::Purple => 0x800080,
            Color::Red => 0xFF0000,
            Color::Silver => 0xC0C0C0,
            Color::White => 0xFFFFFF,
            Color::Yellow => 0xFFFF00,
            Color::Theme(..) | Color::Default | Color::Automatic => return None,
        };
        Some(rgb)
    }

    /// Six-digit hex string, e.g. `FF0000`.
    pub fn hex(&self) -> Option<String> {
        self.rgb_value().map(|rgb| format!("{:06X}", rgb))
    }

    /// Attributes for a SpreadsheetML `<color>`-like element, with a leading space.
    ///
    /// Returns an empty string for [`Color::Default`].
    pub(crate) fn sml_attributes(&self) -> String {
        let mut out = String::new();
        match self {
            Color::Default => {},
            Color::Automatic => out.push_str(r#" auto="1""#),
            Color::Theme(column, shade) => {
                let _ = write!(out, r#" theme="{}""#, column);
                if let Some(tint) = theme_tint(*column, *shade) {
                    out.push_str(r#" tint=""#);
                    crate::common::num::push_f64(&mut out, tint);
                    out.push('"');
                }
            },
            other => {
                if let Some(rgb) = other.rgb_value() {
                    let _ = write!(out, r#" rgb="FF{:06X}""#, rgb);
                }
            },
        }
        out
    }

    /// DrawingML color element (`a:srgbClr` / `a:schemeClr`).
    pub(crate) fn drawingml(&self) -> String {
        match self {
            Color::Theme(column, shade) => {
                let scheme = match column {
                    0 => "bg1",
                    1 => "tx1",
                    2 => "bg2",
                    3 => "tx2",
                    4 => "accent1",
                    5 => "accent2",
                    6 => "accent3",
                    7 => "accent4",
                    8 => "accent5",
                    9 => "accent6",
                    _ => "hlink",
                };
                match theme_tint(*column, *shade) {
                    Some(tint) if tint > 0.0 => format!(
                        r#"<a:schemeClr val="{}"><a:lumMod val="{}"/><a:lumOff val="{}"/></a:schemeClr>"#,
                        scheme,
                        ((1.0 - tint) * 100_000.0).round() as i64,
                        (tint * 100_000.0).round() as i64
                    ),
                    Some(tint) => format!(
                        r#"<a:schemeClr val="{}"><a:lumMod val="{}"/></a:schemeClr>"#,
                        scheme,
                        ((1.0 + tint) * 100_000.0).round() as i64
                    ),
                    None => format!(r#"<a:schemeClr val="{}"/>"#, scheme),
                }
            },
            Color::Automatic | Color::Default => r#"<a:sysClr val="windowText" lastClr="000000"/>"#.to_string(),
            other => format!(
                r#"<a:srgbClr val="{}"/>"#,
                other.hex().unwrap_or_else(|| "000000".to_string())
            ),
        }
    }

    /// VML color string, e.g. `#ffffe1`.
    pub(crate) fn vml(&self) -> Option<String> {
        self.rgb_value().map(|rgb| format!("#{:06x}", rgb))
    }
}

fn theme_tint(column: u8, shade: u8) -> Option<f64> {
    if shade == 0 || shade > 5 {
        return None;
    }
    let table = match column {
        0 => &WHITE_TINTS,
        1 => &BLACK_TINTS,
        _ => &ACCENT_TINTS,
    };
    Some(table[shade as usize - 1])
}

impl From<u32> for Color {
    fn from(rgb: u32) -> Self {
        Color::RGB(rgb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(Color::parse("#00ff00").unwrap(), Color::RGB(0x00FF00));
        assert_eq!(Color::parse("123ABC").unwrap(), Color::RGB(0x123ABC));
        assert_eq!(Color::parse("Red").unwrap(), Color::Red);
        assert!(matches!(Color::parse("#GG0000"), Err(XlsxError::Parse(_))));
        assert!(matches!(Color::parse("rgb(1,2,3)"), Err(XlsxError::Parse(_))));
    }

    #[test]
    fn test_validate() {
        assert!(Color::RGB(0xFFFFFF).validate().is_ok());
        assert!(matches!(Color::RGB(0x1000000).validate(), Err(XlsxError::Range(_))));
        assert!(matches!(Color::Theme(10, 0).validate(), Err(XlsxError::Range(_))));
        assert!(matches!(Color::Theme(4, 6).validate(), Err(XlsxError::Range(_))));
    }

    #[test]
    fn test_sml_attributes() {
        assert_eq!(Color::Red.sml_attributes(), r#" rgb="FFFF0000""#);
        assert_eq!(Color::Automatic.sml_attributes(), r#" auto="1""#);
        assert_eq!(Color::Default.sml_attributes(), "");
        assert_eq!(Color::Theme(4, 0).sml_attributes(), r#" theme="4""#);
        assert_eq!(
            Color::Theme(4, 1).sml_attributes(),
            r#" theme="4" tint="0.8""#
        );
    }

    #[test]
    fn test_drawingml() {
        assert_eq!(Color::RGB(0x4472C4).drawingml(), r#"<a:srgbClr val="4472C4"/>"#);
        assert_eq!(
            Color::Theme(4, 4).drawingml(),
            r#"<a:schemeClr val="accent1"><a:lumMod val="75000"/></a:schemeClr>"#
        );
    }
}
