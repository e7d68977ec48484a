//! Cell formats.
//!
//! A [`Format`] is a plain attribute bag. The worksheet copies it when a cell is
//! written and the workbook's style table interns it on save, so two formats
//! with equal attributes always share one `cellXfs` record no matter how they
//! were built.

use crate::ooxml::error::{Result, XlsxError};
use crate::ooxml::xlsx::color::{Color, THEME_HYPERLINK};
use phf::phf_map;
use std::hash::{Hash, Hasher};

pub(crate) const DEFAULT_FONT_NAME: &str = "Calibri";
pub(crate) const DEFAULT_FONT_SIZE: f64 = 11.0;
pub(crate) const DEFAULT_FONT_SCHEME: &str = "minor";

/// Built-in number formats that Excel knows by id.
static BUILTIN_NUM_FORMATS: phf::Map<&'static str, u8> = phf_map! {
    "General" => 0,
    "0" => 1,
    "0.00" => 2,
    "#,##0" => 3,
    "#,##0.00" => 4,
    "0%" => 9,
    "0.00%" => 10,
    "0.00E+00" => 11,
    "# ?/?" => 12,
    "# ??/??" => 13,
    "m/d/yy" => 14,
    "d-mmm-yy" => 15,
    "d-mmm" => 16,
    "mmm-yy" => 17,
    "h:mm AM/PM" => 18,
    "h:mm:ss AM/PM" => 19,
    "h:mm" => 20,
    "h:mm:ss" => 21,
    "m/d/yy h:mm" => 22,
    "#,##0 ;(#,##0)" => 37,
    "#,##0 ;[Red](#,##0)" => 38,
    "#,##0.00;(#,##0.00)" => 39,
    "#,##0.00;[Red](#,##0.00)" => 40,
    "mm:ss" => 45,
    "[h]:mm:ss" => 46,
    "mm:ss.0" => 47,
    "##0.0E+0" => 48,
    "@" => 49,
};

/// Underline styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatUnderline {
    #[default]
    None,
    Single,
    Double,
    SingleAccounting,
    DoubleAccounting,
}

impl FormatUnderline {
    pub(crate) fn as_str(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Single => Some("single"),
            Self::Double => Some("double"),
            Self::SingleAccounting => Some("singleAccounting"),
            Self::DoubleAccounting => Some("doubleAccounting"),
        }
    }
}

/// Superscript and subscript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatScript {
    #[default]
    None,
    Superscript,
    Subscript,
}

/// Horizontal and vertical alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatAlign {
    #[default]
    General,
    Left,
    Center,
    Right,
    Fill,
    Justify,
    CenterAcross,
    Distributed,
    Top,
    Bottom,
    VerticalCenter,
    VerticalJustify,
    VerticalDistributed,
}

impl FormatAlign {
    fn is_vertical(&self) -> bool {
        matches!(
            self,
            Self::Top
                | Self::Bottom
                | Self::VerticalCenter
                | Self::VerticalJustify
                | Self::VerticalDistributed
        )
    }

    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
            Self::Fill => "fill",
            Self::Justify => "justify",
            Self::CenterAcross => "centerContinuous",
            Self::Distributed => "distributed",
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::VerticalCenter => "center",
            Self::VerticalJustify => "justify",
            Self::VerticalDistributed => "distributed",
        }
    }
}

/// Border line styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatBorder {
    #[default]
    None,
    Thin,
    Medium,
    Dashed,
    Dotted,
    Thick,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl FormatBorder {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Thin => "thin",
            Self::Medium => "medium",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
            Self::Thick => "thick",
            Self::Double => "double",
            Self::Hair => "hair",
            Self::MediumDashed => "mediumDashed",
            Self::DashDot => "dashDot",
            Self::MediumDashDot => "mediumDashDot",
            Self::DashDotDot => "dashDotDot",
            Self::MediumDashDotDot => "mediumDashDotDot",
            Self::SlantDashDot => "slantDashDot",
        }
    }
}

/// Diagonal border directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatDiagonalBorder {
    #[default]
    None,
    BorderUp,
    BorderDown,
    BorderUpDown,
}

/// Cell fill patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FormatPattern {
    #[default]
    None,
    Solid,
    MediumGray,
    DarkGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
    Gray125,
    Gray0625,
}

impl FormatPattern {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Solid => "solid",
            Self::MediumGray => "mediumGray",
            Self::DarkGray => "darkGray",
            Self::LightGray => "lightGray",
            Self::DarkHorizontal => "darkHorizontal",
            Self::DarkVertical => "darkVertical",
            Self::DarkDown => "darkDown",
            Self::DarkUp => "darkUp",
            Self::DarkGrid => "darkGrid",
            Self::DarkTrellis => "darkTrellis",
            Self::LightHorizontal => "lightHorizontal",
            Self::LightVertical => "lightVertical",
            Self::LightDown => "lightDown",
            Self::LightUp => "lightUp",
            Self::LightGrid => "lightGrid",
            Self::LightTrellis => "lightTrellis",
            Self::Gray125 => "gray125",
            Self::Gray0625 => "gray0625",
        }
    }
}

/// Font attributes.
#[derive(Debug, Clone)]
pub(crate) struct Font {
    pub name: String,
    pub size: f64,
    pub color: Color,
    pub bold: bool,
    pub italic: bool,
    pub underline: FormatUnderline,
    pub strikethrough: bool,
    pub script: FormatScript,
    pub family: u8,
    pub charset: u8,
    pub scheme: String,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            name: DEFAULT_FONT_NAME.to_string(),
            size: DEFAULT_FONT_SIZE,
            color: Color::Default,
            bold: false,
            italic: false,
            underline: FormatUnderline::None,
            strikethrough: false,
            script: FormatScript::None,
            family: 2,
            charset: 0,
            scheme: DEFAULT_FONT_SCHEME.to_string(),
        }
    }
}

impl Font {
    /// True when name, size and scheme are the built-in defaults.
    pub(crate) fn has_default_face(&self) -> bool {
        self.name == DEFAULT_FONT_NAME
            && self.size == DEFAULT_FONT_SIZE
            && self.scheme == DEFAULT_FONT_SCHEME
            && self.family == 2
            && self.charset == 0
    }
}

// Font size is validated finite and positive, so bitwise equality is exact.
impl PartialEq for Font {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.size.to_bits() == other.size.to_bits()
            && self.color == other.color
            && self.bold == other.bold
            && self.italic == other.italic
            && self.underline == other.underline
            && self.strikethrough == other.strikethrough
            && self.script == other.script
            && self.family == other.family
            && self.charset == other.charset
            && self.scheme == other.scheme
    }
}

impl Eq for Font {}

impl Hash for Font {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.size.to_bits().hash(state);
        self.color.hash(state);
        self.bold.hash(state);
        self.italic.hash(state);
        self.underline.hash(state);
        self.strikethrough.hash(state);
        self.script.hash(state);
        self.family.hash(state);
        self.charset.hash(state);
        self.scheme.hash(state);
    }
}

/// One side of a border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub(crate) struct BorderSide {
    pub style: FormatBorder,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub(crate) struct Borders {
    pub left: BorderSide,
    pub right: BorderSide,
    pub top: BorderSide,
    pub bottom: BorderSide,
    pub diagonal: BorderSide,
    pub diagonal_type: FormatDiagonalBorder,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub(crate) struct Fill {
    pub pattern: FormatPattern,
    pub foreground: Color,
    pub background: Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub(crate) struct Alignment {
    pub horizontal: FormatAlign,
    pub vertical: FormatAlign,
    pub text_wrap: bool,
    pub shrink: bool,
    pub rotation: i16,
    pub indent: u8,
}

impl Alignment {
    pub(crate) fn is_default(&self) -> bool {
        *self == Alignment::default()
    }
}

/// Number format: a built-in id or a custom format code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum NumFormat {
    Builtin(u8),
    Custom(String),
}

impl Default for NumFormat {
    fn default() -> Self {
        NumFormat::Builtin(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct Protection {
    pub locked: bool,
    pub hidden: bool,
}

impl Default for Protection {
    fn default() -> Self {
        Self {
            locked: true,
            hidden: false,
        }
    }
}

/// A cell format.
///
/// Setters mutate in place and return `&mut Self` so calls can be chained.
/// Setters that take a bounded value validate it first and leave the format
/// untouched on error.
///
/// ```
/// use longan::{Color, Format, FormatAlign, FormatBorder};
///
/// let mut header = Format::new();
/// header
///     .set_bold()
///     .set_align(FormatAlign::Center)
///     .set_border(FormatBorder::Thin)
///     .set_background_color(Color::RGB(0xDDEBF7))?;
/// # Ok::<(), longan::XlsxError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Format {
    pub(crate) font: Font,
    pub(crate) alignment: Alignment,
    pub(crate) borders: Borders,
    pub(crate) fill: Fill,
    pub(crate) num_format: NumFormat,
    pub(crate) protection: Protection,
    pub(crate) hyperlink: bool,
}

impl Format {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no attribute differs from the default.
    pub fn is_default(&self) -> bool {
        *self == Format::default()
    }

    pub fn set_bold(&mut self) -> &mut Self {
        self.font.bold = true;
        self
    }

    pub fn set_italic(&mut self) -> &mut Self {
        self.font.italic = true;
        self
    }

    pub fn set_underline(&mut self, underline: FormatUnderline) -> &mut Self {
        self.font.underline = underline;
        self
    }

    pub fn set_font_strikethrough(&mut self) -> &mut Self {
        self.font.strikethrough = true;
        self
    }

    pub fn set_font_script(&mut self, script: FormatScript) -> &mut Self {
        self.font.script = script;
        self
    }

    /// Set the font name. Non-theme fonts drop the `minor` scheme.
    pub fn set_font_name(&mut self, name: &str) -> Result<&mut Self> {
        let length = name.chars().count();
        if length == 0 || length > 31 {
            return Err(XlsxError::range(format!(
                "Font name '{}' must be 1 to 31 characters long",
                name
            )));
        }
        self.font.name = name.to_string();
        if name != DEFAULT_FONT_NAME {
            self.font.scheme.clear();
        }
        Ok(self)
    }

    /// Set the font size in points (1..=409).
    pub fn set_font_size(&mut self, size: f64) -> Result<&mut Self> {
        if !size.is_finite() || !(1.0..=409.0).contains(&size) {
            return Err(XlsxError::range(format!(
                "Font size {} is outside 1..=409",
                size
            )));
        }
        self.font.size = size;
        Ok(self)
    }

    pub fn set_font_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.font.color = color.into().validate()?;
        Ok(self)
    }

    pub fn set_font_family(&mut self, family: u8) -> &mut Self {
        self.font.family = family;
        self
    }

    pub fn set_font_charset(&mut self, charset: u8) -> &mut Self {
        self.font.charset = charset;
        self
    }

    /// Set the font scheme (`minor`, `major` or empty for none).
    pub fn set_font_scheme(&mut self, scheme: &str) -> &mut Self {
        self.font.scheme = scheme.to_string();
        self
    }

    /// Set the number format code, e.g. `"0.00%"` or `"yyyy-mm-dd"`.
    ///
    /// Codes that Excel has built in are stored by id.
    pub fn set_num_format(&mut self, code: &str) -> &mut Self {
        self.num_format = match BUILTIN_NUM_FORMATS.get(code) {
            Some(&id) => NumFormat::Builtin(id),
            None if code.is_empty() => NumFormat::Builtin(0),
            None => NumFormat::Custom(code.to_string()),
        };
        self
    }

    /// Set a built-in number format by id (0..=49).
    pub fn set_num_format_index(&mut self, index: u8) -> Result<&mut Self> {
        if index > 49 {
            return Err(XlsxError::range(format!(
                "Built-in number format index {} is outside 0..=49",
                index
            )));
        }
        self.num_format = NumFormat::Builtin(index);
        Ok(self)
    }

    /// Set horizontal or vertical alignment; the two are independent.
    pub fn set_align(&mut self, align: FormatAlign) -> &mut Self {
        if align.is_vertical() {
            self.alignment.vertical = align;
        } else {
            self.alignment.horizontal = align;
        }
        self
    }

    pub fn set_text_wrap(&mut self) -> &mut Self {
        self.alignment.text_wrap = true;
        self
    }

    pub fn set_shrink(&mut self) -> &mut Self {
        self.alignment.shrink = true;
        self
    }

    /// Text rotation in degrees: -90..=90, or 270 for stacked text.
    pub fn set_rotation(&mut self, rotation: i16) -> Result<&mut Self> {
        if !((-90..=90).contains(&rotation) || rotation == 270) {
            return Err(XlsxError::range(format!(
                "Rotation {} is outside -90..=90 (or 270 for stacked text)",
                rotation
            )));
        }
        self.alignment.rotation = rotation;
        Ok(self)
    }

    pub fn set_indent(&mut self, indent: u8) -> Result<&mut Self> {
        if indent > 250 {
            return Err(XlsxError::range(format!(
                "Indent {} is outside 0..=250",
                indent
            )));
        }
        self.alignment.indent = indent;
        Ok(self)
    }

    /// Set all four outer borders.
    pub fn set_border(&mut self, border: FormatBorder) -> &mut Self {
        self.borders.left.style = border;
        self.borders.right.style = border;
        self.borders.top.style = border;
        self.borders.bottom.style = border;
        self
    }

    /// Set the color of all four outer borders.
    pub fn set_border_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        let color = color.into().validate()?;
        self.borders.left.color = color;
        self.borders.right.color = color;
        self.borders.top.color = color;
        self.borders.bottom.color = color;
        Ok(self)
    }

    pub fn set_border_left(&mut self, border: FormatBorder) -> &mut Self {
        self.borders.left.style = border;
        self
    }

    pub fn set_border_left_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.borders.left.color = color.into().validate()?;
        Ok(self)
    }

    pub fn set_border_right(&mut self, border: FormatBorder) -> &mut Self {
        self.borders.right.style = border;
        self
    }

    pub fn set_border_right_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.borders.right.color = color.into().validate()?;
        Ok(self)
    }

    pub fn set_border_top(&mut self, border: FormatBorder) -> &mut Self {
        self.borders.top.style = border;
        self
    }

    pub fn set_border_top_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.borders.top.color = color.into().validate()?;
        Ok(self)
    }

    pub fn set_border_bottom(&mut self, border: FormatBorder) -> &mut Self {
        self.borders.bottom.style = border;
        self
    }

    pub fn set_border_bottom_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.borders.bottom.color = color.into().validate()?;
        Ok(self)
    }

    pub fn set_border_diagonal(&mut self, border: FormatBorder) -> &mut Self {
        self.borders.diagonal.style = border;
        self
    }

    pub fn set_border_diagonal_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.borders.diagonal.color = color.into().validate()?;
        Ok(self)
    }

    pub fn set_border_diagonal_type(&mut self, diagonal: FormatDiagonalBorder) -> &mut Self {
        self.borders.diagonal_type = diagonal;
        self
    }

    pub fn set_pattern(&mut self, pattern: FormatPattern) -> &mut Self {
        self.fill.pattern = pattern;
        self
    }

    /// Cell background color. Without an explicit pattern this is a solid fill.
    pub fn set_background_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.fill.background = color.into().validate()?;
        Ok(self)
    }

    /// Pattern foreground color.
    pub fn set_foreground_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        self.fill.foreground = color.into().validate()?;
        Ok(self)
    }

    pub fn set_locked(&mut self) -> &mut Self {
        self.protection.locked = true;
        self
    }

    pub fn set_unlocked(&mut self) -> &mut Self {
        self.protection.locked = false;
        self
    }

    /// Hide formulas when the worksheet is protected.
    pub fn set_hidden(&mut self) -> &mut Self {
        self.protection.hidden = true;
        self
    }

    /// The built-in Hyperlink cell style.
    pub(crate) fn hyperlink() -> Self {
        let mut format = Format::new();
        format.font.underline = FormatUnderline::Single;
        format.font.color = Color::Theme(THEME_HYPERLINK, 0);
        format.hyperlink = true;
        format
    }

    /// Copy of this format with a number format applied.
    pub(crate) fn with_num_format(&self, code: &str) -> Self {
        let mut format = self.clone();
        format.set_num_format(code);
        format
    }

    pub(crate) fn has_num_format(&self) -> bool {
        self.num_format != NumFormat::Builtin(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chained_setters_accumulate() {
        let mut format = Format::new();
        format.set_bold().set_italic().set_align(FormatAlign::Center);
        format.set_align(FormatAlign::Top);

        assert!(format.font.bold);
        assert!(format.font.italic);
        assert_eq!(format.alignment.horizontal, FormatAlign::Center);
        assert_eq!(format.alignment.vertical, FormatAlign::Top);
    }

    #[test]
    fn test_equal_attributes_compare_equal() {
        let mut a = Format::new();
        a.set_bold().set_font_size(12.0).unwrap();

        let mut b = Format::new();
        b.set_font_size(12.0).unwrap().set_bold();

        assert_eq!(a, b);
        assert_ne!(a, Format::new());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut a = Format::new();
        a.set_bold();
        let mut b = a.clone();
        b.set_italic();
        assert!(!a.font.italic);
        assert!(b.font.italic);
    }

    #[test]
    fn test_builtin_num_formats_normalize() {
        let mut by_code = Format::new();
        by_code.set_num_format("0.00");
        let mut by_index = Format::new();
        by_index.set_num_format_index(2).unwrap();
        assert_eq!(by_code, by_index);

        let mut custom = Format::new();
        custom.set_num_format("yyyy-mm-dd");
        assert_eq!(custom.num_format, NumFormat::Custom("yyyy-mm-dd".into()));
        assert!(custom.has_num_format());
    }

    #[test]
    fn test_failed_setter_leaves_format_unchanged() {
        let mut format = Format::new();
        assert!(matches!(format.set_font_size(0.0), Err(XlsxError::Range(_))));
        assert!(matches!(format.set_font_size(f64::NAN), Err(XlsxError::Range(_))));
        assert!(matches!(format.set_rotation(91), Err(XlsxError::Range(_))));
        assert!(matches!(
            format.set_font_color(Color::RGB(0x1_000_000)),
            Err(XlsxError::Range(_))
        ));
        assert!(format.set_rotation(270).is_ok());
        format.set_rotation(0).unwrap();
        assert!(format.is_default());
    }

    #[test]
    fn test_font_name_drops_scheme() {
        let mut format = Format::new();
        format.set_font_name("Arial").unwrap();
        assert_eq!(format.font.scheme, "");
        assert!(format.set_font_name("").is_err());
        assert_eq!(format.font.name, "Arial");
    }
}
