//! Cell notes (the legacy yellow comment boxes).

use crate::ooxml::error::{Result, XlsxError};
use crate::ooxml::xlsx::color::Color;
use crate::ooxml::xlsx::format::Format;
use crate::ooxml::xlsx::image::ObjectMovement;

pub(crate) const DEFAULT_NOTE_WIDTH: f64 = 128.0;
pub(crate) const DEFAULT_NOTE_HEIGHT: f64 = 74.0;
const DEFAULT_BACKGROUND: Color = Color::RGB(0xFFFFE1);

/// A note attached to a cell.
///
/// ```
/// use longan::Note;
///
/// let mut note = Note::new("Check this value");
/// note.set_author("Ana").set_visible(true);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub(crate) text: String,
    pub(crate) author: Option<String>,
    pub(crate) author_prefix: bool,
    pub(crate) width: f64,
    pub(crate) height: f64,
    pub(crate) visible: Option<bool>,
    pub(crate) background_color: Color,
    pub(crate) font_name: String,
    pub(crate) font_size: f64,
    pub(crate) font_family: u8,
    pub(crate) alt_text: String,
    pub(crate) object_movement: ObjectMovement,
}

impl Note {
    pub fn new(text: impl Into<String>) -> Note {
        Note {
            text: text.into(),
            author: None,
            author_prefix: false,
            width: DEFAULT_NOTE_WIDTH,
            height: DEFAULT_NOTE_HEIGHT,
            visible: None,
            background_color: DEFAULT_BACKGROUND,
            font_name: "Tahoma".to_string(),
            font_size: 8.0,
            font_family: 2,
            alt_text: String::new(),
            object_movement: ObjectMovement::MoveButDontSizeWithCells,
        }
    }

    /// Replace the text.
    pub fn reset_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = text.into();
        self
    }

    /// Author shown in the status bar. Defaults to the worksheet note author.
    pub fn set_author(&mut self, author: impl Into<String>) -> &mut Self {
        self.author = Some(author.into());
        self
    }

    /// Prefix the text with `Author:` in bold, like Excel does.
    pub fn add_author_prefix(&mut self, enable: bool) -> &mut Self {
        self.author_prefix = enable;
        self
    }

    /// Box width in pixels.
    pub fn set_width(&mut self, width: f64) -> Result<&mut Self> {
        self.width = check_size("width", width)?;
        Ok(self)
    }

    /// Box height in pixels.
    pub fn set_height(&mut self, height: f64) -> Result<&mut Self> {
        self.height = check_size("height", height)?;
        Ok(self)
    }

    /// Show the note permanently instead of on hover.
    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.visible = Some(visible);
        self
    }

    pub fn set_background_color(&mut self, color: impl Into<Color>) -> Result<&mut Self> {
        let color = color.into().validate()?;
        if color.rgb_value().is_none() {
            return Err(XlsxError::range(format!(
                "Note background must be an RGB or named color, got {:?}",
                color
            )));
        }
        self.background_color = color;
        Ok(self)
    }

    pub fn set_font_name(&mut self, name: &str) -> Result<&mut Self> {
        if name.is_empty() || name.chars().count() > 31 {
            return Err(XlsxError::range(format!(
                "Note font name '{}' must be 1 to 31 characters long",
                name
            )));
        }
        self.font_name = name.to_string();
        Ok(self)
    }

    pub fn set_font_size(&mut self, size: f64) -> Result<&mut Self> {
        if !size.is_finite() || !(1.0..=409.0).contains(&size) {
            return Err(XlsxError::range(format!(
                "Note font size {} is outside 1..=409",
                size
            )));
        }
        self.font_size = size;
        Ok(self)
    }

    pub fn set_font_family(&mut self, family: u8) -> &mut Self {
        self.font_family = family;
        self
    }

    /// Take the font name, size and background color from a format.
    pub fn set_format(&mut self, format: &Format) -> &mut Self {
        self.font_name = format.font.name.clone();
        self.font_size = format.font.size;
        self.font_family = format.font.family;
        if format.fill.background.rgb_value().is_some() {
            self.background_color = format.fill.background;
        }
        self
    }

    pub fn set_alt_text(&mut self, alt_text: &str) -> &mut Self {
        self.alt_text = alt_text.to_string();
        self
    }

    pub fn set_object_movement(&mut self, movement: ObjectMovement) -> &mut Self {
        self.object_movement = movement;
        self
    }

    /// The author, falling back to the sheet default.
    pub(crate) fn author_or<'a>(&'a self, default: &'a str) -> &'a str {
        self.author.as_deref().unwrap_or(default)
    }
}

fn check_size(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(XlsxError::range(format!(
            "Note {} {} must be a positive number of pixels",
            name, value
        )));
    }
    Ok(value)
}
