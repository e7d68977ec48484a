//! Page layout and print settings of a worksheet.

use crate::ooxml::error::{Result, XlsxError};
use crate::ooxml::xlsx::image::Image;
use crate::ooxml::xlsx::reference::{ColNum, RowNum, check_cell};
use aho_corasick::AhoCorasick;
use bitflags::bitflags;
use once_cell::sync::Lazy;

/// Longest header or footer string Excel accepts.
pub const MAX_HEADER_FOOTER_LEN: usize = 255;

/// Long header/footer codes and the short codes Excel stores.
const FIELD_CODES: [(&str, &str); 9] = [
    ("&[Picture]", "&G"),
    ("&[Pic]", "&G"),
    ("&[Page]", "&P"),
    ("&[Pages]", "&N"),
    ("&[Date]", "&D"),
    ("&[Time]", "&T"),
    ("&[File]", "&F"),
    ("&[Path]", "&Z"),
    ("&[Tab]", "&A"),
];

static FIELD_REWRITER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(FIELD_CODES.iter().map(|(long, _)| *long))
        .expect("Failed to build header/footer code rewriter")
});

bitflags! {
    /// Boolean print options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct PrintFlags: u16 {
        /// Landscape orientation
        const LANDSCAPE = 0x0001;
        /// Print cell gridlines
        const GRIDLINES = 0x0002;
        /// Print row and column headings
        const HEADINGS = 0x0004;
        /// Center on page horizontally
        const CENTER_HORIZONTALLY = 0x0008;
        /// Center on page vertically
        const CENTER_VERTICALLY = 0x0010;
        /// Monochrome output
        const BLACK_AND_WHITE = 0x0020;
        /// Draft quality
        const DRAFT = 0x0040;
        /// Print pages across, then down
        const OVER_THEN_DOWN = 0x0080;
        /// Screen gridlines are hidden
        const HIDE_SCREEN_GRIDLINES = 0x0100;
    }
}

impl PrintFlags {
    /// Flags that need a `<printOptions>` element.
    pub(crate) const PRINT_OPTIONS: PrintFlags = PrintFlags::GRIDLINES
        .union(PrintFlags::HEADINGS)
        .union(PrintFlags::CENTER_HORIZONTALLY)
        .union(PrintFlags::CENTER_VERTICALLY);
}

/// Section of a header or footer that holds an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HeaderImagePosition {
    Left,
    Center,
    Right,
}

impl HeaderImagePosition {
    fn section(&self) -> Section {
        match self {
            HeaderImagePosition::Left => Section::Left,
            HeaderImagePosition::Center => Section::Center,
            HeaderImagePosition::Right => Section::Right,
        }
    }
}

/// Header or footer slot of an attached image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct ImageSlot {
    pub footer: bool,
    pub position: HeaderImagePosition,
}

impl ImageSlot {
    /// Shape id used in the VML part: `LH`, `CH`, `RH`, `LF`, `CF`, `RF`.
    pub(crate) fn vml_name(&self) -> &'static str {
        match (self.position, self.footer) {
            (HeaderImagePosition::Left, false) => "LH",
            (HeaderImagePosition::Center, false) => "CH",
            (HeaderImagePosition::Right, false) => "RH",
            (HeaderImagePosition::Left, true) => "LF",
            (HeaderImagePosition::Center, true) => "CF",
            (HeaderImagePosition::Right, true) => "RF",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Left,
    Center,
    Right,
}

/// Page margins in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub header: f64,
    pub footer: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 0.7,
            right: 0.7,
            top: 0.75,
            bottom: 0.75,
            header: 0.3,
            footer: 0.3,
        }
    }
}

/// Print settings stored per worksheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) struct PageSetup {
    pub flags: PrintFlags,
    /// Printer paper index, 0 for the printer default
    pub paper_size: u8,
    pub margins: Margins,
    pub header: String,
    pub footer: String,
    pub header_images: Vec<(ImageSlot, Image)>,
    /// Print scale as a percentage
    pub scale: Option<u16>,
    /// Pages wide and tall; 0 leaves the dimension automatic
    pub fit_to_pages: Option<(u16, u16)>,
    pub first_page_number: Option<u16>,
    pub repeat_rows: Option<(RowNum, RowNum)>,
    pub repeat_columns: Option<(ColNum, ColNum)>,
    pub print_area: Option<(RowNum, ColNum, RowNum, ColNum)>,
}

impl PageSetup {
    /// True if a `<pageSetup>` element carries anything.
    pub(crate) fn has_page_setup(&self) -> bool {
        self.flags.intersects(
            PrintFlags::LANDSCAPE
                | PrintFlags::BLACK_AND_WHITE
                | PrintFlags::DRAFT
                | PrintFlags::OVER_THEN_DOWN,
        ) || self.paper_size != 0
            || self.scale.is_some()
            || self.fit_to_pages.is_some()
            || self.first_page_number.is_some()
    }

    pub(crate) fn set_margins(&mut self, margins: Margins) -> Result<()> {
        for (name, value) in [
            ("left", margins.left),
            ("right", margins.right),
            ("top", margins.top),
            ("bottom", margins.bottom),
            ("header", margins.header),
            ("footer", margins.footer),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(XlsxError::range(format!(
                    "Page margin {} {} must be a non-negative number of inches",
                    name, value
                )));
            }
        }
        self.margins = margins;
        Ok(())
    }

    pub(crate) fn set_header(&mut self, header: &str) -> Result<()> {
        check_header_footer("Header", header)?;
        let images = self.header_images.iter().filter(|(slot, _)| !slot.footer);
        for (slot, _) in images {
            check_placeholder(header, slot.position)?;
        }
        self.header = header.to_string();
        Ok(())
    }

    pub(crate) fn set_footer(&mut self, footer: &str) -> Result<()> {
        check_header_footer("Footer", footer)?;
        let images = self.header_images.iter().filter(|(slot, _)| slot.footer);
        for (slot, _) in images {
            check_placeholder(footer, slot.position)?;
        }
        self.footer = footer.to_string();
        Ok(())
    }

    /// Attach an image; the matching section of the text must hold `&[Picture]`.
    pub(crate) fn set_image(&mut self, image: &Image, slot: ImageSlot) -> Result<()> {
        let text = if slot.footer { &self.footer } else { &self.header };
        check_placeholder(text, slot.position)?;

        self.header_images.retain(|(existing, _)| *existing != slot);
        self.header_images.push((slot, image.clone()));
        self.header_images.sort_by_key(|(slot, _)| *slot);
        Ok(())
    }

    pub(crate) fn set_scale(&mut self, scale: u16) -> Result<()> {
        if !(10..=400).contains(&scale) {
            return Err(XlsxError::range(format!(
                "Print scale {} is outside 10..=400",
                scale
            )));
        }
        self.scale = Some(scale);
        Ok(())
    }

    pub(crate) fn set_repeat_rows(&mut self, first_row: RowNum, last_row: RowNum) -> Result<()> {
        check_cell(first_row, 0)?;
        check_cell(last_row, 0)?;
        if first_row > last_row {
            return Err(XlsxError::range(format!(
                "Repeat rows {}..{} are reversed",
                first_row, last_row
            )));
        }
        self.repeat_rows = Some((first_row, last_row));
        Ok(())
    }

    pub(crate) fn set_repeat_columns(&mut self, first_col: ColNum, last_col: ColNum) -> Result<()> {
        check_cell(0, first_col)?;
        check_cell(0, last_col)?;
        if first_col > last_col {
            return Err(XlsxError::range(format!(
                "Repeat columns {}..{} are reversed",
                first_col, last_col
            )));
        }
        self.repeat_columns = Some((first_col, last_col));
        Ok(())
    }

    /// Header or footer text as stored in the worksheet, with long codes
    /// such as `&[Page]` folded to their short form.
    pub(crate) fn stored_text(text: &str) -> String {
        let short: Vec<&str> = FIELD_CODES.iter().map(|(_, code)| *code).collect();
        FIELD_REWRITER.replace_all(text, &short)
    }
}

fn check_header_footer(what: &str, text: &str) -> Result<()> {
    let len = PageSetup::stored_text(text).chars().count();
    if len > MAX_HEADER_FOOTER_LEN {
        return Err(XlsxError::range(format!(
            "{} string has {} characters, more than {}",
            what, len, MAX_HEADER_FOOTER_LEN
        )));
    }
    Ok(())
}

fn check_placeholder(text: &str, position: HeaderImagePosition) -> Result<()> {
    let section = section_text(text, position.section());
    if section.contains("&[Picture]") || section.contains("&[Pic]") || section.contains("&G") {
        return Ok(());
    }
    Err(XlsxError::config(format!(
        "No &[Picture] placeholder in the {:?} section of '{}'",
        position, text
    )))
}

/// Text of one `&L`/`&C`/`&R` section. Text before any code is centered.
fn section_text(text: &str, wanted: Section) -> String {
    let mut current = Section::Center;
    let mut out = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '&' {
            let next = chars.peek().copied();
            let switch = match next {
                Some('L') => Some(Section::Left),
                Some('C') => Some(Section::Center),
                Some('R') => Some(Section::Right),
                _ => None,
            };
            if let Some(section) = switch {
                chars.next();
                current = section;
                continue;
            }
        }
        if current == wanted {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xlsx::image::tests::png_bytes;

    #[test]
    fn test_sections() {
        assert_eq!(section_text("&LLeft&CMid&RRight", Section::Left), "Left");
        assert_eq!(section_text("&LLeft&CMid&RRight", Section::Right), "Right");
        assert_eq!(section_text("Page &P", Section::Center), "Page &P");
        assert_eq!(section_text("&L&[Picture]", Section::Center), "");
    }

    #[test]
    fn test_header_image_needs_placeholder() {
        let image = Image::new_from_buffer(&png_bytes(4, 4, None)).unwrap();
        let mut page = PageSetup::default();

        let slot = ImageSlot {
            footer: false,
            position: HeaderImagePosition::Left,
        };

        let err = page.set_image(&image, slot).unwrap_err();
        assert!(matches!(err, XlsxError::Configuration(_)));

        page.set_header("&L&[Picture]&RTitle").unwrap();
        page.set_image(&image, slot).unwrap();
        page.set_image(&image, slot).unwrap();
        assert_eq!(page.header_images.len(), 1);
        assert_eq!(slot.vml_name(), "LH");
        // The footer has no placeholder.
        let footer_slot = ImageSlot { footer: true, ..slot };
        assert!(page.set_image(&image, footer_slot).is_err());

        // Removing the placeholder while the image is attached fails.
        assert!(page.set_header("&RTitle").is_err());
        assert_eq!(page.header, "&L&[Picture]&RTitle");
        assert_eq!(PageSetup::stored_text(&page.header), "&L&G&RTitle");
    }

    #[test]
    fn test_long_codes_are_shortened() {
        assert_eq!(
            PageSetup::stored_text("&C&[Picture]&RPage &[Page] of &[Pages]"),
            "&C&G&RPage &P of &N"
        );
        assert_eq!(
            PageSetup::stored_text("&L&[Date] &[Time]&C&[File] &[Path]&R&[Tab]"),
            "&L&D &T&C&F &Z&R&A"
        );
        assert_eq!(PageSetup::stored_text("&[Unknown] &P"), "&[Unknown] &P");
    }

    #[test]
    fn test_length_is_measured_after_shortening() {
        let mut page = PageSetup::default();
        // 250 characters plus one long code that is stored as two.
        let text = format!("{}&[Pages]", "x".repeat(250));
        assert_eq!(text.chars().count(), 258);
        page.set_footer(&text).unwrap();
        assert!(page.set_footer(&format!("{}&[Pages]", "x".repeat(254))).is_err());
    }

    #[test]
    fn test_limits() {
        let mut page = PageSetup::default();
        assert!(page.set_header(&"x".repeat(256)).is_err());
        assert!(page.set_footer(&"x".repeat(255)).is_ok());
        assert!(page.set_scale(9).is_err());
        assert!(page.set_scale(401).is_err());
        page.set_scale(75).unwrap();
        assert_eq!(page.scale, Some(75));
        assert!(page.set_repeat_rows(3, 1).is_err());
        assert!(page.set_repeat_columns(0, 16_384).is_err());

        let mut margins = Margins::default();
        margins.left = -0.5;
        assert!(page.set_margins(margins).is_err());
        assert_eq!(page.margins, Margins::default());
    }

    #[test]
    fn test_page_setup_presence() {
        let mut page = PageSetup::default();
        assert!(!page.has_page_setup());
        page.flags |= PrintFlags::GRIDLINES;
        assert!(!page.has_page_setup());
        page.flags |= PrintFlags::LANDSCAPE;
        assert!(page.has_page_setup());
    }
}
