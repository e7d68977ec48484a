//! Styles.xml generator for XLSX files.
//!
//! This module handles the generation of the styles.xml file, which defines
//! all the formatting information (fonts, fills, borders, number formats, and
//! cell formats) used in an Excel workbook.

use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use crate::ooxml::xlsx::format::{
    Alignment, BorderSide, Borders, Fill, Font, Format, FormatAlign, FormatDiagonalBorder,
    FormatPattern, FormatScript, NumFormat, Protection,
};
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

/// Index of the first custom number format.
const FIRST_CUSTOM_NUM_FORMAT: u16 = 164;

/// One `cellXfs` record.
#[derive(Debug, Clone)]
struct XfRecord {
    font_id: usize,
    fill_id: usize,
    border_id: usize,
    num_fmt_id: u16,
    alignment: Alignment,
    protection: Protection,
    hyperlink: bool,
}

/// Builder for generating styles.xml content.
///
/// This struct collects all unique fonts, fills, borders, and cell formats,
/// assigns indices to them in first-seen order, and generates the complete
/// styles.xml content.
#[derive(Debug)]
pub(crate) struct StylesBuilder {
    /// Font of the default cell format, inherited by formats that keep the
    /// built-in face
    default_font: Font,
    /// Unique fonts (index -> font)
    fonts: Vec<Font>,
    font_map: HashMap<Font, usize>,
    /// Unique fills; 0 and 1 are reserved
    fills: Vec<Fill>,
    fill_map: HashMap<Fill, usize>,
    borders: Vec<Borders>,
    border_map: HashMap<Borders, usize>,
    /// Custom number format codes, starting at id 164
    number_formats: Vec<String>,
    number_format_map: HashMap<String, u16>,
    cell_formats: Vec<XfRecord>,
    cell_format_map: HashMap<Format, u32>,
    /// Font of the Hyperlink cell style, once a link has been written
    hyperlink_font: Option<usize>,
}

impl StylesBuilder {
    /// Create a builder whose style 0 is `default_format`.
    pub(crate) fn new(default_format: Option<&Format>) -> Self {
        let default_format = default_format.cloned().unwrap_or_default();

        let mut builder = Self {
            default_font: default_format.font.clone(),
            fonts: Vec::new(),
            font_map: HashMap::new(),
            fills: Vec::new(),
            fill_map: HashMap::new(),
            borders: Vec::new(),
            border_map: HashMap::new(),
            number_formats: Vec::new(),
            number_format_map: HashMap::new(),
            cell_formats: Vec::new(),
            cell_format_map: HashMap::new(),
            hyperlink_font: None,
        };

        builder.add_font(&default_format.font);

        // Fill 0: no fill, fill 1: gray125. Excel requires both.
        builder.add_fill(&Fill::default());
        builder.add_fill(&Fill {
            pattern: FormatPattern::Gray125,
            ..Fill::default()
        });

        builder.add_border(&Borders::default());

        builder.push_format(&default_format);
        builder.cell_format_map.insert(Format::default(), 0);
        builder.cell_format_map.insert(default_format, 0);

        builder
    }

    /// Add a cell format and return its style index.
    ///
    /// Attribute-equal formats share an index.
    pub(crate) fn add_cell_format(&mut self, format: &Format) -> u32 {
        if let Some(&index) = self.cell_format_map.get(format) {
            return index;
        }

        let resolved = self.resolve_default_face(format);
        if let Some(&index) = self.cell_format_map.get(&resolved) {
            self.cell_format_map.insert(format.clone(), index);
            return index;
        }

        let index = self.push_format(&resolved);
        self.cell_format_map.insert(resolved, index);
        self.cell_format_map.insert(format.clone(), index);
        index
    }

    /// Formats that keep the built-in font face take the workbook default one.
    fn resolve_default_face(&self, format: &Format) -> Format {
        let mut resolved = format.clone();
        if format.font.has_default_face() {
            resolved.font.name = self.default_font.name.clone();
            resolved.font.size = self.default_font.size;
            resolved.font.family = self.default_font.family;
            resolved.font.charset = self.default_font.charset;
            resolved.font.scheme = self.default_font.scheme.clone();
        }
        resolved
    }

    fn push_format(&mut self, format: &Format) -> u32 {
        let font_id = self.add_font(&format.font);
        let fill_id = self.add_fill(&format.fill);
        let border_id = self.add_border(&format.borders);
        let num_fmt_id = self.add_number_format(&format.num_format);

        if format.hyperlink && self.hyperlink_font.is_none() {
            self.hyperlink_font = Some(font_id);
        }

        let index = self.cell_formats.len() as u32;
        self.cell_formats.push(XfRecord {
            font_id,
            fill_id,
            border_id,
            num_fmt_id,
            alignment: format.alignment.clone(),
            protection: format.protection.clone(),
            hyperlink: format.hyperlink,
        });
        index
    }

    /// Add a font and return its index.
    fn add_font(&mut self, font: &Font) -> usize {
        if let Some(&index) = self.font_map.get(font) {
            return index;
        }

        let index = self.fonts.len();
        self.fonts.push(font.clone());
        self.font_map.insert(font.clone(), index);
        index
    }

    /// Add a fill and return its index.
    fn add_fill(&mut self, fill: &Fill) -> usize {
        if let Some(&index) = self.fill_map.get(fill) {
            return index;
        }

        let index = self.fills.len();
        self.fills.push(fill.clone());
        self.fill_map.insert(fill.clone(), index);
        index
    }

    /// Add a border and return its index.
    fn add_border(&mut self, border: &Borders) -> usize {
        if let Some(&index) = self.border_map.get(border) {
            return index;
        }

        let index = self.borders.len();
        self.borders.push(border.clone());
        self.border_map.insert(border.clone(), index);
        index
    }

    /// Add a number format and return its id.
    fn add_number_format(&mut self, format: &NumFormat) -> u16 {
        let code = match format {
            NumFormat::Builtin(id) => return *id as u16,
            NumFormat::Custom(code) => code,
        };
        if let Some(&id) = self.number_format_map.get(code) {
            return id;
        }

        let id = FIRST_CUSTOM_NUM_FORMAT + self.number_formats.len() as u16;
        self.number_formats.push(code.clone());
        self.number_format_map.insert(code.clone(), id);
        id
    }

    /// Number of `cellXfs` records.
    pub(crate) fn count(&self) -> usize {
        self.cell_formats.len()
    }

    /// Generate the complete styles.xml content.
    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(4096);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
        );

        if !self.number_formats.is_empty() {
            write!(xml, r#"<numFmts count="{}">"#, self.number_formats.len())?;
            for (i, code) in self.number_formats.iter().enumerate() {
                write!(
                    xml,
                    r#"<numFmt numFmtId="{}" formatCode="{}"/>"#,
                    FIRST_CUSTOM_NUM_FORMAT as usize + i,
                    escape_xml(code)
                )?;
            }
            xml.push_str("</numFmts>");
        }

        write!(xml, r#"<fonts count="{}">"#, self.fonts.len())?;
        for font in &self.fonts {
            write_font(&mut xml, font)?;
        }
        xml.push_str("</fonts>");

        write!(xml, r#"<fills count="{}">"#, self.fills.len())?;
        for fill in &self.fills {
            write_fill(&mut xml, fill)?;
        }
        xml.push_str("</fills>");

        write!(xml, r#"<borders count="{}">"#, self.borders.len())?;
        for border in &self.borders {
            write_border(&mut xml, border)?;
        }
        xml.push_str("</borders>");

        match self.hyperlink_font {
            Some(font_id) => write!(
                xml,
                r#"<cellStyleXfs count="2"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/><xf numFmtId="0" fontId="{}" fillId="0" borderId="0" applyNumberFormat="0" applyFill="0" applyBorder="0" applyAlignment="0" applyProtection="0"><alignment vertical="top"/><protection locked="0"/></xf></cellStyleXfs>"#,
                font_id
            )?,
            None => xml.push_str(
                r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#,
            ),
        }

        write!(xml, r#"<cellXfs count="{}">"#, self.cell_formats.len())?;
        for record in &self.cell_formats {
            write_xf(&mut xml, record)?;
        }
        xml.push_str("</cellXfs>");

        if self.hyperlink_font.is_some() {
            xml.push_str(r#"<cellStyles count="2"><cellStyle name="Hyperlink" xfId="1" builtinId="8"/><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
        } else {
            xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
        }

        xml.push_str(r#"<dxfs count="0"/>"#);
        xml.push_str(r#"<tableStyles count="0" defaultTableStyle="TableStyleMedium9" defaultPivotStyle="PivotStyleLight16"/>"#);

        xml.push_str("</styleSheet>");

        Ok(xml)
    }
}

/// Write a font element to XML.
fn write_font(xml: &mut String, font: &Font) -> Result<()> {
    xml.push_str("<font>");
    write_font_properties(xml, font, "name")?;
    xml.push_str("</font>");
    Ok(())
}

/// Write the `<rPr>` of a rich text run.
pub(crate) fn write_run_properties(xml: &mut String, font: &Font) -> Result<()> {
    xml.push_str("<rPr>");
    write_font_properties(xml, font, "rFont")?;
    xml.push_str("</rPr>");
    Ok(())
}

/// Font child elements; runs name the face with `rFont` instead of `name`.
fn write_font_properties(xml: &mut String, font: &Font, name_tag: &str) -> Result<()> {

    if font.bold {
        xml.push_str("<b/>");
    }
    if font.italic {
        xml.push_str("<i/>");
    }
    if font.strikethrough {
        xml.push_str("<strike/>");
    }
    match font.underline.as_str() {
        Some("single") => xml.push_str("<u/>"),
        Some(style) => write!(xml, r#"<u val="{}"/>"#, style)?,
        None => {},
    }
    match font.script {
        FormatScript::Superscript => xml.push_str(r#"<vertAlign val="superscript"/>"#),
        FormatScript::Subscript => xml.push_str(r#"<vertAlign val="subscript"/>"#),
        FormatScript::None => {},
    }

    xml.push_str(r#"<sz val=""#);
    crate::common::num::push_f64(xml, font.size);
    xml.push_str(r#""/>"#);

    if font.color.is_default() {
        xml.push_str(r#"<color theme="1"/>"#);
    } else {
        write!(xml, "<color{}/>", font.color.sml_attributes())?;
    }

    write!(xml, r#"<{} val="{}"/>"#, name_tag, escape_xml(&font.name))?;
    if font.family != 0 {
        write!(xml, r#"<family val="{}"/>"#, font.family)?;
    }
    if font.charset != 0 {
        write!(xml, r#"<charset val="{}"/>"#, font.charset)?;
    }
    if !font.scheme.is_empty() {
        write!(xml, r#"<scheme val="{}"/>"#, escape_xml(&font.scheme))?;
    }

    Ok(())
}

/// Write a fill element to XML.
fn write_fill(xml: &mut String, fill: &Fill) -> Result<()> {
    // A background color alone means a solid cell color.
    let (pattern, foreground, background) = match fill.pattern {
        FormatPattern::None | FormatPattern::Solid
            if fill.foreground.is_default() && !fill.background.is_default() =>
        {
            (FormatPattern::Solid, fill.background, None)
        },
        FormatPattern::None if !fill.foreground.is_default() => {
            (FormatPattern::Solid, fill.foreground, None)
        },
        pattern => (pattern, fill.foreground, Some(fill.background)),
    };

    xml.push_str("<fill>");
    write!(xml, r#"<patternFill patternType="{}""#, pattern.as_str())?;

    let has_colors = !foreground.is_default() || background.is_some_and(|c| !c.is_default());
    if !has_colors && pattern != FormatPattern::Solid {
        xml.push_str("/></fill>");
        return Ok(());
    }

    xml.push('>');
    if !foreground.is_default() {
        write!(xml, "<fgColor{}/>", foreground.sml_attributes())?;
    }
    match background {
        Some(color) if !color.is_default() => {
            write!(xml, "<bgColor{}/>", color.sml_attributes())?
        },
        _ => xml.push_str(r#"<bgColor indexed="64"/>"#),
    }
    xml.push_str("</patternFill></fill>");
    Ok(())
}

/// Write a border element to XML.
fn write_border(xml: &mut String, border: &Borders) -> Result<()> {
    xml.push_str("<border");
    match border.diagonal_type {
        FormatDiagonalBorder::BorderUp => xml.push_str(r#" diagonalUp="1""#),
        FormatDiagonalBorder::BorderDown => xml.push_str(r#" diagonalDown="1""#),
        FormatDiagonalBorder::BorderUpDown => {
            xml.push_str(r#" diagonalUp="1" diagonalDown="1""#)
        },
        FormatDiagonalBorder::None => {},
    }
    xml.push('>');

    write_border_side(xml, "left", &border.left)?;
    write_border_side(xml, "right", &border.right)?;
    write_border_side(xml, "top", &border.top)?;
    write_border_side(xml, "bottom", &border.bottom)?;
    write_border_side(xml, "diagonal", &border.diagonal)?;

    xml.push_str("</border>");
    Ok(())
}

/// Write a single border side to XML.
fn write_border_side(xml: &mut String, side: &str, border_side: &BorderSide) -> Result<()> {
    if border_side.style == crate::ooxml::xlsx::format::FormatBorder::None {
        write!(xml, "<{}/>", side)?;
        return Ok(());
    }

    write!(xml, r#"<{} style="{}">"#, side, border_side.style.as_str())?;
    if border_side.color.is_default() {
        xml.push_str(r#"<color indexed="64"/>"#);
    } else {
        write!(xml, "<color{}/>", border_side.color.sml_attributes())?;
    }
    write!(xml, "</{}>", side)?;
    Ok(())
}

fn write_xf(xml: &mut String, record: &XfRecord) -> Result<()> {
    write!(
        xml,
        r#"<xf numFmtId="{}" fontId="{}" fillId="{}" borderId="{}" xfId="{}""#,
        record.num_fmt_id,
        record.font_id,
        record.fill_id,
        record.border_id,
        if record.hyperlink { 1 } else { 0 }
    )?;

    if record.num_fmt_id != 0 {
        xml.push_str(r#" applyNumberFormat="1""#);
    }
    if record.font_id != 0 {
        xml.push_str(r#" applyFont="1""#);
    }
    if record.fill_id != 0 {
        xml.push_str(r#" applyFill="1""#);
    }
    if record.border_id != 0 {
        xml.push_str(r#" applyBorder="1""#);
    }

    let has_alignment = !record.alignment.is_default();
    let has_protection = record.protection != Protection::default();
    if has_alignment {
        xml.push_str(r#" applyAlignment="1""#);
    }
    if has_protection {
        xml.push_str(r#" applyProtection="1""#);
    }

    if !has_alignment && !has_protection {
        xml.push_str("/>");
        return Ok(());
    }

    xml.push('>');
    if has_alignment {
        write_alignment(xml, &record.alignment)?;
    }
    if has_protection {
        xml.push_str("<protection");
        if !record.protection.locked {
            xml.push_str(r#" locked="0""#);
        }
        if record.protection.hidden {
            xml.push_str(r#" hidden="1""#);
        }
        xml.push_str("/>");
    }
    xml.push_str("</xf>");
    Ok(())
}

fn write_alignment(xml: &mut String, alignment: &Alignment) -> Result<()> {
    xml.push_str("<alignment");
    if alignment.horizontal != FormatAlign::General {
        write!(xml, r#" horizontal="{}""#, alignment.horizontal.as_str())?;
    }
    if alignment.vertical != FormatAlign::General {
        write!(xml, r#" vertical="{}""#, alignment.vertical.as_str())?;
    }
    if alignment.rotation != 0 {
        let rotation = match alignment.rotation {
            270 => 255,
            r if r < 0 => 90 - r,
            r => r,
        };
        write!(xml, r#" textRotation="{}""#, rotation)?;
    }
    if alignment.text_wrap {
        xml.push_str(r#" wrapText="1""#);
    }
    if alignment.indent != 0 {
        write!(xml, r#" indent="{}""#, alignment.indent)?;
    }
    if alignment.shrink {
        xml.push_str(r#" shrinkToFit="1""#);
    }
    xml.push_str("/>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xlsx::color::Color;
    use crate::ooxml::xlsx::format::FormatBorder;
    use proptest::prelude::*;

    #[test]
    fn test_create_default_styles() {
        let builder = StylesBuilder::new(None);
        assert_eq!(builder.fonts.len(), 1);
        assert_eq!(builder.fills.len(), 2);
        assert_eq!(builder.borders.len(), 1);
        assert_eq!(builder.cell_formats.len(), 1);
    }

    #[test]
    fn test_add_cell_format() {
        let mut builder = StylesBuilder::new(None);
        assert_eq!(builder.add_cell_format(&Format::new()), 0);

        let mut bold = Format::new();
        bold.set_bold();
        let index = builder.add_cell_format(&bold);
        assert_eq!(index, 1);

        let mut same = Format::new();
        same.set_bold();
        assert_eq!(builder.add_cell_format(&same), index);
        assert_eq!(builder.fonts.len(), 2);
    }

    #[test]
    fn test_custom_number_formats_start_at_164() {
        let mut builder = StylesBuilder::new(None);
        let mut money = Format::new();
        money.set_num_format("$#,##0.00");
        let mut percent = Format::new();
        percent.set_num_format("0%");
        builder.add_cell_format(&money);
        builder.add_cell_format(&percent);

        let xml = builder.to_xml().unwrap();
        assert!(xml.contains(r#"<numFmts count="1"><numFmt numFmtId="164" formatCode="$#,##0.00"/></numFmts>"#));
        assert!(xml.contains(r#"<xf numFmtId="164" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>"#));
        assert!(xml.contains(r#"<xf numFmtId="9" fontId="0""#));
    }

    #[test]
    fn test_background_only_is_solid() {
        let mut builder = StylesBuilder::new(None);
        let mut format = Format::new();
        format.set_background_color(Color::RGB(0xFFFF00)).unwrap();
        builder.add_cell_format(&format);

        let xml = builder.to_xml().unwrap();
        assert!(xml.contains(r#"<fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill>"#));
        assert!(xml.contains(r#"<fill><patternFill patternType="solid"><fgColor rgb="FFFFFF00"/><bgColor indexed="64"/></patternFill></fill>"#));
    }

    #[test]
    fn test_generate_xml_order() {
        let mut builder = StylesBuilder::new(None);
        let mut format = Format::new();
        format
            .set_bold()
            .set_border(FormatBorder::Thin)
            .set_text_wrap()
            .set_unlocked();
        builder.add_cell_format(&format);

        let xml = builder.to_xml().unwrap();
        let order = ["<fonts", "<fills", "<borders", "<cellStyleXfs", "<cellXfs", "<cellStyles", "<dxfs", "<tableStyles"];
        let positions: Vec<usize> = order.iter().map(|tag| xml.find(tag).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        assert!(xml.contains(r#"<font><b/><sz val="11"/><color theme="1"/><name val="Calibri"/><family val="2"/><scheme val="minor"/></font>"#));
        assert!(xml.contains(r#"<left style="thin"><color indexed="64"/></left>"#));
        assert!(xml.contains(r#"<alignment wrapText="1"/><protection locked="0"/></xf>"#));
        assert!(xml.contains(r#"defaultTableStyle="TableStyleMedium9""#));
    }

    #[test]
    fn test_hyperlink_style() {
        let mut builder = StylesBuilder::new(None);
        let index = builder.add_cell_format(&Format::hyperlink());
        assert_eq!(index, 1);

        let xml = builder.to_xml().unwrap();
        assert!(xml.contains(r#"<font><u/><sz val="11"/><color theme="10"/>"#));
        assert!(xml.contains(r#"<cellStyleXfs count="2">"#));
        assert!(xml.contains(r#"xfId="1""#));
        assert!(xml.contains(r#"<cellStyle name="Hyperlink" xfId="1" builtinId="8"/>"#));
    }

    #[test]
    fn test_default_face_inherits_workbook_font() {
        let mut default_format = Format::new();
        default_format.set_font_name("Arial").unwrap().set_font_size(10.0).unwrap();
        let mut builder = StylesBuilder::new(Some(&default_format));

        let mut bold = Format::new();
        bold.set_bold();
        builder.add_cell_format(&bold);

        assert_eq!(builder.fonts[0].name, "Arial");
        assert_eq!(builder.fonts[1].name, "Arial");
        assert_eq!(builder.fonts[1].size, 10.0);
        assert!(builder.fonts[1].bold);

        // The default format itself and an empty format both map to 0.
        assert_eq!(builder.add_cell_format(&default_format), 0);
        assert_eq!(builder.add_cell_format(&Format::new()), 0);
    }

    #[test]
    fn test_rotation_encoding() {
        let mut builder = StylesBuilder::new(None);
        let mut down = Format::new();
        down.set_rotation(-45).unwrap();
        let mut stacked = Format::new();
        stacked.set_rotation(270).unwrap();
        builder.add_cell_format(&down);
        builder.add_cell_format(&stacked);

        let xml = builder.to_xml().unwrap();
        assert!(xml.contains(r#"textRotation="135""#));
        assert!(xml.contains(r#"textRotation="255""#));
    }

    proptest! {
        #[test]
        fn prop_interning_is_structural(bold: bool, italic: bool, size in 1u8..100, wrap: bool) {
            let build = || {
                let mut format = Format::new();
                if bold { format.set_bold(); }
                if italic { format.set_italic(); }
                if wrap { format.set_text_wrap(); }
                format.set_font_size(size as f64).unwrap();
                format
            };
            let mut builder = StylesBuilder::new(None);
            let first = builder.add_cell_format(&build());
            let count = builder.count();
            let second = builder.add_cell_format(&build());
            prop_assert_eq!(first, second);
            prop_assert_eq!(count, builder.count());
        }
    }
}
