//! Worksheet XML (`xl/worksheets/sheetN.xml`) generation.

use crate::common::num::{push_f64, push_int};
use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::error::Result;
use crate::ooxml::opc::Relationships;
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::xlsx::cell::{CellData, Formula, RichString, Url, UrlKind};
use crate::ooxml::xlsx::page::{PageSetup, PrintFlags};
use crate::ooxml::xlsx::reference::{ColNum, RowNum, cell_ref, column_name, range_ref};
use crate::ooxml::xlsx::worksheet::{Cell, CellContent, ColumnOptions, RowOptions, Worksheet};
use crate::ooxml::xlsx::writer::strings::{SharedStrings, push_text_element};
use crate::ooxml::xlsx::writer::styles::write_run_properties;
use std::fmt::Write as FmtWrite;

/// Relationship ids of the parts a worksheet points at.
#[derive(Debug, Default)]
pub(crate) struct SheetRelIds {
    pub drawing: Option<String>,
    pub legacy_drawing: Option<String>,
    pub legacy_drawing_hf: Option<String>,
    pub tables: Vec<String>,
}

/// Renders one worksheet.
///
/// Cell formats are translated from the worksheet's local indices to
/// workbook `cellXfs` indices through `xf_indices`, and embedded images to
/// their value metadata index through `value_metadata`.
pub(crate) struct SheetWriter<'a> {
    sheet: &'a Worksheet,
    /// Local format index -> cellXfs index; entry 0 is the default
    xf_indices: &'a [u32],
    /// Embedded image index -> 1-based `vm` attribute
    value_metadata: &'a [u32],
    rel_ids: &'a SheetRelIds,
}

/// A hyperlink cell collected while writing `sheetData`.
struct HyperlinkRef<'a> {
    row: RowNum,
    col: ColNum,
    url: &'a Url,
}

impl<'a> SheetWriter<'a> {
    pub(crate) fn new(
        sheet: &'a Worksheet,
        xf_indices: &'a [u32],
        value_metadata: &'a [u32],
        rel_ids: &'a SheetRelIds,
    ) -> Self {
        Self {
            sheet,
            xf_indices,
            value_metadata,
            rel_ids,
        }
    }

    /// Generate the worksheet XML.
    ///
    /// Strings are added to `strings`; external hyperlinks are added to the
    /// worksheet relationships `rels`.
    pub(crate) fn to_xml(&self, strings: &mut SharedStrings, rels: &mut Relationships) -> Result<String> {
        let sheet = self.sheet;
        let mut xml = String::with_capacity(4096);
        xml.push_str(XML_DECLARATION);
        xml.push_str(r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);

        self.write_sheet_pr(&mut xml)?;

        match sheet.dimensions() {
            Some((r1, c1, r2, c2)) if (r1, c1) == (r2, c2) => {
                write!(xml, r#"<dimension ref="{}"/>"#, cell_ref(r1, c1))?
            },
            Some((r1, c1, r2, c2)) => {
                write!(xml, r#"<dimension ref="{}"/>"#, range_ref(r1, c1, r2, c2))?
            },
            None => xml.push_str(r#"<dimension ref="A1"/>"#),
        }

        self.write_sheet_views(&mut xml)?;

        xml.push_str(r#"<sheetFormatPr defaultRowHeight=""#);
        push_f64(&mut xml, sheet.default_row_height);
        if sheet.has_custom_default_row_height() {
            xml.push_str(r#"" customHeight="1"/>"#);
        } else {
            xml.push_str(r#""/>"#);
        }

        self.write_cols(&mut xml)?;

        let mut hyperlinks = Vec::new();
        self.write_sheet_data(&mut xml, strings, &mut hyperlinks)?;

        if let Some(protection) = &sheet.protection {
            xml.push_str("<sheetProtection");
            if let Some(hash) = protection.password_hash {
                write!(xml, r#" password="{:04X}""#, hash)?;
            }
            xml.push_str(r#" sheet="1" objects="1" scenarios="1"/>"#);
        }

        if !sheet.merged_ranges.is_empty() {
            write!(xml, r#"<mergeCells count="{}">"#, sheet.merged_ranges.len())?;
            for &(r1, c1, r2, c2) in &sheet.merged_ranges {
                write!(xml, r#"<mergeCell ref="{}"/>"#, range_ref(r1, c1, r2, c2))?;
            }
            xml.push_str("</mergeCells>");
        }

        // Match Excel's worksheet structure: phoneticPr comes after mergeCells.
        xml.push_str(r#"<phoneticPr fontId="0" type="noConversion"/>"#);

        if !hyperlinks.is_empty() {
            write_hyperlinks(&mut xml, &hyperlinks, rels)?;
        }

        self.write_print_settings(&mut xml)?;

        if let Some(r_id) = &self.rel_ids.drawing {
            write!(xml, r#"<drawing r:id="{}"/>"#, r_id)?;
        }
        if let Some(r_id) = &self.rel_ids.legacy_drawing {
            write!(xml, r#"<legacyDrawing r:id="{}"/>"#, r_id)?;
        }
        if let Some(r_id) = &self.rel_ids.legacy_drawing_hf {
            write!(xml, r#"<legacyDrawingHF r:id="{}"/>"#, r_id)?;
        }
        if !self.rel_ids.tables.is_empty() {
            write!(xml, r#"<tableParts count="{}">"#, self.rel_ids.tables.len())?;
            for r_id in &self.rel_ids.tables {
                write!(xml, r#"<tablePart r:id="{}"/>"#, r_id)?;
            }
            xml.push_str("</tableParts>");
        }

        xml.push_str("</worksheet>");
        Ok(xml)
    }

    fn xf(&self, local: u32) -> Option<u32> {
        match self.xf_indices.get(local as usize).copied() {
            Some(0) | None => None,
            index => index,
        }
    }

    fn write_sheet_pr(&self, xml: &mut String) -> Result<()> {
        let sheet = self.sheet;
        let fit_to_page = sheet.page.fit_to_pages.is_some();
        if sheet.tab_color.is_default() && !fit_to_page {
            return Ok(());
        }

        xml.push_str("<sheetPr>");
        if !sheet.tab_color.is_default() {
            write!(xml, "<tabColor{}/>", sheet.tab_color.sml_attributes())?;
        }
        if fit_to_page {
            xml.push_str(r#"<pageSetUpPr fitToPage="1"/>"#);
        }
        xml.push_str("</sheetPr>");
        Ok(())
    }

    fn write_sheet_views(&self, xml: &mut String) -> Result<()> {
        let sheet = self.sheet;
        xml.push_str("<sheetViews><sheetView");
        if sheet.page.flags.contains(PrintFlags::HIDE_SCREEN_GRIDLINES) {
            xml.push_str(r#" showGridLines="0""#);
        }
        if sheet.right_to_left {
            xml.push_str(r#" rightToLeft="1""#);
        }
        if sheet.selected || sheet.active {
            xml.push_str(r#" tabSelected="1""#);
        }
        if sheet.zoom != 100 {
            write!(
                xml,
                r#" zoomScale="{}" zoomScaleNormal="{}""#,
                sheet.zoom, sheet.zoom
            )?;
        }
        xml.push_str(r#" workbookViewId="0""#);

        match sheet.freeze_panes {
            Some((y_split, x_split)) if (y_split, x_split) != (0, 0) => {
                xml.push('>');

                let active_pane = match (x_split > 0, y_split > 0) {
                    (true, true) => "bottomRight",
                    (true, false) => "topRight",
                    _ => "bottomLeft",
                };
                let (top_row, top_col) = sheet.freeze_top_cell.unwrap_or((y_split, x_split));
                let top_left_cell = cell_ref(top_row, top_col);

                xml.push_str("<pane");
                if x_split > 0 {
                    write!(xml, r#" xSplit="{}""#, x_split)?;
                }
                if y_split > 0 {
                    write!(xml, r#" ySplit="{}""#, y_split)?;
                }
                write!(
                    xml,
                    r#" topLeftCell="{}" activePane="{}" state="frozen"/>"#,
                    top_left_cell, active_pane
                )?;

                // Excel keeps one selection per pane
                if x_split > 0 && y_split > 0 {
                    write!(
                        xml,
                        r#"<selection pane="topRight" activeCell="{}" sqref="{}"/>"#,
                        cell_ref(0, x_split),
                        cell_ref(0, x_split)
                    )?;
                    write!(
                        xml,
                        r#"<selection pane="bottomLeft" activeCell="{}" sqref="{}"/>"#,
                        cell_ref(y_split, 0),
                        cell_ref(y_split, 0)
                    )?;
                }
                write!(
                    xml,
                    r#"<selection pane="{}" activeCell="{}" sqref="{}"/>"#,
                    active_pane, top_left_cell, top_left_cell
                )?;

                xml.push_str("</sheetView>");
            },
            _ => xml.push_str("/>"),
        }

        xml.push_str("</sheetViews>");
        Ok(())
    }

    /// Write `<cols>`, merging adjacent columns with equal options.
    fn write_cols(&self, xml: &mut String) -> Result<()> {
        let sheet = self.sheet;
        if sheet.columns.is_empty() {
            return Ok(());
        }

        let mut spans: Vec<(ColNum, ColNum, ColumnOptions)> = Vec::new();
        for (&col, options) in &sheet.columns {
            match spans.last_mut() {
                Some((_, last, prev)) if *last + 1 == col && prev == options => *last = col,
                _ => spans.push((col, col, *options)),
            }
        }

        let metrics = &sheet.metrics;
        let default_width = metrics.px_to_width(metrics.default_width_px());

        xml.push_str("<cols>");
        for (first, last, options) in spans {
            write!(xml, r#"<col min="{}" max="{}" width=""#, first + 1, last + 1)?;
            push_f64(xml, metrics.stored_width(options.width.unwrap_or(default_width)));
            xml.push('"');
            if let Some(xf) = self.xf(options.format) {
                write!(xml, r#" style="{}""#, xf)?;
            }
            if options.hidden {
                xml.push_str(r#" hidden="1""#);
            }
            if options.width.is_some() {
                xml.push_str(r#" customWidth="1""#);
            }
            xml.push_str("/>");
        }
        xml.push_str("</cols>");
        Ok(())
    }

    fn write_sheet_data<'s>(
        &'s self,
        xml: &mut String,
        strings: &mut SharedStrings,
        hyperlinks: &mut Vec<HyperlinkRef<'s>>,
    ) -> Result<()> {
        let sheet = self.sheet;
        if sheet.cells.is_empty() && sheet.rows.is_empty() {
            xml.push_str("<sheetData/>");
            return Ok(());
        }

        xml.push_str("<sheetData>");

        let mut row_numbers: Vec<RowNum> = sheet.cells.keys().chain(sheet.rows.keys()).copied().collect();
        row_numbers.sort_unstable();
        row_numbers.dedup();

        for row in row_numbers {
            let options = sheet.rows.get(&row);
            self.write_row_start(xml, row, options)?;

            let Some(cells) = sheet.cells.get(&row) else {
                xml.push_str("/>");
                continue;
            };
            xml.push('>');

            for (&col, cell) in cells {
                let local = if cell.format != 0 {
                    cell.format
                } else {
                    options
                        .map(|o| o.format)
                        .filter(|&f| f != 0)
                        .or_else(|| sheet.columns.get(&col).map(|c| c.format))
                        .unwrap_or(0)
                };
                self.write_cell(xml, row, col, cell, self.xf(local), strings)?;

                if let CellContent::Data(CellData::Url(url)) = &cell.content {
                    hyperlinks.push(HyperlinkRef { row, col, url });
                }
            }

            xml.push_str("</row>");
        }

        xml.push_str("</sheetData>");
        Ok(())
    }

    fn write_row_start(&self, xml: &mut String, row: RowNum, options: Option<&RowOptions>) -> Result<()> {
        write!(xml, r#"<row r="{}""#, row + 1)?;
        if let Some(options) = options {
            if let Some(xf) = self.xf(options.format) {
                write!(xml, r#" s="{}" customFormat="1""#, xf)?;
            }
            if let Some(height) = options.height {
                xml.push_str(r#" ht=""#);
                push_f64(xml, height);
                xml.push_str(r#"" customHeight="1""#);
            }
            if options.hidden {
                xml.push_str(r#" hidden="1""#);
            }
        }
        Ok(())
    }

    fn write_cell(
        &self,
        xml: &mut String,
        row: RowNum,
        col: ColNum,
        cell: &Cell,
        xf: Option<u32>,
        strings: &mut SharedStrings,
    ) -> Result<()> {
        write!(xml, r#"<c r="{}{}""#, column_name(col), row + 1)?;
        if let Some(xf) = xf {
            write!(xml, r#" s="{}""#, xf)?;
        }

        let data = match &cell.content {
            CellContent::Data(data) => data,
            CellContent::EmbeddedImage(index) => {
                let vm = self.value_metadata.get(*index).copied().unwrap_or(1);
                write!(xml, r#" vm="{}" t="e"><v>#VALUE!</v></c>"#, vm)?;
                return Ok(());
            },
        };

        match data {
            CellData::Blank => xml.push_str("/>"),
            CellData::Boolean(value) => {
                write!(xml, r#" t="b"><v>{}</v></c>"#, u8::from(*value))?;
            },
            CellData::Number(number) => write_number(xml, *number),
            CellData::DateTime(datetime) => write_number(xml, datetime.to_excel()),
            CellData::String(text) => write_shared_string(xml, strings.add_string(text)),
            CellData::Url(url) => write_shared_string(xml, strings.add_string(url.display_text())),
            CellData::RichString(rich) => write_rich_string(xml, rich)?,
            CellData::Formula(formula) => write_formula(xml, formula),
        }
        Ok(())
    }

    fn write_print_settings(&self, xml: &mut String) -> Result<()> {
        let page = &self.sheet.page;
        let flags = page.flags;

        if flags.intersects(PrintFlags::PRINT_OPTIONS) {
            xml.push_str("<printOptions");
            if flags.contains(PrintFlags::CENTER_HORIZONTALLY) {
                xml.push_str(r#" horizontalCentered="1""#);
            }
            if flags.contains(PrintFlags::CENTER_VERTICALLY) {
                xml.push_str(r#" verticalCentered="1""#);
            }
            if flags.contains(PrintFlags::HEADINGS) {
                xml.push_str(r#" headings="1""#);
            }
            if flags.contains(PrintFlags::GRIDLINES) {
                xml.push_str(r#" gridLines="1""#);
            }
            xml.push_str("/>");
        }

        let margins = &page.margins;
        xml.push_str("<pageMargins");
        for (name, value) in [
            ("left", margins.left),
            ("right", margins.right),
            ("top", margins.top),
            ("bottom", margins.bottom),
            ("header", margins.header),
            ("footer", margins.footer),
        ] {
            write!(xml, r#" {}=""#, name)?;
            push_f64(xml, value);
            xml.push('"');
        }
        xml.push_str("/>");

        if page.has_page_setup() {
            xml.push_str("<pageSetup");
            if page.paper_size != 0 {
                write!(xml, r#" paperSize="{}""#, page.paper_size)?;
            }
            if let Some(scale) = page.scale {
                write!(xml, r#" scale="{}""#, scale)?;
            }
            if let Some((width, height)) = page.fit_to_pages {
                write!(xml, r#" fitToWidth="{}" fitToHeight="{}""#, width, height)?;
            }
            if flags.contains(PrintFlags::OVER_THEN_DOWN) {
                xml.push_str(r#" pageOrder="overThenDown""#);
            }
            if flags.contains(PrintFlags::LANDSCAPE) {
                xml.push_str(r#" orientation="landscape""#);
            } else {
                xml.push_str(r#" orientation="portrait""#);
            }
            if flags.contains(PrintFlags::BLACK_AND_WHITE) {
                xml.push_str(r#" blackAndWhite="1""#);
            }
            if flags.contains(PrintFlags::DRAFT) {
                xml.push_str(r#" draft="1""#);
            }
            if let Some(first_page) = page.first_page_number {
                write!(
                    xml,
                    r#" firstPageNumber="{}" useFirstPageNumber="1""#,
                    first_page
                )?;
            }
            xml.push_str("/>");
        }

        if !page.header.is_empty() || !page.footer.is_empty() {
            xml.push_str("<headerFooter>");
            if !page.header.is_empty() {
                write!(
                    xml,
                    "<oddHeader>{}</oddHeader>",
                    escape_xml(&PageSetup::stored_text(&page.header))
                )?;
            }
            if !page.footer.is_empty() {
                write!(
                    xml,
                    "<oddFooter>{}</oddFooter>",
                    escape_xml(&PageSetup::stored_text(&page.footer))
                )?;
            }
            xml.push_str("</headerFooter>");
        }

        Ok(())
    }
}

fn write_number(xml: &mut String, number: f64) {
    xml.push_str("><v>");
    push_f64(xml, number);
    xml.push_str("</v></c>");
}

fn write_shared_string(xml: &mut String, index: u32) {
    xml.push_str(r#" t="s"><v>"#);
    push_int(xml, index);
    xml.push_str("</v></c>");
}

fn write_rich_string(xml: &mut String, rich: &RichString) -> Result<()> {
    xml.push_str(r#" t="inlineStr"><is>"#);
    for run in &rich.runs {
        xml.push_str("<r>");
        if let Some(format) = &run.format {
            write_run_properties(xml, &format.font)?;
        }
        push_text_element(xml, &run.text);
        xml.push_str("</r>");
    }
    xml.push_str("</is></c>");
    Ok(())
}

/// Write a formula and its cached result, typed like the result looks.
fn write_formula(xml: &mut String, formula: &Formula) {
    let result = formula.result.as_deref().unwrap_or("0");
    let expression = escape_xml(formula.expression());

    if result.parse::<f64>().is_ok_and(f64::is_finite) {
        xml.push_str("><f>");
        xml.push_str(&expression);
        xml.push_str("</f><v>");
        xml.push_str(result);
    } else if result == "TRUE" || result == "FALSE" {
        xml.push_str(r#" t="b"><f>"#);
        xml.push_str(&expression);
        xml.push_str("</f><v>");
        xml.push_str(if result == "TRUE" { "1" } else { "0" });
    } else if result.starts_with('#') {
        xml.push_str(r#" t="e"><f>"#);
        xml.push_str(&expression);
        xml.push_str("</f><v>");
        xml.push_str(&escape_xml(result));
    } else {
        xml.push_str(r#" t="str"><f>"#);
        xml.push_str(&expression);
        xml.push_str("</f><v>");
        xml.push_str(&escape_xml(result));
    }
    xml.push_str("</v></c>");
}

fn write_hyperlinks(xml: &mut String, hyperlinks: &[HyperlinkRef<'_>], rels: &mut Relationships) -> Result<()> {
    xml.push_str("<hyperlinks>");
    for link in hyperlinks {
        let url = link.url;
        write!(xml, r#"<hyperlink ref="{}""#, cell_ref(link.row, link.col))?;
        match url.kind() {
            UrlKind::External => {
                let (target, location) = url.external_parts();
                let r_id = rels.get_or_add_ext_rel(rt::HYPERLINK, target);
                write!(xml, r#" r:id="{}""#, r_id)?;
                if let Some(location) = location {
                    write!(xml, r#" location="{}""#, escape_xml(location))?;
                }
            },
            UrlKind::Internal => {
                write!(
                    xml,
                    r#" location="{}" display="{}""#,
                    escape_xml(url.target()),
                    escape_xml(url.display_text())
                )?;
            },
        }
        if let Some(tip) = &url.tip {
            write!(xml, r#" tooltip="{}""#, escape_xml(tip))?;
        }
        xml.push_str("/>");
    }
    xml.push_str("</hyperlinks>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::unit::{ColumnMetrics, DEFAULT_ROW_HEIGHT_PT};
    use crate::ooxml::xlsx::color::Color;
    use crate::ooxml::xlsx::datetime::ExcelDateTime;
    use crate::ooxml::xlsx::format::Format;
    use quick_xml::Reader;
    use quick_xml::events::Event;

    fn sheet() -> Worksheet {
        Worksheet::new("Sheet1".to_string(), ColumnMetrics::default(), DEFAULT_ROW_HEIGHT_PT)
    }

    /// Render with local format `n` mapped to xf `n`.
    fn render(sheet: &Worksheet) -> (String, SharedStrings, Relationships) {
        let xf: Vec<u32> = (0..=sheet.formats.len() as u32).collect();
        let vm: Vec<u32> = (1..=sheet.embedded_images.len() as u32).collect();
        let rel_ids = SheetRelIds::default();
        let mut strings = SharedStrings::new();
        let mut rels = Relationships::new();
        let xml = SheetWriter::new(sheet, &xf, &vm, &rel_ids)
            .to_xml(&mut strings, &mut rels)
            .unwrap();
        (xml, strings, rels)
    }

    fn element_names(xml: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        let mut names = Vec::new();
        let mut depth = 0;
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) => {
                    if depth == 1 {
                        names.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                    }
                    depth += 1;
                },
                Event::Empty(e) if depth == 1 => {
                    names.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
                },
                Event::End(_) => depth -= 1,
                Event::Eof => break,
                _ => {},
            }
        }
        names
    }

    #[test]
    fn test_empty_sheet() {
        let (xml, strings, _) = render(&sheet());
        assert!(xml.contains(r#"<dimension ref="A1"/>"#));
        assert!(xml.contains("<sheetData/>"));
        assert!(xml.contains(r#"<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#));
        assert!(strings.is_empty());
    }

    #[test]
    fn test_cell_values() {
        let mut ws = sheet();
        ws.write(0, 0, "Hello").unwrap();
        ws.write(0, 1, 1.5).unwrap();
        ws.write(0, 2, 3).unwrap();
        ws.write(1, 0, true).unwrap();
        ws.write(1, 1, Formula::new("=A1&\"!\"").set_result("Hello!")).unwrap();
        ws.write(1, 2, Formula::new("SUM(B1:C1)")).unwrap();
        ws.write(2, 0, "Hello").unwrap();

        let (xml, strings, _) = render(&ws);
        assert!(xml.contains(r#"<dimension ref="A1:C3"/>"#));
        assert!(xml.contains(r#"<c r="A1" t="s"><v>0</v></c>"#));
        assert!(xml.contains(r#"<c r="B1"><v>1.5</v></c>"#));
        assert!(xml.contains(r#"<c r="C1"><v>3</v></c>"#));
        assert!(xml.contains(r#"<c r="A2" t="b"><v>1</v></c>"#));
        assert!(xml.contains(r#"<c r="B2" t="str"><f>A1&amp;&quot;!&quot;</f><v>Hello!</v></c>"#));
        assert!(xml.contains(r#"<c r="C2"><f>SUM(B1:C1)</f><v>0</v></c>"#));
        assert!(xml.contains(r#"<c r="A3" t="s"><v>0</v></c>"#));
        assert_eq!(strings.unique_count(), 1);
    }

    #[test]
    fn test_dates_use_format() {
        let mut ws = sheet();
        ws.write(0, 0, &ExcelDateTime::from_ymd(2023, 1, 1).unwrap()).unwrap();
        let (xml, _, _) = render(&ws);
        assert!(xml.contains(r#"<c r="A1" s="1"><v>44927</v></c>"#));
    }

    #[test]
    fn test_element_order() {
        let mut ws = sheet();
        ws.write(0, 0, "x").unwrap();
        ws.set_column_width(0, 20).unwrap();
        ws.merge_range(2, 0, 2, 3, "merged", &Format::new()).unwrap();
        ws.write_url(4, 0, "https://example.com/page#top").unwrap();
        ws.protect_with_password("password");
        ws.set_print_gridlines(true).set_landscape();
        ws.set_header("&CPage &P").unwrap();
        ws.set_tab_color(Color::Red).unwrap();

        let (xml, _, rels) = render(&ws);
        assert_eq!(
            element_names(&xml),
            [
                "sheetPr",
                "dimension",
                "sheetViews",
                "sheetFormatPr",
                "cols",
                "sheetData",
                "sheetProtection",
                "mergeCells",
                "phoneticPr",
                "hyperlinks",
                "printOptions",
                "pageMargins",
                "pageSetup",
                "headerFooter",
            ]
        );
        assert!(xml.contains(r#"<sheetProtection password="83AF" sheet="1""#));
        assert!(xml.contains(r#"<hyperlink ref="A5" r:id="rId1" location="top"/>"#));
        assert_eq!(rels.iter().next().unwrap().target_ref(), "https://example.com/page");
        assert!(xml.contains("<oddHeader>&amp;CPage &amp;P</oddHeader>"));
        assert!(xml.contains(r#"<col min="1" max="1" width="20.7109375" customWidth="1"/>"#));
    }

    #[test]
    fn test_print_settings() {
        let mut ws = sheet();
        ws.write(0, 0, "Report").unwrap();
        ws.set_landscape()
            .set_portrait()
            .set_paper_size(9)
            .set_print_black_and_white(true)
            .set_print_draft(true)
            .set_print_center_horizontally(true)
            .set_print_center_vertically(true)
            .set_print_headings(true)
            .set_print_first_page_number(2)
            .set_print_fit_to_pages(1, 0);
        ws.set_print_scale(80).unwrap();
        ws.set_footer("&C&[Picture]&RPage &[Page] of &[Pages]").unwrap();

        let (xml, _, _) = render(&ws);
        assert!(xml.contains(r#"<pageSetUpPr fitToPage="1"/>"#));
        assert!(xml.contains(
            r#"<printOptions horizontalCentered="1" verticalCentered="1" headings="1"/>"#
        ));
        assert!(xml.contains(
            r#"<pageSetup paperSize="9" scale="80" fitToWidth="1" fitToHeight="0" orientation="portrait" blackAndWhite="1" draft="1" firstPageNumber="2" useFirstPageNumber="1"/>"#
        ));
        assert!(xml.contains(
            "<headerFooter><oddFooter>&amp;C&amp;G&amp;RPage &amp;P of &amp;N</oddFooter></headerFooter>"
        ));
        assert!(!xml.contains("oddHeader"));
    }

    #[test]
    fn test_write_row_matches_single_writes() {
        let mut by_row = sheet();
        by_row.write_row(1, 1, ["North", "South", "North"]).unwrap();

        let mut by_cell = sheet();
        by_cell.write(1, 1, "North").unwrap();
        by_cell.write(1, 2, "South").unwrap();
        by_cell.write(1, 3, "North").unwrap();

        let (row_xml, row_strings, _) = render(&by_row);
        let (cell_xml, cell_strings, _) = render(&by_cell);
        assert_eq!(row_xml, cell_xml);
        assert_eq!(row_strings.to_xml().unwrap(), cell_strings.to_xml().unwrap());
        assert!(row_xml.contains(r#"<c r="D2" t="s"><v>0</v></c>"#));
    }

    #[test]
    fn test_internal_link() {
        let mut ws = sheet();
        ws.write_url(0, 0, Url::new("internal:Sheet2!B2").set_tip("Go")).unwrap();
        let (xml, strings, rels) = render(&ws);
        assert!(xml.contains(r#"<hyperlink ref="A1" location="Sheet2!B2" display="Sheet2!B2" tooltip="Go"/>"#));
        assert!(rels.is_empty());
        assert_eq!(strings.unique_count(), 1);
    }

    #[test]
    fn test_freeze_panes() {
        let mut ws = sheet();
        ws.set_freeze_panes(1, 0).unwrap();
        let (xml, _, _) = render(&ws);
        assert!(xml.contains(r#"<pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/><selection pane="bottomLeft" activeCell="A2" sqref="A2"/>"#));

        ws.set_freeze_panes(2, 1).unwrap();
        ws.set_freeze_panes_top_cell(20, 1).unwrap();
        let (xml, _, _) = render(&ws);
        assert!(xml.contains(r#"<pane xSplit="1" ySplit="2" topLeftCell="B21" activePane="bottomRight" state="frozen"/>"#));
    }

    #[test]
    fn test_rows_and_columns() {
        let mut ws = sheet();
        let mut bold = Format::new();
        bold.set_bold();
        ws.set_row_height(3, 30).unwrap();
        ws.set_row_hidden(4).unwrap();
        ws.set_column_hidden(2).unwrap();
        ws.set_column_hidden(3).unwrap();
        ws.set_row_format(5, &bold).unwrap();
        ws.write(5, 0, 1).unwrap();

        let (xml, _, _) = render(&ws);
        assert!(xml.contains(r#"<row r="4" ht="30" customHeight="1"/>"#));
        assert!(xml.contains(r#"<row r="5" hidden="1"/>"#));
        assert!(xml.contains(r#"<row r="6" s="1" customFormat="1"><c r="A6" s="1"><v>1</v></c></row>"#));
        assert!(xml.contains(r#"<col min="3" max="4" width="9.140625" hidden="1"/>"#));
    }

    #[test]
    fn test_rich_string_inline() {
        let mut ws = sheet();
        let mut bold = Format::new();
        bold.set_bold();
        let mut rich = RichString::new();
        rich.append(&bold, "Bold").append_plain(" text");
        ws.write(0, 0, &rich).unwrap();

        let (xml, strings, _) = render(&ws);
        assert!(xml.contains(r#"<c r="A1" t="inlineStr"><is><r><rPr><b/><sz val="11"/>"#));
        assert!(xml.contains(r#"<rFont val="Calibri"/>"#));
        assert!(xml.contains(r#"<r><t xml:space="preserve"> text</t></r></is></c>"#));
        assert!(strings.is_empty());
    }
}
