//! Assembles every part of a workbook into an OPC package.
//!
//! Parts are built in one pass over the worksheets. Workbook-wide resources
//! (styles, shared strings, media, table ids, VML shape ids, rich values)
//! are numbered here, so a worksheet never needs to know about any other
//! worksheet until save time.

use crate::ooxml::charts::chart::TitleText;
use crate::ooxml::charts::series::{ChartSeries, RangeCache};
use crate::ooxml::charts::{Chart, ChartRange, writer::write_chart};
use crate::ooxml::error::{Result, XlsxError};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{OpcPackage, PackURI, PackageWriter, Part, Relationships};
use crate::ooxml::xlsx::cell::CellData;
use crate::ooxml::xlsx::image::Image;
use crate::ooxml::xlsx::reference::{COL_MAX, ROW_MAX, column_name, quote_sheet_name, range_ref_absolute};
use crate::ooxml::xlsx::workbook::Workbook;
use crate::ooxml::xlsx::worksheet::Worksheet;
use crate::ooxml::xlsx::writer::comments::comments_xml;
use crate::ooxml::xlsx::writer::drawing::{DrawingKind, DrawingObject, drawing_xml};
use crate::ooxml::xlsx::writer::rich_data::{self, RichImage};
use crate::ooxml::xlsx::writer::sheet::{SheetRelIds, SheetWriter};
use crate::ooxml::xlsx::writer::strings::SharedStrings;
use crate::ooxml::xlsx::writer::styles::StylesBuilder;
use crate::ooxml::xlsx::writer::table::serialize_table;
use crate::ooxml::xlsx::writer::theme::theme_xml;
use crate::ooxml::xlsx::writer::vml::{HeaderImageShape, NoteShape, header_images_vml, notes_vml};
use crate::ooxml::xlsx::writer::workbook::{DefinedName, SheetEntry, WorkbookXml};
use crate::ooxml::xlsx::drawing::DrawingAnchor;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

const MAJOR_FONT: &str = "Cambria";
const DEFAULT_MINOR_FONT: &str = "Calibri";

/// Serialize `workbook` to `.xlsx` bytes.
///
/// The workbook must already have at least one worksheet and exactly one
/// active worksheet.
pub(crate) fn assemble(workbook: &Workbook, created: DateTime<Utc>) -> Result<Vec<u8>> {
    if workbook.worksheets.is_empty() {
        // Saved with an empty Sheet1; the caller's workbook stays sheetless.
        let mut placeholder = workbook.clone();
        placeholder.add_worksheet().active = true;
        return assemble(&placeholder, created);
    }

    let mut assembler = Assembler::new(workbook);
    assembler.add_worksheets()?;
    let package = assembler.finish(created)?;
    log::debug!("assembled {} parts", package.part_count());
    PackageWriter::to_bytes(&package)
}

/// Part counters and workbook-wide state built while walking the sheets.
struct Assembler<'a> {
    workbook: &'a Workbook,
    sheet_parts: Vec<Part>,
    styles: StylesBuilder,
    strings: SharedStrings,
    /// Image bytes -> media part already written
    media: HashMap<&'a [u8], PackURI>,
    /// Parts that go after the worksheets, in the order they were produced
    deferred: Vec<Part>,
    sheet_uris: Vec<PackURI>,
    drawing_count: u32,
    chart_count: u32,
    vml_count: u32,
    comments_count: u32,
    table_count: u32,
    /// VML `idmap` block; shape ids are `1024 * data_id + n`
    vml_data_id: u32,
    table_names: Vec<String>,
    rich_images: Vec<RichImage>,
    /// Media targets of the rich value relationships, by rel index
    rich_media: Vec<PackURI>,
}

impl<'a> Assembler<'a> {
    fn new(workbook: &'a Workbook) -> Self {
        Self {
            workbook,
            sheet_parts: Vec::new(),
            styles: StylesBuilder::new(workbook.default_format.as_ref()),
            strings: SharedStrings::new(),
            media: HashMap::new(),
            deferred: Vec::new(),
            sheet_uris: Vec::new(),
            drawing_count: 0,
            chart_count: 0,
            vml_count: 0,
            comments_count: 0,
            table_count: 0,
            vml_data_id: 1,
            table_names: Vec::new(),
            rich_images: Vec::new(),
            rich_media: Vec::new(),
        }
    }

    // ===== Worksheets =====

    fn add_worksheets(&mut self) -> Result<()> {
        let workbook = self.workbook;
        for (index, sheet) in workbook.worksheets.iter().enumerate() {
            let uri = PackURI::from_member(&format!("xl/worksheets/sheet{}.xml", index + 1));
            let mut rels = Relationships::new();
            let mut rel_ids = SheetRelIds::default();

            rel_ids.drawing = self.add_drawing(sheet, &uri, &mut rels)?;
            rel_ids.legacy_drawing = self.add_notes(sheet, &uri, &mut rels)?;
            rel_ids.legacy_drawing_hf = self.add_header_images(sheet, &uri, &mut rels)?;
            rel_ids.tables = self.add_tables(sheet, &uri, &mut rels)?;

            let xf_indices: Vec<u32> = std::iter::once(0)
                .chain(sheet.formats.iter().map(|format| self.styles.add_cell_format(format)))
                .collect();
            let value_metadata = self.add_embedded_images(sheet);

            let xml = SheetWriter::new(sheet, &xf_indices, &value_metadata, &rel_ids)
                .to_xml(&mut self.strings, &mut rels)?;
            log::debug!("worksheet '{}' written to {}", sheet.name, uri.as_str());
            self.sheet_parts
                .push(Part::new(uri.clone(), ct::SML_WORKSHEET, xml).with_rels(rels));
            self.sheet_uris.push(uri);
        }
        Ok(())
    }

    /// Media part for `image`, shared by every use of the same bytes.
    fn media_uri(&mut self, image: &'a Image) -> PackURI {
        if let Some(uri) = self.media.get(image.data.as_slice()) {
            return uri.clone();
        }
        let uri = PackURI::from_member(&format!(
            "xl/media/image{}.{}",
            self.media.len() + 1,
            image.image_type.extension()
        ));
        self.deferred.push(Part::new(
            uri.clone(),
            image.image_type.content_type(),
            image.data.clone(),
        ));
        self.media.insert(image.data.as_slice(), uri.clone());
        uri
    }

    fn add_drawing(
        &mut self,
        sheet: &'a Worksheet,
        sheet_uri: &PackURI,
        sheet_rels: &mut Relationships,
    ) -> Result<Option<String>> {
        if sheet.images.is_empty() && sheet.charts.is_empty() {
            return Ok(None);
        }

        self.drawing_count += 1;
        let uri = PackURI::from_member(&format!("xl/drawings/drawing{}.xml", self.drawing_count));
        let mut rels = Relationships::new();
        let mut objects = Vec::with_capacity(sheet.images.len() + sheet.charts.len());

        for (index, placed) in sheet.images.iter().enumerate() {
            let image = &placed.image;
            let media = self.media_uri(image);
            let r_id = rels.get_or_add(rt::IMAGE, &media.relative_ref(uri.base_uri()));
            objects.push(DrawingObject {
                anchor: DrawingAnchor::resolve(
                    sheet,
                    placed.row,
                    placed.col,
                    placed.x_offset,
                    placed.y_offset,
                    image.display_width(),
                    image.display_height(),
                ),
                movement: image.object_movement,
                name: format!("Picture {}", index + 1),
                description: image.alt_text.clone(),
                kind: DrawingKind::Picture {
                    r_id,
                    decorative: image.decorative,
                },
            });
        }

        for (index, placed) in sheet.charts.iter().enumerate() {
            self.chart_count += 1;
            let chart_uri = PackURI::from_member(&format!("xl/charts/chart{}.xml", self.chart_count));

            let mut chart = placed.chart.clone();
            self.fill_chart_caches(&mut chart);
            let mut blob = Vec::with_capacity(4096);
            write_chart(&mut blob, &chart)?;
            self.deferred.push(Part::new(chart_uri.clone(), ct::DML_CHART, blob));

            let r_id = rels.get_or_add(rt::CHART, &chart_uri.relative_ref(uri.base_uri()));
            let name = if chart.name.is_empty() {
                format!("Chart {}", index + 1)
            } else {
                chart.name.clone()
            };
            objects.push(DrawingObject {
                anchor: DrawingAnchor::resolve(
                    sheet,
                    placed.row,
                    placed.col,
                    placed.x_offset,
                    placed.y_offset,
                    chart.width as f64,
                    chart.height as f64,
                ),
                movement: chart.object_movement,
                name,
                description: chart.alt_text.clone(),
                kind: DrawingKind::Chart { r_id },
            });
        }

        let xml = drawing_xml(&objects)?;
        self.deferred
            .push(Part::new(uri.clone(), ct::OFC_DRAWING, xml).with_rels(rels));
        let target = uri.relative_ref(sheet_uri.base_uri());
        Ok(Some(sheet_rels.get_or_add(rt::DRAWING, &target)))
    }

    fn fill_chart_caches(&self, chart: &mut Chart) {
        for range in chart.series.iter_mut().flat_map(ChartSeries::ranges_mut) {
            self.fill_cache(range);
        }
        for title in [&mut chart.title, &mut chart.x_axis.title, &mut chart.y_axis.title] {
            if let Some(TitleText::Range(range)) = &mut title.text {
                self.fill_cache(range);
            }
        }
    }

    /// Cache the current values of `range`: text if any cell holds text,
    /// numbers otherwise.
    fn fill_cache(&self, range: &mut ChartRange) {
        let Some(sheet) = self
            .workbook
            .worksheets
            .iter()
            .find(|sheet| sheet.name == range.sheet)
        else {
            log::warn!("chart range {} refers to an unknown worksheet", range.formula());
            range.cache = RangeCache::Empty;
            return;
        };

        let cells: Vec<Option<&CellData>> = range.cells().map(|(row, col)| sheet.cell(row, col)).collect();
        let has_text = cells.iter().flatten().any(|data| {
            matches!(
                data,
                CellData::String(_) | CellData::RichString(_) | CellData::Url(_)
            )
        });

        range.cache = if has_text {
            RangeCache::Strings(cells.into_iter().map(cell_text).collect())
        } else {
            RangeCache::Numbers(cells.into_iter().map(cell_number).collect())
        };
    }

    fn add_notes(
        &mut self,
        sheet: &'a Worksheet,
        sheet_uri: &PackURI,
        sheet_rels: &mut Relationships,
    ) -> Result<Option<String>> {
        if sheet.notes.is_empty() {
            return Ok(None);
        }

        self.comments_count += 1;
        let comments_uri = PackURI::from_member(&format!("xl/comments{}.xml", self.comments_count));
        let comments = comments_xml(&sheet.notes, &sheet.note_author)?;
        self.deferred
            .push(Part::new(comments_uri.clone(), ct::SML_COMMENTS, comments));

        let shapes: Vec<NoteShape<'_>> = sheet
            .notes
            .iter()
            .map(|(&(row, col), note)| NoteShape::resolve(sheet, row, col, note, sheet.show_all_notes))
            .collect();
        let vml_uri = self.next_vml_uri();
        let data_id = self.next_vml_data_id(shapes.len());
        let vml = notes_vml(data_id, 1024 * data_id + 1, &shapes)?;
        self.deferred.push(Part::new(vml_uri.clone(), ct::OFC_VML_DRAWING, vml));

        let r_id = sheet_rels.get_or_add(rt::VML_DRAWING, &vml_uri.relative_ref(sheet_uri.base_uri()));
        sheet_rels.get_or_add(rt::COMMENTS, &comments_uri.relative_ref(sheet_uri.base_uri()));
        Ok(Some(r_id))
    }

    fn add_header_images(
        &mut self,
        sheet: &'a Worksheet,
        sheet_uri: &PackURI,
        sheet_rels: &mut Relationships,
    ) -> Result<Option<String>> {
        if sheet.page.header_images.is_empty() {
            return Ok(None);
        }

        let vml_uri = self.next_vml_uri();
        let mut rels = Relationships::new();
        let mut shapes = Vec::with_capacity(sheet.page.header_images.len());
        for (slot, image) in &sheet.page.header_images {
            let media = self.media_uri(image);
            let r_id = rels.get_or_add(rt::IMAGE, &media.relative_ref(vml_uri.base_uri()));
            let title = media
                .filename()
                .rsplit_once('.')
                .map_or(media.filename(), |(stem, _)| stem)
                .to_string();
            shapes.push(HeaderImageShape {
                slot: slot.vml_name(),
                r_id,
                title,
                width: image.display_width(),
                height: image.display_height(),
            });
        }

        let data_id = self.next_vml_data_id(shapes.len());
        let vml = header_images_vml(data_id, 1024 * data_id + 1, &shapes)?;
        self.deferred
            .push(Part::new(vml_uri.clone(), ct::OFC_VML_DRAWING, vml).with_rels(rels));

        let target = vml_uri.relative_ref(sheet_uri.base_uri());
        Ok(Some(sheet_rels.get_or_add(rt::VML_DRAWING, &target)))
    }

    fn next_vml_uri(&mut self) -> PackURI {
        self.vml_count += 1;
        PackURI::from_member(&format!("xl/drawings/vmlDrawing{}.vml", self.vml_count))
    }

    /// Reserve an `idmap` block; each block holds 1024 shapes.
    fn next_vml_data_id(&mut self, shape_count: usize) -> u32 {
        let data_id = self.vml_data_id;
        self.vml_data_id += 1 + (shape_count as u32) / 1024;
        data_id
    }

    fn add_tables(
        &mut self,
        sheet: &'a Worksheet,
        sheet_uri: &PackURI,
        sheet_rels: &mut Relationships,
    ) -> Result<Vec<String>> {
        let mut r_ids = Vec::with_capacity(sheet.tables.len());
        for placed in &sheet.tables {
            self.table_count += 1;
            let id = self.table_count;
            let name = placed
                .table
                .name
                .clone()
                .unwrap_or_else(|| format!("Table{}", id));
            if self.table_names.iter().any(|other| other.eq_ignore_ascii_case(&name)) {
                return Err(XlsxError::config(format!("Table name '{}' is already in use", name)));
            }

            let uri = PackURI::from_member(&format!("xl/tables/table{}.xml", id));
            let xml = serialize_table(placed, id, &name)?;
            self.deferred.push(Part::new(uri.clone(), ct::SML_TABLE, xml));
            r_ids.push(sheet_rels.get_or_add(rt::TABLE, &uri.relative_ref(sheet_uri.base_uri())));
            self.table_names.push(name);
        }
        Ok(r_ids)
    }

    /// Register the in-cell images of `sheet` as rich values and return the
    /// 1-based `vm` index of each.
    fn add_embedded_images(&mut self, sheet: &'a Worksheet) -> Vec<u32> {
        let mut value_metadata = Vec::with_capacity(sheet.embedded_images.len());
        for image in &sheet.embedded_images {
            let media = self.media_uri(image);
            let rel_index = match self.rich_media.iter().position(|uri| *uri == media) {
                Some(index) => index,
                None => {
                    self.rich_media.push(media);
                    self.rich_media.len() - 1
                },
            };
            self.rich_images.push(RichImage {
                rel_index: rel_index as u32,
                alt_text: image.alt_text.clone(),
                decorative: image.decorative,
            });
            value_metadata.push(self.rich_images.len() as u32);
        }
        value_metadata
    }

    // ===== Workbook =====

    /// Build the workbook-level parts and lay the package out: workbook,
    /// worksheets, workbook resources, sheet resources, document properties.
    fn finish(mut self, created: DateTime<Utc>) -> Result<OpcPackage> {
        let workbook = self.workbook;
        let workbook_uri = PackURI::from_member("xl/workbook.xml");
        let base = workbook_uri.base_uri().to_string();
        let mut rels = Relationships::new();

        let mut sheets = Vec::with_capacity(workbook.worksheets.len());
        for (sheet, uri) in workbook.worksheets.iter().zip(&self.sheet_uris) {
            sheets.push(SheetEntry {
                name: &sheet.name,
                r_id: rels.get_or_add(rt::WORKSHEET, &uri.relative_ref(&base)),
                hidden: sheet.hidden,
            });
        }

        let mut resources = Vec::new();

        let theme_uri = PackURI::from_member("xl/theme/theme1.xml");
        let minor_font = match &workbook.default_format {
            Some(format) => format.font.name.clone(),
            None => DEFAULT_MINOR_FONT.to_string(),
        };
        rels.get_or_add(rt::THEME, &theme_uri.relative_ref(&base));
        resources.push(Part::new(theme_uri, ct::OFC_THEME, theme_xml(MAJOR_FONT, &minor_font)?));

        let styles_uri = PackURI::from_member("xl/styles.xml");
        rels.get_or_add(rt::STYLES, &styles_uri.relative_ref(&base));
        resources.push(Part::new(styles_uri, ct::SML_STYLES, self.styles.to_xml()?));

        if !self.strings.is_empty() {
            let uri = PackURI::from_member("xl/sharedStrings.xml");
            rels.get_or_add(rt::SHARED_STRINGS, &uri.relative_ref(&base));
            resources.push(Part::new(uri, ct::SML_SHARED_STRINGS, self.strings.to_xml()?));
        }

        if !self.rich_images.is_empty() {
            for part in self.rich_data_parts()? {
                let reltype = rich_reltype(part.content_type());
                rels.get_or_add(reltype, &part.partname().relative_ref(&base));
                resources.push(part);
            }
        }

        let defined_names = self.defined_names()?;
        let named_ranges = app_named_ranges(workbook, &defined_names);
        let first_sheet = workbook
            .worksheets
            .iter()
            .position(|sheet| !sheet.hidden)
            .unwrap_or(0);
        let workbook_xml = WorkbookXml {
            sheets,
            defined_names,
            active_tab: workbook.active_index(),
            first_sheet,
            read_only_recommended: workbook.read_only_recommended,
        }
        .to_xml()?;

        let mut package = OpcPackage::new();
        package.relate_to(&workbook_uri, rt::OFFICE_DOCUMENT);
        package.add_part(Part::new(workbook_uri, ct::SML_SHEET_MAIN, workbook_xml).with_rels(rels));
        for part in self.sheet_parts.drain(..).chain(resources).chain(self.deferred.drain(..)) {
            package.add_part(part);
        }

        // ===== Document properties =====
        let core_uri = PackURI::from_member("docProps/core.xml");
        let app_uri = PackURI::from_member("docProps/app.xml");
        let sheet_names: Vec<&str> = workbook.worksheets.iter().map(|sheet| sheet.name.as_str()).collect();
        package.relate_to(&core_uri, rt::CORE_PROPERTIES);
        package.relate_to(&app_uri, rt::EXTENDED_PROPERTIES);
        package.add_part(Part::new(
            core_uri,
            ct::OPC_CORE_PROPERTIES,
            workbook.properties.core_xml(created)?,
        ));
        package.add_part(Part::new(
            app_uri,
            ct::OFC_EXTENDED_PROPERTIES,
            workbook.properties.app_xml(&sheet_names, &named_ranges)?,
        ));

        Ok(package)
    }

    /// `xl/metadata.xml` and the `xl/richData` parts for in-cell images.
    fn rich_data_parts(&self) -> Result<Vec<Part>> {
        let rel_uri = PackURI::from_member("xl/richData/richValueRel.xml");
        let mut media_rels = Relationships::new();
        let r_ids: Vec<String> = self
            .rich_media
            .iter()
            .map(|media| media_rels.get_or_add(rt::IMAGE, &media.relative_ref(rel_uri.base_uri())))
            .collect();

        Ok(vec![
            Part::new(
                PackURI::from_member("xl/metadata.xml"),
                ct::SML_SHEET_METADATA,
                rich_data::metadata_xml(self.rich_images.len())?,
            ),
            Part::new(rel_uri, ct::RICH_VALUE_REL, rich_data::rich_value_rel_xml(&r_ids)?)
                .with_rels(media_rels),
            Part::new(
                PackURI::from_member("xl/richData/rdrichvalue.xml"),
                ct::RICH_VALUE,
                rich_data::rich_value_xml(&self.rich_images)?,
            ),
            Part::new(
                PackURI::from_member("xl/richData/rdrichvaluestructure.xml"),
                ct::RICH_VALUE_STRUCTURE,
                rich_data::rich_value_structure_xml(&self.rich_images)?,
            ),
            Part::new(
                PackURI::from_member("xl/richData/rdRichValueTypes.xml"),
                ct::RICH_VALUE_TYPES,
                rich_data::rich_value_types_xml()?,
            ),
        ])
    }

    /// User names plus the print areas and print titles of every sheet,
    /// sorted the way Excel lists them.
    fn defined_names(&self) -> Result<Vec<DefinedName>> {
        let workbook = self.workbook;
        let mut names = Vec::new();

        for user in &workbook.user_names {
            let local_sheet = match &user.sheet {
                Some(sheet_name) => Some(
                    workbook
                        .worksheets
                        .iter()
                        .position(|sheet| sheet.name == *sheet_name)
                        .ok_or_else(|| {
                            XlsxError::config(format!(
                                "Defined name '{}' refers to unknown worksheet '{}'",
                                user.name, sheet_name
                            ))
                        })?,
                ),
                None => None,
            };
            names.push(DefinedName {
                name: user.name.clone(),
                local_sheet,
                reference: user.formula.clone(),
            });
        }

        for (index, sheet) in workbook.worksheets.iter().enumerate() {
            let quoted = quote_sheet_name(&sheet.name);
            if let Some((first_row, first_col, last_row, last_col)) = sheet.page.print_area {
                names.push(DefinedName {
                    name: "_xlnm.Print_Area".to_string(),
                    local_sheet: Some(index),
                    reference: format!(
                        "{}!{}",
                        quoted,
                        area_ref(first_row, first_col, last_row, last_col)
                    ),
                });
            }

            let mut titles = Vec::with_capacity(2);
            if let Some((first_col, last_col)) = sheet.page.repeat_columns {
                titles.push(format!(
                    "{}!${}:${}",
                    quoted,
                    column_name(first_col),
                    column_name(last_col)
                ));
            }
            if let Some((first_row, last_row)) = sheet.page.repeat_rows {
                titles.push(format!("{}!${}:${}", quoted, first_row + 1, last_row + 1));
            }
            if !titles.is_empty() {
                names.push(DefinedName {
                    name: "_xlnm.Print_Titles".to_string(),
                    local_sheet: Some(index),
                    reference: titles.join(","),
                });
            }
        }

        names.sort_by_key(DefinedName::sort_key);
        Ok(names)
    }
}

fn rich_reltype(content_type: &str) -> &'static str {
    match content_type {
        ct::SML_SHEET_METADATA => rt::SHEET_METADATA,
        ct::RICH_VALUE_REL => rt::RICH_VALUE_REL,
        ct::RICH_VALUE => rt::RICH_VALUE,
        ct::RICH_VALUE_STRUCTURE => rt::RICH_VALUE_STRUCTURE,
        _ => rt::RICH_VALUE_TYPES,
    }
}

/// Print area reference; full-width and full-height areas collapse to row
/// or column ranges.
fn area_ref(first_row: u32, first_col: u16, last_row: u32, last_col: u16) -> String {
    let all_rows = first_row == 0 && last_row == ROW_MAX - 1;
    let all_cols = first_col == 0 && last_col == COL_MAX - 1;
    if all_rows && !all_cols {
        format!("${}:${}", column_name(first_col), column_name(last_col))
    } else if all_cols && !all_rows {
        format!("${}:${}", first_row + 1, last_row + 1)
    } else {
        range_ref_absolute(first_row, first_col, last_row, last_col)
    }
}

/// Names listed under "Named Ranges" in `docProps/app.xml`.
fn app_named_ranges(workbook: &Workbook, names: &[DefinedName]) -> Vec<String> {
    names
        .iter()
        .map(|defined| {
            let bare = defined.name.strip_prefix("_xlnm.").unwrap_or(&defined.name);
            match defined.local_sheet.and_then(|index| workbook.worksheets.get(index)) {
                Some(sheet) => format!("{}!{}", quote_sheet_name(&sheet.name), bare),
                None => bare.to_string(),
            }
        })
        .collect()
}

fn cell_text(data: Option<&CellData>) -> String {
    match data {
        Some(CellData::String(text)) => text.clone(),
        Some(CellData::RichString(rich)) => rich.text(),
        Some(CellData::Url(url)) => url.display_text().to_string(),
        Some(CellData::Number(number)) => crate::common::num::fmt_f64(*number),
        Some(CellData::Boolean(value)) => (if *value { "TRUE" } else { "FALSE" }).to_string(),
        Some(CellData::DateTime(datetime)) => crate::common::num::fmt_f64(datetime.to_excel()),
        Some(CellData::Formula(formula)) => formula.result.clone().unwrap_or_default(),
        Some(CellData::Blank) | None => String::new(),
    }
}

fn cell_number(data: Option<&CellData>) -> Option<f64> {
    match data? {
        CellData::Number(number) => Some(*number),
        CellData::DateTime(datetime) => Some(datetime.to_excel()),
        CellData::Boolean(value) => Some(if *value { 1.0 } else { 0.0 }),
        CellData::Formula(formula) => formula.result.as_deref().and_then(|r| r.parse().ok()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::charts::ChartType;
    use crate::ooxml::error::ErrorKind;
    use crate::ooxml::xlsx::image::tests::png_bytes;
    use crate::ooxml::xlsx::note::Note;
    use crate::ooxml::xlsx::page::HeaderImagePosition;
    use crate::ooxml::xlsx::table::Table;
    use std::io::{Cursor, Read};

    fn unzip(bytes: &[u8]) -> HashMap<String, String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut parts = HashMap::new();
        for index in 0..archive.len() {
            let mut file = archive.by_index(index).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            parts.insert(
                file.name().to_string(),
                String::from_utf8_lossy(&content).into_owned(),
            );
        }
        parts
    }

    fn save(workbook: &mut Workbook) -> HashMap<String, String> {
        unzip(&workbook.save_to_buffer().unwrap())
    }

    #[test]
    fn test_media_is_shared_between_sheets() {
        let image = Image::new_from_buffer(&png_bytes(32, 16, None)).unwrap();
        let mut workbook = Workbook::new();
        workbook.add_worksheet().insert_image(1, 1, &image).unwrap();
        workbook.add_worksheet().insert_image(0, 0, &image).unwrap();

        let parts = save(&mut workbook);
        assert!(parts.contains_key("xl/media/image1.png"));
        assert!(!parts.contains_key("xl/media/image2.png"));
        assert!(parts["xl/drawings/_rels/drawing2.xml.rels"].contains(r#"Target="../media/image1.png""#));
        assert!(parts["xl/worksheets/_rels/sheet1.xml.rels"].contains(r#"Target="../drawings/drawing1.xml""#));
        assert!(parts["xl/worksheets/sheet2.xml"].contains(r#"<drawing r:id="rId1"/>"#));
        assert!(parts["[Content_Types].xml"].contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
    }

    #[test]
    fn test_chart_caches_come_from_sheet_data() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_column(0, 0, ["North", "South", "East"]).unwrap();
        sheet.write_column(0, 1, [10, 40, 50]).unwrap();

        let mut chart = Chart::new(ChartType::Column);
        chart
            .add_series()
            .set_categories(&ChartRange::new_from_range("Sheet1", 0, 0, 2, 0))
            .set_values(&ChartRange::new_from_range("Sheet1", 0, 1, 2, 1));
        sheet.insert_chart(4, 3, &chart).unwrap();

        let parts = save(&mut workbook);
        let chart_xml = &parts["xl/charts/chart1.xml"];
        assert!(chart_xml.contains(r#"<c:pt idx="1"><c:v>South</c:v></c:pt>"#));
        assert!(chart_xml.contains(r#"<c:pt idx="2"><c:v>50</c:v></c:pt>"#));
        assert!(parts["xl/drawings/drawing1.xml"].contains(r#"name="Chart 1""#));
        assert!(parts["xl/drawings/_rels/drawing1.xml.rels"].contains(r#"Target="../charts/chart1.xml""#));
    }

    #[test]
    fn test_chart_range_on_unknown_sheet_has_no_cache() {
        let mut chart = Chart::new(ChartType::Line);
        chart
            .add_series()
            .set_values(&ChartRange::new_from_range("Missing", 0, 0, 3, 0));
        let mut workbook = Workbook::new();
        workbook.add_worksheet().insert_chart(0, 0, &chart).unwrap();

        let parts = save(&mut workbook);
        let chart_xml = &parts["xl/charts/chart1.xml"];
        assert!(chart_xml.contains("<c:f>Missing!$A$1:$A$4</c:f>"));
        assert!(!chart_xml.contains("<c:numCache>"));
    }

    #[test]
    fn test_footer_image_vml() {
        let image = Image::new_from_buffer(&png_bytes(32, 32, None)).unwrap();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet
            .set_footer("&C&[Picture]&RPage &[Page] of &[Pages]")
            .unwrap();
        sheet
            .set_footer_image(&image, HeaderImagePosition::Center)
            .unwrap();

        let parts = save(&mut workbook);
        let sheet_xml = &parts["xl/worksheets/sheet1.xml"];
        assert!(sheet_xml.contains("<oddFooter>&amp;C&amp;G&amp;RPage &amp;P of &amp;N</oddFooter>"));
        assert!(sheet_xml.contains(r#"<legacyDrawingHF r:id="rId1"/>"#));

        let vml = &parts["xl/drawings/vmlDrawing1.vml"];
        assert!(vml.contains(r##"<v:shape id="CF" o:spid="_x0000_s1025" type="#_x0000_t75""##));
        assert!(vml.contains(r#"<v:imagedata o:relid="rId1" o:title="image1"/>"#));
        assert!(parts["xl/drawings/_rels/vmlDrawing1.vml.rels"].contains(r#"Target="../media/image1.png""#));
        assert!(parts["xl/worksheets/_rels/sheet1.xml.rels"].contains(r#"Target="../drawings/vmlDrawing1.vml""#));
    }

    #[test]
    fn test_notes_write_comments_and_vml() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        let sheet = workbook.add_worksheet();
        sheet.insert_note(2, 1, &Note::new("Check this")).unwrap();
        sheet.set_default_note_author("Finance");

        let parts = save(&mut workbook);
        assert!(parts["xl/comments1.xml"].contains("<author>Finance</author>"));
        assert!(parts["xl/drawings/vmlDrawing1.vml"].contains(r#"<o:idmap v:ext="edit" data="1"/>"#));
        assert!(parts["xl/drawings/vmlDrawing1.vml"].contains(r#"id="_x0000_s1025""#));
        let rels = &parts["xl/worksheets/_rels/sheet2.xml.rels"];
        assert!(rels.contains(r#"Target="../drawings/vmlDrawing1.vml""#));
        assert!(rels.contains(r#"Target="../comments1.xml""#));
        assert!(parts["xl/worksheets/sheet2.xml"].contains(r#"<legacyDrawing r:id="rId1"/>"#));
    }

    #[test]
    fn test_table_ids_are_workbook_wide() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet().add_table(0, 0, 3, 1, &Table::new()).unwrap();
        workbook.add_worksheet().add_table(0, 0, 3, 1, &Table::new()).unwrap();

        let parts = save(&mut workbook);
        assert!(parts["xl/tables/table1.xml"].contains(r#"id="1" name="Table1""#));
        assert!(parts["xl/tables/table2.xml"].contains(r#"id="2" name="Table2""#));
        assert!(parts["xl/worksheets/_rels/sheet2.xml.rels"].contains(r#"Target="../tables/table2.xml""#));
    }

    #[test]
    fn test_duplicate_table_names_fail() {
        let mut table = Table::new();
        table.set_name("Sales").unwrap();
        let mut workbook = Workbook::new();
        workbook.add_worksheet().add_table(0, 0, 3, 1, &table).unwrap();
        table.set_name("SALES").unwrap();
        workbook.add_worksheet().add_table(0, 0, 3, 1, &table).unwrap();

        let err = workbook.save_to_buffer().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_embedded_images_use_rich_values() {
        let image = Image::new_from_buffer(&png_bytes(8, 8, None)).unwrap();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.embed_image(0, 0, &image).unwrap();
        sheet.embed_image(1, 0, &image).unwrap();

        let parts = save(&mut workbook);
        assert!(parts["xl/worksheets/sheet1.xml"].contains(r#"vm="2""#));
        assert!(parts["xl/metadata.xml"].contains(r#"<valueMetadata count="2">"#));
        assert!(parts["xl/richData/rdrichvalue.xml"].contains(r#"<rv s="0"><v>0</v><v>5</v></rv>"#));
        assert!(parts["xl/richData/_rels/richValueRel.xml.rels"].contains(r#"Target="../media/image1.png""#));
        let workbook_rels = &parts["xl/_rels/workbook.xml.rels"];
        assert!(workbook_rels.contains(r#"Target="metadata.xml""#));
        assert!(workbook_rels.contains(r#"Target="richData/rdRichValueTypes.xml""#));
    }

    #[test]
    fn test_print_titles_and_unknown_sheet_names() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_repeat_rows(0, 0).unwrap();
        sheet.set_repeat_columns(0, 1).unwrap();

        let parts = save(&mut workbook);
        assert!(parts["xl/workbook.xml"].contains(r#"<definedName name="_xlnm.Print_Titles" localSheetId="0">Sheet1!$A:$B,Sheet1!$1:$1</definedName>"#));

        workbook.define_name("Other!Rate", "=1").unwrap();
        let err = workbook.save_to_buffer().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_area_ref_collapses_full_ranges() {
        assert_eq!(area_ref(0, 0, 9, 3), "$A$1:$D$10");
        assert_eq!(area_ref(0, 0, ROW_MAX - 1, 1), "$A:$B");
        assert_eq!(area_ref(4, 0, 5, COL_MAX - 1), "$5:$6");
    }
}
