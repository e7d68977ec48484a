//! Legacy VML drawings: note boxes and header/footer images.

use crate::common::num::push_f64;
use crate::common::unit::px_to_pt;
use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use crate::ooxml::xlsx::drawing::{DrawingAnchor, GridMetrics};
use crate::ooxml::xlsx::image::ObjectMovement;
use crate::ooxml::xlsx::note::Note;
use crate::ooxml::xlsx::reference::{COL_MAX, ColNum, ROW_MAX, RowNum};
use std::fmt::Write as FmtWrite;

const VML_ROOT: &str = r#"<xml xmlns:v="urn:schemas-microsoft-com:vml" xmlns:o="urn:schemas-microsoft-com:office:office" xmlns:x="urn:schemas-microsoft-com:office:excel">"#;

/// A note box resolved against the grid.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NoteShape<'a> {
    pub row: RowNum,
    pub col: ColNum,
    pub note: &'a Note,
    pub anchor: DrawingAnchor,
    pub visible: bool,
}

impl<'a> NoteShape<'a> {
    /// Place the box of the note on `(row, col)` the way Excel does: one
    /// column right and slightly above the cell, pulled back near the edges.
    pub(crate) fn resolve(
        grid: &impl GridMetrics,
        row: RowNum,
        col: ColNum,
        note: &'a Note,
        show_all: bool,
    ) -> NoteShape<'a> {
        let (start_row, y_offset) = match row {
            0 => (0, 2.0),
            r if r == ROW_MAX - 3 => (ROW_MAX - 7, 16.0),
            r if r == ROW_MAX - 2 => (ROW_MAX - 6, 16.0),
            r if r == ROW_MAX - 1 => (ROW_MAX - 5, 14.0),
            r => (r - 1, 10.0),
        };
        let (start_col, x_offset) = match col {
            c if c == COL_MAX - 3 => (COL_MAX - 6, 49.0),
            c if c == COL_MAX - 2 => (COL_MAX - 5, 54.0),
            c if c == COL_MAX - 1 => (COL_MAX - 4, 59.0),
            c => (c + 1, 15.0),
        };

        let anchor = DrawingAnchor::resolve(
            grid, start_row, start_col, x_offset, y_offset, note.width, note.height,
        );

        NoteShape {
            row,
            col,
            note,
            anchor,
            visible: note.visible.unwrap_or(show_all),
        }
    }
}

/// A header or footer image.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct HeaderImageShape {
    /// Slot name: `LH`, `CH`, `RH`, `LF`, `CF` or `RF`
    pub slot: &'static str,
    pub r_id: String,
    pub title: String,
    pub width: f64,
    pub height: f64,
}

fn push_layout(xml: &mut String, data_id: u32) -> Result<()> {
    write!(
        xml,
        r#"<o:shapelayout v:ext="edit"><o:idmap v:ext="edit" data="{}"/></o:shapelayout>"#,
        data_id
    )?;
    Ok(())
}

/// Generate `xl/drawings/vmlDrawingN.vml` for the notes of one sheet.
///
/// Shape ids continue from `shape_base`.
pub(crate) fn notes_vml(data_id: u32, shape_base: u32, shapes: &[NoteShape<'_>]) -> Result<String> {
    let mut xml = String::with_capacity(1024 + shapes.len() * 1024);
    xml.push_str(VML_ROOT);
    push_layout(&mut xml, data_id)?;
    xml.push_str(r#"<v:shapetype id="_x0000_t202" coordsize="21600,21600" o:spt="202" path="m,l,21600r21600,l21600,xe"><v:stroke joinstyle="miter"/><v:path gradientshapeok="t" o:connecttype="rect"/></v:shapetype>"#);

    for (index, shape) in shapes.iter().enumerate() {
        let anchor = &shape.anchor;
        let note = shape.note;

        write!(
            xml,
            r##"<v:shape id="_x0000_s{}" type="#_x0000_t202" style="position:absolute;margin-left:"##,
            shape_base + index as u32
        )?;
        push_f64(&mut xml, px_to_pt(anchor.x_abs));
        xml.push_str("pt;margin-top:");
        push_f64(&mut xml, px_to_pt(anchor.y_abs));
        xml.push_str("pt;width:");
        push_f64(&mut xml, px_to_pt(anchor.width));
        xml.push_str("pt;height:");
        push_f64(&mut xml, px_to_pt(anchor.height));
        write!(
            xml,
            "pt;z-index:{};visibility:{}\"",
            index + 1,
            if shape.visible { "visible" } else { "hidden" }
        )?;

        let fill = note.background_color.vml().unwrap_or_else(|| "#ffffe1".to_string());
        write!(xml, r#" fillcolor="{}" o:insetmode="auto""#, fill)?;
        if !note.alt_text.is_empty() {
            write!(xml, r#" alt="{}""#, escape_xml(&note.alt_text))?;
        }
        xml.push('>');

        write!(xml, r#"<v:fill color2="{}"/>"#, fill)?;
        xml.push_str(r#"<v:shadow on="t" color="black" obscured="t"/><v:path o:connecttype="none"/>"#);
        xml.push_str(r#"<v:textbox style="mso-direction-alt:auto"><div style="text-align:left"></div></v:textbox>"#);

        xml.push_str(r#"<x:ClientData ObjectType="Note">"#);
        match note.object_movement {
            ObjectMovement::DontMoveOrSizeWithCells => xml.push_str("<x:MoveWithCells/><x:SizeWithCells/>"),
            ObjectMovement::MoveButDontSizeWithCells => xml.push_str("<x:SizeWithCells/>"),
            _ => {},
        }
        write!(
            xml,
            "<x:Anchor>{}, {}, {}, {}, {}, {}, {}, {}</x:Anchor>",
            anchor.from.col,
            anchor.from.col_offset.round() as i64,
            anchor.from.row,
            anchor.from.row_offset.round() as i64,
            anchor.to.col,
            anchor.to.col_offset.round() as i64,
            anchor.to.row,
            anchor.to.row_offset.round() as i64,
        )?;
        xml.push_str("<x:AutoFill>False</x:AutoFill>");
        write!(xml, "<x:Row>{}</x:Row><x:Column>{}</x:Column>", shape.row, shape.col)?;
        if shape.visible {
            xml.push_str("<x:Visible/>");
        }
        xml.push_str("</x:ClientData></v:shape>");
    }

    xml.push_str("</xml>");
    Ok(xml)
}

/// Generate the VML part referenced by `legacyDrawingHF`.
pub(crate) fn header_images_vml(
    data_id: u32,
    shape_base: u32,
    images: &[HeaderImageShape],
) -> Result<String> {
    let mut xml = String::with_capacity(2048);
    xml.push_str(VML_ROOT);
    push_layout(&mut xml, data_id)?;
    xml.push_str(r#"<v:shapetype id="_x0000_t75" coordsize="21600,21600" o:spt="75" o:preferrelative="t" path="m@4@5l@4@11@9@11@9@5xe" filled="f" stroked="f"><v:stroke joinstyle="miter"/><v:formulas>"#);
    for eqn in [
        "if lineDrawn pixelLineWidth 0",
        "sum @0 1 0",
        "sum 0 0 @1",
        "prod @2 1 2",
        "prod @3 21600 pixelWidth",
        "prod @3 21600 pixelHeight",
        "sum @0 0 1",
        "prod @6 1 2",
        "prod @7 21600 pixelWidth",
        "sum @8 21600 0",
        "prod @7 21600 pixelHeight",
        "sum @10 21600 0",
    ] {
        write!(xml, r#"<v:f eqn="{}"/>"#, eqn)?;
    }
    xml.push_str(r#"</v:formulas><v:path o:extrusionok="f" gradientshapeok="t" o:connecttype="rect"/><o:lock v:ext="edit" aspectratio="t"/></v:shapetype>"#);

    for (index, image) in images.iter().enumerate() {
        write!(
            xml,
            r##"<v:shape id="{}" o:spid="_x0000_s{}" type="#_x0000_t75" style="position:absolute;margin-left:0;margin-top:0;width:"##,
            image.slot,
            shape_base + index as u32
        )?;
        push_f64(&mut xml, px_to_pt(image.width));
        xml.push_str("pt;height:");
        push_f64(&mut xml, px_to_pt(image.height));
        write!(
            xml,
            r#"pt;z-index:{}"><v:imagedata o:relid="{}" o:title="{}"/><o:lock v:ext="edit" rotation="t"/></v:shape>"#,
            index + 1,
            image.r_id,
            escape_xml(&image.title)
        )?;
    }

    xml.push_str("</xml>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Grid;

    impl GridMetrics for Grid {
        fn column_width_px(&self, _col: ColNum) -> u32 {
            64
        }

        fn row_height_px(&self, _row: RowNum) -> u32 {
            20
        }
    }

    #[test]
    fn test_default_note_position() {
        let note = Note::new("Hi");
        let shape = NoteShape::resolve(&Grid, 1, 0, &note, false);
        assert_eq!((shape.anchor.from.row, shape.anchor.from.row_offset), (0, 10.0));
        assert_eq!((shape.anchor.from.col, shape.anchor.from.col_offset), (1, 15.0));
        // 15 + 128 = 143 px: two full columns and 15 px into column 3.
        assert_eq!((shape.anchor.to.col, shape.anchor.to.col_offset), (3, 15.0));
        // 10 + 74 = 84 px: four rows and 4 px into row 4.
        assert_eq!((shape.anchor.to.row, shape.anchor.to.row_offset), (4, 4.0));
        assert!(!shape.visible);
    }

    #[test]
    fn test_note_position_at_edges() {
        let note = Note::new("Edge");
        let top = NoteShape::resolve(&Grid, 0, 0, &note, false);
        assert_eq!((top.anchor.from.row, top.anchor.from.row_offset), (0, 2.0));

        let corner = NoteShape::resolve(&Grid, ROW_MAX - 1, COL_MAX - 1, &note, true);
        assert_eq!(corner.anchor.from.row, ROW_MAX - 5);
        assert_eq!(corner.anchor.from.row_offset, 14.0);
        assert_eq!(corner.anchor.from.col, COL_MAX - 4);
        assert_eq!(corner.anchor.from.col_offset, 59.0);
        assert!(corner.visible);
    }

    #[test]
    fn test_notes_vml() {
        let mut note = Note::new("Hi");
        note.set_visible(true);
        let shape = NoteShape::resolve(&Grid, 1, 0, &note, false);
        let xml = notes_vml(1, 1025, &[shape]).unwrap();

        assert!(xml.contains(r#"<o:idmap v:ext="edit" data="1"/>"#));
        assert!(xml.contains(r##"<v:shape id="_x0000_s1025" type="#_x0000_t202""##));
        assert!(xml.contains("margin-left:59.25pt;margin-top:7.5pt;width:96pt;height:55.5pt;z-index:1;visibility:visible"));
        assert!(xml.contains(r##"fillcolor="#ffffe1""##));
        assert!(xml.contains("<x:SizeWithCells/><x:Anchor>1, 15, 0, 10, 3, 15, 4, 4</x:Anchor>"));
        assert!(xml.contains("<x:Row>1</x:Row><x:Column>0</x:Column><x:Visible/>"));
    }

    #[test]
    fn test_header_images_vml() {
        let image = HeaderImageShape {
            slot: "CH",
            r_id: "rId1".to_string(),
            title: "logo".to_string(),
            width: 32.0,
            height: 32.0,
        };
        let xml = header_images_vml(2, 2049, &[image]).unwrap();
        assert!(xml.contains(r#"<o:idmap v:ext="edit" data="2"/>"#));
        assert!(xml.contains(r##"<v:shape id="CH" o:spid="_x0000_s2049" type="#_x0000_t75" style="position:absolute;margin-left:0;margin-top:0;width:24pt;height:24pt;z-index:1">"##));
        assert!(xml.contains(r#"<v:imagedata o:relid="rId1" o:title="logo"/>"#));
    }
}
