//! DrawingML part (`xl/drawings/drawingN.xml`) generation.
//!
//! Floating images and charts of one worksheet share one drawing part. Each
//! object is written as an `xdr:twoCellAnchor`.

use crate::common::unit::px_to_emu;
use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::error::Result;
use crate::ooxml::xlsx::drawing::{AnchorCell, DrawingAnchor};
use crate::ooxml::xlsx::image::ObjectMovement;
use std::fmt::Write as FmtWrite;

/// What a drawing object shows.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum DrawingKind {
    Picture { r_id: String, decorative: bool },
    Chart { r_id: String },
}

/// One resolved object of a drawing part.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DrawingObject {
    pub anchor: DrawingAnchor,
    pub movement: ObjectMovement,
    pub name: String,
    pub description: String,
    pub kind: DrawingKind,
}

/// Generate the drawing XML for `objects` in insertion order.
pub(crate) fn drawing_xml(objects: &[DrawingObject]) -> Result<String> {
    let mut xml = String::with_capacity(1024 + objects.len() * 1024);
    xml.push_str(XML_DECLARATION);
    xml.push_str(r#"<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#);

    for (index, object) in objects.iter().enumerate() {
        // Shape id 1 is the drawing itself
        let shape_id = index + 2;

        xml.push_str("<xdr:twoCellAnchor");
        if let Some(edit_as) = object.movement.edit_as() {
            write!(xml, r#" editAs="{}""#, edit_as)?;
        }
        xml.push('>');

        write_anchor_cell(&mut xml, "xdr:from", &object.anchor.from)?;
        write_anchor_cell(&mut xml, "xdr:to", &object.anchor.to)?;

        match &object.kind {
            DrawingKind::Picture { r_id, decorative } => {
                write_picture(&mut xml, object, shape_id, r_id, *decorative)?
            },
            DrawingKind::Chart { r_id } => write_graphic_frame(&mut xml, object, shape_id, r_id)?,
        }

        xml.push_str("<xdr:clientData/></xdr:twoCellAnchor>");
    }

    xml.push_str("</xdr:wsDr>");
    Ok(xml)
}

fn write_anchor_cell(xml: &mut String, tag: &str, cell: &AnchorCell) -> Result<()> {
    write!(
        xml,
        "<{tag}><xdr:col>{}</xdr:col><xdr:colOff>{}</xdr:colOff><xdr:row>{}</xdr:row><xdr:rowOff>{}</xdr:rowOff></{tag}>",
        cell.col,
        cell.col_offset_emu(),
        cell.row,
        cell.row_offset_emu(),
    )?;
    Ok(())
}

fn write_non_visual_props(
    xml: &mut String,
    object: &DrawingObject,
    shape_id: usize,
    decorative: bool,
) -> Result<()> {
    write!(
        xml,
        r#"<xdr:cNvPr id="{}" name="{}""#,
        shape_id,
        escape_xml(&object.name)
    )?;
    if !object.description.is_empty() && !decorative {
        write!(xml, r#" descr="{}""#, escape_xml(&object.description))?;
    }

    if decorative {
        xml.push_str(r#"><a:extLst><a:ext uri="{C183D7F6-B498-43B3-948B-1728B52AA6E4}"><adec:decorative xmlns:adec="http://schemas.microsoft.com/office/drawing/2017/decorative" val="1"/></a:ext></a:extLst></xdr:cNvPr>"#);
    } else {
        xml.push_str("/>");
    }
    Ok(())
}

fn write_picture(
    xml: &mut String,
    object: &DrawingObject,
    shape_id: usize,
    r_id: &str,
    decorative: bool,
) -> Result<()> {
    xml.push_str("<xdr:pic><xdr:nvPicPr>");
    write_non_visual_props(xml, object, shape_id, decorative)?;
    xml.push_str(r#"<xdr:cNvPicPr><a:picLocks noChangeAspect="1"/></xdr:cNvPicPr></xdr:nvPicPr>"#);

    write!(
        xml,
        r#"<xdr:blipFill><a:blip xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></xdr:blipFill>"#,
        r_id
    )?;

    let anchor = &object.anchor;
    write!(
        xml,
        r#"<xdr:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></xdr:spPr></xdr:pic>"#,
        px_to_emu(anchor.x_abs),
        px_to_emu(anchor.y_abs),
        px_to_emu(anchor.width),
        px_to_emu(anchor.height),
    )?;
    Ok(())
}

fn write_graphic_frame(
    xml: &mut String,
    object: &DrawingObject,
    shape_id: usize,
    r_id: &str,
) -> Result<()> {
    xml.push_str(r#"<xdr:graphicFrame macro=""><xdr:nvGraphicFramePr>"#);
    write_non_visual_props(xml, object, shape_id, false)?;
    xml.push_str("<xdr:cNvGraphicFramePr/></xdr:nvGraphicFramePr>");
    xml.push_str(r#"<xdr:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></xdr:xfrm>"#);
    write!(
        xml,
        r#"<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/chart"><c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" r:id="{}"/></a:graphicData></a:graphic></xdr:graphicFrame>"#,
        r_id
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xlsx::drawing::GridMetrics;
    use crate::ooxml::xlsx::reference::{ColNum, RowNum};

    struct Grid;

    impl GridMetrics for Grid {
        fn column_width_px(&self, _col: ColNum) -> u32 {
            64
        }

        fn row_height_px(&self, _row: RowNum) -> u32 {
            20
        }
    }

    fn picture(movement: ObjectMovement, decorative: bool) -> DrawingObject {
        DrawingObject {
            anchor: DrawingAnchor::resolve(&Grid, 1, 2, 0.0, 0.0, 100.0, 50.0),
            movement,
            name: "Picture 1".to_string(),
            description: "logo.png".to_string(),
            kind: DrawingKind::Picture {
                r_id: "rId1".to_string(),
                decorative,
            },
        }
    }

    #[test]
    fn test_picture_anchor() {
        let xml = drawing_xml(&[picture(ObjectMovement::MoveAndSizeWithCells, false)]).unwrap();
        assert!(xml.contains("<xdr:twoCellAnchor><xdr:from><xdr:col>2</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>1</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>"));
        // 100px from column 2 ends 36px into column 3; 50px from row 1 ends 10px into row 3.
        assert!(xml.contains("<xdr:to><xdr:col>3</xdr:col><xdr:colOff>342900</xdr:colOff><xdr:row>3</xdr:row><xdr:rowOff>95250</xdr:rowOff></xdr:to>"));
        assert!(xml.contains(r#"<xdr:cNvPr id="2" name="Picture 1" descr="logo.png"/>"#));
        assert!(xml.contains(r#"<a:off x="1219200" y="190500"/><a:ext cx="952500" cy="476250"/>"#));
        assert!(xml.contains(r#"r:embed="rId1""#));
    }

    #[test]
    fn test_edit_as_and_decorative() {
        let xml = drawing_xml(&[picture(ObjectMovement::DontMoveOrSizeWithCells, true)]).unwrap();
        assert!(xml.contains(r#"<xdr:twoCellAnchor editAs="absolute">"#));
        assert!(xml.contains(r#"<adec:decorative xmlns:adec="http://schemas.microsoft.com/office/drawing/2017/decorative" val="1"/>"#));
        assert!(!xml.contains("descr="));
    }

    #[test]
    fn test_chart_frame() {
        let chart = DrawingObject {
            kind: DrawingKind::Chart {
                r_id: "rId2".to_string(),
            },
            name: "Chart 1".to_string(),
            description: String::new(),
            ..picture(ObjectMovement::MoveAndSizeWithCells, false)
        };
        let xml = drawing_xml(&[picture(ObjectMovement::MoveButDontSizeWithCells, false), chart]).unwrap();
        assert!(xml.contains(r#"<xdr:twoCellAnchor editAs="oneCell">"#));
        assert!(xml.contains(r#"<xdr:cNvPr id="3" name="Chart 1"/>"#));
        assert!(xml.contains(r#"<c:chart xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" r:id="rId2"/>"#));
    }
}
