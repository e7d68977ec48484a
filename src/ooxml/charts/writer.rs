//! Chart XML writer.
//!
//! Renders a [`Chart`] into a DrawingML `c:chartSpace` part.

use crate::common::num::fmt_f64;
use crate::common::unit::pt_to_emu_f64;
use crate::common::xml::escape_xml;
use crate::ooxml::charts::axis::{ChartAxis, ChartAxisCrossing};
use crate::ooxml::charts::chart::{Chart, ChartLayout, ChartTitle, TitleText};
use crate::ooxml::charts::format::{ChartFill, ChartFont, ChartFormat, ChartLine};
use crate::ooxml::charts::legend::ChartLegend;
use crate::ooxml::charts::series::{
    ChartDataLabel, ChartMarker, ChartRange, ChartSeries, RangeCache, SeriesName,
};
use crate::ooxml::charts::types::{ChartLineDashType, ChartMarkerType, ChartType};
use crate::ooxml::xlsx::color::Color;
use std::io::Write;

const X_AXIS_ID: u32 = 50010001;
const Y_AXIS_ID: u32 = 50010002;

/// Write a chart to XML.
pub fn write_chart<W: Write>(writer: &mut W, chart: &Chart) -> std::io::Result<()> {
    write!(
        writer,
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#
    )?;
    write!(
        writer,
        r#"<c:chartSpace xmlns:c="http://schemas.openxmlformats.org/drawingml/2006/chart" "#
    )?;
    write!(
        writer,
        r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#
    )?;
    write!(
        writer,
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#
    )?;

    write!(writer, r#"<c:lang val="en-US"/>"#)?;
    write!(writer, r#"<c:style val="{}"/>"#, chart.style)?;

    write!(writer, "<c:chart>")?;

    if chart.title.text.is_some() {
        write_title(writer, &chart.title, 14.0, false)?;
    }
    if chart.title.hidden {
        write!(writer, r#"<c:autoTitleDeleted val="1"/>"#)?;
    }

    write_plot_area(writer, chart)?;

    if !chart.legend.hidden {
        write_legend(writer, &chart.legend)?;
    }

    write!(
        writer,
        r#"<c:plotVisOnly val="{}"/>"#,
        if chart.show_hidden_data { "0" } else { "1" }
    )?;
    write!(
        writer,
        r#"<c:dispBlanksAs val="{}"/>"#,
        chart.show_empty_cells_as.xml_value()
    )?;

    write!(writer, "</c:chart>")?;

    write_shape_properties(writer, &chart.chart_area_format)?;

    write!(writer, "<c:printSettings>")?;
    write!(writer, "<c:headerFooter/>")?;
    write!(
        writer,
        r#"<c:pageMargins b="0.75" l="0.7" r="0.7" t="0.75" header="0.3" footer="0.3"/>"#
    )?;
    write!(writer, "<c:pageSetup/>")?;
    write!(writer, "</c:printSettings>")?;

    write!(writer, "</c:chartSpace>")?;

    Ok(())
}

fn write_title<W: Write>(
    writer: &mut W,
    title: &ChartTitle,
    default_size: f64,
    vertical: bool,
) -> std::io::Result<()> {
    write!(writer, "<c:title>")?;

    let body = if vertical {
        r#"<a:bodyPr rot="-5400000" vert="horz"/>"#
    } else {
        "<a:bodyPr/>"
    };

    match &title.text {
        Some(TitleText::Literal(text)) => {
            let (attributes, children) = run_properties(title.font.as_ref(), default_size, true);
            write!(writer, "<c:tx><c:rich>")?;
            write!(writer, "{}<a:lstStyle/>", body)?;
            write!(
                writer,
                "<a:p><a:pPr><a:defRPr{}>{}</a:defRPr></a:pPr>",
                attributes, children
            )?;
            write!(
                writer,
                r#"<a:r><a:rPr lang="en-US"{}>{}</a:rPr><a:t>{}</a:t></a:r>"#,
                attributes,
                children,
                escape_xml(text)
            )?;
            write!(writer, "</a:p></c:rich></c:tx>")?;
        },
        Some(TitleText::Range(range)) => {
            write!(writer, "<c:tx>")?;
            write_string_ref(writer, range)?;
            write!(writer, "</c:tx>")?;
        },
        None => {},
    }

    if let Some(layout) = &title.layout {
        write_layout(writer, layout, false)?;
    }

    write!(
        writer,
        r#"<c:overlay val="{}"/>"#,
        if title.overlay { "1" } else { "0" }
    )?;

    write_shape_properties(writer, &title.format)?;

    if matches!(title.text, Some(TitleText::Range(_))) {
        let default_font = ChartFont::default();
        let font = title.font.as_ref().unwrap_or(&default_font);
        write_text_properties(writer, Some(font), Some(default_size), true)?;
    }

    write!(writer, "</c:title>")?;

    Ok(())
}

fn write_layout<W: Write>(writer: &mut W, layout: &ChartLayout, inner: bool) -> std::io::Result<()> {
    if layout.is_empty() {
        return write!(writer, "<c:layout/>");
    }

    write!(writer, "<c:layout><c:manualLayout>")?;
    if inner {
        write!(writer, r#"<c:layoutTarget val="inner"/>"#)?;
    }
    write!(writer, r#"<c:xMode val="edge"/><c:yMode val="edge"/>"#)?;
    if let (Some(x), Some(y)) = (layout.x, layout.y) {
        write!(writer, r#"<c:x val="{}"/><c:y val="{}"/>"#, fmt_f64(x), fmt_f64(y))?;
    }
    if let (Some(w), Some(h)) = (layout.width, layout.height) {
        write!(writer, r#"<c:w val="{}"/><c:h val="{}"/>"#, fmt_f64(w), fmt_f64(h))?;
    }
    write!(writer, "</c:manualLayout></c:layout>")?;

    Ok(())
}

fn write_plot_area<W: Write>(writer: &mut W, chart: &Chart) -> std::io::Result<()> {
    write!(writer, "<c:plotArea>")?;

    match &chart.plot_area_layout {
        Some(layout) => write_layout(writer, layout, true)?,
        None => write!(writer, "<c:layout/>")?,
    }

    write_type_group(writer, chart)?;

    if !chart.chart_type.is_pie_like() {
        write_axes(writer, chart)?;
    }

    write_shape_properties(writer, &chart.plot_area_format)?;

    write!(writer, "</c:plotArea>")?;

    Ok(())
}

fn write_type_group<W: Write>(writer: &mut W, chart: &Chart) -> std::io::Result<()> {
    let chart_type = chart.chart_type;
    let element = chart_type.xml_element_name();

    write!(writer, "<{}>", element)?;

    if let Some(direction) = chart_type.bar_direction() {
        write!(writer, r#"<c:barDir val="{}"/>"#, direction)?;
    }
    match chart_type {
        ChartType::Radar | ChartType::RadarWithMarkers | ChartType::RadarFilled => {
            write!(writer, r#"<c:radarStyle val="{}"/>"#, chart_type.radar_style())?;
        },
        _ if chart_type.is_scatter() => {
            write!(writer, r#"<c:scatterStyle val="{}"/>"#, chart_type.scatter_style())?;
        },
        _ => {},
    }
    if let Some(grouping) = chart_type.grouping() {
        write!(writer, r#"<c:grouping val="{}"/>"#, grouping)?;
    }
    if chart_type != ChartType::Stock {
        write!(
            writer,
            r#"<c:varyColors val="{}"/>"#,
            if chart_type.is_pie_like() { "1" } else { "0" }
        )?;
    }

    for (index, series) in chart.series.iter().enumerate() {
        write_series(writer, chart_type, index, series)?;
    }

    match chart_type {
        ChartType::Pie => {
            write!(writer, r#"<c:firstSliceAng val="{}"/>"#, chart.rotation.unwrap_or(0))?;
        },
        ChartType::Doughnut => {
            write!(writer, r#"<c:firstSliceAng val="{}"/>"#, chart.rotation.unwrap_or(0))?;
            write!(writer, r#"<c:holeSize val="{}"/>"#, chart.hole_size.unwrap_or(50))?;
        },
        ChartType::Stock => {
            write!(writer, "<c:hiLowLines/>")?;
            write_axis_ids(writer)?;
        },
        _ if chart_type.bar_direction().is_some() => {
            let gap = chart.series.iter().find_map(|s| s.gap).unwrap_or(150);
            write!(writer, r#"<c:gapWidth val="{}"/>"#, gap)?;
            let overlap = if chart_type.is_stacked() {
                Some(100)
            } else {
                chart.series.iter().find_map(|s| s.overlap)
            };
            if let Some(overlap) = overlap {
                write!(writer, r#"<c:overlap val="{}"/>"#, overlap)?;
            }
            write_axis_ids(writer)?;
        },
        ChartType::Line | ChartType::LineStacked | ChartType::LinePercentStacked => {
            write!(writer, r#"<c:marker val="1"/>"#)?;
            write_axis_ids(writer)?;
        },
        _ => write_axis_ids(writer)?,
    }

    write!(writer, "</{}>", element)?;

    Ok(())
}

fn write_axis_ids<W: Write>(writer: &mut W) -> std::io::Result<()> {
    write!(
        writer,
        r#"<c:axId val="{}"/><c:axId val="{}"/>"#,
        X_AXIS_ID, Y_AXIS_ID
    )
}

fn write_series<W: Write>(
    writer: &mut W,
    chart_type: ChartType,
    index: usize,
    series: &ChartSeries,
) -> std::io::Result<()> {
    write!(writer, "<c:ser>")?;
    write!(writer, r#"<c:idx val="{}"/><c:order val="{}"/>"#, index, index)?;

    match &series.name {
        Some(SeriesName::Text(name)) => {
            write!(writer, "<c:tx><c:v>{}</c:v></c:tx>", escape_xml(name))?;
        },
        Some(SeriesName::Range(range)) => {
            write!(writer, "<c:tx>")?;
            write_string_ref(writer, range)?;
            write!(writer, "</c:tx>")?;
        },
        None => {},
    }

    if series.format.line.is_none() && chart_type.hides_lines() {
        let mut format = series.format.clone();
        let mut line = ChartLine::new();
        line.set_hidden(true);
        format.line = Some(line);
        write!(writer, "<c:spPr>")?;
        write_fill_and_line(writer, &format, Some(28575))?;
        write!(writer, "</c:spPr>")?;
    } else {
        write_shape_properties(writer, &series.format)?;
    }

    let has_markers = matches!(
        chart_type,
        ChartType::Line
            | ChartType::LineStacked
            | ChartType::LinePercentStacked
            | ChartType::Radar
            | ChartType::RadarWithMarkers
            | ChartType::Stock
    ) || chart_type.is_scatter();

    if chart_type.bar_direction().is_some() && series.invert_if_negative {
        write!(writer, r#"<c:invertIfNegative val="1"/>"#)?;
    }

    if has_markers {
        match &series.marker {
            Some(marker) => write_marker(writer, marker)?,
            None if chart_type.hides_markers() => {
                write!(writer, r#"<c:marker><c:symbol val="none"/></c:marker>"#)?;
            },
            None => {},
        }
    }

    for (point_index, point) in series.points.iter().enumerate() {
        if point.format.is_empty() {
            continue;
        }
        write!(writer, "<c:dPt>")?;
        write!(writer, r#"<c:idx val="{}"/>"#, point_index)?;
        if chart_type.is_pie_like() {
            write!(writer, r#"<c:bubble3D val="0"/>"#)?;
        } else if chart_type.bar_direction().is_some() {
            write!(writer, r#"<c:invertIfNegative val="0"/>"#)?;
        }
        write_shape_properties(writer, &point.format)?;
        write!(writer, "</c:dPt>")?;
    }

    if let Some(label) = &series.data_label {
        write_data_labels(writer, label)?;
    }

    let (category_tag, value_tag) = if chart_type.is_scatter() {
        ("c:xVal", "c:yVal")
    } else {
        ("c:cat", "c:val")
    };

    if let Some(categories) = &series.categories {
        write!(writer, "<{}>", category_tag)?;
        match &categories.cache {
            RangeCache::Numbers(_) => write_numeric_ref(writer, categories)?,
            _ => write_string_ref(writer, categories)?,
        }
        write!(writer, "</{}>", category_tag)?;
    }

    if let Some(values) = &series.values {
        write!(writer, "<{}>", value_tag)?;
        write_numeric_ref(writer, values)?;
        write!(writer, "</{}>", value_tag)?;
    }

    let line_like = matches!(
        chart_type,
        ChartType::Line | ChartType::LineStacked | ChartType::LinePercentStacked
    );
    if chart_type.is_scatter() {
        let smooth = series.smooth.unwrap_or(chart_type.is_smooth());
        write!(writer, r#"<c:smooth val="{}"/>"#, if smooth { "1" } else { "0" })?;
    } else if line_like {
        if let Some(smooth) = series.smooth {
            write!(writer, r#"<c:smooth val="{}"/>"#, if smooth { "1" } else { "0" })?;
        }
    }

    write!(writer, "</c:ser>")?;

    Ok(())
}

fn write_marker<W: Write>(writer: &mut W, marker: &ChartMarker) -> std::io::Result<()> {
    write!(writer, "<c:marker>")?;
    if marker.marker_type != ChartMarkerType::Automatic {
        write!(writer, r#"<c:symbol val="{}"/>"#, marker.marker_type.xml_value())?;
    }
    if let Some(size) = marker.size {
        write!(writer, r#"<c:size val="{}"/>"#, size)?;
    }
    write_shape_properties(writer, &marker.format)?;
    write!(writer, "</c:marker>")?;
    Ok(())
}

fn write_data_labels<W: Write>(writer: &mut W, label: &ChartDataLabel) -> std::io::Result<()> {
    write!(writer, "<c:dLbls>")?;

    if let Some(num_format) = &label.num_format {
        write!(
            writer,
            r#"<c:numFmt formatCode="{}" sourceLinked="0"/>"#,
            escape_xml(num_format)
        )?;
    }
    write_shape_properties(writer, &label.format)?;
    if label.font.is_some() {
        write_text_properties(writer, label.font.as_ref(), None, false)?;
    }
    if let Some(position) = label.position {
        write!(writer, r#"<c:dLblPos val="{}"/>"#, position.xml_value())?;
    }

    let flag = |on: bool| if on { "1" } else { "0" };
    write!(writer, r#"<c:showLegendKey val="{}"/>"#, flag(label.show_legend_key))?;
    write!(
        writer,
        r#"<c:showVal val="{}"/>"#,
        flag(label.show_value || label.shows_nothing())
    )?;
    write!(writer, r#"<c:showCatName val="{}"/>"#, flag(label.show_category_name))?;
    write!(writer, r#"<c:showSerName val="{}"/>"#, flag(label.show_series_name))?;
    write!(writer, r#"<c:showPercent val="{}"/>"#, flag(label.show_percentage))?;
    write!(writer, r#"<c:showBubbleSize val="0"/>"#)?;

    write!(writer, "</c:dLbls>")?;
    Ok(())
}

fn write_string_ref<W: Write>(writer: &mut W, range: &ChartRange) -> std::io::Result<()> {
    write!(writer, "<c:strRef>")?;
    write!(writer, "<c:f>{}</c:f>", escape_xml(&range.formula()))?;

    let values: Vec<String> = match &range.cache {
        RangeCache::Empty => Vec::new(),
        RangeCache::Strings(values) => values.clone(),
        RangeCache::Numbers(values) => values
            .iter()
            .map(|v| v.map(fmt_f64).unwrap_or_default())
            .collect(),
    };

    if !values.is_empty() {
        write!(writer, "<c:strCache>")?;
        write!(writer, r#"<c:ptCount val="{}"/>"#, values.len())?;
        for (i, val) in values.iter().enumerate() {
            write!(
                writer,
                r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#,
                i,
                escape_xml(val)
            )?;
        }
        write!(writer, "</c:strCache>")?;
    }

    write!(writer, "</c:strRef>")?;

    Ok(())
}

fn write_numeric_ref<W: Write>(writer: &mut W, range: &ChartRange) -> std::io::Result<()> {
    write!(writer, "<c:numRef>")?;
    write!(writer, "<c:f>{}</c:f>", escape_xml(&range.formula()))?;

    if let RangeCache::Numbers(values) = &range.cache {
        write!(writer, "<c:numCache>")?;
        write!(writer, "<c:formatCode>General</c:formatCode>")?;
        write!(writer, r#"<c:ptCount val="{}"/>"#, values.len())?;
        for (i, val) in values.iter().enumerate() {
            if let Some(val) = val {
                write!(writer, r#"<c:pt idx="{}"><c:v>{}</c:v></c:pt>"#, i, fmt_f64(*val))?;
            }
        }
        write!(writer, "</c:numCache>")?;
    }

    write!(writer, "</c:numRef>")?;

    Ok(())
}

fn write_axes<W: Write>(writer: &mut W, chart: &Chart) -> std::io::Result<()> {
    let chart_type = chart.chart_type;
    let (x_position, y_position) = if chart_type.is_bar() { ("l", "b") } else { ("b", "l") };
    let cross_between = if chart_type.is_scatter()
        || matches!(
            chart_type,
            ChartType::Area | ChartType::AreaStacked | ChartType::AreaPercentStacked
        ) {
        "midCat"
    } else {
        "between"
    };

    if chart_type.is_scatter() {
        write!(writer, "<c:valAx>")?;
    } else {
        write!(writer, "<c:catAx>")?;
    }
    let axis = AxisPlacement {
        id: X_AXIS_ID,
        cross_id: Y_AXIS_ID,
        position: x_position,
        vertical_title: chart_type.is_bar(),
        default_gridlines: false,
        default_num_format: "General",
    };
    write_axis_common(writer, &chart.x_axis, &axis, chart.y_axis.crossing)?;
    if chart_type.is_scatter() {
        write!(writer, r#"<c:crossBetween val="{}"/>"#, cross_between)?;
        write_axis_units(writer, &chart.x_axis)?;
        write!(writer, "</c:valAx>")?;
    } else {
        write!(writer, r#"<c:auto val="1"/>"#)?;
        write!(writer, r#"<c:lblAlgn val="ctr"/>"#)?;
        write!(writer, r#"<c:lblOffset val="100"/>"#)?;
        write!(writer, r#"<c:noMultiLvlLbl val="0"/>"#)?;
        write!(writer, "</c:catAx>")?;
    }

    write!(writer, "<c:valAx>")?;
    let axis = AxisPlacement {
        id: Y_AXIS_ID,
        cross_id: X_AXIS_ID,
        position: y_position,
        vertical_title: !chart_type.is_bar(),
        default_gridlines: true,
        default_num_format: if chart_type.is_percent_stacked() { "0%" } else { "General" },
    };
    write_axis_common(writer, &chart.y_axis, &axis, chart.x_axis.crossing)?;
    write!(writer, r#"<c:crossBetween val="{}"/>"#, cross_between)?;
    write_axis_units(writer, &chart.y_axis)?;
    write!(writer, "</c:valAx>")?;

    Ok(())
}

struct AxisPlacement {
    id: u32,
    cross_id: u32,
    position: &'static str,
    vertical_title: bool,
    default_gridlines: bool,
    default_num_format: &'static str,
}

fn write_axis_common<W: Write>(
    writer: &mut W,
    axis: &ChartAxis,
    placement: &AxisPlacement,
    crossing: ChartAxisCrossing,
) -> std::io::Result<()> {
    write!(writer, r#"<c:axId val="{}"/>"#, placement.id)?;

    write!(writer, "<c:scaling>")?;
    if let Some(base) = axis.log_base {
        write!(writer, r#"<c:logBase val="{}"/>"#, base)?;
    }
    write!(
        writer,
        r#"<c:orientation val="{}"/>"#,
        if axis.reverse { "maxMin" } else { "minMax" }
    )?;
    if let Some(max) = axis.max {
        write!(writer, r#"<c:max val="{}"/>"#, fmt_f64(max))?;
    }
    if let Some(min) = axis.min {
        write!(writer, r#"<c:min val="{}"/>"#, fmt_f64(min))?;
    }
    write!(writer, "</c:scaling>")?;

    write!(
        writer,
        r#"<c:delete val="{}"/>"#,
        if axis.hidden { "1" } else { "0" }
    )?;
    write!(writer, r#"<c:axPos val="{}"/>"#, placement.position)?;

    if axis.major_gridlines.unwrap_or(placement.default_gridlines) {
        match &axis.major_gridlines_line {
            Some(line) => {
                write!(writer, "<c:majorGridlines><c:spPr>")?;
                write_line(writer, line, None)?;
                write!(writer, "</c:spPr></c:majorGridlines>")?;
            },
            None => write!(writer, "<c:majorGridlines/>")?,
        }
    }
    if axis.minor_gridlines {
        write!(writer, "<c:minorGridlines/>")?;
    }

    if axis.title.text.is_some() {
        write_title(writer, &axis.title, 10.0, placement.vertical_title)?;
    }

    match &axis.num_format {
        Some(num_format) => write!(
            writer,
            r#"<c:numFmt formatCode="{}" sourceLinked="0"/>"#,
            escape_xml(num_format)
        )?,
        None => write!(
            writer,
            r#"<c:numFmt formatCode="{}" sourceLinked="1"/>"#,
            placement.default_num_format
        )?,
    }

    write!(writer, r#"<c:majorTickMark val="out"/>"#)?;
    write!(writer, r#"<c:minorTickMark val="none"/>"#)?;
    write!(
        writer,
        r#"<c:tickLblPos val="{}"/>"#,
        axis.label_position.xml_value()
    )?;

    write_shape_properties(writer, &axis.format)?;
    if axis.font.is_some() {
        write_text_properties(writer, axis.font.as_ref(), None, false)?;
    }

    write!(writer, r#"<c:crossAx val="{}"/>"#, placement.cross_id)?;

    match crossing {
        ChartAxisCrossing::Automatic => write!(writer, r#"<c:crosses val="autoZero"/>"#)?,
        ChartAxisCrossing::Min => write!(writer, r#"<c:crosses val="min"/>"#)?,
        ChartAxisCrossing::Max => write!(writer, r#"<c:crosses val="max"/>"#)?,
        ChartAxisCrossing::CategoryNumber(n) => write!(writer, r#"<c:crossesAt val="{}"/>"#, n)?,
        ChartAxisCrossing::AxisValue(v) => {
            write!(writer, r#"<c:crossesAt val="{}"/>"#, fmt_f64(v))?
        },
    }

    Ok(())
}

fn write_axis_units<W: Write>(writer: &mut W, axis: &ChartAxis) -> std::io::Result<()> {
    if let Some(major_unit) = axis.major_unit {
        write!(writer, r#"<c:majorUnit val="{}"/>"#, fmt_f64(major_unit))?;
    }
    if let Some(minor_unit) = axis.minor_unit {
        write!(writer, r#"<c:minorUnit val="{}"/>"#, fmt_f64(minor_unit))?;
    }
    Ok(())
}

fn write_legend<W: Write>(writer: &mut W, legend: &ChartLegend) -> std::io::Result<()> {
    write!(writer, "<c:legend>")?;
    write!(
        writer,
        r#"<c:legendPos val="{}"/>"#,
        legend.position.xml_value()
    )?;
    for entry in &legend.deleted_entries {
        write!(
            writer,
            r#"<c:legendEntry><c:idx val="{}"/><c:delete val="1"/></c:legendEntry>"#,
            entry
        )?;
    }
    if let Some(layout) = &legend.layout {
        write_layout(writer, layout, false)?;
    }
    write!(
        writer,
        r#"<c:overlay val="{}"/>"#,
        if legend.overlay { "1" } else { "0" }
    )?;
    write_shape_properties(writer, &legend.format)?;
    if legend.font.is_some() {
        write_text_properties(writer, legend.font.as_ref(), None, false)?;
    }
    write!(writer, "</c:legend>")?;
    Ok(())
}

/// `c:spPr`, omitted for an empty format.
fn write_shape_properties<W: Write>(writer: &mut W, format: &ChartFormat) -> std::io::Result<()> {
    if format.is_empty() {
        return Ok(());
    }
    write!(writer, "<c:spPr>")?;
    write_fill_and_line(writer, format, None)?;
    write!(writer, "</c:spPr>")?;
    Ok(())
}

fn write_fill_and_line<W: Write>(
    writer: &mut W,
    format: &ChartFormat,
    default_line_width: Option<i64>,
) -> std::io::Result<()> {
    match &format.fill {
        Some(ChartFill::None) => write!(writer, "<a:noFill/>")?,
        Some(ChartFill::Solid(fill)) => {
            write!(
                writer,
                "<a:solidFill>{}</a:solidFill>",
                color_xml(fill.color, fill.transparency)
            )?;
        },
        Some(ChartFill::Pattern(fill)) => {
            let background = if fill.background.is_default() {
                r#"<a:srgbClr val="FFFFFF"/>"#.to_string()
            } else {
                fill.background.drawingml()
            };
            write!(
                writer,
                r#"<a:pattFill prst="{}"><a:fgClr>{}</a:fgClr><a:bgClr>{}</a:bgClr></a:pattFill>"#,
                fill.pattern.xml_value(),
                fill.foreground.drawingml(),
                background
            )?;
        },
        Some(ChartFill::Gradient(fill)) => {
            write!(writer, r#"<a:gradFill rotWithShape="1"><a:gsLst>"#)?;
            for stop in &fill.stops {
                write!(
                    writer,
                    r#"<a:gs pos="{}">{}</a:gs>"#,
                    stop.position as u32 * 1000,
                    stop.color.drawingml()
                )?;
            }
            write!(writer, "</a:gsLst>")?;
            match fill.gradient_type.path() {
                None => write!(
                    writer,
                    r#"<a:lin ang="{}" scaled="0"/>"#,
                    fill.angle as u32 * 60_000
                )?,
                Some(path) => write!(
                    writer,
                    r#"<a:path path="{}"><a:fillToRect l="50000" t="50000" r="50000" b="50000"/></a:path>"#,
                    path
                )?,
            }
            write!(writer, "</a:gradFill>")?;
        },
        None => {},
    }

    if let Some(line) = &format.line {
        write_line(writer, line, default_line_width)?;
    }

    Ok(())
}

fn write_line<W: Write>(
    writer: &mut W,
    line: &ChartLine,
    default_width: Option<i64>,
) -> std::io::Result<()> {
    match line.width.map(pt_to_emu_f64).or(default_width) {
        Some(width) => write!(writer, r#"<a:ln w="{}">"#, width)?,
        None => write!(writer, "<a:ln>")?,
    }

    if line.hidden {
        write!(writer, "<a:noFill/>")?;
    } else if !line.color.is_default() {
        write!(
            writer,
            "<a:solidFill>{}</a:solidFill>",
            color_xml(line.color, line.transparency)
        )?;
    }

    if line.dash_type != ChartLineDashType::Solid {
        write!(writer, r#"<a:prstDash val="{}"/>"#, line.dash_type.xml_value())?;
    }

    write!(writer, "</a:ln>")?;
    Ok(())
}

/// `c:txPr` carrying default run properties for axis labels, legends and
/// data labels.
fn write_text_properties<W: Write>(
    writer: &mut W,
    font: Option<&ChartFont>,
    default_size: Option<f64>,
    default_bold: bool,
) -> std::io::Result<()> {
    let rotation = font.and_then(|f| f.rotation);
    let (mut attributes, children) = match default_size {
        Some(size) => run_properties(font, size, default_bold),
        None => run_properties_without_defaults(font),
    };
    if attributes.is_empty() {
        attributes.push_str(r#" baseline="0""#);
    }

    write!(writer, "<c:txPr>")?;
    match rotation {
        Some(rotation) => write!(
            writer,
            r#"<a:bodyPr rot="{}" vert="horz"/>"#,
            rotation as i32 * 60_000
        )?,
        None => write!(writer, "<a:bodyPr/>")?,
    }
    write!(writer, "<a:lstStyle/>")?;
    write!(
        writer,
        "<a:p><a:pPr><a:defRPr{}>{}</a:defRPr></a:pPr>",
        attributes, children
    )?;
    write!(writer, r#"<a:endParaRPr lang="en-US"/></a:p>"#)?;
    write!(writer, "</c:txPr>")?;
    Ok(())
}

/// Attributes and children of `a:rPr`/`a:defRPr` with title defaults.
fn run_properties(font: Option<&ChartFont>, default_size: f64, default_bold: bool) -> (String, String) {
    let size = font.and_then(|f| f.size).unwrap_or(default_size);
    let bold = font.and_then(|f| f.bold).unwrap_or(default_bold);

    let mut attributes = format!(r#" sz="{}" b="{}""#, (size * 100.0).round() as u32, if bold { 1 } else { 0 });
    let children = font_children(font, &mut attributes);
    (attributes, children)
}

fn run_properties_without_defaults(font: Option<&ChartFont>) -> (String, String) {
    let mut attributes = String::new();
    if let Some(size) = font.and_then(|f| f.size) {
        attributes.push_str(&format!(r#" sz="{}""#, (size * 100.0).round() as u32));
    }
    if let Some(bold) = font.and_then(|f| f.bold) {
        attributes.push_str(if bold { r#" b="1""# } else { r#" b="0""# });
    }
    let children = font_children(font, &mut attributes);
    (attributes, children)
}

fn font_children(font: Option<&ChartFont>, attributes: &mut String) -> String {
    let Some(font) = font else {
        return String::new();
    };
    if font.italic {
        attributes.push_str(r#" i="1""#);
    }
    if font.underline {
        attributes.push_str(r#" u="sng""#);
    }

    let mut children = String::new();
    if !font.color.is_default() {
        children.push_str("<a:solidFill>");
        children.push_str(&font.color.drawingml());
        children.push_str("</a:solidFill>");
    }
    if let Some(name) = &font.name {
        children.push_str(&format!(
            r#"<a:latin typeface="{}"/>"#,
            escape_xml(name)
        ));
    }
    children
}

/// A DrawingML color element, with an alpha child for transparency.
fn color_xml(color: Color, transparency: u8) -> String {
    let xml = color.drawingml();
    if transparency == 0 {
        return xml;
    }
    let alpha = format!(r#"<a:alpha val="{}"/>"#, (100 - transparency as u32) * 1000);

    match xml.rfind("</") {
        Some(end) => format!("{}{}{}", &xml[..end], alpha, &xml[end..]),
        None => {
            let name = xml
                .trim_start_matches('<')
                .split([' ', '/'])
                .next()
                .unwrap_or("a:srgbClr")
                .to_string();
            let open = xml.trim_end_matches("/>");
            format!("{}>{}</{}>", open, alpha, name)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::charts::format::ChartSolidFill;
    use crate::ooxml::charts::types::ChartLegendPosition;

    fn render(chart: &Chart) -> String {
        let mut out = Vec::new();
        write_chart(&mut out, chart).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn column_chart() -> Chart {
        let mut chart = Chart::new(ChartType::Column);
        chart
            .add_series()
            .set_name("Sales")
            .set_categories(&ChartRange::new_from_range("Sheet1", 0, 0, 2, 0))
            .set_values(&ChartRange::new_from_range("Sheet1", 0, 1, 2, 1));
        chart
    }

    #[test]
    fn test_column_chart_structure() {
        let xml = render(&column_chart());
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#));
        assert!(xml.contains(r#"<c:barChart><c:barDir val="col"/><c:grouping val="clustered"/>"#));
        assert!(xml.contains("<c:tx><c:v>Sales</c:v></c:tx>"));
        assert!(xml.contains("<c:cat><c:strRef><c:f>Sheet1!$A$1:$A$3</c:f></c:strRef></c:cat>"));
        assert!(xml.contains("<c:val><c:numRef><c:f>Sheet1!$B$1:$B$3</c:f></c:numRef></c:val>"));
        assert!(xml.contains(r#"<c:axId val="50010001"/><c:axId val="50010002"/>"#));
        assert!(xml.contains("<c:catAx>"));
        assert!(xml.contains(r#"<c:majorGridlines/>"#));
        assert!(xml.ends_with("</c:chartSpace>"));
    }

    #[test]
    fn test_caches_are_written() {
        let mut chart = column_chart();
        chart.series[0].categories.as_mut().unwrap().cache =
            RangeCache::Strings(vec!["Q1".into(), "Q2".into(), "Q3".into()]);
        chart.series[0].values.as_mut().unwrap().cache =
            RangeCache::Numbers(vec![Some(1.5), None, Some(3.0)]);
        let xml = render(&chart);
        assert!(xml.contains(r#"<c:strCache><c:ptCount val="3"/><c:pt idx="0"><c:v>Q1</c:v></c:pt>"#));
        assert!(xml.contains(r#"<c:ptCount val="3"/><c:pt idx="0"><c:v>1.5</c:v></c:pt><c:pt idx="2"><c:v>3</c:v></c:pt>"#));
    }

    #[test]
    fn test_pie_has_no_axes() {
        let mut chart = Chart::new(ChartType::Pie);
        chart
            .add_series()
            .set_values(&ChartRange::new_from_range("Sheet1", 0, 0, 3, 0));
        chart.legend().set_position(ChartLegendPosition::Bottom);
        let xml = render(&chart);
        assert!(xml.contains(r#"<c:pieChart><c:varyColors val="1"/>"#));
        assert!(xml.contains(r#"<c:firstSliceAng val="0"/>"#));
        assert!(!xml.contains("<c:catAx>"));
        assert!(xml.contains(r#"<c:legendPos val="b"/>"#));
    }

    #[test]
    fn test_title_and_formats() {
        let mut chart = column_chart();
        chart.title().set_name("Q & A");
        let mut fill = ChartSolidFill::new();
        fill.set_color(Color::RGB(0xFF0000)).unwrap().set_transparency(25).unwrap();
        let mut format = ChartFormat::new();
        format.set_solid_fill(&fill);
        chart.series[0].set_format(&format);

        let xml = render(&chart);
        assert!(xml.contains("<a:t>Q &amp; A</a:t>"));
        assert!(xml.contains(r#"<a:defRPr sz="1400" b="1">"#));
        assert!(xml.contains(
            r#"<c:spPr><a:solidFill><a:srgbClr val="FF0000"><a:alpha val="75000"/></a:srgbClr></a:solidFill></c:spPr>"#
        ));
    }

    #[test]
    fn test_scatter_series_hide_lines() {
        let mut chart = Chart::new(ChartType::Scatter);
        chart
            .add_series()
            .set_categories(&ChartRange::new_from_range("Sheet1", 0, 0, 3, 0))
            .set_values(&ChartRange::new_from_range("Sheet1", 0, 1, 3, 1));
        let xml = render(&chart);
        assert!(xml.contains(r#"<c:scatterStyle val="lineMarker"/>"#));
        assert!(xml.contains(r#"<c:spPr><a:ln w="28575"><a:noFill/></a:ln></c:spPr>"#));
        assert!(xml.contains("<c:xVal>"));
        assert!(xml.contains(r#"<c:smooth val="0"/>"#));
        assert_eq!(xml.matches("<c:valAx>").count(), 2);
    }

    #[test]
    fn test_color_alpha() {
        assert_eq!(color_xml(Color::RGB(0x00FF00), 0), r#"<a:srgbClr val="00FF00"/>"#);
        assert_eq!(
            color_xml(Color::RGB(0x00FF00), 40),
            r#"<a:srgbClr val="00FF00"><a:alpha val="60000"/></a:srgbClr>"#
        );
        assert!(color_xml(Color::Theme(4, 3), 50).ends_with(r#"<a:alpha val="50000"/></a:schemeClr>"#));
    }
}
