//! Table XML serialization for XLSX.

use crate::common::xml::{XML_DECLARATION, escape_xml};
use crate::ooxml::error::Result;
use crate::ooxml::xlsx::reference::range_ref;
use crate::ooxml::xlsx::table::{PlacedTable, TableFunction};
use std::fmt::Write as FmtWrite;

/// Serialize a placed table as `xl/tables/tableN.xml`.
///
/// `id` is unique across the workbook and `name` is the resolved table name.
pub(crate) fn serialize_table(placed: &PlacedTable, id: u32, name: &str) -> Result<String> {
    let table = &placed.table;
    let mut xml = String::with_capacity(1024 + placed.column_names.len() * 128);
    xml.push_str(XML_DECLARATION);

    let name = escape_xml(name);
    write!(
        xml,
        r#"<table xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" id="{}" name="{}" displayName="{}" ref="{}""#,
        id,
        name,
        name,
        range_ref(placed.first_row, placed.first_col, placed.last_row, placed.last_col)
    )?;
    if !table.header_row {
        xml.push_str(r#" headerRowCount="0""#);
    }
    if table.total_row {
        xml.push_str(r#" totalsRowCount="1""#);
    } else {
        xml.push_str(r#" totalsRowShown="0""#);
    }
    xml.push('>');

    // The filter never covers the totals row
    if table.header_row && table.autofilter {
        let filter_last_row = if table.total_row {
            placed.last_row - 1
        } else {
            placed.last_row
        };
        write!(
            xml,
            r#"<autoFilter ref="{}"/>"#,
            range_ref(placed.first_row, placed.first_col, filter_last_row, placed.last_col)
        )?;
    }

    write!(xml, r#"<tableColumns count="{}">"#, placed.column_names.len())?;
    for (index, column_name) in placed.column_names.iter().enumerate() {
        let column = table.columns.get(index);
        write!(
            xml,
            r#"<tableColumn id="{}" name="{}""#,
            index + 1,
            escape_xml(column_name)
        )?;

        let total_function = column.and_then(|c| c.total_function.as_ref());
        if table.total_row {
            match (total_function, column.and_then(|c| c.total_label.as_deref())) {
                (Some(function), _) => {
                    write!(xml, r#" totalsRowFunction="{}""#, function.as_str())?
                },
                (None, Some(label)) => write!(xml, r#" totalsRowLabel="{}""#, escape_xml(label))?,
                (None, None) => {},
            }
        }

        let formula = column.and_then(|c| c.formula.as_ref());
        let custom_total = match total_function {
            Some(TableFunction::Custom(formula)) if table.total_row => Some(formula),
            _ => None,
        };
        if formula.is_none() && custom_total.is_none() {
            xml.push_str("/>");
            continue;
        }

        xml.push('>');
        if let Some(formula) = formula {
            write!(
                xml,
                "<calculatedColumnFormula>{}</calculatedColumnFormula>",
                escape_xml(&formula.expression)
            )?;
        }
        if let Some(formula) = custom_total {
            write!(
                xml,
                "<totalsRowFormula>{}</totalsRowFormula>",
                escape_xml(&formula.expression)
            )?;
        }
        xml.push_str("</tableColumn>");
    }
    xml.push_str("</tableColumns>");

    xml.push_str("<tableStyleInfo");
    if let Some(style) = table.style.as_str() {
        write!(xml, r#" name="{}""#, style)?;
    }
    write!(
        xml,
        r#" showFirstColumn="{}" showLastColumn="{}" showRowStripes="{}" showColumnStripes="{}"/>"#,
        table.first_column as u8,
        table.last_column as u8,
        table.banded_rows as u8,
        table.banded_columns as u8
    )?;

    xml.push_str("</table>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::xlsx::cell::Formula;
    use crate::ooxml::xlsx::table::{Table, TableColumn, TableStyle};

    fn placed(table: Table, names: &[&str]) -> PlacedTable {
        PlacedTable {
            table,
            column_names: names.iter().map(|n| n.to_string()).collect(),
            first_row: 1,
            first_col: 1,
            last_row: 5,
            last_col: names.len() as u16,
        }
    }

    #[test]
    fn test_default_table() {
        let xml = serialize_table(&placed(Table::new(), &["Region", "Sales"]), 1, "Table1").unwrap();
        assert!(xml.contains(r#"id="1" name="Table1" displayName="Table1" ref="B2:C6" totalsRowShown="0">"#));
        assert!(xml.contains(r#"<autoFilter ref="B2:C6"/>"#));
        assert!(xml.contains(r#"<tableColumns count="2"><tableColumn id="1" name="Region"/><tableColumn id="2" name="Sales"/></tableColumns>"#));
        assert!(xml.contains(r#"<tableStyleInfo name="TableStyleMedium9" showFirstColumn="0" showLastColumn="0" showRowStripes="1" showColumnStripes="0"/>"#));
    }

    #[test]
    fn test_totals_and_formulas() {
        let mut table = Table::new();
        table.set_total_row(true).set_style(TableStyle::None).set_columns(&[
            TableColumn::new().set_total_label("Total"),
            TableColumn::new().set_total_function(TableFunction::Sum),
            TableColumn::new()
                .set_formula(Formula::new("=[@Sales]*2"))
                .set_total_function(TableFunction::Custom(Formula::new("SUM([Double])"))),
        ]);
        let xml = serialize_table(&placed(table, &["Region", "Sales", "Double"]), 3, "Sales").unwrap();

        assert!(xml.contains(r#"ref="B2:D6" totalsRowCount="1">"#));
        assert!(xml.contains(r#"<autoFilter ref="B2:D5"/>"#));
        assert!(xml.contains(r#"<tableColumn id="1" name="Region" totalsRowLabel="Total"/>"#));
        assert!(xml.contains(r#"<tableColumn id="2" name="Sales" totalsRowFunction="sum"/>"#));
        assert!(xml.contains(r#"<tableColumn id="3" name="Double" totalsRowFunction="custom"><calculatedColumnFormula>[@Sales]*2</calculatedColumnFormula><totalsRowFormula>SUM([Double])</totalsRowFormula></tableColumn>"#));
        assert!(xml.contains(r#"<tableStyleInfo showFirstColumn="0""#));
    }

    #[test]
    fn test_headerless_table_has_no_filter() {
        let mut table = Table::new();
        table.set_header_row(false);
        let xml = serialize_table(&placed(table, &["Column1"]), 2, "Table2").unwrap();
        assert!(xml.contains(r#" headerRowCount="0""#));
        assert!(!xml.contains("<autoFilter"));
    }
}
