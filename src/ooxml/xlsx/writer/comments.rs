//! Comments part (`xl/commentsN.xml`) holding the text of cell notes.

use crate::common::num::push_f64;
use crate::common::xml::{XML_DECLARATION, escape_cell_text, escape_xml};
use crate::ooxml::error::Result;
use crate::ooxml::xlsx::note::Note;
use crate::ooxml::xlsx::reference::{ColNum, RowNum, cell_ref};
use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite;

/// Generate the comments XML for the notes of one sheet.
///
/// Authors are listed in order of first use; notes without an author use
/// `default_author`.
pub(crate) fn comments_xml(
    notes: &BTreeMap<(RowNum, ColNum), Note>,
    default_author: &str,
) -> Result<String> {
    let mut authors: Vec<&str> = Vec::new();
    for note in notes.values() {
        let author = note.author_or(default_author);
        if !authors.contains(&author) {
            authors.push(author);
        }
    }

    let mut xml = String::with_capacity(512 + notes.len() * 256);
    xml.push_str(XML_DECLARATION);
    xml.push_str(r#"<comments xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><authors>"#);
    for author in &authors {
        write!(xml, "<author>{}</author>", escape_xml(author))?;
    }
    xml.push_str("</authors><commentList>");

    for (&(row, col), note) in notes {
        let author = note.author_or(default_author);
        let author_id = authors.iter().position(|a| *a == author).unwrap_or(0);
        write!(
            xml,
            r#"<comment ref="{}" authorId="{}"><text>"#,
            cell_ref(row, col),
            author_id
        )?;

        if note.author_prefix {
            xml.push_str("<r>");
            write_run_font(&mut xml, note, true)?;
            write!(xml, "<t>{}:</t></r>", escape_cell_text(author))?;
            xml.push_str("<r>");
            write_run_font(&mut xml, note, false)?;
            write!(
                xml,
                r#"<t xml:space="preserve">{}</t></r>"#,
                escape_cell_text(&format!("\n{}", note.text))
            )?;
        } else {
            xml.push_str("<r>");
            write_run_font(&mut xml, note, false)?;
            write_text(&mut xml, &note.text)?;
            xml.push_str("</r>");
        }

        xml.push_str("</text></comment>");
    }

    xml.push_str("</commentList></comments>");
    Ok(xml)
}

fn write_run_font(xml: &mut String, note: &Note, bold: bool) -> Result<()> {
    xml.push_str("<rPr>");
    if bold {
        xml.push_str("<b/>");
    }
    xml.push_str(r#"<sz val=""#);
    push_f64(xml, note.font_size);
    write!(
        xml,
        r#""/><color indexed="81"/><rFont val="{}"/><family val="{}"/></rPr>"#,
        escape_xml(&note.font_name),
        note.font_family
    )?;
    Ok(())
}

fn write_text(xml: &mut String, text: &str) -> Result<()> {
    let preserve = text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace);
    if preserve {
        write!(xml, r#"<t xml:space="preserve">{}</t>"#, escape_cell_text(text))?;
    } else {
        write!(xml, "<t>{}</t>", escape_cell_text(text))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authors_in_first_use_order() {
        let mut notes = BTreeMap::new();
        notes.insert((0, 0), Note::new("first"));
        let mut second = Note::new("second");
        second.set_author("Ana");
        notes.insert((1, 0), second);
        notes.insert((2, 1), Note::new("third"));

        let xml = comments_xml(&notes, "Author").unwrap();
        assert!(xml.contains("<authors><author>Author</author><author>Ana</author></authors>"));
        assert!(xml.contains(r#"<comment ref="A1" authorId="0">"#));
        assert!(xml.contains(r#"<comment ref="A2" authorId="1">"#));
        assert!(xml.contains(r#"<comment ref="B3" authorId="0">"#));
        assert!(xml.contains(r#"<rPr><sz val="8"/><color indexed="81"/><rFont val="Tahoma"/><family val="2"/></rPr><t>first</t>"#));
    }

    #[test]
    fn test_author_prefix() {
        let mut note = Note::new("Check <this>");
        note.set_author("Ana").add_author_prefix(true);
        let mut notes = BTreeMap::new();
        notes.insert((4, 2), note);

        let xml = comments_xml(&notes, "Author").unwrap();
        assert!(xml.contains("<rPr><b/><sz val=\"8\"/>"));
        assert!(xml.contains("<t>Ana:</t></r>"));
        assert!(xml.contains("<t xml:space=\"preserve\">\nCheck &lt;this&gt;</t>"));
    }
}
