//! A1-style cell references.
//!
//! Rows and columns are 0-based in the API and 1-based in references.

use crate::ooxml::error::{Result, XlsxError};
use std::fmt::Write as FmtWrite;

/// Row index type (0-based).
pub type RowNum = u32;

/// Column index type (0-based).
pub type ColNum = u16;

/// Number of rows in a worksheet.
pub const ROW_MAX: RowNum = 1_048_576;

/// Number of columns in a worksheet.
pub const COL_MAX: ColNum = 16_384;

/// Fail with a RangeError if `(row, col)` is outside the sheet.
pub(crate) fn check_cell(row: RowNum, col: ColNum) -> Result<()> {
    if row >= ROW_MAX || col >= COL_MAX {
        return Err(XlsxError::range(format!(
            "Cell ({}, {}) is outside the worksheet limits of {} rows and {} columns",
            row, col, ROW_MAX, COL_MAX
        )));
    }
    Ok(())
}

/// Fail unless both corners are inside the sheet and `first <= last`.
pub(crate) fn check_range(
    first_row: RowNum,
    first_col: ColNum,
    last_row: RowNum,
    last_col: ColNum,
) -> Result<()> {
    check_cell(first_row, first_col)?;
    check_cell(last_row, last_col)?;
    if first_row > last_row || first_col > last_col {
        return Err(XlsxError::range(format!(
            "Range {} has its first cell after its last cell",
            range_ref(first_row, first_col, last_row, last_col)
        )));
    }
    Ok(())
}

/// Column letters for a 0-based column: 0 -> `A`, 26 -> `AA`.
pub fn column_name(col: ColNum) -> String {
    let mut letters = [0u8; 3];
    let mut len = 0;
    let mut n = col as u32 + 1;

    while n > 0 {
        n -= 1;
        letters[len] = b'A' + (n % 26) as u8;
        len += 1;
        n /= 26;
    }

    letters[..len].iter().rev().map(|&b| b as char).collect()
}

/// `A1` reference for a 0-based cell.
pub fn cell_ref(row: RowNum, col: ColNum) -> String {
    let mut out = column_name(col);
    let _ = write!(out, "{}", row as u64 + 1);
    out
}

/// `$A$1` reference for a 0-based cell.
pub fn cell_ref_absolute(row: RowNum, col: ColNum) -> String {
    format!("${}${}", column_name(col), row as u64 + 1)
}

/// `A1:B2` range, collapsed to `A1` for a single cell.
pub fn range_ref(first_row: RowNum, first_col: ColNum, last_row: RowNum, last_col: ColNum) -> String {
    if first_row == last_row && first_col == last_col {
        cell_ref(first_row, first_col)
    } else {
        format!(
            "{}:{}",
            cell_ref(first_row, first_col),
            cell_ref(last_row, last_col)
        )
    }
}

/// `$A$1:$B$2` range, collapsed to `$A$1` for a single cell.
pub fn range_ref_absolute(
    first_row: RowNum,
    first_col: ColNum,
    last_row: RowNum,
    last_col: ColNum,
) -> String {
    if first_row == last_row && first_col == last_col {
        cell_ref_absolute(first_row, first_col)
    } else {
        format!(
            "{}:{}",
            cell_ref_absolute(first_row, first_col),
            cell_ref_absolute(last_row, last_col)
        )
    }
}

/// Quote a sheet name for use in a formula when Excel would.
///
/// `Sheet1` stays as is, `My Data` becomes `'My Data'` and embedded quotes
/// are doubled.
pub fn quote_sheet_name(name: &str) -> String {
    if name.starts_with('\'') && name.ends_with('\'') && name.len() > 1 {
        return name.to_string();
    }

    let plain = name
        .chars()
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '.')
        && parse_cell_ref(name).is_none()
        && !looks_like_r1c1(name);

    if plain {
        name.to_string()
    } else {
        format!("'{}'", name.replace('\'', "''"))
    }
}

fn looks_like_r1c1(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    let Some(rest) = upper.strip_prefix('R') else {
        return false;
    };
    let rest = rest.trim_start_matches(|c: char| c.is_ascii_digit());
    match rest.strip_prefix('C') {
        Some(tail) => tail.chars().all(|c| c.is_ascii_digit()),
        None => rest.is_empty(),
    }
}

/// Parse `A1` or `$A$1` into a 0-based `(row, col)`.
pub fn parse_cell_ref(reference: &str) -> Option<(RowNum, ColNum)> {
    let s = reference.strip_prefix('$').unwrap_or(reference);
    let letters_end = s
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(s.len());
    let (letters, digits) = s.split_at(letters_end);
    let digits = digits.strip_prefix('$').unwrap_or(digits);

    if letters.is_empty() || letters.len() > 3 || digits.is_empty() {
        return None;
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let mut col: u32 = 0;
    for b in letters.bytes() {
        col = col * 26 + (b.to_ascii_uppercase() - b'A' + 1) as u32;
    }
    let row: u32 = digits.parse().ok()?;

    if row == 0 || row > ROW_MAX || col > COL_MAX as u32 {
        return None;
    }
    Some((row - 1, (col - 1) as ColNum))
}

/// A parsed `Sheet1!$A$1:$B$5` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SheetRange {
    pub sheet: String,
    pub first_row: RowNum,
    pub first_col: ColNum,
    pub last_row: RowNum,
    pub last_col: ColNum,
}

/// Parse a sheet-qualified range. The sheet name may be quoted.
pub(crate) fn parse_sheet_range(formula: &str) -> Result<SheetRange> {
    let malformed = || {
        XlsxError::parse(format!(
            "Cannot parse range '{}': expected Sheet1!$A$1:$B$2",
            formula
        ))
    };

    let formula = formula.trim().strip_prefix('=').unwrap_or(formula.trim());
    let (sheet, range) = formula.rsplit_once('!').ok_or_else(malformed)?;

    let sheet = match sheet.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
        Some(quoted) => quoted.replace("''", "'"),
        None => sheet.to_string(),
    };
    if sheet.is_empty() {
        return Err(malformed());
    }

    let (first, last) = range.split_once(':').unwrap_or((range, range));
    let (first_row, first_col) = parse_cell_ref(first).ok_or_else(malformed)?;
    let (last_row, last_col) = parse_cell_ref(last).ok_or_else(malformed)?;

    if first_row > last_row || first_col > last_col {
        return Err(malformed());
    }

    Ok(SheetRange {
        sheet,
        first_row,
        first_col,
        last_row,
        last_col,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_name() {
        assert_eq!(column_name(0), "A");
        assert_eq!(column_name(25), "Z");
        assert_eq!(column_name(26), "AA");
        assert_eq!(column_name(701), "ZZ");
        assert_eq!(column_name(702), "AAA");
        assert_eq!(column_name(COL_MAX - 1), "XFD");
    }

    #[test]
    fn test_refs() {
        assert_eq!(cell_ref(0, 0), "A1");
        assert_eq!(cell_ref_absolute(9, 2), "$C$10");
        assert_eq!(range_ref(0, 0, 4, 1), "A1:B5");
        assert_eq!(range_ref(3, 3, 3, 3), "D4");
        assert_eq!(range_ref_absolute(0, 0, 0, 3), "$A$1:$D$1");
    }

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("$XFD$1048576"), Some((ROW_MAX - 1, COL_MAX - 1)));
        assert_eq!(parse_cell_ref("XFE1"), None);
        assert_eq!(parse_cell_ref("A0"), None);
        assert_eq!(parse_cell_ref("1A"), None);
    }

    #[test]
    fn test_quote_sheet_name() {
        assert_eq!(quote_sheet_name("Sheet1"), "Sheet1");
        assert_eq!(quote_sheet_name("My Data"), "'My Data'");
        assert_eq!(quote_sheet_name("Bob's"), "'Bob''s'");
        assert_eq!(quote_sheet_name("A1"), "'A1'");
        assert_eq!(quote_sheet_name("R1C1"), "'R1C1'");
        assert_eq!(quote_sheet_name("2024"), "'2024'");
    }

    #[test]
    fn test_parse_sheet_range() {
        let range = parse_sheet_range("Sheet1!$A$2:$A$7").unwrap();
        assert_eq!(range.sheet, "Sheet1");
        assert_eq!((range.first_row, range.first_col), (1, 0));
        assert_eq!((range.last_row, range.last_col), (6, 0));

        let quoted = parse_sheet_range("='Q1 ''24'!B3").unwrap();
        assert_eq!(quoted.sheet, "Q1 '24");
        assert_eq!((quoted.first_row, quoted.last_row), (2, 2));

        for bad in ["A1:A5", "Sheet1!", "Sheet1!A5:A1", "!A1", "Sheet1!A1:ZZZZ1"] {
            assert!(
                matches!(parse_sheet_range(bad), Err(XlsxError::Parse(_))),
                "{}",
                bad
            );
        }
    }

    #[test]
    fn test_check_range() {
        assert!(check_range(0, 0, 3, 3).is_ok());
        assert!(matches!(check_range(3, 0, 0, 0), Err(XlsxError::Range(_))));
        assert!(matches!(check_cell(ROW_MAX, 0), Err(XlsxError::Range(_))));
    }
}
