//! Part writers for the `.xlsx` package.
//!
//! Each module renders one kind of part to a string; [`package`] drives them
//! when a workbook is saved.

pub(crate) mod comments;
pub(crate) mod drawing;
pub(crate) mod package;
pub(crate) mod rich_data;
pub(crate) mod sheet;
pub(crate) mod strings;
pub(crate) mod styles;
pub(crate) mod table;
pub(crate) mod theme;
pub(crate) mod vml;
pub(crate) mod workbook;
