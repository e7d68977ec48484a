//! Office Open XML building blocks.
//!
//! The module is organized in layers:
//!
//! 1. **OPC** (`opc`): parts, relationships, content types and the ZIP container
//! 2. **Charts** (`charts`): the DrawingML chart model and its serializer
//! 3. **Spreadsheet** (`xlsx`): workbook, worksheets, formats and part writers
pub mod charts;
pub mod error;
pub mod opc;
pub mod xlsx;

pub use error::{ErrorKind, Result, XlsxError};
