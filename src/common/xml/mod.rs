//! XML text helpers shared by every part writer.

mod escape;

pub use escape::{escape_cell_text, escape_xml};

/// Standard XML declaration written at the top of every part.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
