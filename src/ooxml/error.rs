/// Error types for workbook construction and serialization.
use thiserror::Error;

/// Result type for workbook operations.
pub type Result<T> = std::result::Result<T, XlsxError>;

/// Error types for workbook operations.
///
/// The first four variants are the caller-facing kinds: every constructor and
/// setter fails with one of them. The remaining variants only come out of
/// [`Workbook::save_to_buffer`](crate::Workbook::save_to_buffer).
#[derive(Error, Debug)]
pub enum XlsxError {
    /// A coordinate, date or numeric option is outside its valid bounds
    #[error("{0}")]
    Range(String),

    /// Malformed structured-string input (date strings, range formulas, colors)
    #[error("{0}")]
    Parse(String),

    /// The operation is invalid for the current object state
    #[error("{0}")]
    Configuration(String),

    /// A binary payload (image bytes) could not be decoded
    #[error("{0}")]
    Decoding(String),

    /// ZIP container error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Formatting into an XML buffer failed
    #[error("XML write error: {0}")]
    Fmt(#[from] std::fmt::Error),
}

/// Coarse classification of an [`XlsxError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Range,
    Parse,
    Configuration,
    Decoding,
    Io,
}

impl XlsxError {
    /// The kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            XlsxError::Range(_) => ErrorKind::Range,
            XlsxError::Parse(_) => ErrorKind::Parse,
            XlsxError::Configuration(_) => ErrorKind::Configuration,
            XlsxError::Decoding(_) => ErrorKind::Decoding,
            XlsxError::Zip(_) | XlsxError::Io(_) | XlsxError::Fmt(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn range(message: impl Into<String>) -> Self {
        XlsxError::Range(message.into())
    }

    pub(crate) fn parse(message: impl Into<String>) -> Self {
        XlsxError::Parse(message.into())
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        XlsxError::Configuration(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare_message() {
        let err = XlsxError::config("Default format must be set before adding worksheets.");
        assert_eq!(
            err.to_string(),
            "Default format must be set before adding worksheets."
        );
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_io_kinds() {
        let err: XlsxError = std::io::Error::other("disk").into();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().starts_with("IO error"));
    }
}
