/// Provides the PackURI value type used to name parts inside a package.
///
/// A PackURI always begins with a forward slash and uses forward slashes as
/// path separators. Its ZIP member name is the URI without the leading slash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    /// The full pack URI string (e.g., "/xl/workbook.xml")
    uri: String,
}

/// The URI of the content types manifest
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

/// The package pseudo-partname, representing the package itself
pub const PACKAGE_URI: &str = "/";

impl PackURI {
    /// Create a new PackURI from a string.
    ///
    /// Fails if the URI doesn't start with a forward slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        Ok(PackURI { uri })
    }

    /// Create a PackURI from a ZIP member name such as `xl/styles.xml`.
    pub fn from_member(member: &str) -> Self {
        PackURI {
            uri: format!("/{}", member.trim_start_matches('/')),
        }
    }

    /// Directory portion, e.g. "/xl/worksheets" for "/xl/worksheets/sheet1.xml".
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// File name portion, e.g. "sheet1.xml".
    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// Extension without the leading period.
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(pos) => &filename[pos + 1..],
            None => "",
        }
    }

    /// ZIP member name (URI with leading slash stripped).
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Relative reference from a base directory URI to this part.
    ///
    /// `/xl/drawings/drawing1.xml` relative to `/xl/worksheets` is
    /// `../drawings/drawing1.xml`.
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == "/" {
            return self.membername().to_string();
        }

        let from_parts: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to_parts: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();

        let common = from_parts
            .iter()
            .zip(to_parts.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut result = "../".repeat(from_parts.len() - common);
        result.push_str(&to_parts[common..].join("/"));
        result
    }

    /// The PackURI of the .rels part for this part.
    ///
    /// `/xl/_rels/workbook.xml.rels` for `/xl/workbook.xml`, and
    /// `/_rels/.rels` for the package itself.
    pub fn rels_uri(&self) -> PackURI {
        let base_uri = self.base_uri();
        let uri = if base_uri == "/" {
            format!("/_rels/{}.rels", self.filename())
        } else {
            format!("{}/_rels/{}.rels", base_uri, self.filename())
        };
        PackURI { uri }
    }

    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl std::fmt::Display for PackURI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_components() {
        let uri = PackURI::new("/xl/worksheets/sheet1.xml").unwrap();
        assert_eq!(uri.base_uri(), "/xl/worksheets");
        assert_eq!(uri.filename(), "sheet1.xml");
        assert_eq!(uri.ext(), "xml");
        assert_eq!(uri.membername(), "xl/worksheets/sheet1.xml");
        assert!(PackURI::new("xl/workbook.xml").is_err());
    }

    #[test]
    fn test_relative_ref() {
        let uri = PackURI::from_member("xl/drawings/drawing1.xml");
        assert_eq!(uri.relative_ref("/xl/worksheets"), "../drawings/drawing1.xml");
        assert_eq!(uri.relative_ref("/xl"), "drawings/drawing1.xml");
        assert_eq!(uri.relative_ref("/"), "xl/drawings/drawing1.xml");
    }

    #[test]
    fn test_rels_uri() {
        let workbook = PackURI::from_member("xl/workbook.xml");
        assert_eq!(workbook.rels_uri().as_str(), "/xl/_rels/workbook.xml.rels");
        let package = PackURI::new(PACKAGE_URI).unwrap();
        assert_eq!(package.rels_uri().as_str(), "/_rels/.rels");
    }
}
