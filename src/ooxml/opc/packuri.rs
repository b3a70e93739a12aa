/// The PackURI value type: a part name within an OPC package.
///
/// PackURIs always begin with a forward slash and use forward slashes as path
/// separators. The ZIP member name is the URI without its leading slash.
use crate::error::{DeckError, Result};

/// A part name such as `/ppt/slides/slide1.xml`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    uri: String,
}

impl PackURI {
    /// Create a new PackURI; the string must begin with a slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(DeckError::PartNotFound(format!(
                "part name must begin with '/', got '{uri}'"
            )));
        }
        Ok(PackURI { uri })
    }

    /// Resolve a relationship target (like `../slideLayouts/slideLayout1.xml`)
    /// against the directory of a source part (like `/ppt/slides`).
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self> {
        if relative_ref.starts_with('/') {
            return Self::new(relative_ref);
        }

        let mut segments: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        for segment in relative_ref.split('/') {
            match segment {
                "" | "." => {},
                ".." => {
                    segments.pop();
                },
                s => segments.push(s),
            }
        }

        Self::new(format!("/{}", segments.join("/")))
    }

    /// Directory portion, e.g. `/ppt/slides` for `/ppt/slides/slide1.xml`.
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Filename portion, e.g. `slide1.xml`.
    pub fn filename(&self) -> &str {
        self.uri.rsplit('/').next().unwrap_or("")
    }

    /// Extension without the leading period.
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        filename.rfind('.').map_or("", |pos| &filename[pos + 1..])
    }

    /// ZIP member name (URI with the leading slash stripped).
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Relative reference from `base_uri` to this part, as written in a
    /// `.rels` Target attribute.
    pub fn relative_ref(&self, base_uri: &str) -> String {
        let from: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();

        let common = from
            .iter()
            .zip(to.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = std::iter::repeat_n("..", from.len() - common).collect();
        parts.extend_from_slice(&to[common..]);
        parts.join("/")
    }

    /// PackURI of the `.rels` part belonging to this part.
    ///
    /// `/ppt/presentation.xml` maps to `/ppt/_rels/presentation.xml.rels`;
    /// the package pseudo-part `/` maps to `/_rels/.rels`.
    pub fn rels_uri(&self) -> PackURI {
        let base = self.base_uri().trim_end_matches('/');
        PackURI {
            uri: format!("{}/_rels/{}.rels", base, self.filename()),
        }
    }

    /// Get the full URI string.
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

/// The package pseudo-partname, representing the package itself
pub const PACKAGE_URI: &str = "/";

/// The URI for the [Content_Types].xml part
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packuri_new() {
        assert!(PackURI::new("/ppt/presentation.xml").is_ok());
        assert!(PackURI::new("ppt/presentation.xml").is_err());
    }

    #[test]
    fn test_components() {
        let uri = PackURI::new("/ppt/slides/slide12.xml").unwrap();
        assert_eq!(uri.base_uri(), "/ppt/slides");
        assert_eq!(uri.filename(), "slide12.xml");
        assert_eq!(uri.ext(), "xml");
        assert_eq!(uri.membername(), "ppt/slides/slide12.xml");

        let root = PackURI::new(PACKAGE_URI).unwrap();
        assert_eq!(root.base_uri(), "/");
        assert_eq!(root.filename(), "");
    }

    #[test]
    fn test_rels_uri() {
        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        assert_eq!(pres.rels_uri().as_str(), "/ppt/_rels/presentation.xml.rels");

        let root = PackURI::new(PACKAGE_URI).unwrap();
        assert_eq!(root.rels_uri().as_str(), "/_rels/.rels");
    }

    #[test]
    fn test_relative_ref_and_back() {
        let layout = PackURI::new("/ppt/slideLayouts/slideLayout2.xml").unwrap();
        let rel = layout.relative_ref("/ppt/slides");
        assert_eq!(rel, "../slideLayouts/slideLayout2.xml");
        assert_eq!(PackURI::from_rel_ref("/ppt/slides", &rel).unwrap(), layout);

        let slide = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        assert_eq!(slide.relative_ref("/ppt"), "slides/slide1.xml");
        assert_eq!(slide.relative_ref("/"), "ppt/slides/slide1.xml");
    }

    #[test]
    fn test_from_rel_ref_absolute_target() {
        let uri = PackURI::from_rel_ref("/ppt/slides", "/docProps/app.xml").unwrap();
        assert_eq!(uri.as_str(), "/docProps/app.xml");
    }
}
