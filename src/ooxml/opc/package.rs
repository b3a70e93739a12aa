/// In-memory OPC package: the set of parts to be serialized into a ZIP file.
use crate::error::{DeckError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::rel::Relationships;

/// A part of the package: a blob with a content type and outgoing relationships.
#[derive(Debug, Clone)]
pub struct Part {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
    rels: Relationships,
}

impl Part {
    /// Create a part with no relationships.
    pub fn new(partname: PackURI, content_type: &str, blob: Vec<u8>) -> Self {
        Self {
            partname,
            content_type: content_type.to_string(),
            blob,
            rels: Relationships::new(),
        }
    }

    /// Attach the part's outgoing relationships.
    pub fn with_rels(mut self, rels: Relationships) -> Self {
        self.rels = rels;
        self
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }
}

/// An OPC package under construction.
///
/// Parts keep their insertion order, which is also the order of the ZIP
/// members after `[Content_Types].xml` and `_rels/.rels`.
#[derive(Debug, Default)]
pub struct OpcPackage {
    rels: Relationships,
    parts: Vec<Part>,
}

impl OpcPackage {
    /// Create an empty package.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package-level relationship (written to `_rels/.rels`).
    pub fn relate_to(&mut self, reltype: &str, partname: &PackURI) -> String {
        let target = partname.relative_ref(PACKAGE_URI);
        self.rels.add(reltype, &target)
    }

    /// Add a part; part names must be unique.
    pub fn add_part(&mut self, part: Part) -> Result<()> {
        if self.part(&part.partname).is_some() {
            return Err(DeckError::Xml(format!("duplicate part name {}", part.partname)));
        }
        self.parts.push(part);
        Ok(())
    }

    /// Package-level relationships.
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Look up a part by name.
    pub fn part(&self, partname: &PackURI) -> Option<&Part> {
        self.parts.iter().find(|p| &p.partname == partname)
    }

    /// Iterate parts in insertion order.
    pub fn iter_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Number of parts, not counting `.rels` parts.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};

    #[test]
    fn test_relate_to_uses_member_name() {
        let mut pkg = OpcPackage::new();
        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        let r_id = pkg.relate_to(rt::OFFICE_DOCUMENT, &pres);
        assert_eq!(r_id, "rId1");
        assert_eq!(pkg.rels().get("rId1").unwrap().target_ref(), "ppt/presentation.xml");
    }

    #[test]
    fn test_duplicate_part_rejected() {
        let mut pkg = OpcPackage::new();
        let name = PackURI::new("/ppt/theme/theme1.xml").unwrap();
        pkg.add_part(Part::new(name.clone(), ct::OFC_THEME, Vec::new()))
            .unwrap();
        assert!(
            pkg.add_part(Part::new(name, ct::OFC_THEME, Vec::new()))
                .is_err()
        );
        assert_eq!(pkg.part_count(), 1);
    }
}
