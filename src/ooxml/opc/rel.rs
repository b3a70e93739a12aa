/// Relationship-related objects for OPC packages.
///
/// A `.rels` part lists the outgoing relationships of one source part. Each
/// relationship has an rId unique within that source, a type URI and a target
/// reference relative to the source part's directory.
use crate::common::xml::escape_xml;
use crate::error::{DeckError, Result};
use quick_xml::Reader;
use quick_xml::events::Event;

/// A single relationship from a source part to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,
    /// Relationship type URI
    reltype: String,
    /// Target reference, relative to the source part
    target_ref: String,
}

impl Relationship {
    /// Create a new relationship.
    pub fn new(r_id: String, reltype: String, target_ref: String) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
        }
    }

    /// Get the relationship ID.
    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    /// Get the relationship type.
    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Get the target reference.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }
}

/// The ordered set of relationships of one source part.
#[derive(Debug, Clone, Default)]
pub struct Relationships {
    rels: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty relationship collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a relationship and return its newly assigned rId.
    ///
    /// rIds are numbered in insertion order starting at `rId1`.
    pub fn add(&mut self, reltype: &str, target_ref: &str) -> String {
        let r_id = format!("rId{}", self.rels.len() + 1);
        self.rels.push(Relationship::new(
            r_id.clone(),
            reltype.to_string(),
            target_ref.to_string(),
        ));
        r_id
    }

    /// Number of relationships.
    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    /// Check whether there are no relationships.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Iterate relationships in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    /// Look up a relationship by rId.
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id == r_id)
    }

    /// First relationship of the given type.
    pub fn first_of_type(&self, reltype: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.reltype == reltype)
    }

    /// Serialize to the XML of a `.rels` part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        for rel in &self.rels {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                escape_xml(&rel.r_id),
                escape_xml(&rel.reltype),
                escape_xml(&rel.target_ref),
            ));
        }

        xml.push_str("</Relationships>");
        xml
    }

    /// Parse the XML of a `.rels` part.
    pub fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut rels = Vec::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut r_id = None;
                    let mut reltype = None;
                    let mut target = None;

                    for attr in e.attributes() {
                        let attr = attr.map_err(|e| DeckError::Xml(e.to_string()))?;
                        let value = attr
                            .decode_and_unescape_value(reader.decoder())
                            .map_err(|e| DeckError::Xml(e.to_string()))?
                            .into_owned();
                        match attr.key.as_ref() {
                            b"Id" => r_id = Some(value),
                            b"Type" => reltype = Some(value),
                            b"Target" => target = Some(value),
                            _ => {},
                        }
                    }

                    match (r_id, reltype, target) {
                        (Some(r_id), Some(reltype), Some(target)) => {
                            rels.push(Relationship::new(r_id, reltype, target));
                        },
                        _ => {
                            return Err(DeckError::InvalidRelationship(
                                "relationship is missing Id, Type or Target".to_string(),
                            ));
                        },
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(DeckError::Xml(e.to_string())),
                _ => {},
            }
            buf.clear();
        }

        Ok(Self { rels })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as rt;

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut rels = Relationships::new();
        assert_eq!(rels.add(rt::SLIDE_MASTER, "slideMasters/slideMaster1.xml"), "rId1");
        assert_eq!(rels.add(rt::THEME, "theme/theme1.xml"), "rId2");
        assert_eq!(rels.len(), 2);
        assert_eq!(rels.get("rId2").unwrap().target_ref(), "theme/theme1.xml");
    }

    #[test]
    fn test_xml_round_trip_preserves_order() {
        let mut rels = Relationships::new();
        rels.add(rt::SLIDE_LAYOUT, "../slideLayouts/slideLayout2.xml");
        rels.add(rt::THEME, "../theme/theme1.xml");

        let parsed = Relationships::from_xml(rels.to_xml().as_bytes()).unwrap();
        let targets: Vec<_> = parsed.iter().map(|r| r.target_ref()).collect();
        assert_eq!(
            targets,
            ["../slideLayouts/slideLayout2.xml", "../theme/theme1.xml"]
        );
        assert_eq!(
            parsed.first_of_type(rt::THEME).unwrap().r_id(),
            "rId2"
        );
    }

    #[test]
    fn test_missing_target_is_rejected() {
        let xml = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="x"/></Relationships>"#;
        assert!(matches!(
            Relationships::from_xml(xml),
            Err(DeckError::InvalidRelationship(_))
        ));
    }
}
