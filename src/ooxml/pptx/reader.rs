//! Reading `.pptx` packages back.
//!
//! Used to inspect generated decks: the slide order comes from the
//! `<p:sldIdLst>` of the presentation part, each slide's layout from its
//! slideLayout relationship, and the text from its title and body
//! placeholders.

use crate::common::xml::resolve_entity;
use crate::error::{DeckError, Result};
use crate::ooxml::opc::Relationships;
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::ooxml::pptx::layout::Layout;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

/// What a slide shows: its layout and placeholder text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideSummary {
    /// Part name of the slide, e.g. `/ppt/slides/slide1.xml`
    pub partname: String,
    /// Layout, if it is one this crate generates
    pub layout: Option<Layout>,
    /// `<p:cSld name>` of the layout part
    pub layout_name: String,
    /// Title placeholder text
    pub title: String,
    /// Body or subtitle placeholder text, one line per paragraph
    pub body: String,
}

/// Read access to the parts of a `.pptx` package.
pub struct PackageReader {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl PackageReader {
    /// Open a package from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(bytes)
    }

    /// Open a package held in memory.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Ok(Self {
            archive: ZipArchive::new(Cursor::new(bytes))?,
        })
    }

    /// ZIP member names in archive order.
    pub fn member_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Check whether the package has a part with this name.
    pub fn contains(&self, partname: &PackURI) -> bool {
        self.archive
            .file_names()
            .any(|name| name == partname.membername())
    }

    /// Read the bytes of a part.
    pub fn read_part(&mut self, partname: &PackURI) -> Result<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(partname.membername())
            .map_err(|e| match e {
                zip::result::ZipError::FileNotFound => DeckError::PartNotFound(partname.to_string()),
                other => DeckError::Zip(other),
            })?;
        let mut blob = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut blob)?;
        Ok(blob)
    }

    /// Relationships of a part; empty when the part has no `.rels` part.
    pub fn rels_for(&mut self, partname: &PackURI) -> Result<Relationships> {
        let rels_uri = partname.rels_uri();
        if !self.contains(&rels_uri) {
            return Ok(Relationships::new());
        }
        Relationships::from_xml(&self.read_part(&rels_uri)?)
    }

    /// Part name of the main presentation part.
    pub fn presentation_uri(&mut self) -> Result<PackURI> {
        let root = PackURI::new(PACKAGE_URI)?;
        let rels = self.rels_for(&root)?;
        let rel = rels.first_of_type(rt::OFFICE_DOCUMENT).ok_or_else(|| {
            DeckError::PartNotFound("package has no officeDocument relationship".to_string())
        })?;
        PackURI::from_rel_ref(root.base_uri(), rel.target_ref())
    }

    /// Summaries of all slides in presentation order.
    pub fn slides(&mut self) -> Result<Vec<SlideSummary>> {
        let pres_uri = self.presentation_uri()?;
        let pres_rels = self.rels_for(&pres_uri)?;
        let slide_rel_ids = parse_slide_rel_ids(&self.read_part(&pres_uri)?)?;

        let mut layouts: HashMap<PackURI, LayoutInfo> = HashMap::new();
        let mut slides = Vec::with_capacity(slide_rel_ids.len());

        for r_id in slide_rel_ids {
            let rel = pres_rels.get(&r_id).ok_or_else(|| {
                DeckError::InvalidRelationship(format!("{pres_uri} has no relationship {r_id}"))
            })?;
            let slide_uri = PackURI::from_rel_ref(pres_uri.base_uri(), rel.target_ref())?;

            let slide_rels = self.rels_for(&slide_uri)?;
            let info = match slide_rels.first_of_type(rt::SLIDE_LAYOUT) {
                Some(rel) => {
                    let layout_uri = PackURI::from_rel_ref(slide_uri.base_uri(), rel.target_ref())?;
                    match layouts.get(&layout_uri) {
                        Some(info) => info.clone(),
                        None => {
                            let info = parse_layout_info(&self.read_part(&layout_uri)?)?;
                            layouts.insert(layout_uri, info.clone());
                            info
                        },
                    }
                },
                None => LayoutInfo::default(),
            };

            let text = parse_slide_text(&self.read_part(&slide_uri)?)?;
            slides.push(SlideSummary {
                partname: slide_uri.to_string(),
                layout: info.layout,
                layout_name: info.name,
                title: text.title.unwrap_or_default(),
                body: text.body.unwrap_or_default(),
            });
        }

        log::debug!("read {} slides from {}", slides.len(), pres_uri);
        Ok(slides)
    }

    /// Check the package structure.
    ///
    /// Every member needs a content type, every XML part must be well-formed,
    /// and every relationship target must exist in the package.
    pub fn validate(&mut self) -> Result<()> {
        let names = self.member_names();
        let members: HashSet<&str> = names.iter().map(String::as_str).collect();

        let content_types_uri = PackURI::new(CONTENT_TYPES_URI)?;
        let content_types = ContentTypes::from_xml(&self.read_part(&content_types_uri)?)?;

        for name in names.iter().filter(|name| !name.ends_with('/')) {
            let partname = PackURI::new(format!("/{name}"))?;

            if partname != content_types_uri && content_types.lookup(&partname).is_none() {
                return Err(DeckError::Xml(format!("{partname} has no content type")));
            }

            if !matches!(partname.ext(), "xml" | "rels") {
                continue;
            }
            let blob = self.read_part(&partname)?;
            check_well_formed(&partname, &blob)?;

            if partname.ext() == "rels" {
                let source_base = rels_source_base(&partname);
                for rel in Relationships::from_xml(&blob)?.iter() {
                    let target = PackURI::from_rel_ref(source_base, rel.target_ref())?;
                    if !members.contains(target.membername()) {
                        return Err(DeckError::PartNotFound(format!(
                            "{} in {partname} targets missing part {target}",
                            rel.r_id()
                        )));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Open `path` and summarize its slides.
pub fn read_slides<P: AsRef<Path>>(path: P) -> Result<Vec<SlideSummary>> {
    PackageReader::open(path)?.slides()
}

/// Directory of the part a `.rels` part belongs to:
/// `/ppt/slides/_rels/slide1.xml.rels` belongs to a part in `/ppt/slides`.
fn rels_source_base(rels_uri: &PackURI) -> &str {
    match rels_uri.base_uri().strip_suffix("/_rels") {
        Some("") | None => "/",
        Some(base) => base,
    }
}

fn check_well_formed(partname: &PackURI, xml: &[u8]) -> Result<()> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => return Ok(()),
            Err(e) => return Err(DeckError::Xml(format!("{partname}: {e}"))),
            _ => {},
        }
        buf.clear();
    }
}

/// Content type lookup parsed from `[Content_Types].xml`.
#[derive(Debug, Default)]
struct ContentTypes {
    defaults: HashMap<String, String>,
    overrides: HashMap<String, String>,
}

impl ContentTypes {
    fn from_xml(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut types = Self::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.local_name().as_ref() {
                    b"Default" => {
                        if let (Some(ext), Some(ct)) = (
                            attr_value(&e, &reader, b"Extension")?,
                            attr_value(&e, &reader, b"ContentType")?,
                        ) {
                            types.defaults.insert(ext.to_ascii_lowercase(), ct);
                        }
                    },
                    b"Override" => {
                        if let (Some(partname), Some(ct)) = (
                            attr_value(&e, &reader, b"PartName")?,
                            attr_value(&e, &reader, b"ContentType")?,
                        ) {
                            types.overrides.insert(partname, ct);
                        }
                    },
                    _ => {},
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(e.into()),
                _ => {},
            }
            buf.clear();
        }

        Ok(types)
    }

    fn lookup(&self, partname: &PackURI) -> Option<&str> {
        self.overrides
            .get(partname.as_str())
            .or_else(|| self.defaults.get(&partname.ext().to_ascii_lowercase()))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Default)]
struct LayoutInfo {
    layout: Option<Layout>,
    name: String,
}

fn parse_layout_info(xml: &[u8]) -> Result<LayoutInfo> {
    let mut reader = Reader::from_reader(xml);
    let mut info = LayoutInfo::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"sldLayout" => {
                    info.layout = attr_value(&e, &reader, b"type")?
                        .as_deref()
                        .and_then(Layout::from_layout_type);
                },
                b"cSld" => {
                    info.name = attr_value(&e, &reader, b"name")?.unwrap_or_default();
                    break;
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {},
        }
        buf.clear();
    }

    Ok(info)
}

/// Relationship IDs of `<p:sldId>` entries, in presentation order.
fn parse_slide_rel_ids(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    let mut ids = Vec::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == b"sldId" => {
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| DeckError::Xml(e.to_string()))?;
                    // r:id, as opposed to the unprefixed numeric id
                    if attr.key.prefix().is_some() && attr.key.local_name().as_ref() == b"id" {
                        let value = attr
                            .decode_and_unescape_value(reader.decoder())
                            .map_err(|e| DeckError::Xml(e.to_string()))?;
                        ids.push(value.into_owned());
                    }
                }
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {},
        }
        buf.clear();
    }

    Ok(ids)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Title,
    Body,
    Other,
}

#[derive(Debug, Default)]
struct ShapeText {
    role: Option<Role>,
    paragraphs: Vec<String>,
}

#[derive(Debug, Default)]
struct SlideText {
    title: Option<String>,
    body: Option<String>,
}

impl SlideText {
    /// The first title placeholder and the first body placeholder win.
    fn accept(&mut self, shape: ShapeText) {
        let slot = match shape.role {
            Some(Role::Title) => &mut self.title,
            Some(Role::Body) => &mut self.body,
            _ => return,
        };
        if slot.is_none() {
            *slot = Some(shape.paragraphs.join("\n"));
        }
    }
}

fn placeholder_role(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<Role> {
    // An untyped placeholder is an "obj" placeholder
    let ph_type = attr_value(e, reader, b"type")?.unwrap_or_else(|| "obj".to_string());
    Ok(match ph_type.as_str() {
        "title" | "ctrTitle" => Role::Title,
        "body" | "subTitle" | "obj" => Role::Body,
        _ => Role::Other,
    })
}

fn parse_slide_text(xml: &[u8]) -> Result<SlideText> {
    let mut reader = Reader::from_reader(xml);
    let mut text = SlideText::default();
    let mut shape: Option<ShapeText> = None;
    let mut in_text = false;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"sp" => shape = Some(ShapeText::default()),
                b"ph" => {
                    if let Some(s) = shape.as_mut() {
                        s.role = Some(placeholder_role(&e, &reader)?);
                    }
                },
                b"p" => {
                    if let Some(s) = shape.as_mut() {
                        s.paragraphs.push(String::new());
                    }
                },
                b"t" => in_text = shape.is_some(),
                _ => {},
            },
            Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                b"ph" => {
                    if let Some(s) = shape.as_mut() {
                        s.role = Some(placeholder_role(&e, &reader)?);
                    }
                },
                b"p" => {
                    if let Some(s) = shape.as_mut() {
                        s.paragraphs.push(String::new());
                    }
                },
                _ => {},
            },
            Ok(Event::Text(e)) if in_text => {
                let t = std::str::from_utf8(&e).map_err(|e| DeckError::Xml(e.to_string()))?;
                if let Some(para) = shape.as_mut().and_then(|s| s.paragraphs.last_mut()) {
                    para.push_str(t);
                }
            },
            Ok(Event::GeneralRef(e)) if in_text => {
                let name = std::str::from_utf8(&e).map_err(|e| DeckError::Xml(e.to_string()))?;
                let ch = resolve_entity(name)
                    .ok_or_else(|| DeckError::Xml(format!("unknown entity &{name};")))?;
                if let Some(para) = shape.as_mut().and_then(|s| s.paragraphs.last_mut()) {
                    para.push(ch);
                }
            },
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"sp" => {
                    if let Some(s) = shape.take() {
                        text.accept(s);
                    }
                },
                _ => {},
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {},
        }
        buf.clear();
    }

    Ok(text)
}

fn attr_value(e: &BytesStart<'_>, reader: &Reader<&[u8]>, key: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.map_err(|e| DeckError::Xml(e.to_string()))?;
        if attr.key.as_ref() == key {
            let value = attr
                .decode_and_unescape_value(reader.decoder())
                .map_err(|e| DeckError::Xml(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::pptx::MutablePresentation;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn sample_bytes() -> Vec<u8> {
        let mut pres = MutablePresentation::new();
        let slide = pres.add_slide(Layout::Title);
        slide.set_title("Q3 <Review>");
        slide.set_body("Sales & Ops\nFinance");
        let slide = pres.add_slide(Layout::TitleAndContent);
        slide.set_title("Agenda");
        slide.set_body("  indented\n\nafter blank");
        pres.to_bytes().unwrap()
    }

    #[test]
    fn test_reads_slides_in_order() {
        let mut reader = PackageReader::from_bytes(sample_bytes()).unwrap();
        let slides = reader.slides().unwrap();

        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].partname, "/ppt/slides/slide1.xml");
        assert_eq!(slides[0].layout, Some(Layout::Title));
        assert_eq!(slides[0].layout_name, "Title Slide");
        assert_eq!(slides[0].title, "Q3 <Review>");
        assert_eq!(slides[0].body, "Sales & Ops\nFinance");

        assert_eq!(slides[1].layout, Some(Layout::TitleAndContent));
        assert_eq!(slides[1].layout_name, "Title and Content");
        assert_eq!(slides[1].body, "  indented\n\nafter blank");
    }

    #[test]
    fn test_generated_package_validates() {
        let mut reader = PackageReader::from_bytes(sample_bytes()).unwrap();
        reader.validate().unwrap();
        assert!(reader.contains(&PackURI::new("/ppt/theme/theme1.xml").unwrap()));
    }

    #[test]
    fn test_missing_part_is_reported() {
        let mut reader = PackageReader::from_bytes(sample_bytes()).unwrap();
        let err = reader
            .read_part(&PackURI::new("/ppt/slides/slide9.xml").unwrap())
            .unwrap_err();
        assert!(matches!(err, DeckError::PartNotFound(_)));
    }

    #[test]
    fn test_dangling_relationship_fails_validation() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        zip.start_file("[Content_Types].xml", options).unwrap();
        zip.write_all(br#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/></Types>"#).unwrap();
        zip.start_file("_rels/.rels", options).unwrap();
        zip.write_all(br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="t" Target="ppt/presentation.xml"/></Relationships>"#).unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        let mut reader = PackageReader::from_bytes(bytes).unwrap();
        let err = reader.validate().unwrap_err();
        assert!(err.to_string().contains("missing part /ppt/presentation.xml"));
    }

    #[test]
    fn test_rels_source_base() {
        let slide_rels = PackURI::new("/ppt/slides/_rels/slide1.xml.rels").unwrap();
        assert_eq!(rels_source_base(&slide_rels), "/ppt/slides");
        let root_rels = PackURI::new("/_rels/.rels").unwrap();
        assert_eq!(rels_source_base(&root_rels), "/");
    }

    #[test]
    fn test_slide_text_handles_entities_and_foreign_shapes() {
        let xml = br#"<p:sld xmlns:a="a" xmlns:p="p"><p:cSld><p:spTree>
            <p:sp><p:nvSpPr><p:nvPr/></p:nvSpPr><p:txBody><a:p><a:r><a:t>Loose text</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:nvSpPr><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr><p:txBody><a:p><a:r><a:t>A &amp; B &#x41;</a:t></a:r></a:p></p:txBody></p:sp>
            <p:sp><p:nvSpPr><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:txBody><a:p><a:r><a:t>one</a:t></a:r></a:p><a:p/><a:p><a:r><a:t>two</a:t></a:r></a:p></p:txBody></p:sp>
            </p:spTree></p:cSld></p:sld>"#;
        let text = parse_slide_text(xml).unwrap();
        assert_eq!(text.title.as_deref(), Some("A & B A"));
        assert_eq!(text.body.as_deref(), Some("one\n\ntwo"));
    }
}
