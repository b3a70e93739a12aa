//! Presentation writer for PPTX.

use crate::error::{DeckError, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{OpcPackage, PackURI, PackageWriter, Part, Relationships};
use crate::ooxml::pptx::layout::Layout;
use crate::ooxml::pptx::template::{self, SLIDE_MASTER_ID};
use chrono::{DateTime, Utc};
use std::fmt::Write as FmtWrite;
use std::path::Path;

use super::slide::MutableSlide;

/// 4:3 slide width in EMUs (10 inches)
pub const STANDARD_WIDTH: i64 = 9_144_000;
/// 4:3 slide height in EMUs (7.5 inches)
pub const STANDARD_HEIGHT: i64 = 6_858_000;

/// First slide ID; PowerPoint requires IDs of at least 256.
const FIRST_SLIDE_ID: u32 = 256;

/// A mutable PowerPoint presentation for writing.
///
/// Slides are appended with [`add_slide`](Self::add_slide) and the whole
/// document is serialized with [`save`](Self::save) or
/// [`to_bytes`](Self::to_bytes).
#[derive(Debug)]
pub struct MutablePresentation {
    /// Slides in the presentation
    pub(crate) slides: Vec<MutableSlide>,
    /// Slide width in EMUs (English Metric Units, 914400 EMU = 1 inch)
    slide_width: i64,
    /// Slide height in EMUs
    slide_height: i64,
    /// Document title for the core properties
    title: String,
    /// Document author for the core properties
    author: String,
    /// Creation timestamp for the core properties
    created: DateTime<Utc>,
}

impl MutablePresentation {
    /// Create a new empty presentation with on-screen show (4:3) dimensions.
    pub fn new() -> Self {
        Self {
            slides: Vec::new(),
            slide_width: STANDARD_WIDTH,
            slide_height: STANDARD_HEIGHT,
            title: String::new(),
            author: String::new(),
            created: Utc::now(),
        }
    }

    /// Append a new slide based on `layout`.
    pub fn add_slide(&mut self, layout: Layout) -> &mut MutableSlide {
        let slide_id = FIRST_SLIDE_ID + self.slides.len() as u32;
        self.slides.push(MutableSlide::new(slide_id, layout));
        let index = self.slides.len() - 1;
        &mut self.slides[index]
    }

    /// Get the number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// All slides in presentation order.
    pub fn slides(&self) -> &[MutableSlide] {
        &self.slides
    }

    /// Get the slide width in EMUs.
    pub fn slide_width(&self) -> i64 {
        self.slide_width
    }

    /// Get the slide height in EMUs.
    pub fn slide_height(&self) -> i64 {
        self.slide_height
    }

    /// Set the document title stored in the core properties.
    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    /// Set the document author stored in the core properties.
    pub fn set_author(&mut self, author: &str) {
        self.author = author.to_string();
    }

    /// Generate presentation.xml content.
    ///
    /// # Arguments
    /// * `slide_rel_ids` - Relationship IDs of the slides, in slide order
    pub(crate) fn generate_presentation_xml(&self, slide_rel_ids: &[String]) -> Result<String> {
        if slide_rel_ids.len() != self.slides.len() {
            return Err(DeckError::InvalidRelationship(format!(
                "{} slides but {} slide relationships",
                self.slides.len(),
                slide_rel_ids.len()
            )));
        }

        let mut xml = String::with_capacity(1024 + self.slides.len() * 48);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<p:presentation xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main" saveSubsetFonts="1">"#);

        // The master is always the first relationship of the presentation part
        xml.push_str("<p:sldMasterIdLst>");
        write!(xml, r#"<p:sldMasterId id="{SLIDE_MASTER_ID}" r:id="rId1"/>"#)?;
        xml.push_str("</p:sldMasterIdLst>");

        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (slide, rel_id) in self.slides.iter().zip(slide_rel_ids) {
                write!(
                    xml,
                    r#"<p:sldId id="{}" r:id="{}"/>"#,
                    slide.slide_id(),
                    rel_id
                )?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}" type="screen4x3"/>"#,
            self.slide_width, self.slide_height
        )?;
        xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str("</p:presentation>");

        Ok(xml)
    }

    /// Assemble every part of the presentation into an OPC package.
    pub fn to_package(&self) -> Result<OpcPackage> {
        let mut pkg = OpcPackage::new();

        let pres_uri = PackURI::new("/ppt/presentation.xml")?;
        let core_uri = PackURI::new("/docProps/core.xml")?;
        let app_uri = PackURI::new("/docProps/app.xml")?;
        pkg.relate_to(rt::OFFICE_DOCUMENT, &pres_uri);
        pkg.relate_to(rt::CORE_PROPERTIES, &core_uri);
        pkg.relate_to(rt::EXTENDED_PROPERTIES, &app_uri);

        let master_uri = PackURI::new("/ppt/slideMasters/slideMaster1.xml")?;
        let theme_uri = PackURI::new("/ppt/theme/theme1.xml")?;
        let pres_props_uri = PackURI::new("/ppt/presProps.xml")?;
        let view_props_uri = PackURI::new("/ppt/viewProps.xml")?;
        let table_styles_uri = PackURI::new("/ppt/tableStyles.xml")?;

        // Presentation part relationships: master first, then slides
        let pres_base = pres_uri.base_uri();
        let mut pres_rels = Relationships::new();
        pres_rels.add(rt::SLIDE_MASTER, &master_uri.relative_ref(pres_base));
        pres_rels.add(rt::THEME, &theme_uri.relative_ref(pres_base));
        pres_rels.add(rt::PRES_PROPS, &pres_props_uri.relative_ref(pres_base));
        pres_rels.add(rt::VIEW_PROPS, &view_props_uri.relative_ref(pres_base));
        pres_rels.add(rt::TABLE_STYLES, &table_styles_uri.relative_ref(pres_base));

        let mut slide_parts = Vec::with_capacity(self.slides.len());
        let mut slide_rel_ids = Vec::with_capacity(self.slides.len());
        for (index, slide) in self.slides.iter().enumerate() {
            let slide_uri = PackURI::new(format!("/ppt/slides/slide{}.xml", index + 1))?;
            slide_rel_ids.push(pres_rels.add(rt::SLIDE, &slide_uri.relative_ref(pres_base)));

            let layout_uri = slide.layout().partname()?;
            let mut slide_rels = Relationships::new();
            slide_rels.add(rt::SLIDE_LAYOUT, &layout_uri.relative_ref(slide_uri.base_uri()));

            let xml = slide.to_xml()?;
            slide_parts.push(Part::new(slide_uri, ct::PML_SLIDE, xml.into_bytes()).with_rels(slide_rels));
        }

        let pres_xml = self.generate_presentation_xml(&slide_rel_ids)?;
        pkg.add_part(
            Part::new(pres_uri, ct::PML_PRESENTATION_MAIN, pres_xml.into_bytes())
                .with_rels(pres_rels),
        )?;

        // Slide master relates to every layout (in master order) and the theme
        let mut master_rels = Relationships::new();
        for layout in Layout::ALL {
            master_rels.add(
                rt::SLIDE_LAYOUT,
                &layout.partname()?.relative_ref(master_uri.base_uri()),
            );
        }
        master_rels.add(rt::THEME, &theme_uri.relative_ref(master_uri.base_uri()));

        for layout in Layout::ALL {
            let layout_uri = layout.partname()?;
            let mut layout_rels = Relationships::new();
            layout_rels.add(rt::SLIDE_MASTER, &master_uri.relative_ref(layout_uri.base_uri()));
            let xml = template::slide_layout_xml(layout)?;
            pkg.add_part(
                Part::new(layout_uri, ct::PML_SLIDE_LAYOUT, xml.into_bytes()).with_rels(layout_rels),
            )?;
        }

        pkg.add_part(
            Part::new(
                master_uri,
                ct::PML_SLIDE_MASTER,
                template::slide_master_xml()?.into_bytes(),
            )
            .with_rels(master_rels),
        )?;

        for part in slide_parts {
            pkg.add_part(part)?;
        }

        pkg.add_part(Part::new(theme_uri, ct::OFC_THEME, template::theme_xml()?.into_bytes()))?;
        pkg.add_part(Part::new(
            pres_props_uri,
            ct::PML_PRES_PROPS,
            template::pres_props_xml().into_bytes(),
        ))?;
        pkg.add_part(Part::new(
            view_props_uri,
            ct::PML_VIEW_PROPS,
            template::view_props_xml().into_bytes(),
        ))?;
        pkg.add_part(Part::new(
            table_styles_uri,
            ct::PML_TABLE_STYLES,
            template::table_styles_xml().into_bytes(),
        ))?;
        pkg.add_part(Part::new(
            core_uri,
            ct::OPC_CORE_PROPERTIES,
            template::core_props_xml(&self.title, &self.author, self.created)?.into_bytes(),
        ))?;
        pkg.add_part(Part::new(
            app_uri,
            ct::OFC_EXTENDED_PROPERTIES,
            template::app_props_xml(self.slides.len())?.into_bytes(),
        ))?;

        Ok(pkg)
    }

    /// Serialize the presentation to `.pptx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PackageWriter::to_bytes(&self.to_package()?)
    }

    /// Write the presentation to `path`.
    ///
    /// The file is created or truncated; its parent directory must exist.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        PackageWriter::write(path, &self.to_package()?)?;
        log::info!("wrote {} slides to {}", self.slides.len(), path.display());
        Ok(())
    }
}

impl Default for MutablePresentation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_presentation() {
        let pres = MutablePresentation::new();
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_width(), STANDARD_WIDTH);
        assert_eq!(pres.slide_height(), STANDARD_HEIGHT);
    }

    #[test]
    fn test_add_slide_assigns_ids() {
        let mut pres = MutablePresentation::new();
        pres.add_slide(Layout::Title).set_title("First");
        pres.add_slide(Layout::TitleAndContent);
        assert_eq!(pres.slide_count(), 2);
        assert_eq!(pres.slides()[0].slide_id(), 256);
        assert_eq!(pres.slides()[1].slide_id(), 257);
        assert_eq!(pres.slides()[0].title(), Some("First"));
        assert_eq!(pres.slides()[1].layout(), Layout::TitleAndContent);
    }

    #[test]
    fn test_presentation_xml_lists_slides() {
        let mut pres = MutablePresentation::new();
        pres.add_slide(Layout::Title).set_title("Test");

        let xml = pres
            .generate_presentation_xml(&["rId6".to_string()])
            .unwrap();
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId6"/>"#));
        assert!(xml.contains(r#"<p:sldSz cx="9144000" cy="6858000" type="screen4x3"/>"#));

        assert!(pres.generate_presentation_xml(&[]).is_err());
    }

    #[test]
    fn test_package_parts() {
        let mut pres = MutablePresentation::new();
        pres.add_slide(Layout::Title).set_title("Hello");
        pres.add_slide(Layout::TitleAndContent).set_title("World");

        let pkg = pres.to_package().unwrap();
        // presentation, 2 layouts, master, 2 slides, theme, 3 props, core, app
        assert_eq!(pkg.part_count(), 12);

        let pres_part = pkg.part(&PackURI::new("/ppt/presentation.xml").unwrap()).unwrap();
        assert_eq!(pres_part.rels().first_of_type(rt::SLIDE_MASTER).unwrap().r_id(), "rId1");
        assert_eq!(pres_part.rels().get("rId6").unwrap().target_ref(), "slides/slide1.xml");

        let slide2 = pkg.part(&PackURI::new("/ppt/slides/slide2.xml").unwrap()).unwrap();
        assert_eq!(
            slide2.rels().get("rId1").unwrap().target_ref(),
            "../slideLayouts/slideLayout2.xml"
        );
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let pres = MutablePresentation::new();
        let err = pres.save(dir.path().join("nope").join("deck.pptx")).unwrap_err();
        assert!(matches!(err, DeckError::Io(_)));
    }
}
