//! Slide types and implementation for PPTX presentations.

use crate::common::xml::escape_xml;
use crate::error::Result;
use crate::ooxml::pptx::layout::Layout;
use crate::ooxml::pptx::template::write_group_props;
use std::fmt::Write as FmtWrite;

/// A mutable slide in a presentation.
///
/// A slide fills the two placeholders its layout exposes: the title, and
/// the body (the subtitle on a title slide). Geometry and styling are
/// inherited from the layout.
#[derive(Debug, Clone)]
pub struct MutableSlide {
    /// Slide ID (unique identifier within the presentation)
    pub(crate) slide_id: u32,
    /// Layout the slide is based on
    pub(crate) layout: Layout,
    /// Text of the title placeholder
    pub(crate) title: Option<String>,
    /// Text of the body or subtitle placeholder
    pub(crate) body: Option<String>,
}

impl MutableSlide {
    /// Create a new empty slide.
    pub(crate) fn new(slide_id: u32, layout: Layout) -> Self {
        Self {
            slide_id,
            layout,
            title: None,
            body: None,
        }
    }

    /// Get the slide ID.
    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    /// Get the layout of the slide.
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Set the slide title.
    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    /// Get the slide title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Set the body text; on a title slide this is the subtitle.
    ///
    /// Each line becomes a separate paragraph.
    pub fn set_body(&mut self, body: &str) {
        self.body = Some(body.to_string());
    }

    /// Get the body text.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Generate slide XML content.
    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(2048);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
        );
        xml.push_str(
            r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
        );
        xml.push_str(r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">"#);

        xml.push_str("<p:cSld>");
        xml.push_str("<p:spTree>");
        write_group_props(&mut xml);

        // Group shape uses id=1, so placeholders start at 2
        if let Some(ref title) = self.title {
            write_text_placeholder(&mut xml, 2, "Title 1", self.layout.title_ph(), title)?;
        }
        if let Some(ref body) = self.body {
            write_text_placeholder(
                &mut xml,
                3,
                self.layout.body_shape_name(),
                self.layout.body_ph(),
                body,
            )?;
        }

        xml.push_str("</p:spTree>");
        xml.push_str("</p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        Ok(xml)
    }
}

/// Write a placeholder shape whose position comes from the layout.
fn write_text_placeholder(
    xml: &mut String,
    id: u32,
    name: &str,
    ph: &str,
    text: &str,
) -> Result<()> {
    xml.push_str("<p:sp>");
    xml.push_str("<p:nvSpPr>");
    write!(xml, r#"<p:cNvPr id="{}" name="{}"/>"#, id, escape_xml(name))?;
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    write!(xml, "<p:nvPr><p:ph {ph}/></p:nvPr>")?;
    xml.push_str("</p:nvSpPr>");

    xml.push_str("<p:spPr/>");

    xml.push_str("<p:txBody>");
    xml.push_str("<a:bodyPr/>");
    xml.push_str("<a:lstStyle/>");
    for line in text.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            xml.push_str(r#"<a:p><a:endParaRPr lang="en-US" dirty="0"/></a:p>"#);
        } else {
            xml.push_str("<a:p>");
            xml.push_str("<a:r>");
            xml.push_str(r#"<a:rPr lang="en-US" dirty="0"/>"#);
            write!(xml, "<a:t>{}</a:t>", escape_xml(line))?;
            xml.push_str("</a:r>");
            xml.push_str("</a:p>");
        }
    }
    xml.push_str("</p:txBody>");

    xml.push_str("</p:sp>");

    Ok(())
}
