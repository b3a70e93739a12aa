//! Presentation template module.
//!
//! Produces the fixed parts every generated deck carries: one slide master,
//! one slide layout per [`Layout`], the theme, and the presentation-level
//! property parts. These contain the bare minimum structure PowerPoint and
//! LibreOffice require to open the package.

use super::layout::{Frame, Layout};
use crate::common::unit::pt_to_font_size;
use crate::common::xml::escape_xml;
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::fmt::Write as FmtWrite;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const PML_ROOT_NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

/// ID of the slide master in `<p:sldMasterIdLst>`; layout IDs follow it.
pub const SLIDE_MASTER_ID: u32 = 2_147_483_648;

/// Theme palette: dk1, lt1, dk2, lt2, accent1-6, hlink, folHlink.
const COLOR_SCHEME: [(&str, &str); 12] = [
    ("dk1", "000000"),
    ("lt1", "FFFFFF"),
    ("dk2", "1F3864"),
    ("lt2", "E7E6E6"),
    ("accent1", "2E75B6"),
    ("accent2", "ED7D31"),
    ("accent3", "A5A5A5"),
    ("accent4", "FFC000"),
    ("accent5", "5B9BD5"),
    ("accent6", "70AD47"),
    ("hlink", "0563C1"),
    ("folHlink", "954F72"),
];

const TITLE_FONT_PT: f64 = 40.0;
const CENTER_TITLE_FONT_PT: f64 = 54.0;
const BODY_FONT_PT: f64 = 24.0;
const SUBTITLE_FONT_PT: f64 = 24.0;

/// Generate the slide master XML.
///
/// The master defines the title and body placeholders, the color mapping,
/// the layout ID list and the default text styles.
pub fn slide_master_xml() -> Result<String> {
    let mut xml = String::with_capacity(8192);

    xml.push_str(XML_DECL);
    write!(xml, "<p:sldMaster {PML_ROOT_NS}>")?;
    xml.push_str("<p:cSld>");
    xml.push_str(r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#);
    xml.push_str("<p:spTree>");
    write_group_props(&mut xml);

    let content = Layout::TitleAndContent;
    write_placeholder(
        &mut xml,
        PlaceholderShape {
            id: 2,
            name: "Title Placeholder 1",
            ph: r#"type="title""#,
            frame: content.title_frame(),
            anchor: "ctr",
            prompt: "Click to edit Master title style",
            lst_style: None,
        },
    )?;
    write_placeholder(
        &mut xml,
        PlaceholderShape {
            id: 3,
            name: "Text Placeholder 2",
            ph: r#"type="body" idx="1""#,
            frame: content.body_frame(),
            anchor: "t",
            prompt: "Click to edit Master text styles",
            lst_style: None,
        },
    )?;

    xml.push_str("</p:spTree>");
    xml.push_str("</p:cSld>");

    xml.push_str(r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#);

    // r:ids match the order the layouts are related in the master's rels
    xml.push_str("<p:sldLayoutIdLst>");
    for (index, layout) in Layout::ALL.iter().enumerate() {
        write!(
            xml,
            r#"<p:sldLayoutId id="{}" r:id="rId{}"/>"#,
            SLIDE_MASTER_ID + layout.number() as u32,
            index + 1
        )?;
    }
    xml.push_str("</p:sldLayoutIdLst>");

    xml.push_str("<p:txStyles>");
    xml.push_str("<p:titleStyle>");
    write!(
        xml,
        r#"<a:lvl1pPr algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPct val="0"/></a:spcBef><a:buNone/><a:defRPr sz="{}" b="1" kern="1200"><a:solidFill><a:schemeClr val="tx2"/></a:solidFill><a:latin typeface="+mj-lt"/><a:ea typeface="+mj-ea"/><a:cs typeface="+mj-cs"/></a:defRPr></a:lvl1pPr>"#,
        pt_to_font_size(TITLE_FONT_PT)
    )?;
    xml.push_str("</p:titleStyle>");

    xml.push_str("<p:bodyStyle>");
    for level in 1..=2u32 {
        let indent = 228_600 * (2 * level - 1);
        let size = pt_to_font_size(BODY_FONT_PT - 4.0 * (level - 1) as f64);
        write!(
            xml,
            r#"<a:lvl{level}pPr marL="{indent}" indent="-228600" algn="l" defTabSz="914400" rtl="0" eaLnBrk="1" latinLnBrk="0" hangingPunct="1"><a:lnSpc><a:spcPct val="90000"/></a:lnSpc><a:spcBef><a:spcPts val="1000"/></a:spcBef><a:buClr><a:schemeClr val="accent1"/></a:buClr><a:buFont typeface="Arial" panose="020B0604020202020204" pitchFamily="34" charset="0"/><a:buChar char="•"/><a:defRPr sz="{size}" kern="1200"><a:solidFill><a:schemeClr val="tx1"/></a:solidFill><a:latin typeface="+mn-lt"/><a:ea typeface="+mn-ea"/><a:cs typeface="+mn-cs"/></a:defRPr></a:lvl{level}pPr>"#
        )?;
    }
    xml.push_str("</p:bodyStyle>");

    xml.push_str("<p:otherStyle>");
    xml.push_str(r#"<a:defPPr><a:defRPr lang="en-US"/></a:defPPr>"#);
    xml.push_str("</p:otherStyle>");
    xml.push_str("</p:txStyles>");

    xml.push_str("</p:sldMaster>");
    Ok(xml)
}

/// Generate the XML of a slide layout part.
pub fn slide_layout_xml(layout: Layout) -> Result<String> {
    let mut xml = String::with_capacity(4096);

    xml.push_str(XML_DECL);
    write!(
        xml,
        r#"<p:sldLayout {PML_ROOT_NS} type="{}" preserve="1">"#,
        layout.layout_type()
    )?;
    write!(xml, r#"<p:cSld name="{}">"#, escape_xml(layout.name()))?;
    xml.push_str("<p:spTree>");
    write_group_props(&mut xml);

    match layout {
        Layout::Title => {
            let title_style = format!(
                r#"<a:lvl1pPr algn="ctr"><a:defRPr sz="{}"/></a:lvl1pPr>"#,
                pt_to_font_size(CENTER_TITLE_FONT_PT)
            );
            let subtitle_style = format!(
                r#"<a:lvl1pPr marL="0" indent="0" algn="ctr"><a:buNone/><a:defRPr sz="{}"><a:solidFill><a:schemeClr val="accent1"/></a:solidFill></a:defRPr></a:lvl1pPr>"#,
                pt_to_font_size(SUBTITLE_FONT_PT)
            );
            write_placeholder(
                &mut xml,
                PlaceholderShape {
                    id: 2,
                    name: "Title 1",
                    ph: layout.title_ph(),
                    frame: layout.title_frame(),
                    anchor: "b",
                    prompt: "Click to edit Master title style",
                    lst_style: Some(&title_style),
                },
            )?;
            write_placeholder(
                &mut xml,
                PlaceholderShape {
                    id: 3,
                    name: "Subtitle 2",
                    ph: layout.body_ph(),
                    frame: layout.body_frame(),
                    anchor: "t",
                    prompt: "Click to edit Master subtitle style",
                    lst_style: Some(&subtitle_style),
                },
            )?;
        },
        Layout::TitleAndContent => {
            write_placeholder(
                &mut xml,
                PlaceholderShape {
                    id: 2,
                    name: "Title 1",
                    ph: layout.title_ph(),
                    frame: layout.title_frame(),
                    anchor: "ctr",
                    prompt: "Click to edit Master title style",
                    lst_style: None,
                },
            )?;
            write_placeholder(
                &mut xml,
                PlaceholderShape {
                    id: 3,
                    name: "Content Placeholder 2",
                    ph: layout.body_ph(),
                    frame: layout.body_frame(),
                    anchor: "t",
                    prompt: "Click to edit Master text styles",
                    lst_style: None,
                },
            )?;
        },
    }

    xml.push_str("</p:spTree>");
    xml.push_str("</p:cSld>");
    xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
    xml.push_str("</p:sldLayout>");
    Ok(xml)
}

/// Generate the theme XML.
pub fn theme_xml() -> Result<String> {
    let mut xml = String::with_capacity(4096);

    xml.push_str(XML_DECL);
    xml.push_str(r#"<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Proposal">"#);
    xml.push_str("<a:themeElements>");

    xml.push_str(r#"<a:clrScheme name="Proposal">"#);
    for (slot, rgb) in COLOR_SCHEME {
        match slot {
            "dk1" => write!(xml, r#"<a:dk1><a:sysClr val="windowText" lastClr="{rgb}"/></a:dk1>"#)?,
            "lt1" => write!(xml, r#"<a:lt1><a:sysClr val="window" lastClr="{rgb}"/></a:lt1>"#)?,
            _ => write!(xml, r#"<a:{slot}><a:srgbClr val="{rgb}"/></a:{slot}>"#)?,
        }
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(r#"<a:fontScheme name="Office">"#);
    xml.push_str(r#"<a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont>"#);
    xml.push_str(r#"<a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont>"#);
    xml.push_str("</a:fontScheme>");

    // The format scheme requires exactly three entries in each list
    xml.push_str(r#"<a:fmtScheme name="Office">"#);
    xml.push_str("<a:fillStyleLst>");
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:fillStyleLst>");
    xml.push_str("<a:lnStyleLst>");
    for width in [6350, 12700, 19050] {
        write!(
            xml,
            r#"<a:ln w="{width}" cap="flat" cmpd="sng" algn="ctr"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:prstDash val="solid"/><a:miter lim="800000"/></a:ln>"#
        )?;
    }
    xml.push_str("</a:lnStyleLst>");
    xml.push_str("<a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst>");
    xml.push_str("<a:bgFillStyleLst>");
    for _ in 0..3 {
        xml.push_str(r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#);
    }
    xml.push_str("</a:bgFillStyleLst>");
    xml.push_str("</a:fmtScheme>");

    xml.push_str("</a:themeElements>");
    xml.push_str("<a:objectDefaults/>");
    xml.push_str("<a:extraClrSchemeLst/>");
    xml.push_str("</a:theme>");
    Ok(xml)
}

/// Generate a minimal valid presProps.xml content.
pub fn pres_props_xml() -> String {
    format!("{XML_DECL}<p:presentationPr {PML_ROOT_NS}/>")
}

/// Generate a minimal valid viewProps.xml content.
pub fn view_props_xml() -> String {
    format!(
        r#"{XML_DECL}<p:viewPr {PML_ROOT_NS}><p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr><p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#
    )
}

/// Generate a minimal valid tableStyles.xml content.
pub fn table_styles_xml() -> String {
    format!(
        r#"{XML_DECL}<a:tblStyleLst xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#
    )
}

/// Generate the core properties part (docProps/core.xml).
pub fn core_props_xml(title: &str, author: &str, created: DateTime<Utc>) -> Result<String> {
    let mut xml = String::with_capacity(1024);
    let timestamp = created.format("%Y-%m-%dT%H:%M:%SZ");

    xml.push_str(XML_DECL);
    xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);
    write!(xml, "<dc:title>{}</dc:title>", escape_xml(title))?;
    if !author.is_empty() {
        write!(xml, "<dc:creator>{}</dc:creator>", escape_xml(author))?;
        write!(xml, "<cp:lastModifiedBy>{}</cp:lastModifiedBy>", escape_xml(author))?;
    }
    xml.push_str("<cp:revision>1</cp:revision>");
    write!(
        xml,
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{timestamp}</dcterms:created>"#
    )?;
    write!(
        xml,
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{timestamp}</dcterms:modified>"#
    )?;
    xml.push_str("</cp:coreProperties>");
    Ok(xml)
}

/// Generate the extended properties part (docProps/app.xml).
pub fn app_props_xml(slide_count: usize) -> Result<String> {
    let mut xml = String::with_capacity(512);

    xml.push_str(XML_DECL);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
    xml.push_str("<TotalTime>0</TotalTime>");
    write!(
        xml,
        "<Application>{} {}</Application>",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    )?;
    xml.push_str("<PresentationFormat>On-screen Show (4:3)</PresentationFormat>");
    write!(xml, "<Slides>{slide_count}</Slides>")?;
    xml.push_str("<Notes>0</Notes>");
    xml.push_str("<HiddenSlides>0</HiddenSlides>");
    xml.push_str("</Properties>");
    Ok(xml)
}

/// The non-visual and geometry properties of the shape tree root.
pub(crate) fn write_group_props(xml: &mut String) {
    xml.push_str("<p:nvGrpSpPr>");
    xml.push_str(r#"<p:cNvPr id="1" name=""/>"#);
    xml.push_str("<p:cNvGrpSpPr/>");
    xml.push_str("<p:nvPr/>");
    xml.push_str("</p:nvGrpSpPr>");
    xml.push_str("<p:grpSpPr>");
    xml.push_str("<a:xfrm>");
    xml.push_str(r#"<a:off x="0" y="0"/>"#);
    xml.push_str(r#"<a:ext cx="0" cy="0"/>"#);
    xml.push_str(r#"<a:chOff x="0" y="0"/>"#);
    xml.push_str(r#"<a:chExt cx="0" cy="0"/>"#);
    xml.push_str("</a:xfrm>");
    xml.push_str("</p:grpSpPr>");
}

struct PlaceholderShape<'a> {
    id: u32,
    name: &'a str,
    ph: &'a str,
    frame: Frame,
    anchor: &'a str,
    prompt: &'a str,
    lst_style: Option<&'a str>,
}

/// Write a placeholder shape as it appears on a master or layout.
fn write_placeholder(xml: &mut String, shape: PlaceholderShape<'_>) -> Result<()> {
    let Frame { x, y, cx, cy } = shape.frame;

    xml.push_str("<p:sp>");
    xml.push_str("<p:nvSpPr>");
    write!(xml, r#"<p:cNvPr id="{}" name="{}"/>"#, shape.id, escape_xml(shape.name))?;
    xml.push_str(r#"<p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>"#);
    write!(xml, "<p:nvPr><p:ph {}/></p:nvPr>", shape.ph)?;
    xml.push_str("</p:nvSpPr>");

    xml.push_str("<p:spPr>");
    write!(
        xml,
        r#"<a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#
    )?;
    xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
    xml.push_str("</p:spPr>");

    xml.push_str("<p:txBody>");
    write!(
        xml,
        r#"<a:bodyPr vert="horz" lIns="91440" tIns="45720" rIns="91440" bIns="45720" rtlCol="0" anchor="{}"><a:normAutofit/></a:bodyPr>"#,
        shape.anchor
    )?;
    match shape.lst_style {
        Some(style) => write!(xml, "<a:lstStyle>{style}</a:lstStyle>")?,
        None => xml.push_str("<a:lstStyle/>"),
    }
    write!(
        xml,
        r#"<a:p><a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r><a:endParaRPr lang="en-US"/></a:p>"#,
        escape_xml(shape.prompt)
    )?;
    xml.push_str("</p:txBody>");
    xml.push_str("</p:sp>");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_master_lists_every_layout() {
        let xml = slide_master_xml().unwrap();
        assert!(xml.contains(r#"<p:sldLayoutId id="2147483649" r:id="rId1"/>"#));
        assert!(xml.contains(r#"<p:sldLayoutId id="2147483650" r:id="rId2"/>"#));
        assert!(xml.contains(r#"<p:ph type="title"/>"#));
        assert!(xml.contains(r#"<p:ph type="body" idx="1"/>"#));
    }

    #[test]
    fn test_layout_placeholders() {
        let title = slide_layout_xml(Layout::Title).unwrap();
        assert!(title.contains(r#"type="title" preserve="1""#));
        assert!(title.contains(r#"<p:cSld name="Title Slide">"#));
        assert!(title.contains(r#"<p:ph type="ctrTitle"/>"#));
        assert!(title.contains(r#"<p:ph type="subTitle" idx="1"/>"#));

        let content = slide_layout_xml(Layout::TitleAndContent).unwrap();
        assert!(content.contains(r#"type="obj""#));
        assert!(content.contains(r#"<p:ph idx="1"/>"#));
    }

    #[test]
    fn test_theme_has_full_color_scheme() {
        let xml = theme_xml().unwrap();
        assert!(xml.contains(r#"<a:accent1><a:srgbClr val="2E75B6"/></a:accent1>"#));
        assert!(xml.contains(r#"<a:folHlink><a:srgbClr val="954F72"/></a:folHlink>"#));
        assert_eq!(xml.matches("<a:effectStyle>").count(), 3);
    }

    #[test]
    fn test_core_props_escape_and_timestamp() {
        let created = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let xml = core_props_xml("R&D <Plan>", "Analytics", created).unwrap();
        assert!(xml.contains("<dc:title>R&amp;D &lt;Plan&gt;</dc:title>"));
        assert!(xml.contains(">2026-03-14T09:30:00Z</dcterms:created>"));
        assert!(xml.contains("<dc:creator>Analytics</dc:creator>"));
    }

    #[test]
    fn test_app_props_slide_count() {
        let xml = app_props_xml(17).unwrap();
        assert!(xml.contains("<Slides>17</Slides>"));
        assert!(xml.contains("<PresentationFormat>On-screen Show (4:3)</PresentationFormat>"));
    }
}
