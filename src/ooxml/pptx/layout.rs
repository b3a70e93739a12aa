//! Slide layouts offered by the generated slide master.
//!
//! A layout decides which placeholders a slide exposes. The deck only needs
//! two: a title slide (title + subtitle) and a title-and-content slide
//! (title + body).

use crate::common::unit::inch_to_emu;
use crate::error::Result;
use crate::ooxml::opc::PackURI;
use serde::{Deserialize, Serialize};

/// A slide layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    /// Centered title with a subtitle underneath.
    Title,
    /// Title bar with a bulleted body.
    TitleAndContent,
}

/// Position and size of a placeholder, in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Frame {
    fn inches(x: f64, y: f64, cx: f64, cy: f64) -> Self {
        Self {
            x: inch_to_emu(x),
            y: inch_to_emu(y),
            cx: inch_to_emu(cx),
            cy: inch_to_emu(cy),
        }
    }
}

impl Layout {
    /// All layouts, in slide master order.
    pub const ALL: [Layout; 2] = [Layout::Title, Layout::TitleAndContent];

    /// Display name, used as the `<p:cSld name>` of the layout part.
    pub fn name(self) -> &'static str {
        match self {
            Layout::Title => "Title Slide",
            Layout::TitleAndContent => "Title and Content",
        }
    }

    /// Value of the `type` attribute on `<p:sldLayout>`.
    pub fn layout_type(self) -> &'static str {
        match self {
            Layout::Title => "title",
            Layout::TitleAndContent => "obj",
        }
    }

    /// Inverse of [`layout_type`](Self::layout_type).
    pub fn from_layout_type(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.layout_type() == value)
    }

    /// 1-based position in the slide master's layout list.
    pub fn number(self) -> usize {
        match self {
            Layout::Title => 1,
            Layout::TitleAndContent => 2,
        }
    }

    /// Part name of the layout, e.g. `/ppt/slideLayouts/slideLayout1.xml`.
    pub fn partname(self) -> Result<PackURI> {
        PackURI::new(format!("/ppt/slideLayouts/slideLayout{}.xml", self.number()))
    }

    /// `<p:ph>` attributes of the title placeholder.
    pub(crate) fn title_ph(self) -> &'static str {
        match self {
            Layout::Title => r#"type="ctrTitle""#,
            Layout::TitleAndContent => r#"type="title""#,
        }
    }

    /// `<p:ph>` attributes of the body (or subtitle) placeholder.
    pub(crate) fn body_ph(self) -> &'static str {
        match self {
            Layout::Title => r#"type="subTitle" idx="1""#,
            Layout::TitleAndContent => r#"idx="1""#,
        }
    }

    /// Shape name of the body placeholder on slides using this layout.
    pub(crate) fn body_shape_name(self) -> &'static str {
        match self {
            Layout::Title => "Subtitle 2",
            Layout::TitleAndContent => "Content Placeholder 2",
        }
    }

    /// Title placeholder frame on a 10" x 7.5" slide.
    pub fn title_frame(self) -> Frame {
        match self {
            Layout::Title => Frame::inches(0.75, 2.33, 8.5, 1.61),
            Layout::TitleAndContent => Frame::inches(0.5, 0.3, 9.0, 1.25),
        }
    }

    /// Body placeholder frame on a 10" x 7.5" slide.
    pub fn body_frame(self) -> Frame {
        match self {
            Layout::Title => Frame::inches(1.5, 4.25, 7.0, 1.92),
            Layout::TitleAndContent => Frame::inches(0.5, 1.75, 9.0, 4.95),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_type_round_trip() {
        for layout in Layout::ALL {
            assert_eq!(Layout::from_layout_type(layout.layout_type()), Some(layout));
        }
        assert_eq!(Layout::from_layout_type("twoObj"), None);
    }

    #[test]
    fn test_partnames_follow_master_order() {
        assert_eq!(
            Layout::Title.partname().unwrap().as_str(),
            "/ppt/slideLayouts/slideLayout1.xml"
        );
        assert_eq!(
            Layout::TitleAndContent.partname().unwrap().as_str(),
            "/ppt/slideLayouts/slideLayout2.xml"
        );
    }

    #[test]
    fn test_frames_fit_standard_slide() {
        for layout in Layout::ALL {
            for frame in [layout.title_frame(), layout.body_frame()] {
                assert!(frame.x + frame.cx <= 9_144_000);
                assert!(frame.y + frame.cy <= 6_858_000);
            }
        }
    }

    #[test]
    fn test_title_frames_sit_above_body_frames() {
        for layout in Layout::ALL {
            let (title, body) = (layout.title_frame(), layout.body_frame());
            assert!(title.y + title.cy <= body.y);
        }
        assert_eq!(Layout::TitleAndContent.body_frame().x, 457_200);
    }
}
