//! PowerPoint (.pptx) presentation support.
//!
//! Writing goes through [`MutablePresentation`]: add slides based on a
//! [`Layout`], fill their placeholders, then save. The generated package has
//! one slide master, one theme and one slide layout per [`Layout`].
//! [`PackageReader`] reads a package back to list its slides.
//!
//! # Example
//!
//! ```rust,no_run
//! use proposal_deck::ooxml::pptx::{Layout, MutablePresentation};
//!
//! let mut pres = MutablePresentation::new();
//! let slide = pres.add_slide(Layout::Title);
//! slide.set_title("Quarterly Review");
//! slide.set_body("Finance Team");
//! pres.save("review.pptx")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod layout;
pub mod reader;
pub mod template;
pub mod writer;

pub use layout::Layout;
pub use reader::{PackageReader, SlideSummary, read_slides};
pub use writer::{MutablePresentation, MutableSlide};
