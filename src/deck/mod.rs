//! Deck content: the ordered list of slide records rendered into the proposal.
//!
//! The built-in content lives in `proposal.yaml` next to this module and is
//! compiled into the binary. Each record names a layout, a title and a body;
//! for the title layout the body fills the subtitle placeholder.

use crate::error::{DeckError, Result};
use crate::ooxml::pptx::{Layout, MutablePresentation};
use serde::Deserialize;

/// YAML source of the built-in proposal deck.
const PROPOSAL_YAML: &str = include_str!("proposal.yaml");

/// Number of slides in the built-in proposal deck.
pub const PROPOSAL_SLIDE_COUNT: usize = 17;

/// One slide of a deck.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlideRecord {
    pub layout: Layout,
    pub title: String,
    /// Body text; each line becomes its own paragraph.
    #[serde(default)]
    pub body: String,
}

/// An ordered sequence of slides plus document properties.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Deck {
    pub title: String,
    #[serde(default)]
    pub author: String,
    pub slides: Vec<SlideRecord>,
}

impl Deck {
    /// Load the built-in proposal deck.
    pub fn builtin() -> Result<Self> {
        let deck = Self::from_yaml(PROPOSAL_YAML)?;
        deck.validate_proposal()?;
        Ok(deck)
    }

    /// Parse a deck from YAML and check its general shape.
    pub fn from_yaml(source: &str) -> Result<Self> {
        let deck: Deck =
            serde_saphyr::from_str(source).map_err(|e| DeckError::Yaml(e.to_string()))?;
        deck.validate()?;
        log::debug!("parsed deck '{}' with {} slides", deck.title, deck.slides.len());
        Ok(deck)
    }

    /// Check that the deck opens and closes with a title slide, uses the
    /// content layout in between, and has no empty titles.
    pub fn validate(&self) -> Result<()> {
        let last = match self.slides.len() {
            0 => return Err(DeckError::InvalidDeck("deck has no slides".to_string())),
            n => n - 1,
        };

        for (index, slide) in self.slides.iter().enumerate() {
            let number = index + 1;
            if slide.title.trim().is_empty() {
                return Err(DeckError::InvalidDeck(format!("slide {number} has an empty title")));
            }

            let expected = if index == 0 || index == last {
                Layout::Title
            } else {
                Layout::TitleAndContent
            };
            if slide.layout != expected {
                return Err(DeckError::InvalidDeck(format!(
                    "slide {number} uses the {} layout, expected {}",
                    slide.layout.name(),
                    expected.name()
                )));
            }
        }

        Ok(())
    }

    /// [`validate`](Self::validate) plus the fixed slide count of the proposal.
    pub fn validate_proposal(&self) -> Result<()> {
        self.validate()?;
        if self.slides.len() != PROPOSAL_SLIDE_COUNT {
            return Err(DeckError::InvalidDeck(format!(
                "expected {PROPOSAL_SLIDE_COUNT} slides, found {}",
                self.slides.len()
            )));
        }
        Ok(())
    }

    /// Render the deck into a new in-memory presentation.
    pub fn render(&self) -> MutablePresentation {
        let mut pres = MutablePresentation::new();
        pres.set_title(&self.title);
        pres.set_author(&self.author);

        for record in &self.slides {
            let slide = pres.add_slide(record.layout);
            slide.set_title(&record.title);
            if !record.body.is_empty() {
                slide.set_body(&record.body);
            }
        }

        pres
    }
}
