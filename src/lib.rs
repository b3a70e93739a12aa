//! proposal-deck: renders the demand-forecasting project proposal as a
//! PowerPoint (.pptx) slide deck.
//!
//! The deck content is a fixed, ordered list of slide records (see
//! [`deck::Deck::builtin`]). Each record is rendered onto a slide of an
//! in-memory [`MutablePresentation`], which is then written as an OOXML
//! package.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! proposal_deck::write_proposal(proposal_deck::DEFAULT_OUTPUT)?;
//!
//! let slides = proposal_deck::ooxml::pptx::read_slides(proposal_deck::DEFAULT_OUTPUT)?;
//! assert_eq!(slides.len(), 17);
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod deck;
pub mod error;
pub mod ooxml;

pub use deck::{Deck, SlideRecord};
pub use error::{DeckError, Result};
pub use ooxml::pptx::{Layout, MutablePresentation};

use std::path::Path;

/// File written when no output path is given.
pub const DEFAULT_OUTPUT: &str = "Cement_Demand_Forecasting_Strategic_Presentation.pptx";

/// Printed once the deck has been written.
pub const SUCCESS_MESSAGE: &str = "PowerPoint presentation created successfully!";

/// Build the proposal presentation in memory.
pub fn build_proposal() -> Result<MutablePresentation> {
    let deck = Deck::builtin()?;
    log::debug!("rendering {} slides", deck.slides.len());
    Ok(deck.render())
}

/// Build the proposal presentation and write it to `path`.
pub fn write_proposal<P: AsRef<Path>>(path: P) -> Result<()> {
    build_proposal()?.save(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::PROPOSAL_SLIDE_COUNT;
    use crate::ooxml::pptx::{PackageReader, read_slides};
    use proptest::prelude::*;

    #[test]
    fn test_written_deck_matches_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT);
        write_proposal(&path).unwrap();
        assert!(path.is_file());

        let deck = Deck::builtin().unwrap();
        let slides = read_slides(&path).unwrap();
        assert_eq!(slides.len(), PROPOSAL_SLIDE_COUNT);

        for (index, (slide, record)) in slides.iter().zip(&deck.slides).enumerate() {
            assert_eq!(slide.layout, Some(record.layout), "slide {}", index + 1);
            assert_eq!(slide.title, record.title, "slide {}", index + 1);
            assert_eq!(slide.body, record.body, "slide {}", index + 1);
        }

        assert_eq!(slides[0].layout, Some(Layout::Title));
        assert_eq!(slides[16].layout, Some(Layout::Title));
        assert!(
            slides[1..16]
                .iter()
                .all(|s| s.layout == Some(Layout::TitleAndContent))
        );
    }

    const PROPOSAL_TITLES: [&str; 17] = [
        "Cement Demand Forecasting Across Multiple Sites",
        "Project Overview",
        "Business Problem",
        "Dataset Description",
        "Key Features",
        "Strategic Approach",
        "Technical Implementation",
        "Model Performance & Metrics",
        "Implementation Strategy",
        "Risk Mitigation Strategies",
        "Results & Business Impact",
        "Success Metrics & KPIs",
        "Project Structure",
        "Change Management Strategy",
        "Future Enhancements",
        "Resource Requirements",
        "Thank You",
    ];

    const OPENING_SUBTITLE: &str = "Machine Learning Solution for Construction Industry
Inventory Optimization & Demand Prediction";

    const BUSINESS_PROBLEM_BODY: &str = "Construction sites face critical challenges:

• Variable demand patterns across different sites
• Weather-dependent construction activities
• Different site behaviors (aggressive vs conservative)
• Storage capacity constraints
• Cost implications of stockouts vs excess inventory

Solution: Predictive analytics for optimal inventory management";

    const KEY_FEATURES_BODY: &str = "🏗️ Multi-site Analysis
   Forecasting across different geographic regions

🌦️ Weather Integration
   Incorporates rainfall and temperature data

📊 Behavioral Patterns
   Accounts for site-specific ordering behaviors

📦 Inventory Optimization
   Balances demand forecasting with storage constraints

📈 Performance Tracking
   Model evaluation and KPI monitoring";

    const CLOSING_SUBTITLE: &str =
        "Questions & Discussion\n\nCement Demand Forecasting Project\nData Science Team";

    #[test]
    fn test_written_deck_has_proposal_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_OUTPUT);
        write_proposal(&path).unwrap();
        let slides = read_slides(&path).unwrap();

        let titles: Vec<&str> = slides.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, PROPOSAL_TITLES);

        assert_eq!(slides[0].body, OPENING_SUBTITLE);
        assert_eq!(slides[2].body, BUSINESS_PROBLEM_BODY);
        assert_eq!(slides[4].body, KEY_FEATURES_BODY);
        assert_eq!(slides[16].body, CLOSING_SUBTITLE);
        assert!(slides[15].body.starts_with("👨‍💻 Human Resources:\n• 1 Data Scientist (Lead)"));
    }

    #[test]
    fn test_written_deck_is_well_formed() {
        let bytes = build_proposal().unwrap().to_bytes().unwrap();
        let mut reader = PackageReader::from_bytes(bytes).unwrap();
        reader.validate().unwrap();

        let names = reader.member_names();
        assert_eq!(names[0], "[Content_Types].xml");
        assert!(names.iter().any(|n| n == "ppt/slides/slide17.xml"));
        assert!(!names.iter().any(|n| n == "ppt/slides/slide18.xml"));
    }

    #[test]
    fn test_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        std::fs::write(&path, b"stale").unwrap();
        write_proposal(&path).unwrap();
        assert_eq!(read_slides(&path).unwrap().len(), PROPOSAL_SLIDE_COUNT);
    }

    proptest! {
        #[test]
        fn prop_slide_text_survives_packaging(
            title in "[a-zA-Z0-9 &<>\"'.,!?é📈-]{1,40}",
            body in "[a-zA-Z0-9 &<>\"'\n-]{0,80}",
        ) {
            let mut pres = MutablePresentation::new();
            let slide = pres.add_slide(Layout::TitleAndContent);
            slide.set_title(&title);
            slide.set_body(&body);

            let mut reader = PackageReader::from_bytes(pres.to_bytes().unwrap()).unwrap();
            reader.validate().unwrap();
            let slides = reader.slides().unwrap();
            prop_assert_eq!(&slides[0].title, &title);
            prop_assert_eq!(&slides[0].body, &body);
        }
    }
}
