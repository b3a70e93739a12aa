//! Mutable presentation writer components for PPTX.

pub mod pres;
pub mod slide;

// Re-export main types
pub use pres::MutablePresentation;
pub use slide::MutableSlide;
