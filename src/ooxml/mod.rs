//! Office Open XML (OOXML) support, limited to what a PowerPoint deck needs.
//!
//! 1. **OPC Layer** (`opc`): package parts, relationships and the ZIP container
//! 2. **PresentationML** (`pptx`): slides, layouts, master and theme
pub mod opc;
pub mod pptx;
