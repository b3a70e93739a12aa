//! XML helpers shared by the package writer and reader.

mod escape;

pub use escape::{escape_xml, resolve_entity};
