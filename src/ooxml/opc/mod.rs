/// Open Packaging Conventions (OPC) support for writing and reading `.pptx` packages.
///
/// A package is a ZIP archive holding XML parts, a `[Content_Types].xml`
/// manifest, and `.rels` parts describing the relationships between parts.
pub mod constants;
pub mod package;
pub mod packuri;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use package::{OpcPackage, Part};
pub use packuri::PackURI;
pub use pkgwriter::PackageWriter;
pub use rel::{Relationship, Relationships};
