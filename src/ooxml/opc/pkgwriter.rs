//! Package writer for OPC packages.
//!
//! Serializes an [`OpcPackage`] into a ZIP archive: `[Content_Types].xml`
//! first, then `_rels/.rels`, then every part followed by its `.rels` part.

use crate::common::xml::escape_xml;
use crate::error::Result;
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Package writer that serializes an OPC package to a ZIP file.
///
/// # Example
///
/// ```no_run
/// use proposal_deck::ooxml::opc::{OpcPackage, PackageWriter};
///
/// let pkg = OpcPackage::new();
/// // ... add parts to package ...
/// PackageWriter::write("output.pptx", &pkg)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct PackageWriter;

impl PackageWriter {
    /// Write an OPC package to a file.
    ///
    /// The parent directory must already exist.
    pub fn write<P: AsRef<Path>>(path: P, package: &OpcPackage) -> Result<()> {
        let bytes = Self::to_bytes(package)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Serialize an OPC package to bytes.
    pub fn to_bytes(package: &OpcPackage) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        // [Content_Types].xml
        let cti = ContentTypesItem::from_package(package);
        Self::write_member(&mut zip, options, CONTENT_TYPES_URI, cti.to_xml().as_bytes())?;

        // _rels/.rels
        let pkg_rels_uri = PackURI::new(PACKAGE_URI)?.rels_uri();
        Self::write_member(
            &mut zip,
            options,
            pkg_rels_uri.as_str(),
            package.rels().to_xml().as_bytes(),
        )?;

        // Parts and their relationships
        for part in package.iter_parts() {
            Self::write_member(&mut zip, options, part.partname().as_str(), part.blob())?;

            if !part.rels().is_empty() {
                let rels_uri = part.partname().rels_uri();
                Self::write_member(
                    &mut zip,
                    options,
                    rels_uri.as_str(),
                    part.rels().to_xml().as_bytes(),
                )?;
            }
        }

        let cursor = zip.finish()?;
        log::debug!(
            "serialized package with {} parts ({} bytes)",
            package.part_count(),
            cursor.get_ref().len()
        );
        Ok(cursor.into_inner())
    }

    fn write_member(
        zip: &mut ZipWriter<Cursor<Vec<u8>>>,
        options: SimpleFileOptions,
        partname: &str,
        blob: &[u8],
    ) -> Result<()> {
        // ZIP member names carry no leading slash
        zip.start_file(partname.trim_start_matches('/'), options)?;
        zip.write_all(blob)?;
        Ok(())
    }
}

/// Helper for building [Content_Types].xml content.
///
/// Manages Default and Override elements for content type mapping.
struct ContentTypesItem {
    /// Default content types by extension
    defaults: BTreeMap<String, String>,

    /// Override content types by partname
    overrides: BTreeMap<String, String>,
}

impl ContentTypesItem {
    fn new() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels".to_string(), ct::OPC_RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), ct::XML.to_string());

        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    fn from_package(package: &OpcPackage) -> Self {
        let mut cti = Self::new();
        for part in package.iter_parts() {
            cti.add_content_type(part.partname(), part.content_type());
        }
        cti
    }

    /// Every XML part of a presentation has a specific content type, so
    /// anything that is not covered by a Default gets an Override.
    fn add_content_type(&mut self, partname: &PackURI, content_type: &str) {
        let covered = self
            .defaults
            .get(partname.ext())
            .is_some_and(|default| default == content_type);
        if !covered {
            self.overrides
                .insert(partname.to_string(), content_type.to_string());
        }
    }

    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(512 + self.overrides.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
        );

        for (ext, content_type) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            ));
        }

        for (partname, content_type) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}
