//! Ontology catalog: identifier → physical location.
//!
//! The same mapping serves import resolution in the [`GraphStore`] and the
//! `catalog-v001.xml` sidecar the exporter writes next to serialized
//! namespaces (the OASIS XML catalog layout Protégé reads).
//!
//! [`GraphStore`]: crate::store::GraphStore

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::LoadError;

/// File name of the catalog sidecar.
pub const CATALOG_FILE_NAME: &str = "catalog-v001.xml";

/// One identifier ↔ location mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry<'a> {
    /// Ontology IRI.
    pub identifier: &'a str,
    /// Relative file path, absolute path, or URL.
    pub location: &'a str,
}

/// Mapping from ontology identifier to load location, ordered by identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    entries: BTreeMap<String, String>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the location of an identifier.
    pub fn register(&mut self, identifier: impl Into<String>, location: impl Into<String>) {
        self.entries.insert(identifier.into(), location.into());
    }

    /// Returns the location registered for an identifier.
    #[must_use]
    pub fn resolve(&self, identifier: &str) -> Option<&str> {
        self.entries.get(identifier).map(String::as_str)
    }

    /// Whether the identifier is registered.
    #[must_use]
    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.contains_key(identifier)
    }

    /// Iterates over all entries in identifier order.
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry<'_>> {
        self.entries.iter().map(|(identifier, location)| CatalogEntry {
            identifier,
            location,
        })
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the catalog as an OASIS XML catalog document.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let mut out = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n\
             <catalog prefer=\"public\" xmlns=\"urn:oasis:names:tc:entity:xmlns:xml:catalog\">\n",
        );
        for (identifier, location) in &self.entries {
            out.push_str(&format!(
                "    <uri name=\"{}\" uri=\"{}\"/>\n",
                escape_attr(identifier),
                escape_attr(location)
            ));
        }
        out.push_str("</catalog>\n");
        out
    }

    /// Parses the `<uri name=".." uri=".."/>` entries of an XML catalog.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Catalog`] when the document has no `<catalog>`
    /// root or a `<uri>` element lacks one of its attributes.
    pub fn from_xml(text: &str, path: &Path) -> Result<Self, LoadError> {
        let invalid = |message: String| LoadError::Catalog {
            path: path.to_owned(),
            message,
        };
        if !text.contains("<catalog") {
            return Err(invalid("missing <catalog> root element".to_owned()));
        }
        let mut catalog = Catalog::new();
        for element in uri_element_re().captures_iter(text) {
            let attrs = &element[1];
            let mut name = None;
            let mut uri = None;
            for attr in attribute_re().captures_iter(attrs) {
                match &attr[1] {
                    "name" => name = Some(unescape_attr(&attr[2])),
                    "uri" => uri = Some(unescape_attr(&attr[2])),
                    _ => {}
                }
            }
            match (name, uri) {
                (Some(name), Some(uri)) => catalog.register(name, uri),
                _ => return Err(invalid(format!("incomplete <uri{attrs}> element"))),
            }
        }
        Ok(catalog)
    }

    /// Reads a catalog file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] if the file cannot be read and
    /// [`LoadError::Catalog`] if it is not a catalog document.
    pub fn read(path: &Path) -> Result<Self, LoadError> {
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::from_xml(&text, path)
    }

    /// Writes the catalog as XML.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be written.
    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        std::fs::write(path, self.to_xml())
    }
}

// Both patterns are literals, so compilation cannot fail.
#[allow(clippy::unwrap_used)]
fn uri_element_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<uri\b([^>]*?)/?>").unwrap())
}

#[allow(clippy::unwrap_used)]
fn attribute_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*"([^"]*)""#).unwrap())
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn unescape_attr(s: &str) -> String {
    s.replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
