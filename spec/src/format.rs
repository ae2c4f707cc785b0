//! Export formats and the RDF syntaxes behind them.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::ExportError;

/// Concrete RDF syntax written or read by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// Turtle 1.1 (also used for N3 output).
    Turtle,
    /// N-Triples.
    NTriples,
    /// RDF/XML.
    RdfXml,
    /// JSON-LD 1.1.
    JsonLd,
}

impl Syntax {
    /// Infers the syntax from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "ttl" | "turtle" | "n3" => Some(Syntax::Turtle),
            "nt" => Some(Syntax::NTriples),
            "owl" | "rdf" | "xml" => Some(Syntax::RdfXml),
            "jsonld" | "json" => Some(Syntax::JsonLd),
            _ => None,
        }
    }

    /// Name used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Syntax::Turtle => "Turtle",
            Syntax::NTriples => "N-Triples",
            Syntax::RdfXml => "RDF/XML",
            Syntax::JsonLd => "JSON-LD",
        }
    }
}

/// One of the enumerated export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// `turtle` → `.ttl`.
    Turtle,
    /// `owl` → `.owl`, RDF/XML syntax.
    Owl,
    /// `rdf` → `.rdf`, RDF/XML syntax.
    Rdf,
    /// `xml` → `.rdf`, RDF/XML syntax.
    Xml,
    /// `n3` → `.n3`, Turtle subset of N3.
    N3,
    /// `nt` → `.nt`.
    NTriples,
    /// `json-ld` → `.jsonld`.
    JsonLd,
}

impl ExportFormat {
    /// Every supported format.
    pub const ALL: [ExportFormat; 7] = [
        ExportFormat::Turtle,
        ExportFormat::Owl,
        ExportFormat::Rdf,
        ExportFormat::Xml,
        ExportFormat::N3,
        ExportFormat::NTriples,
        ExportFormat::JsonLd,
    ];

    /// The format name accepted on the command line.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ExportFormat::Turtle => "turtle",
            ExportFormat::Owl => "owl",
            ExportFormat::Rdf => "rdf",
            ExportFormat::Xml => "xml",
            ExportFormat::N3 => "n3",
            ExportFormat::NTriples => "nt",
            ExportFormat::JsonLd => "json-ld",
        }
    }

    /// File extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Turtle => "ttl",
            ExportFormat::Owl => "owl",
            ExportFormat::Rdf | ExportFormat::Xml => "rdf",
            ExportFormat::N3 => "n3",
            ExportFormat::NTriples => "nt",
            ExportFormat::JsonLd => "jsonld",
        }
    }

    /// Serialization syntax.
    #[must_use]
    pub fn syntax(self) -> Syntax {
        match self {
            ExportFormat::Turtle | ExportFormat::N3 => Syntax::Turtle,
            ExportFormat::Owl | ExportFormat::Rdf | ExportFormat::Xml => Syntax::RdfXml,
            ExportFormat::NTriples => Syntax::NTriples,
            ExportFormat::JsonLd => Syntax::JsonLd,
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ExportFormat::ALL
            .into_iter()
            .find(|f| f.name() == wanted)
            .ok_or_else(|| ExportError::UnsupportedFormat(s.to_owned()))
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
