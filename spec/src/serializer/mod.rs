//! Serializers for ontology namespaces.
//!
//! Four syntaxes are written:
//! - **Turtle** ([`turtle`]) for `turtle` and `n3` exports
//! - **N-Triples** ([`ntriples`]) for `nt` exports
//! - **RDF/XML** ([`rdfxml`]) for `owl`, `rdf` and `xml` exports
//! - **JSON-LD** ([`jsonld`]) for `json-ld` exports
//!
//! All of them walk [`OntologyNamespace::describe`](crate::model::OntologyNamespace::describe)
//! so every syntax carries exactly the same statements.

pub mod jsonld;
pub mod ntriples;
pub mod rdfxml;
pub mod turtle;

use crate::model::iris;

/// Ordered prefix → namespace IRI table used to compact IRIs.
#[derive(Debug, Clone)]
pub struct Prefixes {
    entries: Vec<(String, String)>,
}

impl Prefixes {
    /// The W3C vocabularies every export declares.
    #[must_use]
    pub fn standard() -> Self {
        let entries = [
            ("owl", iris::OWL),
            ("rdf", iris::RDF),
            ("rdfs", iris::RDFS),
            ("xsd", iris::XSD),
            ("skos", iris::SKOS),
            ("dcterms", iris::DCTERMS),
        ]
        .into_iter()
        .map(|(p, i)| (p.to_owned(), i.to_owned()))
        .collect();
        Self { entries }
    }

    /// Adds a prefix unless the prefix or the namespace is already bound.
    pub fn add(&mut self, prefix: &str, namespace: &str) {
        if prefix.is_empty() || !is_local_name(prefix) {
            return;
        }
        if self
            .entries
            .iter()
            .any(|(p, n)| p == prefix || n == namespace)
        {
            return;
        }
        self.entries.push((prefix.to_owned(), namespace.to_owned()));
    }

    /// Iterates over `(prefix, namespace)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, n)| (p.as_str(), n.as_str()))
    }

    /// Compacts `iri` to `prefix:local` when the local part is a plain name.
    #[must_use]
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.entries.iter().find_map(|(prefix, namespace)| {
            iri.strip_prefix(namespace.as_str())
                .filter(|local| is_local_name(local))
                .map(|local| format!("{prefix}:{local}"))
        })
    }
}

/// Whether `s` is usable unescaped as a prefixed-name local part, an XML
/// element local name, and a JSON-LD compact IRI suffix.
fn is_local_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Escapes a string for a double-quoted Turtle or N-Triples literal.
fn escape_literal(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
