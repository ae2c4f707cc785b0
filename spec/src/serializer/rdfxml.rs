//! RDF/XML serializer, used for the `owl`, `rdf` and `xml` exports.
//!
//! Every subject becomes one `rdf:Description`; types are written as
//! `rdf:type` property elements so the layout is uniform. Predicate IRIs are
//! split into namespace and local name, reusing the supplied prefixes and
//! minting `ns<N>` prefixes for the rest.

use crate::error::ExportError;
use crate::model::{iris, Node, OntologyNamespace, Value};

use super::{is_local_name, Prefixes};

/// Serializes a namespace to an RDF/XML string.
///
/// # Errors
///
/// Returns [`ExportError::Unserializable`] when a predicate IRI does not end
/// in a valid XML local name.
pub fn to_rdf_xml(namespace: &OntologyNamespace, prefixes: &Prefixes) -> Result<String, ExportError> {
    let descriptions = namespace.describe();

    let mut bindings: Vec<(String, String)> = prefixes
        .iter()
        .map(|(p, n)| (p.to_owned(), n.to_owned()))
        .collect();
    let mut body = String::with_capacity(64 * 1024);

    for d in &descriptions {
        if d.types.is_empty() && d.statements.is_empty() {
            continue;
        }
        match &d.subject {
            Node::Iri(iri) => body.push_str(&format!(
                "  <rdf:Description rdf:about=\"{}\">\n",
                escape(iri)
            )),
            Node::Blank(id) => body.push_str(&format!(
                "  <rdf:Description rdf:nodeID=\"{}\">\n",
                escape(id)
            )),
        }
        for t in &d.types {
            body.push_str(&format!(
                "    <rdf:type rdf:resource=\"{}\"/>\n",
                escape(t)
            ));
        }
        for (predicate, object) in &d.statements {
            let qname = qualified_name(predicate, &mut bindings)?;
            body.push_str(&property_element(&qname, object));
        }
        body.push_str("  </rdf:Description>\n");
    }

    let mut out = String::with_capacity(body.len() + 1024);
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<rdf:RDF");
    for (prefix, namespace) in &bindings {
        out.push_str(&format!("\n    xmlns:{}=\"{}\"", prefix, escape(namespace)));
    }
    out.push_str(">\n");
    out.push_str(&body);
    out.push_str("</rdf:RDF>\n");
    Ok(out)
}

fn property_element(qname: &str, object: &Value) -> String {
    match object {
        Value::Iri(iri) => format!("    <{qname} rdf:resource=\"{}\"/>\n", escape(iri)),
        Value::Blank(id) => format!("    <{qname} rdf:nodeID=\"{}\"/>\n", escape(id)),
        Value::Str(s) => format!("    <{qname}>{}</{qname}>\n", escape(s)),
        Value::LangStr { value, lang } => format!(
            "    <{qname} xml:lang=\"{}\">{}</{qname}>\n",
            escape(lang),
            escape(value)
        ),
        other => {
            let (lexical, datatype) = other
                .typed_literal()
                .unwrap_or_else(|| (String::new(), iris::XSD_STRING));
            format!(
                "    <{qname} rdf:datatype=\"{}\">{}</{qname}>\n",
                escape(datatype),
                escape(&lexical)
            )
        }
    }
}

/// Splits a predicate IRI into `prefix:local`, binding a fresh prefix when
/// its namespace has none yet.
fn qualified_name(iri: &str, bindings: &mut Vec<(String, String)>) -> Result<String, ExportError> {
    let split = iri
        .rfind(['#', '/'])
        .map(|i| i + 1)
        .filter(|&i| i < iri.len() && is_local_name(&iri[i..]))
        .ok_or_else(|| ExportError::Unserializable(iri.to_owned()))?;
    let (namespace, local) = iri.split_at(split);

    if let Some((prefix, _)) = bindings.iter().find(|(_, n)| n == namespace) {
        return Ok(format!("{prefix}:{local}"));
    }
    let mut n = bindings.len();
    let prefix = loop {
        let candidate = format!("ns{n}");
        if !bindings.iter().any(|(p, _)| *p == candidate) {
            break candidate;
        }
        n += 1;
    };
    bindings.push((prefix.clone(), namespace.to_owned()));
    Ok(format!("{prefix}:{local}"))
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassDefinition, Individual};

    fn sample() -> OntologyNamespace {
        let mut ns = OntologyNamespace::new("http://www.labop.org/labop_device_abox", "lodeva");
        ns.add_import("http://www.labop.org/labop_device_tbox");
        ns.classes.push(ClassDefinition::new(ns.term("Device")));
        let mut ind = Individual::new(ns.term("device_1"), ns.term("Device"));
        ind.label = Some("Plate <96>".into());
        ind.values.push(("http://example.org/vocab/hasNumWells".into(), Value::Int(96)));
        ns.individuals.push(ind);
        ns
    }

    #[test]
    fn declares_rdf_root_and_descriptions() {
        let xml = to_rdf_xml(&sample(), &Prefixes::standard()).expect("serializable");
        assert!(xml.starts_with("<?xml version=\"1.0\""));
        assert!(xml.contains("xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\""));
        assert!(xml.contains(
            "<rdf:Description rdf:about=\"http://www.labop.org/labop_device_abox\">"
        ));
        assert!(xml.trim_end().ends_with("</rdf:RDF>"));
    }

    #[test]
    fn mints_prefixes_for_unknown_namespaces() {
        let xml = to_rdf_xml(&sample(), &Prefixes::standard()).expect("serializable");
        assert!(xml.contains("=\"http://example.org/vocab/\""));
        assert!(xml.contains(":hasNumWells rdf:datatype=\"http://www.w3.org/2001/XMLSchema#integer\">96<"));
    }

    #[test]
    fn escapes_markup_in_literals() {
        let xml = to_rdf_xml(&sample(), &Prefixes::standard()).expect("serializable");
        assert!(xml.contains("<rdfs:label>Plate &lt;96&gt;</rdfs:label>"));
    }

    #[test]
    fn rejects_predicates_without_local_name() {
        let mut ns = sample();
        ns.individuals[0]
            .values
            .push(("http://example.org/vocab/".into(), Value::Bool(true)));
        let err = to_rdf_xml(&ns, &Prefixes::standard()).unwrap_err();
        assert!(matches!(err, ExportError::Unserializable(_)));
    }
}
