//! Turtle 1.1 serializer.
//!
//! Produces one block per subject: the ontology header first, then classes,
//! properties, named individuals and any remaining statements. The output
//! only uses the Turtle subset of N3, so it doubles as the `n3` export.

use crate::model::{iris, Node, OntologyNamespace, Value};

use super::{escape_literal, Prefixes};

/// Serializes a namespace to a Turtle string.
#[must_use]
pub fn to_turtle(namespace: &OntologyNamespace, prefixes: &Prefixes) -> String {
    let mut out = String::with_capacity(64 * 1024);

    for (prefix, iri) in prefixes.iter() {
        out.push_str(&format!("@prefix {prefix}: <{iri}> .\n"));
    }
    out.push('\n');

    for d in namespace.describe() {
        if d.types.is_empty() && d.statements.is_empty() {
            continue;
        }
        out.push_str(&node(&d.subject, prefixes));
        let mut clauses: Vec<String> = Vec::new();
        if !d.types.is_empty() {
            let types: Vec<String> = d.types.iter().map(|t| iri(t, prefixes)).collect();
            clauses.push(format!("a {}", types.join(" , ")));
        }
        for (predicate, object) in &d.statements {
            clauses.push(format!(
                "{} {}",
                iri(predicate, prefixes),
                value(object, prefixes)
            ));
        }
        out.push_str("\n  ");
        out.push_str(&clauses.join(" ;\n  "));
        out.push_str(" .\n\n");
    }

    out
}

fn iri(iri: &str, prefixes: &Prefixes) -> String {
    prefixes.compact(iri).unwrap_or_else(|| format!("<{iri}>"))
}

fn node(node: &Node, prefixes: &Prefixes) -> String {
    match node {
        Node::Iri(i) => iri(i, prefixes),
        Node::Blank(id) => format!("_:{id}"),
    }
}

fn value(value: &Value, prefixes: &Prefixes) -> String {
    match value {
        Value::Iri(i) => iri(i, prefixes),
        Value::Blank(id) => format!("_:{id}"),
        Value::Str(s) => format!("\"{}\"", escape_literal(s)),
        Value::LangStr { value, lang } => format!("\"{}\"@{lang}", escape_literal(value)),
        other => match other.typed_literal() {
            Some((lexical, datatype)) => format!(
                "\"{}\"^^{}",
                escape_literal(&lexical),
                iri(datatype, prefixes)
            ),
            None => format!("\"\"^^{}", iri(iris::XSD_STRING, prefixes)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ClassDefinition, Individual};

    fn sample() -> OntologyNamespace {
        let mut ns = OntologyNamespace::new("http://www.labop.org/labop_device_tbox", "lodevt");
        ns.add_import("http://emmo.info/emmo");
        let mut class = ClassDefinition::new(ns.term("Device"));
        class.comment = Some("A \"device\"".into());
        class.subclass_of.push(iris::OWL_THING.into());
        ns.classes.push(class);
        let mut ind = Individual::new(ns.term("device_1"), ns.term("Device"));
        ind.values.push((ns.term("hasNumWells"), Value::Int(96)));
        ns.individuals.push(ind);
        ns
    }

    fn prefixes(ns: &OntologyNamespace) -> Prefixes {
        let mut p = Prefixes::standard();
        p.add(&ns.prefix, &ns.term_prefix());
        p
    }

    #[test]
    fn produces_prefixes_and_ontology_header() {
        let ns = sample();
        let turtle = to_turtle(&ns, &prefixes(&ns));
        assert!(turtle.contains("@prefix owl: <http://www.w3.org/2002/07/owl#> ."));
        assert!(turtle.contains("@prefix lodevt: <http://www.labop.org/labop_device_tbox#> ."));
        assert!(turtle.contains("<http://www.labop.org/labop_device_tbox>\n  a owl:Ontology"));
        assert!(turtle.contains("owl:imports <http://emmo.info/emmo>"));
    }

    #[test]
    fn compacts_terms_and_escapes_comments() {
        let ns = sample();
        let turtle = to_turtle(&ns, &prefixes(&ns));
        assert!(turtle.contains("lodevt:Device\n  a owl:Class"));
        assert!(turtle.contains("rdfs:comment \"A \\\"device\\\"\""));
        assert!(turtle.contains("rdfs:subClassOf owl:Thing"));
    }

    #[test]
    fn writes_typed_individual_values() {
        let ns = sample();
        let turtle = to_turtle(&ns, &prefixes(&ns));
        assert!(turtle.contains("a owl:NamedIndividual , lodevt:Device"));
        assert!(turtle.contains("lodevt:hasNumWells \"96\"^^xsd:integer"));
    }
}
