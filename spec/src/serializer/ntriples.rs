//! N-Triples serializer.
//!
//! Produces a valid N-Triples document (one triple per line, absolute IRIs).
//! N-Triples is suitable for streaming, bulk loading, and diff-friendly storage.

use crate::model::{iris, Node, OntologyNamespace, Value};

use super::escape_literal;

/// Serializes a namespace to an N-Triples string.
#[must_use]
pub fn to_ntriples(namespace: &OntologyNamespace) -> String {
    let mut out = String::with_capacity(64 * 1024);
    for t in namespace.triples() {
        triple(&mut out, &t.subject, &t.predicate, &object(&t.object));
    }
    out
}

fn triple(out: &mut String, subj: &Node, pred: &str, obj: &str) {
    match subj {
        Node::Iri(s) => out.push_str(&iri(s)),
        Node::Blank(id) => {
            out.push_str("_:");
            out.push_str(id);
        }
    }
    out.push(' ');
    out.push_str(&iri(pred));
    out.push(' ');
    out.push_str(obj);
    out.push_str(" .\n");
}

fn iri(s: &str) -> String {
    format!("<{}>", s)
}

fn lit(s: &str, datatype: &str) -> String {
    format!("\"{}\"^^<{}>", escape_literal(s), datatype)
}

fn object(value: &Value) -> String {
    match value {
        Value::Iri(i) => iri(i),
        Value::Blank(id) => format!("_:{id}"),
        Value::LangStr { value, lang } => format!("\"{}\"@{}", escape_literal(value), lang),
        other => match other.typed_literal() {
            Some((lexical, datatype)) => lit(&lexical, datatype),
            None => lit("", iris::XSD_STRING),
        },
    }
}
