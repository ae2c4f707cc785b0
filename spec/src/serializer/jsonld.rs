//! JSON-LD 1.1 serializer.
//!
//! Produces a single JSON-LD document with a prefix-only `@context` and a
//! flat `@graph` array, one node object per subject. Non-string literals are
//! written as explicit `@value`/`@type` objects so their datatype survives
//! a reload unchanged.

use serde_json::{json, Map, Value as Json};

use crate::model::{Node, OntologyNamespace, Value};

use super::Prefixes;

/// Serializes a namespace to a JSON-LD `Value`.
///
/// The returned value can be pretty-printed with [`serde_json::to_string_pretty`].
#[must_use]
pub fn to_json_ld(namespace: &OntologyNamespace, prefixes: &Prefixes) -> Json {
    let mut ctx = Map::new();
    for (prefix, iri) in prefixes.iter() {
        ctx.insert(prefix.to_owned(), json!(iri));
    }

    let graph: Vec<Json> = namespace
        .describe()
        .into_iter()
        .filter(|d| !d.types.is_empty() || !d.statements.is_empty())
        .map(|d| {
            let mut node = Map::new();
            node.insert("@id".to_owned(), json!(node_id(&d.subject)));
            if !d.types.is_empty() {
                let types: Vec<Json> = d
                    .types
                    .iter()
                    .map(|t| json!(compact(t, prefixes)))
                    .collect();
                node.insert("@type".to_owned(), Json::Array(types));
            }
            for (predicate, object) in &d.statements {
                // When the same key appears more than once (non-functional
                // property), promote to a JSON-LD array rather than overwriting.
                let key = compact(predicate, prefixes);
                let value = value_to_json(object);
                match node.get_mut(&key) {
                    Some(Json::Array(arr)) => arr.push(value),
                    Some(existing) => {
                        let prev = std::mem::replace(existing, Json::Null);
                        *existing = json!([prev, value]);
                    }
                    None => {
                        node.insert(key, value);
                    }
                }
            }
            Json::Object(node)
        })
        .collect();

    json!({
        "@context": Json::Object(ctx),
        "@graph": graph
    })
}

fn compact(iri: &str, prefixes: &Prefixes) -> String {
    prefixes.compact(iri).unwrap_or_else(|| iri.to_owned())
}

fn node_id(node: &Node) -> String {
    match node {
        Node::Iri(iri) => iri.clone(),
        Node::Blank(id) => format!("_:{id}"),
    }
}

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Iri(iri) => json!({ "@id": iri }),
        Value::Blank(id) => json!({ "@id": format!("_:{id}") }),
        Value::Str(s) => json!(s),
        Value::LangStr { value, lang } => json!({ "@value": value, "@language": lang }),
        other => match other.typed_literal() {
            Some((lexical, datatype)) => json!({ "@value": lexical, "@type": datatype }),
            None => Json::Null,
        },
    }
}
