//! Parsing serialized graphs back into [`OntologyNamespace`]s.
//!
//! Parsing is delegated to the sophia parsers (Turtle, N-Triples, RDF/XML,
//! JSON-LD). The resulting triples are then lifted into the typed model:
//! subjects typed `owl:Class`, `owl:*Property` or `owl:NamedIndividual`
//! become definitions; everything else is kept as plain statements.

use std::collections::HashMap;
use std::convert::Infallible;
use std::path::Path;

use sophia_api::parser::{QuadParser, TripleParser};
use sophia_api::quad::Quad as _;
use sophia_api::source::{QuadSource, TripleSource};
use sophia_api::term::{Term, TermKind};
use sophia_api::triple::Triple as _;
use sophia_jsonld::JsonLdParser;
use sophia_turtle::parser::nt::NTriplesParser;
use sophia_turtle::parser::turtle::TurtleParser;
use sophia_xml::parser::RdfXmlParser;

use crate::error::LoadError;
use crate::format::Syntax;
use crate::model::iris::*;
use crate::model::{
    ClassDefinition, Individual, Node, OntologyNamespace, Primitive, PropertyDefinition,
    PropertyKind, Range, Triple, Value,
};

/// Reads and parses a serialized graph, inferring the syntax from the
/// file extension.
///
/// # Errors
///
/// Returns [`LoadError::UnknownSyntax`] for an unrecognized extension,
/// [`LoadError::Read`] if the file cannot be read, and
/// [`LoadError::Parse`] if it is not a valid document.
pub fn read_triples(path: &Path) -> Result<Vec<Triple>, LoadError> {
    let syntax = Syntax::from_path(path).ok_or_else(|| LoadError::UnknownSyntax(path.to_owned()))?;
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_owned(),
        source,
    })?;
    parse_str(&text, syntax).map_err(|message| LoadError::Parse {
        path: path.to_owned(),
        syntax: syntax.as_str(),
        message,
    })
}

/// Parses a document in the given syntax into triples. Quads from JSON-LD
/// named graphs are flattened into the default graph.
///
/// # Errors
///
/// Returns the parser's message when the document is malformed.
pub fn parse_str(text: &str, syntax: Syntax) -> Result<Vec<Triple>, String> {
    let mut out = Vec::new();
    match syntax {
        Syntax::Turtle => TurtleParser::default()
            .parse_str(text)
            .try_for_each_triple(|t| {
                push(&mut out, t.s(), t.p(), t.o());
                Ok::<_, Infallible>(())
            })
            .map_err(|e| e.to_string())?,
        Syntax::NTriples => NTriplesParser::default()
            .parse_str(text)
            .try_for_each_triple(|t| {
                push(&mut out, t.s(), t.p(), t.o());
                Ok::<_, Infallible>(())
            })
            .map_err(|e| e.to_string())?,
        Syntax::RdfXml => RdfXmlParser::default()
            .parse_str(text)
            .try_for_each_triple(|t| {
                push(&mut out, t.s(), t.p(), t.o());
                Ok::<_, Infallible>(())
            })
            .map_err(|e| e.to_string())?,
        Syntax::JsonLd => JsonLdParser::new()
            .parse_str(text)
            .try_for_each_quad(|q| {
                push(&mut out, q.s(), q.p(), q.o());
                Ok::<_, Infallible>(())
            })
            .map_err(|e| e.to_string())?,
    }
    Ok(out)
}

fn push<S: Term, P: Term, O: Term>(out: &mut Vec<Triple>, s: S, p: P, o: O) {
    let (Some(subject), Some(predicate), Some(object)) = (node(s), p.iri(), value(o)) else {
        // RDF-star and variable terms are not representable; skip them.
        return;
    };
    out.push(Triple {
        subject,
        predicate: predicate.as_str().to_owned(),
        object,
    });
}

fn node<T: Term>(term: T) -> Option<Node> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Node::Iri(iri.as_str().to_owned())),
        TermKind::BlankNode => term.bnode_id().map(|id| Node::Blank(blank_label(id.as_str()))),
        _ => None,
    }
}

fn value<T: Term>(term: T) -> Option<Value> {
    match term.kind() {
        TermKind::Iri => term.iri().map(|iri| Value::Iri(iri.as_str().to_owned())),
        TermKind::BlankNode => term.bnode_id().map(|id| Value::Blank(blank_label(id.as_str()))),
        TermKind::Literal => {
            let lexical = term.lexical_form()?;
            let datatype = term.datatype().map(|d| d.as_str().to_owned());
            let lang = term.language_tag().map(|l| l.as_str().to_owned());
            Some(Value::literal(&lexical, datatype.as_deref(), lang.as_deref()))
        }
        _ => None,
    }
}

/// Blank node labels are re-emitted as `_:label`, so keep them to the
/// characters every output syntax accepts.
fn blank_label(id: &str) -> String {
    let mut label: String = id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if !label.starts_with(|c: char| c.is_ascii_alphabetic()) {
        label.insert(0, 'b');
    }
    label
}

/// Builds a namespace from parsed triples.
///
/// The ontology header is the `owl:Ontology` subject whose IRI matches
/// `iri` (ignoring trailing separators), or the only `owl:Ontology` in the
/// document when none matches.
#[must_use]
pub fn lift(iri: &str, prefix: &str, triples: Vec<Triple>) -> OntologyNamespace {
    let mut ns = OntologyNamespace::new(iri, prefix);

    // Group by subject, preserving first-seen order.
    let mut order: Vec<Node> = Vec::new();
    let mut groups: HashMap<Node, Vec<(String, Value)>> = HashMap::new();
    for t in triples {
        let entry = groups.entry(t.subject.clone()).or_insert_with(|| {
            order.push(t.subject.clone());
            Vec::new()
        });
        entry.push((t.predicate, t.object));
    }

    let is_ontology = |stmts: &[(String, Value)]| has_type(stmts, OWL_ONTOLOGY);
    let ontologies: Vec<&Node> = order
        .iter()
        .filter(|n| groups.get(*n).is_some_and(|s| is_ontology(s)))
        .collect();
    let header = ontologies
        .iter()
        .find(|n| n.as_iri().is_some_and(|i| normalize(i) == normalize(iri)))
        .or_else(|| if ontologies.len() == 1 { ontologies.first() } else { None })
        .map(|n| (*n).clone());

    for subject in order {
        let Some(stmts) = groups.remove(&subject) else {
            continue;
        };
        if header.as_ref() == Some(&subject) {
            lift_header(&mut ns, &subject, stmts);
            continue;
        }
        let iri = match &subject {
            Node::Iri(iri) => iri.clone(),
            Node::Blank(_) => {
                keep(&mut ns, &subject, stmts);
                continue;
            }
        };
        if has_type(&stmts, OWL_CLASS) || has_type(&stmts, RDFS_CLASS) {
            ns.classes.push(lift_class(iri, stmts));
        } else if let Some(kind) = property_kind(&stmts) {
            let (prop, rest) = lift_property(iri, kind, stmts);
            ns.properties.push(prop);
            keep(&mut ns, &subject, rest);
        } else if has_type(&stmts, OWL_NAMED_INDIVIDUAL) {
            let (ind, rest) = lift_individual(iri, stmts);
            ns.individuals.push(ind);
            keep(&mut ns, &subject, rest);
        } else {
            keep(&mut ns, &subject, stmts);
        }
    }

    ns
}

fn normalize(iri: &str) -> &str {
    iri.trim_end_matches(['/', '#'])
}

fn has_type(stmts: &[(String, Value)], ty: &str) -> bool {
    stmts
        .iter()
        .any(|(p, o)| p == RDF_TYPE && o.as_iri() == Some(ty))
}

fn property_kind(stmts: &[(String, Value)]) -> Option<PropertyKind> {
    [
        PropertyKind::Object,
        PropertyKind::Datatype,
        PropertyKind::Annotation,
    ]
    .into_iter()
    .find(|k| has_type(stmts, k.type_iri()))
}

fn keep(ns: &mut OntologyNamespace, subject: &Node, stmts: Vec<(String, Value)>) {
    ns.statements
        .extend(stmts.into_iter().map(|(predicate, object)| Triple {
            subject: subject.clone(),
            predicate,
            object,
        }));
}

/// Takes the first plain-string value of `predicate` out of `stmts`.
fn take_text(stmts: &mut Vec<(String, Value)>, predicate: &str) -> Option<String> {
    let index = stmts
        .iter()
        .position(|(p, o)| p == predicate && matches!(o, Value::Str(_)))?;
    match stmts.remove(index).1 {
        Value::Str(s) => Some(s),
        _ => None,
    }
}

fn lift_header(ns: &mut OntologyNamespace, subject: &Node, mut stmts: Vec<(String, Value)>) {
    ns.label = take_text(&mut stmts, RDFS_LABEL);
    ns.comment = take_text(&mut stmts, RDFS_COMMENT);
    ns.version = take_text(&mut stmts, OWL_VERSION_INFO);
    let mut rest = Vec::new();
    for (p, o) in stmts {
        match (&p[..], &o) {
            (RDF_TYPE, Value::Iri(t)) if t == OWL_ONTOLOGY => {}
            (OWL_IMPORTS, Value::Iri(i)) => ns.add_import(i),
            _ => rest.push((p, o)),
        }
    }
    // Statements about a header with a foreign IRI stay attached to it.
    let subject = match subject.as_iri() {
        Some(i) if normalize(i) == normalize(&ns.iri) => Node::Iri(ns.iri.clone()),
        _ => subject.clone(),
    };
    keep(ns, &subject, rest);
}

fn lift_class(id: String, mut stmts: Vec<(String, Value)>) -> ClassDefinition {
    let mut class = ClassDefinition::new(id);
    class.label = take_text(&mut stmts, RDFS_LABEL);
    class.comment = take_text(&mut stmts, RDFS_COMMENT);
    for (p, o) in stmts {
        match (&p[..], &o) {
            (RDF_TYPE, Value::Iri(t)) if t == OWL_CLASS => {}
            (RDFS_SUBCLASS_OF, Value::Iri(parent)) => class.subclass_of.push(parent.clone()),
            (OWL_DISJOINT_WITH, Value::Iri(other)) => class.disjoint_with.push(other.clone()),
            _ => class.annotations.push((p, o)),
        }
    }
    class
}

fn lift_property(
    id: String,
    kind: PropertyKind,
    mut stmts: Vec<(String, Value)>,
) -> (PropertyDefinition, Vec<(String, Value)>) {
    let mut prop = PropertyDefinition {
        id,
        label: take_text(&mut stmts, RDFS_LABEL),
        comment: take_text(&mut stmts, RDFS_COMMENT),
        kind,
        functional: has_type(&stmts, OWL_FUNCTIONAL_PROPERTY),
        domain: None,
        range: None,
    };
    let mut rest = Vec::new();
    for (p, o) in stmts {
        match (&p[..], &o) {
            (RDF_TYPE, Value::Iri(t)) if t == kind.type_iri() || t == OWL_FUNCTIONAL_PROPERTY => {}
            (RDFS_DOMAIN, Value::Iri(d)) if prop.domain.is_none() => prop.domain = Some(d.clone()),
            (RDFS_RANGE, Value::Iri(r)) if prop.range.is_none() => {
                prop.range = Some(match (kind, Primitive::from_datatype_iri(r)) {
                    (PropertyKind::Object, _) => Range::Class(r.clone()),
                    (_, Some(primitive)) => Range::Primitive(primitive),
                    (_, None) => Range::Datatype(r.clone()),
                });
            }
            _ => rest.push((p, o)),
        }
    }
    (prop, rest)
}

fn lift_individual(
    id: String,
    mut stmts: Vec<(String, Value)>,
) -> (Individual, Vec<(String, Value)>) {
    let label = take_text(&mut stmts, RDFS_LABEL);
    let mut class = None;
    let mut values = Vec::new();
    let mut rest = Vec::new();
    for (p, o) in stmts {
        match (&p[..], &o) {
            (RDF_TYPE, Value::Iri(t)) if t == OWL_NAMED_INDIVIDUAL => {}
            (RDF_TYPE, Value::Iri(t)) if class.is_none() => class = Some(t.clone()),
            (RDF_TYPE, _) => rest.push((p, o)),
            _ => values.push((p, o)),
        }
    }
    let mut ind = Individual::new(id, class.unwrap_or_else(|| OWL_THING.to_owned()));
    ind.label = label;
    ind.values = values;
    (ind, rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TTL: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
@prefix skos: <http://www.w3.org/2004/02/skos/core#> .
@prefix emmo: <http://emmo.info/emmo#> .

<http://emmo.info/emmo> a owl:Ontology ;
  owl:versionInfo "1.0.0-beta" .

emmo:EMMO_0001 a owl:Class ;
  skos:prefLabel "Device"@en ;
  rdfs:subClassOf [ a owl:Restriction ; owl:onProperty emmo:hasPart ; owl:someValuesFrom owl:Thing ] .

emmo:hasPart a owl:ObjectProperty ;
  rdfs:domain emmo:EMMO_0001 ;
  rdfs:range emmo:EMMO_0001 .

emmo:numWells a owl:DatatypeProperty , owl:FunctionalProperty ;
  rdfs:range xsd:integer .

emmo:plate1 a owl:NamedIndividual , emmo:EMMO_0001 ;
  rdfs:label "plate" ;
  emmo:numWells 96 .
"#;

    #[test]
    fn parses_turtle_with_blank_nodes() {
        let triples = parse_str(TTL, Syntax::Turtle).expect("valid turtle");
        assert!(triples.iter().any(|t| matches!(t.subject, Node::Blank(_))));
    }

    #[test]
    fn lifts_classes_properties_and_individuals() {
        let triples = parse_str(TTL, Syntax::Turtle).expect("valid turtle");
        let ns = lift("http://emmo.info/emmo#", "emmo", triples);
        assert_eq!(ns.version.as_deref(), Some("1.0.0-beta"));
        assert_eq!(ns.classes.len(), 1);
        assert_eq!(ns.properties.len(), 2);
        assert_eq!(ns.individuals.len(), 1);

        let device = &ns.classes[0];
        assert!(device.subclass_of.is_empty(), "restriction parents stay annotations");
        assert!(device
            .annotations
            .iter()
            .any(|(p, v)| p == SKOS_PREF_LABEL && v.as_text() == Some("Device")));

        let wells = ns.find_property("http://emmo.info/emmo#numWells").expect("property");
        assert!(wells.functional);
        assert_eq!(wells.range, Some(Range::Primitive(Primitive::Integer)));

        let plate = &ns.individuals[0];
        assert_eq!(plate.class, "http://emmo.info/emmo#EMMO_0001");
        assert_eq!(
            plate.values_of("http://emmo.info/emmo#numWells").next(),
            Some(&Value::Int(96))
        );
    }

    #[test]
    fn restriction_statements_are_kept() {
        let triples = parse_str(TTL, Syntax::Turtle).expect("valid turtle");
        let before = triples.len();
        let ns = lift("http://emmo.info/emmo", "emmo", triples);
        assert_eq!(ns.triples().len(), before);
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(parse_str("<a> <b> .", Syntax::NTriples).is_err());
        assert!(parse_str("<rdf:RDF", Syntax::RdfXml).is_err());
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = read_triples(Path::new("catalogue.csv")).unwrap_err();
        assert!(matches!(err, LoadError::UnknownSyntax(_)));
    }
}
