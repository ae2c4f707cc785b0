//! Core ontology model types.
//!
//! A graph is held as a list of [`OntologyNamespace`]s. Each namespace owns
//! its classes, properties and named individuals as typed Rust data; the
//! statements that describe none of those are kept verbatim so that an
//! externally supplied ontology survives a load/export cycle.

use serde::{Deserialize, Serialize};

use iris::*;

/// Whether a property is a datatype, object, or annotation property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    /// `owl:DatatypeProperty`: relates a resource to an XSD literal.
    Datatype,
    /// `owl:ObjectProperty`: relates two resources.
    Object,
    /// `owl:AnnotationProperty`: documentation only, ignored by reasoners.
    Annotation,
}

impl PropertyKind {
    /// Returns the OWL type IRI of this property kind.
    #[must_use]
    pub fn type_iri(self) -> &'static str {
        match self {
            PropertyKind::Datatype => OWL_DATATYPE_PROPERTY,
            PropertyKind::Object => OWL_OBJECT_PROPERTY,
            PropertyKind::Annotation => OWL_ANNOTATION_PROPERTY,
        }
    }
}

/// A primitive literal range a catalogue cell can be coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Primitive {
    /// `xsd:string`.
    String,
    /// `xsd:integer`, held as `i64`.
    Integer,
    /// `xsd:double`, held as a finite `f64`.
    Float,
    /// `xsd:boolean`.
    Boolean,
}

impl Primitive {
    /// Returns the XSD datatype IRI for this primitive.
    #[must_use]
    pub fn datatype_iri(self) -> &'static str {
        match self {
            Primitive::String => XSD_STRING,
            Primitive::Integer => XSD_INTEGER,
            Primitive::Float => XSD_DOUBLE,
            Primitive::Boolean => XSD_BOOLEAN,
        }
    }

    /// Maps an XSD datatype IRI back to a primitive, if it is one of ours.
    #[must_use]
    pub fn from_datatype_iri(iri: &str) -> Option<Self> {
        match iri {
            XSD_STRING => Some(Primitive::String),
            XSD_INTEGER => Some(Primitive::Integer),
            XSD_DOUBLE => Some(Primitive::Float),
            XSD_BOOLEAN => Some(Primitive::Boolean),
            _ => None,
        }
    }

    /// Short human-readable name used in diagnostics.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Integer => "integer",
            Primitive::Float => "float",
            Primitive::Boolean => "boolean",
        }
    }
}

/// The declared range of a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Range {
    /// Full IRI of a class (object property).
    Class(String),
    /// One of the primitive literal types (data property).
    Primitive(Primitive),
    /// Any other datatype IRI found in a loaded ontology.
    Datatype(String),
}

impl Range {
    /// Returns the IRI emitted as `rdfs:range`.
    #[must_use]
    pub fn iri(&self) -> &str {
        match self {
            Range::Class(iri) | Range::Datatype(iri) => iri,
            Range::Primitive(p) => p.datatype_iri(),
        }
    }
}

/// An RDF subject: an IRI or a blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    /// Absolute IRI.
    Iri(String),
    /// Blank node label, without the `_:` prefix.
    Blank(String),
}

impl Node {
    /// Returns the IRI if this node is one.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri),
            Node::Blank(_) => None,
        }
    }
}

/// An RDF object term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Reference to another resource.
    Iri(String),
    /// Reference to a blank node.
    Blank(String),
    /// `xsd:string` literal.
    Str(String),
    /// Language-tagged string.
    LangStr {
        /// Lexical value.
        value: String,
        /// BCP 47 language tag.
        lang: String,
    },
    /// `xsd:integer` literal.
    Int(i64),
    /// `xsd:double` literal.
    Float(f64),
    /// `xsd:boolean` literal.
    Bool(bool),
    /// Literal of any other datatype, kept lexically.
    Typed {
        /// Lexical form.
        lexical: String,
        /// Datatype IRI.
        datatype: String,
    },
}

impl Value {
    /// Builds a literal value from its RDF parts, recognizing the
    /// primitive datatypes. A lexical form that does not parse under its
    /// datatype is kept as [`Value::Typed`].
    #[must_use]
    pub fn literal(lexical: &str, datatype: Option<&str>, lang: Option<&str>) -> Self {
        if let Some(lang) = lang {
            return Value::LangStr {
                value: lexical.to_owned(),
                lang: lang.to_owned(),
            };
        }
        let datatype = datatype.unwrap_or(XSD_STRING);
        let parsed = match Primitive::from_datatype_iri(datatype) {
            Some(Primitive::String) => Some(Value::Str(lexical.to_owned())),
            Some(Primitive::Integer) => lexical.trim().parse().ok().map(Value::Int),
            Some(Primitive::Float) => parse_double(lexical).map(Value::Float),
            Some(Primitive::Boolean) => match lexical.trim() {
                "true" | "1" => Some(Value::Bool(true)),
                "false" | "0" => Some(Value::Bool(false)),
                _ => None,
            },
            None => None,
        };
        parsed.unwrap_or_else(|| Value::Typed {
            lexical: lexical.to_owned(),
            datatype: datatype.to_owned(),
        })
    }

    /// Returns the string content for plain and language-tagged strings.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Str(s) | Value::LangStr { value: s, .. } => Some(s),
            _ => None,
        }
    }

    /// Returns the IRI for resource references.
    #[must_use]
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Value::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Returns the lexical form and datatype IRI of a non-language literal.
    #[must_use]
    pub fn typed_literal(&self) -> Option<(String, &str)> {
        match self {
            Value::Str(s) => Some((s.clone(), XSD_STRING)),
            Value::Int(i) => Some((i.to_string(), XSD_INTEGER)),
            Value::Float(f) => Some((format_double(*f), XSD_DOUBLE)),
            Value::Bool(b) => Some((b.to_string(), XSD_BOOLEAN)),
            Value::Typed { lexical, datatype } => Some((lexical.clone(), datatype)),
            Value::Iri(_) | Value::Blank(_) | Value::LangStr { .. } => None,
        }
    }
}

/// Canonical-enough `xsd:double` lexical form (`96.0`, `127.5`, `1e21`).
#[must_use]
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_owned()
    } else if value.is_infinite() {
        if value > 0.0 { "INF" } else { "-INF" }.to_owned()
    } else {
        format!("{value:?}")
    }
}

fn parse_double(lexical: &str) -> Option<f64> {
    match lexical.trim() {
        "INF" => Some(f64::INFINITY),
        "-INF" => Some(f64::NEG_INFINITY),
        "NaN" => Some(f64::NAN),
        other => other.parse().ok(),
    }
}

/// A single RDF statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Triple {
    /// Subject.
    pub subject: Node,
    /// Predicate IRI.
    pub predicate: String,
    /// Object.
    pub object: Value,
}

/// All statements about one subject, in output order. Serializers group
/// by subject so they consume these rather than flat triples.
#[derive(Debug, Clone)]
pub struct Description {
    /// The described resource.
    pub subject: Node,
    /// `rdf:type` objects.
    pub types: Vec<String>,
    /// Remaining (predicate, object) pairs.
    pub statements: Vec<(String, Value)>,
}

impl Description {
    fn new(subject: Node) -> Self {
        Self {
            subject,
            types: Vec::new(),
            statements: Vec::new(),
        }
    }

    fn push(&mut self, predicate: &str, object: Value) {
        self.statements.push((predicate.to_owned(), object));
    }

    fn push_text(&mut self, predicate: &str, text: Option<&str>) {
        if let Some(text) = text {
            self.push(predicate, Value::Str(text.to_owned()));
        }
    }
}

/// An OWL class definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    /// Full IRI.
    pub id: String,
    /// Human-readable label.
    pub label: Option<String>,
    /// Documentation string.
    pub comment: Option<String>,
    /// Full IRIs of parent classes (`rdfs:subClassOf`); a DAG, not a tree.
    pub subclass_of: Vec<String>,
    /// Full IRIs of classes asserted disjoint (`owl:disjointWith`).
    pub disjoint_with: Vec<String>,
    /// Any further statements about the class.
    pub annotations: Vec<(String, Value)>,
}

impl ClassDefinition {
    /// Creates a class with a label derived from its local name.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            label: Some(local_name(&id).to_owned()),
            id,
            comment: None,
            subclass_of: Vec::new(),
            disjoint_with: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// The local part of the class IRI.
    #[must_use]
    pub fn name(&self) -> &str {
        local_name(&self.id)
    }
}

/// An OWL property definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    /// Full IRI.
    pub id: String,
    /// Human-readable label.
    pub label: Option<String>,
    /// Documentation string.
    pub comment: Option<String>,
    /// Datatype, object, or annotation property.
    pub kind: PropertyKind,
    /// Whether this is also an `owl:FunctionalProperty`.
    pub functional: bool,
    /// Full IRI of the domain class, or `None` if unspecified.
    pub domain: Option<String>,
    /// Declared range, or `None` if unspecified.
    pub range: Option<Range>,
}

impl PropertyDefinition {
    /// The local part of the property IRI.
    #[must_use]
    pub fn name(&self) -> &str {
        local_name(&self.id)
    }
}

/// A named individual (`owl:NamedIndividual`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    /// Full IRI, unique within its namespace.
    pub id: String,
    /// Full IRI of the class this individual is an instance of.
    pub class: String,
    /// Human-readable label.
    pub label: Option<String>,
    /// Property assertions: pairs of (property IRI, value).
    pub values: Vec<(String, Value)>,
}

impl Individual {
    /// Creates an individual with no property assertions.
    #[must_use]
    pub fn new(id: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: class.into(),
            label: None,
            values: Vec::new(),
        }
    }

    /// Adds a property value, enforcing the functional constraint.
    ///
    /// # Errors
    ///
    /// Returns [`CardinalityError`](crate::error::CardinalityError) when the
    /// property is functional and already holds a value.
    pub fn assert(
        &mut self,
        property: &PropertyDefinition,
        value: Value,
    ) -> Result<(), crate::error::CardinalityError> {
        if property.functional && self.values_of(&property.id).next().is_some() {
            return Err(crate::error::CardinalityError {
                individual: self.id.clone(),
                property: property.id.clone(),
            });
        }
        self.values.push((property.id.clone(), value));
        Ok(())
    }

    /// Iterates over the values asserted for one property.
    pub fn values_of<'a>(&'a self, property: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.values
            .iter()
            .filter(move |(p, _)| p == property)
            .map(|(_, v)| v)
    }

    /// The local part of the individual IRI.
    #[must_use]
    pub fn name(&self) -> &str {
        local_name(&self.id)
    }
}

/// A named sub-graph: ontology header plus the terms it defines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyNamespace {
    /// Base IRI, without a trailing separator.
    pub iri: String,
    /// Prefix used by serializers (e.g. `"lodevt"`).
    pub prefix: String,
    /// Human-readable label.
    pub label: Option<String>,
    /// Description of the namespace.
    pub comment: Option<String>,
    /// `owl:versionInfo`.
    pub version: Option<String>,
    /// Full IRIs of imported namespaces (`owl:imports`).
    pub imports: Vec<String>,
    /// All OWL classes defined in this namespace.
    pub classes: Vec<ClassDefinition>,
    /// All OWL properties defined in this namespace.
    pub properties: Vec<PropertyDefinition>,
    /// All named individuals declared in this namespace.
    pub individuals: Vec<Individual>,
    /// Statements that belong to none of the above.
    pub statements: Vec<Triple>,
}

impl OntologyNamespace {
    /// Creates an empty namespace rooted at `iri`.
    #[must_use]
    pub fn new(iri: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            iri: iri.into(),
            prefix: prefix.into(),
            label: None,
            comment: None,
            version: None,
            imports: Vec::new(),
            classes: Vec::new(),
            properties: Vec::new(),
            individuals: Vec::new(),
            statements: Vec::new(),
        }
    }

    /// Mints the IRI of a term defined in this namespace.
    #[must_use]
    pub fn term(&self, local: &str) -> String {
        format!("{}#{}", self.iri, local)
    }

    /// The namespace IRI used for term minting and prefix declarations.
    #[must_use]
    pub fn term_prefix(&self) -> String {
        format!("{}#", self.iri)
    }

    /// Last path segment of the base IRI, used as the export file stem.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.iri
            .trim_end_matches(['/', '#'])
            .rsplit(['/', '#'])
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("ontology")
    }

    /// Adds an import, ignoring duplicates.
    pub fn add_import(&mut self, iri: &str) {
        if !self.imports.iter().any(|i| i == iri) {
            self.imports.push(iri.to_owned());
        }
    }

    /// Looks up a class by its full IRI.
    #[must_use]
    pub fn find_class(&self, iri: &str) -> Option<&ClassDefinition> {
        self.classes.iter().find(|c| c.id == iri)
    }

    /// Looks up a property by its full IRI.
    #[must_use]
    pub fn find_property(&self, iri: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.id == iri)
    }

    /// Looks up a property by local name.
    #[must_use]
    pub fn find_property_named(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name() == name)
    }

    /// Looks up a named individual by its full IRI.
    #[must_use]
    pub fn find_individual(&self, iri: &str) -> Option<&Individual> {
        self.individuals.iter().find(|i| i.id == iri)
    }

    /// Finds an individual by local name or label.
    #[must_use]
    pub fn find_individual_named(&self, name: &str) -> Option<&Individual> {
        self.individuals
            .iter()
            .find(|i| i.name() == name || i.label.as_deref() == Some(name))
    }

    /// Whether any term (class, property, individual) has this IRI.
    #[must_use]
    pub fn defines(&self, iri: &str) -> bool {
        self.find_class(iri).is_some()
            || self.find_property(iri).is_some()
            || self.find_individual(iri).is_some()
    }

    /// Groups everything in the namespace by subject, in a stable order:
    /// ontology header, classes, properties, individuals, other statements.
    #[must_use]
    pub fn describe(&self) -> Vec<Description> {
        let mut out = Vec::with_capacity(
            1 + self.classes.len() + self.properties.len() + self.individuals.len(),
        );

        let mut header = Description::new(Node::Iri(self.iri.clone()));
        header.types.push(OWL_ONTOLOGY.to_owned());
        header.push_text(RDFS_LABEL, self.label.as_deref());
        header.push_text(RDFS_COMMENT, self.comment.as_deref());
        header.push_text(OWL_VERSION_INFO, self.version.as_deref());
        for import in &self.imports {
            header.push(OWL_IMPORTS, Value::Iri(import.clone()));
        }
        out.push(header);

        for class in &self.classes {
            let mut d = Description::new(Node::Iri(class.id.clone()));
            d.types.push(OWL_CLASS.to_owned());
            d.push_text(RDFS_LABEL, class.label.as_deref());
            d.push_text(RDFS_COMMENT, class.comment.as_deref());
            for parent in &class.subclass_of {
                d.push(RDFS_SUBCLASS_OF, Value::Iri(parent.clone()));
            }
            for other in &class.disjoint_with {
                d.push(OWL_DISJOINT_WITH, Value::Iri(other.clone()));
            }
            d.statements.extend(class.annotations.iter().cloned());
            out.push(d);
        }

        for prop in &self.properties {
            let mut d = Description::new(Node::Iri(prop.id.clone()));
            d.types.push(prop.kind.type_iri().to_owned());
            if prop.functional {
                d.types.push(OWL_FUNCTIONAL_PROPERTY.to_owned());
            }
            d.push_text(RDFS_LABEL, prop.label.as_deref());
            d.push_text(RDFS_COMMENT, prop.comment.as_deref());
            if let Some(domain) = &prop.domain {
                d.push(RDFS_DOMAIN, Value::Iri(domain.clone()));
            }
            if let Some(range) = &prop.range {
                d.push(RDFS_RANGE, Value::Iri(range.iri().to_owned()));
            }
            out.push(d);
        }

        for ind in &self.individuals {
            let mut d = Description::new(Node::Iri(ind.id.clone()));
            d.types.push(OWL_NAMED_INDIVIDUAL.to_owned());
            d.types.push(ind.class.clone());
            d.push_text(RDFS_LABEL, ind.label.as_deref());
            d.statements.extend(ind.values.iter().cloned());
            out.push(d);
        }

        // Remaining statements, grouped by subject in first-seen order.
        for triple in &self.statements {
            let index = match out.iter().position(|d| d.subject == triple.subject) {
                Some(index) => index,
                None => {
                    out.push(Description::new(triple.subject.clone()));
                    out.len() - 1
                }
            };
            let d = &mut out[index];
            match (&triple.predicate[..], &triple.object) {
                (RDF_TYPE, Value::Iri(t)) => d.types.push(t.clone()),
                _ => d.push(&triple.predicate, triple.object.clone()),
            }
        }

        out
    }

    /// Flattens [`describe`](Self::describe) into individual triples.
    #[must_use]
    pub fn triples(&self) -> Vec<Triple> {
        let mut out = Vec::new();
        for d in self.describe() {
            for t in &d.types {
                out.push(Triple {
                    subject: d.subject.clone(),
                    predicate: RDF_TYPE.to_owned(),
                    object: Value::Iri(t.clone()),
                });
            }
            for (p, o) in d.statements {
                out.push(Triple {
                    subject: d.subject.clone(),
                    predicate: p,
                    object: o,
                });
            }
        }
        out
    }
}

/// Returns the part of an IRI after the last `#` or `/`.
#[must_use]
pub fn local_name(iri: &str) -> &str {
    iri.rsplit(['#', '/']).next().unwrap_or(iri)
}

/// Standard IRI constants used across all namespace modules.
pub mod iris {
    /// OWL namespace.
    pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
    /// RDF namespace.
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
    /// RDFS namespace.
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
    /// XSD namespace.
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
    /// SKOS namespace.
    pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
    /// Dublin Core terms namespace.
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";

    /// `rdf:type`.
    pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    /// `rdfs:label`.
    pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    /// `rdfs:comment`.
    pub const RDFS_COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    /// `rdfs:subClassOf`.
    pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    /// `rdfs:domain`.
    pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";
    /// `rdfs:range`.
    pub const RDFS_RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
    /// `rdfs:Class`.
    pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";
    /// `rdfs:seeAlso`.
    pub const RDFS_SEE_ALSO: &str = "http://www.w3.org/2000/01/rdf-schema#seeAlso";
    /// `skos:prefLabel`.
    pub const SKOS_PREF_LABEL: &str = "http://www.w3.org/2004/02/skos/core#prefLabel";

    /// `owl:Ontology`.
    pub const OWL_ONTOLOGY: &str = "http://www.w3.org/2002/07/owl#Ontology";
    /// `owl:imports`.
    pub const OWL_IMPORTS: &str = "http://www.w3.org/2002/07/owl#imports";
    /// `owl:versionInfo`.
    pub const OWL_VERSION_INFO: &str = "http://www.w3.org/2002/07/owl#versionInfo";
    /// `owl:Thing`.
    pub const OWL_THING: &str = "http://www.w3.org/2002/07/owl#Thing";
    /// `owl:Class`.
    pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
    /// `owl:ObjectProperty`.
    pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
    /// `owl:DatatypeProperty`.
    pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
    /// `owl:AnnotationProperty`.
    pub const OWL_ANNOTATION_PROPERTY: &str = "http://www.w3.org/2002/07/owl#AnnotationProperty";
    /// `owl:FunctionalProperty`.
    pub const OWL_FUNCTIONAL_PROPERTY: &str = "http://www.w3.org/2002/07/owl#FunctionalProperty";
    /// `owl:NamedIndividual`.
    pub const OWL_NAMED_INDIVIDUAL: &str = "http://www.w3.org/2002/07/owl#NamedIndividual";
    /// `owl:disjointWith`.
    pub const OWL_DISJOINT_WITH: &str = "http://www.w3.org/2002/07/owl#disjointWith";

    // XSD datatypes
    /// `xsd:string`.
    pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    /// `xsd:integer`.
    pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    /// `xsd:double`.
    pub const XSD_DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
    /// `xsd:boolean`.
    pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
}
