//! Declarative schema tables and the editing scope that applies them.
//!
//! Namespaces that define terminology (the extension and the device TBox)
//! describe their classes and properties as static [`ClassSpec`] /
//! [`PropertySpec`] tables. [`apply`] resolves every reference in a table
//! against the store, then stages the resulting definitions in an
//! [`EditingScope`] and commits them in one step.

use tracing::debug;

use crate::error::{Error, LoadError, SchemaDefinitionError};
use crate::model::iris::{OWL_THING, RDFS_LABEL, RDFS_SEE_ALSO, SKOS_PREF_LABEL};
use crate::model::{
    local_name, ClassDefinition, OntologyNamespace, Primitive, PropertyDefinition, PropertyKind,
    Range, Value,
};
use crate::store::GraphStore;

/// A class reference in a schema table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermRef {
    /// `owl:Thing`.
    Thing,
    /// A term of the upper ontology, by local name or label.
    Upper(&'static str),
    /// A term of the laboratory extension.
    Extension(&'static str),
    /// A term of the namespace being defined.
    Local(&'static str),
}

/// The range column of a property table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeSpec {
    /// Data property.
    Primitive(Primitive),
    /// Object property.
    Class(TermRef),
}

/// One row of a class table.
#[derive(Debug, Clone, Copy)]
pub struct ClassSpec {
    /// Local name.
    pub name: &'static str,
    /// Documentation string.
    pub comment: &'static str,
    /// Parent classes; empty means `owl:Thing`.
    pub parents: &'static [TermRef],
    /// English Wikipedia article describing the concept.
    pub wikipedia: Option<&'static str>,
}

/// One row of a property table.
#[derive(Debug, Clone, Copy)]
pub struct PropertySpec {
    /// Local name, unique within the namespace.
    pub name: &'static str,
    /// Documentation string.
    pub comment: &'static str,
    /// Domain class.
    pub domain: TermRef,
    /// Range; decides between datatype and object property.
    pub range: RangeSpec,
    /// Whether at most one value is allowed per individual.
    pub functional: bool,
}

impl PropertySpec {
    /// Datatype property when the range is primitive, object property otherwise.
    #[must_use]
    pub fn kind(&self) -> PropertyKind {
        match self.range {
            RangeSpec::Primitive(_) => PropertyKind::Datatype,
            RangeSpec::Class(_) => PropertyKind::Object,
        }
    }
}

/// Name-based lookup into one namespace.
///
/// A name matches a term's local name, its `rdfs:label` or its
/// `skos:prefLabel`, so opaque identifiers can be addressed by label.
#[derive(Debug, Clone, Copy)]
pub struct Vocabulary<'a> {
    namespace: &'a OntologyNamespace,
}

impl<'a> Vocabulary<'a> {
    /// Wraps a namespace.
    #[must_use]
    pub fn of(namespace: &'a OntologyNamespace) -> Self {
        Self { namespace }
    }

    /// The underlying namespace.
    #[must_use]
    pub fn namespace(&self) -> &'a OntologyNamespace {
        self.namespace
    }

    /// Resolves a class name to its IRI.
    #[must_use]
    pub fn find_class(&self, name: &str) -> Option<&'a str> {
        let classes = &self.namespace.classes;
        classes
            .iter()
            .find(|c| c.name() == name)
            .or_else(|| {
                classes.iter().find(|c| {
                    c.label.as_deref() == Some(name) || has_label(&c.annotations, name)
                })
            })
            .map(|c| c.id.as_str())
    }

    /// Resolves a class name, failing with [`SchemaDefinitionError::UnknownClass`].
    ///
    /// # Errors
    ///
    /// Returns `UnknownClass` when no class matches.
    pub fn class(&self, name: &str) -> Result<&'a str, SchemaDefinitionError> {
        self.find_class(name)
            .ok_or_else(|| SchemaDefinitionError::UnknownClass {
                name: name.to_owned(),
                vocabulary: self.namespace.iri.clone(),
            })
    }

    /// Resolves a property by local name or label.
    #[must_use]
    pub fn find_property(&self, name: &str) -> Option<&'a PropertyDefinition> {
        let properties = &self.namespace.properties;
        properties
            .iter()
            .find(|p| p.name() == name)
            .or_else(|| properties.iter().find(|p| p.label.as_deref() == Some(name)))
    }
}

fn has_label(annotations: &[(String, Value)], name: &str) -> bool {
    annotations.iter().any(|(p, v)| {
        (p == SKOS_PREF_LABEL || p == RDFS_LABEL) && v.as_text() == Some(name)
    })
}

/// Staged declarations for one namespace.
///
/// Nothing is visible in the namespace until [`commit`](Self::commit);
/// dropping the scope discards every staged declaration.
#[derive(Debug)]
pub struct EditingScope<'a> {
    namespace: &'a mut OntologyNamespace,
    imports: Vec<String>,
    classes: Vec<ClassDefinition>,
    properties: Vec<PropertyDefinition>,
}

impl<'a> EditingScope<'a> {
    /// Opens a scope on a namespace.
    pub fn new(namespace: &'a mut OntologyNamespace) -> Self {
        Self {
            namespace,
            imports: Vec::new(),
            classes: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Stages an `owl:imports`.
    pub fn import(&mut self, iri: &str) {
        if !self.imports.iter().any(|i| i == iri) {
            self.imports.push(iri.to_owned());
        }
    }

    /// Stages a class declaration.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDefinitionError::DuplicateClass`] if the IRI is
    /// already declared in the namespace or in this scope.
    pub fn declare_class(&mut self, class: ClassDefinition) -> Result<(), SchemaDefinitionError> {
        if self.namespace.find_class(&class.id).is_some()
            || self.classes.iter().any(|c| c.id == class.id)
        {
            return Err(SchemaDefinitionError::DuplicateClass(class.id));
        }
        self.classes.push(class);
        Ok(())
    }

    /// Stages a property declaration. Names are unique per namespace.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaDefinitionError::DuplicateProperty`] on a name clash.
    pub fn declare_property(
        &mut self,
        property: PropertyDefinition,
    ) -> Result<(), SchemaDefinitionError> {
        let name = property.name();
        if self.namespace.find_property_named(name).is_some()
            || self.properties.iter().any(|p| p.name() == name)
        {
            return Err(SchemaDefinitionError::DuplicateProperty(name.to_owned()));
        }
        self.properties.push(property);
        Ok(())
    }

    /// Appends every staged declaration to the namespace.
    pub fn commit(self) -> SchemaSummary {
        let summary = SchemaSummary {
            classes: self.classes.len(),
            properties: self.properties.len(),
        };
        for iri in &self.imports {
            self.namespace.add_import(iri);
        }
        self.namespace.classes.extend(self.classes);
        self.namespace.properties.extend(self.properties);
        summary
    }
}

/// Counts of committed declarations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchemaSummary {
    /// Classes added.
    pub classes: usize,
    /// Properties added.
    pub properties: usize,
}

/// Where the references of a table resolve.
#[derive(Debug, Clone, Copy)]
pub struct SchemaContext<'s> {
    /// Identifier of the namespace being defined.
    pub target: &'s str,
    /// Identifier of the upper ontology.
    pub upper: &'s str,
    /// Identifier of the laboratory extension, if the table uses it.
    pub extension: Option<&'s str>,
}

/// Resolves a schema table and commits it to `ctx.target`.
///
/// The target namespace imports every namespace the table refers to.
///
/// # Errors
///
/// Returns [`LoadError::NotLoaded`] if a referenced namespace is missing,
/// and [`SchemaDefinitionError`] for unresolvable names or duplicates. On
/// error the target namespace is left unchanged.
pub fn apply(
    store: &mut GraphStore,
    ctx: SchemaContext<'_>,
    classes: &[ClassSpec],
    properties: &[PropertySpec],
) -> Result<SchemaSummary, Error> {
    let (imports, class_defs, property_defs) = resolve(store, ctx, classes, properties)?;

    let namespace = store
        .namespace_mut(ctx.target)
        .ok_or_else(|| LoadError::NotLoaded(ctx.target.to_owned()))?;
    let mut scope = EditingScope::new(namespace);
    for iri in &imports {
        scope.import(iri);
    }
    for class in class_defs {
        scope.declare_class(class)?;
    }
    for property in property_defs {
        scope.declare_property(property)?;
    }
    let summary = scope.commit();
    debug!(
        namespace = ctx.target,
        classes = summary.classes,
        properties = summary.properties,
        "schema committed"
    );
    Ok(summary)
}

type Resolved = (Vec<String>, Vec<ClassDefinition>, Vec<PropertyDefinition>);

fn resolve(
    store: &GraphStore,
    ctx: SchemaContext<'_>,
    classes: &[ClassSpec],
    properties: &[PropertySpec],
) -> Result<Resolved, Error> {
    let loaded = |iri: &str| {
        store
            .namespace(iri)
            .ok_or_else(|| LoadError::NotLoaded(iri.to_owned()))
    };
    let target = loaded(ctx.target)?;
    let upper = Vocabulary::of(loaded(ctx.upper)?);
    let extension = ctx.extension.map(loaded).transpose()?.map(Vocabulary::of);

    let mut imports = vec![upper.namespace().iri.clone()];
    if let Some(ext) = extension {
        imports.push(ext.namespace().iri.clone());
    }

    let term = |r: TermRef| -> Result<String, SchemaDefinitionError> {
        match r {
            TermRef::Thing => Ok(OWL_THING.to_owned()),
            TermRef::Upper(name) => upper.class(name).map(str::to_owned),
            TermRef::Extension(name) => match extension {
                Some(ext) => ext.class(name).map(str::to_owned),
                None => Err(SchemaDefinitionError::UnknownClass {
                    name: name.to_owned(),
                    vocabulary: "extension".to_owned(),
                }),
            },
            TermRef::Local(name) => {
                let iri = target.term(name);
                if classes.iter().any(|c| c.name == name) || target.find_class(&iri).is_some() {
                    Ok(iri)
                } else {
                    Err(SchemaDefinitionError::UnknownClass {
                        name: name.to_owned(),
                        vocabulary: target.iri.clone(),
                    })
                }
            }
        }
    };

    // EMMO carries its own Wikipedia annotation property; fall back to
    // rdfs:seeAlso for upper ontologies without one.
    let wikipedia = upper
        .find_property("wikipediaReference")
        .map_or(RDFS_SEE_ALSO, |p| p.id.as_str());

    let mut class_defs = Vec::with_capacity(classes.len());
    for spec in classes {
        let mut class = ClassDefinition::new(target.term(spec.name));
        class.comment = Some(spec.comment.to_owned());
        class.subclass_of = if spec.parents.is_empty() {
            vec![OWL_THING.to_owned()]
        } else {
            spec.parents
                .iter()
                .map(|p| term(*p))
                .collect::<Result<_, _>>()?
        };
        if let Some(url) = spec.wikipedia {
            class.annotations.push((
                wikipedia.to_owned(),
                Value::LangStr {
                    value: url.to_owned(),
                    lang: "en".to_owned(),
                },
            ));
        }
        class_defs.push(class);
    }

    let mut property_defs = Vec::with_capacity(properties.len());
    for spec in properties {
        let range = match spec.range {
            RangeSpec::Primitive(p) => Range::Primitive(p),
            RangeSpec::Class(r) => Range::Class(term(r)?),
        };
        property_defs.push(PropertyDefinition {
            id: target.term(spec.name),
            label: Some(spec.name.to_owned()),
            comment: Some(spec.comment.to_owned()),
            kind: spec.kind(),
            functional: spec.functional,
            domain: Some(term(spec.domain)?),
            range: Some(range),
        });
    }

    Ok((imports, class_defs, property_defs))
}

/// Follows `rdfs:subClassOf` from `class` and reports whether it reaches
/// `owl:Thing` or a class with no parents.
#[must_use]
pub fn reaches_root(store: &GraphStore, class: &str) -> bool {
    let mut seen: Vec<&str> = Vec::new();
    let mut stack = vec![class];
    while let Some(iri) = stack.pop() {
        if iri == OWL_THING {
            return true;
        }
        if seen.contains(&iri) {
            continue;
        }
        seen.push(iri);
        match store.find_class(iri) {
            Some(def) if def.subclass_of.is_empty() => return true,
            Some(def) => stack.extend(def.subclass_of.iter().map(String::as_str)),
            None => debug!(class = local_name(iri), "parent not in store"),
        }
    }
    false
}
