//! Upper ontology (EMMO).
//!
//! The device schema anchors on a handful of EMMO concepts. A serialized
//! EMMO file can be loaded instead of the bundled subset; the schema then
//! finds its anchors by `skos:prefLabel`, which is how EMMO names its
//! otherwise opaque `EMMO_<uuid>` classes.

use std::path::Path;

use tracing::info;

use crate::error::LoadError;
use crate::model::iris::*;
use crate::model::{ClassDefinition, OntologyNamespace, PropertyDefinition, PropertyKind, Range, Value};
use crate::schema::Vocabulary;
use crate::store::GraphStore;

/// EMMO base IRI, normalized.
pub const IRI: &str = "http://emmo.info/emmo";

/// Serializer prefix.
pub const PREFIX: &str = "emmo";

/// Names the device schema needs from the upper ontology.
pub const REQUIRED_CLASSES: &[&str] = &["Device", "Item", "Length", "Pressure", "Force", "Vector"];

/// `(name, parent, definition)`; `None` means the class is a root.
const BUNDLED_CLASSES: &[(&str, Option<&str>, &str)] = &[
    ("EMMO", None, "The class of all the OWL individuals declared by EMMO as standing for world entities."),
    ("Item", Some("EMMO"), "A causal object that is a whole."),
    ("Object", Some("Item"), "A self-connected item."),
    ("Device", Some("Object"), "An object which has been designed to be used in a particular way."),
    ("Quantity", Some("EMMO"), "A symbolic that has parts a numerical and a reference unit."),
    ("PhysicalQuantity", Some("Quantity"), "A quantity whose reference unit is a physical measurement unit."),
    ("Length", Some("PhysicalQuantity"), "Extend of a spatial dimension."),
    ("Pressure", Some("PhysicalQuantity"), "The force applied perpendicular to a surface per unit area."),
    ("Force", Some("PhysicalQuantity"), "Any interaction that, when unopposed, will change the motion of an object."),
    ("Mathematical", Some("EMMO"), "The class of general mathematical symbolic objects."),
    ("Vector", Some("Mathematical"), "A one-dimensional array of numbers."),
];

/// Returns the bundled EMMO subset.
#[must_use]
pub fn module() -> OntologyNamespace {
    let mut ns = OntologyNamespace::new(IRI, PREFIX);
    ns.label = Some("Elementary Multiperspective Material Ontology".to_owned());
    ns.comment = Some(
        "Subset of the EMMO upper ontology the laboratory device ontology anchors on."
            .to_owned(),
    );
    ns.version = Some("1.0.0-beta".to_owned());

    for &(name, parent, definition) in BUNDLED_CLASSES {
        let mut class = ClassDefinition::new(ns.term(name));
        class.comment = Some(definition.to_owned());
        if let Some(parent) = parent {
            class.subclass_of.push(ns.term(parent));
        }
        class.annotations.push((
            SKOS_PREF_LABEL.to_owned(),
            Value::LangStr {
                value: name.to_owned(),
                lang: "en".to_owned(),
            },
        ));
        ns.classes.push(class);
    }

    ns.properties.push(PropertyDefinition {
        id: ns.term("wikipediaReference"),
        label: Some("wikipediaReference".to_owned()),
        comment: Some("URL to the corresponding entry in Wikipedia.".to_owned()),
        kind: PropertyKind::Annotation,
        functional: false,
        domain: None,
        range: None,
    });
    ns.properties.push(PropertyDefinition {
        id: ns.term("hasPart"),
        label: Some("hasPart".to_owned()),
        comment: Some("The generic EMMO parthood relation.".to_owned()),
        kind: PropertyKind::Object,
        functional: false,
        domain: Some(ns.term("EMMO")),
        range: Some(Range::Class(ns.term("EMMO"))),
    });
    ns
}

/// Loads the upper ontology from `source`, or the bundled subset when no
/// source is given.
///
/// # Errors
///
/// Returns [`LoadError`] if the source cannot be read or parsed, or if an
/// upper ontology is already loaded.
pub fn load<'s>(
    store: &'s mut GraphStore,
    source: Option<&Path>,
) -> Result<&'s OntologyNamespace, LoadError> {
    let ns = match source {
        Some(path) => store.load_namespace(IRI, PREFIX, Some(path))?,
        None => store.insert_namespace(module(), IRI)?,
    };
    let vocabulary = Vocabulary::of(ns);
    let missing: Vec<&str> = REQUIRED_CLASSES
        .iter()
        .copied()
        .filter(|name| vocabulary.find_class(name).is_none())
        .collect();
    if missing.is_empty() {
        info!(classes = ns.classes.len(), "upper ontology ready");
    } else {
        tracing::warn!(?missing, "upper ontology lacks classes the device schema uses");
    }
    Ok(ns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_subset_resolves_required_classes() {
        let ns = module();
        let vocabulary = Vocabulary::of(&ns);
        for name in REQUIRED_CLASSES {
            assert!(vocabulary.find_class(name).is_some(), "missing {name}");
        }
        let roots = ns
            .classes
            .iter()
            .filter(|c| !c.subclass_of.iter().any(|p| ns.find_class(p).is_some()))
            .count();
        assert_eq!(roots, 1);
    }

    #[test]
    fn every_bundled_class_has_a_definition() {
        for class in &module().classes {
            assert!(class.comment.is_some(), "{} has no definition", class.id);
        }
    }

    #[test]
    fn load_registers_the_normalized_identifier() {
        let mut store = GraphStore::in_memory();
        load(&mut store, None).expect("bundled");
        assert_eq!(store.catalog().resolve(IRI), Some(IRI));
        assert!(matches!(
            load(&mut store, None),
            Err(LoadError::AlreadyLoaded(_))
        ));
    }
}
