//! `emmo_extension_tbox`: laboratory concepts the upper ontology lacks.
//!
//! Adds a generic device notion and a small location hierarchy
//! (building, laboratory, room) that the device TBox specializes.

use crate::error::Error;
use crate::model::Primitive;
use crate::schema::{self, ClassSpec, PropertySpec, RangeSpec, SchemaContext, SchemaSummary, TermRef};
use crate::store::GraphStore;

/// Base IRI.
pub const IRI: &str = "http://www.labop.org/emmo_extension_tbox";

/// Serializer prefix.
pub const PREFIX: &str = "emmox";

/// Class table.
pub const CLASSES: &[ClassSpec] = &[
    ClassSpec {
        name: "Device",
        comment: "Generic laboratory device: a physical object used in a laboratory.",
        parents: &[TermRef::Upper("Device")],
        wikipedia: None,
    },
    ClassSpec {
        name: "Location",
        comment: "A place where a device can be found.",
        parents: &[TermRef::Upper("Item")],
        wikipedia: None,
    },
    ClassSpec {
        name: "Building",
        comment: "A building housing laboratories.",
        parents: &[TermRef::Local("Location")],
        wikipedia: None,
    },
    ClassSpec {
        name: "Laboratory",
        comment: "A laboratory, usually part of a building.",
        parents: &[TermRef::Local("Location")],
        wikipedia: None,
    },
    ClassSpec {
        name: "Room",
        comment: "A room, usually part of a laboratory or building.",
        parents: &[TermRef::Local("Location")],
        wikipedia: None,
    },
];

/// Property table.
pub const PROPERTIES: &[PropertySpec] = &[
    PropertySpec {
        name: "isPartOfLocation",
        comment: "Containment between locations, e.g. a room in a building.",
        domain: TermRef::Local("Location"),
        range: RangeSpec::Class(TermRef::Local("Location")),
        functional: false,
    },
    PropertySpec {
        name: "hasLocationName",
        comment: "Human-readable name of a location.",
        domain: TermRef::Local("Location"),
        range: RangeSpec::Primitive(Primitive::String),
        functional: true,
    },
];

/// Creates the extension namespace and commits its schema.
///
/// # Errors
///
/// Returns [`Error::Load`] if the upper ontology is not loaded or the
/// extension already is, and [`Error::Schema`] if an upper-ontology anchor
/// cannot be resolved.
pub fn define(store: &mut GraphStore, upper: &str) -> Result<SchemaSummary, Error> {
    let ns = store.load_namespace(IRI, PREFIX, None)?;
    super::describe(
        ns,
        "EMMO laboratory extension",
        "Laboratory concepts (generic devices, locations) extending the EMMO upper ontology.",
    );
    schema::apply(
        store,
        SchemaContext {
            target: IRI,
            upper,
            extension: None,
        },
        CLASSES,
        PROPERTIES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::emmo;

    #[test]
    fn locations_specialize_location() {
        let mut store = GraphStore::in_memory();
        emmo::load(&mut store, None).expect("upper");
        let summary = define(&mut store, emmo::IRI).expect("extension");
        assert_eq!(summary.classes, CLASSES.len());

        let ns = store.namespace(IRI).expect("extension");
        let room = ns.find_class(&ns.term("Room")).expect("room");
        assert_eq!(room.subclass_of, vec![ns.term("Location")]);
        let device = ns.find_class(&ns.term("Device")).expect("device");
        assert_eq!(device.subclass_of, vec![format!("{}#Device", emmo::IRI)]);
        assert_eq!(ns.imports, vec![emmo::IRI.to_owned()]);
    }

    #[test]
    fn requires_the_upper_ontology() {
        let mut store = GraphStore::in_memory();
        assert!(define(&mut store, emmo::IRI).is_err());
    }
}
