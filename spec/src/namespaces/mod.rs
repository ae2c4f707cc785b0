//! The four namespaces of the device ontology.
//!
//! Each sub-module owns one namespace, listed in dependency order:
//! `emmo → extension → tbox → abox`. The terminology namespaces carry their
//! schema as static tables; see [`crate::schema`] for how they are applied.

pub mod abox;
pub mod emmo;
pub mod extension;
pub mod tbox;

use crate::model::OntologyNamespace;

/// `owl:versionInfo` stamped on every namespace this crate defines.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

fn describe(namespace: &mut OntologyNamespace, label: &str, comment: &str) {
    if namespace.label.is_none() {
        namespace.label = Some(label.to_owned());
    }
    if namespace.comment.is_none() {
        namespace.comment = Some(comment.to_owned());
    }
    if namespace.version.is_none() {
        namespace.version = Some(VERSION.to_owned());
    }
}
