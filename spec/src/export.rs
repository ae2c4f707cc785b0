//! Writing namespaces to disk.
//!
//! [`Exporter::export`] serializes one namespace to
//! `<dir>/<base name>.<extension>` and merges a `catalog-v001.xml` in `dir`
//! that maps the namespace and each of its transitive imports to a
//! location that resolves from `dir`.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::catalog::{Catalog, CATALOG_FILE_NAME};
use crate::error::ExportError;
use crate::format::{ExportFormat, Syntax};
use crate::model::OntologyNamespace;
use crate::serializer::{jsonld, ntriples, rdfxml, turtle, Prefixes};
use crate::store::GraphStore;

/// Serializes a namespace in the syntax of `format`.
///
/// # Errors
///
/// Returns [`ExportError::Unserializable`] when RDF/XML cannot express a
/// predicate, and [`ExportError::Json`] if JSON encoding fails.
pub fn serialize(
    namespace: &OntologyNamespace,
    format: ExportFormat,
    prefixes: &Prefixes,
) -> Result<String, ExportError> {
    match format.syntax() {
        Syntax::Turtle => Ok(turtle::to_turtle(namespace, prefixes)),
        Syntax::NTriples => Ok(ntriples::to_ntriples(namespace)),
        Syntax::RdfXml => rdfxml::to_rdf_xml(namespace, prefixes),
        Syntax::JsonLd => Ok(serde_json::to_string_pretty(&jsonld::to_json_ld(
            namespace, prefixes,
        ))?),
    }
}

/// Read-only view of a store that writes its namespaces to disk.
#[derive(Debug, Clone, Copy)]
pub struct Exporter<'s> {
    store: &'s GraphStore,
}

impl<'s> Exporter<'s> {
    /// Creates an exporter over a store.
    #[must_use]
    pub fn new(store: &'s GraphStore) -> Self {
        Self { store }
    }

    /// Prefixes for a namespace: the standard vocabularies, its own, and
    /// those of every loaded dependency.
    #[must_use]
    pub fn prefixes(&self, namespace: &OntologyNamespace) -> Prefixes {
        let mut prefixes = Prefixes::standard();
        prefixes.add(&namespace.prefix, &namespace.term_prefix());
        for dep in self.store.dependencies(&namespace.iri) {
            if let Some(ns) = self.store.namespace(&dep) {
                prefixes.add(&ns.prefix, &ns.term_prefix());
            }
        }
        prefixes
    }

    /// Exports a namespace given a format name.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnsupportedFormat`] for an unknown name, and
    /// the errors of [`export`](Self::export).
    pub fn export_as(&self, identifier: &str, dir: &Path, format: &str) -> Result<PathBuf, ExportError> {
        self.export(identifier, dir, format.parse()?)
    }

    /// Exports a namespace into `dir` and updates the catalog there.
    /// Returns the path of the written file.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::UnknownNamespace`] if the namespace is not
    /// loaded, [`ExportError::Io`] if `dir` or a file in it cannot be
    /// written, and [`ExportError::Catalog`] if an existing catalog there
    /// cannot be read.
    pub fn export(
        &self,
        identifier: &str,
        dir: &Path,
        format: ExportFormat,
    ) -> Result<PathBuf, ExportError> {
        let namespace = self
            .store
            .namespace(identifier)
            .ok_or_else(|| ExportError::UnknownNamespace(identifier.to_owned()))?;
        let io_err = |path: &Path| {
            let path = path.to_owned();
            move |source| ExportError::Io { path, source }
        };

        std::fs::create_dir_all(dir).map_err(io_err(dir))?;
        let file_name = format!("{}.{}", namespace.base_name(), format.extension());
        let path = dir.join(&file_name);
        let text = serialize(namespace, format, &self.prefixes(namespace))?;
        std::fs::write(&path, text).map_err(io_err(&path))?;

        let catalog_path = dir.join(CATALOG_FILE_NAME);
        let mut catalog = if catalog_path.exists() {
            Catalog::read(&catalog_path)?
        } else {
            Catalog::new()
        };
        catalog.register(namespace.iri.clone(), file_name);
        for dep in self.store.dependencies(&namespace.iri) {
            let location = self.dependency_location(&dep, dir, format, &catalog);
            debug!(dependency = %dep, %location, "catalog entry");
            catalog.register(dep, location);
        }
        catalog.write(&catalog_path).map_err(io_err(&catalog_path))?;

        info!(
            namespace = %namespace.iri,
            format = %format,
            path = %path.display(),
            "namespace exported"
        );
        Ok(path)
    }

    /// Picks where a dependency resolves from `dir`: an entry already in
    /// the catalog whose file exists, a file exported into `dir`, or the
    /// location the store loaded it from.
    fn dependency_location(
        &self,
        dep: &str,
        dir: &Path,
        format: ExportFormat,
        catalog: &Catalog,
    ) -> String {
        if let Some(existing) = catalog.resolve(dep) {
            if !is_remote(existing) && dir.join(existing).is_file() {
                return existing.to_owned();
            }
        }
        if let Some(ns) = self.store.namespace(dep) {
            let preferred = std::iter::once(format).chain(ExportFormat::ALL);
            for candidate in preferred {
                let file_name = format!("{}.{}", ns.base_name(), candidate.extension());
                if dir.join(&file_name).is_file() {
                    return file_name;
                }
            }
        }
        match self.store.catalog().resolve(dep) {
            Some(location) if !is_remote(location) && Path::new(location).exists() => {
                relative_to(Path::new(location), dir)
            }
            Some(location) => location.to_owned(),
            None => dep.to_owned(),
        }
    }
}

fn is_remote(location: &str) -> bool {
    location.contains("://")
}

/// `path` relative to `dir` when it lies below it, else absolute.
fn relative_to(path: &Path, dir: &Path) -> String {
    let (Ok(path), Ok(dir)) = (path.canonicalize(), dir.canonicalize()) else {
        return path.display().to_string();
    };
    match path.strip_prefix(&dir) {
        Ok(relative) => relative.display().to_string(),
        Err(_) => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ClassDefinition;

    fn store() -> GraphStore {
        let mut store = GraphStore::in_memory();
        store
            .load_namespace("http://x.org/up", "up", None)
            .expect("up")
            .classes
            .push(ClassDefinition::new("http://x.org/up#Thing"));
        let t = store.load_namespace("http://x.org/t", "t", None).expect("t");
        t.add_import("http://x.org/up");
        let device = ClassDefinition::new(t.term("Device"));
        t.classes.push(device);
        store
    }

    #[test]
    fn writes_file_named_after_base_iri() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store();
        let path = Exporter::new(&store)
            .export("http://x.org/t", dir.path(), ExportFormat::Turtle)
            .expect("export");
        assert_eq!(path, dir.path().join("t.ttl"));
        let text = std::fs::read_to_string(path).expect("read");
        assert!(text.contains("@prefix up: <http://x.org/up#> ."));
    }

    #[test]
    fn catalog_points_at_exported_dependency() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store();
        let exporter = Exporter::new(&store);
        exporter
            .export("http://x.org/t", dir.path(), ExportFormat::NTriples)
            .expect("tbox");
        let catalog = Catalog::read(&dir.path().join(CATALOG_FILE_NAME)).expect("catalog");
        assert_eq!(catalog.resolve("http://x.org/t"), Some("t.nt"));
        // Not exported yet: falls back to the store catalog.
        assert_eq!(catalog.resolve("http://x.org/up"), Some("http://x.org/up"));

        exporter
            .export("http://x.org/up", dir.path(), ExportFormat::NTriples)
            .expect("up");
        exporter
            .export("http://x.org/t", dir.path(), ExportFormat::NTriples)
            .expect("tbox again");
        let catalog = Catalog::read(&dir.path().join(CATALOG_FILE_NAME)).expect("catalog");
        assert_eq!(catalog.resolve("http://x.org/up"), Some("up.nt"));
    }

    #[test]
    fn unsupported_format_name() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store();
        let err = Exporter::new(&store)
            .export_as("http://x.org/t", dir.path(), "csv")
            .unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedFormat(f) if f == "csv"));
        assert!(!dir.path().join(CATALOG_FILE_NAME).exists());
    }

    #[test]
    fn unwritable_directory_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").expect("write");
        let store = store();
        let err = Exporter::new(&store)
            .export("http://x.org/t", &blocker.join("out"), ExportFormat::Turtle)
            .unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }

    #[test]
    fn export_does_not_mutate_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store();
        let before = store.namespace("http://x.org/t").cloned();
        Exporter::new(&store)
            .export("http://x.org/t", dir.path(), ExportFormat::JsonLd)
            .expect("export");
        assert_eq!(store.namespace("http://x.org/t").cloned(), before);
    }
}
