//! The graph store: every loaded namespace plus the catalog that maps
//! ontology identifiers to where they were loaded from.
//!
//! A store is either ephemeral (in memory only) or persisted as a single
//! JSON snapshot file, which is read back on [`GraphStore::open`] and
//! rewritten by [`GraphStore::persist`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{Error, LoadError, Result};
use crate::model::{ClassDefinition, Individual, OntologyNamespace, PropertyDefinition};
use crate::reader;

/// Strips trailing `/` and `#` from an ontology identifier.
#[must_use]
pub fn normalize_identifier(identifier: &str) -> &str {
    identifier.trim_end_matches(['/', '#'])
}

/// In-memory or persisted set of namespaces.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GraphStore {
    #[serde(skip)]
    location: Option<PathBuf>,
    namespaces: Vec<OntologyNamespace>,
    catalog: Catalog,
}

impl GraphStore {
    /// Creates an ephemeral store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Opens the store file at `location`, or an ephemeral store when
    /// `location` is `None`. A missing file yields an empty store that will
    /// be written there on the next [`persist`](Self::persist).
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] if an existing file cannot be read and
    /// [`LoadError::Store`] if it is not a valid snapshot.
    pub fn open(location: Option<&Path>) -> std::result::Result<Self, LoadError> {
        let Some(path) = location else {
            return Ok(Self::in_memory());
        };
        if !path.exists() {
            debug!(path = %path.display(), "creating new store");
            return Ok(Self {
                location: Some(path.to_owned()),
                ..Self::default()
            });
        }
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_owned(),
            source,
        })?;
        let mut store: Self = serde_json::from_str(&text).map_err(|e| LoadError::Store {
            path: path.to_owned(),
            message: e.to_string(),
        })?;
        store.location = Some(path.to_owned());
        info!(
            path = %path.display(),
            namespaces = store.namespaces.len(),
            "opened persisted store"
        );
        Ok(store)
    }

    /// Opens the store file `<dir>/<name>`, creating `dir` when needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persist`] if the directory cannot be created, and
    /// the errors of [`open`](Self::open) otherwise.
    pub fn open_in(dir: &Path, name: &str) -> Result<Self> {
        std::fs::create_dir_all(dir).map_err(|source| Error::Persist {
            path: dir.to_owned(),
            source,
        })?;
        Ok(Self::open(Some(&dir.join(name)))?)
    }

    /// Path of the store file, or `None` for an ephemeral store.
    #[must_use]
    pub fn location(&self) -> Option<&Path> {
        self.location.as_deref()
    }

    /// Loads the namespace `identifier`, from `source` if given, else as an
    /// empty namespace. The identifier is normalized and registered in the
    /// catalog before the namespace is returned.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::AlreadyLoaded`] if the identifier is taken, and
    /// the reader's errors if `source` cannot be read or parsed.
    pub fn load_namespace(
        &mut self,
        identifier: &str,
        prefix: &str,
        source: Option<&Path>,
    ) -> std::result::Result<&mut OntologyNamespace, LoadError> {
        let iri = normalize_identifier(identifier);
        if self.namespace(iri).is_some() {
            return Err(LoadError::AlreadyLoaded(iri.to_owned()));
        }
        let (namespace, location) = match source {
            Some(path) => {
                let triples = reader::read_triples(path)?;
                debug!(path = %path.display(), triples = triples.len(), "parsed namespace source");
                (
                    reader::lift(iri, prefix, triples),
                    path.display().to_string(),
                )
            }
            None => (OntologyNamespace::new(iri, prefix), iri.to_owned()),
        };
        self.insert_namespace(namespace, location)
    }

    /// Adds an already-built namespace and records where it came from.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::AlreadyLoaded`] if the identifier is taken.
    pub fn insert_namespace(
        &mut self,
        mut namespace: OntologyNamespace,
        location: impl Into<String>,
    ) -> std::result::Result<&mut OntologyNamespace, LoadError> {
        namespace.iri = normalize_identifier(&namespace.iri).to_owned();
        if self.namespace(&namespace.iri).is_some() {
            return Err(LoadError::AlreadyLoaded(namespace.iri));
        }
        self.catalog.register(namespace.iri.clone(), location);
        info!(
            iri = %namespace.iri,
            classes = namespace.classes.len(),
            properties = namespace.properties.len(),
            individuals = namespace.individuals.len(),
            "namespace loaded"
        );
        self.namespaces.push(namespace);
        let index = self.namespaces.len() - 1;
        Ok(&mut self.namespaces[index])
    }

    /// Looks up a namespace by identifier (trailing separators ignored).
    #[must_use]
    pub fn namespace(&self, identifier: &str) -> Option<&OntologyNamespace> {
        let iri = normalize_identifier(identifier);
        self.namespaces.iter().find(|n| n.iri == iri)
    }

    /// Mutable lookup of a namespace.
    pub fn namespace_mut(&mut self, identifier: &str) -> Option<&mut OntologyNamespace> {
        let iri = normalize_identifier(identifier);
        self.namespaces.iter_mut().find(|n| n.iri == iri)
    }

    /// All namespaces, in load order.
    #[must_use]
    pub fn namespaces(&self) -> &[OntologyNamespace] {
        &self.namespaces
    }

    /// The identifier → location catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Transitive imports of a namespace in breadth-first order. Imports
    /// that are not loaded are listed but not followed.
    #[must_use]
    pub fn dependencies(&self, identifier: &str) -> Vec<String> {
        let root = normalize_identifier(identifier);
        let mut out: Vec<String> = Vec::new();
        let mut queue: Vec<String> = match self.namespace(root) {
            Some(ns) => ns.imports.clone(),
            None => return out,
        };
        while !queue.is_empty() {
            let next = queue.remove(0);
            let iri = normalize_identifier(&next).to_owned();
            if iri == root || out.contains(&iri) {
                continue;
            }
            if let Some(ns) = self.namespace(&iri) {
                queue.extend(ns.imports.iter().cloned());
            }
            out.push(iri);
        }
        out
    }

    /// Finds a class defined in any namespace.
    #[must_use]
    pub fn find_class(&self, iri: &str) -> Option<&ClassDefinition> {
        self.namespaces.iter().find_map(|n| n.find_class(iri))
    }

    /// Finds a property defined in any namespace.
    #[must_use]
    pub fn find_property(&self, iri: &str) -> Option<&PropertyDefinition> {
        self.namespaces.iter().find_map(|n| n.find_property(iri))
    }

    /// Finds a named individual in any namespace.
    #[must_use]
    pub fn find_individual(&self, iri: &str) -> Option<&Individual> {
        self.namespaces.iter().find_map(|n| n.find_individual(iri))
    }

    /// Total number of classes across all namespaces.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.namespaces.iter().map(|n| n.classes.len()).sum()
    }

    /// Total number of properties across all namespaces.
    #[must_use]
    pub fn property_count(&self) -> usize {
        self.namespaces.iter().map(|n| n.properties.len()).sum()
    }

    /// Total number of named individuals across all namespaces.
    #[must_use]
    pub fn individual_count(&self) -> usize {
        self.namespaces.iter().map(|n| n.individuals.len()).sum()
    }

    /// Writes the snapshot file. Does nothing for an ephemeral store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Persist`] if the file cannot be written.
    pub fn persist(&self) -> Result<()> {
        let Some(path) = &self.location else {
            return Ok(());
        };
        let persist_err = |source| Error::Persist {
            path: path.clone(),
            source,
        };
        let json = serde_json::to_string(self).map_err(|e| persist_err(std::io::Error::other(e)))?;
        std::fs::write(path, json).map_err(persist_err)?;
        debug!(path = %path.display(), "store persisted");
        Ok(())
    }
}
