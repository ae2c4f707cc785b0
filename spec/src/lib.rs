//! LabOP device ontology: a labware knowledge graph built on EMMO.
//!
//! The `labop-device-ontology` crate builds four layered namespaces (the
//! EMMO upper ontology, a laboratory extension, the device terminology
//! box, and an assertion box of devices imported from CSV catalogues) and
//! serializes them to Turtle, N3, N-Triples, RDF/XML and JSON-LD together
//! with an XML catalog describing how they import each other.
//!
//! # Entry Point
//!
//! ```
//! use labop_device_ontology::{BuildStage, LabwarePipeline, PipelineConfig};
//!
//! let mut pipeline = LabwarePipeline::new(PipelineConfig::default())?;
//! pipeline.prepare()?;
//! assert_eq!(pipeline.stage(), BuildStage::TBoxDefined);
//! # Ok::<(), labop_device_ontology::Error>(())
//! ```
//!
//! # Serialization
//!
//! ```
//! use labop_device_ontology::{export, namespaces::emmo, ExportFormat, Exporter, GraphStore};
//!
//! let mut store = GraphStore::in_memory();
//! emmo::load(&mut store, None)?;
//! let upper = store.namespace(emmo::IRI).ok_or("not loaded")?;
//! let prefixes = Exporter::new(&store).prefixes(upper);
//! let turtle = export::serialize(upper, ExportFormat::Turtle, &prefixes)?;
//! assert!(turtle.contains("owl:Ontology"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::missing_errors_doc
)]
#![warn(missing_docs)]

pub mod catalog;
pub mod error;
pub mod export;
pub mod format;
pub mod logging;
pub mod model;
pub mod namespaces;
pub mod pipeline;
pub mod reader;
pub mod schema;
pub mod serializer;
pub mod store;

pub use catalog::{Catalog, CatalogEntry, CATALOG_FILE_NAME};
pub use error::{
    CardinalityError, Error, ExportError, LoadError, Result, SchemaDefinitionError,
    TypeCoercionError,
};
pub use export::Exporter;
pub use format::{ExportFormat, Syntax};
pub use model::{
    ClassDefinition, Individual, Node, OntologyNamespace, Primitive, PropertyDefinition,
    PropertyKind, Range, Triple, Value,
};
pub use namespaces::abox::{ImportReport, ImportWarning, InstanceBuilder, RowError, RowErrorKind};
pub use pipeline::{BuildStage, LabwarePipeline, PipelineConfig};
pub use schema::{EditingScope, Vocabulary};
pub use store::GraphStore;
