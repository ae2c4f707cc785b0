//! Error taxonomy for the ontology build.
//!
//! Namespace- and format-scoped failures ([`LoadError`],
//! [`SchemaDefinitionError`], [`ExportError`]) abort the current stage and
//! are returned to the caller. Cell- and row-scoped failures
//! ([`TypeCoercionError`], [`CardinalityError`]) are collected into an
//! [`ImportReport`](crate::namespaces::abox::ImportReport) instead.

use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::BuildStage;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// A namespace source could not be read or resolved.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The source is not a valid serialized graph.
    #[error("failed to parse {path} as {syntax}: {message}")]
    Parse {
        /// Offending path.
        path: PathBuf,
        /// Syntax the parser expected.
        syntax: &'static str,
        /// Parser message.
        message: String,
    },
    /// The file extension does not name a known RDF syntax.
    #[error("cannot infer an RDF syntax from {0}")]
    UnknownSyntax(PathBuf),
    /// A namespace with the same identifier is already in the store.
    #[error("namespace {0} is already loaded")]
    AlreadyLoaded(String),
    /// A namespace that should be in the store is not.
    #[error("namespace {0} is not loaded")]
    NotLoaded(String),
    /// The persisted store file is corrupt.
    #[error("store file {path} is corrupt: {message}")]
    Store {
        /// Store file path.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },
    /// A catalog file could not be parsed.
    #[error("catalog file {path} is invalid: {message}")]
    Catalog {
        /// Catalog file path.
        path: PathBuf,
        /// Reason.
        message: String,
    },
    /// The catalogue header row could not be read.
    #[error("failed to read catalogue header of {path}: {message}")]
    Csv {
        /// Catalogue path.
        path: PathBuf,
        /// Reader message.
        message: String,
    },
}

/// A duplicate or conflicting class/property declaration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaDefinitionError {
    /// A class with this IRI is already declared.
    #[error("class {0} is declared twice")]
    DuplicateClass(String),
    /// A property with this name is already declared in the namespace.
    #[error("property {0} is declared twice")]
    DuplicateProperty(String),
    /// A class reference does not resolve in the vocabulary it names.
    #[error("unknown class {name} in {vocabulary}")]
    UnknownClass {
        /// Referenced name.
        name: String,
        /// Vocabulary the name was looked up in.
        vocabulary: String,
    },
}

/// A functional property was assigned a second value.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("functional property {property} already has a value on {individual}")]
pub struct CardinalityError {
    /// Individual IRI.
    pub individual: String,
    /// Property IRI.
    pub property: String,
}

/// A catalogue cell could not be converted to its property's range.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot convert {value:?} to {expected}")]
pub struct TypeCoercionError {
    /// Raw cell text.
    pub value: String,
    /// Expected range, human-readable.
    pub expected: String,
}

/// A namespace could not be exported.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The requested format is not one of the enumerated export formats.
    #[error("unsupported export format {0:?} (expected one of turtle, owl, rdf, xml, n3, nt, json-ld)")]
    UnsupportedFormat(String),
    /// The output path cannot be created or written.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Offending path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A predicate IRI has no XML-qualified-name form.
    #[error("predicate {0} cannot be written as an XML element name")]
    Unserializable(String),
    /// JSON encoding failed.
    #[error("failed to encode JSON-LD: {0}")]
    Json(#[from] serde_json::Error),
    /// The namespace to export is not in the store.
    #[error("namespace {0} is not loaded")]
    UnknownNamespace(String),
    /// An existing catalog file in the output directory is unreadable.
    #[error(transparent)]
    Catalog(#[from] LoadError),
}

/// Any fatal error raised by the build.
#[derive(Debug, Error)]
pub enum Error {
    /// See [`LoadError`].
    #[error(transparent)]
    Load(#[from] LoadError),
    /// See [`SchemaDefinitionError`].
    #[error(transparent)]
    Schema(#[from] SchemaDefinitionError),
    /// See [`CardinalityError`].
    #[error(transparent)]
    Cardinality(#[from] CardinalityError),
    /// See [`ExportError`].
    #[error(transparent)]
    Export(#[from] ExportError),
    /// The persisted store could not be written.
    #[error("failed to persist store to {path}: {source}")]
    Persist {
        /// Store file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A pipeline operation was called in the wrong build stage.
    #[error("cannot {operation} in stage {actual:?}")]
    Stage {
        /// Operation attempted.
        operation: &'static str,
        /// Current stage.
        actual: BuildStage,
    },
}
