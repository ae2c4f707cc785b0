//! `labop_device_abox`: device individuals imported from a catalogue.
//!
//! A catalogue is a CSV file whose header names TBox properties. Each data
//! row becomes one individual. Bad cells and bad rows are collected into an
//! [`ImportReport`]; only an unreadable file or header aborts the import.

use std::fmt;
use std::io;
use std::path::Path;

use sophia_api::term::IriRef;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::{CardinalityError, Error, LoadError, TypeCoercionError};
use crate::model::{
    local_name, Individual, OntologyNamespace, Primitive, PropertyDefinition, Range, Value,
};
use crate::schema::Vocabulary;
use crate::store::GraphStore;

use super::tbox;

/// Base IRI.
pub const IRI: &str = "http://www.labop.org/labop_device_abox";

/// Serializer prefix.
pub const PREFIX: &str = "lodeva";

/// Local-name prefix of minted individuals (`device_1`, `device_2`, ...).
pub const INDIVIDUAL_PREFIX: &str = "device_";

/// Reserved column naming the TBox class of a row.
pub const CLASS_COLUMN: &str = "Class";

/// Reserved column holding the individual's label.
pub const LABEL_COLUMN: &str = "Label";

/// Creates the empty ABox namespace, importing the TBox.
///
/// # Errors
///
/// Returns [`LoadError::AlreadyLoaded`] if the ABox exists.
pub fn create<'s>(
    store: &'s mut GraphStore,
    tbox: &str,
) -> Result<&'s mut OntologyNamespace, LoadError> {
    let ns = store.load_namespace(IRI, PREFIX, None)?;
    super::describe(
        ns,
        "LabOP device ontology assertion box",
        "Laboratory devices imported from labware catalogues.",
    );
    ns.add_import(tbox);
    Ok(ns)
}

/// A non-fatal finding about the catalogue header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportWarning {
    /// The header cell names no TBox property; the column is ignored.
    #[error("column {column} ({name:?}) names no known property and is ignored")]
    UnknownHeader {
        /// 1-based column number.
        column: usize,
        /// Header text.
        name: String,
    },
}

/// What went wrong in a row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RowErrorKind {
    /// A cell did not convert to its property's range; the cell is skipped.
    #[error(transparent)]
    TypeCoercion(#[from] TypeCoercionError),
    /// A functional property received a second value; the row is skipped.
    #[error(transparent)]
    Cardinality(#[from] CardinalityError),
    /// The row is wider or narrower than the header; the row is skipped.
    #[error("expected {expected} columns, found {found}")]
    ColumnCount {
        /// Header width.
        expected: usize,
        /// Row width.
        found: usize,
    },
    /// The `Class` cell names no TBox class; the row is skipped.
    #[error("unknown class {0:?}")]
    UnknownClass(String),
    /// The record could not be decoded; the row is skipped.
    #[error("malformed record: {0}")]
    Malformed(String),
}

/// A row- or cell-scoped import error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based data row number (the first line after the header is row 1).
    pub row: usize,
    /// Header of the offending column, when the error concerns one cell.
    pub column: Option<String>,
    /// The error.
    pub kind: RowErrorKind,
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.column {
            Some(column) => write!(f, "row {}, column {}: {}", self.row, column, self.kind),
            None => write!(f, "row {}: {}", self.row, self.kind),
        }
    }
}

impl std::error::Error for RowError {}

/// Outcome of one catalogue import.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Data rows read.
    pub rows_processed: usize,
    /// IRIs of the individuals created, in row order.
    pub individuals_created: Vec<String>,
    /// Header warnings.
    pub warnings: Vec<ImportWarning>,
    /// Row and cell errors, in row order.
    pub errors: Vec<RowError>,
}

impl ImportReport {
    /// Whether the import produced neither warnings nor errors.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty() && self.errors.is_empty()
    }

    /// Rows that produced no individual.
    #[must_use]
    pub fn rows_skipped(&self) -> usize {
        self.rows_processed - self.individuals_created.len()
    }
}

enum Column {
    Class,
    Label,
    Property(PropertyDefinition),
    Ignored,
}

/// Populates the ABox from catalogues, resolving headers against the TBox.
#[derive(Debug)]
pub struct InstanceBuilder<'s> {
    store: &'s mut GraphStore,
    tbox: String,
    abox: String,
}

impl<'s> InstanceBuilder<'s> {
    /// Builds into the default TBox and ABox namespaces.
    #[must_use]
    pub fn new(store: &'s mut GraphStore) -> Self {
        Self::with_namespaces(store, tbox::IRI, IRI)
    }

    /// Builds into explicitly named namespaces.
    #[must_use]
    pub fn with_namespaces(store: &'s mut GraphStore, tbox: &str, abox: &str) -> Self {
        Self {
            store,
            tbox: tbox.to_owned(),
            abox: abox.to_owned(),
        }
    }

    /// Imports a catalogue file.
    ///
    /// Importing the same file twice creates every individual twice.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] if the file cannot be opened, and the
    /// errors of [`import_reader`](Self::import_reader).
    pub fn import_csv(&mut self, path: &Path) -> Result<ImportReport, Error> {
        let file = std::fs::File::open(path).map_err(|source| LoadError::Read {
            path: path.to_owned(),
            source,
        })?;
        let report = self.import_reader(file, path)?;
        info!(
            path = %path.display(),
            rows = report.rows_processed,
            created = report.individuals_created.len(),
            warnings = report.warnings.len(),
            errors = report.errors.len(),
            "catalogue imported"
        );
        Ok(report)
    }

    /// Imports a catalogue from any reader; `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotLoaded`] if the TBox or ABox is missing and
    /// [`LoadError::Csv`] if the header row cannot be read.
    pub fn import_reader<R: io::Read>(
        &mut self,
        reader: R,
        path: &Path,
    ) -> Result<ImportReport, Error> {
        // The TBox is only read; a copy frees the store for ABox writes.
        let tbox = self
            .store
            .namespace(&self.tbox)
            .cloned()
            .ok_or_else(|| LoadError::NotLoaded(self.tbox.clone()))?;
        let abox = self
            .store
            .namespace_mut(&self.abox)
            .ok_or_else(|| LoadError::NotLoaded(self.abox.clone()))?;

        let mut csv = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
        let csv_err = |e: csv::Error| LoadError::Csv {
            path: path.to_owned(),
            message: e.to_string(),
        };
        let headers: Vec<String> = csv
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim().to_owned())
            .collect();

        let mut report = ImportReport::default();
        let columns = plan_columns(&tbox, &headers, &mut report);
        let vocabulary = Vocabulary::of(&tbox);
        let default_class = tbox.term(tbox::DEFAULT_CLASS);

        for (index, record) in csv.records().enumerate() {
            let row = index + 1;
            report.rows_processed += 1;
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    report.errors.push(RowError {
                        row,
                        column: None,
                        kind: RowErrorKind::Malformed(e.to_string()),
                    });
                    continue;
                }
            };
            if record.len() != headers.len() {
                report.errors.push(RowError {
                    row,
                    column: None,
                    kind: RowErrorKind::ColumnCount {
                        expected: headers.len(),
                        found: record.len(),
                    },
                });
                continue;
            }

            let class = match class_cell(&columns, &record) {
                None => default_class.clone(),
                Some(name) => match vocabulary.find_class(name) {
                    Some(iri) => iri.to_owned(),
                    None => {
                        report.errors.push(RowError {
                            row,
                            column: Some(CLASS_COLUMN.to_owned()),
                            kind: RowErrorKind::UnknownClass(name.to_owned()),
                        });
                        continue;
                    }
                },
            };

            let mut individual = Individual::new(next_id(abox), class);
            let mut aborted = false;
            for ((column, header), cell) in columns.iter().zip(&headers).zip(record.iter()) {
                if cell.trim().is_empty() {
                    continue;
                }
                let property = match column {
                    Column::Property(property) => property,
                    Column::Label => {
                        individual.label = Some(cell.trim().to_owned());
                        continue;
                    }
                    Column::Class | Column::Ignored => continue,
                };
                let value = match coerce(cell, property.range.as_ref(), abox) {
                    Ok(value) => value,
                    Err(e) => {
                        debug!(row, column = %header, error = %e, "cell skipped");
                        report.errors.push(RowError {
                            row,
                            column: Some(header.clone()),
                            kind: e.into(),
                        });
                        continue;
                    }
                };
                if let Err(e) = individual.assert(property, value) {
                    debug!(row, column = %header, error = %e, "row skipped");
                    report.errors.push(RowError {
                        row,
                        column: Some(header.clone()),
                        kind: e.into(),
                    });
                    aborted = true;
                    break;
                }
            }
            if aborted {
                continue;
            }
            report.individuals_created.push(individual.id.clone());
            abox.individuals.push(individual);
        }

        Ok(report)
    }
}

fn plan_columns(
    tbox: &OntologyNamespace,
    headers: &[String],
    report: &mut ImportReport,
) -> Vec<Column> {
    headers
        .iter()
        .enumerate()
        .map(|(i, name)| match name.as_str() {
            CLASS_COLUMN => Column::Class,
            LABEL_COLUMN => Column::Label,
            _ => match resolve_header(tbox, name) {
                Some(property) => Column::Property(property.clone()),
                None => {
                    warn!(column = i + 1, header = %name, "unknown catalogue column ignored");
                    report.warnings.push(ImportWarning::UnknownHeader {
                        column: i + 1,
                        name: name.clone(),
                    });
                    Column::Ignored
                }
            },
        })
        .collect()
}

/// Maps a header to a property: exact local name, then `has<Name>`, then
/// `is<Name>`.
#[must_use]
pub fn resolve_header<'t>(tbox: &'t OntologyNamespace, name: &str) -> Option<&'t PropertyDefinition> {
    if name.is_empty() {
        return None;
    }
    tbox.find_property_named(name)
        .or_else(|| tbox.find_property_named(&format!("has{name}")))
        .or_else(|| tbox.find_property_named(&format!("is{name}")))
}

fn class_cell<'r>(columns: &[Column], record: &'r csv::StringRecord) -> Option<&'r str> {
    columns
        .iter()
        .zip(record.iter())
        .find(|(c, _)| matches!(c, Column::Class))
        .map(|(_, cell)| cell.trim())
        .filter(|cell| !cell.is_empty())
}

/// Mints the next unused `device_<n>` IRI.
fn next_id(abox: &OntologyNamespace) -> String {
    let mut n = abox.individuals.len() + 1;
    loop {
        let id = abox.term(&format!("{INDIVIDUAL_PREFIX}{n}"));
        if !abox.defines(&id) {
            return id;
        }
        n += 1;
    }
}

/// Accepts `text` only if it is an absolute IRI every output syntax can
/// write between angle brackets.
fn absolute_iri(text: &str) -> Option<String> {
    let iri = IriRef::new(text.to_owned()).ok()?;
    let scheme = iri.as_str().split_once(':')?.0;
    let mut chars = scheme.chars();
    let well_formed = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    well_formed.then(|| iri.as_str().to_owned())
}

/// Converts a cell to a value of the property's range.
///
/// Strings are kept verbatim; other ranges are trimmed first. Object
/// ranges take a valid absolute IRI (`scheme://...` or `<...>`), or the local
/// name or label of an individual already in `abox`.
///
/// # Errors
///
/// Returns [`TypeCoercionError`] when the cell is not a valid lexical form
/// of the range.
pub fn coerce(
    cell: &str,
    range: Option<&Range>,
    abox: &OntologyNamespace,
) -> Result<Value, TypeCoercionError> {
    let text = cell.trim();
    let fail = |expected: &str| TypeCoercionError {
        value: cell.to_owned(),
        expected: expected.to_owned(),
    };
    let primitive = match range {
        None | Some(Range::Primitive(Primitive::String)) => return Ok(Value::Str(cell.to_owned())),
        Some(Range::Datatype(datatype)) => {
            return Ok(Value::Typed {
                lexical: text.to_owned(),
                datatype: datatype.clone(),
            })
        }
        Some(Range::Class(class)) => {
            if let Some(iri) = text.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
                return absolute_iri(iri).map(Value::Iri).ok_or_else(|| fail("IRI"));
            }
            if text.contains("://") {
                return absolute_iri(text).map(Value::Iri).ok_or_else(|| fail("IRI"));
            }
            return abox
                .find_individual_named(text)
                .map(|ind| Value::Iri(ind.id.clone()))
                .ok_or_else(|| fail(&format!("individual of {}", local_name(class))));
        }
        Some(Range::Primitive(primitive)) => *primitive,
    };
    match primitive {
        Primitive::Integer => text.parse().map(Value::Int).map_err(|_| fail("integer")),
        Primitive::Float => text
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Value::Float)
            .ok_or_else(|| fail("float")),
        Primitive::Boolean => match text.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Value::Bool(true)),
            "false" | "0" => Ok(Value::Bool(false)),
            _ => Err(fail("boolean")),
        },
        Primitive::String => Ok(Value::Str(cell.to_owned())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespaces::{emmo, extension};

    fn store() -> GraphStore {
        let mut store = GraphStore::in_memory();
        emmo::load(&mut store, None).expect("upper");
        extension::define(&mut store, emmo::IRI).expect("extension");
        tbox::define(&mut store, emmo::IRI, extension::IRI).expect("tbox");
        create(&mut store, tbox::IRI).expect("abox");
        store
    }

    fn import(store: &mut GraphStore, csv: &str) -> ImportReport {
        InstanceBuilder::new(store)
            .import_reader(csv.as_bytes(), Path::new("test.csv"))
            .expect("import")
    }

    fn t(name: &str) -> String {
        format!("{}#{name}", tbox::IRI)
    }

    #[test]
    fn headers_resolve_with_has_and_is_prefixes() {
        let store = store();
        let tbox = store.namespace(tbox::IRI).expect("tbox");
        assert_eq!(resolve_header(tbox, "NumWells").map(|p| p.name()), Some("hasNumWells"));
        assert_eq!(resolve_header(tbox, "hasNumWells").map(|p| p.name()), Some("hasNumWells"));
        assert_eq!(resolve_header(tbox, "Liddable").map(|p| p.name()), Some("isLiddable"));
        assert!(resolve_header(tbox, "numwells").is_none());
    }

    #[test]
    fn unknown_headers_are_warnings() {
        let mut store = store();
        let report = import(&mut store, "NumWells,Colour\n96,red\n");
        assert_eq!(report.individuals_created.len(), 1);
        assert_eq!(
            report.warnings,
            vec![ImportWarning::UnknownHeader {
                column: 2,
                name: "Colour".into()
            }]
        );
        assert!(report.errors.is_empty());
    }

    #[test]
    fn class_and_label_columns() {
        let mut store = store();
        let report = import(
            &mut store,
            "Class,Label,VendorName\nVendor,acme,\nDevice,plate,Acme\n,tube,\n",
        );
        assert_eq!(report.individuals_created.len(), 3);
        let abox = store.namespace(IRI).expect("abox");
        assert_eq!(abox.individuals[0].class, t("Vendor"));
        assert_eq!(abox.individuals[0].label.as_deref(), Some("acme"));
        assert_eq!(abox.individuals[2].class, t("Device"));
    }

    #[test]
    fn object_cells_reference_earlier_rows() {
        let mut store = store();
        let report = import(
            &mut store,
            "Class,Label,Vendor\nVendor,acme,\nDevice,plate,acme\nDevice,tube,<http://x.org/v>\nDevice,lid,nobody\n",
        );
        assert_eq!(report.individuals_created.len(), 4);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].row, 4);
        let abox = store.namespace(IRI).expect("abox");
        let plate = &abox.individuals[1];
        assert_eq!(
            plate.values_of(&t("hasVendor")).next(),
            Some(&Value::Iri(abox.individuals[0].id.clone()))
        );
        assert_eq!(
            abox.individuals[2].values_of(&t("hasVendor")).next(),
            Some(&Value::Iri("http://x.org/v".into()))
        );
    }

    #[test]
    fn unknown_class_and_short_rows_are_skipped() {
        let mut store = store();
        let report = import(&mut store, "Class,NumWells\nPlate,96\nDevice\nDevice,384\n");
        assert_eq!(report.rows_processed, 3);
        assert_eq!(report.individuals_created.len(), 1);
        assert_eq!(report.rows_skipped(), 2);
        assert!(matches!(report.errors[0].kind, RowErrorKind::UnknownClass(_)));
        assert_eq!(
            report.errors[1].kind,
            RowErrorKind::ColumnCount {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn non_functional_property_accepts_repeated_columns() {
        let mut store = store();
        let report = import(&mut store, "Material,Material\nPS,PP\n");
        assert!(report.is_clean());
        let abox = store.namespace(IRI).expect("abox");
        assert_eq!(abox.individuals[0].values_of(&t("hasMaterial")).count(), 2);
    }

    #[test]
    fn identifiers_continue_after_existing_individuals() {
        let mut store = store();
        import(&mut store, "NumWells\n96\n");
        let report = import(&mut store, "NumWells\n384\n");
        assert_eq!(report.individuals_created, vec![format!("{IRI}#device_2")]);
    }

    #[test]
    fn coercion_of_primitives() {
        let abox = OntologyNamespace::new(IRI, PREFIX);
        let float = Range::Primitive(Primitive::Float);
        let boolean = Range::Primitive(Primitive::Boolean);
        assert_eq!(coerce(" 127.5 ", Some(&float), &abox), Ok(Value::Float(127.5)));
        assert!(coerce("inf", Some(&float), &abox).is_err());
        assert_eq!(coerce("TRUE", Some(&boolean), &abox), Ok(Value::Bool(true)));
        assert_eq!(coerce("0", Some(&boolean), &abox), Ok(Value::Bool(false)));
        let err = coerce("yes", Some(&boolean), &abox).unwrap_err();
        assert_eq!(err.expected, "boolean");
        assert_eq!(
            coerce(" spaced ", Some(&Range::Primitive(Primitive::String)), &abox),
            Ok(Value::Str(" spaced ".into()))
        );
    }

    #[test]
    fn object_cells_must_be_valid_absolute_iris() {
        let abox = OntologyNamespace::new(IRI, PREFIX);
        let vendor = Range::Class(t("Vendor"));
        assert_eq!(
            coerce("<http://x.org/v>", Some(&vendor), &abox),
            Ok(Value::Iri("http://x.org/v".into()))
        );
        assert_eq!(
            coerce("https://acme.example/vendor", Some(&vendor), &abox),
            Ok(Value::Iri("https://acme.example/vendor".into()))
        );
        for cell in ["see https://acme.example/vendor page", "<http://a b>", "<relative/path>"] {
            let err = coerce(cell, Some(&vendor), &abox).unwrap_err();
            assert_eq!(err.expected, "IRI", "{cell}");
            assert_eq!(err.value, cell);
        }
    }

    #[test]
    fn missing_abox_is_an_error() {
        let mut store = GraphStore::in_memory();
        let err = InstanceBuilder::new(&mut store)
            .import_reader("NumWells\n96\n".as_bytes(), Path::new("x.csv"))
            .unwrap_err();
        assert!(matches!(err, Error::Load(LoadError::NotLoaded(_))));
    }
}
