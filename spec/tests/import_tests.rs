//! Catalogue import through the pipeline.

use std::path::{Path, PathBuf};

use labop_device_ontology::namespaces::{abox, tbox};
use labop_device_ontology::{
    BuildStage, CardinalityError, ExportFormat, Exporter, GraphStore, LabwarePipeline,
    PipelineConfig, RowErrorKind, Value,
};

fn prepared() -> LabwarePipeline {
    let mut pipeline = LabwarePipeline::new(PipelineConfig::default()).expect("pipeline");
    pipeline.prepare().expect("prepare");
    pipeline
}

fn write_csv(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("catalogue.csv");
    std::fs::write(&path, text).expect("write catalogue");
    path
}

fn t(name: &str) -> String {
    format!("{}#{name}", tbox::IRI)
}

#[test]
fn two_plates_with_typed_values() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = write_csv(
        dir.path(),
        "Manufacturer,ModelID,NumWells,Length\nAcme,X100,96,127.5\nAcme,X200,384,127.5\n",
    );
    let mut pipeline = prepared();
    let report = pipeline.import_csv(&csv).expect("import");

    assert_eq!(report.rows_processed, 2);
    assert_eq!(report.individuals_created.len(), 2);
    assert!(report.is_clean(), "{report:?}");
    assert_eq!(pipeline.stage(), BuildStage::ABoxPopulated);

    let abox = pipeline.store().namespace(abox::IRI).expect("abox");
    assert_eq!(abox.individuals.len(), 2);
    for ind in &abox.individuals {
        assert_eq!(ind.values.len(), 4);
        assert_eq!(ind.class, t("Device"));
        assert_eq!(
            ind.values_of(&t("hasManufacturer")).next(),
            Some(&Value::Str("Acme".into()))
        );
        assert_eq!(ind.values_of(&t("hasLength")).next(), Some(&Value::Float(127.5)));
    }
    assert_eq!(
        abox.individuals[0].values_of(&t("hasNumWells")).next(),
        Some(&Value::Int(96))
    );
    assert_eq!(
        abox.individuals[1].values_of(&t("hasNumWells")).next(),
        Some(&Value::Int(384))
    );
}

#[test]
fn bad_integer_skips_only_that_cell() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = write_csv(
        dir.path(),
        "Manufacturer,ModelID,NumWells,Length\nAcme,X100,ninety-six,127.5\n",
    );
    let mut pipeline = prepared();
    let report = pipeline.import_csv(&csv).expect("import");

    assert_eq!(report.individuals_created.len(), 1);
    assert_eq!(report.errors.len(), 1);
    let error = &report.errors[0];
    assert_eq!(error.row, 1);
    assert_eq!(error.column.as_deref(), Some("NumWells"));
    match &error.kind {
        RowErrorKind::TypeCoercion(e) => {
            assert_eq!(e.value, "ninety-six");
            assert_eq!(e.expected, "integer");
        }
        other => panic!("unexpected error {other:?}"),
    }

    let abox = pipeline.store().namespace(abox::IRI).expect("abox");
    let plate = &abox.individuals[0];
    assert_eq!(plate.values.len(), 3);
    assert_eq!(plate.values_of(&t("hasNumWells")).count(), 0);
}

#[test]
fn reimport_doubles_the_individuals() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = write_csv(dir.path(), "NumWells\n96\n384\n1536\n");
    let mut pipeline = prepared();
    pipeline.import_csv(&csv).expect("first import");
    let second = pipeline.import_csv(&csv).expect("second import");

    let abox = pipeline.store().namespace(abox::IRI).expect("abox");
    assert_eq!(abox.individuals.len(), 6);
    assert_eq!(
        second.individuals_created.first(),
        Some(&format!("{}#device_4", abox::IRI))
    );
    let mut ids: Vec<&str> = abox.individuals.iter().map(|i| i.id.as_str()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 6, "identifiers must stay unique");
}

#[test]
fn duplicate_functional_header_aborts_the_row() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = write_csv(
        dir.path(),
        "ModelID,NumWells,hasNumWells\nX100,96,384\nX200,96,\n",
    );
    let mut pipeline = prepared();
    let report = pipeline.import_csv(&csv).expect("import");

    assert_eq!(report.rows_processed, 2);
    assert_eq!(report.individuals_created.len(), 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].row, 1);
    assert_eq!(report.errors[0].column.as_deref(), Some("hasNumWells"));
    assert!(matches!(
        &report.errors[0].kind,
        RowErrorKind::Cardinality(CardinalityError { property, .. }) if *property == t("hasNumWells")
    ));

    let abox = pipeline.store().namespace(abox::IRI).expect("abox");
    for ind in &abox.individuals {
        assert!(ind.values_of(&t("hasNumWells")).count() <= 1);
    }
}

#[test]
fn rows_with_wrong_width_are_reported() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = write_csv(dir.path(), "ModelID,NumWells\nX100,96\nX200\nX300,384,extra\n");
    let mut pipeline = prepared();
    let report = pipeline.import_csv(&csv).expect("import");
    assert_eq!(report.rows_processed, 3);
    assert_eq!(report.individuals_created.len(), 1);
    let rows: Vec<usize> = report.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![2, 3]);
}

#[test]
fn missing_catalogue_is_a_load_error() {
    let mut pipeline = prepared();
    let err = pipeline
        .import_csv(Path::new("/nonexistent/catalogue.csv"))
        .unwrap_err();
    assert!(matches!(
        err,
        labop_device_ontology::Error::Load(labop_device_ontology::LoadError::Read { .. })
    ));
    assert_eq!(pipeline.stage(), BuildStage::TBoxDefined);
}

#[test]
fn shipped_catalogue_imports_cleanly() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../labware_catalogue.csv");
    let mut pipeline = prepared();
    let report = pipeline.import_csv(&path).expect("import");
    assert!(report.rows_processed > 0);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert_eq!(report.individuals_created.len(), report.rows_processed);
}

#[test]
fn persisted_store_keeps_individuals_across_runs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = write_csv(dir.path(), "ModelID,NumWells\nX100,96\nX200,384\n");
    let config = PipelineConfig {
        store_dir: Some(dir.path().join("db")),
        store_name: Some("labop.json".to_owned()),
        ..PipelineConfig::default()
    };

    let mut first = LabwarePipeline::new(config.clone()).expect("pipeline");
    first.prepare().expect("prepare");
    first.import_csv(&csv).expect("import");
    let classes = first.store().class_count();
    drop(first);
    assert!(dir.path().join("db").join("labop.json").is_file());

    let mut second = LabwarePipeline::new(config).expect("reopen");
    assert_eq!(second.store().namespaces().len(), 4);
    second.prepare().expect("prepare reuses stored namespaces");
    assert_eq!(second.store().class_count(), classes);
    let stored = second.store().namespace(abox::IRI).expect("abox");
    assert_eq!(stored.individuals.len(), 2);

    let report = second.import_csv(&csv).expect("import again");
    assert_eq!(
        report.individuals_created.first(),
        Some(&format!("{}#device_3", abox::IRI))
    );
}

#[test]
fn malformed_object_iris_are_rejected_and_exports_reload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv = write_csv(
        dir.path(),
        "ModelID,Vendor\nX1,see https://acme.example/vendor page\nX2,<http://a b>\nX3,https://acme.example/vendor\n",
    );
    let mut pipeline = prepared();
    let report = pipeline.import_csv(&csv).expect("import");

    assert_eq!(report.individuals_created.len(), 3);
    let rows: Vec<usize> = report.errors.iter().map(|e| e.row).collect();
    assert_eq!(rows, vec![1, 2]);
    for error in &report.errors {
        assert_eq!(error.column.as_deref(), Some("Vendor"));
        assert!(
            matches!(&error.kind, RowErrorKind::TypeCoercion(e) if e.expected == "IRI"),
            "{error}"
        );
    }

    let exporter = Exporter::new(pipeline.store());
    for format in [ExportFormat::Turtle, ExportFormat::NTriples, ExportFormat::Owl] {
        let path = exporter
            .export(abox::IRI, &dir.path().join(format.name()), format)
            .expect("export");
        let mut store = GraphStore::in_memory();
        let reloaded = store
            .load_namespace(abox::IRI, abox::PREFIX, Some(&path))
            .unwrap_or_else(|e| panic!("reload {format}: {e}"));
        assert_eq!(reloaded.individuals.len(), 3, "{format}");
        let has_vendor = t("hasVendor");
        let linked: Vec<&Value> = reloaded
            .individuals
            .iter()
            .flat_map(|i| i.values_of(&has_vendor))
            .collect();
        assert_eq!(
            linked,
            vec![&Value::Iri("https://acme.example/vendor".into())],
            "{format}"
        );
    }
}
