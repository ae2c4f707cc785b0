//! Export, catalog and reload round trips.

use std::path::Path;

use labop_device_ontology::namespaces::{abox, emmo, extension, tbox};
use labop_device_ontology::{
    Catalog, Error, ExportError, ExportFormat, Exporter, GraphStore, LabwarePipeline,
    OntologyNamespace, PipelineConfig, CATALOG_FILE_NAME,
};

const NAMESPACES: [(&str, &str); 4] = [
    (emmo::IRI, emmo::PREFIX),
    (extension::IRI, extension::PREFIX),
    (tbox::IRI, tbox::PREFIX),
    (abox::IRI, abox::PREFIX),
];

const CATALOGUE: &str = "Label,Class,Manufacturer,ModelID,NumWells,Length,Liddable,Material,Material,Vendor\n\
                         acme,Vendor,,,,,,,,\n\
                         X100,Device,Acme,X100,96,127.5,true,PS,PP,acme\n\
                         X200,Device,\"Acme \"\"Labs\"\"\",X200,384,127.76,false,PP,,acme\n";

fn populated(dir: &Path) -> LabwarePipeline {
    let csv = dir.join("catalogue.csv");
    std::fs::write(&csv, CATALOGUE).expect("write catalogue");
    let mut pipeline = LabwarePipeline::new(PipelineConfig::default()).expect("pipeline");
    pipeline.prepare().expect("prepare");
    let report = pipeline.import_csv(&csv).expect("import");
    assert!(report.is_clean(), "{report:?}");
    pipeline
}

fn counts(ns: &OntologyNamespace) -> (usize, usize, usize) {
    (ns.classes.len(), ns.properties.len(), ns.individuals.len())
}

fn reload(path: &Path, iri: &str, prefix: &str) -> OntologyNamespace {
    let mut store = GraphStore::in_memory();
    store
        .load_namespace(iri, prefix, Some(path))
        .unwrap_or_else(|e| panic!("reload {}: {e}", path.display()))
        .clone()
}

#[test]
fn every_format_round_trips_counts() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let pipeline = populated(scratch.path());
    let store = pipeline.store();
    let exporter = Exporter::new(store);

    for format in ExportFormat::ALL {
        let out = scratch.path().join(format.name());
        for (iri, prefix) in NAMESPACES {
            let original = store.namespace(iri).expect("loaded");
            let path = exporter.export(iri, &out, format).expect("export");
            let reloaded = reload(&path, iri, prefix);
            assert_eq!(
                counts(&reloaded),
                counts(original),
                "{} via {format}",
                original.base_name()
            );
            assert_eq!(reloaded.imports, original.imports, "{iri} via {format}");
        }
    }
}

#[test]
fn reloaded_individuals_keep_their_values() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let pipeline = populated(scratch.path());
    let original = pipeline.store().namespace(abox::IRI).expect("abox");

    for format in [ExportFormat::Turtle, ExportFormat::Owl, ExportFormat::JsonLd] {
        let out = scratch.path().join(format.name());
        let path = Exporter::new(pipeline.store())
            .export(abox::IRI, &out, format)
            .expect("export");
        let reloaded = reload(&path, abox::IRI, abox::PREFIX);
        for ind in &original.individuals {
            let back = reloaded.find_individual(&ind.id).expect("individual");
            assert_eq!(back.class, ind.class, "{format}");
            assert_eq!(back.label, ind.label, "{format}");
            let mut expected = ind.values.clone();
            let mut actual = back.values.clone();
            expected.sort_by(|a, b| format!("{a:?}").cmp(&format!("{b:?}")));
            actual.sort_by(|a, b| format!("{a:?}").cmp(&format!("{b:?}")));
            assert_eq!(actual, expected, "{} via {format}", ind.id);
        }
    }
}

#[test]
fn tbox_as_turtle_and_owl_reload_identically() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let pipeline = populated(scratch.path());
    let exporter = Exporter::new(pipeline.store());

    let ttl = exporter
        .export(tbox::IRI, &scratch.path().join("ttl"), ExportFormat::Turtle)
        .expect("turtle");
    let owl = exporter
        .export(tbox::IRI, &scratch.path().join("owl"), ExportFormat::Owl)
        .expect("owl");
    let from_ttl = reload(&ttl, tbox::IRI, tbox::PREFIX);
    let from_owl = reload(&owl, tbox::IRI, tbox::PREFIX);
    assert_eq!(counts(&from_ttl), counts(&from_owl));
    assert_eq!(from_ttl.triples().len(), from_owl.triples().len());
}

#[test]
fn csv_is_not_an_export_format() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let mut pipeline = populated(scratch.path());
    let out = scratch.path().join("out");
    let err = pipeline.export_all(&out, "csv").unwrap_err();
    assert!(matches!(
        err,
        Error::Export(ExportError::UnsupportedFormat(ref f)) if f == "csv"
    ));
    assert!(!out.exists());
}

#[test]
fn export_all_writes_files_and_catalog() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let mut pipeline = populated(scratch.path());
    let out = scratch.path().join("out");
    let written = pipeline.export_all(&out, "turtle").expect("export");

    let names: Vec<String> = written
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "emmo.ttl",
            "emmo_extension_tbox.ttl",
            "labop_device_tbox.ttl",
            "labop_device_abox.ttl"
        ]
    );

    let catalog = Catalog::read(&out.join(CATALOG_FILE_NAME)).expect("catalog");
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.resolve(emmo::IRI), Some("emmo.ttl"));
    assert_eq!(catalog.resolve(extension::IRI), Some("emmo_extension_tbox.ttl"));
    assert_eq!(catalog.resolve(tbox::IRI), Some("labop_device_tbox.ttl"));
    assert_eq!(catalog.resolve(abox::IRI), Some("labop_device_abox.ttl"));
}

#[test]
fn catalog_entries_are_merged_across_formats() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let pipeline = populated(scratch.path());
    let exporter = Exporter::new(pipeline.store());
    let out = scratch.path().join("out");

    exporter.export(emmo::IRI, &out, ExportFormat::Owl).expect("upper");
    exporter.export(tbox::IRI, &out, ExportFormat::Turtle).expect("tbox");

    let catalog = Catalog::read(&out.join(CATALOG_FILE_NAME)).expect("catalog");
    assert_eq!(catalog.resolve(emmo::IRI), Some("emmo.owl"));
    assert_eq!(catalog.resolve(tbox::IRI), Some("labop_device_tbox.ttl"));
    // The extension was never exported here; its entry names the store location.
    assert_eq!(catalog.resolve(extension::IRI), Some(extension::IRI));
}

#[test]
fn exported_upper_ontology_can_seed_a_new_build() {
    let scratch = tempfile::tempdir().expect("tempdir");
    let pipeline = populated(scratch.path());
    let upper = Exporter::new(pipeline.store())
        .export(emmo::IRI, scratch.path(), ExportFormat::Turtle)
        .expect("export upper");

    let config = PipelineConfig {
        upper_source: Some(upper.clone()),
        ..PipelineConfig::default()
    };
    let mut rebuilt = LabwarePipeline::new(config).expect("pipeline");
    rebuilt.prepare().expect("prepare from file");
    assert_eq!(
        rebuilt.store().catalog().resolve(emmo::IRI),
        Some(upper.display().to_string().as_str())
    );
    assert_eq!(
        rebuilt.store().class_count(),
        pipeline.store().class_count()
    );
}
