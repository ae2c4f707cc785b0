//! Builds the device ontology schema and prints a summary.
//!
//! Run with: `cargo run --example dump_ontology -p labop-device-ontology`

use labop_device_ontology::{export, ExportFormat, Exporter, LabwarePipeline, PipelineConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut pipeline = LabwarePipeline::new(PipelineConfig::default())?;
    pipeline.prepare()?;
    let store = pipeline.store();

    println!("LabOP Device Ontology v{}", env!("CARGO_PKG_VERSION"));
    println!("  Namespaces:   {}", store.namespaces().len());
    println!("  Classes:      {}", store.class_count());
    println!("  Properties:   {}", store.property_count());
    println!("  Individuals:  {}", store.individual_count());
    println!();

    for ns in store.namespaces() {
        println!(
            "  {:8} {:45} {:>2} classes, {:>2} properties, {:>2} individuals",
            ns.prefix,
            ns.iri,
            ns.classes.len(),
            ns.properties.len(),
            ns.individuals.len(),
        );
    }

    println!();

    // Serialize the TBox to Turtle (show first 400 chars).
    let tbox = store
        .namespace(labop_device_ontology::namespaces::tbox::IRI)
        .ok_or("TBox not defined")?;
    let turtle = export::serialize(tbox, ExportFormat::Turtle, &Exporter::new(store).prefixes(tbox))?;
    println!("Turtle output ({} bytes):", turtle.len());
    let preview_end = turtle
        .char_indices()
        .nth(400)
        .map_or(turtle.len(), |(i, _)| i);
    println!("{}...", &turtle[..preview_end]);
    Ok(())
}
