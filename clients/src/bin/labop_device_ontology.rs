//! `labop-device-ontology`: builds the LabOP device ontology, imports a
//! labware catalogue and exports every namespace.
//!
//! **Outputs** (with `--output-format turtle`):
//! - `<out>/emmo.ttl`, `<out>/emmo_extension_tbox.ttl`
//! - `<out>/labop_device_tbox.ttl`, `<out>/labop_device_abox.ttl`
//! - `<out>/catalog-v001.xml` with the import locations
//!
//! **Usage:**
//! ```
//! labop-device-ontology [-i <catalogue.csv>] [-p <out>] [-f <format>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use labop_device_ontology::logging::{self, Profile};
use labop_device_ontology::{ExportFormat, ImportReport, LabwarePipeline, PipelineConfig};
use tracing::warn;

/// Log output style.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

/// Build, populate and export the LabOP device ontology.
#[derive(Parser)]
#[command(name = "labop-device-ontology", version, about = "LabOP device ontology")]
struct Args {
    /// Device CSV catalogue to import.
    #[arg(short = 'i', long, default_value = PipelineConfig::DEFAULT_CATALOGUE)]
    import_csv: PathBuf,

    /// Directory the ontologies are saved to.
    #[arg(short = 'p', long, default_value = ".")]
    output_path: PathBuf,

    /// Save all ontologies in this format [turtle, owl, rdf, xml, n3, nt, json-ld].
    #[arg(short = 'f', long)]
    output_format: Option<String>,

    /// Serialized upper ontology to use instead of the bundled EMMO subset.
    #[arg(long)]
    upper_ontology: Option<PathBuf>,

    /// Directory of the persisted store (requires --db-name).
    #[arg(long, requires = "db_name")]
    db_path: Option<PathBuf>,

    /// File name of the persisted store (requires --db-path).
    #[arg(long, requires = "db_path")]
    db_name: Option<String>,

    /// Log output style.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(match args.log_format {
        LogFormat::Pretty => Profile::Pretty,
        LogFormat::Json => Profile::Json,
    });

    // Reject a bad format before doing any work.
    let format: Option<ExportFormat> = args
        .output_format
        .as_deref()
        .map(str::parse::<ExportFormat>)
        .transpose()
        .context("Invalid --output-format")?;

    let config = PipelineConfig {
        store_dir: args.db_path,
        store_name: args.db_name,
        upper_source: args.upper_ontology,
        catalogue: args.import_csv,
        ..PipelineConfig::default()
    };
    let mut pipeline = LabwarePipeline::new(config).context("Failed to open the store")?;
    pipeline
        .prepare()
        .context("Failed to build the device ontology schema")?;

    let store = pipeline.store();
    println!(
        "LabOP device ontology v{}: {} namespaces, {} classes, {} properties",
        env!("CARGO_PKG_VERSION"),
        store.namespaces().len(),
        store.class_count(),
        store.property_count()
    );

    let Some(format) = format else {
        return Ok(());
    };
    let catalogue = pipeline.config().catalogue.clone();
    if !catalogue.is_file() {
        warn!(path = %catalogue.display(), "catalogue not found; nothing imported or exported");
        return Ok(());
    }

    let report = pipeline
        .import_csv(&catalogue)
        .with_context(|| format!("Failed to import {}", catalogue.display()))?;
    print_report(&report);

    let out = &args.output_path;
    let written = pipeline
        .export_all(out, format.name())
        .with_context(|| format!("Failed to export to {}", out.display()))?;
    for path in &written {
        println!("  Written: {}", path.display());
    }
    println!("Export complete.");
    Ok(())
}

fn print_report(report: &ImportReport) {
    println!(
        "Imported {} rows: {} individuals created, {} warnings, {} errors",
        report.rows_processed,
        report.individuals_created.len(),
        report.warnings.len(),
        report.errors.len()
    );
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
    for error in &report.errors {
        println!("  error: {error}");
    }
}
