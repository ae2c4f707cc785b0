//! The build, stage by stage.
//!
//! A [`LabwarePipeline`] owns one [`GraphStore`] and walks it through
//! `Uninitialized → UpperLoaded → ExtensionDefined → TBoxDefined →
//! ABoxPopulated → Exported`. Every operation checks the current stage and
//! fails with [`Error::Stage`] when called out of order. Only
//! `ABoxPopulated` can be re-entered, by importing further catalogues.
//!
//! With a persisted store, namespaces already present in the store file
//! are reused instead of being defined again.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{Error, Result};
use crate::export::Exporter;
use crate::format::ExportFormat;
use crate::namespaces::abox::{self, ImportReport, InstanceBuilder};
use crate::namespaces::{emmo, extension, tbox};
use crate::store::GraphStore;

/// Build progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    /// Nothing loaded.
    Uninitialized,
    /// Upper ontology loaded.
    UpperLoaded,
    /// Laboratory extension defined.
    ExtensionDefined,
    /// Device TBox defined and an empty ABox created.
    TBoxDefined,
    /// At least one catalogue imported.
    ABoxPopulated,
    /// All namespaces written.
    Exported,
}

/// Where the build reads from and persists to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Directory of the persisted store; ephemeral unless `store_name` is
    /// set as well.
    pub store_dir: Option<PathBuf>,
    /// File name of the persisted store inside `store_dir`.
    pub store_name: Option<String>,
    /// Serialized upper ontology; the bundled EMMO subset when `None`.
    pub upper_source: Option<PathBuf>,
    /// Serialized TBox to load instead of defining it.
    pub tbox_source: Option<PathBuf>,
    /// Serialized ABox to start from instead of an empty one.
    pub abox_source: Option<PathBuf>,
    /// Catalogue imported by default.
    pub catalogue: PathBuf,
}

impl PipelineConfig {
    /// Default catalogue file name.
    pub const DEFAULT_CATALOGUE: &'static str = "labware_catalogue.csv";

    fn store_location(&self) -> Option<(&Path, &str)> {
        match (&self.store_dir, &self.store_name) {
            (Some(dir), Some(name)) => Some((dir.as_path(), name.as_str())),
            _ => None,
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            store_dir: None,
            store_name: None,
            upper_source: None,
            tbox_source: None,
            abox_source: None,
            catalogue: PathBuf::from(Self::DEFAULT_CATALOGUE),
        }
    }
}

/// Owner of one store and its build stage.
#[derive(Debug)]
pub struct LabwarePipeline {
    config: PipelineConfig,
    store: GraphStore,
    stage: BuildStage,
}

impl LabwarePipeline {
    /// Opens the configured store.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if a persisted store file is unreadable and
    /// [`Error::Persist`] if its directory cannot be created.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let store = match config.store_location() {
            Some((dir, name)) => GraphStore::open_in(dir, name)?,
            None => GraphStore::in_memory(),
        };
        Ok(Self::with_store(store, config))
    }

    /// Starts a build on an existing store.
    #[must_use]
    pub fn with_store(store: GraphStore, config: PipelineConfig) -> Self {
        Self {
            config,
            store,
            stage: BuildStage::Uninitialized,
        }
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> BuildStage {
        self.stage
    }

    /// The store being built.
    #[must_use]
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Gives the store back, ending the build.
    #[must_use]
    pub fn into_store(self) -> GraphStore {
        self.store
    }

    fn require(&self, operation: &'static str, allowed: &[BuildStage]) -> Result<()> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(Error::Stage {
                operation,
                actual: self.stage,
            })
        }
    }

    fn advance(&mut self, stage: BuildStage) -> Result<()> {
        self.store.persist()?;
        info!(from = ?self.stage, to = ?stage, "build stage");
        self.stage = stage;
        Ok(())
    }

    fn reuse(&self, iri: &str) -> bool {
        let present = self.store.namespace(iri).is_some();
        if present {
            info!(namespace = iri, "reusing namespace from store");
        }
        present
    }

    /// Loads the upper ontology.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stage`] unless uninitialized, and [`Error::Load`]
    /// if the configured source cannot be loaded.
    pub fn load_upper(&mut self) -> Result<()> {
        self.require("load the upper ontology", &[BuildStage::Uninitialized])?;
        if !self.reuse(emmo::IRI) {
            emmo::load(&mut self.store, self.config.upper_source.as_deref())?;
        }
        self.advance(BuildStage::UpperLoaded)
    }

    /// Defines the laboratory extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stage`] unless the upper ontology is loaded, and
    /// [`Error::Schema`] if it lacks the anchors the extension needs.
    pub fn define_extension(&mut self) -> Result<()> {
        self.require("define the extension", &[BuildStage::UpperLoaded])?;
        if !self.reuse(extension::IRI) {
            extension::define(&mut self.store, emmo::IRI)?;
        }
        self.advance(BuildStage::ExtensionDefined)
    }

    /// Defines (or loads) the device TBox and prepares the ABox.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stage`] unless the extension is defined,
    /// [`Error::Schema`] if the schema cannot be committed, and
    /// [`Error::Load`] if a configured source cannot be loaded.
    pub fn define_tbox(&mut self) -> Result<()> {
        self.require("define the TBox", &[BuildStage::ExtensionDefined])?;
        if !self.reuse(tbox::IRI) {
            match &self.config.tbox_source {
                Some(source) => {
                    self.store.load_namespace(tbox::IRI, tbox::PREFIX, Some(source))?;
                }
                None => {
                    tbox::define(&mut self.store, emmo::IRI, extension::IRI)?;
                }
            }
        }
        if !self.reuse(abox::IRI) {
            match &self.config.abox_source {
                Some(source) => {
                    self.store
                        .load_namespace(abox::IRI, abox::PREFIX, Some(source))?
                        .add_import(tbox::IRI);
                }
                None => {
                    abox::create(&mut self.store, tbox::IRI)?;
                }
            }
        }
        self.advance(BuildStage::TBoxDefined)
    }

    /// Runs the three schema stages.
    ///
    /// # Errors
    ///
    /// See [`load_upper`](Self::load_upper),
    /// [`define_extension`](Self::define_extension) and
    /// [`define_tbox`](Self::define_tbox).
    pub fn prepare(&mut self) -> Result<()> {
        self.load_upper()?;
        self.define_extension()?;
        self.define_tbox()
    }

    /// Imports a catalogue into the ABox. May be called repeatedly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stage`] before the TBox is defined or after export,
    /// and [`Error::Load`] if the file or its header cannot be read.
    pub fn import_csv(&mut self, path: &Path) -> Result<ImportReport> {
        self.require(
            "import a catalogue",
            &[BuildStage::TBoxDefined, BuildStage::ABoxPopulated],
        )?;
        let report = InstanceBuilder::new(&mut self.store).import_csv(path)?;
        self.advance(BuildStage::ABoxPopulated)?;
        Ok(report)
    }

    /// Exports upper ontology, extension, TBox and ABox, in that order,
    /// into `dir`. Returns the written files.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Stage`] before the TBox is defined or when already
    /// exported, and [`Error::Export`] for an unknown format or a write
    /// failure.
    pub fn export_all(&mut self, dir: &Path, format: &str) -> Result<Vec<PathBuf>> {
        self.require(
            "export",
            &[BuildStage::TBoxDefined, BuildStage::ABoxPopulated],
        )?;
        let format: ExportFormat = format.parse()?;
        let exporter = Exporter::new(&self.store);
        let written = [emmo::IRI, extension::IRI, tbox::IRI, abox::IRI]
            .into_iter()
            .map(|iri| exporter.export(iri, dir, format))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        info!(dir = %dir.display(), %format, files = written.len(), "all namespaces exported");
        self.stage = BuildStage::Exported;
        Ok(written)
    }
}
