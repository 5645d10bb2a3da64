//! Graph factories and the named graph catalog
//!
//! A [`GraphRegistry`] maps a configuration's `graph-type` to the factory that
//! opens that kind of store. A [`GraphCatalog`] pairs the registry with the
//! configurations loaded from a directory, so a graph can be opened (and
//! imported) by the name the user picked.

use crate::config::{load_configurations, ConfigError, GraphConfiguration};
use crate::container::ImportContainer;
use crate::diagnostics::ImportReport;
use crate::importer::{GraphImportWalker, ImportError, ImportFailure, ImportOutcome};
use crate::source::{SourceError, SourceGraph};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

/// Errors raised while resolving or opening a graph
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Graph name cannot be empty")]
    BlankName,

    #[error("No graph configuration named '{0}'")]
    UnknownGraph(String),

    #[error("No factory registered for graph type '{0}'")]
    UnknownGraphType(String),

    #[error("Invalid graph configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Failed to connect to graph: {0}")]
    Connection(#[from] SourceError),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Opens a source graph from a configuration
pub trait GraphFactory: Send + Sync {
    fn open(&self, configuration: &GraphConfiguration) -> RegistryResult<Box<dyn SourceGraph>>;
}

impl<F> GraphFactory for F
where
    F: Fn(&GraphConfiguration) -> RegistryResult<Box<dyn SourceGraph>> + Send + Sync,
{
    fn open(&self, configuration: &GraphConfiguration) -> RegistryResult<Box<dyn SourceGraph>> {
        self(configuration)
    }
}

/// Graph type to factory mapping
#[derive(Default)]
pub struct GraphRegistry {
    factories: HashMap<String, Box<dyn GraphFactory>>,
}

impl fmt::Debug for GraphRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.factories.keys().collect();
        types.sort();
        f.debug_struct("GraphRegistry").field("types", &types).finish()
    }
}

impl GraphRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any previous one for the type
    pub fn register(&mut self, graph_type: impl Into<String>, factory: impl GraphFactory + 'static) {
        let graph_type = graph_type.into();
        debug!(%graph_type, "Registered graph factory");
        self.factories.insert(graph_type, Box::new(factory));
    }

    pub fn is_registered(&self, graph_type: &str) -> bool {
        self.factories.contains_key(graph_type)
    }

    /// Open a source graph for a configuration
    pub fn open(&self, configuration: &GraphConfiguration) -> RegistryResult<Box<dyn SourceGraph>> {
        let factory = self
            .factories
            .get(&configuration.graph_type)
            .ok_or_else(|| RegistryError::UnknownGraphType(configuration.graph_type.clone()))?;
        factory.open(configuration)
    }
}

/// Named configurations plus the registry that can open them
#[derive(Debug)]
pub struct GraphCatalog {
    configurations: BTreeMap<String, GraphConfiguration>,
    registry: GraphRegistry,
}

impl GraphCatalog {
    pub fn new(
        configurations: BTreeMap<String, GraphConfiguration>,
        registry: GraphRegistry,
    ) -> Self {
        Self {
            configurations,
            registry,
        }
    }

    /// Build a catalog from the configuration files in `dir`
    pub fn from_directory(dir: &Path, registry: GraphRegistry) -> RegistryResult<Self> {
        let configurations = load_configurations(dir)?;
        info!(
            count = configurations.len(),
            dir = %dir.display(),
            "Loaded graph configurations"
        );
        Ok(Self::new(configurations, registry))
    }

    /// Graph names in sorted order
    pub fn graph_names(&self) -> Vec<String> {
        self.configurations.keys().cloned().collect()
    }

    pub fn configuration(&self, name: &str) -> Option<&GraphConfiguration> {
        self.configurations.get(name)
    }

    pub fn registry(&self) -> &GraphRegistry {
        &self.registry
    }

    /// Open the graph configured under `name`
    pub fn open_graph(&self, name: &str) -> RegistryResult<Box<dyn SourceGraph>> {
        if name.trim().is_empty() {
            return Err(RegistryError::BlankName);
        }
        let configuration = self
            .configurations
            .get(name)
            .ok_or_else(|| RegistryError::UnknownGraph(name.to_string()))?;
        debug!(graph = name, graph_type = %configuration.graph_type, "Opening graph");
        self.registry.open(configuration)
    }

    /// Open the graph configured under `name` and import it into `container`
    pub fn import<C>(
        &self,
        name: &str,
        walker: &GraphImportWalker,
        container: &mut C,
    ) -> Result<ImportOutcome, ImportFailure>
    where
        C: ImportContainer + ?Sized,
    {
        let mut source = self.open_graph(name).map_err(|err| ImportFailure {
            error: ImportError::Open(err),
            report: ImportReport::new(),
        })?;
        walker.run(&mut source, container)
    }
}
