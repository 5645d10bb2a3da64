//! Graph import for the Composable Information Machine
//!
//! Imports any property graph exposed through the [`SourceGraph`] contract into
//! a typed node/edge/attribute model held by an [`ImportContainer`]. Vertices
//! become nodes, edges become edges, and every property becomes an attribute
//! in a per-namespace schema whose columns are typed after the first value seen
//! for each key.
//!
//! Graph databases are described by configuration files and opened through a
//! [`GraphRegistry`] of factories keyed by graph type; a [`GraphCatalog`] ties
//! the two together so a graph can be imported by name.

pub mod config;
pub mod container;
pub mod diagnostics;
pub mod importer;
pub mod inference;
pub mod registry;
pub mod source;
pub mod value_objects;

// Re-export configuration types
pub use config::{load_configurations, ConfigError, ConfigResult, GraphConfiguration};

// Re-export container types
pub use container::{
    AttributeColumn, AttributeTable, ContainerError, ContainerResult, EdgeDraft, EdgeKey,
    ImportContainer, InMemoryContainer, NodeDraft, NodeKey,
};

// Re-export diagnostics
pub use diagnostics::{ImportReport, Issue, IssueLevel};

// Re-export the importer
pub use importer::{
    spawn_import, CancellationFlag, FinishedImport, GraphImportWalker, ImportError,
    ImportFailure, ImportHandle, ImportOptions, ImportOutcome, ImportResult, ImportStatus,
};

pub use inference::infer_attribute_type;

// Re-export registry types
pub use registry::{GraphCatalog, GraphFactory, GraphRegistry, RegistryError, RegistryResult};

// Re-export source types
pub use source::{
    EdgeRef, InMemorySourceGraph, SourceError, SourceGraph, SourceResult, VertexRef,
};

// Re-export value objects
pub use value_objects::{
    AttributeNamespace, AttributeType, Direction, EdgeOrientation, PropertyValue, SourceId,
};
