//! Source graph provider contract
//!
//! A source graph is an opaque, read-only handle onto a property graph held by
//! some graph database driver. The importer only needs to enumerate vertices,
//! follow edges in a direction, read identifiers and properties, and release
//! the handle when it is done.

use crate::value_objects::{Direction, PropertyValue, SourceId};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod memory;

pub use memory::InMemorySourceGraph;

/// Driver-side handle of a vertex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexRef(pub u64);

impl fmt::Display for VertexRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Driver-side handle of an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeRef(pub u64);

impl fmt::Display for EdgeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Errors raised by a source graph driver
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("I/O failure reading source graph: {0}")]
    Io(#[from] std::io::Error),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Unknown vertex: {0}")]
    UnknownVertex(VertexRef),

    #[error("Unknown edge: {0}")]
    UnknownEdge(EdgeRef),

    #[error("Source graph has been shut down")]
    Closed,
}

/// Result type for source graph operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Trait that every graph database driver exposes to the importer
pub trait SourceGraph: Send {
    /// List all vertices
    fn vertices(&self) -> SourceResult<Vec<VertexRef>>;

    /// Get the identifier of a vertex, `None` when the store has none
    fn vertex_id(&self, vertex: VertexRef) -> SourceResult<Option<SourceId>>;

    /// List the property keys of a vertex in the order the store exposes them
    fn vertex_property_keys(&self, vertex: VertexRef) -> SourceResult<Vec<String>>;

    /// Get a vertex property value
    fn vertex_property(&self, vertex: VertexRef, key: &str) -> SourceResult<Option<PropertyValue>>;

    /// List the edges incident to a vertex in the given direction
    fn edges(&self, vertex: VertexRef, direction: Direction) -> SourceResult<Vec<EdgeRef>>;

    /// Get the vertex at the given end of an edge
    fn edge_vertex(&self, edge: EdgeRef, direction: Direction) -> SourceResult<VertexRef>;

    /// List the property keys of an edge in the order the store exposes them
    fn edge_property_keys(&self, edge: EdgeRef) -> SourceResult<Vec<String>>;

    /// Get an edge property value
    fn edge_property(&self, edge: EdgeRef, key: &str) -> SourceResult<Option<PropertyValue>>;

    /// Release the handle
    fn shutdown(&mut self) -> SourceResult<()>;
}

impl<S: SourceGraph + ?Sized> SourceGraph for Box<S> {
    fn vertices(&self) -> SourceResult<Vec<VertexRef>> {
        (**self).vertices()
    }

    fn vertex_id(&self, vertex: VertexRef) -> SourceResult<Option<SourceId>> {
        (**self).vertex_id(vertex)
    }

    fn vertex_property_keys(&self, vertex: VertexRef) -> SourceResult<Vec<String>> {
        (**self).vertex_property_keys(vertex)
    }

    fn vertex_property(&self, vertex: VertexRef, key: &str) -> SourceResult<Option<PropertyValue>> {
        (**self).vertex_property(vertex, key)
    }

    fn edges(&self, vertex: VertexRef, direction: Direction) -> SourceResult<Vec<EdgeRef>> {
        (**self).edges(vertex, direction)
    }

    fn edge_vertex(&self, edge: EdgeRef, direction: Direction) -> SourceResult<VertexRef> {
        (**self).edge_vertex(edge, direction)
    }

    fn edge_property_keys(&self, edge: EdgeRef) -> SourceResult<Vec<String>> {
        (**self).edge_property_keys(edge)
    }

    fn edge_property(&self, edge: EdgeRef, key: &str) -> SourceResult<Option<PropertyValue>> {
        (**self).edge_property(edge, key)
    }

    fn shutdown(&mut self) -> SourceResult<()> {
        (**self).shutdown()
    }
}
