//! In-memory source graph
//!
//! A petgraph-backed [`SourceGraph`] for embedding graphs built in process and
//! for exercising the importer without a database. Unlike most stores it
//! accepts vertices without an identifier and repeated identifiers, so every
//! anomaly the importer handles can be reproduced.

use super::{EdgeRef, SourceError, SourceGraph, SourceResult, VertexRef};
use crate::value_objects::{Direction, PropertyValue, SourceId};
use indexmap::IndexMap;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef as _;

#[derive(Debug, Clone, Default)]
struct VertexRecord {
    id: Option<SourceId>,
    properties: IndexMap<String, PropertyValue>,
}

#[derive(Debug, Clone, Default)]
struct EdgeRecord {
    properties: IndexMap<String, PropertyValue>,
}

/// Property graph held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySourceGraph {
    graph: StableDiGraph<VertexRecord, EdgeRecord>,
    closed: bool,
    shutdown_count: usize,
}

impl InMemorySourceGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex with an identifier
    pub fn add_vertex(&mut self, id: impl Into<SourceId>) -> VertexRef {
        self.insert_vertex(Some(id.into()))
    }

    /// Add a vertex that has no identifier
    pub fn add_anonymous_vertex(&mut self) -> VertexRef {
        self.insert_vertex(None)
    }

    fn insert_vertex(&mut self, id: Option<SourceId>) -> VertexRef {
        let index = self.graph.add_node(VertexRecord {
            id,
            properties: IndexMap::new(),
        });
        VertexRef(index.index() as u64)
    }

    /// Set a vertex property, replacing any previous value for the key
    pub fn set_vertex_property(
        &mut self,
        vertex: VertexRef,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> SourceResult<()> {
        let record = self
            .graph
            .node_weight_mut(node_index(vertex))
            .ok_or(SourceError::UnknownVertex(vertex))?;
        record.properties.insert(key.into(), value.into());
        Ok(())
    }

    /// Add a directed edge from `out` to `head`
    pub fn add_edge(&mut self, out: VertexRef, head: VertexRef) -> SourceResult<EdgeRef> {
        let from = self.live_node(out)?;
        let to = self.live_node(head)?;
        let index = self.graph.add_edge(from, to, EdgeRecord::default());
        Ok(EdgeRef(index.index() as u64))
    }

    /// Set an edge property, replacing any previous value for the key
    pub fn set_edge_property(
        &mut self,
        edge: EdgeRef,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> SourceResult<()> {
        let record = self
            .graph
            .edge_weight_mut(edge_index(edge))
            .ok_or(SourceError::UnknownEdge(edge))?;
        record.properties.insert(key.into(), value.into());
        Ok(())
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// How many times `shutdown` has been called
    pub fn shutdown_count(&self) -> usize {
        self.shutdown_count
    }

    /// Whether the handle has been shut down
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> SourceResult<()> {
        if self.closed {
            return Err(SourceError::Closed);
        }
        Ok(())
    }

    fn live_node(&self, vertex: VertexRef) -> SourceResult<NodeIndex> {
        let index = node_index(vertex);
        if self.graph.contains_node(index) {
            Ok(index)
        } else {
            Err(SourceError::UnknownVertex(vertex))
        }
    }

    fn vertex_record(&self, vertex: VertexRef) -> SourceResult<&VertexRecord> {
        self.ensure_open()?;
        self.graph
            .node_weight(node_index(vertex))
            .ok_or(SourceError::UnknownVertex(vertex))
    }

    fn edge_record(&self, edge: EdgeRef) -> SourceResult<&EdgeRecord> {
        self.ensure_open()?;
        self.graph
            .edge_weight(edge_index(edge))
            .ok_or(SourceError::UnknownEdge(edge))
    }
}

fn node_index(vertex: VertexRef) -> NodeIndex {
    NodeIndex::new(vertex.0 as usize)
}

fn edge_index(edge: EdgeRef) -> EdgeIndex {
    EdgeIndex::new(edge.0 as usize)
}

impl SourceGraph for InMemorySourceGraph {
    fn vertices(&self) -> SourceResult<Vec<VertexRef>> {
        self.ensure_open()?;
        Ok(self
            .graph
            .node_indices()
            .map(|index| VertexRef(index.index() as u64))
            .collect())
    }

    fn vertex_id(&self, vertex: VertexRef) -> SourceResult<Option<SourceId>> {
        Ok(self.vertex_record(vertex)?.id.clone())
    }

    fn vertex_property_keys(&self, vertex: VertexRef) -> SourceResult<Vec<String>> {
        Ok(self.vertex_record(vertex)?.properties.keys().cloned().collect())
    }

    fn vertex_property(&self, vertex: VertexRef, key: &str) -> SourceResult<Option<PropertyValue>> {
        Ok(self.vertex_record(vertex)?.properties.get(key).cloned())
    }

    fn edges(&self, vertex: VertexRef, direction: Direction) -> SourceResult<Vec<EdgeRef>> {
        self.ensure_open()?;
        let index = self.live_node(vertex)?;
        let direction = match direction {
            Direction::In => petgraph::Direction::Incoming,
            Direction::Out => petgraph::Direction::Outgoing,
        };
        Ok(self
            .graph
            .edges_directed(index, direction)
            .map(|edge| EdgeRef(edge.id().index() as u64))
            .collect())
    }

    fn edge_vertex(&self, edge: EdgeRef, direction: Direction) -> SourceResult<VertexRef> {
        self.ensure_open()?;
        let (out, head) = self
            .graph
            .edge_endpoints(edge_index(edge))
            .ok_or(SourceError::UnknownEdge(edge))?;
        let endpoint = match direction {
            Direction::In => head,
            Direction::Out => out,
        };
        Ok(VertexRef(endpoint.index() as u64))
    }

    fn edge_property_keys(&self, edge: EdgeRef) -> SourceResult<Vec<String>> {
        Ok(self.edge_record(edge)?.properties.keys().cloned().collect())
    }

    fn edge_property(&self, edge: EdgeRef, key: &str) -> SourceResult<Option<PropertyValue>> {
        Ok(self.edge_record(edge)?.properties.get(key).cloned())
    }

    fn shutdown(&mut self) -> SourceResult<()> {
        self.shutdown_count += 1;
        self.closed = true;
        Ok(())
    }
}
