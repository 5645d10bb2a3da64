//! In-memory import container

use super::{
    AttributeTable, ContainerError, ContainerResult, EdgeDraft, EdgeKey, ImportContainer,
    NodeDraft, NodeKey,
};
use crate::value_objects::AttributeNamespace;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Container that keeps every imported node and edge in memory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InMemoryContainer {
    nodes: IndexMap<String, NodeDraft>,
    edges: Vec<EdgeDraft>,
    node_table: AttributeTable,
    edge_table: AttributeTable,
}

impl Default for InMemoryContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryContainer {
    /// Create an empty container
    pub fn new() -> Self {
        Self {
            nodes: IndexMap::new(),
            edges: Vec::new(),
            node_table: AttributeTable::new(AttributeNamespace::Node),
            edge_table: AttributeTable::new(AttributeNamespace::Edge),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn node_by_id(&self, id: &str) -> Option<&NodeDraft> {
        self.nodes.get(id)
    }

    pub fn node_at(&self, key: NodeKey) -> Option<&NodeDraft> {
        self.nodes.get_index(key.0).map(|(_, node)| node)
    }

    /// Nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &NodeDraft> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[EdgeDraft] {
        &self.edges
    }

    /// Identifiers of the source and target node of every edge
    pub fn edge_endpoints(&self) -> Vec<(String, String)> {
        self.edges
            .iter()
            .filter_map(|edge| {
                let source = self.node_at(edge.source)?;
                let target = self.node_at(edge.target)?;
                Some((source.id.clone(), target.id.clone()))
            })
            .collect()
    }

    pub fn node_table(&self) -> &AttributeTable {
        &self.node_table
    }

    pub fn edge_table(&self) -> &AttributeTable {
        &self.edge_table
    }
}

impl ImportContainer for InMemoryContainer {
    fn add_node(&mut self, node: NodeDraft) -> ContainerResult<NodeKey> {
        if self.nodes.contains_key(&node.id) {
            return Err(ContainerError::DuplicateNode(node.id));
        }
        let (index, _) = self.nodes.insert_full(node.id.clone(), node);
        Ok(NodeKey(index))
    }

    fn add_edge(&mut self, edge: EdgeDraft) -> ContainerResult<EdgeKey> {
        for key in [edge.source, edge.target] {
            if key.0 >= self.nodes.len() {
                return Err(ContainerError::UnknownNode(key));
            }
        }
        self.edges.push(edge);
        Ok(EdgeKey(self.edges.len() - 1))
    }

    fn node(&self, id: &str) -> Option<NodeKey> {
        self.nodes.get_index_of(id).map(NodeKey)
    }

    fn attribute_table(&self, namespace: AttributeNamespace) -> &AttributeTable {
        match namespace {
            AttributeNamespace::Node => &self.node_table,
            AttributeNamespace::Edge => &self.edge_table,
        }
    }

    fn attribute_table_mut(&mut self, namespace: AttributeNamespace) -> &mut AttributeTable {
        match namespace {
            AttributeNamespace::Node => &mut self.node_table,
            AttributeNamespace::Edge => &mut self.edge_table,
        }
    }
}
