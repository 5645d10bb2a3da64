//! Destination container contract
//!
//! The container accumulates the nodes, edges and attribute schema produced by
//! an import. Nodes and edges are assembled as drafts and handed over once
//! complete; the attribute schema is split into a node table and an edge table
//! which never share columns.

use crate::value_objects::{AttributeNamespace, AttributeType, PropertyValue};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod memory;

pub use memory::InMemoryContainer;

/// Handle of a node that has been added to a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey(pub usize);

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Handle of an edge that has been added to a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeKey(pub usize);

/// Errors raised by a destination container
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContainerError {
    #[error("Node already exists: {0}")]
    DuplicateNode(String),

    #[error("Node not found: {0}")]
    UnknownNode(NodeKey),

    #[error("Column '{name}' already exists in the {namespace} table")]
    DuplicateColumn {
        namespace: AttributeNamespace,
        name: String,
    },
}

/// Result type for container operations
pub type ContainerResult<T> = Result<T, ContainerError>;

/// A named, typed slot in a node or edge schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributeColumn {
    pub index: usize,
    pub namespace: AttributeNamespace,
    pub name: String,
    pub attribute_type: AttributeType,
}

/// Append-only attribute schema for one namespace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeTable {
    namespace: AttributeNamespace,
    columns: IndexMap<String, AttributeColumn>,
}

impl AttributeTable {
    /// Create an empty table
    pub fn new(namespace: AttributeNamespace) -> Self {
        Self {
            namespace,
            columns: IndexMap::new(),
        }
    }

    pub fn namespace(&self) -> AttributeNamespace {
        self.namespace
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&AttributeColumn> {
        self.columns.get(name)
    }

    /// Add a column; an existing column is never replaced or retyped
    pub fn add_column(
        &mut self,
        name: &str,
        attribute_type: AttributeType,
    ) -> ContainerResult<AttributeColumn> {
        if self.columns.contains_key(name) {
            return Err(ContainerError::DuplicateColumn {
                namespace: self.namespace,
                name: name.to_string(),
            });
        }
        let column = AttributeColumn {
            index: self.columns.len(),
            namespace: self.namespace,
            name: name.to_string(),
            attribute_type,
        };
        self.columns.insert(name.to_string(), column.clone());
        Ok(column)
    }

    /// Columns in creation order
    pub fn columns(&self) -> impl Iterator<Item = &AttributeColumn> {
        self.columns.values()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A node being assembled before it is added to a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDraft {
    pub id: String,
    pub attributes: IndexMap<String, PropertyValue>,
}

impl NodeDraft {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            attributes: IndexMap::new(),
        }
    }

    /// Attach a value under a node column
    pub fn add_attribute_value(&mut self, column: &AttributeColumn, value: PropertyValue) {
        self.attributes.insert(column.name.clone(), value);
    }

    pub fn attribute(&self, name: &str) -> Option<&PropertyValue> {
        self.attributes.get(name)
    }
}

/// An edge being assembled before it is added to a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDraft {
    pub source: NodeKey,
    pub target: NodeKey,
    pub attributes: IndexMap<String, PropertyValue>,
}

impl EdgeDraft {
    pub fn new(source: NodeKey, target: NodeKey) -> Self {
        Self {
            source,
            target,
            attributes: IndexMap::new(),
        }
    }

    /// Attach a value under an edge column
    pub fn add_attribute_value(&mut self, column: &AttributeColumn, value: PropertyValue) {
        self.attributes.insert(column.name.clone(), value);
    }

    pub fn attribute(&self, name: &str) -> Option<&PropertyValue> {
        self.attributes.get(name)
    }
}

/// Trait implemented by every import destination
pub trait ImportContainer {
    /// Create an empty node draft
    fn new_node_draft(&self, id: &str) -> NodeDraft {
        NodeDraft::new(id)
    }

    /// Create an empty edge draft between two added nodes
    fn new_edge_draft(&self, source: NodeKey, target: NodeKey) -> EdgeDraft {
        EdgeDraft::new(source, target)
    }

    /// Add a finished node
    fn add_node(&mut self, node: NodeDraft) -> ContainerResult<NodeKey>;

    /// Add a finished edge
    fn add_edge(&mut self, edge: EdgeDraft) -> ContainerResult<EdgeKey>;

    /// Look up a previously added node by identifier
    fn node(&self, id: &str) -> Option<NodeKey>;

    /// The schema table for a namespace
    fn attribute_table(&self, namespace: AttributeNamespace) -> &AttributeTable;

    /// The mutable schema table for a namespace
    fn attribute_table_mut(&mut self, namespace: AttributeNamespace) -> &mut AttributeTable;

    fn has_column(&self, namespace: AttributeNamespace, name: &str) -> bool {
        self.attribute_table(namespace).has_column(name)
    }

    fn column(&self, namespace: AttributeNamespace, name: &str) -> Option<AttributeColumn> {
        self.attribute_table(namespace).column(name).cloned()
    }

    fn add_column(
        &mut self,
        namespace: AttributeNamespace,
        name: &str,
        attribute_type: AttributeType,
    ) -> ContainerResult<AttributeColumn> {
        self.attribute_table_mut(namespace).add_column(name, attribute_type)
    }
}
