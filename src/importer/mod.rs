//! Graph import walker
//!
//! Materializes a whole source graph into an [`ImportContainer`] in two passes:
//! first every vertex becomes a node, then every edge whose endpoints were both
//! imported becomes an edge. Attribute columns are created the first time a
//! property key is seen in a namespace, typed after that first value.
//!
//! Records that cannot be imported (missing identifiers, unresolved endpoints,
//! unsupported property values) are reported as warnings and skipped. Failures
//! of the source graph itself abort the run. Either way the source handle is
//! shut down exactly once when the walk ends.

use crate::container::{AttributeColumn, ContainerError, ImportContainer, NodeKey};
use crate::diagnostics::{ImportReport, Issue};
use crate::inference::infer_attribute_type;
use crate::registry::RegistryError;
use crate::source::{EdgeRef, SourceError, SourceGraph, SourceResult, VertexRef};
use crate::value_objects::{AttributeNamespace, Direction, EdgeOrientation, PropertyValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, info_span, warn};

pub mod task;

pub use task::{spawn_import, FinishedImport, ImportHandle};

/// Errors that abort an import
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Failed to read source graph: {0}")]
    Source(#[from] SourceError),

    #[error("Failed to shut down source graph: {0}")]
    Shutdown(#[source] SourceError),

    #[error("Container rejected imported data: {0}")]
    Container(#[from] ContainerError),

    #[error("Failed to open source graph: {0}")]
    Open(#[from] RegistryError),
}

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;

/// A failed import together with everything reported before it failed
#[derive(Debug, thiserror::Error)]
#[error("Graph import failed: {error}")]
pub struct ImportFailure {
    #[source]
    pub error: ImportError,
    pub report: ImportReport,
}

/// How an import that did not fail ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportStatus {
    Completed,
    Cancelled,
}

/// Result of an import that did not fail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub status: ImportStatus,
    pub report: ImportReport,
    pub nodes_imported: usize,
    pub edges_imported: usize,
}

impl ImportOutcome {
    /// `true` when the whole graph was walked
    pub fn is_success(&self) -> bool {
        self.status == ImportStatus::Completed
    }
}

/// Options controlling an import
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Which endpoint of a source edge becomes the source of the imported edge
    pub edge_orientation: EdgeOrientation,

    /// Whether every attached attribute is written to the report log
    pub log_attributes: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            edge_orientation: EdgeOrientation::Preserve,
            log_attributes: true,
        }
    }
}

/// Shared cancellation request
///
/// Clones observe the same flag, so a clone handed to another thread can stop
/// a running import at its next checkpoint.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; idempotent
    pub fn cancel(&self) -> bool {
        self.0.store(true, Ordering::Release);
        true
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear a previous request
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Walks a source graph into a destination container
#[derive(Debug, Clone, Default)]
pub struct GraphImportWalker {
    options: ImportOptions,
    cancel: CancellationFlag,
}

impl GraphImportWalker {
    /// Create a walker with the given options
    pub fn new(options: ImportOptions) -> Self {
        Self {
            options,
            cancel: CancellationFlag::new(),
        }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Request that a running (or the next) import stops at its next checkpoint
    pub fn cancel(&self) -> bool {
        self.cancel.cancel()
    }

    /// Handle for cancelling from another thread
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Clear a cancellation request so the walker can be run again
    pub fn reset(&self) {
        self.cancel.reset();
    }

    /// Import every vertex and edge of `source` into `target`
    ///
    /// Cancellation is checked before each vertex of either pass; whatever was
    /// materialized before that point stays in `target`. `source` is shut down
    /// on every exit path.
    pub fn run<S, C>(&self, source: &mut S, target: &mut C) -> Result<ImportOutcome, ImportFailure>
    where
        S: SourceGraph + ?Sized,
        C: ImportContainer + ?Sized,
    {
        let span = info_span!("import", orientation = ?self.options.edge_orientation);
        let _entered = span.enter();
        info!("Starting graph import");

        let mut guard = ShutdownGuard::new(source);
        let mut walk = Walk {
            options: &self.options,
            cancel: &self.cancel,
            target,
            report: ImportReport::new(),
            node_index: HashMap::new(),
            nodes_imported: 0,
            edges_imported: 0,
        };

        let walked = walk.run(guard.source());
        let shutdown = guard.close();

        let Walk {
            mut report,
            nodes_imported,
            edges_imported,
            ..
        } = walk;

        let status = match (walked, shutdown) {
            (Ok(status), Ok(())) => status,
            (Ok(_), Err(err)) => {
                error!("Source graph shutdown failed: {err}");
                return Err(ImportFailure {
                    error: ImportError::Shutdown(err),
                    report,
                });
            }
            (Err(err), shutdown) => {
                error!("Graph import aborted: {err}");
                if let Err(shutdown_err) = shutdown {
                    warn!("Source graph shutdown also failed: {shutdown_err}");
                }
                return Err(ImportFailure { error: err, report });
            }
        };

        report.log(format!(
            "Imported {nodes_imported} nodes and {edges_imported} edges"
        ));
        info!(
            nodes = nodes_imported,
            edges = edges_imported,
            status = ?status,
            "Graph import finished"
        );

        Ok(ImportOutcome {
            status,
            report,
            nodes_imported,
            edges_imported,
        })
    }
}

/// Shuts a source graph down exactly once, even if the walk unwinds
struct ShutdownGuard<'a, S: SourceGraph + ?Sized> {
    source: &'a mut S,
    closed: bool,
}

impl<'a, S: SourceGraph + ?Sized> ShutdownGuard<'a, S> {
    fn new(source: &'a mut S) -> Self {
        Self {
            source,
            closed: false,
        }
    }

    fn source(&self) -> &S {
        &*self.source
    }

    fn close(&mut self) -> SourceResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.source.shutdown()
    }
}

impl<S: SourceGraph + ?Sized> Drop for ShutdownGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!("Source graph shutdown failed: {err}");
        }
    }
}

/// State of a single import run
struct Walk<'a, C: ImportContainer + ?Sized> {
    options: &'a ImportOptions,
    cancel: &'a CancellationFlag,
    target: &'a mut C,
    report: ImportReport,
    node_index: HashMap<String, NodeKey>,
    nodes_imported: usize,
    edges_imported: usize,
}

impl<C: ImportContainer + ?Sized> Walk<'_, C> {
    fn run<S: SourceGraph + ?Sized>(&mut self, source: &S) -> ImportResult<ImportStatus> {
        if self.cancel.is_cancelled() {
            info!("Import cancelled before it started");
            return Ok(ImportStatus::Cancelled);
        }

        let vertices = source.vertices()?;
        debug!(vertices = vertices.len(), "Listed source vertices");

        if self.import_nodes(source, &vertices)? == ImportStatus::Cancelled {
            return Ok(ImportStatus::Cancelled);
        }
        self.import_edges(source, &vertices)
    }

    fn cancelled(&self) -> bool {
        if self.cancel.is_cancelled() {
            info!(
                nodes = self.nodes_imported,
                edges = self.edges_imported,
                "Import cancelled"
            );
            return true;
        }
        false
    }

    fn import_nodes<S: SourceGraph + ?Sized>(
        &mut self,
        source: &S,
        vertices: &[VertexRef],
    ) -> ImportResult<ImportStatus> {
        let _span = info_span!("nodes").entered();

        for &vertex in vertices {
            if self.cancelled() {
                return Ok(ImportStatus::Cancelled);
            }

            let Some(source_id) = source.vertex_id(vertex)? else {
                self.report.log_issue(Issue::warning(format!(
                    "Vertex {vertex} has no identifier and was skipped"
                )));
                continue;
            };
            let id = source_id.to_string();

            if self.node_index.contains_key(&id) || self.target.node(&id).is_some() {
                self.report.log_issue(Issue::warning(format!(
                    "Duplicate node identifier '{id}' on vertex {vertex}, kept the first occurrence"
                )));
                continue;
            }

            let mut node = self.target.new_node_draft(&id);
            self.report.log(format!("Node added: {id}"));
            debug!(node = %id, "Node added");

            for key in source.vertex_property_keys(vertex)? {
                let Some(value) = source.vertex_property(vertex, &key)? else {
                    self.report.log_issue(Issue::warning(format!(
                        "Property '{key}' of node '{id}' has no value and was skipped"
                    )));
                    continue;
                };
                let Some(column) = self.resolve_column(AttributeNamespace::Node, &key, &value)? else {
                    continue;
                };
                if self.options.log_attributes {
                    self.report.log(format!("Attribute added: {key} = {value}"));
                }
                node.add_attribute_value(&column, value);
            }

            let key = self.target.add_node(node)?;
            self.node_index.insert(id, key);
            self.nodes_imported += 1;
        }

        Ok(ImportStatus::Completed)
    }

    fn import_edges<S: SourceGraph + ?Sized>(
        &mut self,
        source: &S,
        vertices: &[VertexRef],
    ) -> ImportResult<ImportStatus> {
        let _span = info_span!("edges").entered();

        for &vertex in vertices {
            if self.cancelled() {
                return Ok(ImportStatus::Cancelled);
            }

            // Each edge has exactly one head, so walking incoming edges of
            // every vertex visits every edge once.
            for edge in source.edges(vertex, Direction::In)? {
                self.import_edge(source, edge)?;
            }
        }

        Ok(ImportStatus::Completed)
    }

    fn import_edge<S: SourceGraph + ?Sized>(&mut self, source: &S, edge: EdgeRef) -> ImportResult<()> {
        let from_side = match self.options.edge_orientation {
            EdgeOrientation::Preserve => Direction::Out,
            EdgeOrientation::Inverted => Direction::In,
        };
        let from = source.edge_vertex(edge, from_side)?;
        let to = source.edge_vertex(edge, from_side.opposite())?;

        let endpoints = match (source.vertex_id(from)?, source.vertex_id(to)?) {
            (Some(from_id), Some(to_id)) => {
                let from_id = from_id.to_string();
                let to_id = to_id.to_string();
                match (self.lookup_node(&from_id), self.lookup_node(&to_id)) {
                    (Some(from_key), Some(to_key)) => Some((from_id, from_key, to_id, to_key)),
                    _ => None,
                }
            }
            _ => None,
        };
        let Some((from_id, from_key, to_id, to_key)) = endpoints else {
            self.report.log_issue(Issue::warning(format!(
                "Edge {edge} references a missing node and was skipped"
            )));
            return Ok(());
        };

        let mut imported = self.target.new_edge_draft(from_key, to_key);
        self.report.log(format!("Edge added: {from_id} -> {to_id}"));
        debug!(source = %from_id, target = %to_id, "Edge added");

        for key in source.edge_property_keys(edge)? {
            let Some(value) = source.edge_property(edge, &key)? else {
                self.report.log_issue(Issue::warning(format!(
                    "Property '{key}' of edge {from_id} -> {to_id} has no value and was skipped"
                )));
                continue;
            };
            let Some(column) = self.resolve_column(AttributeNamespace::Edge, &key, &value)? else {
                continue;
            };
            if self.options.log_attributes {
                self.report
                    .log(format!("Relationship attribute added: {key} = {value}"));
            }
            imported.add_attribute_value(&column, value);
        }

        self.target.add_edge(imported)?;
        self.edges_imported += 1;
        Ok(())
    }

    fn lookup_node(&self, id: &str) -> Option<NodeKey> {
        self.node_index
            .get(id)
            .copied()
            .or_else(|| self.target.node(id))
    }

    /// Existing column for `key`, or a new one typed after `value`
    ///
    /// `None` means the value has no attribute type; the attribute is skipped.
    fn resolve_column(
        &mut self,
        namespace: AttributeNamespace,
        key: &str,
        value: &PropertyValue,
    ) -> ImportResult<Option<AttributeColumn>> {
        if let Some(column) = self.target.column(namespace, key) {
            if infer_attribute_type(value) != Some(column.attribute_type) {
                self.report.log(format!(
                    "Value of kind {} attached to {namespace} column '{key}' of type {}",
                    value.kind(),
                    column.attribute_type
                ));
            }
            return Ok(Some(column));
        }

        match infer_attribute_type(value) {
            Some(attribute_type) => {
                let column = self.target.add_column(namespace, key, attribute_type)?;
                debug!(%namespace, column = key, %attribute_type, "Attribute column created");
                Ok(Some(column))
            }
            None => {
                self.report.log_issue(Issue::warning(format!(
                    "Unsupported {} value for {namespace} property '{key}' was skipped",
                    value.kind()
                )));
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::InMemoryContainer;
    use crate::diagnostics::IssueLevel;
    use crate::source::InMemorySourceGraph;
    use crate::value_objects::{AttributeType, SourceId};

    /// A{name}, B{name, age} and one edge A -> B{since}
    fn example_graph() -> InMemorySourceGraph {
        let mut graph = InMemorySourceGraph::new();
        let a = graph.add_vertex("A");
        graph.set_vertex_property(a, "name", "x").unwrap();
        let b = graph.add_vertex("B");
        graph.set_vertex_property(b, "name", "y").unwrap();
        graph.set_vertex_property(b, "age", 5i32).unwrap();
        let edge = graph.add_edge(a, b).unwrap();
        graph.set_edge_property(edge, "since", 2020i32).unwrap();
        graph
    }

    /// Wraps a source and fails or cancels at a chosen point
    struct ScriptedSource {
        inner: InMemorySourceGraph,
        fail_on_edges: bool,
        cancel_after_ids: Option<(usize, CancellationFlag)>,
        id_reads: std::cell::Cell<usize>,
        cancel_on_edges_call: Option<(usize, CancellationFlag)>,
        edges_calls: std::cell::Cell<usize>,
        phantom_vertex_key: Option<&'static str>,
        phantom_edge_key: Option<&'static str>,
        shutdowns: usize,
        shutdown_error: bool,
    }

    impl ScriptedSource {
        fn new(inner: InMemorySourceGraph) -> Self {
            Self {
                inner,
                fail_on_edges: false,
                cancel_after_ids: None,
                id_reads: std::cell::Cell::new(0),
                cancel_on_edges_call: None,
                edges_calls: std::cell::Cell::new(0),
                phantom_vertex_key: None,
                phantom_edge_key: None,
                shutdowns: 0,
                shutdown_error: false,
            }
        }
    }

    impl SourceGraph for ScriptedSource {
        fn vertices(&self) -> SourceResult<Vec<VertexRef>> {
            self.inner.vertices()
        }

        fn vertex_id(&self, vertex: VertexRef) -> SourceResult<Option<SourceId>> {
            let reads = self.id_reads.get() + 1;
            self.id_reads.set(reads);
            if let Some((limit, flag)) = &self.cancel_after_ids {
                if reads >= *limit {
                    flag.cancel();
                }
            }
            self.inner.vertex_id(vertex)
        }

        fn vertex_property_keys(&self, vertex: VertexRef) -> SourceResult<Vec<String>> {
            let mut keys = self.inner.vertex_property_keys(vertex)?;
            keys.extend(self.phantom_vertex_key.map(str::to_string));
            Ok(keys)
        }

        fn vertex_property(&self, vertex: VertexRef, key: &str) -> SourceResult<Option<PropertyValue>> {
            self.inner.vertex_property(vertex, key)
        }

        fn edges(&self, vertex: VertexRef, direction: Direction) -> SourceResult<Vec<EdgeRef>> {
            if self.fail_on_edges {
                return Err(SourceError::Driver("connection reset".to_string()));
            }
            let calls = self.edges_calls.get() + 1;
            self.edges_calls.set(calls);
            if let Some((call, flag)) = &self.cancel_on_edges_call {
                if calls == *call {
                    flag.cancel();
                }
            }
            self.inner.edges(vertex, direction)
        }

        fn edge_vertex(&self, edge: EdgeRef, direction: Direction) -> SourceResult<VertexRef> {
            self.inner.edge_vertex(edge, direction)
        }

        fn edge_property_keys(&self, edge: EdgeRef) -> SourceResult<Vec<String>> {
            let mut keys = self.inner.edge_property_keys(edge)?;
            keys.extend(self.phantom_edge_key.map(str::to_string));
            Ok(keys)
        }

        fn edge_property(&self, edge: EdgeRef, key: &str) -> SourceResult<Option<PropertyValue>> {
            self.inner.edge_property(edge, key)
        }

        fn shutdown(&mut self) -> SourceResult<()> {
            self.shutdowns += 1;
            if self.shutdown_error {
                return Err(SourceError::Driver("shutdown refused".to_string()));
            }
            self.inner.shutdown()
        }
    }

    #[test]
    fn test_example_graph_import() {
        let mut source = example_graph();
        let mut container = InMemoryContainer::new();

        let outcome = GraphImportWalker::default()
            .run(&mut source, &mut container)
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.nodes_imported, 2);
        assert_eq!(outcome.edges_imported, 1);
        assert!(outcome.report.issues().is_empty());

        let node_columns: Vec<_> = container
            .node_table()
            .columns()
            .map(|c| (c.name.as_str(), c.attribute_type))
            .collect();
        assert_eq!(
            node_columns,
            vec![("name", AttributeType::String), ("age", AttributeType::Int)]
        );

        let edge_columns: Vec<_> = container
            .edge_table()
            .columns()
            .map(|c| (c.name.as_str(), c.attribute_type))
            .collect();
        assert_eq!(edge_columns, vec![("since", AttributeType::Int)]);

        assert_eq!(
            container.edge_endpoints(),
            vec![("A".to_string(), "B".to_string())]
        );
        assert_eq!(
            container.edges()[0].attribute("since"),
            Some(&PropertyValue::Int(2020))
        );
        assert_eq!(
            container.node_by_id("B").unwrap().attribute("age"),
            Some(&PropertyValue::Int(5))
        );
        assert_eq!(source.shutdown_count(), 1);
    }

    #[test]
    fn test_inverted_orientation() {
        let mut source = example_graph();
        let mut container = InMemoryContainer::new();

        let walker = GraphImportWalker::new(ImportOptions {
            edge_orientation: EdgeOrientation::Inverted,
            ..Default::default()
        });
        walker.run(&mut source, &mut container).unwrap();

        assert_eq!(
            container.edge_endpoints(),
            vec![("B".to_string(), "A".to_string())]
        );
    }

    #[test]
    fn test_vertex_without_identifier() {
        let mut source = InMemorySourceGraph::new();
        let anonymous = source.add_anonymous_vertex();
        source.set_vertex_property(anonymous, "name", "ghost").unwrap();
        source.set_vertex_property(anonymous, "age", 3i32).unwrap();
        let mut container = InMemoryContainer::new();

        let outcome = GraphImportWalker::default()
            .run(&mut source, &mut container)
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(container.node_count(), 0);
        assert!(container.node_table().is_empty());
        assert_eq!(outcome.report.warning_count(), 1);
        assert_eq!(outcome.report.issues()[0].level, IssueLevel::Warning);
    }

    #[test]
    fn test_edge_to_anonymous_vertex_is_skipped() {
        let mut source = InMemorySourceGraph::new();
        let a = source.add_vertex("A");
        let anonymous = source.add_anonymous_vertex();
        source.add_edge(a, anonymous).unwrap();
        let mut container = InMemoryContainer::new();

        let outcome = GraphImportWalker::default()
            .run(&mut source, &mut container)
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(container.node_count(), 1);
        assert_eq!(container.edge_count(), 0);
        // one for the vertex, one for the edge
        assert_eq!(outcome.report.warning_count(), 2);
        assert!(outcome.report.issues()[1].message.contains("missing node"));
    }

    #[test]
    fn test_duplicate_identifier_first_wins() {
        let mut source = InMemorySourceGraph::new();
        let first = source.add_vertex("A");
        source.set_vertex_property(first, "rank", 1i32).unwrap();
        let second = source.add_vertex("A");
        source.set_vertex_property(second, "rank", 2i32).unwrap();
        source.set_vertex_property(second, "extra", true).unwrap();
        let mut container = InMemoryContainer::new();

        let outcome = GraphImportWalker::default()
            .run(&mut source, &mut container)
            .unwrap();

        assert_eq!(container.node_count(), 1);
        assert_eq!(
            container.node_by_id("A").unwrap().attribute("rank"),
            Some(&PropertyValue::Int(1))
        );
        assert!(!container.node_table().has_column("extra"));
        assert_eq!(outcome.report.warning_count(), 1);
    }

    #[test]
    fn test_unmapped_value_skips_attribute() {
        let mut source = InMemorySourceGraph::new();
        let a = source.add_vertex("A");
        source.set_vertex_property(a, "blob", PropertyValue::Bytes(vec![1, 2])).unwrap();
        source.set_vertex_property(a, "name", "x").unwrap();
        let b = source.add_vertex("B");
        source.set_vertex_property(b, "blob", "text now").unwrap();
        let mut container = InMemoryContainer::new();

        let outcome = GraphImportWalker::default()
            .run(&mut source, &mut container)
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.report.warning_count(), 1);
        assert_eq!(container.node_by_id("A").unwrap().attribute("blob"), None);
        assert_eq!(
            container.node_table().column("blob").unwrap().attribute_type,
            AttributeType::String
        );
    }

    #[test]
    fn test_first_value_fixes_column_type() {
        let mut source = InMemorySourceGraph::new();
        let a = source.add_vertex("A");
        source.set_vertex_property(a, "score", 1i64).unwrap();
        let b = source.add_vertex("B");
        source.set_vertex_property(b, "score", 1.5f64).unwrap();
        let mut container = InMemoryContainer::new();

        GraphImportWalker::default()
            .run(&mut source, &mut container)
            .unwrap();

        assert_eq!(container.node_table().len(), 1);
        assert_eq!(
            container.node_table().column("score").unwrap().attribute_type,
            AttributeType::Long
        );
        assert_eq!(
            container.node_by_id("B").unwrap().attribute("score"),
            Some(&PropertyValue::Double(1.5))
        );
    }

    #[test]
    fn test_cancel_before_run() {
        let mut source = example_graph();
        let mut container = InMemoryContainer::new();
        let walker = GraphImportWalker::default();
        assert!(walker.cancel());
        assert!(walker.cancel());

        let outcome = walker.run(&mut source, &mut container).unwrap();

        assert_eq!(outcome.status, ImportStatus::Cancelled);
        assert!(!outcome.is_success());
        assert_eq!(container.node_count(), 0);
        assert_eq!(container.edge_count(), 0);
        assert_eq!(source.shutdown_count(), 1);
    }

    #[test]
    fn test_cancel_mid_node_pass_keeps_partial_import() {
        let mut inner = InMemorySourceGraph::new();
        for id in 0..5i64 {
            inner.add_vertex(id);
        }
        let walker = GraphImportWalker::default();
        let mut source = ScriptedSource::new(inner);
        source.cancel_after_ids = Some((2, walker.cancellation_flag()));
        let mut container = InMemoryContainer::new();

        let outcome = walker.run(&mut source, &mut container).unwrap();

        assert_eq!(outcome.status, ImportStatus::Cancelled);
        assert_eq!(container.node_count(), 2);
        assert_eq!(outcome.nodes_imported, 2);
        assert_eq!(source.shutdowns, 1);
    }

    #[test]
    fn test_cancel_mid_edge_pass_keeps_nodes() {
        // chain 0 -> 1 -> 2 -> 3
        let mut inner = InMemorySourceGraph::new();
        let vertices: Vec<_> = (0..4i64).map(|id| inner.add_vertex(id)).collect();
        for pair in vertices.windows(2) {
            inner.add_edge(pair[0], pair[1]).unwrap();
        }
        let walker = GraphImportWalker::default();
        let mut source = ScriptedSource::new(inner);
        // second vertex's incoming edges are still imported, the third is never visited
        source.cancel_on_edges_call = Some((2, walker.cancellation_flag()));
        let mut container = InMemoryContainer::new();

        let outcome = walker.run(&mut source, &mut container).unwrap();

        assert_eq!(outcome.status, ImportStatus::Cancelled);
        assert_eq!(container.node_count(), 4);
        assert_eq!(outcome.nodes_imported, 4);
        assert_eq!(outcome.edges_imported, 1);
        assert_eq!(
            container.edge_endpoints(),
            vec![("0".to_string(), "1".to_string())]
        );
        assert_eq!(source.shutdowns, 1);
    }

    #[test]
    fn test_listed_key_without_value_is_skipped() {
        let mut source = ScriptedSource::new(example_graph());
        source.phantom_vertex_key = Some("ghost");
        source.phantom_edge_key = Some("ghost");
        let mut container = InMemoryContainer::new();

        let outcome = GraphImportWalker::default()
            .run(&mut source, &mut container)
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(outcome.nodes_imported, 2);
        assert_eq!(outcome.edges_imported, 1);
        // once per vertex and once for the edge
        assert_eq!(outcome.report.warning_count(), 3);
        assert!(outcome
            .report
            .issues()
            .iter()
            .all(|issue| issue.message.contains("'ghost'") && issue.message.contains("no value")));
        assert!(!container.node_table().has_column("ghost"));
        assert!(!container.edge_table().has_column("ghost"));
        assert_eq!(container.node_table().len(), 2);
        assert_eq!(container.edge_table().len(), 1);
    }

    #[test]
    fn test_unmapped_edge_value_skips_attribute() {
        let mut source = InMemorySourceGraph::new();
        let a = source.add_vertex("A");
        let b = source.add_vertex("B");
        let edge = source.add_edge(a, b).unwrap();
        source
            .set_edge_property(
                edge,
                "path",
                PropertyValue::List(vec![PropertyValue::from(1i32), PropertyValue::from(2i32)]),
            )
            .unwrap();
        let mut container = InMemoryContainer::new();

        let outcome = GraphImportWalker::default()
            .run(&mut source, &mut container)
            .unwrap();

        assert!(outcome.is_success());
        assert_eq!(container.edge_count(), 1);
        assert!(container.edge_table().is_empty());
        assert_eq!(container.edges()[0].attribute("path"), None);
        assert_eq!(outcome.report.warning_count(), 1);
        assert!(outcome.report.issues()[0].message.contains("edge property 'path'"));
    }

    #[test]
    fn test_reset_allows_rerun() {
        let walker = GraphImportWalker::default();
        walker.cancel();
        walker.reset();
        assert!(!walker.is_cancelled());

        let mut source = example_graph();
        let mut container = InMemoryContainer::new();
        assert!(walker.run(&mut source, &mut container).unwrap().is_success());
    }

    #[test]
    fn test_source_failure_aborts_and_shuts_down() {
        let mut source = ScriptedSource::new(example_graph());
        source.fail_on_edges = true;
        let mut container = InMemoryContainer::new();

        let failure = GraphImportWalker::default()
            .run(&mut source, &mut container)
            .unwrap_err();

        assert!(matches!(
            failure.error,
            ImportError::Source(SourceError::Driver(_))
        ));
        // nodes from the first pass stay
        assert_eq!(container.node_count(), 2);
        assert!(failure
            .report
            .log_lines()
            .iter()
            .any(|line| line == "Node added: A"));
        assert_eq!(source.shutdowns, 1);
    }

    #[test]
    fn test_shutdown_failure_fails_run() {
        let mut source = ScriptedSource::new(example_graph());
        source.shutdown_error = true;
        let mut container = InMemoryContainer::new();

        let failure = GraphImportWalker::default()
            .run(&mut source, &mut container)
            .unwrap_err();

        assert!(matches!(failure.error, ImportError::Shutdown(_)));
        assert_eq!(container.edge_count(), 1);
        assert_eq!(source.shutdowns, 1);
    }

    #[test]
    fn test_attribute_logging_can_be_disabled() {
        let mut source = example_graph();
        let mut container = InMemoryContainer::new();
        let walker = GraphImportWalker::new(ImportOptions {
            log_attributes: false,
            ..Default::default()
        });

        let outcome = walker.run(&mut source, &mut container).unwrap();

        assert!(outcome
            .report
            .log_lines()
            .iter()
            .all(|line| !line.contains("ttribute added")));
        assert_eq!(container.node_table().len(), 2);
    }
}
