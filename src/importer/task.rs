//! Background imports
//!
//! Source graph reads block, so a walk is run on tokio's blocking pool. The
//! returned handle can cancel the walk and hands the container back once it
//! ends, together with the walk result.

use super::{CancellationFlag, GraphImportWalker, ImportFailure, ImportOutcome};
use crate::container::ImportContainer;
use crate::source::SourceGraph;
use tokio::task::{JoinError, JoinHandle};
use tracing::debug;

/// Container and result of a background import that has ended
#[derive(Debug)]
pub struct FinishedImport<C> {
    pub container: C,
    pub result: Result<ImportOutcome, ImportFailure>,
}

/// Handle to an import running in the background
#[derive(Debug)]
pub struct ImportHandle<C> {
    cancel: CancellationFlag,
    join: JoinHandle<FinishedImport<C>>,
}

impl<C> ImportHandle<C> {
    /// Ask the import to stop at its next checkpoint
    pub fn cancel(&self) -> bool {
        debug!("Cancellation requested for background import");
        self.cancel.cancel()
    }

    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Wait for the import to end
    ///
    /// Fails only if the walk panicked.
    pub async fn join(self) -> Result<FinishedImport<C>, JoinError> {
        self.join.await
    }
}

/// Run `walker` over `source` into `container` on the blocking pool
///
/// Must be called from within a tokio runtime.
pub fn spawn_import<S, C>(walker: GraphImportWalker, mut source: S, mut container: C) -> ImportHandle<C>
where
    S: SourceGraph + 'static,
    C: ImportContainer + Send + 'static,
{
    let cancel = walker.cancellation_flag();
    let join = tokio::task::spawn_blocking(move || {
        let result = walker.run(&mut source, &mut container);
        FinishedImport { container, result }
    });

    ImportHandle { cancel, join }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::InMemoryContainer;
    use crate::importer::ImportStatus;
    use crate::source::InMemorySourceGraph;

    fn chain(len: i64) -> InMemorySourceGraph {
        let mut graph = InMemorySourceGraph::new();
        let mut previous = None;
        for id in 0..len {
            let vertex = graph.add_vertex(id);
            graph.set_vertex_property(vertex, "position", id).unwrap();
            if let Some(prev) = previous {
                graph.add_edge(prev, vertex).unwrap();
            }
            previous = Some(vertex);
        }
        graph
    }

    #[tokio::test]
    async fn test_background_import_returns_container() {
        let handle = spawn_import(
            GraphImportWalker::default(),
            chain(10),
            InMemoryContainer::new(),
        );

        let finished = handle.join().await.unwrap();
        let outcome = finished.result.unwrap();

        assert!(outcome.is_success());
        assert_eq!(finished.container.node_count(), 10);
        assert_eq!(finished.container.edge_count(), 9);
    }

    #[tokio::test]
    async fn test_cancelled_walker_stops_background_import() {
        let walker = GraphImportWalker::default();
        walker.cancel();

        let handle = spawn_import(walker, chain(10), InMemoryContainer::new());
        assert!(handle.cancellation_flag().is_cancelled());

        let finished = handle.join().await.unwrap();
        let outcome = finished.result.unwrap();

        assert_eq!(outcome.status, ImportStatus::Cancelled);
        assert_eq!(finished.container.node_count(), 0);
    }

    #[test]
    fn test_spawn_on_explicit_runtime() {
        let finished = tokio_test::block_on(async {
            let handle = spawn_import(
                GraphImportWalker::default(),
                chain(3),
                InMemoryContainer::new(),
            );
            handle.join().await
        });
        assert!(finished.is_ok());
    }
}
