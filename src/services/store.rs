use std::sync::{Arc, PoisonError, RwLock};

use tracing::info;

use crate::structures::Graph;

/// Holds the graph currently served.
///
/// Readers take an [`Arc`] snapshot and keep using it for the whole request;
/// a rebuild installs a new graph without touching snapshots in flight.
pub struct GraphStore {
    current: RwLock<Arc<Graph>>,
}

impl GraphStore {
    pub fn new(graph: Graph) -> GraphStore {
        GraphStore {
            current: RwLock::new(Arc::new(graph)),
        }
    }

    pub fn snapshot(&self) -> Arc<Graph> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Swaps in `graph` and returns the snapshot it replaces.
    pub fn replace(&self, graph: Graph) -> Arc<Graph> {
        info!(
            "Serving new graph with {} nodes and {} edges",
            graph.node_count(),
            graph.edge_count()
        );
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, Arc::new(graph))
    }
}
