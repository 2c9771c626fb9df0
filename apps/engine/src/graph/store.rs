//! Snapshot holder for the process-wide knowledge graph.
//!
//! The graph is loaded once at startup and refreshed, if ever, by swapping a
//! whole immutable snapshot — readers hold an `Arc` and can never observe a
//! half-updated graph.

use std::sync::{Arc, RwLock};

use tracing::info;

use super::KnowledgeGraph;

pub struct GraphStore {
    inner: RwLock<Arc<KnowledgeGraph>>,
}

impl GraphStore {
    pub fn new(graph: KnowledgeGraph) -> Self {
        Self {
            inner: RwLock::new(Arc::new(graph)),
        }
    }

    /// Hands out the current immutable snapshot. Queries against it stay
    /// consistent even if a refresh lands mid-request.
    pub fn snapshot(&self) -> Arc<KnowledgeGraph> {
        self.inner.read().expect("graph lock poisoned").clone()
    }

    /// Atomically replaces the snapshot. In-flight readers keep the graph
    /// they already hold.
    pub fn swap(&self, graph: KnowledgeGraph) {
        let node_count = graph.node_count();
        *self.inner.write().expect("graph lock poisoned") = Arc::new(graph);
        info!("Knowledge graph refreshed ({node_count} nodes)");
    }
}
