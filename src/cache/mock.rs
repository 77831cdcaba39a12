//! cache::mock
//!
//! Mock graph cache for deterministic testing.

use std::sync::{Arc, Mutex};

use super::{CacheState, GraphCache, Hydration};
use crate::core::graph::Graph;
use crate::core::repos::SelectionSet;

/// Mock cache returning a fixed hydration outcome and counting calls.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state,
/// so a test can hand one clone to the pipeline and keep another for
/// assertions (e.g. that hydration is attempted exactly once).
#[derive(Debug, Clone)]
pub struct MockGraphCache {
    outcome: Hydration,
    calls: Arc<Mutex<usize>>,
}

impl MockGraphCache {
    /// A cache that always hydrates the given graph.
    pub fn ready(graph: Graph) -> Self {
        Self {
            outcome: Hydration::Ready(graph),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// A cache that degrades with a failure trace.
    pub fn degraded(trace: impl Into<String>) -> Self {
        Self {
            outcome: Hydration::Degraded(CacheState::failure(trace)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// A cache that degrades without a trace (cache absent).
    pub fn absent() -> Self {
        Self {
            outcome: Hydration::Degraded(CacheState::absent()),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of hydration attempts observed.
    pub fn hydrate_count(&self) -> usize {
        *self.calls.lock().expect("mock cache lock poisoned")
    }
}

impl GraphCache for MockGraphCache {
    fn hydrate(&self, _selection: &SelectionSet) -> Hydration {
        *self.calls.lock().expect("mock cache lock poisoned") += 1;
        self.outcome.clone()
    }
}
