//! cache
//!
//! Graph cache collaborator.
//!
//! # Design
//!
//! Cache hydration can never fail the run: every failure mode collapses into
//! [`Hydration::Degraded`] carrying a [`CacheState`] diagnostic, and the
//! initializer falls back to a full rebuild. The cache handle is read-only —
//! this process never writes or repairs a cache, it only hydrates from one.
//!
//! [`FileGraphCache`] is the production implementation (JSON graph plus a
//! SHA-256 digest sidecar); [`MockGraphCache`] serves tests.

pub mod file;
pub mod mock;

pub use file::FileGraphCache;
pub use mock::MockGraphCache;

use crate::core::graph::Graph;
use crate::core::repos::SelectionSet;

/// Diagnostic record of why cache hydration failed.
///
/// Read-only; used only for logging. Hydration may also degrade without a
/// trace (e.g. no cache file exists), in which case there is nothing to log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheState {
    last_failure: Option<String>,
}

impl CacheState {
    /// A degraded state with no failure trace (cache simply absent).
    pub fn absent() -> Self {
        Self { last_failure: None }
    }

    /// A degraded state carrying a failure trace.
    pub fn failure(trace: impl Into<String>) -> Self {
        Self {
            last_failure: Some(trace.into()),
        }
    }

    /// The last failure trace, if hydration failed rather than found nothing.
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }
}

/// Outcome of a hydration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hydration {
    /// The cache produced a graph covering the run's selection.
    Ready(Graph),
    /// The cache could not produce a usable graph; rebuild instead.
    Degraded(CacheState),
}

/// Source of cached graphs.
pub trait GraphCache {
    /// Attempt to hydrate a graph for the given selection.
    ///
    /// Infallible by design: failures are reported as `Degraded`, which the
    /// caller treats as expected degradation, not an error.
    fn hydrate(&self, selection: &SelectionSet) -> Hydration;
}
