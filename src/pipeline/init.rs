//! pipeline::init
//!
//! Runtime initialization: produce a Ready graph via cache-or-rebuild.
//!
//! # Algorithm
//!
//! 1. Attempt cache hydration. A hydrated graph is accepted as-is.
//! 2. On degradation, log any failure trace at warning level — this is
//!    expected degradation, never fatal — and fall back.
//! 3. Rebuild from scratch in two fixed phases, core then system. Any phase
//!    error fails the run; there is no partial credit and the cache is never
//!    retried within a run.
//!
//! Every step drives the pure [`InitState`] transition function, so the
//! lifecycle is explicit rather than an implicit success flag.

use std::collections::BTreeSet;

use crate::cache::{GraphCache, Hydration};
use crate::core::graph::{Graph, InitEvent, InitState};
use crate::core::repos::{RepositorySet, SelectionSet};
use crate::model::{BuildPhase, ModelCompiler, ModelError};
use crate::report::{ReportSink, StepEvent};

/// Initialize the run's graph from cache or by full rebuild.
///
/// # Errors
///
/// Returns `ModelError` when a rebuild phase fails. Cache problems never
/// surface as errors.
pub fn initialize(
    all: &RepositorySet,
    selection: &SelectionSet,
    cache: &dyn GraphCache,
    compiler: &dyn ModelCompiler,
    report: &dyn ReportSink,
) -> Result<Graph, ModelError> {
    let mut state = InitState::NotLoaded;

    match cache.hydrate(selection) {
        Hydration::Ready(graph) => {
            state = state.on(InitEvent::Hydrated).on(InitEvent::Accepted);
            debug_assert_eq!(state, InitState::Ready);
            report.emit(StepEvent::info("    Initialized from cache"));
            Ok(graph)
        }
        Hydration::Degraded(cache_state) => {
            state = state.on(InitEvent::Degraded);
            if let Some(trace) = cache_state.last_failure() {
                report.emit(StepEvent::warn(format!(
                    "    Cache initialization failure: {}",
                    trace
                )));
            }
            report.emit(StepEvent::info(
                "    Initialization from cache failed - compiling from scratch",
            ));

            state = state.on(InitEvent::RebuildStarted);
            match rebuild(all, selection, compiler, report) {
                Ok(graph) => {
                    state = state.on(InitEvent::RebuildSucceeded);
                    debug_assert_eq!(state, InitState::Ready);
                    Ok(graph)
                }
                Err(e) => {
                    state = state.on(InitEvent::RebuildFailed);
                    debug_assert!(state.is_terminal());
                    Err(e)
                }
            }
        }
    }
}

/// Full rebuild: core phase, then system phase, no partial credit.
fn rebuild(
    all: &RepositorySet,
    selection: &SelectionSet,
    compiler: &dyn ModelCompiler,
    report: &dyn ReportSink,
) -> Result<Graph, ModelError> {
    // Start from an empty graph; nothing hydrated survives into the rebuild.
    let mut elements = Graph::empty().elements().to_vec();

    for phase in [BuildPhase::Core, BuildPhase::System] {
        report.emit(StepEvent::info(format!(
            "    Compiling {} sources",
            phase.as_str()
        )));
        elements.extend(compiler.compile(phase, all, selection)?);
    }

    let mut seen = BTreeSet::new();
    for element in &elements {
        if !seen.insert(element.path.as_str()) {
            return Err(ModelError::DuplicateElement(element.path.clone()));
        }
    }

    Ok(Graph::new(selection.names().cloned().collect(), elements))
}
