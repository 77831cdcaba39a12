//! model::mock
//!
//! Mock model compiler for deterministic testing.

use std::sync::{Arc, Mutex};

use super::{BuildPhase, ModelCompiler, ModelError};
use crate::core::graph::Element;
use crate::core::repos::{RepositorySet, SelectionSet};

/// Mock compiler with per-phase canned output or failure.
///
/// Records the phases it was asked to compile, in order, so tests can assert
/// the core-then-system sequence (and that it runs exactly once).
#[derive(Debug, Clone)]
pub struct MockModelCompiler {
    core: Result<Vec<Element>, ModelError>,
    system: Result<Vec<Element>, ModelError>,
    phases_seen: Arc<Mutex<Vec<BuildPhase>>>,
}

impl MockModelCompiler {
    /// A compiler producing the given elements per phase.
    pub fn new(core: Vec<Element>, system: Vec<Element>) -> Self {
        Self {
            core: Ok(core),
            system: Ok(system),
            phases_seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A compiler that fails the given phase.
    pub fn failing(phase: BuildPhase, error: ModelError) -> Self {
        let mut mock = Self::new(Vec::new(), Vec::new());
        match phase {
            BuildPhase::Core => mock.core = Err(error),
            BuildPhase::System => mock.system = Err(error),
        }
        mock
    }

    /// Phases compiled so far, in call order.
    pub fn phases_seen(&self) -> Vec<BuildPhase> {
        self.phases_seen
            .lock()
            .expect("mock compiler lock poisoned")
            .clone()
    }
}

impl ModelCompiler for MockModelCompiler {
    fn compile(
        &self,
        phase: BuildPhase,
        _all: &RepositorySet,
        _selection: &SelectionSet,
    ) -> Result<Vec<Element>, ModelError> {
        self.phases_seen
            .lock()
            .expect("mock compiler lock poisoned")
            .push(phase);
        match phase {
            BuildPhase::Core => self.core.clone(),
            BuildPhase::System => self.system.clone(),
        }
    }
}
