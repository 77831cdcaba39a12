//! compiler::mock
//!
//! Mock class compiler for deterministic testing.

use std::sync::{Arc, Mutex};

use super::{
    ClassArtifact, ClassCompiler, CompileDiagnostic, CompileError, CompiledArtifacts,
};
use crate::core::generated::GenerationResult;

/// Mock compiler producing trivial artifacts or a canned failure.
///
/// Clones share state; tests can keep a clone to assert how many times the
/// pipeline invoked compilation.
#[derive(Debug, Clone, Default)]
pub struct MockClassCompiler {
    fail_with: Option<Vec<CompileDiagnostic>>,
    calls: Arc<Mutex<usize>>,
}

impl MockClassCompiler {
    /// A compiler that succeeds with one stub artifact per unit.
    pub fn new() -> Self {
        Self::default()
    }

    /// A compiler that always fails with the given diagnostics.
    pub fn failing(diagnostics: Vec<CompileDiagnostic>) -> Self {
        Self {
            fail_with: Some(diagnostics),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of compile invocations observed.
    pub fn compile_count(&self) -> usize {
        *self.calls.lock().expect("mock compiler lock poisoned")
    }
}

impl ClassCompiler for MockClassCompiler {
    fn compile(&self, result: &GenerationResult) -> Result<CompiledArtifacts, CompileError> {
        *self.calls.lock().expect("mock compiler lock poisoned") += 1;
        if let Some(diagnostics) = &self.fail_with {
            return Err(CompileError::Diagnostics(diagnostics.clone()));
        }

        let artifacts = result
            .groups()
            .flat_map(|(group, units)| {
                units.iter().map(move |unit| ClassArtifact {
                    group: group.to_string(),
                    name: format!("{}.class", unit.name),
                    bytes: vec![0xCA, 0xFE],
                })
            })
            .collect();
        Ok(CompiledArtifacts::new(artifacts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generated::SourceUnit;
    use std::collections::{BTreeMap, BTreeSet};

    fn simple_result() -> GenerationResult {
        GenerationResult::new(
            BTreeMap::from([(
                "repo".to_string(),
                vec![SourceUnit {
                    name: "A.java".to_string(),
                    content: "class A {}".to_string(),
                }],
            )]),
            BTreeSet::new(),
            None,
        )
    }

    #[test]
    fn produces_one_stub_artifact_per_unit() {
        let mock = MockClassCompiler::new();
        let artifacts = mock.compile(&simple_result()).unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(mock.compile_count(), 1);
    }

    #[test]
    fn failing_mock_returns_diagnostics() {
        let mock = MockClassCompiler::failing(vec![CompileDiagnostic {
            group: "repo".to_string(),
            unit: "A.java".to_string(),
            message: "boom".to_string(),
        }]);
        assert!(mock.compile(&simple_result()).is_err());
    }
}
