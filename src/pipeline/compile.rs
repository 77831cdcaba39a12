//! pipeline::compile
//!
//! Class compilation stage: feed every generated group to the class
//! compiler and persist the resulting artifacts under the classes
//! directory, one subdirectory per group.
//!
//! The stage is skippable upstream; when it runs, any diagnostic is fatal.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::compiler::{ClassCompiler, CompileError};
use crate::core::generated::GenerationResult;
use crate::report::{ReportSink, StepEvent};

#[derive(Debug, Error)]
pub enum CompileStageError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("failed to write class artifact '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Compile generated sources and write class artifacts to `classes_dir`.
///
/// Returns the number of artifacts written.
///
/// # Errors
///
/// Compiler diagnostics and artifact write failures both abort the stage.
pub fn compile(
    generated: &GenerationResult,
    compiler: &dyn ClassCompiler,
    classes_dir: &Path,
    report: &dyn ReportSink,
) -> Result<usize, CompileStageError> {
    report.emit(StepEvent::info(format!(
        "    Compiling {} source units in {} groups",
        generated.unit_count(),
        generated.group_count()
    )));

    let compiled = compiler.compile(generated)?;
    for artifact in compiled.artifacts() {
        let group_dir = classes_dir.join(&artifact.group);
        fs::create_dir_all(&group_dir).map_err(|source| CompileStageError::Io {
            path: group_dir.clone(),
            source,
        })?;
        let path = group_dir.join(&artifact.name);
        fs::write(&path, &artifact.bytes)
            .map_err(|source| CompileStageError::Io { path: path.clone(), source })?;
    }
    Ok(compiled.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompileDiagnostic, InProcessCompiler, MockClassCompiler};
    use crate::core::generated::SourceUnit;
    use crate::report::MemorySink;
    use std::collections::{BTreeMap, BTreeSet};

    fn generated() -> GenerationResult {
        let mut groups = BTreeMap::new();
        groups.insert(
            "platform".to_string(),
            vec![SourceUnit {
                name: "PlatformRegistry.java".to_string(),
                content: "public final class PlatformRegistry {}\n".to_string(),
            }],
        );
        GenerationResult::new(groups, BTreeSet::new(), None)
    }

    #[test]
    fn writes_artifacts_under_group_directories() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = InProcessCompiler::new();
        let written = compile(&generated(), &compiler, dir.path(), &MemorySink::new()).unwrap();

        assert_eq!(written, 1);
        let path = dir.path().join("platform").join("PlatformRegistry.class");
        assert!(path.exists());
    }

    #[test]
    fn compiler_diagnostics_abort_the_stage() {
        let dir = tempfile::tempdir().unwrap();
        let compiler = MockClassCompiler::failing(vec![CompileDiagnostic {
            group: "platform".to_string(),
            unit: "PlatformRegistry.java".to_string(),
            message: "bad token".to_string(),
        }]);

        let err = compile(&generated(), &compiler, dir.path(), &MemorySink::new()).unwrap_err();
        assert!(matches!(err, CompileStageError::Compile(_)));
        assert!(!dir.path().join("platform").exists(), "nothing written on failure");
    }

    #[test]
    fn reports_unit_and_group_counts() {
        let dir = tempfile::tempdir().unwrap();
        let report = MemorySink::new();
        compile(&generated(), &MockClassCompiler::new(), dir.path(), &report).unwrap();

        assert!(report.contains("Compiling 1 source units in 1 groups"));
    }
}
