//! compiler
//!
//! In-process class compilation collaborator.
//!
//! # Design
//!
//! The target-language compiler's internals are out of scope; the
//! compilation stage reaches it through the [`ClassCompiler`] trait, handing
//! over the grouped generated source and receiving either class artifacts or
//! structured [`CompileDiagnostic`]s. Diagnostics are always fatal to the
//! pipeline — they are never downgraded to warnings.
//!
//! [`InProcessCompiler`] is the production implementation;
//! [`MockClassCompiler`] serves tests.

pub mod inprocess;
pub mod mock;

pub use inprocess::InProcessCompiler;
pub use mock::MockClassCompiler;

use thiserror::Error;

use crate::core::generated::GenerationResult;

/// One structured compiler diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileDiagnostic {
    /// Group the offending unit belongs to.
    pub group: String,
    /// Offending source unit name.
    pub unit: String,
    /// Diagnostic message.
    pub message: String,
}

impl std::fmt::Display for CompileDiagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}: {}", self.group, self.unit, self.message)
    }
}

/// Errors from class compilation.
#[derive(Debug, Error)]
pub enum CompileError {
    /// The compiler rejected the generated source.
    #[error("compilation failed with {} diagnostic(s): {}", .0.len(),
        .0.first().map(|d| d.to_string()).unwrap_or_default())]
    Diagnostics(Vec<CompileDiagnostic>),
}

/// One compiled class artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassArtifact {
    /// Group the artifact belongs to (mirrors the generation grouping).
    pub group: String,
    /// Artifact file name, e.g. `FirmFactory.class`.
    pub name: String,
    /// Artifact bytes.
    pub bytes: Vec<u8>,
}

/// The product of a successful compilation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledArtifacts {
    artifacts: Vec<ClassArtifact>,
}

impl CompiledArtifacts {
    /// Assemble from a list of artifacts.
    pub fn new(artifacts: Vec<ClassArtifact>) -> Self {
        Self { artifacts }
    }

    /// All artifacts, in compilation order.
    pub fn artifacts(&self) -> &[ClassArtifact] {
        &self.artifacts
    }

    /// Number of artifacts.
    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    /// Whether compilation produced nothing.
    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// Compiles grouped generated source into class artifacts.
pub trait ClassCompiler {
    /// Compile every unit of the generation result.
    ///
    /// # Errors
    ///
    /// Returns `CompileError::Diagnostics` when any unit is rejected; on
    /// error no artifacts are returned at all.
    fn compile(&self, result: &GenerationResult) -> Result<CompiledArtifacts, CompileError>;
}
