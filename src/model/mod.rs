//! model
//!
//! Domain-language compilation collaborator.
//!
//! # Design
//!
//! The domain language's parser and compiler are outside this crate's scope;
//! the pipeline reaches them through the [`ModelCompiler`] trait. A full
//! rebuild runs exactly two phases in fixed order:
//!
//! 1. [`BuildPhase::Core`] - the bootstrap repositories (those with no
//!    dependencies, e.g. `platform`)
//! 2. [`BuildPhase::System`] - every other selected repository
//!
//! There is no partial credit: any phase error fails the whole rebuild.
//!
//! [`DescriptorCompiler`] is the production implementation (compiles the
//! declarations carried by repository descriptors); [`MockModelCompiler`]
//! serves tests.

pub mod descriptor;
pub mod mock;

pub use descriptor::DescriptorCompiler;
pub use mock::MockModelCompiler;

use thiserror::Error;

use crate::core::graph::Element;
use crate::core::repos::{RepositorySet, SelectionSet};
use crate::core::types::RepoName;

/// The two fixed rebuild phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildPhase {
    /// Bootstrap repositories.
    Core,
    /// Everything else.
    System,
}

impl BuildPhase {
    /// Human-readable phase name for step reporting.
    pub fn as_str(self) -> &'static str {
        match self {
            BuildPhase::Core => "core",
            BuildPhase::System => "system",
        }
    }
}

/// Errors from model compilation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    /// A selected repository has no descriptor in the repository set.
    #[error("repository '{0}' is not in the repository set")]
    MissingRepository(RepoName),

    /// Two declarations share one element path.
    #[error("duplicate element path '{0}'")]
    DuplicateElement(String),

    /// The compiler rejected a repository's sources.
    #[error("compilation failure in repository '{repository}': {message}")]
    Compilation {
        repository: RepoName,
        message: String,
    },
}

/// Compiles one rebuild phase of the selected repositories into elements.
pub trait ModelCompiler {
    /// Compile every selected repository belonging to `phase`.
    ///
    /// Elements for repositories outside the phase must not be produced;
    /// the initializer concatenates the two phases' output.
    fn compile(
        &self,
        phase: BuildPhase,
        all: &RepositorySet,
        selection: &SelectionSet,
    ) -> Result<Vec<Element>, ModelError>;
}
