//! discovery
//!
//! Repository discovery collaborator.
//!
//! # Design
//!
//! The pipeline never scans the filesystem itself; it asks a
//! [`RepositoryDiscovery`] implementation for the full universe of known
//! repositories once at startup. [`FsDiscovery`] is the production
//! implementation (embedded built-in descriptors plus descriptor files on
//! disk); [`MockDiscovery`] serves tests.

pub mod fs;
pub mod mock;

pub use fs::FsDiscovery;
pub use mock::MockDiscovery;

use std::path::PathBuf;

use thiserror::Error;

use crate::core::repos::{RepoSetError, RepositorySet};

/// Errors from repository discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("failed to read repository descriptor '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse repository descriptor '{path}': {message}")]
    Parse { path: PathBuf, message: String },

    /// An extra repository argument resolved neither as a built-in resource
    /// nor as a readable file.
    #[error("error loading extra repository '{spec}': {message}")]
    ExtraRepository { spec: String, message: String },

    /// The discovered descriptors do not form a valid set.
    #[error("invalid repository set: {0}")]
    InvalidSet(#[from] RepoSetError),
}

/// Source of the full repository universe.
pub trait RepositoryDiscovery {
    /// Discover all known repositories.
    ///
    /// Called once at process start; the returned set is immutable for the
    /// rest of the run.
    fn discover(&self) -> Result<RepositorySet, DiscoveryError>;
}
