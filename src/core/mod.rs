//! core
//!
//! Domain types for the build pipeline.
//!
//! # Modules
//!
//! - [`types`] - Validated newtypes and the generation mode
//! - [`repos`] - Repository descriptors, universe, and selection
//! - [`graph`] - The compiled model graph and its init state machine
//! - [`generated`] - The code generation product
//! - [`config`] - Project configuration (`graphforge.toml`)

pub mod config;
pub mod generated;
pub mod graph;
pub mod repos;
pub mod types;

pub use config::{BuildConfig, ConfigError};
pub use generated::{GenerationResult, SourceUnit};
pub use graph::{Element, Graph, InitEvent, InitState};
pub use repos::{
    ElementDecl, RepoSetError, RepositoryDescriptor, RepositorySet, SelectionError, SelectionSet,
};
pub use types::{GenerationMode, RepoName, TypeError};
