//! Graphforge - metadata and code generation builds for model repositories
//!
//! Graphforge turns a set of model repository descriptors into distributed
//! binary metadata, generated source code, and compiled class artifacts, in
//! one strictly sequential build run.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to the pipeline)
//! - [`pipeline`] - Orchestrates discovery → initialization → metadata →
//!   generation → compilation
//! - [`core`] - Domain types, repository sets, graph, and configuration
//! - [`discovery`] - Repository descriptor discovery (built-in and filesystem)
//! - [`cache`] - Graph cache hydration
//! - [`model`] - Model compilation into graph elements
//! - [`metadata`] - Binary metadata codec, writer, and reader
//! - [`compiler`] - Class compilation of generated sources
//! - [`report`] - Structured build reporting
//!
//! # Correctness Invariants
//!
//! Graphforge maintains the following invariants:
//!
//! 1. Selection errors surface before any graph work begins
//! 2. Cache failures degrade to a full rebuild, never to an error
//! 3. Serialized metadata is byte-identical for identical inputs
//! 4. A run completes or fails atomically from the caller's view

pub mod cache;
pub mod cli;
pub mod compiler;
pub mod core;
pub mod discovery;
pub mod metadata;
pub mod model;
pub mod pipeline;
pub mod report;
