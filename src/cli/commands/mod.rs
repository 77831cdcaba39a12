//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Merges configuration defaults with flags
//! 3. Calls the pipeline (or discovery) to execute
//!
//! Handlers do NOT reach around the pipeline's collaborator traits.

mod build;
mod completion;
mod repos;

pub use build::{build, BuildRequest};
pub use completion::completion;
pub use repos::repos;

use anyhow::Result;

use crate::cli::args::Command;
use crate::cli::Context;

/// Dispatch a parsed command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Build {
            repos,
            excluded,
            extra_repos,
            mode,
            add_external_api,
            external_api_package,
            no_metadata,
            single_dir,
            no_sources,
            test_sources,
            no_compile,
            skip,
            classes_dir,
            target_dir,
            cache,
        } => build(
            ctx,
            BuildRequest {
                repos,
                excluded,
                extra_repos,
                mode,
                add_external_api,
                external_api_package,
                no_metadata,
                single_dir,
                no_sources,
                test_sources,
                no_compile,
                skip,
                classes_dir,
                target_dir,
                cache,
            },
        ),
        Command::Repos { extra_repos } => repos(ctx, extra_repos),
        Command::Completions { shell } => completion(shell),
    }
}
