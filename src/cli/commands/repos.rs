//! repos command - report the discovered repository universe

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::Context;
use crate::core::config::BuildConfig;
use crate::discovery::{FsDiscovery, RepositoryDiscovery};

/// List discovered repositories with their dependencies.
pub fn repos(ctx: &Context, extra_repos: Vec<String>) -> Result<()> {
    let config = BuildConfig::load(&ctx.cwd)?;
    let search_paths: Vec<PathBuf> = config
        .repository_paths
        .unwrap_or_else(|| vec![PathBuf::from("repositories")])
        .into_iter()
        .map(|p| ctx.cwd.join(p))
        .collect();

    let discovery = FsDiscovery::new(search_paths, extra_repos);
    let all = discovery.discover()?;

    println!("Found {} repositories", all.len());
    for descriptor in all.descriptors() {
        if descriptor.dependencies.is_empty() {
            println!("  {}", descriptor.name);
        } else {
            let deps: Vec<String> = descriptor
                .dependencies
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("  {} -> {}", descriptor.name, deps.join(", "));
        }
    }
    Ok(())
}
