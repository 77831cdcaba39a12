//! build command - run the pipeline end to end

use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

use crate::cache::FileGraphCache;
use crate::cli::Context;
use crate::compiler::InProcessCompiler;
use crate::core::config::BuildConfig;
use crate::core::types::{GenerationMode, RepoName};
use crate::discovery::FsDiscovery;
use crate::model::DescriptorCompiler;
use crate::pipeline::{BuildOptions, ExternalApi, Pipeline};
use crate::report::ConsoleSink;

/// Flags accepted by `gforge build`, before merging with configuration.
#[derive(Debug, Default)]
pub struct BuildRequest {
    pub repos: Vec<String>,
    pub excluded: Vec<String>,
    pub extra_repos: Vec<String>,
    pub mode: Option<GenerationMode>,
    pub add_external_api: bool,
    pub external_api_package: Option<String>,
    pub no_metadata: bool,
    pub single_dir: bool,
    pub no_sources: bool,
    pub test_sources: bool,
    pub no_compile: bool,
    pub skip: bool,
    pub classes_dir: Option<PathBuf>,
    pub target_dir: Option<PathBuf>,
    pub cache: Option<PathBuf>,
}

/// Run the build pipeline.
///
/// Configuration supplies defaults; every flag on the request wins over its
/// configured counterpart. Boolean flags only ever disable (or enable) their
/// stage, matching how they read on the command line.
pub fn build(ctx: &Context, request: BuildRequest) -> Result<()> {
    let config = BuildConfig::load(&ctx.cwd)?;
    let options = resolve_options(ctx, &request, &config)?;

    let search_paths: Vec<PathBuf> = config
        .repository_paths
        .clone()
        .unwrap_or_else(|| vec![PathBuf::from("repositories")])
        .into_iter()
        .map(|p| ctx.cwd.join(p))
        .collect();
    let discovery = FsDiscovery::new(search_paths, request.extra_repos.clone());

    let cache_path = request
        .cache
        .clone()
        .or(config.cache.clone())
        .unwrap_or_else(|| options.target_dir.join("graph-cache.json"));
    let cache = FileGraphCache::new(cache_path);

    let model_compiler = DescriptorCompiler::new();
    let class_compiler = InProcessCompiler::new();
    let report = ConsoleSink::new(ctx.verbosity());

    let pipeline = Pipeline {
        discovery: &discovery,
        cache: &cache,
        model_compiler: &model_compiler,
        class_compiler: &class_compiler,
        report: &report,
    };
    pipeline.run(&options)?;
    Ok(())
}

fn resolve_options(
    ctx: &Context,
    request: &BuildRequest,
    config: &BuildConfig,
) -> Result<BuildOptions> {
    let generation = config.generation();

    let requested = parse_names(&request.repos)?;
    let excluded = parse_names(&request.excluded)?;

    let mode = request
        .mode
        .or(config.mode)
        .unwrap_or(GenerationMode::Modular);

    let classes_dir = ctx.cwd.join(
        request
            .classes_dir
            .clone()
            .or(config.classes_dir.clone())
            .unwrap_or_else(|| PathBuf::from("build/classes")),
    );
    let target_dir = ctx.cwd.join(
        request
            .target_dir
            .clone()
            .or(config.target_dir.clone())
            .unwrap_or_else(|| PathBuf::from("target")),
    );

    let external = ExternalApi {
        enabled: request.add_external_api
            || generation.add_external_api.unwrap_or(false),
        package: request
            .external_api_package
            .clone()
            .or(generation.external_api_package.clone()),
    };

    Ok(BuildOptions {
        requested,
        excluded,
        mode,
        external,
        generate_metadata: !request.no_metadata && generation.metadata.unwrap_or(true),
        use_single_dir: request.single_dir || generation.single_dir.unwrap_or(false),
        generate_sources: !request.no_sources && generation.sources.unwrap_or(true),
        generate_test: request.test_sources || generation.test_sources.unwrap_or(false),
        skip_compilation: request.no_compile || !generation.compile.unwrap_or(true),
        skip: request.skip,
        classes_dir,
        target_dir,
    })
}

fn parse_names(names: &[String]) -> Result<BTreeSet<RepoName>> {
    names
        .iter()
        .map(|name| {
            RepoName::new(name).with_context(|| format!("invalid repository name '{}'", name))
        })
        .collect()
}
