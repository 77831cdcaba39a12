//! pipeline
//!
//! The build pipeline: a strictly sequential run of
//! discovery → selection → initialization → metadata → generation →
//! compilation, with every stage bracketed by timed report events.
//!
//! # Architecture
//!
//! The orchestrator owns no policy of its own; each stage lives in its own
//! submodule and every effectful collaborator (discovery, cache, model
//! compiler, class compiler, report sink) enters through a trait object, so
//! the whole run is testable with in-memory doubles.
//!
//! A run either completes or fails atomically from the caller's view: the
//! first stage error is logged with its elapsed time and re-raised as a
//! single [`PipelineError`].

pub mod compile;
pub mod generate;
pub mod init;
pub mod metadata;

use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use thiserror::Error;
use uuid::Uuid;

use crate::cache::GraphCache;
use crate::compiler::{ClassCompiler, CompileError};
use crate::core::repos::{SelectionError, SelectionSet};
use crate::core::types::{GenerationMode, RepoName};
use crate::discovery::{DiscoveryError, RepositoryDiscovery};
use crate::metadata::WriteError;
use crate::model::{ModelCompiler, ModelError};
use crate::report::{ReportSink, StepEvent};

pub use compile::CompileStageError;
pub use generate::{ExternalApi, GenerateError, MONOLITHIC_GROUP};

/// Everything a single build run needs to know.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Requested repositories; empty means all discovered.
    pub requested: BTreeSet<RepoName>,
    /// Repositories removed from the selection after the request resolves.
    pub excluded: BTreeSet<RepoName>,
    pub mode: GenerationMode,
    pub external: ExternalApi,
    pub generate_metadata: bool,
    pub use_single_dir: bool,
    pub generate_sources: bool,
    pub generate_test: bool,
    pub skip_compilation: bool,
    /// Skip the whole build, reporting success.
    pub skip: bool,
    pub classes_dir: PathBuf,
    pub target_dir: PathBuf,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            requested: BTreeSet::new(),
            excluded: BTreeSet::new(),
            mode: GenerationMode::Modular,
            external: ExternalApi::default(),
            generate_metadata: true,
            use_single_dir: false,
            generate_sources: true,
            generate_test: false,
            skip_compilation: false,
            skip: false,
            classes_dir: PathBuf::from("build/classes"),
            target_dir: PathBuf::from("target"),
        }
    }
}

/// Resolved output directories for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    /// Where metadata units go; `None` when metadata is disabled.
    pub metadata_dir: Option<PathBuf>,
    /// Where generated sources are mirrored; `None` disables the mirror.
    pub sources_dir: Option<PathBuf>,
    pub classes_dir: PathBuf,
}

impl OutputLayout {
    pub fn resolve(options: &BuildOptions) -> Self {
        let metadata_dir = if options.generate_metadata {
            Some(if options.use_single_dir {
                options.classes_dir.clone()
            } else {
                options.target_dir.join("metadata-distributed")
            })
        } else {
            None
        };
        let sources_dir = if options.generate_sources {
            Some(options.target_dir.join(if options.generate_test {
                "generated-test-sources"
            } else {
                "generated-sources"
            }))
        } else {
            None
        };
        Self {
            metadata_dir,
            sources_dir,
            classes_dir: options.classes_dir.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("unknown repositories: {}", .0.join(", "))]
    UnknownRepositories(Vec<String>),
    #[error("repository discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),
    #[error("graph rebuild failed: {0}")]
    Rebuild(#[from] ModelError),
    #[error("metadata serialization failed: {0}")]
    Metadata(#[from] WriteError),
    #[error("code generation failed: {0}")]
    SourceWrite(#[from] GenerateError),
    #[error("compilation failed: {0}")]
    Compile(#[from] CompileError),
    #[error("failed to write class artifact '{path}': {source}")]
    ClassWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<SelectionError> for PipelineError {
    fn from(err: SelectionError) -> Self {
        match err {
            SelectionError::UnknownRepositories(names) => {
                PipelineError::UnknownRepositories(names)
            }
        }
    }
}

impl From<CompileStageError> for PipelineError {
    fn from(err: CompileStageError) -> Self {
        match err {
            CompileStageError::Compile(e) => PipelineError::Compile(e),
            CompileStageError::Io { path, source } => {
                PipelineError::ClassWrite { path, source }
            }
        }
    }
}

/// How a run ended.
#[derive(Debug)]
pub enum BuildOutcome {
    /// `skip` was set; nothing ran.
    Skipped,
    Completed(BuildSummary),
}

/// Figures for a completed run.
#[derive(Debug)]
pub struct BuildSummary {
    pub run_id: Uuid,
    pub repositories: usize,
    pub elements: usize,
    pub generated_groups: usize,
    pub artifacts_written: usize,
}

/// The pipeline with its effectful collaborators injected.
pub struct Pipeline<'a> {
    pub discovery: &'a dyn RepositoryDiscovery,
    pub cache: &'a dyn GraphCache,
    pub model_compiler: &'a dyn ModelCompiler,
    pub class_compiler: &'a dyn ClassCompiler,
    pub report: &'a dyn ReportSink,
}

impl Pipeline<'_> {
    /// Run the build end to end.
    ///
    /// # Errors
    ///
    /// The first stage failure aborts the run; it is reported with its
    /// elapsed time and returned as a single wrapped error.
    pub fn run(&self, options: &BuildOptions) -> Result<BuildOutcome, PipelineError> {
        if options.skip {
            self.report
                .emit(StepEvent::info("Skipping build (skip switch set)"));
            return Ok(BuildOutcome::Skipped);
        }

        let run_id = Uuid::new_v4();
        let total = Instant::now();
        self.report
            .emit(StepEvent::info(format!("Starting build {}", run_id)));

        match self.execute(options, run_id) {
            Ok(summary) => {
                self.report.emit(
                    StepEvent::info(format!("Finished build {}", run_id))
                        .with_elapsed(total.elapsed()),
                );
                Ok(BuildOutcome::Completed(summary))
            }
            Err(error) => {
                self.report.emit(
                    StepEvent::error_with("Build failed", &error)
                        .with_elapsed(total.elapsed()),
                );
                Err(error)
            }
        }
    }

    fn execute(
        &self,
        options: &BuildOptions,
        run_id: Uuid,
    ) -> Result<BuildSummary, PipelineError> {
        let step = "repository discovery";
        let started = self.begin(step);
        let all = self.discovery.discover()?;
        self.finish(step, started);

        // Selection errors surface before any initialization event.
        let selection =
            SelectionSet::select(&all, &options.requested, &options.excluded)?;
        let layout = OutputLayout::resolve(options);
        self.preamble(options, &selection, &layout, &all);

        let step = "graph initialization";
        let started = self.begin(step);
        let graph = init::initialize(
            &all,
            &selection,
            self.cache,
            self.model_compiler,
            self.report,
        )?;
        self.finish(step, started);

        if let Some(metadata_dir) = &layout.metadata_dir {
            let step = "metadata serialization";
            let started = self.begin(step);
            metadata::serialize(&graph, &selection, options.mode, metadata_dir, self.report)?;
            self.finish(step, started);
        }

        let step = "code generation";
        let started = self.begin(step);
        let generated = generate::generate(
            &graph,
            &selection,
            options.mode,
            &options.external,
            layout.sources_dir.as_deref(),
            self.report,
        )?;
        self.finish(step, started);

        let artifacts_written = if options.skip_compilation {
            self.report
                .emit(StepEvent::info("Skipping compilation (disabled)"));
            0
        } else {
            let step = "compilation";
            let started = self.begin(step);
            let written = compile::compile(
                &generated,
                self.class_compiler,
                &layout.classes_dir,
                self.report,
            )?;
            self.finish(step, started);
            written
        };

        Ok(BuildSummary {
            run_id,
            repositories: selection.len(),
            elements: graph.len(),
            generated_groups: generated.group_count(),
            artifacts_written,
        })
    }

    /// Startup report: the resolved request, layout, and discovered universe.
    fn preamble(
        &self,
        options: &BuildOptions,
        selection: &SelectionSet,
        layout: &OutputLayout,
        all: &crate::core::repos::RepositorySet,
    ) {
        let names: Vec<String> = all.names().map(ToString::to_string).collect();
        self.report.emit(StepEvent::info(format!(
            "Found {} repositories: {}",
            names.len(),
            names.join(", ")
        )));
        let selected: Vec<String> = selection.names().map(ToString::to_string).collect();
        self.report.emit(StepEvent::info(format!(
            "Building {} mode for: {}",
            options.mode,
            selected.join(", ")
        )));
        if !options.excluded.is_empty() {
            let excluded: Vec<String> =
                options.excluded.iter().map(ToString::to_string).collect();
            self.report
                .emit(StepEvent::info(format!("Excluded: {}", excluded.join(", "))));
        }
        if options.external.enabled {
            self.report.emit(StepEvent::info(format!(
                "External API package: {}",
                options.external.package.as_deref().unwrap_or("(default)")
            )));
        }
        if let Some(dir) = &layout.metadata_dir {
            self.report
                .emit(StepEvent::info(format!("Metadata directory: {}", dir.display())));
        }
        if let Some(dir) = &layout.sources_dir {
            self.report
                .emit(StepEvent::info(format!("Sources directory: {}", dir.display())));
        }
        self.report.emit(StepEvent::info(format!(
            "Classes directory: {}",
            layout.classes_dir.display()
        )));
    }

    fn begin(&self, step: &str) -> Instant {
        self.report.emit(StepEvent::info(format!("Beginning {}", step)));
        Instant::now()
    }

    fn finish(&self, step: &str, started: Instant) {
        self.report.emit(
            StepEvent::info(format!("Finished {}", step)).with_elapsed(started.elapsed()),
        );
    }
}
