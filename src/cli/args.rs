//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--cwd <path>`: Run as if in that directory
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Minimal output

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::core::types::GenerationMode;

/// Graphforge - metadata and code generation builds for model repositories
#[derive(Parser, Debug)]
#[command(name = "gforge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Run as if gforge was started in this directory
    #[arg(long, global = true)]
    pub cwd: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the build pipeline
    #[command(
        long_about = "Run the build pipeline.\n\n\
            Discovers model repositories, initializes the graph from cache or \
            by recompiling from scratch, serializes distributed metadata, \
            generates source code, and compiles it into class artifacts. \
            Defaults come from graphforge.toml when present; flags always win."
    )]
    Build {
        /// Build only these repositories (repeatable; default: all discovered)
        #[arg(long = "repo", value_name = "NAME")]
        repos: Vec<String>,

        /// Exclude repositories from the selection (repeatable)
        #[arg(long = "exclude", value_name = "NAME")]
        excluded: Vec<String>,

        /// Additional repository descriptors, resolved as a built-in resource
        /// first and then as a filesystem path (repeatable)
        #[arg(long = "extra-repo", value_name = "PATH_OR_RESOURCE")]
        extra_repos: Vec<String>,

        /// Generation mode: monolithic or modular
        #[arg(long, value_name = "MODE")]
        mode: Option<GenerationMode>,

        /// Mark generated groups as externally visible
        #[arg(long)]
        add_external_api: bool,

        /// Package for externally visible groups
        #[arg(long, value_name = "PACKAGE")]
        external_api_package: Option<String>,

        /// Do not serialize metadata
        #[arg(long)]
        no_metadata: bool,

        /// Write metadata into the classes directory
        #[arg(long)]
        single_dir: bool,

        /// Do not mirror generated sources to disk
        #[arg(long)]
        no_sources: bool,

        /// Mirror generated sources into the test-sources directory
        #[arg(long)]
        test_sources: bool,

        /// Skip the compilation stage
        #[arg(long)]
        no_compile: bool,

        /// Skip the whole build and exit successfully
        #[arg(long)]
        skip: bool,

        /// Directory for compiled class artifacts
        #[arg(long, value_name = "DIR")]
        classes_dir: Option<PathBuf>,

        /// Directory for metadata and generated sources
        #[arg(long, value_name = "DIR")]
        target_dir: Option<PathBuf>,

        /// Graph cache file
        #[arg(long, value_name = "FILE")]
        cache: Option<PathBuf>,
    },

    /// List discovered repositories and their dependencies
    Repos {
        /// Additional repository descriptors (repeatable)
        #[arg(long = "extra-repo", value_name = "PATH_OR_RESOURCE")]
        extra_repos: Vec<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
