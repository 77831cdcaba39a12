//! discovery::fs
//!
//! Filesystem-backed repository discovery.
//!
//! # Design
//!
//! The universe is assembled from three sources, in order:
//!
//! 1. Built-in descriptors embedded in the binary (the bootstrap
//!    `platform` repository).
//! 2. `*.json` descriptor files found in the configured search directories,
//!    visited in sorted order for determinism.
//! 3. Extra repository arguments, each resolved as a built-in resource name
//!    first and as a filesystem path second — mirroring resource-then-path
//!    resolution for ad-hoc repositories.

use std::fs;
use std::path::{Path, PathBuf};

use super::{DiscoveryError, RepositoryDiscovery};
use crate::core::repos::{RepositoryDescriptor, RepositorySet};

/// Built-in descriptors compiled into the binary, by resource name.
const BUILTIN_DESCRIPTORS: &[(&str, &str)] =
    &[("platform.json", include_str!("builtin/platform.json"))];

/// Filesystem repository discovery.
#[derive(Debug, Clone, Default)]
pub struct FsDiscovery {
    search_paths: Vec<PathBuf>,
    extra: Vec<String>,
}

impl FsDiscovery {
    /// Create a discovery over descriptor search directories and extra
    /// repository specs.
    pub fn new(search_paths: Vec<PathBuf>, extra: Vec<String>) -> Self {
        Self {
            search_paths,
            extra,
        }
    }

    fn builtin() -> Result<Vec<RepositoryDescriptor>, DiscoveryError> {
        BUILTIN_DESCRIPTORS
            .iter()
            .map(|(name, text)| {
                serde_json::from_str(text).map_err(|e| DiscoveryError::Parse {
                    path: PathBuf::from(name),
                    message: e.to_string(),
                })
            })
            .collect()
    }

    fn from_directory(dir: &Path) -> Result<Vec<RepositoryDescriptor>, DiscoveryError> {
        let entries = fs::read_dir(dir).map_err(|source| DiscoveryError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        paths.iter().map(|path| load_descriptor(path)).collect()
    }

    fn resolve_extra(spec: &str) -> Result<RepositoryDescriptor, DiscoveryError> {
        // First check whether this names a built-in resource.
        if let Some((name, text)) = BUILTIN_DESCRIPTORS.iter().find(|(name, _)| *name == spec) {
            return serde_json::from_str(text).map_err(|e| DiscoveryError::ExtraRepository {
                spec: name.to_string(),
                message: e.to_string(),
            });
        }

        // Otherwise assume it is a file path.
        load_descriptor(Path::new(spec)).map_err(|e| DiscoveryError::ExtraRepository {
            spec: spec.to_string(),
            message: e.to_string(),
        })
    }
}

impl RepositoryDiscovery for FsDiscovery {
    fn discover(&self) -> Result<RepositorySet, DiscoveryError> {
        let mut descriptors = Self::builtin()?;
        for dir in &self.search_paths {
            // Absent search directories contribute nothing.
            if !dir.is_dir() {
                continue;
            }
            descriptors.extend(Self::from_directory(dir)?);
        }
        for spec in &self.extra {
            descriptors.push(Self::resolve_extra(spec)?);
        }
        Ok(RepositorySet::from_descriptors(descriptors)?)
    }
}

fn load_descriptor(path: &Path) -> Result<RepositoryDescriptor, DiscoveryError> {
    let text = fs::read_to_string(path).map_err(|source| DiscoveryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|e| DiscoveryError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
