//! cache::file
//!
//! File-backed graph cache.
//!
//! # Storage
//!
//! - `<path>`: the cached graph as JSON
//! - `<path>.sha256`: hex SHA-256 digest of the JSON bytes
//!
//! A missing file, a digest mismatch, unparsable JSON, or a graph covering a
//! different selection all degrade hydration; none of them fail the run.

use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::{CacheState, GraphCache, Hydration};
use crate::core::graph::Graph;
use crate::core::repos::SelectionSet;

/// File-backed cache at a fixed path.
#[derive(Debug, Clone)]
pub struct FileGraphCache {
    path: PathBuf,
}

impl FileGraphCache {
    /// Create a cache handle for a path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The cache file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn digest_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        name.push_str(".sha256");
        self.path.with_file_name(name)
    }

    /// Write a graph (and its digest sidecar) to the cache path.
    ///
    /// The build pipeline itself never calls this: its cache handle is
    /// read-only. Cache producers and tests use it.
    pub fn store(&self, graph: &Graph) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(graph).map_err(std::io::Error::other)?;
        fs::write(&self.path, &json)?;
        fs::write(self.digest_path(), hex_digest(&json))?;
        Ok(())
    }
}

impl GraphCache for FileGraphCache {
    fn hydrate(&self, selection: &SelectionSet) -> Hydration {
        if !self.path.exists() {
            return Hydration::Degraded(CacheState::absent());
        }

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) => {
                return Hydration::Degraded(CacheState::failure(format!(
                    "failed to read cache '{}': {}",
                    self.path.display(),
                    e
                )))
            }
        };

        match fs::read_to_string(self.digest_path()) {
            Ok(expected) => {
                let actual = hex_digest(&bytes);
                if expected.trim() != actual {
                    return Hydration::Degraded(CacheState::failure(format!(
                        "cache digest mismatch for '{}': expected {}, found {}",
                        self.path.display(),
                        expected.trim(),
                        actual
                    )));
                }
            }
            Err(e) => {
                return Hydration::Degraded(CacheState::failure(format!(
                    "failed to read cache digest for '{}': {}",
                    self.path.display(),
                    e
                )))
            }
        }

        let graph: Graph = match serde_json::from_slice(&bytes) {
            Ok(graph) => graph,
            Err(e) => {
                return Hydration::Degraded(CacheState::failure(format!(
                    "failed to parse cache '{}': {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if !graph.covers(selection) {
            return Hydration::Degraded(CacheState::failure(format!(
                "cache '{}' covers a different repository selection",
                self.path.display()
            )));
        }

        Hydration::Ready(graph)
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
