//! metadata::writer
//!
//! Distributed binary metadata serialization.
//!
//! # Format
//!
//! Each output unit is a directory holding two files:
//!
//! - `index.bin`: magic, format version, the classifier-id string pool, then
//!   the general string pool. Pools are sorted, so identical graphs always
//!   produce identical pools.
//! - `graph.bin`: magic, format version, element count, then per element the
//!   classifier, path, repository, and property references.
//!
//! All integers are big-endian. Strings are u32 length-prefixed UTF-8.
//! String references are sign-encoded i32 ids from [`crate::metadata::codec`]:
//! negative ids address the classifier pool, positive ids the general pool,
//! and 0 never appears.
//!
//! # Units
//!
//! - Monolithic: one unit for the whole graph, written at the metadata
//!   directory root.
//! - Modular: one unit per repository under `<dir>/<repo>/`, each with its
//!   own pools so it is independently loadable.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::graph::{Element, Graph};
use crate::core::types::RepoName;
use crate::metadata::codec;

/// Magic bytes for the index file.
pub const INDEX_MAGIC: [u8; 4] = *b"GFIX";
/// Magic bytes for the graph file.
pub const GRAPH_MAGIC: [u8; 4] = *b"GFGR";
/// Current format version.
pub const FORMAT_VERSION: u16 = 1;

/// Index file name within a unit.
pub const INDEX_FILE: &str = "index.bin";
/// Graph file name within a unit.
pub const GRAPH_FILE: &str = "graph.bin";

/// Errors from writing metadata.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to create metadata directory '{path}': {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write metadata file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A reference to a string the pools do not contain. Indicates a bug in
    /// pool construction, never bad user input.
    #[error("string '{0}' missing from pool")]
    UnpooledString(String),

    /// More strings than the signed 32-bit id space can address.
    #[error("string pool too large: {0} entries")]
    PoolOverflow(usize),

    /// More elements or properties than the u32 count field can hold.
    #[error("count too large for metadata format: {0}")]
    CountOverflow(usize),
}

/// The two string pools of one metadata unit.
///
/// Built from the unit's elements; sorted and deduplicated so pool layout is
/// a pure function of the element set.
#[derive(Debug, Clone)]
pub struct StringPools {
    classifiers: Vec<String>,
    strings: Vec<String>,
    classifier_ids: BTreeMap<String, i32>,
    string_ids: BTreeMap<String, i32>,
}

impl StringPools {
    /// Build pools for a set of elements.
    ///
    /// The classifier pool holds the distinct classifier ids. The general
    /// pool holds every other referenced string: element paths, repository
    /// names, and property keys and values.
    ///
    /// # Errors
    ///
    /// Returns `WriteError::PoolOverflow` if either pool exceeds the i32
    /// index space.
    pub fn from_elements<'a>(
        elements: impl IntoIterator<Item = &'a Element>,
    ) -> Result<Self, WriteError> {
        let mut classifiers: Vec<String> = Vec::new();
        let mut strings: Vec<String> = Vec::new();

        for element in elements {
            classifiers.push(element.classifier.clone());
            strings.push(element.path.clone());
            strings.push(element.repository.to_string());
            for (key, value) in &element.properties {
                strings.push(key.clone());
                strings.push(value.clone());
            }
        }

        classifiers.sort_unstable();
        classifiers.dedup();
        strings.sort_unstable();
        strings.dedup();

        let classifier_ids = Self::index_pool(&classifiers, codec::classifier_index_to_id)?;
        let string_ids = Self::index_pool(&strings, codec::string_index_to_id)?;

        Ok(Self {
            classifiers,
            strings,
            classifier_ids,
            string_ids,
        })
    }

    fn index_pool(
        pool: &[String],
        encode: fn(i32) -> i32,
    ) -> Result<BTreeMap<String, i32>, WriteError> {
        if pool.len() >= i32::MAX as usize {
            return Err(WriteError::PoolOverflow(pool.len()));
        }
        Ok(pool
            .iter()
            .enumerate()
            .map(|(index, s)| (s.clone(), encode(index as i32)))
            .collect())
    }

    /// The classifier pool, in index order.
    pub fn classifiers(&self) -> &[String] {
        &self.classifiers
    }

    /// The general pool, in index order.
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Sign-encoded id for a classifier string. Always negative.
    pub fn classifier_ref(&self, classifier: &str) -> Result<i32, WriteError> {
        self.classifier_ids
            .get(classifier)
            .copied()
            .ok_or_else(|| WriteError::UnpooledString(classifier.to_string()))
    }

    /// Sign-encoded id for a general string. Always positive.
    pub fn string_ref(&self, string: &str) -> Result<i32, WriteError> {
        self.string_ids
            .get(string)
            .copied()
            .ok_or_else(|| WriteError::UnpooledString(string.to_string()))
    }
}

/// Writes distributed binary metadata for a Ready graph.
pub struct MetadataWriter<'a> {
    graph: &'a Graph,
}

impl<'a> MetadataWriter<'a> {
    /// Create a writer over a graph.
    pub fn new(graph: &'a Graph) -> Self {
        Self { graph }
    }

    /// Write the whole graph as one unit at the metadata directory root.
    pub fn write_full(&self, directory: &Path) -> Result<(), WriteError> {
        let elements: Vec<&Element> = self.graph.elements().iter().collect();
        write_unit(&elements, directory)
    }

    /// Write one repository's elements as an independently loadable unit
    /// under `<directory>/<repository>/`.
    pub fn write_repository(
        &self,
        repository: &RepoName,
        directory: &Path,
    ) -> Result<(), WriteError> {
        let elements: Vec<&Element> = self.graph.elements_for(repository).collect();
        write_unit(&elements, &directory.join(repository.as_str()))
    }
}

fn write_unit(elements: &[&Element], unit_dir: &Path) -> Result<(), WriteError> {
    fs::create_dir_all(unit_dir).map_err(|source| WriteError::CreateDir {
        path: unit_dir.to_path_buf(),
        source,
    })?;

    let pools = StringPools::from_elements(elements.iter().copied())?;
    write_index(&pools, &unit_dir.join(INDEX_FILE))?;
    write_graph(elements, &pools, &unit_dir.join(GRAPH_FILE))?;
    Ok(())
}

fn write_index(pools: &StringPools, path: &Path) -> Result<(), WriteError> {
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);

    out.write_all(&INDEX_MAGIC).map_err(io_err)?;
    out.write_all(&FORMAT_VERSION.to_be_bytes()).map_err(io_err)?;
    write_pool(&mut out, pools.classifiers()).map_err(io_err)?;
    write_pool(&mut out, pools.strings()).map_err(io_err)?;
    out.flush().map_err(io_err)
}

fn write_graph(
    elements: &[&Element],
    pools: &StringPools,
    path: &Path,
) -> Result<(), WriteError> {
    let io_err = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);

    out.write_all(&GRAPH_MAGIC).map_err(io_err)?;
    out.write_all(&FORMAT_VERSION.to_be_bytes()).map_err(io_err)?;
    out.write_all(&count(elements.len())?.to_be_bytes())
        .map_err(io_err)?;

    for element in elements {
        let classifier = pools.classifier_ref(&element.classifier)?;
        let element_path = pools.string_ref(&element.path)?;
        let repository = pools.string_ref(element.repository.as_str())?;

        out.write_all(&classifier.to_be_bytes()).map_err(io_err)?;
        out.write_all(&element_path.to_be_bytes()).map_err(io_err)?;
        out.write_all(&repository.to_be_bytes()).map_err(io_err)?;
        out.write_all(&count(element.properties.len())?.to_be_bytes())
            .map_err(io_err)?;
        for (key, value) in &element.properties {
            out.write_all(&pools.string_ref(key)?.to_be_bytes())
                .map_err(io_err)?;
            out.write_all(&pools.string_ref(value)?.to_be_bytes())
                .map_err(io_err)?;
        }
    }

    out.flush().map_err(io_err)
}

fn count(len: usize) -> Result<u32, WriteError> {
    u32::try_from(len).map_err(|_| WriteError::CountOverflow(len))
}

fn write_pool(out: &mut impl Write, pool: &[String]) -> std::io::Result<()> {
    out.write_all(&(pool.len() as u32).to_be_bytes())?;
    for s in pool {
        write_string(out, s)?;
    }
    Ok(())
}

fn write_string(out: &mut impl Write, s: &str) -> std::io::Result<()> {
    out.write_all(&(s.len() as u32).to_be_bytes())?;
    out.write_all(s.as_bytes())
}
