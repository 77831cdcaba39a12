//! metadata::reader
//!
//! Loads one distributed metadata unit back into memory.
//!
//! # Design
//!
//! A unit carries its own string pools, so any unit can be loaded with no
//! sibling units present — this is what "independently loadable" means for
//! modular metadata. The reader applies the pool decoder the field calls
//! for (classifier slots decode negative ids, everything else positive ids);
//! a wrong-signed id surfaces as a [`CodecError`] rather than a silent
//! misread.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::graph::Element;
use crate::core::types::{RepoName, TypeError};
use crate::metadata::codec::{self, CodecError};
use crate::metadata::writer::{FORMAT_VERSION, GRAPH_FILE, GRAPH_MAGIC, INDEX_FILE, INDEX_MAGIC};

/// Errors from reading metadata.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read metadata file '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("bad magic in metadata file '{path}'")]
    BadMagic { path: PathBuf },

    #[error("unsupported metadata format version {0}")]
    UnsupportedVersion(u16),

    #[error("truncated metadata file '{path}'")]
    Truncated { path: PathBuf },

    #[error("invalid UTF-8 in metadata file '{path}'")]
    Utf8 { path: PathBuf },

    #[error("string reference decode failed: {0}")]
    Codec(#[from] CodecError),

    #[error("string index {index} out of range for {pool} pool of size {len}")]
    BadIndex {
        index: i32,
        pool: &'static str,
        len: usize,
    },

    #[error("invalid repository name in metadata: {0}")]
    InvalidRepoName(#[from] TypeError),
}

/// One loaded metadata unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataUnit {
    /// The classifier-id pool, in index order.
    pub classifiers: Vec<String>,
    /// The general string pool, in index order.
    pub strings: Vec<String>,
    /// The unit's elements with all references resolved.
    pub elements: Vec<Element>,
}

/// Load the unit stored in `unit_dir`.
///
/// # Errors
///
/// Returns `ReadError` for I/O failures, malformed files, and unresolvable
/// string references.
pub fn read_unit(unit_dir: &Path) -> Result<MetadataUnit, ReadError> {
    let index_path = unit_dir.join(INDEX_FILE);
    let graph_path = unit_dir.join(GRAPH_FILE);

    let (classifiers, strings) = read_index(&index_path)?;
    let elements = read_graph(&graph_path, &classifiers, &strings)?;

    Ok(MetadataUnit {
        classifiers,
        strings,
        elements,
    })
}

fn read_index(path: &Path) -> Result<(Vec<String>, Vec<String>), ReadError> {
    let bytes = fs::read(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut cursor = Cursor::new(&bytes, path);

    if cursor.take(4)? != INDEX_MAGIC {
        return Err(ReadError::BadMagic {
            path: path.to_path_buf(),
        });
    }
    let version = cursor.read_u16()?;
    if version != FORMAT_VERSION {
        return Err(ReadError::UnsupportedVersion(version));
    }

    let classifiers = cursor.read_pool()?;
    let strings = cursor.read_pool()?;
    Ok((classifiers, strings))
}

fn read_graph(
    path: &Path,
    classifiers: &[String],
    strings: &[String],
) -> Result<Vec<Element>, ReadError> {
    let bytes = fs::read(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut cursor = Cursor::new(&bytes, path);

    if cursor.take(4)? != GRAPH_MAGIC {
        return Err(ReadError::BadMagic {
            path: path.to_path_buf(),
        });
    }
    let version = cursor.read_u16()?;
    if version != FORMAT_VERSION {
        return Err(ReadError::UnsupportedVersion(version));
    }

    let count = cursor.read_u32()? as usize;
    let mut elements = Vec::with_capacity(count);
    for _ in 0..count {
        let classifier = resolve_classifier(cursor.read_i32()?, classifiers)?;
        let element_path = resolve_string(cursor.read_i32()?, strings)?;
        let repository = RepoName::new(resolve_string(cursor.read_i32()?, strings)?)?;

        let property_count = cursor.read_u32()? as usize;
        let mut properties = BTreeMap::new();
        for _ in 0..property_count {
            let key = resolve_string(cursor.read_i32()?, strings)?;
            let value = resolve_string(cursor.read_i32()?, strings)?;
            properties.insert(key, value);
        }

        elements.push(Element {
            path: element_path,
            classifier,
            repository,
            properties,
        });
    }

    Ok(elements)
}

fn resolve_classifier(id: i32, pool: &[String]) -> Result<String, ReadError> {
    let index = codec::classifier_id_to_index(id)?;
    pool.get(index as usize)
        .cloned()
        .ok_or(ReadError::BadIndex {
            index,
            pool: "classifier",
            len: pool.len(),
        })
}

fn resolve_string(id: i32, pool: &[String]) -> Result<String, ReadError> {
    let index = codec::string_id_to_index(id)?;
    pool.get(index as usize)
        .cloned()
        .ok_or(ReadError::BadIndex {
            index,
            pool: "general",
            len: pool.len(),
        })
}

/// Bounds-checked reader over a byte slice.
struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
    path: &'a Path,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8], path: &'a Path) -> Self {
        Self {
            bytes,
            offset: 0,
            path,
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], ReadError> {
        let end = self.offset.checked_add(n).filter(|end| *end <= self.bytes.len());
        match end {
            Some(end) => {
                let slice = &self.bytes[self.offset..end];
                self.offset = end;
                Ok(slice)
            }
            None => Err(ReadError::Truncated {
                path: self.path.to_path_buf(),
            }),
        }
    }

    fn read_u16(&mut self) -> Result<u16, ReadError> {
        let bytes = self.take(2)?;
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, ReadError> {
        let bytes = self.take(4)?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_i32(&mut self) -> Result<i32, ReadError> {
        let bytes = self.take(4)?;
        Ok(i32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_string(&mut self) -> Result<String, ReadError> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| ReadError::Utf8 {
            path: self.path.to_path_buf(),
        })
    }

    fn read_pool(&mut self) -> Result<Vec<String>, ReadError> {
        let len = self.read_u32()? as usize;
        let mut pool = Vec::with_capacity(len);
        for _ in 0..len {
            pool.push(self.read_string()?);
        }
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::Graph;
    use crate::metadata::writer::MetadataWriter;

    fn element(path: &str, classifier: &str, repo: &str) -> Element {
        Element {
            path: path.to_string(),
            classifier: classifier.to_string(),
            repository: RepoName::new(repo).unwrap(),
            properties: BTreeMap::from([("doc".to_string(), "documentation".to_string())]),
        }
    }

    #[test]
    fn reads_back_what_the_writer_wrote() {
        let dir = tempfile::tempdir().unwrap();
        let graph = Graph::new(
            vec![RepoName::new("repo").unwrap()],
            vec![
                element("a::A", "meta::Class", "repo"),
                element("b::B", "meta::Enum", "repo"),
            ],
        );
        MetadataWriter::new(&graph).write_full(dir.path()).unwrap();

        let unit = read_unit(dir.path()).unwrap();
        assert_eq!(unit.elements, graph.elements());
        assert_eq!(unit.classifiers, vec!["meta::Class", "meta::Enum"]);
    }

    #[test]
    fn modular_unit_loads_without_siblings() {
        let dir = tempfile::tempdir().unwrap();
        let graph = Graph::new(
            vec![RepoName::new("one").unwrap(), RepoName::new("two").unwrap()],
            vec![
                element("a::A", "meta::Class", "one"),
                element("b::B", "meta::Class", "two"),
            ],
        );
        let writer = MetadataWriter::new(&graph);
        writer
            .write_repository(&RepoName::new("one").unwrap(), dir.path())
            .unwrap();

        // Only "one" was written; it must load on its own.
        let unit = read_unit(&dir.path().join("one")).unwrap();
        assert_eq!(unit.elements.len(), 1);
        assert_eq!(unit.elements[0].path, "a::A");
    }

    #[test]
    fn rejects_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(INDEX_FILE), b"XXXX\x00\x01").unwrap();
        fs::write(dir.path().join(GRAPH_FILE), b"").unwrap();

        let err = read_unit(dir.path()).unwrap_err();
        assert!(matches!(err, ReadError::BadMagic { .. }));
    }

    #[test]
    fn rejects_truncated_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(INDEX_FILE), &INDEX_MAGIC[..2]).unwrap();
        fs::write(dir.path().join(GRAPH_FILE), b"").unwrap();

        let err = read_unit(dir.path()).unwrap_err();
        assert!(matches!(err, ReadError::Truncated { .. }));
    }

    #[test]
    fn missing_unit_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_unit(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, ReadError::Io { .. }));
    }
}
