//! pipeline::metadata
//!
//! Metadata serialization stage: dispatch on the generation mode and write
//! binary metadata units through [`MetadataWriter`].

use std::path::Path;

use crate::core::graph::Graph;
use crate::core::repos::SelectionSet;
use crate::core::types::GenerationMode;
use crate::metadata::{MetadataWriter, WriteError};
use crate::report::{ReportSink, StepEvent};

/// Serialize graph metadata to `directory` according to `mode`.
///
/// Monolithic mode writes one unit at the directory root. Modular mode
/// writes one unit per selected repository, in selection order, each under
/// its own subdirectory.
///
/// # Errors
///
/// Any write failure aborts the stage; partial output may remain on disk.
pub fn serialize(
    graph: &Graph,
    selection: &SelectionSet,
    mode: GenerationMode,
    directory: &Path,
    report: &dyn ReportSink,
) -> Result<(), WriteError> {
    let writer = MetadataWriter::new(graph);
    match mode {
        GenerationMode::Monolithic => {
            report.emit(StepEvent::info("    Serializing monolithic metadata"));
            writer.write_full(directory)
        }
        GenerationMode::Modular => {
            for repo in selection.names() {
                report.emit(StepEvent::info(format!(
                    "    Serializing metadata for {}",
                    repo
                )));
                writer.write_repository(repo, directory)?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::Element;
    use crate::core::types::RepoName;
    use crate::metadata::{read_unit, GRAPH_FILE, INDEX_FILE};
    use crate::report::MemorySink;
    use std::collections::{BTreeMap, BTreeSet};

    fn graph_and_selection() -> (Graph, SelectionSet) {
        let platform = RepoName::new("platform").unwrap();
        let model = RepoName::new("model").unwrap();
        let graph = Graph::new(
            vec![platform.clone(), model.clone()],
            vec![
                Element {
                    path: "meta::Any".to_string(),
                    classifier: "meta::Class".to_string(),
                    repository: platform,
                    properties: BTreeMap::new(),
                },
                Element {
                    path: "model::Person".to_string(),
                    classifier: "meta::Class".to_string(),
                    repository: model,
                    properties: BTreeMap::new(),
                },
            ],
        );
        let all = crate::core::repos::RepositorySet::from_descriptors(
            graph
                .repositories()
                .iter()
                .map(|name| crate::core::repos::RepositoryDescriptor {
                    name: name.clone(),
                    dependencies: vec![],
                    elements: vec![],
                }),
        )
        .unwrap();
        let selection =
            SelectionSet::select(&all, &BTreeSet::new(), &BTreeSet::new()).unwrap();
        (graph, selection)
    }

    #[test]
    fn monolithic_writes_one_unit_at_root() {
        let (graph, selection) = graph_and_selection();
        let dir = tempfile::tempdir().unwrap();
        let report = MemorySink::new();

        serialize(
            &graph,
            &selection,
            GenerationMode::Monolithic,
            dir.path(),
            &report,
        )
        .unwrap();

        assert!(dir.path().join(INDEX_FILE).exists());
        assert!(dir.path().join(GRAPH_FILE).exists());
        assert!(!dir.path().join("platform").exists());

        let unit = read_unit(dir.path()).unwrap();
        assert_eq!(unit.elements.len(), 2);
    }

    #[test]
    fn modular_writes_one_unit_per_repository() {
        let (graph, selection) = graph_and_selection();
        let dir = tempfile::tempdir().unwrap();
        let report = MemorySink::new();

        serialize(
            &graph,
            &selection,
            GenerationMode::Modular,
            dir.path(),
            &report,
        )
        .unwrap();

        let platform = read_unit(&dir.path().join("platform")).unwrap();
        assert_eq!(platform.elements.len(), 1);
        let model = read_unit(&dir.path().join("model")).unwrap();
        assert_eq!(model.elements.len(), 1);
        assert_eq!(model.elements[0].path, "model::Person");
    }

    #[test]
    fn modular_failure_keeps_already_flushed_units_loadable() {
        let (graph, selection) = graph_and_selection();
        let dir = tempfile::tempdir().unwrap();
        // "model" serializes first; make "platform" unwritable by occupying
        // its index file path with a directory.
        std::fs::create_dir_all(dir.path().join("platform").join(INDEX_FILE)).unwrap();

        let err = serialize(
            &graph,
            &selection,
            GenerationMode::Modular,
            dir.path(),
            &MemorySink::new(),
        )
        .unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));

        let model = read_unit(&dir.path().join("model")).unwrap();
        assert_eq!(model.elements.len(), 1);
        assert_eq!(model.elements[0].path, "model::Person");
    }

    #[test]
    fn modular_logs_repositories_in_selection_order() {
        let (graph, selection) = graph_and_selection();
        let dir = tempfile::tempdir().unwrap();
        let report = MemorySink::new();

        serialize(
            &graph,
            &selection,
            GenerationMode::Modular,
            dir.path(),
            &report,
        )
        .unwrap();

        let lines = report.lines();
        let model_at = lines.iter().position(|l| l.contains("for model")).unwrap();
        let platform_at = lines
            .iter()
            .position(|l| l.contains("for platform"))
            .unwrap();
        assert!(model_at < platform_at, "sorted selection order");
    }
}
