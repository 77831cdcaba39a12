//! pipeline::generate
//!
//! Code generation stage: render compilable source units from the graph,
//! grouped according to the generation mode, with optional external-API
//! marking and an optional on-disk mirror.
//!
//! The in-memory [`GenerationResult`] is the authoritative output; the disk
//! mirror exists for inspection and never feeds back into later stages.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::generated::{GenerationResult, SourceUnit};
use crate::core::graph::{Element, Graph};
use crate::core::repos::SelectionSet;
use crate::core::types::GenerationMode;
use crate::report::{ReportSink, StepEvent};

/// Group name used for the single monolithic group.
pub const MONOLITHIC_GROUP: &str = "all";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to write generated source '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// External-API marking for generated groups.
#[derive(Debug, Clone, Default)]
pub struct ExternalApi {
    pub enabled: bool,
    pub package: Option<String>,
}

/// Generate source units for the selection.
///
/// Monolithic mode produces one group named [`MONOLITHIC_GROUP`] holding
/// every element; modular mode produces one group per selected repository.
/// When `external.enabled` holds, every produced group is marked externally
/// visible under `external.package` — marking changes visibility only, never
/// the generated content.
///
/// When `sources_dir` is set, each unit is mirrored to
/// `<sources_dir>/<group>/<unit name>`.
///
/// # Errors
///
/// Only mirror writes can fail; pure generation is infallible.
pub fn generate(
    graph: &Graph,
    selection: &SelectionSet,
    mode: GenerationMode,
    external: &ExternalApi,
    sources_dir: Option<&Path>,
    report: &dyn ReportSink,
) -> Result<GenerationResult, GenerateError> {
    let mut groups = std::collections::BTreeMap::new();
    match mode {
        GenerationMode::Monolithic => {
            report.emit(StepEvent::info("    Generating monolithic sources"));
            let elements: Vec<&Element> = graph.elements().iter().collect();
            groups.insert(
                MONOLITHIC_GROUP.to_string(),
                vec![render_unit(MONOLITHIC_GROUP, &elements)],
            );
        }
        GenerationMode::Modular => {
            for repo in selection.names() {
                report.emit(StepEvent::info(format!(
                    "    Generating sources for {}",
                    repo
                )));
                let elements: Vec<&Element> = graph.elements_for(repo).collect();
                groups.insert(
                    repo.as_str().to_string(),
                    vec![render_unit(repo.as_str(), &elements)],
                );
            }
        }
    }

    let external_groups = if external.enabled && external.package.is_some() {
        groups.keys().cloned().collect()
    } else {
        std::collections::BTreeSet::new()
    };
    let result = GenerationResult::new(groups, external_groups, external.package.clone());

    if let Some(dir) = sources_dir {
        mirror(&result, dir)?;
    }
    Ok(result)
}

/// Render one deterministic source unit for a group. External-API marking
/// is tracked on the [`GenerationResult`] and never reaches the rendered
/// text.
fn render_unit(group: &str, elements: &[&Element]) -> SourceUnit {
    let class = class_name_for(group);
    let mut out = String::new();
    let _ = writeln!(out, "public final class {} {{", class);
    let _ = writeln!(out, "    public static final String GROUP = \"{}\";", group);
    let _ = writeln!(out, "    public static final String[] ELEMENTS = {{");
    for element in elements {
        let _ = writeln!(
            out,
            "        \"{}|{}\",",
            element.classifier, element.path
        );
    }
    let _ = writeln!(out, "    }};");
    let _ = writeln!(out, "}}");
    SourceUnit {
        name: format!("{}.java", class),
        content: out,
    }
}

/// `model_legacy` becomes `ModelLegacyRegistry`.
fn class_name_for(group: &str) -> String {
    let mut name = String::new();
    for part in group.split('_') {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            name.extend(first.to_uppercase());
            name.push_str(chars.as_str());
        }
    }
    name.push_str("Registry");
    name
}

fn mirror(result: &GenerationResult, dir: &Path) -> Result<(), GenerateError> {
    for (group, units) in result.groups() {
        let group_dir = dir.join(group);
        fs::create_dir_all(&group_dir).map_err(|source| GenerateError::Io {
            path: group_dir.clone(),
            source,
        })?;
        for unit in units {
            let path = group_dir.join(&unit.name);
            fs::write(&path, &unit.content)
                .map_err(|source| GenerateError::Io { path: path.clone(), source })?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repos::{RepositoryDescriptor, RepositorySet};
    use crate::core::types::RepoName;
    use crate::report::MemorySink;
    use std::collections::{BTreeMap, BTreeSet};

    fn fixture() -> (Graph, SelectionSet) {
        let platform = RepoName::new("platform").unwrap();
        let model = RepoName::new("model_legacy").unwrap();
        let graph = Graph::new(
            vec![platform.clone(), model.clone()],
            vec![
                Element {
                    path: "meta::Any".to_string(),
                    classifier: "meta::Class".to_string(),
                    repository: platform.clone(),
                    properties: BTreeMap::new(),
                },
                Element {
                    path: "model::Person".to_string(),
                    classifier: "meta::Class".to_string(),
                    repository: model.clone(),
                    properties: BTreeMap::new(),
                },
            ],
        );
        let all = RepositorySet::from_descriptors([
            RepositoryDescriptor {
                name: platform,
                dependencies: vec![],
                elements: vec![],
            },
            RepositoryDescriptor {
                name: model,
                dependencies: vec![],
                elements: vec![],
            },
        ])
        .unwrap();
        let selection =
            SelectionSet::select(&all, &BTreeSet::new(), &BTreeSet::new()).unwrap();
        (graph, selection)
    }

    #[test]
    fn monolithic_produces_single_group_with_all_elements() {
        let (graph, selection) = fixture();
        let result = generate(
            &graph,
            &selection,
            GenerationMode::Monolithic,
            &ExternalApi::default(),
            None,
            &MemorySink::new(),
        )
        .unwrap();

        let names: Vec<&str> = result.group_names().collect();
        assert_eq!(names, vec![MONOLITHIC_GROUP]);
        let unit = &result.units_for(MONOLITHIC_GROUP).unwrap()[0];
        assert!(unit.content.contains("meta::Any"));
        assert!(unit.content.contains("model::Person"));
    }

    #[test]
    fn modular_produces_one_group_per_repository() {
        let (graph, selection) = fixture();
        let result = generate(
            &graph,
            &selection,
            GenerationMode::Modular,
            &ExternalApi::default(),
            None,
            &MemorySink::new(),
        )
        .unwrap();

        let names: Vec<&str> = result.group_names().collect();
        assert_eq!(names, vec!["model_legacy", "platform"]);
        let unit = &result.units_for("model_legacy").unwrap()[0];
        assert_eq!(unit.name, "ModelLegacyRegistry.java");
        assert!(unit.content.contains("model::Person"));
        assert!(!unit.content.contains("meta::Any"));
    }

    #[test]
    fn external_marking_changes_visibility_not_grouping() {
        let (graph, selection) = fixture();
        let external = ExternalApi {
            enabled: true,
            package: Some("org.example.api".to_string()),
        };
        let plain = generate(
            &graph,
            &selection,
            GenerationMode::Modular,
            &ExternalApi::default(),
            None,
            &MemorySink::new(),
        )
        .unwrap();
        let marked = generate(
            &graph,
            &selection,
            GenerationMode::Modular,
            &external,
            None,
            &MemorySink::new(),
        )
        .unwrap();

        let plain_names: Vec<&str> = plain.group_names().collect();
        let marked_names: Vec<&str> = marked.group_names().collect();
        assert_eq!(plain_names, marked_names);
        for name in plain_names {
            assert_eq!(
                plain.units_for(name).unwrap(),
                marked.units_for(name).unwrap(),
                "marking must not change rendered content for group {}",
                name
            );
        }
        assert_eq!(plain.external_groups().count(), 0);
        assert!(marked.is_external("platform"));
        assert_eq!(marked.external_package(), Some("org.example.api"));
    }

    #[test]
    fn mirror_writes_units_under_group_directories() {
        let (graph, selection) = fixture();
        let dir = tempfile::tempdir().unwrap();
        let result = generate(
            &graph,
            &selection,
            GenerationMode::Modular,
            &ExternalApi::default(),
            Some(dir.path()),
            &MemorySink::new(),
        )
        .unwrap();

        for (group, units) in result.groups() {
            for unit in units {
                let path = dir.path().join(group).join(&unit.name);
                assert_eq!(std::fs::read_to_string(path).unwrap(), unit.content);
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let (graph, selection) = fixture();
        let run = || {
            generate(
                &graph,
                &selection,
                GenerationMode::Modular,
                &ExternalApi::default(),
                None,
                &MemorySink::new(),
            )
            .unwrap()
        };
        assert_eq!(run(), run());
    }
}
