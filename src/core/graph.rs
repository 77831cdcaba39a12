//! core::graph
//!
//! The in-memory compiled model graph and its initialization state machine.
//!
//! # Architecture
//!
//! The [`Graph`] is the compiled representation of all selected repositories:
//! a sorted table of [`Element`]s, each owned by exactly one repository.
//! It is built exactly once per run (from cache or by full rebuild), is never
//! partially persisted, and is immutable once Ready.
//!
//! Cache-or-rebuild branching is modeled as an explicit state machine,
//! [`InitState`], with a pure transition function rather than an implicit
//! success-flag check. The pipeline's initializer drives the machine; tests
//! can exercise the transitions in isolation.
//!
//! # Invariants
//!
//! - Elements are sorted by path; element paths are unique within a graph
//! - Every element's repository is one of the graph's repositories
//! - A Ready graph covers exactly the run's selection

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::repos::SelectionSet;
use super::types::RepoName;

/// One compiled model element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Fully qualified path, unique within a graph.
    pub path: String,
    /// Classifier identifier (drawn from the classifier-id string pool
    /// when serialized).
    pub classifier: String,
    /// Owning repository.
    pub repository: RepoName,
    /// Free-form key/value properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// The compiled model graph for one run.
///
/// Constructed once, then treated as immutable. Serializable so the file
/// cache can persist and rehydrate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graph {
    repositories: Vec<RepoName>,
    elements: Vec<Element>,
}

impl Graph {
    /// Build a graph from a repository list and elements.
    ///
    /// Repositories and elements are sorted on construction so that
    /// everything downstream (serialization, generation) is deterministic.
    pub fn new(repositories: Vec<RepoName>, mut elements: Vec<Element>) -> Self {
        let mut repositories = repositories;
        repositories.sort();
        repositories.dedup();
        elements.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            repositories,
            elements,
        }
    }

    /// An empty graph (the reset target before a full rebuild).
    pub fn empty() -> Self {
        Self {
            repositories: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Repositories covered by this graph, sorted.
    pub fn repositories(&self) -> &[RepoName] {
        &self.repositories
    }

    /// All elements, sorted by path.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Elements owned by one repository, in path order.
    pub fn elements_for<'a>(
        &'a self,
        repository: &'a RepoName,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements
            .iter()
            .filter(move |e| &e.repository == repository)
    }

    /// Whether this graph covers exactly the given selection.
    ///
    /// A cached graph that covers anything else is stale and must be
    /// discarded in favor of a rebuild.
    pub fn covers(&self, selection: &SelectionSet) -> bool {
        self.repositories.len() == selection.len()
            && self
                .repositories
                .iter()
                .zip(selection.names())
                .all(|(a, b)| a == b)
    }

    /// Total element count.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the graph has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

/// Initialization states for the cache-or-rebuild lifecycle.
///
/// ```text
/// NotLoaded --Hydrated--> CacheHit --Accepted--> Ready
/// NotLoaded --Degraded--> CacheMiss --RebuildStarted--> Rebuilding
/// Rebuilding --RebuildSucceeded--> Ready
/// Rebuilding --RebuildFailed--> Failed
/// ```
///
/// Any transition not listed above lands in `Failed`: the machine never
/// silently ignores an out-of-order event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    NotLoaded,
    CacheHit,
    CacheMiss,
    Rebuilding,
    Ready,
    Failed,
}

/// Events driving [`InitState`] transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitEvent {
    /// Cache hydration produced a usable graph.
    Hydrated,
    /// Cache hydration failed or produced a stale graph.
    Degraded,
    /// A hydrated graph was accepted as the run's graph.
    Accepted,
    /// The full rebuild began.
    RebuildStarted,
    /// Both rebuild phases completed.
    RebuildSucceeded,
    /// A rebuild phase failed.
    RebuildFailed,
}

impl InitState {
    /// Pure transition function.
    pub fn on(self, event: InitEvent) -> InitState {
        use InitEvent::*;
        use InitState::*;
        match (self, event) {
            (NotLoaded, Hydrated) => CacheHit,
            (NotLoaded, Degraded) => CacheMiss,
            (CacheHit, Accepted) => Ready,
            (CacheMiss, RebuildStarted) => Rebuilding,
            (Rebuilding, RebuildSucceeded) => Ready,
            (Rebuilding, RebuildFailed) => Failed,
            _ => Failed,
        }
    }

    /// Whether this is a terminal state.
    pub fn is_terminal(self) -> bool {
        matches!(self, InitState::Ready | InitState::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::repos::{RepositorySet, RepositoryDescriptor};
    use std::collections::BTreeSet;

    fn element(path: &str, classifier: &str, repo: &str) -> Element {
        Element {
            path: path.to_string(),
            classifier: classifier.to_string(),
            repository: RepoName::new(repo).unwrap(),
            properties: BTreeMap::new(),
        }
    }

    mod graph {
        use super::*;

        #[test]
        fn sorts_elements_by_path() {
            let graph = Graph::new(
                vec![RepoName::new("repo").unwrap()],
                vec![
                    element("z::Last", "meta::Class", "repo"),
                    element("a::First", "meta::Class", "repo"),
                ],
            );
            let paths: Vec<&str> = graph.elements().iter().map(|e| e.path.as_str()).collect();
            assert_eq!(paths, vec!["a::First", "z::Last"]);
        }

        #[test]
        fn elements_for_filters_by_repository() {
            let graph = Graph::new(
                vec![
                    RepoName::new("one").unwrap(),
                    RepoName::new("two").unwrap(),
                ],
                vec![
                    element("a::A", "meta::Class", "one"),
                    element("b::B", "meta::Class", "two"),
                ],
            );
            let one = RepoName::new("one").unwrap();
            let paths: Vec<&str> = graph.elements_for(&one).map(|e| e.path.as_str()).collect();
            assert_eq!(paths, vec!["a::A"]);
        }

        #[test]
        fn covers_matches_exact_selection() {
            let set = RepositorySet::from_descriptors([
                RepositoryDescriptor {
                    name: RepoName::new("one").unwrap(),
                    dependencies: vec![],
                    elements: vec![],
                },
                RepositoryDescriptor {
                    name: RepoName::new("two").unwrap(),
                    dependencies: vec![],
                    elements: vec![],
                },
            ])
            .unwrap();
            let all = SelectionSet::select(&set, &BTreeSet::new(), &BTreeSet::new()).unwrap();

            let full = Graph::new(
                vec![RepoName::new("one").unwrap(), RepoName::new("two").unwrap()],
                vec![],
            );
            let partial = Graph::new(vec![RepoName::new("one").unwrap()], vec![]);

            assert!(full.covers(&all));
            assert!(!partial.covers(&all));
        }

        #[test]
        fn serde_round_trip() {
            let graph = Graph::new(
                vec![RepoName::new("repo").unwrap()],
                vec![element("a::A", "meta::Class", "repo")],
            );
            let json = serde_json::to_string(&graph).unwrap();
            let back: Graph = serde_json::from_str(&json).unwrap();
            assert_eq!(back, graph);
        }
    }

    mod init_state {
        use super::*;

        #[test]
        fn cache_hit_path_reaches_ready() {
            let state = InitState::NotLoaded
                .on(InitEvent::Hydrated)
                .on(InitEvent::Accepted);
            assert_eq!(state, InitState::Ready);
        }

        #[test]
        fn cache_miss_path_reaches_ready_via_rebuild() {
            let state = InitState::NotLoaded
                .on(InitEvent::Degraded)
                .on(InitEvent::RebuildStarted)
                .on(InitEvent::RebuildSucceeded);
            assert_eq!(state, InitState::Ready);
        }

        #[test]
        fn rebuild_failure_reaches_failed() {
            let state = InitState::NotLoaded
                .on(InitEvent::Degraded)
                .on(InitEvent::RebuildStarted)
                .on(InitEvent::RebuildFailed);
            assert_eq!(state, InitState::Failed);
        }

        #[test]
        fn out_of_order_events_fail() {
            assert_eq!(
                InitState::NotLoaded.on(InitEvent::RebuildSucceeded),
                InitState::Failed
            );
            assert_eq!(InitState::Ready.on(InitEvent::Hydrated), InitState::Failed);
        }

        #[test]
        fn terminal_states() {
            assert!(InitState::Ready.is_terminal());
            assert!(InitState::Failed.is_terminal());
            assert!(!InitState::Rebuilding.is_terminal());
        }
    }
}
