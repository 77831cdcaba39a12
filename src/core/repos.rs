//! core::repos
//!
//! Repository descriptors, the repository universe, and selection.
//!
//! # Architecture
//!
//! - [`RepositoryDescriptor`] is the JSON-described unit of model content:
//!   a name, its dependency names, and its declared elements.
//! - [`RepositorySet`] is the immutable universe of known repositories,
//!   built once at process start from the discovery collaborator.
//! - [`SelectionSet`] is the chosen subset for one run:
//!   (requested, or all if requested is empty) minus excluded.
//!
//! # Invariants
//!
//! - Repository names in a set are unique
//! - Every declared dependency refers to a repository in the same set
//! - Every requested name must exist in the set, checked before any graph work
//! - Both sets iterate in sorted (deterministic) order

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::RepoName;

/// Errors from building a repository set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepoSetError {
    /// The same repository name was defined twice.
    #[error("duplicate repository definition: {0}")]
    Duplicate(RepoName),

    /// A repository depends on a name not present in the set.
    #[error("repository '{repo}' depends on unknown repository '{dependency}'")]
    UnknownDependency {
        repo: RepoName,
        dependency: RepoName,
    },
}

/// Errors from selecting repositories for a run.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// One or more requested names are absent from the repository set.
    ///
    /// Raised before any graph work begins. Names are sorted for
    /// deterministic messages.
    #[error("unknown repositories: {}", .0.join(", "))]
    UnknownRepositories(Vec<String>),
}

/// A model element declared by a repository descriptor.
///
/// The domain language's grammar is out of scope here: descriptors carry
/// already-parsed declarations, and the model compiler collaborator turns
/// them into graph elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ElementDecl {
    /// Fully qualified element path, e.g. `model::Person`.
    pub path: String,
    /// Classifier identifier, e.g. `meta::Class`.
    pub classifier: String,
    /// Free-form key/value properties.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// A named, dependency-grouped unit of model content.
///
/// # Example descriptor (JSON)
///
/// ```json
/// {
///   "name": "model_firm",
///   "dependencies": ["platform"],
///   "elements": [
///     { "path": "firm::Firm", "classifier": "meta::Class" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryDescriptor {
    /// Repository name, unique within a set.
    pub name: RepoName,
    /// Names of repositories this one depends on.
    #[serde(default)]
    pub dependencies: Vec<RepoName>,
    /// Elements declared by this repository.
    #[serde(default)]
    pub elements: Vec<ElementDecl>,
}

/// The immutable universe of known repositories.
///
/// Built once at process start; iteration order is sorted by name.
#[derive(Debug, Clone, Default)]
pub struct RepositorySet {
    repos: BTreeMap<RepoName, RepositoryDescriptor>,
}

impl RepositorySet {
    /// Build a repository set from descriptors.
    ///
    /// # Errors
    ///
    /// Returns `RepoSetError::Duplicate` for repeated names and
    /// `RepoSetError::UnknownDependency` for dangling dependency references.
    pub fn from_descriptors(
        descriptors: impl IntoIterator<Item = RepositoryDescriptor>,
    ) -> Result<Self, RepoSetError> {
        let mut repos = BTreeMap::new();
        for descriptor in descriptors {
            let name = descriptor.name.clone();
            if repos.insert(name.clone(), descriptor).is_some() {
                return Err(RepoSetError::Duplicate(name));
            }
        }

        for descriptor in repos.values() {
            for dependency in &descriptor.dependencies {
                if !repos.contains_key(dependency) {
                    return Err(RepoSetError::UnknownDependency {
                        repo: descriptor.name.clone(),
                        dependency: dependency.clone(),
                    });
                }
            }
        }

        Ok(Self { repos })
    }

    /// Whether the set contains a repository with this name.
    pub fn contains(&self, name: &RepoName) -> bool {
        self.repos.contains_key(name)
    }

    /// Look up a descriptor by name.
    pub fn get(&self, name: &RepoName) -> Option<&RepositoryDescriptor> {
        self.repos.get(name)
    }

    /// All repository names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &RepoName> {
        self.repos.keys()
    }

    /// All descriptors in sorted name order.
    pub fn descriptors(&self) -> impl Iterator<Item = &RepositoryDescriptor> {
        self.repos.values()
    }

    /// Number of known repositories.
    pub fn len(&self) -> usize {
        self.repos.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}

/// The chosen subset of repositories for one run.
///
/// Selection semantics: if `requested` is empty, every known repository is
/// selected; otherwise exactly the requested ones. `excluded` is subtracted
/// afterwards in both cases. Iteration order is sorted by name.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use graphforge::core::repos::{RepositoryDescriptor, RepositorySet, SelectionSet};
/// use graphforge::core::types::RepoName;
///
/// let set = RepositorySet::from_descriptors([
///     RepositoryDescriptor {
///         name: RepoName::new("platform").unwrap(),
///         dependencies: vec![],
///         elements: vec![],
///     },
///     RepositoryDescriptor {
///         name: RepoName::new("model").unwrap(),
///         dependencies: vec![RepoName::new("platform").unwrap()],
///         elements: vec![],
///     },
/// ])
/// .unwrap();
///
/// let selection = SelectionSet::select(&set, &BTreeSet::new(), &BTreeSet::new()).unwrap();
/// assert_eq!(selection.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    selected: Vec<RepoName>,
}

impl SelectionSet {
    /// Resolve the selection against the known universe.
    ///
    /// # Errors
    ///
    /// Returns `SelectionError::UnknownRepositories` if any requested name is
    /// absent from `all`. This check runs before any graph work.
    pub fn select(
        all: &RepositorySet,
        requested: &BTreeSet<RepoName>,
        excluded: &BTreeSet<RepoName>,
    ) -> Result<Self, SelectionError> {
        let base: Vec<RepoName> = if requested.is_empty() {
            all.names().cloned().collect()
        } else {
            let missing: Vec<String> = requested
                .iter()
                .filter(|name| !all.contains(name))
                .map(|name| name.to_string())
                .collect();
            if !missing.is_empty() {
                return Err(SelectionError::UnknownRepositories(missing));
            }
            requested.iter().cloned().collect()
        };

        let selected = base
            .into_iter()
            .filter(|name| !excluded.contains(name))
            .collect();
        Ok(Self { selected })
    }

    /// Selected repository names in deterministic (sorted) order.
    pub fn names(&self) -> impl Iterator<Item = &RepoName> {
        self.selected.iter()
    }

    /// Whether a repository is part of the selection.
    pub fn contains(&self, name: &RepoName) -> bool {
        self.selected.binary_search(name).is_ok()
    }

    /// Number of selected repositories.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether the selection is empty.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, deps: &[&str]) -> RepositoryDescriptor {
        RepositoryDescriptor {
            name: RepoName::new(name).unwrap(),
            dependencies: deps.iter().map(|d| RepoName::new(*d).unwrap()).collect(),
            elements: vec![],
        }
    }

    fn names(set: &[&str]) -> BTreeSet<RepoName> {
        set.iter().map(|n| RepoName::new(*n).unwrap()).collect()
    }

    mod repository_set {
        use super::*;

        #[test]
        fn builds_from_descriptors() {
            let set =
                RepositorySet::from_descriptors([repo("platform", &[]), repo("model", &["platform"])])
                    .unwrap();
            assert_eq!(set.len(), 2);
            assert!(set.contains(&RepoName::new("platform").unwrap()));
        }

        #[test]
        fn rejects_duplicate_names() {
            let err = RepositorySet::from_descriptors([repo("platform", &[]), repo("platform", &[])])
                .unwrap_err();
            assert_eq!(err, RepoSetError::Duplicate(RepoName::new("platform").unwrap()));
        }

        #[test]
        fn rejects_unknown_dependency() {
            let err = RepositorySet::from_descriptors([repo("model", &["missing"])]).unwrap_err();
            assert!(matches!(err, RepoSetError::UnknownDependency { .. }));
        }

        #[test]
        fn names_are_sorted() {
            let set = RepositorySet::from_descriptors([
                repo("zeta", &[]),
                repo("alpha", &[]),
                repo("mid", &[]),
            ])
            .unwrap();
            let names: Vec<&str> = set.names().map(RepoName::as_str).collect();
            assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        }
    }

    mod selection {
        use super::*;

        fn universe() -> RepositorySet {
            RepositorySet::from_descriptors([
                repo("platform", &[]),
                repo("model_a", &["platform"]),
                repo("model_b", &["platform"]),
            ])
            .unwrap()
        }

        #[test]
        fn empty_request_selects_all_minus_excluded() {
            let selection =
                SelectionSet::select(&universe(), &BTreeSet::new(), &names(&["model_b"])).unwrap();
            let selected: Vec<&str> = selection.names().map(RepoName::as_str).collect();
            assert_eq!(selected, vec!["model_a", "platform"]);
        }

        #[test]
        fn explicit_request_selects_requested_minus_excluded() {
            let selection = SelectionSet::select(
                &universe(),
                &names(&["model_a", "model_b"]),
                &names(&["model_b"]),
            )
            .unwrap();
            let selected: Vec<&str> = selection.names().map(RepoName::as_str).collect();
            assert_eq!(selected, vec!["model_a"]);
            assert!(selection.contains(&RepoName::new("model_a").unwrap()));
            assert!(!selection.contains(&RepoName::new("model_b").unwrap()));
        }

        #[test]
        fn unknown_requested_name_fails_immediately() {
            let err = SelectionSet::select(
                &universe(),
                &names(&["model_a", "unknown_repo"]),
                &BTreeSet::new(),
            )
            .unwrap_err();
            assert_eq!(
                err,
                SelectionError::UnknownRepositories(vec!["unknown_repo".to_string()])
            );
        }

        #[test]
        fn excluding_unknown_name_is_allowed() {
            // Exclusion never validates against the universe; requesting does.
            let selection =
                SelectionSet::select(&universe(), &BTreeSet::new(), &names(&["not_there"]))
                    .unwrap();
            assert_eq!(selection.len(), 3);
        }

        #[test]
        fn order_is_deterministic() {
            let a = SelectionSet::select(&universe(), &BTreeSet::new(), &BTreeSet::new()).unwrap();
            let b = SelectionSet::select(&universe(), &BTreeSet::new(), &BTreeSet::new()).unwrap();
            assert_eq!(a, b);
        }
    }
}
