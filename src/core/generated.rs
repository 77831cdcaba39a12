//! core::generated
//!
//! The code generation product consumed by the compilation stage.
//!
//! # Design
//!
//! A [`GenerationResult`] is produced once by the code generator and is
//! immutable afterwards: generated source text partitioned by logical group,
//! plus a marker of which groups are externally visible (and under which
//! package). Groups are a `BTreeMap` so iteration is deterministic.
//!
//! In monolithic mode there is a single group; in modular mode one group per
//! selected repository, preserving the repository partition.

use std::collections::{BTreeMap, BTreeSet};

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    /// File name within the group, e.g. `FirmFactory.java`.
    pub name: String,
    /// Full text of the generated source.
    pub content: String,
}

/// Generated source grouped by unit, with external-visibility markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    groups: BTreeMap<String, Vec<SourceUnit>>,
    external_groups: BTreeSet<String>,
    external_package: Option<String>,
}

impl GenerationResult {
    /// Assemble a result from generated groups.
    ///
    /// `external_groups` must be a subset of the group keys; unknown names
    /// are dropped rather than invented.
    pub fn new(
        groups: BTreeMap<String, Vec<SourceUnit>>,
        external_groups: BTreeSet<String>,
        external_package: Option<String>,
    ) -> Self {
        let external_groups = external_groups
            .into_iter()
            .filter(|g| groups.contains_key(g))
            .collect();
        Self {
            groups,
            external_groups,
            external_package,
        }
    }

    /// Group names in deterministic order.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Groups with their source units, in deterministic order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[SourceUnit])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Source units for one group.
    pub fn units_for(&self, group: &str) -> Option<&[SourceUnit]> {
        self.groups.get(group).map(Vec::as_slice)
    }

    /// Whether a group is marked externally visible.
    pub fn is_external(&self, group: &str) -> bool {
        self.external_groups.contains(group)
    }

    /// The externally visible groups.
    pub fn external_groups(&self) -> impl Iterator<Item = &str> {
        self.external_groups.iter().map(String::as_str)
    }

    /// The package external groups are published under, when marking is on.
    pub fn external_package(&self) -> Option<&str> {
        self.external_package.as_deref()
    }

    /// Number of groups.
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Total number of source units across all groups.
    pub fn unit_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(name: &str) -> SourceUnit {
        SourceUnit {
            name: name.to_string(),
            content: format!("// {}", name),
        }
    }

    fn groups(names: &[&str]) -> BTreeMap<String, Vec<SourceUnit>> {
        names
            .iter()
            .map(|n| (n.to_string(), vec![unit(&format!("{}_Unit.java", n))]))
            .collect()
    }

    #[test]
    fn group_order_is_deterministic() {
        let result = GenerationResult::new(groups(&["zeta", "alpha"]), BTreeSet::new(), None);
        let names: Vec<&str> = result.group_names().collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn external_marking_is_subset_of_groups() {
        let mut external = BTreeSet::new();
        external.insert("alpha".to_string());
        external.insert("not_a_group".to_string());

        let result = GenerationResult::new(
            groups(&["alpha", "beta"]),
            external,
            Some("org.example.api".to_string()),
        );

        assert!(result.is_external("alpha"));
        assert!(!result.is_external("beta"));
        assert!(!result.is_external("not_a_group"));
        assert_eq!(result.external_package(), Some("org.example.api"));
    }

    #[test]
    fn counts_units_across_groups() {
        let result = GenerationResult::new(groups(&["a", "b", "c"]), BTreeSet::new(), None);
        assert_eq!(result.group_count(), 3);
        assert_eq!(result.unit_count(), 3);
    }
}
