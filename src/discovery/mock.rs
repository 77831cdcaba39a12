//! discovery::mock
//!
//! Mock repository discovery for deterministic testing.

use super::{DiscoveryError, RepositoryDiscovery};
use crate::core::repos::{RepositoryDescriptor, RepositorySet};

/// Mock discovery returning a fixed descriptor list.
#[derive(Debug, Clone, Default)]
pub struct MockDiscovery {
    descriptors: Vec<RepositoryDescriptor>,
}

impl MockDiscovery {
    /// Create a mock over fixed descriptors.
    pub fn new(descriptors: Vec<RepositoryDescriptor>) -> Self {
        Self { descriptors }
    }
}

impl RepositoryDiscovery for MockDiscovery {
    fn discover(&self) -> Result<RepositorySet, DiscoveryError> {
        Ok(RepositorySet::from_descriptors(self.descriptors.clone())?)
    }
}
