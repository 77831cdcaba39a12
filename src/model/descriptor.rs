//! model::descriptor
//!
//! Compiles the declarations carried by repository descriptors.
//!
//! # Phase membership
//!
//! A repository belongs to the core phase when it declares no dependencies
//! (it can bootstrap with nothing else loaded); every other repository is
//! system phase.

use super::{BuildPhase, ModelCompiler, ModelError};
use crate::core::graph::Element;
use crate::core::repos::{RepositoryDescriptor, RepositorySet, SelectionSet};

/// Descriptor-backed model compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct DescriptorCompiler;

impl DescriptorCompiler {
    /// Create a descriptor compiler.
    pub fn new() -> Self {
        Self
    }

    fn in_phase(descriptor: &RepositoryDescriptor, phase: BuildPhase) -> bool {
        match phase {
            BuildPhase::Core => descriptor.dependencies.is_empty(),
            BuildPhase::System => !descriptor.dependencies.is_empty(),
        }
    }
}

impl ModelCompiler for DescriptorCompiler {
    fn compile(
        &self,
        phase: BuildPhase,
        all: &RepositorySet,
        selection: &SelectionSet,
    ) -> Result<Vec<Element>, ModelError> {
        let mut elements = Vec::new();
        for name in selection.names() {
            let descriptor = all
                .get(name)
                .ok_or_else(|| ModelError::MissingRepository(name.clone()))?;
            if !Self::in_phase(descriptor, phase) {
                continue;
            }

            for decl in &descriptor.elements {
                elements.push(Element {
                    path: decl.path.clone(),
                    classifier: decl.classifier.clone(),
                    repository: name.clone(),
                    properties: decl.properties.clone(),
                });
            }
        }
        Ok(elements)
    }
}
