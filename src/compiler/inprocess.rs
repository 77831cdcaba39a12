//! compiler::inprocess
//!
//! The in-process reference compiler.
//!
//! # Design
//!
//! Emits one deterministic class artifact per source unit: a small header
//! (magic, format version) followed by the SHA-256 digest and byte length of
//! the unit's source. Identical generated source therefore always yields
//! byte-identical artifacts, which is the property the pipeline and its
//! tests rely on; real bytecode emission lives behind the same trait.
//!
//! Validation is minimal: a unit with empty content is rejected with a
//! structured diagnostic, since the generator never legitimately produces
//! one.

use sha2::{Digest, Sha256};

use super::{
    ClassArtifact, ClassCompiler, CompileDiagnostic, CompileError, CompiledArtifacts,
};
use crate::core::generated::GenerationResult;

/// Magic bytes for class artifacts.
pub const CLASS_MAGIC: [u8; 4] = *b"GFCL";
/// Class artifact format version.
pub const CLASS_VERSION: u16 = 1;

/// The in-process reference compiler.
#[derive(Debug, Clone, Copy, Default)]
pub struct InProcessCompiler;

impl InProcessCompiler {
    /// Create an in-process compiler.
    pub fn new() -> Self {
        Self
    }

    fn class_name(unit_name: &str) -> String {
        match unit_name.rsplit_once('.') {
            Some((stem, _)) => format!("{}.class", stem),
            None => format!("{}.class", unit_name),
        }
    }

    fn compile_unit(content: &str) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(4 + 2 + 8 + 32);
        bytes.extend_from_slice(&CLASS_MAGIC);
        bytes.extend_from_slice(&CLASS_VERSION.to_be_bytes());
        bytes.extend_from_slice(&(content.len() as u64).to_be_bytes());
        bytes.extend_from_slice(&Sha256::digest(content.as_bytes()));
        bytes
    }
}

impl ClassCompiler for InProcessCompiler {
    fn compile(&self, result: &GenerationResult) -> Result<CompiledArtifacts, CompileError> {
        let mut artifacts = Vec::with_capacity(result.unit_count());
        let mut diagnostics = Vec::new();

        for (group, units) in result.groups() {
            for unit in units {
                if unit.content.is_empty() {
                    diagnostics.push(CompileDiagnostic {
                        group: group.to_string(),
                        unit: unit.name.clone(),
                        message: "empty source unit".to_string(),
                    });
                    continue;
                }
                artifacts.push(ClassArtifact {
                    group: group.to_string(),
                    name: Self::class_name(&unit.name),
                    bytes: Self::compile_unit(&unit.content),
                });
            }
        }

        if !diagnostics.is_empty() {
            return Err(CompileError::Diagnostics(diagnostics));
        }
        Ok(CompiledArtifacts::new(artifacts))
    }
}
