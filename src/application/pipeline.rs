//! Compile pipeline
//!
//! Assemble → validate → compile, as one unit. Used by the entry point and
//! by every CLI command that needs a pack.
//!
//! ## Flow
//!
//! 1. Assemble fragments through a [`ConfigSetSource`]
//! 2. Validate the whole set (all errors at once)
//! 3. Compile the validated set into a sealed pack

use std::path::Path;

use crate::domain::entities::{CompiledPolicyPack, ConfigurationSet, EngineRegistry};
use crate::domain::guard::GuardVocabulary;
use crate::domain::ports::ConfigSetSource;
use crate::domain::services::{PolicyCompiler, ValidationResult, Validator};
use crate::error::PackResult;
use crate::infrastructure::FsSetCatalog;

#[derive(Debug, Clone)]
pub struct CompilePipeline {
    vocabulary: GuardVocabulary,
    registry: EngineRegistry,
}

impl Default for CompilePipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl CompilePipeline {
    /// Built-in guard vocabulary and engine contracts.
    pub fn new() -> Self {
        Self {
            vocabulary: GuardVocabulary::default(),
            registry: EngineRegistry::builtin(),
        }
    }

    pub fn with_vocabulary(mut self, vocabulary: GuardVocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    pub fn with_registry(mut self, registry: EngineRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn vocabulary(&self) -> &GuardVocabulary {
        &self.vocabulary
    }

    pub fn registry(&self) -> &EngineRegistry {
        &self.registry
    }

    /// Run every check and report, without compiling.
    pub fn validate(&self, set: &ConfigurationSet) -> ValidationResult {
        Validator::new(&self.vocabulary).validate(set)
    }

    pub fn compile(&self, set: ConfigurationSet) -> PackResult<CompiledPolicyPack> {
        let validated = Validator::new(&self.vocabulary)
            .validate_into(set)
            .map_err(|failure| {
                tracing::warn!(
                    config_id = failure.config_id.as_str(),
                    errors = failure.errors.len(),
                    "configuration set failed validation"
                );
                failure
            })?;
        Ok(PolicyCompiler::new(&self.registry).compile(validated)?)
    }

    pub fn compile_dir<S>(&self, source: &S, dir: &Path) -> PackResult<CompiledPolicyPack>
    where
        S: ConfigSetSource + ?Sized,
    {
        let set = source.assemble(dir)?;
        self.compile(set)
    }
}

/// Compile one set directory with the built-in vocabulary and engines.
pub fn compile_set_dir(dir: &Path) -> PackResult<CompiledPolicyPack> {
    CompilePipeline::new().compile_dir(&FsSetCatalog::new(), dir)
}
