//! Active Configuration Options

use std::path::PathBuf;

use crate::config::Config;

use super::super::pipeline::CompilePipeline;

/// Options for the active configuration use case
#[derive(Debug, Clone)]
pub struct ActiveConfigOptions {
    /// Directory holding one subdirectory per configuration set
    pub sets_root: PathBuf,
    /// Whether DRAFT sets may be selected
    pub allow_drafts: bool,
    /// Guard vocabulary and engine contracts used for compilation
    pub pipeline: CompilePipeline,
}

impl ActiveConfigOptions {
    pub fn new(sets_root: impl Into<PathBuf>) -> Self {
        Self {
            sets_root: sets_root.into(),
            allow_drafts: false,
            pipeline: CompilePipeline::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            sets_root: config.sets_root(),
            allow_drafts: config.sets.allow_drafts,
            pipeline: CompilePipeline::new().with_vocabulary(config.guard_vocabulary()),
        }
    }

    pub fn with_allow_drafts(mut self, allow_drafts: bool) -> Self {
        self.allow_drafts = allow_drafts;
        self
    }

    pub fn with_pipeline(mut self, pipeline: CompilePipeline) -> Self {
        self.pipeline = pipeline;
        self
    }
}
