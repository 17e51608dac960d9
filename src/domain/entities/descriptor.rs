//! Set descriptor
//!
//! Header of a configuration set as read from its root descriptor alone,
//! without assembling fragments. Used to pick the active set.

use std::path::PathBuf;

use crate::domain::value_objects::{ConfigStatus, Dimension, EffectiveWindow};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetDescriptor {
    pub config_id: String,
    pub version: u32,
    pub status: ConfigStatus,
    pub legal_entity: Dimension,
    pub window: EffectiveWindow,
    /// Directory holding the root descriptor.
    pub dir: PathBuf,
}

impl SetDescriptor {
    pub fn new(config_id: &str, version: u32, status: ConfigStatus, dir: impl Into<PathBuf>) -> Self {
        Self {
            config_id: config_id.to_string(),
            version,
            status,
            legal_entity: Dimension::Any,
            window: EffectiveWindow::unbounded(),
            dir: dir.into(),
        }
    }

    pub fn with_legal_entity(mut self, legal_entity: &str) -> Self {
        self.legal_entity = Dimension::parse(Some(legal_entity));
        self
    }

    pub fn with_window(mut self, window: EffectiveWindow) -> Self {
        self.window = window;
        self
    }
}
