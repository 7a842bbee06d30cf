//! Editor configuration

use crate::coords::Scale;
use serde::{Deserialize, Serialize};

/// Settings an editor session starts with
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Initial zoom factor
    pub scale: Scale,
}

impl EditorConfig {
    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }
}
