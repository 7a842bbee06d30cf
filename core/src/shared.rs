//! Single-writer handle for hosts with more than one thread
//!
//! Every mutation goes through one `Mutex`, so an intent always sees the
//! state its predecessor left behind.

use crate::config::EditorConfig;
use crate::error::Result;
use crate::interaction::{EditorState, Intent, Outcome};
use crate::scene::Scene;
use crate::snapshot::GraphRecord;
use parking_lot::Mutex;
use std::sync::Arc;

/// Cloneable handle to one editor session
#[derive(Debug, Clone, Default)]
pub struct SharedEditor {
    inner: Arc<Mutex<EditorState>>,
}

impl SharedEditor {
    pub fn new(config: &EditorConfig) -> Self {
        Self::from_state(EditorState::with_config(config))
    }

    pub fn from_state(state: EditorState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Apply one intent under the lock
    pub fn dispatch(&self, intent: Intent) -> Result<Outcome> {
        self.inner.lock().apply(intent)
    }

    /// Apply a batch of intents atomically, stopping at the first error
    pub fn dispatch_all<I>(&self, intents: I) -> Result<Vec<Outcome>>
    where
        I: IntoIterator<Item = Intent>,
    {
        let mut state = self.inner.lock();
        intents.into_iter().map(|intent| state.apply(intent)).collect()
    }

    pub fn load(&self, json: &str) -> Result<()> {
        self.inner.lock().load(json)
    }

    pub fn export(&self) -> GraphRecord {
        self.inner.lock().export()
    }

    pub fn to_json(&self) -> Result<String> {
        self.inner.lock().to_json()
    }

    pub fn scene(&self) -> Scene {
        Scene::build(&self.inner.lock())
    }

    /// Run a read-only closure against the state
    pub fn with<R>(&self, f: impl FnOnce(&EditorState) -> R) -> R {
        f(&self.inner.lock())
    }
}
