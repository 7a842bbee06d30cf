use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as AnyhowContext, Result};
use serde::Deserialize;
use tanner_core::{EditorConfig, EditorState, Intent, Outcome};
use tracing::{debug, info};

/// Replay settings, read from YAML
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReplayConfig {
    #[serde(flatten)]
    pub editor: EditorConfig,
    /// Print every history entry as it is recorded
    pub history: bool,
    /// Default log filter when `RUST_LOG` is unset
    pub log_level: Option<String>,
}

/// One replay run
#[derive(Debug, Default)]
pub struct ReplayJob {
    pub script: PathBuf,
    pub load: Option<PathBuf>,
    pub config: ReplayConfig,
}

/// What a replay produced
#[derive(Debug)]
pub struct Report {
    pub outcomes: Vec<Outcome>,
    /// History entries in order, including any loaded snapshot
    pub history: Vec<String>,
    /// Final snapshot JSON
    pub snapshot: String,
}

pub fn load_config(path: &Path) -> Result<ReplayConfig> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config = serde_yaml::from_str(&s).with_context(|| format!("parse {}", path.display()))?;
    Ok(config)
}

/// Parse a script: a YAML sequence of intents.
///
/// ```yaml
/// - !click {x: 0, y: 0}
/// - !node_click {kind: VarNode, index: 0}
/// - !key undo
/// ```
pub fn parse_script(s: &str) -> Result<Vec<Intent>> {
    if s.trim().is_empty() {
        return Ok(Vec::new());
    }
    Ok(serde_yaml::from_str(s)?)
}

pub fn load_script(path: &Path) -> Result<Vec<Intent>> {
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_script(&s).with_context(|| format!("parse {}", path.display()))
}

/// Run intents against a fresh editor, optionally seeded from a snapshot
pub fn replay(config: &EditorConfig, initial: Option<&str>, intents: &[Intent]) -> Result<Report> {
    let mut editor = EditorState::with_config(config);
    if let Some(json) = initial {
        editor.load(json).context("load initial snapshot")?;
        info!(nodes = editor.graph().len(), "initial snapshot loaded");
    }

    let mut outcomes = Vec::with_capacity(intents.len());
    for (step, intent) in intents.iter().enumerate() {
        let outcome = editor
            .apply(*intent)
            .with_context(|| format!("step {}: {:?}", step + 1, intent))?;
        debug!(step = step + 1, ?outcome);
        outcomes.push(outcome);
    }

    Ok(Report {
        outcomes,
        history: editor.history().entries().to_vec(),
        snapshot: editor.to_json()?,
    })
}

/// Read the job's files and replay them
pub fn replay_files(job: &ReplayJob) -> Result<Report> {
    let intents = load_script(&job.script)?;
    let initial = match &job.load {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("read {}", path.display()))?;
            Some(json)
        }
        None => None,
    };
    info!(script = %job.script.display(), intents = intents.len(), "replaying");
    replay(&job.config.editor, initial.as_deref(), &intents)
}
