//! Selection and interaction state machine
//!
//! [`EditorState`] owns the graph, the current selection, the undo history
//! and the display scale. The input adapter turns raw events into
//! [`Intent`]s and feeds them to [`EditorState::apply`] one at a time; each
//! intent runs to completion before the next.

use crate::config::EditorConfig;
use crate::coords::{self, GridPos, Scale};
use crate::error::Result;
use crate::history::{History, Undo};
use crate::node::{NodeId, NodeKind};
use crate::registry::Graph;
use crate::snapshot::{self, GraphRecord};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

/// A discrete user intent delivered by the input adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Click landing on a grid cell (empty or occupied)
    Click { x: i32, y: i32 },
    /// Click at a raw display offset; mapped to a cell with the current scale
    PixelClick { x: i32, y: i32 },
    /// Click landing directly on a node
    NodeClick(NodeId),
    HoverEnter(NodeId),
    HoverLeave(NodeId),
    Key(Key),
    ScaleChanged(u32),
}

/// Keyboard intents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Escape,
    Undo,
    Delete,
}

/// What an intent did to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Structural change; a history entry was appended
    Recorded,
    /// Selection, hover, scale or undo change; history untouched by a record
    Updated,
    /// Benign no-op
    Ignored(NoOp),
}

/// Why an intent was a no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoOp {
    /// Clicked node is already selected
    AlreadySelected,
    /// Intent named a node that is not live
    UnknownNode,
    /// Escape or Delete with nothing selected
    NothingSelected,
    /// Undo with empty history
    HistoryEmpty,
    /// Scale of zero
    InvalidScale,
    /// Hover flag already in the requested state
    Unchanged,
}

/// Complete editor state
#[derive(Debug, Clone)]
pub struct EditorState {
    graph: Graph,
    selected: Option<NodeId>,
    history: History,
    scale: Scale,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorState {
    /// Empty editor at the default scale
    pub fn new() -> Self {
        Self::with_config(&EditorConfig::default())
    }

    pub fn with_config(config: &EditorConfig) -> Self {
        Self {
            graph: Graph::new(),
            selected: None,
            history: History::new(),
            scale: config.scale,
        }
    }

    /// Handle one intent to completion.
    ///
    /// Errors are invariant violations; the intent is abandoned and the
    /// error is handed back to the host.
    pub fn apply(&mut self, intent: Intent) -> Result<Outcome> {
        debug!(?intent, "intent");
        let result = match intent {
            Intent::Click { x, y } => self.click_cell(GridPos::new(x, y)),
            Intent::PixelClick { x, y } => {
                self.click_cell(coords::pixel_to_cell(x, y, self.scale))
            }
            Intent::NodeClick(id) => self.click_node(id),
            Intent::HoverEnter(id) => Ok(self.set_hover(id, true)),
            Intent::HoverLeave(id) => Ok(self.set_hover(id, false)),
            Intent::Key(Key::Escape) => Ok(self.escape()),
            Intent::Key(Key::Delete) => self.delete_selected(),
            Intent::Key(Key::Undo) => self.undo(),
            Intent::ScaleChanged(value) => Ok(self.set_scale(value)),
        };
        match &result {
            Ok(outcome) => debug!(?outcome, "intent handled"),
            Err(err) => error!(%err, ?intent, "intent aborted"),
        }
        result
    }

    /// Click on a grid cell.
    ///
    /// An empty cell first gets a node of the kind opposite to the current
    /// selection (check when nothing is selected); the click then proceeds
    /// as a click on that cell's occupant.
    fn click_cell(&mut self, pos: GridPos) -> Result<Outcome> {
        let created = if self.graph.is_free(pos) {
            let kind = match self.selected_kind() {
                Some(kind) => kind.opposite(),
                None => NodeKind::Check,
            };
            self.graph.create_node(kind, pos)?
        } else {
            None
        };

        let Some(target) = self.graph.occupant_at(pos) else {
            return Ok(Outcome::Ignored(NoOp::UnknownNode));
        };
        if self.selected == Some(target) {
            return Ok(Outcome::Ignored(NoOp::AlreadySelected));
        }

        let connected = self.select_and_connect(target)?;
        if created.is_some() || connected {
            self.record()?;
            Ok(Outcome::Recorded)
        } else {
            Ok(Outcome::Updated)
        }
    }

    /// Click directly on a node
    fn click_node(&mut self, id: NodeId) -> Result<Outcome> {
        if !self.graph.contains(id) {
            return Ok(Outcome::Ignored(NoOp::UnknownNode));
        }
        if self.selected == Some(id) {
            return Ok(Outcome::Ignored(NoOp::AlreadySelected));
        }

        if self.select_and_connect(id)? {
            self.record()?;
            Ok(Outcome::Recorded)
        } else {
            Ok(Outcome::Updated)
        }
    }

    /// Move the selection to `target`, connecting it to the previous
    /// selection when kinds differ. Returns whether a new edge was made.
    fn select_and_connect(&mut self, target: NodeId) -> Result<bool> {
        let mut connected = false;
        if let Some(previous) = self.selected.take() {
            if let Some(node) = self.graph.get_mut(previous) {
                node.selected = false;
                node.highlighted = false;
            }
            if previous.kind != target.kind {
                connected = self.graph.connect(previous, target)?;
            }
        }

        if let Some(node) = self.graph.get_mut(target) {
            node.selected = true;
        }
        self.selected = Some(target);
        Ok(connected)
    }

    fn set_hover(&mut self, id: NodeId, on: bool) -> Outcome {
        match self.graph.get_mut(id) {
            Some(node) if node.highlighted == on => Outcome::Ignored(NoOp::Unchanged),
            Some(node) => {
                node.highlighted = on;
                Outcome::Updated
            }
            None => Outcome::Ignored(NoOp::UnknownNode),
        }
    }

    fn escape(&mut self) -> Outcome {
        match self.selected.take() {
            Some(id) => {
                if let Some(node) = self.graph.get_mut(id) {
                    node.selected = false;
                }
                Outcome::Updated
            }
            None => Outcome::Ignored(NoOp::NothingSelected),
        }
    }

    fn delete_selected(&mut self) -> Result<Outcome> {
        let Some(id) = self.selected else {
            return Ok(Outcome::Ignored(NoOp::NothingSelected));
        };
        self.graph.ensure_indexed(id)?;

        self.selected = None;
        let peers = self.graph.disconnect_all(id);
        self.graph.delete_node(id)?;
        debug!(node = %id, severed = peers.len(), "node deleted");
        self.record()?;
        Ok(Outcome::Recorded)
    }

    fn undo(&mut self) -> Result<Outcome> {
        let graph = match self.history.undo() {
            Undo::Nothing => return Ok(Outcome::Ignored(NoOp::HistoryEmpty)),
            Undo::Emptied => Graph::new(),
            Undo::Restore(entry) => snapshot::from_json(entry)?,
        };
        self.graph = graph;
        self.selected = None;
        info!(entries = self.history.len(), "undo");
        Ok(Outcome::Updated)
    }

    fn set_scale(&mut self, value: u32) -> Outcome {
        match Scale::new(value) {
            Some(scale) => {
                self.scale = scale;
                Outcome::Updated
            }
            None => Outcome::Ignored(NoOp::InvalidScale),
        }
    }

    /// Append a snapshot of the current graph to history
    fn record(&mut self) -> Result<()> {
        let json = snapshot::to_json(&self.graph)?;
        info!(
            entries = self.history.len() + 1,
            nodes = self.graph.len(),
            edges = self.graph.edge_count(),
            "history recorded"
        );
        self.history.record(json);
        Ok(())
    }

    fn selected_kind(&self) -> Option<NodeKind> {
        self.selected.map(|id| id.kind)
    }

    /// Replace the graph with a snapshot.
    ///
    /// Clears the selection and restarts history with the loaded state as
    /// its only entry.
    pub fn load(&mut self, json: &str) -> Result<()> {
        let graph = snapshot::from_json(json)?;
        self.graph = graph;
        self.selected = None;
        self.history.clear();
        self.record()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.selected
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Normalized record of the current graph
    pub fn export(&self) -> GraphRecord {
        snapshot::export(&self.graph)
    }

    pub fn to_json(&self) -> Result<String> {
        snapshot::to_json(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GraphError;

    fn click(state: &mut EditorState, x: i32, y: i32) -> Outcome {
        state.apply(Intent::Click { x, y }).unwrap()
    }

    fn key(state: &mut EditorState, key: Key) -> Outcome {
        state.apply(Intent::Key(key)).unwrap()
    }

    #[test]
    fn test_first_click_creates_check() {
        let mut state = EditorState::new();

        assert_eq!(click(&mut state, 0, 0), Outcome::Recorded);
        assert_eq!(state.selected(), Some(NodeId::check(0)));
        assert!(state.graph().get(NodeId::check(0)).unwrap().selected);
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_empty_click_alternates_kind_and_connects() {
        let mut state = EditorState::new();
        click(&mut state, 0, 0);
        click(&mut state, 1, 0);

        let (c, v) = (NodeId::check(0), NodeId::var(0));
        assert!(state.graph().is_connected(c, v));
        assert_eq!(state.selected(), Some(v));
        assert!(!state.graph().get(c).unwrap().selected);

        // Var selected: the next empty click makes a check
        click(&mut state, 2, 0);
        assert!(state.graph().is_connected(NodeId::check(1), v));
        assert_eq!(state.history().len(), 3);
    }

    #[test]
    fn test_click_selected_cell_is_absorbed() {
        let mut state = EditorState::new();
        click(&mut state, 0, 0);

        assert_eq!(click(&mut state, 0, 0), Outcome::Ignored(NoOp::AlreadySelected));
        assert_eq!(
            state.apply(Intent::NodeClick(NodeId::check(0))).unwrap(),
            Outcome::Ignored(NoOp::AlreadySelected)
        );
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_node_click_same_kind_only_moves_selection() {
        let mut state = EditorState::new();
        click(&mut state, 0, 0);
        key(&mut state, Key::Escape);
        click(&mut state, 5, 5);

        let outcome = state.apply(Intent::NodeClick(NodeId::check(0))).unwrap();
        assert_eq!(outcome, Outcome::Updated);
        assert_eq!(state.selected(), Some(NodeId::check(0)));
        assert_eq!(state.graph().edge_count(), 0);
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_node_click_duplicate_edge_not_recorded() {
        let mut state = EditorState::new();
        click(&mut state, 0, 0);
        click(&mut state, 1, 0);
        let before = state.history().len();

        let outcome = state.apply(Intent::NodeClick(NodeId::check(0))).unwrap();
        assert_eq!(outcome, Outcome::Updated);
        assert_eq!(state.history().len(), before);
    }

    #[test]
    fn test_hover_does_not_touch_history() {
        let mut state = EditorState::new();
        click(&mut state, 0, 0);
        let id = NodeId::check(0);

        assert_eq!(state.apply(Intent::HoverEnter(id)).unwrap(), Outcome::Updated);
        assert!(state.graph().get(id).unwrap().highlighted);
        assert_eq!(
            state.apply(Intent::HoverEnter(id)).unwrap(),
            Outcome::Ignored(NoOp::Unchanged)
        );
        assert_eq!(state.apply(Intent::HoverLeave(id)).unwrap(), Outcome::Updated);
        assert_eq!(
            state.apply(Intent::HoverEnter(NodeId::var(3))).unwrap(),
            Outcome::Ignored(NoOp::UnknownNode)
        );
        assert_eq!(state.history().len(), 1);
    }

    #[test]
    fn test_escape() {
        let mut state = EditorState::new();
        assert_eq!(key(&mut state, Key::Escape), Outcome::Ignored(NoOp::NothingSelected));

        click(&mut state, 0, 0);
        assert_eq!(key(&mut state, Key::Escape), Outcome::Updated);
        assert_eq!(state.selected(), None);
        assert!(!state.graph().get(NodeId::check(0)).unwrap().selected);

        // With nothing selected the next empty click is a check again
        click(&mut state, 3, 0);
        assert_eq!(state.selected(), Some(NodeId::check(1)));
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut state = EditorState::new();
        assert_eq!(key(&mut state, Key::Delete), Outcome::Ignored(NoOp::NothingSelected));
        assert!(state.history().is_empty());
    }

    #[test]
    fn test_delete_cascades() {
        let mut state = EditorState::new();
        click(&mut state, 0, 0); // check 0
        click(&mut state, 1, 0); // var 0, connected
        state.apply(Intent::NodeClick(NodeId::check(0))).unwrap();
        click(&mut state, 0, 1); // var 1, connected
        state.apply(Intent::NodeClick(NodeId::check(0))).unwrap();

        assert_eq!(state.graph().peers(NodeId::check(0)).len(), 2);
        assert_eq!(key(&mut state, Key::Delete), Outcome::Recorded);

        assert_eq!(state.selected(), None);
        assert!(!state.graph().contains(NodeId::check(0)));
        assert_eq!(state.graph().edge_count(), 0);
        let record = state.export();
        assert!(record.nodes.iter().all(|n| n.kind == NodeKind::Var));
        assert!(record.nodes.iter().all(|n| n.connections.is_empty()));
    }

    #[test]
    fn test_failed_delete_leaves_state_untouched() {
        let mut state = EditorState::new();
        click(&mut state, 0, 0); // check 0
        click(&mut state, 1, 0); // var 0, connected
        let var = NodeId::var(0);
        state.graph.forget_cell(GridPos::new(1, 0));

        let result = state.apply(Intent::Key(Key::Delete));
        assert!(matches!(result, Err(GraphError::CellNotIndexed { .. })));
        assert_eq!(state.selected(), Some(var));
        assert!(state.graph().contains(var));
        assert!(state.graph().is_connected(NodeId::check(0), var));
        assert_eq!(state.history().len(), 2);
    }

    #[test]
    fn test_click_after_max_index_load_is_fatal() {
        let mut state = EditorState::new();
        state
            .load(r#"{"Nodes":[{"Index":4294967295,"Type":"CheckNode","X":0,"Y":0}]}"#)
            .unwrap();

        let result = state.apply(Intent::Click { x: 5, y: 5 });
        assert!(matches!(
            result,
            Err(GraphError::IndexExhausted(NodeKind::Check))
        ));
        assert_eq!(state.graph().count(NodeKind::Check), 1);
        assert!(state.graph().is_free(GridPos::new(5, 5)));
        assert_eq!(state.selected(), None);
        assert_eq!(state.history().len(), 1);

        // Selecting the loaded check makes the next empty click a var
        state.apply(Intent::Click { x: 0, y: 0 }).unwrap();
        assert_eq!(click(&mut state, 5, 5), Outcome::Recorded);
        assert!(state
            .graph()
            .is_connected(NodeId::check(u32::MAX), NodeId::var(0)));
    }

    #[test]
    fn test_undo_restores_previous_entry() {
        let mut state = EditorState::new();
        click(&mut state, 0, 0);
        click(&mut state, 1, 0);

        assert_eq!(key(&mut state, Key::Undo), Outcome::Updated);
        assert_eq!(state.graph().len(), 1);
        assert_eq!(state.graph().edge_count(), 0);
        assert_eq!(state.selected(), None);

        assert_eq!(key(&mut state, Key::Undo), Outcome::Updated);
        assert!(state.graph().is_empty());

        assert_eq!(key(&mut state, Key::Undo), Outcome::Ignored(NoOp::HistoryEmpty));
        assert!(state.graph().is_empty());
    }

    #[test]
    fn test_scale_and_pixel_click() {
        let mut state = EditorState::new();
        assert_eq!(
            state.apply(Intent::ScaleChanged(0)).unwrap(),
            Outcome::Ignored(NoOp::InvalidScale)
        );
        assert_eq!(state.apply(Intent::ScaleChanged(10)).unwrap(), Outcome::Updated);
        assert_eq!(state.scale().get(), 10);

        // 30 display units per cell at scale 10
        state.apply(Intent::PixelClick { x: 62, y: 89 }).unwrap();
        assert_eq!(state.graph().occupant_at(GridPos::new(2, 3)), Some(NodeId::check(0)));
    }

    #[test]
    fn test_load_resets_history() {
        let mut state = EditorState::new();
        click(&mut state, 0, 0);
        click(&mut state, 1, 0);

        let json = state.to_json().unwrap();
        let mut other = EditorState::new();
        other.load(&json).unwrap();

        assert_eq!(other.export(), state.export());
        assert_eq!(other.history().len(), 1);
        assert_eq!(key(&mut other, Key::Undo), Outcome::Updated);
        assert!(other.graph().is_empty());
    }

    #[test]
    fn test_intent_serde() {
        let intents: Vec<Intent> = serde_json::from_str(
            r#"[
                {"click": {"x": 1, "y": 2}},
                {"node_click": {"kind": "VarNode", "index": 0}},
                {"key": "undo"},
                {"scale_changed": 12}
            ]"#,
        )
        .unwrap();
        assert_eq!(
            intents,
            vec![
                Intent::Click { x: 1, y: 2 },
                Intent::NodeClick(NodeId::var(0)),
                Intent::Key(Key::Undo),
                Intent::ScaleChanged(12),
            ]
        );
    }
}
