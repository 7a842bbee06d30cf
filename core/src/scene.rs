//! Render-facing view of the editor
//!
//! A [`Scene`] is rebuilt from scratch after each mutation. It carries
//! everything a drawing layer needs and nothing it could mutate.

use crate::coords::{self, GridPos};
use crate::interaction::EditorState;
use crate::node::{NodeId, NodeKind};
use serde::Serialize;

/// One node as the renderer sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneNode {
    pub id: NodeId,
    pub kind: NodeKind,
    pub cell: GridPos,
    /// Display-space center
    pub center: (i64, i64),
    pub selected: bool,
    pub highlighted: bool,
}

/// One edge as a pair of display-space endpoints (check first)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SceneEdge {
    pub from: (i64, i64),
    pub to: (i64, i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Scene {
    pub scale: u32,
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

impl Scene {
    pub fn build(state: &EditorState) -> Self {
        let scale = state.scale();
        let graph = state.graph();

        let nodes = graph
            .nodes()
            .iter()
            .map(|node| SceneNode {
                id: node.id,
                kind: node.kind(),
                cell: node.pos,
                center: coords::cell_to_pixel(node.pos, scale),
                selected: node.selected,
                highlighted: node.highlighted,
            })
            .collect();

        let edges = graph
            .edges()
            .into_iter()
            .filter_map(|(check, var)| {
                let a = graph.get(check)?.pos;
                let b = graph.get(var)?.pos;
                Some(SceneEdge {
                    from: coords::cell_to_pixel(a, scale),
                    to: coords::cell_to_pixel(b, scale),
                })
            })
            .collect();

        Self {
            scale: scale.get(),
            nodes,
            edges,
        }
    }
}
