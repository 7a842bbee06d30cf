//! Snapshot serializer
//!
//! Exported indices are normalized per kind: the smallest live index of a
//! kind becomes 0. Imported indices are taken as-is, so export → import →
//! export is stable.
//!
//! ```json
//! {
//!   "Nodes": [
//!     { "Index": 0, "Type": "CheckNode", "X": 0, "Y": 0, "Connections": [0] },
//!     { "Index": 0, "Type": "VarNode", "X": 1, "Y": 0, "Connections": [0] }
//!   ]
//! }
//! ```

use crate::coords::GridPos;
use crate::error::{GraphError, Result};
use crate::node::{NodeId, NodeKind};
use crate::registry::Graph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Serialized form of a whole graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphRecord {
    #[serde(rename = "Nodes")]
    pub nodes: Vec<NodeRecord>,
}

/// Serialized form of one node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeRecord {
    pub index: u32,
    #[serde(rename = "Type")]
    pub kind: NodeKind,
    pub x: i32,
    pub y: i32,
    #[serde(default)]
    pub connections: Vec<u32>,
}

/// JSON of an empty graph
pub const EMPTY: &str = r#"{"Nodes": []}"#;

/// Build the normalized record of a graph
pub fn export(graph: &Graph) -> GraphRecord {
    let mut base = [u32::MAX; 2];
    for node in graph.nodes() {
        let slot = &mut base[node.kind().slot()];
        *slot = (*slot).min(node.index());
    }
    let delta = |kind: NodeKind| base[kind.slot()];

    let nodes = graph
        .nodes()
        .iter()
        .map(|node| {
            let peer_delta = delta(node.kind().opposite());
            NodeRecord {
                index: node.index() - delta(node.kind()),
                kind: node.kind(),
                x: node.pos.x,
                y: node.pos.y,
                connections: node.connections.iter().map(|&i| i - peer_delta).collect(),
            }
        })
        .collect();

    GraphRecord { nodes }
}

/// Serialize a graph to pretty JSON
pub fn to_json(graph: &Graph) -> Result<String> {
    serde_json::to_string_pretty(&export(graph))
        .map_err(|e| GraphError::Serialize(e.to_string()))
}

/// Rebuild a graph from a record.
///
/// Edges are wired from check records only; var records' connection lists
/// are ignored, which also accepts snapshots written with one-sided storage.
pub fn import(record: &GraphRecord) -> Result<Graph> {
    let mut graph = Graph::new();
    let mut by_index: HashMap<(NodeKind, u32), NodeId> = HashMap::new();

    for rec in &record.nodes {
        let pos = GridPos::new(rec.x, rec.y);
        let id = graph
            .create_node_with_index(rec.kind, rec.index, pos)?
            .ok_or(GraphError::CellCollision(pos))?;
        by_index.insert((rec.kind, rec.index), id);
    }

    for rec in record.nodes.iter().filter(|r| r.kind == NodeKind::Check) {
        let check = by_index[&(NodeKind::Check, rec.index)];
        for &peer in &rec.connections {
            match by_index.get(&(NodeKind::Var, peer)) {
                Some(&var) => {
                    graph.connect(check, var)?;
                }
                None => {
                    warn!(%check, var = peer, "snapshot connection to missing var node skipped")
                }
            }
        }
    }

    Ok(graph)
}

/// Parse snapshot JSON into a graph
pub fn from_json(json: &str) -> Result<Graph> {
    let record: GraphRecord = serde_json::from_str(json)?;
    import(&record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: i32, y: i32) -> GridPos {
        GridPos::new(x, y)
    }

    #[test]
    fn test_field_names() {
        let mut graph = Graph::new();
        let c = graph.create_node(NodeKind::Check, cell(0, 0)).unwrap().unwrap();
        let v = graph.create_node(NodeKind::Var, cell(1, 0)).unwrap().unwrap();
        graph.connect(c, v).unwrap();

        let json = to_json(&graph).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let first = &value["Nodes"][0];
        assert_eq!(first["Index"], 0);
        assert_eq!(first["Type"], "CheckNode");
        assert_eq!(first["X"], 0);
        assert_eq!(first["Y"], 0);
        assert_eq!(first["Connections"], serde_json::json!([0]));
        assert_eq!(value["Nodes"][1]["Type"], "VarNode");
    }

    #[test]
    fn test_export_normalizes_per_kind() {
        let mut graph = Graph::new();
        // Burn indices so the live ones start above zero
        for i in 0..3 {
            let c = graph.create_node(NodeKind::Check, cell(i, 9)).unwrap().unwrap();
            graph.delete_node(c).unwrap();
        }
        let v0 = graph.create_node(NodeKind::Var, cell(0, 9)).unwrap().unwrap();
        graph.delete_node(v0).unwrap();

        let c = graph.create_node(NodeKind::Check, cell(0, 0)).unwrap().unwrap();
        let v = graph.create_node(NodeKind::Var, cell(1, 0)).unwrap().unwrap();
        let w = graph.create_node(NodeKind::Var, cell(2, 0)).unwrap().unwrap();
        assert_eq!((c.index, v.index, w.index), (3, 1, 2));
        graph.connect(c, w).unwrap();

        let record = export(&graph);
        let indices: Vec<_> = record.nodes.iter().map(|n| (n.kind, n.index)).collect();
        assert_eq!(
            indices,
            vec![(NodeKind::Check, 0), (NodeKind::Var, 0), (NodeKind::Var, 1)]
        );
        assert_eq!(record.nodes[0].connections, vec![1]);
        assert_eq!(record.nodes[2].connections, vec![0]);
    }

    #[test]
    fn test_import_keeps_raw_indices() {
        let json = r#"{"Nodes": [
            {"Index": 4, "Type": "CheckNode", "X": 0, "Y": 0, "Connections": [7]},
            {"Index": 7, "Type": "VarNode", "X": 1, "Y": 0, "Connections": []}
        ]}"#;
        let graph = from_json(json).unwrap();

        assert!(graph.contains(NodeId::check(4)));
        assert!(graph.is_connected(NodeId::var(7), NodeId::check(4)));
        assert_eq!(graph.next_index(NodeKind::Check), Some(5));
    }

    #[test]
    fn test_import_missing_peer_skipped() {
        let json = r#"{"Nodes": [
            {"Index": 0, "Type": "CheckNode", "X": 0, "Y": 0, "Connections": [3]}
        ]}"#;
        let graph = from_json(json).unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_import_without_connections_field() {
        let json = r#"{"Nodes": [{"Index": 0, "Type": "VarNode", "X": 2, "Y": 3}]}"#;
        let graph = from_json(json).unwrap();
        assert_eq!(graph.occupant_at(cell(2, 3)), Some(NodeId::var(0)));
    }

    #[test]
    fn test_import_malformed() {
        assert!(matches!(
            from_json("not json"),
            Err(GraphError::MalformedSnapshot(_))
        ));
        assert!(matches!(
            from_json(r#"{"Nodes": [{"Index": 0, "Type": "EdgeNode", "X": 0, "Y": 0}]}"#),
            Err(GraphError::MalformedSnapshot(_))
        ));
    }

    #[test]
    fn test_import_collision_and_duplicate() {
        let collide = r#"{"Nodes": [
            {"Index": 0, "Type": "CheckNode", "X": 0, "Y": 0},
            {"Index": 0, "Type": "VarNode", "X": 0, "Y": 0}
        ]}"#;
        assert!(matches!(from_json(collide), Err(GraphError::CellCollision(_))));

        let dup = r#"{"Nodes": [
            {"Index": 1, "Type": "VarNode", "X": 0, "Y": 0},
            {"Index": 1, "Type": "VarNode", "X": 1, "Y": 0}
        ]}"#;
        assert!(matches!(from_json(dup), Err(GraphError::DuplicateIndex(_))));
    }

    #[test]
    fn test_empty() {
        let graph = from_json(EMPTY).unwrap();
        assert!(graph.is_empty());
        assert_eq!(export(&graph), GraphRecord::default());
    }
}
