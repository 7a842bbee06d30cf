//! Error types for the graph engine
//!
//! Every variant here is an invariant violation. Benign no-ops (clicking an
//! occupied cell, a duplicate connect, undo with empty history) never produce
//! a `GraphError`; they come back as `Ok` values instead.

use crate::node::{NodeId, NodeKind};
use crate::coords::GridPos;
use thiserror::Error;

/// Graph engine error types
#[derive(Debug, Error)]
pub enum GraphError {
    /// A live node's cell is missing from the occupancy index
    #[error("cell {pos} expected to be occupied by {id}")]
    CellNotIndexed { id: NodeId, pos: GridPos },

    /// Node expected in the registry but absent
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Attempted to connect two nodes of the same kind
    #[error("can't connect same node kinds: {kind} {a} -> {b}")]
    SameKindConnection { kind: NodeKind, a: u32, b: u32 },

    /// Two nodes of one kind share an index
    #[error("duplicate index: {0}")]
    DuplicateIndex(NodeId),

    /// Every index of a kind is taken
    #[error("no free index left for {0}")]
    IndexExhausted(NodeKind),

    /// Two snapshot records claim the same cell
    #[error("cell {0} claimed twice in snapshot")]
    CellCollision(GridPos),

    /// Snapshot payload could not be parsed
    #[error("malformed snapshot: {0}")]
    MalformedSnapshot(#[from] serde_json::Error),

    /// Failed to serialize the live graph
    #[error("serialization error: {0}")]
    Serialize(String),
}

/// Result alias used across the engine
pub type Result<T> = std::result::Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_same_kind() {
        let err = GraphError::SameKindConnection {
            kind: NodeKind::Check,
            a: 0,
            b: 1,
        };
        assert_eq!(
            err.to_string(),
            "can't connect same node kinds: CheckNode 0 -> 1"
        );
    }

    #[test]
    fn test_display_cell() {
        let err = GraphError::CellCollision(GridPos::new(2, -1));
        assert_eq!(err.to_string(), "cell (2, -1) claimed twice in snapshot");
    }

    #[test]
    fn test_display_exhausted() {
        let err = GraphError::IndexExhausted(NodeKind::Var);
        assert_eq!(err.to_string(), "no free index left for VarNode");
    }

    #[test]
    fn test_malformed_from_json() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: GraphError = parse.into();
        assert!(matches!(err, GraphError::MalformedSnapshot(_)));
    }
}
