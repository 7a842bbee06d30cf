//! Node types for the bipartite grid graph

use crate::coords::GridPos;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The two sides of a Tanner graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeKind {
    /// Parity check (drawn as a square)
    #[serde(rename = "CheckNode")]
    Check,
    /// Code bit (drawn as a circle)
    #[serde(rename = "VarNode")]
    Var,
}

impl NodeKind {
    pub const ALL: [NodeKind; 2] = [NodeKind::Check, NodeKind::Var];

    /// The kind a node of this kind may connect to
    pub fn opposite(self) -> Self {
        match self {
            NodeKind::Check => NodeKind::Var,
            NodeKind::Var => NodeKind::Check,
        }
    }

    pub(crate) fn slot(self) -> usize {
        match self {
            NodeKind::Check => 0,
            NodeKind::Var => 1,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Check => write!(f, "CheckNode"),
            NodeKind::Var => write!(f, "VarNode"),
        }
    }
}

impl FromStr for NodeKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "checknode" | "check" => Ok(NodeKind::Check),
            "varnode" | "var" => Ok(NodeKind::Var),
            _ => Err(format!("Unknown node kind: {}", s)),
        }
    }
}

/// Identity of a node: unique per (kind, index)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId {
    pub kind: NodeKind,
    pub index: u32,
}

impl NodeId {
    pub const fn new(kind: NodeKind, index: u32) -> Self {
        Self { kind, index }
    }

    pub const fn check(index: u32) -> Self {
        Self::new(NodeKind::Check, index)
    }

    pub const fn var(index: u32) -> Self {
        Self::new(NodeKind::Var, index)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.kind, self.index)
    }
}

/// A node placed on the grid.
///
/// `connections` holds peer indices of the opposite kind and is kept
/// symmetric by the connection manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub pos: GridPos,
    pub selected: bool,
    pub highlighted: bool,
    pub(crate) connections: BTreeSet<u32>,
}

impl Node {
    pub(crate) fn new(id: NodeId, pos: GridPos) -> Self {
        Self {
            id,
            pos,
            selected: false,
            highlighted: false,
            connections: BTreeSet::new(),
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.id.kind
    }

    pub fn index(&self) -> u32 {
        self.id.index
    }

    /// Peers, as ids of the opposite kind
    pub fn peers(&self) -> impl Iterator<Item = NodeId> + '_ {
        let kind = self.kind().opposite();
        self.connections.iter().map(move |&i| NodeId::new(kind, i))
    }

    pub fn is_connected_to(&self, other: NodeId) -> bool {
        other.kind != self.kind() && self.connections.contains(&other.index)
    }

    pub fn degree(&self) -> usize {
        self.connections.len()
    }
}
