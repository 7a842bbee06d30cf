//! Connection manager: bipartite, symmetric adjacency
//!
//! Edges only ever join a check node and a var node. Both endpoints record
//! the other's index, so either side can enumerate its peers.

use crate::error::{GraphError, Result};
use crate::node::{NodeId, NodeKind};
use crate::registry::Graph;
use tracing::trace;

impl Graph {
    /// Connect two nodes of opposite kinds.
    ///
    /// Returns `Ok(true)` if the edge is new and `Ok(false)` if it already
    /// exists or either node is not live. Same-kind endpoints are rejected
    /// with [`GraphError::SameKindConnection`] before anything is touched.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        let (check, var) = canonical(a, b)?;
        if !self.contains(check) || !self.contains(var) {
            return Ok(false);
        }

        let inserted = match self.get_mut(check) {
            Some(node) => node.connections.insert(var.index),
            None => false,
        };
        if !inserted {
            return Ok(false);
        }
        if let Some(node) = self.get_mut(var) {
            node.connections.insert(check.index);
        }
        trace!(%check, %var, "connected");
        Ok(true)
    }

    /// Remove the edge between two nodes; no-op if absent
    pub fn disconnect(&mut self, a: NodeId, b: NodeId) {
        if a.kind == b.kind {
            return;
        }
        if let Some(node) = self.get_mut(a) {
            node.connections.remove(&b.index);
        }
        if let Some(node) = self.get_mut(b) {
            node.connections.remove(&a.index);
        }
    }

    /// Sever every edge of a node. Returns the former peers.
    pub fn disconnect_all(&mut self, id: NodeId) -> Vec<NodeId> {
        let peers: Vec<NodeId> = match self.get(id) {
            Some(node) => node.peers().collect(),
            None => return Vec::new(),
        };
        for &peer in &peers {
            self.disconnect(id, peer);
        }
        peers
    }

    /// Peers of a node; empty if the node is not live
    pub fn peers(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id)
            .map(|node| node.peers().collect())
            .unwrap_or_default()
    }

    pub fn is_connected(&self, a: NodeId, b: NodeId) -> bool {
        self.get(a).is_some_and(|node| node.is_connected_to(b))
    }

    /// Every edge once, as `(check, var)` pairs in arena order of the checks
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.nodes()
            .iter()
            .filter(|node| node.kind() == NodeKind::Check)
            .flat_map(|node| node.peers().map(move |peer| (node.id, peer)))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.nodes()
            .iter()
            .filter(|node| node.kind() == NodeKind::Check)
            .map(|node| node.degree())
            .sum()
    }
}

/// Order an endpoint pair as `(check, var)`
fn canonical(a: NodeId, b: NodeId) -> Result<(NodeId, NodeId)> {
    match (a.kind, b.kind) {
        (NodeKind::Check, NodeKind::Var) => Ok((a, b)),
        (NodeKind::Var, NodeKind::Check) => Ok((b, a)),
        (kind, _) => Err(GraphError::SameKindConnection {
            kind,
            a: a.index,
            b: b.index,
        }),
    }
}
