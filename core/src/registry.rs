//! Node registry: owns every node, indexed by id and by grid cell

use crate::coords::GridPos;
use crate::error::{GraphError, Result};
use crate::node::{Node, NodeId, NodeKind};
use std::collections::HashMap;
use tracing::trace;

/// All nodes of one editor graph.
///
/// Nodes live in a single arena in creation order. Two indexes point into it:
/// `slots` by id and `occupancy` by cell. At most one node occupies a cell.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub(crate) nodes: Vec<Node>,
    slots: HashMap<NodeId, usize>,
    occupancy: HashMap<GridPos, NodeId>,
    // One past the highest index seen; reaches `u32::MAX + 1` when spent
    next_index: [u64; 2],
}

impl Graph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a new node, minting the next unused index for `kind`.
    ///
    /// Returns `Ok(None)` if the cell is already occupied, and
    /// [`GraphError::IndexExhausted`] once every index of `kind` is spent.
    pub fn create_node(&mut self, kind: NodeKind, pos: GridPos) -> Result<Option<NodeId>> {
        if self.occupancy.contains_key(&pos) {
            return Ok(None);
        }
        let index = self
            .next_index(kind)
            .ok_or(GraphError::IndexExhausted(kind))?;
        let id = NodeId::new(kind, index);
        self.insert(Node::new(id, pos));
        Ok(Some(id))
    }

    /// Place a node under a caller-chosen index.
    ///
    /// Used when loading a snapshot. Same occupancy rule as [`Graph::create_node`];
    /// reusing a live `(kind, index)` is an error.
    pub fn create_node_with_index(
        &mut self,
        kind: NodeKind,
        index: u32,
        pos: GridPos,
    ) -> Result<Option<NodeId>> {
        let id = NodeId::new(kind, index);
        if self.slots.contains_key(&id) {
            return Err(GraphError::DuplicateIndex(id));
        }
        if self.occupancy.contains_key(&pos) {
            return Ok(None);
        }
        self.insert(Node::new(id, pos));
        Ok(Some(id))
    }

    fn insert(&mut self, node: Node) {
        let id = node.id;
        let counter = &mut self.next_index[id.kind.slot()];
        *counter = (*counter).max(u64::from(id.index) + 1);

        trace!(node = %id, pos = %node.pos, "node created");
        self.occupancy.insert(node.pos, id);
        self.slots.insert(id, self.nodes.len());
        self.nodes.push(node);
    }

    /// Remove a node from the registry.
    ///
    /// Does not touch peers; sever edges with
    /// [`Graph::disconnect_all`](crate::Graph::disconnect_all) first.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Node> {
        let slot = self.ensure_indexed(id)?;
        let pos = self.nodes[slot].pos;
        self.occupancy.remove(&pos);
        self.slots.remove(&id);
        let node = self.nodes.swap_remove(slot);
        if let Some(moved) = self.nodes.get(slot) {
            self.slots.insert(moved.id, slot);
        }
        trace!(node = %id, pos = %pos, "node deleted");
        Ok(node)
    }

    /// Check that `id` is live and owns the occupancy entry of its cell.
    ///
    /// Returns the node's arena slot.
    pub fn ensure_indexed(&self, id: NodeId) -> Result<usize> {
        let slot = *self.slots.get(&id).ok_or(GraphError::NodeNotFound(id))?;
        let pos = self.nodes[slot].pos;
        match self.occupancy.get(&pos) {
            Some(occupant) if *occupant == id => Ok(slot),
            _ => Err(GraphError::CellNotIndexed { id, pos }),
        }
    }

    /// The node on a cell, if any
    pub fn occupant_at(&self, pos: GridPos) -> Option<NodeId> {
        self.occupancy.get(&pos).copied()
    }

    pub fn is_free(&self, pos: GridPos) -> bool {
        !self.occupancy.contains_key(&pos)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(&id).map(|&slot| &self.nodes[slot])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        match self.slots.get(&id) {
            Some(&slot) => Some(&mut self.nodes[slot]),
            None => None,
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.slots.contains_key(&id)
    }

    /// Live nodes in arena order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of live nodes of one kind
    pub fn count(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind() == kind).count()
    }

    /// Index the next [`Graph::create_node`] of `kind` will mint, or `None`
    /// when the kind's index space is used up
    pub fn next_index(&self, kind: NodeKind) -> Option<u32> {
        u32::try_from(self.next_index[kind.slot()]).ok()
    }

    #[cfg(test)]
    pub(crate) fn forget_cell(&mut self, pos: GridPos) {
        self.occupancy.remove(&pos);
    }
}
