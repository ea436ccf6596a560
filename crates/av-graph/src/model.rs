//! Graph entities: nodes, edges, and their editing rules
//!
//! Nodes keep their insertion order (traversal tie-breaking depends on it)
//! and carry the display flags the animator mutates live. Edge creation
//! enforces the editing rules: endpoints must exist, no self-loops, no
//! duplicate edge between the same pair.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::GraphError;

/// Weight assumed for edges with no explicit weight.
pub const DEFAULT_EDGE_WEIGHT: u32 = 1;

/// Edge weights are clamped into `MIN_EDGE_WEIGHT..=MAX_EDGE_WEIGHT`.
pub const MIN_EDGE_WEIGHT: u32 = 1;
pub const MAX_EDGE_WEIGHT: u32 = 99;

/// Identifier of a user-authored node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of an edge, unique within its graph.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct EdgeId(pub u32);

/// Display position of a node on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(self, other: Position) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Tentative-distance annotation shown beside a node during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DistanceLabel {
    /// Not yet reached.
    Infinite,
    /// Known path cost from the start node.
    Cost { g: u64 },
    /// Path cost plus heuristic estimate (A*).
    Estimate { g: u64, h: u64 },
}

/// A user-authored node with its live display flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub label: String,
    pub visited: bool,
    pub active: bool,
    pub frontier: bool,
    pub distance: Option<DistanceLabel>,
}

/// A user-authored edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    /// Optional weight; traversals assume [`DEFAULT_EDGE_WEIGHT`] when unset.
    pub weight: Option<u32>,
    pub directed: bool,
    pub active: bool,
}

impl Edge {
    pub fn weight_or_default(&self) -> u64 {
        self.weight.unwrap_or(DEFAULT_EDGE_WEIGHT) as u64
    }

    /// Whether this edge connects `from` to `to` under the given direction
    /// mode (either orientation matches when undirected).
    fn connects(&self, from: NodeId, to: NodeId, directed: bool) -> bool {
        (self.from == from && self.to == to) || (!directed && self.from == to && self.to == from)
    }
}

/// The shared graph a traversal animates against.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    edges: Vec<Edge>,
    directed: bool,
    next_node_id: u32,
    next_edge_id: u32,
}

impl Graph {
    /// Create an empty undirected graph.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Switch direction mode, rewriting the flag on every existing edge.
    pub fn set_directed(&mut self, directed: bool) {
        self.directed = directed;
        for edge in &mut self.edges {
            edge.directed = directed;
        }
    }

    /// Add a node, assigning the next id and an `A, B, ... Z, A1, ...` label.
    pub fn add_node(&mut self, position: Position) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.insert(
            id,
            Node {
                id,
                position,
                label: node_label(id.0),
                visited: false,
                active: false,
                frontier: false,
                distance: None,
            },
        );
        id
    }

    /// Add an unweighted edge between two existing nodes.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<EdgeId, GraphError> {
        self.insert_edge(from, to, None)
    }

    /// Add a weighted edge; the weight is clamped to the valid range.
    pub fn add_weighted_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        weight: u32,
    ) -> Result<EdgeId, GraphError> {
        self.insert_edge(from, to, Some(clamp_weight(weight)))
    }

    fn insert_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        weight: Option<u32>,
    ) -> Result<EdgeId, GraphError> {
        if !self.nodes.contains_key(&from) {
            return Err(GraphError::UnknownNode(from));
        }
        if !self.nodes.contains_key(&to) {
            return Err(GraphError::UnknownNode(to));
        }
        if from == to {
            return Err(GraphError::SelfLoop(from));
        }
        if self
            .edges
            .iter()
            .any(|edge| edge.connects(from, to, self.directed))
        {
            return Err(GraphError::DuplicateEdge(from, to));
        }

        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges.push(Edge {
            id,
            from,
            to,
            weight,
            directed: self.directed,
            active: false,
        });
        Ok(id)
    }

    /// Update an edge weight, clamped to the valid range. Returns false when
    /// the edge does not exist.
    pub fn set_edge_weight(&mut self, id: EdgeId, weight: u32) -> bool {
        match self.edges.iter_mut().find(|edge| edge.id == id) {
            Some(edge) => {
                edge.weight = Some(clamp_weight(weight));
                true
            }
            None => false,
        }
    }

    /// Remove an edge by id. Returns false when it does not exist.
    pub fn remove_edge(&mut self, id: EdgeId) -> bool {
        let before = self.edges.len();
        self.edges.retain(|edge| edge.id != id);
        self.edges.len() != before
    }

    /// Drop all nodes and edges and restart id assignment.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.next_node_id = 0;
        self.next_edge_id = 0;
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The edge connecting `from` to `to` under the current direction mode.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.edges
            .iter()
            .find(|edge| edge.connects(from, to, self.directed))
    }

    /// Neighbors of a node in edge-insertion order.
    ///
    /// In directed mode only outgoing edges count; in undirected mode the
    /// node's other endpoint on every touching edge.
    pub fn neighbors(&self, id: NodeId) -> Vec<NodeId> {
        let mut neighbors = Vec::new();
        for edge in &self.edges {
            if edge.from == id {
                neighbors.push(edge.to);
            } else if !self.directed && edge.to == id {
                neighbors.push(edge.from);
            }
        }
        neighbors
    }

    /// Clear every display flag and distance annotation, keeping topology.
    pub fn reset_colors(&mut self) {
        for node in self.nodes.values_mut() {
            node.visited = false;
            node.active = false;
            node.frontier = false;
            node.distance = None;
        }
        for edge in &mut self.edges {
            edge.active = false;
        }
    }

    pub fn set_active(&mut self, id: NodeId, on: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.active = on;
        }
    }

    pub fn set_visited(&mut self, id: NodeId, on: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.visited = on;
        }
    }

    pub fn set_frontier(&mut self, id: NodeId, on: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.frontier = on;
        }
    }

    pub fn set_distance(&mut self, id: NodeId, label: Option<DistanceLabel>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.distance = label;
        }
    }

    pub fn set_edge_active(&mut self, id: EdgeId, on: bool) {
        if let Some(edge) = self.edges.iter_mut().find(|edge| edge.id == id) {
            edge.active = on;
        }
    }

    /// Flag the edge connecting two nodes, if any.
    pub fn set_edge_active_between(&mut self, from: NodeId, to: NodeId, on: bool) {
        let directed = self.directed;
        if let Some(edge) = self
            .edges
            .iter_mut()
            .find(|edge| edge.connects(from, to, directed))
        {
            edge.active = on;
        }
    }
}

fn clamp_weight(weight: u32) -> u32 {
    weight.clamp(MIN_EDGE_WEIGHT, MAX_EDGE_WEIGHT)
}

fn node_label(index: u32) -> String {
    let letter = (b'A' + (index % 26) as u8) as char;
    if index >= 26 {
        format!("{}{}", letter, index / 26)
    } else {
        letter.to_string()
    }
}
