//! User-authored graphs and live traversal animation
//!
//! The graph is built interactively (nodes, edges, weights, start/target
//! selection) and then traversed by an animator that reveals one primitive
//! operation at a time, pausable and cancellable between micro-steps.

pub mod model;
pub mod traversal;

use thiserror::Error;

// Re-exports
pub use model::{DistanceLabel, Edge, EdgeId, Graph, Node, NodeId, Position};
pub use traversal::{TraversalAlgorithm, TraversalAnimator, TraversalOutcome};

/// Errors for graph editing and traversal preconditions.
///
/// Terminal run statuses ("no path found", "stopped") are not errors; they
/// are reported through [`TraversalOutcome`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("an edge between {0} and {1} already exists")]
    DuplicateEdge(NodeId, NodeId),

    #[error("self-loops are not allowed (node {0})")]
    SelfLoop(NodeId),

    #[error("the graph has no nodes")]
    EmptyGraph,

    /// Shortest-path traversals need both a start and a target selection.
    #[error("start and target selection required")]
    SelectionRequired,

    #[error("unknown traversal algorithm '{0}' (available: bfs, dfs, dijkstra, bellman-ford, astar)")]
    UnknownAlgorithm(String),
}
