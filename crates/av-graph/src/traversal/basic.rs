//! Breadth-first and depth-first traversal

use std::collections::VecDeque;
use std::sync::Arc;

use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;

use av_core::{Cancelled, RunControl};

use super::{trace_path, TraversalOutcome};
use crate::model::{Graph, NodeId};

/// FIFO traversal from `start`; with a target, stops on the dequeue that
/// reaches it and reconstructs the discovered path.
pub(super) async fn bfs(
    graph: &Arc<RwLock<Graph>>,
    control: &RunControl,
    start: NodeId,
    target: Option<NodeId>,
) -> Result<TraversalOutcome, Cancelled> {
    let mut queue = VecDeque::from([start]);
    let mut discovered: AHashSet<NodeId> = AHashSet::default();
    let mut previous: AHashMap<NodeId, NodeId> = AHashMap::default();
    let mut order = Vec::new();
    discovered.insert(start);

    graph.write().set_frontier(start, true);
    control.checkpoint().await?;

    while let Some(current) = queue.pop_front() {
        {
            let mut g = graph.write();
            g.set_frontier(current, false);
            g.set_active(current, true);
        }
        control.checkpoint().await?;

        if Some(current) == target {
            let mut g = graph.write();
            let path = trace_path(&mut g, &previous, start, current);
            return Ok(TraversalOutcome::PathFound { path, cost: None });
        }

        let neighbors = graph.read().neighbors(current);
        for neighbor in neighbors {
            if discovered.insert(neighbor) {
                previous.insert(neighbor, current);
                queue.push_back(neighbor);
                {
                    let mut g = graph.write();
                    g.set_edge_active_between(current, neighbor, true);
                    g.set_frontier(neighbor, true);
                }
                control.checkpoint().await?;
            }
        }

        {
            let mut g = graph.write();
            g.set_active(current, false);
            g.set_visited(current, true);
        }
        order.push(current);
        control.checkpoint().await?;
    }

    Ok(match target {
        Some(_) => TraversalOutcome::NoPathFound,
        None => TraversalOutcome::Traversed { order },
    })
}

/// One in-progress node of the iterative depth-first descent.
struct Frame {
    node: NodeId,
    next_neighbor: usize,
}

/// Depth-first descent as an explicit work-stack.
///
/// A target match returns immediately, unwinding the remaining frames; the
/// found/not-found result is threaded through the return value rather than
/// a shared flag.
pub(super) async fn dfs(
    graph: &Arc<RwLock<Graph>>,
    control: &RunControl,
    start: NodeId,
    target: Option<NodeId>,
) -> Result<TraversalOutcome, Cancelled> {
    let mut visited: AHashSet<NodeId> = AHashSet::default();
    let mut previous: AHashMap<NodeId, NodeId> = AHashMap::default();
    let mut order = Vec::new();
    let mut stack = vec![Frame { node: start, next_neighbor: 0 }];
    visited.insert(start);

    graph.write().set_active(start, true);
    control.checkpoint().await?;

    if Some(start) == target {
        let mut g = graph.write();
        let path = trace_path(&mut g, &previous, start, start);
        return Ok(TraversalOutcome::PathFound { path, cost: None });
    }

    loop {
        // Pick the next unvisited neighbor of the node on top of the stack.
        let (node, descend_into) = {
            let Some(frame) = stack.last_mut() else { break };
            let neighbors = graph.read().neighbors(frame.node);
            let mut chosen = None;
            while frame.next_neighbor < neighbors.len() {
                let candidate = neighbors[frame.next_neighbor];
                frame.next_neighbor += 1;
                if !visited.contains(&candidate) {
                    chosen = Some(candidate);
                    break;
                }
            }
            (frame.node, chosen)
        };

        match descend_into {
            Some(neighbor) => {
                visited.insert(neighbor);
                previous.insert(neighbor, node);

                graph.write().set_edge_active_between(node, neighbor, true);
                control.checkpoint().await?;

                graph.write().set_active(neighbor, true);
                control.checkpoint().await?;

                if Some(neighbor) == target {
                    let mut g = graph.write();
                    let path = trace_path(&mut g, &previous, start, neighbor);
                    return Ok(TraversalOutcome::PathFound { path, cost: None });
                }

                stack.push(Frame { node: neighbor, next_neighbor: 0 });
            }
            None => {
                // Neighbors exhausted: retire the node and unwind one frame.
                {
                    let mut g = graph.write();
                    g.set_active(node, false);
                    g.set_visited(node, true);
                }
                order.push(node);
                control.checkpoint().await?;
                stack.pop();
            }
        }
    }

    Ok(match target {
        Some(_) => TraversalOutcome::NoPathFound,
        None => TraversalOutcome::Traversed { order },
    })
}
