//! Weighted shortest-path traversals: Dijkstra, Bellman-Ford, A*

use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;

use av_core::{Cancelled, RunControl};

use super::{trace_path, TraversalOutcome};
use crate::model::{DistanceLabel, EdgeId, Graph, NodeId};

const INFINITY: u64 = u64::MAX;

/// Normalization divisor applied to the Euclidean display-coordinate
/// distance used as the A* heuristic.
const HEURISTIC_SCALE: f32 = 50.0;

fn init_distances(node_ids: &[NodeId], start: NodeId) -> AHashMap<NodeId, u64> {
    node_ids
        .iter()
        .map(|&id| (id, if id == start { 0 } else { INFINITY }))
        .collect()
}

fn distance(scores: &AHashMap<NodeId, u64>, id: NodeId) -> u64 {
    scores.get(&id).copied().unwrap_or(INFINITY)
}

/// First unreached node holding the minimum score, scanning in node
/// insertion order so ties break deterministically.
fn min_by_insertion_order(
    unvisited: &[NodeId],
    scores: &AHashMap<NodeId, u64>,
) -> Option<NodeId> {
    let mut best: Option<(NodeId, u64)> = None;
    for &id in unvisited {
        let score = distance(scores, id);
        if score == INFINITY {
            continue;
        }
        // Strict comparison keeps the first minimum encountered.
        if best.map_or(true, |(_, current)| score < current) {
            best = Some((id, score));
        }
    }
    best.map(|(id, _)| id)
}

/// Paint the initial distance annotations: 0 at the start, ∞ elsewhere.
fn paint_initial_distances(graph: &mut Graph, node_ids: &[NodeId], start: NodeId) {
    for &id in node_ids {
        let label = if id == start {
            DistanceLabel::Cost { g: 0 }
        } else {
            DistanceLabel::Infinite
        };
        graph.set_distance(id, Some(label));
    }
}

/// Close out a shortest-path run: trace the path when the target was
/// reached, otherwise report no path. The distance annotations computed so
/// far stay on the graph either way.
fn conclude(
    graph: &Arc<RwLock<Graph>>,
    previous: &AHashMap<NodeId, NodeId>,
    dist: &AHashMap<NodeId, u64>,
    start: NodeId,
    target: NodeId,
) -> TraversalOutcome {
    if target == start || previous.contains_key(&target) {
        let mut g = graph.write();
        let path = trace_path(&mut g, previous, start, target);
        TraversalOutcome::PathFound {
            path,
            cost: Some(distance(dist, target)),
        }
    } else {
        TraversalOutcome::NoPathFound
    }
}

/// Dijkstra: settle the closest unreached node, relax its edges, repeat.
/// The minimum is found by linear scan; no heap at this data scale.
pub(super) async fn dijkstra(
    graph: &Arc<RwLock<Graph>>,
    control: &RunControl,
    start: NodeId,
    target: NodeId,
) -> Result<TraversalOutcome, Cancelled> {
    let node_ids = graph.read().node_ids();
    let mut dist = init_distances(&node_ids, start);
    let mut previous: AHashMap<NodeId, NodeId> = AHashMap::default();
    let mut unvisited = node_ids.clone();

    paint_initial_distances(&mut graph.write(), &node_ids, start);
    control.checkpoint().await?;

    while let Some(current) = min_by_insertion_order(&unvisited, &dist) {
        unvisited.retain(|&id| id != current);
        graph.write().set_active(current, true);
        control.checkpoint().await?;

        if current == target {
            break;
        }

        let neighbors = graph.read().neighbors(current);
        for neighbor in neighbors {
            let edge = graph
                .read()
                .edge_between(current, neighbor)
                .map(|edge| (edge.id, edge.weight_or_default()));
            let Some((edge_id, weight)) = edge else { continue };

            graph.write().set_edge_active(edge_id, true);
            control.checkpoint().await?;

            let alternative = distance(&dist, current).saturating_add(weight);
            if alternative < distance(&dist, neighbor) {
                dist.insert(neighbor, alternative);
                previous.insert(neighbor, current);
                {
                    let mut g = graph.write();
                    g.set_distance(neighbor, Some(DistanceLabel::Cost { g: alternative }));
                    g.set_frontier(neighbor, true);
                }
                control.checkpoint().await?;
                graph.write().set_frontier(neighbor, false);
            }

            graph.write().set_edge_active(edge_id, false);
        }

        {
            let mut g = graph.write();
            g.set_active(current, false);
            g.set_visited(current, true);
        }
        control.checkpoint().await?;
    }

    Ok(conclude(graph, &previous, &dist, start, target))
}

/// Bellman-Ford: relax every edge for `node_count - 1` rounds, both
/// directions per edge when undirected, stopping early once a round
/// changes nothing. No separate negative-cycle detection pass.
pub(super) async fn bellman_ford(
    graph: &Arc<RwLock<Graph>>,
    control: &RunControl,
    start: NodeId,
    target: NodeId,
) -> Result<TraversalOutcome, Cancelled> {
    let (node_ids, directed) = {
        let g = graph.read();
        (g.node_ids(), g.is_directed())
    };
    let mut dist = init_distances(&node_ids, start);
    let mut previous: AHashMap<NodeId, NodeId> = AHashMap::default();

    paint_initial_distances(&mut graph.write(), &node_ids, start);
    control.checkpoint().await?;

    for _ in 0..node_ids.len().saturating_sub(1) {
        let mut changed = false;
        let edges: Vec<(EdgeId, NodeId, NodeId, u64)> = graph
            .read()
            .edges()
            .iter()
            .map(|edge| (edge.id, edge.from, edge.to, edge.weight_or_default()))
            .collect();

        for (edge_id, from, to, weight) in edges {
            {
                let mut g = graph.write();
                g.set_edge_active(edge_id, true);
                g.set_active(from, true);
            }
            control.checkpoint().await?;

            let from_dist = distance(&dist, from);
            if from_dist != INFINITY && from_dist.saturating_add(weight) < distance(&dist, to) {
                let relaxed = from_dist + weight;
                dist.insert(to, relaxed);
                previous.insert(to, from);
                changed = true;
                {
                    let mut g = graph.write();
                    g.set_distance(to, Some(DistanceLabel::Cost { g: relaxed }));
                    g.set_frontier(to, true);
                }
                control.checkpoint().await?;
                graph.write().set_frontier(to, false);
            }

            // Undirected graphs relax the reverse orientation as well.
            if !directed {
                let to_dist = distance(&dist, to);
                if to_dist != INFINITY && to_dist.saturating_add(weight) < distance(&dist, from) {
                    let relaxed = to_dist + weight;
                    dist.insert(from, relaxed);
                    previous.insert(from, to);
                    changed = true;
                    {
                        let mut g = graph.write();
                        g.set_distance(from, Some(DistanceLabel::Cost { g: relaxed }));
                        g.set_frontier(from, true);
                    }
                    control.checkpoint().await?;
                    graph.write().set_frontier(from, false);
                }
            }

            {
                let mut g = graph.write();
                g.set_edge_active(edge_id, false);
                g.set_active(from, false);
                g.set_visited(from, true);
            }
        }

        if !changed {
            break;
        }
    }

    Ok(conclude(graph, &previous, &dist, start, target))
}

/// A*: Dijkstra ordered by `g + h`, where `h` is the scaled Euclidean
/// distance between display positions. Ties break by insertion order.
pub(super) async fn astar(
    graph: &Arc<RwLock<Graph>>,
    control: &RunControl,
    start: NodeId,
    target: NodeId,
) -> Result<TraversalOutcome, Cancelled> {
    let node_ids = graph.read().node_ids();
    let mut dist = init_distances(&node_ids, start);
    let mut previous: AHashMap<NodeId, NodeId> = AHashMap::default();
    let mut unvisited = node_ids.clone();

    let start_h = heuristic(&graph.read(), start, target);
    let mut f_score: AHashMap<NodeId, u64> = node_ids
        .iter()
        .map(|&id| (id, if id == start { start_h } else { INFINITY }))
        .collect();

    {
        let mut g = graph.write();
        for &id in &node_ids {
            let label = if id == start {
                DistanceLabel::Estimate { g: 0, h: start_h }
            } else {
                DistanceLabel::Infinite
            };
            g.set_distance(id, Some(label));
        }
    }
    control.checkpoint().await?;

    while let Some(current) = min_by_insertion_order(&unvisited, &f_score) {
        unvisited.retain(|&id| id != current);
        graph.write().set_active(current, true);
        control.checkpoint().await?;

        if current == target {
            break;
        }

        let neighbors = graph.read().neighbors(current);
        for neighbor in neighbors {
            let edge = graph
                .read()
                .edge_between(current, neighbor)
                .map(|edge| (edge.id, edge.weight_or_default()));
            let Some((edge_id, weight)) = edge else { continue };

            graph.write().set_edge_active(edge_id, true);
            control.checkpoint().await?;

            let g_score = distance(&dist, current).saturating_add(weight);
            if g_score < distance(&dist, neighbor) {
                let h = heuristic(&graph.read(), neighbor, target);
                dist.insert(neighbor, g_score);
                f_score.insert(neighbor, g_score.saturating_add(h));
                previous.insert(neighbor, current);
                {
                    let mut g = graph.write();
                    g.set_distance(neighbor, Some(DistanceLabel::Estimate { g: g_score, h }));
                    g.set_frontier(neighbor, true);
                }
                control.checkpoint().await?;
                graph.write().set_frontier(neighbor, false);
            }

            graph.write().set_edge_active(edge_id, false);
        }

        {
            let mut g = graph.write();
            g.set_active(current, false);
            g.set_visited(current, true);
        }
        control.checkpoint().await?;
    }

    Ok(conclude(graph, &previous, &dist, start, target))
}

/// Admissible estimate of remaining distance: Euclidean display distance
/// divided by a fixed normalization factor, floored.
fn heuristic(graph: &Graph, node: NodeId, target: NodeId) -> u64 {
    match (graph.node(node), graph.node(target)) {
        (Some(a), Some(b)) => (a.position.distance_to(b.position) / HEURISTIC_SCALE).floor() as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    #[test]
    fn heuristic_scales_display_distance() {
        let mut graph = Graph::new();
        let a = graph.add_node(Position::new(0.0, 0.0));
        // A 3-4-5 triangle: display distance 500.
        let b = graph.add_node(Position::new(300.0, 400.0));
        assert_eq!(heuristic(&graph, a, b), 10);
        assert_eq!(heuristic(&graph, a, a), 0);
    }

    #[test]
    fn min_scan_keeps_the_first_of_equal_scores() {
        let ids = [NodeId(0), NodeId(1), NodeId(2)];
        let scores: AHashMap<NodeId, u64> =
            [(NodeId(0), 5), (NodeId(1), 3), (NodeId(2), 3)].into_iter().collect();
        assert_eq!(min_by_insertion_order(&ids, &scores), Some(NodeId(1)));
    }

    #[test]
    fn min_scan_skips_unreached_nodes() {
        let ids = [NodeId(0), NodeId(1)];
        let scores: AHashMap<NodeId, u64> =
            [(NodeId(0), INFINITY), (NodeId(1), INFINITY)].into_iter().collect();
        assert_eq!(min_by_insertion_order(&ids, &scores), None);
    }
}
