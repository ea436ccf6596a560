//! Live-animated graph traversals
//!
//! Unlike sorting and searching, graph runs are not precomputed: the
//! algorithm executes against the shared graph, mutating display flags as
//! it goes, and suspends between micro-steps via [`RunControl`] so it can
//! be paused, resumed, sped up, or cancelled in flight.

mod basic;
mod shortest;

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::info;

use av_core::config::DEFAULT_SPEED;
use av_core::{Cancelled, RunControl, RunId, SpeedConfig};

use crate::model::{Graph, NodeId};
use crate::GraphError;

/// Graph algorithms the animator can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TraversalAlgorithm {
    #[serde(rename = "bfs")]
    Bfs,
    #[serde(rename = "dfs")]
    Dfs,
    #[serde(rename = "dijkstra")]
    Dijkstra,
    #[serde(rename = "bellman-ford")]
    BellmanFord,
    #[serde(rename = "astar")]
    AStar,
}

impl TraversalAlgorithm {
    pub const ALL: [TraversalAlgorithm; 5] = [
        TraversalAlgorithm::Bfs,
        TraversalAlgorithm::Dfs,
        TraversalAlgorithm::Dijkstra,
        TraversalAlgorithm::BellmanFord,
        TraversalAlgorithm::AStar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TraversalAlgorithm::Bfs => "bfs",
            TraversalAlgorithm::Dfs => "dfs",
            TraversalAlgorithm::Dijkstra => "dijkstra",
            TraversalAlgorithm::BellmanFord => "bellman-ford",
            TraversalAlgorithm::AStar => "astar",
        }
    }

    /// Shortest-path variants require both a start and a target selection.
    pub fn requires_selection(self) -> bool {
        matches!(
            self,
            TraversalAlgorithm::Dijkstra | TraversalAlgorithm::BellmanFord | TraversalAlgorithm::AStar
        )
    }
}

impl fmt::Display for TraversalAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TraversalAlgorithm {
    type Err = GraphError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str() == name)
            .ok_or_else(|| GraphError::UnknownAlgorithm(name.to_owned()))
    }
}

/// Terminal status of a traversal run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TraversalOutcome {
    /// Full traversal finished without a target; nodes in visit order.
    Traversed { order: Vec<NodeId> },
    /// Target reached; path runs from start to target inclusive.
    PathFound {
        path: Vec<NodeId>,
        /// Total path cost, for weighted traversals.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        cost: Option<u64>,
    },
    /// Every reachable node was processed without meeting the target.
    NoPathFound,
    /// Cancelled by the user between micro-steps; applied visual mutations
    /// stay in place.
    Stopped,
}

impl TraversalOutcome {
    fn status(&self) -> &'static str {
        match self {
            TraversalOutcome::Traversed { .. } => "traversed",
            TraversalOutcome::PathFound { .. } => "path_found",
            TraversalOutcome::NoPathFound => "no_path_found",
            TraversalOutcome::Stopped => "stopped",
        }
    }
}

/// A validated run: shortest-path variants always carry a target.
#[derive(Debug, Clone, Copy)]
enum Plan {
    Bfs { start: NodeId, target: Option<NodeId> },
    Dfs { start: NodeId, target: Option<NodeId> },
    Dijkstra { start: NodeId, target: NodeId },
    BellmanFord { start: NodeId, target: NodeId },
    AStar { start: NodeId, target: NodeId },
}

impl Plan {
    fn algorithm(&self) -> TraversalAlgorithm {
        match self {
            Plan::Bfs { .. } => TraversalAlgorithm::Bfs,
            Plan::Dfs { .. } => TraversalAlgorithm::Dfs,
            Plan::Dijkstra { .. } => TraversalAlgorithm::Dijkstra,
            Plan::BellmanFord { .. } => TraversalAlgorithm::BellmanFord,
            Plan::AStar { .. } => TraversalAlgorithm::AStar,
        }
    }
}

/// Executes graph algorithms against a shared graph, one micro-operation at
/// a time.
///
/// At most one run is in flight per animator: starting a new run first
/// requests cancellation of the current one and waits for it to observe the
/// cancellation before any shared state is touched.
pub struct TraversalAnimator {
    graph: Arc<RwLock<Graph>>,
    /// Control block of the current (or most recent) run.
    control: RwLock<Arc<RunControl>>,
    speed_config: SpeedConfig,
    speed: AtomicU32,
    task: Mutex<Option<JoinHandle<TraversalOutcome>>>,
}

impl TraversalAnimator {
    pub fn new(graph: Arc<RwLock<Graph>>) -> Self {
        Self::with_config(graph, SpeedConfig::default())
    }

    pub fn with_config(graph: Arc<RwLock<Graph>>, speed_config: SpeedConfig) -> Self {
        let control = RunControl::new(speed_config.delay_for(DEFAULT_SPEED));
        Self {
            graph,
            control: RwLock::new(Arc::new(control)),
            speed_config,
            speed: AtomicU32::new(DEFAULT_SPEED),
            task: Mutex::new(None),
        }
    }

    /// Handle to the graph this animator mutates.
    pub fn graph(&self) -> Arc<RwLock<Graph>> {
        self.graph.clone()
    }

    /// Change the speed control value; the in-flight run picks it up at its
    /// next suspension point, and later runs inherit it.
    pub fn set_speed(&self, speed: u32) {
        self.speed.store(speed, Ordering::Release);
        self.control
            .read()
            .set_step_delay(self.speed_config.delay_for(speed));
    }

    /// Suspend the in-flight run at its next suspension point.
    pub fn pause(&self) {
        self.control.read().pause();
    }

    /// Resume a paused run.
    pub fn resume(&self) {
        self.control.read().resume();
    }

    pub fn is_paused(&self) -> bool {
        self.control.read().is_paused()
    }

    /// Request cancellation; the run unwinds at its next suspension point
    /// and reports [`TraversalOutcome::Stopped`].
    pub fn stop(&self) {
        self.control.read().cancel();
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Run a traversal to completion on the caller's task.
    ///
    /// Any in-flight background run is cancelled and awaited first.
    pub async fn run(
        &self,
        algorithm: TraversalAlgorithm,
        start: Option<NodeId>,
        target: Option<NodeId>,
    ) -> Result<TraversalOutcome, GraphError> {
        self.cancel_in_flight().await;
        let (plan, control) = self.prepare(algorithm, start, target)?;
        Ok(execute(self.graph.clone(), control, plan).await)
    }

    /// Start a traversal in the background.
    ///
    /// Preconditions are validated before anything is spawned, so a
    /// rejected call never starts animation. Any in-flight run is cancelled
    /// and awaited first.
    pub async fn start(
        &self,
        algorithm: TraversalAlgorithm,
        start: Option<NodeId>,
        target: Option<NodeId>,
    ) -> Result<(), GraphError> {
        self.cancel_in_flight().await;
        let (plan, control) = self.prepare(algorithm, start, target)?;
        let handle = tokio::spawn(execute(self.graph.clone(), control, plan));
        *self.task.lock() = Some(handle);
        Ok(())
    }

    /// Wait for the background run to finish and return its outcome.
    pub async fn finish(&self) -> Option<TraversalOutcome> {
        let handle = self.task.lock().take()?;
        handle.await.ok()
    }

    /// Cancel the in-flight background run and wait until it has observed
    /// the cancellation, so no two runs mutate the graph concurrently.
    async fn cancel_in_flight(&self) {
        let handle = self.task.lock().take();
        if let Some(handle) = handle {
            if !handle.is_finished() {
                self.control.read().cancel();
            }
            let _ = handle.await;
        }
    }

    /// Validate preconditions and install a fresh control block.
    fn prepare(
        &self,
        algorithm: TraversalAlgorithm,
        start: Option<NodeId>,
        target: Option<NodeId>,
    ) -> Result<(Plan, Arc<RunControl>), GraphError> {
        let plan = {
            let graph = self.graph.read();
            let first = graph
                .node_ids()
                .first()
                .copied()
                .ok_or(GraphError::EmptyGraph)?;

            let resolved_start = start.unwrap_or(first);
            if !graph.contains(resolved_start) {
                return Err(GraphError::UnknownNode(resolved_start));
            }
            if let Some(target) = target {
                if !graph.contains(target) {
                    return Err(GraphError::UnknownNode(target));
                }
            }

            match algorithm {
                TraversalAlgorithm::Bfs => Plan::Bfs { start: resolved_start, target },
                TraversalAlgorithm::Dfs => Plan::Dfs { start: resolved_start, target },
                TraversalAlgorithm::Dijkstra
                | TraversalAlgorithm::BellmanFord
                | TraversalAlgorithm::AStar => {
                    let (Some(start), Some(target)) = (start, target) else {
                        return Err(GraphError::SelectionRequired);
                    };
                    match algorithm {
                        TraversalAlgorithm::Dijkstra => Plan::Dijkstra { start, target },
                        TraversalAlgorithm::BellmanFord => Plan::BellmanFord { start, target },
                        _ => Plan::AStar { start, target },
                    }
                }
            }
        };

        let delay = self
            .speed_config
            .delay_for(self.speed.load(Ordering::Acquire));
        let control = Arc::new(RunControl::new(delay));
        *self.control.write() = control.clone();
        Ok((plan, control))
    }
}

impl Drop for TraversalAnimator {
    fn drop(&mut self) {
        // No mutation may land after disposal: cancel the run and kill the
        // task backing it.
        self.control.read().cancel();
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
        }
    }
}

/// Run one validated plan to its terminal outcome.
async fn execute(
    graph: Arc<RwLock<Graph>>,
    control: Arc<RunControl>,
    plan: Plan,
) -> TraversalOutcome {
    let run_id: RunId = RunId::new_v4();
    info!(%run_id, algorithm = %plan.algorithm(), "traversal started");

    graph.write().reset_colors();

    let result = match plan {
        Plan::Bfs { start, target } => basic::bfs(&graph, &control, start, target).await,
        Plan::Dfs { start, target } => basic::dfs(&graph, &control, start, target).await,
        Plan::Dijkstra { start, target } => {
            shortest::dijkstra(&graph, &control, start, target).await
        }
        Plan::BellmanFord { start, target } => {
            shortest::bellman_ford(&graph, &control, start, target).await
        }
        Plan::AStar { start, target } => shortest::astar(&graph, &control, start, target).await,
    };

    match result {
        Ok(outcome) => {
            info!(%run_id, status = outcome.status(), "traversal finished");
            outcome
        }
        // Cancellation is a status, not a failure.
        Err(Cancelled) => {
            info!(%run_id, "traversal stopped");
            TraversalOutcome::Stopped
        }
    }
}

/// Walk recorded predecessors backward from target to start, highlighting
/// the path's edges and leaving exactly its nodes marked visited.
fn trace_path(
    graph: &mut Graph,
    previous: &AHashMap<NodeId, NodeId>,
    start: NodeId,
    target: NodeId,
) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut current = target;
    while current != start {
        match previous.get(&current) {
            Some(&predecessor) => {
                graph.set_edge_active_between(predecessor, current, true);
                path.push(predecessor);
                current = predecessor;
            }
            None => break,
        }
    }
    path.reverse();

    for id in graph.node_ids() {
        graph.set_active(id, false);
        graph.set_frontier(id, false);
        graph.set_visited(id, path.contains(&id));
    }
    path
}
