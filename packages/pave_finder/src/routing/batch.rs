//! Runs many independent route searches over the same prepared graph

use rayon::prelude::*;
use std::time::{Duration, Instant};
use tracing::info;

use crate::common::error::RoutingError;
use crate::common::graph_data::NodeId;
use crate::routing::dijkstra::find_optimal_route;
use crate::routing::structs::RouteOutcome;
use crate::weighting::WeightedGraph;

/// Solve every (start, end) pair in parallel. The graph is only ever read
/// from, so it is shared between threads without any locking. Results are
/// returned in the same order as the provided pairs, and the budget applies
/// to each search separately.
pub fn solve_many(
    graph: &WeightedGraph,
    pairs: &[(NodeId, NodeId)],
    budget: Option<Duration>,
) -> Vec<Result<RouteOutcome, RoutingError>> {
    let started = Instant::now();

    let results: Vec<Result<RouteOutcome, RoutingError>> = pairs
        .par_iter()
        .map(|(from, to)| find_optimal_route(graph, from, to, budget))
        .collect();

    let found = results
        .iter()
        .filter(|result| matches!(result, Ok(outcome) if outcome.is_found()))
        .count();
    info!(
        queries = pairs.len(),
        found,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Batch route search complete"
    );

    results
}
