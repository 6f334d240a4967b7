//! Single source, single target shortest path search over the weighted road
//! graph, using composite_weight as the cost of each edge. Composite weights
//! are never negative, which is what makes Dijkstra's algorithm valid here.

use petgraph::graph::{EdgeIndex, NodeIndex};
use petgraph::visit::EdgeRef;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::common::error::RoutingError;
use crate::common::graph_data::{NodeId, RoadNetwork};
use crate::routing::structs::{Route, RouteOutcome};
use crate::weighting::WeightedGraph;

/// How many nodes are settled between checks of the search time budget
const BUDGET_CHECK_INTERVAL: usize = 64;

/// A node waiting on the frontier, along with the cost of the best route to
/// it found so far. Ordering is reversed so that BinaryHeap pops the
/// cheapest entry first, with ties going to the lowest node index.
#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    cost: f64,
    inx: NodeIndex,
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.inx.cmp(&self.inx))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

fn lookup_node(
    network: &RoadNetwork,
    node: &NodeId,
    from: &NodeId,
    to: &NodeId,
) -> Result<NodeIndex, RoutingError> {
    network
        .get_node_inx(node)
        .ok_or_else(|| RoutingError::InvalidNode {
            node: node.clone(),
            from: from.clone(),
            to: to.clone(),
        })
}

/// Walk the predecessor edges back from the target to build the route
fn reconstruct_route(
    network: &RoadNetwork,
    preds: &[Option<EdgeIndex>],
    src_inx: NodeIndex,
    dst_inx: NodeIndex,
    total_cost: f64,
) -> Route {
    let mut nodes = vec![network.graph[dst_inx].id.clone()];
    let mut edges = Vec::new();

    let mut cur_inx = dst_inx;
    while cur_inx != src_inx {
        let Some(edge_inx) = preds[cur_inx.index()] else {
            break;
        };
        let Some((prev_inx, _)) = network.graph.edge_endpoints(edge_inx) else {
            break;
        };
        edges.push(edge_inx);
        nodes.push(network.graph[prev_inx].id.clone());
        cur_inx = prev_inx;
    }

    nodes.reverse();
    edges.reverse();

    Route {
        nodes,
        edges,
        total_cost,
    }
}

/// Find the minimum cost route between two nodes. Every parallel edge
/// between a pair of nodes is considered, and the cheapest one is recorded
/// against the route. Where two parallel edges cost the same, the one which
/// petgraph yields first is kept, so results are reproducible for identical
/// input.
///
/// A missing route is a normal outcome and is reported as
/// RouteOutcome::NoPath. Errors are only returned if either node is not in
/// the graph, or if a budget was provided and the search ran past it.
pub fn find_optimal_route(
    graph: &WeightedGraph,
    from: &NodeId,
    to: &NodeId,
    budget: Option<Duration>,
) -> Result<RouteOutcome, RoutingError> {
    let network = graph.network();
    let src_inx = lookup_node(network, from, from, to)?;
    let dst_inx = lookup_node(network, to, from, to)?;

    debug!(%from, %to, "Searching for optimal route");
    let started = Instant::now();

    let node_count = network.node_count();
    let mut costs = vec![f64::INFINITY; node_count];
    let mut preds: Vec<Option<EdgeIndex>> = vec![None; node_count];
    let mut settled = vec![false; node_count];
    let mut frontier = BinaryHeap::new();

    costs[src_inx.index()] = 0.0;
    frontier.push(FrontierEntry {
        cost: 0.0,
        inx: src_inx,
    });

    let mut settled_count: usize = 0;
    while let Some(FrontierEntry { cost, inx }) = frontier.pop() {
        // Stale entries are left on the heap rather than updated in place
        if settled[inx.index()] {
            continue;
        }
        settled[inx.index()] = true;

        if inx == dst_inx {
            let route = reconstruct_route(network, &preds, src_inx, dst_inx, cost);
            debug!(
                %from,
                %to,
                nodes = route.nodes.len(),
                total_cost = route.total_cost,
                "Optimal route found"
            );
            return Ok(RouteOutcome::Found(route));
        }

        settled_count += 1;
        if let Some(budget) = budget {
            if settled_count % BUDGET_CHECK_INTERVAL == 0
                && started.elapsed() > budget
            {
                debug!(%from, %to, ?budget, settled_count, "Route search timed out");
                return Err(RoutingError::Timeout {
                    from: from.clone(),
                    to: to.clone(),
                    budget,
                });
            }
        }

        for eref in network.graph.edges(inx) {
            let next_inx = eref.target();
            if settled[next_inx.index()] {
                continue;
            }

            let next_cost = cost + eref.weight().composite_weight;
            if next_cost < costs[next_inx.index()] {
                costs[next_inx.index()] = next_cost;
                preds[next_inx.index()] = Some(eref.id());
                frontier.push(FrontierEntry {
                    cost: next_cost,
                    inx: next_inx,
                });
            }
        }
    }

    debug!(%from, %to, settled_count, "No path found between nodes");
    Ok(RouteOutcome::NoPath {
        from: from.clone(),
        to: to.clone(),
    })
}
