//! Summarises the composition of a route once it has been found

use petgraph::graph::EdgeIndex;
use petgraph::visit::EdgeRef;
use tracing::debug;

use crate::common::error::RoutingError;
use crate::common::graph_data::{NodeId, RoadNetwork};
use crate::routing::structs::metrics::{RouteAnalysis, SegmentMetrics};
use crate::routing::structs::{Route, RouteOutcome};
use crate::weighting::WeightedGraph;

/// Summarise a route which was produced by the solver. The edges recorded
/// against the route are used directly, so the figures always describe the
/// parallel edge which the solver actually chose. Every recorded edge must
/// join the matching pair of route nodes in this graph, otherwise the route
/// came from a different graph and MissingEdge is returned.
pub fn analyse_route(
    graph: &WeightedGraph,
    route: &Route,
) -> Result<RouteAnalysis, RoutingError> {
    let network = graph.network();
    let mut metrics = SegmentMetrics::new();

    for (edge_inx, pair) in route.edges.iter().zip(route.nodes.windows(2)) {
        let (from, to) = (&pair[0], &pair[1]);
        let joins_pair = network
            .graph
            .edge_endpoints(*edge_inx)
            .is_some_and(|(src, dst)| {
                &network.graph[src].id == from && &network.graph[dst].id == to
            });
        if !joins_pair {
            return Err(RoutingError::MissingEdge {
                from: from.clone(),
                to: to.clone(),
            });
        }
        metrics.take_step(&network.graph[*edge_inx]);
    }

    let analysis = metrics.finalize();
    debug!(?analysis, "Route analysed");
    Ok(analysis)
}

/// Summarise the outcome of a search, a missing route gives an all-zero
/// analysis
pub fn analyse_outcome(
    graph: &WeightedGraph,
    outcome: &RouteOutcome,
) -> Result<RouteAnalysis, RoutingError> {
    match outcome {
        RouteOutcome::Found(route) => analyse_route(graph, route),
        RouteOutcome::NoPath { .. } => Ok(RouteAnalysis::default()),
    }
}

/// Pick the edge which the solver would use to step between two adjacent
/// nodes. Where there are parallel edges this is the one with the lowest
/// composite weight, with ties going to the first one visited.
fn select_edge(
    network: &RoadNetwork,
    from: &NodeId,
    to: &NodeId,
) -> Result<EdgeIndex, RoutingError> {
    let invalid = |node: &NodeId| RoutingError::InvalidNode {
        node: node.clone(),
        from: from.clone(),
        to: to.clone(),
    };
    let src_inx = network.get_node_inx(from).ok_or_else(|| invalid(from))?;
    let dst_inx = network.get_node_inx(to).ok_or_else(|| invalid(to))?;

    network
        .graph
        .edges_connecting(src_inx, dst_inx)
        .min_by(|a, b| a.weight().composite_weight.total_cmp(&b.weight().composite_weight))
        .map(|eref| eref.id())
        .ok_or_else(|| RoutingError::MissingEdge {
            from: from.clone(),
            to: to.clone(),
        })
}

/// Summarise a route which is only known as a sequence of node identifiers,
/// for example one which has been read back from disk. Every consecutive pair
/// of nodes must be joined by at least one edge. A path with fewer than two
/// nodes has no segments, and gives an all-zero analysis.
pub fn analyse_path(
    graph: &WeightedGraph,
    path: &[NodeId],
) -> Result<RouteAnalysis, RoutingError> {
    let network = graph.network();
    let mut metrics = SegmentMetrics::new();

    for pair in path.windows(2) {
        let edge_inx = select_edge(network, &pair[0], &pair[1])?;
        metrics.take_step(&network.graph[edge_inx]);
    }

    Ok(metrics.finalize())
}
