use crate::common::config::NodeSelector;
use crate::common::error::RoutingError;
use crate::common::graph_data::{EdgeData, NodeData, NodeId, RoadNetwork};
use crate::loading::artifact::{EdgeRow, NodeRow};
use geo::{Distance, Haversine, Point};
use petgraph::graph::NodeIndex;
use petgraph::visit::IntoNodeReferences;
use tracing::{info, warn};

/// Based on the node and edge data which has been read from the artifact,
/// generate a petgraph graph which can be used for route plotting. Nodes are
/// added in artifact order, so node indices reflect discovery order. Parallel
/// edges are all retained, and edges which refer to unknown nodes are skipped.
pub fn create_graph(nodes: Vec<NodeRow>, edges: Vec<EdgeRow>) -> RoadNetwork {
    let mut network = RoadNetwork::default();

    for node in nodes {
        let node_data: NodeData = node.into();
        network.add_node(node_data);
    }

    let mut skipped = 0;
    for edge in edges {
        let edge_data: EdgeData = edge.into();

        // Fetch indexes for src and dst as they appear in the graph
        let src_inx = match network.get_node_inx(&edge_data.src) {
            Some(src_inx) => src_inx,
            None => {
                skipped += 1;
                continue;
            }
        };
        let dst_inx = match network.get_node_inx(&edge_data.dst) {
            Some(dst_inx) => dst_inx,
            None => {
                skipped += 1;
                continue;
            }
        };

        network.graph.add_edge(src_inx, dst_inx, edge_data);
    }

    if skipped > 0 {
        warn!(skipped, "Dropped edges which refer to nodes missing from the artifact");
    }
    info!(
        nodes = network.node_count(),
        edges = network.edge_count(),
        "Created road graph"
    );

    network
}

/// Determine the closest node in the graph to the provided point, using the
/// haversine distance. Ties go to the node which was added first.
pub fn nearest_node(network: &RoadNetwork, point: Point) -> Option<NodeIndex> {
    // Set variables to keep track of the current closest node
    let mut smallest_dist = f64::MAX;
    let mut closest_inx: Option<NodeIndex> = None;

    for (node_inx, node_data) in network.graph.node_references() {
        let node_coords: Point = (node_data.lon, node_data.lat).into();
        let dist = Haversine::distance(point, node_coords);

        if dist < smallest_dist {
            smallest_dist = dist;
            closest_inx = Some(node_inx);
        }
    }

    closest_inx
}

/// Resolve a single selector to the identifier of a node in the graph.
/// Explicit identifiers are passed through unchecked, the solver reports
/// them if they are not present.
pub fn select_node(
    network: &RoadNetwork,
    selector: &NodeSelector,
    role: &'static str,
) -> Result<NodeId, RoutingError> {
    match selector {
        NodeSelector::Id(id) => Ok(id.clone()),
        NodeSelector::Nearest(point) => match nearest_node(network, *point) {
            Some(inx) => Ok(network.graph[inx].id.clone()),
            None => Err(RoutingError::EmptyGraph { role }),
        },
    }
}

/// Work out the start and end nodes of the route. Where no selector has been
/// provided, the first and last nodes in the artifact are used respectively.
pub fn resolve_endpoints(
    network: &RoadNetwork,
    start: Option<&NodeSelector>,
    end: Option<&NodeSelector>,
) -> Result<(NodeId, NodeId), RoutingError> {
    let start_id = match start {
        Some(selector) => select_node(network, selector, "start")?,
        None => first_node(network, "start")?,
    };
    let end_id = match end {
        Some(selector) => select_node(network, selector, "end")?,
        None => last_node(network, "end")?,
    };

    info!(start = %start_id, end = %end_id, "Selected route endpoints");

    Ok((start_id, end_id))
}

fn first_node(
    network: &RoadNetwork,
    role: &'static str,
) -> Result<NodeId, RoutingError> {
    network
        .graph
        .node_weights()
        .next()
        .map(|node| node.id.clone())
        .ok_or(RoutingError::EmptyGraph { role })
}

fn last_node(
    network: &RoadNetwork,
    role: &'static str,
) -> Result<NodeId, RoutingError> {
    network
        .graph
        .node_weights()
        .last()
        .map(|node| node.id.clone())
        .ok_or(RoutingError::EmptyGraph { role })
}
