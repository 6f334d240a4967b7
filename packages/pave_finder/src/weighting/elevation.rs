//! Derives the uphill elevation gain for every directed edge. Each direction
//! of a road is handled independently, so a climb in one direction is a
//! descent (and therefore free) in the other.

use tracing::debug;

use crate::common::graph_data::RoadGraph;

/// Elevation gain in meters when travelling from an elevation of src_ele to
/// one of dst_ele. Descents count as zero, and any non-finite result is
/// treated as flat.
pub fn elevation_gain(src_ele: f64, dst_ele: f64) -> f64 {
    let gain = dst_ele - src_ele;
    if gain.is_finite() && gain > 0.0 {
        gain
    } else {
        0.0
    }
}

/// Set elevation_gain on every edge of the graph, based on the elevations of
/// its source and target nodes
pub fn tag_elevation_gain(graph: &mut RoadGraph) {
    let mut climbing = 0;

    for edge_inx in graph.edge_indices() {
        let Some((src_inx, dst_inx)) = graph.edge_endpoints(edge_inx) else {
            continue;
        };
        let gain =
            elevation_gain(graph[src_inx].elevation, graph[dst_inx].elevation);

        if gain > 0.0 {
            climbing += 1;
        }
        graph[edge_inx].elevation_gain = gain;
    }

    debug!(
        edges = graph.edge_count(),
        climbing, "Calculated elevation gain for all edges"
    );
}
