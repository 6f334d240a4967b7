//! Blends the normalized channels into the single cost which is used by the
//! path solver: alpha * norm_paser + beta * norm_elev + gamma * norm_dist

use tracing::info;

use crate::common::config::RocWeights;
use crate::common::graph_data::{EdgeData, RoadGraph};

/// Calculate the composite weight for a single edge. The result is always in
/// [0, 1] provided the normalized channels are.
pub fn composite_weight(weights: &RocWeights, edata: &EdgeData) -> f64 {
    weights.alpha() * edata.norm_paser
        + weights.beta() * edata.norm_elev
        + weights.gamma() * edata.norm_dist
}

/// Summary statistics for the composite weights across a graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl WeightStats {
    pub fn from_graph(graph: &RoadGraph) -> WeightStats {
        let mut stats = WeightStats {
            mean: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
            count: 0,
        };
        let mut total = 0.0;

        for edata in graph.edge_weights() {
            total += edata.composite_weight;
            stats.min = stats.min.min(edata.composite_weight);
            stats.max = stats.max.max(edata.composite_weight);
            stats.count += 1;
        }

        if stats.count == 0 {
            stats.min = 0.0;
            stats.max = 0.0;
        } else {
            stats.mean = total / stats.count as f64;
        }

        stats
    }
}

/// Set composite_weight on every edge of the graph
pub fn apply_composite_weights(
    graph: &mut RoadGraph,
    weights: &RocWeights,
) -> WeightStats {
    info!(
        alpha = weights.alpha(),
        beta = weights.beta(),
        gamma = weights.gamma(),
        "Calculating composite weights"
    );

    for edata in graph.edge_weights_mut() {
        edata.composite_weight = composite_weight(weights, edata);
    }

    let stats = WeightStats::from_graph(graph);
    info!(
        mean = stats.mean,
        min = stats.min,
        max = stats.max,
        edges = stats.count,
        "Composite weight statistics"
    );

    stats
}
