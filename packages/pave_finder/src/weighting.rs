//! Turns a raw road network into one which is ready for routing. Elevation
//! gain, normalized channels and composite weights are derived in that order,
//! and since normalization depends on every edge in the graph the stages can
//! only ever run over the whole graph at once.

pub mod composite;
pub mod elevation;
pub mod normalize;

use tracing::info;

use crate::common::config::RocWeights;
use crate::common::graph_data::RoadNetwork;
use crate::weighting::composite::{WeightStats, apply_composite_weights};
use crate::weighting::elevation::tag_elevation_gain;
use crate::weighting::normalize::{NormalizationRanges, normalize_edge_attributes};

/// A road network which has had every derived edge attribute calculated with
/// a single set of weights. The network can only be read from here, so the
/// derived attributes can never fall out of step with the raw ones. To change
/// any raw attribute, take the network back out with into_network and prepare
/// it again.
#[derive(Debug, Clone)]
pub struct WeightedGraph {
    network: RoadNetwork,
    weights: RocWeights,
    ranges: Option<NormalizationRanges>,
}

impl WeightedGraph {
    /// Run every weighting stage over the provided network
    pub fn prepare(mut network: RoadNetwork, weights: RocWeights) -> WeightedGraph {
        info!(
            nodes = network.node_count(),
            edges = network.edge_count(),
            "Preparing road graph for routing"
        );

        tag_elevation_gain(&mut network.graph);
        let ranges = normalize_edge_attributes(&mut network.graph);
        apply_composite_weights(&mut network.graph, &weights);

        WeightedGraph {
            network,
            weights,
            ranges,
        }
    }

    /// Wrap a network whose composite weights have been set by hand
    #[cfg(test)]
    pub(crate) fn from_weighted(network: RoadNetwork) -> WeightedGraph {
        WeightedGraph {
            network,
            weights: RocWeights::default(),
            ranges: None,
        }
    }

    pub fn network(&self) -> &RoadNetwork {
        &self.network
    }

    pub fn weights(&self) -> &RocWeights {
        &self.weights
    }

    /// The range of each raw channel at the time the graph was prepared, None
    /// if the graph has no edges
    pub fn ranges(&self) -> Option<&NormalizationRanges> {
        self.ranges.as_ref()
    }

    pub fn weight_stats(&self) -> WeightStats {
        WeightStats::from_graph(&self.network.graph)
    }

    /// Give up the derived attributes and return the underlying network
    pub fn into_network(self) -> RoadNetwork {
        self.network
    }
}
