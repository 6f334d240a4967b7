//! Defines the layout of the route record which is written out once a search
//! has finished

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::common::config::RocWeights;
use crate::common::graph_data::NodeId;
use crate::routing::structs::RouteOutcome;
use crate::routing::structs::metrics::RouteAnalysis;

/// Description of how the route was chosen, recorded alongside the weights
pub const WEIGHTING_METHOD: &str = "Rank Order Centroid (ROC) composite weight of \
    inverted PASER pavement score, uphill elevation gain and distance, minimised \
    with Dijkstra's algorithm";

/// JSON has no representation for infinity, so a route with no finite cost
/// is written as null and read back as infinity
mod finite_or_null {

    use super::*;

    pub fn serialize<S: Serializer>(cost: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if cost.is_finite() {
            serializer.serialize_f64(*cost)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let cost: Option<f64> = Option::deserialize(deserializer)?;
        Ok(cost.unwrap_or(f64::INFINITY))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSection {
    pub start_node: NodeId,
    pub end_node: NodeId,
    pub path: Vec<NodeId>,
    #[serde(with = "finite_or_null")]
    pub total_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightsSection {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl From<&RocWeights> for WeightsSection {
    fn from(weights: &RocWeights) -> Self {
        WeightsSection {
            alpha: weights.alpha(),
            beta: weights.beta(),
            gamma: weights.gamma(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Methodology {
    pub weights: WeightsSection,
    pub method: String,
}

/// Everything needed to reproduce or audit a route: the path itself, its
/// composition, and the weights which produced it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub route: RouteSection,
    pub analysis: RouteAnalysis,
    pub methodology: Methodology,
}

impl RouteRecord {
    pub fn new(
        start_node: &NodeId,
        end_node: &NodeId,
        outcome: &RouteOutcome,
        analysis: RouteAnalysis,
        weights: &RocWeights,
    ) -> RouteRecord {
        RouteRecord {
            route: RouteSection {
                start_node: start_node.clone(),
                end_node: end_node.clone(),
                path: outcome.path().to_vec(),
                total_cost: outcome.total_cost(),
            },
            analysis,
            methodology: Methodology {
                weights: WeightsSection::from(weights),
                method: WEIGHTING_METHOD.to_string(),
            },
        }
    }
}
