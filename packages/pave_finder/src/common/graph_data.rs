//! Defines the data which is stored against each node and edge of the road
//! graph, along with the container which pairs the graph with a lookup from
//! node identifiers to graph indices.

use petgraph::graph::NodeIndex;
use petgraph::{Directed, Graph};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lowest score on the pavement condition scale (failed)
pub const PASER_MIN: f64 = 1.0;
/// Highest score on the pavement condition scale (excellent)
pub const PASER_MAX: f64 = 10.0;
/// Score assumed for any edge with no usable pavement data, 5 is 'fair'
pub const NEUTRAL_PASER_SCORE: f64 = 5.0;

/// Convert a pavement score (higher = better) into a penalty (higher =
/// worse), or back again. The scale is symmetric so the same mapping works
/// in both directions.
pub fn invert_paser(score: f64) -> f64 {
    PASER_MAX + PASER_MIN - score
}

/// Stable identifier for a node, as it appears in the graph artifact. OSM
/// identifiers are numeric, but anything which has been round-tripped
/// through a text format may not be, so these are always held as strings.
#[derive(
    Debug,
    Default,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}

impl From<i64> for NodeId {
    fn from(id: i64) -> Self {
        NodeId(id.to_string())
    }
}

/// Sets the data which will be stored as weights in the petgraph graph
#[derive(Default, Debug, Clone, PartialEq)]
pub struct NodeData {
    pub id: NodeId,
    pub lat: f64,
    pub lon: f64,
    pub elevation: f64,
}

/// Container for edge metadata which will be stored in the graph. The raw
/// attributes are populated from the graph artifact, everything from
/// elevation_gain onwards is derived by the weighting stages and is only
/// meaningful once the graph has been prepared.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct EdgeData {
    pub src: NodeId,
    pub dst: NodeId,
    pub key: u32,
    pub distance: f64,
    pub travel_time: f64,
    pub weighted_travel_time: f64,
    pub paser_score: f64,
    pub inverted_paser: f64,
    pub elevation_gain: f64,
    pub norm_paser: f64,
    pub norm_elev: f64,
    pub norm_dist: f64,
    pub composite_weight: f64,
}

impl EdgeData {
    /// Create an edge from its raw attributes. The pavement penalty and the
    /// pavement-adjusted travel time are filled in here, all other derived
    /// attributes start at zero.
    pub fn new(
        src: NodeId,
        dst: NodeId,
        key: u32,
        distance: f64,
        travel_time: f64,
        paser_score: f64,
    ) -> EdgeData {
        let paser_score = paser_score.clamp(PASER_MIN, PASER_MAX);
        EdgeData {
            src,
            dst,
            key,
            distance,
            travel_time,
            weighted_travel_time: travel_time * (2.0 - paser_score / 10.0),
            paser_score,
            inverted_paser: invert_paser(paser_score),
            ..Default::default()
        }
    }
}

pub type RoadGraph = Graph<NodeData, EdgeData, Directed, u32>;

/// A directed multigraph of the road network. Node and edge data live in
/// the petgraph arena, node_inx maps identifiers from the artifact onto
/// their position in it.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    pub graph: RoadGraph,
    pub node_inx: FxHashMap<NodeId, NodeIndex>,
}

impl RoadNetwork {
    /// Look up the graph index for a node identifier
    pub fn get_node_inx(&self, id: &NodeId) -> Option<NodeIndex> {
        self.node_inx.get(id).copied()
    }

    /// Add a node, replacing the data for an existing node if the identifier
    /// has already been seen
    pub fn add_node(&mut self, node: NodeData) -> NodeIndex {
        match self.node_inx.get(&node.id) {
            Some(inx) => {
                self.graph[*inx] = node;
                *inx
            }
            None => {
                let id = node.id.clone();
                let inx = self.graph.add_node(node);
                self.node_inx.insert(id, inx);
                inx
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}
