pub mod metrics;

use petgraph::graph::EdgeIndex;

use crate::common::graph_data::NodeId;

/// Container for a route which has been found by the solver. Alongside the
/// node sequence, the exact edge taken for each hop is kept so that parallel
/// edges can be told apart afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeIndex>,
    pub total_cost: f64,
}

impl Route {
    /// Number of edges traversed, a single-node route has no segments
    pub fn num_segments(&self) -> usize {
        self.edges.len()
    }
}

/// The two ways in which a search can finish without an error
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Found(Route),
    NoPath { from: NodeId, to: NodeId },
}

impl RouteOutcome {
    /// Total cost of the route, infinite if there isn't one
    pub fn total_cost(&self) -> f64 {
        match self {
            RouteOutcome::Found(route) => route.total_cost,
            RouteOutcome::NoPath { .. } => f64::INFINITY,
        }
    }

    /// Nodes visited by the route, empty if there isn't one
    pub fn path(&self) -> &[NodeId] {
        match self {
            RouteOutcome::Found(route) => &route.nodes,
            RouteOutcome::NoPath { .. } => &[],
        }
    }

    pub fn route(&self) -> Option<&Route> {
        match self {
            RouteOutcome::Found(route) => Some(route),
            RouteOutcome::NoPath { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RouteOutcome::Found(_))
    }
}
