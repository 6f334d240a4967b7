//! Find cycle-friendly routes through a road graph by blending pavement
//! condition, elevation gain and distance into a single edge cost using Rank
//! Order Centroid weights, then running Dijkstra's algorithm over the result.

pub mod common;
pub mod loading;
pub mod output;
pub mod routing;
pub mod weighting;
