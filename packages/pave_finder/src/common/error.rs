//! Error types for each stage of route optimisation. Attribute-level problems
//! never show up here, they are absorbed with defaults during loading.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::common::graph_data::NodeId;

/// Errors raised while reading the graph artifact
#[derive(Debug, Error)]
pub enum LoadingError {
    #[error("Graph artifact not found: {path}")]
    MissingArtifact { path: PathBuf },

    #[error("Failed to read graph artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Graph artifact {path} is not a valid node-link document: {source}")]
    MalformedArtifact {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while validating user provided configuration
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error(
        "Invalid ROC weights (alpha={alpha}, beta={beta}, gamma={gamma}): {reason}"
    )]
    InvalidWeights {
        alpha: f64,
        beta: f64,
        gamma: f64,
        reason: String,
    },

    #[error("Invalid node selector '{value}': {reason}")]
    InvalidSelector { value: String, reason: String },

    #[error("Search time budget must be a positive number of seconds, got {value}")]
    InvalidBudget { value: f64 },
}

/// Errors raised while answering a single routing query. These never affect
/// the state of the shared graph.
#[derive(Debug, Error, PartialEq)]
pub enum RoutingError {
    #[error("Node {node} is not present in the graph (route {from} -> {to})")]
    InvalidNode { node: NodeId, from: NodeId, to: NodeId },

    #[error("Nodes {from} and {to} are not joined by any edge")]
    MissingEdge { from: NodeId, to: NodeId },

    #[error("The graph contains no nodes, unable to pick a {role} node")]
    EmptyGraph { role: &'static str },

    #[error("Search from {from} to {to} exceeded its budget of {budget:?}")]
    Timeout {
        from: NodeId,
        to: NodeId,
        budget: Duration,
    },
}

/// Errors raised while writing or re-reading the route record
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to access route record {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode route record for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Route record {path} could not be parsed: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
