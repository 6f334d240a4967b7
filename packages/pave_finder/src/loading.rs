//! This module focuses on reading the annotated road graph from disk and
//! using it to generate a petgraph graph object.

pub mod artifact;
pub mod petgraph;
