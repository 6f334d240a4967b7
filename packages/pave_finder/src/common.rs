//! Data structures, configuration and error types which are shared across
//! every stage of route optimisation.

pub mod config;
pub mod error;
pub mod graph_data;
