//! Everything which happens once the road graph has been weighted: finding
//! the cheapest route between two nodes and summarising what it is made of.

pub mod analysis;
pub mod batch;
pub mod dijkstra;
pub mod structs;
