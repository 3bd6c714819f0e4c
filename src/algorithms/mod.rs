//! Reference vertex programs
//!
//! Consumers of the public [`Vertex`](crate::Vertex) contract only; the
//! engine knows nothing about them.

pub mod pagerank;
pub mod shortest_path;

pub use pagerank::{pagerank_graph, PageRankVertex, DEFAULT_DAMPING};
pub use shortest_path::{shortest_path_graph, ShortestPathVertex};
