//! Graph builder DSL.
//!
//! Provides a fluent API for declaring vertices and directed edges, then
//! validates the graph and hands the vertex collection to the runtime.

use std::collections::HashMap;

use thiserror::Error;

use super::config::PregelConfig;
use super::error::PregelError;
use super::message::DEFAULT_WEIGHT;
use super::runtime::Pregel;
use super::vertex::{Edge, Vertex, VertexEntry, VertexId};

/// Errors that can occur while building a graph.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphBuildError {
    #[error("duplicate vertex id: {0}")]
    DuplicateVertex(VertexId),
    #[error("edge {from} -> {to} references unknown vertex {missing}")]
    UnknownVertex {
        from: VertexId,
        to: VertexId,
        missing: VertexId,
    },
}

/// Builder for constructing graphs with fluent API.
pub struct GraphBuilder<V: Vertex> {
    vertices: Vec<VertexEntry<V>>,
    edges: Vec<(VertexId, Edge)>,
}

impl<V: Vertex> Default for GraphBuilder<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<V: Vertex> GraphBuilder<V> {
    /// Create a new graph builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex.
    pub fn vertex(self, id: impl Into<VertexId>, program: V, value: V::Value) -> Self {
        self.entry(VertexEntry::new(id, program, value))
    }

    /// Add a prepared vertex entry, keeping any edges it already has.
    pub fn entry(mut self, entry: VertexEntry<V>) -> Self {
        self.vertices.push(entry);
        self
    }

    /// Add a unit-weight edge.
    pub fn edge(self, from: impl Into<VertexId>, to: impl Into<VertexId>) -> Self {
        self.weighted_edge(from, to, DEFAULT_WEIGHT)
    }

    /// Add a weighted edge.
    pub fn weighted_edge(
        mut self,
        from: impl Into<VertexId>,
        to: impl Into<VertexId>,
        weight: f64,
    ) -> Self {
        self.edges.push((from.into(), Edge::weighted(to, weight)));
        self
    }

    /// Validate and build the vertex collection.
    ///
    /// Edges are appended to their source vertex in declaration order.
    pub fn build(self) -> Result<Vec<VertexEntry<V>>, GraphBuildError> {
        let mut vertices = self.vertices;
        let mut index = HashMap::with_capacity(vertices.len());
        for (position, vertex) in vertices.iter().enumerate() {
            if index.insert(vertex.id().clone(), position).is_some() {
                return Err(GraphBuildError::DuplicateVertex(vertex.id().clone()));
            }
        }

        for (from, edge) in self.edges {
            let Some(&position) = index.get(&from) else {
                return Err(GraphBuildError::UnknownVertex {
                    missing: from.clone(),
                    from,
                    to: edge.target,
                });
            };
            if !index.contains_key(&edge.target) {
                return Err(GraphBuildError::UnknownVertex {
                    missing: edge.target.clone(),
                    from,
                    to: edge.target,
                });
            }
            vertices[position].push_edge(edge);
        }

        Ok(vertices)
    }

    /// Build the graph and wrap it in a runtime.
    pub fn into_pregel(self, config: PregelConfig) -> Result<Pregel<V>, PregelError> {
        Pregel::new(self.build()?, config)
    }
}
