//! Error types for the Pregel runtime
//!
//! Every error here is fatal for the run it occurs in: BSP needs every
//! active vertex to finish its superstep and every message to land, so
//! nothing is retried or skipped.

use super::graph::GraphBuildError;
use super::vertex::VertexId;
use thiserror::Error;

/// Errors that can occur while building or running a Pregel computation
#[derive(Debug, Error)]
pub enum PregelError {
    /// A message was addressed to a vertex that is not in the graph
    #[error("Unknown vertex {target} (message from {sender} in superstep {superstep})")]
    UnknownVertex {
        sender: VertexId,
        target: VertexId,
        superstep: usize,
    },

    /// Error reported by an algorithm from inside `update`
    #[error("Vertex error in {vertex_id}: {message}")]
    VertexError {
        vertex_id: VertexId,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A vertex failed its update; the superstep did not complete
    #[error("Update of vertex {vertex_id} failed in superstep {superstep}")]
    Update {
        vertex_id: VertexId,
        superstep: usize,
        #[source]
        source: Box<PregelError>,
    },

    /// Two vertices share the same identity
    #[error("Duplicate vertex: {0}")]
    DuplicateVertex(VertexId),

    /// The graph could not be assembled
    #[error(transparent)]
    Graph(#[from] GraphBuildError),

    /// Invalid run configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The worker pool could not be created
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The run already failed; its vertex state is not a valid result
    #[error("Run aborted by an earlier error")]
    Aborted,
}

impl PregelError {
    /// Create a vertex error with a message
    pub fn vertex_error(vertex_id: impl Into<VertexId>, message: impl Into<String>) -> Self {
        Self::VertexError {
            vertex_id: vertex_id.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a vertex error with source
    pub fn vertex_error_with_source(
        vertex_id: impl Into<VertexId>,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::VertexError {
            vertex_id: vertex_id.into(),
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a routing error
    pub fn unknown_vertex(
        sender: impl Into<VertexId>,
        target: impl Into<VertexId>,
        superstep: usize,
    ) -> Self {
        Self::UnknownVertex {
            sender: sender.into(),
            target: target.into(),
            superstep,
        }
    }

    /// Wrap an error raised by a vertex update
    pub fn update_failed(vertex_id: impl Into<VertexId>, superstep: usize, source: PregelError) -> Self {
        Self::Update {
            vertex_id: vertex_id.into(),
            superstep,
            source: Box::new(source),
        }
    }

    /// Create a config error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// The vertex this error is attributed to, if any
    pub fn vertex_id(&self) -> Option<&VertexId> {
        match self {
            PregelError::VertexError { vertex_id, .. } | PregelError::Update { vertex_id, .. } => {
                Some(vertex_id)
            }
            PregelError::UnknownVertex { sender, .. } => Some(sender),
            PregelError::DuplicateVertex(id) => Some(id),
            _ => None,
        }
    }

    /// Check if the error came from message routing
    pub fn is_routing_error(&self) -> bool {
        matches!(self, PregelError::UnknownVertex { .. })
    }
}
