//! Message envelope for Pregel vertex communication
//!
//! Vertices communicate only by sending messages along directed edges.
//! A message produced during superstep `t` is delivered at the start of
//! superstep `t + 1` and never earlier.

use serde::{Deserialize, Serialize};

use super::vertex::VertexId;

/// Weight carried by messages sent without an explicit edge weight
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Trait bound for message payloads
///
/// Payloads cross worker threads during routing and may be cloned when a
/// vertex broadcasts to all of its out-edges.
pub trait VertexMessage: Clone + Send + Sync + 'static {}

impl<T> VertexMessage for T where T: Clone + Send + Sync + 'static {}

/// An immutable message routed from one vertex to another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message<M> {
    source: VertexId,
    target: VertexId,
    weight: f64,
    payload: M,
}

impl<M> Message<M> {
    /// Create a message with unit weight
    pub fn new(source: impl Into<VertexId>, target: impl Into<VertexId>, payload: M) -> Self {
        Self::weighted(source, target, DEFAULT_WEIGHT, payload)
    }

    /// Create a message carrying an explicit edge weight
    pub fn weighted(
        source: impl Into<VertexId>,
        target: impl Into<VertexId>,
        weight: f64,
        payload: M,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight,
            payload,
        }
    }

    /// The vertex that produced this message
    pub fn source(&self) -> &VertexId {
        &self.source
    }

    /// The vertex this message is addressed to
    pub fn target(&self) -> &VertexId {
        &self.target
    }

    /// Edge weight attached by the sender
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// The algorithm-defined payload
    pub fn payload(&self) -> &M {
        &self.payload
    }

    /// Consume the envelope and return the payload
    pub fn into_payload(self) -> M {
        self.payload
    }
}
