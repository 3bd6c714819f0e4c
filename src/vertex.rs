//! Vertex abstractions for the Pregel runtime
//!
//! A vertex is the unit of computation and state. Every superstep the
//! runtime calls [`Vertex::update`] once for each active vertex, handing it a
//! [`ComputeContext`] with the inbox delivered for that superstep.
//! Vertices communicate only via messages and vote to halt when they have
//! nothing left to do.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::PregelError;
use super::message::{Message, VertexMessage, DEFAULT_WEIGHT};

/// Unique identifier for a vertex in the graph
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VertexId(pub String);

impl VertexId {
    /// Create a new VertexId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for VertexId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for VertexId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&VertexId> for VertexId {
    fn from(id: &VertexId) -> Self {
        id.clone()
    }
}

impl From<usize> for VertexId {
    fn from(n: usize) -> Self {
        Self(n.to_string())
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Vertex execution state (Pregel's "vote to halt" mechanism)
///
/// - `Active`: vertex computes in the next superstep
/// - `Halted`: vertex voted to halt; an incoming message reactivates it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VertexState {
    #[default]
    Active,
    Halted,
}

impl VertexState {
    /// Check if the vertex is active
    pub fn is_active(&self) -> bool {
        matches!(self, VertexState::Active)
    }

    /// Check if the vertex has voted to halt
    pub fn is_halted(&self) -> bool {
        matches!(self, VertexState::Halted)
    }
}

/// A directed out-edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub target: VertexId,
    pub weight: f64,
}

impl Edge {
    /// Create an edge with unit weight
    pub fn new(target: impl Into<VertexId>) -> Self {
        Self::weighted(target, DEFAULT_WEIGHT)
    }

    /// Create an edge with an explicit weight
    pub fn weighted(target: impl Into<VertexId>, weight: f64) -> Self {
        Self {
            target: target.into(),
            weight,
        }
    }
}

/// Context provided to a vertex during `update`
///
/// Provides access to:
/// - The vertex's own id, value and out-edges
/// - Messages delivered for this superstep
/// - An outbox for messages delivered next superstep
/// - The current superstep number
pub struct ComputeContext<'a, T, M: VertexMessage> {
    vertex_id: &'a VertexId,
    superstep: usize,
    value: &'a mut T,
    edges: &'a [Edge],
    messages: &'a [Message<M>],
    outbox: Vec<Message<M>>,
    halt: bool,
}

impl<'a, T, M: VertexMessage> ComputeContext<'a, T, M> {
    /// Create a new compute context
    pub fn new(
        vertex_id: &'a VertexId,
        superstep: usize,
        value: &'a mut T,
        edges: &'a [Edge],
        messages: &'a [Message<M>],
    ) -> Self {
        Self {
            vertex_id,
            superstep,
            value,
            edges,
            messages,
            outbox: Vec::new(),
            halt: false,
        }
    }

    /// Get the current vertex ID
    pub fn id(&self) -> &VertexId {
        self.vertex_id
    }

    /// Current superstep number (0-indexed)
    pub fn superstep(&self) -> usize {
        self.superstep
    }

    /// Check if this is the first superstep
    pub fn is_first_superstep(&self) -> bool {
        self.superstep == 0
    }

    pub fn value(&self) -> &T {
        &*self.value
    }

    pub fn value_mut(&mut self) -> &mut T {
        &mut *self.value
    }

    pub fn set_value(&mut self, value: T) {
        *self.value = value;
    }

    /// Out-edges in construction order
    pub fn edges(&self) -> &'a [Edge] {
        self.edges
    }

    /// Number of out-edges; zero for sink vertices
    pub fn out_degree(&self) -> usize {
        self.edges.len()
    }

    /// Messages delivered for this superstep
    pub fn messages(&self) -> &'a [Message<M>] {
        self.messages
    }

    /// Check if any messages were received
    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }

    /// Get the count of received messages
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Send a message with unit weight
    ///
    /// Messages are delivered at the start of the next superstep. The
    /// target does not have to be an out-neighbor, but it must exist in
    /// the graph or routing fails.
    pub fn send(&mut self, target: impl Into<VertexId>, payload: M) {
        self.send_weighted(target, DEFAULT_WEIGHT, payload);
    }

    /// Send a message carrying an explicit weight
    pub fn send_weighted(&mut self, target: impl Into<VertexId>, weight: f64, payload: M) {
        self.outbox.push(Message::weighted(
            self.vertex_id.clone(),
            target,
            weight,
            payload,
        ));
    }

    /// Send a message along an edge, carrying the edge weight
    pub fn send_along(&mut self, edge: &Edge, payload: M) {
        self.send_weighted(edge.target.clone(), edge.weight, payload);
    }

    /// Send the same payload along every out-edge
    pub fn broadcast(&mut self, payload: M) {
        let edges = self.edges;
        for edge in edges {
            self.send_along(edge, payload.clone());
        }
    }

    /// Messages queued so far during this update
    pub fn outbox(&self) -> &[Message<M>] {
        &self.outbox
    }

    /// Stop being scheduled until a message arrives
    pub fn vote_to_halt(&mut self) {
        self.halt = true;
    }

    /// Check if the vertex voted to halt during this update
    pub fn is_halting(&self) -> bool {
        self.halt
    }

    /// Consume the context and return the outbox and the resulting state
    pub fn finish(self) -> (Vec<Message<M>>, VertexState) {
        let state = if self.halt {
            VertexState::Halted
        } else {
            VertexState::Active
        };
        (self.outbox, state)
    }
}

/// The core vertex trait for Pregel computation
///
/// Concrete algorithms implement this trait and nothing else; partitioning,
/// routing and the barrier are invisible to them.
///
/// # Example
///
/// ```
/// use pregel::{ComputeContext, PregelError, Vertex};
///
/// /// Propagates the largest value seen so far.
/// struct MaxVertex;
///
/// impl Vertex for MaxVertex {
///     type Value = u64;
///     type Message = u64;
///
///     fn update(&mut self, ctx: &mut ComputeContext<'_, u64, u64>) -> Result<(), PregelError> {
///         let incoming = ctx.messages().iter().map(|m| *m.payload()).max();
///         match incoming {
///             Some(max) if max > *ctx.value() => ctx.set_value(max),
///             _ if !ctx.is_first_superstep() => {
///                 ctx.vote_to_halt();
///                 return Ok(());
///             }
///             _ => {}
///         }
///         let value = *ctx.value();
///         ctx.broadcast(value);
///         Ok(())
///     }
/// }
/// ```
pub trait Vertex: Send + 'static {
    /// Algorithm-defined vertex value
    type Value: Send;

    /// Algorithm-defined message payload
    type Message: VertexMessage;

    /// Execute the vertex's computation for the current superstep
    ///
    /// Must return promptly; a slow update stalls the barrier for every
    /// other worker. Returning an error aborts the whole run.
    fn update(
        &mut self,
        ctx: &mut ComputeContext<'_, Self::Value, Self::Message>,
    ) -> Result<(), PregelError>;

    /// Called when the vertex receives messages while halted
    ///
    /// By default, returns `Active` to reactivate the vertex. Returning
    /// `Halted` keeps the vertex asleep and discards the inbox.
    fn on_reactivation(&self, _messages: &[Message<Self::Message>]) -> VertexState {
        VertexState::Active
    }
}

impl<T: Vertex + ?Sized> Vertex for Box<T> {
    type Value = T::Value;
    type Message = T::Message;

    fn update(
        &mut self,
        ctx: &mut ComputeContext<'_, Self::Value, Self::Message>,
    ) -> Result<(), PregelError> {
        (**self).update(ctx)
    }

    fn on_reactivation(&self, messages: &[Message<Self::Message>]) -> VertexState {
        (**self).on_reactivation(messages)
    }
}

/// Boxed vertex for graphs mixing several vertex kinds
pub type BoxedVertex<T, M> = Box<dyn Vertex<Value = T, Message = M>>;

/// A vertex as owned by the runtime: program, value, edges and mailboxes
///
/// Only the runtime writes the inbox; only the vertex's own `update` writes
/// the value, the state and the outbox.
pub struct VertexEntry<V: Vertex> {
    id: VertexId,
    program: V,
    value: V::Value,
    edges: Vec<Edge>,
    inbox: Vec<Message<V::Message>>,
    outbox: Vec<Message<V::Message>>,
    state: VertexState,
}

impl<V: Vertex> VertexEntry<V> {
    /// Create an active vertex with no edges and an empty inbox
    pub fn new(id: impl Into<VertexId>, program: V, value: V::Value) -> Self {
        Self {
            id: id.into(),
            program,
            value,
            edges: Vec::new(),
            inbox: Vec::new(),
            outbox: Vec::new(),
            state: VertexState::Active,
        }
    }

    /// Add a unit-weight out-edge
    pub fn with_edge(self, target: impl Into<VertexId>) -> Self {
        self.with_weighted_edge(target, DEFAULT_WEIGHT)
    }

    /// Add a weighted out-edge
    pub fn with_weighted_edge(mut self, target: impl Into<VertexId>, weight: f64) -> Self {
        self.edges.push(Edge::weighted(target, weight));
        self
    }

    /// Append out-edges in iteration order
    pub fn with_edges(mut self, edges: impl IntoIterator<Item = Edge>) -> Self {
        self.edges.extend(edges);
        self
    }

    /// Seed the inbox read at superstep 0
    pub fn with_inbox(mut self, messages: Vec<Message<V::Message>>) -> Self {
        self.inbox = messages;
        self
    }

    pub fn id(&self) -> &VertexId {
        &self.id
    }

    pub fn value(&self) -> &V::Value {
        &self.value
    }

    pub fn program(&self) -> &V {
        &self.program
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn out_degree(&self) -> usize {
        self.edges.len()
    }

    /// Messages waiting to be read at the next `update`
    pub fn inbox(&self) -> &[Message<V::Message>] {
        &self.inbox
    }

    pub fn state(&self) -> VertexState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    pub fn has_pending_messages(&self) -> bool {
        !self.inbox.is_empty()
    }

    /// Consume the entry and return its value
    pub fn into_value(self) -> V::Value {
        self.value
    }

    /// Run `update` for one superstep and record the outcome
    pub(crate) fn compute(&mut self, superstep: usize) -> Result<(), PregelError> {
        let mut ctx = ComputeContext::new(
            &self.id,
            superstep,
            &mut self.value,
            &self.edges,
            &self.inbox,
        );
        self.program.update(&mut ctx)?;
        let (outbox, state) = ctx.finish();
        self.outbox = outbox;
        self.state = state;
        Ok(())
    }

    /// Give a halted vertex with mail the chance to wake up
    ///
    /// Returns `true` when the vertex became active.
    pub(crate) fn offer_reactivation(&mut self) -> bool {
        if !self.state.is_halted() || self.inbox.is_empty() {
            return false;
        }
        match self.program.on_reactivation(&self.inbox) {
            VertexState::Active => {
                self.state = VertexState::Active;
                true
            }
            VertexState::Halted => {
                self.inbox.clear();
                false
            }
        }
    }

    pub(crate) fn push_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub(crate) fn outbox(&self) -> &[Message<V::Message>] {
        &self.outbox
    }

    pub(crate) fn take_outbox(&mut self) -> Vec<Message<V::Message>> {
        std::mem::take(&mut self.outbox)
    }

    pub(crate) fn set_inbox(&mut self, messages: Vec<Message<V::Message>>) {
        self.inbox = messages;
    }
}

impl<V> fmt::Debug for VertexEntry<V>
where
    V: Vertex,
    V::Value: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VertexEntry")
            .field("id", &self.id)
            .field("value", &self.value)
            .field("edges", &self.edges)
            .field("inbox", &self.inbox.len())
            .field("outbox", &self.outbox.len())
            .field("state", &self.state)
            .finish()
    }
}
