//! pregel-bsp: Bulk-Synchronous-Parallel vertex-centric graph engine
//!
//! Every vertex runs the same [`Vertex::update`] program in lockstep rounds
//! (supersteps) and communicates only through messages sent along directed
//! edges. Messages produced in superstep `t` are delivered at the start of
//! superstep `t + 1`.
//!
//! - **Vertex**: computation unit with an identity, a value and out-edges
//! - **Message**: payload routed from one vertex to another
//! - **Partitioner**: splits eligible vertices into one slice per worker
//! - **Pregel**: the superstep orchestrator
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Pregel                              │
//! │  ┌─────────┐  ┌─────────┐  ┌─────────┐                      │
//! │  │Superstep│→ │Superstep│→ │Superstep│→ ...                 │
//! │  │    0    │  │    1    │  │    2    │                      │
//! │  └─────────┘  └─────────┘  └─────────┘                      │
//! │       │            │            │                           │
//! │       ▼            ▼            ▼                           │
//! │  ┌─────────────────────────────────────────────────────┐    │
//! │  │ Reactivate → Compute (parallel) → Route → Stats     │    │
//! │  └─────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use pregel::algorithms::shortest_path_graph;
//! use pregel::{Pregel, PregelConfig};
//!
//! let edges = [(0, 1), (1, 2), (0, 3), (3, 2)];
//! let vertices = shortest_path_graph(4, &edges, 0).unwrap();
//! let mut engine = Pregel::new(vertices, PregelConfig::default().with_workers(2)).unwrap();
//!
//! let summary = engine.run().unwrap();
//! assert!(summary.converged());
//! assert_eq!(engine.value(2_usize), Some(&Some(2.0)));
//! ```

pub mod algorithms;
pub mod config;
pub mod error;
pub mod graph;
pub mod message;
pub mod partition;
pub mod report;
pub mod runtime;
pub mod vertex;

// Re-exports
pub use config::PregelConfig;
pub use error::PregelError;
pub use graph::{GraphBuildError, GraphBuilder};
pub use message::{Message, VertexMessage, DEFAULT_WEIGHT};
pub use partition::Partitioner;
pub use report::{RunSummary, StepOutcome, SuperstepReport, Termination};
pub use runtime::{Pregel, StatsFn};
pub use vertex::{BoxedVertex, ComputeContext, Edge, Vertex, VertexEntry, VertexId, VertexState};
