//! PageRank as a vertex program
//!
//! Every vertex starts with `1 / N`. From superstep 1 on it sets its rank to
//! `(1 - d) / N + d * sum(incoming)` and, while iterations remain, sends
//! `rank / out_degree` along each out-edge. A sink sends nothing, so its
//! rank mass leaves the graph instead of dividing by zero.

use crate::error::PregelError;
use crate::graph::{GraphBuildError, GraphBuilder};
use crate::vertex::{ComputeContext, Vertex, VertexEntry};

/// Conventional damping factor
pub const DEFAULT_DAMPING: f64 = 0.85;

/// PageRank vertex program
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRankVertex {
    damping: f64,
    num_vertices: usize,
    iterations: usize,
}

impl PageRankVertex {
    /// Create a program for a graph of `num_vertices` running `iterations`
    /// rank updates
    pub fn new(num_vertices: usize, iterations: usize) -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            num_vertices: num_vertices.max(1),
            iterations,
        }
    }

    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Rank every vertex starts with
    pub fn initial_rank(&self) -> f64 {
        1.0 / self.num_vertices as f64
    }
}

impl Vertex for PageRankVertex {
    type Value = f64;
    type Message = f64;

    fn update(&mut self, ctx: &mut ComputeContext<'_, f64, f64>) -> Result<(), PregelError> {
        if ctx.superstep() >= 1 {
            let incoming: f64 = ctx.messages().iter().map(|m| *m.payload()).sum();
            let teleport = (1.0 - self.damping) / self.num_vertices as f64;
            ctx.set_value(teleport + self.damping * incoming);
        }

        if ctx.superstep() < self.iterations && ctx.out_degree() > 0 {
            let share = *ctx.value() / ctx.out_degree() as f64;
            ctx.broadcast(share);
        }

        if ctx.superstep() >= self.iterations {
            ctx.vote_to_halt();
        }
        Ok(())
    }
}

/// Build a PageRank graph over vertices `0..num_vertices`
///
/// Parallel edges count once per occurrence.
pub fn pagerank_graph(
    num_vertices: usize,
    edges: &[(usize, usize)],
    iterations: usize,
) -> Result<Vec<VertexEntry<PageRankVertex>>, GraphBuildError> {
    let program = PageRankVertex::new(num_vertices, iterations);
    let rank = program.initial_rank();
    let builder = (0..num_vertices).fold(GraphBuilder::new(), |builder, id| {
        builder.vertex(id, program, rank)
    });
    edges
        .iter()
        .fold(builder, |builder, &(from, to)| builder.edge(from, to))
        .build()
}
