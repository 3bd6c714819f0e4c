//! Single-source shortest paths as a vertex program
//!
//! The source starts at distance zero. A vertex takes the minimum of its
//! inbox; when that improves on its current distance it adopts it and
//! offers `distance + edge weight` to every out-neighbor, otherwise it votes
//! to halt. With unit weights the result is the hop count.

use crate::error::PregelError;
use crate::graph::{GraphBuildError, GraphBuilder};
use crate::vertex::{ComputeContext, Vertex, VertexEntry};

/// Shortest-path vertex program; the value is `None` while unreachable
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShortestPathVertex {
    is_source: bool,
}

impl ShortestPathVertex {
    pub fn source() -> Self {
        Self { is_source: true }
    }

    pub fn other() -> Self {
        Self { is_source: false }
    }

    pub fn is_source(&self) -> bool {
        self.is_source
    }
}

impl Vertex for ShortestPathVertex {
    type Value = Option<f64>;
    type Message = f64;

    fn update(
        &mut self,
        ctx: &mut ComputeContext<'_, Option<f64>, f64>,
    ) -> Result<(), PregelError> {
        let start = if self.is_source { Some(0.0) } else { None };
        let candidate = ctx
            .messages()
            .iter()
            .map(|m| *m.payload())
            .fold(start, |best, d| Some(best.map_or(d, |b: f64| b.min(d))));

        let improved = match (candidate, *ctx.value()) {
            (Some(new), Some(current)) => new < current,
            (Some(_), None) => true,
            (None, _) => false,
        };

        match candidate {
            Some(distance) if improved => {
                ctx.set_value(Some(distance));
                for edge in ctx.edges() {
                    ctx.send_along(edge, distance + edge.weight);
                }
            }
            _ => ctx.vote_to_halt(),
        }
        Ok(())
    }
}

/// Build a unit-weight shortest-path graph over vertices `0..num_vertices`
pub fn shortest_path_graph(
    num_vertices: usize,
    edges: &[(usize, usize)],
    source: usize,
) -> Result<Vec<VertexEntry<ShortestPathVertex>>, GraphBuildError> {
    let builder = (0..num_vertices).fold(GraphBuilder::new(), |builder, id| {
        let program = if id == source {
            ShortestPathVertex::source()
        } else {
            ShortestPathVertex::other()
        };
        builder.vertex(id, program, None)
    });
    edges
        .iter()
        .fold(builder, |builder, &(from, to)| builder.edge(from, to))
        .build()
}
