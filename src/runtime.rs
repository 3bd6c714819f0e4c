//! Pregel Runtime - Core execution engine for vertex-centric graphs
//!
//! The runtime executes a graph through synchronized supersteps.
//! Each superstep follows the sequence: Reactivate → Compute → Barrier →
//! Route → Stats.
//!
//! The compute phase runs on a fixed-size worker pool. Every eligible vertex
//! lands in exactly one partition and only that partition's worker touches
//! it, so no per-vertex locking is needed. Routing, statistics and the
//! termination check run on the calling thread after all workers joined.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use super::config::PregelConfig;
use super::error::PregelError;
use super::message::Message;
use super::partition::Partitioner;
use super::report::{RunSummary, StepOutcome, SuperstepReport, Termination};
use super::vertex::{Vertex, VertexEntry, VertexId};

/// Statistics callback: observes every vertex after each superstep
pub type StatsFn<V, R> = Box<dyn Fn(&[VertexEntry<V>], usize) -> R + Send + Sync>;

/// Pregel runtime for a single graph computation
///
/// Lifecycle: construct with the full vertex collection, drive it with
/// [`Pregel::run`] or [`Pregel::step`], then read the vertices back.
/// Without a statistics callback the per-superstep record is the superstep
/// index.
pub struct Pregel<V: Vertex, R = usize> {
    /// Configuration for the runtime
    config: PregelConfig,
    /// Vertices in stable construction order
    vertices: Vec<VertexEntry<V>>,
    /// Vertex id -> position in `vertices`
    index: HashMap<VertexId, usize>,
    /// Worker pool reused across supersteps
    pool: rayon::ThreadPool,
    partitioner: Partitioner,
    /// Index of the next superstep to run
    superstep: usize,
    stats_fn: StatsFn<V, R>,
    stats: Vec<R>,
    reports: Vec<SuperstepReport>,
    /// Set once a superstep failed; the vertex state is then unusable
    failed: bool,
}

impl<V: Vertex> Pregel<V> {
    /// Create a runtime over `vertices`
    ///
    /// Fails on duplicate vertex ids, an invalid configuration, or if the
    /// worker pool cannot be started.
    pub fn new(
        vertices: impl IntoIterator<Item = VertexEntry<V>>,
        config: PregelConfig,
    ) -> Result<Self, PregelError> {
        config.validate()?;

        let vertices: Vec<VertexEntry<V>> = vertices.into_iter().collect();
        let mut index = HashMap::with_capacity(vertices.len());
        for (position, vertex) in vertices.iter().enumerate() {
            if index.insert(vertex.id().clone(), position).is_some() {
                return Err(PregelError::DuplicateVertex(vertex.id().clone()));
            }
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .thread_name(|i| format!("pregel-worker-{}", i))
            .build()?;

        Ok(Self {
            partitioner: Partitioner::new(config.workers),
            config,
            vertices,
            index,
            pool,
            superstep: 0,
            stats_fn: Box::new(superstep_index::<V>),
            stats: Vec::new(),
            reports: Vec::new(),
            failed: false,
        })
    }
}

impl<V: Vertex, R> Pregel<V, R> {
    /// Install a statistics callback
    ///
    /// The callback runs once per completed superstep, after routing, with
    /// read-only access to every vertex. It must be installed before the
    /// first superstep so that `stats` and `reports` stay one per superstep.
    pub fn with_stats<S>(
        self,
        stats: impl Fn(&[VertexEntry<V>], usize) -> S + Send + Sync + 'static,
    ) -> Result<Pregel<V, S>, PregelError> {
        if self.superstep > 0 || self.failed {
            return Err(PregelError::config_error(
                "statistics callback must be installed before the first superstep",
            ));
        }
        Ok(Pregel {
            config: self.config,
            vertices: self.vertices,
            index: self.index,
            pool: self.pool,
            partitioner: self.partitioner,
            superstep: self.superstep,
            stats_fn: Box::new(stats),
            stats: Vec::new(),
            reports: self.reports,
            failed: self.failed,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &PregelConfig {
        &self.config
    }

    /// Index of the next superstep; equals the number of completed ones
    pub fn superstep(&self) -> usize {
        self.superstep
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// All vertices in construction order
    pub fn vertices(&self) -> &[VertexEntry<V>] {
        &self.vertices
    }

    /// Look up a vertex by id
    pub fn vertex(&self, id: impl Into<VertexId>) -> Option<&VertexEntry<V>> {
        let id = id.into();
        self.index.get(&id).map(|&position| &self.vertices[position])
    }

    /// Look up a vertex value by id
    pub fn value(&self, id: impl Into<VertexId>) -> Option<&V::Value> {
        self.vertex(id).map(|vertex| vertex.value())
    }

    /// Iterate over `(id, value)` pairs in construction order
    ///
    /// After a failed superstep the values are partially updated and must
    /// not be read as a result; check [`Pregel::has_failed`] first.
    pub fn values(&self) -> impl Iterator<Item = (&VertexId, &V::Value)> + '_ {
        self.vertices.iter().map(|v| (v.id(), v.value()))
    }

    /// Records returned by the statistics callback so far
    pub fn stats(&self) -> &[R] {
        &self.stats
    }

    /// Engine reports for the supersteps run so far
    pub fn reports(&self) -> &[SuperstepReport] {
        &self.reports
    }

    /// Check if a superstep failed, which poisons the runtime
    pub fn has_failed(&self) -> bool {
        self.failed
    }

    /// Global halt condition: no active vertex and no pending message
    pub fn is_halted(&self) -> bool {
        self.vertices
            .iter()
            .all(|v| !v.is_active() && !v.has_pending_messages())
    }

    /// Why the computation stopped, or `None` if it can still advance or
    /// has failed
    pub fn termination(&self) -> Option<Termination> {
        if self.failed {
            None
        } else if self.is_halted() {
            Some(Termination::Halted)
        } else if self.config.limit_reached(self.superstep) {
            Some(Termination::SuperstepLimit)
        } else {
            None
        }
    }

    /// Run supersteps until the computation halts or hits the superstep bound
    ///
    /// Without a bound, an algorithm that never halts runs forever. Calling
    /// `run` again on a finished computation does no work.
    pub fn run(&mut self) -> Result<RunSummary<R>, PregelError>
    where
        R: Clone,
    {
        tracing::info!(
            vertices = self.vertices.len(),
            workers = self.config.workers,
            max_supersteps = ?self.config.max_supersteps,
            "Starting Pregel run"
        );

        let termination = self.run_to_termination()?;
        let summary = RunSummary {
            supersteps: self.superstep,
            termination,
            stats: self.stats.clone(),
            reports: self.reports.clone(),
        };

        tracing::info!(
            supersteps = summary.supersteps,
            termination = ?summary.termination,
            messages = summary.total_messages(),
            elapsed = ?summary.elapsed(),
            "Pregel run finished"
        );

        Ok(summary)
    }

    fn run_to_termination(&mut self) -> Result<Termination, PregelError> {
        loop {
            match self.step()? {
                StepOutcome::Continued(_) => {}
                StepOutcome::Halted => return Ok(Termination::Halted),
                StepOutcome::LimitReached => {
                    tracing::warn!(
                        superstep = self.superstep,
                        "Superstep bound reached before all vertices halted"
                    );
                    return Ok(Termination::SuperstepLimit);
                }
            }
        }
    }

    /// Execute a single superstep
    ///
    /// Returns without doing any work if the computation already halted or
    /// reached its superstep bound.
    pub fn step(&mut self) -> Result<StepOutcome, PregelError> {
        if self.failed {
            return Err(PregelError::Aborted);
        }
        if self.is_halted() {
            return Ok(StepOutcome::Halted);
        }
        if self.config.limit_reached(self.superstep) {
            return Ok(StepOutcome::LimitReached);
        }

        let superstep = self.superstep;
        let started = Instant::now();

        // 1. Reactivate halted vertices that received messages
        let reactivated = self
            .vertices
            .iter_mut()
            .map(|vertex| vertex.offer_reactivation())
            .filter(|&woke| woke)
            .count();

        // Every halted vertex may have declined its mail
        if self.is_halted() {
            return Ok(StepOutcome::Halted);
        }

        // Poisoned until routing completes, so a panicking update cannot
        // leave a half-computed superstep that runs again
        self.failed = true;

        // 2. Compute active vertices in parallel, 3. barrier
        let computed = match self.compute_vertices(superstep) {
            Ok(computed) => computed,
            Err(e) => return Err(self.abort(e)),
        };

        // 4. Route outgoing messages into next superstep's inboxes
        let messages = match self.route_messages(superstep) {
            Ok(messages) => messages,
            Err(e) => return Err(self.abort(e)),
        };

        // 5. Statistics hook
        let record = (self.stats_fn)(self.vertices.as_slice(), superstep);
        self.stats.push(record);

        let report = SuperstepReport {
            superstep,
            computed,
            reactivated,
            messages,
            active: self.vertices.iter().filter(|v| v.is_active()).count(),
            elapsed: started.elapsed(),
        };

        if self.config.tracing_enabled {
            tracing::debug!(
                superstep,
                computed,
                reactivated,
                messages,
                active = report.active,
                elapsed = ?report.elapsed,
                "Superstep completed"
            );
        }

        self.reports.push(report.clone());
        self.superstep += 1;
        self.failed = false;
        Ok(StepOutcome::Continued(report))
    }

    /// Run `update` on every active vertex across the worker pool
    ///
    /// Returns once every worker finished. On failure the error of the
    /// first failing partition (in partition order) is returned.
    fn compute_vertices(&mut self, superstep: usize) -> Result<usize, PregelError> {
        let mut eligible: Vec<&mut VertexEntry<V>> = self
            .vertices
            .iter_mut()
            .filter(|vertex| vertex.is_active())
            .collect();
        let computed = eligible.len();

        let parts = self.partitioner.split(&mut eligible);
        let mut results: Vec<Result<(), PregelError>> = parts.iter().map(|_| Ok(())).collect();
        let abort = AtomicBool::new(false);
        let tracing_enabled = self.config.tracing_enabled;

        self.pool.scope(|scope| {
            for (worker, (part, result)) in parts.into_iter().zip(results.iter_mut()).enumerate() {
                if part.is_empty() {
                    continue;
                }
                let abort = &abort;
                scope.spawn(move |_| {
                    *result = compute_partition(part, superstep, abort);
                    if tracing_enabled {
                        tracing::trace!(superstep, worker, ok = result.is_ok(), "Partition computed");
                    }
                });
            }
        });

        results.into_iter().collect::<Result<Vec<()>, _>>()?;
        Ok(computed)
    }

    /// Move every outbox into the inboxes of the next superstep
    ///
    /// All destinations are resolved before any inbox is replaced, so an
    /// unknown target leaves no partially delivered superstep behind.
    fn route_messages(&mut self, superstep: usize) -> Result<usize, PregelError> {
        for vertex in &self.vertices {
            if let Some(message) = vertex
                .outbox()
                .iter()
                .find(|message| !self.index.contains_key(message.target()))
            {
                return Err(PregelError::unknown_vertex(
                    vertex.id().clone(),
                    message.target().clone(),
                    superstep,
                ));
            }
        }

        let mut inboxes: Vec<Vec<Message<V::Message>>> =
            self.vertices.iter().map(|_| Vec::new()).collect();
        let mut routed = 0;
        for vertex in &mut self.vertices {
            for message in vertex.take_outbox() {
                inboxes[self.index[message.target()]].push(message);
                routed += 1;
            }
        }

        for (vertex, inbox) in self.vertices.iter_mut().zip(inboxes) {
            vertex.set_inbox(inbox);
        }
        Ok(routed)
    }

    /// Poison the runtime and drop every undelivered message
    fn abort(&mut self, error: PregelError) -> PregelError {
        tracing::error!(superstep = self.superstep, error = %error, "Superstep failed, aborting run");
        for vertex in &mut self.vertices {
            vertex.take_outbox();
        }
        self.failed = true;
        error
    }

    /// Consume the runtime and return the vertices
    ///
    /// Fails with [`PregelError::Aborted`] if a superstep failed, since the
    /// vertex values are then partially updated.
    pub fn into_vertices(self) -> Result<Vec<VertexEntry<V>>, PregelError> {
        if self.failed {
            return Err(PregelError::Aborted);
        }
        Ok(self.vertices)
    }

    /// Consume the runtime and return the vertices and the run summary
    ///
    /// A computation stopped by the caller before it halted or reached its
    /// bound is reported as [`Termination::Incomplete`].
    pub fn into_parts(self) -> Result<(Vec<VertexEntry<V>>, RunSummary<R>), PregelError> {
        if self.failed {
            return Err(PregelError::Aborted);
        }
        let termination = self.termination().unwrap_or(Termination::Incomplete);
        let summary = RunSummary {
            supersteps: self.superstep,
            termination,
            stats: self.stats,
            reports: self.reports,
        };
        Ok((self.vertices, summary))
    }
}

/// Default statistics record: the superstep index
fn superstep_index<V: Vertex>(_vertices: &[VertexEntry<V>], superstep: usize) -> usize {
    superstep
}

/// Worker body: update every vertex of one partition in order
fn compute_partition<V: Vertex>(
    part: &mut [&mut VertexEntry<V>],
    superstep: usize,
    abort: &AtomicBool,
) -> Result<(), PregelError> {
    for vertex in part.iter_mut() {
        if abort.load(Ordering::Relaxed) {
            break;
        }
        if let Err(e) = vertex.compute(superstep) {
            abort.store(true, Ordering::Relaxed);
            return Err(PregelError::update_failed(vertex.id().clone(), superstep, e));
        }
    }
    Ok(())
}
