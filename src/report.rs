//! Run results and per-superstep reports

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Built-in bookkeeping for one completed superstep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperstepReport {
    /// Index of the superstep this report describes
    pub superstep: usize,
    /// Vertices whose `update` ran
    pub computed: usize,
    /// Halted vertices woken up by incoming messages
    pub reactivated: usize,
    /// Messages routed for delivery in the next superstep
    pub messages: usize,
    /// Vertices still active after the superstep
    pub active: usize,
    /// Wall-clock time spent in the superstep
    #[serde(with = "humantime_serde")]
    pub elapsed: Duration,
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// No active vertices and no pending messages
    Halted,
    /// The configured superstep bound was reached first
    SuperstepLimit,
    /// The caller stopped stepping before either of the above
    Incomplete,
}

/// Outcome of a single call to `Pregel::step`
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// A superstep ran to completion
    Continued(SuperstepReport),
    /// The computation has already halted; nothing was done
    Halted,
    /// The superstep bound is reached; nothing was done
    LimitReached,
}

impl StepOutcome {
    /// Check if the call ran a superstep
    pub fn did_work(&self) -> bool {
        matches!(self, StepOutcome::Continued(_))
    }
}

/// Result of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary<R> {
    /// Number of supersteps executed
    pub supersteps: usize,
    /// Why the run stopped
    pub termination: Termination,
    /// Records returned by the statistics callback, one per superstep
    pub stats: Vec<R>,
    /// Engine reports, one per superstep
    pub reports: Vec<SuperstepReport>,
}

impl<R> RunSummary<R> {
    /// Check if the run stopped because every vertex halted
    pub fn converged(&self) -> bool {
        self.termination == Termination::Halted
    }

    /// Total messages routed over the run
    pub fn total_messages(&self) -> usize {
        self.reports.iter().map(|r| r.messages).sum()
    }

    /// Total `update` calls over the run
    pub fn total_updates(&self) -> usize {
        self.reports.iter().map(|r| r.computed).sum()
    }

    /// Total wall-clock time spent in supersteps
    pub fn elapsed(&self) -> Duration {
        self.reports.iter().map(|r| r.elapsed).sum()
    }
}
