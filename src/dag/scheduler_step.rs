// src/dag/scheduler_step.rs

//! Step-by-step execution result types for the scheduler.

use crate::dag::job_info::{JobStatus, ScheduledJob};
use crate::engine::JobName;

/// A single observed job status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub job: JobName,
    pub status: JobStatus,
}

/// Structured result of a single scheduler "step".
///
/// This is what the engine core turns into commands for the IO shell, and
/// what tests use to manually step the DAG and make assertions about what
/// changed.
#[derive(Debug, Clone, Default)]
pub struct SchedulerStep {
    /// Every status transition that happened during this step, in order.
    /// Each of these must be reported through the status-reporting interface.
    pub transitions: Vec<StatusChange>,
    /// Jobs that became ready to run as a result of this step.
    pub newly_scheduled: Vec<ScheduledJob>,
    /// Whether this step caused the run to finish (every job terminal).
    pub run_finished: bool,
}

impl SchedulerStep {
    /// Merge another step's results into this one (used when a step is
    /// composed of several internal phases).
    pub fn absorb(&mut self, mut other: SchedulerStep) {
        self.transitions.append(&mut other.transitions);
        self.newly_scheduled.append(&mut other.newly_scheduled);
        self.run_finished = self.run_finished || other.run_finished;
    }
}
