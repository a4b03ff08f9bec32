// src/engine/mod.rs

//! Orchestration engine for checkdag.
//!
//! This module ties together:
//! - the DAG scheduler
//! - the status-reporting interface
//! - the main runtime event loop that reacts to:
//!   - the initial run request
//!   - job completion events
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

use std::collections::BTreeMap;

use crate::dag::JobStatus;

/// Canonical job name type used throughout the engine.
pub type JobName = String;

/// Outcome of a job process for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Success,
    Failed(i32),
}

/// Events flowing into the runtime from the entry point and executors.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Start the run: admit every configured job and dispatch the roots.
    RunRequested,
    /// A job finished with a concrete outcome.
    JobCompleted {
        job: JobName,
        outcome: JobOutcome,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Final result of a run: every job's status plus the aggregate verdict.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub run_id: u64,
    pub statuses: BTreeMap<JobName, JobStatus>,
}

impl RunSummary {
    /// Aggregate verdict: the run succeeded iff every job succeeded.
    pub fn succeeded(&self) -> bool {
        !self.statuses.is_empty()
            && self
                .statuses
                .values()
                .all(|status| *status == JobStatus::Succeeded)
    }

    /// Process exit code implementing the run's exit contract:
    /// 0 iff the aggregate status is succeeded.
    pub fn exit_code(&self) -> i32 {
        if self.succeeded() { 0 } else { 1 }
    }

    /// Jobs that did not succeed, for the final log line.
    pub fn unsuccessful_jobs(&self) -> Vec<(&str, JobStatus)> {
        self.statuses
            .iter()
            .filter(|(_, status)| **status != JobStatus::Succeeded)
            .map(|(name, status)| (name.as_str(), *status))
            .collect()
    }
}

pub mod core;
pub mod event_handlers;
pub mod report;
pub mod runtime;

pub use self::core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use report::{LogStatusReporter, StatusReporter};
pub use runtime::Runtime;
