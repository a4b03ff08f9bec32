// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - sending `ScheduledJob`s to the executor
//! - forwarding status transitions to the reporter
//! - handling Ctrl+C / shutdown
//!
//! The core is intended to be extensively unit tested without any Tokio,
//! channels, filesystem, or processes.

use crate::dag::Scheduler;
use crate::engine::event_handlers::{
    abort_summary, handle_job_completion, handle_run_requested, CoreCommand, CoreStep,
};
use crate::engine::RuntimeEvent;

/// Pure core runtime state.
///
/// This owns the DAG scheduler. It has **no** channels, no Tokio types, and
/// does not perform any IO.
#[derive(Debug)]
pub struct CoreRuntime {
    scheduler: Scheduler,
}

impl CoreRuntime {
    pub fn new(scheduler: Scheduler) -> Self {
        Self { scheduler }
    }

    /// Expose whether the scheduler is idle (for tests).
    pub fn is_idle(&self) -> bool {
        self.scheduler.is_idle()
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::RunRequested => handle_run_requested(&mut self.scheduler),
            RuntimeEvent::JobCompleted { job, outcome } => {
                handle_job_completion(&mut self.scheduler, job, outcome)
            }
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: vec![CoreCommand::FinishRun(abort_summary(&self.scheduler))],
                keep_running: false,
            },
        }
    }
}
