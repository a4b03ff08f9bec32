// src/dag/mod.rs

//! Job graph representation and scheduling.
//!
//! - [`graph`] holds a simple directed acyclic graph of jobs.
//! - [`scheduler`] contains the per-run state machine that decides
//!   which jobs are ready to run, and what happens when a job finishes.
//! - [`job_info`] provides job metadata, statuses and scheduled job types.
//! - [`scheduler_step`] defines the result type for scheduler steps.

pub mod graph;
pub mod job_info;
pub mod scheduler;
pub mod scheduler_step;

pub use graph::JobGraph;
pub use job_info::{JobStatus, ScheduledJob, StepSpec};
pub use scheduler::Scheduler;
pub use scheduler_step::{SchedulerStep, StatusChange};
