// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the steps defined in the
//! jobs, using `tokio::process::Command`, and reporting back to the
//! orchestration runtime via `RuntimeEvent`s.
//!
//! - [`executor_loop`] owns the main executor loop which manages job
//!   processes and enforces the `max_parallel` limit.
//! - [`job_runner`] handles a single job: sequential steps, timeout,
//!   retries.
//! - [`backend`] provides the `ExecutorBackend` trait and a concrete
//!   `RealExecutorBackend` that the runtime uses in production, and which
//!   tests can replace with a fake implementation.

pub mod backend;
pub mod executor_loop;
pub mod job_runner;

pub use backend::{ExecutorBackend, RealExecutorBackend};
pub use executor_loop::spawn_executor;
