// src/engine/report.rs

//! Status-reporting interface.
//!
//! The host's status API is an external collaborator: checkdag calls it at
//! every job status transition, and that's the whole contract. The runtime
//! talks to a [`StatusReporter`] trait object so that:
//!
//! - production uses [`LogStatusReporter`], which emits structured tracing
//!   events (a real deployment would post to a commit-status endpoint here)
//! - tests substitute a recording reporter and assert on the transition
//!   sequence.

use std::future::Future;
use std::pin::Pin;

use tracing::info;

use crate::dag::StatusChange;
use crate::errors::Result;

/// Trait abstracting where job status transitions are reported.
pub trait StatusReporter: Send {
    /// Report a single job status transition for the given run.
    ///
    /// Called exactly once per transition, in the order the transitions
    /// happened.
    fn report(
        &mut self,
        run_id: u64,
        change: StatusChange,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Production reporter: logs every transition as a structured event.
#[derive(Debug, Default)]
pub struct LogStatusReporter;

impl StatusReporter for LogStatusReporter {
    fn report(
        &mut self,
        run_id: u64,
        change: StatusChange,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            info!(
                run_id,
                job = %change.job,
                status = %change.status,
                "status transition"
            );
            Ok(())
        })
    }
}
