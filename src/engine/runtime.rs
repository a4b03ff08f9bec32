// src/engine/runtime.rs

use std::fmt;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::dag::ScheduledJob;
use crate::errors::Result;
use crate::exec::ExecutorBackend;

use super::core::CoreRuntime;
use super::report::StatusReporter;
use super::{CoreCommand, RunSummary, RuntimeEvent};

/// Drives the DAG scheduler in response to `RuntimeEvent`s, delegates
/// command execution to an `ExecutorBackend`, and forwards every status
/// transition to a `StatusReporter`.
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// runtime semantics. This struct handles async IO: reading events from
/// channels and dispatching jobs to the executor.
pub struct Runtime<E: ExecutorBackend, R: StatusReporter> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
    reporter: R,
}

impl<E: ExecutorBackend, R: StatusReporter> fmt::Debug for Runtime<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend, R: StatusReporter> Runtime<E, R> {
    pub fn new(
        core: CoreRuntime,
        event_rx: mpsc::Receiver<RuntimeEvent>,
        executor: E,
        reporter: R,
    ) -> Self {
        Self {
            core,
            event_rx,
            executor,
            reporter,
        }
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core runtime.
    /// - Executes commands returned by the core (report, dispatch, finish).
    ///
    /// Returns the run's final [`RunSummary`].
    pub async fn run(mut self) -> Result<RunSummary> {
        info!("checkdag runtime started");

        let mut summary: Option<RunSummary> = None;

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            // Feed the event into the pure core and get commands back.
            let step = self.core.step(event);

            // Execute the commands.
            for command in step.commands {
                if let Some(finished) = self.execute_command(command).await? {
                    summary = Some(finished);
                }
            }

            // If the core says to stop, break out of the loop.
            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        info!("runtime exiting");

        summary.ok_or_else(|| anyhow!("runtime exited before the run reached a final state").into())
    }

    /// Execute a single command from the core.
    ///
    /// Returns `Some(summary)` when the command finished the run.
    async fn execute_command(&mut self, command: CoreCommand) -> Result<Option<RunSummary>> {
        match command {
            CoreCommand::ReportStatus { run_id, change } => {
                self.reporter.report(run_id, change).await?;
                Ok(None)
            }
            CoreCommand::DispatchJobs(jobs) => {
                self.spawn_ready(jobs).await?;
                Ok(None)
            }
            CoreCommand::FinishRun(summary) => {
                info!(
                    run_id = summary.run_id,
                    succeeded = summary.succeeded(),
                    "run finished"
                );
                Ok(Some(summary))
            }
        }
    }

    async fn spawn_ready(&mut self, jobs: Vec<ScheduledJob>) -> Result<()> {
        if jobs.is_empty() {
            return Ok(());
        }

        let names: Vec<_> = jobs.iter().map(|j| j.name.as_str()).collect();
        debug!(?names, "spawning ready jobs");

        self.executor.spawn_ready_jobs(jobs).await
    }
}
