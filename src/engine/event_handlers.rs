// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use tracing::warn;

use crate::dag::{ScheduledJob, Scheduler, SchedulerStep, StatusChange};
use crate::engine::{JobName, JobOutcome, RunSummary};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Report a job status transition through the status-reporting interface.
    ReportStatus { run_id: u64, change: StatusChange },
    /// Send these jobs to the executor.
    DispatchJobs(Vec<ScheduledJob>),
    /// The run reached its final state; this carries the verdict.
    FinishRun(RunSummary),
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute, in order.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

/// Handle the initial run request.
///
/// Admits every configured job into the run and dispatches the DAG roots.
pub fn handle_run_requested(scheduler: &mut Scheduler) -> CoreStep {
    if !scheduler.is_idle() {
        warn!("run requested while a run is already active; ignoring");
        return CoreStep {
            commands: Vec::new(),
            keep_running: true,
        };
    }

    let step = scheduler.start_run();
    step_to_core(scheduler, step)
}

/// Handle a job completion event.
pub fn handle_job_completion(
    scheduler: &mut Scheduler,
    job: JobName,
    outcome: JobOutcome,
) -> CoreStep {
    let step = scheduler.handle_completion(&job, outcome);
    step_to_core(scheduler, step)
}

/// Translate a [`SchedulerStep`] into ordered commands for the IO shell.
///
/// Status transitions are reported before the affected jobs are dispatched,
/// so the reporting interface always observes `running` before any output of
/// the job itself.
fn step_to_core(scheduler: &Scheduler, step: SchedulerStep) -> CoreStep {
    let run_id = scheduler.run_id();
    let mut commands = Vec::new();

    for change in step.transitions {
        commands.push(CoreCommand::ReportStatus { run_id, change });
    }

    if !step.newly_scheduled.is_empty() {
        commands.push(CoreCommand::DispatchJobs(step.newly_scheduled));
    }

    let mut keep_running = true;
    if step.run_finished {
        commands.push(CoreCommand::FinishRun(RunSummary {
            run_id,
            statuses: scheduler.statuses(),
        }));
        keep_running = false;
    }

    CoreStep {
        commands,
        keep_running,
    }
}

/// Build the summary for an aborted run (shutdown before all jobs were
/// terminal). Non-terminal jobs keep their last status, so the aggregate
/// verdict cannot be "succeeded".
pub fn abort_summary(scheduler: &Scheduler) -> RunSummary {
    RunSummary {
        run_id: scheduler.run_id(),
        statuses: scheduler.statuses(),
    }
}
