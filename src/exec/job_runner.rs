// src/exec/job_runner.rs

//! Individual job runner: sequential steps, timeout, retries.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::dag::{ScheduledJob, StepSpec};
use crate::engine::{JobOutcome, RuntimeEvent};

/// Run a single job to its final outcome and emit one `JobCompleted` event.
///
/// - Steps execute sequentially; the first failing step fails the attempt
///   and later steps do not run.
/// - If the job has a timeout, it applies to each attempt as a whole; a
///   timed-out attempt counts as failed and its process is killed
///   (`kill_on_drop` on the child).
/// - A failed attempt is retried up to `job.retries` extra times before the
///   failure is recorded.
pub async fn run_job(job: ScheduledJob, runtime_tx: mpsc::Sender<RuntimeEvent>) {
    let name = job.name.clone();
    let attempts = job.retries + 1;

    let mut outcome = JobOutcome::Failed(-1);
    for attempt in 1..=attempts {
        outcome = run_attempt(&job, attempt).await;
        if outcome == JobOutcome::Success {
            break;
        }
        if attempt < attempts {
            warn!(
                job = %name,
                run_id = job.run_id,
                attempt,
                remaining = attempts - attempt,
                "job attempt failed; retrying"
            );
        }
    }

    let _ = runtime_tx
        .send(RuntimeEvent::JobCompleted { job: name, outcome })
        .await;
}

/// Run one attempt of the job, applying the per-job timeout if configured.
async fn run_attempt(job: &ScheduledJob, attempt: u32) -> JobOutcome {
    match job.timeout_secs {
        Some(secs) => {
            match timeout(Duration::from_secs(secs), run_steps(job, attempt)).await {
                Ok(outcome) => outcome,
                Err(_) => {
                    // Dropping the steps future kills the in-flight child.
                    warn!(
                        job = %job.name,
                        run_id = job.run_id,
                        timeout_secs = secs,
                        "job timed out"
                    );
                    JobOutcome::Failed(-1)
                }
            }
        }
        None => run_steps(job, attempt).await,
    }
}

/// Execute the job's steps in order; stop at the first failure.
async fn run_steps(job: &ScheduledJob, attempt: u32) -> JobOutcome {
    for step in job.steps.iter() {
        info!(
            job = %job.name,
            run_id = job.run_id,
            attempt,
            step = %step.display_name(),
            "starting step"
        );

        match run_step(job, step).await {
            Ok(status) if status.success() => {
                debug!(
                    job = %job.name,
                    step = %step.display_name(),
                    "step succeeded"
                );
            }
            Ok(status) => {
                let code = status.code().unwrap_or(-1);
                warn!(
                    job = %job.name,
                    run_id = job.run_id,
                    step = %step.display_name(),
                    exit_code = code,
                    "step failed"
                );
                return JobOutcome::Failed(code);
            }
            Err(err) => {
                error!(
                    job = %job.name,
                    run_id = job.run_id,
                    step = %step.display_name(),
                    error = %err,
                    "step execution error"
                );
                return JobOutcome::Failed(-1);
            }
        }
    }

    JobOutcome::Success
}

/// Spawn one step's command and wait for it, streaming its output.
async fn run_step(job: &ScheduledJob, step: &StepSpec) -> Result<ExitStatus> {
    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(&step.run);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(&step.run);
        c
    };

    if let Some(cwd) = &step.cwd {
        cmd.current_dir(cwd);
    }

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().with_context(|| {
        format!(
            "spawning process for step '{}' of job '{}'",
            step.display_name(),
            job.name
        )
    })?;

    // Stream stdout; job output is part of the run's log.
    if let Some(stdout) = child.stdout.take() {
        let job_name = job.name.clone();
        let run_id = job.run_id;
        tokio::spawn(async move {
            let reader = BufReader::new(stdout);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                info!(job = %job_name, run_id, "stdout: {}", line);
            }
        });
    }

    // Always consume stderr so buffers don't fill; log at debug.
    if let Some(stderr) = child.stderr.take() {
        let job_name = job.name.clone();
        let run_id = job.run_id;
        tokio::spawn(async move {
            let reader = BufReader::new(stderr);
            let mut lines = reader.lines();

            while let Ok(Some(line)) = lines.next_line().await {
                debug!(job = %job_name, run_id, "stderr: {}", line);
            }
        });
    }

    let status = child.wait().await.with_context(|| {
        format!(
            "waiting for process of step '{}' of job '{}'",
            step.display_name(),
            job.name
        )
    })?;

    Ok(status)
}
