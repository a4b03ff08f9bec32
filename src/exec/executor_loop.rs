// src/exec/executor_loop.rs

//! Main executor loop that manages running job processes.

use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::info;

use crate::dag::ScheduledJob;
use crate::engine::RuntimeEvent;
use crate::exec::job_runner::run_job;

/// Spawn the background executor loop.
///
/// The returned `mpsc::Sender<ScheduledJob>` is what the runtime (or
/// `RealExecutorBackend`) uses to dispatch work. Each scheduled job executes
/// in its own Tokio task. `max_parallel` bounds how many jobs run at the
/// same time (`0` = unbounded): the loop acquires a semaphore permit
/// *before* spawning, so excess dispatches wait in the channel until a
/// worker frees up.
///
/// The scheduler only dispatches a job once per run, so the loop does not
/// need to dedupe by job name.
pub fn spawn_executor(
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    max_parallel: usize,
) -> mpsc::Sender<ScheduledJob> {
    let (tx, mut rx) = mpsc::channel::<ScheduledJob>(32);

    let limiter: Option<Arc<Semaphore>> = if max_parallel > 0 {
        Some(Arc::new(Semaphore::new(max_parallel)))
    } else {
        None
    };

    tokio::spawn(async move {
        info!(max_parallel, "executor loop started");

        while let Some(job) = rx.recv().await {
            let permit = match &limiter {
                Some(sem) => match Arc::clone(sem).acquire_owned().await {
                    Ok(permit) => Some(permit),
                    // The semaphore is never closed while the loop is alive.
                    Err(_) => break,
                },
                None => None,
            };

            let rt_tx = runtime_tx.clone();
            tokio::spawn(async move {
                // Hold the permit for the whole job, steps and retries included.
                let _permit = permit;
                run_job(job, rt_tx).await;
            });
        }

        info!("executor loop finished (channel closed)");
    });

    tx
}
