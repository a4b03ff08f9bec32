use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use checkdag::dag::ScheduledJob;
use checkdag::engine::{JobOutcome, RuntimeEvent};
use checkdag::errors::Result;
use checkdag::exec::ExecutorBackend;

/// A fake executor that:
/// - records which jobs were "run"
/// - immediately reports JobCompleted(Success) for each scheduled job.
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    executed: Arc<Mutex<Vec<String>>>,
}

impl FakeExecutor {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        executed: Arc<Mutex<Vec<String>>>,
    ) -> Self {
        Self {
            runtime_tx,
            executed,
        }
    }
}

impl ExecutorBackend for FakeExecutor {
    fn spawn_ready_jobs(
        &mut self,
        jobs: Vec<ScheduledJob>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);

        Box::pin(async move {
            for j in jobs {
                {
                    let mut guard = executed.lock().unwrap();
                    guard.push(j.name.clone());
                }

                tx.send(RuntimeEvent::JobCompleted {
                    job: j.name.clone(),
                    outcome: JobOutcome::Success,
                })
                .await
                .map_err(anyhow::Error::from)?;
            }
            Ok(())
        })
    }
}

/// A fake executor with a scripted set of failing jobs.
///
/// Jobs in `failing` complete with `JobOutcome::Failed(1)`; every other job
/// completes successfully. Execution order is recorded like `FakeExecutor`.
pub struct ScriptedExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    executed: Arc<Mutex<Vec<String>>>,
    failing: HashSet<String>,
}

impl ScriptedExecutor {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        executed: Arc<Mutex<Vec<String>>>,
        failing: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            runtime_tx,
            executed,
            failing: failing.into_iter().collect(),
        }
    }
}

impl ExecutorBackend for ScriptedExecutor {
    fn spawn_ready_jobs(
        &mut self,
        jobs: Vec<ScheduledJob>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);
        let failing = self.failing.clone();

        Box::pin(async move {
            for j in jobs {
                {
                    let mut guard = executed.lock().unwrap();
                    guard.push(j.name.clone());
                }

                let outcome = if failing.contains(&j.name) {
                    JobOutcome::Failed(1)
                } else {
                    JobOutcome::Success
                };

                tx.send(RuntimeEvent::JobCompleted {
                    job: j.name.clone(),
                    outcome,
                })
                .await
                .map_err(anyhow::Error::from)?;
            }
            Ok(())
        })
    }
}
