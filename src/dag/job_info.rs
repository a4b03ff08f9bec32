// src/dag/job_info.rs

//! Job metadata and per-run status types.

use std::fmt;
use std::path::PathBuf;

use crate::config::model::{ConfigSection, JobConfig, StepConfig};
use crate::engine::JobName;

/// Status of a job within a run.
///
/// Transitions are monotonic:
/// `Pending -> Running -> {Succeeded, Failed}` and `Pending -> Skipped`
/// (bypassing `Running`) when an upstream dependency fails or is skipped.
/// `Succeeded`, `Failed` and `Skipped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Skipped,
}

impl JobStatus {
    /// Whether this status admits no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Skipped
        )
    }

    /// Whether a transition from `self` to `next` is allowed by the state
    /// machine. Used by the scheduler to enforce monotonicity.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Pending, JobStatus::Skipped)
                | (JobStatus::Running, JobStatus::Succeeded)
                | (JobStatus::Running, JobStatus::Failed)
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Succeeded => "succeeded",
            JobStatus::Failed => "failed",
            JobStatus::Skipped => "skipped",
        };
        write!(f, "{s}")
    }
}

/// One shell step of a job, ready for execution.
#[derive(Debug, Clone)]
pub struct StepSpec {
    pub name: Option<String>,
    pub run: String,
    pub cwd: Option<PathBuf>,
}

impl StepSpec {
    pub fn from_config(cfg: &StepConfig) -> Self {
        Self {
            name: cfg.name.clone(),
            run: cfg.run.clone(),
            cwd: cfg.cwd.as_ref().map(PathBuf::from),
        }
    }

    /// Name to show in logs: the explicit name or the command itself.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.run)
    }
}

/// Static job information derived from config, plus per-run status.
#[derive(Debug, Clone)]
pub struct JobInfo {
    pub name: JobName,
    pub steps: Vec<StepSpec>,
    pub timeout_secs: Option<u64>,
    pub retries: u32,
    /// Direct dependencies for this job (names in `needs = [...]`).
    pub deps: Vec<JobName>,

    /// Current status within the run.
    pub status: JobStatus,
}

impl JobInfo {
    pub fn from_config(
        name: JobName,
        cfg: &JobConfig,
        globals: &ConfigSection,
        deps: Vec<JobName>,
    ) -> Self {
        Self {
            name,
            steps: cfg.step.iter().map(StepSpec::from_config).collect(),
            timeout_secs: cfg.effective_timeout_secs(globals.job_timeout_secs),
            retries: cfg.effective_retries(globals.retries),
            deps,
            status: JobStatus::Pending,
        }
    }
}

/// Description of a job that the scheduler wants the executor to run now.
#[derive(Debug, Clone)]
pub struct ScheduledJob {
    pub name: JobName,
    pub steps: Vec<StepSpec>,
    pub timeout_secs: Option<u64>,
    pub retries: u32,
    /// Run identifier; all jobs of the same run share it.
    pub run_id: u64,
}

impl ScheduledJob {
    pub fn from_job_info(info: &JobInfo, run_id: u64) -> Self {
        Self {
            name: info.name.clone(),
            steps: info.steps.clone(),
            timeout_secs: info.timeout_secs,
            retries: info.retries,
            run_id,
        }
    }
}
