use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use crate::config::model::ConfigFile;
use crate::dag::graph::JobGraph;
use crate::dag::job_info::{JobInfo, JobStatus, ScheduledJob};
use crate::dag::scheduler_step::{SchedulerStep, StatusChange};
use crate::engine::{JobName, JobOutcome};

/// Scheduler holds the immutable job graph plus per-run status state.
///
/// It is responsible for:
/// - admitting every job into the run as `Pending`
/// - deciding when a job is ready to run (all `needs` succeeded)
/// - recording completions from the executor
/// - skipping dependents when a job fails or is skipped
/// - detecting when the run has finished
///
/// All status transitions go through a single guarded helper, so a terminal
/// status can never revert and every observed transition is legal.
#[derive(Debug)]
pub struct Scheduler {
    graph: JobGraph,
    jobs: HashMap<JobName, JobInfo>,
    /// Monotonically increasing run ID.
    run_counter: u64,
    /// Whether a run is currently active.
    run_active: bool,
}

impl Scheduler {
    /// Construct a scheduler from a validated [`ConfigFile`].
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let graph = JobGraph::from_config(cfg);

        let mut jobs = HashMap::new();

        for (name, jc) in cfg.job.iter() {
            let deps = graph
                .dependencies_of(name)
                .iter()
                .cloned()
                .collect::<Vec<_>>();
            let info = JobInfo::from_config(name.clone(), jc, &cfg.config, deps);
            jobs.insert(name.clone(), info);
        }

        Self {
            graph,
            jobs,
            run_counter: 0,
            run_active: false,
        }
    }

    /// Returns `true` if there is currently no active run.
    pub fn is_idle(&self) -> bool {
        !self.run_active
    }

    /// Current run ID (0 before the first run starts).
    pub fn run_id(&self) -> u64 {
        self.run_counter
    }

    /// Read-only view of the given job's status.
    pub fn status_of(&self, job: &str) -> Option<JobStatus> {
        self.jobs.get(job).map(|info| info.status)
    }

    /// Snapshot of every job's current status.
    pub fn statuses(&self) -> BTreeMap<JobName, JobStatus> {
        self.jobs
            .values()
            .map(|info| (info.name.clone(), info.status))
            .collect()
    }

    /// Aggregate verdict: true iff every job succeeded.
    pub fn aggregate_succeeded(&self) -> bool {
        self.jobs
            .values()
            .all(|info| info.status == JobStatus::Succeeded)
    }

    /// All job names known to the scheduler.
    pub fn job_names(&self) -> impl Iterator<Item = &str> {
        self.graph.jobs()
    }

    /// Start the run: admit every job as `Pending` and schedule the jobs
    /// whose dependencies are already satisfied (the DAG roots).
    pub fn start_run(&mut self) -> SchedulerStep {
        self.run_counter += 1;
        self.run_active = true;

        debug!(run_id = self.run_counter, "scheduler: starting run");

        let mut step = SchedulerStep::default();

        let mut names: Vec<JobName> = self.jobs.keys().cloned().collect();
        names.sort();
        for name in names {
            if let Some(info) = self.jobs.get_mut(&name) {
                info.status = JobStatus::Pending;
                step.transitions.push(StatusChange {
                    job: name,
                    status: JobStatus::Pending,
                });
            }
        }

        step.absorb(self.collect_ready());
        step.run_finished = self.maybe_finish_run();
        step
    }

    /// Record the outcome of a job process and advance the run: schedule jobs
    /// that became ready, or skip the failed job's dependents.
    pub fn handle_completion(&mut self, job: &str, outcome: JobOutcome) -> SchedulerStep {
        if !self.run_active {
            warn!(job = %job, "completion received with no active run; ignoring");
            return SchedulerStep::default();
        }

        if !self.jobs.contains_key(job) {
            warn!(job = %job, "completion for unknown job; ignoring");
            return SchedulerStep::default();
        }

        let mut step = SchedulerStep::default();

        match outcome {
            JobOutcome::Success => {
                debug!(job = %job, run_id = self.run_counter, "job completed successfully");
                self.transition(job, JobStatus::Succeeded, &mut step);
                step.absorb(self.collect_ready());
            }
            JobOutcome::Failed(code) => {
                warn!(
                    job = %job,
                    run_id = self.run_counter,
                    exit_code = code,
                    "job failed; skipping dependents"
                );
                self.transition(job, JobStatus::Failed, &mut step);
                self.skip_dependents(job, &mut step);
            }
        }

        step.run_finished = self.maybe_finish_run();
        step
    }

    /// Apply a guarded status transition, recording it in `step`.
    ///
    /// Illegal transitions (e.g. anything out of a terminal status) are
    /// logged and dropped, which keeps the per-job status monotonic.
    fn transition(&mut self, job: &str, next: JobStatus, step: &mut SchedulerStep) {
        let Some(info) = self.jobs.get_mut(job) else {
            warn!(job = %job, "transition for unknown job; ignoring");
            return;
        };

        if !info.status.can_transition_to(next) {
            warn!(
                job = %info.name,
                from = %info.status,
                to = %next,
                "illegal status transition; ignoring"
            );
            return;
        }

        info.status = next;
        step.transitions.push(StatusChange {
            job: info.name.clone(),
            status: next,
        });
    }

    /// Collect jobs that are `Pending` with all dependencies `Succeeded`,
    /// mark them `Running`, and return them as `ScheduledJob`s.
    fn collect_ready(&mut self) -> SchedulerStep {
        let mut step = SchedulerStep::default();

        // Decide first, then mutate to avoid borrowing issues.
        let mut candidates: Vec<JobName> = self
            .jobs
            .values()
            .filter_map(|info| {
                if info.status == JobStatus::Pending && self.deps_succeeded(info) {
                    Some(info.name.clone())
                } else {
                    None
                }
            })
            .collect();
        candidates.sort();

        for name in candidates {
            self.transition(&name, JobStatus::Running, &mut step);

            if let Some(info) = self.jobs.get(&name) {
                info!(
                    job = %info.name,
                    run_id = self.run_counter,
                    steps = info.steps.len(),
                    "dependencies satisfied; dispatching job"
                );
                step.newly_scheduled
                    .push(ScheduledJob::from_job_info(info, self.run_counter));
            }
        }

        step
    }

    /// Whether every dependency of the given job is `Succeeded`.
    fn deps_succeeded(&self, info: &JobInfo) -> bool {
        info.deps.iter().all(|dep_name| {
            match self.jobs.get(dep_name) {
                Some(dep) => dep.status == JobStatus::Succeeded,
                None => {
                    // Should not happen with validated config, but be safe.
                    warn!(
                        job = %info.name,
                        dep = %dep_name,
                        "dependency missing from jobs map"
                    );
                    false
                }
            }
        })
    }

    /// Mark all transitive dependents of a failed or skipped job as
    /// `Skipped`. A skipped job never enters `Running`.
    fn skip_dependents(&mut self, root: &str, step: &mut SchedulerStep) {
        let mut stack: Vec<JobName> = self.graph.dependents_of(root).to_vec();

        while let Some(name) = stack.pop() {
            let Some(info) = self.jobs.get(&name) else {
                continue;
            };

            // Only pending jobs can be skipped; a dependent can never be
            // running here because its dependency had not succeeded.
            if info.status == JobStatus::Pending {
                self.transition(&name, JobStatus::Skipped, step);
                debug!(job = %name, "skipped due to upstream failure");
                stack.extend(self.graph.dependents_of(&name).iter().cloned());
            }
        }
    }

    /// Determine whether all jobs are terminal and clear the active-run flag
    /// if so. Returns `true` if this call finished the run.
    fn maybe_finish_run(&mut self) -> bool {
        if !self.run_active {
            return false;
        }

        let all_terminal = self.jobs.values().all(|info| info.status.is_terminal());

        if all_terminal {
            info!(
                run_id = self.run_counter,
                succeeded = self.aggregate_succeeded(),
                "scheduler: all jobs terminal; run finished"
            );
            self.run_active = false;
            true
        } else {
            false
        }
    }
}
