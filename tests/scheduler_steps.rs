// tests/scheduler_steps.rs
//
// Manual stepping of the scheduler: drive it with completion outcomes and
// assert on each step's transitions, dispatches and run state.

mod common;
use crate::common::builders::{ConfigFileBuilder, JobConfigBuilder};
use crate::common::init_tracing;

use checkdag::config::ConfigFile;
use checkdag::dag::{JobStatus, Scheduler};
use checkdag::engine::JobOutcome;

/// install -> {lint, unit} -> mark
fn diamond_config() -> ConfigFile {
    ConfigFileBuilder::new()
        .with_job("install", JobConfigBuilder::new("npm ci").build())
        .with_job("lint", JobConfigBuilder::new("npx prettier --check .").needs("install").build())
        .with_job("unit", JobConfigBuilder::new("npm test").needs("install").build())
        .with_job(
            "mark",
            JobConfigBuilder::new("true").needs("lint").needs("unit").build(),
        )
        .build()
}

fn scheduled_names(step: &checkdag::dag::SchedulerStep) -> Vec<String> {
    step.newly_scheduled.iter().map(|j| j.name.clone()).collect()
}

#[test]
fn start_run_admits_all_jobs_and_schedules_roots() {
    init_tracing();

    let mut scheduler = Scheduler::from_config(&diamond_config());
    assert!(scheduler.is_idle());

    let step = scheduler.start_run();

    assert!(!scheduler.is_idle());
    assert_eq!(scheduled_names(&step), vec!["install"]);
    assert!(!step.run_finished);

    assert_eq!(scheduler.status_of("install"), Some(JobStatus::Running));
    assert_eq!(scheduler.status_of("lint"), Some(JobStatus::Pending));
    assert_eq!(scheduler.status_of("unit"), Some(JobStatus::Pending));
    assert_eq!(scheduler.status_of("mark"), Some(JobStatus::Pending));

    // Every admitted job was reported pending, and the root running.
    let pending = step
        .transitions
        .iter()
        .filter(|c| c.status == JobStatus::Pending)
        .count();
    assert_eq!(pending, 4);
    let running = step
        .transitions
        .iter()
        .filter(|c| c.status == JobStatus::Running)
        .count();
    assert_eq!(running, 1);
}

#[test]
fn completions_unlock_dependents_until_run_succeeds() {
    init_tracing();

    let mut scheduler = Scheduler::from_config(&diamond_config());
    scheduler.start_run();

    let step = scheduler.handle_completion("install", JobOutcome::Success);
    let mut unlocked = scheduled_names(&step);
    unlocked.sort();
    assert_eq!(unlocked, vec!["lint", "unit"]);
    assert!(!step.run_finished);

    // mark needs both lint and unit; one of them is not enough.
    let step = scheduler.handle_completion("lint", JobOutcome::Success);
    assert!(scheduled_names(&step).is_empty());
    assert_eq!(scheduler.status_of("mark"), Some(JobStatus::Pending));

    let step = scheduler.handle_completion("unit", JobOutcome::Success);
    assert_eq!(scheduled_names(&step), vec!["mark"]);

    let step = scheduler.handle_completion("mark", JobOutcome::Success);
    assert!(step.run_finished);
    assert!(scheduler.is_idle());
    assert!(scheduler.aggregate_succeeded());
}

#[test]
fn root_failure_skips_everything_downstream() {
    init_tracing();

    let mut scheduler = Scheduler::from_config(&diamond_config());
    scheduler.start_run();

    let step = scheduler.handle_completion("install", JobOutcome::Failed(1));

    // Nothing new to run; the whole graph below install is skipped and the
    // run is over.
    assert!(scheduled_names(&step).is_empty());
    assert!(step.run_finished);
    assert!(scheduler.is_idle());

    assert_eq!(scheduler.status_of("install"), Some(JobStatus::Failed));
    assert_eq!(scheduler.status_of("lint"), Some(JobStatus::Skipped));
    assert_eq!(scheduler.status_of("unit"), Some(JobStatus::Skipped));
    assert_eq!(scheduler.status_of("mark"), Some(JobStatus::Skipped));

    assert!(!scheduler.aggregate_succeeded());
}

#[test]
fn sibling_jobs_are_unaffected_by_a_failure() {
    init_tracing();

    // docs has no relation to the failing branch.
    let cfg = ConfigFileBuilder::new()
        .with_job("docs", JobConfigBuilder::new("mdbook build").build())
        .with_job("lint", JobConfigBuilder::new("false").build())
        .with_job("mark", JobConfigBuilder::new("true").needs("lint").build())
        .build();

    let mut scheduler = Scheduler::from_config(&cfg);
    let step = scheduler.start_run();
    let mut roots = scheduled_names(&step);
    roots.sort();
    assert_eq!(roots, vec!["docs", "lint"]);

    let step = scheduler.handle_completion("lint", JobOutcome::Failed(2));
    assert_eq!(scheduler.status_of("mark"), Some(JobStatus::Skipped));
    // docs is still running; the run is not over yet.
    assert!(!step.run_finished);

    let step = scheduler.handle_completion("docs", JobOutcome::Success);
    assert!(step.run_finished);

    // One failed leaf fails the whole run even though docs succeeded.
    assert_eq!(scheduler.status_of("docs"), Some(JobStatus::Succeeded));
    assert!(!scheduler.aggregate_succeeded());
}

#[test]
fn lint_then_mark_scenario() {
    init_tracing();

    let cfg = ConfigFileBuilder::new()
        .with_job("lint", JobConfigBuilder::new("npx prettier --check .").build())
        .with_job("mark", JobConfigBuilder::new("true").needs("lint").build())
        .build();

    // lint succeeds -> mark runs -> run succeeds.
    let mut scheduler = Scheduler::from_config(&cfg);
    scheduler.start_run();
    let step = scheduler.handle_completion("lint", JobOutcome::Success);
    assert_eq!(scheduled_names(&step), vec!["mark"]);
    let step = scheduler.handle_completion("mark", JobOutcome::Success);
    assert!(step.run_finished);
    assert!(scheduler.aggregate_succeeded());

    // lint fails -> mark is skipped, never running -> run fails.
    let mut scheduler = Scheduler::from_config(&cfg);
    scheduler.start_run();
    let step = scheduler.handle_completion("lint", JobOutcome::Failed(1));
    assert!(scheduled_names(&step).is_empty());
    assert!(step.run_finished);
    assert_eq!(scheduler.status_of("mark"), Some(JobStatus::Skipped));
    assert!(!scheduler.aggregate_succeeded());
}

#[test]
fn terminal_statuses_are_monotonic() {
    init_tracing();

    let cfg = ConfigFileBuilder::new()
        .with_job("lint", JobConfigBuilder::new("false").build())
        .build();

    let mut scheduler = Scheduler::from_config(&cfg);
    scheduler.start_run();

    let step = scheduler.handle_completion("lint", JobOutcome::Failed(1));
    assert!(step.run_finished);
    assert_eq!(scheduler.status_of("lint"), Some(JobStatus::Failed));

    // A stray duplicate completion changes nothing.
    let step = scheduler.handle_completion("lint", JobOutcome::Success);
    assert!(step.transitions.is_empty());
    assert!(scheduled_names(&step).is_empty());
    assert_eq!(scheduler.status_of("lint"), Some(JobStatus::Failed));
}

#[test]
fn completion_for_unknown_job_is_ignored() {
    init_tracing();

    let cfg = ConfigFileBuilder::new()
        .with_job("lint", JobConfigBuilder::new("echo lint").build())
        .build();

    let mut scheduler = Scheduler::from_config(&cfg);
    scheduler.start_run();

    let step = scheduler.handle_completion("ghost", JobOutcome::Success);
    assert!(step.transitions.is_empty());
    assert!(!step.run_finished);
    assert_eq!(scheduler.status_of("lint"), Some(JobStatus::Running));
}
