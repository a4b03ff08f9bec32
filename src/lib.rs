// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod event;
pub mod exec;
pub mod logging;
pub mod trigger;

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::dag::{JobStatus, Scheduler};
use crate::engine::{CoreRuntime, LogStatusReporter, RunSummary, Runtime, RuntimeEvent};
use crate::errors::Result;
use crate::event::Event;
use crate::exec::RealExecutorBackend;
use crate::trigger::{rules_from_config, should_run};

/// What a `checkdag` invocation amounted to.
#[derive(Debug)]
pub enum RunOutcome {
    /// `--dry-run`: config was parsed and printed, nothing executed.
    DryRun,
    /// No trigger rule matched the event; no run was created.
    NotTriggered,
    /// A run executed to a final state.
    Completed(RunSummary),
}

impl RunOutcome {
    /// Process exit code: 0 iff there is nothing to gate on or the run's
    /// aggregate status is succeeded.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::DryRun | RunOutcome::NotTriggered => 0,
            RunOutcome::Completed(summary) => summary.exit_code(),
        }
    }
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - trigger evaluation
/// - scheduler / runtime
/// - executor and status reporter
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<RunOutcome> {
    let cfg = load_and_validate(&args.config)?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(RunOutcome::DryRun);
    }

    let branch = args.branch.clone().ok_or_else(|| {
        errors::CheckdagError::ConfigError("--branch is required to evaluate an event".to_string())
    })?;
    let event = Event::from_parts(args.event.into(), branch, args.target_branch.clone())?;

    // Trigger evaluation: no match, no run.
    let rules = rules_from_config(&cfg)?;
    if !should_run(&event, &rules) {
        info!(
            kind = %event.kind,
            branch = %event.match_branch(),
            "no trigger rule matched; not starting a run"
        );
        return Ok(RunOutcome::NotTriggered);
    }

    info!(
        kind = %event.kind,
        branch = %event.match_branch(),
        jobs = cfg.job.len(),
        "trigger matched; starting run"
    );

    let scheduler = Scheduler::from_config(&cfg);

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    // Process executor backend (real implementation in production).
    let executor = RealExecutorBackend::new(rt_tx.clone(), cfg.config.max_parallel);

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    // Seed the run.
    rt_tx
        .send(RuntimeEvent::RunRequested)
        .await
        .map_err(errors::Error::from)?;

    let core = CoreRuntime::new(scheduler);
    let runtime = Runtime::new(core, rt_rx, executor, LogStatusReporter);

    let summary = runtime.run().await?;
    log_summary(&summary);

    Ok(RunOutcome::Completed(summary))
}

fn log_summary(summary: &RunSummary) {
    if summary.succeeded() {
        info!(run_id = summary.run_id, "all jobs succeeded");
        return;
    }

    for (job, status) in summary.unsuccessful_jobs() {
        match status {
            JobStatus::Failed => warn!(job = %job, "job failed"),
            JobStatus::Skipped => warn!(job = %job, "job skipped (upstream failure)"),
            _ => warn!(job = %job, status = %status, "job did not finish"),
        }
    }
}

/// Simple dry-run output: print triggers, jobs, deps and steps.
fn print_dry_run(cfg: &ConfigFile) {
    println!("checkdag dry-run");
    println!("  config.max_parallel = {}", cfg.config.max_parallel);
    if let Some(secs) = cfg.config.job_timeout_secs {
        println!("  config.job_timeout_secs = {secs}");
    }
    if cfg.config.retries > 0 {
        println!("  config.retries = {}", cfg.config.retries);
    }
    println!();

    println!("triggers:");
    if !cfg.trigger.push.is_empty() {
        println!("  push: {:?}", cfg.trigger.push);
    }
    if !cfg.trigger.pull_request.is_empty() {
        println!("  pull_request: {:?}", cfg.trigger.pull_request);
    }
    if cfg.trigger.is_empty() {
        println!("  (none; no event will ever start a run)");
    }
    println!();

    println!("jobs ({}):", cfg.job.len());
    for (name, job) in cfg.job.iter() {
        println!("  - {name}");
        if !job.needs.is_empty() {
            println!("      needs: {:?}", job.needs);
        }
        for step in job.step.iter() {
            match &step.cwd {
                Some(cwd) => println!("      step: {} (cwd: {cwd})", step.display_name()),
                None => println!("      step: {}", step.display_name()),
            }
        }
        if let Some(secs) = job.timeout_secs {
            println!("      timeout_secs: {secs}");
        }
        if let Some(retries) = job.retries {
            println!("      retries: {retries}");
        }
    }
}
