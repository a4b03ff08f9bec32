// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// max_parallel = 2
///
/// [trigger]
/// push = ["main", "version-*"]
/// pull_request = ["main"]
///
/// [job.install]
/// [[job.install.step]]
/// name = "install dependencies"
/// run = "npm ci"
/// cwd = "web"
///
/// [job.lint]
/// needs = ["install"]
/// [[job.lint.step]]
/// run = "npx prettier --check ."
/// ```
///
/// All sections are optional and have reasonable defaults, except that at
/// least one `[job.<name>]` must be present (checked in `validate`).
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Global runtime options from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Trigger rules from `[trigger]`.
    #[serde(default)]
    pub trigger: TriggerSection,

    /// All jobs from `[job.<name>]`.
    ///
    /// Keys are the *job names* (e.g. `"install"`, `"lint"`, `"ci-mark"`).
    #[serde(default)]
    pub job: BTreeMap<String, JobConfig>,
}

/// `[config]` section: global runtime options.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Maximum number of jobs executing at the same time.
    ///
    /// `0` (the default) means unbounded.
    #[serde(default)]
    pub max_parallel: usize,

    /// Default wall-clock timeout per job, in seconds.
    ///
    /// `None` (the default) means no timeout: a job may run indefinitely.
    #[serde(default)]
    pub job_timeout_secs: Option<u64>,

    /// Default number of automatic re-executions after a job fails.
    ///
    /// The default is `0`: a failing job is recorded as failed immediately.
    #[serde(default)]
    pub retries: u32,
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            max_parallel: 0,
            job_timeout_secs: None,
            retries: 0,
        }
    }
}

/// `[trigger]` section: event kind -> branch patterns.
///
/// Patterns are exact branch names or globs (`version-*`). An empty list for
/// an event kind means that kind never triggers a run.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TriggerSection {
    /// Branch patterns matched against the pushed branch.
    #[serde(default)]
    pub push: Vec<String>,

    /// Branch patterns matched against a pull-request's target branch.
    #[serde(default)]
    pub pull_request: Vec<String>,
}

impl TriggerSection {
    /// True if no event kind has any pattern configured.
    pub fn is_empty(&self) -> bool {
        self.push.is_empty() && self.pull_request.is_empty()
    }
}

/// `[job.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct JobConfig {
    /// Names of jobs that must succeed before this one may start.
    #[serde(default)]
    pub needs: Vec<String>,

    /// Ordered steps executed sequentially; the first failing step fails
    /// the job and later steps do not run.
    #[serde(default)]
    pub step: Vec<StepConfig>,

    /// Optional per-job timeout override; falls back to
    /// `[config].job_timeout_secs`.
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Optional per-job retry override; falls back to `[config].retries`.
    #[serde(default)]
    pub retries: Option<u32>,
}

impl JobConfig {
    /// Effective timeout given the `[config]` default.
    pub fn effective_timeout_secs(&self, default_timeout: Option<u64>) -> Option<u64> {
        self.timeout_secs.or(default_timeout)
    }

    /// Effective retry count given the `[config]` default.
    pub fn effective_retries(&self, default_retries: u32) -> u32 {
        self.retries.unwrap_or(default_retries)
    }
}

/// A single shell step inside a job.
#[derive(Debug, Clone, Deserialize)]
pub struct StepConfig {
    /// Optional display name used in logs and status reporting.
    #[serde(default)]
    pub name: Option<String>,

    /// The command to execute (run through the platform shell).
    pub run: String,

    /// Optional working directory, relative to the process cwd.
    #[serde(default)]
    pub cwd: Option<String>,
}

impl StepConfig {
    /// Name to show in logs: the explicit `name` or the command itself.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.run)
    }
}

/// Validated configuration.
///
/// Constructed via `TryFrom<RawConfigFile>` in `config::validate`; once this
/// exists, all `needs` references are known to resolve and the job graph is
/// known to be acyclic.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub trigger: TriggerSection,
    pub job: BTreeMap<String, JobConfig>,
}

impl ConfigFile {
    /// Construct without validation. Only `config::validate` should call
    /// this, after all checks have passed.
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        trigger: TriggerSection,
        job: BTreeMap<String, JobConfig>,
    ) -> Self {
        Self {
            config,
            trigger,
            job,
        }
    }
}
