#![allow(dead_code)]

use std::collections::BTreeMap;

use checkdag::config::{ConfigFile, ConfigSection, JobConfig, RawConfigFile, StepConfig, TriggerSection};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                config: ConfigSection::default(),
                trigger: TriggerSection::default(),
                job: BTreeMap::new(),
            },
        }
    }

    pub fn with_job(mut self, name: &str, job: JobConfig) -> Self {
        self.config.job.insert(name.to_string(), job);
        self
    }

    pub fn with_push_trigger(mut self, pattern: &str) -> Self {
        self.config.trigger.push.push(pattern.to_string());
        self
    }

    pub fn with_pull_request_trigger(mut self, pattern: &str) -> Self {
        self.config.trigger.pull_request.push(pattern.to_string());
        self
    }

    pub fn with_max_parallel(mut self, val: usize) -> Self {
        self.config.config.max_parallel = val;
        self
    }

    pub fn with_job_timeout_secs(mut self, val: u64) -> Self {
        self.config.config.job_timeout_secs = Some(val);
        self
    }

    pub fn with_retries(mut self, val: u32) -> Self {
        self.config.config.retries = val;
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `JobConfig`. Starts with a single step running `cmd`.
pub struct JobConfigBuilder {
    job: JobConfig,
}

impl JobConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            job: JobConfig {
                needs: vec![],
                step: vec![StepConfig {
                    name: None,
                    run: cmd.to_string(),
                    cwd: None,
                }],
                timeout_secs: None,
                retries: None,
            },
        }
    }

    pub fn needs(mut self, dep: &str) -> Self {
        self.job.needs.push(dep.to_string());
        self
    }

    pub fn step(mut self, cmd: &str) -> Self {
        self.job.step.push(StepConfig {
            name: None,
            run: cmd.to_string(),
            cwd: None,
        });
        self
    }

    pub fn named_step(mut self, name: &str, cmd: &str) -> Self {
        self.job.step.push(StepConfig {
            name: Some(name.to_string()),
            run: cmd.to_string(),
            cwd: None,
        });
        self
    }

    pub fn step_in_dir(mut self, cmd: &str, cwd: &str) -> Self {
        self.job.step.push(StepConfig {
            name: None,
            run: cmd.to_string(),
            cwd: Some(cwd.to_string()),
        });
        self
    }

    pub fn timeout_secs(mut self, val: u64) -> Self {
        self.job.timeout_secs = Some(val);
        self
    }

    pub fn retries(mut self, val: u32) -> Self {
        self.job.retries = Some(val);
        self
    }

    pub fn build(self) -> JobConfig {
        self.job
    }
}
