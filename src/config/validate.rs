// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{CheckdagError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::CheckdagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.config, raw.trigger, raw.job))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    ensure_has_jobs(cfg)?;
    validate_steps(cfg)?;
    validate_job_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_jobs(cfg: &RawConfigFile) -> Result<()> {
    if cfg.job.is_empty() {
        return Err(CheckdagError::ConfigError(
            "config must contain at least one [job.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_steps(cfg: &RawConfigFile) -> Result<()> {
    for (name, job) in cfg.job.iter() {
        if job.step.is_empty() {
            return Err(CheckdagError::ConfigError(format!(
                "job '{}' has no [[job.{}.step]] entries",
                name, name
            )));
        }
        for step in job.step.iter() {
            if step.run.trim().is_empty() {
                return Err(CheckdagError::ConfigError(format!(
                    "job '{}' has a step with an empty `run` command",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_job_dependencies(cfg: &RawConfigFile) -> Result<()> {
    for (name, job) in cfg.job.iter() {
        for dep in job.needs.iter() {
            if !cfg.job.contains_key(dep) {
                return Err(CheckdagError::ConfigError(format!(
                    "job '{}' has unknown dependency '{}' in `needs`",
                    name, dep
                )));
            }
            if dep == name {
                return Err(CheckdagError::ConfigError(format!(
                    "job '{}' cannot depend on itself in `needs`",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawConfigFile) -> Result<()> {
    // Build a petgraph graph from the jobs and their dependencies.
    //
    // Edge direction: dep -> job
    // For:
    //   [job.lint]
    //   needs = ["install"]
    // we add edge install -> lint.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.job.keys() {
        graph.add_node(name.as_str());
    }

    for (name, job) in cfg.job.iter() {
        for dep in job.needs.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(CheckdagError::JobCycle(format!(
                "cycle detected in job graph involving job '{}'",
                node
            )))
        }
    }
}
