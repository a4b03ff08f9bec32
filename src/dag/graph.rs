// src/dag/graph.rs

use std::collections::HashMap;

use crate::config::model::ConfigFile;

/// Internal node structure: stores immediate deps and dependents.
#[derive(Debug, Clone)]
struct JobNode {
    /// Direct dependencies: jobs that must succeed before this one can run.
    deps: Vec<String>,
    /// Direct dependents: jobs that depend on this one.
    dependents: Vec<String>,
}

/// Simple in-memory DAG representation keyed by job name.
///
/// This is intentionally lightweight; acyclicity is already validated in
/// `config::validate`, so here we just keep adjacency information for
/// scheduling and diagnostics.
#[derive(Debug, Clone)]
pub struct JobGraph {
    nodes: HashMap<String, JobNode>,
}

impl JobGraph {
    /// Build a graph from a validated [`ConfigFile`].
    ///
    /// Assumes that:
    /// - all `needs` references are valid
    /// - there are no cycles
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let mut nodes: HashMap<String, JobNode> = HashMap::new();

        // First pass: create nodes with their dependency lists.
        for (name, job) in cfg.job.iter() {
            nodes.insert(
                name.clone(),
                JobNode {
                    deps: job.needs.clone(),
                    dependents: Vec::new(),
                },
            );
        }

        // Second pass: populate dependents based on deps.
        let job_names: Vec<String> = nodes.keys().cloned().collect();
        for job_name in job_names {
            // clone to avoid borrowing issues while mutating
            let deps = nodes
                .get(&job_name)
                .map(|n| n.deps.clone())
                .unwrap_or_default();

            for dep in deps {
                if let Some(dep_node) = nodes.get_mut(&dep) {
                    dep_node.dependents.push(job_name.clone());
                }
            }
        }

        Self { nodes }
    }

    /// Return all job names.
    pub fn jobs(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(|s| s.as_str())
    }

    /// Immediate dependencies of a job (the jobs listed in its `needs`).
    pub fn dependencies_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.deps.as_slice())
            .unwrap_or(&[])
    }

    /// Immediate dependents of a job (jobs that list this one in their `needs`).
    pub fn dependents_of(&self, name: &str) -> &[String] {
        self.nodes
            .get(name)
            .map(|n| n.dependents.as_slice())
            .unwrap_or(&[])
    }
}
