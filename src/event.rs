// src/event.rs

//! Repository event domain types.
//!
//! An [`Event`] describes a single change in the repository as reported by
//! the host (a push, or a pull-request update). Events are immutable; the
//! trigger evaluator only reads them.

use std::fmt;

use serde::Deserialize;

use crate::errors::{CheckdagError, Result};

/// Kind of repository event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Push,
    PullRequest,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Push => write!(f, "push"),
            EventKind::PullRequest => write!(f, "pull_request"),
        }
    }
}

/// A single repository event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub kind: EventKind,
    /// Branch the change happened on (pushed branch / PR source branch).
    pub source_branch: String,
    /// Branch a pull-request targets. `None` for push events.
    pub target_branch: Option<String>,
}

impl Event {
    /// Build a push event for the given branch.
    pub fn push(branch: impl Into<String>) -> Self {
        Self {
            kind: EventKind::Push,
            source_branch: branch.into(),
            target_branch: None,
        }
    }

    /// Build a pull-request event from `source` targeting `target`.
    pub fn pull_request(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: EventKind::PullRequest,
            source_branch: source.into(),
            target_branch: Some(target.into()),
        }
    }

    /// Build an event from raw CLI-style inputs, enforcing that pull-request
    /// events carry a target branch.
    pub fn from_parts(
        kind: EventKind,
        source_branch: String,
        target_branch: Option<String>,
    ) -> Result<Self> {
        match kind {
            EventKind::Push => Ok(Self {
                kind,
                source_branch,
                target_branch,
            }),
            EventKind::PullRequest => {
                let target = target_branch.ok_or_else(|| {
                    CheckdagError::ConfigError(
                        "pull-request events require --target-branch".to_string(),
                    )
                })?;
                Ok(Self {
                    kind,
                    source_branch,
                    target_branch: Some(target),
                })
            }
        }
    }

    /// The branch that trigger rules should match for this event.
    ///
    /// Push events match the pushed branch; pull-request events match the
    /// branch the PR targets.
    pub fn match_branch(&self) -> &str {
        match self.kind {
            EventKind::Push => &self.source_branch,
            EventKind::PullRequest => self
                .target_branch
                .as_deref()
                .unwrap_or(&self.source_branch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pull_request_without_target_is_rejected() {
        let res = Event::from_parts(EventKind::PullRequest, "topic".to_string(), None);
        assert!(matches!(res, Err(CheckdagError::ConfigError(_))));
    }

    #[test]
    fn match_branch_picks_target_for_pull_requests() {
        let ev = Event::pull_request("topic", "main");
        assert_eq!(ev.match_branch(), "main");

        let ev = Event::push("version-2");
        assert_eq!(ev.match_branch(), "version-2");
    }
}
