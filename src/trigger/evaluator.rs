// src/trigger/evaluator.rs

use anyhow::Result;
use tracing::debug;

use crate::config::model::ConfigFile;
use crate::event::{Event, EventKind};
use crate::trigger::patterns::BranchMatcher;

/// A single trigger rule: one event kind plus the branch patterns that
/// admit it.
#[derive(Debug, Clone)]
pub struct TriggerRule {
    kind: EventKind,
    branches: BranchMatcher,
}

impl TriggerRule {
    pub fn new(kind: EventKind, patterns: &[String]) -> Result<Self> {
        Ok(Self {
            kind,
            branches: BranchMatcher::new(patterns)?,
        })
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Whether this rule admits the given event.
    ///
    /// The rule must match the event kind, and the event's relevant branch
    /// (pushed branch for pushes, target branch for pull-requests) must match
    /// one of the rule's patterns.
    pub fn matches(&self, event: &Event) -> bool {
        self.kind == event.kind && self.branches.matches(event.match_branch())
    }
}

/// Build the rule set from the `[trigger]` config section.
///
/// Event kinds with an empty pattern list produce no rule at all, so they
/// can never admit an event.
pub fn rules_from_config(cfg: &ConfigFile) -> Result<Vec<TriggerRule>> {
    let mut rules = Vec::new();

    if !cfg.trigger.push.is_empty() {
        rules.push(TriggerRule::new(EventKind::Push, &cfg.trigger.push)?);
    }
    if !cfg.trigger.pull_request.is_empty() {
        rules.push(TriggerRule::new(
            EventKind::PullRequest,
            &cfg.trigger.pull_request,
        )?);
    }

    Ok(rules)
}

/// Decide whether the given event should start a run.
///
/// Pure predicate: true iff any rule matches. No side effects, and the same
/// event + rule set always yields the same answer. One matching event
/// produces exactly one run, regardless of how many rules match.
pub fn should_run(event: &Event, rules: &[TriggerRule]) -> bool {
    let matched = rules.iter().any(|rule| rule.matches(event));

    debug!(
        kind = %event.kind,
        branch = %event.match_branch(),
        matched,
        "evaluated trigger rules"
    );

    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn push_rule(patterns: &[&str]) -> TriggerRule {
        let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        TriggerRule::new(EventKind::Push, &patterns).unwrap()
    }

    fn pr_rule(patterns: &[&str]) -> TriggerRule {
        let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        TriggerRule::new(EventKind::PullRequest, &patterns).unwrap()
    }

    #[test]
    fn push_event_matches_push_rule_on_source_branch() {
        let rules = vec![push_rule(&["main", "version-*"])];

        assert!(should_run(&Event::push("main"), &rules));
        assert!(should_run(&Event::push("version-2"), &rules));
        assert!(!should_run(&Event::push("versionX"), &rules));
        assert!(!should_run(&Event::push("feature-1"), &rules));
    }

    #[test]
    fn pull_request_event_matches_on_target_branch() {
        let rules = vec![pr_rule(&["main"])];

        // Source branch is irrelevant for PR rules; only the target counts.
        assert!(should_run(&Event::pull_request("wild-topic", "main"), &rules));
        assert!(!should_run(&Event::pull_request("main", "develop"), &rules));
    }

    #[test]
    fn event_kind_must_match_rule_kind() {
        let rules = vec![push_rule(&["main"])];
        assert!(!should_run(&Event::pull_request("topic", "main"), &rules));

        let rules = vec![pr_rule(&["main"])];
        assert!(!should_run(&Event::push("main"), &rules));
    }

    #[test]
    fn no_rules_means_no_run() {
        assert!(!should_run(&Event::push("main"), &[]));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let rules = vec![push_rule(&["version-*"]), pr_rule(&["main"])];
        let event = Event::push("version-7");

        let first = should_run(&event, &rules);
        for _ in 0..10 {
            assert_eq!(should_run(&event, &rules), first);
        }
    }
}
