// tests/trigger_matching.rs

mod common;
use crate::common::builders::{ConfigFileBuilder, JobConfigBuilder};

use checkdag::event::Event;
use checkdag::trigger::{rules_from_config, should_run};

fn ci_config() -> checkdag::config::ConfigFile {
    ConfigFileBuilder::new()
        .with_push_trigger("main")
        .with_push_trigger("version-*")
        .with_pull_request_trigger("main")
        .with_job("lint", JobConfigBuilder::new("npx prettier --check .").build())
        .build()
}

#[test]
fn push_to_configured_branch_triggers() {
    let cfg = ci_config();
    let rules = rules_from_config(&cfg).unwrap();

    assert!(should_run(&Event::push("main"), &rules));
}

#[test]
fn push_glob_matches_suffix_only() {
    let cfg = ci_config();
    let rules = rules_from_config(&cfg).unwrap();

    assert!(should_run(&Event::push("version-2"), &rules));
    assert!(should_run(&Event::push("version-2024.8.0"), &rules));

    // `version-*` requires the dash; `versionX` is a different branch.
    assert!(!should_run(&Event::push("versionX"), &rules));
    assert!(!should_run(&Event::push("version"), &rules));
}

#[test]
fn unconfigured_branch_does_not_trigger() {
    let cfg = ci_config();
    let rules = rules_from_config(&cfg).unwrap();

    assert!(!should_run(&Event::push("feature-login"), &rules));
}

#[test]
fn pull_request_matches_target_branch_not_source() {
    let cfg = ci_config();
    let rules = rules_from_config(&cfg).unwrap();

    // Any source branch is fine as long as the PR targets a configured branch.
    assert!(should_run(&Event::pull_request("feature-login", "main"), &rules));

    // A PR *from* main into an unconfigured branch does not trigger:
    // pull_request only lists "main" as a target.
    assert!(!should_run(&Event::pull_request("main", "develop"), &rules));

    // And the pull_request patterns don't include version-*.
    assert!(!should_run(&Event::pull_request("topic", "version-2"), &rules));
}

#[test]
fn empty_trigger_section_never_triggers() {
    let cfg = ConfigFileBuilder::new()
        .with_job("lint", JobConfigBuilder::new("echo lint").build())
        .build();
    let rules = rules_from_config(&cfg).unwrap();

    assert!(rules.is_empty());
    assert!(!should_run(&Event::push("main"), &rules));
    assert!(!should_run(&Event::pull_request("a", "b"), &rules));
}

#[test]
fn evaluation_is_pure_and_repeatable() {
    let cfg = ci_config();
    let rules = rules_from_config(&cfg).unwrap();

    let events = [
        Event::push("main"),
        Event::push("version-3"),
        Event::push("other"),
        Event::pull_request("topic", "main"),
        Event::pull_request("topic", "other"),
    ];

    let first: Vec<bool> = events.iter().map(|e| should_run(e, &rules)).collect();
    for _ in 0..5 {
        let again: Vec<bool> = events.iter().map(|e| should_run(e, &rules)).collect();
        assert_eq!(again, first);
    }
}
