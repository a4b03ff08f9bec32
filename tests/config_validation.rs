// tests/config_validation.rs

use std::io::Write;

use tempfile::NamedTempFile;

use checkdag::config::load_and_validate;
use checkdag::errors::CheckdagError;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn job_cycle_returns_structured_error() {
    let file = config_file(
        r#"
[job.a]
needs = ["b"]
[[job.a.step]]
run = "echo a"

[job.b]
needs = ["a"]
[[job.b.step]]
run = "echo b"
"#,
    );

    let result = load_and_validate(file.path());

    match result {
        Err(CheckdagError::JobCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains("a") || msg.contains("b"));
        }
        Err(e) => panic!("Expected JobCycle error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_dependency_returns_config_error() {
    let file = config_file(
        r#"
[job.lint]
needs = ["nonexistent"]
[[job.lint.step]]
run = "npx prettier --check ."
"#,
    );

    let result = load_and_validate(file.path());

    match result {
        Err(CheckdagError::ConfigError(msg)) => {
            assert!(msg.contains("unknown dependency"));
            assert!(msg.contains("nonexistent"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn self_dependency_is_rejected() {
    let file = config_file(
        r#"
[job.lint]
needs = ["lint"]
[[job.lint.step]]
run = "echo lint"
"#,
    );

    let result = load_and_validate(file.path());

    match result {
        Err(CheckdagError::ConfigError(msg)) => {
            assert!(msg.contains("cannot depend on itself"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn empty_config_is_rejected() {
    let file = config_file("");

    let result = load_and_validate(file.path());

    match result {
        Err(CheckdagError::ConfigError(msg)) => {
            assert!(msg.contains("at least one [job.<name>] section"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn job_without_steps_is_rejected() {
    let file = config_file(
        r#"
[job.lint]
needs = []
"#,
    );

    let result = load_and_validate(file.path());

    match result {
        Err(CheckdagError::ConfigError(msg)) => {
            assert!(msg.contains("no [[job.lint.step]] entries"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn step_with_empty_command_is_rejected() {
    let file = config_file(
        r#"
[job.lint]
[[job.lint.step]]
run = "   "
"#,
    );

    let result = load_and_validate(file.path());

    match result {
        Err(CheckdagError::ConfigError(msg)) => {
            assert!(msg.contains("empty `run` command"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn full_config_parses_with_defaults() {
    let file = config_file(
        r#"
[config]
max_parallel = 2

[trigger]
push = ["main", "version-*"]
pull_request = ["main"]

[job.install]
[[job.install.step]]
name = "install dependencies"
run = "npm ci"
cwd = "web"

[job.lint]
needs = ["install"]
timeout_secs = 600
[[job.lint.step]]
run = "npx prettier --check ."

[job.ci-mark]
needs = ["lint"]
[[job.ci-mark.step]]
run = "true"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.config.max_parallel, 2);
    assert_eq!(cfg.config.job_timeout_secs, None);
    assert_eq!(cfg.config.retries, 0);

    assert_eq!(cfg.trigger.push, vec!["main", "version-*"]);
    assert_eq!(cfg.trigger.pull_request, vec!["main"]);

    assert_eq!(cfg.job.len(), 3);

    let install = &cfg.job["install"];
    assert!(install.needs.is_empty());
    assert_eq!(install.step[0].display_name(), "install dependencies");
    assert_eq!(install.step[0].cwd.as_deref(), Some("web"));

    let lint = &cfg.job["lint"];
    assert_eq!(lint.needs, vec!["install"]);
    assert_eq!(lint.effective_timeout_secs(cfg.config.job_timeout_secs), Some(600));
    assert_eq!(lint.effective_retries(cfg.config.retries), 0);

    let mark = &cfg.job["ci-mark"];
    assert_eq!(mark.needs, vec!["lint"]);
    // No explicit name: the command doubles as the display name.
    assert_eq!(mark.step[0].display_name(), "true");
}
