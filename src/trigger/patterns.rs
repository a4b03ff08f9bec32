// src/trigger/patterns.rs

use std::fmt;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};

/// Compiled branch patterns for one trigger rule.
///
/// Patterns are exact branch names (`"main"`) or globs (`"version-*"`).
/// They are compiled once at configuration load time; the evaluator only
/// calls [`BranchMatcher::matches`]. New pattern syntaxes can be added here
/// without touching the evaluator.
#[derive(Clone)]
pub struct BranchMatcher {
    patterns: Vec<String>,
    set: GlobSet,
}

impl fmt::Debug for BranchMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BranchMatcher")
            .field("patterns", &self.patterns)
            .finish_non_exhaustive()
    }
}

impl BranchMatcher {
    /// Compile a list of branch patterns.
    ///
    /// An empty list yields a matcher that matches nothing.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let set = build_globset(patterns)
            .with_context(|| format!("building branch globset for patterns {:?}", patterns))?;

        Ok(Self {
            patterns: patterns.to_vec(),
            set,
        })
    }

    /// The source patterns this matcher was built from.
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Returns true if the given branch name matches any pattern.
    pub fn matches(&self, branch: &str) -> bool {
        self.set.is_match(branch)
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("invalid branch pattern '{pattern}'"))?;
        builder.add(glob);
    }
    builder.build().context("compiling branch globset")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(patterns: &[&str]) -> BranchMatcher {
        let patterns: Vec<String> = patterns.iter().map(|s| s.to_string()).collect();
        BranchMatcher::new(&patterns).unwrap()
    }

    #[test]
    fn exact_pattern_matches_only_that_branch() {
        let m = matcher(&["main"]);
        assert!(m.matches("main"));
        assert!(!m.matches("main2"));
        assert!(!m.matches("maintenance"));
    }

    #[test]
    fn glob_pattern_matches_suffix() {
        let m = matcher(&["version-*"]);
        assert!(m.matches("version-2"));
        assert!(m.matches("version-2024.8"));
        assert!(!m.matches("versionX"));
        assert!(!m.matches("version"));
    }

    #[test]
    fn empty_pattern_list_matches_nothing() {
        let m = matcher(&[]);
        assert!(!m.matches("main"));
        assert!(!m.matches(""));
    }

    #[test]
    fn invalid_pattern_is_an_error() {
        let patterns = vec!["version-[".to_string()];
        assert!(BranchMatcher::new(&patterns).is_err());
    }
}
