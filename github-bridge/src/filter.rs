//! Repository allow-list gate applied before transformation.

use std::collections::HashSet;

/// Exact-match allow-list of `owner/name` repository names.
///
/// An empty list disables filtering. When the list is configured, payloads
/// without a repository name are rejected.
#[derive(Debug, Clone, Default)]
pub struct RepoFilter {
    allowed: HashSet<String>,
}

impl RepoFilter {
    /// Build a filter from the configured list. `None` or empty disables it.
    pub fn new(repos: Option<&[String]>) -> Self {
        Self {
            allowed: repos
                .unwrap_or_default()
                .iter()
                .cloned()
                .collect(),
        }
    }

    /// Whether the filter is active.
    pub fn is_enabled(&self) -> bool {
        !self.allowed.is_empty()
    }

    /// Check a repository name against the allow-list.
    pub fn allows(&self, repo_full_name: Option<&str>) -> bool {
        if !self.is_enabled() {
            return true;
        }

        match repo_full_name {
            Some(name) => self.allowed.contains(name),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(repos: &[&str]) -> RepoFilter {
        let repos: Vec<String> = repos.iter().map(|r| r.to_string()).collect();
        RepoFilter::new(Some(repos.as_slice()))
    }

    #[test]
    fn test_disabled_allows_everything() {
        let unset = RepoFilter::new(None);
        assert!(!unset.is_enabled());
        assert!(unset.allows(Some("o/x")));
        assert!(unset.allows(None));

        let empty = filter(&[]);
        assert!(!empty.is_enabled());
        assert!(empty.allows(Some("o/x")));
    }

    #[test]
    fn test_membership() {
        let f = filter(&["o/r"]);
        assert!(f.allows(Some("o/r")));
        assert!(!f.allows(Some("o/x")));
    }

    #[test]
    fn test_exact_match_only() {
        let f = filter(&["o/r"]);
        assert!(!f.allows(Some("o/r2")));
        assert!(!f.allows(Some("O/R")));
        assert!(!f.allows(Some("o/")));
        assert!(!f.allows(Some("o/*")));
    }

    #[test]
    fn test_missing_repo_fails_closed() {
        let f = filter(&["o/r"]);
        assert!(!f.allows(None));
    }
}
