//! URL relevance matching.
//!
//! # Responsibilities
//! - Match a navigation URL against literal (substring) or regex entries
//! - Combine an allow-list and a deny-list into one relevance decision
//!
//! # Design Decisions
//! - Matching is case-sensitive
//! - Literal entries use substring containment, not prefix
//! - Regex entries are unanchored searches (`Regex::is_match`)
//! - Missing allow-list = allow all, missing deny-list = deny none
//! - A present but empty allow-list allows nothing

use regex::Regex;

/// Trait for matching navigation URLs against a single rule entry.
pub trait UrlMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the URL matches this entry.
    fn matches(&self, url: &str) -> bool;
}

/// Matches when the URL contains the literal.
#[derive(Debug, Clone)]
pub struct ContainsMatcher {
    needle: String,
}

impl ContainsMatcher {
    pub fn new(needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
        }
    }
}

impl UrlMatcher for ContainsMatcher {
    fn matches(&self, url: &str) -> bool {
        url.contains(&self.needle)
    }
}

/// Matches when the regex finds a match anywhere in the URL.
#[derive(Debug, Clone)]
pub struct RegexMatcher {
    regex: Regex,
}

impl RegexMatcher {
    /// Compile a pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
        })
    }

    pub fn from_regex(regex: Regex) -> Self {
        Self { regex }
    }
}

impl UrlMatcher for RegexMatcher {
    fn matches(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }
}

/// Returns true if `url` matches at least one entry of `list`.
fn matches_any(url: &str, list: &[Box<dyn UrlMatcher>]) -> bool {
    list.iter().any(|m| m.matches(url))
}

/// Allow/deny rules of one routing group.
#[derive(Debug, Default)]
pub struct RuleSet {
    allow: Option<Vec<Box<dyn UrlMatcher>>>,
    deny: Option<Vec<Box<dyn UrlMatcher>>>,
}

impl RuleSet {
    /// A rule set that considers every URL relevant.
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn new(
        allow: Option<Vec<Box<dyn UrlMatcher>>>,
        deny: Option<Vec<Box<dyn UrlMatcher>>>,
    ) -> Self {
        Self { allow, deny }
    }

    /// Replace the allow-list.
    pub fn with_allow(mut self, allow: Vec<Box<dyn UrlMatcher>>) -> Self {
        self.allow = Some(allow);
        self
    }

    /// Replace the deny-list.
    pub fn with_deny(mut self, deny: Vec<Box<dyn UrlMatcher>>) -> Self {
        self.deny = Some(deny);
        self
    }

    pub fn is_allowed(&self, url: &str) -> bool {
        self.allow
            .as_deref()
            .map(|list| matches_any(url, list))
            .unwrap_or(true)
    }

    pub fn is_forbidden(&self, url: &str) -> bool {
        self.deny
            .as_deref()
            .map(|list| matches_any(url, list))
            .unwrap_or(false)
    }

    /// Allowed and not forbidden.
    pub fn is_relevant(&self, url: &str) -> bool {
        self.is_allowed(url) && !self.is_forbidden(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(s: &str) -> Box<dyn UrlMatcher> {
        Box::new(ContainsMatcher::new(s))
    }

    fn regex(s: &str) -> Box<dyn UrlMatcher> {
        Box::new(RegexMatcher::new(s).unwrap())
    }

    #[test]
    fn test_contains_matcher() {
        let matcher = ContainsMatcher::new("/users");
        assert!(matcher.matches("/admin/users/1"));
        assert!(matcher.matches("/users"));
        assert!(!matcher.matches("/Users")); // Case sensitive
        assert!(!matcher.matches("/orders"));
    }

    #[test]
    fn test_regex_matcher_is_unanchored() {
        let matcher = RegexMatcher::new(r"user/\d+").unwrap();
        assert!(matcher.matches("/shop/user/42/cart"));
        assert!(!matcher.matches("/shop/user/abc"));

        let anchored = RegexMatcher::new(r"^/admin").unwrap();
        assert!(anchored.matches("/admin/settings"));
        assert!(!anchored.matches("/app/admin"));
    }

    #[test]
    fn test_invalid_regex() {
        assert!(RegexMatcher::new("[unclosed").is_err());
    }

    #[test]
    fn test_empty_rule_set_allows_everything() {
        let rules = RuleSet::allow_all();
        assert!(rules.is_allowed("/anything"));
        assert!(!rules.is_forbidden("/anything"));
        assert!(rules.is_relevant(""));
    }

    #[test]
    fn test_allow_list() {
        let rules = RuleSet::allow_all().with_allow(vec![contains("/api"), regex("^/admin")]);
        assert!(rules.is_relevant("/v1/api/items"));
        assert!(rules.is_relevant("/admin"));
        assert!(!rules.is_relevant("/home"));
    }

    #[test]
    fn test_deny_list_wins_over_allow_list() {
        let rules = RuleSet::allow_all()
            .with_allow(vec![contains("/api")])
            .with_deny(vec![contains("/api/health")]);
        assert!(rules.is_relevant("/api/items"));
        assert!(!rules.is_relevant("/api/health"));
        assert!(rules.is_forbidden("/api/health/live"));
    }

    #[test]
    fn test_empty_lists() {
        let nothing_allowed = RuleSet::allow_all().with_allow(Vec::new());
        assert!(!nothing_allowed.is_relevant("/a"));

        let nothing_denied = RuleSet::allow_all().with_deny(Vec::new());
        assert!(nothing_denied.is_relevant("/a"));
    }
}
