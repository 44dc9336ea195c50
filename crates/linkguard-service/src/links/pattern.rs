//! Allow-list pattern evaluation under a time budget
//!
//! Patterns come from chat commands and are tested against links from chat
//! messages, so both sides are untrusted. A pattern is compiled first, outside
//! the budget and bounded by the compile size limits. Only the match itself
//! runs on the blocking pool under the deadline and is abandoned once it
//! elapses. The regex engine is linear in the candidate, so an abandoned match
//! still finishes on its own.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use regex::{Regex, RegexBuilder};

use linkguard_core::error::DomainError;

/// Compiled program size ceiling for one allow-list pattern
const PATTERN_SIZE_LIMIT: usize = 1 << 20;
/// Lazy DFA cache ceiling for one allow-list pattern
const PATTERN_DFA_LIMIT: usize = 1 << 20;

/// Synchronous pattern test; callers bound it with [`evaluate_with_budget`]
pub trait PatternMatcher: Send + Sync + 'static {
    /// Make `pattern` ready for [`is_match`](Self::is_match). Not budgeted.
    fn prepare(&self, _pattern: &str) -> Result<(), DomainError> {
        Ok(())
    }

    /// Whether `pattern` matches anywhere in `candidate`
    fn is_match(&self, pattern: &str, candidate: &str) -> Result<bool, DomainError>;

    /// Drop anything held for a pattern that left every allow list
    fn forget(&self, _pattern: &str) {}
}

/// `regex`-backed matcher with a compiled-pattern cache
#[derive(Debug, Default)]
pub struct RegexPatternMatcher {
    compiled: DashMap<String, Result<Regex, String>>,
}

impl RegexPatternMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn compile(pattern: &str) -> Result<Regex, String> {
        RegexBuilder::new(pattern)
            .size_limit(PATTERN_SIZE_LIMIT)
            .dfa_size_limit(PATTERN_DFA_LIMIT)
            .build()
            .map_err(|e| e.to_string())
    }

    /// Cached compile. No map guard is held while compiling.
    fn regex(&self, pattern: &str) -> Result<Regex, DomainError> {
        let cached = self.compiled.get(pattern).map(|entry| entry.value().clone());
        let compiled = match cached {
            Some(compiled) => compiled,
            None => {
                let compiled = Self::compile(pattern);
                self.compiled.insert(pattern.to_string(), compiled.clone());
                compiled
            }
        };
        compiled.map_err(|reason| DomainError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        })
    }
}

impl PatternMatcher for RegexPatternMatcher {
    fn prepare(&self, pattern: &str) -> Result<(), DomainError> {
        self.regex(pattern).map(|_| ())
    }

    fn is_match(&self, pattern: &str, candidate: &str) -> Result<bool, DomainError> {
        Ok(self.regex(pattern)?.is_match(candidate))
    }

    fn forget(&self, pattern: &str) {
        self.compiled.remove(pattern);
    }
}

/// Prepare `pattern`, then run one match with a hard deadline.
///
/// Only the match counts against `budget`. Returns `PatternTimeout` when the
/// budget elapses first; the match is detached and its result discarded.
pub async fn evaluate_with_budget(
    matcher: &Arc<dyn PatternMatcher>,
    pattern: &str,
    candidate: &str,
    budget: Duration,
) -> Result<bool, DomainError> {
    let preparing = Arc::clone(matcher);
    let owned_pattern = pattern.to_string();
    tokio::task::spawn_blocking(move || preparing.prepare(&owned_pattern))
        .await
        .map_err(|join_error| {
            DomainError::InternalError(format!("pattern compilation failed: {join_error}"))
        })??;

    let matcher = Arc::clone(matcher);
    let (owned_pattern, owned_candidate) = (pattern.to_string(), candidate.to_string());
    let task =
        tokio::task::spawn_blocking(move || matcher.is_match(&owned_pattern, &owned_candidate));

    match tokio::time::timeout(budget, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(DomainError::InternalError(format!(
            "pattern evaluation failed: {join_error}"
        ))),
        Err(_) => Err(DomainError::PatternTimeout {
            pattern: pattern.to_string(),
            budget_ms: u64::try_from(budget.as_millis()).unwrap_or(u64::MAX),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stalling(Duration);

    impl PatternMatcher for Stalling {
        fn is_match(&self, _pattern: &str, _candidate: &str) -> Result<bool, DomainError> {
            std::thread::sleep(self.0);
            Ok(true)
        }
    }

    /// Compiles slowly, matches instantly
    struct SlowCompile(Duration);

    impl PatternMatcher for SlowCompile {
        fn prepare(&self, _pattern: &str) -> Result<(), DomainError> {
            std::thread::sleep(self.0);
            Ok(())
        }

        fn is_match(&self, _pattern: &str, _candidate: &str) -> Result<bool, DomainError> {
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_regex_matches_anywhere() {
        let matcher: Arc<dyn PatternMatcher> = Arc::new(RegexPatternMatcher::new());
        let budget = Duration::from_millis(100);
        assert!(evaluate_with_budget(&matcher, r"clips\.twitch", "https://clips.twitch.tv/x", budget)
            .await
            .unwrap());
        assert!(!evaluate_with_budget(&matcher, r"^youtube", "https://youtube.com", budget)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_invalid_pattern() {
        let matcher: Arc<dyn PatternMatcher> = Arc::new(RegexPatternMatcher::new());
        let err = evaluate_with_budget(&matcher, "(unclosed", "a.com", Duration::from_millis(100))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidPattern { .. }));
    }

    #[tokio::test]
    async fn test_budget_is_enforced() {
        let matcher: Arc<dyn PatternMatcher> = Arc::new(Stalling(Duration::from_millis(500)));
        let err = evaluate_with_budget(&matcher, "x", "a.com", Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::PatternTimeout { budget_ms: 50, .. }));
    }

    #[tokio::test]
    async fn test_compilation_is_outside_the_budget() {
        let matcher: Arc<dyn PatternMatcher> = Arc::new(SlowCompile(Duration::from_millis(300)));
        let matched = evaluate_with_budget(&matcher, "x", "a.com", Duration::from_millis(50))
            .await
            .unwrap();
        assert!(matched);
    }

    #[test]
    fn test_compiled_cache_and_forget() {
        let matcher = RegexPatternMatcher::new();
        matcher.prepare(r"a\.com").unwrap();
        assert!(matcher.compiled.contains_key(r"a\.com"));
        assert!(matcher.is_match(r"a\.com", "https://a.com/").unwrap());

        matcher.forget(r"a\.com");
        assert!(!matcher.compiled.contains_key(r"a\.com"));
        assert!(matches!(
            matcher.prepare("(unclosed"),
            Err(DomainError::InvalidPattern { .. })
        ));
    }
}
