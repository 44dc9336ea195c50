//! Allow-list matching over extracted links

use std::collections::{BTreeSet, HashSet};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use url::Url;

use linkguard_core::entities::{AllowEntry, ChannelConfig};
use linkguard_core::error::DomainError;

use super::extractor::LinkExtractor;
use super::pattern::{evaluate_with_budget, PatternMatcher};

static HAS_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]+://").expect("scheme pattern is valid"));

/// Result of checking one message against a channel's allow list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkVerdict {
    /// Distinct hosts not covered by any allow rule
    pub disallowed: BTreeSet<String>,
    /// Raw allow-list entries (`/.../`) that ran out of time
    pub expired_patterns: Vec<String>,
}

impl LinkVerdict {
    pub fn is_clean(&self) -> bool {
        self.disallowed.is_empty()
    }

    /// Disallowed hosts joined for a chat reply
    pub fn domains(&self) -> String {
        self.disallowed
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Link extraction plus allow-list matching
#[derive(Clone)]
pub struct LinkEngine {
    extractor: LinkExtractor,
    matcher: Arc<dyn PatternMatcher>,
    budget: Duration,
}

impl std::fmt::Debug for LinkEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkEngine")
            .field("extractor", &self.extractor)
            .field("budget", &self.budget)
            .finish()
    }
}

impl LinkEngine {
    pub fn new(extractor: LinkExtractor, matcher: Arc<dyn PatternMatcher>, budget: Duration) -> Self {
        Self {
            extractor,
            matcher,
            budget,
        }
    }

    pub fn extractor(&self) -> &LinkExtractor {
        &self.extractor
    }

    /// Release matcher state for entries removed from an allow list
    pub fn forget_patterns<'a, I>(&self, entries: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        for raw in entries {
            if let AllowEntry::Pattern(pattern) = AllowEntry::parse(raw) {
                self.matcher.forget(pattern);
            }
        }
    }

    /// Check `message` against `config`.
    ///
    /// Pattern entries are tried first, each under the time budget. An entry
    /// that runs out of time is reported in `expired_patterns`, does not allow
    /// the candidate, and is skipped for the rest of the message.
    pub async fn evaluate(&self, message: &str, config: &ChannelConfig) -> LinkVerdict {
        let mut verdict = LinkVerdict::default();
        let mut expired: HashSet<&str> = HashSet::new();

        for candidate in self.extractor.find_candidates(message) {
            if self
                .allowed_by_pattern(&candidate, config, &mut expired)
                .await
            {
                continue;
            }

            let Some(host) = host_of(&candidate) else {
                continue;
            };

            if !counts_as_link(message, &host, config) {
                continue;
            }

            if !allowed_by_entries(&host, config) {
                verdict.disallowed.insert(host);
            }
        }

        verdict.expired_patterns = config
            .allow_list
            .iter()
            .filter(|raw| expired.contains(raw.as_str()))
            .cloned()
            .collect();
        verdict
    }

    async fn allowed_by_pattern<'c>(
        &self,
        candidate: &str,
        config: &'c ChannelConfig,
        expired: &mut HashSet<&'c str>,
    ) -> bool {
        for raw in &config.allow_list {
            let AllowEntry::Pattern(pattern) = AllowEntry::parse(raw) else {
                continue;
            };
            if expired.contains(raw.as_str()) {
                continue;
            }

            match evaluate_with_budget(&self.matcher, pattern, candidate, self.budget).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(DomainError::PatternTimeout { budget_ms, .. }) => {
                    tracing::warn!(
                        channel = %config.name,
                        pattern = %raw,
                        budget_ms,
                        "Allow-list pattern exceeded its budget"
                    );
                    expired.insert(raw.as_str());
                }
                Err(e) => {
                    tracing::warn!(channel = %config.name, pattern = %raw, error = %e, "Allow-list pattern skipped");
                }
            }
        }
        false
    }
}

/// Lowercase host of a candidate, with a neutral scheme added when missing
pub fn host_of(candidate: &str) -> Option<String> {
    let parsed = if HAS_SCHEME.is_match(candidate) {
        Url::parse(candidate)
    } else {
        Url::parse(&format!("http://{candidate}"))
    };
    parsed
        .ok()?
        .host_str()
        .filter(|host| !host.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Slash requirement first, then the multi-dot requirement
fn counts_as_link(message: &str, host: &str, config: &ChannelConfig) -> bool {
    if config.require_slash {
        message.contains('/')
    } else if config.require_multi_dot {
        host.matches('.').count() > 1
    } else {
        true
    }
}

fn allowed_by_entries(host: &str, config: &ChannelConfig) -> bool {
    config.entries().any(|entry| match entry {
        AllowEntry::Wildcard(fragment) => host.contains(&fragment.to_ascii_lowercase()),
        AllowEntry::Plain(domain) => {
            let domain = domain.to_ascii_lowercase();
            if config.match_subdomains {
                host.contains(&domain)
            } else {
                host == domain
            }
        }
        AllowEntry::Pattern(_) => false,
    })
}
