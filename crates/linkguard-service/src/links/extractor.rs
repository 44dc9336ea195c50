//! Candidate link extraction from free chat text

use std::sync::{Arc, LazyLock};

use regex::Regex;

use super::tld::TldDictionary;

/// Optional scheme, dotted host, optional port, optional path/query/fragment
static CANDIDATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:[a-z][a-z0-9+.\-]*://)?(?:[a-z0-9](?:[a-z0-9\-]{0,61}[a-z0-9])?\.)+(?:[a-z]{2,63}|xn--[a-z0-9\-]{1,59})(?::[0-9]{1,5})?(?:[/?#][^\s]*)?",
    )
    .expect("candidate pattern is valid")
});

/// Punctuation that closes a sentence rather than a link
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')', ']', '}', '\'', '"', '>'];

/// Finds link-like substrings in a message
#[derive(Debug, Clone)]
pub struct LinkExtractor {
    tlds: Arc<TldDictionary>,
}

impl LinkExtractor {
    pub fn new(tlds: Arc<TldDictionary>) -> Self {
        Self { tlds }
    }

    pub fn tlds(&self) -> &Arc<TldDictionary> {
        &self.tlds
    }

    /// All candidate links in `text`, in order of appearance.
    ///
    /// Bare hosts and hosts with paths both count. A match directly followed
    /// by `@` is the local part of an address and is skipped; the host after
    /// the `@` is still found.
    pub fn find_candidates(&self, text: &str) -> Vec<String> {
        CANDIDATE
            .find_iter(text)
            .filter(|m| !text[m.end()..].starts_with('@'))
            .map(|m| m.as_str().trim_end_matches(TRAILING_PUNCTUATION))
            .filter(|candidate| self.has_known_tld(candidate))
            .map(str::to_string)
            .collect()
    }

    fn has_known_tld(&self, candidate: &str) -> bool {
        let without_scheme = candidate
            .split_once("://")
            .map_or(candidate, |(_, rest)| rest);
        let host = without_scheme
            .split(|c| matches!(c, ':' | '/' | '?' | '#'))
            .next()
            .unwrap_or_default();
        host.rsplit('.')
            .next()
            .is_some_and(|tld| self.tlds.contains(tld))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> LinkExtractor {
        LinkExtractor::new(Arc::new(TldDictionary::builtin()))
    }

    #[test]
    fn test_bare_and_schemed_links() {
        let found = extractor()
            .find_candidates("check out example.org and https://clips.twitch.tv/Abc?x=1 now");
        assert_eq!(found, vec!["example.org", "https://clips.twitch.tv/Abc?x=1"]);
    }

    #[test]
    fn test_trailing_punctuation_is_dropped() {
        let found = extractor().find_candidates("see (youtube.com/watch?v=1). Or bit.ly!");
        assert_eq!(found, vec!["youtube.com/watch?v=1", "bit.ly"]);
    }

    #[test]
    fn test_unknown_tld_is_not_a_link() {
        assert!(extractor().find_candidates("file.txt and v1.2 and a.b").is_empty());
    }

    #[test]
    fn test_at_is_a_left_stop() {
        let found = extractor().find_candidates("mail jane.de@example.com please");
        assert_eq!(found, vec!["example.com"]);
    }

    #[test]
    fn test_port_and_uppercase() {
        let found = extractor().find_candidates("EXAMPLE.COM:8080/path");
        assert_eq!(found, vec!["EXAMPLE.COM:8080/path"]);
    }
}
