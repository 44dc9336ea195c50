//! Top-level domain dictionary
//!
//! The extractor only accepts candidates whose last label is a known TLD.
//! The dictionary starts from a built-in list and is periodically replaced
//! with the IANA list.

use std::collections::HashSet;

use parking_lot::RwLock;
use tracing::instrument;

use crate::services::error::{ServiceError, ServiceResult};

/// Where the full TLD list is published
pub const IANA_TLD_LIST_URL: &str = "https://data.iana.org/TLD/tlds-alpha-by-domain.txt";

/// Seed list used until the first successful refresh
const BUILTIN_TLDS: &[&str] = &[
    // generic
    "com", "net", "org", "edu", "gov", "mil", "int", "info", "biz", "name", "pro", "mobi",
    "app", "dev", "page", "io", "ai", "gg", "tv", "me", "co", "ly", "to", "sh", "fm", "am",
    "xyz", "site", "online", "top", "club", "shop", "store", "live", "stream", "art", "blog",
    "news", "link", "cloud", "tech", "fun", "lol", "moe", "wtf", "win", "bid", "click",
    "download", "zip", "mov", "icu", "vip", "gay", "game", "games", "social", "media",
    "video", "music", "space", "website", "email", "chat", "world", "today", "life",
    // country codes
    "ac", "ar", "at", "au", "be", "bg", "br", "by", "ca", "cc", "cf", "ch", "cl", "cn",
    "cz", "de", "dk", "ee", "es", "eu", "fi", "fr", "ga", "gq", "gr", "hk", "hr", "hu",
    "id", "ie", "il", "in", "is", "it", "jp", "kr", "kz", "la", "lt", "lu", "lv", "ml",
    "mx", "my", "nl", "no", "nu", "nz", "ph", "pl", "pt", "pw", "ro", "rs", "ru", "se",
    "sg", "si", "sk", "su", "th", "tk", "tr", "tw", "ua", "uk", "us", "vn", "ws", "za",
];

/// Thread-safe, replaceable set of known TLDs
#[derive(Debug)]
pub struct TldDictionary {
    tlds: RwLock<HashSet<String>>,
}

impl Default for TldDictionary {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TldDictionary {
    /// Dictionary seeded from the built-in list
    pub fn builtin() -> Self {
        Self::from_tlds(BUILTIN_TLDS.iter().map(|tld| (*tld).to_string()).collect())
    }

    pub fn from_tlds(tlds: HashSet<String>) -> Self {
        Self {
            tlds: RwLock::new(tlds),
        }
    }

    /// Whether `tld` (any case) is known
    pub fn contains(&self, tld: &str) -> bool {
        self.tlds.read().contains(&tld.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.tlds.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tlds.read().is_empty()
    }

    /// Swap in a new set of TLDs
    pub fn replace(&self, tlds: HashSet<String>) {
        *self.tlds.write() = tlds;
    }

    /// Parse the IANA list format: one TLD per line, `#` comments
    pub fn parse_list(text: &str) -> HashSet<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_ascii_lowercase)
            .collect()
    }

    /// Download the list from `url` and replace the dictionary.
    ///
    /// On any failure the current dictionary is left untouched.
    #[instrument(skip(self, client))]
    pub async fn refresh(&self, client: &reqwest::Client, url: &str) -> ServiceResult<usize> {
        let body = client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| ServiceError::internal(format!("TLD list download failed: {e}")))?
            .text()
            .await
            .map_err(|e| ServiceError::internal(format!("TLD list unreadable: {e}")))?;

        let tlds = Self::parse_list(&body);
        if tlds.is_empty() {
            return Err(ServiceError::internal("TLD list was empty"));
        }

        let count = tlds.len();
        self.replace(tlds);
        tracing::info!(count, "TLD dictionary refreshed");
        Ok(count)
    }
}
