//! Link extraction and allow-list matching

mod engine;
mod extractor;
mod pattern;
mod tld;

pub use engine::{host_of, LinkEngine, LinkVerdict};
pub use extractor::LinkExtractor;
pub use pattern::{evaluate_with_budget, PatternMatcher, RegexPatternMatcher};
pub use tld::{TldDictionary, IANA_TLD_LIST_URL};
