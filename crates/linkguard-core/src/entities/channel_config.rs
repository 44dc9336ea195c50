//! Channel configuration entity - per-channel link moderation settings

use super::Role;

/// Placeholder replaced by the offending user's name in reply templates
pub const USER_PLACEHOLDER: &str = "__user__";

/// Reply template value that disables replies
pub const REPLY_OFF: &str = "off";

/// Reply template value that selects the canned reply
pub const REPLY_DEFAULT: &str = "default";

/// Link moderation settings for one channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelConfig {
    /// Channel name (lowercase, without `#`)
    pub name: String,
    /// A link only counts if the raw message also contains `/`
    pub require_slash: bool,
    /// A link only counts if its host has more than one `.`
    pub require_multi_dot: bool,
    /// Plain allow-list entries match as substrings of the host
    pub match_subdomains: bool,
    /// Senders at or above this role skip link checks
    pub minimum_exempt_role: Role,
    /// Reply template, or one of [`REPLY_OFF`] / [`REPLY_DEFAULT`]
    pub reply_template: String,
    /// Allowed domains, wildcards (`*:`) and patterns (`/.../`), unique and ordered
    pub allow_list: Vec<String>,
}

impl ChannelConfig {
    /// Create the default configuration for a newly joined channel
    pub fn with_defaults(name: &str) -> Self {
        Self {
            name: normalize_channel_name(name),
            require_slash: true,
            require_multi_dot: true,
            match_subdomains: true,
            minimum_exempt_role: Role::Vip,
            reply_template: REPLY_DEFAULT.to_string(),
            allow_list: Vec::new(),
        }
    }

    /// Append entries not already present. Returns true if anything changed.
    pub fn allow<'a, I>(&mut self, entries: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut changed = false;
        for entry in entries {
            if !entry.is_empty() && !self.allow_list.iter().any(|e| e == entry) {
                self.allow_list.push(entry.to_string());
                changed = true;
            }
        }
        changed
    }

    /// Remove every occurrence of the given entries. Returns true if anything changed.
    pub fn deny<'a, I>(&mut self, entries: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let before = self.allow_list.len();
        for entry in entries {
            self.allow_list.retain(|e| e != entry);
        }
        before != self.allow_list.len()
    }

    /// Parsed view over the allow list
    pub fn entries(&self) -> impl Iterator<Item = AllowEntry<'_>> {
        self.allow_list.iter().map(|e| AllowEntry::parse(e))
    }

    /// Set the reply template. Text without the user placeholder gets it prefixed.
    pub fn set_reply(&mut self, text: &str) {
        let text = text.trim();
        self.reply_template = if text.contains(USER_PLACEHOLDER) {
            text.to_string()
        } else {
            format!("{USER_PLACEHOLDER}, {text}")
        };
    }

    /// Render the reply for `user`, or `None` when replies are disabled
    pub fn render_reply(&self, user: &str) -> Option<String> {
        let keyword = self
            .reply_template
            .replacen(&format!("{USER_PLACEHOLDER}, "), "", 1)
            .to_ascii_lowercase();
        match keyword.trim() {
            REPLY_OFF => None,
            REPLY_DEFAULT => Some(format!(
                "@{user}, please ask for permission before posting a link."
            )),
            _ => Some(self.reply_template.replace(USER_PLACEHOLDER, user)),
        }
    }
}

/// Lowercase a channel name and strip a leading `#`
pub fn normalize_channel_name(name: &str) -> String {
    name.trim().trim_start_matches('#').to_lowercase()
}

/// One allow-list entry, classified by its syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowEntry<'a> {
    /// Domain matched exactly, or as a substring when subdomain matching is on
    Plain(&'a str),
    /// `*:substring`, matched anywhere in the host
    Wildcard(&'a str),
    /// `/regex/`, tested against the whole candidate link
    Pattern(&'a str),
}

impl<'a> AllowEntry<'a> {
    /// Classify a raw allow-list entry
    pub fn parse(raw: &'a str) -> Self {
        if let Some(rest) = raw.strip_prefix("*:") {
            return Self::Wildcard(rest);
        }
        if raw.len() >= 2 && raw.starts_with('/') && raw.ends_with('/') {
            return Self::Pattern(&raw[1..raw.len() - 1]);
        }
        Self::Plain(raw)
    }
}
