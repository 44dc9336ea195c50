//! Ephemeral records - cache-only permits and cooldowns

use std::time::Duration;

use super::channel_config::normalize_channel_name;

/// Default permit lifetime (5 minutes)
pub const PERMIT_DURATION: Duration = Duration::from_secs(300);

/// Default cooldown lifetime (5 minutes)
pub const COOLDOWN_DURATION: Duration = Duration::from_secs(300);

/// Time-bounded link-check bypass for one user in one channel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Permit {
    pub channel: String,
    pub user: String,
}

impl Permit {
    /// Create a permit. A leading `@` on the user is dropped.
    pub fn new(channel: &str, user: &str) -> Self {
        Self {
            channel: normalize_channel_name(channel),
            user: user.trim().trim_start_matches('@').to_lowercase(),
        }
    }
}

/// Time-bounded suppression of outbound sends to a channel
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Cooldown {
    pub channel: String,
}

impl Cooldown {
    pub fn new(channel: &str) -> Self {
        Self {
            channel: normalize_channel_name(channel),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permit_normalizes_identity() {
        let permit = Permit::new("#Chan", "@SomeUser");
        assert_eq!(permit.channel, "chan");
        assert_eq!(permit.user, "someuser");
        assert_eq!(permit, Permit::new("chan", "someuser"));
    }

    #[test]
    fn test_cooldown_normalizes_channel() {
        assert_eq!(Cooldown::new("#Chan").channel, "chan");
    }
}
