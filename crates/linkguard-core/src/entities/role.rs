//! Role entity - a chatter's standing in a channel, derived from badges

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Chat role with a total order: `User < Subscriber < Vip < Moderator < Broadcaster`.
///
/// Ordering is only defined between `Role` values; comparing a role against
/// any other type does not compile.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    #[default]
    User,
    Subscriber,
    Vip,
    Moderator,
    Broadcaster,
}

impl Role {
    /// All roles, lowest first
    pub const ALL: [Role; 5] = [
        Role::User,
        Role::Subscriber,
        Role::Vip,
        Role::Moderator,
        Role::Broadcaster,
    ];

    /// Canonical upper-case name, as stored and shown in chat
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Subscriber => "SUBSCRIBER",
            Self::Vip => "VIP",
            Self::Moderator => "MODERATOR",
            Self::Broadcaster => "BROADCASTER",
        }
    }

    /// Map a single badge name (the part before `/`) to the role it grants
    #[must_use]
    pub fn from_badge(badge: &str) -> Option<Self> {
        match badge.to_ascii_lowercase().as_str() {
            "broadcaster" => Some(Self::Broadcaster),
            "moderator" => Some(Self::Moderator),
            "vip" => Some(Self::Vip),
            "subscriber" => Some(Self::Subscriber),
            _ => None,
        }
    }

    /// Whether this role may run moderation commands
    #[inline]
    pub fn is_moderator(self) -> bool {
        self >= Self::Moderator
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "SUBSCRIBER" => Ok(Self::Subscriber),
            "VIP" => Ok(Self::Vip),
            "MODERATOR" => Ok(Self::Moderator),
            "BROADCASTER" => Ok(Self::Broadcaster),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}
