//! Role resolution from message badges

use linkguard_core::entities::Role;

/// Highest role granted by a `badges` tag such as `moderator/1,subscriber/12`.
///
/// Unknown badges are ignored; no tag means [`Role::User`].
pub fn resolve_role(badges: Option<&str>) -> Role {
    badges
        .into_iter()
        .flat_map(|badges| badges.split(','))
        .filter_map(|badge| badge.split('/').next())
        .filter_map(Role::from_badge)
        .max()
        .unwrap_or_default()
}
