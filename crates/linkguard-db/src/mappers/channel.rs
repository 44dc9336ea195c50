//! ChannelConfig entity <-> document mapper

use linkguard_core::entities::{normalize_channel_name, ChannelConfig, Role};

use crate::models::ChannelDocument;

/// Convert a stored document to the ChannelConfig entity.
///
/// An unreadable role falls back to the default exempt role.
impl From<ChannelDocument> for ChannelConfig {
    fn from(doc: ChannelDocument) -> Self {
        let minimum_exempt_role = doc.userlevel.parse().unwrap_or_else(|_| {
            tracing::warn!(
                channel = %doc.name,
                userlevel = %doc.userlevel,
                "Unknown stored userlevel, using VIP"
            );
            Role::Vip
        });

        ChannelConfig {
            name: normalize_channel_name(&doc.name),
            require_slash: doc.slash,
            require_multi_dot: doc.dot,
            match_subdomains: doc.subdomains,
            minimum_exempt_role,
            reply_template: doc.reply,
            allow_list: doc.allow_list,
        }
    }
}

/// Convert a ChannelConfig entity reference to its stored document
impl From<&ChannelConfig> for ChannelDocument {
    fn from(config: &ChannelConfig) -> Self {
        ChannelDocument {
            name: config.name.clone(),
            slash: config.require_slash,
            dot: config.require_multi_dot,
            subdomains: config.match_subdomains,
            userlevel: config.minimum_exempt_role.to_string(),
            reply: config.reply_template.clone(),
            allow_list: config.allow_list.clone(),
        }
    }
}
