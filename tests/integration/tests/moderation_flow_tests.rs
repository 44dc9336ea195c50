//! End-to-end moderation flows over in-memory tiers
//!
//! Run with: cargo test -p integration-tests --test moderation_flow_tests

use std::time::Duration;

use integration_tests::*;
use linkguard_core::entities::{ChannelConfig, Role};
use linkguard_core::events::{InboundEvent, OutboundAction};

async fn configured_bot(channel: &str) -> TestBot {
    let bot = TestBot::new();
    bot.state
        .service_context()
        .repository()
        .put(&ChannelConfig::with_defaults(channel))
        .await
        .unwrap();
    bot.joined(channel).await;
    bot
}

// ============================================================================
// Onboarding
// ============================================================================

#[tokio::test]
async fn test_ready_then_join_from_own_channel() {
    let mut bot = TestBot::new();

    bot.deliver(InboundEvent::Ready).await;
    assert_eq!(bot.drain(), vec![OutboundAction::join(BOT)]);
    bot.joined(BOT).await;

    bot.say(own_channel("NewStreamer", "!join")).await;
    assert_eq!(
        bot.drain(),
        vec![
            OutboundAction::join("newstreamer"),
            OutboundAction::send(BOT, "Joined #newstreamer with default settings."),
        ]
    );
    assert_eq!(
        bot.store.snapshot("newstreamer"),
        Some(ChannelConfig::with_defaults("newstreamer"))
    );

    bot.joined("newstreamer").await;
    assert!(bot.state.joined().contains("newstreamer"));

    bot.say(own_channel("NewStreamer", "!leave")).await;
    assert_eq!(bot.drain(), vec![OutboundAction::part("newstreamer")]);
    assert_eq!(bot.store.snapshot("newstreamer"), None);
}

#[tokio::test]
async fn test_unconfigured_channel_is_left() {
    let mut bot = TestBot::new();
    bot.joined("stranger").await;

    bot.say(viewer("stranger", "hello")).await;
    assert_eq!(bot.drain(), vec![OutboundAction::part("stranger")]);

    bot.deliver(InboundEvent::Parted {
        channel: "#stranger".to_string(),
    })
    .await;
    assert!(!bot.state.joined().contains("stranger"));
}

// ============================================================================
// Link moderation
// ============================================================================

#[tokio::test]
async fn test_viewer_link_is_deleted_and_answered() {
    let mut bot = configured_bot("chan").await;
    let message = viewer("chan", "free stuff at https://spam.com/win");
    let id = id_of(&message).to_string();

    bot.say(message).await;
    assert_eq!(
        bot.drain(),
        vec![
            OutboundAction::delete("chan", &id),
            OutboundAction::send("chan", "@viewer, please ask for permission before posting a link."),
        ]
    );
}

#[tokio::test]
async fn test_allowed_and_slashless_links_pass() {
    let mut bot = configured_bot("chan").await;

    bot.say(moderator("chan", "!links allow example.com")).await;
    assert_eq!(
        bot.drain(),
        vec![OutboundAction::send("chan", "New allow list for chan: example.com")]
    );

    bot.say(viewer("chan", "docs at https://www.example.com/guide")).await;
    bot.say(viewer("chan", "just typing spam.com without a path")).await;
    assert!(bot.drain().is_empty());
}

#[tokio::test]
async fn test_role_change_removes_vip_exemption() {
    let mut bot = configured_bot("chan").await;

    bot.say(vip("chan", "https://spam.com/x")).await;
    assert!(bot.drain().is_empty());

    bot.say(moderator("chan", "!links role BROADCASTER")).await;
    assert_eq!(
        bot.drain(),
        vec![OutboundAction::send(
            "chan",
            "Allowed userlevel set to BROADCASTER in chan"
        )]
    );
    assert_eq!(
        bot.store.snapshot("chan").unwrap().minimum_exempt_role,
        Role::Broadcaster
    );

    let message = vip("chan", "https://spam.com/x");
    let id = id_of(&message).to_string();
    bot.say(message).await;
    assert_eq!(bot.drain()[0], OutboundAction::delete("chan", &id));
}

#[tokio::test]
async fn test_pattern_entries_match_hosts() {
    let mut bot = configured_bot("chan").await;

    bot.say(moderator("chan", r"!links allow /^https?:\/\/clips\.twitch\.tv(\/|$)/")).await;
    bot.drain();

    bot.say(viewer("chan", "https://clips.twitch.tv/abc")).await;
    assert!(bot.drain().is_empty());

    bot.say(viewer("chan", "https://clips.twitch.tv.evil.com/abc")).await;
    assert_eq!(bot.drain().len(), 2);
}

#[tokio::test]
async fn test_custom_reply_and_reply_off() {
    let mut bot = configured_bot("chan").await;

    bot.say(moderator("chan", "!links reply no links please")).await;
    assert_eq!(
        bot.drain(),
        vec![OutboundAction::send(
            "chan",
            "New reply will be: \"moduser, no links please\""
        )]
    );

    bot.say(viewer("chan", "https://spam.com/x")).await;
    assert_eq!(
        bot.drain()[1],
        OutboundAction::send("chan", "viewer, no links please")
    );

    bot.say(moderator("chan", "!links reply off")).await;
    bot.drain();
    bot.say(viewer("chan", "https://spam.com/x")).await;
    let actions = bot.drain();
    assert_eq!(actions.len(), 1);
    assert!(matches!(actions[0], OutboundAction::SendMessage { .. }));
}

// ============================================================================
// Permits and cooldowns
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_permit_expires_after_five_minutes() {
    let mut bot = configured_bot("chan").await;

    bot.say(moderator("chan", "!permit @Viewer")).await;
    assert_eq!(
        bot.drain(),
        vec![OutboundAction::send(
            "chan",
            "Viewer may post any link for the next 5 minutes."
        )]
    );

    bot.say(viewer("chan", "https://spam.com/x")).await;
    assert!(bot.drain().is_empty());

    tokio::time::advance(Duration::from_secs(301)).await;
    bot.say(viewer("chan", "https://spam.com/x")).await;
    assert_eq!(bot.drain().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_cooldown_notice_mutes_the_channel() {
    let mut bot = configured_bot("chan").await;

    bot.deliver(notice("chan", "msg_ratelimit")).await;
    bot.say(viewer("chan", "https://spam.com/x")).await;
    assert!(bot.drain().is_empty());

    // Other channels are unaffected
    bot.state
        .service_context()
        .repository()
        .put(&ChannelConfig::with_defaults("other"))
        .await
        .unwrap();
    bot.say(viewer("other", "https://spam.com/x")).await;
    assert_eq!(bot.drain().len(), 2);

    tokio::time::advance(Duration::from_secs(301)).await;
    bot.say(viewer("chan", "https://spam.com/x")).await;
    assert_eq!(bot.drain().len(), 2);
}

#[tokio::test]
async fn test_ban_notice_removes_channel() {
    let mut bot = configured_bot("chan").await;

    bot.deliver(notice("chan", "msg_banned")).await;
    assert_eq!(bot.drain(), vec![OutboundAction::part("chan")]);
    assert_eq!(bot.store.snapshot("chan"), None);
}

// ============================================================================
// Storage tiers
// ============================================================================

#[tokio::test]
async fn test_settings_survive_cache_outage() {
    let mut bot = configured_bot("chan").await;
    bot.cache.set_available(false);

    bot.say(moderator("chan", "!links subdomains false")).await;
    assert_eq!(
        bot.drain(),
        vec![OutboundAction::send("chan", "Subdomain matching disabled in chan")]
    );
    assert!(!bot.store.snapshot("chan").unwrap().match_subdomains);

    bot.say(viewer("chan", "https://spam.com/x")).await;
    assert_eq!(bot.drain().len(), 2);
}

#[tokio::test]
async fn test_config_reads_are_cached() {
    let bot = configured_bot("chan").await;

    bot.say(viewer("chan", "hello")).await;
    let reads = bot.store.read_count();
    bot.say(viewer("chan", "hello again")).await;
    bot.say(viewer("chan", "and again")).await;

    assert_eq!(bot.store.read_count(), reads);
    assert!(bot.cache.peek("chan").is_some());
}

#[tokio::test]
async fn test_failed_save_is_reported() {
    let mut bot = configured_bot("chan").await;
    bot.say(viewer("chan", "warm the cache")).await;
    bot.store.set_available(false);

    bot.say(moderator("chan", "!links allow example.com")).await;
    assert_eq!(
        bot.drain(),
        vec![OutboundAction::send(
            "chan",
            "Failed to save settings for chan; please try again."
        )]
    );
}
