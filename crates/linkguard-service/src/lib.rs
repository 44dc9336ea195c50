//! # linkguard-service
//!
//! Application layer: the configuration repository, link extraction and
//! matching, commands, notices, membership, and the moderation engine.

pub mod links;
pub mod services;

pub use links::{LinkEngine, LinkExtractor, LinkVerdict, RegexPatternMatcher, TldDictionary};
pub use services::{
    ChannelConfigRepository, MembershipService, ModerationOutcome, ModerationService,
    ModerationSettings, NoticeService, QueueSink, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult,
};
