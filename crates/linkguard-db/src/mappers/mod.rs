//! Entity to model mappers
//!
//! Conversions between domain entities (linkguard-core) and stored documents:
//! - `From<ChannelDocument> for ChannelConfig`: stored document to domain object
//! - `From<&ChannelConfig> for ChannelDocument`: domain object to stored document

mod channel;
