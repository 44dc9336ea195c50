//! Moderation services
//!
//! Each service borrows the shared [`ServiceContext`] and is cheap to create
//! per call.

pub mod commands;
pub mod context;
pub mod error;
pub mod link_check;
pub mod membership;
pub mod moderation;
pub mod notice;
pub mod outbound;
pub mod permit;
pub mod repository;
pub mod role;

#[cfg(test)]
mod testing;

// Re-export all services for convenience
pub use commands::{Command, CommandService, COMMAND_PREFIX};
pub use context::{ModerationSettings, ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use link_check::LinkCheckService;
pub use membership::{plan_reconciliation, MembershipService, ReconcilePlan};
pub use moderation::{ModerationOutcome, ModerationService};
pub use notice::{NoticeKind, NoticeService};
pub use outbound::{OutboundService, QueueSink};
pub use permit::PermitService;
pub use repository::ChannelConfigRepository;
pub use role::resolve_role;
