//! Moderator chat commands (`!permit`, `!links ...`)
//!
//! Parsing is separate from execution so malformed input can be dropped
//! before anything touches the stores. Malformed commands get no reply.

use tracing::{instrument, warn};

use linkguard_core::entities::{ChannelConfig, Role};
use linkguard_core::error::DomainError;

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::link_check::LinkCheckService;
use super::outbound::OutboundService;
use super::permit::PermitService;

/// Prefix every chat command starts with
pub const COMMAND_PREFIX: char = '!';

/// A parsed moderator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `!permit <user>`
    Permit(String),
    /// `!links allow|add <entry...>`
    Allow(Vec<String>),
    /// `!links deny|del|remove <entry...>`
    Deny(Vec<String>),
    /// `!links list`
    List,
    /// `!links slash [bool]`
    Slash(Option<bool>),
    /// `!links dot [bool]`
    Dot(Option<bool>),
    /// `!links subdomains [bool]`
    Subdomains(Option<bool>),
    /// `!links role [role]`, validated on execution
    Role(Option<String>),
    /// `!links reply [text]`
    Reply(Option<String>),
    /// `!links test <message>`
    Test(String),
}

impl Command {
    /// Parse a chat line. Command words are case-insensitive.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let (command, rest) = split_word(text);
        match command.to_ascii_lowercase().as_str() {
            "!permit" => {
                let (user, _) = split_word(rest);
                let user = user.strip_prefix('@').unwrap_or(user);
                if user.is_empty() {
                    return Err(malformed("!permit needs a user"));
                }
                Ok(Self::Permit(user.to_string()))
            }
            "!links" => Self::parse_links(rest),
            _ => Err(malformed(command)),
        }
    }

    fn parse_links(text: &str) -> Result<Self, DomainError> {
        let (subcommand, args) = split_word(text);
        let entries = || -> Result<Vec<String>, DomainError> {
            let entries: Vec<String> = args.split_whitespace().map(str::to_string).collect();
            if entries.is_empty() {
                return Err(malformed("no entries given"));
            }
            Ok(entries)
        };

        match subcommand.to_ascii_lowercase().as_str() {
            "allow" | "add" => Ok(Self::Allow(entries()?)),
            "deny" | "del" | "remove" => Ok(Self::Deny(entries()?)),
            "list" => Ok(Self::List),
            "slash" => Ok(Self::Slash(parse_toggle(args)?)),
            "dot" => Ok(Self::Dot(parse_toggle(args)?)),
            "subdomains" => Ok(Self::Subdomains(parse_toggle(args)?)),
            "role" => Ok(Self::Role(optional(args))),
            "reply" => Ok(Self::Reply(optional(args))),
            "test" => optional(args)
                .map(Self::Test)
                .ok_or_else(|| malformed("!links test needs a message")),
            other => Err(malformed(other)),
        }
    }
}

fn malformed(reason: &str) -> DomainError {
    DomainError::MalformedCommand(reason.to_string())
}

/// First word and the trimmed remainder
fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim();
    match text.find(char::is_whitespace) {
        Some(at) => (&text[..at], text[at..].trim()),
        None => (text, ""),
    }
}

fn optional(args: &str) -> Option<String> {
    (!args.is_empty()).then(|| args.to_string())
}

fn parse_toggle(args: &str) -> Result<Option<bool>, DomainError> {
    match args.to_ascii_lowercase().as_str() {
        "" => Ok(None),
        "true" | "yes" => Ok(Some(true)),
        "false" | "no" => Ok(Some(false)),
        other => Err(malformed(other)),
    }
}

/// Command execution service
pub struct CommandService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommandService<'a> {
    /// Create a new CommandService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Run `command` against `config` on behalf of `user`.
    ///
    /// A mutation that fails to persist is answered with a failure notice
    /// instead of the confirmation, and the error is returned.
    #[instrument(skip(self, config), fields(channel = %config.name))]
    pub async fn execute(
        &self,
        command: Command,
        config: &ChannelConfig,
        user: &str,
    ) -> ServiceResult<()> {
        let chan = config.name.as_str();
        let mut updated = config.clone();

        match command {
            Command::Permit(target) => {
                match PermitService::new(self.ctx).issue_permit(chan, &target).await {
                    Ok(_) => {
                        let minutes = self.ctx.settings().permit_ttl.as_secs() / 60;
                        self.reply(
                            chan,
                            &format!("{target} may post any link for the next {minutes} minutes."),
                        )
                        .await;
                    }
                    Err(e) => warn!(channel = %chan, user = %target, error = %e, "Permit not issued"),
                }
                Ok(())
            }
            Command::Allow(entries) => {
                updated.allow(entries.iter().map(String::as_str));
                let text = format!("New allow list for {chan}: {}", updated.allow_list.join(", "));
                self.save(&updated, &text).await
            }
            Command::Deny(entries) => {
                updated.deny(entries.iter().map(String::as_str));
                let text = format!("New allow list for {chan}: {}", updated.allow_list.join(", "));
                self.save(&updated, &text).await?;
                self.ctx
                    .links()
                    .forget_patterns(entries.iter().map(String::as_str));
                Ok(())
            }
            Command::List => {
                self.reply(
                    chan,
                    &format!("Current allow list for {chan}: {}", config.allow_list.join(", ")),
                )
                .await;
                Ok(())
            }
            Command::Slash(None) => {
                let text = if config.require_slash {
                    format!("Slashes currently required in {chan}")
                } else {
                    format!("Slashes currently NOT required in {chan}")
                };
                self.reply(chan, &text).await;
                Ok(())
            }
            Command::Slash(Some(value)) => {
                updated.require_slash = value;
                let text = if value {
                    format!("Slashes now required in {chan}")
                } else {
                    format!("Slashes now ignored in {chan}")
                };
                self.save(&updated, &text).await
            }
            Command::Dot(None) => {
                let text = if config.require_multi_dot {
                    format!("Multiple dots currently required in {chan}")
                } else {
                    format!("Multiple dots currently NOT required in {chan}")
                };
                self.reply(chan, &text).await;
                Ok(())
            }
            Command::Dot(Some(value)) => {
                updated.require_multi_dot = value;
                let text = if value {
                    format!("Multiple dots now required in {chan}")
                } else {
                    format!("Multiple dots now ignored in {chan}")
                };
                self.save(&updated, &text).await
            }
            Command::Subdomains(None) => {
                let state = if config.match_subdomains { "enabled" } else { "disabled" };
                self.reply(chan, &format!("Subdomain matching currently {state} in {chan}"))
                    .await;
                Ok(())
            }
            Command::Subdomains(Some(value)) => {
                updated.match_subdomains = value;
                let state = if value { "enabled" } else { "disabled" };
                self.save(&updated, &format!("Subdomain matching {state} in {chan}"))
                    .await
            }
            Command::Role(None) => {
                self.reply(
                    chan,
                    &format!("Allowed userlevel in {chan} is {}", config.minimum_exempt_role),
                )
                .await;
                Ok(())
            }
            Command::Role(Some(name)) => {
                let Ok(role) = name.parse::<Role>() else {
                    self.reply(chan, "Invalid role specified!").await;
                    return Ok(());
                };
                updated.minimum_exempt_role = role;
                self.save(&updated, &format!("Allowed userlevel set to {role} in {chan}"))
                    .await
            }
            Command::Reply(None) => {
                let text = match config.render_reply(user) {
                    Some(rendered) => format!("Current reply in {chan}: {rendered}"),
                    None => format!("Replies are currently disabled in {chan}"),
                };
                self.reply(chan, &text).await;
                Ok(())
            }
            Command::Reply(Some(template)) => {
                updated.set_reply(&template);
                let text = match updated.render_reply(user) {
                    Some(rendered) => format!("New reply will be: \"{rendered}\""),
                    None => "Replies disabled.".to_string(),
                };
                self.save(&updated, &text).await
            }
            Command::Test(message) => {
                let verdict = LinkCheckService::new(self.ctx).dry_run(&message, config).await;
                let text = if verdict.is_clean() {
                    "No disallowed links found.".to_string()
                } else {
                    format!("Disallowed links: {}", verdict.domains())
                };
                self.reply(chan, &text).await;
                Ok(())
            }
        }
    }

    async fn save(&self, config: &ChannelConfig, confirmation: &str) -> ServiceResult<()> {
        if let Err(e) = self.ctx.repository().put(config).await {
            self.reply(
                &config.name,
                &format!("Failed to save settings for {}; please try again.", config.name),
            )
            .await;
            return Err(e);
        }
        self.reply(&config.name, confirmation).await;
        Ok(())
    }

    async fn reply(&self, channel: &str, text: &str) {
        OutboundService::new(self.ctx).send_message(channel, text).await;
    }
}
