//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub bot: BotConfig,
    pub gateway: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub moderation: ModerationConfig,
    pub schedule: ScheduleConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Bot identity
#[derive(Debug, Clone, Deserialize)]
pub struct BotConfig {
    /// The bot's login, which is also its own channel
    pub username: String,
    /// Channels joined regardless of stored configuration
    #[serde(default)]
    pub extra_channels: Vec<String>,
}

/// Protocol bridge listen address
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Moderation timings
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    /// Channel configuration cache TTL in seconds
    #[serde(default = "default_config_cache_ttl")]
    pub config_cache_ttl_secs: u64,
    #[serde(default = "default_permit_ttl")]
    pub permit_ttl_secs: u64,
    #[serde(default = "default_cooldown_ttl")]
    pub cooldown_ttl_secs: u64,
    /// Budget for a single allow-list pattern evaluation
    #[serde(default = "default_pattern_timeout")]
    pub pattern_timeout_ms: u64,
}

impl ModerationConfig {
    #[must_use]
    pub fn config_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.config_cache_ttl_secs)
    }

    #[must_use]
    pub fn permit_ttl(&self) -> Duration {
        Duration::from_secs(self.permit_ttl_secs)
    }

    #[must_use]
    pub fn cooldown_ttl(&self) -> Duration {
        Duration::from_secs(self.cooldown_ttl_secs)
    }

    #[must_use]
    pub fn pattern_timeout(&self) -> Duration {
        Duration::from_millis(self.pattern_timeout_ms)
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            config_cache_ttl_secs: default_config_cache_ttl(),
            permit_ttl_secs: default_permit_ttl(),
            cooldown_ttl_secs: default_cooldown_ttl(),
            pattern_timeout_ms: default_pattern_timeout(),
        }
    }
}

/// Background task timings
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_tld_refresh")]
    pub tld_refresh_secs: u64,
    #[serde(default = "default_tld_source_url")]
    pub tld_source_url: String,
    #[serde(default = "default_reconcile_interval")]
    pub reconcile_interval_secs: u64,
    #[serde(default = "default_reconcile_initial_delay")]
    pub reconcile_initial_delay_secs: u64,
    /// Exit if no protocol adapter connects within this window
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            tld_refresh_secs: default_tld_refresh(),
            tld_source_url: default_tld_source_url(),
            reconcile_interval_secs: default_reconcile_interval(),
            reconcile_initial_delay_secs: default_reconcile_initial_delay(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "linkguard".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_config_cache_ttl() -> u64 {
    1800 // 30 minutes
}

fn default_permit_ttl() -> u64 {
    300 // 5 minutes
}

fn default_cooldown_ttl() -> u64 {
    300 // 5 minutes
}

fn default_pattern_timeout() -> u64 {
    100
}

fn default_tld_refresh() -> u64 {
    43_200 // 12 hours
}

fn default_tld_source_url() -> String {
    "https://data.iana.org/TLD/tlds-alpha-by-domain.txt".to_string()
}

fn default_reconcile_interval() -> u64 {
    3600
}

fn default_reconcile_initial_delay() -> u64 {
    5
}

fn default_connect_timeout() -> u64 {
    30
}

/// Parse an optional variable, falling back to a default when unset.
/// A set but unparsable value is an error rather than a silent default.
fn parse_var<T: FromStr>(name: &'static str, default: fn() -> T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default()),
    }
}

/// Like [`parse_var`], but zero is rejected
fn nonzero_var(name: &'static str, default: fn() -> u64) -> Result<u64, ConfigError> {
    match parse_var(name, default)? {
        0 => Err(ConfigError::InvalidValue(name, "0".to_string())),
        value => Ok(value),
    }
}

fn port_var(name: &'static str) -> Result<u16, ConfigError> {
    let raw = required_var(name)?;
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name, raw))
}

fn required_var(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn list_var(name: &'static str) -> Vec<String> {
    env::var(name)
        .ok()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(|c| c.trim_start_matches('#').to_lowercase())
                .collect()
        })
        .unwrap_or_default()
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            bot: BotConfig {
                username: required_var("BOT_USERNAME")?.to_lowercase(),
                extra_channels: list_var("EXTRA_CHANNELS"),
            },
            gateway: ServerConfig {
                host: env::var("GATEWAY_HOST").unwrap_or_else(|_| default_host()),
                port: port_var("GATEWAY_PORT")?,
            },
            database: DatabaseConfig {
                url: required_var("DATABASE_URL")?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", default_max_connections)?,
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS", default_min_connections)?,
            },
            redis: RedisConfig {
                url: required_var("REDIS_URL")?,
                max_connections: parse_var(
                    "REDIS_MAX_CONNECTIONS",
                    default_redis_max_connections,
                )?,
            },
            moderation: ModerationConfig {
                config_cache_ttl_secs: parse_var("CONFIG_CACHE_TTL_SECS", default_config_cache_ttl)?,
                permit_ttl_secs: parse_var("PERMIT_TTL_SECS", default_permit_ttl)?,
                cooldown_ttl_secs: parse_var("COOLDOWN_TTL_SECS", default_cooldown_ttl)?,
                pattern_timeout_ms: nonzero_var("PATTERN_TIMEOUT_MS", default_pattern_timeout)?,
            },
            schedule: ScheduleConfig {
                tld_refresh_secs: nonzero_var("TLD_REFRESH_SECS", default_tld_refresh)?,
                tld_source_url: env::var("TLD_SOURCE_URL")
                    .unwrap_or_else(|_| default_tld_source_url()),
                reconcile_interval_secs: nonzero_var(
                    "RECONCILE_INTERVAL_SECS",
                    default_reconcile_interval,
                )?,
                reconcile_initial_delay_secs: parse_var(
                    "RECONCILE_INITIAL_DELAY_SECS",
                    default_reconcile_initial_delay,
                )?,
                connect_timeout_secs: parse_var("CONNECT_TIMEOUT_SECS", default_connect_timeout)?,
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
