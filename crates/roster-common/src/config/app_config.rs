//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use serde::Deserialize;
use std::env;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub discord: DiscordConfig,
    pub sync: SyncConfig,
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

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Chat platform REST client configuration
#[derive(Clone, Deserialize)]
pub struct DiscordConfig {
    pub bot_token: String,
    #[serde(default = "default_discord_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_discord_request_timeout")]
    pub request_timeout_secs: u64,
}

impl DiscordConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// Keep the token out of logs
impl std::fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("bot_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Most external calls a single sync event makes
const CALLS_PER_EVENT: u128 = 2;

/// Slack on top of the worst-case event, for rate-limit waits
const CLAIM_LEASE_MARGIN: Duration = Duration::from_secs(60);

/// Outbox processing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_poll_interval")]
    pub role_poll_interval_secs: u64,
    #[serde(default = "default_poll_interval")]
    pub channel_poll_interval_secs: u64,
    #[serde(default = "default_batch_size")]
    pub batch_size: i64,
    #[serde(default = "default_retry_initial_delay")]
    pub retry_initial_delay_ms: u64,
    #[serde(default = "default_retry_max_retries")]
    pub retry_max_retries: u32,
    /// Enables lease-based claiming when set
    #[serde(default)]
    pub claim_lease_secs: Option<u64>,
    #[serde(default = "default_worker_id")]
    pub worker_id: String,
}

impl SyncConfig {
    #[must_use]
    pub fn role_poll_interval(&self) -> Duration {
        Duration::from_secs(self.role_poll_interval_secs)
    }

    #[must_use]
    pub fn channel_poll_interval(&self) -> Duration {
        Duration::from_secs(self.channel_poll_interval_secs)
    }

    #[must_use]
    pub fn retry_initial_delay(&self) -> Duration {
        Duration::from_millis(self.retry_initial_delay_ms)
    }

    #[must_use]
    pub fn claim_lease(&self) -> Option<Duration> {
        self.claim_lease_secs.map(Duration::from_secs)
    }

    /// Shortest lease that outlasts one claimed event
    ///
    /// An event makes at most two external calls. Each call may time out on
    /// every attempt and sleep through the whole backoff schedule.
    #[must_use]
    pub fn min_claim_lease(&self, request_timeout: Duration) -> Duration {
        let factor = 1u128
            .checked_shl(self.retry_max_retries)
            .map_or(u128::MAX, |f| f - 1);
        let backoff_ms = u128::from(self.retry_initial_delay_ms).saturating_mul(factor);
        let attempts = u128::from(self.retry_max_retries) + 1;
        let per_call_ms = request_timeout
            .as_millis()
            .saturating_mul(attempts)
            .saturating_add(backoff_ms);
        let total_ms = per_call_ms
            .saturating_mul(CALLS_PER_EVENT)
            .saturating_add(CLAIM_LEASE_MARGIN.as_millis());

        Duration::from_millis(u64::try_from(total_ms).unwrap_or(u64::MAX))
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size < 1 {
            return Err(ConfigError::InvalidValue(
                "SYNC_BATCH_SIZE",
                "must be at least 1".to_string(),
            ));
        }
        if self.role_poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SYNC_ROLE_POLL_INTERVAL_SECS",
                "must be at least 1".to_string(),
            ));
        }
        if self.channel_poll_interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "SYNC_CHANNEL_POLL_INTERVAL_SECS",
                "must be at least 1".to_string(),
            ));
        }
        if self.claim_lease_secs == Some(0) {
            return Err(ConfigError::InvalidValue(
                "SYNC_CLAIM_LEASE_SECS",
                "must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            role_poll_interval_secs: default_poll_interval(),
            channel_poll_interval_secs: default_poll_interval(),
            batch_size: default_batch_size(),
            retry_initial_delay_ms: default_retry_initial_delay(),
            retry_max_retries: default_retry_max_retries(),
            claim_lease_secs: None,
            worker_id: default_worker_id(),
        }
    }
}

// Default value functions
fn default_app_name() -> String {
    "roster-sync".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_discord_api_base_url() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_discord_request_timeout() -> u64 {
    15
}

fn default_poll_interval() -> u64 {
    5
}

fn default_batch_size() -> i64 {
    50
}

fn default_retry_initial_delay() -> u64 {
    1000
}

fn default_retry_max_retries() -> u32 {
    3
}

fn default_worker_id() -> String {
    env::var("HOSTNAME").unwrap_or_else(|_| "worker-0".to_string())
}

/// Parse an optional numeric variable, rejecting malformed values
fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let config = Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            },
            discord: DiscordConfig {
                bot_token: env::var("DISCORD_BOT_TOKEN")
                    .map_err(|_| ConfigError::MissingVar("DISCORD_BOT_TOKEN"))?,
                api_base_url: env::var("DISCORD_API_BASE_URL")
                    .unwrap_or_else(|_| default_discord_api_base_url()),
                request_timeout_secs: parse_var("DISCORD_REQUEST_TIMEOUT_SECS")?
                    .unwrap_or_else(default_discord_request_timeout),
            },
            sync: SyncConfig {
                role_poll_interval_secs: parse_var("SYNC_ROLE_POLL_INTERVAL_SECS")?
                    .unwrap_or_else(default_poll_interval),
                channel_poll_interval_secs: parse_var("SYNC_CHANNEL_POLL_INTERVAL_SECS")?
                    .unwrap_or_else(default_poll_interval),
                batch_size: parse_var("SYNC_BATCH_SIZE")?.unwrap_or_else(default_batch_size),
                retry_initial_delay_ms: parse_var("SYNC_RETRY_INITIAL_DELAY_MS")?
                    .unwrap_or_else(default_retry_initial_delay),
                retry_max_retries: parse_var("SYNC_RETRY_MAX_RETRIES")?
                    .unwrap_or_else(default_retry_max_retries),
                claim_lease_secs: parse_var("SYNC_CLAIM_LEASE_SECS")?,
                worker_id: env::var("SYNC_WORKER_ID").unwrap_or_else(|_| default_worker_id()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges, including ones that span sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sync.validate()?;

        if let Some(lease) = self.sync.claim_lease() {
            let min = self.sync.min_claim_lease(self.discord.request_timeout());
            if lease < min {
                let min_secs = min.as_secs() + u64::from(min.subsec_nanos() > 0);
                return Err(ConfigError::InvalidValue(
                    "SYNC_CLAIM_LEASE_SECS",
                    format!("must be at least {min_secs} to outlast one event"),
                ));
            }
        }
        Ok(())
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
